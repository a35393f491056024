// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Scripted accesses to the LeoRV RAM through the user window.
//!
//! Nothing is checked locally. The result is judged by reading the RAM back
//! from outside once the run is over.

use core::ops::{Range, RangeInclusive};

use leorv_hal::caravel::UserWindow;
use leorv_hal::manual_additions::logic_analyzer::{Lane, ProbeBank};
use leorv_hal::mmio::{Mmio, OutOfWindow, Volatile};
use log::{debug, trace};

use crate::sequencer::{HeldInReset, PORT_SWITCHED, RESET_RELEASED};

/// Byte offsets that get their own offset written to them.
pub const FILL_BYTES: RangeInclusive<usize> = 0..=15;
/// Word indices cleared after the fill.
pub const CLEAR_WORDS: Range<usize> = 4..40;
/// Written to the window base once the RAM port is switched away. It must not
/// land.
pub const POISON: u32 = 0xDEAD_BEEF;

pub struct MemoryProbe<M: Mmio = Volatile> {
    probes: ProbeBank<M>,
    window: UserWindow<M>,
}

impl<M: Mmio> MemoryProbe<M> {
    pub fn new(held: HeldInReset<M>, window: UserWindow<M>) -> Self {
        MemoryProbe {
            probes: held.probes,
            window,
        }
    }

    /// Run the whole script in order, ending with the harts running from the
    /// written RAM.
    ///
    /// Only fails if the window is too small for the offsets used.
    pub fn run(self) -> Result<(), OutOfWindow> {
        debug!("probing LeoRV RAM");
        self.byte_fill()?;
        self.word_clear()?;
        self.cross_width_copies()?;
        self.switch_memory_port();
        self.boundary_probe()?;
        self.release_with_port_switched();
        debug!("LeoRV harts released");
        Ok(())
    }

    fn byte_fill(&self) -> Result<(), OutOfWindow> {
        for i in FILL_BYTES {
            self.window.write_byte(i, i as u8)?;
        }
        Ok(())
    }

    fn word_clear(&self) -> Result<(), OutOfWindow> {
        for i in CLEAR_WORDS {
            self.window.write_word(i, 0)?;
        }
        Ok(())
    }

    /// Copies between word and byte granularity. Words 0 to 3 are untouched
    /// by the clear, so the sources still hold the fill pattern.
    fn cross_width_copies(&self) -> Result<(), OutOfWindow> {
        self.window.write_word(10, self.window.read_word(0)?)?;
        self.window.write_word(13, self.window.read_word(2)?)?;
        self.window.write_byte(62, self.window.read_word(1)? as u8)?;
        Ok(())
    }

    fn switch_memory_port(&self) {
        trace!("switching RAM port to the harts");
        self.probes.lane0.set_data(PORT_SWITCHED);
    }

    fn boundary_probe(&self) -> Result<(), OutOfWindow> {
        self.window.write_word(0, POISON)
    }

    fn release_with_port_switched(&self) {
        self.probes.lane0.set_data(PORT_SWITCHED | RESET_RELEASED);
    }
}
