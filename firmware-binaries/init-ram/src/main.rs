#![no_std]
#![cfg_attr(not(test), no_main)]

// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Management core program: configure the pads, route the logic analyzer
//! probes to the user project, then load and release the LeoRV harts.

use core::panic::PanicInfo;

use leorv_hal::caravel::UserWindow;
use leorv_hal::manual_additions::housekeeping::ConfigBus;
use leorv_hal::manual_additions::logic_analyzer::ProbeBank;
use leorv_sys::memory_probe::MemoryProbe;
use leorv_sys::sequencer::{Sequencer, MANAGEMENT_DRIVES_ALL};
#[cfg(not(test))]
use riscv_rt::entry;

#[cfg_attr(not(test), entry)]
fn main() -> ! {
    // SAFETY: the only handles to these registers in this program.
    let sequencer: Sequencer = unsafe { Sequencer::new(ConfigBus::new(), ProbeBank::new()) };
    let window: UserWindow = unsafe { UserWindow::new() };

    let held = sequencer
        .configure_and_commit()
        .route_probes(MANAGEMENT_DRIVES_ALL)
        .drive_reset_sequence();
    MemoryProbe::new(held, window).run().unwrap();

    loop {
        continue;
    }
}

#[panic_handler]
fn panic_handler(_info: &PanicInfo) -> ! {
    loop {
        continue;
    }
}
