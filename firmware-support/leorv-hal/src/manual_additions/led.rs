// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use crate::hals::leorv::Led;
use crate::mmio::{Mmio, Volatile};

/// The status LED. The register is write-only, so the driver remembers the
/// last value written.
pub struct StatusLed<M: Mmio = Volatile> {
    reg: Led<M>,
    lit: bool,
}

impl<M: Mmio> StatusLed<M> {
    /// # Safety
    ///
    /// Must only be called on a LeoRV hart, and only one `StatusLed` may be in
    /// use per hart.
    pub const unsafe fn new() -> Self {
        StatusLed {
            reg: Led::<M>::new(),
            lit: false,
        }
    }

    pub fn set(&mut self, on: bool) {
        self.reg.write(u32::from(on));
        self.lit = on;
    }

    pub fn toggle(&mut self) {
        self.set(!self.lit);
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
