// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/*! Caravel pad configuration handshake.

Changing the pad and bus routing configuration is a two phase transaction:

```text
Idle --enable()--> Enabled --trigger()--> Committing --resolve()--> Idle
```

Each phase is its own type, so the trigger cannot be set before the enables
and the routing cannot be relied upon before hardware has acknowledged it.
*/

use crate::hals::caravel::{MprjXfer, SpiEnable, WbEnable};
use crate::mmio::{Mmio, Volatile};
use crate::spin;

/// Bit set by software to start a transfer, cleared by hardware when done.
pub const XFER_BUSY: u32 = 1;

pub struct ConfigBus<M: Mmio = Volatile> {
    spi_enable: SpiEnable<M>,
    wb_enable: WbEnable<M>,
    xfer: MprjXfer<M>,
}

impl<M: Mmio> ConfigBus<M> {
    /// # Safety
    ///
    /// Must only be called on the Caravel management core, at most once.
    pub const unsafe fn new() -> Self {
        ConfigBus {
            spi_enable: SpiEnable::<M>::new(),
            wb_enable: WbEnable::<M>::new(),
            xfer: MprjXfer::<M>::new(),
        }
    }

    /// Connect the housekeeping SPI internally, so external pin changes do
    /// not affect it, and route the management wishbone bus into the user
    /// project.
    pub fn enable(&mut self) -> Enabled<'_, M> {
        self.spi_enable.write(1);
        self.wb_enable.write(1);
        Enabled { bus: self }
    }
}

/// Enables are set, the configuration has not been applied yet.
pub struct Enabled<'a, M: Mmio> {
    bus: &'a mut ConfigBus<M>,
}

impl<'a, M: Mmio> Enabled<'a, M> {
    /// Apply the configuration.
    pub fn trigger(self) -> Committing<'a, M> {
        self.bus.xfer.write(XFER_BUSY);
        Committing { bus: self.bus }
    }
}

/// The configuration is being shifted out to the pads.
pub struct Committing<'a, M: Mmio> {
    bus: &'a mut ConfigBus<M>,
}

impl<M: Mmio> Committing<'_, M> {
    /// Whether hardware has cleared the transfer bit.
    pub fn is_resolved(&self) -> bool {
        self.bus.xfer.read() & XFER_BUSY == 0
    }

    /// Busy-wait until hardware acknowledges the configuration. Never times
    /// out.
    pub fn resolve(self) {
        spin::wait_until(|| self.is_resolved());
    }
}
