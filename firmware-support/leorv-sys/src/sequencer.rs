// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/*! Bring-up of the user project from the management core.

The steps have to happen in a fixed order, and every step is a type:

```text
Sequencer --configure_and_commit()--> Committed
          --route_probes(mask)-------> Routed
          --drive_reset_sequence()---> HeldInReset
          --MemoryProbe::new()-------> MemoryProbe
```

None of the writes are acknowledged by the user project, so the chain is the
only thing guaranteeing that the probes are routed after the pads are
configured and that the RAM is written while the LeoRV harts are held in reset.
*/

use leorv_hal::manual_additions::housekeeping::ConfigBus;
use leorv_hal::manual_additions::logic_analyzer::{Lane, ProbeBank};
use leorv_hal::mmio::{Mmio, Volatile};
use log::{debug, trace};

/// Lane-0 data bit releasing the LeoRV harts from reset.
pub const RESET_RELEASED: u32 = 1 << 0;
/// Lane-0 data bit handing the RAM port from the management bus to the harts.
pub const PORT_SWITCHED: u32 = 1 << 1;

/// Probe mask with every probe driven by the management core and read by the
/// user project.
pub const MANAGEMENT_DRIVES_ALL: u32 = 0xFFFF_FFFF;

pub struct Sequencer<M: Mmio = Volatile> {
    bus: ConfigBus<M>,
    probes: ProbeBank<M>,
}

impl<M: Mmio> Sequencer<M> {
    pub fn new(bus: ConfigBus<M>, probes: ProbeBank<M>) -> Self {
        Sequencer { bus, probes }
    }

    /// Enable the housekeeping SPI and wishbone routing, then apply the
    /// configuration and wait for hardware to acknowledge it. A transfer that
    /// is never acknowledged hangs here.
    pub fn configure_and_commit(mut self) -> Committed<M> {
        debug!("committing pad configuration");
        self.bus.enable().trigger().resolve();
        trace!("pad configuration applied");
        Committed {
            probes: self.probes,
        }
    }
}

/// The pad configuration has been acknowledged.
pub struct Committed<M: Mmio = Volatile> {
    probes: ProbeBank<M>,
}

impl<M: Mmio> Committed<M> {
    /// Write `mask` to the input and output enables of all four lanes.
    pub fn route_probes(self, mask: u32) -> Routed<M> {
        debug!("routing logic analyzer probes");
        self.probes.route(mask);
        Routed {
            probes: self.probes,
        }
    }
}

/// The probes are driven by the management core.
pub struct Routed<M: Mmio = Volatile> {
    probes: ProbeBank<M>,
}

impl<M: Mmio> Routed<M> {
    /// Clear every lane, then pulse reset: released once and asserted again,
    /// leaving the harts in reset with the RAM on the management bus.
    pub fn drive_reset_sequence(self) -> HeldInReset<M> {
        debug!("pulsing LeoRV reset");
        self.probes.clear();
        self.probes.lane0.set_data(RESET_RELEASED);
        self.probes.lane0.set_data(0);
        HeldInReset {
            probes: self.probes,
        }
    }
}

/// The LeoRV harts are in reset and the RAM port is on the management bus.
pub struct HeldInReset<M: Mmio = Volatile> {
    pub(crate) probes: ProbeBank<M>,
}
