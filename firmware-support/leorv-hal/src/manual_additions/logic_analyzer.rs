// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! The 128 logic analyzer probes between the management core and the user
//! project, as four 32-bit lanes.

use crate::hals::caravel::{
    La0Data, La0Iena, La0Oenb, La1Data, La1Iena, La1Oenb, La2Data, La2Iena, La2Oenb, La3Data,
    La3Iena, La3Oenb,
};
use crate::mmio::{Mmio, Volatile};

pub const LANES: usize = 4;

/// Direction and data registers of one 32-probe lane.
pub trait Lane {
    /// Output enable, active low per probe.
    fn set_output_enable(&self, mask: u32);
    fn set_input_enable(&self, mask: u32);
    fn set_data(&self, value: u32);
}

macro_rules! lane {
    ($name:ident, $oenb:ident, $iena:ident, $data:ident) => {
        pub struct $name<M: Mmio = Volatile> {
            oenb: $oenb<M>,
            iena: $iena<M>,
            data: $data<M>,
        }

        impl<M: Mmio> $name<M> {
            /// # Safety
            ///
            /// Must only be called on the Caravel management core, at most once.
            pub const unsafe fn new() -> Self {
                $name {
                    oenb: $oenb::<M>::new(),
                    iena: $iena::<M>::new(),
                    data: $data::<M>::new(),
                }
            }

            /// Last value written to the data register.
            pub fn data(&self) -> u32 {
                self.data.read()
            }
        }

        impl<M: Mmio> Lane for $name<M> {
            fn set_output_enable(&self, mask: u32) {
                self.oenb.write(mask);
            }

            fn set_input_enable(&self, mask: u32) {
                self.iena.write(mask);
            }

            fn set_data(&self, value: u32) {
                self.data.write(value);
            }
        }
    };
}

lane!(Lane0, La0Oenb, La0Iena, La0Data);
lane!(Lane1, La1Oenb, La1Iena, La1Data);
lane!(Lane2, La2Oenb, La2Iena, La2Data);
lane!(Lane3, La3Oenb, La3Iena, La3Data);

pub struct ProbeBank<M: Mmio = Volatile> {
    pub lane0: Lane0<M>,
    pub lane1: Lane1<M>,
    pub lane2: Lane2<M>,
    pub lane3: Lane3<M>,
}

impl<M: Mmio> ProbeBank<M> {
    /// # Safety
    ///
    /// Must only be called on the Caravel management core, at most once.
    pub const unsafe fn new() -> Self {
        ProbeBank {
            lane0: Lane0::new(),
            lane1: Lane1::new(),
            lane2: Lane2::new(),
            lane3: Lane3::new(),
        }
    }

    /// Lanes in probe order, lane 0 carrying probes [31:0].
    pub fn lanes(&self) -> [&dyn Lane; LANES] {
        [&self.lane0, &self.lane1, &self.lane2, &self.lane3]
    }

    /// Write `mask` to input enable, then output enable, lane by lane.
    pub fn route(&self, mask: u32) {
        for lane in self.lanes() {
            lane.set_input_enable(mask);
            lane.set_output_enable(mask);
        }
    }

    /// Drive all 128 probes low.
    pub fn clear(&self) {
        for lane in self.lanes() {
            lane.set_data(0);
        }
    }
}
