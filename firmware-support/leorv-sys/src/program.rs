// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Which program a LeoRV hart runs.

use leorv_hal::manual_additions::led::StatusLed;
use leorv_hal::mmio::Mmio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// Draw the test picture and serve UART commands.
    CommandLoop,
    /// Toggle the status LED forever.
    Heartbeat,
}

impl Program {
    pub fn select(hart_id: usize) -> Program {
        if hart_id == 0 {
            Program::CommandLoop
        } else {
            Program::Heartbeat
        }
    }
}

/// Toggle an unlit LED three times, leaving it lit.
pub fn liveness_blink<M: Mmio>(led: &mut StatusLed<M>) {
    for _ in 0..3 {
        led.toggle();
    }
}

pub struct Heartbeat<M: Mmio> {
    led: StatusLed<M>,
}

impl<M: Mmio> Heartbeat<M> {
    pub fn new(led: StatusLed<M>) -> Self {
        Heartbeat { led }
    }

    pub fn beat(&mut self) {
        self.led.toggle();
    }

    pub fn run(mut self) -> ! {
        loop {
            self.beat();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_hart_zero_serves_commands() {
        assert_eq!(Program::select(0), Program::CommandLoop);
        assert_eq!(Program::select(1), Program::Heartbeat);
        assert_eq!(Program::select(usize::MAX), Program::Heartbeat);
    }
}
