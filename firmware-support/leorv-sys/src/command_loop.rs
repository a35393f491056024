// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/*! Polled single-character command protocol over the UART.

Every received byte is echoed before it is looked at. The recognised commands
reply with a labelled decimal line:

| byte | reply                                    |
|------|------------------------------------------|
| `I`  | `\ninstret: <instret>\n`                 |
| `C`  | `\ncycle:   <cycle>\n`                   |
| `R`  | `\nratio cycle / instret:   <ratio>\n`   |

Anything else only gets the echo.
*/

use leorv_hal::counters::PerfCounters;
use leorv_hal::manual_additions::uart::{SharedUart, Uart};
use leorv_hal::mmio::{Mmio, Volatile};
use log::trace;
use ufmt::derive::uDebug;
use ufmt::uWrite;

use crate::decimal::write_decimal;

/// Sent once the picture is drawn and commands are accepted.
pub const READY: u8 = b'!';

#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    InstructionsRetired,
    Cycles,
    CyclesPerInstruction,
}

impl Command {
    pub fn from_byte(byte: u8) -> Option<Command> {
        match byte {
            b'I' => Some(Command::InstructionsRetired),
            b'C' => Some(Command::Cycles),
            b'R' => Some(Command::CyclesPerInstruction),
            _ => None,
        }
    }
}

/// The UART is borrowed per operation, so a logger sharing it never holds
/// bytes the loop is waiting for.
pub struct CommandLoop<'a, C: PerfCounters, M: Mmio = Volatile> {
    uart: &'a SharedUart<M>,
    counters: C,
}

impl<'a, C: PerfCounters, M: Mmio> CommandLoop<'a, C, M> {
    pub fn new(uart: &'a SharedUart<M>, counters: C) -> Self {
        CommandLoop { uart, counters }
    }

    pub fn counters(&self) -> &C {
        &self.counters
    }

    pub fn announce_ready(&mut self) {
        self.uart.borrow_mut().send(READY);
    }

    /// Wait for one byte, echo it and answer it if it is a command.
    pub fn serve_one(&mut self) -> Option<Command> {
        let byte = {
            let mut uart = self.uart.borrow_mut();
            let byte = uart.receive();
            uart.send(byte);
            byte
        };

        let command = Command::from_byte(byte);
        if let Some(command) = command {
            trace!("serving {:?}", command);
            self.dispatch(command);
        }
        command
    }

    /// Write the reply to `command`.
    ///
    /// # Panics
    ///
    /// [`Command::CyclesPerInstruction`] divides by the retired instruction
    /// count and panics if it reads zero.
    pub fn dispatch(&mut self, command: Command) {
        self.reply(command).unwrap_or_else(|never| match never {})
    }

    fn reply(&mut self, command: Command) -> Result<(), <Uart<M> as uWrite>::Error> {
        let mut uart = self.uart.borrow_mut();
        let value = match command {
            Command::InstructionsRetired => {
                uart.write_str("\ninstret: ")?;
                self.counters.instructions_retired()
            }
            Command::Cycles => {
                uart.write_str("\ncycle:   ")?;
                self.counters.cycles()
            }
            Command::CyclesPerInstruction => {
                uart.write_str("\nratio cycle / instret:   ")?;
                let instret = self.counters.instructions_retired();
                let cycles = self.counters.cycles();
                cycles / instret
            }
        };
        write_decimal(&mut *uart, value)?;
        uart.write_str("\n")
    }

    pub fn serve(mut self) -> ! {
        loop {
            self.serve_one();
        }
    }
}
