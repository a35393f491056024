#![no_std]
#![cfg_attr(not(test), no_main)]

// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! LeoRV program. Hart 0 draws the test picture and serves UART commands,
//! every other hart blinks the status LED.

use core::panic::PanicInfo;

use leorv_hal::counters::HartCounters;
use leorv_hal::manual_additions::led::StatusLed;
use leorv_hal::manual_additions::svga::Svga;
use leorv_hal::manual_additions::uart::{SharedUart, Uart};
use leorv_sys::command_loop::CommandLoop;
use leorv_sys::program::{liveness_blink, Heartbeat, Program};
use leorv_sys::test_pattern::render;
#[cfg(feature = "uart-log")]
use leorv_sys::uart::log::UartLogger;
#[cfg(feature = "uart-log")]
use log::LevelFilter;
#[cfg(not(test))]
use riscv_rt::entry;
use ufmt::uwrite;

// SAFETY: only hart 0 reaches `main`, the other harts never touch the UART.
static UART: SharedUart = unsafe { SharedUart::new() };

#[cfg(feature = "uart-log")]
static LOGGER: UartLogger<&'static SharedUart> =
    UartLogger::new(LevelFilter::Trace, LevelFilter::Warn);

/// Runs on every hart before RAM is initialised. Returning `true` lets the
/// hart initialise RAM and enter `main`, so only hart 0 may return.
#[cfg(not(test))]
#[export_name = "_mp_hook"]
pub extern "Rust" fn mp_hook(hartid: usize) -> bool {
    match Program::select(hartid) {
        Program::CommandLoop => true,
        Program::Heartbeat => {
            // SAFETY: this hart's only LED handle. RAM is untouched, the
            // heartbeat lives on the hart's own stack.
            let mut led: StatusLed = unsafe { StatusLed::new() };
            liveness_blink(&mut led);
            Heartbeat::new(led).run()
        }
    }
}

#[cfg_attr(not(test), entry)]
fn main() -> ! {
    let mut led: StatusLed = unsafe { StatusLed::new() };
    liveness_blink(&mut led);

    #[cfg(feature = "uart-log")]
    unsafe { LOGGER.install(&UART, LevelFilter::Trace) }.unwrap();

    let mut svga: Svga = unsafe { Svga::new() };
    render(&mut svga).unwrap();

    let mut commands: CommandLoop<HartCounters> = CommandLoop::new(&UART, HartCounters);
    commands.announce_ready();
    commands.serve()
}

#[panic_handler]
fn panic_handler(info: &PanicInfo) -> ! {
    // SAFETY: nothing else runs on this hart anymore, and `UART` may have
    // been borrowed when the panic hit.
    let mut uart: Uart = unsafe { Uart::new() };
    match info.location() {
        Some(loc) => _ = uwrite!(uart, "PANIC at {}:{}\n", loc.file(), loc.line()),
        None => _ = uwrite!(uart, "PANIC\n"),
    }
    loop {
        continue;
    }
}
