// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;

use leorv_hal::counters::PerfCounters;
use leorv_hal::leorv::addresses as leorv;
use leorv_hal::manual_additions::led::StatusLed;
use leorv_hal::manual_additions::svga::Svga;
use leorv_hal::manual_additions::uart::SharedUart;
use leorv_sim::{reset, with_soc, SimBus};
use leorv_sys::command_loop::{Command, CommandLoop};
use leorv_sys::program::{liveness_blink, Heartbeat, Program};
use leorv_sys::test_pattern::render;

struct FixedCounters {
    cycles: u32,
    instret: u32,
    reads: RefCell<Vec<&'static str>>,
}

impl FixedCounters {
    fn new(cycles: u32, instret: u32) -> Self {
        FixedCounters {
            cycles,
            instret,
            reads: RefCell::new(Vec::new()),
        }
    }
}

impl PerfCounters for FixedCounters {
    fn cycles(&self) -> u32 {
        self.reads.borrow_mut().push("cycle");
        self.cycles
    }

    fn instructions_retired(&self) -> u32 {
        self.reads.borrow_mut().push("instret");
        self.instret
    }
}

fn shared_uart() -> SharedUart<SimBus> {
    unsafe { SharedUart::new() }
}

fn output() -> String {
    with_soc(|soc| String::from_utf8(soc.uart_output().to_vec()).unwrap())
}

#[test]
fn counters_are_reported_in_decimal() {
    reset();
    with_soc(|soc| soc.push_uart_input(b"ICR"));

    let uart = shared_uart();
    let mut cl = CommandLoop::new(&uart, FixedCounters::new(1000, 7));
    assert_eq!(cl.serve_one(), Some(Command::InstructionsRetired));
    assert_eq!(cl.serve_one(), Some(Command::Cycles));
    assert_eq!(cl.serve_one(), Some(Command::CyclesPerInstruction));

    assert_eq!(
        output(),
        "I\ninstret: 7\nC\ncycle:   1000\nR\nratio cycle / instret:   142\n"
    );
}

#[test]
fn ratio_reads_instret_first() {
    reset();
    with_soc(|soc| soc.push_uart_input(b"R"));

    let uart = shared_uart();
    let mut cl = CommandLoop::new(&uart, FixedCounters::new(10, 5));
    cl.serve_one();

    assert_eq!(*cl.counters().reads.borrow(), ["instret", "cycle"]);
    assert_eq!(output(), "R\nratio cycle / instret:   2\n");
}

#[test]
fn unknown_bytes_are_only_echoed() {
    reset();
    with_soc(|soc| soc.push_uart_input(b"Zi\n"));

    let uart = shared_uart();
    let mut cl = CommandLoop::new(&uart, FixedCounters::new(1, 1));
    for _ in 0..3 {
        assert_eq!(cl.serve_one(), None);
    }
    assert_eq!(output(), "Zi\n");
}

#[test]
fn echo_comes_before_the_reply() {
    reset();
    with_soc(|soc| soc.push_uart_input(b"C"));

    let uart = shared_uart();
    let mut cl = CommandLoop::new(&uart, FixedCounters::new(u32::MAX, 1));
    cl.serve_one();
    assert_eq!(output(), "C\ncycle:   4294967295\n");
}

#[test]
#[should_panic(expected = "divide by zero")]
fn ratio_without_retired_instructions_is_fatal() {
    reset();
    with_soc(|soc| soc.push_uart_input(b"R"));

    let uart = shared_uart();
    let mut cl = CommandLoop::new(&uart, FixedCounters::new(10, 0));
    cl.serve_one();
}

#[test]
fn startup_draws_before_announcing() {
    reset();

    let mut svga = unsafe { Svga::<SimBus>::new() };
    render(&mut svga).unwrap();
    let drawn = with_soc(|soc| soc.events().len());

    let uart = shared_uart();
    let mut cl = CommandLoop::new(&uart, FixedCounters::new(1, 1));
    cl.announce_ready();

    with_soc(|soc| {
        let fb = soc.framebuffer();
        assert_eq!(fb[0], 0xFF);
        assert_eq!(fb[99], 0xFF);
        assert_eq!(fb[100], 0x00);
        assert_eq!(fb[37 * 100 + 50], 0x72);
        assert!(fb[7500..7600].iter().all(|&b| b == 0xFF));
        assert_eq!(fb.len(), leorv::FRAMEBUFFER_SIZE);
        assert_eq!(drawn, leorv::FRAMEBUFFER_SIZE);
        assert_eq!(soc.uart_output(), b"!");
    });
}

#[test]
fn every_hart_blinks_first() {
    for hart in [0, 1] {
        reset();
        let mut led = unsafe { StatusLed::<SimBus>::new() };
        liveness_blink(&mut led);
        if Program::select(hart) == Program::Heartbeat {
            let mut heartbeat = Heartbeat::new(led);
            heartbeat.beat();
            heartbeat.beat();
            assert_eq!(with_soc(|soc| soc.led_writes().to_vec()), [1, 0, 1, 0, 1]);
        } else {
            assert!(led.is_lit());
            assert_eq!(with_soc(|soc| soc.led_writes().to_vec()), [1, 0, 1]);
        }
    }
}
