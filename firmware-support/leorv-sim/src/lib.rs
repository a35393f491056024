// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/*! Behavioural model of the Caravel management SoC and the LeoRV SoC.

[`SimBus`] implements the HAL's [`Mmio`] backend against a thread local
[`Soc`], so host tests can run the real drivers and inspect what reached the
bus. Each test thread gets its own model.

Modelled behaviour:

 - `mprj_xfer` stays set for [`Soc::set_xfer_latency`] reads after a transfer
   is triggered.
 - The user window is backed by the LeoRV RAM while lane-0 data bit 1 is
   clear. Once it is set the RAM port belongs to the LeoRV harts and
   management writes to the window are dropped.
 - The UART delivers queued input one byte per read, with receive-ready set,
   and reports transmit-busy for [`Soc::set_uart_busy_polls`] reads after
   every write.
 - LED and framebuffer writes are recorded.

Any access to an address the model does not know panics. The model does not
log, so a logger writing through [`SimBus`] is safe to install.
*/

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use leorv_hal::caravel::addresses as caravel;
use leorv_hal::leorv::addresses as leorv;
use leorv_hal::manual_additions::uart::{RX_READY, TX_BUSY};
use leorv_hal::mmio::Mmio;

/// Lane-0 data bit handing the RAM port to the LeoRV harts.
pub const PORT_SWITCH: u32 = 1 << 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Read { addr: usize, width: Width, value: u32 },
    Write { addr: usize, width: Width, value: u32 },
}

impl BusEvent {
    pub fn addr(&self) -> usize {
        match *self {
            BusEvent::Read { addr, .. } | BusEvent::Write { addr, .. } => addr,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, BusEvent::Write { .. })
    }
}

const CARAVEL_CSRS: [usize; 14] = [
    caravel::SPI_ENABLE,
    caravel::WB_ENABLE,
    caravel::LA0_OENB,
    caravel::LA1_OENB,
    caravel::LA2_OENB,
    caravel::LA3_OENB,
    caravel::LA0_IENA,
    caravel::LA1_IENA,
    caravel::LA2_IENA,
    caravel::LA3_IENA,
    caravel::LA0_DATA,
    caravel::LA1_DATA,
    caravel::LA2_DATA,
    caravel::LA3_DATA,
];

pub struct Soc {
    events: Vec<BusEvent>,
    csrs: BTreeMap<usize, u32>,
    xfer_latency: u32,
    xfer_remaining: u32,
    user_ram: Vec<u8>,
    uart_rx: VecDeque<u8>,
    uart_tx: Vec<u8>,
    uart_busy_polls: u32,
    uart_busy_remaining: u32,
    led: Vec<u32>,
    framebuffer: Vec<u8>,
}

impl Default for Soc {
    fn default() -> Self {
        Soc {
            events: Vec::new(),
            csrs: CARAVEL_CSRS.iter().map(|&addr| (addr, 0)).collect(),
            xfer_latency: 3,
            xfer_remaining: 0,
            user_ram: vec![0; caravel::USER_WINDOW_SIZE],
            uart_rx: VecDeque::new(),
            uart_tx: Vec::new(),
            uart_busy_polls: 1,
            uart_busy_remaining: 0,
            led: Vec::new(),
            framebuffer: vec![0; leorv::FRAMEBUFFER_SIZE],
        }
    }
}

fn in_range(addr: usize, base: usize, size: usize) -> bool {
    addr >= base && addr < base + size
}

impl Soc {
    pub fn set_xfer_latency(&mut self, reads: u32) {
        self.xfer_latency = reads;
    }

    pub fn set_uart_busy_polls(&mut self, reads: u32) {
        self.uart_busy_polls = reads;
    }

    pub fn push_uart_input(&mut self, bytes: &[u8]) {
        self.uart_rx.extend(bytes);
    }

    /// Every access in program order.
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Values written to `addr`, in order.
    pub fn writes_to(&self, addr: usize) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                BusEvent::Write { addr: a, value, .. } if a == addr => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Number of reads of `addr`.
    pub fn reads_of(&self, addr: usize) -> usize {
        self.events
            .iter()
            .filter(|event| !event.is_write() && event.addr() == addr)
            .count()
    }

    /// Index in [`Soc::events`] of the first write to `addr`.
    pub fn first_write_to(&self, addr: usize) -> Option<usize> {
        self.events
            .iter()
            .position(|event| event.is_write() && event.addr() == addr)
    }

    pub fn csr(&self, addr: usize) -> u32 {
        self.csrs.get(&addr).copied().unwrap_or(0)
    }

    pub fn port_switched(&self) -> bool {
        self.csr(caravel::LA0_DATA) & PORT_SWITCH != 0
    }

    pub fn user_byte(&self, offset: usize) -> u8 {
        self.user_ram[offset]
    }

    pub fn user_word(&self, index: usize) -> u32 {
        let offset = index * 4;
        let bytes = &self.user_ram[offset..offset + 4];
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn uart_output(&self) -> &[u8] {
        &self.uart_tx
    }

    pub fn pending_uart_input(&self) -> usize {
        self.uart_rx.len()
    }

    pub fn led_writes(&self) -> &[u32] {
        &self.led
    }

    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    fn read(&mut self, addr: usize, width: Width) -> u32 {
        let value = self.read_device(addr, width);
        self.events.push(BusEvent::Read { addr, width, value });
        value
    }

    fn write(&mut self, addr: usize, width: Width, value: u32) {
        self.events.push(BusEvent::Write { addr, width, value });
        self.write_device(addr, width, value);
    }

    fn read_device(&mut self, addr: usize, width: Width) -> u32 {
        if addr == caravel::MPRJ_XFER {
            if self.xfer_remaining > 0 {
                self.xfer_remaining -= 1;
                return 1;
            }
            return 0;
        }
        if let Some(value) = self.csrs.get(&addr) {
            return *value;
        }
        if in_range(addr, caravel::USER_WINDOW_BASE, caravel::USER_WINDOW_SIZE) {
            if self.port_switched() {
                return 0;
            }
            let offset = addr - caravel::USER_WINDOW_BASE;
            return match width {
                Width::Byte => u32::from(self.user_ram[offset]),
                Width::Word => self.user_word(offset / 4),
            };
        }
        if addr == leorv::UART {
            let mut value = 0;
            if self.uart_busy_remaining > 0 {
                self.uart_busy_remaining -= 1;
                value |= TX_BUSY;
            }
            if let Some(byte) = self.uart_rx.pop_front() {
                value |= RX_READY | u32::from(byte);
            }
            return value;
        }
        panic!("unmapped read at 0x{addr:08X}");
    }

    fn write_device(&mut self, addr: usize, width: Width, value: u32) {
        if addr == caravel::MPRJ_XFER {
            if value & 1 != 0 {
                self.xfer_remaining = self.xfer_latency;
            }
            return;
        }
        if let Some(slot) = self.csrs.get_mut(&addr) {
            *slot = value;
            return;
        }
        if in_range(addr, caravel::USER_WINDOW_BASE, caravel::USER_WINDOW_SIZE) {
            if self.port_switched() {
                return;
            }
            let offset = addr - caravel::USER_WINDOW_BASE;
            match width {
                Width::Byte => self.user_ram[offset] = value as u8,
                Width::Word => {
                    self.user_ram[offset..offset + 4].copy_from_slice(&value.to_le_bytes())
                }
            }
            return;
        }
        if addr == leorv::UART {
            self.uart_tx.push(value as u8);
            self.uart_busy_remaining = self.uart_busy_polls;
            return;
        }
        if addr == leorv::LED {
            self.led.push(value);
            return;
        }
        if in_range(addr, leorv::FRAMEBUFFER_BASE, leorv::FRAMEBUFFER_SIZE) {
            let offset = addr - leorv::FRAMEBUFFER_BASE;
            match width {
                Width::Byte => self.framebuffer[offset] = value as u8,
                Width::Word => {
                    self.framebuffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes())
                }
            }
            return;
        }
        panic!("unmapped write at 0x{addr:08X}");
    }
}

thread_local! {
    static SOC: RefCell<Soc> = RefCell::new(Soc::default());
}

/// Run `f` on this thread's model.
pub fn with_soc<R>(f: impl FnOnce(&mut Soc) -> R) -> R {
    SOC.with(|soc| f(&mut soc.borrow_mut()))
}

/// Replace this thread's model with a fresh one.
pub fn reset() {
    with_soc(|soc| *soc = Soc::default());
}

/// [`Mmio`] backend routing every access to this thread's [`Soc`].
pub enum SimBus {}

impl Mmio for SimBus {
    unsafe fn read_u8(addr: usize) -> u8 {
        with_soc(|soc| soc.read(addr, Width::Byte)) as u8
    }

    unsafe fn write_u8(addr: usize, value: u8) {
        with_soc(|soc| soc.write(addr, Width::Byte, u32::from(value)))
    }

    unsafe fn read_u32(addr: usize) -> u32 {
        assert_eq!(addr % 4, 0, "misaligned word read at 0x{addr:08X}");
        with_soc(|soc| soc.read(addr, Width::Word))
    }

    unsafe fn write_u32(addr: usize, value: u32) {
        assert_eq!(addr % 4, 0, "misaligned word write at 0x{addr:08X}");
        with_soc(|soc| soc.write(addr, Width::Word, value))
    }
}
