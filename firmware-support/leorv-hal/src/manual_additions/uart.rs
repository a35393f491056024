// SPDX-FileCopyrightText: 2022 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use core::cell::{RefCell, RefMut};
use core::convert::Infallible;

use heapless::Deque;
use log::warn;
use ufmt::derive::uDebug;

use crate::hals::leorv::Uart as UartRegister;
use crate::mmio::{Mmio, Volatile};
use crate::spin;

/// High while unread data is present, cleared by the read that returns it.
pub const RX_READY: u32 = 1 << 31;
/// High while the last written byte is still being shifted out.
pub const TX_BUSY: u32 = 1 << 30;
pub const DATA_MASK: u32 = 0xFF;

/// Received bytes the driver can hold on to while it polls for transmit.
pub const RX_BACKLOG: usize = 16;

#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartStatus {
    pub receive_ready: bool,
    pub transmit_busy: bool,
}

#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitBusy;
#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveEmpty;
#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartInUse;

/// Polled UART of the LeoRV SoC.
///
/// Data and both status flags share one register, and every read of it
/// consumes a pending receive byte. Bytes observed while checking the status
/// are therefore kept in a backlog and handed out by the next receive.
pub struct Uart<M: Mmio = Volatile> {
    reg: UartRegister<M>,
    backlog: Deque<u8, RX_BACKLOG>,
}

impl<M: Mmio> Uart<M> {
    /// # Safety
    ///
    /// Must only be called on a LeoRV hart, and only one `Uart` may be in use.
    pub const unsafe fn new() -> Self {
        Uart {
            reg: UartRegister::<M>::new(),
            backlog: Deque::new(),
        }
    }

    /// UART status register output
    pub fn read_status(&mut self) -> UartStatus {
        let raw = self.reg.read();

        if raw & RX_READY != 0 && self.backlog.push_back((raw & DATA_MASK) as u8).is_err() {
            warn!("UART backlog full, dropping received byte");
        }

        UartStatus {
            receive_ready: !self.backlog.is_empty(),
            transmit_busy: raw & TX_BUSY != 0,
        }
    }

    /// The `receive` function attempts to receive data from the UART. If no
    /// data is available, it keeps looping until data is available.
    pub fn receive(&mut self) -> u8 {
        spin::poll(|| self.try_receive().ok())
    }

    /// The `try_receive` function attempts to receive data from the UART. If no
    /// data is available, it returns an error.
    pub fn try_receive(&mut self) -> Result<u8, ReceiveEmpty> {
        if self.backlog.is_empty() {
            self.read_status();
        }
        self.backlog.pop_front().ok_or(ReceiveEmpty)
    }

    /// The `send` function sends the given data to the UART. If the UART is
    /// still busy, it keeps looping until it can send the data.
    pub fn send(&mut self, data: u8) {
        spin::poll(|| self.try_send(data).ok())
    }

    /// The `try_send` function attempts to send the given data to the UART. If
    /// the UART is still busy with the previous byte, it returns an error.
    pub fn try_send(&mut self, data: u8) -> Result<(), TransmitBusy> {
        if self.read_status().transmit_busy {
            Err(TransmitBusy)
        } else {
            self.reg.write(u32::from(data));
            Ok(())
        }
    }
}

impl<M: Mmio> ufmt::uWrite for Uart<M> {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for b in s.bytes() {
            self.send(b);
        }
        Ok(())
    }
}

impl<M: Mmio> core::fmt::Write for Uart<M> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for b in s.bytes() {
            self.send(b);
        }
        Ok(())
    }
}

/// The one [`Uart`] of a hart, shared between its users.
///
/// Every user goes through the same driver and therefore the same receive
/// backlog, so a byte picked up while one user polls for transmit is handed
/// to whoever receives next.
pub struct SharedUart<M: Mmio = Volatile> {
    uart: RefCell<Uart<M>>,
}

impl<M: Mmio> SharedUart<M> {
    /// # Safety
    ///
    /// Same as [`Uart::new`]. The result must only be used from one thread of
    /// execution.
    pub const unsafe fn new() -> Self {
        SharedUart {
            uart: RefCell::new(Uart::new()),
        }
    }

    /// # Panics
    ///
    /// If the UART is already borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Uart<M>> {
        self.uart.borrow_mut()
    }

    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, Uart<M>>, UartInUse> {
        self.uart.try_borrow_mut().map_err(|_| UartInUse)
    }
}

// SAFETY: only sound with a single thread of execution, see `SharedUart::new`.
unsafe impl<M: Mmio> Sync for SharedUart<M> {}

/// Writes fail instead of blocking while another user holds the UART.
impl<M: Mmio> core::fmt::Write for &SharedUart<M> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let mut uart = self.try_borrow_mut().map_err(|_| core::fmt::Error)?;
        core::fmt::Write::write_str(&mut *uart, s)
    }
}
