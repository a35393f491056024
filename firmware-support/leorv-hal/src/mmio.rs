// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

/*! Memory-mapped register capabilities.

A register is a zero sized handle whose type pins both its address and its
access mode:

 - [`Reg`] is a single 32-bit register. `read` only exists for [`Readable`]
   access modes and `write` only for [`Writable`] ones, so reading a
   write-only register does not compile.
 - [`Window`] is a byte addressable region with a fixed base and size.
   Accesses outside of it are refused with [`OutOfWindow`] instead of being
   issued on the bus.

Every access goes through an [`Mmio`] backend. On target this is
[`Volatile`], which issues exactly one `read_volatile`/`write_volatile` per
call, so accesses are never cached, merged, elided or reordered with respect
to each other.
*/

use core::marker::PhantomData;

use ufmt::derive::uDebug;

/// The raw bus accesses a register handle is built on.
pub trait Mmio {
    /// # Safety
    ///
    /// `addr` must be backed by a device or memory that accepts byte reads.
    unsafe fn read_u8(addr: usize) -> u8;
    /// # Safety
    ///
    /// `addr` must be backed by a device or memory that accepts byte writes.
    unsafe fn write_u8(addr: usize, value: u8);
    /// # Safety
    ///
    /// `addr` must be word aligned and backed by a device or memory that
    /// accepts word reads.
    unsafe fn read_u32(addr: usize) -> u32;
    /// # Safety
    ///
    /// `addr` must be word aligned and backed by a device or memory that
    /// accepts word writes.
    unsafe fn write_u32(addr: usize, value: u32);
}

/// Volatile pointer accesses, the backend used on the harts.
pub enum Volatile {}

impl Mmio for Volatile {
    #[inline(always)]
    unsafe fn read_u8(addr: usize) -> u8 {
        (addr as *const u8).read_volatile()
    }

    #[inline(always)]
    unsafe fn write_u8(addr: usize, value: u8) {
        (addr as *mut u8).write_volatile(value)
    }

    #[inline(always)]
    unsafe fn read_u32(addr: usize) -> u32 {
        (addr as *const u32).read_volatile()
    }

    #[inline(always)]
    unsafe fn write_u32(addr: usize, value: u32) {
        (addr as *mut u32).write_volatile(value)
    }
}

mod sealed {
    pub trait Sealed {}
}

pub trait Access: sealed::Sealed {}
pub trait Readable: Access {}
pub trait Writable: Access {}

pub enum ReadOnly {}
pub enum WriteOnly {}
pub enum ReadWrite {}

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for WriteOnly {}
impl sealed::Sealed for ReadWrite {}

impl Access for ReadOnly {}
impl Access for WriteOnly {}
impl Access for ReadWrite {}

impl Readable for ReadOnly {}
impl Readable for ReadWrite {}
impl Writable for WriteOnly {}
impl Writable for ReadWrite {}

/// A 32-bit register at `ADDR`.
pub struct Reg<const ADDR: usize, A, M = Volatile> {
    _access: PhantomData<(A, M)>,
}

impl<const ADDR: usize, A: Access, M: Mmio> Reg<ADDR, A, M> {
    /// Create a handle for the register at `ADDR`.
    ///
    /// # Safety
    ///
    /// `ADDR` MUST be backed by the register this handle is declared for,
    /// and no other handle for it may be in use.
    pub const unsafe fn new() -> Self {
        Reg {
            _access: PhantomData,
        }
    }
}

impl<const ADDR: usize, A: Readable, M: Mmio> Reg<ADDR, A, M> {
    #[inline(always)]
    pub fn read(&self) -> u32 {
        unsafe { M::read_u32(ADDR) }
    }
}

impl<const ADDR: usize, A: Writable, M: Mmio> Reg<ADDR, A, M> {
    #[inline(always)]
    pub fn write(&self, value: u32) {
        unsafe { M::write_u32(ADDR, value) }
    }
}

/// An access that does not fit in the window it was issued on.
#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfWindow {
    /// Byte offset from the window base.
    pub offset: usize,
}

/// `SIZE` bytes of device memory starting at `BASE`.
pub struct Window<const BASE: usize, const SIZE: usize, A, M = Volatile> {
    _access: PhantomData<(A, M)>,
}

impl<const BASE: usize, const SIZE: usize, A: Access, M: Mmio> Window<BASE, SIZE, A, M> {
    /// Number of whole 32-bit words in the window.
    pub const WORDS: usize = SIZE / 4;

    /// Create a handle for the window at `BASE`.
    ///
    /// # Safety
    ///
    /// `BASE..BASE + SIZE` MUST be backed by the memory this handle is
    /// declared for, and no other handle for it may be in use.
    pub const unsafe fn new() -> Self {
        Window {
            _access: PhantomData,
        }
    }

    /// Absolute address of `width` bytes at `offset`, if they fit.
    fn address(offset: usize, width: usize) -> Result<usize, OutOfWindow> {
        match offset.checked_add(width) {
            Some(end) if end <= SIZE => Ok(BASE + offset),
            _ => Err(OutOfWindow { offset }),
        }
    }

    fn word_address(index: usize) -> Result<usize, OutOfWindow> {
        let offset = index.checked_mul(4).ok_or(OutOfWindow { offset: usize::MAX })?;
        Self::address(offset, 4)
    }
}

impl<const BASE: usize, const SIZE: usize, A: Readable, M: Mmio> Window<BASE, SIZE, A, M> {
    pub fn read_byte(&self, offset: usize) -> Result<u8, OutOfWindow> {
        let addr = Self::address(offset, 1)?;
        Ok(unsafe { M::read_u8(addr) })
    }

    /// Read the word at word index `index`, i.e. byte offset `4 * index`.
    pub fn read_word(&self, index: usize) -> Result<u32, OutOfWindow> {
        let addr = Self::word_address(index)?;
        Ok(unsafe { M::read_u32(addr) })
    }
}

impl<const BASE: usize, const SIZE: usize, A: Writable, M: Mmio> Window<BASE, SIZE, A, M> {
    pub fn write_byte(&self, offset: usize, value: u8) -> Result<(), OutOfWindow> {
        let addr = Self::address(offset, 1)?;
        unsafe { M::write_u8(addr, value) };
        Ok(())
    }

    /// Write the word at word index `index`, i.e. byte offset `4 * index`.
    pub fn write_word(&self, index: usize, value: u32) -> Result<(), OutOfWindow> {
        let addr = Self::word_address(index)?;
        unsafe { M::write_u32(addr, value) };
        Ok(())
    }
}
