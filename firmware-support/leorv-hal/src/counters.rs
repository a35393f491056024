// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Performance counters.

/// Monotonic counters of the executing hart, truncated to 32 bits.
///
/// The counters cannot be reset from software. Values read before the first
/// instruction retires carry no meaning.
pub trait PerfCounters {
    fn cycles(&self) -> u32;
    fn instructions_retired(&self) -> u32;
}

/// The `cycle` and `instret` CSRs of the hart running this code.
pub struct HartCounters;

impl PerfCounters for HartCounters {
    #[inline(always)]
    fn cycles(&self) -> u32 {
        riscv::register::cycle::read() as u32
    }

    #[inline(always)]
    fn instructions_retired(&self) -> u32 {
        riscv::register::instret::read() as u32
    }
}
