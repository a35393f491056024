// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

pub mod counters;
pub mod mmio;
pub mod spin;

// Generated from `memory_maps/*.json` by the build script: one module per
// memory map with a register alias per register and a window alias per region.
#[rustfmt::skip]
#[allow(clippy::all)]
pub mod hals {
    include!(concat!(env!("OUT_DIR"), "/hals.rs"));
}

pub use hals::*;

pub mod manual_additions;
