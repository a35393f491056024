// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

pub mod command_loop;
pub mod decimal;
pub mod memory_probe;
pub mod program;
pub mod sequencer;
pub mod test_pattern;
pub mod uart;
