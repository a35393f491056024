// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

pub mod housekeeping;
pub mod led;
pub mod logic_analyzer;
pub mod svga;
pub mod uart;
