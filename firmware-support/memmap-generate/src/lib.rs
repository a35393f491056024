// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

pub mod build_utils;
pub mod generators;
pub mod memory_x;
pub mod parse;
pub mod validate;

pub use crate::generators::{generate_hal_module, generate_hals};
pub use crate::memory_x::{memory_x, MemoryXError};
pub use crate::parse::{parse, MemoryMapDesc, ParseError, RegisterAccess};
pub use crate::validate::ValidationError;
