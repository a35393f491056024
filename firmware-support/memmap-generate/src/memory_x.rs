// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Write};

use heck::ToShoutySnakeCase;

use crate::parse::MemoryMapDesc;

/// Stack reserved per hart when more than one hart boots from the image.
pub const HART_STACK_SIZE: u64 = 0x400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryXError {
    UnknownMemory(String),
}

impl fmt::Display for MemoryXError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryXError::UnknownMemory(name) => {
                write!(f, "memory `{name}` is not declared in the memory map")
            }
        }
    }
}

impl std::error::Error for MemoryXError {}

/// Render a `riscv-rt` compatible `memory.x`.
///
/// Code and read-only data go to `text_memory`, everything else to
/// `data_memory`. Both may name the same memory.
pub fn memory_x(
    desc: &MemoryMapDesc,
    text_memory: &str,
    data_memory: &str,
) -> Result<String, MemoryXError> {
    for name in [text_memory, data_memory] {
        if desc.memory(name).is_none() {
            return Err(MemoryXError::UnknownMemory(name.to_owned()));
        }
    }

    let text = text_memory.to_shouty_snake_case();
    let data = data_memory.to_shouty_snake_case();

    let mut out = String::new();
    // Writing into a `String` cannot fail.
    let _ = writeln!(out, "MEMORY\n{{");
    for mem in &desc.memories {
        let _ = writeln!(
            out,
            "  {} : ORIGIN = 0x{:08X}, LENGTH = 0x{:X}",
            mem.name.to_shouty_snake_case(),
            mem.origin.0,
            mem.length.0
        );
    }
    let _ = writeln!(out, "}}\n");
    for (alias, target) in [
        ("REGION_TEXT", &text),
        ("REGION_RODATA", &text),
        ("REGION_DATA", &data),
        ("REGION_BSS", &data),
        ("REGION_HEAP", &data),
        ("REGION_STACK", &data),
    ] {
        let _ = writeln!(out, "REGION_ALIAS(\"{alias}\", {target});");
    }
    if desc.harts > 1 {
        let _ = writeln!(out, "\n_max_hart_id = {};", desc.harts - 1);
        let _ = writeln!(out, "_hart_stack_size = 0x{HART_STACK_SIZE:X};");
    }
    Ok(out)
}
