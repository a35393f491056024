// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Common utilities for build.rs scripts

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{memory_x, parse, MemoryMapDesc};

/// Standard build script setup for RISC-V targets.
///
/// This function handles:
/// - Setting up cargo link arguments for RISC-V
/// - Setting up the linker search path
fn setup_riscv_linker(out_dir: &str) {
    if env::var("CARGO_CFG_TARGET_ARCH").unwrap() == "riscv32" {
        println!("cargo:rustc-link-arg=-Tmemory.x");
        println!("cargo:rustc-link-arg=-Tlink.x"); // linker script from riscv-rt
    }
    println!("cargo:rustc-link-search={out_dir}");
}

/// The checked-in `memory_maps` directory at the root of the workspace.
pub fn memmap_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../")
        .join("memory_maps")
}

/// Read and validate a memory map, aborting the build on any error.
pub fn load_memmap(path: &Path) -> MemoryMapDesc {
    let src = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    parse(&src).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

/// Load every `*.json` memory map in [`memmap_dir`], keyed by lowercase name.
pub fn load_all_memmaps() -> BTreeMap<String, MemoryMapDesc> {
    let dir = memmap_dir();
    let mut maps = BTreeMap::new();
    let entries = fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to list {}: {e}", dir.display()));
    for entry in entries {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "json") {
            let desc = load_memmap(&path);
            maps.insert(desc.name.to_lowercase(), desc);
        }
        println!("cargo:rerun-if-changed={}", path.display());
    }
    maps
}

/// Generates a memory.x file from a JSON memory map file and set up the linker
/// configuration for RISC-V targets.
///
/// # Arguments
/// * `memmap_json_name` - Name of the JSON file in the memory maps directory (e.g., "LeoRv.json")
/// * `text_memory` - Memory holding code and read-only data (e.g., "Flash")
/// * `data_memory` - Memory holding data, bss and the stacks (usually "Ram")
pub fn standard_memmap_build(memmap_json_name: &str, text_memory: &str, data_memory: &str) {
    let memmap_path = memmap_dir().join(memmap_json_name);
    let desc = load_memmap(&memmap_path);
    let memory_x = memory_x(&desc, text_memory, data_memory)
        .unwrap_or_else(|e| panic!("{}: {e}", memmap_path.display()));

    let out_dir = env::var("OUT_DIR").expect("No out dir");
    let dest_path = Path::new(&out_dir).join("memory.x");
    fs::write(dest_path, memory_x).expect("Could not write file");

    setup_riscv_linker(&out_dir);
    println!("cargo:rerun-if-changed={}", memmap_path.display());
}
