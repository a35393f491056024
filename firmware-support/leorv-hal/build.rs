// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::fs;
use std::path::Path;

use memmap_generate::build_utils::{load_all_memmaps, memmap_dir};
use memmap_generate::generate_hals;

fn main() {
    let memory_maps = load_all_memmaps();

    // `manual_additions` is written against these two maps.
    for required in ["caravel", "leorv"] {
        assert!(
            memory_maps.contains_key(required),
            "memory map `{required}` not found in {}",
            memmap_dir().display()
        );
    }

    let out_dir = env::var("OUT_DIR").expect("No out dir");
    let dest_path = Path::new(&out_dir).join("hals.rs");
    fs::write(dest_path, generate_hals(&memory_maps).to_string()).expect("Could not write file");

    println!("cargo:rerun-if-changed={}", memmap_dir().display());
    println!("cargo:rerun-if-changed=build.rs");
}
