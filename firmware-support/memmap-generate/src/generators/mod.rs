// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Rust register-map generation.
//!
//! The generated items refer to `crate::mmio`, so the output is meant to be
//! included into `leorv-hal`.

use std::collections::BTreeMap;

use heck::{ToShoutySnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::quote;

use crate::parse::{MemoryMapDesc, RegisterAccess};

pub(crate) fn ident(n: impl AsRef<str>) -> Ident {
    Ident::new(n.as_ref(), Span::call_site())
}

fn access_marker(access: RegisterAccess) -> TokenStream {
    match access {
        RegisterAccess::ReadOnly => quote! { crate::mmio::ReadOnly },
        RegisterAccess::WriteOnly => quote! { crate::mmio::WriteOnly },
        RegisterAccess::ReadWrite => quote! { crate::mmio::ReadWrite },
    }
}

fn doc(text: &str) -> TokenStream {
    if text.is_empty() {
        quote! {}
    } else {
        quote! { #[doc = #text] }
    }
}

/// Generate the `pub mod <map>` module for a single memory map.
///
/// For every register a type alias pinning the address and access mode is
/// emitted, for every region a window alias. Raw addresses end up in a nested
/// `addresses` module.
pub fn generate_hal_module(desc: &MemoryMapDesc) -> TokenStream {
    let module = ident(desc.name.to_lowercase());
    let module_doc = doc(&desc.description);

    let registers = desc.registers.iter().map(|reg| {
        let name = ident(reg.name.to_upper_camel_case());
        let addr = Literal::u64_unsuffixed(reg.address.0);
        let access = access_marker(reg.access);
        let reg_doc = doc(&reg.description);
        quote! {
            #reg_doc
            pub type #name<M = crate::mmio::Volatile> = crate::mmio::Reg<#addr, #access, M>;
        }
    });

    let regions = desc.regions.iter().map(|region| {
        let name = ident(region.name.to_upper_camel_case());
        let base = Literal::u64_unsuffixed(region.base.0);
        let size = Literal::u64_unsuffixed(region.size.0);
        let access = access_marker(region.access);
        let region_doc = doc(&region.description);
        quote! {
            #region_doc
            pub type #name<M = crate::mmio::Volatile> =
                crate::mmio::Window<#base, #size, #access, M>;
        }
    });

    let register_addrs = desc.registers.iter().map(|reg| {
        let name = ident(reg.name.to_shouty_snake_case());
        let addr = Literal::u64_unsuffixed(reg.address.0);
        quote! { pub const #name: usize = #addr; }
    });

    let region_addrs = desc.regions.iter().map(|region| {
        let base_name = ident(format!("{}_BASE", region.name.to_shouty_snake_case()));
        let size_name = ident(format!("{}_SIZE", region.name.to_shouty_snake_case()));
        let base = Literal::u64_unsuffixed(region.base.0);
        let size = Literal::u64_unsuffixed(region.size.0);
        quote! {
            pub const #base_name: usize = #base;
            pub const #size_name: usize = #size;
        }
    });

    let memory_addrs = desc.memories.iter().map(|mem| {
        let origin_name = ident(format!("{}_ORIGIN", mem.name.to_shouty_snake_case()));
        let length_name = ident(format!("{}_LENGTH", mem.name.to_shouty_snake_case()));
        let origin = Literal::u64_unsuffixed(mem.origin.0);
        let length = Literal::u64_unsuffixed(mem.length.0);
        quote! {
            pub const #origin_name: usize = #origin;
            pub const #length_name: usize = #length;
        }
    });

    let harts = Literal::u32_unsuffixed(desc.harts);

    quote! {
        #module_doc
        pub mod #module {
            pub const HARTS: u32 = #harts;

            #(#registers)*
            #(#regions)*

            pub mod addresses {
                #(#register_addrs)*
                #(#region_addrs)*
                #(#memory_addrs)*
            }
        }
    }
}

/// Generate one module per memory map, keyed by map name.
pub fn generate_hals(maps: &BTreeMap<String, MemoryMapDesc>) -> TokenStream {
    let modules = maps.values().map(generate_hal_module);
    quote! { #(#modules)* }
}
