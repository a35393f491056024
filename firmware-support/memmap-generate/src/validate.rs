// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Structural checks on a parsed memory map.
//!
//! Every register is one 32-bit word. Registers, regions and memories must
//! not overlap each other and must fit in the 32-bit address space of the
//! harts.

use std::collections::HashSet;
use std::fmt;

use crate::parse::MemoryMapDesc;

pub const REGISTER_WIDTH: u64 = 4;
pub const ADDRESS_SPACE_END: u64 = 1 << 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateName(String),
    Misaligned { name: String, address: u64 },
    Aliased { first: String, second: String, address: u64 },
    Overlap { first: String, second: String },
    Empty(String),
    OutOfAddressSpace { name: String, end: u64 },
    NoHarts,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateName(name) => write!(f, "`{name}` is declared twice"),
            ValidationError::Misaligned { name, address } => {
                write!(f, "register `{name}` at 0x{address:08X} is not word aligned")
            }
            ValidationError::Aliased {
                first,
                second,
                address,
            } => write!(
                f,
                "registers `{first}` and `{second}` alias address 0x{address:08X}"
            ),
            ValidationError::Overlap { first, second } => {
                write!(f, "`{first}` overlaps `{second}`")
            }
            ValidationError::Empty(name) => write!(f, "`{name}` has size zero"),
            ValidationError::OutOfAddressSpace { name, end } => write!(
                f,
                "`{name}` ends at 0x{end:X}, past the 32-bit address space"
            ),
            ValidationError::NoHarts => write!(f, "a memory map needs at least one hart"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Register,
    Region,
    Memory,
}

struct Span<'a> {
    name: &'a str,
    kind: SpanKind,
    start: u64,
    end: u64,
}

pub fn validate(desc: &MemoryMapDesc) -> Result<(), ValidationError> {
    if desc.harts == 0 {
        return Err(ValidationError::NoHarts);
    }

    let mut names = HashSet::new();
    let mut spans = Vec::new();

    for reg in &desc.registers {
        let address = reg.address.0;
        if address % REGISTER_WIDTH != 0 {
            return Err(ValidationError::Misaligned {
                name: reg.name.clone(),
                address,
            });
        }
        spans.push(Span {
            name: &reg.name,
            kind: SpanKind::Register,
            start: address,
            end: address.saturating_add(REGISTER_WIDTH),
        });
    }
    for region in &desc.regions {
        spans.push(Span {
            name: &region.name,
            kind: SpanKind::Region,
            start: region.base.0,
            end: region.base.0.saturating_add(region.size.0),
        });
    }
    for mem in &desc.memories {
        spans.push(Span {
            name: &mem.name,
            kind: SpanKind::Memory,
            start: mem.origin.0,
            end: mem.origin.0.saturating_add(mem.length.0),
        });
    }

    for span in &spans {
        if !names.insert(span.name) {
            return Err(ValidationError::DuplicateName(span.name.to_owned()));
        }
        if span.start == span.end {
            return Err(ValidationError::Empty(span.name.to_owned()));
        }
        if span.end > ADDRESS_SPACE_END {
            return Err(ValidationError::OutOfAddressSpace {
                name: span.name.to_owned(),
                end: span.end,
            });
        }
    }

    spans.sort_by_key(|span| (span.start, span.end));

    // Compare every span against the one reaching furthest so far, which
    // catches overlaps of spans that are not neighbours after sorting.
    let mut furthest: Option<&Span> = None;
    for span in &spans {
        if let Some(prev) = furthest {
            if span.start < prev.end {
                return Err(
                    if prev.kind == SpanKind::Register && span.kind == SpanKind::Register {
                        ValidationError::Aliased {
                            first: prev.name.to_owned(),
                            second: span.name.to_owned(),
                            address: span.start,
                        }
                    } else {
                        ValidationError::Overlap {
                            first: prev.name.to_owned(),
                            second: span.name.to_owned(),
                        }
                    },
                );
            }
        }
        if furthest.map_or(true, |prev| span.end > prev.end) {
            furthest = Some(span);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{Address, RegionDesc, RegisterAccess, RegisterDesc};

    fn reg(name: &str, address: u64) -> RegisterDesc {
        RegisterDesc {
            name: name.to_owned(),
            address: Address(address),
            access: RegisterAccess::ReadWrite,
            description: String::new(),
        }
    }

    fn region(name: &str, base: u64, size: u64) -> RegionDesc {
        RegionDesc {
            name: name.to_owned(),
            base: Address(base),
            size: Address(size),
            access: RegisterAccess::ReadWrite,
            description: String::new(),
        }
    }

    fn map(registers: Vec<RegisterDesc>, regions: Vec<RegionDesc>) -> MemoryMapDesc {
        MemoryMapDesc {
            name: "Test".to_owned(),
            description: String::new(),
            harts: 1,
            memories: vec![],
            registers,
            regions,
        }
    }

    #[test]
    fn distinct_registers_pass() {
        let desc = map(vec![reg("a", 0x100), reg("b", 0x104)], vec![region("w", 0x200, 16)]);
        assert_eq!(validate(&desc), Ok(()));
    }

    #[test]
    fn aliasing_registers_are_rejected() {
        let desc = map(vec![reg("a", 0x100), reg("b", 0x104), reg("c", 0x100)], vec![]);
        let Err(ValidationError::Aliased { address, .. }) = validate(&desc) else {
            panic!("aliasing registers were accepted");
        };
        assert_eq!(address, 0x100);
    }

    #[test]
    fn misaligned_register_is_rejected() {
        let desc = map(vec![reg("a", 0x102)], vec![]);
        assert_eq!(
            validate(&desc),
            Err(ValidationError::Misaligned {
                name: "a".to_owned(),
                address: 0x102
            })
        );
    }

    #[test]
    fn register_inside_region_is_rejected() {
        let desc = map(vec![reg("inside", 0x208)], vec![region("w", 0x200, 0x100)]);
        assert!(matches!(
            validate(&desc),
            Err(ValidationError::Overlap { .. })
        ));
    }

    #[test]
    fn overlap_hidden_behind_a_large_region_is_found() {
        // `b` does not touch `small`, but both sit inside `big`.
        let desc = map(
            vec![reg("b", 0x1F0)],
            vec![region("big", 0x0, 0x1000), region("small", 0x10, 0x10)],
        );
        assert!(validate(&desc).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let desc = map(vec![reg("a", 0x0)], vec![region("a", 0x100, 4)]);
        assert_eq!(
            validate(&desc),
            Err(ValidationError::DuplicateName("a".to_owned()))
        );
    }

    #[test]
    fn spans_must_fit_32_bits() {
        let desc = map(vec![], vec![region("w", 0xFFFF_FF00, 0x200)]);
        assert!(matches!(
            validate(&desc),
            Err(ValidationError::OutOfAddressSpace { .. })
        ));
    }

    #[test]
    fn register_at_the_top_of_u64_is_out_of_range() {
        let desc = map(vec![reg("top", u64::MAX - 3)], vec![]);
        assert_eq!(
            validate(&desc),
            Err(ValidationError::OutOfAddressSpace {
                name: "top".to_owned(),
                end: u64::MAX
            })
        );
    }
}
