// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::validate::{validate, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryMapDesc {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Number of harts executing from this map's memories.
    #[serde(default = "single_hart")]
    pub harts: u32,
    #[serde(default)]
    pub memories: Vec<MemoryDesc>,
    #[serde(default)]
    pub registers: Vec<RegisterDesc>,
    #[serde(default)]
    pub regions: Vec<RegionDesc>,
}

fn single_hart() -> u32 {
    1
}

impl MemoryMapDesc {
    pub fn memory(&self, name: &str) -> Option<&MemoryDesc> {
        self.memories.iter().find(|mem| mem.name == name)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MemoryDesc {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub origin: Address,
    pub length: Address,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RegisterDesc {
    pub name: String,
    pub address: Address,
    pub access: RegisterAccess,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RegionDesc {
    pub name: String,
    pub base: Address,
    pub size: Address,
    #[serde(default = "read_write")]
    pub access: RegisterAccess,
    #[serde(default)]
    pub description: String,
}

fn read_write() -> RegisterAccess {
    RegisterAccess::ReadWrite
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RegisterAccess {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// An address or a size in the memory map.
///
/// Accepts plain JSON numbers as well as strings such as `"0x3000_0000"`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "Value")]
pub struct Address(pub u64);

impl TryFrom<Value> for Address {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if let Some(n) = value.as_u64() {
            return Ok(Address(n));
        }
        let Some(s) = value.as_str() else {
            return Err(format!("address must be a number or a string, got {value}"));
        };
        parse_address(s).map(Address)
    }
}

/// Parse a decimal or `0x` prefixed hexadecimal number, ignoring `_` separators.
pub fn parse_address(s: &str) -> Result<u64, String> {
    let digits: String = s.chars().filter(|c| *c != '_').collect();
    let (radix, body) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, digits.as_str()),
    };
    if body.is_empty() {
        return Err(format!("invalid address {s:?}: no digits"));
    }
    u64::from_str_radix(body, radix).map_err(|err| format!("invalid address {s:?}: {err}"))
}

#[derive(Debug)]
pub enum ParseError {
    Json(serde_json::Error),
    Invalid(ValidationError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Json(err) => write!(f, "malformed memory map: {err}"),
            ParseError::Invalid(err) => write!(f, "invalid memory map: {err}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Json(err) => Some(err),
            ParseError::Invalid(err) => Some(err),
        }
    }
}

/// Parse and validate a memory map.
pub fn parse(src: &str) -> Result<MemoryMapDesc, ParseError> {
    let desc: MemoryMapDesc = serde_json::from_str(src).map_err(ParseError::Json)?;
    validate(&desc).map_err(ParseError::Invalid)?;
    Ok(desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[test]
    fn addresses_accept_separators_and_hex() {
        assert_eq!(parse_address("0x3000_0000"), Ok(0x3000_0000));
        assert_eq!(parse_address("0XF0003000"), Ok(0xF000_3000));
        assert_eq!(parse_address("7_600"), Ok(7600));
        assert!(parse_address("0x").is_err());
        assert!(parse_address("12ab").is_err());
    }

    #[test]
    fn address_from_json_number_or_string() {
        let addr: Address = serde_json::from_str("8192").unwrap();
        assert_eq!(addr, Address(8192));
        let addr: Address = serde_json::from_str("\"0x000A_0000\"").unwrap();
        assert_eq!(addr, Address(0xA_0000));
        assert!(serde_json::from_str::<Address>("true").is_err());
    }

    #[proptest]
    fn hex_formatting_parses_back(value: u32) {
        let formatted = format!("0x{:04X}_{:04X}", value >> 16, value & 0xFFFF);
        assert_eq!(parse_address(&formatted), Ok(u64::from(value)));
    }
}
