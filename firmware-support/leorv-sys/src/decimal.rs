// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use ufmt::uWrite;

/// Write `n` in decimal, most significant digit first.
///
/// Digits are emitted as they are found by recursing on `n / 10`, so no
/// buffer is needed. The depth is bounded by the ten digits of `u32::MAX`.
pub fn write_decimal<W: uWrite + ?Sized>(w: &mut W, n: u32) -> Result<(), W::Error> {
    if n > 9 {
        write_decimal(w, n / 10)?;
    }
    w.write_char(char::from(b'0' + (n % 10) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;
    use test_strategy::proptest;

    fn decimal(n: u32) -> String<16> {
        let mut s = String::new();
        write_decimal(&mut s, n).unwrap();
        s
    }

    #[test]
    fn digit_boundaries() {
        assert_eq!(decimal(0), "0");
        assert_eq!(decimal(9), "9");
        assert_eq!(decimal(10), "10");
        assert_eq!(decimal(99), "99");
        assert_eq!(decimal(100), "100");
        assert_eq!(decimal(u32::MAX), "4294967295");
    }

    #[test]
    fn appends_to_existing_output() {
        let mut s: String<16> = String::new();
        s.push_str("n=").unwrap();
        write_decimal(&mut s, 1200).unwrap();
        assert_eq!(s, "n=1200");
    }

    #[test]
    fn sink_errors_propagate() {
        // Room for three of the four digits.
        let mut s: String<3> = String::new();
        assert!(write_decimal(&mut s, 1234).is_err());
        assert_eq!(s, "123");
    }

    #[proptest]
    fn matches_std_formatting(n: u32) {
        assert_eq!(decimal(n).as_str(), n.to_string());
    }
}
