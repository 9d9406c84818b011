//! Radix conversion.
//!
//! Both directions work in digit groups sized to a machine word: parsing
//! folds groups in with one multiply-add per group, and formatting peels
//! groups off with one word division per group, zero-padding every group
//! except the most significant.

use num_traits::Zero;

use super::arith::{div_rem_word, mul_add_word};
use super::{BigInt, Sign};
use crate::digit::Word;
use crate::error::{ArithmeticError, Result};

/// Largest power of `radix` fitting in a word, with its digit count.
fn radix_group(radix: u32) -> (Word, u32) {
    let mut digits = 0;
    let mut group: u64 = 1;
    while group * u64::from(radix) <= u64::from(Word::MAX) {
        group *= u64::from(radix);
        digits += 1;
    }
    (group as Word, digits)
}

fn effective_radix(radix: u32) -> u32 {
    if (2..=36).contains(&radix) {
        radix
    } else {
        10
    }
}

pub(crate) fn parse_radix(s: &str, radix: u32) -> Result<BigInt> {
    let radix = effective_radix(radix);
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (Sign::Minus, &s[1..]),
        Some(b'+') => (Sign::Plus, &s[1..]),
        _ => (Sign::Plus, s),
    };
    if digits.is_empty() {
        return Err(ArithmeticError::MalformedNumber);
    }
    let (group_radix, group_digits) = radix_group(radix);
    let mut mag: Vec<Word> = Vec::new();
    let chars: Vec<char> = digits.chars().collect();
    let first_len = chars.len() % group_digits as usize;
    let mut pos = 0;
    let mut first = true;
    while pos < chars.len() {
        let take = if first && first_len != 0 {
            first_len
        } else {
            group_digits as usize
        };
        first = false;
        let mut group: Word = 0;
        for &c in &chars[pos..pos + take] {
            let d = c.to_digit(radix).ok_or(ArithmeticError::MalformedNumber)?;
            group = group * radix + d;
        }
        let scale = if take == group_digits as usize {
            group_radix
        } else {
            (u64::from(radix).pow(take as u32)) as Word
        };
        mul_add_word(&mut mag, scale, group);
        pos += take;
    }
    Ok(BigInt::from_magnitude(sign, mag))
}

pub(crate) fn to_str_radix(value: &BigInt, radix: u32) -> String {
    let radix = effective_radix(radix);
    if value.is_zero() {
        return "0".to_string();
    }
    let (group_radix, group_digits) = radix_group(radix);
    let mut mag = value.magnitude().to_vec();
    let mut groups: Vec<Word> = Vec::new();
    while !mag.is_empty() {
        groups.push(div_rem_word(&mut mag, group_radix));
    }
    let mut out = String::new();
    if value.sign() == Sign::Minus {
        out.push('-');
    }
    // Most significant group unpadded, the rest zero-padded to full width.
    let mut iter = groups.iter().rev();
    if let Some(&top) = iter.next() {
        push_group(&mut out, top, radix, 0);
    }
    for &group in iter {
        push_group(&mut out, group, radix, group_digits);
    }
    out
}

fn push_group(out: &mut String, mut group: Word, radix: u32, pad_to: u32) {
    let mut digits = [0u8; 32];
    let mut n = 0;
    while group != 0 {
        let d = group % radix;
        digits[n] = core::char::from_digit(d, radix).unwrap_or('0') as u8;
        n += 1;
        group /= radix;
    }
    if n == 0 && pad_to == 0 {
        out.push('0');
    }
    for _ in n..pad_to as usize {
        out.push('0');
    }
    for i in (0..n).rev() {
        out.push(digits[i] as char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_parse_basic() {
        assert_eq!(parse_radix("0", 10).unwrap(), BigInt::zero());
        assert_eq!(parse_radix("-0", 10).unwrap(), BigInt::zero());
        assert_eq!(parse_radix("+42", 10).unwrap(), BigInt::from(42));
        assert_eq!(parse_radix("-42", 10).unwrap(), BigInt::from(-42));
        assert_eq!(parse_radix("ff", 16).unwrap(), BigInt::from(255));
        assert_eq!(parse_radix("FF", 16).unwrap(), BigInt::from(255));
        assert_eq!(parse_radix("z", 36).unwrap(), BigInt::from(35));
        assert_eq!(parse_radix("-10011", 2).unwrap(), BigInt::from(-19));
    }

    #[test]
    fn test_parse_malformed() {
        for s in ["", "-", "+", "12a", " 12", "1.5", "12 "] {
            assert_eq!(
                parse_radix(s, 10),
                Err(ArithmeticError::MalformedNumber),
                "{s:?}"
            );
        }
        assert_eq!(parse_radix("2", 2), Err(ArithmeticError::MalformedNumber));
    }

    #[test]
    fn test_radix_out_of_range_defaults_to_ten() {
        assert_eq!(parse_radix("99", 1).unwrap(), BigInt::from(99));
        assert_eq!(parse_radix("99", 64).unwrap(), BigInt::from(99));
        assert_eq!(to_str_radix(&BigInt::from(99), 0), "99");
    }

    #[test]
    fn test_format_radix() {
        assert_eq!(to_str_radix(&BigInt::from(255), 16), "ff");
        assert_eq!(to_str_radix(&BigInt::from(-19), 2), "-10011");
        assert_eq!(to_str_radix(&BigInt::from(35), 36), "z");
        assert_eq!(to_str_radix(&BigInt::zero(), 7), "0");
    }

    #[test]
    fn test_roundtrip_multiword() {
        let s = "123456789012345678901234567890123456789012345678901234567890";
        let n = parse_radix(s, 10).unwrap();
        assert_eq!(to_str_radix(&n, 10), s);
        for radix in [2u32, 3, 8, 16, 31, 36] {
            let text = to_str_radix(&n, radix);
            assert_eq!(parse_radix(&text, radix).unwrap(), n, "radix {radix}");
        }
        // Group boundaries: values around powers of the group radix.
        let billion = parse_radix("1000000000", 10).unwrap();
        assert_eq!(to_str_radix(&billion, 10), "1000000000");
        let b2 = parse_radix("1000000000000000000", 10).unwrap();
        assert_eq!(to_str_radix(&b2, 10), "1000000000000000000");
    }
}
