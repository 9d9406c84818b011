//! Schoolbook magnitude arithmetic.
//!
//! All helpers operate on normalized magnitudes: most significant word
//! first, no leading zero words, empty slice for zero.

use core::cmp::Ordering;

use crate::digit::{lo, DoubleWord, Word, BITS};

/// Remove leading zero words so the magnitude stays canonical.
pub(crate) fn strip_leading_zeros(v: &mut Vec<Word>) {
    let nonzero = v.iter().position(|&w| w != 0).unwrap_or(v.len());
    if nonzero > 0 {
        v.drain(..nonzero);
    }
}

pub(crate) fn cmp_mag(a: &[Word], b: &[Word]) -> Ordering {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => a.cmp(b),
        ord => ord,
    }
}

/// `a + b` on magnitudes.
pub(crate) fn add_mag(a: &[Word], b: &[Word]) -> Vec<Word> {
    let (x, y) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut result = x.to_vec();
    let offset = x.len() - y.len();
    let mut carry: DoubleWord = 0;
    for i in (0..x.len()).rev() {
        let yi = if i >= offset { y[i - offset] } else { 0 };
        let sum = DoubleWord::from(result[i]) + DoubleWord::from(yi) + carry;
        result[i] = lo(sum);
        carry = sum >> BITS;
        if carry == 0 && i <= offset {
            break;
        }
    }
    if carry != 0 {
        result.insert(0, 1);
    }
    result
}

/// `a - b` on magnitudes; requires `a >= b`.
pub(crate) fn sub_mag(a: &[Word], b: &[Word]) -> Vec<Word> {
    debug_assert!(cmp_mag(a, b) != Ordering::Less);
    let mut result = a.to_vec();
    let offset = a.len() - b.len();
    let mut borrow: i64 = 0;
    for i in (0..a.len()).rev() {
        let bi = if i >= offset { b[i - offset] } else { 0 };
        let diff = i64::from(result[i]) - i64::from(bi) - borrow;
        if diff < 0 {
            result[i] = (diff + (1i64 << BITS)) as Word;
            borrow = 1;
        } else {
            result[i] = diff as Word;
            borrow = 0;
        }
        if borrow == 0 && i <= offset {
            break;
        }
    }
    strip_leading_zeros(&mut result);
    result
}

/// `a * b` on magnitudes, schoolbook with carry propagation.
pub(crate) fn mul_mag(a: &[Word], b: &[Word]) -> Vec<Word> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut result = vec![0 as Word; a.len() + b.len()];
    for i in (0..a.len()).rev() {
        let ai = DoubleWord::from(a[i]);
        let mut carry: DoubleWord = 0;
        for j in (0..b.len()).rev() {
            let idx = i + j + 1;
            let t = ai * DoubleWord::from(b[j]) + DoubleWord::from(result[idx]) + carry;
            result[idx] = lo(t);
            carry = t >> BITS;
        }
        result[i] = carry as Word;
    }
    strip_leading_zeros(&mut result);
    result
}

/// In-place `v = v * m + a`, used by group-wise radix parsing.
pub(crate) fn mul_add_word(v: &mut Vec<Word>, m: Word, a: Word) {
    let mut carry = DoubleWord::from(a);
    for i in (0..v.len()).rev() {
        let t = DoubleWord::from(v[i]) * DoubleWord::from(m) + carry;
        v[i] = lo(t);
        carry = t >> BITS;
    }
    if carry != 0 {
        v.insert(0, carry as Word);
    }
}

/// In-place `v /= d`, returning the remainder; `d` must be nonzero.
pub(crate) fn div_rem_word(v: &mut Vec<Word>, d: Word) -> Word {
    debug_assert!(d != 0);
    let divisor = DoubleWord::from(d);
    let mut rem: DoubleWord = 0;
    for w in v.iter_mut() {
        let cur = (rem << BITS) | DoubleWord::from(*w);
        *w = (cur / divisor) as Word;
        rem = cur % divisor;
    }
    strip_leading_zeros(v);
    rem as Word
}

/// `a % m` where `m` is a native word pair, used by small-prime filters.
pub(crate) fn rem_mag_u64(a: &[Word], m: u64) -> u64 {
    debug_assert!(m != 0);
    let mut rem: u128 = 0;
    for &w in a {
        rem = ((rem << BITS) | u128::from(w)) % u128::from(m);
    }
    rem as u64
}

/// `a << n` on magnitudes.
pub(crate) fn shl_mag(a: &[Word], n: u64) -> Vec<Word> {
    if a.is_empty() {
        return Vec::new();
    }
    let word_shift = (n / u64::from(BITS)) as usize;
    let bit_shift = (n % u64::from(BITS)) as u32;
    let mut result = Vec::with_capacity(a.len() + word_shift + 1);
    if bit_shift == 0 {
        result.extend_from_slice(a);
    } else {
        let high = a[0] >> (BITS - bit_shift);
        if high != 0 {
            result.push(high);
        }
        for i in 0..a.len() {
            let lo_part = a[i] << bit_shift;
            let hi_part = if i + 1 < a.len() {
                a[i + 1] >> (BITS - bit_shift)
            } else {
                0
            };
            result.push(lo_part | hi_part);
        }
    }
    result.extend(core::iter::repeat(0).take(word_shift));
    result
}

/// `a >> n` on magnitudes (low bits discarded).
pub(crate) fn shr_mag(a: &[Word], n: u64) -> Vec<Word> {
    let word_shift = (n / u64::from(BITS)) as usize;
    let bit_shift = (n % u64::from(BITS)) as u32;
    if word_shift >= a.len() {
        return Vec::new();
    }
    let kept = &a[..a.len() - word_shift];
    let mut result = if bit_shift == 0 {
        kept.to_vec()
    } else {
        let mut out = Vec::with_capacity(kept.len());
        let mut prev: Word = 0;
        for &w in kept {
            out.push((prev << (BITS - bit_shift)) | (w >> bit_shift));
            prev = w;
        }
        out
    };
    strip_leading_zeros(&mut result);
    result
}

/// True when any of the low `n` bits of the magnitude is set.
pub(crate) fn low_bits_nonzero(a: &[Word], n: u64) -> bool {
    let word_shift = (n / u64::from(BITS)) as usize;
    let bit_shift = (n % u64::from(BITS)) as u32;
    let len = a.len();
    for i in 0..word_shift.min(len) {
        if a[len - 1 - i] != 0 {
            return true;
        }
    }
    if bit_shift != 0 && word_shift < len {
        let mask = ((1 as Word) << bit_shift) - 1;
        if a[len - 1 - word_shift] & mask != 0 {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mag(words: &[Word]) -> Vec<Word> {
        words.to_vec()
    }

    #[test]
    fn test_add_carry_chain() {
        // 0xFFFFFFFF_FFFFFFFF + 1 = 0x1_00000000_00000000
        let a = mag(&[u32::MAX, u32::MAX]);
        let b = mag(&[1]);
        assert_eq!(add_mag(&a, &b), mag(&[1, 0, 0]));
    }

    #[test]
    fn test_sub_borrow_chain() {
        let a = mag(&[1, 0, 0]);
        let b = mag(&[1]);
        assert_eq!(sub_mag(&a, &b), mag(&[u32::MAX, u32::MAX]));
        assert_eq!(sub_mag(&a, &a), mag(&[]));
    }

    #[test]
    fn test_mul_simple() {
        // (2^32 + 1) * (2^32 + 1) = 2^64 + 2^33 + 1
        let a = mag(&[1, 1]);
        assert_eq!(mul_mag(&a, &a), mag(&[1, 2, 1]));
        assert_eq!(mul_mag(&a, &[]), mag(&[]));
    }

    #[test]
    fn test_mul_add_div_word_roundtrip() {
        let mut v = mag(&[0xdead_beef, 0x1234_5678]);
        let orig = v.clone();
        mul_add_word(&mut v, 1_000_000_000, 987_654_321);
        let r = div_rem_word(&mut v, 1_000_000_000);
        assert_eq!(r, 987_654_321);
        assert_eq!(v, orig);
    }

    #[test]
    fn test_shl_shr_roundtrip() {
        let a = mag(&[0x8000_0001, 0xffff_0000]);
        for n in [0u64, 1, 31, 32, 33, 64, 95] {
            assert_eq!(shr_mag(&shl_mag(&a, n), n), a);
        }
    }

    #[test]
    fn test_rem_mag_u64() {
        // 2^64 + 5 mod 2^32 = 5
        let a = mag(&[1, 0, 5]);
        assert_eq!(rem_mag_u64(&a, 1 << 32), 5);
        assert_eq!(rem_mag_u64(&a, 3), (5 + 1) % 3);
    }

    #[test]
    fn test_low_bits_nonzero() {
        let a = mag(&[1, 0, 0]); // 2^64
        assert!(!low_bits_nonzero(&a, 64));
        assert!(low_bits_nonzero(&a, 65));
    }
}
