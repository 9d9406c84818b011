//! Bit-level views of a [`BigInt`].
//!
//! Bitwise operations act on the conceptually infinite two's-complement
//! expansion of the value: negative numbers are sign-extended with one
//! bits, non-negative numbers with zero bits. The word accessor
//! [`BigInt::twos_word`] realizes that expansion one word at a time; every
//! operation here is built from it.

use core::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

use num_traits::Zero;

use super::arith::{add_mag, low_bits_nonzero, shl_mag, shr_mag, strip_leading_zeros};
use super::{BigInt, Sign};
use crate::digit::{Word, BITS};
use crate::error::{ArithmeticError, Result};

impl BigInt {
    /// The `n`-th 32-bit word (counted from the least significant end) of
    /// the infinite two's-complement expansion.
    pub(crate) fn twos_word(&self, n: usize) -> Word {
        if n >= self.mag.len() {
            return if self.sign == Sign::Minus { Word::MAX } else { 0 };
        }
        let mag_word = self.mag[self.mag.len() - 1 - n];
        if self.sign != Sign::Minus {
            mag_word
        } else if n <= self.first_nonzero_word() {
            mag_word.wrapping_neg()
        } else {
            !mag_word
        }
    }

    /// Index (from the least significant end) of the lowest nonzero
    /// magnitude word. Only meaningful for nonzero values.
    fn first_nonzero_word(&self) -> usize {
        let len = self.mag.len();
        (0..len)
            .find(|&i| self.mag[len - 1 - i] != 0)
            .unwrap_or(0)
    }

    /// Number of words in the minimal two's-complement form plus the sign
    /// word.
    fn words_len(&self) -> usize {
        (self.bit_length() / u64::from(BITS) + 1) as usize
    }

    /// Bit length of the magnitude alone (0 for zero).
    pub(crate) fn bit_length_mag(&self) -> u64 {
        match self.mag.first() {
            None => 0,
            Some(&top) => {
                u64::from(BITS) * (self.mag.len() as u64 - 1)
                    + u64::from(BITS - top.leading_zeros())
            }
        }
    }

    /// Bits in the minimal two's-complement representation, excluding the
    /// sign bit.
    pub fn bit_length(&self) -> u64 {
        *self.bit_len.get_or_init(|| {
            let n = self.bit_length_mag();
            if self.sign == Sign::Minus && self.mag_is_power_of_two() {
                n - 1
            } else {
                n
            }
        })
    }

    fn mag_is_power_of_two(&self) -> bool {
        match self.mag.first() {
            None => false,
            Some(&top) => top.is_power_of_two() && self.mag[1..].iter().all(|&w| w == 0),
        }
    }

    /// Number of bits differing from the sign bit in the two's-complement
    /// form.
    pub fn bit_count(&self) -> u64 {
        *self.bit_cnt.get_or_init(|| {
            let mut count: u64 = self.mag.iter().map(|w| u64::from(w.count_ones())).sum();
            if self.sign == Sign::Minus {
                let fnz = self.first_nonzero_word() as u64;
                let low = self.mag[self.mag.len() - 1 - fnz as usize];
                count = count + fnz * u64::from(BITS) + u64::from(low.trailing_zeros()) - 1;
            }
            count
        })
    }

    /// Index of the lowest set bit, `None` for zero.
    pub fn lowest_set_bit(&self) -> Option<u64> {
        if self.is_zero() {
            return None;
        }
        let fnz = self.first_nonzero_word();
        let low = self.mag[self.mag.len() - 1 - fnz];
        Some(fnz as u64 * u64::from(BITS) + u64::from(low.trailing_zeros()))
    }

    /// True when bit `n` of the two's-complement form is set; fails with
    /// `NegativeBitIndex` for `n < 0`.
    pub fn test_bit(&self, n: i64) -> Result<bool> {
        if n < 0 {
            return Err(ArithmeticError::NegativeBitIndex);
        }
        let word = self.twos_word((n as u64 / u64::from(BITS)) as usize);
        Ok(word & (1 << (n as u64 % u64::from(BITS))) != 0)
    }

    pub fn set_bit(&self, n: i64) -> Result<BigInt> {
        self.with_bit(n, |w, mask| w | mask)
    }

    pub fn clear_bit(&self, n: i64) -> Result<BigInt> {
        self.with_bit(n, |w, mask| w & !mask)
    }

    pub fn flip_bit(&self, n: i64) -> Result<BigInt> {
        self.with_bit(n, |w, mask| w ^ mask)
    }

    fn with_bit(&self, n: i64, apply: impl Fn(Word, Word) -> Word) -> Result<BigInt> {
        if n < 0 {
            return Err(ArithmeticError::NegativeBitIndex);
        }
        let n = n as u64;
        let word_index = (n / u64::from(BITS)) as usize;
        let len = self.words_len().max(word_index + 2);
        let mut words: Vec<Word> = (0..len).map(|i| self.twos_word(len - 1 - i)).collect();
        let slot = len - 1 - word_index;
        words[slot] = apply(words[slot], 1 << (n % u64::from(BITS)));
        Ok(BigInt::from_twos_complement(words))
    }

    /// Interprets big-endian two's-complement words as a value.
    fn from_twos_complement(mut words: Vec<Word>) -> BigInt {
        if words.is_empty() {
            return BigInt::zero();
        }
        if words[0] & (1 << (BITS - 1)) == 0 {
            return BigInt::from_magnitude(Sign::Plus, words);
        }
        // Negative: the magnitude is the two's-complement negation.
        for w in words.iter_mut() {
            *w = !*w;
        }
        for i in (0..words.len()).rev() {
            let (w, overflow) = words[i].overflowing_add(1);
            words[i] = w;
            if !overflow {
                break;
            }
        }
        BigInt::from_magnitude(Sign::Minus, words)
    }

    fn bitwise(&self, other: &BigInt, apply: impl Fn(Word, Word) -> Word) -> BigInt {
        let len = self.words_len().max(other.words_len());
        let words = (0..len)
            .map(|i| apply(self.twos_word(len - 1 - i), other.twos_word(len - 1 - i)))
            .collect();
        BigInt::from_twos_complement(words)
    }

    /// `self & !other`, in one pass.
    pub fn and_not(&self, other: &BigInt) -> BigInt {
        self.bitwise(other, |a, b| a & !b)
    }

    // -- shifts ------------------------------------------------------------

    /// Left shift; a negative distance shifts right instead. Fails with
    /// `UnsupportedShift` only for the one distance whose negation is not
    /// representable.
    pub fn shift_left(&self, n: i64) -> Result<BigInt> {
        if n >= 0 {
            Ok(self.shl_unsigned(n as u64))
        } else if n == i64::MIN {
            Err(ArithmeticError::UnsupportedShift)
        } else {
            Ok(self.shr_unsigned((-n) as u64))
        }
    }

    /// Arithmetic right shift (rounding toward negative infinity); a
    /// negative distance shifts left instead.
    pub fn shift_right(&self, n: i64) -> Result<BigInt> {
        if n >= 0 {
            Ok(self.shr_unsigned(n as u64))
        } else if n == i64::MIN {
            Err(ArithmeticError::UnsupportedShift)
        } else {
            Ok(self.shl_unsigned((-n) as u64))
        }
    }

    pub(crate) fn shl_unsigned(&self, n: u64) -> BigInt {
        if self.is_zero() || n == 0 {
            return self.clone();
        }
        BigInt::from_magnitude(self.sign, shl_mag(&self.mag, n))
    }

    pub(crate) fn shr_unsigned(&self, n: u64) -> BigInt {
        if self.is_zero() || n == 0 {
            return self.clone();
        }
        let shifted = shr_mag(&self.mag, n);
        if self.sign != Sign::Minus {
            return BigInt::from_magnitude(self.sign, shifted);
        }
        // Negative values round toward negative infinity: if any one bit
        // was shifted out, the truncated quotient is one too high in
        // magnitude terms.
        let mag = if low_bits_nonzero(&self.mag, n) {
            add_mag(&shifted, &[1])
        } else {
            shifted
        };
        BigInt::from_magnitude(Sign::Minus, mag)
    }
}

impl BitAnd for &BigInt {
    type Output = BigInt;
    fn bitand(self, other: &BigInt) -> BigInt {
        self.bitwise(other, |a, b| a & b)
    }
}

impl BitOr for &BigInt {
    type Output = BigInt;
    fn bitor(self, other: &BigInt) -> BigInt {
        self.bitwise(other, |a, b| a | b)
    }
}

impl BitXor for &BigInt {
    type Output = BigInt;
    fn bitxor(self, other: &BigInt) -> BigInt {
        self.bitwise(other, |a, b| a ^ b)
    }
}

macro_rules! forward_bitop {
    ($(impl $imp:ident, $method:ident;)*) => {$(
        impl $imp<BigInt> for BigInt {
            type Output = BigInt;
            fn $method(self, other: BigInt) -> BigInt {
                $imp::$method(&self, &other)
            }
        }
        impl $imp<&BigInt> for BigInt {
            type Output = BigInt;
            fn $method(self, other: &BigInt) -> BigInt {
                $imp::$method(&self, other)
            }
        }
        impl $imp<BigInt> for &BigInt {
            type Output = BigInt;
            fn $method(self, other: BigInt) -> BigInt {
                $imp::$method(self, &other)
            }
        }
    )*};
}

forward_bitop! {
    impl BitAnd, bitand;
    impl BitOr, bitor;
    impl BitXor, bitxor;
}

impl Not for &BigInt {
    type Output = BigInt;
    fn not(self) -> BigInt {
        let len = self.words_len();
        let words = (0..len).map(|i| !self.twos_word(len - 1 - i)).collect();
        BigInt::from_twos_complement(words)
    }
}

impl Not for BigInt {
    type Output = BigInt;
    fn not(self) -> BigInt {
        !&self
    }
}

impl Shl<u32> for &BigInt {
    type Output = BigInt;
    fn shl(self, n: u32) -> BigInt {
        self.shl_unsigned(u64::from(n))
    }
}

impl Shl<u32> for BigInt {
    type Output = BigInt;
    fn shl(self, n: u32) -> BigInt {
        (&self).shl_unsigned(u64::from(n))
    }
}

impl Shr<u32> for &BigInt {
    type Output = BigInt;
    fn shr(self, n: u32) -> BigInt {
        self.shr_unsigned(u64::from(n))
    }
}

impl Shr<u32> for BigInt {
    type Output = BigInt;
    fn shr(self, n: u32) -> BigInt {
        (&self).shr_unsigned(u64::from(n))
    }
}

/// Keeps only the low `n` bits of the two's-complement form, as a
/// non-negative value. Used by the power-of-two modular paths.
pub(crate) fn mask_low_bits(value: &BigInt, n: u64) -> BigInt {
    let len = (n / u64::from(BITS) + 1) as usize;
    let mut words: Vec<Word> = (0..len).map(|i| value.twos_word(len - 1 - i)).collect();
    let top_bits = (n % u64::from(BITS)) as u32;
    words[0] &= if top_bits == 0 { 0 } else { Word::MAX >> (BITS - top_bits) };
    strip_leading_zeros(&mut words);
    BigInt::from_magnitude(Sign::Plus, words)
}
