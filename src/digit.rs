//! The machine word underlying magnitudes.
//!
//! Magnitudes are stored as `Word` (`u32`) sequences, most significant word
//! first, with `DoubleWord` (`u64`) used for carry and borrow propagation.

pub(crate) type Word = u32;
pub(crate) type DoubleWord = u64;

/// Bits per magnitude word.
pub(crate) const BITS: u32 = 32;

/// Mask selecting the low word of a `DoubleWord`.
pub(crate) const WORD_MASK: DoubleWord = Word::MAX as DoubleWord;

#[inline]
pub(crate) fn lo(n: DoubleWord) -> Word {
    (n & WORD_MASK) as Word
}

#[inline]
pub(crate) fn hi(n: DoubleWord) -> Word {
    (n >> BITS) as Word
}

#[inline]
pub(crate) fn join(hi: Word, lo: Word) -> DoubleWord {
    (DoubleWord::from(hi) << BITS) | DoubleWord::from(lo)
}

/// Multiplicative inverse of an odd word modulo 2^32, by Newton iteration.
///
/// Each step doubles the number of correct low-order bits; four steps from
/// the seed (correct mod 2^3 for odd input) cover all 32 bits.
pub(crate) fn inverse_mod_word(val: Word) -> Word {
    debug_assert!(val & 1 == 1);
    let mut t = val;
    t = t.wrapping_mul(2u32.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u32.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u32.wrapping_sub(val.wrapping_mul(t)));
    t = t.wrapping_mul(2u32.wrapping_sub(val.wrapping_mul(t)));
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_mod_word() {
        for &v in &[1u32, 3, 5, 17, 0x1234_5677, u32::MAX] {
            assert_eq!(v.wrapping_mul(inverse_mod_word(v)), 1);
        }
    }

    #[test]
    fn test_join_split() {
        let n = 0x0123_4567_89ab_cdefu64;
        assert_eq!(join(hi(n), lo(n)), n);
    }
}
