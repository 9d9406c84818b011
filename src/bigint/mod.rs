//! Arbitrary-precision signed integers.
//!
//! A [`BigInt`] is a sign and a big-endian `u32` magnitude with exactly one
//! representation per value: zero is `NoSign` with an empty magnitude, and a
//! nonzero magnitude never has a leading zero word. Values are immutable;
//! expensive multi-step algorithms (division, GCD, modular inverse) run on
//! the internal scratch representation in [`crate::scratch`] and convert
//! back to canonical form.

pub(crate) mod arith;
pub(crate) mod bits;
mod strings;

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::{Product, Sum};
use core::ops::{Add, Div, Mul, Neg, Rem, Sub};
use core::str::FromStr;
use std::sync::OnceLock;

use num_traits::{FromPrimitive, Num, One, Signed, ToPrimitive, Zero};

use crate::digit::{join, Word, BITS};
use crate::error::{ArithmeticError, Result};
use crate::{monty, prime, scratch};

use self::arith::{add_mag, cmp_mag, mul_mag, strip_leading_zeros, sub_mag};

/// The sign of a [`BigInt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
    Minus,
    NoSign,
    Plus,
}

use Sign::{Minus, NoSign, Plus};

impl Sign {
    #[inline]
    pub(crate) fn negate(self) -> Sign {
        match self {
            Minus => Plus,
            NoSign => NoSign,
            Plus => Minus,
        }
    }

    #[inline]
    fn mul(self, other: Sign) -> Sign {
        match (self, other) {
            (NoSign, _) | (_, NoSign) => NoSign,
            (Plus, Plus) | (Minus, Minus) => Plus,
            _ => Minus,
        }
    }
}

/// An immutable arbitrary-precision signed integer.
pub struct BigInt {
    sign: Sign,
    /// Big-endian magnitude, no leading zero word, empty for zero.
    mag: Vec<Word>,
    /// Minimal two's-complement bit length, computed once on first use.
    bit_len: OnceLock<u64>,
    /// Count of bits differing from the sign bit, computed once on first use.
    bit_cnt: OnceLock<u64>,
}

impl BigInt {
    /// Builds a canonical value from a sign and magnitude, normalizing
    /// leading zeros and a zero magnitude.
    pub fn from_magnitude(sign: Sign, mut mag: Vec<u32>) -> BigInt {
        strip_leading_zeros(&mut mag);
        let sign = if mag.is_empty() { NoSign } else { sign };
        debug_assert!(sign != NoSign || mag.is_empty());
        BigInt {
            sign,
            mag,
            bit_len: OnceLock::new(),
            bit_cnt: OnceLock::new(),
        }
    }

    /// Builds a value from a least-significant-first word vector.
    pub(crate) fn from_words_le(sign: Sign, mut words: Vec<Word>) -> BigInt {
        words.reverse();
        BigInt::from_magnitude(sign, words)
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// The big-endian magnitude words.
    #[inline]
    pub fn magnitude(&self) -> &[u32] {
        &self.mag
    }

    #[inline]
    pub fn signum(&self) -> i32 {
        match self.sign {
            Minus => -1,
            NoSign => 0,
            Plus => 1,
        }
    }

    #[inline]
    pub fn is_even(&self) -> bool {
        self.mag.last().is_none_or(|w| w & 1 == 0)
    }

    #[inline]
    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    pub fn abs(&self) -> BigInt {
        match self.sign {
            Minus => BigInt::from_magnitude(Plus, self.mag.clone()),
            _ => self.clone(),
        }
    }

    pub fn min(self, other: BigInt) -> BigInt {
        if self <= other {
            self
        } else {
            other
        }
    }

    pub fn max(self, other: BigInt) -> BigInt {
        if self >= other {
            self
        } else {
            other
        }
    }

    /// Parses text in the given radix; radixes outside `2..=36` are treated
    /// as 10.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<BigInt> {
        strings::parse_radix(s, radix)
    }

    /// Formats in the given radix (lowercase digits); radixes outside
    /// `2..=36` are treated as 10.
    pub fn to_str_radix(&self, radix: u32) -> String {
        strings::to_str_radix(self, radix)
    }

    // -- arithmetic --------------------------------------------------------

    fn add_ref(&self, other: &BigInt) -> BigInt {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        if self.sign == other.sign {
            return BigInt::from_magnitude(self.sign, add_mag(&self.mag, &other.mag));
        }
        match cmp_mag(&self.mag, &other.mag) {
            Ordering::Equal => BigInt::zero(),
            Ordering::Greater => BigInt::from_magnitude(self.sign, sub_mag(&self.mag, &other.mag)),
            Ordering::Less => BigInt::from_magnitude(other.sign, sub_mag(&other.mag, &self.mag)),
        }
    }

    fn sub_ref(&self, other: &BigInt) -> BigInt {
        if other.is_zero() {
            return self.clone();
        }
        if self.is_zero() {
            return -other.clone();
        }
        if self.sign != other.sign {
            return BigInt::from_magnitude(self.sign, add_mag(&self.mag, &other.mag));
        }
        match cmp_mag(&self.mag, &other.mag) {
            Ordering::Equal => BigInt::zero(),
            Ordering::Greater => BigInt::from_magnitude(self.sign, sub_mag(&self.mag, &other.mag)),
            Ordering::Less => {
                BigInt::from_magnitude(self.sign.negate(), sub_mag(&other.mag, &self.mag))
            }
        }
    }

    fn mul_ref(&self, other: &BigInt) -> BigInt {
        BigInt::from_magnitude(self.sign.mul(other.sign), mul_mag(&self.mag, &other.mag))
    }

    pub fn square(&self) -> BigInt {
        BigInt::from_magnitude(
            if self.is_zero() { NoSign } else { Plus },
            mul_mag(&self.mag, &self.mag),
        )
    }

    /// Quotient and remainder in one division; the quotient is truncated
    /// toward zero and the remainder keeps the dividend's sign.
    pub fn div_rem(&self, divisor: &BigInt) -> Result<(BigInt, BigInt)> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok((BigInt::zero(), BigInt::zero()));
        }
        if cmp_mag(&self.mag, &divisor.mag) == Ordering::Less {
            return Ok((BigInt::zero(), self.clone()));
        }
        let (q_mag, r_mag) = scratch::div_rem_mag(&self.mag, &divisor.mag);
        Ok((
            BigInt::from_magnitude(self.sign.mul(divisor.sign), q_mag),
            BigInt::from_magnitude(self.sign, r_mag),
        ))
    }

    pub fn checked_div(&self, divisor: &BigInt) -> Result<BigInt> {
        Ok(self.div_rem(divisor)?.0)
    }

    pub fn checked_rem(&self, divisor: &BigInt) -> Result<BigInt> {
        Ok(self.div_rem(divisor)?.1)
    }

    /// Euclidean residue: the unique value in `[0, m)` congruent to `self`.
    /// Fails with `NonPositiveModulus` unless `m > 0`.
    pub fn modulo(&self, m: &BigInt) -> Result<BigInt> {
        if m.sign != Plus {
            return Err(ArithmeticError::NonPositiveModulus);
        }
        let r = self.checked_rem(m)?;
        Ok(if r.sign == Minus { r + m } else { r })
    }

    /// Greatest common divisor; `gcd(0, 0) == 0` and the result is never
    /// negative.
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        if self.is_zero() {
            return other.abs();
        }
        if other.is_zero() {
            return self.abs();
        }
        BigInt::from_magnitude(Plus, scratch::gcd_mag(&self.mag, &other.mag))
    }

    /// `self^exp` by repeated squaring; fails with `NegativeExponent` for
    /// `exp < 0`.
    pub fn pow(&self, exp: i32) -> Result<BigInt> {
        if exp < 0 {
            return Err(ArithmeticError::NegativeExponent);
        }
        let sign = if self.sign == Minus && exp & 1 == 1 {
            Minus
        } else if self.is_zero() && exp != 0 {
            NoSign
        } else {
            Plus
        };
        let mag = upow_mag(&self.mag, exp as u64);
        Ok(BigInt::from_magnitude(sign, mag))
    }

    /// `self^exp mod m`. The modulus must be positive; a negative exponent
    /// requires `self` to be invertible mod `m`.
    pub fn mod_pow(&self, exp: &BigInt, m: &BigInt) -> Result<BigInt> {
        monty::mod_pow(self, exp, m)
    }

    /// Multiplicative inverse of `self` modulo `m`; fails with
    /// `NonInvertible` when `gcd(self, m) != 1`.
    pub fn mod_inverse(&self, m: &BigInt) -> Result<BigInt> {
        if m.sign != Plus {
            return Err(ArithmeticError::NonPositiveModulus);
        }
        if m.is_one() {
            return Ok(BigInt::zero());
        }
        let a = self.modulo(m)?;
        if a.is_zero() {
            return Err(ArithmeticError::NonInvertible);
        }
        scratch::mod_inverse(&a, m)
    }

    // -- primality ---------------------------------------------------------

    /// True when this value is probably prime to within `2^-certainty`;
    /// always true for `certainty == 0`, always false for values below 2.
    /// Randomness for Miller-Rabin bases comes from the caller's `rng`.
    pub fn is_probable_prime<R: rand::Rng + ?Sized>(&self, certainty: u32, rng: &mut R) -> bool {
        prime::is_probable_prime(self, certainty, rng)
    }

    /// The first integer greater than `self` that is probably prime.
    /// Values below 2 yield 2.
    pub fn next_probable_prime<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> BigInt {
        prime::next_probable_prime(self, rng)
    }

    // -- conversions -------------------------------------------------------

    /// Low 32 bits of the two's-complement form; high-order bits are
    /// silently discarded.
    pub fn to_i32_truncated(&self) -> i32 {
        self.twos_word(0) as i32
    }

    /// Low 64 bits of the two's-complement form; high-order bits are
    /// silently discarded.
    pub fn to_i64_truncated(&self) -> i64 {
        join(self.twos_word(1), self.twos_word(0)) as i64
    }

    pub fn to_i32_exact(&self) -> Result<i32> {
        if self.bit_length() <= 31 {
            Ok(self.to_i32_truncated())
        } else {
            Err(ArithmeticError::Overflow)
        }
    }

    pub fn to_i64_exact(&self) -> Result<i64> {
        if self.bit_length() <= 63 {
            Ok(self.to_i64_truncated())
        } else {
            Err(ArithmeticError::Overflow)
        }
    }

    fn magnitude_f64(&self) -> f64 {
        let bl = self.bit_length_mag();
        if bl <= 64 {
            let len = self.mag.len();
            let lo = *self.mag.last().unwrap_or(&0);
            let hi = if len >= 2 { self.mag[len - 2] } else { 0 };
            join(hi, lo) as f64
        } else {
            // Top 64 bits carry all the precision an f64 can hold; f64
            // conversion of the u64 rounds half-even.
            let shift = bl - 64;
            let top = arith::shr_mag(&self.mag, shift);
            let hi = top[top.len() - 2];
            let lo = top[top.len() - 1];
            (join(hi, lo) as f64) * 2f64.powi(shift as i32)
        }
    }

    /// Minimal-length big-endian two's-complement bytes, including at least
    /// one sign bit. Round-trips exactly through [`BigInt::from_bytes_be`].
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let byte_len = (self.bit_length() / 8 + 1) as usize;
        let mut bytes = vec![0u8; byte_len];
        let mut next_word: Word = 0;
        let mut bytes_copied = 4;
        let mut word_index = 0;
        for i in (0..byte_len).rev() {
            if bytes_copied == 4 {
                next_word = self.twos_word(word_index);
                word_index += 1;
                bytes_copied = 1;
            } else {
                next_word >>= 8;
                bytes_copied += 1;
            }
            bytes[i] = next_word as u8;
        }
        bytes
    }

    /// Parses big-endian two's-complement bytes; fails with
    /// `MalformedNumber` for empty input.
    pub fn from_bytes_be(bytes: &[u8]) -> Result<BigInt> {
        if bytes.is_empty() {
            return Err(ArithmeticError::MalformedNumber);
        }
        if bytes[0] & 0x80 != 0 {
            // Negative: magnitude is the two's-complement negation.
            let mut buf = bytes.iter().map(|&b| !b).collect::<Vec<u8>>();
            for i in (0..buf.len()).rev() {
                let (b, overflow) = buf[i].overflowing_add(1);
                buf[i] = b;
                if !overflow {
                    break;
                }
            }
            Ok(BigInt::from_magnitude(Minus, pack_bytes(&buf)))
        } else {
            Ok(BigInt::from_magnitude(Plus, pack_bytes(bytes)))
        }
    }

    /// `10^n`, used by decimal scaling.
    pub(crate) fn ten_pow(n: u64) -> BigInt {
        BigInt::from_magnitude(Plus, upow_mag(&[10], n))
    }

    /// Number of digits in the decimal expansion of the magnitude (1 for
    /// zero).
    pub(crate) fn decimal_digits(&self) -> u64 {
        if self.is_zero() {
            return 1;
        }
        // floor(log10(2) * (bitLength - 1)) underestimates by at most one.
        let mut digits = ((self.bit_length_mag() - 1) as f64 * core::f64::consts::LOG10_2) as u64 + 1;
        while cmp_mag(&self.mag, &BigInt::ten_pow(digits).mag) != Ordering::Less {
            digits += 1;
        }
        digits
    }
}

/// Packs big-endian bytes into big-endian words.
pub(crate) fn pack_bytes(bytes: &[u8]) -> Vec<Word> {
    let word_len = bytes.len().div_ceil(4);
    let mut mag = vec![0 as Word; word_len];
    let mut word = word_len;
    let mut acc: Word = 0;
    let mut shift = 0;
    for (count, &b) in bytes.iter().rev().enumerate() {
        acc |= Word::from(b) << shift;
        shift += 8;
        if shift == 32 || count == bytes.len() - 1 {
            word -= 1;
            mag[word] = acc;
            acc = 0;
            shift = 0;
        }
    }
    mag
}

/// Magnitude exponentiation by repeated squaring.
fn upow_mag(base: &[Word], mut exp: u64) -> Vec<Word> {
    let mut result = vec![1 as Word];
    if base.is_empty() {
        return if exp == 0 { result } else { Vec::new() };
    }
    let mut acc = base.to_vec();
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mag(&result, &acc);
        }
        exp >>= 1;
        if exp > 0 {
            acc = mul_mag(&acc, &acc);
        }
    }
    result
}

// -- std trait impls -------------------------------------------------------

impl Clone for BigInt {
    fn clone(&self) -> BigInt {
        BigInt {
            sign: self.sign,
            mag: self.mag.clone(),
            bit_len: self.bit_len.clone(),
            bit_cnt: self.bit_cnt.clone(),
        }
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &BigInt) -> bool {
        self.sign == other.sign && self.mag == other.mag
    }
}

impl Eq for BigInt {}

impl Hash for BigInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signum().hash(state);
        self.mag.hash(state);
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &BigInt) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &BigInt) -> Ordering {
        match self.signum().cmp(&other.signum()) {
            Ordering::Equal => match self.sign {
                Minus => cmp_mag(&other.mag, &self.mag),
                NoSign => Ordering::Equal,
                Plus => cmp_mag(&self.mag, &other.mag),
            },
            ord => ord,
        }
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(self.sign != Minus, "", &self.abs().to_str_radix(10))
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for BigInt {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<BigInt> {
        strings::parse_radix(s, 10)
    }
}

impl Default for BigInt {
    fn default() -> BigInt {
        BigInt::zero()
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInt {
            fn from(n: $t) -> BigInt {
                let sign = match n.signum() {
                    0 => NoSign,
                    s if s > 0 => Plus,
                    _ => Minus,
                };
                let mut mag = Vec::new();
                let mut u = n.unsigned_abs() as u128;
                while u != 0 {
                    mag.push(u as Word);
                    u >>= BITS;
                }
                BigInt::from_words_le(sign, mag)
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInt {
            fn from(n: $t) -> BigInt {
                let mut mag = Vec::new();
                let mut u = n as u128;
                while u != 0 {
                    mag.push(u as Word);
                    u >>= BITS;
                }
                BigInt::from_words_le(Plus, mag)
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64, i128, isize);
impl_from_unsigned!(u8, u16, u32, u64, u128, usize);

// -- operators -------------------------------------------------------------

impl Add for &BigInt {
    type Output = BigInt;
    fn add(self, other: &BigInt) -> BigInt {
        self.add_ref(other)
    }
}

impl Sub for &BigInt {
    type Output = BigInt;
    fn sub(self, other: &BigInt) -> BigInt {
        self.sub_ref(other)
    }
}

impl Mul for &BigInt {
    type Output = BigInt;
    fn mul(self, other: &BigInt) -> BigInt {
        self.mul_ref(other)
    }
}

impl Div for &BigInt {
    type Output = BigInt;

    /// Truncating division.
    ///
    /// # Panics
    ///
    /// Panics when `other` is zero; use [`BigInt::div_rem`] to handle that
    /// case as an error.
    fn div(self, other: &BigInt) -> BigInt {
        match self.div_rem(other) {
            Ok((q, _)) => q,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Rem for &BigInt {
    type Output = BigInt;

    /// Remainder with the dividend's sign.
    ///
    /// # Panics
    ///
    /// Panics when `other` is zero; use [`BigInt::div_rem`] to handle that
    /// case as an error.
    fn rem(self, other: &BigInt) -> BigInt {
        match self.div_rem(other) {
            Ok((_, r)) => r,
            Err(e) => panic!("{e}"),
        }
    }
}

macro_rules! forward_binop {
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

forward_binop! {
    impl Add, add;
    impl Sub, sub;
    impl Mul, mul;
    impl Div, div;
    impl Rem, rem;
}

impl Neg for &BigInt {
    type Output = BigInt;
    fn neg(self) -> BigInt {
        BigInt::from_magnitude(self.sign.negate(), self.mag.clone())
    }
}

impl Neg for BigInt {
    type Output = BigInt;
    fn neg(self) -> BigInt {
        BigInt::from_magnitude(self.sign.negate(), self.mag)
    }
}

impl Sum for BigInt {
    fn sum<I: Iterator<Item = BigInt>>(iter: I) -> BigInt {
        iter.fold(BigInt::zero(), |acc, n| acc + n)
    }
}

impl Product for BigInt {
    fn product<I: Iterator<Item = BigInt>>(iter: I) -> BigInt {
        iter.fold(BigInt::one(), |acc, n| acc * n)
    }
}

// -- num-traits ------------------------------------------------------------

impl Zero for BigInt {
    fn zero() -> BigInt {
        BigInt {
            sign: NoSign,
            mag: Vec::new(),
            bit_len: OnceLock::new(),
            bit_cnt: OnceLock::new(),
        }
    }

    fn is_zero(&self) -> bool {
        self.sign == NoSign
    }
}

impl One for BigInt {
    fn one() -> BigInt {
        BigInt::from_magnitude(Plus, vec![1])
    }

    fn is_one(&self) -> bool {
        self.sign == Plus && self.mag == [1]
    }
}

impl Num for BigInt {
    type FromStrRadixErr = ArithmeticError;

    fn from_str_radix(s: &str, radix: u32) -> Result<BigInt> {
        strings::parse_radix(s, radix)
    }
}

impl Signed for BigInt {
    fn abs(&self) -> BigInt {
        BigInt::abs(self)
    }

    fn abs_sub(&self, other: &BigInt) -> BigInt {
        if self <= other {
            BigInt::zero()
        } else {
            self - other
        }
    }

    fn signum(&self) -> BigInt {
        BigInt::from(BigInt::signum(self))
    }

    fn is_positive(&self) -> bool {
        self.sign == Plus
    }

    fn is_negative(&self) -> bool {
        self.sign == Minus
    }
}

impl ToPrimitive for BigInt {
    fn to_i64(&self) -> Option<i64> {
        self.to_i64_exact().ok()
    }

    fn to_u64(&self) -> Option<u64> {
        if self.sign == Minus || self.bit_length() > 64 {
            return None;
        }
        Some(join(self.twos_word(1), self.twos_word(0)))
    }

    fn to_f64(&self) -> Option<f64> {
        let m = self.magnitude_f64();
        Some(if self.sign == Minus { -m } else { m })
    }
}

impl FromPrimitive for BigInt {
    fn from_i64(n: i64) -> Option<BigInt> {
        Some(BigInt::from(n))
    }

    fn from_u64(n: u64) -> Option<BigInt> {
        Some(BigInt::from(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i128) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_canonical_zero() {
        assert_eq!(BigInt::from_magnitude(Plus, vec![0, 0]), BigInt::zero());
        assert_eq!(big(0).sign(), NoSign);
        assert!(big(0).magnitude().is_empty());
    }

    #[test]
    fn test_add_sub_signs() {
        assert_eq!(big(7) + big(-10), big(-3));
        assert_eq!(big(-7) + big(10), big(3));
        assert_eq!(big(-7) - big(-10), big(3));
        assert_eq!(big(7) - big(7), big(0));
        assert_eq!(big(i128::from(i64::MAX)) + big(1), big(1i128 << 63));
    }

    #[test]
    fn test_mul_large() {
        let a: BigInt = "12345678901234567890".parse().unwrap();
        let b: BigInt = "98765432109876543210".parse().unwrap();
        assert_eq!(
            (&a * &b).to_string(),
            "1219326311370217952237463801111263526900"
        );
        assert_eq!(&a * BigInt::zero(), BigInt::zero());
        assert_eq!((-&a) * &b, -(&a * &b));
    }

    #[test]
    fn test_div_rem_signs() {
        for (a, b) in [(7i128, 3i128), (-7, 3), (7, -3), (-7, -3)] {
            let (q, r) = big(a).div_rem(&big(b)).unwrap();
            assert_eq!(q, big(a / b));
            assert_eq!(r, big(a % b));
        }
        assert_eq!(
            big(1).div_rem(&big(0)),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn test_division_identity_large() {
        let a: BigInt = "123456789012345678901234567890123456789".parse().unwrap();
        let b: BigInt = "98765432109876543210".parse().unwrap();
        let (q, r) = a.div_rem(&b).unwrap();
        assert_eq!(&q * &b + &r, a);
        assert!(r.abs() < b.abs());
    }

    #[test]
    fn test_modulo_range() {
        assert_eq!(big(-7).modulo(&big(3)).unwrap(), big(2));
        assert_eq!(big(7).modulo(&big(3)).unwrap(), big(1));
        assert_eq!(
            big(7).modulo(&big(0)),
            Err(ArithmeticError::NonPositiveModulus)
        );
        assert_eq!(
            big(7).modulo(&big(-3)),
            Err(ArithmeticError::NonPositiveModulus)
        );
    }

    #[test]
    fn test_gcd() {
        assert_eq!(big(0).gcd(&big(0)), big(0));
        assert_eq!(big(0).gcd(&big(-6)), big(6));
        assert_eq!(big(12).gcd(&big(18)), big(6));
        assert_eq!(big(-12).gcd(&big(18)), big(6));
        let a: BigInt = "123456789012345678901234567890".parse().unwrap();
        let b: BigInt = "987654321098765432109876543210".parse().unwrap();
        assert_eq!(a.gcd(&b).to_string(), "9000000000900000000090");
    }

    #[test]
    fn test_pow() {
        assert_eq!(big(3).pow(4).unwrap(), big(81));
        assert_eq!(big(-3).pow(3).unwrap(), big(-27));
        assert_eq!(big(-3).pow(0).unwrap(), big(1));
        assert_eq!(big(0).pow(0).unwrap(), big(1));
        assert_eq!(big(0).pow(5).unwrap(), big(0));
        assert_eq!(big(2).pow(-1), Err(ArithmeticError::NegativeExponent));
        assert_eq!(big(2).pow(100).unwrap().to_string(), (1u128 << 100).to_string());
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(big(3).mod_inverse(&big(7)).unwrap(), big(5));
        assert_eq!(big(-3).mod_inverse(&big(7)).unwrap(), big(2));
        assert_eq!(
            big(100).mod_inverse(&big(10)),
            Err(ArithmeticError::NonInvertible)
        );
        assert_eq!(
            big(3).mod_inverse(&big(-7)),
            Err(ArithmeticError::NonPositiveModulus)
        );
    }

    #[test]
    fn test_ordering() {
        assert!(big(-10) < big(-9));
        assert!(big(-9) < big(0));
        assert!(big(0) < big(9));
        assert!(big(1i128 << 64) > big(u64::MAX as i128));
    }

    #[test]
    fn test_byte_roundtrip() {
        for n in [0i128, 1, -1, 127, 128, -128, -129, 255, 256, i64::MAX as i128, i64::MIN as i128] {
            let v = big(n);
            assert_eq!(BigInt::from_bytes_be(&v.to_bytes_be()).unwrap(), v, "{n}");
        }
        assert_eq!(big(0).to_bytes_be(), vec![0u8]);
        assert_eq!(big(-1).to_bytes_be(), vec![0xffu8]);
        assert_eq!(big(255).to_bytes_be(), vec![0x00u8, 0xff]);
        assert_eq!(
            BigInt::from_bytes_be(&[]),
            Err(ArithmeticError::MalformedNumber)
        );
    }

    #[test]
    fn test_narrowing() {
        let big64 = big(1i128 << 64) + big(5);
        assert_eq!(big64.to_i64_truncated(), 5);
        assert_eq!(big64.to_i64_exact(), Err(ArithmeticError::Overflow));
        assert_eq!(big(i64::MIN as i128).to_i64_exact().unwrap(), i64::MIN);
        assert_eq!(big(i64::MAX as i128).to_i64_exact().unwrap(), i64::MAX);
        assert_eq!(big(-1).to_i32_truncated(), -1);
        assert_eq!(big(1i128 << 40).to_f64().unwrap(), (1u64 << 40) as f64);
        assert_eq!(big(-3).to_f64().unwrap(), -3.0);
    }

    #[test]
    fn test_decimal_digits() {
        assert_eq!(big(0).decimal_digits(), 1);
        assert_eq!(big(9).decimal_digits(), 1);
        assert_eq!(big(10).decimal_digits(), 2);
        assert_eq!(big(999_999_999_999_999_999).decimal_digits(), 18);
        assert_eq!(BigInt::ten_pow(50).decimal_digits(), 51);
    }
}
