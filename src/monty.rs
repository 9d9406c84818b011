//! Modular exponentiation.
//!
//! Odd moduli use Montgomery multiplication (CIOS, word-by-word interleaved
//! reduction) under a left-to-right sliding window whose width grows with
//! the exponent size. Power-of-two moduli reduce by masking. An even
//! modulus is split into its odd part and its power-of-two part, each
//! exponentiated separately and recombined with the Chinese Remainder
//! Theorem.
//!
//! The Montgomery kernel works on fixed-width little-endian word vectors,
//! least significant word first, padded to the modulus length; conversion
//! to and from the big-endian [`BigInt`] magnitude happens only at the
//! boundary.

use crate::bigint::bits::mask_low_bits;
use crate::bigint::{BigInt, Sign};
use crate::digit::{inverse_mod_word, Word, BITS};
use crate::error::{ArithmeticError, Result};
use crate::scratch;
use num_traits::{One, Zero};

/// Exponent bit lengths above which the sliding window widens by one bit.
const WINDOW_THRESHOLDS: [u64; 6] = [7, 25, 81, 241, 673, 1793];

/// `base^exponent mod modulus` for `modulus > 0`.
///
/// A negative exponent inverts the base first and fails with
/// `NonInvertible` when no inverse exists. The result is always in
/// `[0, modulus)`.
pub(crate) fn mod_pow(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> Result<BigInt> {
    if modulus.signum() <= 0 {
        return Err(ArithmeticError::NonPositiveModulus);
    }
    if modulus.is_one() {
        return Ok(BigInt::zero());
    }
    if exponent.is_zero() {
        return Ok(BigInt::one());
    }
    let mut base = base.modulo(modulus)?;
    let exponent = if exponent.signum() < 0 {
        base = base.mod_inverse(modulus)?;
        exponent.abs()
    } else {
        exponent.clone()
    };
    if base.is_zero() {
        return Ok(BigInt::zero());
    }
    if base.is_one() {
        return Ok(BigInt::one());
    }
    if modulus.is_odd() {
        return Ok(odd_mod_pow(&base, &exponent, modulus));
    }

    // Even modulus: modulus = odd << k with k >= 1.
    let k = modulus.lowest_set_bit().unwrap_or(0);
    let odd = modulus.shift_right(k as i64)?;
    let a2 = mod_pow2(&base, &exponent, k);
    if odd.is_one() {
        return Ok(a2);
    }
    let base_odd = base.modulo(&odd)?;
    let a1 = if base_odd.is_zero() {
        BigInt::zero()
    } else {
        odd_mod_pow(&base_odd, &exponent, &odd)
    };
    // Garner recombination: x = a1 + odd * t where
    // t = (a2 - a1) / odd  (mod 2^k).
    let t = mask_low_bits(&((a2 - &a1) * inverse_mod_pow2(&odd, k)), k);
    Ok(a1 + odd * t)
}

/// Inverse of odd `a` modulo `2^k`, in `[0, 2^k)`, by doubling the number
/// of correct bits with each Newton step from a single-word seed.
pub(crate) fn inverse_mod_pow2(a: &BigInt, k: u64) -> BigInt {
    debug_assert!(a.is_odd());
    let low = a.magnitude().last().copied().unwrap_or(1);
    let mut x = BigInt::from(inverse_mod_word(low));
    let mut bits = u64::from(BITS);
    while bits < k {
        bits *= 2;
        let prod = mask_low_bits(&(a * &x), bits);
        x = mask_low_bits(&(&x * &(BigInt::from(2) - prod)), bits);
    }
    mask_low_bits(&x, k)
}

/// `base^exponent mod 2^k`: square-and-multiply with masking.
fn mod_pow2(base: &BigInt, exponent: &BigInt, k: u64) -> BigInt {
    let base = mask_low_bits(base, k);
    let mut result = BigInt::one();
    for i in (0..exponent.bit_length()).rev() {
        result = mask_low_bits(&(&result * &result), k);
        if mag_bit(exponent.magnitude(), i) {
            result = mask_low_bits(&(&result * &base), k);
        }
    }
    result
}

/// Bit `i` of a big-endian magnitude.
#[inline]
fn mag_bit(mag: &[Word], i: u64) -> bool {
    let w = (i / u64::from(BITS)) as usize;
    w < mag.len() && (mag[mag.len() - 1 - w] >> (i % u64::from(BITS))) & 1 == 1
}

/// `base^exponent mod modulus` for odd `modulus >= 3`, `base` in
/// `[1, modulus)`, `exponent >= 1`.
fn odd_mod_pow(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> BigInt {
    let m = le_padded(modulus.magnitude(), modulus.magnitude().len());
    let n = m.len();
    // -modulus^-1 mod 2^32, the per-word reduction factor
    let m_inv = inverse_mod_word(m[0]).wrapping_neg();

    let a_mont = to_mont(base, modulus, n);
    let one_mont = to_mont(&BigInt::one(), modulus, n);

    let ebits = exponent.bit_length();
    let mut wbits = 0usize;
    while wbits < WINDOW_THRESHOLDS.len() && ebits > WINDOW_THRESHOLDS[wbits] {
        wbits += 1;
    }
    let window_bits = (wbits + 1) as i64;

    // Table of odd powers base^1, base^3, ..., base^(2^(wbits+1) - 1).
    let table_len = 1usize << wbits;
    let mut table = Vec::with_capacity(table_len);
    table.push(a_mont.clone());
    if table_len > 1 {
        let b2 = mont_mul(&a_mont, &a_mont, &m, m_inv);
        for i in 1..table_len {
            let next = mont_mul(&table[i - 1], &b2, &m, m_inv);
            table.push(next);
        }
    }

    let emag = exponent.magnitude();
    let mut acc = one_mont;
    let mut i = ebits as i64 - 1;
    while i >= 0 {
        if !mag_bit(emag, i as u64) {
            acc = mont_mul(&acc, &acc, &m, m_inv);
            i -= 1;
            continue;
        }
        // Widen the window down to the lowest set bit within reach so the
        // window value stays odd.
        let mut j = (i - (window_bits - 1)).max(0);
        while !mag_bit(emag, j as u64) {
            j += 1;
        }
        let mut val = 0usize;
        for t in (j..=i).rev() {
            val = (val << 1) | mag_bit(emag, t as u64) as usize;
        }
        for _ in j..=i {
            acc = mont_mul(&acc, &acc, &m, m_inv);
        }
        acc = mont_mul(&acc, &table[val >> 1], &m, m_inv);
        i = j - 1;
    }

    // Leave Montgomery form: multiply by plain 1.
    let mut unit = vec![0 as Word; n];
    unit[0] = 1;
    let out = mont_mul(&acc, &unit, &m, m_inv);
    big_from_le(&out)
}

/// One Montgomery product `x * y * 2^(-32n) mod m` over little-endian
/// vectors of equal length `n`, interleaving each multiplication row with
/// one word of reduction. The result is fully reduced.
fn mont_mul(x: &[Word], y: &[Word], m: &[Word], m_inv: Word) -> Vec<Word> {
    let n = m.len();
    debug_assert!(x.len() == n && y.len() == n);
    // t[n + 1] is the overflow word, always 0 or 1.
    let mut t = vec![0 as Word; n + 2];
    for &xi in x {
        let xi = u64::from(xi);
        let mut carry = 0u64;
        for j in 0..n {
            let s = u64::from(t[j]) + xi * u64::from(y[j]) + carry;
            t[j] = s as Word;
            carry = s >> BITS;
        }
        let s = u64::from(t[n]) + carry;
        t[n] = s as Word;
        t[n + 1] += (s >> BITS) as Word;

        // Add u*m so the low word cancels, then shift one word right.
        let u = t[0].wrapping_mul(m_inv);
        let mut carry = 0u64;
        for j in 0..n {
            let s = u64::from(t[j]) + u64::from(u) * u64::from(m[j]) + carry;
            t[j] = s as Word;
            carry = s >> BITS;
        }
        let s = u64::from(t[n]) + carry;
        t[n] = s as Word;
        t[n + 1] += (s >> BITS) as Word;
        debug_assert_eq!(t[0], 0);
        for j in 0..=n {
            t[j] = t[j + 1];
        }
        t[n + 1] = 0;
    }

    let mut r: Vec<Word> = t[..n].to_vec();
    if t[n] != 0 || !lt_le(&r, m) {
        let mut borrow = 0 as Word;
        for j in 0..n {
            let (d, b1) = r[j].overflowing_sub(m[j]);
            let (d, b2) = d.overflowing_sub(borrow);
            r[j] = d;
            borrow = (b1 || b2) as Word;
        }
    }
    r
}

/// `a < b` over equal-length little-endian vectors.
fn lt_le(a: &[Word], b: &[Word]) -> bool {
    for i in (0..a.len()).rev() {
        if a[i] != b[i] {
            return a[i] < b[i];
        }
    }
    false
}

/// `v * 2^(32n) mod modulus` as a little-endian vector of length `n`.
fn to_mont(v: &BigInt, modulus: &BigInt, n: usize) -> Vec<Word> {
    let mut mag = v.magnitude().to_vec();
    mag.extend(core::iter::repeat(0).take(n));
    let shifted = BigInt::from_magnitude(Sign::Plus, mag);
    let (_, r) = scratch::div_rem_mag(shifted.magnitude(), modulus.magnitude());
    le_padded(&r, n)
}

fn le_padded(mag: &[Word], n: usize) -> Vec<Word> {
    let mut le: Vec<Word> = mag.iter().rev().copied().collect();
    le.resize(n, 0);
    le
}

fn big_from_le(le: &[Word]) -> BigInt {
    let mag: Vec<Word> = le.iter().rev().copied().collect();
    BigInt::from_magnitude(Sign::Plus, mag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigrand::RandBigInt;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn big(s: &str) -> BigInt {
        s.parse().unwrap()
    }

    #[test]
    fn test_mod_pow_small() {
        let two = BigInt::from(2);
        let ten = BigInt::from(10);
        assert_eq!(two.mod_pow(&ten, &BigInt::from(1000)).unwrap(), BigInt::from(24));
        assert_eq!(
            BigInt::from(3).mod_pow(&BigInt::from(644), &BigInt::from(645)).unwrap(),
            BigInt::from(36)
        );
        // modulus one collapses everything
        assert_eq!(two.mod_pow(&ten, &BigInt::one()).unwrap(), BigInt::zero());
        // zero exponent
        assert_eq!(two.mod_pow(&BigInt::zero(), &ten).unwrap(), BigInt::one());
    }

    #[test]
    fn test_mod_pow_rejects_bad_modulus() {
        let two = BigInt::from(2);
        for m in [BigInt::zero(), BigInt::from(-5)] {
            assert_eq!(
                two.mod_pow(&two, &m),
                Err(ArithmeticError::NonPositiveModulus)
            );
        }
    }

    #[test]
    fn test_mod_pow_negative_exponent() {
        let m = big("1000000007");
        let a = BigInt::from(3);
        let r = a.mod_pow(&BigInt::from(-2), &m).unwrap();
        // r * 3^2 == 1 (mod m)
        assert!((r * BigInt::from(9)).modulo(&m).unwrap().is_one());
        // non-invertible base
        assert_eq!(
            BigInt::from(6).mod_pow(&BigInt::from(-1), &BigInt::from(15)),
            Err(ArithmeticError::NonInvertible)
        );
    }

    #[test]
    fn test_fermat_little_theorem() {
        // a^(p-1) == 1 (mod p) for prime p and gcd(a, p) == 1
        let p = big("359334085968622831041960188598043661065388726959079837");
        let pm1 = &p - &BigInt::one();
        for a in [2i64, 3, 65537, 1_000_000_007] {
            let a = BigInt::from(a);
            assert!(a.mod_pow(&pm1, &p).unwrap().is_one());
        }
    }

    #[test]
    fn test_mod_pow_even_modulus() {
        let pow2 = big("4951760157141521099596496896"); // 2^92
        let mixed = big("18446744073709551616") * BigInt::from(243); // 2^64 * 3^5
        let a = big("123456789123456789");
        let e = big("987654321");
        for m in [pow2, mixed] {
            let r = a.mod_pow(&e, &m).unwrap();
            // verify against square-and-multiply over plain modulo
            let mut check = BigInt::one();
            for i in (0..e.bit_length()).rev() {
                check = (&check * &check).modulo(&m).unwrap();
                if e.test_bit(i as i64).unwrap() {
                    check = (&check * &a).modulo(&m).unwrap();
                }
            }
            assert_eq!(r, check);
        }
    }

    #[test]
    fn test_mod_pow_matches_naive_random() {
        let mut rng = XorShiftRng::from_seed([9u8; 16]);
        for bits in [16u64, 33, 64, 130] {
            for _ in 0..10 {
                let m = rng.gen_bigint(bits).abs() + BigInt::from(2);
                let a = rng.gen_bigint(bits).abs();
                let e = rng.gen_bigint(24).abs();
                let fast = a.mod_pow(&e, &m).unwrap();
                let mut slow = BigInt::one();
                for i in (0..e.bit_length()).rev() {
                    slow = (&slow * &slow).modulo(&m).unwrap();
                    if e.test_bit(i as i64).unwrap() {
                        slow = (&slow * &a).modulo(&m).unwrap();
                    }
                }
                assert_eq!(fast, slow, "bits={bits} a={a} e={e} m={m}");
            }
        }
    }

    #[test]
    fn test_inverse_mod_pow2() {
        for k in [1u64, 5, 32, 33, 64, 100] {
            let a = big("987654321987654321987654321");
            let inv = inverse_mod_pow2(&a, k);
            let mask_check = mask_low_bits(&(a * inv), k);
            assert!(mask_check.is_one() || k == 0);
        }
    }
}
