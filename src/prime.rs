//! Probabilistic primality testing and prime search.
//!
//! Candidates are screened with Miller-Rabin using a round count chosen
//! from the bit length (smaller numbers need more rounds for the same
//! confidence), and large candidates additionally must pass a Lucas
//! strong test with a discriminant picked by Jacobi-symbol search. The
//! combination has no known composite that passes both.

use num_traits::{One, Zero};
use rand::Rng;

use crate::bigint::arith::rem_mag_u64;
use crate::bigint::BigInt;
use crate::sieve::BitSieve;

/// Product of the odd primes from 3 through 41; one big division against
/// this replaces twelve trial divisions when scanning candidates.
const SMALL_PRIME_PRODUCT: u64 = 3 * 5 * 7 * 11 * 13 * 17 * 19 * 23 * 29 * 31 * 37 * 41;

const SMALL_PRIME_FACTORS: [u64; 12] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Certainty used by prime search.
const DEFAULT_CERTAINTY: u32 = 100;

/// Bit length below which prime search scans candidates one by one
/// instead of sieving a window.
const SIEVE_SEARCH_THRESHOLD: u64 = 95;

/// Bit length at and above which Miller-Rabin alone is not trusted and
/// the Lucas test is also required.
const LUCAS_THRESHOLD: u64 = 256;

pub(crate) fn is_probable_prime<R: Rng + ?Sized>(n: &BigInt, certainty: u32, rng: &mut R) -> bool {
    if certainty == 0 {
        return true;
    }
    let two = BigInt::from(2);
    if *n == two {
        return true;
    }
    if *n < two || n.is_even() {
        return false;
    }
    prime_to_certainty(n, certainty, rng)
}

/// Core test for odd `n >= 3`: Miller-Rabin with a bit-length-dependent
/// round count, plus Lucas for large candidates.
pub(crate) fn prime_to_certainty<R: Rng + ?Sized>(n: &BigInt, certainty: u32, rng: &mut R) -> bool {
    // Each Miller-Rabin round removes at least 2 bits of doubt.
    let wanted = ((u64::from(certainty) + 1) / 2) as usize;
    let bits = n.bit_length();
    if bits < 100 {
        return miller_rabin(n, wanted.min(50), rng);
    }
    let rounds = if bits < 256 {
        27
    } else if bits < 512 {
        15
    } else if bits < 768 {
        8
    } else if bits < 1024 {
        4
    } else {
        3
    };
    if bits < LUCAS_THRESHOLD {
        miller_rabin(n, wanted.min(rounds), rng)
    } else {
        miller_rabin(n, wanted.min(rounds), rng) && lucas_lehmer(n)
    }
}

/// Miller-Rabin with random bases drawn from `rng`; a witness to
/// compositeness ends the test immediately.
fn miller_rabin<R: Rng + ?Sized>(w: &BigInt, rounds: usize, rng: &mut R) -> bool {
    use crate::bigrand::RandBigInt;

    // w - 1 == m * 2^a with m odd
    let w_minus_one = w - BigInt::one();
    let a = w_minus_one.lowest_set_bit().unwrap_or(0);
    let m = w_minus_one.shr_unsigned(a);
    let two = BigInt::from(2);

    for _ in 0..rounds {
        let b = rng.gen_bigint_range(&two, w);
        let mut j = 0u64;
        let mut z = match b.mod_pow(&m, w) {
            Ok(z) => z,
            Err(_) => return false,
        };
        loop {
            if (j == 0 && z.is_one()) || z == w_minus_one {
                break;
            }
            if j > 0 && z.is_one() {
                return false;
            }
            j += 1;
            if j == a {
                return false;
            }
            z = match (&z * &z).modulo(w) {
                Ok(z) => z,
                Err(_) => return false,
            };
        }
    }
    true
}

/// Lucas strong test for odd `n`: find a discriminant `d` with Jacobi
/// symbol `(d/n) == -1`, then check that `n` divides `U(n+1)` of the
/// Lucas sequence for that discriminant.
fn lucas_lehmer(n: &BigInt) -> bool {
    let mut d: i64 = 5;
    while jacobi(d, n) != -1 {
        // 5, -7, 9, -11, 13, ...
        d = if d < 0 { -d + 2 } else { -(d + 2) };
    }
    let k = n + BigInt::one();
    match lucas_sequence(d, &k, n) {
        Ok(u) => u.modulo(n).map(|r| r.is_zero()).unwrap_or(false),
        Err(_) => false,
    }
}

/// Jacobi symbol `(p/n)` for odd positive `n` and small `p`, by the
/// binary algorithm on machine words: factors of two come out through the
/// low three bits of `n`, quadratic reciprocity flips the sign, and the
/// big operand is reduced once to a word.
fn jacobi(mut p: i64, n: &BigInt) -> i32 {
    if p == 0 {
        return 0;
    }
    let mut j: i32 = 1;
    let mut u = i64::from(n.magnitude().last().copied().unwrap_or(0));
    if p < 0 {
        p = -p;
        let n8 = u & 7;
        if n8 == 3 || n8 == 7 {
            j = -j;
        }
    }
    while p & 3 == 0 {
        p >>= 2;
    }
    if p & 1 == 0 {
        p >>= 1;
        if (u ^ (u >> 1)) & 2 != 0 {
            j = -j;
        }
    }
    if p == 1 {
        return j;
    }
    if p & u & 2 != 0 {
        j = -j;
    }
    u = rem_mag_u64(n.magnitude(), p as u64) as i64;
    while u != 0 {
        while u & 3 == 0 {
            u >>= 2;
        }
        if u & 1 == 0 {
            u >>= 1;
            if (p ^ (p >> 1)) & 2 != 0 {
                j = -j;
            }
        }
        if u == 1 {
            return j;
        }
        debug_assert!(u < p);
        core::mem::swap(&mut u, &mut p);
        if u & p & 2 != 0 {
            j = -j;
        }
        u %= p;
    }
    0
}

/// `U(k)` of the Lucas sequence with discriminant `d`, computed modulo
/// `n` by binary doubling over the bits of `k`. Intermediate values may
/// go one subtraction of `n` negative to keep the halving step exact.
fn lucas_sequence(d: i64, k: &BigInt, n: &BigInt) -> crate::error::Result<BigInt> {
    let d_big = BigInt::from(d);
    let mut u = BigInt::one();
    let mut v = BigInt::one();
    for i in (0..k.bit_length().saturating_sub(1)).rev() {
        let u2 = (&u * &v).modulo(n)?;
        let mut v2 = (&v * &v + &d_big * (&u * &u)).modulo(n)?;
        if v2.is_odd() {
            v2 = v2 - n;
        }
        u = u2;
        v = v2.shr_unsigned(1);
        if k.test_bit(i as i64)? {
            let mut nu = (&u + &v).modulo(n)?;
            if nu.is_odd() {
                nu = nu - n;
            }
            let mut nv = (&v + &d_big * &u).modulo(n)?;
            if nv.is_odd() {
                nv = nv - n;
            }
            u = nu.shr_unsigned(1);
            v = nv.shr_unsigned(1);
        }
    }
    Ok(u)
}

/// First probable prime strictly greater than `n`; values below 2 yield 2.
pub(crate) fn next_probable_prime<R: Rng + ?Sized>(n: &BigInt, rng: &mut R) -> BigInt {
    let two = BigInt::from(2);
    if *n < two {
        return two;
    }
    let bits = n.bit_length();
    if bits < SIEVE_SEARCH_THRESHOLD {
        // Scan odd candidates, rejecting most composites with a single
        // division by the small-prime product.
        let mut candidate = n + BigInt::one();
        if candidate.is_even() {
            candidate = candidate + BigInt::one();
        }
        loop {
            if candidate.bit_length() > 6 {
                let r = rem_mag_u64(candidate.magnitude(), SMALL_PRIME_PRODUCT);
                if SMALL_PRIME_FACTORS.iter().any(|&p| r % p == 0) {
                    candidate = candidate + &two;
                    continue;
                }
            }
            // Odd candidates below 4 bits (3, 5, 7) are all prime.
            if candidate.bit_length() < 4 {
                return candidate;
            }
            if prime_to_certainty(&candidate, DEFAULT_CERTAINTY, rng) {
                return candidate;
            }
            candidate = candidate + &two;
        }
    }

    // Sieve whole windows of odd candidates above an even base, moving
    // the window up until one survivor passes the full test.
    let mut base = n + BigInt::one();
    if base.is_odd() {
        base = base - BigInt::one();
    }
    let search_len = (bits / 20 * 64) as usize;
    loop {
        let sieve = BitSieve::new(&base, search_len);
        if let Some(p) = sieve.retrieve(&base, DEFAULT_CERTAINTY, rng) {
            return p;
        }
        base = base + BigInt::from(2 * search_len as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn rng() -> XorShiftRng {
        XorShiftRng::from_seed([13u8; 16])
    }

    fn big(s: &str) -> BigInt {
        s.parse().unwrap()
    }

    #[test]
    fn test_small_values() {
        let mut rng = rng();
        assert!(!BigInt::zero().is_probable_prime(100, &mut rng));
        assert!(!BigInt::one().is_probable_prime(100, &mut rng));
        assert!(BigInt::from(2).is_probable_prime(100, &mut rng));
        assert!(BigInt::from(3).is_probable_prime(100, &mut rng));
        assert!(!BigInt::from(4).is_probable_prime(100, &mut rng));
        assert!(!BigInt::from(-7).is_probable_prime(100, &mut rng));
        // zero certainty trusts everything
        assert!(BigInt::from(9).is_probable_prime(0, &mut rng));
    }

    #[test]
    fn test_known_primes() {
        let mut rng = rng();
        for p in [
            "1000003",
            "32416190071",
            "618970019642690137449562111",       // 2^89 - 1
            "162259276829213363391578010288127", // 2^107 - 1
        ] {
            assert!(big(p).is_probable_prime(100, &mut rng), "{p}");
        }
    }

    #[test]
    fn test_known_composites() {
        let mut rng = rng();
        for c in [
            "561",   // Carmichael
            "1105",  // Carmichael
            "41041", // Carmichael
            "1000005",
            "618970019642690137449562109",
            "340282366920938463463374607431768211455", // 2^128 - 1
        ] {
            assert!(!big(c).is_probable_prime(100, &mut rng), "{c}");
        }
    }

    #[test]
    fn test_lucas_path_large_prime() {
        let mut rng = rng();
        // largest prime below 2^256
        let p = (BigInt::one().shl_unsigned(256)) - BigInt::from(189);
        assert!(p.is_probable_prime(100, &mut rng));
        assert!(!(p + BigInt::from(2)).is_probable_prime(100, &mut rng));
    }

    #[test]
    fn test_jacobi_small_cases() {
        // (5/9) = 1, (5/3)... checked against known symbol tables
        assert_eq!(jacobi(5, &big("3439601197")), -1);
        assert_eq!(jacobi(1, &big("7")), 1);
        assert_eq!(jacobi(2, &big("7")), 1);
        assert_eq!(jacobi(3, &big("7")), -1);
        assert_eq!(jacobi(-1, &big("7")), -1);
        assert_eq!(jacobi(-1, &big("13")), 1);
        assert_eq!(jacobi(0, &big("7")), 0);
        assert_eq!(jacobi(21, &big("39")), 0);
    }

    #[test]
    fn test_next_probable_prime_small() {
        let mut rng = rng();
        for (n, expect) in [
            (-5i64, 2i64),
            (0, 2),
            (1, 2),
            (2, 3),
            (3, 5),
            (7, 11),
            (89, 97),
            (7919, 7927),
            (1_000_000, 1_000_003),
        ] {
            assert_eq!(
                BigInt::from(n).next_probable_prime(&mut rng),
                BigInt::from(expect),
                "after {n}"
            );
        }
    }

    #[test]
    fn test_next_probable_prime_large_uses_sieve() {
        let mut rng = rng();
        // 100-bit start exercises the windowed search
        let n = big("1267650600228229401496703205376"); // 2^100
        let p = n.next_probable_prime(&mut rng);
        assert!(p > n);
        assert!(p.is_probable_prime(100, &mut rng));
        // nothing prime in between
        let mut q = &n + BigInt::one();
        while q < p {
            assert!(!q.is_probable_prime(100, &mut rng), "{q}");
            q = q + BigInt::one();
        }
    }
}
