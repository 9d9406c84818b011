//! Composite sieving for prime search.
//!
//! A [`BitSieve`] covers a window of odd candidates above an even base:
//! bit `i` stands for `base + 2i + 1`, and a set bit marks a known
//! composite. The window is seeded by crossing off multiples of every
//! prime found in a small shared sieve of the odd numbers, so only
//! candidates that survive every small-prime test reach the expensive
//! probabilistic check.

use std::sync::LazyLock;

use rand::Rng;

use crate::bigint::arith::rem_mag_u64;
use crate::bigint::BigInt;
use crate::prime;

/// Sieve of the odd numbers 1, 3, 5, ... used to enumerate the small
/// primes that seed every search window.
static SMALL_SIEVE: LazyLock<BitSieve> = LazyLock::new(BitSieve::small);

pub(crate) struct BitSieve {
    bits: Vec<u64>,
    /// Window size in bits.
    length: usize,
}

impl BitSieve {
    /// Sieve of the odd numbers up to `2 * 150 * 64`, bit `i` standing for
    /// `2i + 1`. Large enough that its primes cover any window this crate
    /// searches.
    fn small() -> BitSieve {
        let length = 150 * 64;
        let mut sieve = BitSieve {
            bits: vec![0; length / 64],
            length,
        };
        // 1 is not prime.
        sieve.set(0);
        let mut next_index = 1usize;
        let mut next_prime = 3usize;
        loop {
            sieve.sieve_single(next_index + next_prime, next_prime);
            match sieve.sieve_search(next_index + 1) {
                Some(i) if 2 * i + 1 < length => {
                    next_index = i;
                    next_prime = 2 * i + 1;
                }
                _ => break,
            }
        }
        sieve
    }

    /// Window of `search_len` odd candidates above the even `base`, with
    /// every multiple of a small prime already crossed off.
    pub(crate) fn new(base: &BigInt, search_len: usize) -> BitSieve {
        debug_assert!(base.is_even());
        let small = &*SMALL_SIEVE;
        let mut sieve = BitSieve {
            bits: vec![0; (search_len + 63) / 64],
            length: search_len,
        };
        let mut step_index = small.sieve_search(0).unwrap_or(1);
        loop {
            let step = 2 * step_index + 1;
            // Position of the first odd multiple of `step` above `base`.
            let rem = rem_mag_u64(base.magnitude(), step as u64) as usize;
            let mut start = step - rem;
            if start % 2 == 0 {
                start += step;
            }
            sieve.sieve_single((start - 1) / 2, step);
            match small.sieve_search(step_index + 1) {
                Some(i) => step_index = i,
                None => break,
            }
        }
        sieve
    }

    #[inline]
    fn get(&self, i: usize) -> bool {
        self.bits[i >> 6] >> (i & 63) & 1 == 1
    }

    #[inline]
    fn set(&mut self, i: usize) {
        self.bits[i >> 6] |= 1 << (i & 63);
    }

    /// Marks every `step`-th bit from `start` as composite.
    fn sieve_single(&mut self, mut start: usize, step: usize) {
        while start < self.length {
            self.set(start);
            start += step;
        }
    }

    /// Index of the first clear bit at or after `start`.
    fn sieve_search(&self, start: usize) -> Option<usize> {
        (start..self.length).find(|&i| !self.get(i))
    }

    /// The first surviving candidate that passes the probabilistic
    /// primality test, or `None` when the whole window is composite.
    pub(crate) fn retrieve<R: Rng + ?Sized>(
        &self,
        base: &BigInt,
        certainty: u32,
        rng: &mut R,
    ) -> Option<BigInt> {
        for i in 0..self.length {
            if !self.get(i) {
                let candidate = base + BigInt::from(2 * i as u64 + 1);
                if prime::prime_to_certainty(&candidate, certainty, rng) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn test_small_sieve_marks_composites() {
        let small = &*SMALL_SIEVE;
        // bit i stands for 2i + 1
        for (i, expect_prime) in [
            (0, false), // 1
            (1, true),  // 3
            (2, true),  // 5
            (3, true),  // 7
            (4, false), // 9
            (5, true),  // 11
            (7, false), // 15
            (60, false), // 121 = 11^2
        ] {
            assert_eq!(!small.get(i), expect_prime, "candidate {}", 2 * i + 1);
        }
    }

    #[test]
    fn test_window_survivors_have_no_small_factors() {
        let base: BigInt = "1000000000000000000000000000000".parse().unwrap();
        let sieve = BitSieve::new(&base, 256);
        for i in 0..256usize {
            if !sieve.get(i) {
                let candidate = &base + BigInt::from(2 * i as u64 + 1);
                for p in [3u64, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41] {
                    assert!(
                        rem_mag_u64(candidate.magnitude(), p) != 0,
                        "survivor {candidate} divisible by {p}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_retrieve_finds_prime() {
        let mut rng = XorShiftRng::from_seed([11u8; 16]);
        let base = BigInt::from(1_000_000u32);
        let sieve = BitSieve::new(&base, 64 * 4);
        let p = sieve.retrieve(&base, 100, &mut rng).unwrap();
        assert_eq!(p, BigInt::from(1_000_003u32));
    }
}
