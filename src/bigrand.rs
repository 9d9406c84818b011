//! Randomization of big integers.

use rand::distr::uniform::{Error, SampleBorrow, SampleUniform, UniformSampler};
use rand::prelude::*;

use crate::bigint::{pack_bytes, BigInt, Sign};
use crate::prime::prime_to_certainty;

use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

/// A trait for sampling random big integers.
pub trait RandBigInt {
    /// Generate a random non-negative [`BigInt`] of the given bit size.
    fn gen_magnitude(&mut self, bit_size: u64) -> BigInt;

    /// Generate a random [`BigInt`] of the given bit size, with a random
    /// sign.
    fn gen_bigint(&mut self, bit_size: u64) -> BigInt;

    /// Generate a random non-negative [`BigInt`] less than the given
    /// bound. Fails when the bound is not positive.
    fn gen_bigint_below(&mut self, bound: &BigInt) -> BigInt;

    /// Generate a random [`BigInt`] within the given range. The lower
    /// bound is inclusive; the upper bound is exclusive. Fails when
    /// the upper bound is not greater than the lower bound.
    fn gen_bigint_range(&mut self, lbound: &BigInt, ubound: &BigInt) -> BigInt;
}

fn gen_bits<R: Rng + ?Sized>(rng: &mut R, data: &mut [u32], rem: u64) {
    // `fill` is faster than many `random::<u32>` calls
    rng.fill(data);
    if rem > 0 {
        // the leading word carries only `rem` random bits
        data[0] >>= 32 - rem;
    }
}

impl<R: Rng + ?Sized> RandBigInt for R {
    fn gen_magnitude(&mut self, bit_size: u64) -> BigInt {
        let (words, rem) = bit_size.div_rem(&32);
        let len = (words + (rem > 0) as u64)
            .to_usize()
            .expect("capacity overflow");
        let mut data = vec![0u32; len];
        gen_bits(self, &mut data, rem);
        BigInt::from_magnitude(Sign::Plus, data)
    }

    fn gen_bigint(&mut self, bit_size: u64) -> BigInt {
        loop {
            let magnitude = self.gen_magnitude(bit_size);
            if magnitude.is_zero() {
                // A zero magnitude takes no sign; retry with probability
                // 0.5 so zero is not twice as likely as any other value.
                if self.random() {
                    continue;
                }
                return magnitude;
            }
            return if self.random() { magnitude } else { -magnitude };
        }
    }

    fn gen_bigint_below(&mut self, bound: &BigInt) -> BigInt {
        assert!(bound.signum() > 0);
        let bits = bound.bit_length();
        loop {
            let n = self.gen_magnitude(bits);
            if n < *bound {
                return n;
            }
        }
    }

    fn gen_bigint_range(&mut self, lbound: &BigInt, ubound: &BigInt) -> BigInt {
        assert!(*lbound < *ubound);
        if lbound.is_zero() {
            self.gen_bigint_below(ubound)
        } else {
            lbound + self.gen_bigint_below(&(ubound - lbound))
        }
    }
}

/// The back-end implementing rand's [`UniformSampler`] for [`BigInt`].
#[derive(Clone, Debug)]
pub struct UniformBigInt {
    base: BigInt,
    len: BigInt,
}

impl UniformSampler for UniformBigInt {
    type X = BigInt;

    #[inline]
    fn new<B1, B2>(low_b: B1, high_b: B2) -> Result<Self, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let low = low_b.borrow();
        let high = high_b.borrow();
        if low >= high {
            return Err(Error::EmptyRange);
        }
        Ok(UniformBigInt {
            len: high - low,
            base: low.clone(),
        })
    }

    #[inline]
    fn new_inclusive<B1, B2>(low_b: B1, high_b: B2) -> Result<Self, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let low = low_b.borrow();
        let high = high_b.borrow();
        if low > high {
            return Err(Error::EmptyRange);
        }
        Self::new(low, high + BigInt::from(1))
    }

    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::X {
        &self.base + rng.gen_bigint_below(&self.len)
    }

    #[inline]
    fn sample_single<R: Rng + ?Sized, B1, B2>(
        low: B1,
        high: B2,
        rng: &mut R,
    ) -> Result<Self::X, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let low = low.borrow();
        let high = high.borrow();
        if low >= high {
            return Err(Error::EmptyRange);
        }
        Ok(rng.gen_bigint_range(low, high))
    }
}

impl SampleUniform for BigInt {
    type Sampler = UniformBigInt;
}

/// A random distribution for [`BigInt`] values of a particular bit size.
#[derive(Clone, Copy, Debug)]
pub struct RandomBits {
    bits: u64,
}

impl RandomBits {
    #[inline]
    pub fn new(bits: u64) -> RandomBits {
        RandomBits { bits }
    }
}

impl Distribution<BigInt> for RandomBits {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BigInt {
        rng.gen_bigint(self.bits)
    }
}

/// A generic trait for generating random primes.
///
/// *Warning*: This is highly dependent on the provided random number generator,
/// to provide actually random primes.
///
/// # Example
/// ```
/// use bigexact::RandPrime;
///
/// let mut rng = rand::rng();
/// let p = rng.gen_prime(256);
/// assert_eq!(p.bit_length(), 256);
/// ```
pub trait RandPrime {
    /// Generate a random prime number with as many bits as given.
    fn gen_prime(&mut self, bit_size: usize) -> BigInt;
}

/// A list of small, prime numbers that allows us to rapidly
/// exclude some fraction of composite candidates when searching for a random
/// prime. This list is truncated at the point where the product of its
/// members exceeds a u64. It does not include two because we ensure that the
/// candidates are odd by construction.
const SMALL_PRIMES: [u8; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// The product of the values in SMALL_PRIMES; reducing a candidate by this
/// number determines whether it is coprime to all of them without further
/// big-integer operations.
const SMALL_PRIMES_PRODUCT: u64 = 16_294_579_238_595_022_365;

impl<R: Rng + ?Sized> RandPrime for R {
    fn gen_prime(&mut self, bit_size: usize) -> BigInt {
        if bit_size < 2 {
            panic!("prime size must be at least 2-bit");
        }

        let mut b = bit_size % 8;
        if b == 0 {
            b = 8;
        }

        let bytes_len = bit_size.div_ceil(8);
        let mut bytes = vec![0u8; bytes_len];

        loop {
            self.fill_bytes(&mut bytes);
            // Clear bits in the first byte to make sure the candidate has a size <= bits.
            bytes[0] &= ((1u32 << (b as u32)) - 1) as u8;

            // Don't let the value be too small, i.e, set the most significant two bits.
            // Setting the top two bits, rather than just the top bit,
            // means that when two of these values are multiplied together,
            // the result isn't ever one bit short.
            if b >= 2 {
                bytes[0] |= 3u8.wrapping_shl(b as u32 - 2);
            } else {
                // Here b==1, because b cannot be zero.
                bytes[0] |= 1;
                if bytes_len > 1 {
                    bytes[1] |= 0x80;
                }
            }

            // Make the value odd since an even number this large certainly isn't prime.
            bytes[bytes_len - 1] |= 1u8;

            let mut p = BigInt::from_magnitude(Sign::Plus, pack_bytes(&bytes));
            let rem = crate::bigint::arith::rem_mag_u64(p.magnitude(), SMALL_PRIMES_PRODUCT);

            'next: for delta in (0u64..1 << 20).step_by(2) {
                let m = rem + delta;

                for prime in &SMALL_PRIMES {
                    if m % u64::from(*prime) == 0 && (bit_size > 6 || m != u64::from(*prime)) {
                        continue 'next;
                    }
                }

                if delta > 0 {
                    p = p + BigInt::from(delta);
                }

                break;
            }

            // There is a tiny possibility that, by adding delta, we caused
            // the number to be one bit too long. Thus we check bit length here.
            if p.bit_length() == bit_size as u64 && prime_to_certainty(&p, 100, self) {
                return p;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn test_gen_magnitude_bit_size() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);
        for bits in [0u64, 1, 5, 32, 33, 64, 100, 257] {
            for _ in 0..10 {
                let n = rng.gen_magnitude(bits);
                assert!(n.signum() >= 0);
                assert!(n.bit_length() <= bits, "bits={bits} n={n}");
            }
        }
        assert!(rng.gen_magnitude(0).is_zero());
    }

    #[test]
    fn test_gen_bigint_below() {
        let mut rng = XorShiftRng::from_seed([2u8; 16]);
        let bound: BigInt = "123456789123456789123456789".parse().unwrap();
        for _ in 0..50 {
            let n = rng.gen_bigint_below(&bound);
            assert!(n.signum() >= 0 && n < bound);
        }
    }

    #[test]
    fn test_gen_bigint_range() {
        let mut rng = XorShiftRng::from_seed([3u8; 16]);
        let low = BigInt::from(-100);
        let high = BigInt::from(-5);
        for _ in 0..50 {
            let n = rng.gen_bigint_range(&low, &high);
            assert!(n >= low && n < high);
        }
    }

    #[test]
    #[should_panic]
    fn test_gen_bigint_range_empty() {
        let mut rng = XorShiftRng::from_seed([4u8; 16]);
        rng.gen_bigint_range(&BigInt::from(5), &BigInt::from(5));
    }

    #[test]
    fn test_uniform_sampler() {
        let mut rng = XorShiftRng::from_seed([5u8; 16]);
        let low = BigInt::from(1u32);
        let high: BigInt = "100000000000000000000".parse().unwrap();
        let sampler = UniformBigInt::new(&low, &high).unwrap();
        for _ in 0..20 {
            let n = sampler.sample(&mut rng);
            assert!(n >= low && n < high);
        }
        assert!(UniformBigInt::new(&high, &low).is_err());
    }

    #[test]
    fn test_gen_prime() {
        let mut rng = XorShiftRng::from_seed([6u8; 16]);
        for bits in [64usize, 128] {
            let p = rng.gen_prime(bits);
            assert_eq!(p.bit_length(), bits as u64);
            assert!(p.is_probable_prime(100, &mut rng));
        }
    }
}
