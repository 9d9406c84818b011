//! Mutable scratch integers for multi-step algorithms.
//!
//! [`ScratchInt`] is a resizable, offset-addressable word buffer: an
//! unsigned magnitude living in `value[offset..offset + len]`, most
//! significant word first. Division, GCD and modular inverse mutate these
//! buffers through many intermediate steps and only convert back to a
//! canonical [`BigInt`] at the end. A scratch value is exclusively owned by
//! the algorithm invocation that created it; where two logical values trade
//! places the buffers are exchanged with `mem::swap`, never aliased.

use core::cmp::Ordering;
use core::mem;

use crate::bigint::arith::{add_mag, cmp_mag, mul_mag, shl_mag, shr_mag, sub_mag};
use crate::bigint::{BigInt, Sign};
use crate::digit::{hi, inverse_mod_word, lo, Word, BITS, WORD_MASK};
use crate::error::{ArithmeticError, Result};
use crate::monty;

pub(crate) struct ScratchInt {
    value: Vec<Word>,
    offset: usize,
    len: usize,
}

impl ScratchInt {
    pub(crate) fn new() -> ScratchInt {
        ScratchInt {
            value: Vec::new(),
            offset: 0,
            len: 0,
        }
    }

    pub(crate) fn from_mag(mag: &[Word]) -> ScratchInt {
        let mut s = ScratchInt {
            value: mag.to_vec(),
            offset: 0,
            len: mag.len(),
        };
        s.normalize();
        s
    }

    fn from_word(w: Word) -> ScratchInt {
        ScratchInt::from_mag(&[w])
    }

    #[inline]
    fn slice(&self) -> &[Word] {
        &self.value[self.offset..self.offset + self.len]
    }

    /// Replaces the held magnitude, reusing the buffer where it fits.
    fn set_mag(&mut self, mag: Vec<Word>) {
        self.value = mag;
        self.offset = 0;
        self.len = self.value.len();
        self.normalize();
    }

    /// Restores the no-leading-zero invariant by advancing the offset.
    fn normalize(&mut self) {
        while self.len > 0 && self.value[self.offset] == 0 {
            self.offset += 1;
            self.len -= 1;
        }
        if self.len == 0 {
            self.offset = 0;
        }
    }

    fn clear(&mut self) {
        self.offset = 0;
        self.len = 0;
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn is_one(&self) -> bool {
        self.len == 1 && self.value[self.offset] == 1
    }

    #[inline]
    fn is_even(&self) -> bool {
        self.len == 0 || self.value[self.offset + self.len - 1] & 1 == 0
    }

    /// Least significant word (0 for zero).
    #[inline]
    fn low_word(&self) -> Word {
        if self.len == 0 {
            0
        } else {
            self.value[self.offset + self.len - 1]
        }
    }

    /// Value as a double word; requires `len <= 2`.
    fn as_u64(&self) -> u64 {
        debug_assert!(self.len <= 2);
        let lo = u64::from(self.low_word());
        if self.len == 2 {
            (u64::from(self.value[self.offset]) << BITS) | lo
        } else {
            lo
        }
    }

    fn lowest_set_bit(&self) -> Option<u64> {
        if self.len == 0 {
            return None;
        }
        for i in 0..self.len {
            let w = self.value[self.offset + self.len - 1 - i];
            if w != 0 {
                return Some(i as u64 * u64::from(BITS) + u64::from(w.trailing_zeros()));
            }
        }
        None
    }

    fn compare(&self, other: &ScratchInt) -> Ordering {
        cmp_mag(self.slice(), other.slice())
    }

    fn right_shift(&mut self, n: u64) {
        if n == 0 || self.len == 0 {
            return;
        }
        let shifted = shr_mag(self.slice(), n);
        self.set_mag(shifted);
    }

    fn left_shift(&mut self, n: u64) {
        if n == 0 || self.len == 0 {
            return;
        }
        let shifted = shl_mag(self.slice(), n);
        self.set_mag(shifted);
    }

    fn add(&mut self, other: &ScratchInt) {
        let sum = add_mag(self.slice(), other.slice());
        self.set_mag(sum);
    }

    /// `self -= other`; requires `self >= other`.
    fn subtract(&mut self, other: &ScratchInt) {
        let diff = sub_mag(self.slice(), other.slice());
        self.set_mag(diff);
    }

    /// `self += other * w`.
    fn add_mul_word(&mut self, other: &ScratchInt, w: Word) {
        if w == 0 || other.is_zero() {
            return;
        }
        let product = mul_mag(other.slice(), &[w]);
        let sum = add_mag(self.slice(), &product);
        self.set_mag(sum);
    }

    fn to_mag(&self) -> Vec<Word> {
        self.slice().to_vec()
    }

    fn to_bigint(&self, sign: Sign) -> BigInt {
        BigInt::from_magnitude(sign, self.to_mag())
    }
}

/// Sign-and-magnitude scratch value for the almost-inverse cofactors.
struct SignedScratch {
    /// 1 or -1; zero keeps sign 1.
    sign: i8,
    mag: ScratchInt,
}

impl SignedScratch {
    fn zero() -> SignedScratch {
        SignedScratch {
            sign: 1,
            mag: ScratchInt::new(),
        }
    }

    fn one() -> SignedScratch {
        SignedScratch {
            sign: 1,
            mag: ScratchInt::from_word(1),
        }
    }

    fn left_shift(&mut self, n: u64) {
        self.mag.left_shift(n);
    }

    fn signed_add(&mut self, other: &SignedScratch) {
        if self.sign == other.sign {
            self.mag.add(&other.mag);
            return;
        }
        match self.mag.compare(&other.mag) {
            Ordering::Greater => self.mag.subtract(&other.mag),
            Ordering::Less => {
                let diff = sub_mag(other.mag.slice(), self.mag.slice());
                self.mag.set_mag(diff);
                self.sign = other.sign;
            }
            Ordering::Equal => {
                self.mag.clear();
                self.sign = 1;
            }
        }
    }

    fn signed_subtract(&mut self, other: &SignedScratch) {
        let negated = SignedScratch {
            sign: -other.sign,
            mag: ScratchInt::from_mag(other.mag.slice()),
        };
        self.signed_add(&negated);
    }
}

// -- division ---------------------------------------------------------------

/// Quotient and remainder of two magnitudes; `b` must be nonzero.
pub(crate) fn div_rem_mag(a: &[Word], b: &[Word]) -> (Vec<Word>, Vec<Word>) {
    debug_assert!(!b.is_empty());
    if cmp_mag(a, b) == Ordering::Less {
        return (Vec::new(), a.to_vec());
    }
    if b.len() == 1 {
        divide_one_word(a, b[0])
    } else {
        divide_knuth(a, b)
    }
}

/// Fast path: direct long division by a single word.
fn divide_one_word(a: &[Word], d: Word) -> (Vec<Word>, Vec<Word>) {
    let mut q = a.to_vec();
    let r = crate::bigint::arith::div_rem_word(&mut q, d);
    let rem = if r == 0 { Vec::new() } else { vec![r] };
    (q, rem)
}

/// Knuth's Algorithm D on normalized word magnitudes.
fn divide_knuth(a: &[Word], b: &[Word]) -> (Vec<Word>, Vec<Word>) {
    let n = b.len();
    debug_assert!(n >= 2 && a.len() >= n);

    // D1: shift both operands so the divisor's leading word has its high
    // bit set; this bounds the trial-digit error to at most two.
    let shift = b[0].leading_zeros();
    let d = shl_mag(b, u64::from(shift));
    debug_assert_eq!(d.len(), n);
    let mut rem = shl_mag(a, u64::from(shift));
    // One extra high word for the sliding remainder window.
    while rem.len() < a.len() + 1 {
        rem.insert(0, 0);
    }

    let q_len = a.len() - n + 1;
    let mut q = vec![0 as Word; q_len];
    let dh = u64::from(d[0]);
    let dl = u64::from(d[1]);

    for j in 0..q_len {
        // D3: estimate the quotient digit from the top two remainder words
        // and the top divisor word.
        let num = (u64::from(rem[j]) << BITS) | u64::from(rem[j + 1]);
        let (mut qhat, mut rhat) = if u64::from(rem[j]) >= dh {
            let qh = WORD_MASK;
            (qh, num - qh * dh)
        } else {
            (num / dh, num % dh)
        };
        // Correct with the third remainder word and second divisor word;
        // afterwards qhat is exact or one too high.
        let r_lo = u64::from(rem[j + 2]);
        while rhat <= WORD_MASK && qhat * dl > (rhat << BITS | r_lo) {
            qhat -= 1;
            rhat += dh;
        }

        // D4: multiply-and-subtract qhat * d from the window rem[j..=j+n].
        let mut mul_carry: u64 = 0;
        let mut borrow: u64 = 0;
        for i in (0..n).rev() {
            let p = qhat * u64::from(d[i]) + mul_carry;
            mul_carry = p >> BITS;
            let sub = (p & WORD_MASK) + borrow;
            let cur = u64::from(rem[j + 1 + i]);
            if cur >= sub {
                rem[j + 1 + i] = (cur - sub) as Word;
                borrow = 0;
            } else {
                rem[j + 1 + i] = (cur + (1 << BITS) - sub) as Word;
                borrow = 1;
            }
        }
        let cur = u64::from(rem[j]);
        let sub = mul_carry + borrow;
        if cur >= sub {
            rem[j] = (cur - sub) as Word;
        } else {
            // D6: the trial digit was one too high; add one divisor
            // multiple back and decrement.
            rem[j] = (cur + (1 << BITS) - sub) as Word;
            qhat -= 1;
            let mut carry: u64 = 0;
            for i in (0..n).rev() {
                let s = u64::from(rem[j + 1 + i]) + u64::from(d[i]) + carry;
                rem[j + 1 + i] = s as Word;
                carry = s >> BITS;
            }
            rem[j] = (u64::from(rem[j]) + carry) as Word;
            debug_assert_eq!(rem[j], 0);
        }
        q[j] = qhat as Word;
    }

    // D8: undo the normalization shift on the remainder.
    let mut r = rem;
    crate::bigint::arith::strip_leading_zeros(&mut r);
    let r = shr_mag(&r, u64::from(shift));
    crate::bigint::arith::strip_leading_zeros(&mut q);
    (q, r)
}

// -- greatest common divisor ------------------------------------------------

/// GCD of two nonzero magnitudes: ordinary division while the operands
/// differ by two or more words, binary GCD once they are close in length.
pub(crate) fn gcd_mag(a: &[Word], b: &[Word]) -> Vec<Word> {
    let mut u = ScratchInt::from_mag(a);
    let mut v = ScratchInt::from_mag(b);
    while !v.is_zero() {
        if u.len.abs_diff(v.len) < 2 {
            return binary_gcd(u, v);
        }
        let (_, r) = div_rem_mag(u.slice(), v.slice());
        u = v;
        v = ScratchInt::from_mag(&r);
    }
    u.to_mag()
}

/// Binary GCD: strip the common power of two, then subtract-and-shift
/// until the operands meet, finishing on native words.
fn binary_gcd(mut u: ScratchInt, mut v: ScratchInt) -> Vec<Word> {
    debug_assert!(!u.is_zero() && !v.is_zero());
    let s1 = u.lowest_set_bit().unwrap_or(0);
    let s2 = v.lowest_set_bit().unwrap_or(0);
    let k = s1.min(s2);
    u.right_shift(s1);
    v.right_shift(s2);

    loop {
        if u.len <= 2 && v.len <= 2 {
            let g = word_gcd(u.as_u64(), v.as_u64());
            u.set_mag(vec![hi(g), lo(g)]);
            break;
        }
        match u.compare(&v) {
            Ordering::Equal => break,
            Ordering::Less => mem::swap(&mut u, &mut v),
            Ordering::Greater => {}
        }
        u.subtract(&v);
        // u is even now; v stays odd.
        let tz = u.lowest_set_bit().unwrap_or(0);
        u.right_shift(tz);
    }
    u.left_shift(k);
    u.to_mag()
}

fn word_gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

// -- modular inverse --------------------------------------------------------

/// Inverse of `a` modulo `m`, for `a` in `[1, m)` and `m > 1`. Odd moduli
/// go through the almost-inverse algorithm; even moduli are split into odd
/// and power-of-two parts recombined with the Chinese Remainder Theorem.
pub(crate) fn mod_inverse(a: &BigInt, m: &BigInt) -> Result<BigInt> {
    if m.is_odd() {
        return mod_inverse_odd(a, m);
    }
    if a.is_even() {
        return Err(ArithmeticError::NonInvertible);
    }
    let k = m.lowest_set_bit().unwrap_or(0);
    let odd = m.shift_right(k as i64)?;
    let even_inv = monty::inverse_mod_pow2(a, k);
    if num_traits::One::is_one(&odd) {
        return Ok(even_inv);
    }
    let odd_inv = mod_inverse_odd(&a.modulo(&odd)?, &odd)?;
    // Garner recombination: x = oddInv + odd * t with
    // t = (evenInv - oddInv) / odd  (mod 2^k).
    let odd_inv_mod2k = monty::inverse_mod_pow2(&odd, k);
    let t = crate::bigint::bits::mask_low_bits(&((even_inv - &odd_inv) * odd_inv_mod2k), k);
    Ok(odd_inv + odd * t)
}

/// Schroeppel's almost-inverse for an odd modulus: drives `f` down to one
/// while carrying the cofactor pair `(c, d)`, yielding `c` with
/// `c * a == 2^k (mod p)`, then divides the spurious power of two back out
/// with [`fixup`].
fn mod_inverse_odd(a: &BigInt, p: &BigInt) -> Result<BigInt> {
    debug_assert!(p.is_odd());
    let p_scratch = ScratchInt::from_mag(p.magnitude());
    let mut f = ScratchInt::from_mag(a.magnitude());
    let mut g = ScratchInt::from_mag(p.magnitude());
    let mut c = SignedScratch::one();
    let mut d = SignedScratch::zero();
    let mut k: u64 = 0;

    if f.is_even() {
        match f.lowest_set_bit() {
            None => return Err(ArithmeticError::NonInvertible),
            Some(tz) => {
                f.right_shift(tz);
                d.left_shift(tz);
                k = tz;
            }
        }
    }

    while !f.is_one() {
        if f.is_zero() {
            return Err(ArithmeticError::NonInvertible);
        }
        if f.compare(&g) == Ordering::Less {
            mem::swap(&mut f, &mut g);
            mem::swap(&mut c, &mut d);
        }
        if (f.low_word() ^ g.low_word()) & 3 == 0 {
            // f == g (mod 4): subtracting clears two low bits at once.
            f.subtract(&g);
            c.signed_subtract(&d);
        } else {
            f.add(&g);
            c.signed_add(&d);
        }
        match f.lowest_set_bit() {
            None => return Err(ArithmeticError::NonInvertible),
            Some(tz) => {
                f.right_shift(tz);
                d.left_shift(tz);
                k += tz;
            }
        }
    }

    if c.mag.compare(&p_scratch) != Ordering::Less {
        let (_, r) = div_rem_mag(c.mag.slice(), p_scratch.slice());
        c.mag.set_mag(r);
    }
    if c.sign < 0 && !c.mag.is_zero() {
        let diff = sub_mag(p_scratch.slice(), c.mag.slice());
        c.mag.set_mag(diff);
    }
    Ok(fixup(c.mag, &p_scratch, k))
}

/// Newton-style correction turning an almost inverse `c` (where
/// `c * a == 2^k mod p`) into the true inverse: multiplies by the inverse
/// of 2 one word (or partial word) at a time.
fn fixup(mut c: ScratchInt, p: &ScratchInt, k: u64) -> BigInt {
    // -p^-1 mod 2^32
    let r = inverse_mod_word(p.low_word()).wrapping_neg();
    for _ in 0..k / u64::from(BITS) {
        // v chosen so the low word of c + v*p is zero
        let v = r.wrapping_mul(c.low_word());
        c.add_mul_word(p, v);
        c.right_shift(u64::from(BITS));
    }
    let num_bits = (k % u64::from(BITS)) as u32;
    if num_bits != 0 {
        let mut v = r.wrapping_mul(c.low_word());
        v &= (1 << num_bits) - 1;
        c.add_mul_word(p, v);
        c.right_shift(u64::from(num_bits));
    }
    if c.compare(p) != Ordering::Less {
        let (_, rem) = div_rem_mag(c.slice(), p.slice());
        c.set_mag(rem);
    }
    c.to_bigint(Sign::Plus)
}
