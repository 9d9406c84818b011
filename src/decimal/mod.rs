//! Arbitrary-precision signed decimals.
//!
//! A [`BigDecimal`] is an integer coefficient and a 32-bit scale; the value
//! is `coefficient * 10^(-scale)`. The representation is exact: no
//! operation rounds unless it takes a rounding mode or [`MathContext`].
//! Coefficients that fit a machine `i64` are stored inline, spilling to a
//! [`BigInt`] only beyond 64 bits.
//!
//! Equality is strict on `(coefficient, scale)` while [`compare`] orders
//! numerically, so `2.0` and `2.00` compare equal but are not `==`. For
//! that reason `BigDecimal` deliberately implements neither `Ord` nor
//! `PartialOrd`: either would be required to agree with `==`.
//!
//! [`compare`]: BigDecimal::compare

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;
use std::sync::OnceLock;

use num_traits::{One, Zero};

use crate::bigint::BigInt;
use crate::error::{ArithmeticError, Result};

mod arith;
mod context;

pub use context::{MathContext, RoundingMode};

/// Coefficient storage: inline while the value fits a signed 64-bit
/// integer, a full [`BigInt`] beyond that. A `Big` never holds an
/// i64-range value, so equal values always take the same variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Coeff {
    Small(i64),
    Big(BigInt),
}

impl Coeff {
    pub(crate) fn from_bigint(n: BigInt) -> Coeff {
        match n.to_i64_exact() {
            Ok(v) => Coeff::Small(v),
            Err(_) => Coeff::Big(n),
        }
    }

    pub(crate) fn to_bigint(&self) -> BigInt {
        match self {
            Coeff::Small(v) => BigInt::from(*v),
            Coeff::Big(n) => n.clone(),
        }
    }

    fn signum(&self) -> i32 {
        match self {
            Coeff::Small(v) => (*v > 0) as i32 - (*v < 0) as i32,
            Coeff::Big(n) => n.signum(),
        }
    }

    fn neg(&self) -> Coeff {
        match self {
            Coeff::Small(v) => match v.checked_neg() {
                Some(n) => Coeff::Small(n),
                None => Coeff::Big(-BigInt::from(*v)),
            },
            Coeff::Big(n) => Coeff::from_bigint(-n.clone()),
        }
    }

    /// Decimal digit count of the magnitude (1 for zero).
    fn digits(&self) -> u64 {
        match self {
            Coeff::Small(0) => 1,
            Coeff::Small(v) => u64::from(v.unsigned_abs().ilog10()) + 1,
            Coeff::Big(n) => n.decimal_digits(),
        }
    }

    /// Magnitude as a decimal digit string, no sign.
    fn abs_digits(&self) -> String {
        match self {
            Coeff::Small(v) => v.unsigned_abs().to_string(),
            Coeff::Big(n) => n.abs().to_string(),
        }
    }
}

/// An immutable arbitrary-precision signed decimal number.
pub struct BigDecimal {
    coeff: Coeff,
    scale: i32,
    /// Lazily computed digit count of the coefficient.
    precision: OnceLock<u64>,
}

impl BigDecimal {
    /// Value `unscaled * 10^(-scale)`.
    pub fn new(unscaled: BigInt, scale: i32) -> BigDecimal {
        BigDecimal {
            coeff: Coeff::from_bigint(unscaled),
            scale,
            precision: OnceLock::new(),
        }
    }

    pub(crate) fn from_small(unscaled: i64, scale: i32) -> BigDecimal {
        BigDecimal {
            coeff: Coeff::Small(unscaled),
            scale,
            precision: OnceLock::new(),
        }
    }

    pub(crate) fn from_coeff(coeff: Coeff, scale: i32) -> BigDecimal {
        BigDecimal {
            coeff,
            scale,
            precision: OnceLock::new(),
        }
    }

    /// Digits to the right of the decimal point; negative means the
    /// coefficient is scaled up by a power of ten.
    #[inline]
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Digit count of the coefficient (1 for zero), cached on first use.
    pub fn precision(&self) -> u64 {
        *self.precision.get_or_init(|| self.coeff.digits())
    }

    /// The coefficient as a [`BigInt`].
    pub fn unscaled_value(&self) -> BigInt {
        self.coeff.to_bigint()
    }

    #[inline]
    pub fn signum(&self) -> i32 {
        self.coeff.signum()
    }

    pub fn neg(&self) -> BigDecimal {
        BigDecimal {
            coeff: self.coeff.neg(),
            scale: self.scale,
            precision: self.precision.clone(),
        }
    }

    pub fn abs(&self) -> BigDecimal {
        if self.signum() < 0 {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Numeric comparison ignoring scale: `2.0` and `2.00` are `Equal`
    /// here even though they are not `==`.
    pub fn compare(&self, other: &BigDecimal) -> Ordering {
        let (xs, ys) = (self.signum(), other.signum());
        if xs != ys {
            return xs.cmp(&ys);
        }
        if xs == 0 {
            return Ordering::Equal;
        }
        // Cheap exit on differing adjusted exponents before aligning.
        let xa = self.precision() as i64 - i64::from(self.scale);
        let ya = other.precision() as i64 - i64::from(other.scale);
        if xa != ya {
            let mag = if xa > ya {
                Ordering::Greater
            } else {
                Ordering::Less
            };
            return if xs > 0 { mag } else { mag.reverse() };
        }
        let sdiff = i64::from(self.scale) - i64::from(other.scale);
        let (a, b) = if sdiff == 0 {
            (self.unscaled_value(), other.unscaled_value())
        } else if sdiff < 0 {
            (
                self.unscaled_value() * BigInt::ten_pow(sdiff.unsigned_abs()),
                other.unscaled_value(),
            )
        } else {
            (
                self.unscaled_value(),
                other.unscaled_value() * BigInt::ten_pow(sdiff as u64),
            )
        };
        a.cmp(&b)
    }

    /// Numerically smaller operand; `self` on a tie.
    pub fn min(&self, other: &BigDecimal) -> BigDecimal {
        if self.compare(other) != Ordering::Greater {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Numerically larger operand; `self` on a tie.
    pub fn max(&self, other: &BigDecimal) -> BigDecimal {
        if self.compare(other) != Ordering::Less {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Integer part, discarding any fraction.
    pub fn to_bigint(&self) -> BigInt {
        if self.scale <= 0 {
            return self.unscaled_value() * BigInt::ten_pow(i64::from(self.scale).unsigned_abs());
        }
        let unscaled = self.unscaled_value();
        let ten = BigInt::ten_pow(self.scale as u64);
        let (q, _) = crate::scratch::div_rem_mag(unscaled.magnitude(), ten.magnitude());
        BigInt::from_magnitude(unscaled.sign(), q)
    }

    /// Integer value; fails with `RoundingNecessary` when a nonzero
    /// fraction would be discarded.
    pub fn to_bigint_exact(&self) -> Result<BigInt> {
        Ok(self.set_scale(0, RoundingMode::Unnecessary)?.unscaled_value())
    }

    /// Integer value fitting an `i64`; fails with `RoundingNecessary` for
    /// a fractional value and `Overflow` for one out of range.
    pub fn to_i64_exact(&self) -> Result<i64> {
        self.to_bigint_exact()?.to_i64_exact()
    }

    /// Closest double; precision beyond 53 bits is lost, and values past
    /// the double range flush to infinity or zero.
    pub fn to_f64(&self) -> f64 {
        use num_traits::ToPrimitive;
        // Negate in f64 space: -scale itself overflows at i32::MIN.
        self.unscaled_value().to_f64().unwrap_or(0.0) * 10f64.powf(-f64::from(self.scale))
    }

    fn layout(&self, sci: bool) -> String {
        let digits = self.coeff.abs_digits();
        let mut out = String::with_capacity(digits.len() + 8);
        if self.signum() < 0 {
            out.push('-');
        }
        if self.scale == 0 {
            out.push_str(&digits);
            return out;
        }
        let mut adjusted = -i64::from(self.scale) + (digits.len() as i64 - 1);
        if self.scale >= 0 && adjusted >= -6 {
            // plain notation
            let pad = i64::from(self.scale) - digits.len() as i64;
            if pad >= 0 {
                out.push_str("0.");
                for _ in 0..pad {
                    out.push('0');
                }
                out.push_str(&digits);
            } else {
                let split = (-pad) as usize;
                out.push_str(&digits[..split]);
                out.push('.');
                out.push_str(&digits[split..]);
            }
            return out;
        }
        if sci {
            out.push_str(&digits[..1]);
            if digits.len() > 1 {
                out.push('.');
                out.push_str(&digits[1..]);
            }
        } else {
            // engineering notation: exponent a multiple of three
            let mut sig = (adjusted % 3) as i32;
            if sig < 0 {
                sig += 3;
            }
            adjusted -= i64::from(sig);
            let sig = (sig + 1) as usize;
            if self.signum() == 0 {
                match sig {
                    1 => out.push('0'),
                    2 => {
                        out.push_str("0.00");
                        adjusted += 3;
                    }
                    _ => {
                        out.push_str("0.0");
                        adjusted += 3;
                    }
                }
            } else if sig >= digits.len() {
                out.push_str(&digits);
                for _ in 0..sig - digits.len() {
                    out.push('0');
                }
            } else {
                out.push_str(&digits[..sig]);
                out.push('.');
                out.push_str(&digits[sig..]);
            }
        }
        if adjusted != 0 {
            out.push('E');
            if adjusted > 0 {
                out.push('+');
            }
            out.push_str(&adjusted.to_string());
        }
        out
    }

    /// Canonical form without an exponent, however long it gets.
    pub fn to_plain_string(&self) -> String {
        let digits = self.coeff.abs_digits();
        let mut out = String::with_capacity(digits.len() + 8);
        if self.signum() < 0 {
            out.push('-');
        }
        if self.scale == 0 {
            out.push_str(&digits);
        } else if self.scale < 0 {
            if self.signum() == 0 {
                return "0".to_string();
            }
            out.push_str(&digits);
            for _ in 0..i64::from(self.scale).unsigned_abs() {
                out.push('0');
            }
        } else {
            let pad = i64::from(self.scale) - digits.len() as i64;
            if pad >= 0 {
                out.push_str("0.");
                for _ in 0..pad {
                    out.push('0');
                }
                out.push_str(&digits);
            } else {
                let split = (-pad) as usize;
                out.push_str(&digits[..split]);
                out.push('.');
                out.push_str(&digits[split..]);
            }
        }
        out
    }

    /// Scientific-style form with the exponent adjusted to a multiple of
    /// three so the integer part has one to three digits.
    pub fn to_engineering_string(&self) -> String {
        self.layout(false)
    }
}

fn parse_decimal(s: &str) -> Result<BigDecimal> {
    let rest = s.as_bytes();
    let (negative, rest) = match rest.first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let mut digits = String::with_capacity(rest.len());
    let mut i = 0;
    while i < rest.len() && rest[i].is_ascii_digit() {
        digits.push(rest[i] as char);
        i += 1;
    }
    let int_len = digits.len();
    let mut frac_len = 0usize;
    if i < rest.len() && rest[i] == b'.' {
        i += 1;
        while i < rest.len() && rest[i].is_ascii_digit() {
            digits.push(rest[i] as char);
            frac_len += 1;
            i += 1;
        }
    }
    if int_len + frac_len == 0 {
        return Err(ArithmeticError::MalformedNumber);
    }
    let mut exponent: i64 = 0;
    if i < rest.len() && (rest[i] == b'e' || rest[i] == b'E') {
        let exp_str = core::str::from_utf8(&rest[i + 1..])
            .map_err(|_| ArithmeticError::MalformedNumber)?;
        if exp_str.is_empty() {
            return Err(ArithmeticError::MalformedNumber);
        }
        exponent = exp_str
            .parse::<i64>()
            .map_err(|_| ArithmeticError::MalformedNumber)?;
        i = rest.len();
    }
    if i != rest.len() {
        return Err(ArithmeticError::MalformedNumber);
    }
    let scale = arith::scale_to_i32(frac_len as i64 - exponent)?;
    let mut unscaled: BigInt = digits.parse()?;
    if negative {
        unscaled = -unscaled;
    }
    Ok(BigDecimal::new(unscaled, scale))
}

impl FromStr for BigDecimal {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<BigDecimal> {
        parse_decimal(s)
    }
}

impl Clone for BigDecimal {
    fn clone(&self) -> BigDecimal {
        BigDecimal {
            coeff: self.coeff.clone(),
            scale: self.scale,
            precision: self.precision.clone(),
        }
    }
}

/// Strict equality on `(coefficient, scale)`; use [`BigDecimal::compare`]
/// for numeric equality.
impl PartialEq for BigDecimal {
    fn eq(&self, other: &BigDecimal) -> bool {
        self.scale == other.scale && self.coeff == other.coeff
    }
}

impl Eq for BigDecimal {}

impl Hash for BigDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coeff.hash(state);
        self.scale.hash(state);
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.layout(true))
    }
}

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigDecimal({self})")
    }
}

impl Default for BigDecimal {
    fn default() -> BigDecimal {
        BigDecimal::zero()
    }
}

impl Zero for BigDecimal {
    fn zero() -> BigDecimal {
        BigDecimal::from_small(0, 0)
    }

    fn is_zero(&self) -> bool {
        self.signum() == 0
    }
}

impl One for BigDecimal {
    fn one() -> BigDecimal {
        BigDecimal::from_small(1, 0)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for BigDecimal {
            #[inline]
            fn from(n: $t) -> BigDecimal {
                BigDecimal::from_small(i64::from(n), 0)
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for BigDecimal {
    fn from(n: u64) -> BigDecimal {
        BigDecimal::new(BigInt::from(n), 0)
    }
}

impl From<BigInt> for BigDecimal {
    fn from(n: BigInt) -> BigDecimal {
        BigDecimal::new(n, 0)
    }
}
