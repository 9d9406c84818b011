//! Decimal arithmetic, scaling and rounding.
//!
//! Addition and subtraction align both operands to the larger scale and
//! are exact; multiplication adds scales and is exact. Division is where
//! rounding lives: the plain form demands a terminating expansion, while
//! the context form computes one guard-free correctly-rounded result at
//! the requested precision by normalizing both operands so the quotient
//! lands on exactly that many digits.

use core::cmp::Ordering;
use core::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::{One, Zero};

use super::{BigDecimal, Coeff, MathContext, RoundingMode};
use crate::bigint::BigInt;
use crate::error::{ArithmeticError, Result};

/// Scales live in `i32`; anything outside is an overflow toward zero
/// (`Underflow`, scale too high) or toward infinity (`Overflow`).
pub(super) fn scale_to_i32(scale: i64) -> Result<i32> {
    i32::try_from(scale).map_err(|_| {
        if scale > 0 {
            ArithmeticError::Underflow
        } else {
            ArithmeticError::Overflow
        }
    })
}

fn saturate_scale(scale: i64) -> i32 {
    scale.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// `10^n` as an `i64` when it fits.
fn small_ten_pow(n: u64) -> Option<i64> {
    if n <= 18 {
        Some(10i64.pow(n as u32))
    } else {
        None
    }
}

/// Quotient of `dividend / divisor` rounded per `mode`. The truncated
/// quotient is adjusted away by one when the mode and the discarded
/// remainder call for it.
fn divide_and_round(dividend: &BigInt, divisor: &BigInt, mode: RoundingMode) -> Result<BigInt> {
    let (q, r) = dividend.div_rem(divisor)?;
    if r.is_zero() {
        return Ok(q);
    }
    if mode == RoundingMode::Unnecessary {
        return Err(ArithmeticError::RoundingNecessary);
    }
    let qsign: i64 = if dividend.signum() * divisor.signum() < 0 {
        -1
    } else {
        1
    };
    let half = (r.abs() * BigInt::from(2)).cmp(&divisor.abs());
    let increment = match mode {
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => qsign > 0,
        RoundingMode::Floor => qsign < 0,
        RoundingMode::HalfUp => half != Ordering::Less,
        RoundingMode::HalfDown => half == Ordering::Greater,
        RoundingMode::HalfEven => {
            half == Ordering::Greater || (half == Ordering::Equal && q.is_odd())
        }
        RoundingMode::Unnecessary => return Err(ArithmeticError::RoundingNecessary),
    };
    Ok(if increment { q + BigInt::from(qsign) } else { q })
}

impl BigDecimal {
    /// Coefficient aligned from `self.scale` up to `target` (which must
    /// not be smaller).
    fn aligned_coeff(&self, target: i32) -> Coeff {
        debug_assert!(target >= self.scale);
        let diff = (i64::from(target) - i64::from(self.scale)) as u64;
        if diff == 0 {
            return self.coeff.clone();
        }
        if let (Coeff::Small(v), Some(p)) = (&self.coeff, small_ten_pow(diff)) {
            if let Some(scaled) = v.checked_mul(p) {
                return Coeff::Small(scaled);
            }
        }
        Coeff::from_bigint(self.coeff.to_bigint() * BigInt::ten_pow(diff))
    }

    /// Exact sum; the result scale is the larger operand scale.
    pub fn add(&self, rhs: &BigDecimal) -> BigDecimal {
        let scale = self.scale.max(rhs.scale);
        let a = self.aligned_coeff(scale);
        let b = rhs.aligned_coeff(scale);
        let coeff = match (&a, &b) {
            (Coeff::Small(x), Coeff::Small(y)) => match x.checked_add(*y) {
                Some(s) => Coeff::Small(s),
                None => Coeff::from_bigint(BigInt::from(*x) + BigInt::from(*y)),
            },
            _ => Coeff::from_bigint(a.to_bigint() + b.to_bigint()),
        };
        BigDecimal::from_coeff(coeff, scale)
    }

    /// Exact difference; the result scale is the larger operand scale.
    pub fn sub(&self, rhs: &BigDecimal) -> BigDecimal {
        self.add(&rhs.neg())
    }

    /// Exact product; the result scale is the sum of the operand scales,
    /// failing when that sum leaves `i32`. Named `checked_mul` so it
    /// never shadows (or is shadowed by) the panicking `Mul` operator.
    pub fn checked_mul(&self, rhs: &BigDecimal) -> Result<BigDecimal> {
        let scale = scale_to_i32(i64::from(self.scale) + i64::from(rhs.scale))?;
        let coeff = match (&self.coeff, &rhs.coeff) {
            (Coeff::Small(x), Coeff::Small(y)) => match x.checked_mul(*y) {
                Some(p) => Coeff::Small(p),
                None => Coeff::from_bigint(BigInt::from(*x) * BigInt::from(*y)),
            },
            _ => Coeff::from_bigint(self.coeff.to_bigint() * rhs.coeff.to_bigint()),
        };
        Ok(BigDecimal::from_coeff(coeff, scale))
    }

    /// Exact quotient. Fails with `NonTerminatingExpansion` when the
    /// exact result has an infinite decimal expansion, `DivisionByZero`
    /// for a zero divisor, and `UndefinedResult` for `0 / 0`. The
    /// preferred result scale is `self.scale - divisor.scale`.
    pub fn divide(&self, divisor: &BigDecimal) -> Result<BigDecimal> {
        if divisor.is_zero() {
            return Err(if self.is_zero() {
                ArithmeticError::UndefinedResult
            } else {
                ArithmeticError::DivisionByZero
            });
        }
        let preferred = i64::from(self.scale) - i64::from(divisor.scale);
        if self.is_zero() {
            return Ok(BigDecimal::from_small(0, saturate_scale(preferred)));
        }
        // A terminating expansion can need at most
        // precision + ceil(10 * divisor.precision / 3) digits.
        let max_digits = self.precision() + (10 * divisor.precision() + 2) / 3 + 2;
        let mc = MathContext::new(
            u32::try_from(max_digits).unwrap_or(u32::MAX),
            RoundingMode::Unnecessary,
        );
        let q = match self.divide_with_context(divisor, &mc) {
            Err(ArithmeticError::RoundingNecessary) => {
                return Err(ArithmeticError::NonTerminatingExpansion)
            }
            other => other?,
        };
        if preferred > i64::from(q.scale) {
            return q.set_scale(scale_to_i32(preferred)?, RoundingMode::Unnecessary);
        }
        Ok(q.strip_zeros_to_scale(preferred))
    }

    /// Quotient rounded to `mc.precision` significant digits with
    /// `mc.rounding_mode`; a zero precision falls back to exact division.
    pub fn divide_with_context(&self, divisor: &BigDecimal, mc: &MathContext) -> Result<BigDecimal> {
        if mc.precision == 0 {
            return self.divide(divisor);
        }
        if divisor.is_zero() {
            return Err(if self.is_zero() {
                ArithmeticError::UndefinedResult
            } else {
                ArithmeticError::DivisionByZero
            });
        }
        let preferred = i64::from(self.scale) - i64::from(divisor.scale);
        if self.is_zero() {
            return Ok(BigDecimal::from_small(0, saturate_scale(preferred)));
        }
        let x = self.unscaled_value();
        let y = divisor.unscaled_value();
        let xp = self.precision() as i64;
        let yp = divisor.precision() as i64;
        // Treating both coefficients as fractions in [0.1, 1), widen the
        // quotient by one digit when |x'| > |y'| so it has exactly
        // mc.precision digits (up to a clean 10^p overflow).
        let x_dominates = {
            let (a, b) = if xp >= yp {
                (x.abs(), y.abs() * BigInt::ten_pow((xp - yp) as u64))
            } else {
                (x.abs() * BigInt::ten_pow((yp - xp) as u64), y.abs())
            };
            a > b
        };
        let s = yp - xp + i64::from(mc.precision) - i64::from(x_dominates);
        let (num, den) = if s >= 0 {
            (x * BigInt::ten_pow(s as u64), y)
        } else {
            (x, y * BigInt::ten_pow(s.unsigned_abs()))
        };
        let q = divide_and_round(&num, &den, mc.rounding_mode)?;
        let result = BigDecimal::new(q, scale_to_i32(preferred + s)?).round(mc)?;
        Ok(result.strip_zeros_to_scale(preferred))
    }

    /// Trailing zeros removed from the coefficient, but never past the
    /// preferred scale; the numeric value is unchanged.
    fn strip_zeros_to_scale(&self, preferred: i64) -> BigDecimal {
        let floor = preferred.max(i64::from(i32::MIN));
        let ten = BigInt::from(10);
        let mut unscaled = self.unscaled_value();
        let mut scale = i64::from(self.scale);
        while scale > floor && !unscaled.is_zero() {
            let (q, r) = match unscaled.div_rem(&ten) {
                Ok(qr) => qr,
                Err(_) => break,
            };
            if !r.is_zero() {
                break;
            }
            unscaled = q;
            scale -= 1;
        }
        BigDecimal::new(unscaled, scale as i32)
    }

    /// Integer part of the quotient as a decimal, truncated toward zero.
    /// The result carries the preferred scale `self.scale -
    /// divisor.scale` when that is positive (padding with zeros, exact).
    pub fn divide_to_integral(&self, divisor: &BigDecimal) -> Result<BigDecimal> {
        if divisor.is_zero() {
            return Err(if self.is_zero() {
                ArithmeticError::UndefinedResult
            } else {
                ArithmeticError::DivisionByZero
            });
        }
        let preferred = saturate_scale(i64::from(self.scale) - i64::from(divisor.scale));
        // Align both coefficients to a common scale and divide as plain
        // integers.
        let (xs, ys) = (i64::from(self.scale), i64::from(divisor.scale));
        let num = if ys > xs {
            self.unscaled_value() * BigInt::ten_pow((ys - xs) as u64)
        } else {
            self.unscaled_value()
        };
        let den = if xs > ys {
            divisor.unscaled_value() * BigInt::ten_pow((xs - ys) as u64)
        } else {
            divisor.unscaled_value()
        };
        let (q, _) = num.div_rem(&den)?;
        if q.is_zero() {
            return Ok(BigDecimal::from_small(0, preferred));
        }
        let result = BigDecimal::new(q, 0);
        if preferred > 0 {
            return result.set_scale(preferred, RoundingMode::Unnecessary);
        }
        Ok(result)
    }

    /// Integral quotient and remainder in one pass;
    /// `self == q * divisor + r` exactly.
    pub fn div_rem(&self, divisor: &BigDecimal) -> Result<(BigDecimal, BigDecimal)> {
        let q = self.divide_to_integral(divisor)?;
        let r = self.sub(&q.checked_mul(divisor)?);
        Ok((q, r))
    }

    /// Remainder after integral division; keeps the dividend's sign.
    pub fn remainder(&self, divisor: &BigDecimal) -> Result<BigDecimal> {
        Ok(self.div_rem(divisor)?.1)
    }

    /// Same numeric value at a different scale. Raising the scale pads
    /// with zero digits and is always exact; lowering it rounds per
    /// `mode` (failing with `RoundingNecessary` under `Unnecessary`).
    pub fn set_scale(&self, new_scale: i32, mode: RoundingMode) -> Result<BigDecimal> {
        if new_scale == self.scale {
            return Ok(self.clone());
        }
        if self.is_zero() {
            return Ok(BigDecimal::from_small(0, new_scale));
        }
        if new_scale > self.scale {
            return Ok(BigDecimal::from_coeff(
                self.aligned_coeff(new_scale),
                new_scale,
            ));
        }
        let diff = (i64::from(self.scale) - i64::from(new_scale)) as u64;
        let q = divide_and_round(&self.unscaled_value(), &BigInt::ten_pow(diff), mode)?;
        Ok(BigDecimal::new(q, new_scale))
    }

    /// `self` rounded to `mc.precision` significant digits; a zero
    /// precision returns the value unchanged.
    pub fn round(&self, mc: &MathContext) -> Result<BigDecimal> {
        if mc.precision == 0 {
            return Ok(self.clone());
        }
        let mut value = self.clone();
        // Rounding 99..9 up can add a digit back, hence the loop.
        loop {
            let drop = value.precision() as i64 - i64::from(mc.precision);
            if drop <= 0 {
                return Ok(value);
            }
            let new_scale = scale_to_i32(i64::from(value.scale) - drop)?;
            value = value.set_scale(new_scale, mc.rounding_mode)?;
        }
    }

    /// `self^n` with the exact result scale `self.scale * n`;
    /// `n` must be in `[0, 999999999]`.
    pub fn pow(&self, n: i32) -> Result<BigDecimal> {
        if n < 0 {
            return Err(ArithmeticError::NegativeExponent);
        }
        if n > 999_999_999 {
            return Err(ArithmeticError::Overflow);
        }
        let scale = scale_to_i32(i64::from(self.scale) * i64::from(n))?;
        Ok(BigDecimal::new(self.unscaled_value().pow(n)?, scale))
    }

    /// `self^n` rounded to the context, for `n` in
    /// `[-999999999, 999999999]`. Squaring runs at a working precision of
    /// `mc.precision + digits(n) + 1` so the final rounding is correct; a
    /// negative `n` inverts the positive-power result at that working
    /// precision.
    pub fn pow_with_context(&self, n: i32, mc: &MathContext) -> Result<BigDecimal> {
        if mc.precision == 0 {
            return self.pow(n);
        }
        if !(-999_999_999..=999_999_999).contains(&n) {
            return Err(ArithmeticError::Overflow);
        }
        if n == 0 {
            return Ok(BigDecimal::one());
        }
        let mag = n.unsigned_abs();
        let elength = mag.ilog10() + 1;
        if elength > mc.precision {
            return Err(ArithmeticError::Overflow);
        }
        let workmc = MathContext::new(mc.precision + elength + 1, mc.rounding_mode);
        let mut acc = BigDecimal::one();
        for i in (0..32 - mag.leading_zeros()).rev() {
            acc = acc.checked_mul(&acc)?.round(&workmc)?;
            if mag >> i & 1 == 1 {
                acc = acc.checked_mul(self)?.round(&workmc)?;
            }
        }
        if n < 0 {
            acc = BigDecimal::one().divide_with_context(&acc, &workmc)?;
        }
        acc.round(mc)
    }

    /// Numerically equal value with all trailing zero digits removed
    /// from the coefficient. Zero collapses to scale 0.
    pub fn strip_trailing_zeros(&self) -> BigDecimal {
        if self.is_zero() {
            return BigDecimal::from_small(0, 0);
        }
        let ten = BigInt::from(10);
        let mut unscaled = self.unscaled_value();
        let mut scale = self.scale;
        while scale > i32::MIN {
            let (q, r) = match unscaled.div_rem(&ten) {
                Ok(qr) => qr,
                Err(_) => break,
            };
            if !r.is_zero() {
                break;
            }
            unscaled = q;
            scale -= 1;
        }
        BigDecimal::new(unscaled, scale)
    }
}

macro_rules! forward_decimal_binop {
    (impl $imp:ident, $method:ident via $inherent:ident) => {
        impl $imp<BigDecimal> for BigDecimal {
            type Output = BigDecimal;
            fn $method(self, rhs: BigDecimal) -> BigDecimal {
                $imp::$method(&self, &rhs)
            }
        }
        impl $imp<&BigDecimal> for BigDecimal {
            type Output = BigDecimal;
            fn $method(self, rhs: &BigDecimal) -> BigDecimal {
                $imp::$method(&self, rhs)
            }
        }
        impl $imp<BigDecimal> for &BigDecimal {
            type Output = BigDecimal;
            fn $method(self, rhs: BigDecimal) -> BigDecimal {
                $imp::$method(self, &rhs)
            }
        }
    };
}

impl Add<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;
    fn add(self, rhs: &BigDecimal) -> BigDecimal {
        BigDecimal::add(self, rhs)
    }
}
forward_decimal_binop!(impl Add, add via add);

impl Sub<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;
    fn sub(self, rhs: &BigDecimal) -> BigDecimal {
        BigDecimal::sub(self, rhs)
    }
}
forward_decimal_binop!(impl Sub, sub via sub);

/// # Panics
///
/// Panics when the result scale leaves `i32`; [`BigDecimal::checked_mul`]
/// reports the same condition as an error instead.
impl Mul<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;
    fn mul(self, rhs: &BigDecimal) -> BigDecimal {
        match BigDecimal::checked_mul(self, rhs) {
            Ok(p) => p,
            Err(e) => panic!("decimal multiplication failed: {e}"),
        }
    }
}
forward_decimal_binop!(impl Mul, mul via checked_mul);

/// # Panics
///
/// Panics on a zero divisor or a non-terminating expansion;
/// [`BigDecimal::divide`] reports the same conditions as errors instead.
impl Div<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;
    fn div(self, rhs: &BigDecimal) -> BigDecimal {
        match BigDecimal::divide(self, rhs) {
            Ok(q) => q,
            Err(e) => panic!("decimal division failed: {e}"),
        }
    }
}
forward_decimal_binop!(impl Div, div via divide);

impl Neg for &BigDecimal {
    type Output = BigDecimal;
    fn neg(self) -> BigDecimal {
        BigDecimal::neg(self)
    }
}

impl Neg for BigDecimal {
    type Output = BigDecimal;
    fn neg(self) -> BigDecimal {
        BigDecimal::neg(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_sub() {
        assert_eq!(dec("123.45").add(&dec("67.89")), dec("191.34"));
        assert_eq!(dec("0.1").add(&dec("0.02")), dec("0.12"));
        assert_eq!(dec("1").add(&dec("0.001")), dec("1.001"));
        assert_eq!(dec("1e3").add(&dec("1")), dec("1001"));
        assert_eq!(dec("2.5").sub(&dec("2.5")), dec("0.0"));
        assert_eq!(dec("1.00").sub(&dec("0.5")), dec("0.50"));
        // result scale is the max of the operand scales
        assert_eq!(dec("1.0").add(&dec("2.000")).scale(), 3);
        assert_eq!(&dec("1.5") + dec("2.5"), dec("4.0"));
    }

    #[test]
    fn test_mul() {
        let p = dec("-100.50").checked_mul(&dec("50")).unwrap();
        assert_eq!(p, dec("-5025.00"));
        assert_eq!(p.compare(&dec("-5025.0")), Ordering::Equal);
        assert_eq!(dec("0.5").checked_mul(&dec("0.2")).unwrap(), dec("0.10"));
        assert_eq!(dec("1e5").checked_mul(&dec("1e-3")).unwrap(), dec("1e2"));
        // coefficient spilling past i64
        let big = dec("9999999999999999999");
        assert_eq!(
            big.checked_mul(&big).unwrap().unscaled_value(),
            "99999999999999999980000000000000000001".parse().unwrap()
        );
    }

    #[test]
    fn test_checked_mul_on_owned_value() {
        // The fallible method must stay reachable on an owned receiver
        // without the Mul operator capturing the call.
        let a = dec("2.5");
        let product: Result<BigDecimal> = a.checked_mul(&dec("4"));
        assert_eq!(product.unwrap(), dec("10.0"));
        // scale sum past i32 is an error from the method, a panic from `*`
        let edge = BigDecimal::new(BigInt::one(), i32::MAX);
        assert_eq!(
            edge.checked_mul(&dec("0.1")),
            Err(ArithmeticError::Underflow)
        );
    }

    #[test]
    fn test_divide_exact() {
        assert_eq!(dec("1").divide(&dec("4")).unwrap(), dec("0.25"));
        assert_eq!(dec("10").divide(&dec("4")).unwrap(), dec("2.5"));
        assert_eq!(
            dec("1").divide(&dec("3")),
            Err(ArithmeticError::NonTerminatingExpansion)
        );
        assert_eq!(
            dec("1").divide(&dec("0")),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            dec("0").divide(&dec("0")),
            Err(ArithmeticError::UndefinedResult)
        );
        // preferred scale: dividend.scale - divisor.scale
        let q = dec("1.20").divide(&dec("0.4")).unwrap();
        assert_eq!(q, dec("3.0"));
        assert_eq!(q.scale(), 1);
        assert_eq!(dec("0.00").divide(&dec("25")).unwrap().scale(), 2);
    }

    #[test]
    fn test_divide_with_context() {
        let mc = MathContext::new(5, RoundingMode::HalfUp);
        assert_eq!(
            dec("1").divide_with_context(&dec("3"), &mc).unwrap(),
            dec("0.33333")
        );
        assert_eq!(
            dec("2").divide_with_context(&dec("3"), &mc).unwrap(),
            dec("0.66667")
        );
        let mc1 = MathContext::new(1, RoundingMode::HalfUp);
        assert_eq!(dec("1").divide_with_context(&dec("1"), &mc1).unwrap(), dec("1"));
        assert_eq!(dec("2").divide_with_context(&dec("1"), &mc1).unwrap(), dec("2"));
        // rounding overflow 9.99.. -> 10 collapses cleanly
        let q = dec("9.99").divide_with_context(&dec("1"), &MathContext::new(2, RoundingMode::HalfUp)).unwrap();
        assert_eq!(q.compare(&dec("10")), Ordering::Equal);
        // UNNECESSARY surfaces as RoundingNecessary
        assert_eq!(
            dec("1").divide_with_context(&dec("3"), &MathContext::new(5, RoundingMode::Unnecessary)),
            Err(ArithmeticError::RoundingNecessary)
        );
    }

    #[test]
    fn test_divide_to_integral_and_remainder() {
        assert_eq!(
            dec("11.5").divide_to_integral(&dec("3")).unwrap().compare(&dec("3")),
            Ordering::Equal
        );
        assert_eq!(
            dec("-11.5").divide_to_integral(&dec("3")).unwrap().compare(&dec("-3")),
            Ordering::Equal
        );
        let (q, r) = dec("11.5").div_rem(&dec("3")).unwrap();
        assert_eq!(q.checked_mul(&dec("3")).unwrap().add(&r), dec("11.5"));
        assert_eq!(r.compare(&dec("2.5")), Ordering::Equal);
        // remainder keeps the dividend's sign
        let r = dec("-11.5").remainder(&dec("3")).unwrap();
        assert_eq!(r.compare(&dec("-2.5")), Ordering::Equal);
    }

    #[test]
    fn test_set_scale() {
        // raising the scale is exact
        let d = dec("2.5").set_scale(4, RoundingMode::Unnecessary).unwrap();
        assert_eq!(d, dec("2.5000"));
        assert_eq!(d.compare(&dec("2.5")), Ordering::Equal);
        // lowering rounds
        assert_eq!(dec("2.55").set_scale(1, RoundingMode::HalfUp).unwrap(), dec("2.6"));
        assert_eq!(dec("2.55").set_scale(1, RoundingMode::Down).unwrap(), dec("2.5"));
        assert_eq!(dec("-2.55").set_scale(1, RoundingMode::HalfUp).unwrap(), dec("-2.6"));
        assert_eq!(dec("-2.51").set_scale(0, RoundingMode::Ceiling).unwrap(), dec("-2"));
        assert_eq!(dec("-2.51").set_scale(0, RoundingMode::Floor).unwrap(), dec("-3"));
        assert_eq!(dec("2.5").set_scale(0, RoundingMode::HalfEven).unwrap(), dec("2"));
        assert_eq!(dec("3.5").set_scale(0, RoundingMode::HalfEven).unwrap(), dec("4"));
        assert_eq!(dec("2.5").set_scale(0, RoundingMode::HalfDown).unwrap(), dec("2"));
        assert_eq!(dec("0.1").set_scale(0, RoundingMode::Up).unwrap(), dec("1"));
        assert_eq!(
            dec("2.55").set_scale(1, RoundingMode::Unnecessary),
            Err(ArithmeticError::RoundingNecessary)
        );
    }

    #[test]
    fn test_round() {
        let mc = MathContext::new(3, RoundingMode::HalfEven);
        assert_eq!(dec("123456").round(&mc).unwrap(), dec("1.23e5"));
        assert_eq!(dec("123.456").round(&mc).unwrap(), dec("123"));
        // 999.6 -> 1.00E+3: rounding adds a digit back, second pass trims
        assert_eq!(dec("999.6").round(&mc).unwrap(), dec("1.00e3"));
        // already short enough
        assert_eq!(dec("12").round(&mc).unwrap(), dec("12"));
        assert_eq!(dec("12").round(&MathContext::UNLIMITED).unwrap(), dec("12"));
    }

    #[test]
    fn test_pow() {
        assert_eq!(dec("2.5").pow(2).unwrap(), dec("6.25"));
        assert_eq!(dec("0.1").pow(3).unwrap(), dec("0.001"));
        assert_eq!(dec("3").pow(0).unwrap(), dec("1"));
        assert_eq!(dec("0").pow(0).unwrap(), dec("1"));
        assert_eq!(dec("2").pow(-1), Err(ArithmeticError::NegativeExponent));
        assert_eq!(dec("2").pow(1_000_000_000), Err(ArithmeticError::Overflow));

        let mc = MathContext::new(5, RoundingMode::HalfUp);
        assert_eq!(dec("2").pow_with_context(10, &mc).unwrap(), dec("1024"));
        assert_eq!(
            dec("1.01")
                .pow_with_context(100, &mc)
                .unwrap()
                .compare(&dec("2.7048")),
            Ordering::Equal
        );
        // negative exponent inverts at working precision
        assert_eq!(dec("2").pow_with_context(-2, &mc).unwrap(), dec("0.25000"));
    }

    #[test]
    fn test_strip_trailing_zeros() {
        let d = dec("600.00").strip_trailing_zeros();
        assert_eq!(d, dec("6e2"));
        assert_eq!(d.scale(), -2);
        assert_eq!(dec("1.250").strip_trailing_zeros(), dec("1.25"));
        assert_eq!(dec("1.25").strip_trailing_zeros(), dec("1.25"));
        assert_eq!(dec("0.000").strip_trailing_zeros(), dec("0"));
    }

    #[test]
    fn test_operators() {
        assert_eq!(dec("1.5") + dec("2.5"), dec("4.0"));
        assert_eq!(dec("1.5") - dec("0.25"), dec("1.25"));
        assert_eq!(dec("1.5") * dec("2"), dec("3.0"));
        assert_eq!(dec("1.5") / dec("0.5"), dec("3"));
        assert_eq!(-dec("1.5"), dec("-1.5"));
    }

    #[test]
    #[should_panic]
    fn test_div_operator_panics_on_zero() {
        let _ = dec("1") / dec("0");
    }
}
