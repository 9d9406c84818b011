//! Rounding configuration for decimal operations.

use core::fmt;

/// How to round a result when digits must be discarded.
///
/// The half modes differ only in how an exact tie (discarded part equal to
/// half a unit in the last kept place) is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Toward zero (truncation).
    Down,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// To nearest; ties away from zero.
    HalfUp,
    /// To nearest; ties toward zero.
    HalfDown,
    /// To nearest; ties to the even neighbor.
    HalfEven,
    /// No rounding permitted; an inexact result fails with
    /// `RoundingNecessary`.
    Unnecessary,
}

/// Precision and rounding mode for a decimal operation. A precision of
/// zero means unlimited (exact) arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MathContext {
    pub precision: u32,
    pub rounding_mode: RoundingMode,
}

impl MathContext {
    /// Exact arithmetic; operations that cannot produce an exact result
    /// fail rather than round.
    pub const UNLIMITED: MathContext = MathContext::new(0, RoundingMode::HalfUp);

    /// 7 significant digits, ties to even (IEEE 754 decimal32).
    pub const DECIMAL32: MathContext = MathContext::new(7, RoundingMode::HalfEven);

    /// 16 significant digits, ties to even (IEEE 754 decimal64).
    pub const DECIMAL64: MathContext = MathContext::new(16, RoundingMode::HalfEven);

    /// 34 significant digits, ties to even (IEEE 754 decimal128).
    pub const DECIMAL128: MathContext = MathContext::new(34, RoundingMode::HalfEven);

    pub const fn new(precision: u32, rounding_mode: RoundingMode) -> MathContext {
        MathContext {
            precision,
            rounding_mode,
        }
    }
}

impl Default for MathContext {
    fn default() -> MathContext {
        MathContext::UNLIMITED
    }
}

impl fmt::Display for MathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "precision={} roundingMode={:?}",
            self.precision, self.rounding_mode
        )
    }
}
