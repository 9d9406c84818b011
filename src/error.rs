//! Error kinds raised by arithmetic operations.
//!
//! None of these are recovered from internally; every operation that can
//! fail returns `Result` and propagates the error to the caller. The
//! `std::ops` operator impls follow the convention of the standard integer
//! types and panic on the documented error condition instead; use the named
//! methods when the inputs are not known to be valid.

use thiserror::Error;

/// Specialized result type for fallible arithmetic.
pub type Result<T> = core::result::Result<T, ArithmeticError>;

/// The ways an exact arithmetic operation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ArithmeticError {
    /// Division by zero with a nonzero dividend.
    #[error("division by zero")]
    DivisionByZero,

    /// Zero divided by zero has no defined quotient.
    #[error("division undefined: 0 / 0")]
    UndefinedResult,

    /// `pow` called with a negative exponent.
    #[error("negative exponent")]
    NegativeExponent,

    /// `mod_pow` or `modulo` called with a modulus that is not positive.
    #[error("modulus not positive")]
    NonPositiveModulus,

    /// No modular inverse exists (the operand and modulus share a factor).
    #[error("not invertible: gcd of operand and modulus is not one")]
    NonInvertible,

    /// Shift distance too extreme to reinterpret in the opposite direction.
    #[error("unsupported shift distance")]
    UnsupportedShift,

    /// Bit index passed to a bit operation was negative.
    #[error("negative bit index")]
    NegativeBitIndex,

    /// Text did not match the integer or decimal grammar.
    #[error("malformed number")]
    MalformedNumber,

    /// Scale or narrowing conversion above the representable range.
    #[error("overflow")]
    Overflow,

    /// Scale underflowed the representable range.
    #[error("underflow")]
    Underflow,

    /// The exact decimal quotient has a non-terminating expansion.
    #[error("non-terminating decimal expansion; no exact representable result")]
    NonTerminatingExpansion,

    /// `RoundingMode::Unnecessary` was specified but a digit would be lost.
    #[error("rounding necessary")]
    RoundingNecessary,
}
