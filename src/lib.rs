//! Arbitrary-precision integer and decimal arithmetic with exact semantics.
//!
//! The two value types are [`BigInt`], an immutable signed integer of
//! unbounded size, and [`BigDecimal`], an integer coefficient paired with a
//! 32-bit decimal scale. Both are exact: nothing rounds unless the caller
//! asks for it through a [`RoundingMode`] or [`MathContext`].
//!
//! ## Example
//!
//! ```rust
//! use bigexact::{BigDecimal, BigInt};
//!
//! let a: BigInt = "12345678901234567890".parse().unwrap();
//! let b: BigInt = "98765432109876543210".parse().unwrap();
//! assert_eq!(
//!     (&a * &b).to_string(),
//!     "1219326311370217952237463801111263526900",
//! );
//!
//! let x: BigDecimal = "123.45".parse().unwrap();
//! let y: BigDecimal = "67.89".parse().unwrap();
//! assert_eq!((x + y).to_string(), "191.34");
//! ```
//!
//! ## Modular arithmetic and primality
//!
//! [`BigInt`] carries the number-theoretic operations cryptographic callers
//! need: [`BigInt::mod_pow`] (Montgomery multiplication with sliding
//! windows), [`BigInt::mod_inverse`], [`BigInt::gcd`], probabilistic
//! primality testing ([`BigInt::is_probable_prime`], Miller-Rabin plus a
//! Lucas-Lehmer pass for large candidates) and sieve-accelerated prime
//! search ([`BigInt::next_probable_prime`]).
//!
//! Random values come from [`rand`] through the [`RandBigInt`] and
//! [`RandPrime`] extension traits:
//!
//! ```rust
//! use bigexact::RandPrime;
//!
//! let mut rng = rand::rng();
//! let p = rng.gen_prime(256);
//! assert_eq!(p.bit_length(), 256);
//! ```
//!
//! ## Decimal rounding
//!
//! [`BigDecimal`] division refuses to guess: an exact quotient with a
//! non-terminating expansion fails, and the caller chooses a precision and
//! [`RoundingMode`] instead.
//!
//! ```rust
//! use bigexact::{ArithmeticError, BigDecimal, MathContext, RoundingMode};
//!
//! let one: BigDecimal = "1".parse().unwrap();
//! let three: BigDecimal = "3".parse().unwrap();
//! assert_eq!(
//!     one.divide(&three),
//!     Err(ArithmeticError::NonTerminatingExpansion),
//! );
//! let mc = MathContext::new(5, RoundingMode::HalfUp);
//! assert_eq!(one.divide_with_context(&three, &mc).unwrap().to_string(), "0.33333");
//! ```

#![doc(html_root_url = "https://docs.rs/bigexact/0.1.0")]

mod bigint;
mod bigrand;
mod decimal;
mod digit;
mod error;
mod monty;
mod prime;
mod scratch;
mod sieve;

pub use crate::bigint::{BigInt, Sign};
pub use crate::bigrand::{RandBigInt, RandPrime, RandomBits, UniformBigInt};
pub use crate::decimal::{BigDecimal, MathContext, RoundingMode};
pub use crate::error::{ArithmeticError, Result};
