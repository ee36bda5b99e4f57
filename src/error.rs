// creal: exact real arithmetic
// error.rs
//
// Error kinds surfaced by the library.

use thiserror::Error;

/// Errors surfaced by constructive-real, bounded-rational, and unified-real
/// operations. The library never recovers from these internally; they are
/// always propagated to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrealError {
    /// Argument outside an operation's domain: `sqrt` of a negative value,
    /// `ln` of a non-positive value, inverse trig out of `[-1, 1]`,
    /// `tan(pi/2 + k*pi)`, factorial of a non-integer or negative value.
    #[error("domain error in {0}")]
    Domain(String),

    /// `check_precision` rejected a precision whose top four bits disagree,
    /// i.e. precision arithmetic is close to overflowing.
    #[error("precision overflow")]
    PrecisionOverflow,

    /// A predicted result size exceeds the library's size guard (unified-real
    /// `pow`/`exp` results predicted to exceed 2,000,000 bits; factorial
    /// arguments larger than 2^18).
    #[error("result too big: {0}")]
    TooBig(String),

    /// `0^0` under `UnifiedReal::pow`.
    #[error("zero to the zeroth power")]
    ZeroToTheZeroth,

    /// Division by exact zero: `BoundedRational::inverse(0)`, or a unified
    /// real division whose divisor is exactly zero.
    #[error("division by zero")]
    DivideByZero,

    /// The cooperative cancellation flag was observed set while polling
    /// inside an iterative loop.
    #[error("computation cancelled")]
    Cancelled,

    /// Any other mismatch or mispredicted case: non-integer factorial
    /// detected after rounding, a negative base raised to a non-integer
    /// exponent, `NaN`/`Infinity` passed to `BoundedRational::from_double`.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
}
