/*!
`creal` is an exact real arithmetic library: lazy, arbitrary-precision
constructive reals, bounded-size exact rationals, and a unified real number
that carries a small symbolic algebra of common irrational forms (`sqrt`,
`exp`, `ln`, `pi`, ...) so that everyday comparisons and identities resolve
exactly instead of falling through to an approximate, terminating-or-not
precision search.

The three layers, from the ground up:

- [`cr::Cr`] is a constructive real: an expression DAG node that produces an
  integer approximation correct to within one unit in the last place at any
  caller-requested binary precision. Every arithmetic and transcendental
  operation is built from this single contract.
- [`rational::BoundedRational`] is an exact rational bounded to a fixed bit
  budget; results exceeding the budget "go null" rather than growing
  without limit.
- [`unified::UnifiedReal`] pairs a `BoundedRational` coefficient with a
  symbolic tag naming a recognized irrational form, falling back to a plain
  `Cr` wherever the symbolic algebra doesn't apply.

This is the API documentation.
*/

pub mod cancel;
pub mod cr;
pub mod error;
pub mod rational;
pub mod scaled;
pub mod unified;

pub use crate::cr::Cr;
pub use crate::error::CrealError;
pub use crate::rational::BoundedRational;
pub use crate::unified::UnifiedReal;
