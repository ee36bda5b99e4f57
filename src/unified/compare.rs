// creal: exact real arithmetic
// unified/compare.rs
//
// Equality and ordering on unified reals: decided symbolically wherever
// the property algebra allows it, otherwise deferred to the underlying
// constructive real. The key to deciding as much as possible without
// touching the `Cr` is `Property::definitely_independent` (distinct named
// irrationals, e.g. `pi` and `sqrt(2)`, can never combine to zero) and
// `Property::common_power` (same-kind irrationals, e.g. two `Sqrt` terms,
// compare by raising both sides to a shared power instead).

use std::cmp::Ordering;

use super::property::{properties_match, Property};
use super::UnifiedReal;
use crate::error::CrealError;

impl UnifiedReal {
    /// Whether this value is exactly zero. Always decidable: a unified
    /// real is zero iff its rational coefficient is (every `Property`
    /// variant's `cr_value` is a well-defined nonzero real wherever it's
    /// constructed).
    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    /// Exact equality, decided symbolically when possible and otherwise by
    /// an unbounded constructive-real comparison (which only fails to
    /// terminate if the two values are genuinely, infinitely-precisely
    /// equal along a path the symbolic algebra didn't recognize).
    pub fn definitely_equal(&self, other: &UnifiedReal) -> Result<bool, CrealError> {
        let self_zero = self.coefficient.is_zero();
        let other_zero = other.coefficient.is_zero();
        if self_zero || other_zero {
            return Ok(self_zero == other_zero);
        }
        if properties_match(&self.property, &other.property) {
            return Ok(self.coefficient == other.coefficient);
        }
        if self.property.definitely_independent(&other.property) {
            return Ok(false);
        }
        let diff = self.subtract(other);
        if diff.is_zero() {
            return Ok(true);
        }
        if diff.property.always_positive() {
            return Ok(false);
        }
        Ok(diff.to_cr().compare_to_unbounded(&crate::cr::Cr::from_int(0i64))? == Ordering::Equal)
    }

    /// Three-way comparison against zero, decided without ever consulting
    /// the constructive real when the property is known to be
    /// sign-definite.
    pub fn sign(&self) -> Result<i32, CrealError> {
        if self.coefficient.is_zero() {
            return Ok(0);
        }
        if self.property.always_positive() {
            return Ok(self.coefficient.sign());
        }
        let ord = self
            .to_cr()
            .compare_to_unbounded(&crate::cr::Cr::from_int(0i64))?;
        Ok(match ord {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        })
    }

    /// Whether [`UnifiedReal::compare_to`] can decide the answer without
    /// ever consulting the underlying constructive real.
    pub fn is_comparable(&self, other: &UnifiedReal) -> Result<bool, CrealError> {
        let self_sign = self.sign()?;
        let other_sign = other.sign()?;
        if self_sign != other_sign || self_sign == 0 {
            return Ok(true);
        }
        if properties_match(&self.property, &other.property) {
            return Ok(true);
        }
        Ok(Property::common_power(
            &self.coefficient,
            &self.property,
            &other.coefficient,
            &other.property,
        )
        .is_some())
    }

    pub fn compare_to(&self, other: &UnifiedReal) -> Result<Ordering, CrealError> {
        let self_sign = self.sign()?;
        let other_sign = other.sign()?;
        if self_sign != other_sign {
            return Ok(self_sign.cmp(&other_sign));
        }
        if self_sign == 0 {
            return Ok(Ordering::Equal);
        }
        if properties_match(&self.property, &other.property) {
            return Ok(self.coefficient.compare_to(&other.coefficient));
        }
        if let Some((pow_a, pow_b)) = Property::common_power(
            &self.coefficient,
            &self.property,
            &other.coefficient,
            &other.property,
        ) {
            let ord = pow_a.compare_to(&pow_b);
            return Ok(if self_sign < 0 { ord.reverse() } else { ord });
        }
        let diff = self.subtract(other);
        let sign = diff.sign()?;
        Ok(sign.cmp(&0))
    }
}
