// creal: exact real arithmetic
// unified/property.rs
//
// The symbolic tag half of a unified real: a small
// closed algebra of named irrational forms plus an opaque fallback for
// everything else.

use std::fmt;

use crate::cr::{pi, Cr};
use crate::rational::BoundedRational;

/// The irrational factor multiplying a unified real's rational coefficient.
/// Each named variant is "decidable" in the sense that [`Property::combine`]
/// and the equality/sign checks in `unified/compare.rs` can recognize
/// algebraic identities among values that share one (`sqrt(a) * sqrt(b) =
/// sqrt(ab)`, `exp(a) * exp(b) = exp(a+b)`, etc.) without ever consulting
/// the underlying constructive real. `Irrational` is the fallback for a
/// value built by composing these in a way the algebra doesn't recognize;
/// it is never wrong, just not symbolically decidable.
#[derive(Clone, Debug)]
pub(crate) enum Property {
    One,
    Pi,
    Sqrt(BoundedRational),
    Exp(BoundedRational),
    Ln(BoundedRational),
    SinPi(BoundedRational),
    TanPi(BoundedRational),
    Asin(BoundedRational),
    Atan(BoundedRational),
    /// Base-10 logarithm of `r`, normalized so `r > 1` and `r` is not an
    /// exact integer power of ten (those cases collapse to `Property::One`
    /// at construction, mirroring `Sqrt`'s square-factor normalization).
    Log(BoundedRational),
    Irrational(Cr),
}

impl Property {
    pub(crate) fn cr_value(&self) -> Cr {
        match self {
            Property::One => Cr::from_int(1i64),
            Property::Pi => pi(),
            Property::Sqrt(r) => rational_to_cr(r).sqrt(),
            Property::Exp(r) => rational_to_cr(r).exp(),
            Property::Ln(r) => rational_to_cr(r).ln(),
            Property::SinPi(r) => pi().multiply(&rational_to_cr(r)).sin(),
            Property::TanPi(r) => pi().multiply(&rational_to_cr(r)).tan(),
            Property::Asin(r) => rational_to_cr(r).asin(),
            Property::Atan(r) => rational_to_cr(r).atan(),
            Property::Log(r) => rational_to_cr(r).ln().divide(&Cr::from_int(10i64).ln()),
            Property::Irrational(cr) => cr.clone(),
        }
    }

    /// Whether every value of this symbolic form (with a nonzero rational
    /// coefficient) is strictly positive, letting comparison skip straight
    /// to the coefficient's sign instead of falling back to the
    /// constructive real (`UnifiedReal::compare_to`'s
    /// fast path).
    pub(crate) fn always_positive(&self) -> bool {
        match self {
            Property::One | Property::Pi | Property::Exp(_) => true,
            // By normalization, a stored `Log` residue is always `> 1`.
            Property::Log(_) => true,
            Property::Sqrt(r) => r.sign() > 0,
            _ => false,
        }
    }

    /// Whether `self` and `other` are provably algebraically independent as
    /// irrational factors: no nonzero rational linear combination of the
    /// two can vanish, so a unified real carrying one can never equal one
    /// carrying the other (as long as neither coefficient is already zero —
    /// the caller's job to check). Sound for every named form below; the
    /// opaque `Irrational` fallback is never claimed independent of
    /// anything, since nothing is known about what it actually holds.
    pub(crate) fn definitely_independent(&self, other: &Property) -> bool {
        if properties_match(self, other) {
            return false;
        }
        !matches!(self, Property::Irrational(_)) && !matches!(other, Property::Irrational(_))
    }

    /// For a pair of values whose magnitude is decidable by raising both to
    /// a common integer power (currently: two nonzero `Sqrt` terms, compared
    /// by squaring), returns the two rational powers to compare instead of
    /// the original irrational values. `None` when no such reduction is
    /// known, in which case the caller falls back to the constructive real.
    pub(crate) fn common_power(
        coeff_a: &BoundedRational,
        a: &Property,
        coeff_b: &BoundedRational,
        b: &Property,
    ) -> Option<(BoundedRational, BoundedRational)> {
        if let (Property::Sqrt(ra), Property::Sqrt(rb)) = (a, b) {
            let squared_a = coeff_a.multiply(coeff_a)?.multiply(ra)?;
            let squared_b = coeff_b.multiply(coeff_b)?.multiply(rb)?;
            return Some((squared_a, squared_b));
        }
        None
    }

    /// Attempts to fold `self` and `other` (both multiplied by their own
    /// rational coefficients `r_self` and `r_other`) into a single
    /// `(coefficient, property)` pair. Returns `None` when the two
    /// properties don't combine algebraically, letting the caller fall
    /// back to a opaque product.
    pub(crate) fn try_multiply(
        r_self: &BoundedRational,
        self_: &Property,
        r_other: &BoundedRational,
        other: &Property,
    ) -> Option<(BoundedRational, Property)> {
        match (self_, other) {
            (Property::One, p) | (p, Property::One) => {
                let coeff = r_self.multiply(r_other)?;
                Some((coeff, p.clone()))
            }
            (Property::Sqrt(a), Property::Sqrt(b)) => {
                let product = a.multiply(b)?;
                let coeff = r_self.multiply(r_other)?;
                Some(fold_sqrt(coeff, product))
            }
            (Property::Exp(a), Property::Exp(b)) => {
                let sum = a.add(b)?;
                let coeff = r_self.multiply(r_other)?;
                Some(fold_exp(coeff, sum))
            }
            _ => None,
        }
    }

    /// As [`Property::try_multiply`], but for addition: only combines when
    /// both sides carry the *same* property, in which case the rational
    /// coefficients simply add.
    pub(crate) fn try_add(
        r_self: &BoundedRational,
        self_: &Property,
        r_other: &BoundedRational,
        other: &Property,
    ) -> Option<(BoundedRational, Property)> {
        if properties_match(self_, other) {
            let coeff = r_self.add(r_other)?;
            Some((coeff, self_.clone()))
        } else {
            None
        }
    }
}

/// Folds a `coeff * sqrt(value)` pair down to `Property::One` whenever
/// `value` is itself a perfect square, and otherwise pulls out whatever
/// square factor `value` carries (cheaply, via trial division) so the
/// surviving `Sqrt` residue is smaller.
fn fold_sqrt(coeff: BoundedRational, value: BoundedRational) -> (BoundedRational, Property) {
    if value == BoundedRational::one() {
        return (coeff, Property::One);
    }
    if let Some(exact) = value.exact_nth_root(2) {
        return (
            coeff.multiply(&exact).unwrap_or(coeff),
            Property::One,
        );
    }
    let (factor, residual) = value.extract_square_factor();
    let new_coeff = coeff.multiply(&factor).unwrap_or(coeff);
    (new_coeff, Property::Sqrt(residual))
}

fn fold_exp(coeff: BoundedRational, exponent: BoundedRational) -> (BoundedRational, Property) {
    if exponent.is_zero() {
        (coeff, Property::One)
    } else {
        (coeff, Property::Exp(exponent))
    }
}

pub(crate) fn properties_match(a: &Property, b: &Property) -> bool {
    matches!(
        (a, b),
        (Property::One, Property::One)
            | (Property::Pi, Property::Pi)
            | (Property::Sqrt(_), Property::Sqrt(_))
            | (Property::Exp(_), Property::Exp(_))
            | (Property::Ln(_), Property::Ln(_))
            | (Property::SinPi(_), Property::SinPi(_))
            | (Property::TanPi(_), Property::TanPi(_))
            | (Property::Asin(_), Property::Asin(_))
            | (Property::Atan(_), Property::Atan(_))
            | (Property::Log(_), Property::Log(_))
    ) && same_payload(a, b)
}

fn same_payload(a: &Property, b: &Property) -> bool {
    match (a, b) {
        (Property::Sqrt(x), Property::Sqrt(y))
        | (Property::Exp(x), Property::Exp(y))
        | (Property::Ln(x), Property::Ln(y))
        | (Property::SinPi(x), Property::SinPi(y))
        | (Property::TanPi(x), Property::TanPi(y))
        | (Property::Asin(x), Property::Asin(y))
        | (Property::Atan(x), Property::Atan(y))
        | (Property::Log(x), Property::Log(y)) => x == y,
        (Property::One, Property::One) | (Property::Pi, Property::Pi) => true,
        _ => false,
    }
}

fn rational_to_cr(r: &BoundedRational) -> Cr {
    Cr::from_int(r.numerator().clone()).divide(&Cr::from_int(r.denominator().clone()))
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::One => write!(f, ""),
            Property::Pi => write!(f, "\u{03c0}"),
            Property::Sqrt(r) => write!(f, "sqrt({r})"),
            Property::Exp(r) => write!(f, "e^({r})"),
            Property::Ln(r) => write!(f, "ln({r})"),
            Property::SinPi(r) => write!(f, "sin({r}\u{03c0})"),
            Property::TanPi(r) => write!(f, "tan({r}\u{03c0})"),
            Property::Asin(r) => write!(f, "asin({r})"),
            Property::Atan(r) => write!(f, "atan({r})"),
            Property::Log(r) => write!(f, "log({r})"),
            Property::Irrational(_) => write!(f, "?"),
        }
    }
}
