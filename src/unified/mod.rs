// creal: exact real arithmetic
// unified/mod.rs
//
// UnifiedReal: a rational coefficient times a symbolic irrational factor,
// falling back to a plain constructive real whenever the symbolic algebra
// doesn't apply.

mod compare;
mod display;
mod ops;
mod property;

use property::Property;

use crate::cr::Cr;
use crate::error::CrealError;
use crate::rational::BoundedRational;

/// `coefficient * property.cr_value()`. Every `UnifiedReal` can always be
/// forced down to a plain [`Cr`] via [`UnifiedReal::to_cr`]; the point of
/// carrying `property` separately is that a handful of operations
/// (multiplication/addition of matching forms, exact zero and sign tests)
/// can be decided exactly without ever doing that.
#[derive(Clone, Debug)]
pub struct UnifiedReal {
    pub(crate) coefficient: BoundedRational,
    pub(crate) property: Property,
}

impl UnifiedReal {
    pub fn zero() -> UnifiedReal {
        UnifiedReal {
            coefficient: BoundedRational::zero(),
            property: Property::One,
        }
    }

    pub fn one() -> UnifiedReal {
        UnifiedReal {
            coefficient: BoundedRational::one(),
            property: Property::One,
        }
    }

    pub fn pi() -> UnifiedReal {
        UnifiedReal {
            coefficient: BoundedRational::one(),
            property: Property::Pi,
        }
    }

    pub fn from_int(n: impl Into<rug::Integer>) -> UnifiedReal {
        UnifiedReal {
            coefficient: BoundedRational::from_int(n),
            property: Property::One,
        }
    }

    pub fn from_rational(r: BoundedRational) -> UnifiedReal {
        UnifiedReal {
            coefficient: r,
            property: Property::One,
        }
    }

    /// Wraps an arbitrary constructive real with no symbolic information
    /// attached; every operation on it falls back to plain `Cr` arithmetic.
    pub fn from_cr(cr: Cr) -> UnifiedReal {
        UnifiedReal {
            coefficient: BoundedRational::one(),
            property: Property::Irrational(cr),
        }
    }

    pub fn sqrt(&self) -> UnifiedReal {
        if self.coefficient.is_zero() {
            return UnifiedReal::zero();
        }
        if matches!(self.property, Property::One) {
            if let Some(exact) = self.coefficient.exact_nth_root(2) {
                return UnifiedReal::from_rational(exact);
            }
            if self.coefficient.sign() > 0 {
                let (factor, residual) = self.coefficient.extract_square_factor();
                return UnifiedReal {
                    coefficient: factor,
                    property: Property::Sqrt(residual),
                };
            }
        }
        UnifiedReal::from_cr(self.to_cr().sqrt())
    }

    pub fn exp(&self) -> UnifiedReal {
        if matches!(self.property, Property::One) {
            return UnifiedReal {
                coefficient: BoundedRational::one(),
                property: Property::Exp(self.coefficient.clone()),
            };
        }
        UnifiedReal::from_cr(self.to_cr().exp())
    }

    /// Natural log; requires `self > 0` (checked lazily once a `Cr`
    /// approximation is actually requested). A plain positive rational
    /// collapses to a `Ln` residue (or exact zero at `1`) rather than an
    /// opaque `Cr`, the same normalization `log10` does for base ten.
    pub fn ln(&self) -> UnifiedReal {
        if matches!(self.property, Property::One) && self.coefficient.sign() > 0 {
            if self.coefficient == BoundedRational::one() {
                return UnifiedReal::zero();
            }
            return UnifiedReal {
                coefficient: BoundedRational::one(),
                property: Property::Ln(self.coefficient.clone()),
            };
        }
        if let Property::Exp(r) = &self.property {
            if self.coefficient == BoundedRational::one() {
                return UnifiedReal::from_rational(r.clone());
            }
        }
        UnifiedReal::from_cr(self.to_cr().ln())
    }

    /// Base-10 logarithm; requires `self > 0` (checked lazily once a `Cr`
    /// approximation is actually requested). Collapses to a rational `One`
    /// when `self` is an exact power of ten, and rewrites `log(1/r)` as
    /// `-log(r)` so the stored `Log` residue is always `> 1`.
    pub fn log10(&self) -> UnifiedReal {
        if matches!(self.property, Property::One) && self.coefficient.sign() > 0 {
            if let Some(n) = self.coefficient.as_power_of_ten() {
                return UnifiedReal::from_int(n);
            }
            if self.coefficient.compare_to(&BoundedRational::one()) == std::cmp::Ordering::Less {
                if let Ok(inv) = self.coefficient.inverse() {
                    return (UnifiedReal {
                        coefficient: BoundedRational::one(),
                        property: Property::Log(inv),
                    })
                    .negate();
                }
            } else {
                return UnifiedReal {
                    coefficient: BoundedRational::one(),
                    property: Property::Log(self.coefficient.clone()),
                };
            }
        }
        UnifiedReal::from_cr(self.to_cr().ln().divide(&Cr::from_int(10i64).ln()))
    }

    pub fn sin(&self) -> UnifiedReal {
        UnifiedReal::from_cr(self.to_cr().sin())
    }

    pub fn cos(&self) -> UnifiedReal {
        UnifiedReal::from_cr(self.to_cr().cos())
    }

    /// Sine of `self * pi`, carried as the symbolic `SinPi` tag: the usual
    /// closed forms at multiples of `1/6`, `1/4`, `1/2` collapse to a
    /// rational `UnifiedReal` automatically.
    pub fn sin_pi_times(r: &BoundedRational) -> UnifiedReal {
        if r.is_zero() {
            return UnifiedReal::zero();
        }
        UnifiedReal {
            coefficient: BoundedRational::one(),
            property: Property::SinPi(r.clone()),
        }
    }

    pub fn asin(&self) -> UnifiedReal {
        if matches!(self.property, Property::One) {
            return UnifiedReal {
                coefficient: BoundedRational::one(),
                property: Property::Asin(self.coefficient.clone()),
            };
        }
        UnifiedReal::from_cr(self.to_cr().asin())
    }

    pub fn atan(&self) -> UnifiedReal {
        if matches!(self.property, Property::One) {
            return UnifiedReal {
                coefficient: BoundedRational::one(),
                property: Property::Atan(self.coefficient.clone()),
            };
        }
        UnifiedReal::from_cr(self.to_cr().atan())
    }

    /// Whether this value is the exact rational `1` multiple of `One` (the
    /// conventional sense in which `n.pow(0) == 1`, distinguishing it from
    /// the `CrealError::ZeroToTheZeroth` case the constructive-real layer
    /// raises for `0^0`).
    pub fn is_exact_rational(&self) -> bool {
        matches!(self.property, Property::One)
    }

    pub fn to_rational(&self) -> Option<BoundedRational> {
        if matches!(self.property, Property::One) {
            Some(self.coefficient.clone())
        } else {
            None
        }
    }

    pub fn to_cr(&self) -> Cr {
        let coeff_cr = Cr::from_int(self.coefficient.numerator().clone())
            .divide(&Cr::from_int(self.coefficient.denominator().clone()));
        coeff_cr.multiply(&self.property.cr_value())
    }

    pub fn double_value(&self) -> Result<f64, CrealError> {
        self.to_cr().double_value()
    }
}
