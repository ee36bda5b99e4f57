// creal: exact real arithmetic
// unified/ops.rs
//
// Arithmetic on unified reals: symbolic combination where the property
// algebra recognizes it, falling back to an opaque constructive-real
// combination otherwise.

use std::ops::{Add, Div, Mul, Neg, Sub};

use rug::Integer;

use super::property::Property;
use super::UnifiedReal;
use crate::error::CrealError;
use crate::rational::BoundedRational;

impl UnifiedReal {
    pub fn negate(&self) -> UnifiedReal {
        UnifiedReal {
            coefficient: self.coefficient.negate(),
            property: self.property.clone(),
        }
    }

    pub fn add(&self, other: &UnifiedReal) -> UnifiedReal {
        if self.coefficient.is_zero() {
            return other.clone();
        }
        if other.coefficient.is_zero() {
            return self.clone();
        }
        if let Some((coeff, prop)) = Property::try_add(
            &self.coefficient,
            &self.property,
            &other.coefficient,
            &other.property,
        ) {
            return UnifiedReal {
                coefficient: coeff,
                property: prop,
            };
        }
        UnifiedReal::from_cr(self.to_cr().add(&other.to_cr()))
    }

    pub fn subtract(&self, other: &UnifiedReal) -> UnifiedReal {
        self.add(&other.negate())
    }

    pub fn multiply(&self, other: &UnifiedReal) -> UnifiedReal {
        if self.coefficient.is_zero() || other.coefficient.is_zero() {
            return UnifiedReal::zero();
        }
        if let Some((coeff, prop)) = Property::try_multiply(
            &self.coefficient,
            &self.property,
            &other.coefficient,
            &other.property,
        ) {
            return UnifiedReal {
                coefficient: coeff,
                property: prop,
            };
        }
        UnifiedReal::from_cr(self.to_cr().multiply(&other.to_cr()))
    }

    /// The multiplicative inverse. `Sqrt`, `Exp`, and plain rationals
    /// invert symbolically (`1/sqrt(r) = sqrt(1/r)`, `1/e^r = e^(-r)`);
    /// everything else falls back to the constructive real.
    pub fn inverse(&self) -> UnifiedReal {
        match &self.property {
            Property::One => UnifiedReal {
                coefficient: match self.coefficient.inverse() {
                    Ok(r) => r,
                    Err(_) => return UnifiedReal::from_cr(self.to_cr().inverse()),
                },
                property: Property::One,
            },
            Property::Exp(r) => UnifiedReal {
                coefficient: match self.coefficient.inverse() {
                    Ok(r) => r,
                    Err(_) => return UnifiedReal::from_cr(self.to_cr().inverse()),
                },
                property: Property::Exp(r.negate()),
            },
            Property::Sqrt(r) => match (self.coefficient.inverse(), r.inverse()) {
                (Ok(coeff_inv), Ok(r_inv)) => UnifiedReal {
                    coefficient: coeff_inv,
                    property: Property::Sqrt(r_inv),
                },
                _ => UnifiedReal::from_cr(self.to_cr().inverse()),
            },
            _ => UnifiedReal::from_cr(self.to_cr().inverse()),
        }
    }

    /// `ln(x) / ln(10)` is recognized directly as `log(x)` rather than
    /// routed through the generic `Ln` inverse, so e.g. `ln(100) / ln(10)`
    /// collapses to the exact rational `2` instead of an opaque CR division.
    pub fn divide(&self, other: &UnifiedReal) -> UnifiedReal {
        if let (Property::Ln(x), Property::Ln(ten)) = (&self.property, &other.property) {
            if *ten == BoundedRational::from_int(10) {
                if let Ok(Some(ratio)) = self.coefficient.divide(&other.coefficient) {
                    let log_x = UnifiedReal::from_rational(x.clone()).log10();
                    return log_x.multiply(&UnifiedReal::from_rational(ratio));
                }
            }
        }
        self.multiply(&other.inverse())
    }

    /// Raises `self` to the power `exp`. A handful of symbolic shortcuts —
    /// `e^x = exp(x)`, `10^(r*log(s)) = s^r`, integer and rational exponents
    /// via repeated squaring — are tried before falling back to
    /// `exp(exp * ln(self))`.
    pub fn pow(&self, exp: &UnifiedReal) -> Result<UnifiedReal, CrealError> {
        if self.coefficient.is_zero() {
            return match exp.sign()? {
                0 => Err(CrealError::ZeroToTheZeroth),
                n if n < 0 => Err(CrealError::Arithmetic(
                    "zero raised to a negative power".into(),
                )),
                _ => Ok(UnifiedReal::zero()),
            };
        }
        if exp.coefficient.is_zero() {
            return Ok(UnifiedReal::one());
        }

        // An exact integer exponent works for a base of any sign.
        if let Some(r) = exp.to_rational() {
            if *r.denominator() == 1 {
                if let Some(n) = r.numerator().to_i64() {
                    return Ok(self.pow_int(n));
                }
            }
        }

        if self.sign()? < 0 {
            return Err(CrealError::Arithmetic(
                "negative base raised to a non-integer exponent".into(),
            ));
        }

        // e^x = exp(x).
        if let Property::Exp(r) = &self.property {
            if self.coefficient == BoundedRational::one() && *r == BoundedRational::one() {
                return Ok(exp.exp());
            }
        }

        // 10^(r * log(s)) = s^r.
        if matches!(self.property, Property::One) && self.coefficient == BoundedRational::from_int(10)
        {
            if let Property::Log(s) = &exp.property {
                if let (Some(p), Some(q)) = (
                    exp.coefficient.numerator().to_i64(),
                    exp.coefficient.denominator().to_i64(),
                ) {
                    return Ok(UnifiedReal::from_rational(s.clone()).pow_rational(p, q));
                }
            }
        }

        // Exact rational, non-integer exponent of a nonnegative base.
        if let Some(r) = exp.to_rational() {
            if let (Some(p), Some(q)) = (r.numerator().to_i64(), r.denominator().to_i64()) {
                return Ok(self.pow_rational(p, q));
            }
        }

        Ok(exp.multiply(&self.ln()).exp())
    }

    /// Generalized factorial: `n * (n - step) * (n - 2*step) * ...` down to
    /// the first term `<= 0`. `TooBig` guards an absurdly large computation
    /// (above `2^18`) or an oversized exact result.
    pub fn generalized_fact(&self, step: i64) -> Result<UnifiedReal, CrealError> {
        let n = self
            .to_rational()
            .ok_or_else(|| CrealError::Domain("factorial of a non-integer value".into()))?;
        if *n.denominator() != 1 {
            return Err(CrealError::Domain("factorial of a non-integer value".into()));
        }
        let n_int = n.numerator().clone();
        if n_int < 0 {
            return Err(CrealError::Domain("factorial of a negative value".into()));
        }
        let limit = Integer::from(1) << 18u32;
        if n_int > limit {
            return Err(CrealError::TooBig("factorial argument exceeds 2^18".into()));
        }
        let step = Integer::from(step);
        let mut result = BoundedRational::one();
        let mut k = n_int;
        while k > 0 {
            result = result
                .multiply(&BoundedRational::from_int(k.clone()))
                .ok_or_else(|| CrealError::TooBig("factorial result exceeds the size budget".into()))?;
            k -= &step;
        }
        Ok(UnifiedReal::from_rational(result))
    }

    /// The ordinary factorial, `n * (n-1) * ... * 1`.
    pub fn fact(&self) -> Result<UnifiedReal, CrealError> {
        self.generalized_fact(1)
    }

    /// Integer power, by repeated squaring through [`UnifiedReal::multiply`]
    /// so the symbolic algebra still applies at every step.
    pub fn pow_int(&self, mut n: i64) -> UnifiedReal {
        if n < 0 {
            return self.pow_int(-n).inverse();
        }
        if n == 0 {
            return UnifiedReal::one();
        }
        let mut result = UnifiedReal::one();
        let mut base = self.clone();
        while n > 0 {
            if n & 1 == 1 {
                result = result.multiply(&base);
            }
            base = base.multiply(&base);
            n >>= 1;
        }
        result
    }

    /// `self^(p/q)`, via `exp((p/q) * ln(self))` with the symbolic square
    /// root path tried first for `q == 2`.
    pub fn pow_rational(&self, p: i64, q: i64) -> UnifiedReal {
        if q == 2 {
            let sqrt = self.sqrt();
            return sqrt.pow_int(p);
        }
        let exponent = UnifiedReal::from_rational(
            BoundedRational::from_fraction(p, q)
                .ok()
                .flatten()
                .unwrap_or_else(BoundedRational::zero),
        );
        exponent.multiply(&self.ln()).exp()
    }
}

impl Add for UnifiedReal {
    type Output = UnifiedReal;
    fn add(self, rhs: UnifiedReal) -> UnifiedReal {
        UnifiedReal::add(&self, &rhs)
    }
}
impl Sub for UnifiedReal {
    type Output = UnifiedReal;
    fn sub(self, rhs: UnifiedReal) -> UnifiedReal {
        UnifiedReal::subtract(&self, &rhs)
    }
}
impl Mul for UnifiedReal {
    type Output = UnifiedReal;
    fn mul(self, rhs: UnifiedReal) -> UnifiedReal {
        UnifiedReal::multiply(&self, &rhs)
    }
}
impl Div for UnifiedReal {
    type Output = UnifiedReal;
    fn div(self, rhs: UnifiedReal) -> UnifiedReal {
        UnifiedReal::divide(&self, &rhs)
    }
}
impl Neg for UnifiedReal {
    type Output = UnifiedReal;
    fn neg(self) -> UnifiedReal {
        UnifiedReal::negate(&self)
    }
}
