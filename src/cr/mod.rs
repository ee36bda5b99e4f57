// creal: exact real arithmetic
// cr/mod.rs
//
// Public constructive-real surface: construction, operator overloads, the
// transcendental function set, comparison, and display.

mod leaf;
mod node;
mod solver;
mod transcendental;
mod unary;

pub use node::Cr;

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use rug::Integer;

use crate::cancel::CancellationFlag;
use crate::error::CrealError;
use crate::scaled::{prec_add, scale};

use leaf::{AddNode, AssumedIntNode, InverseNode, IntNode, MultiplyNode, NegateNode, SelectNode, ShiftedNode};
use transcendental::{GaussLegendrePiNode, SqrtNode};
use unary::{AcosNode, AsinNode, AtanNode, CosNode, ExpNode, LnNode, MachinPiNode, SinNode, TanNode};

impl Cr {
    /// The constant zero, constructed directly rather than via `from_int`
    /// so it carries no indirection.
    pub fn zero() -> Cr {
        Cr::new(IntNode(Integer::new()))
    }

    /// The constructive real with exact value `n`.
    pub fn from_int(n: impl Into<Integer>) -> Cr {
        Cr::new(IntNode(n.into()))
    }

    /// The constructive real with exact value `n / 2^k` (`k` may be
    /// negative, giving `n * 2^(-k)`).
    pub fn from_shifted_int(n: impl Into<Integer>, k: i32) -> Cr {
        Cr::new(ShiftedNode(Cr::from_int(n.into()), k))
    }

    /// Builds a constructive real from an `f64`, decomposed into its exact
    /// mantissa and binary exponent (no double-rounding through a decimal
    /// intermediate).
    pub fn from_f64(x: f64) -> Result<Cr, CrealError> {
        if !x.is_finite() {
            return Err(CrealError::Domain("constructive real from a non-finite f64".into()));
        }
        if x == 0.0 {
            return Ok(Cr::zero());
        }
        let bits = x.to_bits();
        let sign = if bits >> 63 == 1 { -1i64 } else { 1 };
        let raw_exp = ((bits >> 52) & 0x7ff) as i32;
        let raw_mantissa = bits & ((1u64 << 52) - 1);
        let (mantissa, exp) = if raw_exp == 0 {
            (raw_mantissa, -1074)
        } else {
            (raw_mantissa | (1u64 << 52), raw_exp - 1075)
        };
        let signed_mantissa = Integer::from(mantissa) * sign;
        Ok(Cr::from_shifted_int(signed_mantissa, exp))
    }

    /// This value's nearest `f64`, by sampling the approximation at a
    /// precision fine enough to round correctly and converting through
    /// `rug`'s native float conversion.
    pub fn double_value(&self) -> Result<f64, CrealError> {
        let msd = self.refine_msd(-1100)?;
        if msd == i32::MIN {
            return Ok(0.0);
        }
        let p = msd - 60;
        let appr = self.get_approximation(p)?;
        Ok(appr.to_f64() * 2f64.powi(p))
    }

    pub fn add(&self, other: &Cr) -> Cr {
        Cr::new(AddNode(self.clone(), other.clone()))
    }

    pub fn negate(&self) -> Cr {
        Cr::new(NegateNode(self.clone()))
    }

    pub fn subtract(&self, other: &Cr) -> Cr {
        self.add(&other.negate())
    }

    pub fn multiply(&self, other: &Cr) -> Cr {
        Cr::new(MultiplyNode(self.clone(), other.clone()))
    }

    /// The multiplicative inverse. Fails lazily: a zero divisor only
    /// surfaces a [`CrealError::DivideByZero`] once someone actually
    /// requests an approximation.
    pub fn inverse(&self) -> Cr {
        Cr::new(InverseNode(self.clone()))
    }

    pub fn divide(&self, other: &Cr) -> Cr {
        self.multiply(&other.inverse())
    }

    pub fn shift(&self, k: i32) -> Cr {
        Cr::new(ShiftedNode(self.clone(), k))
    }

    /// Selects `if self < 0 { low } else { high }`, without ever fully
    /// resolving `self`'s sign if `low` and `high` already agree to within
    /// one ulp at the requested precision.
    pub fn select(&self, low: &Cr, high: &Cr) -> Cr {
        Cr::new(SelectNode(self.clone(), low.clone(), high.clone()))
    }

    /// Asserts that this value is an integer, allowing precision requests
    /// coarser than needed for a general real to resolve without
    /// recomputation.
    pub fn assume_int(&self) -> Cr {
        Cr::new(AssumedIntNode(self.clone()))
    }

    pub fn sqrt(&self) -> Cr {
        Cr::new(SqrtNode::new(self.clone()))
    }

    pub fn exp(&self) -> Cr {
        Cr::new(ExpNode(self.clone()))
    }

    /// Natural log; fails lazily with [`CrealError::Domain`] once an
    /// approximation is actually requested for a non-positive value.
    pub fn ln(&self) -> Cr {
        Cr::new(LnNode::new(self.clone()))
    }

    pub fn sin(&self) -> Cr {
        Cr::new(SinNode {
            x: self.clone(),
            half_pi: half_pi(),
        })
    }

    pub fn cos(&self) -> Cr {
        Cr::new(CosNode(self.clone()))
    }

    pub fn tan(&self) -> Cr {
        Cr::new(TanNode {
            x: self.clone(),
            half_pi: half_pi(),
        })
    }

    pub fn asin(&self) -> Cr {
        Cr::new(AsinNode::new(self.clone(), half_pi()))
    }

    pub fn acos(&self) -> Cr {
        Cr::new(AcosNode {
            x: self.clone(),
            half_pi: half_pi(),
        })
    }

    pub fn atan(&self) -> Cr {
        Cr::new(AtanNode {
            x: self.clone(),
            half_pi: half_pi(),
        })
    }

    /// `self` raised to an integer power, by repeated squaring (exact for
    /// `self` of any sign, unlike `(y * self.ln()).exp()`).
    pub fn pow_int(&self, mut n: i64) -> Cr {
        if n < 0 {
            return self.pow_int(-n).inverse();
        }
        let mut result = Cr::from_int(1i64);
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

    /// `self` raised to a constructive-real power, via `exp(y * ln(self))`.
    /// Requires `self > 0`.
    pub fn pow(&self, y: &Cr) -> Cr {
        y.multiply(&self.ln()).exp()
    }

    /// Three-way comparison, bounded to the requested precision: returns
    /// `Ordering::Equal` once the two values are known to agree to within
    /// `2^p`, without ever claiming a stronger result than that.
    pub fn compare_to(&self, other: &Cr, p: i32) -> Result<Ordering, CrealError> {
        self.compare_to_with(other, p, &CancellationFlag::global())
    }

    pub(crate) fn compare_to_with(
        &self,
        other: &Cr,
        p: i32,
        cancel: &CancellationFlag,
    ) -> Result<Ordering, CrealError> {
        let diff = self.subtract(other);
        let msd = diff.refine_msd_with(p, cancel)?;
        if msd == i32::MIN || msd < p {
            return Ok(Ordering::Equal);
        }
        Ok(diff.sign_with(msd, cancel)?.cmp(&0))
    }

    /// Full sign comparison with no precision bound: doubles the working
    /// precision until the two values provably differ, looping forever on
    /// a genuinely equal pair (matching `msd`'s own
    /// non-termination on zero).
    pub fn compare_to_unbounded(&self, other: &Cr) -> Result<Ordering, CrealError> {
        let diff = self.subtract(other);
        let cancel = CancellationFlag::global();
        let mut p = -20i32;
        loop {
            cancel.check()?;
            let sign = diff.sign_with(p, &cancel)?;
            if sign != 0 {
                return Ok(sign.cmp(&0));
            }
            p = prec_add(p, p);
        }
    }

    /// Renders a decimal approximation with `digits` digits after the
    /// point (truncated toward zero at the final digit boundary, matching
    /// the library's own rounding convention for negative-precision
    /// shifts).
    pub fn to_decimal_string(&self, digits: u32) -> Result<String, CrealError> {
        let mut scale_factor = Integer::from(1);
        for _ in 0..digits {
            scale_factor *= 10;
        }
        let scaled = self.multiply(&Cr::from_int(scale_factor));
        let p = -4 - (digits as i32) * 4; // comfortably finer than one decimal digit
        let appr = scaled.get_approximation(p)?;
        let rounded = scale(&appr, p);
        let negative = rounded < 0;
        let magnitude = rounded.abs();
        let s = magnitude.to_string();
        let s = if (s.len() as u32) <= digits {
            format!("{:0>width$}", s, width = digits as usize + 1)
        } else {
            s
        };
        let (int_part, frac_part) = s.split_at(s.len() - digits as usize);
        let mut out = String::new();
        if negative && (int_part.parse::<u64>().unwrap_or(0) != 0 || frac_part.chars().any(|c| c != '0')) {
            out.push('-');
        }
        out.push_str(int_part);
        if digits > 0 {
            out.push('.');
            out.push_str(frac_part);
        }
        Ok(out)
    }
}

impl fmt::Display for Cr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal_string(10) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("<creal: error>"),
        }
    }
}

impl Add for Cr {
    type Output = Cr;
    fn add(self, rhs: Cr) -> Cr {
        Cr::add(&self, &rhs)
    }
}
impl Sub for Cr {
    type Output = Cr;
    fn sub(self, rhs: Cr) -> Cr {
        Cr::subtract(&self, &rhs)
    }
}
impl Mul for Cr {
    type Output = Cr;
    fn mul(self, rhs: Cr) -> Cr {
        Cr::multiply(&self, &rhs)
    }
}
impl Div for Cr {
    type Output = Cr;
    fn div(self, rhs: Cr) -> Cr {
        Cr::divide(&self, &rhs)
    }
}
impl Neg for Cr {
    type Output = Cr;
    fn neg(self) -> Cr {
        Cr::negate(&self)
    }
}

impl<'a> Add<&'a Cr> for &'a Cr {
    type Output = Cr;
    fn add(self, rhs: &'a Cr) -> Cr {
        Cr::add(self, rhs)
    }
}
impl<'a> Sub<&'a Cr> for &'a Cr {
    type Output = Cr;
    fn sub(self, rhs: &'a Cr) -> Cr {
        Cr::subtract(self, rhs)
    }
}
impl<'a> Mul<&'a Cr> for &'a Cr {
    type Output = Cr;
    fn mul(self, rhs: &'a Cr) -> Cr {
        Cr::multiply(self, rhs)
    }
}
impl<'a> Div<&'a Cr> for &'a Cr {
    type Output = Cr;
    fn div(self, rhs: &'a Cr) -> Cr {
        Cr::divide(self, rhs)
    }
}

thread_local! {
    static PI_CACHE: RefCell<Option<Cr>> = RefCell::new(None);
    static HALF_PI_CACHE: RefCell<Option<Cr>> = RefCell::new(None);
    static MACHIN_PI_CACHE: RefCell<Option<Cr>> = RefCell::new(None);
}

/// Pi, via the Gauss-Legendre AGM iteration. Cached per-thread since `Cr`'s
/// `Rc`-based sharing is not itself `Send`.
pub fn pi() -> Cr {
    PI_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        cache
            .get_or_insert_with(|| Cr::new(GaussLegendrePiNode::default()))
            .clone()
    })
}

/// Pi via Machin's formula rather than the AGM: slower per-digit but a
/// useful cross-check (and the fallback for `half_pi` below, before the
/// AGM's own squaring-driven error growth can compound into it).
pub fn pi_machin() -> Cr {
    MACHIN_PI_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        cache.get_or_insert_with(|| Cr::new(MachinPiNode::new())).clone()
    })
}

fn half_pi() -> Cr {
    HALF_PI_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        cache.get_or_insert_with(|| pi().shift(-1)).clone()
    })
}
