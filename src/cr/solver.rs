// creal: exact real arithmetic
// cr/solver.rs
//
// Generic monotone-function machinery: inverting a strictly increasing
// continuous function by bisection, and approximating its derivative by a
// central difference. Kept as generic fallback infrastructure alongside the
// dedicated transcendental nodes, not currently reached from the public API.

use rug::Integer;

use crate::cancel::CancellationFlag;
use crate::error::CrealError;
use crate::scaled::{prec_add, scale};

use super::leaf::IntNode;
use super::node::{Cr, CrNode};

/// A real-valued function built from `Cr` combinators, evaluated lazily at
/// a given point. Implementors close over whatever the function needs
/// (e.g. `x.exp_cr()` closes over nothing, `x.pow_cr(n)` closes over `n`).
pub(crate) trait MonotoneFn: std::fmt::Debug {
    fn apply(&self, x: &Cr) -> Cr;
}

/// Inverts a strictly increasing `f` against a `target` value, searching
/// within `[low, high]`, by bisection: the search interval always contains
/// the root because `f` is monotone, so the sign of `f(mid) - target`
/// alone decides which half survives.
#[derive(Debug)]
pub(crate) struct InverseIncreasingNode<F: MonotoneFn> {
    pub f: F,
    pub target: Cr,
    pub low: Cr,
    pub high: Cr,
}

impl<F: MonotoneFn> CrNode for InverseIncreasingNode<F> {
    fn is_slow(&self) -> bool {
        true
    }

    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        // Work one bit finer than requested so the final rounding step has
        // a clean half-ulp to round away.
        let wp = prec_add(p, -1);
        let mut lo = self.low.get_approximation_with(wp, cancel)?;
        let mut hi = self.high.get_approximation_with(wp, cancel)?;
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        let target_appr = self.target.get_approximation_with(wp, cancel)?;

        // Sloppy domain check: f is assumed strictly increasing, so the
        // target must fall within [f(low), f(high)] at this same bounded
        // precision. No exact resolution is attempted here, matching every
        // other comparison in this node.
        let f_lo = self.f.apply(&self.low).get_approximation_with(wp, cancel)?;
        let f_hi = self.f.apply(&self.high).get_approximation_with(wp, cancel)?;
        let (f_min, f_max) = if f_lo <= f_hi { (f_lo, f_hi) } else { (f_hi, f_lo) };
        if target_appr < f_min || target_appr > f_max {
            return Err(CrealError::Domain(
                "inverse-function target outside [f(low), f(high)]".into(),
            ));
        }

        loop {
            cancel.check()?;
            let width = Integer::from(&hi - &lo);
            if width <= 2 {
                break;
            }
            let mid = scale(&Integer::from(&lo + &hi), -1);
            let candidate = Cr::new(ShiftedInt(mid.clone(), wp));
            let f_mid = self.f.apply(&candidate).get_approximation_with(wp, cancel)?;
            if f_mid < target_appr {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        // lo and hi are both at precision wp; averaging and rescaling from
        // wp back down to the caller's p finishes the conversion.
        Ok(scale(&Integer::from(&lo + &hi), prec_add(prec_add(wp, -p), -1)))
    }
}

/// A constant `Cr` whose value is `scaled_value * 2^(-scale_prec)`, i.e. the
/// node produced by [`InverseIncreasingNode`]'s bisection to re-inject a
/// plain integer midpoint back into `Cr`-space for evaluating `f`.
#[derive(Debug)]
struct ShiftedInt(Integer, i32);
impl CrNode for ShiftedInt {
    fn approximate(&self, p: i32, _cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        Ok(scale(&self.0, prec_add(self.1, -p)))
    }
}

/// Central-difference derivative estimate: `(f(x+h) - f(x-h)) / 2h` with `h`
/// shrinking as more precision is demanded, for functions the catalogue exposes
/// only as "the derivative of a known monotone primitive" rather than by a
/// closed form of their own.
#[derive(Debug)]
pub(crate) struct MonotoneDerivativeNode<F: MonotoneFn> {
    pub f: F,
    pub x: Cr,
}

impl<F: MonotoneFn> CrNode for MonotoneDerivativeNode<F> {
    fn is_slow(&self) -> bool {
        true
    }

    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        // h = 2^hp, chosen far finer than the requested precision so the
        // O(h) discretization error stays below the requested ulp.
        let hp = prec_add(p, -20);
        let h = Cr::new(IntNode(Integer::from(1)));
        let h = super::leaf::ShiftedNode(h, hp);
        let h = Cr::new(h);

        let x_plus_h = super::leaf::AddNode(self.x.clone(), h.clone());
        let x_plus_h = Cr::new(x_plus_h);
        let neg_h = super::leaf::NegateNode(h.clone());
        let neg_h = Cr::new(neg_h);
        let x_minus_h = super::leaf::AddNode(self.x.clone(), neg_h);
        let x_minus_h = Cr::new(x_minus_h);

        let eval_p = prec_add(hp, -8);
        let f_plus = self.f.apply(&x_plus_h).get_approximation_with(eval_p, cancel)?;
        let f_minus = self.f.apply(&x_minus_h).get_approximation_with(eval_p, cancel)?;
        let diff = Integer::from(&f_plus - &f_minus);
        // diff is at scale eval_p; dividing by 2h (== 2^(hp+1)) shifts the
        // scale by -(hp + 1 - eval_p) to land at the requested p.
        let shift = eval_p - (hp + 1) - p;
        Ok(scale(&diff, shift))
    }
}
