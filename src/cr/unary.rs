// creal: exact real arithmetic
// cr/unary.rs
//
// Full-range unary functions built by reducing onto the prescaled series
// nodes in cr/transcendental.rs via range reduction.

use std::cell::RefCell;

use rug::Integer;

use crate::cancel::CancellationFlag;
use crate::error::CrealError;
use crate::scaled::scale;

use super::leaf::{AddNode, InverseNode, IntNode, MultiplyNode, NegateNode, ShiftedNode};
use super::node::{Cr, CrNode};
use super::transcendental::{
    IntegralAtanNode, PrescaledAsinNode, PrescaledCosNode, PrescaledExpNode, PrescaledLnNode,
    SqrtNode,
};

fn msd_or_min(x: &Cr, cancel: &CancellationFlag) -> Result<i32, CrealError> {
    x.refine_msd_with(0, cancel)
}

thread_local! {
    static LN_HALF_CACHE: RefCell<Option<Cr>> = RefCell::new(None);
}

/// `ln(1/2)`, cached per-thread: every `LnNode`'s range reduction needs the
/// same universal constant, so it's computed once per thread rather than
/// once per node.
fn ln_half() -> Cr {
    LN_HALF_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let one = Cr::new(IntNode(Integer::from(1)));
                let half = Cr::new(ShiftedNode(one.clone(), -1));
                let neg_half_arg = Cr::new(AddNode(half, Cr::new(NegateNode(one))));
                Cr::new(PrescaledLnNode(neg_half_arg))
            })
            .clone()
    })
}

/// `exp(x)` for arbitrary `x`: halves `x` until `|x/2^k| < 1/2`, evaluates
/// the Taylor series there, then squares the result `k` times to undo the
/// halving (`exp(x) = exp(x/2^k)^k^2`... really `(exp(x/2^k))^(2^k)` via `k`
/// repeated squarings).
#[derive(Debug)]
pub(crate) struct ExpNode(pub Cr);
impl CrNode for ExpNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let msd = msd_or_min(&self.0, cancel)?;
        let k = if msd == i32::MIN { 0 } else { (msd + 2).max(0) };
        // Extra guard bits: each of the k squarings can roughly double the
        // relative error, so evaluate the series this many bits finer.
        let guard = k + 32;
        let small_prec = p - guard;
        let scaled_x = Cr::new(ShiftedNode(self.0.clone(), -k));
        let series = PrescaledExpNode(scaled_x);
        let mut result = series.approximate(small_prec, cancel)?;
        let mut cur_prec = small_prec;
        for _ in 0..k {
            cancel.check()?;
            // square at the current scale, then rescale back to cur_prec
            let squared = scale(&Integer::from(&result * &result), cur_prec);
            result = squared;
        }
        Ok(scale(&result, cur_prec - p))
    }
}

/// `ln(x)` for `x > 0`: scales `x` by a power of two so the scaled value
/// lies in `(1/2, 3/2)`, evaluates `ln(1 + r)` via the Taylor series, and
/// adds back `k * ln(2)` (itself computed via the same series, `ln(2) =
/// -ln(1/2)`).
///
/// `r`'s prescaled-ln node is cached in `self.r_ln`, so repeated
/// approximations of the same `LnNode` instance at increasing precision
/// reuse the inner node (and its own speculative-evaluation cache) instead
/// of rebuilding the reduction from scratch.
#[derive(Debug)]
pub(crate) struct LnNode {
    x: Cr,
    r_ln: RefCell<Option<Cr>>,
}

impl LnNode {
    pub fn new(x: Cr) -> Self {
        LnNode {
            x,
            r_ln: RefCell::new(None),
        }
    }
}

impl CrNode for LnNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let sign = self.x.sign_with(p - 4, cancel)?;
        if sign <= 0 {
            return Err(CrealError::Domain("ln of a non-positive value".into()));
        }
        let msd = self.x.known_msd_with(cancel)?;
        let k = msd;
        let extra = 16;
        let inner_prec = p - extra;

        let r_ln = self
            .r_ln
            .borrow_mut()
            .get_or_insert_with(|| {
                let scaled_x = Cr::new(ShiftedNode(self.x.clone(), -k));
                let one = Cr::new(IntNode(Integer::from(1)));
                let r = Cr::new(AddNode(scaled_x, Cr::new(NegateNode(one))));
                Cr::new(PrescaledLnNode(r))
            })
            .clone();
        let ln_r = r_ln.get_approximation_with(inner_prec, cancel)?;

        if k == 0 {
            return Ok(scale(&ln_r, inner_prec - p));
        }

        let ln_half_appr = ln_half().get_approximation_with(inner_prec, cancel)?;
        let ln2 = Integer::from(-&ln_half_appr);
        let k_ln2 = ln2 * k;
        let total = Integer::from(&k_ln2 + &ln_r);
        Ok(scale(&total, inner_prec - p))
    }
}

/// `cos(x)`: halves `x` until it lies in `(-1, 1)`, evaluates the Taylor
/// series there, then applies the double-angle identity
/// `cos(2y) = 2cos(y)^2 - 1` to undo the halving.
#[derive(Debug)]
pub(crate) struct CosNode(pub Cr);
impl CrNode for CosNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let msd = msd_or_min(&self.0, cancel)?;
        let k = if msd <= 0 { 0 } else { msd + 2 };
        let guard = k + 32;
        let small_prec = p - guard;
        let scaled_x = Cr::new(ShiftedNode(self.0.clone(), -k));
        let mut result = PrescaledCosNode(scaled_x).approximate(small_prec, cancel)?;
        let mut cur_prec = small_prec;
        for _ in 0..k {
            cancel.check()?;
            let sq = scale(&Integer::from(&result * &result), cur_prec);
            let doubled = Integer::from(&sq << 1u32);
            let one_scaled = Integer::from(1) << (-cur_prec).max(0) as u32;
            result = doubled - one_scaled;
        }
        Ok(scale(&result, cur_prec - p))
    }
}

/// `sin(x) = cos(pi/2 - x)`, matching the catalogue of which
/// trigonometric functions are primitive (cos) versus derived (sin, tan).
#[derive(Debug)]
pub(crate) struct SinNode {
    pub x: Cr,
    pub half_pi: Cr,
}
impl CrNode for SinNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let arg = Cr::new(AddNode(self.half_pi.clone(), Cr::new(NegateNode(self.x.clone()))));
        CosNode(arg).approximate(p, cancel)
    }
}

/// `tan(x) = sin(x) / cos(x)`.
#[derive(Debug)]
pub(crate) struct TanNode {
    pub x: Cr,
    pub half_pi: Cr,
}
impl CrNode for TanNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let sin = Cr::new(SinNode {
            x: self.x.clone(),
            half_pi: self.half_pi.clone(),
        });
        let cos = Cr::new(CosNode(self.x.clone()));
        MultiplyNode(sin, Cr::new(InverseNode(cos))).approximate(p, cancel)
    }
}

/// `asin(x)` for `|x| <= 1`: the prescaled series converges only for
/// `|x| < (1/2)^(1/3)`; outside that band, fall back to
/// `asin(x) = sign(x) * (pi/2 - asin(sqrt(1 - x^2)))`, which always lands
/// the recursive argument below `(1/2)^(1/3)` when `|x| > (1/2)^(1/3)`.
///
/// The base-case prescaled node is cached in `self.inner` for the same
/// reason as [`LnNode::r_ln`]: a re-entrant call at higher precision should
/// resume the series, not restart it.
#[derive(Debug)]
pub(crate) struct AsinNode {
    pub x: Cr,
    pub half_pi: Cr,
    inner: RefCell<Option<Cr>>,
}

impl AsinNode {
    pub fn new(x: Cr, half_pi: Cr) -> Self {
        AsinNode {
            x,
            half_pi,
            inner: RefCell::new(None),
        }
    }
}

impl CrNode for AsinNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let guard_prec = p - 4;
        let x_appr = self.x.get_approximation_with(guard_prec, cancel)?;
        let one_scaled = Integer::from(1) << (-guard_prec).max(0) as u32;
        // threshold ~ 0.79 * one_scaled approximates (1/2)^(1/3)
        let threshold = scale(&(one_scaled.clone() * 79), -7);
        if x_appr.clone().abs() < threshold {
            let inner = self
                .inner
                .borrow_mut()
                .get_or_insert_with(|| Cr::new(PrescaledAsinNode(self.x.clone())))
                .clone();
            return inner.get_approximation_with(p, cancel);
        }

        let sign_x = x_appr.cmp0() as i32;
        let one = Cr::new(IntNode(Integer::from(1)));
        let x2 = Cr::new(MultiplyNode(self.x.clone(), self.x.clone()));
        let one_minus_x2 = Cr::new(AddNode(one, Cr::new(NegateNode(x2))));
        let root = Cr::new(SqrtNode::new(one_minus_x2));
        let inner = Cr::new(AsinNode::new(root, self.half_pi.clone()));
        let diff = Cr::new(AddNode(self.half_pi.clone(), Cr::new(NegateNode(inner))));
        let result = diff.get_approximation_with(p, cancel)?;
        if sign_x < 0 {
            Ok(-result)
        } else {
            Ok(result)
        }
    }
}

/// `acos(x) = pi/2 - asin(x)`.
#[derive(Debug)]
pub(crate) struct AcosNode {
    pub x: Cr,
    pub half_pi: Cr,
}
impl CrNode for AcosNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let asin = Cr::new(AsinNode::new(self.x.clone(), self.half_pi.clone()));
        AddNode(self.half_pi.clone(), Cr::new(NegateNode(asin))).approximate(p, cancel)
    }
}

/// `atan(x) = asin(x / sqrt(1 + x^2))`, valid for every finite `x`.
#[derive(Debug)]
pub(crate) struct AtanNode {
    pub x: Cr,
    pub half_pi: Cr,
}
impl CrNode for AtanNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let one = Cr::new(IntNode(Integer::from(1)));
        let x2 = Cr::new(MultiplyNode(self.x.clone(), self.x.clone()));
        let one_plus_x2 = Cr::new(AddNode(one, x2));
        let root = Cr::new(SqrtNode::new(one_plus_x2));
        let arg = Cr::new(MultiplyNode(self.x.clone(), Cr::new(InverseNode(root))));
        Cr::new(AsinNode::new(arg, self.half_pi.clone())).get_approximation_with(p, cancel)
    }
}

/// Machin's formula, `pi = 16*atan(1/5) - 4*atan(1/239)`, expressed
/// directly via [`IntegralAtanNode`] rather than the general [`AtanNode`]
/// (whose own reduction would otherwise recurse through `pi/2`).
///
/// The two `IntegralAtanNode`s are cached in `atan5`/`atan239` for the same
/// reason as [`LnNode::r_ln`].
#[derive(Debug, Default)]
pub(crate) struct MachinPiNode {
    atan5: RefCell<Option<Cr>>,
    atan239: RefCell<Option<Cr>>,
}

impl MachinPiNode {
    pub fn new() -> Self {
        MachinPiNode::default()
    }
}

impl CrNode for MachinPiNode {
    fn is_slow(&self) -> bool {
        true
    }

    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let extra = 4;
        let inner_prec = p - extra;
        let atan5 = self
            .atan5
            .borrow_mut()
            .get_or_insert_with(|| Cr::new(IntegralAtanNode(5)))
            .clone();
        let atan239 = self
            .atan239
            .borrow_mut()
            .get_or_insert_with(|| Cr::new(IntegralAtanNode(239)))
            .clone();
        let atan5 = atan5.get_approximation_with(inner_prec, cancel)?;
        let atan239 = atan239.get_approximation_with(inner_prec, cancel)?;
        let total = Integer::from(&atan5 * 16) - Integer::from(&atan239 * 4);
        Ok(scale(&total, inner_prec - p))
    }
}
