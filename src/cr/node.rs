// creal: exact real arithmetic
// cr/node.rs
//
// The constructive-real cache and the node trait every CR operation
// implements.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rug::Integer;

use crate::cancel::CancellationFlag;
use crate::error::CrealError;
use crate::scaled::{check_precision, scale};

/// The three mutable cache fields every CR node carries alongside its
/// immutable, node-specific payload.
///
/// Invariant: if `appr_valid`, `max_appr` equals `approximate(min_prec)` and
/// no call has ever set `min_prec` to a value smaller (more negative) than
/// the one currently stored. Updates only ever replace `min_prec` with a
/// strictly more-negative value and `max_appr` with the matching finer
/// approximation, so a coarse-to-fine race between readers is always safe:
/// whichever write lands second simply wins, and both possible observations
/// are individually valid.
pub(crate) struct CrCache {
    appr_valid: Cell<bool>,
    min_prec: Cell<i32>,
    max_appr: RefCell<Integer>,
}

impl fmt::Debug for CrCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrCache")
            .field("appr_valid", &self.appr_valid.get())
            .field("min_prec", &self.min_prec.get())
            .finish()
    }
}

impl Default for CrCache {
    fn default() -> Self {
        CrCache {
            appr_valid: Cell::new(false),
            min_prec: Cell::new(0),
            max_appr: RefCell::new(Integer::new()),
        }
    }
}

/// The operation every constructive-real node implements: produce an
/// integer approximation correct to within one unit in the last place at
/// precision `p`, i.e. `|true_value / 2^p - approximate(p)| < 1`.
pub(crate) trait CrNode: fmt::Debug {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError>;

    /// `SlowConstructiveReal` nodes (prescaled ln, prescaled asin,
    /// integral-atan, pi) speculatively evaluate beyond the requested
    /// precision so that later, higher-precision requests hit the cache.
    fn is_slow(&self) -> bool {
        false
    }
}

struct CrCell {
    cache: CrCache,
    node: Box<dyn CrNode>,
}

impl fmt::Debug for CrCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrCell")
            .field("cache", &self.cache)
            .field("node", &self.node)
            .finish()
    }
}

/// A lazy, arbitrary-precision real number: a reference-counted handle onto
/// one node of an expression DAG. Cloning a `Cr` is cheap (an `Rc` bump);
/// the DAG is acyclic by construction, so reference counting alone is
/// sufficient (no cycles to break).
#[derive(Clone, Debug)]
pub struct Cr(pub(crate) Rc<CrCell>);

impl Cr {
    pub(crate) fn new(node: impl CrNode + 'static) -> Cr {
        Cr(Rc::new(CrCell {
            cache: CrCache::default(),
            node: Box::new(node),
        }))
    }

    /// Public entry point: an integer approximation of this value correct
    /// to within one ulp at precision `p`, i.e. the returned `r` satisfies
    /// `|value - r * 2^p| < 2^p`.
    pub fn get_approximation(&self, p: i32) -> Result<Integer, CrealError> {
        self.get_approximation_with(p, &CancellationFlag::global())
    }

    /// As [`Cr::get_approximation`], but polling a caller-supplied
    /// cancellation flag instead of the process-wide default.
    pub fn get_approximation_with(
        &self,
        p: i32,
        cancel: &CancellationFlag,
    ) -> Result<Integer, CrealError> {
        check_precision(p)?;
        let cell = &*self.0;
        if cell.cache.appr_valid.get() && p >= cell.cache.min_prec.get() {
            let cached = cell.cache.max_appr.borrow();
            return Ok(scale(&cached, cell.cache.min_prec.get() - p));
        }

        let eval_prec = if cell.node.is_slow() {
            let floored = ((p as i64) - 32 + 1) & !31i64;
            floored.min(-64) as i32
        } else {
            p
        };

        let r = cell.node.approximate(eval_prec, cancel)?;
        cell.cache.max_appr.replace(r.clone());
        cell.cache.min_prec.set(eval_prec);
        cell.cache.appr_valid.set(true);
        Ok(scale(&r, eval_prec - p))
    }

    /// Most-significant-digit position: the integer `m` with
    /// `2^(m-1) < |value| < 2^(m+1)`, or `i32::MIN` if the current
    /// approximation at precision `p` cannot distinguish `value` from zero.
    pub fn msd(&self, p: i32) -> Result<i32, CrealError> {
        self.msd_with(p, &CancellationFlag::global())
    }

    pub(crate) fn msd_with(&self, p: i32, cancel: &CancellationFlag) -> Result<i32, CrealError> {
        // Ensure the cache holds an approximation at least as fine as p - 1.
        let appr = self.get_approximation_with(p - 1, cancel)?;
        if appr.abs() <= 1 {
            return Ok(i32::MIN);
        }
        let cell = &*self.0;
        let min_prec = cell.cache.min_prec.get();
        let max_appr = cell.cache.max_appr.borrow();
        Ok(min_prec + bit_length(&max_appr) - 1)
    }

    /// Refines the msd estimate downward from `p = 0` until it resolves or
    /// the search passes `p0 + 30`, honoring cancellation at every step.
    pub fn refine_msd(&self, p0: i32) -> Result<i32, CrealError> {
        self.refine_msd_with(p0, &CancellationFlag::global())
    }

    pub(crate) fn refine_msd_with(
        &self,
        p0: i32,
        cancel: &CancellationFlag,
    ) -> Result<i32, CrealError> {
        if p0 < -30 {
            let mut p = 0i32;
            loop {
                cancel.check()?;
                let m = self.msd_with(p, cancel)?;
                if m != i32::MIN || p <= p0 + 30 {
                    return Ok(m);
                }
                p = (p as i64 * 3 / 2 - 16) as i32;
            }
        }
        self.msd_with(p0, cancel)
    }

    /// Reads the msd directly off the cache when it is already valid and
    /// nonzero (the source's `known_msd`, used after a call that just
    /// populated the cache at a useful precision); otherwise falls back to
    /// a full [`Cr::refine_msd`].
    pub(crate) fn known_msd_with(&self, cancel: &CancellationFlag) -> Result<i32, CrealError> {
        let cell = &*self.0;
        if cell.cache.appr_valid.get() {
            let max_appr = cell.cache.max_appr.borrow();
            if *max_appr != 0 {
                return Ok(cell.cache.min_prec.get() + bit_length(&max_appr) - 1);
            }
        }
        self.refine_msd_with(i32::MIN, cancel)
    }

    /// Shortcut sign at precision `p`: if the cache already resolves a
    /// nonzero value, return its sign directly; otherwise consult the
    /// approximation at `p - 1`.
    pub fn sign(&self, p: i32) -> Result<i32, CrealError> {
        self.sign_with(p, &CancellationFlag::global())
    }

    pub(crate) fn sign_with(&self, p: i32, cancel: &CancellationFlag) -> Result<i32, CrealError> {
        let cell = &*self.0;
        if cell.cache.appr_valid.get() {
            let max_appr = cell.cache.max_appr.borrow();
            if *max_appr != 0 {
                return Ok(max_appr.cmp0() as i32);
            }
        }
        let appr = self.get_approximation_with(p - 1, cancel)?;
        Ok(appr.cmp0() as i32)
    }
}

/// Bit length of the minimal two's-complement magnitude, i.e. the position
/// of the highest set bit plus one (0 for zero).
pub(crate) fn bit_length(n: &Integer) -> i32 {
    if *n == 0 {
        0
    } else {
        n.clone().abs().significant_bits() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstNode(Integer);
    impl CrNode for ConstNode {
        fn approximate(&self, p: i32, _cancel: &CancellationFlag) -> Result<Integer, CrealError> {
            Ok(scale(&self.0, -p))
        }
    }

    #[test]
    fn cache_hit_downsamples_finer_value() {
        let cr = Cr::new(ConstNode(Integer::from(1) << 100u32));
        let fine = cr.get_approximation(-50).unwrap();
        let coarse = cr.get_approximation(-10).unwrap();
        // Downsampling a cached fine value should match recomputation.
        assert_eq!(coarse, scale(&fine, -50 - (-10)));
    }

    #[test]
    fn idempotent_repeated_calls() {
        let cr = Cr::new(ConstNode(Integer::from(42)));
        let a = cr.get_approximation(-5).unwrap();
        let b = cr.get_approximation(-5).unwrap();
        assert_eq!(a, b);
    }
}
