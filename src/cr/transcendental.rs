// creal: exact real arithmetic
// cr/transcendental.rs
//
// Series and AGM-based CR nodes: sqrt, the prescaled transcendentals, the
// integral-arctangent Machin terms, and Gauss-Legendre pi.

use std::cell::RefCell;

use rug::Integer;

use crate::cancel::CancellationFlag;
use crate::error::CrealError;
use crate::scaled::{bound_log2, newton_isqrt, scale};

use super::node::{Cr, CrNode};

fn ceil_div_pos(n: i64, d: i64) -> i64 {
    debug_assert!(d > 0);
    if n >= 0 {
        (n + d - 1) / d
    } else {
        -((-n) / d)
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Runs a Taylor-style series `sum += term` until `|term|` drops below the
/// truncation threshold implied by `p` and `calc_prec`, polling `cancel`
/// once per term. `next_term` receives the 1-indexed term number and the
/// previous term (at scale `calc_prec`) and returns the next one.
fn sum_series(
    first_term: Integer,
    p: i32,
    calc_prec: i32,
    cancel: &CancellationFlag,
    mut next_term: impl FnMut(i64, &Integer) -> Integer,
) -> Result<Integer, CrealError> {
    let max_trunc_error = {
        let shift = p - 4 - calc_prec;
        if shift >= 0 {
            Integer::from(1) << shift as u32
        } else {
            Integer::from(1)
        }
    };
    let mut term = first_term;
    let mut sum = term.clone();
    let mut n: i64 = 1;
    while term.clone().abs() >= max_trunc_error {
        cancel.check()?;
        term = next_term(n, &term);
        sum += &term;
        n += 1;
    }
    Ok(sum)
}

// ---------------------------------------------------------------------
// Square root
// ---------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct SqrtNode {
    pub x: Cr,
    seed: RefCell<Option<(i32, Integer)>>,
}

impl SqrtNode {
    pub fn new(x: Cr) -> Self {
        SqrtNode {
            x,
            seed: RefCell::new(None),
        }
    }

    /// Seeds the Newton start with a caller-supplied `(min_prec, max_appr)`
    /// pair, letting a caller that already knows a nearby root skip the
    /// from-scratch search.
    pub fn with_hint(x: Cr, min_prec: i32, max_appr: Integer) -> Self {
        SqrtNode {
            x,
            seed: RefCell::new(Some((min_prec, max_appr))),
        }
    }
}

impl CrNode for SqrtNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let probe_prec = clamp_i32(2 * p as i64);
        let msd = self.x.refine_msd_with(probe_prec, cancel)?;
        if msd == i32::MIN {
            return Ok(Integer::new());
        }
        if self.x.sign_with(msd, cancel)? < 0 {
            return Err(CrealError::Domain("sqrt of a negative value".into()));
        }

        // x ~= x_appr * 2^(2p), so sqrt(x) ~= sqrt(x_appr) * 2^p exactly in scale.
        let xp = clamp_i32(2 * p as i64);
        let x_appr = self.x.get_approximation_with(xp, cancel)?;
        if x_appr <= 0 {
            return Ok(Integer::new());
        }

        let hint = self.seed.borrow().as_ref().and_then(|(seed_p, seed_v)| {
            if *seed_p >= p {
                Some(scale(seed_v, seed_p - p))
            } else {
                None
            }
        });
        let root = newton_isqrt(&x_appr, hint, cancel)?;
        *self.seed.borrow_mut() = Some((p, root.clone()));
        Ok(root)
    }
}

// ---------------------------------------------------------------------
// Prescaled exp(x), |x| < 1/2
// ---------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct PrescaledExpNode(pub Cr);
impl CrNode for PrescaledExpNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let iterations_needed = ceil_div_pos(-(p as i64), 2) + 2;
        let calc_prec = p - bound_log2(&Integer::from(2 * iterations_needed)) - 4;
        let op_appr = self.0.get_approximation_with(calc_prec, cancel)?;
        let scaled_one = Integer::from(1) << (-calc_prec).max(0) as u32;

        let sum = sum_series(scaled_one, p, calc_prec, cancel, |n, prev| {
            let prod = scale(&(Integer::from(prev * &op_appr)), calc_prec);
            prod / n
        })?;
        Ok(scale(&sum, calc_prec - p))
    }
}

// ---------------------------------------------------------------------
// Prescaled ln(1 + x), |x| < 1/2
// ---------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct PrescaledLnNode(pub Cr);
impl CrNode for PrescaledLnNode {
    fn is_slow(&self) -> bool {
        true
    }

    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let iterations_needed = -(p as i64);
        let iterations_needed = iterations_needed.max(1);
        let calc_prec = p - bound_log2(&Integer::from(2 * iterations_needed)) - 4;
        let op_appr = self.0.get_approximation_with(calc_prec, cancel)?;

        // term_0 = x; term_n = -term_{n-1} * x * (n) / (n+1), giving the
        // alternating series x - x^2/2 + x^3/3 - ...
        let sum = sum_series(op_appr.clone(), p, calc_prec, cancel, |n, prev| {
            let prod = scale(&(Integer::from(prev * &op_appr)), calc_prec);
            let scaled = prod * n;
            -(scaled / (n + 1))
        })?;
        Ok(scale(&sum, calc_prec - p))
    }
}

// ---------------------------------------------------------------------
// Prescaled cos(x), |x| < 1
// ---------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct PrescaledCosNode(pub Cr);
impl CrNode for PrescaledCosNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let iterations_needed = ceil_div_pos(-(p as i64), 2) + 4;
        let calc_prec = p - bound_log2(&Integer::from(2 * iterations_needed)) - 4;
        let op_appr = self.0.get_approximation_with(calc_prec, cancel)?;
        let op2 = scale(&(Integer::from(&op_appr * &op_appr)), calc_prec);
        let scaled_one = Integer::from(1) << (-calc_prec).max(0) as u32;

        let sum = sum_series(scaled_one, p, calc_prec, cancel, |n, prev| {
            let prod = scale(&(Integer::from(prev * &op2)), calc_prec);
            -(prod / ((2 * n - 1) * (2 * n)))
        })?;
        Ok(scale(&sum, calc_prec - p))
    }
}

// ---------------------------------------------------------------------
// Prescaled asin(x), |x| < (1/2)^(1/3)
// ---------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct PrescaledAsinNode(pub Cr);
impl CrNode for PrescaledAsinNode {
    fn is_slow(&self) -> bool {
        true
    }

    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let iterations_needed = ceil_div_pos(-3 * (p as i64), 2) + 4;
        let calc_prec = p - bound_log2(&Integer::from(2 * iterations_needed)) - 4;
        let op_appr = self.0.get_approximation_with(calc_prec, cancel)?;
        let op2 = scale(&(Integer::from(&op_appr * &op_appr)), calc_prec);

        // term_0 = x; term_n = term_{n-1} * x^2 * (2n-1)^2 / (2n(2n+1)).
        let sum = sum_series(op_appr.clone(), p, calc_prec, cancel, |n, prev| {
            let prod = scale(&(Integer::from(prev * &op2)), calc_prec);
            let num = prod * Integer::from(2 * n - 1) * Integer::from(2 * n - 1);
            num / (2 * n * (2 * n + 1))
        })?;
        Ok(scale(&sum, calc_prec - p))
    }
}

// ---------------------------------------------------------------------
// Integral arctangent: Machin-style term for 1/k, k integer > 1
// ---------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct IntegralAtanNode(pub i64);
impl CrNode for IntegralAtanNode {
    fn is_slow(&self) -> bool {
        true
    }

    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let k = self.0;
        debug_assert!(k > 1);
        let iterations_needed = ceil_div_pos(-(p as i64), 2) + 2;
        let calc_prec = p - bound_log2(&Integer::from(2 * iterations_needed)) - 4;

        let scaled_k_inv = {
            // 1/k at scale calc_prec: round(2^(-calc_prec) / k).
            let shift = -calc_prec;
            let numer = if shift >= 0 {
                Integer::from(1) << shift as u32
            } else {
                Integer::from(1)
            };
            crate::scaled::round_div(&numer, &Integer::from(k))
        };
        let k2 = Integer::from(k * k);

        // term_0 = 1/k; term_n = -term_{n-1} / k^2 * (2n-1)/(2n+1).
        let sum = sum_series(scaled_k_inv, p, calc_prec, cancel, |n, prev| {
            let scaled = Integer::from(prev * (2 * n - 1));
            let divided = crate::scaled::round_div(&scaled, &k2);
            -(divided / (2 * n + 1))
        })?;
        Ok(scale(&sum, calc_prec - p))
    }
}

// ---------------------------------------------------------------------
// Gauss-Legendre pi
// ---------------------------------------------------------------------

/// One step of the arithmetic-geometric-mean iteration at a fixed internal
/// scale `calc_prec`: `a' = (a+b)/2`, `b' = sqrt(a*b)`, `t' = t - 2^n (a-a')^2`.
struct AgmState {
    a: Integer,
    b: Integer,
    t: Integer,
    n: u32,
}

#[derive(Debug, Default)]
pub(crate) struct GaussLegendrePiNode {
    /// Per-index cache of the AGM state after each completed round, so a
    /// re-entrant call at higher precision resumes instead of restarting
    /// the AGM from scratch.
    history: RefCell<Vec<(i32, Integer, Integer, Integer, u32)>>,
}

impl CrNode for GaussLegendrePiNode {
    fn is_slow(&self) -> bool {
        true
    }

    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let extra = bound_log2(&Integer::from((-(p as i64)).max(1))) + 10;
        let calc_prec = p - extra;
        let one = Integer::from(1) << (-calc_prec).max(0) as u32;

        let mut state = {
            let history = self.history.borrow();
            match history.last() {
                Some((cached_prec, a, b, t, n)) if *cached_prec <= calc_prec => AgmState {
                    a: scale(a, cached_prec - calc_prec),
                    b: scale(b, cached_prec - calc_prec),
                    t: scale(t, cached_prec - calc_prec),
                    n: *n,
                },
                _ => AgmState {
                    a: one.clone(),
                    b: sqrt_half_at(calc_prec, cancel)?,
                    t: crate::scaled::round_div(&one, &Integer::from(4)),
                    n: 0,
                },
            }
        };

        loop {
            cancel.check()?;
            let diff = Integer::from(&state.a - &state.b);
            if diff.clone().abs() <= 4 {
                break;
            }
            let new_a = scale(&(Integer::from(&state.a + &state.b)), -1);
            let prod = scale(&(Integer::from(&state.a * &state.b)), calc_prec);
            let new_b = newton_isqrt(&prod, None, cancel)?;
            let delta = Integer::from(&state.a - &new_a);
            let delta2 = scale(&(Integer::from(&delta * &delta)), calc_prec);
            let weighted = if state.n <= 62 {
                Integer::from(&delta2 << state.n)
            } else {
                delta2.clone()
            };
            let new_t = Integer::from(&state.t - &weighted);
            state = AgmState {
                a: new_a,
                b: new_b,
                t: new_t,
                n: state.n + 1,
            };
            let mut history = self.history.borrow_mut();
            history.push((calc_prec, state.a.clone(), state.b.clone(), state.t.clone(), state.n));
        }

        // pi ~= (a+b)^2 / (4t)
        let sum = Integer::from(&state.a + &state.b);
        let sum2 = scale(&(Integer::from(&sum * &sum)), calc_prec);
        let four_t = Integer::from(&state.t << 2u32);
        let pi_scaled = crate::scaled::round_div(&sum2, &four_t);
        Ok(scale(&pi_scaled, calc_prec - p))
    }
}

fn sqrt_half_at(calc_prec: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
    // b0 = 1/sqrt(2) = sqrt(1/2). Represent 1/2 at an even fetch precision
    // `2*calc_prec` so its isqrt lands directly at scale `calc_prec`.
    let fetch_prec = 2 * calc_prec;
    let half_scaled = {
        let shift = -1 - fetch_prec;
        if shift >= 0 {
            Integer::from(1) << shift as u32
        } else {
            Integer::from(0)
        }
    };
    newton_isqrt(&half_scaled, None, cancel)
}
