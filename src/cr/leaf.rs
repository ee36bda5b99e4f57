// creal: exact real arithmetic
// cr/leaf.rs
//
// Leaf and structural CR nodes (catalogue, first part).

use rug::Integer;

use crate::cancel::CancellationFlag;
use crate::error::CrealError;
use crate::scaled::{prec_add, scale};

use super::node::{Cr, CrNode};

#[derive(Debug)]
pub(crate) struct IntNode(pub Integer);
impl CrNode for IntNode {
    fn approximate(&self, p: i32, _cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        Ok(scale(&self.0, -p))
    }
}

#[derive(Debug)]
pub(crate) struct ShiftedNode(pub Cr, pub i32);
impl CrNode for ShiftedNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        self.0.get_approximation_with(prec_add(p, -self.1), cancel)
    }
}

#[derive(Debug)]
pub(crate) struct NegateNode(pub Cr);
impl CrNode for NegateNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        Ok(-self.0.get_approximation_with(p, cancel)?)
    }
}

#[derive(Debug)]
pub(crate) struct AddNode(pub Cr, pub Cr);
impl CrNode for AddNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let p2 = prec_add(p, -2);
        let a = self.0.get_approximation_with(p2, cancel)?;
        let b = self.1.get_approximation_with(p2, cancel)?;
        Ok(scale(&(a + b), -2))
    }
}

/// `x.msd()` used where the convention is a bare `msd()` (no precision
/// argument): refines from `p0 = i32::MIN` so it always resolves unless `x`
/// is exactly zero, in which case it never will — the same non-termination
/// a zero operand always carries.
fn full_msd(x: &Cr, cancel: &CancellationFlag) -> Result<i32, CrealError> {
    x.refine_msd_with(i32::MIN, cancel)
}

#[derive(Debug)]
pub(crate) struct MultiplyNode(pub Cr, pub Cr);
impl CrNode for MultiplyNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let half = prec_add(p >> 1, -1);
        let msd1 = self.0.msd_with(half, cancel)?;
        let (first, second, msd1) = if msd1 == i32::MIN {
            match self.1.msd_with(half, cancel)? {
                i32::MIN => return Ok(Integer::new()),
                msd2 => (&self.1, &self.0, msd2),
            }
        } else {
            (&self.0, &self.1, msd1)
        };

        // Precision needed for `second`, the roughly-approximated operand.
        let prec2 = prec_add(p, prec_add(-msd1, -3));
        let appr2 = second.get_approximation_with(prec2, cancel)?;
        if appr2 == 0 {
            return Ok(Integer::new());
        }
        let msd2 = second.known_msd_with(cancel)?;

        // Precision needed for `first`, now that `second`'s magnitude is known.
        let prec1 = prec_add(p, prec_add(-msd2, -3));
        let appr1 = first.get_approximation_with(prec1, cancel)?;

        let scale_digits = prec_add(prec_add(prec1, prec2), -p);
        Ok(scale(&(appr1 * appr2), scale_digits))
    }
}

#[derive(Debug)]
pub(crate) struct InverseNode(pub Cr);
impl CrNode for InverseNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let m = full_msd(&self.0, cancel)?;
        // prec_needed = m - (1 - m - p + 3)
        let prec_needed = m - (1 - m - p + 3);
        let log_scale_factor = -p - prec_needed;
        if log_scale_factor < 0 {
            return Ok(Integer::new());
        }

        let scaled_divisor = self.0.get_approximation_with(prec_needed, cancel)?;
        let abs_divisor = scaled_divisor.clone().abs();
        if abs_divisor == 0 {
            return Err(CrealError::DivideByZero);
        }

        let dividend = Integer::from(1) << log_scale_factor as u32;
        let adjusted = dividend + (abs_divisor.clone() >> 1u32);
        let result = adjusted / abs_divisor;
        if scaled_divisor < 0 {
            Ok(-result)
        } else {
            Ok(result)
        }
    }
}

#[derive(Debug)]
pub(crate) struct SelectNode(pub Cr, pub Cr, pub Cr);
impl CrNode for SelectNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        let s = &self.0;
        let selector_sign = s.sign_with(-20, cancel)?;
        if selector_sign < 0 {
            return self.1.get_approximation_with(p, cancel);
        }
        if selector_sign > 0 {
            return self.2.get_approximation_with(p, cancel);
        }
        let p1 = prec_add(p, -1);
        let x_appr = self.1.get_approximation_with(p1, cancel)?;
        let y_appr = self.2.get_approximation_with(p1, cancel)?;
        let diff = Integer::from(&x_appr - &y_appr);
        if diff.clone().abs() <= 1 {
            return Ok(scale(&x_appr, -1));
        }
        // Operands disagree: refine the selector's sign until it resolves.
        let mut prec = -20i32;
        loop {
            cancel.check()?;
            let sign = s.sign_with(prec, cancel)?;
            if sign < 0 {
                return self.1.get_approximation_with(p, cancel);
            }
            if sign > 0 {
                return self.2.get_approximation_with(p, cancel);
            }
            prec = prec_add(prec, prec);
        }
    }
}

#[derive(Debug)]
pub(crate) struct AssumedIntNode(pub Cr);
impl CrNode for AssumedIntNode {
    fn approximate(&self, p: i32, cancel: &CancellationFlag) -> Result<Integer, CrealError> {
        if p >= 0 {
            self.0.get_approximation_with(p, cancel)
        } else {
            let at_zero = self.0.get_approximation_with(0, cancel)?;
            Ok(scale(&at_zero, -p))
        }
    }
}
