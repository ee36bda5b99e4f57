// creal: exact real arithmetic
// scaled.rs
//
// Scaled-integer helpers shared by every constructive-real node.

use rug::Integer;

use crate::error::CrealError;

/// Largest precision magnitude the library will operate at. `check_precision`
/// rejects anything whose top four bits disagree, keeping precision
/// arithmetic (small additions/multiplications) at least a factor of 8 away
/// from overflowing an `i32`.
pub fn check_precision(p: i32) -> Result<(), CrealError> {
    if (p >> 28) == (p >> 29) {
        Ok(())
    } else {
        Err(CrealError::PrecisionOverflow)
    }
}

/// Returns `a * 2^k` when `k >= 0`, otherwise the canonical round-half-up
/// right shift `((a >> (-k-1)) + 1) >> 1`, which caps the rounding error at
/// half a unit in the last place.
pub fn scale(a: &Integer, k: i32) -> Integer {
    if k >= 0 {
        Integer::from(a << k as u32)
    } else {
        let shift = (-k - 1) as u32;
        let shifted: Integer = Integer::from(a >> shift) + Integer::from(1);
        Integer::from(shifted >> 1u32)
    }
}

/// Adds two precisions, saturating instead of wrapping on overflow so that
/// the subsequent `check_precision` call can reject the out-of-range result
/// cleanly rather than operating on a wrapped value.
pub(crate) fn prec_add(p: i32, k: i32) -> i32 {
    let r = p as i64 + k as i64;
    r.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Divides `num` by `den`, rounding to the nearest integer (ties away from
/// zero). Used by Newton-iteration nodes where the divisor is not a power
/// of two, so the `scale` shift-and-round trick does not apply directly.
pub(crate) fn round_div(num: &Integer, den: &Integer) -> Integer {
    let (q, r) = num.clone().div_rem(den.clone());
    if r == 0 {
        return q;
    }
    let twice_r = Integer::from(&r << 1u32).abs();
    if twice_r >= den.clone().abs() {
        if (num.cmp0() as i32) * (den.cmp0() as i32) >= 0 {
            q + Integer::from(1)
        } else {
            q - Integer::from(1)
        }
    } else {
        q
    }
}

/// Adds two `i32` precisions as `i64`, clamping into range instead of
/// wrapping, so the result can safely be narrowed back to `i32` before a
/// `check_precision` call rejects genuinely out-of-range precisions.
pub(crate) fn prec_combine(a: i32, b: i32) -> i64 {
    a as i64 + b as i64
}

/// Floor of the integer square root of a nonnegative `n`, computed by
/// Newton's method using only add/subtract/multiply/`div_rem`/shift/compare
/// (the big-integer host capability never promises a native `sqrt`). Any
/// positive starting guess converges: by AM-GM, `(x + n/x)/2 >= sqrt(n)`
/// for every `x > 0`, so after the first step the iterate is already an
/// overestimate and descends monotonically to `floor(sqrt(n))`. A caller
/// may supply a `hint` (e.g. a previously cached, rescaled root) to shorten
/// the descent; it's folded in with `max` against the bit-length-derived
/// overestimate so an under-sized hint can never break convergence.
pub(crate) fn newton_isqrt(
    n: &Integer,
    hint: Option<Integer>,
    cancel: &crate::cancel::CancellationFlag,
) -> Result<Integer, CrealError> {
    if *n <= 0 {
        return Ok(Integer::new());
    }
    let bits = n.significant_bits();
    let overestimate = Integer::from(1) << (bits / 2 + 1);
    let mut x = match hint {
        Some(h) if h > overestimate => h,
        _ => overestimate,
    };
    loop {
        cancel.check()?;
        let y = (Integer::from(&x + Integer::from(n / &x))) / 2;
        if y >= x {
            return Ok(x);
        }
        x = y;
    }
}

/// `ceil(log2(|n| + 1))`: the number of bits needed to represent `n` in
/// sign-magnitude form, i.e. the smallest `k` with `|n| < 2^k`.
///
/// Equal to `|n|.significant_bits()` by the identity
/// `bit_length(m) == ceil(log2(m + 1))` for `m >= 0`.
pub fn bound_log2(n: &Integer) -> i32 {
    n.clone().abs().significant_bits() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_positive_shift_is_exact() {
        assert_eq!(scale(&Integer::from(5), 3), Integer::from(40));
    }

    #[test]
    fn scale_negative_shift_rounds_half_up() {
        // 5 >> 1 rounded: (5>>0 + 1) >> 1 = (5+1)>>1 = 3
        assert_eq!(scale(&Integer::from(5), -1), Integer::from(3));
        // 4 >> 1 rounded: (4+1)>>1 = 2
        assert_eq!(scale(&Integer::from(4), -1), Integer::from(2));
        // negative operand
        assert_eq!(scale(&Integer::from(-5), -1), Integer::from(-2));
    }

    #[test]
    fn bound_log2_basic() {
        assert_eq!(bound_log2(&Integer::from(0)), 0);
        assert_eq!(bound_log2(&Integer::from(1)), 1);
        assert_eq!(bound_log2(&Integer::from(3)), 2);
        assert_eq!(bound_log2(&Integer::from(4)), 3);
        assert_eq!(bound_log2(&Integer::from(-4)), 3);
    }

    #[test]
    fn check_precision_accepts_small_values() {
        assert!(check_precision(0).is_ok());
        assert!(check_precision(-1000).is_ok());
        assert!(check_precision(1000).is_ok());
    }

    #[test]
    fn check_precision_rejects_near_overflow() {
        assert!(check_precision(i32::MAX).is_err());
        assert!(check_precision(i32::MIN).is_err());
    }
}
