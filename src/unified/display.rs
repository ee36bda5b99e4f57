// creal: exact real arithmetic
// unified/display.rs
//
// Human-readable rendering: an exact decimal when the
// value is a plain rational with a terminating expansion, the symbolic
// form when one is known, and a truncated constructive-real decimal
// otherwise.

use std::fmt;

use rug::Integer;

use super::property::Property;
use super::UnifiedReal;
use crate::rational::BoundedRational;

impl fmt::Display for UnifiedReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficient.is_zero() {
            return write!(f, "0");
        }
        if matches!(self.property, Property::One) {
            if let Some(s) = self.coefficient.to_decimal_string_exact(20) {
                return write!(f, "{s}");
            }
            return write!(f, "{}", self.coefficient);
        }
        if self.coefficient == BoundedRational::one() {
            return write!(f, "{}", self.property);
        }
        write!(f, "{} * {}", self.coefficient, self.property)
    }
}

/// Renders `r` as `numerator/denominator`, optionally with a Unicode
/// fraction slash (U+2044) instead of an ASCII `/`, and optionally as a
/// mixed number (`1 1/2` rather than `3/2`).
fn render_rational(r: &BoundedRational, unicode_fraction: bool, mixed: bool) -> String {
    let slash = if unicode_fraction { '\u{2044}' } else { '/' };
    if *r.denominator() == 1 {
        return r.numerator().to_string();
    }
    let negative = r.sign() < 0;
    let num = r.numerator().clone().abs();
    let den = r.denominator().clone().abs();
    let sign = if negative { "-" } else { "" };
    if mixed {
        let whole = num.clone() / &den;
        let remainder = Integer::from(&num - &whole * &den);
        if whole != 0 {
            if remainder == 0 {
                return format!("{sign}{whole}");
            }
            return format!("{sign}{whole} {remainder}{slash}{den}");
        }
    }
    format!("{sign}{num}{slash}{den}")
}

impl UnifiedReal {
    /// Renders this value the way a calculator display would: `degrees`
    /// multiplies an inverse-trig result by `180/pi` instead of leaving it
    /// in radians, `unicode_fraction` swaps `/` for the Unicode fraction
    /// slash, and `mixed` renders a non-integer rational coefficient as a
    /// whole part plus a proper fraction.
    pub fn to_display_string(&self, degrees: bool, unicode_fraction: bool, mixed: bool) -> String {
        if self.coefficient.is_zero() {
            return "0".to_string();
        }
        let (body, is_inverse_trig) = match &self.property {
            Property::One => return render_rational(&self.coefficient, unicode_fraction, mixed),
            Property::Asin(r) => (
                format!("sin\u{207b}\u{00b9}({})", render_rational(r, unicode_fraction, mixed)),
                true,
            ),
            Property::Atan(r) => (
                format!("tan\u{207b}\u{00b9}({})", render_rational(r, unicode_fraction, mixed)),
                true,
            ),
            other => (other.to_string(), false),
        };
        let body = if degrees && is_inverse_trig {
            format!("{body} \u{d7} 180/\u{03c0}")
        } else {
            body
        };
        if self.coefficient == BoundedRational::one() {
            body
        } else {
            format!(
                "{} * {}",
                render_rational(&self.coefficient, unicode_fraction, mixed),
                body
            )
        }
    }
}
