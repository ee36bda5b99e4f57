// Integration tests for BoundedRational and UnifiedReal: symbolic identities
// that should resolve without ever falling back to the constructive real.

use creal::{BoundedRational, UnifiedReal};

#[test]
fn sqrt_two_times_sqrt_two_is_exactly_two() {
    let two = UnifiedReal::from_int(2i64);
    let root = two.sqrt();
    let squared = root.multiply(&root);
    assert!(squared.is_exact_rational());
    assert_eq!(squared.to_rational(), Some(BoundedRational::from_int(2)));
}

#[test]
fn sqrt_of_a_perfect_square_collapses_to_rational() {
    let sixteen = UnifiedReal::from_int(16i64);
    let root = sixteen.sqrt();
    assert_eq!(root.to_rational(), Some(BoundedRational::from_int(4)));
}

#[test]
fn sqrt_eight_extracts_the_square_factor() {
    let eight = UnifiedReal::from_int(8i64);
    let root = eight.sqrt();
    // sqrt(8) = 2*sqrt(2): not a plain rational...
    assert!(!root.is_exact_rational());
    // ...but squaring it back does collapse exactly to 8.
    let squared = root.multiply(&root);
    assert_eq!(squared.to_rational(), Some(BoundedRational::from_int(8)));
}

#[test]
fn exp_of_sum_matches_product_of_exponentials() {
    let a = UnifiedReal::from_int(2i64);
    let b = UnifiedReal::from_int(3i64);
    let lhs = a.add(&b).exp();
    let rhs = a.exp().multiply(&b.exp());
    assert!(lhs.definitely_equal(&rhs).unwrap());
}

#[test]
fn zero_is_exact_and_symbolic_forms_compare_correctly() {
    let a = UnifiedReal::from_int(3i64);
    let b = UnifiedReal::from_int(3i64);
    assert!(a.subtract(&b).is_zero());

    let pi = UnifiedReal::pi();
    assert_eq!(pi.sign().unwrap(), 1);

    let neg_pi = pi.negate();
    assert_eq!(neg_pi.sign().unwrap(), -1);
}

#[test]
fn rational_coefficients_add_exactly() {
    let half = UnifiedReal::from_rational(BoundedRational::from_fraction(1, 2).unwrap().unwrap());
    let third = UnifiedReal::from_rational(BoundedRational::from_fraction(1, 3).unwrap().unwrap());
    let sum = half.add(&third);
    assert_eq!(
        sum.to_rational(),
        BoundedRational::from_fraction(5, 6).unwrap()
    );
}

#[test]
fn inverse_of_sqrt_stays_symbolic() {
    let two = UnifiedReal::from_int(2i64);
    let root = two.sqrt();
    let inv = root.inverse();
    let product = inv.multiply(&root);
    assert_eq!(product.to_rational(), Some(BoundedRational::one()));
}

#[test]
fn pow_int_of_a_sqrt_collapses_on_even_exponents() {
    let three = UnifiedReal::from_int(3i64);
    let root = three.sqrt();
    let squared = root.pow_int(2);
    assert_eq!(squared.to_rational(), Some(BoundedRational::from_int(3)));
}

#[test]
fn log10_of_a_power_of_ten_is_exact() {
    let hundred = UnifiedReal::from_int(100i64);
    assert_eq!(hundred.log10().to_rational(), Some(BoundedRational::from_int(2)));

    let tenth = UnifiedReal::from_rational(BoundedRational::from_fraction(1, 10).unwrap().unwrap());
    assert_eq!(tenth.log10().to_rational(), Some(BoundedRational::from_int(-1)));
}

#[test]
fn ten_to_the_log_of_seven_is_seven() {
    let ten = UnifiedReal::from_int(10i64);
    let seven = UnifiedReal::from_int(7i64);
    let log7 = seven.log10();
    let result = ten.pow(&log7).unwrap();
    assert!(result.definitely_equal(&seven).unwrap());
}

#[test]
fn pow_with_an_integer_exponent_matches_pow_int() {
    let two = UnifiedReal::from_int(2i64);
    let three = UnifiedReal::from_int(3i64);
    let direct = two.pow(&three).unwrap();
    assert_eq!(direct.to_rational(), Some(BoundedRational::from_int(8)));
}

#[test]
fn zero_to_the_zero_is_an_error() {
    let zero = UnifiedReal::zero();
    assert!(zero.pow(&zero).is_err());
    assert!(zero.pow(&UnifiedReal::from_int(3i64)).unwrap().is_zero());
}

#[test]
fn factorial_matches_iterated_multiplication() {
    let ten = UnifiedReal::from_int(10i64);
    let result = ten.fact().unwrap();
    assert_eq!(result.to_rational(), Some(BoundedRational::from_int(3628800)));
}

#[test]
fn pi_and_sqrt_two_are_never_equal() {
    let pi = UnifiedReal::pi();
    let root_two = UnifiedReal::from_int(2i64).sqrt();
    assert!(!pi.definitely_equal(&root_two).unwrap());
}

#[test]
fn sqrt_two_is_less_than_sqrt_three_without_consulting_the_cr() {
    let root_two = UnifiedReal::from_int(2i64).sqrt();
    let root_three = UnifiedReal::from_int(3i64).sqrt();
    assert!(root_two.is_comparable(&root_three).unwrap());
    assert_eq!(
        root_two.compare_to(&root_three).unwrap(),
        std::cmp::Ordering::Less
    );
}
