// Integration tests for constructive-real arithmetic: concrete end-to-end
// scenarios and algebraic identities checked at a fixed precision.

use std::cmp::Ordering;

use creal::Cr;

fn assert_close(a: &Cr, b: &Cr, p: i32) {
    let ord = a.compare_to(b, p).expect("comparison should not error");
    assert_eq!(ord, Ordering::Equal, "values disagree at precision {p}");
}

#[test]
fn integer_arithmetic_is_exact() {
    let a = Cr::from_int(7i64);
    let b = Cr::from_int(5i64);
    let sum = a.add(&b);
    assert_eq!(sum.get_approximation(0).unwrap(), rug::Integer::from(12));
}

#[test]
fn division_round_trips() {
    let a = Cr::from_int(22i64);
    let b = Cr::from_int(7i64);
    let ratio = a.divide(&b);
    let back = ratio.multiply(&b);
    assert_close(&back, &a, -50);
}

#[test]
fn sqrt_two_squared_is_two() {
    let two = Cr::from_int(2i64);
    let root = two.sqrt();
    let squared = root.multiply(&root);
    assert_close(&squared, &two, -100);
}

#[test]
fn exp_ln_round_trip() {
    let x = Cr::from_int(3i64);
    let round_trip = x.ln().exp();
    assert_close(&round_trip, &x, -80);
}

#[test]
fn pow_int_matches_repeated_multiplication() {
    let two = Cr::from_int(2i64);
    let tenth = two.pow_int(10);
    let expected = Cr::from_int(1024i64);
    assert_close(&tenth, &expected, -10);
}

#[test]
fn pi_matches_machin_cross_check() {
    let agm_pi = creal::cr::pi();
    let machin_pi = creal::cr::pi_machin();
    assert_close(&agm_pi, &machin_pi, -200);
}

#[test]
fn one_plus_one_over_n_to_the_n_approaches_e() {
    // (1 + 1/n)^n -> e; at a modest n this should already agree with e to
    // a handful of bits.
    let n = 100_000i64;
    let one = Cr::from_int(1i64);
    let term = one.add(&Cr::from_int(1i64).divide(&Cr::from_int(n)));
    let approx_e = term.pow_int(n);
    let e = Cr::from_int(1i64).exp();
    assert_close(&approx_e, &e, -10);
}

#[test]
fn sin_of_pi_over_six_is_one_half() {
    let half_pi_sixth = creal::cr::pi().shift(-1).divide(&Cr::from_int(3i64));
    let sin = half_pi_sixth.sin();
    let half = Cr::from_int(1i64).shift(-1);
    assert_close(&sin, &half, -60);
}

#[test]
fn select_picks_the_correct_branch_without_resolving_sign() {
    let negative = Cr::from_int(-5i64);
    let low = Cr::from_int(0i64);
    let high = Cr::from_int(1i64);
    let selected = negative.select(&low, &high);
    assert_eq!(selected.get_approximation(0).unwrap(), rug::Integer::from(0));

    let positive = Cr::from_int(5i64);
    let selected = positive.select(&low, &high);
    assert_eq!(selected.get_approximation(0).unwrap(), rug::Integer::from(1));
}

#[test]
fn cancellation_flag_stops_an_in_flight_iteration() {
    let flag = creal::cancel::CancellationFlag::new();
    flag.set();
    let x = Cr::from_int(2i64);
    let root = x.sqrt();
    let result = root.get_approximation_with(-1000, &flag);
    assert!(matches!(result, Err(creal::CrealError::Cancelled)));
}

#[test]
fn idempotent_repeated_high_precision_queries() {
    let x = Cr::from_int(2i64).sqrt();
    let a = x.get_approximation(-200).unwrap();
    let b = x.get_approximation(-200).unwrap();
    assert_eq!(a, b);
}
