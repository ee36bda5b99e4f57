// Property-based checks on BoundedRational: small-integer algebraic
// identities that should hold for any pair of operands drawn from a modest
// range (well inside the MAX_SIZE budget, so nothing goes null).

use proptest::prelude::*;

use creal::BoundedRational;

fn small_rational(n: i64, d: i64) -> BoundedRational {
    let d = if d == 0 { 1 } else { d };
    BoundedRational::from_fraction(n, d).unwrap().unwrap()
}

proptest! {
    #[test]
    fn addition_is_commutative(n1 in -1000i64..1000, d1 in 1i64..1000, n2 in -1000i64..1000, d2 in 1i64..1000) {
        let a = small_rational(n1, d1);
        let b = small_rational(n2, d2);
        prop_assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn multiplication_distributes_over_addition(
        n1 in -100i64..100, d1 in 1i64..100,
        n2 in -100i64..100, d2 in 1i64..100,
        n3 in -100i64..100, d3 in 1i64..100,
    ) {
        let a = small_rational(n1, d1);
        let b = small_rational(n2, d2);
        let c = small_rational(n3, d3);
        let lhs = a.multiply(&b.add(&c).unwrap());
        let sum_of_products = a.multiply(&b).unwrap().add(&a.multiply(&c).unwrap());
        prop_assert_eq!(lhs, sum_of_products);
    }

    #[test]
    fn nonzero_value_times_its_inverse_is_one(n in 1i64..1000, d in 1i64..1000) {
        let a = small_rational(n, d);
        let inv = a.inverse().unwrap();
        prop_assert_eq!(a.multiply(&inv), Some(BoundedRational::one()));
    }

    #[test]
    fn squaring_then_taking_the_square_root_is_the_identity_for_nonnegatives(n in 0i64..10_000) {
        let a = BoundedRational::from_int(n);
        let squared = a.multiply(&a).unwrap();
        prop_assert_eq!(squared.exact_nth_root(2), Some(a));
    }
}
