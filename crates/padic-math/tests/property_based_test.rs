use num_bigint::BigInt;
use padic_math::integer::{expand_padic, vp_bigint};
use padic_math::normalize::Normalizer;
use padic_math::source::{DigitSource, LiteralSource};
use padic_math::{
    difference, negate, padic_distance, product, sum, Literal, PAdic, RenderOptions, Valuation,
};
use proptest::prelude::*;

/// Bases where valuations are additive under multiplication.
fn prime_base() -> impl Strategy<Value = u32> {
    prop::sample::select(vec![2u32, 3, 5, 7, 11, 13])
}

fn nonzero_int() -> impl Strategy<Value = i64> {
    (-1_000_000i64..1_000_000).prop_filter("nonzero", |n| *n != 0)
}

/// A nonzero number with up to three fractional places.
fn fractional_padic(base: u32) -> impl Strategy<Value = PAdic> {
    (nonzero_int(), 0i64..4).prop_map(move |(n, places)| {
        PAdic::from_integer(n, base)
            .and_then(|x| x.shift(-places))
            .unwrap()
    })
}

proptest! {
    /// Property: normalized digits always lie in [0, base)
    #[test]
    fn prop_normalized_digits_in_range(
        digits in prop::collection::vec(-500i64..500, 0..12),
        base in 2u32..40,
    ) {
        let normalizer = Normalizer::new(base, LiteralSource::new(digits)).unwrap();
        for digit in normalizer.initial_digits(30) {
            prop_assert!((0..base as i64).contains(&digit), "digit {} out of range", digit);
        }
    }

    /// Property: normalized digits agree with the floored expansion of the
    /// integer the raw digits denote
    #[test]
    fn prop_normalization_matches_integer_expansion(
        digits in prop::collection::vec(-50i64..50, 0..8),
        base in 2u32..17,
    ) {
        let value = padic_math::integer::digits_to_bigint(&digits, base);
        let normalizer = Normalizer::new(base, LiteralSource::new(digits)).unwrap();
        prop_assert_eq!(normalizer.initial_digits(20), expand_padic(&value, base, 20));
    }

    /// Property: negation is an involution
    #[test]
    fn prop_double_negation(n in nonzero_int(), base in prime_base()) {
        let x = PAdic::from_integer(n, base).unwrap();
        let twice = negate(&negate(&x));
        prop_assert_eq!(twice.valuation(), x.valuation());
        prop_assert_eq!(twice.digits(25), x.digits(25));
    }

    /// Property: x + (-x) is zero
    #[test]
    fn prop_additive_inverse(base in prime_base(), seed in any::<u64>()) {
        let n = (seed % 2_000_000) as i64 - 1_000_000;
        let x = PAdic::from_integer(n, base).unwrap();
        let total = sum(&x, &negate(&x)).unwrap();
        prop_assert!(total.valuation().is_infinite());
        prop_assert_eq!(total.render(10, RenderOptions::default()).unwrap(), "0");
    }

    /// Property: x + (-x) = 0 also when x has fractional digits
    #[test]
    fn prop_additive_inverse_fractional(
        (base, x) in (2u32..37).prop_flat_map(|base| (Just(base), fractional_padic(base))),
    ) {
        let minus_x = negate(&x);
        prop_assert_eq!(minus_x.valuation(), x.valuation());
        let total = sum(&x, &minus_x).unwrap();
        prop_assert!(total.valuation().is_infinite(), "base {} x {:?}", base, x);
        prop_assert_eq!(total.render(10, RenderOptions::default()).unwrap(), "0");
    }

    /// Property: v(xy) = v(x) + v(y) over prime bases
    #[test]
    fn prop_product_valuation_additive(
        base in prime_base(),
        a in nonzero_int(),
        b in nonzero_int(),
    ) {
        let x = PAdic::from_integer(a, base).unwrap();
        let y = PAdic::from_integer(b, base).unwrap();
        let expected = match (x.valuation(), y.valuation()) {
            (Valuation::Finite(vx), Valuation::Finite(vy)) => Valuation::new(vx + vy),
            _ => Valuation::infinite(),
        };
        prop_assert_eq!(product(&x, &y).unwrap().valuation(), expected);
    }

    /// Property: valuation additivity also holds with fractional operands
    #[test]
    fn prop_fractional_product_valuation(base in prime_base(), seed in any::<u64>()) {
        let n = (seed % 10_000) as i64 + 1;
        let x = PAdic::from_integer(n, base).unwrap().shift(-2).unwrap();
        let y = PAdic::from_integer(n + 1, base).unwrap().shift(-1).unwrap();
        let vx = x.valuation().finite_value().unwrap();
        let vy = y.valuation().finite_value().unwrap();
        prop_assert_eq!(product(&x, &y).unwrap().valuation(), Valuation::new(vx + vy));
    }

    /// Property: integer valuation matches the exact BigInt valuation
    #[test]
    fn prop_integer_valuation_matches_bigint(n in nonzero_int(), base in 2u32..37) {
        let x = PAdic::from_integer(n, base).unwrap();
        prop_assert_eq!(x.valuation(), vp_bigint(&BigInt::from(n), base));
    }

    /// Property: rendering and re-parsing reproduces the digits shown
    #[test]
    fn prop_render_round_trip(n in -1_000_000i64..1_000_000, base in 2u32..37, len in 1usize..30) {
        let x = PAdic::from_integer(n, base).unwrap();
        let text = x.render(len, RenderOptions::default()).unwrap();
        let parsed = PAdic::parse(&text, Some(base)).unwrap();
        prop_assert_eq!(parsed.digits(len), x.digits(len));
    }

    /// Property: round trip keeps fractional digits too
    #[test]
    fn prop_render_round_trip_fractional(
        (base, x) in prime_base().prop_flat_map(|base| (Just(base), fractional_padic(base))),
        len in 1usize..20,
    ) {
        let text = x.render(len, RenderOptions::default()).unwrap();
        let parsed = PAdic::parse(&text, Some(base)).unwrap();
        let low = x.valuation().finite_value().unwrap().min(0);
        for power in low..len as i64 {
            prop_assert_eq!(parsed.digit_at(power), x.digit_at(power), "power {}", power);
        }
    }

    /// Property: p-adic distance is symmetric
    #[test]
    fn prop_distance_symmetric(a in nonzero_int(), b in nonzero_int(), base in prime_base()) {
        prop_assume!(a != b);
        let x = PAdic::from_integer(a, base).unwrap();
        let y = PAdic::from_integer(b, base).unwrap();
        let dist_xy = padic_distance(&x, &y).unwrap();
        let dist_yx = padic_distance(&y, &x).unwrap();
        prop_assert!((dist_xy - dist_yx).abs() < 1e-12);
    }

    /// Property: differences agree with exact integer subtraction
    #[test]
    fn prop_difference_matches_integers(a in nonzero_int(), b in nonzero_int(), base in prime_base()) {
        let x = PAdic::from_integer(a, base).unwrap();
        let y = PAdic::from_integer(b, base).unwrap();
        let diff = difference(&x, &y).unwrap();
        prop_assert_eq!(diff.digits(30), expand_padic(&BigInt::from(a - b), base, 30));
    }

    /// Property: exact literal arithmetic agrees with the lazy engine
    #[test]
    fn prop_literal_product_matches_lazy_product(a in nonzero_int(), b in nonzero_int()) {
        let la = Literal::from_integer(a, 10).unwrap();
        let lb = Literal::from_integer(b, 10).unwrap();
        let exact = la.try_mul(&lb).unwrap().to_padic().unwrap();
        let lazy = product(&la.to_padic().unwrap(), &lb.to_padic().unwrap()).unwrap();
        prop_assert_eq!(lazy.digits(40), exact.digits(40));
    }
}
