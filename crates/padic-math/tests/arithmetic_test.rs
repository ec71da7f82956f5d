use padic_math::source::{Convolution, DigitSource, LiteralSource, PointwiseSum};
use padic_math::{
    difference, negate, product, sum, EngineConfig, Literal, MathError, Normalizer, PAdic,
    RenderOptions, Valuation,
};

fn parse(text: &str) -> PAdic {
    PAdic::parse(text, None).unwrap()
}

fn show(number: &PAdic, len: usize) -> String {
    number.render(len, RenderOptions::default()).unwrap()
}

#[test]
fn test_calculator_session() {
    // (12.5 - 0.25) * 4 = 49
    let lhs = difference(&parse("12.5"), &parse("0.25")).unwrap();
    let result = product(&lhs, &parse("4")).unwrap();
    assert_eq!(show(&result, 6), "49");
    assert_eq!(result.valuation(), Valuation::new(0));
}

#[test]
fn test_negative_results_wrap_into_nines() {
    let result = difference(&parse("3"), &parse("10")).unwrap();
    assert_eq!(show(&result, 8), "99999993");
    let back = sum(&result, &parse("10")).unwrap();
    assert_eq!(show(&back, 8), "3");
}

#[test]
fn test_fraction_and_integer_mix() {
    let total = sum(&parse("0.001"), &parse("999")).unwrap();
    assert_eq!(show(&total, 4), "999.001");
    assert_eq!(total.valuation(), Valuation::new(-3));
}

#[test]
fn test_binary_arithmetic() {
    let a = PAdic::parse("1011", Some(2)).unwrap();
    let b = PAdic::parse("11_2", None).unwrap();
    assert_eq!(show(&sum(&a, &b).unwrap(), 8), "1110");
    assert_eq!(show(&product(&a, &b).unwrap(), 8), "100001");
    assert_eq!(show(&negate(&a), 8), "11110101");
}

#[test]
fn test_high_base_render() {
    let x = PAdic::parse("zz", Some(36)).unwrap();
    let y = PAdic::parse("1", Some(36)).unwrap();
    let total = sum(&x, &y).unwrap();
    assert_eq!(
        total.render(4, RenderOptions::with_base()).unwrap(),
        "100_36"
    );
}

#[test]
fn test_mixed_bases_are_rejected() {
    let a = PAdic::parse("12", Some(3)).unwrap();
    let b = PAdic::parse("12", Some(5)).unwrap();
    assert!(matches!(
        product(&a, &b),
        Err(MathError::BaseMismatch { .. })
    ));
}

#[test]
fn test_zero_renders_as_zero() {
    let zero = parse("0");
    assert!(zero.valuation().is_infinite());
    for len in [0, 1, 5, 40] {
        assert_eq!(show(&zero, len), "0");
    }
}

#[test]
fn test_long_zero_run_reads_as_zero() {
    // A nonzero digit past the lookahead is invisible to the valuation search
    // of a sum: the lookahead bounds how far a cancellation is chased.
    let config = EngineConfig::default().with_max_digits(10);
    let mut digits = vec![0; 15];
    digits[0] = 1;
    digits[14] = 1;
    let x = PAdic::from_digits_with_config(10, &digits, &config).unwrap();
    let minus_one = negate(&PAdic::from_digits_with_config(10, &[1], &config).unwrap());
    let total = sum(&x, &minus_one).unwrap();
    assert!(total.valuation().is_infinite());
    assert_eq!(show(&total, 20), "0");
}

#[test]
fn test_sum_lookahead_boundary() {
    let total = sum(&parse("999999999"), &parse("1")).unwrap();
    assert_eq!(total.valuation(), Valuation::new(9));
    assert_eq!(show(&total, 12), "1000000000");
}

#[test]
fn test_raw_digit_composition() {
    let raw = Convolution::new(
        PointwiseSum::new(LiteralSource::new(vec![3, 1]), LiteralSource::new(vec![4])),
        LiteralSource::new(vec![5]),
    );
    let digits = Normalizer::new(10, raw).unwrap().initial_digits(4);
    // (13 + 4) * 5 = 85
    assert_eq!(digits, vec![5, 8, 0, 0]);
}

#[test]
fn test_literal_and_lazy_engine_agree() {
    let a = Literal::parse("-123.25", None).unwrap();
    let b = Literal::parse("7.5", None).unwrap();
    let exact = a.try_add(&b).unwrap();
    assert_eq!(exact.to_string(), "-115.75_10");
    let lazy = sum(&a.to_padic().unwrap(), &b.to_padic().unwrap()).unwrap();
    assert_eq!(show(&lazy, 10), show(&exact.to_padic().unwrap(), 10));
}

#[test]
fn test_from_f64() {
    let x = PAdic::from_f64(-0.5, 10).unwrap();
    assert_eq!(show(&x, 4), "9999.5");
    assert!(matches!(
        PAdic::from_f64(f64::NAN, 10),
        Err(MathError::NonFinite(_))
    ));
}
