//! Benchmarks for the product window and the breadth-first solver.
//!
//! Run with: cargo bench --package padic-math --bench solver_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use padic_math::{difference, product, solve_square, EngineConfig, PAdic};

fn bench_product_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_window");
    for max_digits in [25usize, 100, 400] {
        let config = EngineConfig::default().with_max_digits(max_digits);
        group.bench_with_input(BenchmarkId::from_parameter(max_digits), &config, |b, config| {
            b.iter(|| {
                let x = PAdic::from_digits_with_config(7, &[3, 1, 2, 6, 1], config).unwrap();
                let y = PAdic::from_digits_with_config(7, &[4, 5, 4, 0, 5], config).unwrap();
                let p = product(&x, &y).unwrap();
                black_box(p.digits(max_digits))
            })
        });
    }
    group.finish();
}

fn bench_negative_difference(c: &mut Criterion) {
    c.bench_function("difference_digits_100", |b| {
        b.iter(|| {
            let x = PAdic::parse(black_box("45"), None).unwrap();
            let y = PAdic::parse(black_box("12345.678"), None).unwrap();
            black_box(difference(&x, &y).unwrap().digits(100))
        })
    });
}

fn bench_square_root_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("square_root_base_7");
    for depth in [5usize, 10, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, depth| {
            b.iter(|| {
                let two = PAdic::from_integer(2, 7).unwrap();
                let mut solver = solve_square(&two).unwrap();
                solver.compute_digits(*depth).unwrap();
                black_box(solver.possible_solutions().len())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_product_window,
    bench_negative_difference,
    bench_square_root_search,
);

criterion_main!(benches);
