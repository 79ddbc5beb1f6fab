//! Benchmarks for curve bootstrapping and queries.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use fi_bonds::Instrument;
use fi_core::prelude::*;
use fi_curves::prelude::*;

fn quotes(today: Date, count: i32) -> Vec<MarketQuote> {
    (1..=count)
        .map(|years| {
            MarketQuote::at_par(
                Instrument::par_swap(
                    100.0,
                    0.03 + 0.0005 * years as f64,
                    Frequency::SemiAnnual,
                    today,
                    today.add_years(years).unwrap(),
                    DayCountConvention::Thirty360US,
                )
                .unwrap(),
            )
        })
        .collect()
}

fn bench_bootstrap(c: &mut Criterion) {
    let today = Date::from_ymd(2025, 1, 2).unwrap();
    let quotes = quotes(today, 30);
    let mut group = c.benchmark_group("bootstrap_30y");

    for method in [
        InterpolationMethod::Linear,
        InterpolationMethod::LogLinear,
        InterpolationMethod::MonotoneCubicZero,
    ] {
        let bootstrapper = CurveBootstrapper::new(today).with_interpolation(method);
        group.bench_with_input(
            BenchmarkId::from_parameter(method),
            &quotes,
            |b, quotes| b.iter(|| bootstrapper.bootstrap(black_box(quotes))),
        );
    }

    group.finish();
}

fn bench_curve_queries(c: &mut Criterion) {
    let today = Date::from_ymd(2025, 1, 2).unwrap();
    let curve = CurveBootstrapper::new(today)
        .bootstrap(&quotes(today, 30))
        .unwrap();

    c.bench_function("discount_factor_1000", |b| {
        b.iter(|| {
            (0..1000)
                .map(|i| curve.discount_factor(black_box(i as f64 * 0.03)).unwrap_or(0.0))
                .sum::<f64>()
        });
    });
}

fn bench_matrix_bootstrap(c: &mut Criterion) {
    let n = 30;
    let payoffs: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| match j.cmp(&i) {
                    std::cmp::Ordering::Less => 4.0,
                    std::cmp::Ordering::Equal => 104.0,
                    std::cmp::Ordering::Greater => 0.0,
                })
                .collect()
        })
        .collect();
    let prices = vec![99.0; n];

    c.bench_function("matrix_bootstrap_30", |b| {
        b.iter(|| matrix_bootstrap(black_box(&payoffs), black_box(&prices)));
    });
}

criterion_group!(
    benches,
    bench_bootstrap,
    bench_curve_queries,
    bench_matrix_bootstrap
);
criterion_main!(benches);
