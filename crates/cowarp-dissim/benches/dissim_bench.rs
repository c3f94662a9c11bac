//! Criterion benchmarks for cowarp-dissim: single measures and pairwise matrices.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use cowarp_dissim::{Measure, pairwise};

fn make_spectrum(n: usize, phase: f64) -> Vec<f64> {
    (0..n)
        .map(|i| ((i as f64 * 0.17 + phase).sin() - 0.2).max(0.0))
        .collect()
}

fn bench_measures(c: &mut Criterion) {
    let mut group = c.benchmark_group("dissim_measure");
    let x = make_spectrum(1024, 0.0);
    let y = make_spectrum(1024, 0.7);

    for measure in [Measure::Presence, Measure::Correlation, Measure::Nominal, Measure::Ordinal] {
        let id = BenchmarkId::new("len1024", measure.name());
        group.bench_with_input(id, &(&x, &y), |b, (x, y)| {
            b.iter(|| measure.distance(x, y).unwrap());
        });
    }

    group.finish();
}

fn bench_pairwise(c: &mut Criterion) {
    let spectra: Vec<Vec<f64>> = (0..60).map(|i| make_spectrum(256, i as f64 * 0.1)).collect();
    c.bench_function("pairwise_ordinal_60x256", |b| {
        b.iter(|| pairwise(&spectra, Measure::Ordinal).unwrap());
    });
}

criterion_group!(benches, bench_measures, bench_pairwise);
criterion_main!(benches);
