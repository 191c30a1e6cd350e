use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{
    ALL_PATTERNS, apply_large_runtime_config, apply_small_runtime_config, default_rng,
    generate_keys,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const BENCH_SIZES: [usize; 4] = [1024, 16384, 65536, 262144];

fn bench_keys_only(c: &mut Criterion) {
    let mut rng = default_rng();
    for &pattern in &ALL_PATTERNS {
        let mut group = c.benchmark_group(format!("timsort/keys/{}", pattern.label()));

        for &size in &BENCH_SIZES {
            if size <= 16384 {
                apply_small_runtime_config(&mut group);
            } else {
                apply_large_runtime_config(&mut group);
            }
            let base = generate_keys(&mut rng, pattern, size);

            group.bench_function(BenchmarkId::new("timsort", size), |bencher| {
                bencher.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        let mut keys = base.clone();
                        let start = Instant::now();
                        timsort::sort_keys(&mut keys).unwrap();
                        total += start.elapsed();
                        black_box(&keys);
                    }
                    total
                });
            });

            group.bench_function(BenchmarkId::new("std_stable", size), |bencher| {
                bencher.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        let mut keys = base.clone();
                        let start = Instant::now();
                        keys.sort();
                        total += start.elapsed();
                        black_box(&keys);
                    }
                    total
                });
            });
        }
        group.finish();
    }
}

/// Keys plus two companion columns, against std sorting a row-major copy.
fn bench_with_companions(c: &mut Criterion) {
    let mut rng = default_rng();
    for &pattern in &ALL_PATTERNS {
        let mut group = c.benchmark_group(format!("timsort/columns/{}", pattern.label()));

        for &size in &BENCH_SIZES {
            if size <= 16384 {
                apply_small_runtime_config(&mut group);
            } else {
                apply_large_runtime_config(&mut group);
            }
            let base = generate_keys(&mut rng, pattern, size);
            let ids: Vec<u32> = (0..size as u32).collect();
            let weights: Vec<f64> = base.iter().map(|&k| k as f64 * 0.5).collect();

            group.bench_function(BenchmarkId::new("timsort", size), |bencher| {
                bencher.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        let mut keys = base.clone();
                        let mut columns = (ids.clone(), weights.clone());
                        let start = Instant::now();
                        timsort::sort_all(&mut keys, &mut columns).unwrap();
                        total += start.elapsed();
                        black_box((&keys, &columns));
                    }
                    total
                });
            });

            group.bench_function(BenchmarkId::new("std_stable_rows", size), |bencher| {
                bencher.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        let mut rows: Vec<(u64, u32, f64)> = base
                            .iter()
                            .zip(&ids)
                            .zip(&weights)
                            .map(|((&k, &id), &w)| (k, id, w))
                            .collect();
                        let start = Instant::now();
                        rows.sort_by_key(|row| row.0);
                        total += start.elapsed();
                        black_box(&rows);
                    }
                    total
                });
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_keys_only, bench_with_companions);
criterion_main!(benches);
