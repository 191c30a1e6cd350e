use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const LARGE_RUNTIME_SAMPLE_SIZE: usize = 10;
const LARGE_RUNTIME_WARM_UP_MS: u64 = 800;
const LARGE_RUNTIME_MEASURE_MS: u64 = 1500;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_large_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(LARGE_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(LARGE_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(LARGE_RUNTIME_MEASURE_MS));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// Input shapes a run-adaptive sort reacts to differently.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pattern {
    Random,
    FewDistinct,
    Ascending,
    Descending,
    /// Ascending blocks of 1024 whose ranges interleave.
    Sawtooth,
    /// Ascending, then 1% of the rows swapped at random.
    NearlySorted,
}

pub const ALL_PATTERNS: [Pattern; 6] = [
    Pattern::Random,
    Pattern::FewDistinct,
    Pattern::Ascending,
    Pattern::Descending,
    Pattern::Sawtooth,
    Pattern::NearlySorted,
];

impl Pattern {
    pub fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::FewDistinct => "few_distinct",
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Sawtooth => "sawtooth",
            Self::NearlySorted => "nearly_sorted",
        }
    }
}

const SAWTOOTH_BLOCK: usize = 1024;
const FEW_DISTINCT_VALUES: u64 = 16;

pub fn generate_keys<R: Rng + ?Sized>(rng: &mut R, pattern: Pattern, size: usize) -> Vec<u64> {
    match pattern {
        Pattern::Random => (0..size).map(|_| rng.random::<u64>()).collect(),
        Pattern::FewDistinct => (0..size)
            .map(|_| rng.random_range(0..FEW_DISTINCT_VALUES))
            .collect(),
        Pattern::Ascending => (0..size as u64).collect(),
        Pattern::Descending => (0..size as u64).rev().collect(),
        Pattern::Sawtooth => (0..size)
            .map(|i| ((i % SAWTOOTH_BLOCK) * 2 + (i / SAWTOOTH_BLOCK) % 2) as u64)
            .collect(),
        Pattern::NearlySorted => {
            let mut data: Vec<u64> = (0..size as u64).collect();
            if size > 0 {
                for _ in 0..(size / 100).max(1) {
                    let a = rng.random_range(0..size);
                    let b = rng.random_range(0..size);
                    data.swap(a, b);
                }
            }
            data
        }
    }
}
