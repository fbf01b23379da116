use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{apply_runtime_config_for_size, default_rng};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::Rng;

use linear::{Cursor, LinkedList, Sequence, Vector};

const SIZES: [usize; 3] = [1_000, 4_000, 16_000];
const OPS_PER_ITER: usize = 200;

#[derive(Clone, Copy, Debug)]
pub enum Access {
    First,
    Last,
    Middle,
}

#[derive(Clone, Copy, Debug)]
pub enum Update {
    Append,
    Prepend,
    PopFirst,
    PopLast,
}

/// Times `OPS_PER_ITER` mutations against a fresh copy of a prebuilt
/// sequence; the copy is made outside the measured window.
pub fn bench_update<S, T>(group: &mut BenchmarkGroup<'_, T>, label: &str, update: Update)
where
    T: Measurement<Value = Duration>,
    S: Sequence<Item = u64> + Clone,
{
    for &size in &SIZES {
        apply_runtime_config_for_size(size, group);
        let values = generate_values(size);
        let base = build::<S>(&values);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let mut seq = base.clone();
                    let start = Instant::now();
                    run_update(&mut seq, update, &values);
                    black_box(seq.len());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_access<S, T>(group: &mut BenchmarkGroup<'_, T>, label: &str, access: Access)
where
    T: Measurement<Value = Duration>,
    S: Sequence<Item = u64>,
{
    for &size in &SIZES {
        apply_runtime_config_for_size(size, group);
        let seq = build::<S>(&generate_values(size));

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| black_box(read_at(&seq, black_box(access))))
        });
    }
}

fn run_update<S: Sequence<Item = u64>>(seq: &mut S, update: Update, values: &[u64]) {
    for &value in values.iter().cycle().take(OPS_PER_ITER) {
        match update {
            Update::Append => seq.append(black_box(value)),
            Update::Prepend => seq.prepend(black_box(value)),
            Update::PopFirst => {
                black_box(seq.pop_first().ok());
            }
            Update::PopLast => {
                black_box(seq.pop_last().ok());
            }
        }
    }
}

fn read_at<S: Sequence<Item = u64>>(seq: &S, access: Access) -> Option<u64> {
    let cursor = match access {
        Access::First => Ok(seq.begin()),
        Access::Last => seq.end().retreat(1),
        Access::Middle => seq.begin().advance(seq.len() / 2),
    };
    cursor.ok().and_then(|c| c.get().ok().copied())
}

fn build<S: Sequence<Item = u64>>(values: &[u64]) -> S {
    let mut seq = S::new();
    seq.append_all(values.iter().copied());
    seq
}

fn generate_values(size: usize) -> Vec<u64> {
    let mut rng = default_rng();
    (0..size).map(|_| rng.random()).collect()
}

pub fn bench_all_update<T>(group: &mut BenchmarkGroup<'_, T>, update: Update)
where
    T: Measurement<Value = Duration>,
{
    bench_update::<Vector<u64>, _>(group, "vector", update);
    bench_update::<LinkedList<u64>, _>(group, "linked_list", update);
}

pub fn bench_all_access<T>(group: &mut BenchmarkGroup<'_, T>, access: Access)
where
    T: Measurement<Value = Duration>,
{
    bench_access::<Vector<u64>, _>(group, "vector", access);
    bench_access::<LinkedList<u64>, _>(group, "linked_list", access);
}
