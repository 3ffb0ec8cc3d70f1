use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{
    apply_medium_runtime_config, apply_small_runtime_config, scattered_keys, seed_base,
    seed_for_iter, shuffled_keys,
};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rbtree::{Map, OrderedMap, StdBTreeMap};

const SIZES: [usize; 4] = [1_000, 16_000, 64_000, 256_000];
const OPS_PER_ITER: usize = 200;
const HIT_RATE_PERCENT: u64 = 80;
const UPDATE_SHARE_PERCENT: u64 = 20;

#[derive(Clone, Copy)]
enum Op {
    Get { key: u64 },
    LowerBound { key: u64 },
    Insert { key: u64, value: u64 },
    Remove { key: u64 },
}

fn filled<M: OrderedMap<Key = u64, Value = u64>>(keys: &[u64], seed: u64) -> M {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut map = M::new();
    for &k in keys {
        black_box(map.insert(k, rng.random()));
    }
    map
}

fn lookup_key(keys: &[u64], rng: &mut StdRng) -> u64 {
    if rng.random_range(0..100) < HIT_RATE_PERCENT {
        keys[rng.random_range(0..keys.len())]
    } else {
        rng.random()
    }
}

fn read_op(keys: &[u64], rng: &mut StdRng) -> Op {
    let key = lookup_key(keys, rng);
    if rng.random::<bool>() {
        Op::Get { key }
    } else {
        Op::LowerBound { key }
    }
}

/// Inserts fresh keys and removes only keys inserted earlier in the same
/// batch, so the container size is the same before and after every batch.
fn ops_batch(keys: &[u64], update_percent: u64, fresh_seed: u64, rng: &mut StdRng) -> Vec<Op> {
    let mut ops = Vec::with_capacity(OPS_PER_ITER);
    let mut live = Vec::new();
    let mut fresh = 0_u64;
    while ops.len() < OPS_PER_ITER {
        let left = OPS_PER_ITER - ops.len();
        if live.len() >= left {
            let key = live.swap_remove(rng.random_range(0..live.len()));
            ops.push(Op::Remove { key });
        } else if rng.random_range(0..100) < update_percent {
            if !live.is_empty() && rng.random::<bool>() {
                let key = live.swap_remove(rng.random_range(0..live.len()));
                ops.push(Op::Remove { key });
            } else {
                let key = bench::mix_seed(fresh_seed ^ fresh);
                fresh += 1;
                live.push(key);
                ops.push(Op::Insert {
                    key,
                    value: rng.random(),
                });
            }
        } else {
            ops.push(read_op(keys, rng));
        }
    }
    ops
}

fn run_ops<M: OrderedMap<Key = u64, Value = u64>>(map: &mut M, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Get { key } => {
                black_box(map.get(&key).copied());
            }
            Op::LowerBound { key } => {
                black_box(map.lower_bound(&key).map(|(k, v)| (*k, *v)));
            }
            Op::Insert { key, value } => {
                black_box(map.insert(key, value));
            }
            Op::Remove { key } => {
                black_box(map.remove(&key));
            }
        }
    }
}

fn bench_workload<M, T>(
    group: &mut BenchmarkGroup<'_, T>,
    label: &str,
    workload_id: u64,
    update_percent: u64,
) where
    T: Measurement<Value = Duration>,
    M: OrderedMap<Key = u64, Value = u64>,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let base_seed = seed_base(workload_id, size as u64);
        let keys = scattered_keys(size, base_seed);
        let mut map: M = filled(&keys, base_seed ^ 0x11_22_33_44);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for iter in 0..iters {
                    let iter_seed = seed_for_iter(base_seed, iter);
                    let mut rng = StdRng::seed_from_u64(iter_seed);
                    let ops = ops_batch(&keys, update_percent, !iter_seed, &mut rng);
                    let start = Instant::now();
                    run_ops(&mut map, &ops);
                    black_box(map.len());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_all_read<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_workload::<StdBTreeMap<u64, u64>, _>(group, "std_btree", 1, 0);
    bench_workload::<Map<u64, u64>, _>(group, "rbtree", 1, 0);
}

pub fn bench_all_mixed<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_workload::<StdBTreeMap<u64, u64>, _>(group, "std_btree", 2, UPDATE_SHARE_PERCENT);
    bench_workload::<Map<u64, u64>, _>(group, "rbtree", 2, UPDATE_SHARE_PERCENT);
}

pub fn bench_all_update<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_workload::<StdBTreeMap<u64, u64>, _>(group, "std_btree", 3, 100);
    bench_workload::<Map<u64, u64>, _>(group, "rbtree", 3, 100);
}

/// Bulk build from shuffled keys, then clone of the built map.
pub fn bench_build_and_clone<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    apply_medium_runtime_config(group);
    let mut rng = bench::default_rng();
    for &size in &SIZES {
        let keys = shuffled_keys(size, &mut rng);
        group.bench_with_input(BenchmarkId::new("build", size), &keys, |bencher, keys| {
            bencher.iter(|| keys.iter().map(|&k| (k, k)).collect::<Map<u64, u64>>())
        });

        let map: Map<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        group.bench_with_input(BenchmarkId::new("clone", size), &map, |bencher, map| {
            bencher.iter(|| map.clone())
        });
    }
}
