use chained_hashmap::ChainedHashMap;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (ChainedHashMap<String, u64>, Vec<String>) {
    let mut m = ChainedHashMap::new();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.insert(k.clone(), i as u64).unwrap();
    }
    (m, keys)
}

// Precompute `count` pseudo-random picks from `keys`.
fn sample(keys: &[String], count: usize) -> Vec<String> {
    let n = keys.len();
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..count)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            keys[(s as usize) % n].clone()
        })
        .collect()
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("chained::insert_fresh_100k", |b| {
        b.iter_batched(
            ChainedHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_erase_all_10k(c: &mut Criterion) {
    // Every erase walks the table back down through its shrink thresholds.
    c.bench_function("chained::erase_all_10k", |b| {
        b.iter_batched(
            || filled(5, 10_000),
            |(mut m, keys)| {
                for k in &keys {
                    m.erase(k).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_at_hit_10k(c: &mut Criterion) {
    c.bench_function("chained::at_hit_10k_on_100k", |b| {
        let (m, keys) = filled(7, 100_000);
        let queries = sample(&keys, 10_000);
        b.iter(|| {
            for k in &queries {
                black_box(m.at(k));
            }
        })
    });
}

fn bench_at_miss_10k(c: &mut Criterion) {
    c.bench_function("chained::at_miss_10k_on_100k", |b| {
        let (m, _) = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap());
                black_box(m.at(&k));
            }
        })
    });
}

fn bench_apply_if_and_iter(c: &mut Criterion) {
    c.bench_function("chained::apply_if_half_100k", |b| {
        b.iter_batched(
            || filled(123, 100_000).0,
            |mut m| {
                let n = m.apply_if(|k| k.as_bytes()[16] & 1 == 0, |v| *v = v.wrapping_add(1));
                black_box((m, n))
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("chained::iter_all_100k", |b| {
        let (m, _) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_erase_all_10k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_at_hit_10k,
              bench_at_miss_10k,
              bench_apply_if_and_iter
}
criterion_main!(benches_insert, benches_ops);
