use alloc::format;
use core::hash::Hash;
use core::hash::Hasher;
use core::hint::black_box;
use core::marker::PhantomData;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use hi_hash::HashTable as HiHashTable;
use hi_hash::KeyOps;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

extern crate alloc;

trait KeyValuePair: Clone {
    fn new(key: u64) -> Self;

    fn hash_key(&self) -> u64;
    fn eq_key(&self, other: &Self) -> bool;
    fn gt_key(&self, other: &Self) -> bool;
}

#[derive(Clone)]
struct TestItem {
    key: String,
    _value: u64,
}

impl KeyValuePair for TestItem {
    fn new(key: u64) -> Self {
        black_box(Self {
            key: format!("key_{:016X}", key),
            _value: key,
        })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }

    fn gt_key(&self, other: &Self) -> bool {
        self.key > other.key
    }
}

#[derive(Clone)]
struct SmallTestItem {
    key: u64,
}

impl KeyValuePair for SmallTestItem {
    fn new(key: u64) -> Self {
        black_box(Self { key })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }

    fn gt_key(&self, other: &Self) -> bool {
        self.key > other.key
    }
}

#[derive(Clone)]
struct ItemOps<T>(PhantomData<T>);

impl<T> ItemOps<T> {
    fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: KeyValuePair> KeyOps<T> for ItemOps<T> {
    fn hash(&self, value: &T) -> u64 {
        value.hash_key()
    }

    fn equals(&self, a: &T, b: &T) -> bool {
        a.eq_key(b)
    }

    fn greater(&self, a: &T, b: &T) -> bool {
        a.gt_key(b)
    }
}

fn hi_table<T: KeyValuePair>(capacity: usize) -> HiHashTable<T, ItemOps<T>> {
    HiHashTable::with_ops(ItemOps::new(), capacity)
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
];

/// Fixed tables are benchmarked at this fraction of their capacity.
const LOAD_PERCENT: usize = 85;

fn target_population(size: usize) -> usize {
    size * LOAD_PERCENT / 100
}

fn random_items<TestItem: KeyValuePair>(count: usize) -> Vec<(u64, TestItem)> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| {
            let item = TestItem::new(rng.try_next_u64().unwrap());
            (item.hash_key(), item)
        })
        .collect()
}

fn bench_insert_random<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let population = target_population(*size);
        let hash_and_item = random_items::<TestItem>(population);

        group.throughput(Throughput::Elements(population as u64));
        group.bench_function(format!("hi_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = hi_table::<TestItem>(*size);
                    for (_, item) in hash_and_item {
                        black_box(table.insert(item).unwrap());
                    }
                    table
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = HashbrownHashTable::<TestItem>::with_capacity(*size);
                    for (hash, item) in hash_and_item {
                        match table.entry(hash, |v| v.eq_key(&item), |v| v.hash_key()) {
                            HashbrownEntry::Vacant(entry) => {
                                black_box(entry.insert(item));
                            }
                            HashbrownEntry::Occupied(_) => unreachable!(),
                        }
                    }
                    table
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_find_hit_miss<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "find_hit_miss_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let population = target_population(*size);

        let hits = (0..population as u64 * 2)
            .step_by(2)
            .map(|key| {
                let item = TestItem::new(key);
                (item.hash_key(), item)
            })
            .collect::<Vec<(u64, TestItem)>>();
        let misses = (1..=population as u64 * 2)
            .step_by(2)
            .map(|key| {
                let item = TestItem::new(key);
                (item.hash_key(), item)
            })
            .collect::<Vec<(u64, TestItem)>>();
        let combined = hits
            .iter()
            .zip(misses.iter())
            .flat_map(|(hit, miss)| [hit.clone(), miss.clone()])
            .collect::<Vec<_>>();

        let mut hi = hi_table::<TestItem>(*size);
        let mut hashbrown_table = HashbrownHashTable::<TestItem>::with_capacity(*size);
        for (hash, item) in hits.iter().cloned() {
            hi.insert(item.clone()).unwrap();
            hashbrown_table.insert_unique(hash, item, |v| v.hash_key());
        }

        group.throughput(Throughput::Elements(combined.len() as u64));
        group.bench_function(format!("hi_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut combined = combined.clone();
                    combined.shuffle(&mut SmallRng::from_os_rng());
                    combined
                },
                |combined| {
                    for (_, key) in combined.iter() {
                        black_box(hi.find(key));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut combined = combined.clone();
                    combined.shuffle(&mut SmallRng::from_os_rng());
                    combined
                },
                |combined| {
                    for (hash, key) in combined.iter() {
                        black_box(hashbrown_table.find(*hash, |v| v.eq_key(key)));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_remove<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<TestItem>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let population = target_population(*size);
        let hash_and_item = random_items::<TestItem>(population);

        let mut hi = hi_table::<TestItem>(*size);
        let mut hashbrown_table = HashbrownHashTable::<TestItem>::with_capacity(*size);
        for (hash, item) in hash_and_item.iter().cloned() {
            hi.insert(item.clone()).unwrap();
            hashbrown_table.insert_unique(hash, item, |v| v.hash_key());
        }

        group.throughput(Throughput::Elements(population as u64));
        group.bench_function(format!("hi_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut order = hash_and_item.clone();
                    order.shuffle(&mut SmallRng::from_os_rng());
                    (hi.clone(), order)
                },
                |(mut table, order)| {
                    for (_, item) in order.iter() {
                        black_box(table.remove(item).unwrap());
                    }
                    table
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut order = hash_and_item.clone();
                    order.shuffle(&mut SmallRng::from_os_rng());
                    (hashbrown_table.clone(), order)
                },
                |(mut table, order)| {
                    for (hash, item) in order.iter() {
                        if let Ok(entry) = table.find_entry(*hash, |v| v.eq_key(item)) {
                            black_box(entry.remove());
                        }
                    }
                    table
                },
                BatchSize::LargeInput,
            )
        });
    }
}

fn bench_churn_zipf<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    for exponent in [1.0, 1.3] {
        let mut group = c.benchmark_group(format!(
            "churn_zipf_{:.01}_{}",
            exponent,
            core::any::type_name::<TestItem>()
        ));
        group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

        for size in SIZES[..=MAX_SIZE].iter() {
            let population = target_population(*size);
            let key_distr = Zipf::new(*size as f32 * 2.0, exponent).unwrap();
            let mut rng = SmallRng::from_os_rng();
            let operations = (0..population * 3)
                .map(|_| {
                    let item = TestItem::new(rng.sample(key_distr) as u64);
                    (item.hash_key(), item, rng.random_bool(0.5))
                })
                .collect::<Vec<(u64, TestItem, bool)>>();

            group.throughput(Throughput::Elements(operations.len() as u64));
            group.bench_function(format!("hi_hash/{size}"), |b| {
                b.iter(|| {
                    let mut table = hi_table::<TestItem>(*size);
                    for (_, item, insert) in operations.iter() {
                        if *insert && table.len() < population {
                            black_box(table.insert(item.clone()).unwrap());
                        } else {
                            black_box(table.remove(item).ok());
                        }
                    }
                    table
                })
            });

            group.bench_function(format!("hashbrown/{size}"), |b| {
                b.iter(|| {
                    let mut table = HashbrownHashTable::<TestItem>::with_capacity(*size);
                    for (hash, item, insert) in operations.iter() {
                        if *insert && table.len() < population {
                            if let HashbrownEntry::Vacant(entry) =
                                table.entry(*hash, |v| v.eq_key(item), |v| v.hash_key())
                            {
                                black_box(entry.insert(item.clone()));
                            }
                        } else if let Ok(entry) = table.find_entry(*hash, |v| v.eq_key(item)) {
                            black_box(entry.remove());
                        }
                    }
                    table
                })
            });
        }
    }
}

criterion_group!(
    benches,
    bench_insert_random::<SmallTestItem, 6>,
    bench_insert_random::<TestItem, 6>,
    bench_find_hit_miss::<SmallTestItem, 6>,
    bench_find_hit_miss::<TestItem, 6>,
    bench_remove::<SmallTestItem, 6>,
    bench_remove::<TestItem, 6>,
    bench_churn_zipf::<SmallTestItem, 4>,
    bench_churn_zipf::<TestItem, 4>,
);

criterion_main!(benches);
