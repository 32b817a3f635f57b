use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: u32 = 1000;

fn shuffled_keys() -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(1);
    let mut keys: Vec<u32> = (0..NUM_OF_OPERATIONS).collect();
    keys.shuffle(&mut rng);
    keys
}

fn bench_btreeset_insert(c: &mut Criterion) {
    let keys = shuffled_keys();
    c.bench_function("bench btreeset insert", |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for key in &keys {
                set.insert(*key);
            }
            set
        })
    });
}

fn bench_btreeset_search(c: &mut Criterion) {
    let keys = shuffled_keys();
    let set: BTreeSet<u32> = keys.iter().cloned().collect();
    c.bench_function("bench btreeset search", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(set.get(key));
            }
        })
    });
}

fn bench_btreeset_remove(c: &mut Criterion) {
    let keys = shuffled_keys();
    let set: BTreeSet<u32> = keys.iter().cloned().collect();
    c.bench_function("bench btreeset remove", move |b| {
        b.iter(|| {
            let mut set = set.clone();
            for key in &keys {
                black_box(set.remove(key));
            }
        })
    });
}

macro_rules! bst_tree_benches {
    ($($module_name:ident: $type_name:ident,)*) => {
        $(
            mod $module_name {
                use balanced_trees::$module_name::$type_name;
                use criterion::{black_box, Criterion};

                fn build(keys: &[u32]) -> $type_name<u32> {
                    let mut tree = $type_name::new();
                    for key in keys {
                        tree.insert(*key).unwrap();
                    }
                    tree
                }

                pub fn bench_insert(c: &mut Criterion) {
                    let keys = super::shuffled_keys();
                    c.bench_function(&format!("bench {} insert", stringify!($module_name)), |b| {
                        b.iter(|| build(&keys))
                    });
                }

                pub fn bench_search(c: &mut Criterion) {
                    let keys = super::shuffled_keys();
                    let tree = build(&keys);
                    c.bench_function(&format!("bench {} search", stringify!($module_name)), move |b| {
                        b.iter(|| {
                            for key in &keys {
                                black_box(tree.search(key));
                            }
                        })
                    });
                }

                pub fn bench_remove(c: &mut Criterion) {
                    let keys = super::shuffled_keys();
                    c.bench_function(&format!("bench {} remove", stringify!($module_name)), move |b| {
                        b.iter_with_setup(
                            || build(&keys),
                            |mut tree| {
                                for key in &keys {
                                    black_box(tree.remove(key));
                                }
                            },
                        )
                    });
                }
            }
        )*
    };
}

bst_tree_benches!(
    avl_tree: AvlTree,
    red_black_tree: RedBlackTree,
);

criterion_group!(
    benches,
    bench_btreeset_insert,
    bench_btreeset_search,
    bench_btreeset_remove,
    avl_tree::bench_insert,
    avl_tree::bench_search,
    avl_tree::bench_remove,
    red_black_tree::bench_insert,
    red_black_tree::bench_search,
    red_black_tree::bench_remove,
);
criterion_main!(benches);
