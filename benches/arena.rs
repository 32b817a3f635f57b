use balanced_trees::arena::{Handle, TypedArena};
use criterion::{criterion_group, criterion_main, Criterion};

const CHUNK_SIZE: usize = 1024;
const NUM_OF_ALLOCATIONS: usize = 100;

struct Link {
    pub val: i32,
    pub next: Option<Handle>,
}

fn bench_arena(c: &mut Criterion) {
    c.bench_function("bench arena", |b| {
        b.iter(|| {
            let mut arena = TypedArena::new(CHUNK_SIZE);
            let mut curr = arena.allocate(Link { val: 0, next: None }).unwrap();
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = arena
                    .allocate(Link {
                        val: arena[curr].val + 1,
                        next: Some(curr),
                    })
                    .unwrap();
            }
            arena
        })
    });
}

fn bench_arena_reuse(c: &mut Criterion) {
    let mut arena = TypedArena::new(CHUNK_SIZE);
    c.bench_function("bench arena reuse", move |b| {
        b.iter(|| {
            let mut handles = Vec::with_capacity(NUM_OF_ALLOCATIONS);
            for i in 0..NUM_OF_ALLOCATIONS {
                handles.push(arena.allocate(Link { val: i as i32, next: None }).unwrap());
            }
            for handle in handles {
                arena.free(handle);
            }
        })
    });
}

fn bench_box(c: &mut Criterion) {
    c.bench_function("bench box", |b| {
        b.iter(|| {
            struct BoxLink {
                pub val: i32,
                pub next: Option<Box<BoxLink>>,
            }

            let mut curr = Box::new(BoxLink { val: 0, next: None });
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = Box::new(BoxLink {
                    val: curr.val + 1,
                    next: Some(curr),
                });
            }
            curr
        })
    });
}

criterion_group!(benches, bench_arena, bench_arena_reuse, bench_box);
criterion_main!(benches);
