//! R-Tree benchmarks

use acad_spatial::{Point, RTree, Rectangle, SharedRTree, SpatialIndex};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn grid_rect(i: usize) -> Rectangle {
    let x = (i % 100) as f64;
    let y = (i / 100) as f64;
    Rectangle::new_2d(x, y, x + 1.0, y + 1.0)
}

fn grid_tree(size: usize) -> RTree<u64> {
    let mut tree = RTree::default();
    for i in 0..size {
        tree.insert(grid_rect(i), i as u64).unwrap();
    }
    tree
}

fn bench_rtree_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("RTree Insert");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(grid_tree(size).len()));
        });
    }

    group.finish();
}

fn bench_rtree_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("RTree Delete");

    group.bench_function("delete_half_10k", |b| {
        b.iter_with_setup(
            || grid_tree(10000),
            |mut tree| {
                for i in (0..10000).step_by(2) {
                    tree.delete(&grid_rect(i), &(i as u64)).unwrap();
                }
                black_box(tree.len())
            },
        );
    });

    group.finish();
}

fn bench_rtree_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("RTree Search");
    let tree = grid_tree(10000);

    group.bench_function("search_10k", |b| {
        b.iter(|| {
            let query = Rectangle::new_2d(25.0, 25.0, 75.0, 75.0);
            black_box(tree.search(&query).count())
        });
    });

    group.bench_function("search_contained_10k", |b| {
        b.iter(|| {
            let query = Rectangle::new_2d(25.0, 25.0, 75.0, 75.0);
            black_box(tree.search_contained(&query).count())
        });
    });

    group.finish();
}

fn bench_rtree_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("RTree Nearest");
    let tree = grid_tree(10000);

    for k in [1, 10, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(k), k, |b, &k| {
            b.iter(|| black_box(tree.nearest(&Point::new_2d(50.5, 50.5), k).len()));
        });
    }

    group.finish();
}

fn bench_shared_rtree_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("SharedRTree Search");
    let index = SharedRTree::from_tree(grid_tree(10000));

    group.bench_function("find_intersecting_10k", |b| {
        b.iter(|| {
            let query = Rectangle::new_2d(25.0, 25.0, 75.0, 75.0);
            black_box(index.find_intersecting(&query).unwrap())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rtree_insert,
    bench_rtree_delete,
    bench_rtree_search,
    bench_rtree_nearest,
    bench_shared_rtree_search
);
criterion_main!(benches);
