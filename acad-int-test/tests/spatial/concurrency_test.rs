use acad_int_test::test_util::random_rect;
use acad_spatial::{Point, RTreeConfig, Rectangle, SharedRTree, SpatialIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Barrier};
use std::thread;

fn shared_index() -> SharedRTree<u64> {
    let config = RTreeConfig::new()
        .with_max_node_entries(8)
        .with_min_node_entries(3);
    SharedRTree::new(config).unwrap()
}

#[test]
fn test_parallel_writers() {
    let index = shared_index();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let index = index.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(t);
                barrier.wait();
                for i in 0..250u64 {
                    let rect = random_rect(&mut rng, 1000.0, 20.0);
                    index.add(&rect, t * 1000 + i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(index.size(), 2000);
    let report = index.read().check_integrity();
    assert!(report.is_valid, "{:?}", report.errors);
}

#[test]
fn test_readers_during_writes() {
    let index = shared_index();
    for i in 0..500u64 {
        let x = (i % 25) as f64 * 4.0;
        let y = (i / 25) as f64 * 4.0;
        index.add(&Rectangle::new_2d(x, y, x + 1.0, y + 1.0), i).unwrap();
    }

    let barrier = Arc::new(Barrier::new(6));
    let mut handles = Vec::new();

    for t in 0..2u64 {
        let index = index.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            let mut rng = StdRng::seed_from_u64(100 + t);
            barrier.wait();
            for i in 0..200u64 {
                let rect = random_rect(&mut rng, 100.0, 2.0);
                let id = 10_000 + t * 1000 + i;
                index.add(&rect, id).unwrap();
                if i % 2 == 0 {
                    assert_eq!(index.remove(&rect, &id), Ok(id));
                }
            }
        }));
    }

    for _ in 0..4 {
        let index = index.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..100 {
                // the grid entries are never touched by the writers
                let hits = index
                    .find_intersecting(&Rectangle::new_2d(-1.0, -1.0, 200.0, 200.0))
                    .unwrap();
                assert!(hits.iter().filter(|id| **id < 500).count() == 500);

                let nearest = index.find_nearest(&Point::new_2d(0.5, 0.5), 1, None).unwrap();
                assert_eq!(nearest[0].1, 0.0);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(index.size(), 700);
    let tree = index.read();
    assert!(tree.check_integrity().is_valid);
}
