//! Delete semantics.

use acad_int_test::test_util::{create_test_context, run_test};
use acad_spatial::{RTree, Rectangle, SpatialError};

#[test]
fn test_concrete_scenario() {
    let mut tree = RTree::new(4, 2).unwrap();
    let a = Rectangle::new_2d(0.0, 0.0, 10.0, 10.0);
    let b = Rectangle::new_2d(20.0, 20.0, 30.0, 30.0);
    let c = Rectangle::new_2d(5.0, 5.0, 15.0, 15.0);
    tree.insert(a, "A").unwrap();
    tree.insert(b, "B").unwrap();
    tree.insert(c, "C").unwrap();

    let mut hits: Vec<&str> = tree
        .search(&Rectangle::new_2d(0.0, 0.0, 12.0, 12.0))
        .copied()
        .collect();
    hits.sort_unstable();
    assert_eq!(hits, vec!["A", "C"]);

    assert_eq!(tree.delete(&b, &"B"), Ok("B"));
    assert_eq!(tree.search(&b).count(), 0);
    assert!(tree.check_integrity().is_valid);
}

#[test]
fn test_insert_then_delete_hides_entry() {
    run_test(
        || create_test_context(6, 2, 30),
        |ctx| {
            ctx.insert_random(300)?;
            for _ in 0..50 {
                let rect = ctx.random_query(30.0);
                let id = ctx.insert(rect)?;
                let (stored, _) = ctx.mirror.pop().expect("just inserted");
                assert_eq!(ctx.tree.delete(&stored, &id)?, id);

                let everything = ctx.tree.bounds().expect("tree is not empty").union(&rect);
                assert!(ctx.tree.search(&everything).all(|found| *found != id));
            }
            Ok(())
        },
    )
}

#[test]
fn test_delete_missing_entry_reports_not_found() {
    run_test(
        || create_test_context(6, 2, 31),
        |ctx| {
            let ids = ctx.insert_random(100)?;
            let (rect, id) = ctx.mirror[0];
            assert_eq!(ids[0], id);

            // right box, wrong payload
            assert_eq!(ctx.tree.delete(&rect, &9999), Err(SpatialError::NotFound));
            // right payload, box far away
            let elsewhere = Rectangle::new_2d(-500.0, -500.0, -499.0, -499.0);
            assert_eq!(ctx.tree.delete(&elsewhere, &id), Err(SpatialError::NotFound));
            assert_eq!(ctx.tree.len(), 100);
            Ok(())
        },
    )
}

#[test]
fn test_delete_everything_in_random_order() {
    run_test(
        || create_test_context(5, 2, 32),
        |ctx| {
            ctx.insert_random(500)?;
            while !ctx.mirror.is_empty() {
                ctx.delete_random(25)?;
                ctx.assert_consistent();
            }
            assert!(ctx.tree.is_empty());
            assert_eq!(ctx.tree.height(), 1);
            assert_eq!(ctx.tree.node_count(), 1);
            assert!(ctx.tree.bounds().is_none());
            Ok(())
        },
    )
}

#[test]
fn test_delete_tolerates_coordinate_noise() {
    run_test(
        || create_test_context(6, 2, 33),
        |ctx| {
            ctx.insert_random(200)?;
            let (rect, id) = ctx.mirror.swap_remove(17);
            let min = rect.min();
            let max = rect.max();
            let noisy = Rectangle::new(
                [min[0] + 5e-5, min[1] - 5e-5, min[2]],
                [max[0] - 5e-5, max[1] + 5e-5, max[2]],
            );
            assert_eq!(ctx.tree.delete(&noisy, &id)?, id);
            Ok(())
        },
    )
}

#[test]
fn test_duplicate_rectangles() {
    run_test(
        || create_test_context(4, 2, 34),
        |ctx| {
            let rect = Rectangle::new_2d(3.0, 3.0, 4.0, 4.0);
            let ids: Vec<u64> = (0..20).map(|_| ctx.insert(rect)).collect::<Result<_, _>>()?;
            assert_eq!(ctx.tree.search(&rect).count(), 20);

            for id in ids.iter().step_by(2) {
                assert_eq!(ctx.tree.delete(&rect, id)?, *id);
            }
            ctx.mirror.retain(|(_, id)| id % 2 == 1);

            let mut left: Vec<u64> = ctx.tree.search(&rect).copied().collect();
            left.sort_unstable();
            assert_eq!(left, ids.into_iter().filter(|id| id % 2 == 1).collect::<Vec<_>>());
            Ok(())
        },
    )
}
