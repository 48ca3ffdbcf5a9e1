//! Structural invariants under long mixed workloads.

use acad_int_test::test_util::{create_test_context, run_test};

#[test]
fn test_invariants_after_inserts() {
    run_test(
        || create_test_context(8, 3, 1),
        |ctx| {
            for _ in 0..10 {
                ctx.insert_random(100)?;
                ctx.assert_consistent();
            }
            assert!(ctx.tree.height() >= 3);
            Ok(())
        },
    )
}

#[test]
fn test_invariants_after_mixed_workload() {
    run_test(
        || create_test_context(6, 2, 2),
        |ctx| {
            for round in 0..20 {
                ctx.insert_random(50)?;
                ctx.delete_random(30 + round)?;
                ctx.assert_consistent();
            }
            Ok(())
        },
    )
}

#[test]
fn test_invariants_with_default_config() {
    run_test(
        || create_test_context(50, 20, 3),
        |ctx| {
            ctx.insert_random(3000)?;
            ctx.assert_consistent();
            ctx.delete_random(2500)?;
            ctx.assert_consistent();
            ctx.delete_random(500)?;
            assert!(ctx.tree.is_empty());
            assert_eq!(ctx.tree.height(), 1);
            Ok(())
        },
    )
}

#[test]
fn test_root_bounds_cover_every_entry() {
    run_test(
        || create_test_context(4, 2, 4),
        |ctx| {
            ctx.insert_random(400)?;
            ctx.delete_random(150)?;

            let bounds = ctx.tree.bounds().expect("tree is not empty");
            for (rect, _) in &ctx.mirror {
                assert!(bounds.contains(rect), "{} escapes {}", rect, bounds);
            }
            Ok(())
        },
    )
}

#[test]
fn test_stats_track_shape() {
    run_test(
        || create_test_context(10, 4, 5),
        |ctx| {
            ctx.insert_random(1000)?;
            let stats = ctx.tree.stats();
            assert_eq!(stats.total_entries, 1000);
            assert_eq!(stats.tree_height, ctx.tree.height());
            assert_eq!(stats.node_count, ctx.tree.node_count() as u64);
            assert!(stats.leaf_count >= 100);
            assert!(stats.fill_factor >= 0.35);
            Ok(())
        },
    )
}
