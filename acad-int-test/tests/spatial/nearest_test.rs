//! Nearest-neighbour queries checked against a brute-force scan.

use acad_int_test::test_util::{brute_force_distances, create_test_context, run_test};
use acad_spatial::{CancellationToken, Point, Rectangle, SpatialError};

#[test]
fn test_nearest_one_matches_brute_force() {
    run_test(
        || create_test_context(8, 3, 20),
        |ctx| {
            ctx.insert_random(1200)?;
            ctx.delete_random(200)?;

            for _ in 0..100 {
                let point = ctx.random_point();
                let expected = brute_force_distances(&ctx.mirror, &point);
                let found = ctx.tree.nearest_with_distance(&point, 1, None);
                assert_eq!(found.len(), 1);
                // ids may differ on exact ties, distances may not
                assert_eq!(found[0].distance, expected[0].0);
                assert_eq!(found[0].rect.distance_to_point(&point), expected[0].0);
            }
            Ok(())
        },
    )
}

#[test]
fn test_k_nearest_distances_match_brute_force() {
    run_test(
        || create_test_context(10, 4, 21),
        |ctx| {
            ctx.insert_random(1000)?;
            for k in [1usize, 5, 25, 100] {
                let point = ctx.random_point();
                let expected: Vec<f64> = brute_force_distances(&ctx.mirror, &point)
                    .into_iter()
                    .take(k)
                    .map(|(d, _)| d)
                    .collect();
                let actual: Vec<f64> = ctx
                    .tree
                    .nearest_with_distance(&point, k, None)
                    .into_iter()
                    .map(|n| n.distance)
                    .collect();
                assert_eq!(actual, expected);
            }
            Ok(())
        },
    )
}

#[test]
fn test_within_distance_matches_brute_force() {
    run_test(
        || create_test_context(8, 3, 22),
        |ctx| {
            ctx.insert_random(600)?;
            for _ in 0..30 {
                let point = ctx.random_point();
                let expected: Vec<f64> = brute_force_distances(&ctx.mirror, &point)
                    .into_iter()
                    .map(|(d, _)| d)
                    .take_while(|d| *d <= 40.0)
                    .collect();
                let actual: Vec<f64> = ctx
                    .tree
                    .within_distance(&point, 40.0)
                    .into_iter()
                    .map(|n| n.distance)
                    .collect();
                assert_eq!(actual, expected);
            }
            Ok(())
        },
    )
}

#[test]
fn test_nearest_to_rect_prefers_overlap() {
    run_test(
        || create_test_context(4, 2, 23),
        |ctx| {
            ctx.insert(Rectangle::new_2d(0.0, 0.0, 1.0, 1.0))?;
            let overlapping = ctx.insert(Rectangle::new_2d(10.0, 10.0, 12.0, 12.0))?;
            ctx.insert(Rectangle::new_2d(20.0, 20.0, 21.0, 21.0))?;

            let found = ctx.tree.nearest_to_rect(&Rectangle::new_2d(11.0, 11.0, 15.0, 15.0), 2);
            assert_eq!(*found[0].payload, overlapping);
            assert_eq!(found[0].distance, 0.0);
            assert!(found[1].distance > 0.0);
            Ok(())
        },
    )
}

#[test]
fn test_nearest_on_empty_tree() {
    run_test(
        || create_test_context(4, 2, 24),
        |ctx| {
            assert!(ctx.tree.nearest(&Point::new_2d(0.0, 0.0), 5).is_empty());
            assert!(ctx.tree.within_distance(&Point::new_2d(0.0, 0.0), 1e9).is_empty());
            Ok(())
        },
    )
}

#[test]
fn test_nearest_cancelled() {
    run_test(
        || create_test_context(4, 2, 25),
        |ctx| {
            ctx.insert_random(100)?;
            let token = CancellationToken::new();
            token.cancel();
            let result = ctx
                .tree
                .nearest_cancellable(&Point::new_2d(0.0, 0.0), 3, None, &token);
            assert!(matches!(result, Err(SpatialError::Cancelled)));
            Ok(())
        },
    )
}
