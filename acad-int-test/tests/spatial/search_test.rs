//! Range queries checked against a brute-force scan.

use acad_int_test::test_util::{brute_force_intersecting, create_test_context, run_test};
use acad_spatial::{CancellationToken, Rectangle};
use std::collections::HashSet;

#[test]
fn test_search_matches_brute_force() {
    run_test(
        || create_test_context(8, 3, 10),
        |ctx| {
            ctx.insert_random(1500)?;
            ctx.delete_random(300)?;

            for _ in 0..100 {
                let query = ctx.random_query(150.0);
                let expected = brute_force_intersecting(&ctx.mirror, &query);
                let actual: Vec<u64> = ctx.tree.search(&query).copied().collect();
                assert_eq!(actual.len(), expected.len(), "duplicates or omissions for {}", query);
                assert_eq!(actual.into_iter().collect::<HashSet<_>>(), expected);
            }
            Ok(())
        },
    )
}

#[test]
fn test_union_query_returns_everything() {
    for n in [0usize, 1, 7, 64, 500] {
        run_test(
            || create_test_context(5, 2, n as u64),
            |ctx| {
                ctx.insert_random(n)?;
                let union = ctx
                    .mirror
                    .iter()
                    .map(|(rect, _)| *rect)
                    .reduce(|a, b| a.union(&b));

                let mut found: Vec<u64> = match union {
                    Some(query) => ctx.tree.search(&query).copied().collect(),
                    None => Vec::new(),
                };
                found.sort_unstable();
                assert_eq!(found, (0..n as u64).collect::<Vec<_>>());
                Ok(())
            },
        )
    }
}

#[test]
fn test_search_contained_matches_brute_force() {
    run_test(
        || create_test_context(8, 3, 11),
        |ctx| {
            ctx.insert_random(800)?;
            for _ in 0..50 {
                let query = ctx.random_query(300.0);
                let expected: HashSet<u64> = ctx
                    .mirror
                    .iter()
                    .filter(|(rect, _)| query.contains(rect))
                    .map(|(_, id)| *id)
                    .collect();
                let actual: HashSet<u64> = ctx.tree.search_contained(&query).copied().collect();
                assert_eq!(actual, expected);
            }
            Ok(())
        },
    )
}

#[test]
fn test_search_touching_edges() {
    run_test(
        || create_test_context(4, 2, 12),
        |ctx| {
            let left = ctx.insert(Rectangle::new_2d(0.0, 0.0, 1.0, 1.0))?;
            let right = ctx.insert(Rectangle::new_2d(1.0, 0.0, 2.0, 1.0))?;
            ctx.insert(Rectangle::new_2d(5.0, 5.0, 6.0, 6.0))?;

            let mut hits: Vec<u64> = ctx
                .tree
                .search(&Rectangle::new_2d(1.0, 0.5, 1.0, 0.5))
                .copied()
                .collect();
            hits.sort_unstable();
            assert_eq!(hits, vec![left, right]);
            Ok(())
        },
    )
}

#[test]
fn test_cancellable_search_agrees_until_cancelled() {
    run_test(
        || create_test_context(8, 3, 13),
        |ctx| {
            ctx.insert_random(500)?;
            let token = CancellationToken::new();
            let query = ctx.random_query(400.0);

            let lazy: HashSet<u64> = ctx.tree.search(&query).copied().collect();
            let eager: HashSet<u64> = ctx
                .tree
                .search_cancellable(&query, &token)?
                .into_iter()
                .copied()
                .collect();
            assert_eq!(lazy, eager);

            token.cancel();
            assert!(ctx.tree.search_cancellable(&query, &token).is_err());
            Ok(())
        },
    )
}
