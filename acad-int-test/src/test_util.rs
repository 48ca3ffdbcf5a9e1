use acad_spatial::{Point, RTree, RTreeConfig, Rectangle, SpatialResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;

/// Runs a test against a freshly built context, then checks that the tree
/// is still structurally sound and agrees with the brute-force mirror.
pub fn run_test<B, T>(before: B, test: T)
where
    B: FnOnce() -> SpatialResult<TestContext>,
    T: FnOnce(&mut TestContext) -> SpatialResult<()>,
{
    let mut ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let start_time = Instant::now();
    if let Err(e) = test(&mut ctx) {
        panic!("Test failed: {:?}", e);
    }
    ctx.assert_consistent();
    log::debug!(
        "Test finished with {} entries in {:?}",
        ctx.tree.len(),
        start_time.elapsed()
    );
}

/// An R-tree plus a flat list of everything that should be in it.
pub struct TestContext {
    pub tree: RTree<u64>,
    pub mirror: Vec<(Rectangle, u64)>,
    pub rng: StdRng,
    next_id: u64,
    extent: f64,
}

impl TestContext {
    pub fn new(config: RTreeConfig, seed: u64, extent: f64) -> SpatialResult<Self> {
        Ok(Self {
            tree: RTree::with_config(config)?,
            mirror: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            next_id: 0,
            extent,
        })
    }

    /// Inserts `count` random rectangles, returning their ids.
    pub fn insert_random(&mut self, count: usize) -> SpatialResult<Vec<u64>> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let rect = random_rect(&mut self.rng, self.extent, self.extent / 20.0);
            ids.push(self.insert(rect)?);
        }
        Ok(ids)
    }

    pub fn insert(&mut self, rect: Rectangle) -> SpatialResult<u64> {
        let id = self.next_id;
        self.next_id += 1;
        self.tree.insert(rect, id)?;
        self.mirror.push((rect, id));
        Ok(id)
    }

    /// Deletes `count` randomly chosen live entries.
    pub fn delete_random(&mut self, count: usize) -> SpatialResult<()> {
        for _ in 0..count.min(self.mirror.len()) {
            let index = self.rng.gen_range(0..self.mirror.len());
            let (rect, id) = self.mirror.swap_remove(index);
            let removed = self.tree.delete(&rect, &id)?;
            assert_eq!(removed, id);
        }
        Ok(())
    }

    pub fn random_query(&mut self, max_size: f64) -> Rectangle {
        random_rect(&mut self.rng, self.extent, max_size)
    }

    pub fn random_point(&mut self) -> Point {
        Point::new_2d(
            self.rng.gen_range(-self.extent * 0.1..self.extent * 1.1),
            self.rng.gen_range(-self.extent * 0.1..self.extent * 1.1),
        )
    }

    pub fn assert_consistent(&self) {
        let report = self.tree.check_integrity();
        assert!(report.is_valid, "integrity errors: {:?}", report.errors);
        assert_eq!(self.tree.len(), self.mirror.len());

        let stored: HashSet<u64> = self.tree.iter().map(|(_, id)| *id).collect();
        let expected: HashSet<u64> = self.mirror.iter().map(|(_, id)| *id).collect();
        assert_eq!(stored, expected);
    }
}

pub fn create_test_context(max: usize, min: usize, seed: u64) -> SpatialResult<TestContext> {
    let config = RTreeConfig::new()
        .with_max_node_entries(max)
        .with_min_node_entries(min);
    TestContext::new(config, seed, 1000.0)
}

/// A random planar rectangle with its lower corner inside `[0, extent)`.
pub fn random_rect(rng: &mut StdRng, extent: f64, max_size: f64) -> Rectangle {
    let x = rng.gen_range(0.0..extent);
    let y = rng.gen_range(0.0..extent);
    let w = rng.gen_range(0.0..max_size);
    let h = rng.gen_range(0.0..max_size);
    Rectangle::new_2d(x, y, x + w, y + h)
}

pub fn brute_force_intersecting(items: &[(Rectangle, u64)], query: &Rectangle) -> HashSet<u64> {
    items
        .iter()
        .filter(|(rect, _)| rect.intersects(query))
        .map(|(_, id)| *id)
        .collect()
}

/// Distances of every item to `point`, ascending.
pub fn brute_force_distances(items: &[(Rectangle, u64)], point: &Point) -> Vec<(f64, u64)> {
    let mut distances: Vec<(f64, u64)> = items
        .iter()
        .map(|(rect, id)| (rect.distance_to_point(point), *id))
        .collect();
    distances.sort_by(|a, b| a.0.total_cmp(&b.0));
    distances
}
