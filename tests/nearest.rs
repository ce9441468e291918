use kdsearch::{BoundingBox, BuildConfig, KdTree, PartitionStrategy, Point, random_points_with_seed};
use rand::Rng;

fn brute_force_min(points: &[Point], query: &Point) -> f64 {
    points
        .iter()
        .map(|p| p.squared_distance(query))
        .fold(f64::INFINITY, f64::min)
}

fn random_cloud(rng: &mut impl Rng, count: usize, dim: usize) -> Vec<Point> {
    (0..count)
        .map(|_| Point::new((0..dim).map(|_| rng.gen_range(-50.0..50.0)).collect()))
        .collect()
}

#[test]
fn test_nearest_matches_brute_force() {
    let mut rng = rand::thread_rng();

    for dim in 1..=5 {
        for strategy in [PartitionStrategy::Sort, PartitionStrategy::Select] {
            let points = random_cloud(&mut rng, 500, dim);
            let mut tree = KdTree::with_config(BuildConfig::new(strategy));
            tree.build(points.clone()).unwrap();

            for _ in 0..100 {
                let query = Point::new((0..dim).map(|_| rng.gen_range(-60.0..60.0)).collect());
                let found = tree.nearest(&query).unwrap().expect("tree is not empty");
                let expected = brute_force_min(&points, &query);

                assert!(
                    (found.dist_sq - expected).abs() < 1e-9,
                    "dim {} {:?}: query {:?} found {} but brute force has {}",
                    dim, strategy, query, found.dist_sq, expected
                );
                assert!((found.point.squared_distance(&query) - found.dist_sq).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn test_size_and_height() {
    let mut rng = rand::thread_rng();

    for count in [1usize, 2, 3, 4, 7, 8, 9, 31, 32, 33, 100, 1000, 1025] {
        let points = random_cloud(&mut rng, count, 3);
        let tree = KdTree::from_points(points).unwrap();
        assert_eq!(tree.len(), count);
        assert_eq!(tree.height(), count.ilog2() as i32, "height for {} points", count);
        assert_eq!(tree.inorder().count(), count);
    }
}

#[test]
fn test_partition_invariant() {
    let mut rng = rand::thread_rng();

    for strategy in [PartitionStrategy::Sort, PartitionStrategy::Select] {
        let points = random_cloud(&mut rng, 300, 3);
        let mut tree = KdTree::with_config(BuildConfig::new(strategy));
        tree.build(points).unwrap();
        assert!(tree.is_partitioned(), "{:?} build broke the split ordering", strategy);
    }
}

#[test]
fn test_heavy_ties() {
    // Coordinates on a coarse lattice so most splits compare equal values.
    let mut rng = rand::thread_rng();
    let points: Vec<Point> = (0..400)
        .map(|_| Point::from([rng.gen_range(0..3i32) as f64, rng.gen_range(0..3i32) as f64]))
        .collect();

    for strategy in [PartitionStrategy::Sort, PartitionStrategy::Select] {
        let mut tree = KdTree::with_config(BuildConfig::new(strategy));
        tree.build(points.clone()).unwrap();
        assert_eq!(tree.len(), 400);
        assert!(tree.is_partitioned());

        for _ in 0..50 {
            let query = Point::from([rng.gen_range(-1.0..4.0), rng.gen_range(-1.0..4.0)]);
            let found = tree.nearest(&query).unwrap().unwrap();
            assert!((found.dist_sq - brute_force_min(&points, &query)).abs() < 1e-9);
        }
    }
}

#[test]
fn test_every_stored_point_is_found() {
    let bounds = BoundingBox::new(vec![0.0; 4], vec![1.0; 4]).unwrap();
    let points = random_points_with_seed(200, &bounds, 42);
    let tree = KdTree::from_points(points.clone()).unwrap();

    for p in &points {
        let found = tree.nearest(p).unwrap().unwrap();
        assert_eq!(found.dist_sq, 0.0);
        assert_eq!(found.point, p);
    }
}

#[test]
fn test_repeated_queries_do_not_leak_state() {
    let mut rng = rand::thread_rng();
    let points = random_cloud(&mut rng, 200, 2);
    let tree = KdTree::from_points(points).unwrap();

    let near = Point::from([0.0, 0.0]);
    let far = Point::from([1000.0, -1000.0]);
    let first = tree.nearest(&near).unwrap().unwrap();
    let _ = tree.nearest(&far).unwrap().unwrap();
    let second = tree.nearest(&near).unwrap().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_batch_and_threads_agree_with_sequential() {
    let mut rng = rand::thread_rng();
    let points = random_cloud(&mut rng, 1000, 3);
    let queries = random_cloud(&mut rng, 256, 3);
    let tree = KdTree::from_points(points).unwrap();

    let sequential: Vec<f64> = queries
        .iter()
        .map(|q| tree.nearest(q).unwrap().unwrap().dist_sq)
        .collect();
    let batch: Vec<f64> = tree
        .nearest_batch(&queries)
        .unwrap()
        .into_iter()
        .map(|n| n.unwrap().dist_sq)
        .collect();
    assert_eq!(sequential, batch);

    std::thread::scope(|s| {
        for chunk in queries.chunks(64) {
            let tree = &tree;
            s.spawn(move || {
                for q in chunk {
                    let n = tree.nearest(q).unwrap().unwrap();
                    assert!(n.dist_sq.is_finite());
                }
            });
        }
    });
}

#[test]
fn test_empty_tree_queries() {
    let mut tree = KdTree::new();
    tree.build(Vec::new()).unwrap();
    assert_eq!(tree.height(), -1);
    assert!(tree.nearest(&Point::from([1.0, 1.0])).unwrap().is_none());
    let batch = tree.nearest_batch(&[Point::from([1.0, 1.0]), Point::from([2.0])]).unwrap();
    assert_eq!(batch, vec![None, None]);
}
