use super::*;

/// Three tight blobs far apart in the unit cube.
fn three_blobs() -> Vec<Vec<f64>> {
    let mut points = Vec::new();
    for (cx, cy, cz) in [(0.1, 0.1, 0.1), (0.9, 0.9, 0.1), (0.5, 0.1, 0.9)] {
        for d in [0.0, 0.01, 0.02, -0.01, -0.02] {
            points.push(vec![cx + d, cy + d, cz - d]);
        }
    }
    points
}

#[test]
fn auto_k_finds_three_separated_clusters() {
    let points = three_blobs();
    let result = auto_k(&points, 42);
    assert_eq!(result.k, 3);

    // Every point is assigned to its nearest centroid.
    for (i, p) in points.iter().enumerate() {
        let own = result.assignments[i];
        let own_d: f64 = p
            .iter()
            .zip(&result.centroids[own])
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        for c in &result.centroids {
            let d: f64 = p.iter().zip(c).map(|(a, b)| (a - b) * (a - b)).sum();
            assert!(own_d <= d + 1e-12);
        }
    }

    // The three blobs land in three different clusters.
    let c0 = result.assignments[0];
    let c1 = result.assignments[5];
    let c2 = result.assignments[10];
    assert!(c0 != c1 && c1 != c2 && c0 != c2);
    assert!(result.assignments[..5].iter().all(|&a| a == c0));
    assert!(result.assignments[5..10].iter().all(|&a| a == c1));
    assert!(result.assignments[10..].iter().all(|&a| a == c2));
}

#[test]
fn same_seed_is_bit_for_bit_reproducible() {
    let points = three_blobs();
    let a = kmeans(&points, 3, 7);
    let b = kmeans(&points, 3, 7);
    assert_eq!(a, b);

    let c = auto_k(&points, 99);
    let d = auto_k(&points, 99);
    assert_eq!(c, d);
}

#[test]
fn k_distinct_points_select_k() {
    let points = vec![
        vec![0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ];
    let result = auto_k(&points, 42);
    assert_eq!(result.k, 4);
    assert!((result.silhouette - 1.0).abs() < 1e-9);
}

#[test]
fn k_is_capped_by_distinct_positions() {
    // Ten copies of the same two positions: only k = 2 is meaningful.
    let mut points = Vec::new();
    for _ in 0..10 {
        points.push(vec![0.0, 0.0, 0.0]);
        points.push(vec![1.0, 1.0, 1.0]);
    }
    let result = auto_k(&points, 42);
    assert_eq!(result.k, 2);
}

#[test]
fn degenerate_inputs() {
    let empty = auto_k(&[], 42);
    assert_eq!(empty.k, 0);
    assert!(empty.assignments.is_empty());

    let single = auto_k(&[vec![0.5, 0.5, 0.5]], 42);
    assert_eq!(single.k, 1);
    assert_eq!(single.assignments, vec![0]);

    let identical = auto_k(&vec![vec![0.3, 0.3, 0.3]; 5], 42);
    assert_eq!(identical.k, 1);
    assert_eq!(identical.assignments, vec![0; 5]);
}

#[test]
fn silhouette_is_bounded() {
    let points = three_blobs();
    for k in 2..=5 {
        let result = kmeans(&points, k, 1);
        assert!(result.silhouette >= -1.0 && result.silhouette <= 1.0);
    }
}

#[test]
fn well_separated_blobs_score_high() {
    let result = kmeans(&three_blobs(), 3, 42);
    assert!(result.silhouette > 0.8, "got {}", result.silhouette);
}
