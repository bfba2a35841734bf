//! K-Means++ with Lloyd's iteration and silhouette-based auto-k.
//!
//! No numerical library: distances, seeding and the RNG are implemented
//! directly. Given the same points and seed the result is bit-for-bit
//! reproducible.

/// Maximum Lloyd iterations before giving up on convergence.
const MAX_ITERATIONS: usize = 100;

/// Deterministic xorshift64* generator for seeding.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self {
            // xorshift state must be non-zero
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [0, n).
    fn next_index(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }
}

/// Clustering result: per-point assignments and final centroids.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    pub k: usize,
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub silhouette: f64,
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    squared_distance(a, b).sqrt()
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(point, c);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// K-Means++ seeding: first centroid uniform at random, each subsequent
/// one with probability proportional to squared distance to the nearest
/// already-chosen centroid.
fn seed_centroids(points: &[Vec<f64>], k: usize, rng: &mut XorShift64) -> Vec<Vec<f64>> {
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(points[rng.next_index(points.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| squared_distance(p, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();
        let chosen = if total > 0.0 {
            let mut r = rng.next_f64() * total;
            let mut idx = points.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if r < *w {
                    idx = i;
                    break;
                }
                r -= w;
            }
            idx
        } else {
            // All remaining points coincide with a centroid.
            rng.next_index(points.len())
        };
        centroids.push(points[chosen].clone());
    }
    centroids
}

/// Lloyd's iteration from K-Means++ seeds. Deterministic under `seed`.
pub fn kmeans(points: &[Vec<f64>], k: usize, seed: u64) -> KMeansResult {
    let n = points.len();
    if n == 0 || k == 0 {
        return KMeansResult {
            k: 0,
            assignments: Vec::new(),
            centroids: Vec::new(),
            silhouette: 0.0,
        };
    }
    let k = k.min(n);
    let dims = points[0].len();
    let mut rng = XorShift64::new(seed);
    let mut centroids = seed_centroids(points, k, &mut rng);
    let mut assignments: Vec<usize> = points
        .iter()
        .map(|p| nearest_centroid(p, &centroids))
        .collect();

    for _ in 0..MAX_ITERATIONS {
        // Mean update; empty clusters keep their previous centroid.
        let mut sums = vec![vec![0.0; dims]; k];
        let mut counts = vec![0usize; k];
        for (p, &a) in points.iter().zip(&assignments) {
            counts[a] += 1;
            for (s, v) in sums[a].iter_mut().zip(p) {
                *s += v;
            }
        }
        for (i, sum) in sums.into_iter().enumerate() {
            if counts[i] > 0 {
                centroids[i] = sum.into_iter().map(|s| s / counts[i] as f64).collect();
            }
        }

        let next: Vec<usize> = points
            .iter()
            .map(|p| nearest_centroid(p, &centroids))
            .collect();
        if next == assignments {
            break;
        }
        assignments = next;
    }

    let silhouette = silhouette(points, &assignments, k);
    KMeansResult {
        k,
        assignments,
        centroids,
        silhouette,
    }
}

/// Mean silhouette score over all points, in [-1, 1].
///
/// For a point alone in its cluster the intra-cluster distance is 0, so a
/// perfectly separated singleton scores 1 — which is what makes auto-k
/// select k for k inputs at k distinct positions.
pub fn silhouette(points: &[Vec<f64>], assignments: &[usize], k: usize) -> f64 {
    let n = points.len();
    if n < 2 || k < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = assignments[i];
        let mut intra_sum = 0.0;
        let mut intra_count = 0usize;
        let mut inter: Vec<(f64, usize)> = vec![(0.0, 0); k];

        for j in 0..n {
            if i == j {
                continue;
            }
            let d = distance(&points[i], &points[j]);
            if assignments[j] == own {
                intra_sum += d;
                intra_count += 1;
            } else {
                inter[assignments[j]].0 += d;
                inter[assignments[j]].1 += 1;
            }
        }

        let a = if intra_count > 0 {
            intra_sum / intra_count as f64
        } else {
            0.0
        };
        let b = inter
            .iter()
            .filter(|&&(_, count)| count > 0)
            .map(|&(sum, count)| sum / count as f64)
            .fold(f64::INFINITY, f64::min);
        if !b.is_finite() {
            continue; // single non-empty cluster
        }
        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }
    total / n as f64
}

/// Try k ∈ [2..8] (capped by the number of distinct points) and keep the
/// k with the best silhouette, preferring smaller k on ties.
pub fn auto_k(points: &[Vec<f64>], seed: u64) -> KMeansResult {
    let mut distinct: Vec<&Vec<f64>> = Vec::new();
    for p in points {
        if !distinct.iter().any(|d| *d == p) {
            distinct.push(p);
        }
    }
    let max_k = distinct.len().min(8);
    if max_k < 2 {
        // Degenerate input: a single cluster holds everything.
        return KMeansResult {
            k: if points.is_empty() { 0 } else { 1 },
            assignments: vec![0; points.len()],
            centroids: if points.is_empty() {
                Vec::new()
            } else {
                vec![mean_point(points)]
            },
            silhouette: 0.0,
        };
    }

    let mut best: Option<KMeansResult> = None;
    for k in 2..=max_k {
        let result = kmeans(points, k, seed);
        let better = match &best {
            None => true,
            Some(b) => result.silhouette > b.silhouette + 1e-12,
        };
        if better {
            best = Some(result);
        }
    }
    // max_k ≥ 2 guarantees at least one candidate.
    best.unwrap_or_else(|| kmeans(points, 2, seed))
}

fn mean_point(points: &[Vec<f64>]) -> Vec<f64> {
    let dims = points[0].len();
    let mut sum = vec![0.0; dims];
    for p in points {
        for (s, v) in sum.iter_mut().zip(p) {
            *s += v;
        }
    }
    sum.into_iter().map(|s| s / points.len() as f64).collect()
}

#[cfg(test)]
#[path = "kmeans_test.rs"]
mod tests;
