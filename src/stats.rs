//! Small numeric helpers shared by the metric pipelines.
//!
//! Every pipeline normalizes with the same min-max convention: values are
//! mapped to [0,1] across the set being analyzed, and degenerate sets
//! (singleton, or all values equal) normalize to 0. Exponential decay,
//! Shannon entropy and the Gini coefficient live here so their edge-case
//! behavior is defined exactly once.

/// Min-max normalize `values` in place to [0,1].
/// When all values are equal (including a singleton set), everything
/// normalizes to 0.
pub fn minmax_normalize(values: &mut [f64]) {
    let Some(lo) = values.iter().copied().reduce(f64::min) else {
        return;
    };
    let hi = values.iter().copied().fold(lo, f64::max);
    let span = hi - lo;
    for v in values.iter_mut() {
        *v = if span > 0.0 { (*v - lo) / span } else { 0.0 };
    }
}

/// Exponential decay weight `2^(-age_days / half_life_days)`.
/// Ages at or before the reference time (negative age) weigh 1.0.
pub fn decay_weight(age_days: f64, half_life_days: f64) -> f64 {
    if age_days <= 0.0 {
        return 1.0;
    }
    (-age_days / half_life_days).exp2()
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of a slice; 0.0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Shannon entropy in bits of a share distribution. Shares must sum to 1;
/// zero shares contribute nothing.
pub fn shannon_entropy(shares: &[f64]) -> f64 {
    -shares
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * p.log2())
        .sum::<f64>()
}

/// Gini coefficient of a non-negative distribution, in [0,1].
/// 0 for perfectly equal shares (or fewer than two values), approaching 1
/// as the distribution concentrates on a single holder.
pub fn gini(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &v)| (i + 1) as f64 * v)
        .sum();
    (2.0 * weighted) / (n as f64 * total) - (n as f64 + 1.0) / n as f64
}
