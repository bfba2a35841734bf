//! Closed-form ridge regression: `β = (XᵀX + αI)⁻¹ Xᵀy`, solved by
//! Gauss-Jordan elimination with partial pivoting. No numerical library;
//! an ill-conditioned system is an explicit error, never a silent NaN.

use crate::error::{Result, XrayError};

/// Pivots below this magnitude make the system singular.
const PIVOT_EPSILON: f64 = 1e-12;

/// The α grid searched during cross-validation.
pub const ALPHA_GRID: [f64; 5] = [0.001, 0.01, 0.1, 1.0, 10.0];

/// Beyond this many rows, cross-validation switches from leave-one-out
/// to 5-fold.
const LOO_LIMIT: usize = 200;

/// Fit ridge coefficients for feature matrix `x` (rows are samples) and
/// targets `y`.
pub fn fit(x: &[Vec<f64>], y: &[f64], alpha: f64) -> Result<Vec<f64>> {
    let n = x.len();
    if n == 0 || x[0].is_empty() {
        return Err(XrayError::Analysis(
            "ridge fit requires a non-empty design matrix".to_string(),
        ));
    }
    let k = x[0].len();

    // Augmented (XᵀX + αI | Xᵀy)
    let mut aug = vec![vec![0.0; k + 1]; k];
    for (row, aug_row) in aug.iter_mut().enumerate() {
        for col in 0..k {
            let mut sum = 0.0;
            for sample in x {
                sum += sample[row] * sample[col];
            }
            aug_row[col] = sum;
        }
        aug_row[row] += alpha;
        let mut rhs = 0.0;
        for (sample, &target) in x.iter().zip(y) {
            rhs += sample[row] * target;
        }
        aug_row[k] = rhs;
    }

    gauss_jordan(aug)
}

/// Gauss-Jordan elimination with partial pivoting on an augmented
/// `k × (k+1)` matrix. Returns the solution column.
fn gauss_jordan(mut aug: Vec<Vec<f64>>) -> Result<Vec<f64>> {
    let k = aug.len();
    for col in 0..k {
        // Partial pivot: largest magnitude in this column at or below it.
        let pivot_row = (col..k)
            .max_by(|&a, &b| {
                aug[a][col]
                    .abs()
                    .partial_cmp(&aug[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if aug[pivot_row][col].abs() < PIVOT_EPSILON {
            return Err(XrayError::Analysis(
                "singular system in ridge solve (features are collinear)".to_string(),
            ));
        }
        aug.swap(col, pivot_row);

        let pivot = aug[col][col];
        for value in aug[col].iter_mut() {
            *value /= pivot;
        }
        let pivot_values = aug[col].clone();
        for (row, aug_row) in aug.iter_mut().enumerate() {
            if row == col {
                continue;
            }
            let factor = aug_row[col];
            if factor == 0.0 {
                continue;
            }
            for (value, pivot_value) in aug_row.iter_mut().zip(&pivot_values) {
                *value -= factor * pivot_value;
            }
        }
    }
    Ok(aug.into_iter().map(|row| row[k]).collect())
}

/// Pick α from the grid by cross-validated squared error: leave-one-out
/// for small sets, 5-fold beyond `LOO_LIMIT`. Ties go to the smaller α.
pub fn fit_cv(x: &[Vec<f64>], y: &[f64]) -> Result<(f64, Vec<f64>)> {
    let n = x.len();
    let folds = if n > LOO_LIMIT { 5 } else { n };

    let mut best: Option<(f64, f64)> = None; // (error, alpha)
    for &alpha in &ALPHA_GRID {
        let error = cv_error(x, y, alpha, folds)?;
        if best.is_none_or(|(e, _)| error < e - 1e-15) {
            best = Some((error, alpha));
        }
    }
    let (_, alpha) = best.ok_or_else(|| {
        XrayError::Analysis("cross-validation produced no candidate".to_string())
    })?;
    let beta = fit(x, y, alpha)?;
    Ok((alpha, beta))
}

/// Total squared held-out error across `folds` folds.
fn cv_error(x: &[Vec<f64>], y: &[f64], alpha: f64, folds: usize) -> Result<f64> {
    let n = x.len();
    let folds = folds.clamp(2, n);
    let mut total = 0.0;

    for fold in 0..folds {
        let mut train_x = Vec::with_capacity(n);
        let mut train_y = Vec::with_capacity(n);
        let mut test: Vec<usize> = Vec::new();
        for i in 0..n {
            if i % folds == fold {
                test.push(i);
            } else {
                train_x.push(x[i].clone());
                train_y.push(y[i]);
            }
        }
        if train_x.is_empty() || test.is_empty() {
            continue;
        }
        let beta = fit(&train_x, &train_y, alpha)?;
        for i in test {
            let residual = predict(&x[i], &beta) - y[i];
            total += residual * residual;
        }
    }
    Ok(total)
}

pub fn predict(features: &[f64], beta: &[f64]) -> f64 {
    features.iter().zip(beta).map(|(f, b)| f * b).sum()
}

/// Coefficient of determination: `1 - SSres / SStot`; 0 when the targets
/// carry no variance.
pub fn r_squared(y: &[f64], predicted: &[f64]) -> f64 {
    let n = y.len();
    if n == 0 {
        return 0.0;
    }
    let mean = y.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - mean) * (v - mean)).sum();
    if ss_tot <= 0.0 {
        return 0.0;
    }
    let ss_res: f64 = y
        .iter()
        .zip(predicted)
        .map(|(v, p)| (v - p) * (v - p))
        .sum();
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
#[path = "ridge_test.rs"]
mod tests;
