// In crates/analytics/src/regression.rs

//! Ordinary least squares with an intercept.
//!
//! Features are centred and scaled before the normal equations are solved, and
//! the solve uses symmetric pivoting: a constant column, or any column that is
//! a linear combination of those already pivoted (`close_ma5_diff` given
//! `close` and `ma5`), gets a zero coefficient instead of blowing up the fit.

use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Relative size below which a pivot is treated as zero.
const RANK_TOLERANCE: f64 = 1e-9;

/// A fitted linear model: `y = intercept + coefficients · x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    /// Fits the model to the rows of `x` against `y`.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        let (n, k) = x.dim();
        if n != y.len() {
            return Err(Error::DimensionMismatch { expected: n, got: y.len() });
        }
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let x_mean = x.mean_axis(Axis(0)).ok_or(Error::EmptyInput)?;
        let y_mean = y.sum() / n as f64;

        let mut xs = x - &x_mean;
        let mut scale = Array1::<f64>::zeros(k);
        for (j, mut column) in xs.axis_iter_mut(Axis(1)).enumerate() {
            let norm = column.dot(&column).sqrt();
            scale[j] = norm;
            if norm > 0.0 {
                column.mapv_inplace(|v| v / norm);
            }
        }
        let yc = y.mapv(|v| v - y_mean);

        let xtx = xs.t().dot(&xs);
        let xty = xs.t().dot(&yc);
        let solution = solve_symmetric_pivoted(xtx, xty);

        let coefficients: Vec<f64> = solution
            .iter()
            .zip(scale.iter())
            .map(|(beta, norm)| if *norm > 0.0 { beta / norm } else { 0.0 })
            .collect();
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(x_mean.iter())
                .map(|(b, m)| b * m)
                .sum::<f64>();

        tracing::debug!(samples = n, features = k, intercept, "Fitted linear model");

        Ok(Self { intercept, coefficients })
    }

    /// Predicts a single observation.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(Error::DimensionMismatch {
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }
        Ok(self.intercept + row.iter().zip(&self.coefficients).map(|(x, b)| x * b).sum::<f64>())
    }

    /// Predicts every row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(Error::DimensionMismatch {
                expected: self.coefficients.len(),
                got: x.ncols(),
            });
        }
        let beta = Array1::from(self.coefficients.clone());
        Ok(x.dot(&beta) + self.intercept)
    }
}

/// Solves `a · x = b` for symmetric positive semi-definite `a`.
///
/// Gaussian elimination picking the largest remaining diagonal as pivot. Once
/// the largest remaining pivot is negligible, the rest of the unknowns are zero.
fn solve_symmetric_pivoted(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let k = b.len();
    let mut order: Vec<usize> = (0..k).collect();
    let largest = a.diag().iter().cloned().fold(0.0_f64, f64::max);
    let tolerance = largest * RANK_TOLERANCE;

    let mut rank = 0;
    for col in 0..k {
        let pivot = (col..k)
            .max_by(|&i, &j| a[[i, i]].total_cmp(&a[[j, j]]))
            .unwrap_or(col);
        if a[[pivot, pivot]] <= tolerance {
            break;
        }
        if pivot != col {
            for c in 0..k {
                a.swap([col, c], [pivot, c]);
            }
            for r in 0..k {
                a.swap([r, col], [r, pivot]);
            }
            b.swap(col, pivot);
            order.swap(col, pivot);
        }

        for r in col + 1..k {
            let factor = a[[r, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for c in col..k {
                a[[r, c]] -= factor * a[[col, c]];
            }
            b[r] -= factor * b[col];
        }
        rank += 1;
    }

    let mut permuted = Array1::<f64>::zeros(k);
    for i in (0..rank).rev() {
        let tail: f64 = (i + 1..rank).map(|j| a[[i, j]] * permuted[j]).sum();
        permuted[i] = (b[i] - tail) / a[[i, i]];
    }

    let mut solution = Array1::<f64>::zeros(k);
    for (position, &original) in order.iter().enumerate() {
        solution[original] = permuted[position];
    }
    solution
}

/// Mean of squared residuals.
pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / y_true.len() as f64
}

/// Coefficient of determination. A constant target scores 1.0 when predicted exactly, else 0.0.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Splits `rows` without shuffling: the oldest part trains, the newest `test_fraction` evaluates.
pub fn chronological_split<T>(rows: &[T], test_fraction: f64) -> (&[T], &[T]) {
    let fraction = test_fraction.clamp(0.0, 1.0);
    let test_len = (rows.len() as f64 * fraction).ceil() as usize;
    rows.split_at(rows.len() - test_len.min(rows.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn recovers_an_exact_linear_relation() {
        let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 5.0], [4.0, 3.0], [5.0, 8.0]];
        let y = x.map_axis(Axis(1), |row| 2.0 + 3.0 * row[0] - row[1]);

        let model = LinearModel::fit(&x, &y).unwrap();
        assert!(close(model.intercept, 2.0));
        assert!(close(model.coefficients[0], 3.0));
        assert!(close(model.coefficients[1], -1.0));
    }

    #[test]
    fn collinear_columns_still_predict_exactly() {
        // Third column is first minus second, like close - ma5.
        let x = array![
            [10.0, 9.0, 1.0],
            [11.0, 9.5, 1.5],
            [12.0, 10.5, 1.5],
            [14.0, 11.0, 3.0],
            [13.0, 12.0, 1.0],
        ];
        let y = x.map_axis(Axis(1), |row| 1.0 + 0.5 * row[0] + 0.25 * row[1]);

        let model = LinearModel::fit(&x, &y).unwrap();
        let predicted = model.predict(&x).unwrap();
        for (p, t) in predicted.iter().zip(y.iter()) {
            assert!(close(*p, *t), "predicted {p}, expected {t}");
        }
    }

    #[test]
    fn constant_feature_gets_zero_weight() {
        let x = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0]];
        let y = array![2.0, 4.0, 6.0];

        let model = LinearModel::fit(&x, &y).unwrap();
        assert!(close(model.coefficients[0], 2.0));
        assert_eq!(model.coefficients[1], 0.0);
        assert!(close(model.predict_row(&[4.0, 7.0]).unwrap(), 8.0));
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        assert_eq!(
            LinearModel::fit(&x, &y),
            Err(Error::DimensionMismatch { expected: 2, got: 1 })
        );

        let model = LinearModel { intercept: 0.0, coefficients: vec![1.0, 2.0] };
        assert!(model.predict_row(&[1.0]).is_err());
    }

    #[test]
    fn metrics_on_perfect_and_mean_predictions() {
        let truth = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(mean_squared_error(&truth, &truth), 0.0);
        assert_eq!(r2_score(&truth, &truth), 1.0);
        assert!(close(r2_score(&truth, &[2.5; 4]), 0.0));
        assert!(close(mean_squared_error(&truth, &[2.5; 4]), 1.25));
    }

    #[test]
    fn split_keeps_chronology() {
        let rows: Vec<usize> = (0..10).collect();
        let (train, test) = chronological_split(&rows, 0.2);
        assert_eq!(train, &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(test, &[8, 9]);

        let (train, test) = chronological_split(&rows[..7], 0.2);
        assert_eq!((train.len(), test.len()), (5, 2));
    }
}
