//! Correlation and least-squares fit
//!
//! Pearson correlation between the two columns and an ordinary
//! least-squares fit of y on x, computed from centered sums.

use serde::Serialize;
use thiserror::Error;

use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyzeError {
    #[error("need at least 2 points for a fit, got {0}")]
    TooFewPoints(usize),

    #[error("x has zero variance; slope is undefined")]
    ZeroXVariance,
}

/// Correlation and OLS line parameters for y on x
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitResult {
    pub correlation: f64,
    pub slope: f64,
    pub intercept: f64,
}

/// Analyze a dataset: Pearson correlation plus `slope = Cov(x,y)/Var(x)`
/// and `intercept = mean(y) - slope * mean(x)`.
///
/// Fails on degenerate input (fewer than 2 points, or zero x-variance)
/// rather than emit a misleading fit. A constant-y sample with varying x
/// is well defined: slope 0 and correlation reported as 0.
pub fn analyze(dataset: &Dataset) -> Result<FitResult, AnalyzeError> {
    let n = dataset.len();
    if n < 2 {
        return Err(AnalyzeError::TooFewPoints(n));
    }
    let nf = n as f64;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for &(x, y) in dataset.points() {
        sum_x += x;
        sum_y += y;
    }
    let mean_x = sum_x / nf;
    let mean_y = sum_y / nf;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for &(x, y) in dataset.points() {
        let dx = x - mean_x;
        let dy = y - mean_y;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }

    if ss_xx == 0.0 {
        return Err(AnalyzeError::ZeroXVariance);
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;
    let correlation = if ss_yy == 0.0 {
        0.0
    } else {
        ss_xy / (ss_xx.sqrt() * ss_yy.sqrt())
    };

    Ok(FitResult {
        correlation,
        slope,
        intercept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DEFAULT_SEED, generate};

    #[test]
    fn test_perfect_line_recovered() {
        // y = 2x + 1
        let dataset =
            Dataset::from_points(vec![(0.0, 1.0), (1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]);
        let fit = analyze(&dataset).unwrap();

        assert!((fit.slope - 2.0).abs() < 1e-10);
        assert!((fit.intercept - 1.0).abs() < 1e-10);
        assert!((fit.correlation - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_negative_relationship() {
        let dataset =
            Dataset::from_points(vec![(0.0, 4.0), (1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]);
        let fit = analyze(&dataset).unwrap();

        assert!((fit.slope + 1.0).abs() < 1e-10);
        assert!((fit.correlation + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_correlation_bounded_on_noisy_data() {
        for sigma in [0.0, 0.5, 2.0] {
            let dataset = generate(500, sigma, DEFAULT_SEED).unwrap();
            let fit = analyze(&dataset).unwrap();
            assert!(fit.correlation.abs() <= 1.0, "sigma={sigma}");
        }
    }

    #[test]
    fn test_too_few_points() {
        let empty = Dataset::from_points(Vec::new());
        assert_eq!(analyze(&empty), Err(AnalyzeError::TooFewPoints(0)));

        let single = Dataset::from_points(vec![(1.0, 2.0)]);
        assert_eq!(analyze(&single), Err(AnalyzeError::TooFewPoints(1)));
    }

    #[test]
    fn test_zero_x_variance() {
        let dataset = Dataset::from_points(vec![(1.0, 1.0), (1.0, 2.0), (1.0, 3.0)]);
        assert_eq!(analyze(&dataset), Err(AnalyzeError::ZeroXVariance));
    }

    #[test]
    fn test_constant_y_has_flat_fit() {
        let dataset = Dataset::from_points(vec![(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)]);
        let fit = analyze(&dataset).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 5.0);
        assert_eq!(fit.correlation, 0.0);
    }
}
