// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the smoothing transforms that can be applied to curves before processing.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::errors::SmoothingError;
use crate::numeric;

/// Smoothing transform of the force signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Smoothing {
    /// Local polynomial fit over a moving window.
    SavitzkyGolay { span: usize, degree: usize },
    /// Mean over a moving window.
    MovingAverage { span: usize },
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::SavitzkyGolay { span: 7, degree: 2 }
    }
}

impl Smoothing {
    /// Number of points in the smoothing window.
    pub fn span(&self) -> usize {
        match self {
            Smoothing::SavitzkyGolay { span, degree: _ } => *span,
            Smoothing::MovingAverage { span } => *span,
        }
    }

    /// Check that the smoothing parameters are consistent.
    pub fn validate(&self) -> Result<(), SmoothingError> {
        let span = self.span();
        if span < 3 || span % 2 == 0 {
            return Err(SmoothingError::InvalidSpan(span));
        }

        if let Smoothing::SavitzkyGolay { span, degree } = self {
            if degree >= span {
                return Err(SmoothingError::InvalidDegree(*degree, *span));
            }
        }

        Ok(())
    }

    /// Check that the smoothing can be applied to a curve with `n_points` points.
    pub fn validate_for(&self, n_points: usize) -> Result<(), SmoothingError> {
        self.validate()?;
        if self.span() > n_points {
            return Err(SmoothingError::NotEnoughPoints(self.span(), n_points));
        }

        Ok(())
    }

    /// Smooth equally spaced values.
    /// Windows are shrunk symmetrically near the ends of the series.
    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>, SmoothingError> {
        self.validate_for(values.len())?;

        let half = self.span() / 2;
        let n = values.len();
        let mut smoothed = Vec::with_capacity(n);

        for i in 0..n {
            let reach = half.min(i).min(n - 1 - i);
            let window = &values[i - reach..=i + reach];

            let value = match self {
                Smoothing::MovingAverage { span: _ } => statistical::mean(window),
                Smoothing::SavitzkyGolay { span: _, degree } => {
                    savitzky_golay_center(window, (*degree).min(2 * reach))
                }
            };

            smoothed.push(value);
        }

        Ok(smoothed)
    }
}

/// Value of a least-squares polynomial fitted to the window, evaluated at its center.
fn savitzky_golay_center(window: &[f64], degree: usize) -> f64 {
    if window.len() == 1 || degree == 0 {
        return statistical::mean(window);
    }

    let half = (window.len() / 2) as f64;
    let xs: Vec<f64> = (0..window.len()).map(|i| i as f64 - half).collect();
    let design = numeric::vandermonde(&xs, degree);
    let y = DVector::from_column_slice(window);

    match numeric::solve_least_squares(&design, &y) {
        // the center has x = 0 so only the constant term remains
        Some(beta) => beta[0],
        None => window[window.len() / 2],
    }
}
