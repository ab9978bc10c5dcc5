// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Small numerical helpers: polynomial least squares and quantiles of the Student t distribution.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Construct the design matrix of a polynomial of the given degree.
pub(crate) fn vandermonde(xs: &[f64], degree: usize) -> DMatrix<f64> {
    DMatrix::from_fn(xs.len(), degree + 1, |i, j| xs[i].powi(j as i32))
}

/// Solve a least squares problem using SVD.
/// Returns `None` if the system is too ill-conditioned to be solved.
pub(crate) fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Polynomial fitted in normalized coordinates `(x - shift) / scale`.
#[derive(Debug, Clone)]
pub(crate) struct PolynomialFit {
    coefficients: DVector<f64>,
    shift: f64,
    scale: f64,
    /// Residual sum of squares of the fit.
    rss: f64,
}

impl PolynomialFit {
    /// Fit a polynomial to the points. Returns `None` if there are not more
    /// points than coefficients or the system cannot be solved.
    pub(crate) fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Option<PolynomialFit> {
        if xs.len() != ys.len() || xs.len() <= degree {
            return None;
        }

        let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let shift = 0.5 * (min + max);
        let scale = if max > min { 0.5 * (max - min) } else { 1.0 };

        let normalized: Vec<f64> = xs.iter().map(|x| (x - shift) / scale).collect();
        let design = vandermonde(&normalized, degree);
        let y = DVector::from_column_slice(ys);
        let coefficients = solve_least_squares(&design, &y)?;

        let residuals = &design * &coefficients - &y;
        let rss = residuals.norm_squared();

        Some(PolynomialFit {
            coefficients,
            shift,
            scale,
            rss,
        })
    }

    #[inline(always)]
    pub(crate) fn rss(&self) -> f64 {
        self.rss
    }

    /// Value of the polynomial at `x`.
    pub(crate) fn value(&self, x: f64) -> f64 {
        let t = (x - self.shift) / self.scale;
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }

    /// First and second derivative of the polynomial at `x`.
    pub(crate) fn derivatives(&self, x: f64) -> (f64, f64) {
        let t = (x - self.shift) / self.scale;
        let mut first = 0.0;
        let mut second = 0.0;

        for (j, c) in self.coefficients.iter().enumerate().skip(1) {
            let j = j as i32;
            first += c * j as f64 * t.powi(j - 1);
            if j >= 2 {
                second += c * (j * (j - 1)) as f64 * t.powi(j - 2);
            }
        }

        (first / self.scale, second / (self.scale * self.scale))
    }
}

/// Quantile of the Student t distribution with `df` degrees of freedom.
/// Returns NaN if `df` is zero or `p` lies outside of (0, 1).
pub(crate) fn student_t_quantile(p: f64, df: usize) -> f64 {
    if !(p > 0.0 && p < 1.0) {
        return f64::NAN;
    }

    match StudentsT::new(0.0, 1.0, df as f64) {
        Ok(distribution) => distribution.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn least_squares_line() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert_relative_eq!(beta[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(beta[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn polynomial_fit_exact() {
        let xs: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x * x - 3.0 * x + 1.0).collect();

        let fit = PolynomialFit::fit(&xs, &ys, 2).unwrap();
        assert_relative_eq!(fit.rss(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(fit.value(104.5), 2.0 * 104.5 * 104.5 - 3.0 * 104.5 + 1.0, epsilon = 1e-6);

        let (first, second) = fit.derivatives(104.5);
        assert_relative_eq!(first, 4.0 * 104.5 - 3.0, epsilon = 1e-6);
        assert_relative_eq!(second, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn polynomial_fit_not_enough_points() {
        assert!(PolynomialFit::fit(&[1.0, 2.0], &[1.0, 2.0], 2).is_none());
        assert!(PolynomialFit::fit(&[1.0, 2.0], &[1.0], 0).is_none());
    }

    #[test]
    fn student_t_quantiles() {
        assert_relative_eq!(student_t_quantile(0.975, 1), 12.7062, epsilon = 1e-3);
        assert_relative_eq!(student_t_quantile(0.975, 3), 3.1824, epsilon = 1e-3);
        assert_relative_eq!(student_t_quantile(0.975, 30), 2.0423, epsilon = 1e-3);
        assert_relative_eq!(student_t_quantile(0.5, 4), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn student_t_quantiles_high_confidence() {
        // two-sided levels 0.99 and 0.999
        assert_relative_eq!(student_t_quantile(0.995, 3), 5.8409, epsilon = 1e-3);
        assert_relative_eq!(student_t_quantile(0.9995, 3), 12.9240, epsilon = 1e-3);
        assert_relative_eq!(student_t_quantile(0.995, 4), 4.6041, epsilon = 1e-3);
        assert_relative_eq!(student_t_quantile(0.9995, 4), 8.6103, epsilon = 1e-3);
    }

    #[test]
    fn student_t_quantiles_invalid() {
        assert!(student_t_quantile(0.975, 0).is_nan());
        assert!(student_t_quantile(1.5, 3).is_nan());
        assert!(student_t_quantile(0.0, 3).is_nan());
    }
}
