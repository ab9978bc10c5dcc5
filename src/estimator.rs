// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the estimators of the contact point of a force curve.
//!
//! The points of a branch are expected in acquisition order: the baseline
//! (no interaction) comes first and the indentation regime follows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::input::{ContactEstimationGuide, ManualEstimatorKind};
use crate::numeric::PolynomialFit;

/// Smallest number of points in a segment of the changepoint search.
const MIN_SEGMENT: usize = 4;
/// Largest number of candidate splits tested by the changepoint search.
const MAX_CANDIDATES: usize = 256;
/// Smallest half-width of the window of the curvature search.
const MIN_HALF_WINDOW: usize = 2;

/// Estimated location of the contact point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContactPoint {
    pub x: f64,
    pub y: f64,
}

/// Estimator of the contact point bound to one processed curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactEstimator {
    Automatic {
        baseline_degree: usize,
        guide: ContactEstimationGuide,
    },
    Manual {
        kind: ManualEstimatorKind,
        /// Distance coordinate of the contact point.
        x: f64,
        /// Deflection coordinate of the contact point.
        y: f64,
    },
}

impl fmt::Display for ContactEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactEstimator::Automatic {
                baseline_degree,
                guide,
            } => write!(f, "automatic ({}, baseline degree {})", guide, baseline_degree),
            ContactEstimator::Manual { kind, x, y } => {
                write!(f, "manual ({}, x = {}, y = {})", kind, x, y)
            }
        }
    }
}

impl ContactEstimator {
    pub fn automatic(baseline_degree: usize, guide: ContactEstimationGuide) -> Self {
        ContactEstimator::Automatic {
            baseline_degree,
            guide,
        }
    }

    #[inline(always)]
    pub fn is_automatic(&self) -> bool {
        matches!(self, ContactEstimator::Automatic { .. })
    }

    /// Estimate the contact point of the curve.
    /// Returns `None` if the curve does not allow an estimate.
    pub fn estimate(&self, curve: &Curve) -> Option<ContactPoint> {
        match *self {
            ContactEstimator::Automatic {
                baseline_degree,
                guide: ContactEstimationGuide::Changepoint,
            } => changepoint(curve, baseline_degree),
            ContactEstimator::Automatic {
                baseline_degree: _,
                guide: ContactEstimationGuide::Curvature,
            } => maximal_curvature(curve),
            ContactEstimator::Manual { kind, x, y } => match kind {
                ManualEstimatorKind::UseX => {
                    let y = curve.sorted_by_x().interpolate(x)?;
                    Some(ContactPoint { x, y })
                }
                ManualEstimatorKind::UseY => {
                    let x = first_crossing(curve, y)?;
                    Some(ContactPoint { x, y })
                }
                ManualEstimatorKind::UsePoint => {
                    (x.is_finite() && y.is_finite()).then_some(ContactPoint { x, y })
                }
            },
        }
    }
}

/// Split the curve into a polynomial baseline and a quadratic contact
/// region so that the total residual sum of squares is minimal.
fn changepoint(curve: &Curve, baseline_degree: usize) -> Option<ContactPoint> {
    let n = curve.len();
    let min_left = MIN_SEGMENT.max(baseline_degree + 2);
    let min_right = MIN_SEGMENT;
    if n < min_left + min_right {
        return None;
    }

    let xs = curve.xs();
    let ys = curve.ys();

    let first = min_left;
    let last = n - min_right;
    let stride = ((last - first) / MAX_CANDIDATES).max(1);

    let mut best: Option<(usize, f64)> = None;
    for split in (first..=last).step_by(stride) {
        let Some(baseline) = PolynomialFit::fit(&xs[..split], &ys[..split], baseline_degree)
        else {
            continue;
        };
        let Some(contact) = PolynomialFit::fit(&xs[split..], &ys[split..], 2) else {
            continue;
        };

        let rss = baseline.rss() + contact.rss();
        match best {
            Some((_, best_rss)) if rss >= best_rss => (),
            _ => best = Some((split, rss)),
        }
    }

    let (index, _) = best?;
    let [x, y] = curve.points()[index];
    Some(ContactPoint { x, y })
}

/// Point of maximal positive curvature of the curve.
fn maximal_curvature(curve: &Curve) -> Option<ContactPoint> {
    let n = curve.len();
    let half = (n / 20).max(MIN_HALF_WINDOW);
    if n < 2 * half + 1 {
        return None;
    }

    let xs = curve.xs();
    let ys = curve.ys();

    let mut best: Option<(usize, f64)> = None;
    for i in half..n - half {
        let Some(fit) = PolynomialFit::fit(&xs[i - half..=i + half], &ys[i - half..=i + half], 2)
        else {
            continue;
        };

        let (first, second) = fit.derivatives(xs[i]);
        let curvature = second / (1.0 + first * first).powf(1.5);
        if !curvature.is_finite() || curvature <= 0.0 {
            continue;
        }

        match best {
            Some((_, best_curvature)) if curvature <= best_curvature => (),
            _ => best = Some((i, curvature)),
        }
    }

    let (index, _) = best?;
    let [x, y] = curve.points()[index];
    Some(ContactPoint { x, y })
}

/// Abscissa at which the curve first reaches the ordinate `y`.
fn first_crossing(curve: &Curve, y: f64) -> Option<f64> {
    if !y.is_finite() {
        return None;
    }

    curve.points().windows(2).find_map(|w| {
        let [x1, y1] = w[0];
        let [x2, y2] = w[1];

        if y1 == y {
            Some(x1)
        } else if (y1 - y) * (y2 - y) < 0.0 || y2 == y {
            Some(x1 + (x2 - x1) * (y - y1) / (y2 - y1))
        } else {
            None
        }
    })
}

/// Contact point selected manually by the user on a chart.
/// The force is converted into deflection separately for each curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManualContactSelection {
    #[serde(default)]
    pub kind: ManualEstimatorKind,
    /// Distance coordinate of the selected point (µm).
    #[serde(default = "default_nan", alias = "x")]
    pub distance: f64,
    /// Force coordinate of the selected point (nN).
    #[serde(default = "default_nan", alias = "y")]
    pub force: f64,
}

fn default_nan() -> f64 {
    f64::NAN
}

impl ManualContactSelection {
    pub fn new(kind: ManualEstimatorKind, distance: f64, force: f64) -> Self {
        ManualContactSelection {
            kind,
            distance,
            force,
        }
    }

    /// Are all values required by the selected kind finite numbers?
    pub fn is_apply_enabled(&self) -> bool {
        (!self.kind.requires_distance() || self.distance.is_finite())
            && (!self.kind.requires_deflection() || self.force.is_finite())
    }

    /// Manual estimator for a curve recorded with the given spring constant (N/m).
    pub fn estimator_for(&self, spring_constant: f64) -> ContactEstimator {
        ContactEstimator::Manual {
            kind: self.kind,
            x: self.distance,
            y: self.force / spring_constant,
        }
    }
}
