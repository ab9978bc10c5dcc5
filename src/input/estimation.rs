// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the options controlling contact-point estimation and model fitting.

use serde::{Deserialize, Serialize};

/// Heuristic used by automatic contact-point estimators.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ContactEstimationGuide {
    /// Two-segment least-squares split of the curve into baseline and contact.
    #[default]
    #[strum(serialize = "changepoint")]
    Changepoint,
    /// Point of maximal curvature of the curve.
    #[strum(serialize = "curvature")]
    Curvature,
}

/// Regression used when fitting the contact model.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum RegressionStrategy {
    #[default]
    #[serde(alias = "l2")]
    #[strum(serialize = "classical least squares")]
    Classical,
    #[serde(alias = "lms")]
    #[strum(serialize = "least median of squares")]
    LeastMedianSquares,
    #[serde(alias = "lts")]
    #[strum(serialize = "least trimmed squares")]
    LeastTrimmedSquares,
    #[strum(serialize = "Huber M-estimator")]
    Huber,
    #[serde(alias = "bisquare")]
    #[strum(serialize = "Tukey bisquare M-estimator")]
    Tukey,
}

/// Method for estimating the work of adhesion required by adhesive contact models.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum AdhesiveEnergyEstimation {
    /// Work of adhesion is a free parameter of the fit.
    #[default]
    #[strum(serialize = "from fit")]
    FromFit,
    /// Work of adhesion is calculated from the maximal adhesion force.
    #[strum(serialize = "from adhesion force")]
    FromAdhesionForce,
}

/// Coordinate(s) of a manually selected contact point that are used.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ManualEstimatorKind {
    /// Only the distance coordinate is used.
    #[serde(alias = "x")]
    #[strum(serialize = "use X")]
    UseX,
    /// Only the deflection coordinate is used.
    #[serde(alias = "y")]
    #[strum(serialize = "use Y")]
    UseY,
    /// Both coordinates are used.
    #[default]
    #[serde(alias = "point")]
    #[strum(serialize = "use point")]
    UsePoint,
}

impl ManualEstimatorKind {
    pub fn requires_distance(&self) -> bool {
        matches!(self, Self::UseX | Self::UsePoint)
    }

    pub fn requires_deflection(&self) -> bool {
        matches!(self, Self::UseY | Self::UsePoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_requirements() {
        assert!(ManualEstimatorKind::UseX.requires_distance());
        assert!(!ManualEstimatorKind::UseX.requires_deflection());
        assert!(!ManualEstimatorKind::UseY.requires_distance());
        assert!(ManualEstimatorKind::UseY.requires_deflection());
        assert!(ManualEstimatorKind::UsePoint.requires_distance());
        assert!(ManualEstimatorKind::UsePoint.requires_deflection());
    }

    #[test]
    fn options_from_yaml() {
        assert_eq!(
            serde_yaml::from_str::<RegressionStrategy>("lts").unwrap(),
            RegressionStrategy::LeastTrimmedSquares
        );
        assert_eq!(
            serde_yaml::from_str::<ContactEstimationGuide>("curvature").unwrap(),
            ContactEstimationGuide::Curvature
        );
        assert_eq!(
            serde_yaml::from_str::<AdhesiveEnergyEstimation>("from_adhesion_force").unwrap(),
            AdhesiveEnergyEstimation::FromAdhesionForce
        );
        assert_eq!(
            serde_yaml::from_str::<ManualEstimatorKind>("y").unwrap(),
            ManualEstimatorKind::UseY
        );
    }

    #[test]
    fn display() {
        assert_eq!(RegressionStrategy::Huber.to_string(), "Huber M-estimator");
        assert_eq!(ManualEstimatorKind::UsePoint.to_string(), "use point");
    }
}
