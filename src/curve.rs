// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Point series and spectroscopy sources consumed by the analysis core.
//!
//! Units used throughout the crate: piezo distances and deflections in µm when they
//! come out of the crop conversion, forces in nN, spring constants in N/m and
//! sensitivities in nm per unit of photodiode signal.

use std::fmt;

use derive_builder::Builder;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

/// Half of a force curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    #[default]
    #[serde(alias = "trace")]
    Approach,
    #[serde(alias = "retrace")]
    Withdraw,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Approach => write!(f, "approach"),
            Branch::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// Physical quantity measured by the photodiode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PhotodiodeSignalType {
    #[default]
    #[strum(serialize = "voltage")]
    Voltage,
    #[strum(serialize = "current")]
    Current,
}

/// Ordered series of (x, y) points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    points: Vec<[f64; 2]>,
}

impl From<Vec<[f64; 2]>> for Curve {
    fn from(points: Vec<[f64; 2]>) -> Self {
        Curve { points }
    }
}

impl Curve {
    /// Create a curve from its points. The order of points is kept.
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Curve { points }
    }

    /// Create a curve from separate abscissas and ordinates.
    /// Superfluous values of the longer slice are ignored.
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> Self {
        Curve {
            points: xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect(),
        }
    }

    #[inline(always)]
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p[0]).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p[1]).collect()
    }

    /// Smallest and largest abscissa of the curve. `None` for an empty curve.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }

        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
                (min.min(p[0]), max.max(p[0]))
            });

        Some((min, max))
    }

    /// Copy of the curve with points ordered by increasing abscissa.
    pub fn sorted_by_x(&self) -> Curve {
        let mut points = self.points.clone();
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        Curve { points }
    }

    /// Linearly interpolate the ordinate at `x`.
    /// The curve must be sorted by increasing abscissa.
    /// Returns `None` if `x` lies outside the curve.
    pub fn interpolate(&self, x: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if x < first[0] || x > last[0] || x.is_nan() {
            return None;
        }

        // index of the first point with abscissa >= x
        let upper = self.points.partition_point(|p| p[0] < x);
        if upper == 0 {
            return Some(first[1]);
        }

        let [x1, y1] = self.points[upper - 1];
        let [x2, y2] = self.points[upper];
        if x2 == x1 {
            return Some(y2);
        }

        Some(y1 + (y2 - y1) * (x - x1) / (x2 - x1))
    }

    /// Point whose abscissa is closest to `x`. Works for unsorted curves.
    pub fn nearest(&self, x: f64) -> Option<[f64; 2]> {
        self.points
            .iter()
            .copied()
            .min_by(|a, b| (a[0] - x).abs().total_cmp(&(b[0] - x).abs()))
    }
}

/// Calibration state of the raw data of a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationState {
    /// Deflection was already converted into distance units by the instrument.
    #[serde(default)]
    pub sensitivity_calibrated: bool,
    /// Deflection was already converted into force units by the instrument.
    #[serde(default)]
    pub spring_constant_calibrated: bool,
}

/// One force curve as provided by the source curve reader.
#[derive(Debug, Clone, Builder, Getters, CopyGetters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpectroscopySource {
    /// Unique name of the source (usually derived from the file name).
    #[builder(setter(into))]
    #[getset(get = "pub")]
    identifier: String,

    #[builder(default)]
    #[serde(default)]
    #[getset(get = "pub")]
    approach: Curve,

    #[builder(default)]
    #[serde(default)]
    #[getset(get = "pub")]
    withdraw: Curve,

    #[builder(default)]
    #[serde(default, alias = "signal")]
    #[getset(get_copy = "pub")]
    signal_type: PhotodiodeSignalType,

    /// Spring constant stored in the source file (N/m).
    #[builder(setter(strip_option), default)]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    spring_constant: Option<f64>,

    /// Sensitivity stored in the source file (nm per signal unit).
    #[builder(setter(strip_option), default)]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    sensitivity: Option<f64>,

    #[builder(default)]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    calibration: CalibrationState,

    /// The curve is part of a force-volume map.
    #[builder(default)]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    from_map: bool,
}

impl SpectroscopySource {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> SpectroscopySourceBuilder {
        SpectroscopySourceBuilder::default()
    }

    /// Get the requested branch of the curve.
    pub fn branch(&self, branch: Branch) -> &Curve {
        match branch {
            Branch::Approach => &self.approach,
            Branch::Withdraw => &self.withdraw,
        }
    }

    /// Read-in spring constant if it is a usable number.
    pub(crate) fn usable_spring_constant(&self) -> Option<f64> {
        self.spring_constant.filter(|k| k.is_finite() && *k > 0.0)
    }

    /// Read-in sensitivity if it is a usable number.
    pub(crate) fn usable_sensitivity(&self) -> Option<f64> {
        self.sensitivity.filter(|s| s.is_finite() && *s > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn curve_x_range() {
        let curve = Curve::from_xy(&[3.0, -1.0, 7.5, 2.0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(curve.x_range(), Some((-1.0, 7.5)));
        assert!(Curve::default().x_range().is_none());
    }

    #[test]
    fn curve_interpolate() {
        let curve = Curve::from_xy(&[0.0, 1.0, 2.0, 4.0], &[0.0, 10.0, 20.0, 0.0]);

        assert_relative_eq!(curve.interpolate(0.0).unwrap(), 0.0);
        assert_relative_eq!(curve.interpolate(0.5).unwrap(), 5.0);
        assert_relative_eq!(curve.interpolate(2.0).unwrap(), 20.0);
        assert_relative_eq!(curve.interpolate(3.0).unwrap(), 10.0);
        assert_relative_eq!(curve.interpolate(4.0).unwrap(), 0.0);
        assert!(curve.interpolate(-0.1).is_none());
        assert!(curve.interpolate(4.1).is_none());
        assert!(curve.interpolate(f64::NAN).is_none());
    }

    #[test]
    fn curve_sorted_and_nearest() {
        let curve = Curve::from_xy(&[5.0, 1.0, 3.0], &[50.0, 10.0, 30.0]);
        let sorted = curve.sorted_by_x();
        assert_eq!(sorted.xs(), vec![1.0, 3.0, 5.0]);
        assert_eq!(sorted.ys(), vec![10.0, 30.0, 50.0]);

        assert_eq!(curve.nearest(3.9), Some([3.0, 30.0]));
        assert_eq!(curve.nearest(100.0), Some([5.0, 50.0]));
        assert!(Curve::default().nearest(1.0).is_none());
    }

    #[test]
    fn source_builder_defaults() {
        let source = SpectroscopySource::new()
            .identifier("curve_001")
            .approach(Curve::from_xy(&[0.0, 1.0], &[0.0, 0.5]))
            .build()
            .unwrap();

        assert_eq!(source.identifier(), "curve_001");
        assert_eq!(source.branch(Branch::Approach).len(), 2);
        assert!(source.branch(Branch::Withdraw).is_empty());
        assert_eq!(source.signal_type(), PhotodiodeSignalType::Voltage);
        assert!(source.spring_constant().is_none());
        assert!(source.usable_sensitivity().is_none());
        assert!(!source.from_map());
        assert_eq!(source.calibration(), CalibrationState::default());
    }

    #[test]
    fn source_usable_read_in() {
        let source = SpectroscopySource::new()
            .identifier("curve_002")
            .spring_constant(-0.1)
            .sensitivity(45.0)
            .build()
            .unwrap();

        assert!(source.usable_spring_constant().is_none());
        assert_eq!(source.usable_sensitivity(), Some(45.0));
    }

    #[test]
    fn source_from_yaml() {
        let yaml = "identifier: curve_003
approach: [[0.0, 0.0], [1.0, 2.0]]
signal: current
spring_constant: 0.2
calibration:
  sensitivity_calibrated: true
";
        let source: SpectroscopySource = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(source.identifier(), "curve_003");
        assert_eq!(source.approach().points(), &[[0.0, 0.0], [1.0, 2.0]]);
        assert_eq!(source.signal_type(), PhotodiodeSignalType::Current);
        assert_eq!(source.spring_constant(), Some(0.2));
        assert!(source.calibration().sensitivity_calibrated);
        assert!(!source.calibration().spring_constant_calibrated);
    }
}
