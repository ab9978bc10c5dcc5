// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Calibration of the photodiode sensitivity from curves recorded on a stiff substrate.

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::errors::CalibrationError;

/// How the curve is sampled at the ends of the selected range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PointLookup {
    /// Point of the curve closest to the requested position.
    #[default]
    #[strum(serialize = "nearest")]
    Nearest,
    /// Linear interpolation between the neighbouring points.
    #[strum(serialize = "interpolated")]
    Interpolated,
}

/// Collects sensitivity measurements made on calibration curves.
#[derive(Debug, Clone, Default, Getters, CopyGetters)]
pub struct SensitivityCalibrator {
    #[getset(get_copy = "pub")]
    lookup: PointLookup,
    /// Accepted measurements (nm per signal unit).
    #[getset(get = "pub")]
    measurements: Vec<f64>,
}

impl SensitivityCalibrator {
    pub fn new(lookup: PointLookup) -> Self {
        SensitivityCalibrator {
            lookup,
            measurements: Vec::new(),
        }
    }

    /// Sensitivity over the selected range of the curve (piezo distance vs. photodiode signal),
    /// calculated from the two end points of the range.
    pub fn measure(&self, curve: &Curve, start: f64, end: f64) -> Result<f64, CalibrationError> {
        if curve.is_empty() {
            return Err(CalibrationError::EmptyCurve);
        }

        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        if !start.is_finite() || !end.is_finite() || start == end {
            return Err(CalibrationError::InvalidRange(start, end));
        }

        let [x1, y1] = self.point_at(curve, start)?;
        let [x2, y2] = self.point_at(curve, end)?;

        let signal_change = (y2 - y1).abs();
        if signal_change == 0.0 || !signal_change.is_finite() {
            return Err(CalibrationError::ZeroSignalChange);
        }

        Ok((x2 - x1).abs() / signal_change)
    }

    fn point_at(&self, curve: &Curve, x: f64) -> Result<[f64; 2], CalibrationError> {
        match self.lookup {
            PointLookup::Nearest => curve.nearest(x).ok_or(CalibrationError::EmptyCurve),
            PointLookup::Interpolated => curve
                .sorted_by_x()
                .interpolate(x)
                .map(|y| [x, y])
                .ok_or(CalibrationError::OutsideCurve(x)),
        }
    }

    /// Measure the sensitivity and store it.
    /// Rejected measurements are not stored.
    pub fn apply(&mut self, curve: &Curve, start: f64, end: f64) -> Result<f64, CalibrationError> {
        let sensitivity = self.measure(curve, start, end)?;
        self.measurements.push(sensitivity);
        log::debug!(
            "Sensitivity measurement #{}: {} (mean {}).",
            self.measurements.len(),
            sensitivity,
            self.mean_sensitivity()
        );
        Ok(sensitivity)
    }

    /// Mean of all stored measurements. NaN if there are none.
    pub fn mean_sensitivity(&self) -> f64 {
        if self.measurements.is_empty() {
            f64::NAN
        } else {
            statistical::mean(&self.measurements)
        }
    }

    #[inline(always)]
    pub fn is_finish_enabled(&self) -> bool {
        !self.mean_sensitivity().is_nan()
    }

    /// Remove the most recent measurement.
    pub fn undo_last(&mut self) -> Option<f64> {
        self.measurements.pop()
    }

    pub fn clear(&mut self) {
        self.measurements.clear();
    }
}
