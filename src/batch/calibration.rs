// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Resolution of the spring constant and photodiode sensitivity of a batch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curve::{PhotodiodeSignalType, SpectroscopySource};

/// Read-in values differing by less than this are considered identical.
pub const UNANIMITY_TOLERANCE: f64 = 1e-10;

/// Calibration quantity resolved for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalibratedQuantity {
    /// Sensitivity of the photodiode measuring the given signal.
    Sensitivity(PhotodiodeSignalType),
    SpringConstant,
}

impl CalibratedQuantity {
    pub const ALL: [CalibratedQuantity; 3] = [
        CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Voltage),
        CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Current),
        CalibratedQuantity::SpringConstant,
    ];

    /// Position of the quantity in `CalibratedQuantity::ALL`.
    #[inline(always)]
    pub(crate) fn index(&self) -> usize {
        match self {
            CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Voltage) => 0,
            CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Current) => 1,
            CalibratedQuantity::SpringConstant => 2,
        }
    }

    /// Does the quantity apply to the source?
    pub(crate) fn applies_to(&self, source: &SpectroscopySource) -> bool {
        match self {
            CalibratedQuantity::Sensitivity(signal) => source.signal_type() == *signal,
            CalibratedQuantity::SpringConstant => true,
        }
    }

    /// Usable value of the quantity read from the source file.
    pub(crate) fn read_in(&self, source: &SpectroscopySource) -> Option<f64> {
        match self {
            CalibratedQuantity::Sensitivity(_) => source.usable_sensitivity(),
            CalibratedQuantity::SpringConstant => source.usable_spring_constant(),
        }
    }

    /// Was the source recorded already calibrated in this quantity?
    pub(crate) fn is_calibrated(&self, source: &SpectroscopySource) -> bool {
        match self {
            CalibratedQuantity::Sensitivity(_) => source.calibration().sensitivity_calibrated,
            CalibratedQuantity::SpringConstant => {
                source.calibration().spring_constant_calibrated
            }
        }
    }
}

impl fmt::Display for CalibratedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibratedQuantity::Sensitivity(signal) => write!(f, "{} sensitivity", signal),
            CalibratedQuantity::SpringConstant => write!(f, "spring constant"),
        }
    }
}

/// Which of the read-in and user-provided values may or must be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationAvailability {
    /// User input may be used (no source was pre-calibrated).
    pub input_can_be_used: bool,
    /// Every source carries a usable read-in value.
    pub read_in_can_be_used: bool,
    /// At least one source has no usable read-in value.
    pub input_necessary: bool,
    /// At least one source was pre-calibrated so only the read-in value is valid.
    pub read_in_necessary: bool,
}

impl CalibrationAvailability {
    /// Compute the availability of a quantity for the sources it applies to.
    pub fn compute<'a>(
        quantity: CalibratedQuantity,
        sources: impl IntoIterator<Item = &'a SpectroscopySource>,
    ) -> Self {
        let mut any = false;
        let mut read_in_necessary = false;
        let mut all_read_in = true;

        for source in sources.into_iter().filter(|s| quantity.applies_to(s)) {
            any = true;
            read_in_necessary |= quantity.is_calibrated(source);
            all_read_in &= quantity.read_in(source).is_some();
        }

        let read_in_can_be_used = any && all_read_in;

        CalibrationAvailability {
            input_can_be_used: !read_in_necessary,
            read_in_can_be_used,
            input_necessary: !read_in_can_be_used,
            read_in_necessary,
        }
    }

    /// Whether the read-in value is actually used given the user's choice.
    pub fn effective_use_read_in(&self, requested: bool) -> bool {
        if self.read_in_necessary {
            true
        } else if !self.read_in_can_be_used {
            false
        } else {
            requested
        }
    }
}

/// User choice for one calibration quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationInput {
    /// Value entered by the user. NaN if not given.
    #[serde(default = "default_nan")]
    pub value: f64,
    /// Prefer the values read from the source files.
    #[serde(default = "default_true")]
    pub use_read_in: bool,
}

fn default_nan() -> f64 {
    f64::NAN
}

fn default_true() -> bool {
    true
}

impl Default for CalibrationInput {
    fn default() -> Self {
        CalibrationInput {
            value: f64::NAN,
            use_read_in: true,
        }
    }
}

/// The value shared by all sources, or NaN if the sources disagree,
/// lack a value, or there are no sources.
pub fn unanimous_value(values: impl IntoIterator<Item = Option<f64>>) -> f64 {
    let mut values = values.into_iter();

    let Some(Some(first)) = values.next() else {
        return f64::NAN;
    };

    for value in values {
        match value {
            Some(v) if (v - first).abs() <= UNANIMITY_TOLERANCE => (),
            _ => return f64::NAN,
        }
    }

    first
}

/// Value of a quantity used for the batch.
pub(crate) fn resolve<'a>(
    quantity: CalibratedQuantity,
    input: &CalibrationInput,
    sources: impl IntoIterator<Item = &'a SpectroscopySource> + Clone,
) -> f64 {
    let availability = CalibrationAvailability::compute(quantity, sources.clone());

    if availability.effective_use_read_in(input.use_read_in) {
        unanimous_value(
            sources
                .into_iter()
                .filter(|s| quantity.applies_to(s))
                .map(|s| quantity.read_in(s)),
        )
    } else {
        input.value
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::curve::CalibrationState;

    fn source(
        signal: PhotodiodeSignalType,
        sensitivity: Option<f64>,
        calibrated: bool,
    ) -> SpectroscopySource {
        let mut builder = SpectroscopySource::new();
        builder
            .identifier("source")
            .signal_type(signal)
            .calibration(CalibrationState {
                sensitivity_calibrated: calibrated,
                spring_constant_calibrated: false,
            });

        if let Some(s) = sensitivity {
            builder.sensitivity(s);
        }

        builder.build().unwrap()
    }

    #[test]
    fn unanimity() {
        let s = 48.7;
        assert_relative_eq!(unanimous_value([Some(s), Some(s), Some(s)]), s);
        assert_relative_eq!(unanimous_value([Some(s), Some(s + 1e-12)]), s);
        assert!(unanimous_value([Some(s), Some(s + 0.1)]).is_nan());
        assert!(unanimous_value([Some(s), None]).is_nan());
        assert!(unanimous_value([None, Some(s)]).is_nan());
        assert!(unanimous_value(std::iter::empty()).is_nan());
    }

    #[test]
    fn availability_all_read_in() {
        let sources = [
            source(PhotodiodeSignalType::Voltage, Some(50.0), false),
            source(PhotodiodeSignalType::Voltage, Some(50.0), false),
        ];

        let quantity = CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Voltage);
        let availability = CalibrationAvailability::compute(quantity, &sources);
        assert_eq!(
            availability,
            CalibrationAvailability {
                input_can_be_used: true,
                read_in_can_be_used: true,
                input_necessary: false,
                read_in_necessary: false,
            }
        );

        assert!(availability.effective_use_read_in(true));
        assert!(!availability.effective_use_read_in(false));
    }

    #[test]
    fn availability_missing_read_in() {
        let sources = [
            source(PhotodiodeSignalType::Voltage, Some(50.0), false),
            source(PhotodiodeSignalType::Voltage, None, false),
        ];

        let quantity = CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Voltage);
        let availability = CalibrationAvailability::compute(quantity, &sources);
        assert!(availability.input_necessary);
        assert!(!availability.read_in_can_be_used);
        assert!(!availability.effective_use_read_in(true));
    }

    #[test]
    fn availability_precalibrated() {
        let sources = [
            source(PhotodiodeSignalType::Current, Some(2.0), true),
            source(PhotodiodeSignalType::Current, Some(2.0), false),
        ];

        let quantity = CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Current);
        let availability = CalibrationAvailability::compute(quantity, &sources);
        assert!(availability.read_in_necessary);
        assert!(!availability.input_can_be_used);
        assert!(availability.effective_use_read_in(false));
    }

    #[test]
    fn availability_other_signal() {
        let sources = [source(PhotodiodeSignalType::Voltage, Some(50.0), true)];

        let quantity = CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Current);
        let availability = CalibrationAvailability::compute(quantity, &sources);
        assert!(!availability.read_in_necessary);
        assert!(!availability.read_in_can_be_used);
        assert!(availability.input_can_be_used);
    }

    #[test]
    fn resolve_value() {
        let quantity = CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Voltage);
        let input = CalibrationInput {
            value: 30.0,
            use_read_in: true,
        };

        let sources = [
            source(PhotodiodeSignalType::Voltage, Some(50.0), false),
            source(PhotodiodeSignalType::Voltage, Some(50.0), false),
            source(PhotodiodeSignalType::Current, Some(3.0), false),
        ];
        assert_relative_eq!(resolve(quantity, &input, &sources), 50.0);

        let no_read_in = CalibrationInput {
            use_read_in: false,
            ..input
        };
        assert_relative_eq!(resolve(quantity, &no_read_in, &sources), 30.0);

        let sources = [
            source(PhotodiodeSignalType::Voltage, Some(50.0), false),
            source(PhotodiodeSignalType::Voltage, Some(50.1), false),
        ];
        assert!(resolve(quantity, &input, &sources).is_nan());
    }
}
