// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Derived flags of a batch and the transitions reported after each change of the batch.

use std::fmt;

use crate::input::ThicknessCorrection;

use super::calibration::{CalibratedQuantity, CalibrationAvailability};

/// Boolean property of a batch derived from its settings and sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchFlag {
    InputCanBeUsed(CalibratedQuantity),
    ReadInCanBeUsed(CalibratedQuantity),
    InputNecessary(CalibratedQuantity),
    ReadInNecessary(CalibratedQuantity),
    /// The read-in value is used after applying the availability policy.
    UseReadIn(CalibratedQuantity),
    TipTransitionRadiusCalculable,
    SubstrateEffectCorrectionKnown,
    AdhesiveEnergyRequired,
    BasicSettingsSpecified,
    SettingsSpecified,
    CroppingOnCurveSelectionPossible,
}

impl fmt::Display for BatchFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchFlag::InputCanBeUsed(q) => write!(f, "{} input can be used", q),
            BatchFlag::ReadInCanBeUsed(q) => write!(f, "read-in {} can be used", q),
            BatchFlag::InputNecessary(q) => write!(f, "{} input necessary", q),
            BatchFlag::ReadInNecessary(q) => write!(f, "read-in {} necessary", q),
            BatchFlag::UseReadIn(q) => write!(f, "use read-in {}", q),
            BatchFlag::TipTransitionRadiusCalculable => {
                write!(f, "tip transition radius calculable")
            }
            BatchFlag::SubstrateEffectCorrectionKnown => {
                write!(f, "substrate effect correction known")
            }
            BatchFlag::AdhesiveEnergyRequired => write!(f, "adhesive energy required"),
            BatchFlag::BasicSettingsSpecified => write!(f, "basic settings specified"),
            BatchFlag::SettingsSpecified => write!(f, "settings specified"),
            BatchFlag::CroppingOnCurveSelectionPossible => {
                write!(f, "cropping on curve selection possible")
            }
        }
    }
}

/// Reported change of the derived state of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    Flag {
        flag: BatchFlag,
        old: bool,
        new: bool,
    },
    ApplicableCorrections {
        old: Vec<ThicknessCorrection>,
        new: Vec<ThicknessCorrection>,
    },
}

/// Calibration flags of one quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationFlags {
    pub availability: CalibrationAvailability,
    pub use_read_in: bool,
}

/// All derived properties of a batch.
/// Fields are listed in the order in which they are evaluated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedFlags {
    pub calibration: [CalibrationFlags; 3],
    pub tip_transition_radius_calculable: bool,
    pub substrate_effect_correction_known: bool,
    pub applicable_corrections: Vec<ThicknessCorrection>,
    pub adhesive_energy_required: bool,
    pub basic_settings_specified: bool,
    pub settings_specified: bool,
    pub cropping_on_curve_selection_possible: bool,
}

impl DerivedFlags {
    /// Calibration flags of the given quantity.
    pub fn calibration(&self, quantity: CalibratedQuantity) -> &CalibrationFlags {
        &self.calibration[quantity.index()]
    }

    /// Boolean flags evaluated before the applicable-correction set.
    fn early_flags(&self) -> Vec<(BatchFlag, bool)> {
        let mut flags = Vec::with_capacity(22);

        for (quantity, calibration) in CalibratedQuantity::ALL.iter().zip(&self.calibration) {
            let a = calibration.availability;
            flags.push((BatchFlag::InputCanBeUsed(*quantity), a.input_can_be_used));
            flags.push((BatchFlag::ReadInCanBeUsed(*quantity), a.read_in_can_be_used));
            flags.push((BatchFlag::InputNecessary(*quantity), a.input_necessary));
            flags.push((BatchFlag::ReadInNecessary(*quantity), a.read_in_necessary));
            flags.push((BatchFlag::UseReadIn(*quantity), calibration.use_read_in));
        }

        flags.push((
            BatchFlag::TipTransitionRadiusCalculable,
            self.tip_transition_radius_calculable,
        ));
        flags.push((
            BatchFlag::SubstrateEffectCorrectionKnown,
            self.substrate_effect_correction_known,
        ));
        flags
    }

    /// Boolean flags evaluated after the applicable-correction set.
    fn late_flags(&self) -> [(BatchFlag, bool); 4] {
        [
            (
                BatchFlag::AdhesiveEnergyRequired,
                self.adhesive_energy_required,
            ),
            (
                BatchFlag::BasicSettingsSpecified,
                self.basic_settings_specified,
            ),
            (BatchFlag::SettingsSpecified, self.settings_specified),
            (
                BatchFlag::CroppingOnCurveSelectionPossible,
                self.cropping_on_curve_selection_possible,
            ),
        ]
    }

    /// Transitions leading from `old` to `self`, in evaluation order.
    /// Properties that did not change are not reported.
    pub fn diff(&self, old: &DerivedFlags) -> Vec<StateChange> {
        let mut changes = Vec::new();

        push_flag_changes(&mut changes, &self.early_flags(), &old.early_flags());

        if self.applicable_corrections != old.applicable_corrections {
            changes.push(StateChange::ApplicableCorrections {
                old: old.applicable_corrections.clone(),
                new: self.applicable_corrections.clone(),
            });
        }

        push_flag_changes(&mut changes, &self.late_flags(), &old.late_flags());
        changes
    }
}

fn push_flag_changes(
    changes: &mut Vec<StateChange>,
    new: &[(BatchFlag, bool)],
    old: &[(BatchFlag, bool)],
) {
    for (&(flag, new), &(_, old)) in new.iter().zip(old) {
        if new != old {
            changes.push(StateChange::Flag { flag, old, new });
        }
    }
}
