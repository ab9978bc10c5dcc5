// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! This module contains the mutable state of a named processing batch.
//!
//! Every setter of [`BatchState`] recomputes all derived flags of the batch
//! and returns the transitions that actually occurred.

use std::sync::Arc;

use getset::{CopyGetters, Getters};

use crate::curve::{Branch, PhotodiodeSignalType, SpectroscopySource};
use crate::input::defaults::MAX_BASELINE_DEGREE;
use crate::input::sample::is_valid_poisson_ratio;
use crate::input::{
    AdhesiveEnergyEstimation, ContactEstimationGuide, Cropping, IndentationModel,
    ProcessingDefaults, RegressionStrategy, SampleDescription, SampleThickness, Smoothing,
    ThicknessCorrection, TipShape, TipShapeParameter,
};

pub mod build;
pub mod calibration;
pub mod collection;
pub mod flags;
pub mod shared;

pub use build::{ApplyToAll, ManualContactSelector};
pub use calibration::{CalibratedQuantity, CalibrationAvailability, CalibrationInput};
pub use collection::ProcessingModel;
pub use flags::{BatchFlag, DerivedFlags, StateChange};
pub use shared::SharedBatch;

/// Settings and sources of one named batch.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct BatchState {
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    sources: Vec<Arc<SpectroscopySource>>,

    #[getset(get_copy = "pub")]
    indentation_model: IndentationModel,
    #[getset(get = "pub")]
    tip: TipShape,
    #[getset(get = "pub")]
    sample: SampleDescription,
    #[getset(get_copy = "pub")]
    correct_substrate_effect: bool,
    #[getset(get_copy = "pub")]
    thickness_correction: ThicknessCorrection,
    #[getset(get_copy = "pub")]
    adhesive_energy_estimation: AdhesiveEnergyEstimation,

    #[getset(get_copy = "pub")]
    regression_strategy: RegressionStrategy,
    #[getset(get_copy = "pub")]
    contact_estimation_guide: ContactEstimationGuide,
    #[getset(get_copy = "pub")]
    baseline_degree: usize,
    #[getset(get_copy = "pub")]
    fitted_branch: Branch,
    #[getset(get_copy = "pub")]
    automatic_contact_estimation: bool,

    /// Indexed by `CalibratedQuantity::index`.
    calibration_inputs: [CalibrationInput; 3],

    #[getset(get_copy = "pub")]
    cropping: Cropping,
    #[getset(get_copy = "pub")]
    smoothing: Option<Smoothing>,
    #[getset(get_copy = "pub")]
    indentation_limit: f64,
    #[getset(get_copy = "pub")]
    load_limit: f64,
    #[getset(get_copy = "pub")]
    fit_domain: (f64, f64),
    #[getset(get_copy = "pub")]
    calculate_r_squared: bool,
    #[getset(get_copy = "pub")]
    calculate_adhesion_force: bool,

    #[getset(get = "pub")]
    flags: DerivedFlags,
}

impl BatchState {
    /// Create an empty batch initialized from the processing defaults.
    pub fn new(name: &str, defaults: &ProcessingDefaults) -> Self {
        let mut calibration_inputs = [CalibrationInput::default(); 3];
        for quantity in CalibratedQuantity::ALL {
            calibration_inputs[quantity.index()] = match quantity {
                CalibratedQuantity::Sensitivity(_) => CalibrationInput {
                    value: defaults.sensitivity(),
                    use_read_in: defaults.use_read_in_sensitivity(),
                },
                CalibratedQuantity::SpringConstant => CalibrationInput {
                    value: defaults.spring_constant(),
                    use_read_in: defaults.use_read_in_spring_constant(),
                },
            };
        }

        let mut state = BatchState {
            name: name.to_owned(),
            sources: Vec::new(),
            indentation_model: defaults.indentation_model(),
            tip: TipShape::default(),
            sample: SampleDescription {
                poisson_ratio: defaults.poisson_ratio(),
                thickness: None,
                adherent: defaults.sample_adherent(),
            },
            correct_substrate_effect: defaults.correct_substrate_effect(),
            thickness_correction: defaults.thickness_correction(),
            adhesive_energy_estimation: defaults.adhesive_energy_estimation(),
            regression_strategy: defaults.regression_strategy(),
            contact_estimation_guide: defaults.contact_estimation_guide(),
            baseline_degree: defaults.baseline_degree(),
            fitted_branch: defaults.fitted_branch(),
            automatic_contact_estimation: defaults.automatic_contact_estimation(),
            calibration_inputs,
            cropping: Cropping::default(),
            smoothing: None,
            indentation_limit: f64::INFINITY,
            load_limit: f64::INFINITY,
            fit_domain: (f64::NEG_INFINITY, f64::INFINITY),
            calculate_r_squared: defaults.calculate_r_squared(),
            calculate_adhesion_force: defaults.calculate_adhesion_force(),
            flags: DerivedFlags::default(),
        };

        state.flags = state.derive_flags();
        state
    }

    /// Apply a change to the batch and report the resulting transitions of derived flags.
    fn update(&mut self, change: impl FnOnce(&mut Self)) -> Vec<StateChange> {
        change(self);

        let new = self.derive_flags();
        let changes = new.diff(&self.flags);
        self.flags = new;

        for change in changes.iter() {
            match change {
                StateChange::Flag { flag, old, new } => {
                    log::debug!("Batch '{}': {} changed from {} to {}.", self.name, flag, old, new)
                }
                StateChange::ApplicableCorrections { old, new } => log::debug!(
                    "Batch '{}': applicable corrections changed from {:?} to {:?}.",
                    self.name,
                    old,
                    new
                ),
            }
        }

        changes
    }

    /// Recompute all derived flags from the current settings and sources.
    /// Later checks read the results of earlier ones.
    pub fn derive_flags(&self) -> DerivedFlags {
        let mut flags = DerivedFlags::default();

        for quantity in CalibratedQuantity::ALL {
            let availability =
                CalibrationAvailability::compute(quantity, self.sources.iter().map(Arc::as_ref));
            let input = &self.calibration_inputs[quantity.index()];
            flags.calibration[quantity.index()] = flags::CalibrationFlags {
                availability,
                use_read_in: availability.effective_use_read_in(input.use_read_in),
            };
        }

        // (1)
        flags.tip_transition_radius_calculable = self
            .indentation_model
            .calculate_transition_radius(&self.tip)
            .is_some();

        // (2)
        flags.substrate_effect_correction_known = self
            .thickness_correction
            .is_correction_known(self.indentation_model, self.sample.adherent);

        // (3)
        flags.applicable_corrections =
            ThicknessCorrection::applicable(self.indentation_model, self.sample.adherent);

        // (4)
        flags.adhesive_energy_required = self.indentation_model.requires_adhesive_energy();

        // (5)
        let substrate_ok = !self.correct_substrate_effect
            || (flags.substrate_effect_correction_known && self.sample.is_thickness_specified());

        flags.basic_settings_specified = !self.sources.is_empty()
            && self
                .indentation_model
                .is_necessary_information_provided(&self.tip)
            && is_valid_poisson_ratio(self.sample.poisson_ratio)
            && self.baseline_degree <= MAX_BASELINE_DEGREE
            && substrate_ok;

        // (6)
        let calibration_ok = self.is_calibration_resolved();
        let smoothing_ok = self.smoothing.map(|s| s.validate().is_ok()).unwrap_or(true);
        let (lower, upper) = self.fit_domain;

        flags.settings_specified = flags.basic_settings_specified
            && calibration_ok
            && self.cropping.is_specified()
            && smoothing_ok
            && lower < upper
            && !self.indentation_limit.is_nan()
            && !self.load_limit.is_nan();

        // (7)
        flags.cropping_on_curve_selection_possible = !self.sources.is_empty() && calibration_ok;

        flags
    }

    /// Does every calibration quantity needed by the sources resolve to a usable number?
    fn is_calibration_resolved(&self) -> bool {
        CalibratedQuantity::ALL.into_iter().all(|quantity| {
            if !self.sources.iter().any(|s| quantity.applies_to(s)) {
                return true;
            }

            let value = self.resolved(quantity);
            value.is_finite() && value > 0.0
        })
    }

    /// User input for the given calibration quantity.
    pub fn calibration_input(&self, quantity: CalibratedQuantity) -> &CalibrationInput {
        &self.calibration_inputs[quantity.index()]
    }

    /// Value of the calibration quantity used for the whole batch.
    /// NaN if the value is unknown or the read-in values of the sources disagree.
    pub fn resolved(&self, quantity: CalibratedQuantity) -> f64 {
        calibration::resolve(
            quantity,
            &self.calibration_inputs[quantity.index()],
            self.sources.iter().map(Arc::as_ref),
        )
    }

    #[inline(always)]
    pub fn resolved_spring_constant(&self) -> f64 {
        self.resolved(CalibratedQuantity::SpringConstant)
    }

    #[inline(always)]
    pub fn resolved_sensitivity(&self, signal: PhotodiodeSignalType) -> f64 {
        self.resolved(CalibratedQuantity::Sensitivity(signal))
    }

    #[inline(always)]
    pub fn is_settings_specified(&self) -> bool {
        self.flags.settings_specified
    }

    /// Replace all sources of the batch.
    pub fn set_sources(&mut self, sources: Vec<Arc<SpectroscopySource>>) -> Vec<StateChange> {
        self.update(|s| s.sources = sources)
    }

    pub fn add_sources(
        &mut self,
        sources: impl IntoIterator<Item = Arc<SpectroscopySource>>,
    ) -> Vec<StateChange> {
        self.update(|s| s.sources.extend(sources))
    }

    /// Remove all sources with the given identifier.
    pub fn remove_source(&mut self, identifier: &str) -> Vec<StateChange> {
        self.update(|s| s.sources.retain(|source| source.identifier() != identifier))
    }

    pub fn set_indentation_model(&mut self, model: IndentationModel) -> Vec<StateChange> {
        self.update(|s| s.indentation_model = model)
    }

    /// Set one parameter of the tip. Half-angles are in degrees.
    pub fn set_tip_parameter(
        &mut self,
        parameter: TipShapeParameter,
        value: f64,
    ) -> Vec<StateChange> {
        self.update(|s| s.tip.set_value(parameter, value))
    }

    pub fn set_tip(&mut self, tip: TipShape) -> Vec<StateChange> {
        self.update(|s| s.tip = tip)
    }

    /// Fill in the transition radius of a blunt tip from its radius and half-angle.
    /// Does nothing if the transition radius is not calculable.
    pub fn calculate_transition_radius(&mut self) -> Vec<StateChange> {
        match self
            .indentation_model
            .calculate_transition_radius(&self.tip)
        {
            Some(b) => self.set_tip_parameter(TipShapeParameter::TransitionRadius, b),
            None => Vec::new(),
        }
    }

    pub fn set_poisson_ratio(&mut self, poisson_ratio: f64) -> Vec<StateChange> {
        self.update(|s| s.sample.poisson_ratio = poisson_ratio)
    }

    pub fn set_sample_thickness(&mut self, thickness: Option<SampleThickness>) -> Vec<StateChange> {
        self.update(|s| s.sample.thickness = thickness)
    }

    pub fn set_sample_adherent(&mut self, adherent: bool) -> Vec<StateChange> {
        self.update(|s| s.sample.adherent = adherent)
    }

    pub fn set_correct_substrate_effect(&mut self, correct: bool) -> Vec<StateChange> {
        self.update(|s| s.correct_substrate_effect = correct)
    }

    pub fn set_thickness_correction(&mut self, correction: ThicknessCorrection) -> Vec<StateChange> {
        self.update(|s| s.thickness_correction = correction)
    }

    pub fn set_adhesive_energy_estimation(
        &mut self,
        estimation: AdhesiveEnergyEstimation,
    ) -> Vec<StateChange> {
        self.update(|s| s.adhesive_energy_estimation = estimation)
    }

    pub fn set_regression_strategy(&mut self, strategy: RegressionStrategy) -> Vec<StateChange> {
        self.update(|s| s.regression_strategy = strategy)
    }

    pub fn set_contact_estimation_guide(
        &mut self,
        guide: ContactEstimationGuide,
    ) -> Vec<StateChange> {
        self.update(|s| s.contact_estimation_guide = guide)
    }

    pub fn set_baseline_degree(&mut self, degree: usize) -> Vec<StateChange> {
        self.update(|s| s.baseline_degree = degree)
    }

    pub fn set_fitted_branch(&mut self, branch: Branch) -> Vec<StateChange> {
        self.update(|s| s.fitted_branch = branch)
    }

    pub fn set_automatic_contact_estimation(&mut self, automatic: bool) -> Vec<StateChange> {
        self.update(|s| s.automatic_contact_estimation = automatic)
    }

    /// Set the spring constant (N/m) entered by the user.
    pub fn set_spring_constant(&mut self, value: f64) -> Vec<StateChange> {
        self.update(|s| s.calibration_inputs[CalibratedQuantity::SpringConstant.index()].value = value)
    }

    pub fn set_use_read_in_spring_constant(&mut self, use_read_in: bool) -> Vec<StateChange> {
        self.update(|s| {
            s.calibration_inputs[CalibratedQuantity::SpringConstant.index()].use_read_in =
                use_read_in
        })
    }

    /// Set the sensitivity (nm per signal unit) entered by the user.
    pub fn set_sensitivity(
        &mut self,
        signal: PhotodiodeSignalType,
        value: f64,
    ) -> Vec<StateChange> {
        self.update(|s| {
            s.calibration_inputs[CalibratedQuantity::Sensitivity(signal).index()].value = value
        })
    }

    pub fn set_use_read_in_sensitivity(
        &mut self,
        signal: PhotodiodeSignalType,
        use_read_in: bool,
    ) -> Vec<StateChange> {
        self.update(|s| {
            s.calibration_inputs[CalibratedQuantity::Sensitivity(signal).index()].use_read_in =
                use_read_in
        })
    }

    pub fn set_cropping(&mut self, cropping: Cropping) -> Vec<StateChange> {
        self.update(|s| s.cropping = cropping)
    }

    pub fn set_smoothing(&mut self, smoothing: Option<Smoothing>) -> Vec<StateChange> {
        self.update(|s| s.smoothing = smoothing)
    }

    pub fn set_limits(&mut self, indentation_limit: f64, load_limit: f64) -> Vec<StateChange> {
        self.update(|s| {
            s.indentation_limit = indentation_limit;
            s.load_limit = load_limit;
        })
    }

    pub fn set_fit_domain(&mut self, lower: f64, upper: f64) -> Vec<StateChange> {
        self.update(|s| s.fit_domain = (lower, upper))
    }

    pub fn set_calculate_r_squared(&mut self, calculate: bool) -> Vec<StateChange> {
        self.update(|s| s.calculate_r_squared = calculate)
    }

    pub fn set_calculate_adhesion_force(&mut self, calculate: bool) -> Vec<StateChange> {
        self.update(|s| s.calculate_adhesion_force = calculate)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::curve::{CalibrationState, Curve};

    fn source(identifier: &str, k: Option<f64>, sensitivity: Option<f64>) -> Arc<SpectroscopySource> {
        let mut builder = SpectroscopySource::new();
        builder
            .identifier(identifier)
            .approach(Curve::from_xy(&[0.0, 1.0, 2.0], &[0.0, 0.0, 1.0]));

        if let Some(k) = k {
            builder.spring_constant(k);
        }

        if let Some(s) = sensitivity {
            builder.sensitivity(s);
        }

        Arc::new(builder.build().unwrap())
    }

    fn flag(changes: &[StateChange], flag: BatchFlag) -> Option<(bool, bool)> {
        changes.iter().find_map(|c| match c {
            StateChange::Flag { flag: f, old, new } if *f == flag => Some((*old, *new)),
            _ => None,
        })
    }

    fn cone_batch() -> BatchState {
        let mut batch = BatchState::new("cone", &ProcessingDefaults::default());
        batch.set_indentation_model(IndentationModel::Cone);
        batch.set_tip_parameter(TipShapeParameter::HalfAngle, 20.0);
        batch.set_spring_constant(0.1);
        batch.set_sensitivity(PhotodiodeSignalType::Voltage, 50.0);
        batch
    }

    #[test]
    fn new_batch_is_incomplete() {
        let batch = BatchState::new("empty", &ProcessingDefaults::default());
        assert_eq!(batch.name(), "empty");
        assert!(batch.sources().is_empty());
        assert_eq!(batch.indentation_model(), IndentationModel::Paraboloid);
        assert!(!batch.flags().basic_settings_specified);
        assert!(!batch.is_settings_specified());
        assert!(!batch.flags().cropping_on_curve_selection_possible);
        assert_eq!(
            batch.flags().applicable_corrections,
            vec![
                ThicknessCorrection::LebedevChebyshev,
                ThicknessCorrection::Chadwick
            ]
        );
    }

    #[test]
    fn adding_sources_completes_settings() {
        let mut batch = cone_batch();
        let changes = batch.add_sources([source("a", None, None)]);

        assert_eq!(
            flag(&changes, BatchFlag::BasicSettingsSpecified),
            Some((false, true))
        );
        assert_eq!(
            flag(&changes, BatchFlag::SettingsSpecified),
            Some((false, true))
        );
        assert!(batch.is_settings_specified());
        assert!(batch.flags().cropping_on_curve_selection_possible);

        // read-in is not available so it is not used
        assert!(!batch.flags().calibration(CalibratedQuantity::SpringConstant).use_read_in);
        assert_relative_eq!(batch.resolved_spring_constant(), 0.1);
        assert_relative_eq!(batch.resolved_sensitivity(PhotodiodeSignalType::Voltage), 50.0);
    }

    #[test]
    fn no_redundant_notifications() {
        let mut batch = cone_batch();
        batch.add_sources([source("a", None, None)]);

        assert!(batch.set_regression_strategy(RegressionStrategy::Tukey).is_empty());
        assert!(batch.set_spring_constant(0.2).is_empty());
        assert!(batch.set_indentation_model(IndentationModel::Cone).is_empty());
    }

    #[test]
    fn transition_order() {
        let mut batch = cone_batch();
        batch.add_sources([source("a", None, None)]);

        // sphere needs a radius, so settings become incomplete
        let changes = batch.set_indentation_model(IndentationModel::SphereJkr);
        let positions: Vec<usize> = [
            BatchFlag::AdhesiveEnergyRequired,
            BatchFlag::BasicSettingsSpecified,
            BatchFlag::SettingsSpecified,
        ]
        .iter()
        .map(|f| {
            changes
                .iter()
                .position(|c| matches!(c, StateChange::Flag { flag, .. } if flag == f))
                .unwrap()
        })
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            changes[positions[0] - 1],
            StateChange::ApplicableCorrections {
                old: vec![
                    ThicknessCorrection::LebedevChebyshev,
                    ThicknessCorrection::Chadwick
                ],
                new: vec![ThicknessCorrection::LebedevChebyshev],
            }
        );
        assert_eq!(
            flag(&changes, BatchFlag::SettingsSpecified),
            Some((true, false))
        );
    }

    #[test]
    fn substrate_correction() {
        let mut batch = BatchState::new("sphere", &ProcessingDefaults::default());
        batch.set_indentation_model(IndentationModel::SphereSneddon);
        batch.set_tip_parameter(TipShapeParameter::Radius, 2.0);
        batch.set_spring_constant(0.1);
        batch.set_sensitivity(PhotodiodeSignalType::Voltage, 50.0);
        batch.add_sources([source("a", None, None)]);
        assert!(batch.is_settings_specified());

        let changes = batch.set_correct_substrate_effect(true);
        assert_eq!(
            flag(&changes, BatchFlag::SettingsSpecified),
            Some((true, false))
        );

        batch.set_sample_thickness(Some(SampleThickness::Uniform(1.0)));
        assert!(batch.is_settings_specified());

        let changes = batch.set_thickness_correction(ThicknessCorrection::Chadwick);
        assert_eq!(
            flag(&changes, BatchFlag::SubstrateEffectCorrectionKnown),
            Some((true, false))
        );
        assert!(!batch.is_settings_specified());

        // the applicable set does not depend on the selected correction
        assert!(!changes
            .iter()
            .any(|c| matches!(c, StateChange::ApplicableCorrections { .. })));
    }

    #[test]
    fn read_in_unanimity() {
        let mut batch = cone_batch();
        batch.set_sources(vec![
            source("a", Some(0.05), Some(42.0)),
            source("b", Some(0.05), Some(42.0)),
            source("c", Some(0.05), Some(42.0)),
        ]);

        assert!(batch.flags().calibration(CalibratedQuantity::SpringConstant).use_read_in);
        assert_relative_eq!(batch.resolved_spring_constant(), 0.05);
        assert_relative_eq!(batch.resolved_sensitivity(PhotodiodeSignalType::Voltage), 42.0);
        assert!(batch.is_settings_specified());

        let changes = batch.add_sources([source("d", Some(0.15), Some(42.0))]);
        assert!(batch.resolved_spring_constant().is_nan());
        assert_eq!(
            flag(&changes, BatchFlag::SettingsSpecified),
            Some((true, false))
        );

        // user input is used again once read-in is switched off
        batch.set_use_read_in_spring_constant(false);
        assert_relative_eq!(batch.resolved_spring_constant(), 0.1);
        assert!(batch.is_settings_specified());
    }

    #[test]
    fn read_in_forced_by_calibrated_source() {
        let mut batch = cone_batch();
        let calibrated = SpectroscopySource::new()
            .identifier("calibrated")
            .sensitivity(30.0)
            .calibration(CalibrationState {
                sensitivity_calibrated: true,
                spring_constant_calibrated: false,
            })
            .build()
            .unwrap();

        let changes = batch.set_sources(vec![Arc::new(calibrated)]);
        let quantity = CalibratedQuantity::Sensitivity(PhotodiodeSignalType::Voltage);
        assert_eq!(
            flag(&changes, BatchFlag::ReadInNecessary(quantity)),
            Some((false, true))
        );
        assert_eq!(
            flag(&changes, BatchFlag::InputCanBeUsed(quantity)),
            Some((true, false))
        );

        // the user cannot disable read-in
        batch.set_use_read_in_sensitivity(PhotodiodeSignalType::Voltage, false);
        assert!(batch.flags().calibration(quantity).use_read_in);
        assert_relative_eq!(batch.resolved_sensitivity(PhotodiodeSignalType::Voltage), 30.0);
    }

    #[test]
    fn transition_radius() {
        let mut batch = BatchState::new("blunt", &ProcessingDefaults::default());
        let changes = batch.set_indentation_model(IndentationModel::BluntCone);
        assert!(flag(&changes, BatchFlag::TipTransitionRadiusCalculable).is_none());

        batch.set_tip_parameter(TipShapeParameter::Radius, 2.0);
        let changes = batch.set_tip_parameter(TipShapeParameter::HalfAngle, 60.0);
        assert_eq!(
            flag(&changes, BatchFlag::TipTransitionRadiusCalculable),
            Some((false, true))
        );

        batch.calculate_transition_radius();
        assert_relative_eq!(
            batch.tip().value(TipShapeParameter::TransitionRadius),
            1.0,
            epsilon = 1e-12
        );

        batch.set_indentation_model(IndentationModel::Cone);
        assert!(batch.calculate_transition_radius().is_empty());
    }

    #[test]
    fn invalid_settings() {
        let mut batch = cone_batch();
        batch.add_sources([source("a", None, None)]);

        batch.set_smoothing(Some(Smoothing::MovingAverage { span: 2 }));
        assert!(!batch.is_settings_specified());
        batch.set_smoothing(Some(Smoothing::MovingAverage { span: 3 }));
        assert!(batch.is_settings_specified());

        batch.set_cropping(Cropping {
            range_cropped: true,
            lower: f64::NAN,
            ..Default::default()
        });
        assert!(!batch.is_settings_specified());
        batch.set_cropping(Cropping::default());

        batch.set_fit_domain(1.0, 0.0);
        assert!(!batch.is_settings_specified());
        batch.set_fit_domain(0.0, 1.0);

        let changes = batch.set_poisson_ratio(0.8);
        assert_eq!(
            flag(&changes, BatchFlag::BasicSettingsSpecified),
            Some((true, false))
        );

        batch.set_poisson_ratio(0.3);
        let changes = batch.remove_source("a");
        assert_eq!(
            flag(&changes, BatchFlag::CroppingOnCurveSelectionPossible),
            Some((true, false))
        );
        assert!(!batch.is_settings_specified());
    }
}
