// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Construction of the processing batch from the batch state.

use std::sync::Arc;

use crate::curve::SpectroscopySource;
use crate::errors::{BatchError, SettingsError, SourceFailure};
use crate::estimator::{ContactEstimator, ManualContactSelection};
use crate::model::{ContactModel, PrecontactModel};
use crate::processing::{ProcessablePack, ProcessingSettings};

use super::{BatchState, CalibratedQuantity};

/// Workflow binding manual contact estimators to the packs of a manual batch.
pub trait ManualContactSelector {
    /// Return the packs that should be processed, each with a bound estimator.
    /// Packs may be left out; an empty result means the selection was abandoned.
    fn select(&mut self, packs: Vec<ProcessablePack>) -> Vec<ProcessablePack>;
}

impl<F> ManualContactSelector for F
where
    F: FnMut(Vec<ProcessablePack>) -> Vec<ProcessablePack>,
{
    fn select(&mut self, packs: Vec<ProcessablePack>) -> Vec<ProcessablePack> {
        self(packs)
    }
}

/// Apply one manual selection to every pack.
/// The selected force is converted into deflection using the spring constant of each pack.
#[derive(Debug, Clone, Copy)]
pub struct ApplyToAll {
    selection: ManualContactSelection,
}

impl ApplyToAll {
    pub fn new(selection: ManualContactSelection) -> Self {
        ApplyToAll { selection }
    }
}

impl ManualContactSelector for ApplyToAll {
    fn select(&mut self, packs: Vec<ProcessablePack>) -> Vec<ProcessablePack> {
        if !self.selection.is_apply_enabled() {
            log::warn!(
                "Manual selection '{}' is missing a required coordinate. No curve will be processed.",
                self.selection.kind
            );
            return Vec::new();
        }

        packs
            .into_iter()
            .map(|pack| {
                let estimator = self
                    .selection
                    .estimator_for(pack.settings().spring_constant());
                pack.with_estimator(estimator)
            })
            .collect()
    }
}

impl BatchState {
    /// Construct the contact model shared by all curves of the batch.
    pub fn contact_model(&self) -> Result<ContactModel, BatchError> {
        let correction = self
            .correct_substrate_effect
            .then_some(self.thickness_correction);

        self.indentation_model
            .build_contact_model(
                &self.tip,
                &self.sample,
                PrecontactModel::new(self.baseline_degree),
                correction,
                self.adhesive_energy_estimation,
            )
            .map_err(BatchError::ContactModel)
    }

    /// Processing settings of a single source.
    fn settings_for(
        &self,
        source: &SpectroscopySource,
        contact_model: &Arc<ContactModel>,
    ) -> Result<ProcessingSettings, SettingsError> {
        let spring_constant = self.resolved(CalibratedQuantity::SpringConstant);
        let sensitivity = self.resolved(CalibratedQuantity::Sensitivity(source.signal_type()));

        if !(spring_constant.is_finite() && spring_constant > 0.0) {
            return Err(SettingsError::InvalidSpringConstant(spring_constant));
        }

        if !(sensitivity.is_finite() && sensitivity > 0.0) {
            return Err(SettingsError::InvalidSensitivity(sensitivity));
        }

        if let Some(smoothing) = self.smoothing {
            smoothing
                .validate_for(source.branch(self.fitted_branch).len())
                .map_err(SettingsError::Smoothing)?;
        }

        let mut builder = ProcessingSettings::new();
        builder
            .contact_model(Arc::clone(contact_model))
            .contact_estimation_guide(self.contact_estimation_guide)
            .regression_strategy(self.regression_strategy)
            .fitted_branch(self.fitted_branch)
            .automatic(self.automatic_contact_estimation)
            .spring_constant(spring_constant)
            .sensitivity(sensitivity)
            .crop(self.cropping.resolve(spring_constant))
            .indentation_limit(self.indentation_limit)
            .load_limit(self.load_limit)
            .fit_domain_lower(self.fit_domain.0)
            .fit_domain_upper(self.fit_domain.1)
            .calculate_r_squared(self.calculate_r_squared)
            .calculate_adhesion_force(self.calculate_adhesion_force);

        if let Some(estimation) = contact_model.adhesive_energy() {
            builder.adhesive_energy_estimation(estimation);
        }

        if let Some(smoothing) = self.smoothing {
            builder.smoothing(smoothing);
        }

        builder
            .build()
            .map_err(|e| SettingsError::Incomplete(e.to_string()))
    }

    /// Construct the packs of all sources of the batch.
    ///
    /// ## Parameters
    /// - `selector` - workflow called for manual batches; it may reject packs
    ///
    /// ## Errors
    /// - `BatchError::SettingsNotSpecified` if the settings of the batch are incomplete
    /// - `BatchError::ProcessingFailed` if settings could not be built for any source;
    ///   no packs are returned in that case
    pub fn build_processing_batch<S: ManualContactSelector + ?Sized>(
        &self,
        selector: &mut S,
    ) -> Result<Vec<ProcessablePack>, BatchError> {
        if !self.flags.settings_specified {
            return Err(BatchError::SettingsNotSpecified(self.name.clone()));
        }

        let contact_model = Arc::new(self.contact_model()?);

        let mut packs = Vec::with_capacity(self.sources.len());
        let mut failures = Vec::new();

        for source in self.sources.iter() {
            match self.settings_for(source, &contact_model) {
                Ok(settings) => packs.push(ProcessablePack::new(Arc::clone(source), settings)),
                Err(error) => {
                    log::warn!(
                        "Batch '{}': could not process '{}'. {}",
                        self.name,
                        source.identifier(),
                        error
                    );
                    failures.push(SourceFailure {
                        identifier: source.identifier().to_owned(),
                        error,
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(BatchError::ProcessingFailed {
                batch: self.name.clone(),
                total: self.sources.len(),
                failures,
            });
        }

        let packs = if self.automatic_contact_estimation {
            let estimator =
                ContactEstimator::automatic(self.baseline_degree, self.contact_estimation_guide);
            packs
                .into_iter()
                .map(|pack| pack.with_estimator(estimator))
                .collect::<Vec<_>>()
        } else {
            let n_candidates = packs.len();
            let selected: Vec<ProcessablePack> = selector
                .select(packs)
                .into_iter()
                .filter(|pack| {
                    let bound = pack.estimator().is_some();
                    if !bound {
                        log::warn!(
                            "Batch '{}': no contact point selected for '{}'. Curve rejected.",
                            self.name,
                            pack.identifier()
                        );
                    }
                    bound
                })
                .collect();

            if selected.len() < n_candidates {
                log::warn!(
                    "Batch '{}': {} out of {} curves were rejected during manual selection.",
                    self.name,
                    n_candidates - selected.len(),
                    n_candidates
                );
            }

            selected
        };

        log::info!(
            "Batch '{}': {} curve(s) ready for processing using the {} model ({}).",
            self.name,
            packs.len(),
            contact_model.formula(),
            if contact_model.is_thin_sample() {
                "thin sample"
            } else {
                "bulk sample"
            }
        );

        Ok(packs)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::curve::{Curve, PhotodiodeSignalType};
    use crate::input::{
        Cropping, IndentationModel, ManualEstimatorKind, ProcessingDefaults, Smoothing,
        TipShapeParameter,
    };
    use crate::model::ContactFormula;

    fn source(identifier: &str, n_points: usize) -> Arc<SpectroscopySource> {
        let xs: Vec<f64> = (0..n_points).map(|i| i as f64 * 0.01).collect();
        let ys: Vec<f64> = xs.iter().map(|x| (x - 0.1).max(0.0)).collect();
        Arc::new(
            SpectroscopySource::new()
                .identifier(identifier)
                .approach(Curve::from_xy(&xs, &ys))
                .build()
                .unwrap(),
        )
    }

    fn cone_batch(automatic: bool) -> BatchState {
        let mut batch = BatchState::new("cone", &ProcessingDefaults::default());
        batch.set_indentation_model(IndentationModel::Cone);
        batch.set_tip_parameter(TipShapeParameter::HalfAngle, 20.0);
        batch.set_spring_constant(0.1);
        batch.set_sensitivity(PhotodiodeSignalType::Voltage, 50.0);
        batch.set_automatic_contact_estimation(automatic);
        batch.set_sources(vec![source("a", 40), source("b", 40)]);
        batch
    }

    fn unused(_: Vec<ProcessablePack>) -> Vec<ProcessablePack> {
        panic!("Selector should not be called for automatic batches.")
    }

    #[test]
    fn build_automatic() {
        let batch = cone_batch(true);
        let packs = batch.build_processing_batch(&mut unused).unwrap();

        assert_eq!(packs.len(), 2);
        for pack in packs.iter() {
            let settings = pack.settings();
            assert!(settings.automatic());
            assert_eq!(
                settings.contact_model().formula(),
                ContactFormula::HertzianCone
            );
            assert!(!settings.contact_model().is_thin_sample());
            assert_relative_eq!(settings.spring_constant(), 0.1);
            assert_relative_eq!(settings.sensitivity(), 50.0);
            assert!(pack.estimator().unwrap().is_automatic());
        }

        // all packs share one contact model
        assert!(Arc::ptr_eq(
            packs[0].settings().contact_model(),
            packs[1].settings().contact_model()
        ));
    }

    #[test]
    fn build_incomplete() {
        let mut batch = cone_batch(true);
        batch.set_tip_parameter(TipShapeParameter::HalfAngle, f64::NAN);

        assert!(matches!(
            batch.build_processing_batch(&mut unused),
            Err(BatchError::SettingsNotSpecified(name)) if name == "cone"
        ));
    }

    #[test]
    fn build_crop_conversion() {
        let mut batch = cone_batch(true);
        batch.set_cropping(Cropping {
            domain_cropped: false,
            range_cropped: true,
            left: 3.0,
            right: 3.0,
            lower: 2.0,
            upper: 4.0,
        });

        let packs = batch.build_processing_batch(&mut unused).unwrap();
        let crop = packs[0].settings().crop();
        assert_relative_eq!(crop.left(), 0.0);
        assert_relative_eq!(crop.right(), 0.0);
        assert_relative_eq!(crop.lower(), 2.0 / 100.0);
        assert_relative_eq!(crop.upper(), 4.0 / 100.0);
        assert_relative_eq!(1000.0 * 0.1 * crop.upper(), 4.0);
    }

    #[test]
    fn build_aborts_on_source_failure() {
        let mut batch = cone_batch(true);
        batch.add_sources([source("short", 4)]);
        batch.set_smoothing(Some(Smoothing::SavitzkyGolay { span: 7, degree: 2 }));
        assert!(batch.is_settings_specified());

        match batch.build_processing_batch(&mut unused) {
            Err(BatchError::ProcessingFailed {
                batch,
                total,
                failures,
            }) => {
                assert_eq!(batch, "cone");
                assert_eq!(total, 3);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].identifier, "short");
                assert!(matches!(failures[0].error, SettingsError::Smoothing(_)));
            }
            Ok(_) => panic!("Should have failed, but succeeded."),
            Err(_) => panic!("Incorrect error type returned."),
        }
    }

    #[test]
    fn build_manual_apply_to_all() {
        let batch = cone_batch(false);
        let selection = ManualContactSelection::new(ManualEstimatorKind::UsePoint, 0.1, 8.0);

        let packs = batch
            .build_processing_batch(&mut ApplyToAll::new(selection))
            .unwrap();
        assert_eq!(packs.len(), 2);

        for pack in packs {
            assert!(!pack.settings().automatic());
            match pack.estimator() {
                Some(ContactEstimator::Manual { kind, x, y }) => {
                    assert_eq!(kind, ManualEstimatorKind::UsePoint);
                    assert_relative_eq!(x, 0.1);
                    assert_relative_eq!(y, 80.0);
                }
                x => panic!("Unexpected estimator {:?}.", x),
            }
        }
    }

    #[test]
    fn build_manual_rejections() {
        let batch = cone_batch(false);

        // selector keeps only the first pack and binds no estimator to the second
        let mut selector = |packs: Vec<ProcessablePack>| -> Vec<ProcessablePack> {
            packs
                .into_iter()
                .enumerate()
                .map(|(i, pack)| {
                    if i == 0 {
                        pack.with_estimator(ContactEstimator::Manual {
                            kind: ManualEstimatorKind::UseX,
                            x: 0.1,
                            y: f64::NAN,
                        })
                    } else {
                        pack
                    }
                })
                .collect()
        };

        let packs = batch.build_processing_batch(&mut selector).unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].identifier(), "a");

        // abandoned selection is not an error
        let packs = batch
            .build_processing_batch(&mut |_: Vec<ProcessablePack>| -> Vec<ProcessablePack> {
                Vec::new()
            })
            .unwrap();
        assert!(packs.is_empty());

        // incomplete manual selection rejects everything
        let selection = ManualContactSelection::new(ManualEstimatorKind::UseY, 0.1, f64::NAN);
        let packs = batch
            .build_processing_batch(&mut ApplyToAll::new(selection))
            .unwrap();
        assert!(packs.is_empty());
    }
}
