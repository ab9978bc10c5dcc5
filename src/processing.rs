// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the immutable processing settings of a single curve and the packs handed to the processor.

use std::sync::Arc;

use derive_builder::Builder;
use getset::{CopyGetters, Getters};

use crate::curve::{Branch, Curve, SpectroscopySource};
use crate::errors::SettingsError;
use crate::estimator::{ContactEstimator, ContactPoint};
use crate::input::{
    AdhesiveEnergyEstimation, ContactEstimationGuide, CropBounds, RegressionStrategy, Smoothing,
};
use crate::model::ContactModel;

/// Settings used to process one source curve.
/// Constructed once by the batch and never modified afterwards.
#[derive(Debug, Clone, Builder, Getters, CopyGetters)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ProcessingSettings {
    /// Contact model shared by all curves of the batch.
    #[getset(get = "pub")]
    contact_model: Arc<ContactModel>,

    #[builder(default)]
    #[getset(get_copy = "pub")]
    contact_estimation_guide: ContactEstimationGuide,

    #[builder(default)]
    #[getset(get_copy = "pub")]
    regression_strategy: RegressionStrategy,

    #[builder(default)]
    #[getset(get_copy = "pub")]
    fitted_branch: Branch,

    /// Only present for adhesive contact models.
    #[builder(setter(strip_option), default)]
    #[getset(get_copy = "pub")]
    adhesive_energy_estimation: Option<AdhesiveEnergyEstimation>,

    /// Contact point is estimated automatically.
    #[builder(default = "true")]
    #[getset(get_copy = "pub")]
    automatic: bool,

    /// Spring constant of the cantilever (N/m).
    #[getset(get_copy = "pub")]
    spring_constant: f64,

    /// Photodiode sensitivity (nm per signal unit).
    #[getset(get_copy = "pub")]
    sensitivity: f64,

    #[builder(default)]
    #[getset(get_copy = "pub")]
    crop: CropBounds,

    /// Largest indentation used in the fit.
    #[builder(default = "f64::INFINITY")]
    #[getset(get_copy = "pub")]
    indentation_limit: f64,

    /// Largest load used in the fit.
    #[builder(default = "f64::INFINITY")]
    #[getset(get_copy = "pub")]
    load_limit: f64,

    #[builder(default = "f64::NEG_INFINITY")]
    #[getset(get_copy = "pub")]
    fit_domain_lower: f64,

    #[builder(default = "f64::INFINITY")]
    #[getset(get_copy = "pub")]
    fit_domain_upper: f64,

    #[builder(setter(strip_option), default)]
    #[getset(get_copy = "pub")]
    smoothing: Option<Smoothing>,

    #[builder(default = "true")]
    #[getset(get_copy = "pub")]
    calculate_r_squared: bool,

    #[builder(default = "true")]
    #[getset(get_copy = "pub")]
    calculate_adhesion_force: bool,
}

impl ProcessingSettings {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> ProcessingSettingsBuilder {
        ProcessingSettingsBuilder::default()
    }
}

fn validate_spring_constant(k: f64) -> Result<(), SettingsError> {
    if k.is_finite() && k > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidSpringConstant(k))
    }
}

fn validate_sensitivity(sensitivity: f64) -> Result<(), SettingsError> {
    if sensitivity.is_finite() && sensitivity > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidSensitivity(sensitivity))
    }
}

fn validate_crop(crop: &CropBounds) -> Result<(), SettingsError> {
    for value in [crop.left(), crop.right(), crop.lower(), crop.upper()] {
        if !value.is_finite() {
            return Err(SettingsError::InvalidCropping(value));
        }
    }

    Ok(())
}

impl ProcessingSettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(k) = self.spring_constant {
            validate_spring_constant(k).map_err(|e| e.to_string())?;
        }

        if let Some(sensitivity) = self.sensitivity {
            validate_sensitivity(sensitivity).map_err(|e| e.to_string())?;
        }

        if let Some(crop) = &self.crop {
            validate_crop(crop).map_err(|e| e.to_string())?;
        }

        if let Some(Some(smoothing)) = &self.smoothing {
            smoothing
                .validate()
                .map_err(|e| SettingsError::Smoothing(e).to_string())?;
        }

        let lower = self.fit_domain_lower.unwrap_or(f64::NEG_INFINITY);
        let upper = self.fit_domain_upper.unwrap_or(f64::INFINITY);
        if lower.is_nan() || upper.is_nan() || lower >= upper {
            return Err(format!(
                "fit domain from '{}' to '{}' is empty",
                lower, upper
            ));
        }

        Ok(())
    }
}

/// Source curve bound to its processing settings and contact estimator.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct ProcessablePack {
    #[getset(get = "pub")]
    source: Arc<SpectroscopySource>,
    #[getset(get = "pub")]
    settings: ProcessingSettings,
    /// `None` until a manual selection is made for a manual batch.
    #[getset(get_copy = "pub")]
    estimator: Option<ContactEstimator>,
}

impl ProcessablePack {
    pub fn new(source: Arc<SpectroscopySource>, settings: ProcessingSettings) -> Self {
        ProcessablePack {
            source,
            settings,
            estimator: None,
        }
    }

    /// Bind a contact estimator to the pack.
    pub fn with_estimator(self, estimator: ContactEstimator) -> Self {
        ProcessablePack {
            estimator: Some(estimator),
            ..self
        }
    }

    #[inline(always)]
    pub fn identifier(&self) -> &str {
        self.source.identifier()
    }

    /// Fitted branch with the photodiode signal converted into deflection (nm)
    /// and smoothed if requested.
    pub fn deflection_curve(&self) -> Result<Curve, SettingsError> {
        let branch = self.source.branch(self.settings.fitted_branch);
        let calibration = self.source.calibration();

        let factor = if calibration.spring_constant_calibrated {
            // recorded as force (nN)
            1.0 / self.settings.spring_constant
        } else if calibration.sensitivity_calibrated {
            1.0
        } else {
            self.settings.sensitivity
        };

        let xs = branch.xs();
        let mut ys: Vec<f64> = branch.ys().into_iter().map(|y| y * factor).collect();

        if let Some(smoothing) = self.settings.smoothing {
            ys = smoothing.apply(&ys).map_err(SettingsError::Smoothing)?;
        }

        Ok(Curve::from_xy(&xs, &ys))
    }

    /// Run the bound estimator on the deflection curve.
    /// Returns `Ok(None)` if no estimator is bound or no estimate could be made.
    pub fn estimate_contact(&self) -> Result<Option<ContactPoint>, SettingsError> {
        let Some(estimator) = self.estimator else {
            return Ok(None);
        };

        Ok(estimator.estimate(&self.deflection_curve()?))
    }
}
