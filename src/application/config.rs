// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Configuration file read by the `atomicj` binary.

use std::collections::HashSet;
use std::sync::Arc;

use atomicj::errors::ApplicationError;
use atomicj::prelude::*;
use serde::Deserialize;

/// Contents of the configuration yaml file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Output yaml file with the summary of the prepared batches.
    pub output: String,
    /// Preferences file with the processing defaults. Takes precedence over `defaults`.
    #[serde(default)]
    pub preferences: Option<String>,
    #[serde(default)]
    pub defaults: ProcessingDefaults,
    #[serde(default)]
    pub silent: bool,
    #[serde(default)]
    pub overwrite: bool,
    pub batches: Vec<BatchConfig>,
}

/// Settings of one batch. Anything not given is taken from the processing defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BatchConfig {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<SpectroscopySource>,
    #[serde(default, alias = "model")]
    pub indentation_model: Option<IndentationModel>,
    #[serde(default)]
    pub tip: Option<TipShape>,
    #[serde(default)]
    pub sample: Option<SampleDescription>,
    #[serde(default)]
    pub correct_substrate_effect: Option<bool>,
    #[serde(default)]
    pub thickness_correction: Option<ThicknessCorrection>,
    #[serde(default)]
    pub spring_constant: Option<f64>,
    #[serde(default)]
    pub use_read_in_spring_constant: Option<bool>,
    /// Used for both photodiode signal types.
    #[serde(default)]
    pub sensitivity: Option<f64>,
    #[serde(default)]
    pub use_read_in_sensitivity: Option<bool>,
    #[serde(default)]
    pub cropping: Option<Cropping>,
    #[serde(default)]
    pub smoothing: Option<Smoothing>,
    /// Manual contact selection applied to all curves of the batch.
    /// Switches off the automatic contact estimation.
    #[serde(default)]
    pub manual: Option<ManualContactSelection>,
}

impl Config {
    /// Processing defaults used by all batches.
    pub(crate) fn processing_defaults(
        &self,
    ) -> Result<ProcessingDefaults, Box<dyn std::error::Error + Send + Sync>> {
        match &self.preferences {
            Some(path) => {
                let defaults = ProcessingDefaults::from_file(path)?;
                log::info!("Read processing defaults from '{}'.", path);
                Ok(defaults)
            }
            None => {
                self.defaults.validate()?;
                Ok(self.defaults.clone())
            }
        }
    }
}

impl BatchConfig {
    /// Construct the batch state described by this configuration.
    pub(crate) fn to_batch(
        &self,
        defaults: &ProcessingDefaults,
    ) -> Result<BatchState, ApplicationError> {
        let mut identifiers = HashSet::new();
        for source in &self.sources {
            if !identifiers.insert(source.identifier().as_str()) {
                return Err(ApplicationError::InvalidSource(
                    self.name.clone(),
                    format!("identifier '{}' is used more than once", source.identifier()),
                ));
            }

            if source.approach().is_empty() && source.withdraw().is_empty() {
                return Err(ApplicationError::InvalidSource(
                    self.name.clone(),
                    format!("source '{}' contains no points", source.identifier()),
                ));
            }
        }

        let mut batch = BatchState::new(&self.name, defaults);

        if let Some(model) = self.indentation_model {
            batch.set_indentation_model(model);
        }
        if let Some(tip) = self.tip {
            batch.set_tip(tip);
        }
        if let Some(sample) = &self.sample {
            batch.set_poisson_ratio(sample.poisson_ratio);
            batch.set_sample_thickness(sample.thickness.clone());
            batch.set_sample_adherent(sample.adherent);
        }
        if let Some(correct) = self.correct_substrate_effect {
            batch.set_correct_substrate_effect(correct);
        }
        if let Some(correction) = self.thickness_correction {
            batch.set_thickness_correction(correction);
        }

        if let Some(k) = self.spring_constant {
            batch.set_spring_constant(k);
        }
        if let Some(use_read_in) = self.use_read_in_spring_constant {
            batch.set_use_read_in_spring_constant(use_read_in);
        }
        for signal in [PhotodiodeSignalType::Voltage, PhotodiodeSignalType::Current] {
            if let Some(sensitivity) = self.sensitivity {
                batch.set_sensitivity(signal, sensitivity);
            }
            if let Some(use_read_in) = self.use_read_in_sensitivity {
                batch.set_use_read_in_sensitivity(signal, use_read_in);
            }
        }

        if let Some(cropping) = self.cropping {
            batch.set_cropping(cropping);
        }
        if self.smoothing.is_some() {
            batch.set_smoothing(self.smoothing);
        }
        if self.manual.is_some() {
            batch.set_automatic_contact_estimation(false);
        }

        batch.set_sources(self.sources.iter().cloned().map(Arc::new).collect());

        Ok(batch)
    }

    /// Selector used when the batch is estimated manually.
    pub(crate) fn selector(&self) -> ApplyToAll {
        ApplyToAll::new(self.manual.unwrap_or(ManualContactSelection::new(
            ManualEstimatorKind::UsePoint,
            f64::NAN,
            f64::NAN,
        )))
    }
}
