// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! This module contains structures and methods for presenting the prepared batches.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::averaging::{AveragedCurves, AveragingRequest, CurveFamily, ProcessedCurve};
use crate::errors::{SettingsError, WriteError};
use crate::estimator::ContactPoint;
use crate::input::{AveragingDefaults, CropBounds};
use crate::model::ContactFormula;
use crate::processing::ProcessablePack;

/// Summary of one pack ready for processing.
#[derive(Debug, Clone, Serialize)]
pub struct PackSummary {
    identifier: String,
    formula: ContactFormula,
    thin_sample: bool,
    #[serde(serialize_with = "round_serialize_f64")]
    spring_constant: f64,
    #[serde(serialize_with = "round_serialize_f64")]
    sensitivity: f64,
    crop: CropBounds,
    automatic: bool,
    estimator: Option<String>,
    contact_point: Option<ContactPoint>,
}

impl PackSummary {
    /// Summarize the pack and estimate its contact point.
    pub fn new(pack: &ProcessablePack) -> Result<PackSummary, SettingsError> {
        let settings = pack.settings();

        Ok(PackSummary {
            identifier: pack.identifier().to_owned(),
            formula: settings.contact_model().formula(),
            thin_sample: settings.contact_model().is_thin_sample(),
            spring_constant: settings.spring_constant(),
            sensitivity: settings.sensitivity(),
            crop: settings.crop(),
            automatic: settings.automatic(),
            estimator: pack.estimator().map(|e| e.to_string()),
            contact_point: pack.estimate_contact()?,
        })
    }

    #[inline(always)]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[inline(always)]
    pub fn contact_point(&self) -> Option<ContactPoint> {
        self.contact_point
    }
}

/// Summary of one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    packs: Vec<PackSummary>,
    /// Averaged deflection curves of the batch. Not written if not calculated.
    #[serde(skip_serializing_if = "Option::is_none")]
    average: Option<AveragedCurves>,
}

impl BatchSummary {
    /// Summarize the packs of a batch and average their deflection curves.
    pub fn new(
        name: &str,
        packs: &[ProcessablePack],
        averaging: &AveragingDefaults,
    ) -> Result<BatchSummary, SettingsError> {
        let summaries = packs
            .iter()
            .map(PackSummary::new)
            .collect::<Result<Vec<_>, _>>()?;

        let average = if averaging.get(CurveFamily::Recorded).shown() && !packs.is_empty() {
            let curves = packs
                .iter()
                .map(|pack| {
                    Ok((
                        name.to_owned(),
                        ProcessedCurve::new(
                            pack.identifier(),
                            pack.deflection_curve()?,
                            Default::default(),
                            Default::default(),
                        ),
                    ))
                })
                .collect::<Result<Vec<_>, SettingsError>>()?;

            AveragingRequest::group(curves, &averaging.as_map())
                .first()
                .map(AveragingRequest::average)
        } else {
            None
        };

        Ok(BatchSummary {
            packs: summaries,
            average,
        })
    }

    #[inline(always)]
    pub fn packs(&self) -> &[PackSummary] {
        &self.packs
    }

    #[inline(always)]
    pub fn average(&self) -> Option<&AveragedCurves> {
        self.average.as_ref()
    }
}

/// Summaries of all batches of a session.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ProcessingSummary {
    batches: IndexMap<String, BatchSummary>,
}

impl ProcessingSummary {
    pub fn new() -> Self {
        ProcessingSummary::default()
    }

    pub fn add_batch(&mut self, name: &str, summary: BatchSummary) {
        self.batches.insert(name.to_owned(), summary);
    }

    pub fn batches(&self) -> &IndexMap<String, BatchSummary> {
        &self.batches
    }

    /// Write the summary into a yaml file.
    pub fn write_yaml(
        &self,
        filename: impl AsRef<Path>,
        input_config: &str,
        overwrite: bool,
    ) -> Result<(), WriteError> {
        log::info!(
            "Writing the processing summary into '{}'...",
            filename.as_ref().to_string_lossy()
        );

        try_backup_file(&filename, overwrite, "yaml")?;
        let mut writer = create_and_open_file(&filename)?;

        writeln!(
            writer,
            "# Curves prepared for processing with 'atomicj v{}' using configuration file '{}'.",
            crate::ATOMICJ_VERSION,
            input_config
        )
        .map_err(|_| WriteError::CouldNotWriteYaml(Box::from(filename.as_ref())))?;

        serde_yaml::to_writer(&mut writer, self)
            .map_err(|_| WriteError::CouldNotWriteYaml(Box::from(filename.as_ref())))?;

        writer
            .flush()
            .map_err(|_| WriteError::CouldNotWriteYaml(Box::from(filename.as_ref())))
    }
}

/// Create and open file for buffered writing.
fn create_and_open_file(filename: &impl AsRef<Path>) -> Result<BufWriter<File>, WriteError> {
    let file = File::create(filename.as_ref())
        .map_err(|_| WriteError::CouldNotCreateFile(Box::from(filename.as_ref())))?;

    Ok(BufWriter::new(file))
}

/// Back up an output file, if it is necessary and if it is requested.
fn try_backup_file(
    filename: &impl AsRef<Path>,
    overwrite: bool,
    file_type: &str,
) -> Result<(), WriteError> {
    let path = filename.as_ref();
    if path.exists() {
        if !overwrite {
            log::warn!(
                "Output {} file '{}' already exists. Backing it up.",
                file_type,
                path.to_string_lossy()
            );
            backitup::backup(path).map_err(|_| WriteError::CouldNotBackupFile(Box::from(path)))?;
        } else {
            log::warn!(
                "Output {} file '{}' already exists. It will be overwritten as requested.",
                file_type,
                path.to_string_lossy()
            );
        }
    }

    Ok(())
}

fn round_serialize_f64<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let rounded = (value * 1e8).round() / 1e8;
    serializer.serialize_f64(rounded)
}
