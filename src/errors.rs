// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Errors that can be returned by the `atomicj` crate.

use std::path::Path;

use colored::{ColoredString, Colorize};
use thiserror::Error;

use crate::input::{IndentationModel, ThicknessCorrection, TipShapeParameter};

fn path_to_yellow(path: &Path) -> ColoredString {
    path.to_string_lossy().yellow()
}

/// Errors that can occur inside the application itself.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{} could not read the configuration file '{}'", "error:".red().bold(), .0.yellow())]
    CouldNotReadConfig(String),

    #[error("{} could not understand the contents of the configuration file '{}' ({})", "error:".red().bold(), .0.yellow(), .1)]
    CouldNotParseConfig(String, serde_yaml::Error),

    #[error("{} batch '{}' contains an invalid source ({})", "error:".red().bold(), .0.yellow(), .1)]
    InvalidSource(String, String),
}

/// Errors that can occur when reading, writing or validating processing defaults.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{} could not open the preferences file '{}'", "error:".red().bold(), .0.yellow())]
    CouldNotOpenConfig(String),

    #[error("{} could not understand the contents of the preferences file '{}' ({})", "error:".red().bold(), .0.yellow(), .1)]
    CouldNotParseConfig(String, serde_yaml::Error),

    #[error("{}", .0)]
    CouldNotWriteConfig(WriteError),

    #[error("{} baseline degree '{}' is not supported (must be at most '{}')", "error:".red().bold(), .0.to_string().yellow(), .1.to_string().yellow())]
    InvalidBaselineDegree(usize, usize),

    #[error("{} Poisson ratio '{}' is not valid (must lie between -1 and 0.5)", "error:".red().bold(), .0.to_string().yellow())]
    InvalidPoissonRatio(f64),

    #[error("{}", .0)]
    InvalidAveraging(AveragingError),
}

/// Errors that can occur when building a contact model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{} tip parameter '{}' required by the '{}' model is not a finite number", "error:".red().bold(), .1.to_string().yellow(), .0.to_string().yellow())]
    MissingShapeParameter(IndentationModel, TipShapeParameter),

    #[error("{} Poisson ratio '{}' is not valid", "error:".red().bold(), .0.to_string().yellow())]
    InvalidPoissonRatio(f64),

    #[error("{} substrate effect correction requested but sample thickness is not specified", "error:".red().bold())]
    MissingThickness,

    #[error("{} '{}' correction of the substrate effect is not known for the '{}' model", "error:".red().bold(), .0.to_string().yellow(), .1.to_string().yellow())]
    CorrectionUnknown(ThicknessCorrection, IndentationModel),
}

/// Errors that can occur when validating or applying a smoothing transform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmoothingError {
    #[error("{} smoothing span '{}' is not valid (must be an odd number of at least 3 points)", "error:".red().bold(), .0.to_string().yellow())]
    InvalidSpan(usize),

    #[error("{} polynomial degree '{}' is too high for a smoothing span of '{}' points", "error:".red().bold(), .0.to_string().yellow(), .1.to_string().yellow())]
    InvalidDegree(usize, usize),

    #[error("{} smoothing span '{}' is longer than the curve ('{}' points)", "error:".red().bold(), .0.to_string().yellow(), .1.to_string().yellow())]
    NotEnoughPoints(usize, usize),
}

/// Errors that can occur when constructing processing settings for a single source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("{} spring constant '{}' is not a positive finite number", "error:".red().bold(), .0.to_string().yellow())]
    InvalidSpringConstant(f64),

    #[error("{} sensitivity '{}' is not a positive finite number", "error:".red().bold(), .0.to_string().yellow())]
    InvalidSensitivity(f64),

    #[error("{} crop bound '{}' is not a finite number", "error:".red().bold(), .0.to_string().yellow())]
    InvalidCropping(f64),

    #[error("{} could not construct processing settings ({})", "error:".red().bold(), .0)]
    Incomplete(String),

    #[error("{}", .0)]
    Smoothing(SmoothingError),
}

/// Failure to process one source of a batch.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub identifier: String,
    pub error: SettingsError,
}

/// Errors that can occur when building a processing batch.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("{} settings of batch '{}' are not completely specified", "error:".red().bold(), .0.yellow())]
    SettingsNotSpecified(String),

    #[error("{}", .0)]
    ContactModel(ModelError),

    #[error("{} could not process '{}' out of '{}' sources of batch '{}'", "error:".red().bold(), .failures.len().to_string().yellow(), .total.to_string().yellow(), .batch.yellow())]
    ProcessingFailed {
        batch: String,
        total: usize,
        failures: Vec<SourceFailure>,
    },

    #[error("{} batch '{}' does not exist", "error:".red().bold(), .0.yellow())]
    UnknownBatch(String),
}

/// Errors that can occur when specifying curve averaging.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AveragingError {
    #[error("{} number of averaged points must be at least 1, not '{}'", "error:".red().bold(), .0.to_string().yellow())]
    InvalidPointCount(usize),

    #[error("{} confidence level '{}' must lie strictly between 0 and 1", "error:".red().bold(), .0.to_string().yellow())]
    InvalidConfidenceLevel(f64),
}

/// Errors that can occur during the calibration of photodiode sensitivity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("{} calibration curve contains no points", "error:".red().bold())]
    EmptyCurve,

    #[error("{} calibration range from '{}' to '{}' is empty or not finite", "error:".red().bold(), .0.to_string().yellow(), .1.to_string().yellow())]
    InvalidRange(f64, f64),

    #[error("{} position '{}' lies outside the calibration curve", "error:".red().bold(), .0.to_string().yellow())]
    OutsideCurve(f64),

    #[error("{} photodiode signal does not change over the selected range", "error:".red().bold())]
    ZeroSignalChange,
}

/// Errors that can occur while writing the results.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("{} could not create file '{}'", "error:".red().bold(), path_to_yellow(.0))]
    CouldNotCreateFile(Box<Path>),

    #[error("{} could not create a backup for file '{}'", "error:".red().bold(), path_to_yellow(.0))]
    CouldNotBackupFile(Box<Path>),

    #[error("{} could not write results in yaml format into '{}'", "error:".red().bold(), path_to_yellow(.0))]
    CouldNotWriteYaml(Box<Path>),
}
