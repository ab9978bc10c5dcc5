// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the persisted processing defaults used to initialize new batches.

use std::fs::{read_to_string, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use getset::{CopyGetters, Getters};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::averaging::{AveragingSettings, CurveFamily};
use crate::curve::Branch;
use crate::errors::{ConfigError, WriteError};

use super::sample::is_valid_poisson_ratio;
use super::{
    AdhesiveEnergyEstimation, ContactEstimationGuide, IndentationModel, RegressionStrategy,
    ThicknessCorrection,
};

/// Highest supported degree of the baseline polynomial.
pub const MAX_BASELINE_DEGREE: usize = 6;

/// Averaging settings of the individual curve families.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AveragingDefaults {
    #[serde(default)]
    pub recorded: AveragingSettings,
    #[serde(default)]
    pub indentation: AveragingSettings,
    #[serde(default, alias = "modulus")]
    pub pointwise_modulus: AveragingSettings,
}

impl AveragingDefaults {
    /// Settings indexed by curve family.
    pub fn as_map(&self) -> IndexMap<CurveFamily, AveragingSettings> {
        CurveFamily::ALL
            .into_iter()
            .map(|f| (f, *self.get(f)))
            .collect()
    }

    pub fn get(&self, family: CurveFamily) -> &AveragingSettings {
        match family {
            CurveFamily::Recorded => &self.recorded,
            CurveFamily::Indentation => &self.indentation,
            CurveFamily::PointwiseModulus => &self.pointwise_modulus,
        }
    }
}

/// Default values of the processing settings.
/// Keys of the yaml representation are part of the preferences file format.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessingDefaults {
    #[serde(default = "default_baseline_degree")]
    #[getset(get_copy = "pub")]
    baseline_degree: usize,

    #[serde(default, alias = "model")]
    #[getset(get_copy = "pub")]
    indentation_model: IndentationModel,

    #[serde(default)]
    #[getset(get_copy = "pub")]
    regression_strategy: RegressionStrategy,

    #[serde(default)]
    #[getset(get_copy = "pub")]
    contact_estimation_guide: ContactEstimationGuide,

    #[serde(default)]
    #[getset(get_copy = "pub")]
    adhesive_energy_estimation: AdhesiveEnergyEstimation,

    #[serde(default)]
    #[getset(get_copy = "pub")]
    thickness_correction: ThicknessCorrection,

    #[serde(default)]
    #[getset(get_copy = "pub")]
    fitted_branch: Branch,

    #[serde(default = "default_true")]
    #[getset(get_copy = "pub")]
    automatic_contact_estimation: bool,

    #[serde(default = "default_poisson_ratio")]
    #[getset(get_copy = "pub")]
    poisson_ratio: f64,

    /// Spring constant (N/m) offered as user input. NaN if not given.
    #[serde(default = "default_nan", with = "nan_as_null")]
    #[getset(get_copy = "pub")]
    spring_constant: f64,

    /// Sensitivity (nm/V) offered as user input. NaN if not given.
    #[serde(default = "default_nan", with = "nan_as_null")]
    #[getset(get_copy = "pub")]
    sensitivity: f64,

    #[serde(default = "default_true")]
    #[getset(get_copy = "pub")]
    use_read_in_sensitivity: bool,

    #[serde(default = "default_true")]
    #[getset(get_copy = "pub")]
    use_read_in_spring_constant: bool,

    #[serde(default = "default_true")]
    #[getset(get_copy = "pub")]
    sample_adherent: bool,

    #[serde(default)]
    #[getset(get_copy = "pub")]
    correct_substrate_effect: bool,

    #[serde(default = "default_true")]
    #[getset(get_copy = "pub")]
    calculate_r_squared: bool,

    #[serde(default = "default_true")]
    #[getset(get_copy = "pub")]
    calculate_adhesion_force: bool,

    #[serde(default)]
    #[getset(get = "pub")]
    averaging: AveragingDefaults,
}

fn default_baseline_degree() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_poisson_ratio() -> f64 {
    0.5
}

fn default_nan() -> f64 {
    f64::NAN
}

/// Unknown numbers are written as `null` and read back as NaN.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

impl Default for ProcessingDefaults {
    fn default() -> Self {
        ProcessingDefaults {
            baseline_degree: default_baseline_degree(),
            indentation_model: IndentationModel::default(),
            regression_strategy: RegressionStrategy::default(),
            contact_estimation_guide: ContactEstimationGuide::default(),
            adhesive_energy_estimation: AdhesiveEnergyEstimation::default(),
            thickness_correction: ThicknessCorrection::default(),
            fitted_branch: Branch::default(),
            automatic_contact_estimation: true,
            poisson_ratio: default_poisson_ratio(),
            spring_constant: f64::NAN,
            sensitivity: f64::NAN,
            use_read_in_sensitivity: true,
            use_read_in_spring_constant: true,
            sample_adherent: true,
            correct_substrate_effect: false,
            calculate_r_squared: true,
            calculate_adhesion_force: true,
            averaging: AveragingDefaults::default(),
        }
    }
}

impl ProcessingDefaults {
    /// Read processing defaults from a yaml file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ProcessingDefaults, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().into_owned();
        let string =
            read_to_string(&path).map_err(|_| ConfigError::CouldNotOpenConfig(path_str.clone()))?;
        let defaults: ProcessingDefaults = serde_yaml::from_str(&string)
            .map_err(|e| ConfigError::CouldNotParseConfig(path_str, e))?;

        defaults.validate()?;
        Ok(defaults)
    }

    /// Write processing defaults into a yaml file.
    /// An existing file is backed up unless `overwrite` is set.
    pub fn to_file(&self, path: impl AsRef<Path>, overwrite: bool) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if !overwrite && path.exists() {
            backitup::backup(path).map_err(|_| {
                ConfigError::CouldNotWriteConfig(WriteError::CouldNotBackupFile(Box::from(path)))
            })?;
        }

        let file = File::create(path).map_err(|_| {
            ConfigError::CouldNotWriteConfig(WriteError::CouldNotCreateFile(Box::from(path)))
        })?;

        let mut writer = BufWriter::new(file);
        serde_yaml::to_writer(&mut writer, self).map_err(|_| {
            ConfigError::CouldNotWriteConfig(WriteError::CouldNotWriteYaml(Box::from(path)))
        })?;

        writer.flush().map_err(|_| {
            ConfigError::CouldNotWriteConfig(WriteError::CouldNotWriteYaml(Box::from(path)))
        })
    }

    /// Check that the defaults are valid. Used after deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baseline_degree > MAX_BASELINE_DEGREE {
            return Err(ConfigError::InvalidBaselineDegree(
                self.baseline_degree,
                MAX_BASELINE_DEGREE,
            ));
        }

        if !is_valid_poisson_ratio(self.poisson_ratio) {
            return Err(ConfigError::InvalidPoissonRatio(self.poisson_ratio));
        }

        for family in CurveFamily::ALL {
            self.averaging
                .get(family)
                .validate()
                .map_err(ConfigError::InvalidAveraging)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::averaging::ErrorBarType;

    #[test]
    fn defaults_from_empty_yaml() {
        let defaults: ProcessingDefaults = serde_yaml::from_str("{}").unwrap();
        let expected = ProcessingDefaults::default();

        assert_eq!(defaults.baseline_degree(), 1);
        assert_eq!(defaults.indentation_model(), IndentationModel::Paraboloid);
        assert_eq!(defaults.fitted_branch(), Branch::Approach);
        assert!(defaults.automatic_contact_estimation());
        assert!(defaults.spring_constant().is_nan());
        assert!(defaults.sensitivity().is_nan());
        assert_eq!(defaults.averaging(), expected.averaging());
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn defaults_from_yaml() {
        let yaml = "baseline_degree: 2
model: sphere_dmt
regression_strategy: huber
contact_estimation_guide: curvature
thickness_correction: chadwick
fitted_branch: withdraw
automatic_contact_estimation: false
poisson_ratio: 0.3
spring_constant: 0.06
sensitivity: null
correct_substrate_effect: true
averaging:
  modulus:
    points: 250
    error_bar: sem
    shown: false
";
        let defaults: ProcessingDefaults = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(defaults.baseline_degree(), 2);
        assert_eq!(defaults.indentation_model(), IndentationModel::SphereDmt);
        assert_eq!(defaults.regression_strategy(), RegressionStrategy::Huber);
        assert_eq!(
            defaults.contact_estimation_guide(),
            ContactEstimationGuide::Curvature
        );
        assert_eq!(defaults.thickness_correction(), ThicknessCorrection::Chadwick);
        assert_eq!(defaults.fitted_branch(), Branch::Withdraw);
        assert!(!defaults.automatic_contact_estimation());
        assert_eq!(defaults.poisson_ratio(), 0.3);
        assert_eq!(defaults.spring_constant(), 0.06);
        assert!(defaults.sensitivity().is_nan());
        assert!(defaults.correct_substrate_effect());

        let modulus = defaults.averaging().get(CurveFamily::PointwiseModulus);
        assert_eq!(modulus.point_count(), 250);
        assert_eq!(modulus.error_bar(), ErrorBarType::StandardError);
        assert!(!modulus.shown());
        assert!(defaults.averaging().recorded.shown());
    }

    #[test]
    fn defaults_invalid() {
        let defaults: ProcessingDefaults = serde_yaml::from_str("baseline_degree: 9").unwrap();
        assert!(matches!(
            defaults.validate(),
            Err(ConfigError::InvalidBaselineDegree(9, MAX_BASELINE_DEGREE))
        ));

        let defaults: ProcessingDefaults = serde_yaml::from_str("poisson_ratio: 0.7").unwrap();
        assert!(matches!(
            defaults.validate(),
            Err(ConfigError::InvalidPoissonRatio(_))
        ));

        assert!(serde_yaml::from_str::<ProcessingDefaults>("unknown_key: 1").is_err());
    }

    #[test]
    fn defaults_round_trip_file() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("defaults.yaml");

        let defaults: ProcessingDefaults =
            serde_yaml::from_str("baseline_degree: 3\nspring_constant: 0.2").unwrap();
        defaults.to_file(&path, false).unwrap();

        let read = ProcessingDefaults::from_file(&path).unwrap();
        assert_eq!(read.baseline_degree(), 3);
        assert_eq!(read.spring_constant(), 0.2);
        assert!(read.sensitivity().is_nan());

        // writing again without overwrite backs up the previous file
        read.to_file(&path, false).unwrap();
        let n_files = std::fs::read_dir(directory.path()).unwrap().count();
        assert_eq!(n_files, 2);
    }

    #[test]
    fn defaults_to_file_complete() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("defaults.yaml");

        let defaults = ProcessingDefaults::default();
        defaults.to_file(&path, true).unwrap();

        let expected = serde_yaml::to_string(&defaults).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, expected);
    }

    #[test]
    fn defaults_to_file_missing_directory() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("missing").join("defaults.yaml");

        assert!(matches!(
            ProcessingDefaults::default().to_file(&path, true),
            Err(ConfigError::CouldNotWriteConfig(WriteError::CouldNotCreateFile(_)))
        ));
    }

    #[test]
    fn defaults_missing_file() {
        assert!(matches!(
            ProcessingDefaults::from_file("this_file_does_not_exist.yaml"),
            Err(ConfigError::CouldNotOpenConfig(_))
        ));
    }
}
