// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the description of the indented sample.

use serde::{Deserialize, Serialize};

/// Source of the thickness of a thin sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum SampleThickness {
    /// One thickness (µm) shared by all curves.
    Uniform(f64),
    /// Thickness read per curve from a topography channel
    /// restricted to the given regions of interest.
    Topography {
        channel: String,
        #[serde(default)]
        regions: Vec<String>,
    },
}

impl SampleThickness {
    /// Is the thickness usable for a substrate-effect correction?
    pub fn is_specified(&self) -> bool {
        match self {
            SampleThickness::Uniform(t) => t.is_finite() && *t > 0.0,
            SampleThickness::Topography { channel, regions: _ } => !channel.trim().is_empty(),
        }
    }
}

/// Mechanical description of the sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleDescription {
    /// Poisson ratio of the sample.
    #[serde(default = "default_poisson_ratio")]
    pub poisson_ratio: f64,
    /// Thickness of the sample. Only needed when correcting the substrate effect.
    #[serde(default)]
    pub thickness: Option<SampleThickness>,
    /// Is the sample bonded to the substrate?
    #[serde(default = "default_adherent", alias = "bonded")]
    pub adherent: bool,
}

fn default_poisson_ratio() -> f64 {
    0.5
}

fn default_adherent() -> bool {
    true
}

impl Default for SampleDescription {
    fn default() -> Self {
        SampleDescription {
            poisson_ratio: default_poisson_ratio(),
            thickness: None,
            adherent: default_adherent(),
        }
    }
}

/// Is the Poisson ratio physically admissible for an isotropic material?
pub(crate) fn is_valid_poisson_ratio(poisson: f64) -> bool {
    poisson.is_finite() && (-1.0..=0.5).contains(&poisson)
}

impl SampleDescription {
    pub fn new(poisson_ratio: f64) -> Self {
        SampleDescription {
            poisson_ratio,
            ..Default::default()
        }
    }

    /// Is the sample thickness known well enough for a substrate-effect correction?
    pub fn is_thickness_specified(&self) -> bool {
        self.thickness
            .as_ref()
            .map(SampleThickness::is_specified)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_specified() {
        assert!(SampleThickness::Uniform(2.5).is_specified());
        assert!(!SampleThickness::Uniform(0.0).is_specified());
        assert!(!SampleThickness::Uniform(f64::NAN).is_specified());
        assert!(SampleThickness::Topography {
            channel: "Height".to_owned(),
            regions: vec![]
        }
        .is_specified());
        assert!(!SampleThickness::Topography {
            channel: "  ".to_owned(),
            regions: vec!["ROI1".to_owned()]
        }
        .is_specified());
    }

    #[test]
    fn poisson_validity() {
        assert!(is_valid_poisson_ratio(0.5));
        assert!(is_valid_poisson_ratio(-1.0));
        assert!(!is_valid_poisson_ratio(0.51));
        assert!(!is_valid_poisson_ratio(f64::NAN));
    }

    #[test]
    fn sample_from_yaml() {
        let sample: SampleDescription = serde_yaml::from_str(
            "poisson_ratio: 0.3\nthickness: !topography\n  channel: Height\n  regions: [ROI1]\nbonded: false",
        )
        .unwrap();

        assert_eq!(sample.poisson_ratio, 0.3);
        assert!(!sample.adherent);
        assert!(sample.is_thickness_specified());

        let sample: SampleDescription = serde_yaml::from_str("thickness: !uniform 3.0").unwrap();
        assert_eq!(sample.poisson_ratio, 0.5);
        assert!(sample.adherent);
        assert_eq!(sample.thickness, Some(SampleThickness::Uniform(3.0)));
    }
}
