// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the available methods for correcting the effect of a stiff substrate
//! under a sample of finite thickness.

use serde::{Deserialize, Serialize};

use super::indentation::{IndentationModel, ShapeFamily};

/// Method for the correction of the substrate effect.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ThicknessCorrection {
    #[default]
    #[serde(alias = "lebedev")]
    #[strum(serialize = "Lebedev-Chebyshev")]
    LebedevChebyshev,
    #[strum(serialize = "Chadwick")]
    Chadwick,
}

impl ThicknessCorrection {
    pub const ALL: [ThicknessCorrection; 2] = [
        ThicknessCorrection::LebedevChebyshev,
        ThicknessCorrection::Chadwick,
    ];

    /// Is the correction known for conical and pyramidal indenters?
    pub fn is_conical_correction_known(&self, _sample_adherent: bool) -> bool {
        match self {
            Self::LebedevChebyshev => true,
            Self::Chadwick => true,
        }
    }

    /// Is the correction known for paraboloidal indenters?
    pub fn is_paraboloidal_correction_known(&self, _sample_adherent: bool) -> bool {
        match self {
            Self::LebedevChebyshev => true,
            Self::Chadwick => true,
        }
    }

    /// Is the correction known for spherical indenters?
    pub fn is_spherical_correction_known(&self, _sample_adherent: bool) -> bool {
        match self {
            Self::LebedevChebyshev => true,
            Self::Chadwick => false,
        }
    }

    /// Can this correction be applied to the given indentation model?
    pub fn is_correction_known(&self, model: IndentationModel, sample_adherent: bool) -> bool {
        match model.shape_family() {
            Some(ShapeFamily::Conical) => self.is_conical_correction_known(sample_adherent),
            Some(ShapeFamily::Paraboloidal) => {
                self.is_paraboloidal_correction_known(sample_adherent)
            }
            Some(ShapeFamily::Spherical) => self.is_spherical_correction_known(sample_adherent),
            None => false,
        }
    }

    /// All corrections that can be applied to the given indentation model.
    pub fn applicable(model: IndentationModel, sample_adherent: bool) -> Vec<ThicknessCorrection> {
        Self::ALL
            .into_iter()
            .filter(|c| c.is_correction_known(model, sample_adherent))
            .collect()
    }
}
