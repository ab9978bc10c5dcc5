// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! This module contains the selection and parameterization of contact models.
//!
//! The closed-form physics is provided by an external formula library behind
//! the [`ForceIndentationLaw`] trait; this module only decides which formula,
//! which indenter geometry and which elastic model of the sample are used.

use getset::{CopyGetters, Getters};
use serde::Serialize;

use crate::errors::ModelError;
use crate::input::sample::is_valid_poisson_ratio;
use crate::input::{
    AdhesiveEnergyEstimation, IndentationModel, SampleDescription, SampleThickness, ShapeFamily,
    ThicknessCorrection, TipShape, TipShapeParameter,
};

mod thin_sample;

/// Concrete elastic-contact formula of the external formula library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum ContactFormula {
    #[strum(serialize = "Hertzian cone")]
    HertzianCone,
    #[strum(serialize = "Bilodeau pyramid")]
    BilodeauPyramid,
    #[strum(serialize = "power-shaped punch")]
    PowerShaped,
    #[strum(serialize = "Hertzian paraboloid")]
    HertzianParaboloid,
    #[strum(serialize = "Sneddon sphere")]
    SneddonSphere,
    #[strum(serialize = "Fung sphere")]
    FungSphere,
    #[strum(serialize = "Ogden sphere")]
    OgdenSphere,
    #[strum(serialize = "DMT sphere")]
    DmtSphere,
    #[strum(serialize = "JKR sphere")]
    JkrSphere,
    #[strum(serialize = "Maugis sphere")]
    MaugisSphere,
    #[strum(serialize = "hyperboloid")]
    Hyperboloid,
    #[strum(serialize = "SAW hyperboloid")]
    SawHyperboloid,
    #[strum(serialize = "blunt cone")]
    BluntCone,
    #[strum(serialize = "blunt pyramid")]
    BluntPyramid,
    #[strum(serialize = "truncated cone")]
    TruncatedCone,
    #[strum(serialize = "truncated pyramid")]
    TruncatedPyramid,
}

/// Geometry of the indenter. Angles are in radians, lengths in µm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indenter {
    Cone {
        half_angle: f64,
    },
    Pyramid {
        half_angle: f64,
    },
    PowerShaped {
        exponent: f64,
        factor: f64,
    },
    Paraboloid {
        radius: f64,
    },
    Sphere {
        radius: f64,
    },
    Hyperboloid {
        radius: f64,
        half_angle: f64,
    },
    BluntCone {
        radius: f64,
        half_angle: f64,
        transition_radius: f64,
    },
    BluntPyramid {
        radius: f64,
        half_angle: f64,
        transition_radius: f64,
    },
    TruncatedCone {
        half_angle: f64,
        truncation_radius: f64,
    },
    TruncatedPyramid {
        half_angle: f64,
        truncation_radius: f64,
    },
}

/// Elastic model of the sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleModel {
    /// Sample of infinite thickness.
    Bulk { poisson_ratio: f64 },
    /// Sample of finite thickness on a stiff substrate.
    ThinSample {
        poisson_ratio: f64,
        thickness: SampleThickness,
        adherent: bool,
        correction: ThicknessCorrection,
    },
}

impl SampleModel {
    pub fn poisson_ratio(&self) -> f64 {
        match self {
            SampleModel::Bulk { poisson_ratio } => *poisson_ratio,
            SampleModel::ThinSample { poisson_ratio, .. } => *poisson_ratio,
        }
    }
}

/// Model of the curve before contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, CopyGetters)]
pub struct PrecontactModel {
    /// Degree of the polynomial describing the baseline.
    #[getset(get_copy = "pub")]
    baseline_degree: usize,
}

impl PrecontactModel {
    pub fn new(baseline_degree: usize) -> Self {
        PrecontactModel { baseline_degree }
    }
}

/// Fully parameterized contact model shared by all curves of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct ContactModel {
    #[getset(get_copy = "pub")]
    model: IndentationModel,
    #[getset(get_copy = "pub")]
    formula: ContactFormula,
    #[getset(get_copy = "pub")]
    indenter: Indenter,
    #[getset(get = "pub")]
    sample: SampleModel,
    #[getset(get_copy = "pub")]
    precontact: PrecontactModel,
    /// Only present for adhesive models.
    #[getset(get_copy = "pub")]
    adhesive_energy: Option<AdhesiveEnergyEstimation>,
}

impl ContactModel {
    /// Is the sample treated as a thin layer on a substrate?
    pub fn is_thin_sample(&self) -> bool {
        matches!(self.sample, SampleModel::ThinSample { .. })
    }

    /// Predict the force at the given indentation using an external formula library.
    pub fn predict_force(&self, law: &impl ForceIndentationLaw, indentation: f64) -> f64 {
        law.force(self, indentation)
    }
}

/// Boundary to the library of closed-form contact-mechanics formulas.
pub trait ForceIndentationLaw {
    /// Force predicted by the contact model at the given indentation.
    fn force(&self, model: &ContactModel, indentation: f64) -> f64;
}

impl IndentationModel {
    /// Construct the contact model described by this indentation model.
    ///
    /// ## Parameters
    /// - `tip` - values of the tip shape parameters (only the declared ones are read)
    /// - `sample` - mechanical description of the sample
    /// - `precontact` - model of the curve before contact
    /// - `correction` - substrate-effect correction to apply, `None` for a bulk sample
    /// - `adhesive_energy` - estimation method attached to adhesive models
    pub fn build_contact_model(
        &self,
        tip: &TipShape,
        sample: &SampleDescription,
        precontact: PrecontactModel,
        correction: Option<ThicknessCorrection>,
        adhesive_energy: AdhesiveEnergyEstimation,
    ) -> Result<ContactModel, ModelError> {
        if let Some(parameter) = self.first_missing_parameter(tip) {
            return Err(ModelError::MissingShapeParameter(*self, parameter));
        }

        if !is_valid_poisson_ratio(sample.poisson_ratio) {
            return Err(ModelError::InvalidPoissonRatio(sample.poisson_ratio));
        }

        let indenter = self.indenter(tip);
        let adhesive_energy = self.requires_adhesive_energy().then_some(adhesive_energy);

        let sample_model = match correction {
            None => SampleModel::Bulk {
                poisson_ratio: sample.poisson_ratio,
            },
            Some(correction) => {
                if !correction.is_correction_known(*self, sample.adherent) {
                    return Err(ModelError::CorrectionUnknown(correction, *self));
                }

                let thickness = sample
                    .thickness
                    .as_ref()
                    .filter(|t| t.is_specified())
                    .ok_or(ModelError::MissingThickness)?;

                let thin = ThinSampleDescription {
                    poisson_ratio: sample.poisson_ratio,
                    thickness: thickness.clone(),
                    adherent: sample.adherent,
                };

                let corrected = match self.shape_family() {
                    Some(ShapeFamily::Conical) => {
                        correction.conical_contact_model(*self, indenter, thin, precontact)
                    }
                    Some(ShapeFamily::Paraboloidal) => {
                        correction.paraboloidal_contact_model(*self, indenter, thin, precontact)
                    }
                    Some(ShapeFamily::Spherical) => {
                        correction.spherical_contact_model(*self, indenter, thin, precontact)
                    }
                    // `is_correction_known` is false for models without a shape family
                    None => panic!(
                        "FATAL ATOMICJ ERROR | IndentationModel::build_contact_model | No shape family for '{}'.{}",
                        self,
                        crate::PANIC_MESSAGE
                    ),
                };

                return Ok(ContactModel {
                    adhesive_energy,
                    ..corrected
                });
            }
        };

        Ok(ContactModel {
            model: *self,
            formula: self.formula(),
            indenter,
            sample: sample_model,
            precontact,
            adhesive_energy,
        })
    }

    /// Formula used by this model.
    pub fn formula(&self) -> ContactFormula {
        match self {
            Self::Cone => ContactFormula::HertzianCone,
            Self::Pyramid => ContactFormula::BilodeauPyramid,
            Self::PowerShaped => ContactFormula::PowerShaped,
            Self::Paraboloid => ContactFormula::HertzianParaboloid,
            Self::SphereSneddon => ContactFormula::SneddonSphere,
            Self::SphereFung => ContactFormula::FungSphere,
            Self::SphereOgden => ContactFormula::OgdenSphere,
            Self::SphereDmt => ContactFormula::DmtSphere,
            Self::SphereJkr => ContactFormula::JkrSphere,
            Self::SphereMaugis => ContactFormula::MaugisSphere,
            Self::Hyperboloid => ContactFormula::Hyperboloid,
            Self::HyperboloidAdhesive => ContactFormula::SawHyperboloid,
            Self::BluntCone => ContactFormula::BluntCone,
            Self::BluntPyramid => ContactFormula::BluntPyramid,
            Self::TruncatedCone => ContactFormula::TruncatedCone,
            Self::TruncatedPyramid => ContactFormula::TruncatedPyramid,
        }
    }

    /// Indenter geometry built only from the declared parameters.
    fn indenter(&self, tip: &TipShape) -> Indenter {
        let get = |p: TipShapeParameter| self.parameter(tip, p);
        let angle = || get(TipShapeParameter::HalfAngle).to_radians();

        match self {
            Self::Cone => Indenter::Cone {
                half_angle: angle(),
            },
            Self::Pyramid => Indenter::Pyramid {
                half_angle: angle(),
            },
            Self::PowerShaped => Indenter::PowerShaped {
                exponent: get(TipShapeParameter::Exponent),
                factor: get(TipShapeParameter::Factor),
            },
            Self::Paraboloid => Indenter::Paraboloid {
                radius: get(TipShapeParameter::Radius),
            },
            Self::SphereSneddon
            | Self::SphereFung
            | Self::SphereOgden
            | Self::SphereDmt
            | Self::SphereJkr
            | Self::SphereMaugis => Indenter::Sphere {
                radius: get(TipShapeParameter::Radius),
            },
            Self::Hyperboloid | Self::HyperboloidAdhesive => Indenter::Hyperboloid {
                radius: get(TipShapeParameter::Radius),
                half_angle: angle(),
            },
            Self::BluntCone => Indenter::BluntCone {
                radius: get(TipShapeParameter::Radius),
                half_angle: angle(),
                transition_radius: get(TipShapeParameter::TransitionRadius),
            },
            Self::BluntPyramid => Indenter::BluntPyramid {
                radius: get(TipShapeParameter::Radius),
                half_angle: angle(),
                transition_radius: get(TipShapeParameter::TransitionRadius),
            },
            Self::TruncatedCone => Indenter::TruncatedCone {
                half_angle: angle(),
                truncation_radius: get(TipShapeParameter::TransitionRadius),
            },
            Self::TruncatedPyramid => Indenter::TruncatedPyramid {
                half_angle: angle(),
                truncation_radius: get(TipShapeParameter::TransitionRadius),
            },
        }
    }
}

/// Thin sample handed to the substrate-effect correction strategies.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ThinSampleDescription {
    pub(crate) poisson_ratio: f64,
    pub(crate) thickness: SampleThickness,
    pub(crate) adherent: bool,
}
