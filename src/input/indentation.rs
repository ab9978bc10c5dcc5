// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the closed set of indentation models and the tip shape parameters they consume.

use serde::{Deserialize, Serialize};

/// Kind of a geometric parameter describing the indenter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum TipShapeParameter {
    /// Radius of curvature of the tip apex (µm).
    #[strum(serialize = "radius")]
    Radius,
    /// Half-opening angle of a conical or pyramidal tip (degrees).
    #[strum(serialize = "half-angle")]
    HalfAngle,
    /// Radius at which a blunt tip turns from its apex into its flanks,
    /// or the radius of the flat top of a truncated tip (µm).
    #[strum(serialize = "transition radius")]
    TransitionRadius,
    /// Exponent of a power-shaped tip.
    #[strum(serialize = "exponent")]
    Exponent,
    /// Prefactor of a power-shaped tip.
    #[strum(serialize = "factor")]
    Factor,
}

/// Values of all tip shape parameters. Parameters that were not provided are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TipShape {
    #[serde(default = "default_nan", alias = "tip_radius")]
    pub radius: f64,
    #[serde(default = "default_nan", alias = "angle")]
    pub half_angle: f64,
    #[serde(default = "default_nan")]
    pub transition_radius: f64,
    #[serde(default = "default_nan")]
    pub exponent: f64,
    #[serde(default = "default_nan")]
    pub factor: f64,
}

fn default_nan() -> f64 {
    f64::NAN
}

impl Default for TipShape {
    fn default() -> Self {
        TipShape {
            radius: f64::NAN,
            half_angle: f64::NAN,
            transition_radius: f64::NAN,
            exponent: f64::NAN,
            factor: f64::NAN,
        }
    }
}

impl TipShape {
    /// Get the value of a parameter.
    pub fn value(&self, parameter: TipShapeParameter) -> f64 {
        match parameter {
            TipShapeParameter::Radius => self.radius,
            TipShapeParameter::HalfAngle => self.half_angle,
            TipShapeParameter::TransitionRadius => self.transition_radius,
            TipShapeParameter::Exponent => self.exponent,
            TipShapeParameter::Factor => self.factor,
        }
    }

    /// Set the value of a parameter.
    pub fn set_value(&mut self, parameter: TipShapeParameter, value: f64) {
        match parameter {
            TipShapeParameter::Radius => self.radius = value,
            TipShapeParameter::HalfAngle => self.half_angle = value,
            TipShapeParameter::TransitionRadius => self.transition_radius = value,
            TipShapeParameter::Exponent => self.exponent = value,
            TipShapeParameter::Factor => self.factor = value,
        }
    }

    /// Set the value of a parameter, consuming and returning the shape.
    pub fn with(mut self, parameter: TipShapeParameter, value: f64) -> Self {
        self.set_value(parameter, value);
        self
    }
}

/// Family of indenter shapes sharing one substrate-effect correction formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeFamily {
    Conical,
    Paraboloidal,
    Spherical,
}

/// Contact-mechanics model of the indentation.
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
pub enum IndentationModel {
    #[strum(serialize = "Cone")]
    Cone,
    #[strum(serialize = "Pyramid")]
    Pyramid,
    #[strum(serialize = "Power-shaped")]
    PowerShaped,
    #[default]
    #[serde(alias = "hertz")]
    #[strum(serialize = "Paraboloid (Hertz)")]
    Paraboloid,
    #[serde(alias = "sphere")]
    #[strum(serialize = "Sphere (Sneddon)")]
    SphereSneddon,
    #[strum(serialize = "Sphere (Fung)")]
    SphereFung,
    #[strum(serialize = "Sphere (Ogden)")]
    SphereOgden,
    #[serde(alias = "dmt")]
    #[strum(serialize = "Sphere (DMT)")]
    SphereDmt,
    #[serde(alias = "jkr")]
    #[strum(serialize = "Sphere (JKR)")]
    SphereJkr,
    #[serde(alias = "maugis")]
    #[strum(serialize = "Sphere (Maugis)")]
    SphereMaugis,
    #[strum(serialize = "Hyperboloid")]
    Hyperboloid,
    #[serde(alias = "saw")]
    #[strum(serialize = "Hyperboloid (SAW)")]
    HyperboloidAdhesive,
    #[strum(serialize = "Blunt cone")]
    BluntCone,
    #[strum(serialize = "Blunt pyramid")]
    BluntPyramid,
    #[strum(serialize = "Truncated cone")]
    TruncatedCone,
    #[strum(serialize = "Truncated pyramid")]
    TruncatedPyramid,
}

const HALF_ANGLE: &[TipShapeParameter] = &[TipShapeParameter::HalfAngle];
const RADIUS: &[TipShapeParameter] = &[TipShapeParameter::Radius];
const POWER: &[TipShapeParameter] = &[TipShapeParameter::Exponent, TipShapeParameter::Factor];
const RADIUS_ANGLE: &[TipShapeParameter] =
    &[TipShapeParameter::Radius, TipShapeParameter::HalfAngle];
const BLUNT: &[TipShapeParameter] = &[
    TipShapeParameter::Radius,
    TipShapeParameter::HalfAngle,
    TipShapeParameter::TransitionRadius,
];
const TRUNCATED: &[TipShapeParameter] = &[
    TipShapeParameter::HalfAngle,
    TipShapeParameter::TransitionRadius,
];

impl IndentationModel {
    /// All indentation models in the order in which they are offered to the user.
    pub const ALL: [IndentationModel; 16] = [
        IndentationModel::Cone,
        IndentationModel::Pyramid,
        IndentationModel::PowerShaped,
        IndentationModel::Paraboloid,
        IndentationModel::SphereSneddon,
        IndentationModel::SphereFung,
        IndentationModel::SphereOgden,
        IndentationModel::SphereDmt,
        IndentationModel::SphereJkr,
        IndentationModel::SphereMaugis,
        IndentationModel::Hyperboloid,
        IndentationModel::HyperboloidAdhesive,
        IndentationModel::BluntCone,
        IndentationModel::BluntPyramid,
        IndentationModel::TruncatedCone,
        IndentationModel::TruncatedPyramid,
    ];

    /// Tip shape parameters consumed by this model.
    pub fn required_parameters(&self) -> &'static [TipShapeParameter] {
        match self {
            Self::Cone | Self::Pyramid => HALF_ANGLE,
            Self::PowerShaped => POWER,
            Self::Paraboloid
            | Self::SphereSneddon
            | Self::SphereFung
            | Self::SphereOgden
            | Self::SphereDmt
            | Self::SphereJkr
            | Self::SphereMaugis => RADIUS,
            Self::Hyperboloid | Self::HyperboloidAdhesive => RADIUS_ANGLE,
            Self::BluntCone | Self::BluntPyramid => BLUNT,
            Self::TruncatedCone | Self::TruncatedPyramid => TRUNCATED,
        }
    }

    /// Does this model consume the given parameter?
    #[inline(always)]
    pub fn requires(&self, parameter: TipShapeParameter) -> bool {
        self.required_parameters().contains(&parameter)
    }

    /// Does the model need an estimate of the adhesive energy?
    pub fn requires_adhesive_energy(&self) -> bool {
        matches!(
            self,
            Self::SphereDmt | Self::SphereJkr | Self::SphereMaugis | Self::HyperboloidAdhesive
        )
    }

    /// Are all parameters required by this model finite numbers?
    pub fn is_necessary_information_provided(&self, tip: &TipShape) -> bool {
        self.required_parameters()
            .iter()
            .all(|&p| tip.value(p).is_finite())
    }

    /// First required parameter that is not a finite number.
    pub(crate) fn first_missing_parameter(&self, tip: &TipShape) -> Option<TipShapeParameter> {
        self.required_parameters()
            .iter()
            .copied()
            .find(|&p| !tip.value(p).is_finite())
    }

    /// Read a parameter declared by this model.
    ///
    /// ## Panics
    /// Panics if the parameter is not part of the declared set.
    pub(crate) fn parameter(&self, tip: &TipShape, parameter: TipShapeParameter) -> f64 {
        if !self.requires(parameter) {
            panic!(
                "FATAL ATOMICJ ERROR | IndentationModel::parameter | Model '{}' does not declare parameter '{}'.{}",
                self,
                parameter,
                crate::PANIC_MESSAGE
            );
        }

        tip.value(parameter)
    }

    /// Shape family for which substrate-effect corrections may be known.
    pub fn shape_family(&self) -> Option<ShapeFamily> {
        match self {
            Self::Cone | Self::Pyramid => Some(ShapeFamily::Conical),
            Self::Paraboloid => Some(ShapeFamily::Paraboloidal),
            Self::SphereSneddon | Self::SphereDmt | Self::SphereJkr | Self::SphereMaugis => {
                Some(ShapeFamily::Spherical)
            }
            Self::PowerShaped
            | Self::SphereFung
            | Self::SphereOgden
            | Self::Hyperboloid
            | Self::HyperboloidAdhesive
            | Self::BluntCone
            | Self::BluntPyramid
            | Self::TruncatedCone
            | Self::TruncatedPyramid => None,
        }
    }

    /// Is the transition radius of the tip derived from its radius and half-angle?
    pub fn has_calculable_transition_radius(&self) -> bool {
        matches!(self, Self::BluntCone | Self::BluntPyramid)
    }

    /// Transition radius of a blunt tip whose spherical apex meets the flanks tangentially.
    /// Returns `None` for other models or when radius or half-angle is missing.
    pub fn calculate_transition_radius(&self, tip: &TipShape) -> Option<f64> {
        if !self.has_calculable_transition_radius() {
            return None;
        }

        let radius = self.parameter(tip, TipShapeParameter::Radius);
        let half_angle = self.parameter(tip, TipShapeParameter::HalfAngle);
        if !radius.is_finite() || !half_angle.is_finite() {
            return None;
        }

        Some(radius * half_angle.to_radians().cos())
    }
}
