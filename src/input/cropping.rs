// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the specification of curve cropping and its conversion into amplitude units.

use getset::CopyGetters;
use serde::{Deserialize, Serialize};

/// Amount of the curve cut away from each side, as entered by the user.
/// `left` and `right` are distances (µm), `lower` and `upper` are forces (nN).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cropping {
    /// Crop the curve along the distance axis.
    #[serde(default)]
    pub domain_cropped: bool,
    /// Crop the curve along the force axis.
    #[serde(default)]
    pub range_cropped: bool,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub lower: f64,
    #[serde(default)]
    pub upper: f64,
}

/// Crop bounds used by the processor. Force bounds are converted
/// into deflection through the spring constant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct CropBounds {
    left: f64,
    right: f64,
    lower: f64,
    upper: f64,
}

impl Cropping {
    /// Is cropping enabled along any axis?
    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.domain_cropped || self.range_cropped
    }

    /// Are all enabled crop values finite numbers?
    pub fn is_specified(&self) -> bool {
        let domain = !self.domain_cropped || (self.left.is_finite() && self.right.is_finite());
        let range = !self.range_cropped || (self.lower.is_finite() && self.upper.is_finite());
        domain && range
    }

    /// Convert the crop values into bounds used for processing a curve
    /// recorded with the given spring constant (N/m).
    pub fn resolve(&self, spring_constant: f64) -> CropBounds {
        let (left, right) = if self.domain_cropped {
            (self.left, self.right)
        } else {
            (0.0, 0.0)
        };

        let (lower, upper) = if self.range_cropped {
            (
                self.lower / (1000.0 * spring_constant),
                self.upper / (1000.0 * spring_constant),
            )
        } else {
            (0.0, 0.0)
        };

        CropBounds {
            left,
            right,
            lower,
            upper,
        }
    }
}
