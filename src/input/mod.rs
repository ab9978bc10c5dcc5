// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! This module contains structures and methods for specifying the parameters of the processing.

pub mod cropping;
pub mod defaults;
pub mod estimation;
pub mod indentation;
pub mod sample;
pub mod smoothing;
pub mod thickness;

pub use cropping::{CropBounds, Cropping};
pub use defaults::{AveragingDefaults, ProcessingDefaults};
pub use estimation::{
    AdhesiveEnergyEstimation, ContactEstimationGuide, ManualEstimatorKind, RegressionStrategy,
};
pub use indentation::{IndentationModel, ShapeFamily, TipShape, TipShapeParameter};
pub use sample::{SampleDescription, SampleThickness};
pub use smoothing::Smoothing;
pub use thickness::ThicknessCorrection;
