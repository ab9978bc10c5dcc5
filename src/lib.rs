// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! # atomicj: Preparing AFM force-spectroscopy curves for processing
//!
//! Crate for specifying how batches of atomic force microscopy force curves should be processed.
//! `atomicj` resolves the contact model, calibrates the photodiode sensitivity,
//! tracks which settings of a batch are complete, estimates the contact point
//! and averages families of processed curves.
//!
//! ## Usage
//!
//! Run:
//!
//! ```bash
//! $ cargo add atomicj
//! ```
//!
//! Import the crate in your Rust code:
//!
//! ```rust
//! use atomicj::prelude::*;
//! ```
//!
//! `atomicj` is also available as a command line tool. You can install it using:
//! ```bash
//! $ cargo install atomicj
//! ```
//!
//! ## Examples
//!
//! Preparing a batch of curves recorded with a conical tip.
//! ```no_run
//! use std::sync::Arc;
//! use atomicj::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     // load the preferred default settings
//!     let defaults = ProcessingDefaults::from_file("defaults.yaml")?;
//!
//!     // construct the batch
//!     let mut batch = BatchState::new("cells", &defaults);
//!     batch.set_indentation_model(IndentationModel::Cone);         // shape of the indenter
//!     batch.set_tip_parameter(TipShapeParameter::HalfAngle, 20.0); // half-angle of the cone
//!     batch.set_poisson_ratio(0.5);                                // Poisson ratio of the sample
//!     batch.set_spring_constant(0.1);                              // spring constant (N/m)
//!     batch.set_sensitivity(PhotodiodeSignalType::Voltage, 50.0);  // sensitivity (nm/V)
//!
//!     // add the recorded curve
//!     let source = SpectroscopySource::new()
//!         .identifier("cell_01")
//!         .approach(Curve::from_xy(&[0.0, 1.0, 2.0, 3.0], &[0.0, 0.0, 0.5, 1.0]))
//!         .build()?;
//!     batch.set_sources(vec![Arc::new(source)]);
//!
//!     // activate colog if you want logging (requires the `colog` crate)
//!     colog::init();
//!
//!     // contact points are estimated automatically so no manual selection is performed
//!     let packs = batch.build_processing_batch(&mut |packs: Vec<ProcessablePack>| -> Vec<ProcessablePack> { packs })?;
//!     for pack in &packs {
//!         println!("{}: {:?}", pack.identifier(), pack.estimate_contact()?);
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Version of the `atomicj` crate.
pub const ATOMICJ_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Message that should be added to every panic.
pub(crate) const PANIC_MESSAGE: &str =
    "\n\n\n            >>> THIS SHOULD NOT HAVE HAPPENED! PLEASE REPORT THIS ERROR <<<
(open an issue in the 'atomicj' repository and attach the configuration that caused it)\n\n";

pub mod averaging;
pub mod batch;
pub mod calibration;
pub mod curve;
pub mod errors;
pub mod estimator;
pub mod input;
pub mod model;
pub(crate) mod numeric;
pub mod presentation;
pub mod processing;

/// This module contains re-exported public structures of the `atomicj` crate.
pub mod prelude {
    pub use super::averaging::{
        average_curves, AveragedCurves, AveragingRequest, AveragingSettings, CurveFamily,
        CurveWithErrors, ErrorBarType, ProcessedCurve,
    };

    pub use super::batch::{
        ApplyToAll, BatchFlag, BatchState, CalibratedQuantity, DerivedFlags,
        ManualContactSelector, ProcessingModel, SharedBatch, StateChange,
    };

    pub use super::calibration::{PointLookup, SensitivityCalibrator};

    pub use super::curve::{Branch, CalibrationState, Curve, PhotodiodeSignalType, SpectroscopySource};

    pub use super::estimator::{ContactEstimator, ContactPoint, ManualContactSelection};

    pub use super::input::{
        AdhesiveEnergyEstimation, ContactEstimationGuide, Cropping, IndentationModel,
        ManualEstimatorKind, ProcessingDefaults, RegressionStrategy, SampleDescription,
        SampleThickness, Smoothing, ThicknessCorrection, TipShape, TipShapeParameter,
    };

    pub use super::model::{ContactFormula, ContactModel};

    pub use super::presentation::{BatchSummary, ProcessingSummary};

    pub use super::processing::{ProcessablePack, ProcessingSettings};
}
