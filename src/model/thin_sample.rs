// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contact models of thin samples constructed by the substrate-effect correction strategies.

use crate::input::{IndentationModel, ThicknessCorrection};
use crate::PANIC_MESSAGE;

use super::{ContactModel, Indenter, PrecontactModel, SampleModel, ThinSampleDescription};

impl ThicknessCorrection {
    /// Contact model of a thin sample indented by a cone or a pyramid.
    ///
    /// ## Panics
    /// Panics if the conical correction is not known for this method and sample.
    pub(crate) fn conical_contact_model(
        &self,
        model: IndentationModel,
        indenter: Indenter,
        sample: ThinSampleDescription,
        precontact: PrecontactModel,
    ) -> ContactModel {
        if !self.is_conical_correction_known(sample.adherent)
            || !matches!(indenter, Indenter::Cone { .. } | Indenter::Pyramid { .. })
        {
            unreachable_correction(*self, model);
        }

        self.thin_sample_model(model, indenter, sample, precontact)
    }

    /// Contact model of a thin sample indented by a paraboloid.
    ///
    /// ## Panics
    /// Panics if the paraboloidal correction is not known for this method and sample.
    pub(crate) fn paraboloidal_contact_model(
        &self,
        model: IndentationModel,
        indenter: Indenter,
        sample: ThinSampleDescription,
        precontact: PrecontactModel,
    ) -> ContactModel {
        if !self.is_paraboloidal_correction_known(sample.adherent)
            || !matches!(indenter, Indenter::Paraboloid { .. })
        {
            unreachable_correction(*self, model);
        }

        self.thin_sample_model(model, indenter, sample, precontact)
    }

    /// Contact model of a thin sample indented by a sphere.
    ///
    /// ## Panics
    /// Panics if the spherical correction is not known for this method and sample.
    pub(crate) fn spherical_contact_model(
        &self,
        model: IndentationModel,
        indenter: Indenter,
        sample: ThinSampleDescription,
        precontact: PrecontactModel,
    ) -> ContactModel {
        if !self.is_spherical_correction_known(sample.adherent)
            || !matches!(indenter, Indenter::Sphere { .. })
        {
            unreachable_correction(*self, model);
        }

        self.thin_sample_model(model, indenter, sample, precontact)
    }

    fn thin_sample_model(
        &self,
        model: IndentationModel,
        indenter: Indenter,
        sample: ThinSampleDescription,
        precontact: PrecontactModel,
    ) -> ContactModel {
        ContactModel {
            model,
            formula: model.formula(),
            indenter,
            sample: SampleModel::ThinSample {
                poisson_ratio: sample.poisson_ratio,
                thickness: sample.thickness,
                adherent: sample.adherent,
                correction: *self,
            },
            precontact,
            adhesive_energy: None,
        }
    }
}

fn unreachable_correction(correction: ThicknessCorrection, model: IndentationModel) -> ! {
    panic!(
        "FATAL ATOMICJ ERROR | ThicknessCorrection | Correction '{}' is not known for model '{}' but was requested anyway.{}",
        correction, model, PANIC_MESSAGE
    )
}
