// Released under MIT License.
// Copyright (c) 2026 AtomicJ developers

//! Contains the averaging of processed curves onto a common domain.

use std::fmt;

use derive_builder::Builder;
use getset::{CopyGetters, Getters};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::errors::AveragingError;
use crate::numeric;

/// Kind of curve produced by the processing of one force curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveFamily {
    /// Force curve as recorded (after calibration).
    Recorded,
    /// Force against indentation.
    Indentation,
    /// Pointwise modulus against indentation.
    PointwiseModulus,
}

impl CurveFamily {
    pub const ALL: [CurveFamily; 3] = [
        CurveFamily::Recorded,
        CurveFamily::Indentation,
        CurveFamily::PointwiseModulus,
    ];
}

impl fmt::Display for CurveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveFamily::Recorded => write!(f, "recorded curve"),
            CurveFamily::Indentation => write!(f, "indentation"),
            CurveFamily::PointwiseModulus => write!(f, "pointwise modulus"),
        }
    }
}

/// Statistic used for the error bars of an averaged curve.
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
pub enum ErrorBarType {
    #[default]
    #[serde(alias = "sd")]
    #[strum(serialize = "standard deviation")]
    StandardDeviation,
    #[serde(alias = "sem")]
    #[strum(serialize = "standard error")]
    StandardError,
    #[serde(alias = "ci")]
    #[strum(serialize = "confidence interval")]
    ConfidenceInterval,
}

/// Parameters of averaging for one curve family.
#[derive(Debug, Clone, Copy, PartialEq, Builder, CopyGetters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct AveragingSettings {
    /// Number of points of the averaged curve.
    #[builder(default = "DEFAULT_POINT_COUNT")]
    #[serde(default = "default_point_count", alias = "points")]
    #[getset(get_copy = "pub")]
    point_count: usize,

    #[builder(default)]
    #[serde(default)]
    #[getset(get_copy = "pub")]
    error_bar: ErrorBarType,

    /// Confidence level used with `ErrorBarType::ConfidenceInterval`.
    #[builder(default = "DEFAULT_CONFIDENCE_LEVEL")]
    #[serde(default = "default_confidence_level")]
    #[getset(get_copy = "pub")]
    confidence_level: f64,

    /// Is the averaged curve shown (and therefore calculated)?
    #[builder(default = "true")]
    #[serde(default = "default_shown")]
    #[getset(get_copy = "pub")]
    shown: bool,
}

const DEFAULT_POINT_COUNT: usize = 100;
const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

fn default_point_count() -> usize {
    DEFAULT_POINT_COUNT
}

fn default_confidence_level() -> f64 {
    DEFAULT_CONFIDENCE_LEVEL
}

fn default_shown() -> bool {
    true
}

impl Default for AveragingSettings {
    fn default() -> Self {
        AveragingSettings {
            point_count: DEFAULT_POINT_COUNT,
            error_bar: ErrorBarType::default(),
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            shown: true,
        }
    }
}

fn validate_point_count(count: usize) -> Result<(), AveragingError> {
    if count == 0 {
        Err(AveragingError::InvalidPointCount(count))
    } else {
        Ok(())
    }
}

fn validate_confidence_level(level: f64) -> Result<(), AveragingError> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(AveragingError::InvalidConfidenceLevel(level))
    }
}

impl AveragingSettings {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> AveragingSettingsBuilder {
        AveragingSettingsBuilder::default()
    }

    /// Check that the settings are valid. Used after deserialization.
    pub fn validate(&self) -> Result<(), AveragingError> {
        validate_point_count(self.point_count)?;
        validate_confidence_level(self.confidence_level)?;
        Ok(())
    }
}

impl AveragingSettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(count) = self.point_count {
            validate_point_count(count).map_err(|e| e.to_string())?;
        }

        if let Some(level) = self.confidence_level {
            validate_confidence_level(level).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

/// Curves produced by the external processor for one source.
#[derive(Debug, Clone, Default, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessedCurve {
    #[getset(get = "pub")]
    identifier: String,
    #[serde(default)]
    #[getset(get = "pub")]
    recorded: Curve,
    #[serde(default)]
    #[getset(get = "pub")]
    indentation: Curve,
    #[serde(default)]
    #[getset(get = "pub")]
    pointwise_modulus: Curve,
}

impl ProcessedCurve {
    pub fn new(
        identifier: &str,
        recorded: Curve,
        indentation: Curve,
        pointwise_modulus: Curve,
    ) -> Self {
        ProcessedCurve {
            identifier: identifier.to_owned(),
            recorded,
            indentation,
            pointwise_modulus,
        }
    }

    /// Get the curve of the given family.
    pub fn family(&self, family: CurveFamily) -> &Curve {
        match family {
            CurveFamily::Recorded => &self.recorded,
            CurveFamily::Indentation => &self.indentation,
            CurveFamily::PointwiseModulus => &self.pointwise_modulus,
        }
    }
}

/// One point of an averaged curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AveragedPoint {
    pub x: f64,
    pub mean: f64,
    /// Half-width of the error bar. NaN if it cannot be calculated.
    pub error: f64,
}

/// Averaged curve with error bars.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters, Serialize)]
pub struct CurveWithErrors {
    #[getset(get = "pub")]
    points: Vec<AveragedPoint>,
    #[getset(get_copy = "pub")]
    error_bar: ErrorBarType,
    /// Number of curves that were averaged.
    #[getset(get_copy = "pub")]
    n_curves: usize,
}

impl CurveWithErrors {
    /// Averaged curve containing no points.
    pub fn empty(error_bar: ErrorBarType) -> Self {
        CurveWithErrors {
            points: Vec::new(),
            error_bar,
            n_curves: 0,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Domain of the averaged curve.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        Some((self.points.first()?.x, self.points.last()?.x))
    }
}

/// Intersection of the domains of all curves. `None` if the curves share no abscissa.
pub fn domain_intersection(curves: &[Curve]) -> Option<(f64, f64)> {
    let mut low = f64::NEG_INFINITY;
    let mut high = f64::INFINITY;

    for curve in curves {
        let (min, max) = curve.x_range()?;
        low = low.max(min);
        high = high.min(max);
    }

    if curves.is_empty() || low > high {
        None
    } else {
        Some((low, high))
    }
}

/// Half-width of the error bar for the given values.
fn error_bar(values: &[f64], mean: f64, settings: &AveragingSettings) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }

    let sd = statistical::standard_deviation(values, Some(mean));
    match settings.error_bar {
        ErrorBarType::StandardDeviation => sd,
        ErrorBarType::StandardError => sd / (n as f64).sqrt(),
        ErrorBarType::ConfidenceInterval => {
            let p = 0.5 * (1.0 + settings.confidence_level);
            numeric::student_t_quantile(p, n - 1) * sd / (n as f64).sqrt()
        }
    }
}

/// Average curves on `point_count` evenly spaced abscissas spanning the
/// intersection of their domains.
pub fn average_curves(curves: &[&Curve], settings: &AveragingSettings) -> CurveWithErrors {
    if !settings.shown || curves.is_empty() {
        return CurveWithErrors::empty(settings.error_bar);
    }

    let sorted: Vec<Curve> = curves.iter().map(|c| c.sorted_by_x()).collect();
    let Some((low, high)) = domain_intersection(&sorted) else {
        log::warn!(
            "Domains of the {} averaged curves do not overlap. The averaged curve is empty.",
            sorted.len()
        );
        return CurveWithErrors::empty(settings.error_bar);
    };

    let n_points = settings.point_count.max(1);
    let step = if n_points > 1 {
        (high - low) / (n_points - 1) as f64
    } else {
        0.0
    };

    let mut points = Vec::with_capacity(n_points);
    let mut values = Vec::with_capacity(sorted.len());
    for i in 0..n_points {
        let x = if i + 1 == n_points && n_points > 1 {
            high
        } else {
            low + i as f64 * step
        };

        values.clear();
        values.extend(sorted.iter().filter_map(|c| c.interpolate(x)));
        if values.len() != sorted.len() {
            // only possible through rounding at the domain boundaries
            continue;
        }

        let mean = statistical::mean(&values);
        let error = error_bar(&values, mean, settings);
        points.push(AveragedPoint { x, mean, error });
    }

    CurveWithErrors {
        points,
        error_bar: settings.error_bar,
        n_curves: sorted.len(),
    }
}

/// Averaged curves of all families.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
#[getset(get = "pub")]
pub struct AveragedCurves {
    tag: String,
    recorded: CurveWithErrors,
    indentation: CurveWithErrors,
    pointwise_modulus: CurveWithErrors,
}

impl AveragedCurves {
    pub fn family(&self, family: CurveFamily) -> &CurveWithErrors {
        match family {
            CurveFamily::Recorded => &self.recorded,
            CurveFamily::Indentation => &self.indentation,
            CurveFamily::PointwiseModulus => &self.pointwise_modulus,
        }
    }
}

/// Group of processed curves sharing an identity tag, to be averaged together.
#[derive(Debug, Clone, Getters)]
pub struct AveragingRequest {
    #[getset(get = "pub")]
    tag: String,
    #[getset(get = "pub")]
    curves: Vec<ProcessedCurve>,
    settings: IndexMap<CurveFamily, AveragingSettings>,
}

impl AveragingRequest {
    /// Create a request using default settings for every curve family.
    pub fn new(tag: &str, curves: Vec<ProcessedCurve>) -> Self {
        AveragingRequest {
            tag: tag.to_owned(),
            curves,
            settings: CurveFamily::ALL
                .into_iter()
                .map(|f| (f, AveragingSettings::default()))
                .collect(),
        }
    }

    /// Group tagged curves into requests, one per tag, in order of first appearance.
    pub fn group(
        curves: impl IntoIterator<Item = (String, ProcessedCurve)>,
        settings: &IndexMap<CurveFamily, AveragingSettings>,
    ) -> Vec<AveragingRequest> {
        let mut groups: IndexMap<String, Vec<ProcessedCurve>> = IndexMap::new();
        for (tag, curve) in curves {
            groups.entry(tag).or_default().push(curve);
        }

        groups
            .into_iter()
            .map(|(tag, curves)| {
                let mut request = AveragingRequest::new(&tag, curves);
                for (family, s) in settings {
                    request.set_settings(*family, *s);
                }
                request
            })
            .collect()
    }

    /// Settings used for the given curve family.
    pub fn settings(&self, family: CurveFamily) -> AveragingSettings {
        self.settings.get(&family).copied().unwrap_or_default()
    }

    pub fn set_settings(&mut self, family: CurveFamily, settings: AveragingSettings) {
        self.settings.insert(family, settings);
    }

    /// Average one curve family. Hidden families are not calculated.
    pub fn average_family(&self, family: CurveFamily) -> CurveWithErrors {
        let settings = self.settings(family);
        let curves: Vec<&Curve> = self
            .curves
            .iter()
            .map(|c| c.family(family))
            .filter(|c| !c.is_empty())
            .collect();

        average_curves(&curves, &settings)
    }

    /// Average all curve families.
    pub fn average(&self) -> AveragedCurves {
        AveragedCurves {
            tag: self.tag.clone(),
            recorded: self.average_family(CurveFamily::Recorded),
            indentation: self.average_family(CurveFamily::Indentation),
            pointwise_modulus: self.average_family(CurveFamily::PointwiseModulus),
        }
    }
}
