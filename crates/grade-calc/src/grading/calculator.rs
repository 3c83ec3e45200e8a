use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{ComponentWeighting, GradeOutcome, RawMark, Tier, WeightedResult};
use super::options::resolve_option;
use super::pum::{compute_pum, InterpolationError};
use super::thresholds::ThresholdSet;
use super::validation::{validate_marks, ValidationError};
use super::weighting::{apply_weighting, WeightedSummary};
use crate::reference::{ReferenceDataError, ReferenceDataProvider};

/// Option label reported for calculations against caller-supplied data.
pub const CUSTOM_OPTION: &str = "Custom";

/// Marks for a published syllabus, graded against reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub subject_code: String,
    pub exam_series: String,
    pub components: Vec<String>,
    pub raw_marks: Vec<RawMark>,
}

/// Caller-supplied weighting for one component.
///
/// The maximum weighted mark is derived from the raw maximum and factor when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomWeighting {
    #[serde(default, alias = "Component")]
    pub component_code: Option<String>,
    #[serde(alias = "Max Raw Mark", alias = "max_raw")]
    pub max_raw_mark: f64,
    #[serde(default, alias = "Max Weighted Mark", alias = "max_weighted")]
    pub max_weighted_mark: Option<f64>,
    #[serde(alias = "SCWF", alias = "scwf")]
    pub weighting_factor: f64,
}

impl CustomWeighting {
    fn resolve(&self, fallback_code: Option<&String>, position: usize) -> ComponentWeighting {
        let component_code = self
            .component_code
            .clone()
            .or_else(|| fallback_code.cloned())
            .unwrap_or_else(|| (position + 1).to_string());

        ComponentWeighting {
            component_code,
            max_raw_mark: self.max_raw_mark,
            max_weighted_mark: self
                .max_weighted_mark
                .unwrap_or(self.max_raw_mark * self.weighting_factor),
            weighting_factor: self.weighting_factor,
        }
    }
}

/// Marks graded against caller-supplied weightings and grade boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCalculationRequest {
    #[serde(default)]
    pub components: Vec<String>,
    pub raw_marks: Vec<RawMark>,
    #[serde(rename = "custom_scwf", alias = "custom_weighting")]
    pub custom_weighting: Vec<CustomWeighting>,
    pub custom_thresholds: BTreeMap<String, f64>,
}

/// Weighted totals with the grade and uniform mark when they could be determined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub syllabus_total: i64,
    pub max_weighted_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<GradeOutcome>,
    pub pum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdSet>,
    pub details: Vec<WeightedResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CalculationResult {
    fn without_grade(summary: WeightedSummary, message: String) -> Self {
        Self {
            syllabus_total: summary.syllabus_total,
            max_weighted_total: summary.max_weighted_total,
            grade: None,
            pum: None,
            tier: None,
            option: None,
            thresholds: None,
            details: summary.details,
            message: Some(message),
        }
    }

    fn graded(
        summary: WeightedSummary,
        option: String,
        thresholds: ThresholdSet,
    ) -> Result<Self, InterpolationError> {
        let outcome = thresholds.resolve_grade(summary.syllabus_total);
        let pum = compute_pum(
            summary.syllabus_total,
            outcome,
            &thresholds,
            summary.max_weighted_total,
        )?;

        Ok(Self {
            syllabus_total: summary.syllabus_total,
            max_weighted_total: summary.max_weighted_total,
            grade: Some(outcome),
            pum,
            tier: Some(thresholds.tier()),
            option: Some(option),
            thresholds: Some(thresholds),
            details: summary.details,
            message: None,
        })
    }
}

/// Error that aborts a calculation.
#[derive(Debug, thiserror::Error)]
pub enum CalculationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

/// Runs the grading pipeline against a reference data provider.
pub struct GradeCalculator<P> {
    provider: Arc<P>,
}

impl<P> GradeCalculator<P>
where
    P: ReferenceDataProvider + 'static,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Grade marks for a published subject and exam series.
    ///
    /// Missing thresholds and unmatched component sets still return the weighted totals,
    /// with a message in place of the grade.
    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, CalculationError> {
        let CalculationRequest {
            subject_code,
            exam_series,
            components,
            raw_marks,
        } = request;

        let weightings = self
            .provider
            .lookup_weighting(exam_series, subject_code, components)?;
        if weightings.is_empty() {
            return Err(ReferenceDataError::WeightingNotFound {
                subject: subject_code.clone(),
                series: exam_series.clone(),
            }
            .into());
        }

        let missing: Vec<String> = components
            .iter()
            .filter(|code| !weightings.iter().any(|w| &w.component_code == *code))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ReferenceDataError::MissingComponents {
                subject: subject_code.clone(),
                series: exam_series.clone(),
                components: missing,
            }
            .into());
        }

        let entries = validate_marks(raw_marks, &weightings)?;
        let summary = apply_weighting(&entries);
        debug!(
            subject_code,
            exam_series,
            syllabus_total = summary.syllabus_total,
            max_weighted_total = summary.max_weighted_total,
            "weighted marks"
        );

        let Some(record) = self.provider.lookup_thresholds(exam_series, subject_code)? else {
            info!(subject_code, exam_series, "thresholds unavailable");
            return Ok(CalculationResult::without_grade(
                summary,
                format!("Thresholds not available for {subject_code} in {exam_series}"),
            ));
        };

        let option = match resolve_option(components, &record) {
            Ok(option) => option,
            Err(failure) => {
                info!(subject_code, exam_series, %failure, "option not detected");
                return Ok(CalculationResult::without_grade(summary, failure.to_string()));
            }
        };
        debug!(option = %option.code, components = %option.components, "option detected");

        let thresholds =
            ThresholdSet::for_option(&record, &option.code).map_err(ReferenceDataError::from)?;
        let result = CalculationResult::graded(summary, option.code, thresholds)?;
        log_result(&result);
        Ok(result)
    }
}

/// Grade marks against weightings and thresholds supplied by the caller.
///
/// Option detection is skipped and the option is reported as [`CUSTOM_OPTION`].
pub fn calculate_custom(
    request: &CustomCalculationRequest,
) -> Result<CalculationResult, CalculationError> {
    let weightings: Vec<ComponentWeighting> = request
        .custom_weighting
        .iter()
        .enumerate()
        .map(|(position, weighting)| weighting.resolve(request.components.get(position), position))
        .collect();

    let entries = validate_marks(&request.raw_marks, &weightings);
    let thresholds = ThresholdSet::from_labels(&request.custom_thresholds);
    let (entries, thresholds) = match (entries, thresholds) {
        (Ok(entries), Ok(thresholds)) => (entries, thresholds),
        (Err(mut marks), Err(boundaries)) => {
            marks.issues.extend(boundaries.issues);
            return Err(marks.into());
        }
        (Err(err), Ok(_)) | (Ok(_), Err(err)) => return Err(err.into()),
    };

    let summary = apply_weighting(&entries);
    let result = CalculationResult::graded(summary, CUSTOM_OPTION.to_string(), thresholds)?;
    log_result(&result);
    Ok(result)
}

fn log_result(result: &CalculationResult) {
    info!(
        option = result.option.as_deref().unwrap_or_default(),
        syllabus_total = result.syllabus_total,
        grade = result.grade.map(GradeOutcome::label).unwrap_or_default(),
        pum = ?result.pum,
        "calculation complete"
    );
}
