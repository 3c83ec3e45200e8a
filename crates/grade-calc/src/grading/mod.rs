//! Weighted grade and uniform mark calculation.
//!
//! Marks flow through validation, weighting, option detection, grade resolution and
//! uniform mark interpolation. Each stage is a pure function; [`GradeCalculator`] wires
//! them to a reference data provider.

mod calculator;
pub mod domain;
pub mod options;
pub mod pum;
pub mod thresholds;
pub mod validation;
pub mod weighting;

pub use calculator::{
    calculate_custom, CalculationError, CalculationRequest, CalculationResult,
    CustomCalculationRequest, CustomWeighting, GradeCalculator, CUSTOM_OPTION,
};
pub use domain::{
    ComponentWeighting, Grade, GradeOutcome, MarkEntry, PumBand, RawMark, Tier, WeightedResult,
};
pub use options::{resolve_option, DetectedOption, OptionResolutionFailure};
pub use pum::{compute_pum, InterpolationError};
pub use thresholds::{MalformedThreshold, ThresholdRecord, ThresholdSet, ThresholdValue};
pub use validation::{validate_marks, ValidationError, ValidationIssue};
pub use weighting::{apply_weighting, WeightedSummary};
