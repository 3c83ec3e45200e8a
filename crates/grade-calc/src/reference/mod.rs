//! Weighting factor and grade threshold lookups.
//!
//! The calculator only sees [`ReferenceDataProvider`]; the bundled JSON files are read by
//! [`FileReferenceData`] using a [`ReferenceIndex`] to locate the file for each exam
//! series and subject.

mod files;
mod index;

pub use files::FileReferenceData;
pub use index::ReferenceIndex;

use crate::grading::{ComponentWeighting, MalformedThreshold, ThresholdRecord};
use std::path::PathBuf;

/// Source of weighting factors and thresholds keyed by exam series and subject.
///
/// Implementations resolve exam series aliases themselves so callers can pass the series
/// exactly as the student selected it.
pub trait ReferenceDataProvider: Send + Sync {
    /// Weighting records for the requested components, in request order.
    ///
    /// Components without data are skipped; an empty list means nothing was found.
    fn lookup_weighting(
        &self,
        exam_series: &str,
        subject_code: &str,
        component_codes: &[String],
    ) -> Result<Vec<ComponentWeighting>, ReferenceDataError>;

    /// Flat threshold record for the series, or `None` when none is published.
    fn lookup_thresholds(
        &self,
        exam_series: &str,
        subject_code: &str,
    ) -> Result<Option<ThresholdRecord>, ReferenceDataError>;
}

/// Failure to find or read reference data.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("No SCWF data available for {series}")]
    UnknownSeries { series: String },
    #[error("Could not load SCWF data for {subject} in {series}")]
    WeightingNotFound { subject: String, series: String },
    #[error(
        "Could not load SCWF data for {subject} in {series}: no data for component(s) {}",
        .components.join(", ")
    )]
    MissingComponents {
        subject: String,
        series: String,
        components: Vec<String>,
    },
    #[error("failed to read reference file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed reference file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Threshold(#[from] MalformedThreshold),
}

impl ReferenceDataError {
    /// True when the data simply does not exist, as opposed to being unreadable.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            ReferenceDataError::UnknownSeries { .. }
                | ReferenceDataError::WeightingNotFound { .. }
                | ReferenceDataError::MissingComponents { .. }
        )
    }
}
