//! Grade and percentage uniform mark (PUM) calculation for weighted IGCSE syllabuses.
//!
//! The `grading` module holds the pure calculation pipeline. Reference data (weighting
//! factors and grade thresholds) is supplied through the `reference` module's provider
//! trait so the pipeline can run against bundled files or caller-supplied fixtures.

pub mod config;
pub mod error;
pub mod grading;
pub mod reference;
pub mod telemetry;
