use super::domain::{ComponentWeighting, MarkEntry, RawMark};

/// A single problem found while checking submitted marks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("Component {component}: Invalid mark value")]
    InvalidMark { component: String },
    #[error("Component {component}: Mark cannot be negative")]
    NegativeMark { component: String },
    #[error("Component {component}: Mark {mark} exceeds maximum of {maximum}")]
    ExceedsMaximum {
        component: String,
        mark: f64,
        maximum: f64,
    },
    #[error("Expected {components} raw mark(s) but received {marks}")]
    CountMismatch { marks: usize, components: usize },
    #[error("At least one grade threshold is required")]
    MissingThresholds,
    #[error("Unknown grade '{label}' in thresholds")]
    UnknownGrade { label: String },
}

/// Every issue found in a request, reported together.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn single(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Check raw marks against the index-aligned weighting records.
///
/// All components are checked before returning so the caller sees every problem at once.
pub fn validate_marks<'a>(
    raw_marks: &[RawMark],
    weightings: &'a [ComponentWeighting],
) -> Result<Vec<MarkEntry<'a>>, ValidationError> {
    if raw_marks.len() != weightings.len() {
        return Err(ValidationError::single(ValidationIssue::CountMismatch {
            marks: raw_marks.len(),
            components: weightings.len(),
        }));
    }

    let mut entries = Vec::with_capacity(weightings.len());
    let mut issues = Vec::new();

    for (mark, weighting) in raw_marks.iter().zip(weightings) {
        let component = weighting.component_code.clone();
        let Some(value) = mark.value() else {
            issues.push(ValidationIssue::InvalidMark { component });
            continue;
        };

        if value < 0.0 {
            issues.push(ValidationIssue::NegativeMark { component });
        } else if value > weighting.max_raw_mark {
            issues.push(ValidationIssue::ExceedsMaximum {
                component,
                mark: value,
                maximum: weighting.max_raw_mark,
            });
        } else {
            entries.push(MarkEntry {
                raw_mark: value,
                weighting,
            });
        }
    }

    if issues.is_empty() {
        Ok(entries)
    } else {
        Err(ValidationError { issues })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighting(code: &str, max_raw: f64) -> ComponentWeighting {
        ComponentWeighting {
            component_code: code.to_string(),
            max_raw_mark: max_raw,
            max_weighted_mark: max_raw,
            weighting_factor: 1.0,
        }
    }

    #[test]
    fn accepts_marks_within_range() {
        let weightings = vec![weighting("21", 40.0), weighting("41", 80.0)];
        let marks = vec![RawMark::from(0.0), RawMark::from("80")];

        let entries = validate_marks(&marks, &weightings).expect("marks are valid");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].raw_mark, 80.0);
        assert_eq!(entries[1].component_code(), "41");
    }

    #[test]
    fn negative_mark_names_the_component() {
        let weightings = vec![weighting("21", 40.0)];
        let err = validate_marks(&[RawMark::from(-1.0)], &weightings).unwrap_err();

        assert_eq!(err.to_string(), "Component 21: Mark cannot be negative");
    }

    #[test]
    fn exceeding_mark_names_component_and_limit() {
        let weightings = vec![weighting("41", 80.0)];
        let err = validate_marks(&[RawMark::from(81.0)], &weightings).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Component 41: Mark 81 exceeds maximum of 80"
        );
    }

    #[test]
    fn collects_every_failing_component() {
        let weightings = vec![
            weighting("21", 40.0),
            weighting("41", 80.0),
            weighting("61", 40.0),
        ];
        let marks = vec![
            RawMark::from("abc"),
            RawMark::from(20.0),
            RawMark::from(41.5),
        ];

        let err = validate_marks(&marks, &weightings).unwrap_err();

        assert_eq!(err.issues.len(), 2);
        assert_eq!(
            err.to_string(),
            "Component 21: Invalid mark value | Component 61: Mark 41.5 exceeds maximum of 40"
        );
    }

    #[test]
    fn rejects_misaligned_mark_count() {
        let weightings = vec![weighting("21", 40.0), weighting("41", 80.0)];
        let err = validate_marks(&[RawMark::from(10.0)], &weightings).unwrap_err();

        assert_eq!(
            err.issues,
            vec![ValidationIssue::CountMismatch {
                marks: 1,
                components: 2
            }]
        );
    }
}
