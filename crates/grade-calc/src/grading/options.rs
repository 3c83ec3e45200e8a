use super::thresholds::{ThresholdRecord, ThresholdValue};
use serde::Serialize;
use std::collections::BTreeSet;

const COMPONENTS_SUFFIX: &str = "_components";

/// Option whose declared components match the components a student sat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedOption {
    pub code: String,
    pub components: String,
}

/// Why no single option could be selected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionResolutionFailure {
    #[error("Could not auto-detect option from components")]
    NoMatch,
    #[error(
        "Could not auto-detect option from components: {} all match",
        .candidates.join(", ")
    )]
    Ambiguous { candidates: Vec<String> },
}

fn component_set<'a, I>(codes: I) -> BTreeSet<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    codes
        .into_iter()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect()
}

/// Find the option whose component list equals the student's components as a set.
///
/// Subsets and supersets never match. Two distinct options declaring the same set are
/// reported as ambiguous rather than picking one.
pub fn resolve_option(
    components: &[String],
    record: &ThresholdRecord,
) -> Result<DetectedOption, OptionResolutionFailure> {
    let taken = component_set(components.iter().map(String::as_str));

    let mut matches: Vec<DetectedOption> = record
        .iter()
        .filter_map(|(key, value)| {
            let code = key.strip_suffix(COMPONENTS_SUFFIX)?;
            let ThresholdValue::Text(declared) = value else {
                return None;
            };
            let declared_set = component_set(declared.split(','));
            (declared_set == taken).then(|| DetectedOption {
                code: code.to_string(),
                components: declared.clone(),
            })
        })
        .collect();

    match matches.len() {
        0 => Err(OptionResolutionFailure::NoMatch),
        1 => Ok(matches.remove(0)),
        _ => Err(OptionResolutionFailure::Ambiguous {
            candidates: matches.into_iter().map(|option| option.code).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ThresholdRecord {
        [
            ("FX_components", ThresholdValue::Text("21, 41, 61".into())),
            ("FX_A", ThresholdValue::Boundary(70.0)),
            ("FY_components", ThresholdValue::Text("22,42,62".into())),
            ("CX_components", ThresholdValue::Text("12, 32, 62".into())),
        ]
        .into_iter()
        .collect()
    }

    fn codes(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn matches_regardless_of_order() {
        let option = resolve_option(&codes(&["61", "21", "41"]), &record()).expect("match");
        assert_eq!(option.code, "FX");
        assert_eq!(option.components, "21, 41, 61");
    }

    #[test]
    fn trims_declared_and_submitted_codes() {
        let option = resolve_option(&codes(&[" 22", "42 ", "62"]), &record()).expect("match");
        assert_eq!(option.code, "FY");
    }

    #[test]
    fn subset_does_not_match() {
        let err = resolve_option(&codes(&["21", "41"]), &record()).unwrap_err();
        assert_eq!(err, OptionResolutionFailure::NoMatch);
    }

    #[test]
    fn superset_does_not_match() {
        let err = resolve_option(&codes(&["21", "41", "61", "62"]), &record()).unwrap_err();
        assert_eq!(err, OptionResolutionFailure::NoMatch);
    }

    #[test]
    fn duplicate_declarations_are_ambiguous() {
        let mut record = record();
        record
            .0
            .insert("FZ_components".into(), ThresholdValue::Text("41,21,61".into()));

        let err = resolve_option(&codes(&["21", "41", "61"]), &record).unwrap_err();
        assert_eq!(
            err,
            OptionResolutionFailure::Ambiguous {
                candidates: vec!["FX".to_string(), "FZ".to_string()]
            }
        );
    }

    #[test]
    fn failures_describe_why_no_option_was_chosen() {
        assert_eq!(
            OptionResolutionFailure::NoMatch.to_string(),
            "Could not auto-detect option from components"
        );
        let ambiguous = OptionResolutionFailure::Ambiguous {
            candidates: vec!["FX".to_string(), "FZ".to_string()],
        };
        assert_eq!(
            ambiguous.to_string(),
            "Could not auto-detect option from components: FX, FZ all match"
        );
    }

    #[test]
    fn non_text_component_lists_are_ignored() {
        let record: ThresholdRecord = [("FX_components", ThresholdValue::Boundary(21.0))]
            .into_iter()
            .collect();
        assert!(resolve_option(&codes(&["21"]), &record).is_err());
    }
}
