use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Letter grades offered across the Core and Extended tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A*")]
    AStar,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Grade {
    /// Highest grade first; the order grade resolution scans in.
    pub const fn descending() -> [Self; 8] {
        [
            Self::AStar,
            Self::A,
            Self::B,
            Self::C,
            Self::D,
            Self::E,
            Self::F,
            Self::G,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AStar => "A*",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::descending()
            .into_iter()
            .find(|grade| grade.label() == label.trim())
    }

    /// Position in the ladder where G is 0 and A* is 7.
    pub const fn rank(self) -> u8 {
        match self {
            Self::AStar => 7,
            Self::A => 6,
            Self::B => 5,
            Self::C => 4,
            Self::D => 3,
            Self::E => 2,
            Self::F => 1,
            Self::G => 0,
        }
    }

    /// Grades only awarded on Extended tier papers.
    pub const fn is_extended_only(self) -> bool {
        matches!(self, Self::AStar | Self::A | Self::B)
    }

    /// Interpolation band used by the Extended tier uniform mark scale.
    pub const fn pum_band(self) -> PumBand {
        match self {
            Self::AStar => PumBand::new(11, 90),
            Self::A => PumBand::new(10, 80),
            Self::B => PumBand::new(10, 70),
            Self::C => PumBand::new(10, 60),
            Self::D => PumBand::new(10, 50),
            Self::E => PumBand::new(10, 40),
            Self::F => PumBand::new(10, 30),
            Self::G => PumBand::new(10, 20),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Width and floor of a grade's slice of the 0-100 uniform mark scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumBand {
    pub multiplier: u8,
    pub base: u8,
}

impl PumBand {
    const fn new(multiplier: u8, base: u8) -> Self {
        Self { multiplier, base }
    }
}

/// Result of matching a syllabus total against a threshold set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeOutcome {
    Graded(Grade),
    Ungraded,
}

impl GradeOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Graded(grade) => grade.label(),
            Self::Ungraded => "U",
        }
    }

    pub const fn grade(self) -> Option<Grade> {
        match self {
            Self::Graded(grade) => Some(grade),
            Self::Ungraded => None,
        }
    }
}

impl fmt::Display for GradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for GradeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Paper tier, fixed when a threshold set is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Core,
    Extended,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Extended => "Extended",
        }
    }
}

/// Weighting factor record for one component of a syllabus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeighting {
    #[serde(alias = "Component")]
    pub component_code: String,
    #[serde(alias = "Max Raw Mark", alias = "max_raw")]
    pub max_raw_mark: f64,
    #[serde(alias = "Max Weighted Mark", alias = "max_weighted")]
    pub max_weighted_mark: f64,
    #[serde(alias = "SCWF", alias = "scwf")]
    pub weighting_factor: f64,
}

/// Raw mark as submitted; parsed into a number during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMark {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawMark {
    /// Finite numeric value of the mark, if it has one.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            RawMark::Number(value) => *value,
            RawMark::Text(text) => text.trim().parse::<f64>().ok()?,
            RawMark::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawMark {
    fn from(value: f64) -> Self {
        RawMark::Number(value)
    }
}

impl From<&str> for RawMark {
    fn from(value: &str) -> Self {
        RawMark::Text(value.to_string())
    }
}

/// A validated raw mark paired with the weighting record it was checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkEntry<'a> {
    pub raw_mark: f64,
    pub weighting: &'a ComponentWeighting,
}

impl MarkEntry<'_> {
    pub fn component_code(&self) -> &str {
        &self.weighting.component_code
    }
}

/// Per-component line of the weighted breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedResult {
    pub component_code: String,
    pub raw_mark: f64,
    pub max_raw_mark: f64,
    pub weighting_factor: f64,
    pub weighted_mark: f64,
    pub max_weighted_mark: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_labels_round_trip_through_lookup() {
        for grade in Grade::descending() {
            assert_eq!(Grade::from_label(grade.label()), Some(grade));
        }
        assert_eq!(Grade::from_label(" A* "), Some(Grade::AStar));
        assert_eq!(Grade::from_label("U"), None);
        assert_eq!(Grade::from_label("a"), None);
    }

    #[test]
    fn descending_order_matches_rank() {
        let ranks: Vec<u8> = Grade::descending().iter().map(|g| g.rank()).collect();
        assert_eq!(ranks, vec![7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn raw_marks_parse_numbers_and_numeric_text() {
        assert_eq!(RawMark::from(36.0).value(), Some(36.0));
        assert_eq!(RawMark::from(" 12.5 ").value(), Some(12.5));
        assert_eq!(RawMark::from("twelve").value(), None);
        assert_eq!(RawMark::from("NaN").value(), None);
        assert_eq!(RawMark::Other(serde_json::Value::Null).value(), None);
    }

    #[test]
    fn raw_marks_deserialize_from_mixed_json() {
        let marks: Vec<RawMark> =
            serde_json::from_str(r#"[36, "54", null, true]"#).expect("marks deserialize");
        assert_eq!(marks[0], RawMark::Number(36.0));
        assert_eq!(marks[1], RawMark::Text("54".to_string()));
        assert!(marks[2].value().is_none());
        assert!(marks[3].value().is_none());
    }

    #[test]
    fn weighting_accepts_legacy_field_names() {
        let weighting: ComponentWeighting = serde_json::from_str(
            r#"{"Component": "21", "Max Raw Mark": 40, "Max Weighted Mark": 30, "SCWF": 0.75}"#,
        )
        .expect("legacy weighting deserializes");
        assert_eq!(weighting.component_code, "21");
        assert_eq!(weighting.max_weighted_mark, 30.0);
        assert_eq!(weighting.weighting_factor, 0.75);
    }

    #[test]
    fn ungraded_outcome_serializes_as_u() {
        let json = serde_json::to_string(&GradeOutcome::Ungraded).expect("serializes");
        assert_eq!(json, "\"U\"");
        let json = serde_json::to_string(&GradeOutcome::Graded(Grade::AStar)).expect("serializes");
        assert_eq!(json, "\"A*\"");
    }
}
