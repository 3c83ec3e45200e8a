use super::domain::{Grade, GradeOutcome, Tier};
use super::validation::{ValidationError, ValidationIssue};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// One value from a series' flat threshold record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdValue {
    Boundary(f64),
    Text(String),
}

/// Flat threshold data for one exam series and subject, as published.
///
/// Keys take the form `{option}_{grade}` for boundaries and `{option}_components` for the
/// comma-separated component list that defines each option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdRecord(pub BTreeMap<String, ThresholdValue>);

impl ThresholdRecord {
    pub fn get(&self, key: &str) -> Option<&ThresholdValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ThresholdValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, ThresholdValue)> for ThresholdRecord {
    fn from_iter<I: IntoIterator<Item = (K, ThresholdValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

/// A threshold record entry that cannot be used as a grade boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("threshold '{key}' is not a numeric boundary")]
pub struct MalformedThreshold {
    pub key: String,
}

/// Grade boundaries offered for one option, highest grade first.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSet {
    boundaries: Vec<(Grade, f64)>,
    tier: Tier,
}

impl ThresholdSet {
    /// Build a set from boundaries in any order. A repeated grade keeps its last value.
    pub fn from_boundaries<I>(boundaries: I) -> Self
    where
        I: IntoIterator<Item = (Grade, f64)>,
    {
        let mut by_grade: BTreeMap<u8, (Grade, f64)> = BTreeMap::new();
        for (grade, boundary) in boundaries {
            by_grade.insert(grade.rank(), (grade, boundary));
        }

        let boundaries: Vec<(Grade, f64)> = by_grade.into_values().rev().collect();
        let tier = if boundaries.iter().any(|(grade, _)| grade.is_extended_only()) {
            Tier::Extended
        } else {
            Tier::Core
        };

        Self { boundaries, tier }
    }

    /// Extract the boundaries published for `option` from a series record.
    pub fn for_option(record: &ThresholdRecord, option: &str) -> Result<Self, MalformedThreshold> {
        let mut boundaries = Vec::new();
        for grade in Grade::descending() {
            let key = format!("{option}_{}", grade.label());
            match record.get(&key) {
                Some(ThresholdValue::Boundary(value)) => boundaries.push((grade, *value)),
                Some(ThresholdValue::Text(_)) => return Err(MalformedThreshold { key }),
                None => {}
            }
        }
        Ok(Self::from_boundaries(boundaries))
    }

    /// Build a set from caller-supplied `grade label -> boundary` pairs.
    pub fn from_labels(labels: &BTreeMap<String, f64>) -> Result<Self, ValidationError> {
        let mut boundaries = Vec::with_capacity(labels.len());
        let mut issues = Vec::new();

        for (label, boundary) in labels {
            match Grade::from_label(label) {
                Some(grade) => boundaries.push((grade, *boundary)),
                None => issues.push(ValidationIssue::UnknownGrade {
                    label: label.clone(),
                }),
            }
        }

        if boundaries.is_empty() && issues.is_empty() {
            issues.push(ValidationIssue::MissingThresholds);
        }
        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        Ok(Self::from_boundaries(boundaries))
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn boundary(&self, grade: Grade) -> Option<f64> {
        self.boundaries
            .iter()
            .find(|(candidate, _)| *candidate == grade)
            .map(|(_, boundary)| *boundary)
    }

    /// Boundaries from the highest offered grade down.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, f64)> + '_ {
        self.boundaries.iter().copied()
    }

    /// Boundary of the closest grade above `grade` that this set offers.
    pub fn next_higher(&self, grade: Grade) -> Option<(Grade, f64)> {
        self.boundaries
            .iter()
            .rev()
            .find(|(candidate, _)| candidate.rank() > grade.rank())
            .copied()
    }

    /// Highest offered grade whose boundary the total meets, else ungraded.
    pub fn resolve_grade(&self, syllabus_total: i64) -> GradeOutcome {
        let total = syllabus_total as f64;
        self.boundaries
            .iter()
            .find(|(_, boundary)| total >= *boundary)
            .map(|(grade, _)| GradeOutcome::Graded(*grade))
            .unwrap_or(GradeOutcome::Ungraded)
    }
}

impl Serialize for ThresholdSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.boundaries.len()))?;
        for (grade, boundary) in &self.boundaries {
            map.serialize_entry(grade.label(), boundary)?;
        }
        map.end()
    }
}
