use super::ReferenceDataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const STANDARD_VERSION: &str = "2019-11..2025-06";

const STANDARD_WEIGHTING_FILES: [(&str, &str); 18] = [
    ("November 2019", "nov19-nov20-syllabus-component-weighting-factors.json"),
    ("March 2020", "nov19-nov20-syllabus-component-weighting-factors.json"),
    ("June 2020", "nov19-nov20-syllabus-component-weighting-factors.json"),
    ("November 2020", "nov19-nov20-syllabus-component-weighting-factors.json"),
    ("March 2021", "mar21-nov21-syllabus-component-weighting-factors.json"),
    ("June 2021", "mar21-nov21-syllabus-component-weighting-factors.json"),
    ("November 2021", "nov21-jul22-syllabus-component-weighting-factors.json"),
    ("March 2022", "nov21-jul22-syllabus-component-weighting-factors.json"),
    ("June 2022", "nov21-jul22-syllabus-component-weighting-factors.json"),
    ("November 2022", "nov22-jul23-syllabus-component-weighting-factors.json"),
    ("March 2023", "mar23-nov23-syllabus-component-weighting-factors.json"),
    ("June 2023", "nov22-jul23-syllabus-component-weighting-factors.json"),
    ("November 2023", "nov23-jul24-syllabus-component-weighting-factors.json"),
    ("March 2024", "nov23-jul24-syllabus-component-weighting-factors.json"),
    ("June 2024", "nov23-jul24-syllabus-component-weighting-factors.json"),
    ("November 2024", "nov24-jul25-syllabus-component-weighting-factors.json"),
    ("March 2025", "nov24-jul25-syllabus-component-weighting-factors.json"),
    ("June 2025", "nov24-jul25-syllabus-component-weighting-factors.json"),
];

const STANDARD_THRESHOLD_FILES: [(&str, &str); 6] = [
    ("0500", "english_thresholds.json"),
    ("0610", "biology_thresholds.json"),
    ("0620", "chemistry_thresholds.json"),
    ("0625", "physics_thresholds.json"),
    ("0580", "math_thresholds.json"),
    ("0478", "computer_thresholds.json"),
];

// Series listed here reuse another series' published data.
const STANDARD_SERIES_ALIASES: [(&str, &str); 1] = [("June 2020", "November 2020")];

/// Versioned map from exam series and subject to the reference files that hold them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceIndex {
    pub version: String,
    #[serde(default)]
    pub weighting_files: BTreeMap<String, String>,
    #[serde(default)]
    pub threshold_files: BTreeMap<String, String>,
    #[serde(default)]
    pub series_aliases: BTreeMap<String, String>,
}

fn owned_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl ReferenceIndex {
    /// Built-in index covering the November 2019 to June 2025 series.
    pub fn standard() -> Self {
        Self {
            version: STANDARD_VERSION.to_string(),
            weighting_files: owned_map(&STANDARD_WEIGHTING_FILES),
            threshold_files: owned_map(&STANDARD_THRESHOLD_FILES),
            series_aliases: owned_map(&STANDARD_SERIES_ALIASES),
        }
    }

    /// Load an index from a JSON document with the same shape as this struct.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ReferenceDataError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Series whose data should be used for `series`.
    pub fn resolve_series<'a>(&'a self, series: &'a str) -> &'a str {
        self.series_aliases
            .get(series)
            .map(String::as_str)
            .unwrap_or(series)
    }

    /// Weighting file for a series, falling back to its alias target's file.
    pub fn weighting_file(&self, series: &str) -> Option<&str> {
        self.weighting_files
            .get(series)
            .or_else(|| self.weighting_files.get(self.resolve_series(series)))
            .map(String::as_str)
    }

    pub fn threshold_file(&self, subject_code: &str) -> Option<&str> {
        self.threshold_files.get(subject_code).map(String::as_str)
    }
}

impl Default for ReferenceIndex {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_index_aliases_june_2020() {
        let index = ReferenceIndex::standard();
        assert_eq!(index.resolve_series("June 2020"), "November 2020");
        assert_eq!(index.resolve_series("June 2021"), "June 2021");
        assert_eq!(
            index.weighting_file("June 2020"),
            index.weighting_file("November 2020")
        );
    }

    #[test]
    fn standard_index_maps_known_subjects() {
        let index = ReferenceIndex::standard();
        assert_eq!(index.threshold_file("0610"), Some("biology_thresholds.json"));
        assert_eq!(index.threshold_file("9999"), None);
        assert_eq!(
            index.weighting_file("March 2023"),
            Some("mar23-nov23-syllabus-component-weighting-factors.json")
        );
        assert_eq!(index.weighting_file("June 2026"), None);
    }

    #[test]
    fn alias_target_supplies_weighting_file_when_series_unlisted() {
        let mut index = ReferenceIndex::standard();
        index
            .series_aliases
            .insert("Specimen".to_string(), "November 2024".to_string());
        assert_eq!(
            index.weighting_file("Specimen"),
            Some("nov24-jul25-syllabus-component-weighting-factors.json")
        );
    }

    #[test]
    fn index_deserializes_with_partial_tables() {
        let index: ReferenceIndex = serde_json::from_str(
            r#"{"version": "fixture", "threshold_files": {"0610": "bio.json"}}"#,
        )
        .expect("index parses");
        assert_eq!(index.version, "fixture");
        assert!(index.weighting_files.is_empty());
        assert_eq!(index.threshold_file("0610"), Some("bio.json"));
    }
}
