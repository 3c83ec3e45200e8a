use super::{ReferenceDataError, ReferenceDataProvider, ReferenceIndex};
use crate::config::ReferenceConfig;
use crate::grading::{ComponentWeighting, ThresholdRecord};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

const WEIGHTING_DIR: &str = "scwf";
const THRESHOLD_DIR: &str = "thresholds";

#[derive(Debug, Deserialize)]
struct WeightingEntry {
    max_raw: f64,
    max_weighted: f64,
    scwf: f64,
}

/// series -> subject -> component -> weighting; entries are decoded on lookup.
type WeightingFile = BTreeMap<String, BTreeMap<String, BTreeMap<String, serde_json::Value>>>;
/// series -> flat threshold record
type ThresholdFile = BTreeMap<String, ThresholdRecord>;

type FileCache<T> = RwLock<HashMap<PathBuf, Arc<T>>>;

/// Reference data read from JSON files under a root directory.
///
/// Parsed files are cached for the life of the provider; the files are treated as
/// immutable once published.
pub struct FileReferenceData {
    root: PathBuf,
    index: ReferenceIndex,
    weightings: FileCache<WeightingFile>,
    thresholds: FileCache<ThresholdFile>,
}

impl FileReferenceData {
    pub fn new<P: Into<PathBuf>>(root: P, index: ReferenceIndex) -> Self {
        Self {
            root: root.into(),
            index,
            weightings: RwLock::new(HashMap::new()),
            thresholds: RwLock::new(HashMap::new()),
        }
    }

    /// Provider for the configured data directory, loading a custom index when one is set.
    pub fn from_config(config: &ReferenceConfig) -> Result<Self, ReferenceDataError> {
        let index = match &config.index_path {
            Some(path) => ReferenceIndex::from_path(path)?,
            None => ReferenceIndex::standard(),
        };
        info!(
            data_dir = %config.data_dir.display(),
            index_version = %index.version,
            "reference data configured"
        );
        Ok(Self::new(config.data_dir.clone(), index))
    }

    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }
}

fn load_cached<T: DeserializeOwned>(
    cache: &FileCache<T>,
    path: &Path,
) -> Result<Option<Arc<T>>, ReferenceDataError> {
    if let Some(hit) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(path)
    {
        return Ok(Some(Arc::clone(hit)));
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "reference file not found");
            return Ok(None);
        }
        Err(source) => {
            return Err(ReferenceDataError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let parsed: T =
        serde_json::from_str(&contents).map_err(|source| ReferenceDataError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    let parsed = Arc::new(parsed);

    cache
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(path.to_path_buf(), Arc::clone(&parsed));
    debug!(path = %path.display(), "loaded reference file");

    Ok(Some(parsed))
}

impl ReferenceDataProvider for FileReferenceData {
    fn lookup_weighting(
        &self,
        exam_series: &str,
        subject_code: &str,
        component_codes: &[String],
    ) -> Result<Vec<ComponentWeighting>, ReferenceDataError> {
        let file_name =
            self.index
                .weighting_file(exam_series)
                .ok_or_else(|| ReferenceDataError::UnknownSeries {
                    series: exam_series.to_string(),
                })?;
        let path = self.root.join(WEIGHTING_DIR).join(file_name);
        let Some(file) = load_cached(&self.weightings, &path)? else {
            return Ok(Vec::new());
        };

        let series = self.index.resolve_series(exam_series);
        let Some(subject) = file.get(series).and_then(|subjects| subjects.get(subject_code))
        else {
            debug!(series, subject_code, "no weighting data for subject");
            return Ok(Vec::new());
        };

        let mut weightings = Vec::with_capacity(component_codes.len());
        for code in component_codes {
            let Some(raw) = subject.get(code) else {
                continue;
            };
            let entry = WeightingEntry::deserialize(raw).map_err(|source| {
                ReferenceDataError::Malformed {
                    path: path.clone(),
                    source,
                }
            })?;
            weightings.push(ComponentWeighting {
                component_code: code.clone(),
                max_raw_mark: entry.max_raw,
                max_weighted_mark: entry.max_weighted,
                weighting_factor: entry.scwf,
            });
        }

        Ok(weightings)
    }

    fn lookup_thresholds(
        &self,
        exam_series: &str,
        subject_code: &str,
    ) -> Result<Option<ThresholdRecord>, ReferenceDataError> {
        let Some(file_name) = self.index.threshold_file(subject_code) else {
            return Ok(None);
        };
        let path = self.root.join(THRESHOLD_DIR).join(file_name);
        let Some(file) = load_cached(&self.thresholds, &path)? else {
            return Ok(None);
        };

        let series = self.index.resolve_series(exam_series);
        Ok(file.get(series).cloned())
    }
}
