//! Flat-file record store.
//!
//! Every lookup re-reads the configured tables from disk; nothing is cached
//! between calls and the source files are never written.

mod latest;
mod tables;

pub use latest::*;
pub use tables::*;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::models::{normalize_id, Episode, LeafletSideEffects, PatientSummary, ResolvedRecord};

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Leaflet '{leaflet}' for patient {patient_id} has no side-effects entry")]
    MissingLeaflet { patient_id: String, leaflet: String },

    #[error("Patient {0} has no summary entry")]
    MissingSummary(String),
}

impl StoreError {
    /// Whether this is a definitive "not found" rather than a data problem.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::PatientNotFound(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Anything that can resolve a patient id to its latest medication facts.
pub trait RecordLookup {
    fn lookup(&self, patient_id: &str) -> StoreResult<ResolvedRecord>;
}

/// Locations and format of the three source tables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub episodes_path: PathBuf,
    pub leaflets_path: PathBuf,
    pub summaries_path: Option<PathBuf>,
    pub delimiter: u8,
}

impl StoreConfig {
    /// Comma-delimited tables with no summary table.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(episodes: P, leaflets: Q) -> Self {
        Self {
            episodes_path: episodes.as_ref().to_path_buf(),
            leaflets_path: leaflets.as_ref().to_path_buf(),
            summaries_path: None,
            delimiter: b',',
        }
    }

    pub fn with_summaries<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.summaries_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// CSV-backed record store.
pub struct CsvRecordStore {
    config: StoreConfig,
}

impl CsvRecordStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// All episodes for a patient, in table order.
    pub fn episodes_for(&self, patient_id: &str) -> StoreResult<Vec<Episode>> {
        let id = normalize_id(patient_id);
        let episodes: Vec<Episode> =
            read_table(&self.config.episodes_path, self.config.delimiter)?;
        Ok(episodes.into_iter().filter(|e| e.belongs_to(&id)).collect())
    }

    fn side_effects_for(&self, patient_id: &str, leaflet: &str) -> StoreResult<String> {
        let leaflets: Vec<LeafletSideEffects> =
            read_table(&self.config.leaflets_path, self.config.delimiter)?;
        leaflets
            .into_iter()
            .find(|l| l.leaflet_ref.trim() == leaflet.trim())
            .map(|l| l.side_effects)
            .ok_or_else(|| StoreError::MissingLeaflet {
                patient_id: patient_id.to_string(),
                leaflet: leaflet.to_string(),
            })
    }

    fn summary_for(&self, patient_id: &str) -> StoreResult<Option<String>> {
        let Some(path) = &self.config.summaries_path else {
            return Ok(None);
        };
        let summaries: Vec<PatientSummary> = read_table(path, self.config.delimiter)?;
        summaries
            .into_iter()
            .find(|s| normalize_id(&s.patient_id) == patient_id)
            .map(|s| Some(s.summary))
            .ok_or_else(|| StoreError::MissingSummary(patient_id.to_string()))
    }
}

impl RecordLookup for CsvRecordStore {
    fn lookup(&self, patient_id: &str) -> StoreResult<ResolvedRecord> {
        let id = normalize_id(patient_id);
        let episodes = self.episodes_for(&id)?;

        let latest = select_latest(&episodes)
            .ok_or_else(|| StoreError::PatientNotFound(id.clone()))?;
        debug!(
            patient_id = %id,
            episodes = episodes.len(),
            leaflet = %latest.leaflet_ref,
            date = %latest.date,
            "Selected latest episode"
        );

        let side_effects = self.side_effects_for(&id, &latest.leaflet_ref)?;
        let summary = self.summary_for(&id)?;

        Ok(ResolvedRecord {
            patient_id: id,
            leaflet_ref: latest.leaflet_ref.trim().to_string(),
            side_effects,
            summary,
            episode_date: latest.parsed_date(),
        })
    }
}
