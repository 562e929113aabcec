//! Patient record models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One dated clinical episode from the patient-episode table.
///
/// Extra columns (e.g. `diagnosis`) are ignored during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    /// Patient identifier as written in the table
    pub patient_id: String,
    /// Raw date text; parsed lazily since malformed values are tolerated
    pub date: String,
    /// Medication leaflet reference
    #[serde(rename = "medicine_leaflet")]
    pub leaflet_ref: String,
}

impl Episode {
    /// Parse the episode date, returning `None` when it is not a recognised format.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        crate::store::parse_episode_date(&self.date)
    }

    /// Whether this episode belongs to the given (already normalized) patient id.
    pub fn belongs_to(&self, patient_id: &str) -> bool {
        normalize_id(&self.patient_id) == patient_id
    }
}

/// Known side effects for one medication leaflet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeafletSideEffects {
    #[serde(rename = "medicine_leaflet")]
    pub leaflet_ref: String,
    pub side_effects: String,
}

/// Free-text clinical summary for a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    pub patient_id: String,
    pub summary: String,
}

/// Fully resolved facts for one patient, ready for prompt composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedRecord {
    /// Normalized patient identifier
    pub patient_id: String,
    /// Leaflet reference of the latest episode
    pub leaflet_ref: String,
    /// Side-effects text for that leaflet
    pub side_effects: String,
    /// Clinical summary, present when a summary table is configured
    pub summary: Option<String>,
    /// Parsed date of the winning episode (absent if no episode date parsed)
    pub episode_date: Option<NaiveDateTime>,
}

/// Normalize a patient identifier for comparison.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: &str, date: &str) -> Episode {
        Episode {
            patient_id: id.into(),
            date: date.into(),
            leaflet_ref: "Ibuprofen".into(),
        }
    }

    #[test]
    fn test_normalize_id_trims() {
        assert_eq!(normalize_id("  42 "), "42");
        assert_eq!(normalize_id("P-7"), "P-7");
    }

    #[test]
    fn test_belongs_to_ignores_padding() {
        let ep = episode(" 42", "2024-01-01");
        assert!(ep.belongs_to("42"));
        assert!(!ep.belongs_to("420"));
    }

    #[test]
    fn test_parsed_date() {
        assert!(episode("1", "2024-03-05").parsed_date().is_some());
        assert!(episode("1", "not a date").parsed_date().is_none());
    }
}
