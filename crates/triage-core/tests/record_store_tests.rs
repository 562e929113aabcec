//! Record store integration tests.
//!
//! These tests write real CSV tables to a temporary directory and exercise
//! the full lookup path.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use triage_core::store::{CsvRecordStore, RecordLookup, StoreConfig, StoreError};

const EPISODES: &str = "\
patient_id,diagnosis,date,medicine_leaflet
42,Hypertension,2022-04-01,Lisinopril
42,Arthritis,2024-02-15,Ibuprofen
42,Migraine,not-a-date,Sumatriptan
7,Diabetes,2023-09-30,Metformin
 9 ,Asthma,2021-01-01,Salbutamol
";

const LEAFLETS: &str = "\
medicine_leaflet,side_effects
Lisinopril,\"dry cough, dizziness, headache\"
Ibuprofen,\"nausea, heartburn, stomach pain\"
Sumatriptan,\"tingling, flushing\"
Metformin,\"diarrhoea, nausea, metallic taste\"
Salbutamol,\"tremor, palpitations\"
";

const SUMMARIES: &str = "\
patient_id,summary
42,\"68-year-old, hypertensive, on NSAIDs for knee arthritis\"
7,\"Type 2 diabetic, otherwise well\"
9,\"Mild intermittent asthma\"
";

struct Fixture {
    _dir: TempDir,
    episodes: PathBuf,
    leaflets: PathBuf,
    summaries: PathBuf,
}

fn fixture(episodes: &str, leaflets: &str, summaries: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let paths = (
        dir.path().join("episodes.csv"),
        dir.path().join("leaflets.csv"),
        dir.path().join("summaries.csv"),
    );
    fs::write(&paths.0, episodes).unwrap();
    fs::write(&paths.1, leaflets).unwrap();
    fs::write(&paths.2, summaries).unwrap();
    Fixture {
        _dir: dir,
        episodes: paths.0,
        leaflets: paths.1,
        summaries: paths.2,
    }
}

fn store(f: &Fixture) -> CsvRecordStore {
    CsvRecordStore::new(StoreConfig::new(&f.episodes, &f.leaflets).with_summaries(&f.summaries))
}

#[test]
fn test_lookup_resolves_latest_episode() {
    let f = fixture(EPISODES, LEAFLETS, SUMMARIES);
    let record = store(&f).lookup("42").unwrap();

    assert_eq!(record.patient_id, "42");
    assert_eq!(record.leaflet_ref, "Ibuprofen");
    assert_eq!(record.side_effects, "nausea, heartburn, stomach pain");
    assert_eq!(
        record.summary.as_deref(),
        Some("68-year-old, hypertensive, on NSAIDs for knee arthritis")
    );
    assert_eq!(
        record.episode_date.map(|d| d.date().to_string()),
        Some("2024-02-15".to_string())
    );
}

#[test]
fn test_unknown_patient_is_not_found() {
    let f = fixture(EPISODES, LEAFLETS, SUMMARIES);
    let store = store(&f);

    for id in ["1", "4", "420", "P42", ""] {
        let err = store.lookup(id).unwrap_err();
        assert!(err.is_not_found(), "expected not found for {:?}, got {}", id, err);
    }
}

#[test]
fn test_ids_are_whitespace_normalized() {
    let f = fixture(EPISODES, LEAFLETS, SUMMARIES);
    let store = store(&f);

    assert_eq!(store.lookup(" 42 ").unwrap().leaflet_ref, "Ibuprofen");
    assert_eq!(store.lookup("9").unwrap().leaflet_ref, "Salbutamol");
}

#[test]
fn test_without_summary_table() {
    let f = fixture(EPISODES, LEAFLETS, SUMMARIES);
    let store = CsvRecordStore::new(StoreConfig::new(&f.episodes, &f.leaflets));

    let record = store.lookup("7").unwrap();
    assert_eq!(record.leaflet_ref, "Metformin");
    assert!(record.summary.is_none());
}

#[test]
fn test_missing_leaflet_is_data_error() {
    let f = fixture(
        "patient_id,date,medicine_leaflet\n5,2024-01-01,Unlisted\n",
        LEAFLETS,
        SUMMARIES,
    );
    let err = store(&f).lookup("5").unwrap_err();
    assert!(matches!(err, StoreError::MissingLeaflet { .. }));
}

#[test]
fn test_padded_leaflet_cell_is_trimmed() {
    let f = fixture(
        "patient_id,date,medicine_leaflet\n7,2024-01-01,  Metformin \n",
        LEAFLETS,
        SUMMARIES,
    );
    let record = store(&f).lookup("7").unwrap();
    assert_eq!(record.leaflet_ref, "Metformin");
    assert_eq!(record.side_effects, "diarrhoea, nausea, metallic taste");
}

#[test]
fn test_missing_summary_is_data_error() {
    let f = fixture(
        "patient_id,date,medicine_leaflet\n5,2024-01-01,Ibuprofen\n",
        LEAFLETS,
        SUMMARIES,
    );
    let err = store(&f).lookup("5").unwrap_err();
    assert!(matches!(err, StoreError::MissingSummary(ref id) if id == "5"));
}

#[test]
fn test_schema_mismatch_is_data_error() {
    let f = fixture(
        "id,when,drug\n42,2024-01-01,Ibuprofen\n",
        LEAFLETS,
        SUMMARIES,
    );
    let err = store(&f).lookup("42").unwrap_err();
    assert!(matches!(err, StoreError::Csv { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn test_only_invalid_dates_picks_first_row() {
    let f = fixture(
        "patient_id,date,medicine_leaflet\n8,unknown,Metformin\n8,,Ibuprofen\n",
        LEAFLETS,
        SUMMARIES,
    );
    let store = CsvRecordStore::new(StoreConfig::new(&f.episodes, &f.leaflets));
    let record = store.lookup("8").unwrap();
    assert_eq!(record.leaflet_ref, "Metformin");
    assert!(record.episode_date.is_none());
}

#[test]
fn test_semicolon_delimited_tables() {
    let f = fixture(
        "patient_id;date;medicine_leaflet\n3;2020-01-01;Lisinopril\n3;2021-01-01;Metformin\n",
        "medicine_leaflet;side_effects\nMetformin;nausea, bloating\n",
        "patient_id;summary\n3;Recently diagnosed\n",
    );
    let store = CsvRecordStore::new(
        StoreConfig::new(&f.episodes, &f.leaflets)
            .with_summaries(&f.summaries)
            .with_delimiter(b';'),
    );

    let record = store.lookup("3").unwrap();
    assert_eq!(record.side_effects, "nausea, bloating");
    assert_eq!(record.summary.as_deref(), Some("Recently diagnosed"));
}

#[test]
fn test_every_lookup_rereads_tables() {
    let f = fixture(EPISODES, LEAFLETS, SUMMARIES);
    let store = store(&f);
    assert_eq!(store.lookup("7").unwrap().leaflet_ref, "Metformin");

    let updated = format!("{}7,Neuropathy,2025-01-01,Ibuprofen\n", EPISODES);
    fs::write(&f.episodes, updated).unwrap();
    assert_eq!(store.lookup("7").unwrap().leaflet_ref, "Ibuprofen");
}

#[test]
fn test_lookup_does_not_modify_tables() {
    let f = fixture(EPISODES, LEAFLETS, SUMMARIES);
    store(&f).lookup("42").unwrap();

    assert_eq!(fs::read_to_string(&f.episodes).unwrap(), EPISODES);
    assert_eq!(fs::read_to_string(&f.leaflets).unwrap(), LEAFLETS);
    assert_eq!(fs::read_to_string(&f.summaries).unwrap(), SUMMARIES);
}
