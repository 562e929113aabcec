//! Typed CSV table reading.

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::{StoreError, StoreResult};

/// Read every row of a headed table into `T`.
///
/// Columns are matched by header name, so column order does not matter and
/// unknown columns are ignored. A missing required column fails the whole read.
pub fn read_table<T: DeserializeOwned>(path: &Path, delimiter: u8) -> StoreResult<Vec<T>> {
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Episode, LeafletSideEffects};
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_episodes_ignores_extra_columns() {
        let file = write_temp(
            "patient_id,diagnosis,date,medicine_leaflet\n\
             42,Hypertension,2024-01-10,Lisinopril\n\
             7,Arthritis,2023-05-02,Ibuprofen\n",
        );
        let rows: Vec<Episode> = read_table(file.path(), b',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].patient_id, "42");
        assert_eq!(rows[0].leaflet_ref, "Lisinopril");
        assert_eq!(rows[1].date, "2023-05-02");
    }

    #[test]
    fn test_read_with_custom_delimiter() {
        let file = write_temp(
            "medicine_leaflet;side_effects\nIbuprofen;nausea, heartburn, dizziness\n",
        );
        let rows: Vec<LeafletSideEffects> = read_table(file.path(), b';').unwrap();
        assert_eq!(rows[0].side_effects, "nausea, heartburn, dizziness");
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let file = write_temp("patient_id,medicine_leaflet\n42,Lisinopril\n");
        let result: StoreResult<Vec<Episode>> = read_table(file.path(), b',');
        assert!(matches!(result, Err(StoreError::Csv { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result: StoreResult<Vec<Episode>> =
            read_table(Path::new("/definitely/not/here.csv"), b',');
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
