use std::path::Path;

use super::fetch::{dataset_from_raw, decode_dataset};
use super::model::{DataError, RaceDataset, RawRecord};

// ---------------------------------------------------------------------------
// Local copies of the dataset
// ---------------------------------------------------------------------------

/// Load a dataset from a local file, for offline use. Dispatch by extension.
///
/// Supported formats:
/// * `.json` – the wire shape, an array of records as served remotely
/// * `.csv`  – flat export with header `Time,Place,Seconds,Name,Year,Nationality,Doping,URL`
pub fn load_file(path: &Path) -> Result<RaceDataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(DataError::UnsupportedExtension(other.to_string())),
    }
}

fn load_json(path: &Path) -> Result<RaceDataset, DataError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_dataset(&text)
}

fn load_csv(path: &Path) -> Result<RaceDataset, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut raw = Vec::new();
    for result in reader.deserialize::<RawRecord>() {
        raw.push(result?);
    }
    dataset_from_raw(raw)
}
