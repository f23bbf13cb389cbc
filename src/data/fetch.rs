use std::sync::mpsc::{self, Receiver};
use std::thread;

use eframe::egui;

use super::model::{DataError, RaceDataset, RaceRecord, RawRecord};

// ---------------------------------------------------------------------------
// Remote dataset download
// ---------------------------------------------------------------------------

/// The race results, served as a JSON array of records.
pub const DATA_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/cyclist-data.json";

/// Result of a background download, delivered over a channel.
pub type FetchResult = Result<RaceDataset, DataError>;

/// Decode a JSON document into a validated dataset.
///
/// The body must be an array of wire-shaped records; each record is then
/// validated individually so a failure names the offending row.
pub fn decode_dataset(body: &str) -> FetchResult {
    let raw: Vec<RawRecord> = serde_json::from_str(body)?;
    dataset_from_raw(raw)
}

/// Validate wire records into a [`RaceDataset`].
pub(super) fn dataset_from_raw(raw: Vec<RawRecord>) -> FetchResult {
    let mut records = Vec::with_capacity(raw.len());
    for (index, rec) in raw.into_iter().enumerate() {
        let rec =
            RaceRecord::from_raw(rec).map_err(|source| DataError::Record { index, source })?;
        records.push(rec);
    }
    Ok(RaceDataset::from_records(records))
}

/// Download and decode the dataset, blocking the calling thread.
pub fn fetch_dataset(url: &str) -> FetchResult {
    log::info!("Fetching race results from {url}");
    let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    decode_dataset(&body)
}

/// Download on a worker thread; the result arrives on the returned channel.
/// A repaint is requested on completion so the UI picks it up promptly.
pub fn spawn_fetch(url: String, ctx: egui::Context) -> Receiver<FetchResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = fetch_dataset(&url);
        if tx.send(result).is_err() {
            // A newer download replaced this one; drop the result.
            log::debug!("Discarding superseded download of {url}");
        }
        ctx.request_repaint();
    });
    rx
}
