use std::sync::mpsc::{Receiver, TryRecvError};

use crate::data::fetch::FetchResult;
use crate::data::filter::{FilterState, filtered_indices, init_filter_state};
use crate::data::model::RaceDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Fetched dataset (None until the first download or file load completes).
    pub dataset: Option<RaceDataset>,

    /// Doping-status and nationality filter selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Record selected by clicking its mark, shown in the detail card.
    pub selected: Option<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a download or file load is in progress.
    pub loading: bool,

    /// Channel carrying the in-flight download, if any.
    pub pending_fetch: Option<Receiver<FetchResult>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            selected: None,
            status_message: None,
            loading: false,
            pending_fetch: None,
        }
    }
}

impl AppState {
    /// Install a dataset, fully replacing the previous one: filters are
    /// reset to show everything, indices rebuilt, selection and status
    /// cleared. This is the single redraw/replace point.
    pub fn set_dataset(&mut self, dataset: RaceDataset) {
        self.filters = init_filter_state(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.selected = None;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Record a failed load in the status line.
    pub fn set_load_error(&mut self, message: String) {
        log::error!("Failed to load dataset: {message}");
        self.status_message = Some(format!("Error: {message}"));
        self.loading = false;
    }

    /// Track a freshly spawned download. Replaces (and thereby discards)
    /// any download still in flight.
    pub fn begin_fetch(&mut self, rx: Receiver<FetchResult>) {
        self.pending_fetch = Some(rx);
        self.loading = true;
        self.status_message = None;
    }

    /// Poll the in-flight download, installing its result when ready.
    pub fn poll_fetch(&mut self) {
        let Some(rx) = &self.pending_fetch else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(dataset)) => {
                log::info!(
                    "Loaded {} race results across {} nationalities",
                    dataset.len(),
                    dataset.nationalities.len()
                );
                self.pending_fetch = None;
                self.set_dataset(dataset);
            }
            Ok(Err(e)) => {
                self.pending_fetch = None;
                self.set_load_error(e.to_string());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending_fetch = None;
                self.set_load_error("download worker vanished".to_string());
            }
        }
    }

    /// Recompute `visible_indices` after a filter change. A selected record
    /// that is filtered out loses its selection.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
            if let Some(idx) = self.selected {
                if !self.visible_indices.contains(&idx) {
                    self.selected = None;
                }
            }
        }
    }

    /// Toggle a single nationality in the filter.
    pub fn toggle_nationality(&mut self, nationality: &str) {
        if !self.filters.nationalities.remove(nationality) {
            self.filters.nationalities.insert(nationality.to_string());
        }
        self.refilter();
    }

    /// Select all nationalities.
    pub fn select_all_nationalities(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.nationalities = ds.nationalities.clone();
            self.refilter();
        }
    }

    /// Deselect all nationalities.
    pub fn select_no_nationalities(&mut self) {
        self.filters.nationalities.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fetch::decode_dataset;
    use crate::data::model::DataError;
    use std::sync::mpsc;

    fn dataset() -> RaceDataset {
        decode_dataset(
            r#"[
            {"Time": "36:40", "Place": 1, "Seconds": 2200, "Name": "Marco",
             "Year": 1998, "Nationality": "ITA", "Doping": "", "URL": ""},
            {"Time": "36:42", "Place": 2, "Seconds": 2202, "Name": "Jan",
             "Year": 1999, "Nationality": "GER", "Doping": "EPO", "URL": ""}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_set_dataset_twice_is_a_full_replace() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.selected = Some(1);
        state.filters.show_doping = false;
        state.refilter();

        state.set_dataset(dataset());
        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.len(), 2);
        // Exactly one mark per record, filters and selection reset.
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.selected, None);
        assert!(state.filters.show_doping);
        assert!(!state.loading);
    }

    #[test]
    fn test_poll_without_pending_fetch_is_a_noop() {
        let mut state = AppState::default();
        state.poll_fetch();
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_poll_installs_completed_download() {
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();
        state.begin_fetch(rx);
        assert!(state.loading);

        state.poll_fetch();
        assert!(state.dataset.is_none(), "nothing arrived yet");

        tx.send(Ok(dataset())).unwrap();
        state.poll_fetch();
        assert_eq!(state.dataset.as_ref().map(|ds| ds.len()), Some(2));
        assert!(!state.loading);
        assert!(state.pending_fetch.is_none());
    }

    #[test]
    fn test_poll_surfaces_download_error() {
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();
        state.begin_fetch(rx);
        tx.send(Err(DataError::UnsupportedExtension("pdf".to_string())))
            .unwrap();
        state.poll_fetch();
        assert!(state.dataset.is_none());
        assert!(!state.loading);
        let msg = state.status_message.unwrap();
        assert!(msg.contains("unsupported file extension"), "{msg}");
    }

    #[test]
    fn test_filtered_out_selection_is_cleared() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.selected = Some(1);
        state.filters.show_doping = false;
        state.refilter();
        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_nationality_mutators() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.toggle_nationality("GER");
        assert_eq!(state.visible_indices, vec![0]);

        state.select_no_nationalities();
        assert!(state.visible_indices.is_empty());

        state.select_all_nationalities();
        assert_eq!(state.visible_indices, vec![0, 1]);
    }
}
