use std::collections::BTreeSet;

use super::model::RaceDataset;

// ---------------------------------------------------------------------------
// Filter predicate: doping status and nationality
// ---------------------------------------------------------------------------

/// Which records are visible.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    /// Show riders with no allegation on record.
    pub show_clean: bool,
    /// Show riders with a doping allegation.
    pub show_doping: bool,
    /// Selected nationalities. An empty set hides everything.
    pub nationalities: BTreeSet<String>,
}

/// Initialise a [`FilterState`] with everything visible.
pub fn init_filter_state(dataset: &RaceDataset) -> FilterState {
    FilterState {
        show_clean: true,
        show_doping: true,
        nationalities: dataset.nationalities.clone(),
    }
}

/// Return indices of records that pass all active filters.
///
/// A record passes when:
/// * its doping flag matches an enabled status toggle, and
/// * its nationality is in the selected set.
pub fn filtered_indices(dataset: &RaceDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            let status_visible = if rec.doping_flag() {
                filters.show_doping
            } else {
                filters.show_clean
            };
            status_visible && filters.nationalities.contains(&rec.nationality)
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RaceRecord, RaceTime, RawRecord};

    fn dataset() -> RaceDataset {
        let rows = [
            ("Marco", 1998, "36:40", "ITA", ""),
            ("Jan", 1999, "36:42", "GER", "EPO"),
            ("Lance", 2001, "38:01", "USA", "Lifetime ban"),
        ];
        let records = rows
            .iter()
            .map(|&(name, year, time, nat, doping)| {
                RaceRecord::from_raw(RawRecord {
                    time: time.to_string(),
                    place: 1,
                    seconds: time.parse::<RaceTime>().unwrap().total_seconds(),
                    name: name.to_string(),
                    year,
                    nationality: nat.to_string(),
                    doping: doping.to_string(),
                    url: String::new(),
                })
                .unwrap()
            })
            .collect();
        RaceDataset::from_records(records)
    }

    #[test]
    fn test_initial_state_shows_everything() {
        let ds = dataset();
        let filters = init_filter_state(&ds);
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn test_doping_toggles() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);

        filters.show_doping = false;
        assert_eq!(filtered_indices(&ds, &filters), vec![0]);

        filters.show_doping = true;
        filters.show_clean = false;
        assert_eq!(filtered_indices(&ds, &filters), vec![1, 2]);
    }

    #[test]
    fn test_nationality_subset() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.nationalities.remove("GER");
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 2]);
    }

    #[test]
    fn test_empty_nationality_selection_hides_all() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.nationalities.clear();
        assert!(filtered_indices(&ds, &filters).is_empty());
    }
}
