use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// RawRecord – one row of the remote dataset, exactly as served
// ---------------------------------------------------------------------------

/// One cyclist's race result in the wire shape. Field names are
/// case-sensitive and match the remote JSON (and the CSV export headers).
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Place")]
    pub place: u32,
    #[serde(rename = "Seconds")]
    pub seconds: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Nationality")]
    pub nationality: String,
    #[serde(rename = "Doping")]
    pub doping: String,
    #[serde(rename = "URL")]
    pub url: String,
}

// ---------------------------------------------------------------------------
// RaceTime – a duration parsed from "mm:ss"
// ---------------------------------------------------------------------------

/// A race duration in minutes and seconds. Minutes may exceed 59
/// (the record book does not care about hours), seconds may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RaceTime {
    minutes: u32,
    seconds: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("'{0}' is not a mm:ss time")]
    Malformed(String),
    #[error("'{value}': seconds field is {seconds}, must be below 60")]
    SecondsOutOfRange { value: String, seconds: u32 },
}

impl FromStr for RaceTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeParseError::Malformed(s.to_string());
        let (minutes, seconds) = s.split_once(':').ok_or_else(malformed)?;
        let minutes: u32 = minutes.trim().parse().map_err(|_| malformed())?;
        let seconds: u32 = seconds.trim().parse().map_err(|_| malformed())?;
        if seconds >= 60 {
            return Err(TimeParseError::SecondsOutOfRange {
                value: s.to_string(),
                seconds,
            });
        }
        Ok(RaceTime { minutes, seconds })
    }
}

impl fmt::Display for RaceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl RaceTime {
    pub fn total_seconds(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }

    /// Projection onto the reference date used by the time axis.
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::UNIX_EPOCH + Duration::seconds(i64::from(self.total_seconds()))
    }

    /// ISO-8601 rendering of [`Self::timestamp`],
    /// e.g. `1970-01-01T00:36:40.000Z`.
    pub fn iso_timestamp(&self) -> String {
        self.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Label for a time-axis tick (seconds since the reference date), `MM:SS`.
/// Tick values outside the reference day produce no label.
pub fn format_seconds_tick(value: f64) -> String {
    if !value.is_finite() || !(0.0..86_400.0).contains(&value) {
        return String::new();
    }
    let ts = DateTime::UNIX_EPOCH + Duration::seconds(value.round() as i64);
    ts.format("%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// RaceRecord – one validated race result
// ---------------------------------------------------------------------------

/// One validated race result, ready for plotting.
#[derive(Debug, Clone)]
pub struct RaceRecord {
    pub name: String,
    pub nationality: String,
    pub year: i32,
    pub time: RaceTime,
    pub place: u32,
    /// Free-text allegation; empty means none on record.
    pub doping: String,
    /// Reference link; empty when the dataset has none.
    pub url: String,
}

impl RaceRecord {
    /// Validate a wire record. The parsed `Time` is authoritative; a
    /// disagreeing `Seconds` field is logged and ignored.
    pub fn from_raw(raw: RawRecord) -> Result<Self, TimeParseError> {
        let time: RaceTime = raw.time.parse()?;
        if time.total_seconds() != raw.seconds {
            log::warn!(
                "{} ({}): Seconds field {} disagrees with Time {time}",
                raw.name,
                raw.year,
                raw.seconds
            );
        }
        Ok(RaceRecord {
            name: raw.name,
            nationality: raw.nationality,
            year: raw.year,
            time,
            place: raw.place,
            doping: raw.doping,
            url: raw.url,
        })
    }

    /// True when the record carries a doping allegation.
    pub fn doping_flag(&self) -> bool {
        !self.doping.is_empty()
    }

    /// Allegation text for the tooltip and detail card.
    pub fn doping_text(&self) -> &str {
        if self.doping.is_empty() {
            "No doping allegations"
        } else {
            &self.doping
        }
    }
}

// ---------------------------------------------------------------------------
// RaceDataset – the complete fetched dataset
// ---------------------------------------------------------------------------

/// The full dataset with pre-computed axis bounds and nationality index.
/// Immutable once built; a reload replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct RaceDataset {
    /// All records, in dataset order.
    pub records: Vec<RaceRecord>,
    /// Sorted set of nationalities appearing in the records.
    pub nationalities: BTreeSet<String>,
    year_bounds: (f64, f64),
    time_bounds: (f64, f64),
}

impl RaceDataset {
    /// Build the indices and axis bounds from validated records.
    pub fn from_records(records: Vec<RaceRecord>) -> Self {
        let mut nationalities = BTreeSet::new();
        let mut year_min = i32::MAX;
        let mut year_max = i32::MIN;
        let mut secs_min = u32::MAX;
        let mut secs_max = u32::MIN;

        for rec in &records {
            nationalities.insert(rec.nationality.clone());
            year_min = year_min.min(rec.year);
            year_max = year_max.max(rec.year);
            secs_min = secs_min.min(rec.time.total_seconds());
            secs_max = secs_max.max(rec.time.total_seconds());
        }

        let (year_bounds, time_bounds) = if records.is_empty() {
            ((0.0, 0.0), (0.0, 0.0))
        } else {
            (
                // Pad the year axis by one year on each side.
                (f64::from(year_min) - 1.0, f64::from(year_max) + 1.0),
                (f64::from(secs_min), f64::from(secs_max)),
            )
        };

        RaceDataset {
            records,
            nationalities,
            year_bounds,
            time_bounds,
        }
    }

    /// Year-axis domain, padded by one year on each side.
    pub fn year_bounds(&self) -> (f64, f64) {
        self.year_bounds
    }

    /// Time-axis domain in seconds, fastest to slowest ascent.
    pub fn time_bounds(&self) -> (f64, f64) {
        self.time_bounds
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DataError – everything that can go wrong between the wire and the plot
// ---------------------------------------------------------------------------

/// Failures while obtaining or decoding a dataset. Messages are
/// self-contained so the UI status line can show them verbatim.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("downloading dataset: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decoding dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        source: TimeParseError,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, time: &str, doping: &str) -> RaceRecord {
        let parsed: RaceTime = time.parse().unwrap();
        RaceRecord::from_raw(RawRecord {
            time: time.to_string(),
            place: 1,
            seconds: parsed.total_seconds(),
            name: "Rider".to_string(),
            year,
            nationality: "ITA".to_string(),
            doping: doping.to_string(),
            url: String::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_parse_time() {
        let t: RaceTime = "36:40".parse().unwrap();
        assert_eq!(t.total_seconds(), 2200);
        assert_eq!(t.to_string(), "36:40");
    }

    #[test]
    fn test_parse_time_minutes_over_59() {
        let t: RaceTime = "75:03".parse().unwrap();
        assert_eq!(t.total_seconds(), 75 * 60 + 3);
        // The projection rolls the excess minutes into hours.
        assert_eq!(t.iso_timestamp(), "1970-01-01T01:15:03.000Z");
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert_eq!(
            "36".parse::<RaceTime>(),
            Err(TimeParseError::Malformed("36".to_string()))
        );
        assert_eq!(
            "ab:cd".parse::<RaceTime>(),
            Err(TimeParseError::Malformed("ab:cd".to_string()))
        );
        assert_eq!(
            "36:72".parse::<RaceTime>(),
            Err(TimeParseError::SecondsOutOfRange {
                value: "36:72".to_string(),
                seconds: 72,
            })
        );
    }

    #[test]
    fn test_iso_timestamp_matches_reference_date() {
        let t: RaceTime = "36:40".parse().unwrap();
        assert_eq!(t.iso_timestamp(), "1970-01-01T00:36:40.000Z");
    }

    #[test]
    fn test_format_seconds_tick() {
        assert_eq!(format_seconds_tick(2200.0), "36:40");
        assert_eq!(format_seconds_tick(2195.0), "36:35");
        // Minutes wrap at the hour, matching the %M:%S axis format.
        assert_eq!(format_seconds_tick(3725.0), "02:05");
        // Defensive branch: values off the reference day get no label.
        assert_eq!(format_seconds_tick(-5.0), "");
        assert_eq!(format_seconds_tick(f64::NAN), "");
        assert_eq!(format_seconds_tick(1e9), "");
    }

    #[test]
    fn test_doping_flag_and_text() {
        let clean = record(1998, "36:40", "");
        assert!(!clean.doping_flag());
        assert_eq!(clean.doping_text(), "No doping allegations");

        let flagged = record(1999, "36:42", "EPO");
        assert!(flagged.doping_flag());
        assert_eq!(flagged.doping_text(), "EPO");
    }

    #[test]
    fn test_from_raw_rejects_bad_time() {
        let err = RaceRecord::from_raw(RawRecord {
            time: "bogus".to_string(),
            place: 1,
            seconds: 0,
            name: "Rider".to_string(),
            year: 2000,
            nationality: "FRA".to_string(),
            doping: String::new(),
            url: String::new(),
        })
        .unwrap_err();
        assert_eq!(err, TimeParseError::Malformed("bogus".to_string()));
    }

    #[test]
    fn test_dataset_bounds_are_padded_years_and_exact_times() {
        let ds = RaceDataset::from_records(vec![
            record(1998, "36:40", ""),
            record(1999, "36:42", "EPO"),
            record(1994, "37:15", ""),
        ]);
        assert_eq!(ds.year_bounds(), (1993.0, 2000.0));
        assert_eq!(ds.time_bounds(), (2200.0, 2235.0));
        assert_eq!(ds.nationalities.len(), 1);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = RaceDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.year_bounds(), (0.0, 0.0));
        assert_eq!(ds.time_bounds(), (0.0, 0.0));
    }
}
