//! Earnings observation data structures
//!
//! Core data structures for one earnings-week recording: the predicted (MMM)
//! vs. actual move ratio and the post-earnings IV percentile crush.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Column header for the earnings date.
pub const COL_DATE: &str = "Earnings Date";
/// Column header for the ticker symbol.
pub const COL_TICKER: &str = "Ticker";
/// Column header for the actual-to-expected move ratio.
pub const COL_MOVE_RATIO: &str = "Actual:Expected Move Open";
/// Column header for the IV percentile crush rank.
pub const COL_CRUSH_RANK: &str = "IV Crush Rank";

/// Date formats accepted for the earnings date column.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Single earnings observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Earnings report date
    pub date: NaiveDate,
    /// Ticker symbol
    pub ticker: String,
    /// Actual move divided by the predicted (MMM) move; within [-1, 1] the
    /// actual move stayed inside the predicted envelope
    pub move_ratio: f64,
    /// Percentile change in implied volatility across the event
    pub iv_crush_rank: f64,
}

impl Observation {
    /// Create a new observation
    pub fn new(date: NaiveDate, ticker: &str, move_ratio: f64, iv_crush_rank: f64) -> Self {
        Self {
            date,
            ticker: ticker.to_string(),
            move_ratio,
            iv_crush_rank,
        }
    }

    /// Check if the actual move stayed within the predicted envelope
    pub fn within_predicted(&self) -> bool {
        self.move_ratio.abs() <= 1.0
    }
}

/// Ordered series of earnings observations
///
/// Row order is preserved from the input file and determines each
/// observation's x-axis index in the rendered chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationSet {
    pub data: Vec<Observation>,
}

impl ObservationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a set with data
    pub fn with_data(data: Vec<Observation>) -> Self {
        Self { data }
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of observations
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Get observation at index
    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.data.get(index)
    }

    /// Append an observation
    pub fn push(&mut self, observation: Observation) {
        self.data.push(observation);
    }

    /// Get all tickers
    pub fn tickers(&self) -> Vec<&str> {
        self.data.iter().map(|o| o.ticker.as_str()).collect()
    }

    /// Get all move ratios
    pub fn move_ratios(&self) -> Vec<f64> {
        self.data.iter().map(|o| o.move_ratio).collect()
    }

    /// Get all IV crush ranks
    pub fn crush_ranks(&self) -> Vec<f64> {
        self.data.iter().map(|o| o.iv_crush_rank).collect()
    }

    /// Count observations whose move exceeded the predicted envelope
    pub fn count_outside_predicted(&self) -> usize {
        self.data.iter().filter(|o| !o.within_predicted()).count()
    }

    /// Load from a headered CSV file
    ///
    /// Columns are located by header name, so extra columns and reordering
    /// in the export are tolerated. A header-only file yields an empty set.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?.clone();
        let date_idx = column_index(&headers, COL_DATE)?;
        let ticker_idx = column_index(&headers, COL_TICKER)?;
        let ratio_idx = column_index(&headers, COL_MOVE_RATIO)?;
        let crush_idx = column_index(&headers, COL_CRUSH_RANK)?;

        let mut data = Vec::new();

        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let row = row + 1;

            let date = parse_date(record.get(date_idx).unwrap_or_default(), row)?;
            let ticker = record.get(ticker_idx).unwrap_or_default().trim();
            let move_ratio = parse_number(&record, ratio_idx, COL_MOVE_RATIO, row)?;
            let iv_crush_rank = parse_number(&record, crush_idx, COL_CRUSH_RANK, row)?;

            data.push(Observation::new(date, ticker, move_ratio, iv_crush_rank));
        }

        Ok(Self::with_data(data))
    }

    /// Save to a CSV file with the canonical headers
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record([COL_DATE, COL_TICKER, COL_MOVE_RATIO, COL_CRUSH_RANK])?;

        for obs in &self.data {
            writer.write_record([
                obs.date.format("%Y-%m-%d").to_string(),
                obs.ticker.clone(),
                obs.move_ratio.to_string(),
                obs.iv_crush_rank.to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate, DataError> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| DataError::InvalidDate {
            row,
            value: value.to_string(),
        })
}

fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<f64, DataError> {
    let value = record.get(index).unwrap_or_default().trim();
    value.parse().map_err(|_| DataError::InvalidNumber {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_within_predicted() {
        let date = NaiveDate::from_ymd_opt(2018, 1, 29).unwrap();

        assert!(Observation::new(date, "ABC", 0.8, -20.0).within_predicted());
        assert!(Observation::new(date, "ABC", -1.0, -20.0).within_predicted());
        assert!(!Observation::new(date, "ABC", 1.5, -20.0).within_predicted());
    }

    #[test]
    fn test_from_csv() {
        let file = sample_csv(
            "Earnings Date,Ticker,Actual:Expected Move Open,IV Crush Rank\n\
             1/29/2018,ABC,1.5,-20\n\
             2018-01-30,XYZ,-0.4,-35.5\n",
        );

        let set = ObservationSet::from_csv(file.path()).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.data[0].ticker, "ABC");
        assert_eq!(
            set.data[0].date,
            NaiveDate::from_ymd_opt(2018, 1, 29).unwrap()
        );
        assert_eq!(set.data[0].move_ratio, 1.5);
        assert_eq!(set.data[1].iv_crush_rank, -35.5);
    }

    #[test]
    fn test_from_csv_reordered_columns() {
        let file = sample_csv(
            "Ticker,IV Crush Rank,Earnings Date,Actual:Expected Move Open\n\
             ABC,-20,2018-01-29,1.5\n",
        );

        let set = ObservationSet::from_csv(file.path()).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.data[0].move_ratio, 1.5);
        assert_eq!(set.data[0].iv_crush_rank, -20.0);
    }

    #[test]
    fn test_missing_column() {
        let file = sample_csv("Earnings Date,Ticker\n2018-01-29,ABC\n");

        let err = ObservationSet::from_csv(file.path()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == COL_MOVE_RATIO));
    }

    #[test]
    fn test_invalid_fields() {
        let file = sample_csv(
            "Earnings Date,Ticker,Actual:Expected Move Open,IV Crush Rank\n\
             not-a-date,ABC,1.5,-20\n",
        );
        let err = ObservationSet::from_csv(file.path()).unwrap_err();
        assert!(matches!(err, DataError::InvalidDate { row: 1, .. }));

        let file = sample_csv(
            "Earnings Date,Ticker,Actual:Expected Move Open,IV Crush Rank\n\
             2018-01-29,ABC,wide,-20\n",
        );
        let err = ObservationSet::from_csv(file.path()).unwrap_err();
        assert!(matches!(err, DataError::InvalidNumber { row: 1, .. }));
    }

    #[test]
    fn test_header_only_file_is_empty_set() {
        let file = sample_csv("Earnings Date,Ticker,Actual:Expected Move Open,IV Crush Rank\n");

        let set = ObservationSet::from_csv(file.path()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_csv_round_trip() {
        let date = NaiveDate::from_ymd_opt(2018, 1, 31).unwrap();
        let set = ObservationSet::with_data(vec![
            Observation::new(date, "ABC", 1.5, -20.0),
            Observation::new(date, "XYZ", -0.25, -47.5),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round_trip.csv");
        set.to_csv(&path).unwrap();

        let loaded = ObservationSet::from_csv(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.data[1].ticker, "XYZ");
        assert_eq!(loaded.data[1].move_ratio, -0.25);
        assert_eq!(loaded.data[1].iv_crush_rank, -47.5);
    }

    #[test]
    fn test_accessors_and_counts() {
        let date = NaiveDate::from_ymd_opt(2018, 2, 1).unwrap();
        let set = ObservationSet::with_data(vec![
            Observation::new(date, "ABC", 0.5, -10.0),
            Observation::new(date, "DEF", 2.1, -60.0),
            Observation::new(date, "GHI", -1.3, -30.0),
        ]);

        assert_eq!(set.tickers(), vec!["ABC", "DEF", "GHI"]);
        assert_eq!(set.move_ratios(), vec![0.5, 2.1, -1.3]);
        assert_eq!(set.crush_ranks(), vec![-10.0, -60.0, -30.0]);
        assert_eq!(set.count_outside_predicted(), 2);
    }
}
