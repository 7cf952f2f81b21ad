//! Snapshot document import/export and bulk monthly-record loading

use super::{HouseholdSnapshot, MonthlyRecord};
use csv::Reader;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Failure loading or saving a household document
///
/// These surface to the operator as a single clear message; the computation
/// layer is never reachable with a partially-loaded snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unable to access scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario file: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("invalid monthly data file: {0}")]
    MonthlyData(#[from] csv::Error),
}

/// Load a household snapshot from a JSON scenario file
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<HouseholdSnapshot, SnapshotError> {
    let file = File::open(path)?;
    snapshot_from_reader(BufReader::new(file))
}

/// Load a household snapshot from any reader
pub fn snapshot_from_reader<R: Read>(reader: R) -> Result<HouseholdSnapshot, SnapshotError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parse a household snapshot from a JSON string
pub fn snapshot_from_str(json: &str) -> Result<HouseholdSnapshot, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

/// Write a household snapshot as a pretty-printed JSON scenario file
pub fn save_snapshot<P: AsRef<Path>>(
    path: P,
    snapshot: &HouseholdSnapshot,
) -> Result<(), SnapshotError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(())
}

/// Raw CSV row matching the statement-summary column layout
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Month")]
    month: String,
    #[serde(rename = "Debit")]
    debit: f64,
    #[serde(rename = "Credit")]
    credit: f64,
    #[serde(rename = "LoanBalance")]
    loan_balance: f64,
    #[serde(rename = "OneOffDebitsRemoved", default)]
    one_off_debits_removed: f64,
    #[serde(rename = "OneOffCreditsRemoved", default)]
    one_off_credits_removed: f64,
    #[serde(rename = "Redraws", default)]
    redraws: f64,
}

impl CsvRow {
    fn to_record(self) -> MonthlyRecord {
        MonthlyRecord::derive(
            self.month,
            self.debit,
            self.credit,
            self.loan_balance,
            self.one_off_debits_removed,
            self.one_off_credits_removed,
            self.redraws,
        )
    }
}

/// Load monthly records from a CSV file, recomputing the derived columns
pub fn load_monthly_records<P: AsRef<Path>>(path: P) -> Result<Vec<MonthlyRecord>, SnapshotError> {
    let reader = Reader::from_path(path)?;
    records_from_csv_reader(reader)
}

/// Load monthly records from any reader (e.g. a pasted buffer)
pub fn load_monthly_records_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<MonthlyRecord>, SnapshotError> {
    records_from_csv_reader(Reader::from_reader(reader))
}

fn records_from_csv_reader<R: Read>(
    mut reader: Reader<R>,
) -> Result<Vec<MonthlyRecord>, SnapshotError> {
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.to_record());
    }
    log::debug!("loaded {} monthly records", records.len());
    Ok(records)
}
