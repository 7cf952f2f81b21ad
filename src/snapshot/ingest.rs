//! Ingestion helpers for untrusted external inputs
//!
//! Pasted redraw notes and upstream statement extractions arrive as
//! best-effort guesses. Nothing here reaches the snapshot without passing
//! validation, so a failed collaborator cannot corrupt household state.

use super::{HouseholdSnapshot, MonthlyRecord, RedrawRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parse pasted "date  amount  description" lines into redraw records
///
/// Columns split on tabs or runs of two or more spaces. Lines with a missing
/// or unparseable amount come through at 0 rather than being dropped, so the
/// operator can see and fix them. Ids are assigned sequentially from
/// `start_id`; `fallback_date` fills rows with no date column.
pub fn parse_pasted_redraws(text: &str, fallback_date: &str, start_id: u32) -> Vec<RedrawRecord> {
    let mut next_id = start_id;
    let mut records = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let columns = split_columns(line);
        let record = RedrawRecord {
            id: next_id.to_string(),
            date: columns
                .first()
                .cloned()
                .unwrap_or_else(|| fallback_date.to_string()),
            amount: columns.get(1).map(|c| parse_amount(c)).unwrap_or(0.0),
            description: columns
                .get(2)
                .cloned()
                .unwrap_or_else(|| "Imported redraw".to_string()),
            excluded: false,
            month: None,
        };
        next_id += 1;
        records.push(record);
    }

    log::debug!("parsed {} redraw lines", records.len());
    records
}

/// Split a pasted line on tabs or runs of two or more spaces
fn split_columns(line: &str) -> Vec<String> {
    let mut columns = Vec::new();
    let mut current = String::new();
    let mut pending_spaces = 0usize;

    for ch in line.trim().chars() {
        match ch {
            '\t' => {
                if !current.is_empty() {
                    columns.push(std::mem::take(&mut current));
                }
                pending_spaces = 0;
            }
            ' ' => pending_spaces += 1,
            _ => {
                if pending_spaces >= 2 && !current.is_empty() {
                    columns.push(std::mem::take(&mut current));
                } else if pending_spaces == 1 && !current.is_empty() {
                    current.push(' ');
                }
                pending_spaces = 0;
                current.push(ch);
            }
        }
    }
    if !current.is_empty() {
        columns.push(current);
    }
    columns
}

/// Extract a dollar amount from a pasted cell, tolerating "$1,234.56" noise
///
/// Keeps digits and the first decimal point, ignoring everything after a
/// second one. An empty or unusable cell parses to 0.
fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut seen_dot = false;
    let prefix: String = cleaned
        .chars()
        .take_while(|c| {
            if *c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
            }
            true
        })
        .collect();

    prefix.parse().unwrap_or(0.0)
}

/// Figures extracted from a bank statement by the upstream OCR collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatementExtraction {
    pub balance: f64,
    pub redraw: f64,
    pub total_credits: f64,
    pub total_debits: f64,
    /// Collaborator self-reported confidence, 0 to 1
    pub confidence: f64,
    pub notes: String,
}

/// An extraction that must not be merged into a snapshot
#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("extracted {field} is not a finite number")]
    NotFinite { field: &'static str },

    #[error("extracted {field} is negative")]
    Negative { field: &'static str },

    #[error("confidence {0} is outside 0..=1")]
    Confidence(f64),
}

impl StatementExtraction {
    /// Reject figures that cannot be statement amounts
    pub fn validate(&self) -> Result<(), ExtractionError> {
        let fields = [
            ("balance", self.balance),
            ("redraw", self.redraw),
            ("totalCredits", self.total_credits),
            ("totalDebits", self.total_debits),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ExtractionError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ExtractionError::Negative { field });
            }
        }
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(ExtractionError::Confidence(self.confidence));
        }
        Ok(())
    }

    /// Merge a validated extraction into the snapshot under a month label
    ///
    /// Updates the current balance and available redraw, then refreshes the
    /// named month's record (or appends one) with the statement totals.
    pub fn apply_to(
        &self,
        snapshot: &mut HouseholdSnapshot,
        month: &str,
    ) -> Result<(), ExtractionError> {
        self.validate()?;

        snapshot.current_loan_balance = self.balance;
        snapshot.current_available_redraw = self.redraw;

        let refreshed = match snapshot.monthly_data.iter().position(|m| m.month == month) {
            Some(idx) => {
                let existing = &snapshot.monthly_data[idx];
                let record = MonthlyRecord::derive(
                    month,
                    self.total_debits,
                    self.total_credits,
                    self.balance,
                    existing.one_off_debits_removed,
                    existing.one_off_credits_removed,
                    existing.redraws,
                );
                snapshot.monthly_data[idx] = record;
                "updated"
            }
            None => {
                snapshot.monthly_data.push(MonthlyRecord::derive(
                    month,
                    self.total_debits,
                    self.total_credits,
                    self.balance,
                    0.0,
                    0.0,
                    0.0,
                ));
                "appended"
            }
        };
        log::info!(
            "{refreshed} {month} from statement extraction (confidence {:.2})",
            self.confidence
        );
        Ok(())
    }
}
