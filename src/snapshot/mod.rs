//! Household snapshot types, document loading, and untrusted-input ingestion

mod data;
pub mod ingest;
pub mod loader;

pub use data::{
    FinancialGoal, HouseholdSnapshot, MonthlyRecord, RedrawRecord, ReviewPeriod, StepOverrides,
    StepStatus, Weekday, STEP_COUNT,
};
pub use ingest::{parse_pasted_redraws, StatementExtraction};
pub use loader::{load_monthly_records, load_snapshot, save_snapshot, SnapshotError};
