//! Coaching Engine - review metrics and payoff projections for household mortgage coaching
//!
//! This library provides:
//! - Household snapshot document model with JSON import/export
//! - Review metrics aggregation (totals, averages, savings rate, ownership split)
//! - The twelve-step financial-security track with manual overrides
//! - Month-by-month payoff projection with baseline/flex/previous scenarios
//! - Ingestion helpers for pasted redraws and statement extractions

pub mod projection;
pub mod review;
pub mod scenario;
pub mod snapshot;

// Re-export commonly used types
pub use projection::{project_payoff, PayoffOutcome, PayoffProjection};
pub use review::{aggregate, CalculationResult, StepsStatus};
pub use scenario::{Scenario, ScenarioRunner, ScenarioSet};
pub use snapshot::{HouseholdSnapshot, MonthlyRecord, RedrawRecord, StepStatus};
