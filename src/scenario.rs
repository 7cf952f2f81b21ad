//! Scenario runner for the trajectory set a review compares
//!
//! Baseline, flex and previous-loan capacities all feed the same payoff
//! projector; each run owns its scalar inputs, so scenarios can be computed
//! in any order with no shared state.

use crate::projection::{project_payoff, PayoffProjection, DEFAULT_ANNUAL_RATE};
use crate::review::CalculationResult;
use crate::snapshot::HouseholdSnapshot;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Average weeks per calendar month, for weekly-to-monthly conversion
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Assumed capacity when the previous loan's target date is unusable
const FALLBACK_PREVIOUS_CAPACITY: f64 = 1_000.0;

/// Which trajectory a scenario models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScenarioKind {
    /// Current repayment behaviour continues unchanged
    Baseline,
    /// Proposed flex amount and weekly-spending change applied
    Flex,
    /// The loan as it was tracking at the previous review
    PreviousLoan,
}

impl ScenarioKind {
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::Baseline => "Baseline",
            ScenarioKind::Flex => "Flex",
            ScenarioKind::PreviousLoan => "Previous loan",
        }
    }
}

/// One projected trajectory with the capacity that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub monthly_capacity: f64,
    pub projection: PayoffProjection,
    /// Payoff date, when the trajectory reaches zero within the horizon
    pub debt_free_date: Option<NaiveDate>,
}

/// The three trajectories charted by a review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSet {
    pub baseline: Scenario,
    pub flex: Scenario,
    pub previous: Scenario,
}

impl ScenarioSet {
    /// Iterate scenarios in display order
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        [&self.baseline, &self.flex, &self.previous].into_iter()
    }
}

/// Runs payoff projections under a shared interest-rate assumption
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    annual_rate: f64,
}

impl ScenarioRunner {
    /// Runner at the default 6% nominal annual rate
    pub fn new() -> Self {
        Self {
            annual_rate: DEFAULT_ANNUAL_RATE,
        }
    }

    /// Runner at a specific annual rate
    pub fn with_rate(annual_rate: f64) -> Self {
        Self { annual_rate }
    }

    /// Project a single trajectory from a balance and capacity
    pub fn run(
        &self,
        kind: ScenarioKind,
        balance: f64,
        monthly_capacity: f64,
        as_of: NaiveDate,
    ) -> Scenario {
        let projection = project_payoff(balance, monthly_capacity, self.annual_rate);
        let debt_free_date = projection.months_to_zero().map(|months| {
            as_of
                .checked_add_months(Months::new(months))
                .unwrap_or(NaiveDate::MAX)
        });
        Scenario {
            kind,
            monthly_capacity,
            projection,
            debt_free_date,
        }
    }

    /// Produce the three trajectories a review compares
    ///
    /// The flex capacity adds the proposed flex amount plus the monthly
    /// impact of the weekly-spending change. The previous-loan capacity is
    /// reverse-engineered from the previous review's target date.
    pub fn for_review(
        &self,
        snapshot: &HouseholdSnapshot,
        results: &CalculationResult,
        as_of: NaiveDate,
    ) -> ScenarioSet {
        let balance = snapshot.current_loan_balance;

        let weekly_impact = (snapshot.weekly_spending_amount
            - snapshot.proposed_weekly_spending_amount)
            * WEEKS_PER_MONTH;
        let baseline_capacity = results.avg_monthly_debt_reduction;
        let flex_capacity = baseline_capacity + snapshot.proposed_flex_amount + weekly_impact;
        let previous_capacity = previous_loan_capacity(snapshot, as_of);

        ScenarioSet {
            baseline: self.run(ScenarioKind::Baseline, balance, baseline_capacity, as_of),
            flex: self.run(ScenarioKind::Flex, balance, flex_capacity, as_of),
            previous: self.run(ScenarioKind::PreviousLoan, balance, previous_capacity, as_of),
        }
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Monthly reduction implied by the previous review's debt-free date
fn previous_loan_capacity(snapshot: &HouseholdSnapshot, as_of: NaiveDate) -> f64 {
    let months = whole_months_between(as_of, snapshot.previous_ood_date);
    if months > 0 {
        snapshot.current_loan_balance / months as f64
    } else {
        FALLBACK_PREVIOUS_CAPACITY
    }
}

/// Whole calendar months from one date to another, truncated toward zero
fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut months =
        (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64);
    if months > 0 && to.day() < from.day() {
        months -= 1;
    } else if months < 0 && to.day() > from.day() {
        months += 1;
    }
    months
}
