//! The twelve-step financial-security track: evaluation rules and catalogue

use crate::snapshot::{HouseholdSnapshot, StepStatus, STEP_COUNT};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// National average household savings rate, for chart reference lines
pub const NATIONAL_AVG_SAVINGS_RATE: f64 = 5.0;

/// Program target savings rate
pub const TARGET_SAVINGS_RATE: f64 = 20.0;

/// Evaluated status for all twelve steps, after manual overrides
///
/// Serializes as the legacy `{"1": "YES", ...}` map keyed by step id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepsStatus([StepStatus; STEP_COUNT]);

impl StepsStatus {
    /// Status for a step, if the id is one of the twelve (1-indexed)
    pub fn get(&self, id: usize) -> Option<StepStatus> {
        if (1..=STEP_COUNT).contains(&id) {
            Some(self.0[id - 1])
        } else {
            None
        }
    }

    /// Iterate `(id, status)` pairs in step order
    pub fn iter(&self) -> impl Iterator<Item = (usize, StepStatus)> + '_ {
        self.0.iter().enumerate().map(|(idx, s)| (idx + 1, *s))
    }

    /// Number of steps currently achieved
    pub fn achieved(&self) -> usize {
        self.0.iter().filter(|s| **s == StepStatus::Yes).count()
    }
}

impl Serialize for StepsStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(STEP_COUNT))?;
        for (id, status) in self.iter() {
            map.serialize_entry(&id.to_string(), &status)?;
        }
        map.end()
    }
}

fn yes_no(achieved: bool) -> StepStatus {
    if achieved {
        StepStatus::Yes
    } else {
        StepStatus::No
    }
}

/// Evaluate the twelve steps for a household
///
/// Average monthly expenses and the savings rate are review-level figures
/// supplied by the aggregator. Each automatic result is replaced outright by
/// a manual override where one is set; clearing the override restores the
/// automatic value on the next evaluation.
pub fn evaluate_steps(
    snapshot: &HouseholdSnapshot,
    avg_monthly_expenses: f64,
    savings_rate: f64,
) -> StepsStatus {
    let redraw = snapshot.current_available_redraw;
    let balance = snapshot.current_loan_balance;
    let settlement = snapshot.settlement_loan_amount;

    let mut status = [
        yes_no(redraw >= 2_000.0),
        yes_no(redraw >= avg_monthly_expenses),
        yes_no(!snapshot.has_external_debts),
        yes_no(redraw >= avg_monthly_expenses * 3.0),
        yes_no(balance <= settlement * 0.90),
        // Superannuation guidance is never auto-evaluated
        StepStatus::AtDiscretion,
        yes_no(balance <= settlement * 0.75),
        yes_no(savings_rate >= snapshot.first_report_savings_rate * 1.1),
        yes_no(balance <= settlement * 0.50),
        // Investment readiness cannot be auto-detected
        StepStatus::No,
        yes_no(balance <= settlement * 0.25),
        yes_no(balance <= 0.0),
    ];

    for (idx, slot) in status.iter_mut().enumerate() {
        if let Some(manual) = snapshot.manual_overrides.get(idx + 1) {
            *slot = manual;
        }
    }

    StepsStatus(status)
}

/// Static catalogue entry for one step
#[derive(Debug, Clone, Copy)]
pub struct StepInfo {
    pub id: usize,
    pub title: &'static str,
    pub description: &'static str,
}

/// The fixed, ordered step catalogue
pub const STEP_CATALOGUE: [StepInfo; STEP_COUNT] = [
    StepInfo {
        id: 1,
        title: "$2,000 Emergency Buffer",
        description: "Available redraw exceeds $2,000 for unexpected costs",
    },
    StepInfo {
        id: 2,
        title: "1 Month Living Expenses",
        description: "Redraw covers one month of average expenses",
    },
    StepInfo {
        id: 3,
        title: "Pay Off External Debts",
        description: "No debts remaining outside the home loan",
    },
    StepInfo {
        id: 4,
        title: "Save 3 Months Expenses",
        description: "A robust safety net held in redraw",
    },
    StepInfo {
        id: 5,
        title: "Debt Down 10%",
        description: "Loan balance reduced by 10% from settlement",
    },
    StepInfo {
        id: 6,
        title: "Super Contributions to 15%",
        description: "Retirement contribution strategy, at the household's discretion",
    },
    StepInfo {
        id: 7,
        title: "Debt Down 25%",
        description: "Quarter-way to total debt freedom",
    },
    StepInfo {
        id: 8,
        title: "Savings Rate +10% vs Start",
        description: "Cashflow efficiency improved 10% on the first report",
    },
    StepInfo {
        id: 9,
        title: "Debt Down 50%",
        description: "Half-way point, owning more than the bank",
    },
    StepInfo {
        id: 10,
        title: "Investment Readiness",
        description: "Equity leverage readiness, updated by the coach",
    },
    StepInfo {
        id: 11,
        title: "Debt Down 75%",
        description: "The finish line is in sight",
    },
    StepInfo {
        id: 12,
        title: "Debt Down 100% (DEBT FREE)",
        description: "Complete financial security achieved",
    },
];

/// The target a step is measured against, for table rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepTarget {
    /// A dollar threshold
    Amount(f64),
    /// A savings-rate threshold in percent
    Rate(f64),
    /// A yes/no condition with no numeric target
    Label(&'static str),
    /// No target applies
    Discretion,
}

/// Target for a step given the household's figures (1-indexed id)
pub fn step_target(
    id: usize,
    snapshot: &HouseholdSnapshot,
    avg_monthly_expenses: f64,
) -> StepTarget {
    let settlement = snapshot.settlement_loan_amount;
    match id {
        1 => StepTarget::Amount(2_000.0),
        2 => StepTarget::Amount(avg_monthly_expenses),
        3 => StepTarget::Label("No external debts"),
        4 => StepTarget::Amount(avg_monthly_expenses * 3.0),
        5 => StepTarget::Amount(settlement * 0.90),
        7 => StepTarget::Amount(settlement * 0.75),
        8 => StepTarget::Rate(snapshot.first_report_savings_rate * 1.1),
        9 => StepTarget::Amount(settlement * 0.50),
        11 => StepTarget::Amount(settlement * 0.25),
        12 => StepTarget::Amount(0.0),
        _ => StepTarget::Discretion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> HouseholdSnapshot {
        HouseholdSnapshot::sample()
    }

    #[test]
    fn test_buffer_and_expense_steps() {
        let s = snapshot();
        // $36,162 redraw against ~$11,970 average expenses
        let status = evaluate_steps(&s, 11_970.0, 2.04);
        assert_eq!(status.get(1), Some(StepStatus::Yes));
        assert_eq!(status.get(2), Some(StepStatus::Yes));
        assert_eq!(status.get(3), Some(StepStatus::Yes));
        assert_eq!(status.get(4), Some(StepStatus::Yes));
    }

    #[test]
    fn test_balance_threshold_steps() {
        let mut s = snapshot();
        s.settlement_loan_amount = 200_000.0;

        s.current_loan_balance = 95_000.0;
        let status = evaluate_steps(&s, 0.0, 0.0);
        assert_eq!(status.get(5), Some(StepStatus::Yes)); // below 90%
        assert_eq!(status.get(7), Some(StepStatus::Yes)); // below 75%
        assert_eq!(status.get(9), Some(StepStatus::Yes)); // below 50%
        assert_eq!(status.get(11), Some(StepStatus::No)); // not below 25%
        assert_eq!(status.get(12), Some(StepStatus::No));

        s.current_loan_balance = 180_001.0;
        let status = evaluate_steps(&s, 0.0, 0.0);
        assert_eq!(status.get(5), Some(StepStatus::No));
    }

    #[test]
    fn test_debt_free_step_iff_zero_balance() {
        let mut s = snapshot();
        s.current_loan_balance = 0.0;
        assert_eq!(evaluate_steps(&s, 0.0, 0.0).get(12), Some(StepStatus::Yes));

        s.current_loan_balance = 0.01;
        assert_eq!(evaluate_steps(&s, 0.0, 0.0).get(12), Some(StepStatus::No));

        s.current_loan_balance = -250.0;
        assert_eq!(evaluate_steps(&s, 0.0, 0.0).get(12), Some(StepStatus::Yes));
    }

    #[test]
    fn test_super_step_always_discretionary_unless_overridden() {
        let mut s = snapshot();
        assert_eq!(
            evaluate_steps(&s, 0.0, 0.0).get(6),
            Some(StepStatus::AtDiscretion)
        );

        s.manual_overrides.set(6, StepStatus::Yes);
        assert_eq!(evaluate_steps(&s, 0.0, 0.0).get(6), Some(StepStatus::Yes));
    }

    #[test]
    fn test_override_precedence_and_clearing() {
        let mut s = snapshot();
        s.current_loan_balance = 500_000.0;
        s.settlement_loan_amount = 400_000.0;

        let auto = evaluate_steps(&s, 0.0, 0.0);
        assert_eq!(auto.get(5), Some(StepStatus::No));

        s.manual_overrides.set(5, StepStatus::Yes);
        assert_eq!(evaluate_steps(&s, 0.0, 0.0).get(5), Some(StepStatus::Yes));

        // Clearing restores the automatic value with no other recomputation
        s.manual_overrides.clear(5);
        assert_eq!(evaluate_steps(&s, 0.0, 0.0).get(5), auto.get(5));
    }

    #[test]
    fn test_investment_step_defaults_no() {
        let mut s = snapshot();
        let status = evaluate_steps(&s, 0.0, 100.0);
        assert_eq!(status.get(10), Some(StepStatus::No));

        s.manual_overrides.set(10, StepStatus::Yes);
        assert_eq!(evaluate_steps(&s, 0.0, 100.0).get(10), Some(StepStatus::Yes));
    }

    #[test]
    fn test_savings_rate_step() {
        let mut s = snapshot();
        s.first_report_savings_rate = 10.0;
        assert_eq!(evaluate_steps(&s, 0.0, 11.0).get(8), Some(StepStatus::Yes));
        assert_eq!(evaluate_steps(&s, 0.0, 10.9).get(8), Some(StepStatus::No));
    }

    #[test]
    fn test_achieved_count_and_wire_format() {
        let s = snapshot();
        let status = evaluate_steps(&s, 11_970.0, 2.04);
        assert!(status.achieved() >= 4);

        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains(r#""6":"AT YOUR DISCRETION""#));
        assert!(json.contains(r#""1":"YES""#));
    }

    #[test]
    fn test_step_targets() {
        let s = snapshot();
        assert_eq!(step_target(1, &s, 0.0), StepTarget::Amount(2_000.0));
        assert_eq!(step_target(4, &s, 1_000.0), StepTarget::Amount(3_000.0));
        assert_eq!(step_target(6, &s, 0.0), StepTarget::Discretion);
        assert_eq!(
            step_target(9, &s, 0.0),
            StepTarget::Amount(s.settlement_loan_amount * 0.5)
        );
        assert_eq!(step_target(12, &s, 0.0), StepTarget::Amount(0.0));
    }
}
