//! Review metrics aggregation over a household snapshot

use super::steps::{evaluate_steps, StepsStatus};
use crate::projection::DEFAULT_ANNUAL_RATE;
use crate::snapshot::HouseholdSnapshot;
use chrono::{Months, NaiveDate};
use serde::Serialize;

/// Interest-saved heuristic multiplier for the current trajectory
const MONEY_SAVED_FACTOR_BASE: f64 = 0.5;

/// Interest-saved heuristic multiplier for the accelerated flex trajectory
const MONEY_SAVED_FACTOR_FLEX: f64 = 0.8;

/// Nominal comparison loan term in years
const STANDARD_LOAN_YEARS: f64 = 30.0;

/// Ownership split of the property between the household and the lender
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeOwnership {
    pub you_own: f64,
    pub bank_owns: f64,
}

/// Flat result of one review pass over a snapshot
///
/// Recomputed in full whenever the snapshot changes and never mutated in
/// place. Display formatting (currency, rounding) belongs to the renderer;
/// the stored percentages and amounts are raw except where noted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub total_debt_reduction: f64,
    pub avg_monthly_debt_reduction: f64,
    pub avg_monthly_income: f64,
    pub avg_monthly_expenses: f64,

    /// Savings rate for the period as a percentage, unclamped
    pub savings_rate: f64,

    /// Client-facing sentence with the saved portion clamped at zero
    pub savings_rate_sentence: String,

    /// Savings-rate improvement on the first report, in percent
    pub beating_previous_percent: f64,

    pub total_additional_redraws: f64,
    pub avg_monthly_additional_redraws: f64,

    #[serde(rename = "currentLVR")]
    pub current_lvr: f64,
    pub home_ownership: HomeOwnership,

    pub steps_status: StepsStatus,

    pub current_debt_free_date: NaiveDate,
    pub last6_months_reduction: f64,

    pub years_saved_base: f64,
    pub money_saved_base: f64,
    pub years_saved_flex: f64,
    pub money_saved_flex: f64,
}

/// Aggregate a household snapshot into review metrics
///
/// Total over all inputs: degenerate snapshots (no monthly records, zero
/// valuation, zero baselines) produce zeros via divide-guards, never NaN or
/// a panic. `as_of` anchors the debt-free date projection.
pub fn aggregate(snapshot: &HouseholdSnapshot, as_of: NaiveDate) -> CalculationResult {
    let months = &snapshot.monthly_data;
    let month_divisor = months.len().max(1) as f64;

    // Reconstruct the balance before the first recorded month's net movement;
    // with no records the 6-month baseline stands in.
    let opening_balance = match months.first() {
        Some(first) => first.loan_balance + (first.debit - first.credit),
        None => snapshot.previous_balance_6_months,
    };

    let total_debt_reduction = opening_balance - snapshot.current_loan_balance;
    let avg_monthly_debt_reduction = total_debt_reduction / month_divisor;

    // Underlying cash flow with one-off anomalies stripped from each side
    let underlying_income: f64 = months
        .iter()
        .map(|m| m.credit - m.one_off_credits_removed)
        .sum();
    let underlying_expenses: f64 = months
        .iter()
        .map(|m| m.debit - m.one_off_debits_removed)
        .sum();
    let avg_monthly_income = underlying_income / month_divisor;
    let avg_monthly_expenses = underlying_expenses / month_divisor;

    let savings_rate = if avg_monthly_income > 0.0 {
        (avg_monthly_income - avg_monthly_expenses) / avg_monthly_income * 100.0
    } else {
        0.0
    };
    let saved = savings_rate.max(0.0);
    let savings_rate_sentence = format!(
        "For every $100 you earn, you save ${:.2} and you spend ${:.2}",
        saved,
        100.0 - saved
    );

    let beating_previous_percent = if snapshot.first_report_savings_rate > 0.0 {
        (savings_rate - snapshot.first_report_savings_rate) / snapshot.first_report_savings_rate
            * 100.0
    } else {
        0.0
    };

    let total_additional_redraws: f64 = snapshot
        .additional_redraws
        .iter()
        .filter(|r| !r.excluded)
        .map(|r| r.amount)
        .sum();
    let avg_monthly_additional_redraws = total_additional_redraws / month_divisor;

    let current_lvr = if snapshot.current_property_valuation > 0.0 {
        snapshot.current_loan_balance / snapshot.current_property_valuation * 100.0
    } else {
        0.0
    };
    let bank_owns = current_lvr.min(100.0);
    let home_ownership = HomeOwnership {
        you_own: 100.0 - bank_owns,
        bank_owns,
    };

    // One-off credits are stripped here but one-off debits are not; the
    // reported reduction deliberately mirrors the debt-movement formula.
    let last6_months_reduction: f64 = months
        .iter()
        .rev()
        .take(6)
        .map(|m| m.credit - m.debit - m.one_off_credits_removed)
        .sum();

    let steps_status = evaluate_steps(snapshot, avg_monthly_expenses, savings_rate);

    // Projection against a nominal 30-year standard loan. The money-saved
    // figures use a fixed-multiplier heuristic on the current interest
    // charge, not a true amortized-interest integral.
    let standard_monthly_interest = snapshot.current_loan_balance * DEFAULT_ANNUAL_RATE / 12.0;
    let net_monthly_base = avg_monthly_debt_reduction.max(1.0);
    let net_monthly_flex = (avg_monthly_debt_reduction + snapshot.proposed_flex_amount).max(1.0);

    let months_remaining_base = snapshot.current_loan_balance / net_monthly_base;
    let months_remaining_flex = snapshot.current_loan_balance / net_monthly_flex;

    let current_debt_free_date = offset_months(as_of, months_remaining_base);

    let years_saved_base = (STANDARD_LOAN_YEARS - months_remaining_base / 12.0)
        .max(0.0)
        .round();
    let money_saved_base =
        (months_remaining_base * standard_monthly_interest * MONEY_SAVED_FACTOR_BASE).max(0.0);
    let years_saved_flex = (STANDARD_LOAN_YEARS - months_remaining_flex / 12.0)
        .max(0.0)
        .round();
    let money_saved_flex =
        (months_remaining_flex * standard_monthly_interest * MONEY_SAVED_FACTOR_FLEX).max(0.0);

    CalculationResult {
        total_debt_reduction,
        avg_monthly_debt_reduction,
        avg_monthly_income,
        avg_monthly_expenses,
        savings_rate,
        savings_rate_sentence,
        beating_previous_percent,
        total_additional_redraws,
        avg_monthly_additional_redraws,
        current_lvr,
        home_ownership,
        steps_status,
        current_debt_free_date,
        last6_months_reduction,
        years_saved_base,
        money_saved_base,
        years_saved_flex,
        money_saved_flex,
    }
}

/// Shift a date by a fractional month count, truncating toward zero
fn offset_months(as_of: NaiveDate, months: f64) -> NaiveDate {
    if !months.is_finite() {
        return as_of;
    }
    let whole = months.trunc();
    if whole >= 0.0 {
        as_of
            .checked_add_months(Months::new(whole.min(u32::MAX as f64) as u32))
            .unwrap_or(NaiveDate::MAX)
    } else {
        as_of
            .checked_sub_months(Months::new((-whole).min(u32::MAX as f64) as u32))
            .unwrap_or(NaiveDate::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{MonthlyRecord, RedrawRecord, StepStatus};
    use approx::assert_relative_eq;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn empty_snapshot() -> HouseholdSnapshot {
        HouseholdSnapshot::default()
    }

    #[test]
    fn test_empty_snapshot_is_finite_everywhere() {
        let results = aggregate(&empty_snapshot(), as_of());

        assert!(results.avg_monthly_debt_reduction.is_finite());
        assert!(results.avg_monthly_income.is_finite());
        assert!(results.avg_monthly_expenses.is_finite());
        assert!(results.avg_monthly_additional_redraws.is_finite());
        assert!(results.savings_rate.is_finite());
        assert!(results.beating_previous_percent.is_finite());
        assert!(results.current_lvr.is_finite());

        // With the divisor floored at one, averages equal their totals
        assert_eq!(
            results.avg_monthly_debt_reduction,
            results.total_debt_reduction
        );
        assert_eq!(
            results.avg_monthly_additional_redraws,
            results.total_additional_redraws
        );
    }

    #[test]
    fn test_empty_snapshot_falls_back_to_six_month_baseline() {
        let mut snapshot = empty_snapshot();
        snapshot.previous_balance_6_months = 120_000.0;
        snapshot.current_loan_balance = 110_000.0;

        let results = aggregate(&snapshot, as_of());
        assert_eq!(results.total_debt_reduction, 10_000.0);
    }

    #[test]
    fn test_opening_balance_reconstruction() {
        let mut snapshot = empty_snapshot();
        snapshot.monthly_data = vec![MonthlyRecord::derive(
            "January", 1_000.0, 1_500.0, 99_000.0, 0.0, 0.0, 0.0,
        )];
        snapshot.current_loan_balance = 99_000.0;

        let results = aggregate(&snapshot, as_of());

        // Opening balance 99000 + (1000 - 1500) = 98500; a negative
        // reduction is valid and must not be clamped.
        assert_relative_eq!(results.total_debt_reduction, -500.0);
        assert_relative_eq!(results.avg_monthly_debt_reduction, -500.0);
    }

    #[test]
    fn test_ownership_split_always_sums_to_hundred() {
        let mut snapshot = HouseholdSnapshot::sample();
        for valuation in [0.0, 50_000.0, 89_466.97, 775_000.0, 10_000_000.0] {
            snapshot.current_property_valuation = valuation;
            let results = aggregate(&snapshot, as_of());
            assert_relative_eq!(
                results.home_ownership.you_own + results.home_ownership.bank_owns,
                100.0,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_zero_valuation_gives_zero_lvr() {
        let mut snapshot = HouseholdSnapshot::sample();
        snapshot.current_property_valuation = 0.0;

        let results = aggregate(&snapshot, as_of());
        assert_eq!(results.current_lvr, 0.0);
        assert_eq!(results.home_ownership.bank_owns, 0.0);
        assert_eq!(results.home_ownership.you_own, 100.0);
    }

    #[test]
    fn test_underwater_loan_clamps_bank_share() {
        let mut snapshot = HouseholdSnapshot::sample();
        snapshot.current_loan_balance = 900_000.0;
        snapshot.current_property_valuation = 600_000.0;

        let results = aggregate(&snapshot, as_of());
        assert_eq!(results.home_ownership.bank_owns, 100.0);
        assert_eq!(results.home_ownership.you_own, 0.0);
        assert!(results.current_lvr > 100.0);
    }

    #[test]
    fn test_one_off_credit_stripping() {
        let mut snapshot = empty_snapshot();
        snapshot.monthly_data = vec![
            MonthlyRecord::derive("January", 4_000.0, 10_000.0, 90_000.0, 0.0, 5_000.0, 0.0),
            MonthlyRecord::derive("February", 4_000.0, 5_000.0, 89_000.0, 1_000.0, 0.0, 0.0),
        ];

        let results = aggregate(&snapshot, as_of());
        // Income: (10000-5000) + (5000-0) over 2 months
        assert_relative_eq!(results.avg_monthly_income, 5_000.0);
        // Expenses: (4000-0) + (4000-1000) over 2 months
        assert_relative_eq!(results.avg_monthly_expenses, 3_500.0);
        assert_relative_eq!(results.savings_rate, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_savings_sentence_clamps_negative_rate() {
        let mut snapshot = empty_snapshot();
        snapshot.monthly_data = vec![MonthlyRecord::derive(
            "January", 6_000.0, 5_000.0, 90_000.0, 0.0, 0.0, 0.0,
        )];

        let results = aggregate(&snapshot, as_of());
        assert!(results.savings_rate < 0.0);
        assert_eq!(
            results.savings_rate_sentence,
            "For every $100 you earn, you save $0.00 and you spend $100.00"
        );
    }

    #[test]
    fn test_zero_income_gives_zero_savings_rate() {
        let mut snapshot = empty_snapshot();
        snapshot.monthly_data = vec![MonthlyRecord::derive(
            "January", 1_000.0, 0.0, 90_000.0, 0.0, 0.0, 0.0,
        )];

        let results = aggregate(&snapshot, as_of());
        assert_eq!(results.savings_rate, 0.0);
    }

    #[test]
    fn test_improvement_guard_on_zero_baseline() {
        let mut snapshot = HouseholdSnapshot::sample();
        snapshot.first_report_savings_rate = 0.0;

        let results = aggregate(&snapshot, as_of());
        assert_eq!(results.beating_previous_percent, 0.0);
    }

    #[test]
    fn test_excluded_redraws_omitted_from_totals() {
        let mut snapshot = empty_snapshot();
        snapshot.monthly_data = vec![MonthlyRecord::derive(
            "January", 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        )];
        snapshot.additional_redraws = vec![
            RedrawRecord {
                id: "1".to_string(),
                amount: 300.0,
                ..Default::default()
            },
            RedrawRecord {
                id: "2".to_string(),
                amount: 700.0,
                excluded: true,
                ..Default::default()
            },
        ];

        let results = aggregate(&snapshot, as_of());
        assert_eq!(results.total_additional_redraws, 300.0);
        assert_eq!(results.avg_monthly_additional_redraws, 300.0);
    }

    #[test]
    fn test_trailing_six_month_reduction() {
        let mut snapshot = empty_snapshot();
        // Eight months; only the last six count, each contributing 100
        for i in 0..8 {
            let credit = if i < 2 { 10_000.0 } else { 1_100.0 };
            snapshot.monthly_data.push(MonthlyRecord::derive(
                format!("M{i}"),
                1_000.0,
                credit,
                50_000.0,
                0.0,
                0.0,
                0.0,
            ));
        }

        let results = aggregate(&snapshot, as_of());
        assert_relative_eq!(results.last6_months_reduction, 600.0);
    }

    #[test]
    fn test_debt_free_date_projection() {
        let mut snapshot = empty_snapshot();
        // One month of $1,000 reduction against a $12,000 balance
        snapshot.monthly_data = vec![MonthlyRecord::derive(
            "January", 10_000.0, 9_000.0, 12_000.0, 0.0, 0.0, 0.0,
        )];
        snapshot.current_loan_balance = 12_000.0;

        let results = aggregate(&snapshot, as_of());
        assert_relative_eq!(results.avg_monthly_debt_reduction, 1_000.0);
        assert_eq!(
            results.current_debt_free_date,
            NaiveDate::from_ymd_opt(2027, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_interest_saved_heuristic() {
        let mut snapshot = empty_snapshot();
        snapshot.monthly_data = vec![MonthlyRecord::derive(
            "January", 11_000.0, 9_000.0, 48_000.0, 0.0, 0.0, 0.0,
        )];
        snapshot.current_loan_balance = 48_000.0;
        snapshot.proposed_flex_amount = 2_000.0;

        let results = aggregate(&snapshot, as_of());

        // 24 months remaining at $2,000/month; $240 standard monthly interest
        assert_relative_eq!(results.money_saved_base, 24.0 * 240.0 * 0.5, epsilon = 1e-6);
        assert_relative_eq!(results.years_saved_base, 28.0);

        // Flex halves the remaining months and uses the 0.8 multiplier
        assert_relative_eq!(results.money_saved_flex, 12.0 * 240.0 * 0.8, epsilon = 1e-6);
        assert_relative_eq!(results.years_saved_flex, 29.0);
    }

    #[test]
    fn test_steps_flow_through_with_overrides() {
        let mut snapshot = HouseholdSnapshot::sample();
        snapshot.manual_overrides.set(10, StepStatus::Yes);

        let results = aggregate(&snapshot, as_of());
        assert_eq!(results.steps_status.get(10), Some(StepStatus::Yes));
        assert_eq!(results.steps_status.get(6), Some(StepStatus::AtDiscretion));
    }

    #[test]
    fn test_sample_household_headline_figures() {
        let results = aggregate(&HouseholdSnapshot::sample(), as_of());

        // Opening balance 235538.97 + (11951.14 - 11763.60) = 235726.51
        assert_relative_eq!(results.total_debt_reduction, 146_259.54, epsilon = 0.01);
        assert_relative_eq!(
            results.avg_monthly_debt_reduction,
            146_259.54 / 12.0,
            epsilon = 0.01
        );
        // Underlying income strips the $142,869.13 property-sale credit
        assert_relative_eq!(results.avg_monthly_income, 12_305.28, epsilon = 0.01);
        assert_relative_eq!(results.avg_monthly_expenses, 12_054.00, epsilon = 0.01);
        assert_relative_eq!(results.savings_rate, 2.04, epsilon = 0.01);
        assert_relative_eq!(results.current_lvr, 11.54, epsilon = 0.01);
        assert_relative_eq!(results.total_additional_redraws, 6_740.0);
    }
}
