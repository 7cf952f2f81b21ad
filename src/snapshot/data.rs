//! Household snapshot data structures matching the coaching scenario document format

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of steps on the financial-security track
pub const STEP_COUNT: usize = 12;

/// Review period covered by a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReviewPeriod {
    #[serde(rename = "90 Days")]
    NinetyDays,
    #[serde(rename = "6 Months")]
    SixMonths,
    #[default]
    #[serde(rename = "12 Months")]
    TwelveMonths,
}

/// Day of the week a household's weekly spending transfer lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weekday {
    #[default]
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// Tri-state achievement status for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
    #[serde(rename = "AT YOUR DISCRETION")]
    AtDiscretion,
}

/// Manual status overrides, sparse over the twelve known step ids
///
/// The step set is closed, so overrides are a fixed-size array rather than an
/// open map. On the wire they serialize as the legacy `{"<id>": "<status>"}`
/// object; unknown ids in imported documents are dropped with a warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOverrides([Option<StepStatus>; STEP_COUNT]);

impl StepOverrides {
    /// Get the override for a step, if any (1-indexed id)
    pub fn get(&self, id: usize) -> Option<StepStatus> {
        if (1..=STEP_COUNT).contains(&id) {
            self.0[id - 1]
        } else {
            None
        }
    }

    /// Set an override for a step (1-indexed id; ids outside 1-12 are ignored)
    pub fn set(&mut self, id: usize, status: StepStatus) {
        if (1..=STEP_COUNT).contains(&id) {
            self.0[id - 1] = Some(status);
        }
    }

    /// Clear an override, restoring the automatic evaluation for that step
    pub fn clear(&mut self, id: usize) {
        if (1..=STEP_COUNT).contains(&id) {
            self.0[id - 1] = None;
        }
    }

    /// True when no step is overridden
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

impl Serialize for StepOverrides {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let count = self.0.iter().filter(|o| o.is_some()).count();
        let mut map = serializer.serialize_map(Some(count))?;
        for (idx, status) in self.0.iter().enumerate() {
            if let Some(status) = status {
                map.serialize_entry(&(idx + 1).to_string(), status)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StepOverrides {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OverrideVisitor;

        impl<'de> Visitor<'de> for OverrideVisitor {
            type Value = StepOverrides;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of step ids to statuses")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut overrides = StepOverrides::default();
                while let Some((key, status)) = access.next_entry::<String, StepStatus>()? {
                    match key.parse::<usize>() {
                        Ok(id) if (1..=STEP_COUNT).contains(&id) => overrides.set(id, status),
                        _ => log::warn!("ignoring override for unknown step {:?}", key),
                    }
                }
                Ok(overrides)
            }
        }

        deserializer.deserialize_map(OverrideVisitor)
    }
}

/// One calendar month of account activity for a household
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyRecord {
    /// Month label, e.g. "January"
    pub month: String,

    /// Total debits for the month
    pub debit: f64,

    /// Total credits for the month
    pub credit: f64,

    /// End-of-month loan balance
    pub loan_balance: f64,

    /// One-off debit amounts excluded from the underlying expense picture
    pub one_off_debits_removed: f64,

    /// One-off credit amounts excluded from the underlying income picture
    pub one_off_credits_removed: f64,

    /// Redraw total for the month
    pub redraws: f64,

    /// Net debt movement for the month (stored as reported)
    pub actual_debt_reduction: f64,

    /// Savings rate for the month as a percentage (stored as reported)
    pub savings_rate: f64,
}

impl MonthlyRecord {
    /// Build a record from raw statement figures, computing the derived columns
    ///
    /// Debt reduction strips one-off credits only; one-off debits are tracked
    /// for the report but stay in the debit side of this figure.
    pub fn derive(
        month: impl Into<String>,
        debit: f64,
        credit: f64,
        loan_balance: f64,
        one_off_debits_removed: f64,
        one_off_credits_removed: f64,
        redraws: f64,
    ) -> Self {
        let actual_debt_reduction = credit - debit - one_off_credits_removed;
        let underlying_income = credit - one_off_credits_removed;
        let savings_rate = if underlying_income > 0.0 {
            actual_debt_reduction / underlying_income * 100.0
        } else {
            0.0
        };

        Self {
            month: month.into(),
            debit,
            credit,
            loan_balance,
            one_off_debits_removed,
            one_off_credits_removed,
            redraws,
            actual_debt_reduction,
            savings_rate,
        }
    }
}

/// One discretionary withdrawal event against the loan's repayment surplus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RedrawRecord {
    /// Identifier, unique within the household
    pub id: String,

    /// Transaction date as entered, e.g. "28.01.25"
    pub date: String,

    /// Withdrawn amount
    pub amount: f64,

    /// Free-text purpose
    pub description: String,

    /// Excluded records are retained but omitted from aggregate sums
    pub excluded: bool,

    /// Month label used only for report grouping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

/// A qualitative goal with a progress percentage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialGoal {
    pub id: String,
    pub goal: String,
    pub progress: f64,
}

/// The aggregate root: everything known about one household's coaching engagement
///
/// The whole object serializes to a single flat JSON document for
/// export/import; every field defaults so older or partial documents load, and
/// unknown keys are ignored. `current_loan_balance` is the single source of
/// truth for the present-day balance; monthly records are historical and are
/// never re-derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseholdSnapshot {
    pub client_email: String,

    /// Settlement baseline
    pub settlement_date: NaiveDate,
    pub settlement_loan_amount: f64,

    /// Identity and display fields
    pub household_names: String,
    pub property_address: String,
    pub property_image_url: String,

    /// Report date range labels, as displayed
    pub start_date: String,
    pub end_date: String,

    /// Debt-free date of the loan as originally written
    pub original_debt_free_date: NaiveDate,

    /// Target debt-free date from the previous review
    #[serde(rename = "previousOODDate")]
    pub previous_ood_date: NaiveDate,

    /// Savings rate measured at the first report
    pub first_report_savings_rate: f64,

    /// Historical balance/loan baselines at the 90-day and 6-month checkpoints
    pub previous_balance_90_days: f64,
    pub previous_balance_6_months: f64,
    pub previous_loan_90_days: f64,
    pub previous_loan_6_months: f64,

    /// Ordered monthly records; insertion order is chronological order
    pub monthly_data: Vec<MonthlyRecord>,

    pub current_loan_balance: f64,
    pub current_available_redraw: f64,

    pub additional_redraws: Vec<RedrawRecord>,

    /// Weekly discretionary spending, actual and proposed
    pub weekly_spending_amount: f64,
    pub proposed_weekly_spending_amount: f64,
    pub weekly_spending_day: Weekday,

    pub has_external_debts: bool,

    pub current_property_valuation: f64,

    /// Proposed fixed monthly surplus diversion
    pub proposed_flex_amount: f64,

    pub review_period_type: ReviewPeriod,

    /// Coaching narrative fields
    pub recommendations: Vec<String>,
    pub closing_thoughts: String,
    pub financial_goals: Vec<FinancialGoal>,
    pub raw_redraws_text: String,
    pub coach_notes: String,

    pub manual_overrides: StepOverrides,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

impl HouseholdSnapshot {
    /// Worked example household used for demos and tests
    pub fn sample() -> Self {
        Self {
            client_email: "jordan.avery@example.com".to_string(),
            settlement_date: ymd(2023, 1, 15),
            settlement_loan_amount: 235_351.43,
            household_names: "Avery, Jordan and Morgan".to_string(),
            property_address: "16 Woodend Avenue, Eynesbury, VIC, 3338".to_string(),
            property_image_url: String::new(),
            start_date: "01/01/2025".to_string(),
            end_date: "31/12/2025".to_string(),
            original_debt_free_date: ymd(2048, 1, 15),
            previous_ood_date: ymd(2043, 1, 6),
            first_report_savings_rate: 2.0,
            previous_balance_90_days: 235_351.43,
            previous_balance_6_months: 235_351.43,
            previous_loan_90_days: 251.28,
            previous_loan_6_months: 3_015.33,
            monthly_data: vec![
                MonthlyRecord::derive("January", 11_951.14, 11_763.60, 235_538.97, 0.0, 0.0, 2_780.0),
                MonthlyRecord::derive("February", 11_955.13, 154_400.65, 93_093.45, 0.0, 142_869.13, 3_960.0),
                MonthlyRecord::derive("March", 10_802.92, 8_210.00, 95_686.37, 0.0, 0.0, 3_937.39),
                MonthlyRecord::derive("April", 11_654.00, 13_507.86, 93_832.51, 0.0, 0.0, 4_050.0),
                MonthlyRecord::derive("May", 16_868.03, 8_230.03, 102_470.51, 0.0, 0.0, 10_350.0),
                MonthlyRecord::derive("June", 8_301.73, 10_604.64, 100_167.60, 0.0, 0.0, 700.0),
                MonthlyRecord::derive("July", 7_692.62, 13_538.63, 94_321.59, 0.0, 0.0, 0.0),
                MonthlyRecord::derive("August", 9_803.31, 15_158.09, 88_966.81, 0.0, 0.0, 1_750.0),
                MonthlyRecord::derive("September", 11_522.86, 12_244.38, 88_245.29, 0.0, 0.0, 2_836.0),
                MonthlyRecord::derive("October", 12_375.58, 18_926.99, 81_693.88, 0.0, 0.0, 2_596.0),
                MonthlyRecord::derive("November", 13_162.44, 11_751.97, 83_104.35, 0.0, 0.0, 5_538.0),
                MonthlyRecord::derive("December", 18_558.24, 12_195.62, 89_466.97, 0.0, 0.0, 11_333.0),
            ],
            current_loan_balance: 89_466.97,
            current_available_redraw: 36_162.0,
            additional_redraws: vec![
                redraw("1", "28.01.25", 100.00, "Hockey academy fees and school transit card top-ups", "January"),
                redraw("2", "20.01.25", 1_800.00, "Dentist, investment property water bill, interstate flights", "January"),
                redraw("3", "16.01.25", 250.00, "Kids school shoes", "January"),
                redraw("4", "15.01.25", 230.00, "Osteo appointment and mobile phone bill", "January"),
                redraw("5", "08.01.25", 150.00, "Daughter's birthday", "January"),
                redraw("6", "02.01.25", 250.00, "Dog food and vet supplies", "January"),
                redraw("7", "18.02.25", 3_000.00, "Credit card payment", "February"),
                redraw("8", "13.02.25", 160.00, "Phone bills", "February"),
                redraw("9", "11.02.25", 500.00, "Sport registration, transit cards, gas bottles", "February"),
                redraw("10", "05.02.25", 300.00, "Birthday gift, coaching fees, medical costs", "February"),
            ],
            weekly_spending_amount: 500.0,
            proposed_weekly_spending_amount: 500.0,
            weekly_spending_day: Weekday::Wed,
            has_external_debts: false,
            current_property_valuation: 775_000.0,
            proposed_flex_amount: 2_000.0,
            review_period_type: ReviewPeriod::TwelveMonths,
            recommendations: vec![
                "Reduce owner-occupied debt by 75%".to_string(),
                "Retire the credit card and move to cash-only spending next year".to_string(),
            ],
            closing_thoughts: "An expensive end to the year has undone part of the progress made \
                in the first half. Resetting with a fixed flex amount and cash-only spending \
                should see the owner-occupied debt cleared within four years."
                .to_string(),
            financial_goals: vec![
                FinancialGoal {
                    id: "1".to_string(),
                    goal: "Remove the credit card and use cash to push forward faster".to_string(),
                    progress: 0.0,
                },
                FinancialGoal {
                    id: "2".to_string(),
                    goal: "Commit to a flex of $2,000".to_string(),
                    progress: 0.0,
                },
            ],
            raw_redraws_text: String::new(),
            coach_notes: String::new(),
            manual_overrides: StepOverrides::default(),
        }
    }
}

fn redraw(id: &str, date: &str, amount: f64, description: &str, month: &str) -> RedrawRecord {
    RedrawRecord {
        id: id.to_string(),
        date: date.to_string(),
        amount,
        description: description.to_string(),
        excluded: false,
        month: Some(month.to_string()),
    }
}
