//! Month-by-month payoff projection for a reducing loan balance

use serde::Serialize;

/// Nominal annual interest rate assumed when none is supplied
pub const DEFAULT_ANNUAL_RATE: f64 = 0.06;

/// Hard cap on the simulation horizon (30 years)
pub const HORIZON_MONTHS: u32 = 360;

const HORIZON_YEARS: usize = 30;

/// One sampled point on a projected balance curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    /// Axis label: whole years while projecting, one decimal at payoff
    pub label: String,

    /// Years from the projection start
    pub year: f64,

    /// Projected balance at this point
    pub balance: f64,
}

/// How a projection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PayoffOutcome {
    /// Balance reached zero at the given simulation month
    PaidOff { months: u32 },

    /// Capacity does not cover the interest charge; balance frozen to the horizon
    NeverPaysOff,

    /// Balance still positive after 30 years
    StillOwingAtHorizon,
}

/// A complete projected trajectory: at most 31 yearly samples plus the outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoffProjection {
    pub points: Vec<BalancePoint>,
    pub outcome: PayoffOutcome,
}

impl PayoffProjection {
    /// Months until the balance reaches zero, when it does
    pub fn months_to_zero(&self) -> Option<u32> {
        match self.outcome {
            PayoffOutcome::PaidOff { months } => Some(months),
            PayoffOutcome::NeverPaysOff | PayoffOutcome::StillOwingAtHorizon => None,
        }
    }

    /// True when the trajectory reaches a zero balance within the horizon
    pub fn is_paid_off(&self) -> bool {
        matches!(self.outcome, PayoffOutcome::PaidOff { .. })
    }

    /// Balance at the last sampled point
    pub fn final_balance(&self) -> f64 {
        self.points.last().map(|p| p.balance).unwrap_or(0.0)
    }
}

/// Project a loan balance forward under a fixed monthly repayment capacity
///
/// Each month charges `annual_rate / 12` on the current balance and repays
/// `monthly_capacity - interest` of principal. A sample is recorded at the
/// start of every 12th month; when the balance reaches zero a final zero
/// sample lands at the fractional year of payoff.
///
/// If the capacity does not cover a month's interest charge, the loan can
/// never reach zero under these terms: the series flattens at the current
/// balance out to year 30 and the simulation stops with `NeverPaysOff`.
pub fn project_payoff(balance: f64, monthly_capacity: f64, annual_rate: f64) -> PayoffProjection {
    let monthly_rate = annual_rate / 12.0;
    let mut points = Vec::new();
    let mut current = balance;
    let mut month: u32 = 0;

    while current > 0.0 && month < HORIZON_MONTHS {
        if month % 12 == 0 {
            let year = month / 12;
            points.push(BalancePoint {
                label: year.to_string(),
                year: year as f64,
                balance: current.max(0.0),
            });
        }

        let interest_charge = current * monthly_rate;
        let principal_reduction = monthly_capacity - interest_charge;
        if principal_reduction <= 0.0 {
            for year in points.len()..=HORIZON_YEARS {
                points.push(BalancePoint {
                    label: year.to_string(),
                    year: year as f64,
                    balance: current,
                });
            }
            return PayoffProjection {
                points,
                outcome: PayoffOutcome::NeverPaysOff,
            };
        }

        current -= principal_reduction;
        month += 1;
    }

    if current <= 0.0 {
        let year = month as f64 / 12.0;
        points.push(BalancePoint {
            label: format!("{:.1}", year),
            year,
            balance: 0.0,
        });
        PayoffProjection {
            points,
            outcome: PayoffOutcome::PaidOff { months: month },
        }
    } else {
        PayoffProjection {
            points,
            outcome: PayoffOutcome::StillOwingAtHorizon,
        }
    }
}

/// Project at the default 6% nominal annual rate
pub fn project_payoff_default(balance: f64, monthly_capacity: f64) -> PayoffProjection {
    project_payoff(balance, monthly_capacity, DEFAULT_ANNUAL_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_capacity_equal_to_interest_never_pays_off() {
        // Monthly interest on $100k at 6% is exactly $500
        let projection = project_payoff(100_000.0, 500.0, 0.06);

        assert_eq!(projection.outcome, PayoffOutcome::NeverPaysOff);
        assert_eq!(projection.months_to_zero(), None);
        assert_eq!(projection.points.len(), 31);
        assert!(projection.points.iter().all(|p| p.balance == 100_000.0));
        assert_eq!(projection.points[0].year, 0.0);
        assert_eq!(projection.points[30].year, 30.0);
    }

    #[test]
    fn test_zero_interest_pays_off_in_exact_months() {
        let projection = project_payoff(10_000.0, 1_000.0, 0.0);

        assert_eq!(projection.outcome, PayoffOutcome::PaidOff { months: 10 });
        assert_eq!(projection.months_to_zero(), Some(10));
        assert!(projection.is_paid_off());

        // One sample at year zero, one zero-balance sample at payoff
        assert_eq!(projection.points.len(), 2);
        assert_eq!(projection.points[0].balance, 10_000.0);
        assert_eq!(projection.points[0].label, "0");
        assert_eq!(projection.points[1].balance, 0.0);
        assert_relative_eq!(projection.points[1].year, 10.0 / 12.0, epsilon = 1e-12);
        assert_eq!(projection.points[1].label, "0.8");
    }

    #[test]
    fn test_slow_capacity_still_owing_at_horizon() {
        // $550/month against $100k at 6% takes around 40 years
        let projection = project_payoff(100_000.0, 550.0, 0.06);

        assert_eq!(projection.outcome, PayoffOutcome::StillOwingAtHorizon);
        assert_eq!(projection.months_to_zero(), None);
        assert_eq!(projection.points.len(), 30);
        assert!(projection.final_balance() > 0.0);
    }

    #[test]
    fn test_already_paid_off_balance() {
        let projection = project_payoff(0.0, 500.0, 0.06);

        assert_eq!(projection.outcome, PayoffOutcome::PaidOff { months: 0 });
        assert_eq!(projection.points.len(), 1);
        assert_eq!(projection.points[0].balance, 0.0);
    }

    #[test]
    fn test_balance_declines_monotonically_when_converging() {
        let projection = project_payoff(89_466.97, 1_200.0, 0.06);

        assert!(projection.is_paid_off());
        for pair in projection.points.windows(2) {
            assert!(pair[1].balance < pair[0].balance);
        }
    }

    #[test]
    fn test_higher_capacity_pays_off_sooner() {
        let slow = project_payoff(100_000.0, 1_000.0, 0.06);
        let fast = project_payoff(100_000.0, 2_000.0, 0.06);

        assert!(fast.months_to_zero().unwrap() < slow.months_to_zero().unwrap());
    }
}
