//! Payoff projection engine for loan-balance trajectories

mod engine;

pub use engine::{
    project_payoff, project_payoff_default, BalancePoint, PayoffOutcome, PayoffProjection,
    DEFAULT_ANNUAL_RATE, HORIZON_MONTHS,
};
