//! Review metrics and the twelve-step financial-security track

mod metrics;
mod steps;

pub use metrics::{aggregate, CalculationResult, HomeOwnership};
pub use steps::{
    evaluate_steps, step_target, StepInfo, StepTarget, StepsStatus, NATIONAL_AVG_SAVINGS_RATE,
    STEP_CATALOGUE, TARGET_SAVINGS_RATE,
};
