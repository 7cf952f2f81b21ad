//! Coaching Engine CLI
//!
//! Command-line interface for running household debt-reduction reviews

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use coach_engine::review::{
    step_target, StepTarget, NATIONAL_AVG_SAVINGS_RATE, STEP_CATALOGUE, TARGET_SAVINGS_RATE,
};
use coach_engine::scenario::ScenarioRunner;
use coach_engine::snapshot::{load_snapshot, parse_pasted_redraws, save_snapshot};
use coach_engine::{aggregate, CalculationResult, HouseholdSnapshot, PayoffOutcome, StepStatus};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coach_engine", version, about = "Household debt-reduction coaching engine")]
struct Cli {
    /// Anchor date for projections (defaults to today)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a review and print the report tables
    Review {
        /// Household scenario file (JSON)
        snapshot: PathBuf,
    },
    /// Write the baseline/flex/previous trajectory series as CSV for charting
    Project {
        snapshot: PathBuf,
        #[arg(long, default_value = "trajectories.csv")]
        out: PathBuf,
    },
    /// Export the calculation results as JSON for the report renderer
    Export {
        snapshot: PathBuf,
        #[arg(long, default_value = "results.json")]
        out: PathBuf,
    },
    /// Parse the scenario's raw redraw notes into structured records
    Ingest {
        snapshot: PathBuf,
        /// Where to write the updated scenario (defaults to in place)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the built-in sample household scenario
    Sample {
        #[arg(long, default_value = "sample_scenario.json")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());

    match cli.command {
        Command::Review { snapshot } => {
            let household = load_household(&snapshot)?;
            let results = aggregate(&household, as_of);
            print_review(&household, &results, as_of);
        }
        Command::Project { snapshot, out } => {
            let household = load_household(&snapshot)?;
            let results = aggregate(&household, as_of);
            let scenarios = ScenarioRunner::new().for_review(&household, &results, as_of);

            let mut file = File::create(&out)
                .with_context(|| format!("unable to create {}", out.display()))?;
            writeln!(file, "Scenario,Label,Year,Balance")?;
            for scenario in scenarios.iter() {
                for point in &scenario.projection.points {
                    writeln!(
                        file,
                        "{},{},{:.4},{:.2}",
                        scenario.kind.label(),
                        point.label,
                        point.year,
                        point.balance
                    )?;
                }
            }
            println!("Trajectories written to: {}", out.display());
        }
        Command::Export { snapshot, out } => {
            let household = load_household(&snapshot)?;
            let results = aggregate(&household, as_of);
            let file = File::create(&out)
                .with_context(|| format!("unable to create {}", out.display()))?;
            serde_json::to_writer_pretty(file, &results)?;
            println!("Results written to: {}", out.display());
        }
        Command::Ingest { snapshot, out } => {
            let mut household = load_household(&snapshot)?;
            let next_id = household.additional_redraws.len() as u32 + 1;
            let parsed =
                parse_pasted_redraws(&household.raw_redraws_text, &as_of.to_string(), next_id);
            println!("Parsed {} redraw records", parsed.len());

            household.additional_redraws.extend(parsed);
            household.raw_redraws_text.clear();

            let out = out.unwrap_or(snapshot);
            save_snapshot(&out, &household)
                .with_context(|| format!("unable to write {}", out.display()))?;
            println!("Updated scenario written to: {}", out.display());
        }
        Command::Sample { out } => {
            save_snapshot(&out, &HouseholdSnapshot::sample())
                .with_context(|| format!("unable to write {}", out.display()))?;
            println!("Sample scenario written to: {}", out.display());
        }
    }

    Ok(())
}

fn load_household(path: &PathBuf) -> anyhow::Result<HouseholdSnapshot> {
    load_snapshot(path).with_context(|| format!("loading {}", path.display()))
}

fn print_review(household: &HouseholdSnapshot, results: &CalculationResult, as_of: NaiveDate) {
    println!("Coaching Engine v0.1.0");
    println!("======================\n");

    println!("Household: {}", household.household_names);
    println!("  Property: {}", household.property_address);
    println!("  Review period: {} - {}", household.start_date, household.end_date);
    println!("  Settlement amount: ${:.2}", household.settlement_loan_amount);
    println!("  Current balance: ${:.2}", household.current_loan_balance);
    println!();

    // Annual report table
    println!(
        "{:<10} {:>12} {:>12} {:>14} {:>12} {:>14} {:>10} {:>8}",
        "Month", "Debit", "Credit", "Balance", "One-off Cr", "Reduction", "Redraws", "Rate%"
    );
    println!("{}", "-".repeat(98));
    for record in &household.monthly_data {
        println!(
            "{:<10} {:>12.2} {:>12.2} {:>14.2} {:>12.2} {:>14.2} {:>10.2} {:>8.1}",
            record.month,
            record.debit,
            record.credit,
            record.loan_balance,
            record.one_off_credits_removed,
            record.actual_debt_reduction,
            record.redraws,
            record.savings_rate,
        );
    }
    println!();

    // Key achievements
    println!("Results and key achievements:");
    println!("  Total debt reduction: ${:.2}", results.total_debt_reduction);
    println!("  Avg monthly debt reduction: ${:.2}", results.avg_monthly_debt_reduction);
    println!("  Last 6 months reduction: ${:.2}", results.last6_months_reduction);
    println!("  Avg monthly income: ${:.2}", results.avg_monthly_income);
    println!("  Avg monthly expenses: ${:.2}", results.avg_monthly_expenses);
    println!(
        "  Savings rate: {:.1}% (national average {:.0}%, program target {:.0}%)",
        results.savings_rate, NATIONAL_AVG_SAVINGS_RATE, TARGET_SAVINGS_RATE
    );
    println!("  {}", results.savings_rate_sentence);
    println!("  Improvement vs first report: {:.1}%", results.beating_previous_percent);
    println!();

    println!("Redraw activity:");
    println!("  Total additional redraws: ${:.2}", results.total_additional_redraws);
    println!("  Avg monthly redraws: ${:.2}", results.avg_monthly_additional_redraws);
    println!("  Proposed flex amount: ${:.2}", household.proposed_flex_amount);
    println!();

    println!("Property:");
    println!("  Valuation: ${:.2}", household.current_property_valuation);
    println!("  LVR: {:.1}%", results.current_lvr);
    println!(
        "  You own {:.0}% / the bank owns {:.0}%",
        results.home_ownership.you_own, results.home_ownership.bank_owns
    );
    println!();

    // Steps table
    println!("The 12 steps to financial security ({} achieved):", results.steps_status.achieved());
    println!("{:>4}  {:<30} {:>16}  {}", "Step", "Description", "Target", "Achieved");
    println!("{}", "-".repeat(78));
    for info in STEP_CATALOGUE {
        let status = results
            .steps_status
            .get(info.id)
            .unwrap_or(StepStatus::No);
        let target = match step_target(info.id, household, results.avg_monthly_expenses) {
            StepTarget::Amount(amount) => format!("${:.2}", amount),
            StepTarget::Rate(rate) => format!("{:.1}%", rate),
            StepTarget::Label(label) => label.to_string(),
            StepTarget::Discretion => String::new(),
        };
        let achieved = match status {
            StepStatus::Yes => "YES",
            StepStatus::No => "NO",
            StepStatus::AtDiscretion => "At your discretion",
        };
        println!("{:>4}  {:<30} {:>16}  {}", info.id, info.title, target, achieved);
    }
    println!();

    // Out-of-debt projections
    println!("Out of debt projection (as of {}):", as_of);
    println!("  Projected debt-free date: {}", results.current_debt_free_date.format("%d/%m/%Y"));
    println!(
        "  Baseline: {:.0} years saved, ${:.2} interest saved",
        results.years_saved_base, results.money_saved_base
    );
    println!(
        "  With flex: {:.0} years saved, ${:.2} interest saved",
        results.years_saved_flex, results.money_saved_flex
    );

    let scenarios = ScenarioRunner::new().for_review(household, results, as_of);
    println!();
    println!("{:<15} {:>14} {:>10} {:>14}", "Scenario", "Capacity/mo", "Months", "Debt-free");
    println!("{}", "-".repeat(56));
    for scenario in scenarios.iter() {
        let months = match scenario.projection.outcome {
            PayoffOutcome::PaidOff { months } => months.to_string(),
            PayoffOutcome::NeverPaysOff => "never".to_string(),
            PayoffOutcome::StillOwingAtHorizon => "30+ yrs".to_string(),
        };
        let date = scenario
            .debt_free_date
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<15} {:>14.2} {:>10} {:>14}",
            scenario.kind.label(),
            scenario.monthly_capacity,
            months,
            date
        );
    }
}
