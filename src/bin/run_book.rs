//! Run reviews for every household scenario in a directory
//!
//! Outputs one summary row per household plus book-level totals, for
//! coaching-book triage.

use anyhow::Context;
use chrono::Local;
use coach_engine::snapshot::load_snapshot;
use coach_engine::{aggregate, CalculationResult};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

struct BookRow {
    household: String,
    months: usize,
    results: CalculationResult,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "book".to_string());
    let as_of = Local::now().date_naive();

    let start = Instant::now();
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .with_context(|| format!("unable to read directory {dir}"))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    println!("Found {} scenario files in {dir}", paths.len());

    let mut rows: Vec<BookRow> = paths
        .par_iter()
        .filter_map(|path| match load_snapshot(path) {
            Ok(snapshot) => {
                let results = aggregate(&snapshot, as_of);
                Some(BookRow {
                    household: snapshot.household_names,
                    months: snapshot.monthly_data.len(),
                    results,
                })
            }
            Err(err) => {
                log::warn!("skipping {}: {err}", path.display());
                None
            }
        })
        .collect();
    rows.sort_by(|a, b| a.household.cmp(&b.household));

    println!("Reviewed {} households in {:?}\n", rows.len(), start.elapsed());

    println!(
        "{:<35} {:>6} {:>16} {:>14} {:>8} {:>6} {:>12}",
        "Household", "Months", "Total Reduction", "Avg Monthly", "Rate%", "Steps", "Debt-free"
    );
    println!("{}", "-".repeat(103));
    for row in &rows {
        println!(
            "{:<35} {:>6} {:>16.2} {:>14.2} {:>8.1} {:>6} {:>12}",
            row.household,
            row.months,
            row.results.total_debt_reduction,
            row.results.avg_monthly_debt_reduction,
            row.results.savings_rate,
            row.results.steps_status.achieved(),
            row.results.current_debt_free_date.format("%b %Y"),
        );
    }

    if !rows.is_empty() {
        let total_reduction: f64 = rows.iter().map(|r| r.results.total_debt_reduction).sum();
        let avg_rate: f64 =
            rows.iter().map(|r| r.results.savings_rate).sum::<f64>() / rows.len() as f64;
        let total_steps: usize = rows.iter().map(|r| r.results.steps_status.achieved()).sum();

        println!("{}", "-".repeat(103));
        println!("Book totals:");
        println!("  Total debt reduction: ${:.2}", total_reduction);
        println!("  Average savings rate: {:.1}%", avg_rate);
        println!(
            "  Steps achieved: {} / {}",
            total_steps,
            rows.len() * coach_engine::snapshot::STEP_COUNT
        );
    }

    Ok(())
}
