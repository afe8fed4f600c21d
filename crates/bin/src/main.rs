//! Paddock CLI binary.
//!
//! Command-line interface for the Paddock performance-factor analytics
//! pipeline: descriptive statistics, cross-validated model evaluation,
//! source consistency audits, and dashboard maintenance.

use clap::{Parser, Subcommand};
use paddock::DriverRoster;
use paddock_data::{
    DashboardDocument, DriverFactorsDocument, DriverKeyedDocument, FactorBreakdown, LoaderConfig,
    ScoreTable, SqliteAggregateSource,
};
use paddock_model::{
    dataset_from_frame, evaluate_k_fold, evaluate_leave_one_race_out, in_sample_fit,
};
use paddock_output::{
    AnalysisSummary, ConsistencyReport, ExportFormat, Exporter, driver_completeness,
    fold_metric_rows,
};
use paddock_stats::{between_driver_spread, describe_factors, driver_aggregates, normalized_scores};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "paddock")]
#[command(about = "Paddock: performance-factor analytics for motorsport dashboards", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Descriptive statistics for a factor score table
    Stats {
        /// Path to the factor score CSV
        scores: PathBuf,

        /// Season label for the report
        #[arg(long, default_value = "season")]
        season: String,

        /// Factor columns to analyze (defaults to the standard four)
        #[arg(long = "factor")]
        factors: Vec<String>,

        /// Render as Markdown instead of an ASCII table
        #[arg(long)]
        markdown: bool,

        /// Export factor summaries as CSV to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Cross-validated evaluation of the finishing-position model
    Validate {
        /// Path to the factor score CSV
        scores: PathBuf,

        /// Number of folds
        #[arg(long, default_value = "5")]
        k: usize,

        /// Shuffle seed for fold assignment
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Factor columns to fit (defaults to the standard four)
        #[arg(long = "factor")]
        factors: Vec<String>,

        /// Export per-fold metrics as CSV to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Audit factor aggregates and driver coverage across sources
    Consistency {
        /// Path to the driver-factor JSON document
        factors: PathBuf,

        /// Path to the relational breakdown store
        #[arg(long)]
        db: Option<PathBuf>,

        /// Absolute tolerance on the 0-100 scale
        #[arg(long, default_value_t = paddock_output::DEFAULT_TOLERANCE)]
        tolerance: f64,

        /// Season stats JSON for the completeness check
        #[arg(long)]
        season_stats: Option<PathBuf>,

        /// Race results JSON for the completeness check
        #[arg(long)]
        race_results: Option<PathBuf>,
    },

    /// Populate the relational breakdown store from a score table
    LoadDb {
        /// Path to the factor score CSV
        scores: PathBuf,

        /// Path to the relational breakdown store
        db: PathBuf,

        /// Race identifier to load (defaults to all races)
        #[arg(long)]
        race: Option<String>,

        /// Factor columns to normalize (defaults to the standard four)
        #[arg(long = "factor")]
        factors: Vec<String>,
    },

    /// Rewrite dashboard driver names from a roster mapping
    PatchNames {
        /// Path to the dashboard JSON document
        dashboard: PathBuf,

        /// Path to the roster JSON mapping (number to name)
        roster: PathBuf,

        /// Write to this path instead of updating in place
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats {
            scores,
            season,
            factors,
            markdown,
            export,
        } => run_stats(&scores, season, factors, markdown, export.as_deref()),
        Commands::Validate {
            scores,
            k,
            seed,
            factors,
            export,
        } => run_validate(&scores, k, seed, factors, export.as_deref()),
        Commands::Consistency {
            factors,
            db,
            tolerance,
            season_stats,
            race_results,
        } => run_consistency(
            &factors,
            db.as_deref(),
            tolerance,
            season_stats.as_deref(),
            race_results.as_deref(),
        ),
        Commands::LoadDb {
            scores,
            db,
            race,
            factors,
        } => run_load_db(&scores, &db, race.as_deref(), factors),
        Commands::PatchNames {
            dashboard,
            roster,
            output,
        } => run_patch_names(&dashboard, &roster, output.as_deref()),
    }
}

fn loader_config(factors: Vec<String>) -> LoaderConfig {
    if factors.is_empty() {
        LoaderConfig::default()
    } else {
        LoaderConfig {
            factor_columns: factors,
        }
    }
}

fn run_stats(
    scores: &std::path::Path,
    season: String,
    factors: Vec<String>,
    markdown: bool,
    export: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = loader_config(factors);
    let table = ScoreTable::from_csv_path(scores, &config)?;
    let df = table.to_dataframe()?;
    let factor_columns = table.factor_columns().to_vec();

    let mut summary = AnalysisSummary::new(season, factor_columns.clone());
    summary.records_used = table.len();
    summary.records_skipped = table.skipped();
    summary.factor_summaries = describe_factors(&df, &factor_columns)?;
    summary.driver_aggregates = driver_aggregates(&df, &factor_columns)?;
    summary.spreads = between_driver_spread(&summary.driver_aggregates, &factor_columns);

    if markdown {
        println!("{}", summary.to_markdown());
    } else {
        println!("{}", summary.to_ascii_table());
    }

    if let Some(path) = export {
        summary.factor_summaries.export_to_file(path, ExportFormat::Csv)?;
        println!("Factor summaries exported to {}", path.display());
    }

    Ok(())
}

fn run_validate(
    scores: &std::path::Path,
    k: usize,
    seed: u64,
    factors: Vec<String>,
    export: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = loader_config(factors);
    let table = ScoreTable::from_csv_path(scores, &config)?;
    let df = table.to_dataframe()?;
    let factor_columns = table.factor_columns().to_vec();

    let dataset = dataset_from_frame(&df, &factor_columns)?;
    if dataset.dropped > 0 {
        eprintln!(
            "Warning: {} record(s) without a finishing position excluded from the model",
            dataset.dropped
        );
    }

    let fit = in_sample_fit(&dataset)?;
    println!("\nFull-sample fit ({} records):", dataset.len());
    println!("  Intercept: {:.4}", fit.model.intercept);
    for (factor, coefficient) in factor_columns.iter().zip(&fit.model.coefficients) {
        println!("  {:<24} {:>10.4}", factor, coefficient);
    }
    println!("  In-sample R2: {:.4}, MAE: {:.3}", fit.train_r2, fit.train_mae);

    let mut summary = AnalysisSummary::new("validation".to_string(), factor_columns);
    summary.records_used = dataset.len();
    summary.records_skipped = dataset.dropped + table.skipped();
    summary.cross_validation.push(evaluate_k_fold(&dataset, k, seed)?);

    let distinct_races: std::collections::BTreeSet<&String> = dataset.races.iter().collect();
    if distinct_races.len() >= 2 {
        summary
            .cross_validation
            .push(evaluate_leave_one_race_out(&dataset)?);
    } else {
        eprintln!("Warning: only one race present, skipping race-grouped validation");
    }

    println!("{}", summary.to_ascii_table());

    if let Some(gap) = summary.worst_generalization_gap() {
        if gap > 0.2 {
            println!(
                "Note: in-sample R2 exceeds out-of-sample R2 by {:.3}; the model may be overfit.",
                gap
            );
        }
    }

    if let Some(path) = export {
        let rows = fold_metric_rows(&summary.cross_validation);
        rows.export_to_file(path, ExportFormat::Csv)?;
        println!("Fold metrics exported to {}", path.display());
    }

    Ok(())
}

fn run_consistency(
    factors: &std::path::Path,
    db: Option<&std::path::Path>,
    tolerance: f64,
    season_stats: Option<&std::path::Path>,
    race_results: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = DriverFactorsDocument::load(factors)?;

    if let Some(db_path) = db {
        let sqlite = SqliteAggregateSource::open(db_path)?;
        let report = ConsistencyReport::compare_with_tolerance(&document, &sqlite, tolerance)?;
        println!("{}", report.to_ascii_table());
    } else {
        println!(
            "No relational store given; skipping aggregate comparison for {}",
            factors.display()
        );
    }

    if let (Some(season_path), Some(results_path)) = (season_stats, race_results) {
        let season = DriverKeyedDocument::load(season_path)?;
        let results = DriverKeyedDocument::load(results_path)?;
        let missing = driver_completeness(
            season.source_name(),
            &season.driver_numbers(),
            results.source_name(),
            &results.driver_numbers(),
        );

        if missing.is_empty() {
            println!(
                "Coverage: {} and {} describe the same {} driver(s)",
                season.source_name(),
                results.source_name(),
                season.driver_numbers().len()
            );
        } else {
            println!("Coverage gaps between season stats and race results:");
            for m in &missing {
                println!(
                    "  #{} (in {}, missing from {})",
                    m.driver_number, m.present_in, m.missing_from
                );
            }
        }
    }

    Ok(())
}

fn run_load_db(
    scores: &std::path::Path,
    db: &std::path::Path,
    race: Option<&str>,
    factors: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = loader_config(factors);
    let table = ScoreTable::from_csv_path(scores, &config)?;
    let df = table.to_dataframe()?;
    let factor_columns = table.factor_columns().to_vec();

    let normalized = normalized_scores(&df, &factor_columns)?;
    let breakdowns: Vec<FactorBreakdown> = normalized
        .into_iter()
        .filter(|n| race.is_none_or(|r| n.race == r))
        .map(|n| FactorBreakdown {
            driver_number: n.driver_number,
            race: n.race,
            factor_name: n.factor,
            normalized_value: n.scaled,
            percentile: n.percentile,
        })
        .collect();

    let source = SqliteAggregateSource::open(db)?;
    source.put_breakdowns(&breakdowns)?;
    println!(
        "Stored {} breakdown row(s) in {} ({} total)",
        breakdowns.len(),
        db.display(),
        source.count()?
    );

    Ok(())
}

fn run_patch_names(
    dashboard: &std::path::Path,
    roster: &std::path::Path,
    output: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let roster = DriverRoster::from_json_file(roster)?;
    let mut document = DashboardDocument::load(dashboard)?;

    let updated = document.update_driver_names(|number| roster.name(number).map(String::from));
    let target = output.unwrap_or(dashboard);
    document.save(target)?;

    println!(
        "Updated {} driver name(s) in {} (roster covers {} drivers)",
        updated,
        target.display(),
        roster.len()
    );

    Ok(())
}
