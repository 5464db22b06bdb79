//! Mortgage Projection CLI
//!
//! Command-line interface for computing amortization schedules

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use mortgage_projection::params::{load_params_json, load_scenarios_csv};
use mortgage_projection::report::{
    format_table, schedule_to_json, write_schedule_csv, write_summaries_csv, write_yearly_csv,
};
use mortgage_projection::schedule::DEFAULT_PMI_CANCELLATION_LTV;
use mortgage_projection::{AmortizationEngine, EngineConfig, ScenarioRunner};

#[derive(Parser)]
#[command(
    name = "mortgage_projection",
    version,
    about = "Month-by-month mortgage amortization and home equity projection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// LTV (%) at or below which PMI is cancelled
    #[arg(long, default_value_t = DEFAULT_PMI_CANCELLATION_LTV, global = true)]
    pmi_ltv: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the schedule for a single JSON parameter file
    Schedule {
        /// Path to the parameters JSON document
        #[arg(long)]
        params: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of months shown in table output
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Run every scenario in a CSV file and write one summary line per scenario
    Batch {
        /// Path to the scenarios CSV
        #[arg(long)]
        scenarios: PathBuf,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Yearly,
    Json,
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("unable to create {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn run_schedule(
    config: EngineConfig,
    params_path: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    limit: Option<usize>,
) -> Result<()> {
    let params = load_params_json(params_path)
        .with_context(|| format!("loading {}", params_path.display()))?;
    let schedule = AmortizationEngine::new(config).compute(&params)?;
    log::info!("computed {} months", schedule.len());

    let mut out = open_output(output)?;
    match format {
        OutputFormat::Table => {
            write!(out, "{}", format_table(&schedule.rows, limit))?;
            let summary = schedule.summary();
            writeln!(out)?;
            writeln!(out, "Summary:")?;
            writeln!(out, "  Months:              {}", summary.total_months)?;
            writeln!(out, "  Total interest:      {:.2}", summary.total_interest)?;
            writeln!(out, "  Total PMI:           {:.2}", summary.total_pmi)?;
            if let Some(month) = summary.pmi_cancelled_month {
                writeln!(out, "  PMI cancelled:       month {month}")?;
            }
            writeln!(out, "  Total tax benefit:   {:.2}", summary.total_tax_benefit)?;
            writeln!(out, "  Final equity:        {:.2}", summary.final_equity)?;
            if let Some(net) = summary.net_sales_proceeds {
                writeln!(out, "  Net sale proceeds:   {net:.2}")?;
            }
            for degeneracy in &schedule.degeneracies {
                writeln!(out, "  Note: {degeneracy:?}")?;
            }
        }
        OutputFormat::Csv => write_schedule_csv(&mut out, &schedule.rows)?,
        OutputFormat::Yearly => write_yearly_csv(&mut out, &schedule.yearly())?,
        OutputFormat::Json => writeln!(out, "{}", schedule_to_json(&schedule)?)?,
    }
    out.flush()?;
    Ok(())
}

fn run_batch(config: EngineConfig, scenarios_path: &Path, output: Option<&Path>) -> Result<()> {
    let scenarios = load_scenarios_csv(scenarios_path)
        .with_context(|| format!("loading {}", scenarios_path.display()))?;

    let runner = ScenarioRunner::with_config(config);
    let outcomes = runner.run_batch(&scenarios);
    for outcome in &outcomes {
        if let Err(err) = &outcome.result {
            log::error!("scenario {}: {err}", outcome.name);
        }
    }

    let mut out = open_output(output)?;
    write_summaries_csv(&mut out, &outcomes)?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = EngineConfig {
        pmi_cancellation_ltv: cli.pmi_ltv,
        ..Default::default()
    };

    match cli.command {
        Commands::Schedule { params, format, output, limit } => {
            run_schedule(config, &params, format, output.as_deref(), limit)
        }
        Commands::Batch { scenarios, output } => run_batch(config, &scenarios, output.as_deref()),
    }
}
