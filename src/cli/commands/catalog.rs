//! `dqt catalog` command - list the treatment catalog

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::catalog::{self, Phase, Rate, DEFAULT_RATE_PER_MINUTE, MAX_MINUTES, MINUTE_STEP};
use crate::cli::helpers::escape_csv;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

/// Phase filter for catalog listing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PhaseFilter {
    Stabilisation,
    Restoration,
    Rehabilitation,
    All,
}

#[derive(clap::Args, Debug)]
pub struct CatalogArgs {
    /// Filter by phase
    #[arg(long, short = 'p', default_value = "all")]
    pub phase: PhaseFilter,
}

#[derive(serde::Serialize)]
struct CatalogRow {
    phase: Phase,
    treatment: &'static str,
    rate_per_minute: f64,
    flat_price: Option<f64>,
    lab_fee: bool,
    follow_on: Vec<&'static str>,
    estimate_only: bool,
}

pub fn run(args: CatalogArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let currency = config.currency();

    let rows: Vec<CatalogRow> = catalog::entries()
        .iter()
        .filter(|e| match args.phase {
            PhaseFilter::Stabilisation => e.phase == Phase::Stabilisation,
            PhaseFilter::Restoration => e.phase == Phase::Restoration,
            PhaseFilter::Rehabilitation => e.phase == Phase::Rehabilitation,
            PhaseFilter::All => true,
        })
        .map(|e| CatalogRow {
            phase: e.phase,
            treatment: e.name,
            rate_per_minute: e.rate.per_minute(),
            flat_price: match e.rate {
                Rate::FlatProcedure(price) => Some(price),
                Rate::PerMinute(_) => None,
            },
            lab_fee: e.allows_lab_fee,
            follow_on: e.follow_on.to_vec(),
            estimate_only: e.disclaimer.is_some(),
        })
        .collect();

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&rows).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("phase,treatment,rate_per_minute,flat_price,lab_fee,follow_on,estimate_only");
            for row in &rows {
                println!(
                    "{},{},{:.4},{},{},{},{}",
                    row.phase,
                    escape_csv(row.treatment),
                    row.rate_per_minute,
                    row.flat_price.map_or(String::new(), |p| format!("{p:.2}")),
                    row.lab_fee,
                    escape_csv(&row.follow_on.join("; ")),
                    row.estimate_only
                );
            }
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["Phase", "Treatment", "Rate", "Lab fee", "Follow-on", "Estimate only"]);

            for row in &rows {
                let rate = match row.flat_price {
                    Some(price) => format!("{currency}{price:.0} flat"),
                    None => format!("{currency}{:.2}/min", row.rate_per_minute),
                };
                builder.push_record([
                    row.phase.to_string(),
                    row.treatment.to_string(),
                    rate,
                    if row.lab_fee { "yes" } else { "-" }.to_string(),
                    if row.follow_on.is_empty() {
                        "-".to_string()
                    } else {
                        row.follow_on.join(", ")
                    },
                    if row.estimate_only { "yes" } else { "-" }.to_string(),
                ]);
            }

            let table = builder.build().with(Style::sharp()).to_string();
            println!("{}", table);

            if !global.quiet {
                println!(
                    "{} treatment(s). Default rate {currency}{DEFAULT_RATE_PER_MINUTE}/min; \
                     time in {MINUTE_STEP}-minute steps up to {MAX_MINUTES} minutes.",
                    style(rows.len()).cyan()
                );
            }
        }
    }

    Ok(())
}
