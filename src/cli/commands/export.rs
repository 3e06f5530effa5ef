//! `dqt export` command - write the quotation as a PDF

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::plan::TreatmentPlan;
use crate::quote::{pdf, Quotation};

/// Default export filename
pub const DEFAULT_OUTPUT: &str = "treatment-plan.pdf";

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Plan file to export
    pub file: PathBuf,

    /// Output PDF path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let currency = config.currency();

    let plan = TreatmentPlan::load(&args.file).map_err(|e| miette::miette!("{}", e))?;

    let mut quotation = Quotation::build(&plan);
    quotation.practice = config.practice.clone();
    if quotation.clinician.is_none() {
        quotation.clinician = Some(config.clinician());
    }

    let bytes = pdf::render(&quotation, &currency).map_err(|e| miette::miette!("{}", e))?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    fs::write(&output, &bytes).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Wrote quotation to {} ({} bytes)",
            style("✓").green(),
            style(output.display()).cyan(),
            bytes.len()
        );
    }

    Ok(())
}
