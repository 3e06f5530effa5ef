//! `dqt validate` command - check a plan against the treatment catalog

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::plan::{Severity, TreatmentPlan};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Plan file to check
    pub file: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let plan = TreatmentPlan::load(&args.file).map_err(|e| miette::miette!("{}", e))?;
    let issues = plan.validate();

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;

    for issue in &issues {
        match issue.severity {
            Severity::Error => println!(
                "{} {}: {}",
                style("error").red().bold(),
                style(issue.site).cyan(),
                issue.message
            ),
            Severity::Warning => println!(
                "{} {}: {}",
                style("warning").yellow().bold(),
                style(issue.site).cyan(),
                issue.message
            ),
        }
    }

    if errors > 0 || (args.strict && warnings > 0) {
        return Err(miette::miette!(
            "plan has {} error(s) and {} warning(s)",
            errors,
            warnings
        ));
    }

    if !global.quiet {
        if warnings > 0 {
            println!(
                "{} Plan is valid ({} warning(s))",
                style("✓").green(),
                warnings
            );
        } else {
            println!("{} Plan is valid", style("✓").green());
        }
    }

    Ok(())
}
