//! `dqt quote` command - price a plan and print the grouped quotation

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::escape_csv;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::plan::TreatmentPlan;
use crate::quote::{format_money, Quotation};

#[derive(clap::Args, Debug)]
pub struct QuoteArgs {
    /// Plan file to price
    pub file: PathBuf,
}

pub fn run(args: QuoteArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let currency = config.currency();

    let plan = TreatmentPlan::load(&args.file).map_err(|e| miette::miette!("{}", e))?;
    let quotation = Quotation::build(&plan);

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&quotation).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&quotation).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("phase,site,treatment,minutes,lab_fee,cost");
            for item in quotation.items() {
                println!(
                    "{},{},{},{},{:.2},{:.2}",
                    item.phase,
                    item.site,
                    escape_csv(&item.treatment),
                    item.minutes,
                    item.lab_fee,
                    item.cost
                );
            }
        }
        OutputFormat::Md => {
            println!("# {}", crate::quote::TITLE);
            println!();
            for section in &quotation.sections {
                println!("## {}", section.heading());
                println!();
                println!("| Site | Treatment | Cost |");
                println!("|---|---|---|");
                for item in &section.items {
                    println!(
                        "| {} | {} | {} |",
                        item.site_description,
                        item.treatment,
                        format_money(&currency, item.cost)
                    );
                }
                println!();
            }
            println!("**Total Cost: {}**", format_money(&currency, quotation.total));
        }
        OutputFormat::Text => {
            // plain rendering, shared with the PDF target's content model
            print!("{}", crate::quote::text::render(&quotation, &currency));
        }
        OutputFormat::Auto => print_styled(&quotation, &currency, global),
    }

    Ok(())
}

fn print_styled(quotation: &Quotation, currency: &str, global: &GlobalOpts) {
    if !global.quiet {
        println!("{}", style(crate::quote::TITLE).bold());
        if let Some(patient) = &quotation.patient {
            println!("{}: {}", style("Patient").bold(), patient);
        }
        if let Some(clinician) = &quotation.clinician {
            println!("{}: {}", style("Clinician").bold(), clinician);
        }
        if let Some(date) = quotation.date {
            println!("{}: {}", style("Date").bold(), date);
        }
    }

    for section in &quotation.sections {
        println!();
        println!("{}", style(section.heading()).bold().underlined());
        for item in &section.items {
            println!(
                "  {} - {} - {}",
                style(&item.site_description).cyan(),
                item.treatment,
                style(format_money(currency, item.cost)).yellow()
            );
            if global.verbose {
                println!(
                    "    {}",
                    style(format!(
                        "{} min + {} lab",
                        item.minutes,
                        format_money(currency, item.lab_fee)
                    ))
                    .dim()
                );
            }
            if let Some(disclaimer) = &item.disclaimer {
                println!("    {}", style(format!("* {disclaimer}")).dim());
            }
        }
    }

    if quotation.sections.is_empty() && !global.quiet {
        println!();
        println!("{}", style("No treatments selected.").dim());
    }

    if !quotation.notes.is_empty() && !global.quiet {
        println!();
        println!("{}", style("Notes:").bold());
        for line in quotation.notes.lines() {
            println!("  {line}");
        }
    }

    println!();
    println!(
        "{}: {}",
        style("Total Cost").bold(),
        style(format_money(currency, quotation.total)).green().bold()
    );
}
