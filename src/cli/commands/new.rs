//! `dqt new` command - create a treatment plan file
//!
//! Writes a commented template by default, or charts the plan up front with
//! an interactive tooth-by-tooth wizard mirroring the paper workflow:
//! pick the sites, then per tooth answer the stabilisation and restoration
//! questions, with the chained second treatment offered where the primary
//! unlocks one.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::catalog::{self, Phase, TreatmentEntry};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::plan::{PhasePlan, SiteSelection, ToothId, TreatmentPlan, TreatmentStep};

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Plan file to create
    #[arg(default_value = "treatment-plan.yaml")]
    pub file: PathBuf,

    /// Patient label (name or record number)
    #[arg(long, short = 'p')]
    pub patient: Option<String>,

    /// Chart the plan interactively instead of writing a template
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    /// Open the new plan in your editor
    #[arg(long, short = 'e')]
    pub edit: bool,
}

pub fn run(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    if args.file.exists() && !args.force {
        return Err(miette::miette!(
            "'{}' already exists (use --force to overwrite)",
            args.file.display()
        ));
    }

    if args.interactive {
        let plan = chart_interactively(&config, args.patient.clone())?;
        plan.save(&args.file).map_err(|e| miette::miette!("{}", e))?;
    } else {
        let template = render_template(&config, args.patient.as_deref());
        std::fs::write(&args.file, template).into_diagnostic()?;
    }

    if !global.quiet {
        println!(
            "{} Created plan {}",
            style("✓").green(),
            style(args.file.display()).cyan()
        );
    }

    if args.edit {
        config.run_editor(&args.file).into_diagnostic()?;
    }

    Ok(())
}

fn render_template(config: &Config, patient: Option<&str>) -> String {
    let today = chrono::Local::now().date_naive();
    format!(
        "\
# Dental treatment plan.
#
# Chart one entry per site under `sites:`. Tooth codes run UR8..UR1,
# UL1..UL8, LR8..LR1, LL1..LL8; whole arches are \"U Arch\" / \"L Arch\".
# Teeth take `stabilisation` / `restoration`; arches take `rehabilitation`.
# A step with no `treatment` (or \"{placeholder}\") is ignored when pricing.
#
# Example:
#   UR6:
#     stabilisation:
#       treatment: Extraction with immediate replacement
#       minutes: 30
#       second:
#         treatment: Immediate denture
#         minutes: 45
#         lab_fee: 120
#     restoration:
#       treatment: Implant
#       minutes: 60
#       lab_fee: 50
#   U Arch:
#     rehabilitation:
#       treatment: Full denture
#       minutes: 120
#       lab_fee: 100
#
# Run `dqt catalog` for the full treatment list and rates.
clinician: {clinician}
patient: {patient}
date: {today}
notes: \"\"
sites: {{}}
",
        placeholder = catalog::PLACEHOLDER,
        clinician = config.clinician(),
        patient = patient.unwrap_or(""),
    )
}

fn chart_interactively(config: &Config, patient: Option<String>) -> Result<TreatmentPlan> {
    let theme = ColorfulTheme::default();

    let patient = match patient {
        Some(p) => p,
        None => Input::with_theme(&theme)
            .with_prompt("Patient")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?,
    };

    let sites: Vec<ToothId> = ToothId::all().collect();
    let labels: Vec<String> = sites.iter().map(|s| s.description()).collect();
    let picked = MultiSelect::with_theme(&theme)
        .with_prompt("Sites needing treatment (space to toggle, enter to confirm)")
        .items(&labels)
        .interact()
        .into_diagnostic()?;

    let mut plan = TreatmentPlan {
        clinician: Some(config.clinician()),
        patient: if patient.is_empty() { None } else { Some(patient) },
        date: Some(chrono::Local::now().date_naive()),
        ..Default::default()
    };

    for idx in picked {
        let site = sites[idx];
        println!();
        println!("{}", style(format!("Treatment for {}", site.description())).bold());

        let mut selection = SiteSelection::default();
        if site.is_arch() {
            selection.rehabilitation =
                prompt_step(&theme, "Treatment required", Phase::Rehabilitation)?;
        } else {
            if confirm_phase(&theme, "Stabilisation Phase")? {
                selection.stabilisation = prompt_phase(&theme, Phase::Stabilisation)?;
            }
            if confirm_phase(&theme, "Restoration Phase")? {
                selection.restoration = prompt_phase(&theme, Phase::Restoration)?;
            }
        }

        if selection.stabilisation.is_some()
            || selection.restoration.is_some()
            || selection.rehabilitation.is_some()
        {
            plan.sites.insert(site, selection);
        }
    }

    let notes: String = Input::with_theme(&theme)
        .with_prompt("Notes")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    plan.notes = notes;

    Ok(plan)
}

/// No/Yes selector for whether a phase applies at this site
fn confirm_phase(theme: &ColorfulTheme, prompt: &str) -> Result<bool> {
    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&["No", "Yes"])
        .default(0)
        .interact()
        .into_diagnostic()?;
    Ok(selection == 1)
}

fn prompt_phase(theme: &ColorfulTheme, phase: Phase) -> Result<Option<PhasePlan>> {
    let Some(step) = prompt_step(theme, "Treatment required", phase)? else {
        return Ok(None);
    };

    let mut second = None;
    if let Some(name) = step.chosen() {
        let unlocked = catalog::follow_on(name);
        if !unlocked.is_empty() {
            println!("  {}", style("Second treatment").bold());
            second = prompt_follow_on(theme, unlocked)?;
        }
    }

    Ok(Some(PhasePlan { step, second }))
}

fn prompt_step(theme: &ColorfulTheme, prompt: &str, phase: Phase) -> Result<Option<TreatmentStep>> {
    let entries = catalog::primary_treatments(phase);
    let mut items = vec![catalog::PLACEHOLDER.to_string()];
    items.extend(entries.iter().map(|e| e.name.to_string()));

    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()
        .into_diagnostic()?;

    if selection == 0 {
        return Ok(None);
    }
    let entry = entries[selection - 1];
    Ok(Some(fill_step(theme, entry)?))
}

fn prompt_follow_on(
    theme: &ColorfulTheme,
    unlocked: &'static [&'static str],
) -> Result<Option<TreatmentStep>> {
    let mut items = vec![catalog::PLACEHOLDER];
    items.extend_from_slice(unlocked);

    let selection = Select::with_theme(theme)
        .with_prompt("Treatment required")
        .items(&items)
        .default(0)
        .interact()
        .into_diagnostic()?;

    if selection == 0 {
        return Ok(None);
    }
    let name = items[selection];
    match catalog::entry(name) {
        Some(entry) => Ok(Some(fill_step(theme, entry)?)),
        None => Ok(None),
    }
}

fn fill_step(theme: &ColorfulTheme, entry: &TreatmentEntry) -> Result<TreatmentStep> {
    let minutes_input: String = Input::with_theme(theme)
        .with_prompt(format!(
            "Time required (minutes, steps of {})",
            catalog::MINUTE_STEP
        ))
        .default("0".to_string())
        .interact_text()
        .into_diagnostic()?;
    let minutes = catalog::clamp_minutes(minutes_input.parse().unwrap_or(0));

    let lab_fee = if entry.allows_lab_fee {
        let fee_input: String = Input::with_theme(theme)
            .with_prompt("Lab fee")
            .default("0".to_string())
            .interact_text()
            .into_diagnostic()?;
        fee_input.parse::<f64>().unwrap_or(0.0).max(0.0)
    } else {
        0.0
    };

    Ok(TreatmentStep {
        treatment: Some(entry.name.to_string()),
        minutes,
        lab_fee,
    })
}
