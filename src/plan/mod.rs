//! Treatment plan files
//!
//! A plan is a plain-text YAML document the clinician keeps alongside the
//! patient record: a map from charted site to the phase selections made for
//! it, plus free-text notes. Plans are transient inputs; every quotation is
//! recomputed from the file in full, nothing incremental is kept.

pub mod tooth;

pub use tooth::{Arch, Quadrant, ToothId, ToothParseError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::catalog::{self, Phase, MAX_MINUTES, MINUTE_STEP, PLACEHOLDER};

/// Error loading or saving a plan file
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write plan file '{path}'")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid plan YAML in '{path}'")]
    Parse {
        path: String,
        #[source]
        source: serde_yml::Error,
    },
}

/// One treatment slot: a chosen treatment plus its time and lab fee
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentStep {
    /// Chosen treatment, or `None` while the dropdown still reads
    /// "Please select"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,

    /// Booked chair time in minutes
    #[serde(default)]
    pub minutes: u32,

    /// Pass-through lab fee
    #[serde(default)]
    pub lab_fee: f64,
}

impl TreatmentStep {
    /// The chosen treatment name, treating the placeholder sentinel and
    /// empty strings as "nothing chosen"
    pub fn chosen(&self) -> Option<&str> {
        match self.treatment.as_deref() {
            None | Some("") | Some(PLACEHOLDER) => None,
            Some(name) => Some(name),
        }
    }
}

/// Selections for one phase at one site: the primary slot, plus the chained
/// second slot unlocked by certain primaries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhasePlan {
    #[serde(flatten)]
    pub step: TreatmentStep,

    /// Second treatment slot (only priced when the primary unlocks it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<TreatmentStep>,
}

/// Everything selected for one charted site
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stabilisation: Option<PhasePlan>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restoration: Option<PhasePlan>,

    /// Arch-level denture pathway; only valid on "U Arch" / "L Arch"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rehabilitation: Option<TreatmentStep>,
}

/// A full treatment plan as kept on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentPlan {
    /// Clinician preparing the plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinician: Option<String>,

    /// Patient label (name or record number)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<String>,

    /// Plan date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Free-text notes carried onto the quotation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Selections per site, keyed by tooth/arch code. The BTreeMap key
    /// order is the clinical charting order, so iteration is already the
    /// order quotations list items in.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sites: BTreeMap<ToothId, SiteSelection>,
}

impl TreatmentPlan {
    /// Load a plan from a YAML file
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: display.clone(),
            source,
        })?;
        serde_yml::from_str(&content).map_err(|source| PlanError::Parse {
            path: display,
            source,
        })
    }

    /// Write the plan back out as YAML
    pub fn save(&self, path: &Path) -> Result<(), PlanError> {
        let display = path.display().to_string();
        let yaml = serde_yml::to_string(self).map_err(|source| PlanError::Parse {
            path: display.clone(),
            source,
        })?;
        std::fs::write(path, yaml).map_err(|source| PlanError::Write {
            path: display,
            source,
        })
    }

    /// Check the plan against the catalog.
    ///
    /// Pricing itself is total (unknown names fall back to the default
    /// rate, minutes are clamped), so everything found here is advisory:
    /// errors mean the quotation will not say what the clinician intended,
    /// warnings mean an input looks off the usual grid.
    pub fn validate(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (site, selection) in &self.sites {
            if site.is_arch() {
                if selection.stabilisation.is_some() || selection.restoration.is_some() {
                    issues.push(Issue::error(
                        *site,
                        "arch entries only take the rehabilitation (denture) pathway".to_string(),
                    ));
                }
            } else if selection.rehabilitation.is_some() {
                issues.push(Issue::error(
                    *site,
                    "rehabilitation is charted per arch, not per tooth".to_string(),
                ));
            }

            if let Some(phase_plan) = &selection.stabilisation {
                check_phase_plan(*site, Phase::Stabilisation, phase_plan, &mut issues);
            }
            if let Some(phase_plan) = &selection.restoration {
                check_phase_plan(*site, Phase::Restoration, phase_plan, &mut issues);
            }
            if let Some(step) = &selection.rehabilitation {
                check_step(*site, Phase::Rehabilitation, step, &mut issues);
            }
        }

        issues
    }
}

fn check_phase_plan(site: ToothId, phase: Phase, plan: &PhasePlan, issues: &mut Vec<Issue>) {
    check_step(site, phase, &plan.step, issues);

    if let Some(second) = &plan.second {
        let unlocked = plan
            .step
            .chosen()
            .map(catalog::follow_on)
            .unwrap_or_default();

        if unlocked.is_empty() {
            if second.chosen().is_some() {
                issues.push(Issue::error(
                    site,
                    format!(
                        "second treatment given but the {} primary does not unlock one",
                        phase_lower(phase)
                    ),
                ));
            }
        } else if let Some(name) = second.chosen() {
            if !unlocked.iter().any(|t| *t == name) {
                issues.push(Issue::error(
                    site,
                    format!(
                        "'{}' is not an allowed follow-on here (expected one of: {})",
                        name,
                        unlocked.join(", ")
                    ),
                ));
            }
            check_step(site, phase, second, issues);
        }
    }
}

fn check_step(site: ToothId, phase: Phase, step: &TreatmentStep, issues: &mut Vec<Issue>) {
    if let Some(name) = step.chosen() {
        match catalog::entry(name) {
            None => issues.push(Issue::error(
                site,
                format!("unknown treatment '{name}' (priced at the default rate)"),
            )),
            Some(entry) => {
                if entry.phase != phase {
                    issues.push(Issue::error(
                        site,
                        format!(
                            "'{}' belongs to the {} phase, not {}",
                            name,
                            phase_lower(entry.phase),
                            phase_lower(phase)
                        ),
                    ));
                }
                if step.lab_fee > 0.0 && !entry.allows_lab_fee {
                    issues.push(Issue::warning(
                        site,
                        format!("'{name}' does not usually carry a lab fee"),
                    ));
                }
            }
        }

        if step.minutes > MAX_MINUTES {
            issues.push(Issue::warning(
                site,
                format!(
                    "{} minutes exceeds the {MAX_MINUTES} minute maximum (clamped when priced)",
                    step.minutes
                ),
            ));
        } else if step.minutes % MINUTE_STEP != 0 {
            issues.push(Issue::warning(
                site,
                format!("{} minutes is off the {MINUTE_STEP}-minute grid", step.minutes),
            ));
        }

        if step.lab_fee < 0.0 {
            issues.push(Issue::error(site, "lab fee cannot be negative".to_string()));
        }
    }
}

fn phase_lower(phase: Phase) -> String {
    phase.to_string().to_lowercase()
}

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One finding from [`TreatmentPlan::validate`]
#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: Severity,
    pub site: ToothId,
    pub message: String,
}

impl Issue {
    fn error(site: ToothId, message: String) -> Self {
        Issue {
            severity: Severity::Error,
            site,
            message,
        }
    }

    fn warning(site: ToothId, message: String) -> Self {
        Issue {
            severity: Severity::Warning,
            site,
            message,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", tag, self.site, self.message)
    }
}
