//! Quotation assembly and rendering
//!
//! A [`Quotation`] is the priced plan regrouped for presentation: line
//! items bucketed by phase in the fixed order Stabilisation, Restoration,
//! Rehabilitation, with empty phases dropped and insertion order preserved
//! inside each phase. The on-screen text rendering and the PDF export both
//! consume this one structure, so grouping, filtering and disclaimers
//! cannot drift between the two.

pub mod pdf;
pub mod text;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{Phase, CATALOG_VERSION};
use crate::pricing::{price_plan, LineItem};
use crate::plan::TreatmentPlan;

/// Fixed document title
pub const TITLE: &str = "Dental Treatment Plan";

/// All line items for one phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseSection {
    pub phase: Phase,
    pub items: Vec<LineItem>,
}

impl PhaseSection {
    /// Heading used by both render targets, e.g. "Stabilisation Phase"
    pub fn heading(&self) -> String {
        format!("{} Phase", self.phase)
    }
}

/// A plan priced and grouped, ready to render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    /// Practice name from configuration, shown under the document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinician: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Catalog revision the prices were drawn from
    pub catalog_version: String,

    /// Non-empty phases, in fixed phase order
    pub sections: Vec<PhaseSection>,

    pub total: f64,
}

impl Quotation {
    /// Price a plan and group the result by phase.
    pub fn build(plan: &TreatmentPlan) -> Self {
        let priced = price_plan(plan);

        let sections = Phase::ALL
            .iter()
            .filter_map(|&phase| {
                let items: Vec<LineItem> = priced
                    .items
                    .iter()
                    .filter(|item| item.phase == phase)
                    .cloned()
                    .collect();
                if items.is_empty() {
                    None
                } else {
                    Some(PhaseSection { phase, items })
                }
            })
            .collect();

        Quotation {
            practice: None,
            clinician: plan.clinician.clone(),
            patient: plan.patient.clone(),
            date: plan.date,
            notes: plan.notes.clone(),
            catalog_version: CATALOG_VERSION.to_string(),
            sections,
            total: priced.total,
        }
    }

    /// Flat view over all items, in render order
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }
}

/// Format an amount for display: symbol plus two fixed decimals.
///
/// This is the only place rounding happens; everything upstream keeps full
/// precision.
pub fn format_money(symbol: &str, amount: f64) -> String {
    format!("{symbol}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{PhasePlan, SiteSelection, TreatmentStep};

    fn step(treatment: &str, minutes: u32, lab_fee: f64) -> TreatmentStep {
        TreatmentStep {
            treatment: Some(treatment.to_string()),
            minutes,
            lab_fee,
        }
    }

    fn sample_plan() -> TreatmentPlan {
        let mut plan = TreatmentPlan {
            clinician: Some("A. Dentist".to_string()),
            notes: "Review bite after denture fit.".to_string(),
            ..Default::default()
        };
        plan.sites.insert(
            "UR6".parse().unwrap(),
            SiteSelection {
                stabilisation: Some(PhasePlan {
                    step: step("Extraction", 30, 0.0),
                    second: None,
                }),
                restoration: Some(PhasePlan {
                    step: step("Implant", 60, 50.0),
                    second: None,
                }),
                ..Default::default()
            },
        );
        plan.sites.insert(
            "U Arch".parse().unwrap(),
            SiteSelection {
                rehabilitation: Some(step("Full denture", 120, 100.0)),
                ..Default::default()
            },
        );
        plan
    }

    #[test]
    fn test_sections_follow_fixed_phase_order() {
        let quotation = Quotation::build(&sample_plan());
        let phases: Vec<Phase> = quotation.sections.iter().map(|s| s.phase).collect();
        assert_eq!(
            phases,
            vec![Phase::Stabilisation, Phase::Restoration, Phase::Rehabilitation]
        );
    }

    #[test]
    fn test_empty_phases_are_omitted() {
        let mut plan = TreatmentPlan::default();
        plan.sites.insert(
            "L Arch".parse().unwrap(),
            SiteSelection {
                rehabilitation: Some(step("Partial denture (chrome)", 90, 250.0)),
                ..Default::default()
            },
        );

        let quotation = Quotation::build(&plan);
        assert_eq!(quotation.sections.len(), 1);
        assert_eq!(quotation.sections[0].phase, Phase::Rehabilitation);
    }

    #[test]
    fn test_total_matches_flat_item_view() {
        let quotation = Quotation::build(&sample_plan());
        let summed: f64 = quotation.items().map(|i| i.cost).sum();
        assert_eq!(quotation.total, summed);
        assert!((quotation.total - 4975.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_money_rounds_at_display_only() {
        assert_eq!(format_money("£", 165.0), "£165.00");
        assert_eq!(format_money("£", 33.333333333333336), "£33.33");
        assert_eq!(format_money("£", 66.66666666666667), "£66.67");
        assert_eq!(format_money("$", 0.0), "$0.00");
    }

    #[test]
    fn test_section_heading() {
        let quotation = Quotation::build(&sample_plan());
        assert_eq!(quotation.sections[0].heading(), "Stabilisation Phase");
    }
}
