//! Line-item pricing and plan aggregation
//!
//! The pricing rule is the same everywhere: `minutes * rate + lab_fee`,
//! computed in full precision and rounded only when displayed. The
//! aggregator walks a plan in charting order, emits one line item per
//! chosen treatment (plus the chained second slot when its trigger is the
//! primary), and derives the total as a fold over the finished item list —
//! there is no running accumulator for unchosen slots to leak into.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Phase};
use crate::plan::{PhasePlan, ToothId, TreatmentPlan, TreatmentStep};

/// Cost of one treatment slot
pub fn line_cost(rate_per_minute: f64, minutes: u32, lab_fee: f64) -> f64 {
    f64::from(minutes) * rate_per_minute + lab_fee
}

/// One priced treatment entry attributed to a site and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub phase: Phase,
    pub site: ToothId,
    /// Human-readable site description, e.g. "UR6 (upper right first molar)"
    pub site_description: String,
    pub treatment: String,
    pub minutes: u32,
    pub lab_fee: f64,
    pub cost: f64,
    /// Static estimate-only disclaimer, where the catalog attaches one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}

/// A fully priced plan: the flat ordered item list and its derived total
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricedPlan {
    pub items: Vec<LineItem>,
    pub total: f64,
}

/// Price every chosen treatment in the plan.
///
/// Sites are visited in charting order; within a site the order is
/// stabilisation primary, stabilisation second, restoration primary,
/// restoration second, rehabilitation. Slots with no chosen treatment
/// produce nothing, and a second slot is only priced when the primary
/// actually unlocks it.
pub fn price_plan(plan: &TreatmentPlan) -> PricedPlan {
    let mut items = Vec::new();

    for (site, selection) in &plan.sites {
        if let Some(phase_plan) = &selection.stabilisation {
            price_phase(*site, Phase::Stabilisation, phase_plan, &mut items);
        }
        if let Some(phase_plan) = &selection.restoration {
            price_phase(*site, Phase::Restoration, phase_plan, &mut items);
        }
        if let Some(step) = &selection.rehabilitation {
            if let Some(item) = price_step(*site, Phase::Rehabilitation, step) {
                items.push(item);
            }
        }
    }

    let total = items.iter().map(|item| item.cost).fold(0.0, |acc, c| acc + c);
    PricedPlan { items, total }
}

fn price_phase(site: ToothId, phase: Phase, plan: &PhasePlan, items: &mut Vec<LineItem>) {
    let Some(primary) = price_step(site, phase, &plan.step) else {
        return;
    };

    let unlocked = catalog::follow_on(&primary.treatment);
    items.push(primary);

    if unlocked.is_empty() {
        return;
    }
    if let Some(second) = &plan.second {
        let allowed = second
            .chosen()
            .is_some_and(|name| unlocked.iter().any(|t| *t == name));
        if allowed {
            if let Some(item) = price_step(site, phase, second) {
                items.push(item);
            }
        }
    }
}

fn price_step(site: ToothId, phase: Phase, step: &TreatmentStep) -> Option<LineItem> {
    let treatment = step.chosen()?;
    let minutes = catalog::clamp_minutes(step.minutes);
    let lab_fee = step.lab_fee.max(0.0);
    let cost = line_cost(catalog::rate_per_minute(treatment), minutes, lab_fee);

    Some(LineItem {
        phase,
        site,
        site_description: site.description(),
        treatment: treatment.to_string(),
        minutes,
        lab_fee,
        cost,
        disclaimer: catalog::disclaimer(treatment).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SiteSelection;

    fn step(treatment: &str, minutes: u32, lab_fee: f64) -> TreatmentStep {
        TreatmentStep {
            treatment: Some(treatment.to_string()),
            minutes,
            lab_fee,
        }
    }

    fn plan_with(site: &str, selection: SiteSelection) -> TreatmentPlan {
        let mut plan = TreatmentPlan::default();
        plan.sites.insert(site.parse().unwrap(), selection);
        plan
    }

    #[test]
    fn test_extraction_at_default_rate() {
        let plan = plan_with(
            "UR6",
            SiteSelection {
                stabilisation: Some(PhasePlan {
                    step: step("Extraction", 30, 0.0),
                    second: None,
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert_eq!(priced.items.len(), 1);
        assert_eq!(priced.items[0].cost, 165.0);
        assert_eq!(priced.total, 165.0);
    }

    #[test]
    fn test_implant_flat_rate_plus_lab_fee() {
        let plan = plan_with(
            "UR6",
            SiteSelection {
                restoration: Some(PhasePlan {
                    step: step("Implant", 60, 50.0),
                    second: None,
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert_eq!(priced.total, 60.0 * (4000.0 / 60.0) + 50.0);
        // full precision internally; display rounding is where 4050.00 appears
        assert!((priced.total - 4050.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_denture_on_arch() {
        let plan = plan_with(
            "U Arch",
            SiteSelection {
                rehabilitation: Some(step("Full denture", 120, 100.0)),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert_eq!(priced.items.len(), 1);
        assert_eq!(priced.items[0].phase, Phase::Rehabilitation);
        assert_eq!(priced.total, 120.0 * 5.5 + 100.0);
        assert_eq!(priced.total, 760.0);
    }

    #[test]
    fn test_placeholder_contributes_nothing() {
        let plan = plan_with(
            "UR6",
            SiteSelection {
                stabilisation: Some(PhasePlan {
                    step: step("Please select", 30, 0.0),
                    second: None,
                }),
                restoration: Some(PhasePlan {
                    step: TreatmentStep {
                        treatment: None,
                        minutes: 60,
                        lab_fee: 25.0,
                    },
                    second: None,
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert!(priced.items.is_empty());
        assert_eq!(priced.total, 0.0);
    }

    #[test]
    fn test_second_treatment_requires_trigger() {
        // Composite does not unlock a second slot, so the chained entry is
        // ignored even though it is fully filled in.
        let plan = plan_with(
            "LR4",
            SiteSelection {
                stabilisation: Some(PhasePlan {
                    step: step("Composite", 15, 0.0),
                    second: Some(step("Immediate denture", 45, 120.0)),
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert_eq!(priced.items.len(), 1);
        assert_eq!(priced.items[0].treatment, "Composite");
    }

    #[test]
    fn test_chained_second_treatment_is_priced() {
        let plan = plan_with(
            "UR6",
            SiteSelection {
                stabilisation: Some(PhasePlan {
                    step: step("Extraction with immediate replacement", 30, 0.0),
                    second: Some(step("Immediate denture", 45, 120.0)),
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert_eq!(priced.items.len(), 2);
        assert_eq!(priced.items[1].treatment, "Immediate denture");
        assert_eq!(priced.items[1].cost, 45.0 * 5.5 + 120.0);
        assert_eq!(priced.total, 30.0 * 5.5 + 45.0 * 5.5 + 120.0);
    }

    #[test]
    fn test_disallowed_follow_on_is_ignored() {
        // The primary unlocks a second slot, but "Crown" is not on its
        // follow-on list, so only the primary is priced.
        let plan = plan_with(
            "UR6",
            SiteSelection {
                stabilisation: Some(PhasePlan {
                    step: step("Extraction with immediate replacement", 30, 0.0),
                    second: Some(step("Crown", 45, 80.0)),
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert_eq!(priced.items.len(), 1);
        assert_eq!(
            priced.items[0].treatment,
            "Extraction with immediate replacement"
        );
        assert_eq!(priced.total, 30.0 * 5.5);
    }

    #[test]
    fn test_unselected_second_slot_is_skipped() {
        let plan = plan_with(
            "UR6",
            SiteSelection {
                restoration: Some(PhasePlan {
                    step: step("Root canal treatment", 60, 0.0),
                    second: Some(step("Please select", 30, 0.0)),
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert_eq!(priced.items.len(), 1);
        assert_eq!(priced.total, 60.0 * (1000.0 / 60.0));
    }

    #[test]
    fn test_disclaimer_attached_to_estimate_only_items() {
        let plan = plan_with(
            "UL3",
            SiteSelection {
                restoration: Some(PhasePlan {
                    step: step("Root canal treatment", 60, 0.0),
                    second: None,
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert!(priced.items[0].disclaimer.is_some());
    }

    #[test]
    fn test_minutes_clamped_before_pricing() {
        let plan = plan_with(
            "UR1",
            SiteSelection {
                stabilisation: Some(PhasePlan {
                    step: step("Composite", 400, 0.0),
                    second: None,
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        assert_eq!(priced.items[0].minutes, 300);
        assert_eq!(priced.total, 300.0 * 5.5);
    }

    #[test]
    fn test_total_is_sum_of_items_in_charting_order() {
        let mut plan = TreatmentPlan::default();
        plan.sites.insert(
            "LL5".parse().unwrap(),
            SiteSelection {
                restoration: Some(PhasePlan {
                    step: step("Crown", 45, 80.0),
                    second: None,
                }),
                ..Default::default()
            },
        );
        plan.sites.insert(
            "UR2".parse().unwrap(),
            SiteSelection {
                stabilisation: Some(PhasePlan {
                    step: step("GIC", 15, 0.0),
                    second: None,
                }),
                ..Default::default()
            },
        );

        let priced = price_plan(&plan);
        // UR2 charts before LL5 regardless of insertion order
        assert_eq!(priced.items[0].site, "UR2".parse().unwrap());
        assert_eq!(priced.items[1].site, "LL5".parse().unwrap());
        assert_eq!(priced.total, priced.items.iter().map(|i| i.cost).sum::<f64>());
        assert_eq!(priced.total, 15.0 * 5.5 + 45.0 * 5.5 + 80.0);
    }
}
