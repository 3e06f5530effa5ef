//! Treatment catalog
//!
//! One consolidated, versioned table is the single source of truth for
//! pricing. Each entry fixes the phase a
//! treatment belongs to, how its per-minute rate is derived, whether the
//! step may carry a lab fee, which follow-on treatments it unlocks, and the
//! static disclaimer attached to estimate-only work.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog revision written into exported quotations
pub const CATALOG_VERSION: &str = "2024.1";

/// Default chairside rate in currency units per minute
pub const DEFAULT_RATE_PER_MINUTE: f64 = 5.5;

/// Dropdown sentinel meaning "no treatment chosen"
pub const PLACEHOLDER: &str = "Please select";

/// Minutes are quantized to this step by the input surface
pub const MINUTE_STEP: u32 = 15;

/// Upper bound on treatment time; inputs are clamped to [0, MAX_MINUTES]
pub const MAX_MINUTES: u32 = 300;

/// Treatment phase, in the fixed order quotations are grouped in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Stabilisation,
    Restoration,
    Rehabilitation,
}

impl Phase {
    /// All phases in quotation order
    pub const ALL: [Phase; 3] = [Phase::Stabilisation, Phase::Restoration, Phase::Rehabilitation];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Stabilisation => write!(f, "Stabilisation"),
            Phase::Restoration => write!(f, "Restoration"),
            Phase::Rehabilitation => write!(f, "Rehabilitation"),
        }
    }
}

/// How a treatment's per-minute rate is derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    /// Standard chairside time at a fixed rate per minute
    PerMinute(f64),
    /// Flat procedure price, charged as price/60 per minute booked
    FlatProcedure(f64),
}

impl Rate {
    /// Effective rate in currency units per minute
    pub fn per_minute(&self) -> f64 {
        match *self {
            Rate::PerMinute(r) => r,
            Rate::FlatProcedure(price) => price / 60.0,
        }
    }
}

/// One treatment in the catalog
#[derive(Debug, Clone, Copy)]
pub struct TreatmentEntry {
    pub name: &'static str,
    pub phase: Phase,
    pub rate: Rate,
    /// Whether this step may carry a pass-through lab fee
    pub allows_lab_fee: bool,
    /// Treatments unlocked in the chained "second treatment" slot.
    /// Empty for treatments that do not chain.
    pub follow_on: &'static [&'static str],
    /// Static disclaimer attached to estimate-only treatments
    pub disclaimer: Option<&'static str>,
}

const RCT_DISCLAIMER: &str =
    "Root canal costs are an estimate only and may change once the tooth has been fully assessed.";
const EXTRACTION_DISCLAIMER: &str =
    "Extraction costs are an estimate only and may change with surgical complexity.";
const IMPLANT_DISCLAIMER: &str =
    "Implant costs are an estimate only and will be confirmed after a full implant assessment.";

const IMMEDIATE_REPLACEMENTS: &[&str] = &["Immediate denture", "Rochette bridge"];
const POST_RCT_RESTORATIONS: &[&str] = &["Crown", "Post and core", "Onlay"];

/// The consolidated treatment table.
///
/// Treatments that only ever appear in the second slot (immediate dentures,
/// Rochette bridges, post-RCT restorations) are listed under their phase so
/// rate lookup and lab-fee policy work the same for both slots.
const ENTRIES: &[TreatmentEntry] = &[
    // Stabilisation: pain relief, stop decay
    TreatmentEntry {
        name: "Composite",
        phase: Phase::Stabilisation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: false,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "GIC",
        phase: Phase::Stabilisation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: false,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Extirpation",
        phase: Phase::Stabilisation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: false,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Extraction",
        phase: Phase::Stabilisation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: false,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Extraction with immediate replacement",
        phase: Phase::Stabilisation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: false,
        follow_on: IMMEDIATE_REPLACEMENTS,
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Complex extraction",
        phase: Phase::Stabilisation,
        rate: Rate::FlatProcedure(400.0),
        allows_lab_fee: false,
        follow_on: &[],
        disclaimer: Some(EXTRACTION_DISCLAIMER),
    },
    TreatmentEntry {
        name: "Specialist extraction",
        phase: Phase::Stabilisation,
        rate: Rate::FlatProcedure(400.0),
        allows_lab_fee: false,
        follow_on: &[],
        disclaimer: Some(EXTRACTION_DISCLAIMER),
    },
    TreatmentEntry {
        name: "Immediate denture",
        phase: Phase::Stabilisation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Rochette bridge",
        phase: Phase::Stabilisation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
    // Restoration: rebuild and repair
    TreatmentEntry {
        name: "Filling",
        phase: Phase::Restoration,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: false,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Crown",
        phase: Phase::Restoration,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Bridge",
        phase: Phase::Restoration,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Veneer",
        phase: Phase::Restoration,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Onlay",
        phase: Phase::Restoration,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Post and core",
        phase: Phase::Restoration,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Implant",
        phase: Phase::Restoration,
        rate: Rate::FlatProcedure(4000.0),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: Some(IMPLANT_DISCLAIMER),
    },
    TreatmentEntry {
        name: "Root canal treatment",
        phase: Phase::Restoration,
        rate: Rate::FlatProcedure(1000.0),
        allows_lab_fee: false,
        follow_on: POST_RCT_RESTORATIONS,
        disclaimer: Some(RCT_DISCLAIMER),
    },
    TreatmentEntry {
        name: "Complex root canal treatment",
        phase: Phase::Restoration,
        rate: Rate::FlatProcedure(1000.0),
        allows_lab_fee: false,
        follow_on: POST_RCT_RESTORATIONS,
        disclaimer: Some(RCT_DISCLAIMER),
    },
    // Rehabilitation: arch-level denture work
    TreatmentEntry {
        name: "Full denture",
        phase: Phase::Rehabilitation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Partial denture (acrylic)",
        phase: Phase::Rehabilitation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
    TreatmentEntry {
        name: "Partial denture (chrome)",
        phase: Phase::Rehabilitation,
        rate: Rate::PerMinute(DEFAULT_RATE_PER_MINUTE),
        allows_lab_fee: true,
        follow_on: &[],
        disclaimer: None,
    },
];

/// Look up a catalog entry by exact treatment name
pub fn entry(name: &str) -> Option<&'static TreatmentEntry> {
    ENTRIES.iter().find(|e| e.name == name)
}

/// All entries, in catalog order (grouped by phase)
pub fn entries() -> &'static [TreatmentEntry] {
    ENTRIES
}

/// Treatments offered in the primary slot for a phase.
///
/// Second-slot-only treatments (the follow-on lists) are excluded so they
/// can only be reached through the primary that unlocks them.
pub fn primary_treatments(phase: Phase) -> Vec<&'static TreatmentEntry> {
    let second_only: Vec<&str> = ENTRIES
        .iter()
        .flat_map(|e| e.follow_on.iter().copied())
        .collect();
    ENTRIES
        .iter()
        .filter(|e| e.phase == phase && !second_only.contains(&e.name))
        .collect()
}

/// Effective per-minute rate for a treatment name.
///
/// Unknown names price at the default chairside rate; the validator is
/// responsible for flagging them.
pub fn rate_per_minute(name: &str) -> f64 {
    entry(name).map_or(DEFAULT_RATE_PER_MINUTE, |e| e.rate.per_minute())
}

/// Disclaimer for estimate-only treatments, if any
pub fn disclaimer(name: &str) -> Option<&'static str> {
    entry(name).and_then(|e| e.disclaimer)
}

/// Follow-on treatments unlocked when `name` is chosen as the primary
pub fn follow_on(name: &str) -> &'static [&'static str] {
    entry(name).map_or(&[], |e| e.follow_on)
}

/// Clamp minutes to the catalog's valid range
pub fn clamp_minutes(minutes: u32) -> u32 {
    minutes.min(MAX_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_overrides() {
        assert_eq!(rate_per_minute("Implant"), 4000.0 / 60.0);
        assert_eq!(rate_per_minute("Root canal treatment"), 1000.0 / 60.0);
        assert_eq!(rate_per_minute("Complex root canal treatment"), 1000.0 / 60.0);
        assert_eq!(rate_per_minute("Complex extraction"), 400.0 / 60.0);
        assert_eq!(rate_per_minute("Specialist extraction"), 400.0 / 60.0);
    }

    #[test]
    fn test_unknown_treatment_uses_default_rate() {
        assert_eq!(rate_per_minute("Extraction"), DEFAULT_RATE_PER_MINUTE);
        assert_eq!(rate_per_minute("Gold filigree"), DEFAULT_RATE_PER_MINUTE);
    }

    #[test]
    fn test_follow_on_slots() {
        assert_eq!(
            follow_on("Extraction with immediate replacement"),
            ["Immediate denture", "Rochette bridge"]
        );
        assert_eq!(
            follow_on("Root canal treatment"),
            ["Crown", "Post and core", "Onlay"]
        );
        assert!(follow_on("Filling").is_empty());
    }

    #[test]
    fn test_estimate_only_set_carries_disclaimers() {
        for name in [
            "Implant",
            "Root canal treatment",
            "Complex root canal treatment",
            "Complex extraction",
            "Specialist extraction",
        ] {
            assert!(disclaimer(name).is_some(), "{name} should carry a disclaimer");
        }
        assert!(disclaimer("Filling").is_none());
    }

    #[test]
    fn test_follow_on_names_resolve_in_catalog() {
        for e in entries() {
            for name in e.follow_on {
                let follow = entry(name).unwrap_or_else(|| panic!("{name} missing from catalog"));
                assert_eq!(follow.phase, e.phase);
            }
        }
    }

    #[test]
    fn test_primary_treatments_exclude_second_slot() {
        let stab: Vec<&str> = primary_treatments(Phase::Stabilisation)
            .iter()
            .map(|e| e.name)
            .collect();
        assert!(stab.contains(&"Extraction"));
        assert!(!stab.contains(&"Immediate denture"));
    }

    #[test]
    fn test_clamp_minutes() {
        assert_eq!(clamp_minutes(0), 0);
        assert_eq!(clamp_minutes(300), 300);
        assert_eq!(clamp_minutes(301), 300);
    }
}
