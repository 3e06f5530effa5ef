//! Tooth and arch identifiers
//!
//! Sites are addressed with FDI-style quadrant codes (`UR6`, `LL8`) plus the
//! two whole-arch entries (`U Arch`, `L Arch`) used by the denture pathway.
//! The `Ord` impl encodes the clinical charting order used everywhere a plan
//! is iterated: upper arch, upper right 8→1, upper left 1→8, lower arch,
//! lower right 8→1, lower left 1→8.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One quadrant of the mouth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperRight,
    UpperLeft,
    LowerRight,
    LowerLeft,
}

impl Quadrant {
    /// Two-letter code used in tooth identifiers
    pub fn code(&self) -> &'static str {
        match self {
            Quadrant::UpperRight => "UR",
            Quadrant::UpperLeft => "UL",
            Quadrant::LowerRight => "LR",
            Quadrant::LowerLeft => "LL",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Quadrant::UpperRight => "upper right",
            Quadrant::UpperLeft => "upper left",
            Quadrant::LowerRight => "lower right",
            Quadrant::LowerLeft => "lower left",
        }
    }
}

/// Upper or lower jaw, addressed as a whole (denture pathway)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Upper,
    Lower,
}

/// Identifier for a chartable site: a single tooth or a whole arch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToothId {
    /// A whole arch ("U Arch" / "L Arch")
    Arch(Arch),
    /// A single tooth: quadrant plus position 1 (central incisor) to 8 (third molar)
    Tooth(Quadrant, u8),
}

/// Error parsing a tooth/arch identifier from its string form
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToothParseError {
    #[error("unrecognised tooth identifier '{0}' (expected e.g. 'UR6', 'LL8', 'U Arch' or 'L Arch')")]
    Unrecognised(String),

    #[error("tooth position '{0}' out of range (expected 1-8)")]
    PositionOutOfRange(String),
}

impl ToothId {
    /// All 34 sites in clinical charting order.
    ///
    /// Arch entries lead their half, then quadrants run distal-to-mesial on
    /// the right and mesial-to-distal on the left, matching how a paper
    /// charting form lays teeth out left to right.
    pub fn all() -> impl Iterator<Item = ToothId> {
        let upper_right = (1..=8).rev().map(|p| ToothId::Tooth(Quadrant::UpperRight, p));
        let upper_left = (1..=8).map(|p| ToothId::Tooth(Quadrant::UpperLeft, p));
        let lower_right = (1..=8).rev().map(|p| ToothId::Tooth(Quadrant::LowerRight, p));
        let lower_left = (1..=8).map(|p| ToothId::Tooth(Quadrant::LowerLeft, p));

        std::iter::once(ToothId::Arch(Arch::Upper))
            .chain(upper_right)
            .chain(upper_left)
            .chain(std::iter::once(ToothId::Arch(Arch::Lower)))
            .chain(lower_right)
            .chain(lower_left)
    }

    /// True for the whole-arch entries
    pub fn is_arch(&self) -> bool {
        matches!(self, ToothId::Arch(_))
    }

    /// Position in clinical charting order, 0-based
    fn chart_index(&self) -> u8 {
        match *self {
            ToothId::Arch(Arch::Upper) => 0,
            ToothId::Tooth(Quadrant::UpperRight, p) => 9 - p,
            ToothId::Tooth(Quadrant::UpperLeft, p) => 8 + p,
            ToothId::Arch(Arch::Lower) => 17,
            ToothId::Tooth(Quadrant::LowerRight, p) => 26 - p,
            ToothId::Tooth(Quadrant::LowerLeft, p) => 25 + p,
        }
    }

    /// Human-readable site description, e.g. "UR6 (upper right first molar)"
    pub fn description(&self) -> String {
        match *self {
            ToothId::Arch(Arch::Upper) => "Upper arch".to_string(),
            ToothId::Arch(Arch::Lower) => "Lower arch".to_string(),
            ToothId::Tooth(q, p) => format!("{} ({} {})", self, q.label(), position_name(p)),
        }
    }
}

fn position_name(position: u8) -> &'static str {
    match position {
        1 => "central incisor",
        2 => "lateral incisor",
        3 => "canine",
        4 => "first premolar",
        5 => "second premolar",
        6 => "first molar",
        7 => "second molar",
        _ => "third molar",
    }
}

impl Ord for ToothId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.chart_index().cmp(&other.chart_index())
    }
}

impl PartialOrd for ToothId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ToothId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ToothId::Arch(Arch::Upper) => write!(f, "U Arch"),
            ToothId::Arch(Arch::Lower) => write!(f, "L Arch"),
            ToothId::Tooth(q, p) => write!(f, "{}{}", q.code(), p),
        }
    }
}

impl FromStr for ToothId {
    type Err = ToothParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();

        match upper.as_str() {
            "U ARCH" | "UA" => return Ok(ToothId::Arch(Arch::Upper)),
            "L ARCH" | "LA" => return Ok(ToothId::Arch(Arch::Lower)),
            _ => {}
        }

        let quadrant = match upper.get(..2) {
            Some("UR") => Quadrant::UpperRight,
            Some("UL") => Quadrant::UpperLeft,
            Some("LR") => Quadrant::LowerRight,
            Some("LL") => Quadrant::LowerLeft,
            _ => return Err(ToothParseError::Unrecognised(trimmed.to_string())),
        };

        let position: u8 = upper[2..]
            .parse()
            .map_err(|_| ToothParseError::Unrecognised(trimmed.to_string()))?;

        if !(1..=8).contains(&position) {
            return Err(ToothParseError::PositionOutOfRange(trimmed.to_string()));
        }

        Ok(ToothId::Tooth(quadrant, position))
    }
}

// Plans keep sites as YAML map keys, so the identifier serializes as its
// string form rather than an enum tag.
impl Serialize for ToothId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ToothId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tooth_codes() {
        assert_eq!("UR6".parse::<ToothId>().unwrap(), ToothId::Tooth(Quadrant::UpperRight, 6));
        assert_eq!("ll8".parse::<ToothId>().unwrap(), ToothId::Tooth(Quadrant::LowerLeft, 8));
        assert_eq!("U Arch".parse::<ToothId>().unwrap(), ToothId::Arch(Arch::Upper));
        assert_eq!("l arch".parse::<ToothId>().unwrap(), ToothId::Arch(Arch::Lower));
    }

    #[test]
    fn test_parse_rejects_bad_codes() {
        assert!(matches!(
            "XX3".parse::<ToothId>(),
            Err(ToothParseError::Unrecognised(_))
        ));
        assert!(matches!(
            "UR9".parse::<ToothId>(),
            Err(ToothParseError::PositionOutOfRange(_))
        ));
        assert!("UR".parse::<ToothId>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for site in ToothId::all() {
            let parsed: ToothId = site.to_string().parse().unwrap();
            assert_eq!(site, parsed);
        }
    }

    #[test]
    fn test_charting_order() {
        let all: Vec<ToothId> = ToothId::all().collect();
        assert_eq!(all.len(), 34);
        assert_eq!(all[0], ToothId::Arch(Arch::Upper));
        assert_eq!(all[1], ToothId::Tooth(Quadrant::UpperRight, 8));
        assert_eq!(all[8], ToothId::Tooth(Quadrant::UpperRight, 1));
        assert_eq!(all[9], ToothId::Tooth(Quadrant::UpperLeft, 1));
        assert_eq!(all[17], ToothId::Arch(Arch::Lower));
        assert_eq!(all[33], ToothId::Tooth(Quadrant::LowerLeft, 8));

        // all() is emitted in sorted order
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn test_description() {
        let ur6: ToothId = "UR6".parse().unwrap();
        assert_eq!(ur6.description(), "UR6 (upper right first molar)");
        assert_eq!(ToothId::Arch(Arch::Upper).description(), "Upper arch");
    }

    #[test]
    fn test_serializes_as_string() {
        let ur6: ToothId = "UR6".parse().unwrap();
        let yaml = serde_yml::to_string(&ur6).unwrap();
        assert_eq!(yaml.trim(), "UR6");
        let parsed: ToothId = serde_yml::from_str("UR6").unwrap();
        assert_eq!(parsed, ur6);
    }
}
