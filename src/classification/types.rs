use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type ShooterId = i64;
pub type MatchId = i64;
pub type ScoreId = i64;

/// Stage label of the match-level aggregate score.
pub const OVERALL_STAGE: &str = "Overall";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Classification {
    #[default]
    Unclassified,
    C,
    B,
    A,
}

impl Classification {
    pub fn rank(self) -> u8 {
        match self {
            Classification::Unclassified => 0,
            Classification::C => 1,
            Classification::B => 2,
            Classification::A => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Unclassified => "Unclassified",
            Classification::C => "C",
            Classification::B => "B",
            Classification::A => "A",
        }
    }

    pub fn outranks(self, other: Classification) -> bool {
        self.rank() > other.rank()
    }

    /// Reads the stored column value. NULL, blank and unknown labels all
    /// mean the shooter has not been classified yet.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Unclassified" | "" => Ok(Classification::Unclassified),
            "C" | "c" => Ok(Classification::C),
            "B" | "b" => Ok(Classification::B),
            "A" | "a" => Ok(Classification::A),
            other => anyhow::bail!("Unknown classification: {}", other),
        }
    }
}

/// Raw Overall points for one shooter in one match.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScore {
    pub score_id: ScoreId,
    pub shooter_id: ShooterId,
    pub points: Option<f64>,
}

/// What reconciliation decided for a shooter's stored class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOutcome {
    Unchanged(Classification),
    Promoted { from: Classification, to: Classification },
    Reset { from: Classification },
}

impl ClassOutcome {
    /// The class to persist, if it differs from what is stored.
    pub fn new_class(&self) -> Option<Classification> {
        match self {
            ClassOutcome::Unchanged(_) => None,
            ClassOutcome::Promoted { to, .. } => Some(*to),
            ClassOutcome::Reset { .. } => Some(Classification::Unclassified),
        }
    }

    pub fn resulting_class(&self) -> Classification {
        match self {
            ClassOutcome::Unchanged(class) => *class,
            ClassOutcome::Promoted { to, .. } => *to,
            ClassOutcome::Reset { .. } => Classification::Unclassified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ordering() {
        assert!(Classification::A.outranks(Classification::B));
        assert!(Classification::B.outranks(Classification::C));
        assert!(Classification::C.outranks(Classification::Unclassified));
        assert!(!Classification::C.outranks(Classification::C));
    }

    #[test]
    fn test_from_stored_defaults_to_unclassified() {
        assert_eq!(Classification::from_stored(None), Classification::Unclassified);
        assert_eq!(Classification::from_stored(Some("  ")), Classification::Unclassified);
        assert_eq!(Classification::from_stored(Some("Master")), Classification::Unclassified);
        assert_eq!(Classification::from_stored(Some("B")), Classification::B);
    }
}
