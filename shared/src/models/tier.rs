//! Insider tier derived from points

use serde::{Deserialize, Serialize};
use std::fmt;

/// VIP level shown on the customer profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InsiderTier {
    Member,
    Silver,
    Gold,
    Elite,
}

impl InsiderTier {
    pub fn for_points(points: u64) -> Self {
        match points {
            p if p >= 2000 => Self::Elite,
            p if p >= 1000 => Self::Gold,
            p if p >= 500 => Self::Silver,
            _ => Self::Member,
        }
    }

    /// Points needed to reach the next tier, `None` at the top
    pub fn points_to_next(points: u64) -> Option<u64> {
        [500u64, 1000, 2000]
            .into_iter()
            .find(|threshold| points < *threshold)
            .map(|threshold| threshold - points)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Elite => "Elite",
        }
    }
}

impl fmt::Display for InsiderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
