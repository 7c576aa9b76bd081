//! Digital line level

use serde::{Deserialize, Serialize};

/// State of a digital input line at one sampling instant.
///
/// Carries no identity beyond its value; edge detection compares it only
/// with the immediately preceding sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Line inactive (released)
    Low,
    /// Line active (pressed)
    High,
}

impl Level {
    /// Whether this is the active level.
    pub fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// Whether moving from `previous` to `self` is the qualifying
    /// (inactive → active) edge.
    pub fn is_rising_from(self, previous: Level) -> bool {
        previous == Level::Low && self == Level::High
    }
}

impl From<bool> for Level {
    fn from(active: bool) -> Self {
        if active {
            Level::High
        } else {
            Level::Low
        }
    }
}
