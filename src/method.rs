use serde::{Deserialize, Serialize};
use std::fmt;

/// Spaced-repetition policy controlling the day offsets of generated sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionMethod {
    SpacedSquare,
    Leitner,
    FixedInterval,
}

impl RevisionMethod {
    pub const ALL: [RevisionMethod; 3] = [
        RevisionMethod::SpacedSquare,
        RevisionMethod::Leitner,
        RevisionMethod::FixedInterval,
    ];

    /// Day offset from the source event for repetition index `i` (1-based).
    pub fn offset_days(&self, repetition: i64) -> i64 {
        match self {
            RevisionMethod::SpacedSquare => repetition * repetition,
            RevisionMethod::Leitner => repetition,
            RevisionMethod::FixedInterval => 2 * repetition,
        }
    }

    /// Machine key used in CLI commands, JSON payloads, and stored settings.
    pub fn key(&self) -> &'static str {
        match self {
            RevisionMethod::SpacedSquare => "spaced_square",
            RevisionMethod::Leitner => "leitner",
            RevisionMethod::FixedInterval => "fixed_interval",
        }
    }

    /// Name shown to users and written into CSV and iCalendar exports.
    pub fn display_name(&self) -> &'static str {
        match self {
            RevisionMethod::SpacedSquare => "Méthode des J",
            RevisionMethod::Leitner => "Leitner",
            RevisionMethod::FixedInterval => "Répétition classique",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "spaced_square" => Some(RevisionMethod::SpacedSquare),
            "leitner" => Some(RevisionMethod::Leitner),
            "fixed_interval" => Some(RevisionMethod::FixedInterval),
            _ => None,
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.display_name() == name.trim())
    }

    pub fn variants() -> [(&'static str, &'static str); 3] {
        [
            (
                RevisionMethod::SpacedSquare.key(),
                RevisionMethod::SpacedSquare.display_name(),
            ),
            (
                RevisionMethod::Leitner.key(),
                RevisionMethod::Leitner.display_name(),
            ),
            (
                RevisionMethod::FixedInterval.key(),
                RevisionMethod::FixedInterval.display_name(),
            ),
        ]
    }
}

impl Default for RevisionMethod {
    fn default() -> Self {
        RevisionMethod::SpacedSquare
    }
}

impl fmt::Display for RevisionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
