//! Difficulty tiers and their parameter bundles
//!
//! Tiers are fixed at compile time and selected before or between sessions.
//! A running session keeps the profile captured at start; changing the
//! selection mid-session only changes what the next session will use.

/// Named difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Parameters for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Session length in seconds
    pub duration_secs: u32,
    /// Spawn cadence in milliseconds
    pub spawn_interval_ms: u32,
    /// Multiplier applied to the base fall speed range
    pub speed_multiplier: f32,
    /// Score required to win when time runs out
    pub win_goal: u32,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Parse a tier name, falling back to the default tier on anything
    /// unrecognized - never an error
    pub fn from_name(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    /// Fixed parameters for this tier
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                duration_secs: 45,
                spawn_interval_ms: 900,
                speed_multiplier: 1.0,
                win_goal: 120,
            },
            Difficulty::Normal => DifficultyProfile {
                duration_secs: 30,
                spawn_interval_ms: 700,
                speed_multiplier: 1.4,
                win_goal: 200,
            },
            Difficulty::Hard => DifficultyProfile {
                duration_secs: 20,
                spawn_interval_ms: 450,
                speed_multiplier: 1.9,
                win_goal: 400,
            },
        }
    }
}
