use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Continents the settings screen offers, in display order. "all" is the
/// first entry and disables the filter.
pub const CONTINENT_CHOICES: &[&str] = &[
    "all",
    "Africa",
    "Asia",
    "Europe",
    "North America",
    "South America",
    "Oceania",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Seconds on the session clock.
    pub fn time_budget(self) -> u32 {
        match self {
            Difficulty::Easy => 60,
            Difficulty::Medium => 45,
            Difficulty::Hard => 30,
        }
    }

    /// Hints available for the whole session.
    pub fn hint_budget(self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 3,
            Difficulty::Hard => 1,
        }
    }

    /// Scoring factor applied to base + streak points.
    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy (60s, 5 hints)",
            Difficulty::Medium => "Medium (45s, 3 hints)",
            Difficulty::Hard => "Hard (30s, 1 hint)",
        }
    }
}

/// Configuration chosen before a session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// "all" or a continent name from [`CONTINENT_CHOICES`].
    pub continent: String,
    pub difficulty: Difficulty,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            continent: "all".to_string(),
            difficulty: Difficulty::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_table_matches_reference_values() {
        assert_eq!(Difficulty::Easy.time_budget(), 60);
        assert_eq!(Difficulty::Easy.hint_budget(), 5);
        assert_eq!(Difficulty::Medium.time_budget(), 45);
        assert_eq!(Difficulty::Medium.hint_budget(), 3);
        assert_eq!(Difficulty::Hard.time_budget(), 30);
        assert_eq!(Difficulty::Hard.hint_budget(), 1);
    }

    #[test]
    fn deserializes_lowercase_tags() {
        let d: Difficulty = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(d, Difficulty::Medium);
    }
}
