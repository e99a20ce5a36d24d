use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::SessionSummary;

/// A lifetime award, unlocked once and kept in the profile.
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Bonus added to the profile's total score when unlocked.
    pub reward: u32,
    condition: fn(&PlayerProfile) -> bool,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_win",
        title: "First Victory",
        description: "Complete your first game",
        reward: 100,
        condition: |p| p.games_played >= 1,
    },
    Achievement {
        id: "streak_master",
        title: "Streak Master",
        description: "Achieve a streak of 5 or more",
        reward: 250,
        condition: |p| p.best_streak >= 5,
    },
    Achievement {
        id: "high_scorer",
        title: "High Scorer",
        description: "Score over 1000 points in a single game",
        reward: 500,
        condition: |p| p.high_score >= 1000,
    },
];

/// Everything persisted across sessions. Field names stay camelCase on disk
/// so profiles survive being read by other tooling.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProfile {
    pub games_played: u32,
    pub total_score: u64,
    pub high_score: u32,
    pub best_streak: u32,
    pub last_played: Option<DateTime<Utc>>,
    pub achievements: Vec<String>,
}

impl PlayerProfile {
    /// Folds a finished session into the profile and returns any achievements
    /// this session unlocked.
    pub fn apply_session(
        &mut self,
        summary: &SessionSummary,
        now: DateTime<Utc>,
    ) -> Vec<&'static Achievement> {
        self.games_played += 1;
        self.total_score += u64::from(summary.final_score);
        self.high_score = self.high_score.max(summary.final_score);
        self.best_streak = self.best_streak.max(summary.final_streak);
        self.last_played = Some(now);

        let unlocked: Vec<&'static Achievement> = ACHIEVEMENTS
            .iter()
            .filter(|a| !self.achievements.iter().any(|id| id == a.id) && (a.condition)(self))
            .collect();
        for achievement in &unlocked {
            self.achievements.push(achievement.id.to_string());
            self.total_score += u64::from(achievement.reward);
        }
        unlocked
    }
}

/// JSON-file profile store. Writes are fire-and-forget at session end; a
/// failure is the caller's to log, the in-memory session is already final.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Loads the profile, or a fresh one when the file does not exist yet.
    pub fn load(&self) -> Result<PlayerProfile> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json)
                .with_context(|| format!("profile file {} is corrupt", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PlayerProfile::default()),
            Err(e) => Err(e).with_context(|| {
                format!("failed to read profile file {}", self.path.display())
            }),
        }
    }

    pub fn save(&self, profile: &PlayerProfile) -> Result<()> {
        let json = serde_json::to_string_pretty(profile)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write profile file {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: u32, streak: u32) -> SessionSummary {
        SessionSummary {
            final_score: score,
            final_streak: streak,
            new_high_score: false,
            high_score: score,
        }
    }

    #[test]
    fn apply_session_accumulates_profile_fields() {
        let mut profile = PlayerProfile::default();
        profile.apply_session(&summary(400, 3), Utc::now());
        profile.apply_session(&summary(250, 6), Utc::now());

        assert_eq!(profile.games_played, 2);
        assert_eq!(profile.high_score, 400);
        assert_eq!(profile.best_streak, 6);
        assert!(profile.last_played.is_some());
        // 650 from sessions, 100 first_win, 250 streak_master
        assert_eq!(profile.total_score, 1000);
    }

    #[test]
    fn first_game_unlocks_first_win_only() {
        let mut profile = PlayerProfile::default();
        let unlocked = profile.apply_session(&summary(200, 2), Utc::now());
        let ids: Vec<&str> = unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["first_win"]);
    }

    #[test]
    fn achievements_unlock_once() {
        let mut profile = PlayerProfile::default();
        profile.apply_session(&summary(1200, 5), Utc::now());
        assert_eq!(profile.achievements.len(), 3);

        let unlocked = profile.apply_session(&summary(2000, 9), Utc::now());
        assert!(unlocked.is_empty());
        assert_eq!(profile.achievements.len(), 3);
    }

    #[test]
    fn store_roundtrips_and_defaults_when_missing() {
        let dir = std::env::temp_dir().join(format!("geoterm-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let store = ProfileStore::new(dir.join("profile.json"));

        assert_eq!(store.load().unwrap(), PlayerProfile::default());

        let mut profile = PlayerProfile::default();
        profile.apply_session(&summary(500, 4), Utc::now());
        store.save(&profile).unwrap();
        assert_eq!(store.load().unwrap(), profile);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_profile_surfaces_an_error() {
        let dir = std::env::temp_dir().join(format!("geoterm-corrupt-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("profile.json");
        std::fs::write(&path, "{broken").unwrap();

        assert!(ProfileStore::new(path).load().is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
