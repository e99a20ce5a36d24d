use super::settings::GameSettings;

/// Cross-round state for one timed play-through. Created on "start game",
/// finalized exactly once when the clock runs out or the player ends it.
#[derive(Debug, Clone)]
pub struct SessionState {
    score: u32,
    streak: u32,
    high_score: u32,
    time_remaining: u32,
    hints_remaining: u32,
    started: bool,
}

/// What `finish` reports back for the game-over screen and the profile write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub final_score: u32,
    pub final_streak: u32,
    pub new_high_score: bool,
    pub high_score: u32,
}

impl SessionState {
    /// A not-yet-started session, shown behind the settings screen.
    pub fn idle(high_score: u32) -> Self {
        Self {
            score: 0,
            streak: 0,
            high_score,
            time_remaining: 0,
            hints_remaining: 0,
            started: false,
        }
    }

    /// Starts a session with the clock and hint budget for the chosen
    /// difficulty. `high_score` carries over from the player's profile.
    pub fn start(settings: &GameSettings, high_score: u32) -> Self {
        Self {
            score: 0,
            streak: 0,
            high_score,
            time_remaining: settings.difficulty.time_budget(),
            hints_remaining: settings.difficulty.hint_budget(),
            started: true,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn hints_remaining(&self) -> u32 {
        self.hints_remaining
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// One second elapsed. Returns true when the clock just hit zero and the
    /// session must end. Ticks after the session ended are no-ops.
    pub fn tick(&mut self) -> bool {
        if !self.started {
            return false;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.time_remaining == 0
    }

    /// Finalizes the session: stops the clock, folds the score into the high
    /// score if it beat it, and reports the result for persistence.
    pub fn finish(&mut self) -> SessionSummary {
        self.started = false;
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }
        tracing::info!(
            score = self.score,
            streak = self.streak,
            new_high_score,
            "session finished"
        );
        SessionSummary {
            final_score: self.score,
            final_streak: self.streak,
            new_high_score,
            high_score: self.high_score,
        }
    }

    pub(crate) fn record_correct(&mut self, points: u32) {
        self.score += points;
        self.streak += 1;
    }

    pub(crate) fn record_wrong(&mut self) {
        self.streak = 0;
    }

    pub(crate) fn spend_hint(&mut self) {
        self.hints_remaining = self.hints_remaining.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::geography::settings::Difficulty;

    fn settings(difficulty: Difficulty) -> GameSettings {
        GameSettings {
            continent: "all".to_string(),
            difficulty,
        }
    }

    #[test]
    fn start_applies_difficulty_budgets() {
        let cases = [
            (Difficulty::Easy, 60, 5),
            (Difficulty::Medium, 45, 3),
            (Difficulty::Hard, 30, 1),
        ];
        for (difficulty, time, hints) in cases {
            let session = SessionState::start(&settings(difficulty), 0);
            assert_eq!(session.time_remaining(), time);
            assert_eq!(session.hints_remaining(), hints);
            assert_eq!(session.score(), 0);
            assert_eq!(session.streak(), 0);
            assert!(session.is_started());
        }
    }

    #[test]
    fn clock_counts_down_and_signals_expiry_once_at_zero() {
        let mut session = SessionState::start(&settings(Difficulty::Hard), 0);
        for remaining in (1..30).rev() {
            assert!(!session.tick());
            assert_eq!(session.time_remaining(), remaining);
        }
        assert!(session.tick(), "30th tick should signal expiry");
    }

    #[test]
    fn ticks_after_finish_are_ignored() {
        let mut session = SessionState::start(&settings(Difficulty::Hard), 0);
        session.finish();
        assert!(!session.tick());
        assert_eq!(session.time_remaining(), 30);
    }

    #[test]
    fn finish_promotes_a_beating_score() {
        let mut session = SessionState::start(&settings(Difficulty::Easy), 300);
        session.record_correct(500);
        let summary = session.finish();
        assert!(summary.new_high_score);
        assert_eq!(summary.high_score, 500);
        assert_eq!(summary.final_score, 500);
        assert!(!session.is_started());
    }

    #[test]
    fn finish_keeps_an_unbeaten_high_score() {
        let mut session = SessionState::start(&settings(Difficulty::Easy), 300);
        session.record_correct(200);
        let summary = session.finish();
        assert!(!summary.new_high_score);
        assert_eq!(summary.high_score, 300);
        assert_eq!(summary.final_streak, 1);
    }

    #[test]
    fn matching_the_high_score_is_not_a_new_one() {
        let mut session = SessionState::start(&settings(Difficulty::Easy), 300);
        session.record_correct(300);
        assert!(!session.finish().new_high_score);
    }
}
