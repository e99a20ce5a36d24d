use rand::Rng;
use thiserror::Error;

use super::catalog::{Catalog, CountryRecord};
use super::session::SessionState;
use super::settings::{Difficulty, GameSettings};

/// Hard cap on hints shown in one round, whatever the session budget says.
pub const MAX_HINTS_PER_ROUND: usize = 3;

const BASE_POINTS: u32 = 100;
const STREAK_BONUS_STEP: u32 = 20;
const TIME_BONUS_STEP: u32 = 2;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no countries available for continent '{continent}'")]
    EmptyCatalog { continent: String },
}

/// State of one "find this country" round. Created fresh by
/// [`select_target`], replaced (never reused) when the next round starts.
#[derive(Debug, Clone)]
pub struct RoundState {
    target: CountryRecord,
    active: bool,
    hints_revealed: Vec<String>,
}

impl RoundState {
    pub fn target(&self) -> &CountryRecord {
        &self.target
    }

    /// True while the round is still waiting for the player's answer.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Hints shown so far this round, in the order they were revealed.
    pub fn hints_revealed(&self) -> &[String] {
        &self.hints_revealed
    }
}

/// Picks the next target uniformly at random from the continent-filtered
/// catalog and opens a fresh round for it.
pub fn select_target(
    catalog: &Catalog,
    settings: &GameSettings,
    rng: &mut impl Rng,
) -> Result<RoundState, GameError> {
    let pool = catalog.filtered(&settings.continent);
    if pool.is_empty() {
        return Err(GameError::EmptyCatalog {
            continent: settings.continent.clone(),
        });
    }

    let target = pool[rng.random_range(0..pool.len())].clone();
    tracing::debug!(country = %target.name, "selected round target");

    Ok(RoundState {
        target,
        active: true,
        hints_revealed: Vec::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub correct: bool,
    pub points: u32,
    pub message: String,
}

/// Points for a correct answer: `floor((100 + streak*20) * multiplier)`
/// plus 2 per second left on the clock. `streak` is the value before this
/// round's increment.
pub fn points_for(streak_before: u32, time_remaining: u32, difficulty: Difficulty) -> u32 {
    let base = (BASE_POINTS + streak_before * STREAK_BONUS_STEP) as f64;
    (base * difficulty.multiplier()).floor() as u32 + time_remaining * TIME_BONUS_STEP
}

/// Scores the player's answer against the current target.
///
/// Country names are compared case-insensitively; the catalog and the
/// presentation layer share the same key space, so this only papers over
/// casing drift between the two.
///
/// Returns `None` without touching any state when the round is no longer
/// active, so a second answer for the same round is a no-op.
pub fn evaluate_click(
    clicked: &str,
    round: &mut RoundState,
    session: &mut SessionState,
    settings: &GameSettings,
) -> Option<ClickOutcome> {
    if !round.active {
        return None;
    }
    round.active = false;

    let correct = clicked.to_lowercase() == round.target.name.to_lowercase();
    let outcome = if correct {
        let time_bonus = session.time_remaining() * TIME_BONUS_STEP;
        let points = points_for(session.streak(), session.time_remaining(), settings.difficulty);
        session.record_correct(points);
        ClickOutcome {
            correct: true,
            points,
            message: format!(
                "Correct! +{} points ({}x streak, {} time bonus)",
                points,
                session.streak(),
                time_bonus
            ),
        }
    } else {
        session.record_wrong();
        ClickOutcome {
            correct: false,
            points: 0,
            message: format!("Wrong answer! The correct country was {}", round.target.name),
        }
    };

    tracing::info!(
        clicked,
        expected = %round.target.name,
        correct = outcome.correct,
        points = outcome.points,
        "answer evaluated"
    );
    Some(outcome)
}

/// Reveals one more hint about the current target, or `None` when the
/// session budget or the per-round cap is spent. Never repeats a hint.
pub fn reveal_hint(
    round: &mut RoundState,
    session: &mut SessionState,
    rng: &mut impl Rng,
) -> Option<String> {
    if session.hints_remaining() == 0 || round.hints_revealed.len() >= MAX_HINTS_PER_ROUND {
        return None;
    }

    let t = &round.target;
    let candidates: Vec<String> = [
        format!("Population: {}", group_thousands(t.population)),
        format!("Area: {} km²", group_thousands(t.area)),
        format!("Languages: {}", t.languages.join(", ")),
        format!("Subregion: {}", t.subregion),
        format!("Currency: {}", t.currency),
    ]
    .into_iter()
    .filter(|h| !round.hints_revealed.contains(h))
    .collect();

    if candidates.is_empty() {
        return None;
    }

    let hint = candidates[rng.random_range(0..candidates.len())].clone();
    round.hints_revealed.push(hint.clone());
    session.spend_hint();
    Some(hint)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::geography::settings::Difficulty;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(name: &str, continent: &str) -> CountryRecord {
        CountryRecord {
            name: name.to_string(),
            capital: "Capital".to_string(),
            continent: continent.to_string(),
            population: 1_234_567,
            area: 89_012,
            languages: vec!["Language".to_string()],
            subregion: "Subregion".to_string(),
            currency: "Currency".to_string(),
            flag: "🏳".to_string(),
            fact: "Fact".to_string(),
            difficulty: Difficulty::Easy,
        }
    }

    fn catalog_of(records: &[(&str, &str)]) -> Catalog {
        let json = serde_json::to_string(
            &records
                .iter()
                .map(|(n, c)| record(n, c))
                .collect::<Vec<_>>(),
        )
        .unwrap();
        Catalog::from_json_str(&json).unwrap()
    }

    fn settings(continent: &str, difficulty: Difficulty) -> GameSettings {
        GameSettings {
            continent: continent.to_string(),
            difficulty,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn select_target_respects_continent_filter() {
        let catalog = catalog_of(&[("France", "Europe"), ("Kenya", "Africa")]);
        let settings = settings("Africa", Difficulty::Easy);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let round = select_target(&catalog, &settings, &mut rng).unwrap();
            assert_eq!(round.target().name, "Kenya");
            assert!(round.is_active());
            assert!(round.hints_revealed().is_empty());
        }
    }

    #[test]
    fn select_target_fails_on_empty_filter() {
        let catalog = catalog_of(&[("France", "Europe")]);
        let settings = settings("Asia", Difficulty::Easy);
        let err = select_target(&catalog, &settings, &mut rng()).unwrap_err();
        assert!(matches!(err, GameError::EmptyCatalog { continent } if continent == "Asia"));
    }

    #[test]
    fn scoring_medium_streak_two_thirty_seconds() {
        // floor((100 + 2*20) * 1.5) + 30*2 = 210 + 60
        assert_eq!(points_for(2, 30, Difficulty::Medium), 270);
    }

    #[test]
    fn scoring_hard_no_streak_ten_seconds() {
        // floor(100 * 2) + 10*2
        assert_eq!(points_for(0, 10, Difficulty::Hard), 220);
    }

    #[test]
    fn correct_click_awards_points_and_extends_streak() {
        let catalog = catalog_of(&[("France", "Europe")]);
        let settings = settings("all", Difficulty::Medium);
        let mut session = SessionState::start(&settings, 0);
        let mut round = select_target(&catalog, &settings, &mut rng()).unwrap();

        let outcome = evaluate_click("France", &mut round, &mut session, &settings).unwrap();
        assert!(outcome.correct);
        // streak 0, time 45: floor(100 * 1.5) + 90 = 240
        assert_eq!(outcome.points, 240);
        assert_eq!(session.score(), 240);
        assert_eq!(session.streak(), 1);
        assert!(!round.is_active());
    }

    #[test]
    fn click_comparison_ignores_case() {
        let catalog = catalog_of(&[("France", "Europe")]);
        let settings = settings("all", Difficulty::Easy);
        let mut session = SessionState::start(&settings, 0);
        let mut round = select_target(&catalog, &settings, &mut rng()).unwrap();

        let outcome = evaluate_click("fRaNcE", &mut round, &mut session, &settings).unwrap();
        assert!(outcome.correct);
    }

    #[test]
    fn wrong_click_resets_streak_and_awards_nothing() {
        let catalog = catalog_of(&[("France", "Europe")]);
        let settings = settings("all", Difficulty::Easy);
        let mut session = SessionState::start(&settings, 0);
        session.record_correct(100);
        session.record_correct(100);
        assert_eq!(session.streak(), 2);

        let mut round = select_target(&catalog, &settings, &mut rng()).unwrap();
        let outcome = evaluate_click("Germany", &mut round, &mut session, &settings).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.points, 0);
        assert_eq!(session.streak(), 0);
        assert_eq!(session.score(), 200, "score keeps what was already earned");
        assert_eq!(outcome.message, "Wrong answer! The correct country was France");
    }

    #[test]
    fn second_click_in_same_round_is_ignored() {
        let catalog = catalog_of(&[("France", "Europe")]);
        let settings = settings("all", Difficulty::Easy);
        let mut session = SessionState::start(&settings, 0);
        let mut round = select_target(&catalog, &settings, &mut rng()).unwrap();

        evaluate_click("France", &mut round, &mut session, &settings).unwrap();
        let score_after_first = session.score();
        let streak_after_first = session.streak();

        assert!(evaluate_click("France", &mut round, &mut session, &settings).is_none());
        assert_eq!(session.score(), score_after_first);
        assert_eq!(session.streak(), streak_after_first);
    }

    #[test]
    fn streak_grows_by_one_per_consecutive_correct_answer() {
        let catalog = catalog_of(&[("France", "Europe")]);
        let settings = settings("all", Difficulty::Hard);
        let mut session = SessionState::start(&settings, 0);
        let mut rng = rng();

        for expected_streak in 1..=5 {
            let mut round = select_target(&catalog, &settings, &mut rng).unwrap();
            let outcome = evaluate_click("France", &mut round, &mut session, &settings).unwrap();
            assert!(outcome.points > 0);
            assert_eq!(session.streak(), expected_streak);
        }
    }

    #[test]
    fn hints_never_repeat_and_stop_at_three() {
        let catalog = catalog_of(&[("France", "Europe")]);
        let settings = settings("all", Difficulty::Easy); // budget of 5
        let mut session = SessionState::start(&settings, 0);
        let mut round = select_target(&catalog, &settings, &mut rng()).unwrap();
        let mut rng = rng();

        let mut seen = Vec::new();
        for _ in 0..MAX_HINTS_PER_ROUND {
            let hint = reveal_hint(&mut round, &mut session, &mut rng).unwrap();
            assert!(!seen.contains(&hint), "hint repeated: {hint}");
            seen.push(hint);
        }

        // per-round cap reached even though two hints remain in the budget
        assert_eq!(session.hints_remaining(), 2);
        assert!(reveal_hint(&mut round, &mut session, &mut rng).is_none());
        assert_eq!(round.hints_revealed().len(), MAX_HINTS_PER_ROUND);
    }

    #[test]
    fn hint_budget_exhaustion_returns_none() {
        let catalog = catalog_of(&[("France", "Europe")]);
        let settings = settings("all", Difficulty::Hard); // budget of 1
        let mut session = SessionState::start(&settings, 0);
        let mut round = select_target(&catalog, &settings, &mut rng()).unwrap();
        let mut rng = rng();

        assert!(reveal_hint(&mut round, &mut session, &mut rng).is_some());
        assert_eq!(session.hints_remaining(), 0);
        assert!(reveal_hint(&mut round, &mut session, &mut rng).is_none());
    }

    #[test]
    fn hint_budget_spans_rounds() {
        let catalog = catalog_of(&[("France", "Europe")]);
        let settings = settings("all", Difficulty::Medium); // budget of 3
        let mut session = SessionState::start(&settings, 0);
        let mut rng = rng();

        let mut round = select_target(&catalog, &settings, &mut rng).unwrap();
        reveal_hint(&mut round, &mut session, &mut rng).unwrap();
        reveal_hint(&mut round, &mut session, &mut rng).unwrap();

        // next round starts with cleared hints but a drained budget
        let mut round = select_target(&catalog, &settings, &mut rng).unwrap();
        assert!(round.hints_revealed().is_empty());
        assert!(reveal_hint(&mut round, &mut session, &mut rng).is_some());
        assert!(reveal_hint(&mut round, &mut session, &mut rng).is_none());
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(67_413_000), "67,413,000");
    }
}
