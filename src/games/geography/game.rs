use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::game::{Context, Game};

use super::catalog::Catalog;
use super::round::{evaluate_click, reveal_hint, select_target, RoundState};
use super::session::{SessionState, SessionSummary};
use super::settings::{GameSettings, CONTINENT_CHOICES};
use super::stats::{Achievement, PlayerProfile, ProfileStore};
use super::Difficulty;

/// How long feedback stays on screen before the next target appears.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Settings,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Continent,
    Difficulty,
}

/// The quiz itself: holds the session and round state machines and maps
/// engine events (keys, the 1 Hz tick, the delayed round transition) onto
/// them. Runs entirely on the engine's task.
pub struct GeographyGame {
    pub(crate) catalog: Catalog,
    pub(crate) settings: GameSettings,
    pub(crate) session: SessionState,
    pub(crate) round: Option<RoundState>,
    pub(crate) phase: Phase,
    pub(crate) feedback: Option<String>,
    pub(crate) error: Option<String>,
    /// Selected row in the country list while playing.
    pub(crate) cursor: usize,
    pub(crate) focus: SettingsField,
    pub(crate) store: ProfileStore,
    pub(crate) profile: PlayerProfile,
    pub(crate) last_summary: Option<SessionSummary>,
    pub(crate) unlocked: Vec<&'static Achievement>,
    rng: StdRng,
}

impl GeographyGame {
    pub fn new(catalog: Catalog, settings: GameSettings, store: ProfileStore) -> Result<Self> {
        let profile = store.load()?;
        Ok(Self {
            catalog,
            settings,
            session: SessionState::idle(profile.high_score),
            round: None,
            phase: Phase::Settings,
            feedback: None,
            error: None,
            cursor: 0,
            focus: SettingsField::Continent,
            store,
            profile,
            last_summary: None,
            unlocked: Vec::new(),
            rng: StdRng::from_os_rng(),
        })
    }

    /// Country names the player can answer with, alphabetical.
    pub(crate) fn choices(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .catalog
            .filtered(&self.settings.continent)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    fn start_game(&mut self) {
        self.error = None;
        match select_target(&self.catalog, &self.settings, &mut self.rng) {
            Ok(round) => {
                self.session = SessionState::start(&self.settings, self.profile.high_score);
                self.round = Some(round);
                self.phase = Phase::Playing;
                self.feedback = None;
                self.cursor = 0;
                self.unlocked.clear();
                tracing::info!(
                    continent = %self.settings.continent,
                    difficulty = ?self.settings.difficulty,
                    "session started"
                );
            }
            Err(e) => {
                // stay on the settings screen, the filter has no countries
                self.error = Some(e.to_string());
                tracing::warn!(error = %e, "could not start session");
            }
        }
    }

    fn end_game(&mut self, ctx: &Context) {
        if !self.session.is_started() {
            return;
        }
        // a queued round transition must not fire into the finished session
        ctx.cancel_advance();
        self.round = None;

        let summary = self.session.finish();
        self.unlocked = self.profile.apply_session(&summary, Utc::now());
        if let Err(e) = self.store.save(&self.profile) {
            // the session is already final in memory, the write is best-effort
            tracing::warn!(error = %e, "failed to persist player profile");
            self.error = Some(format!("Could not save profile: {e}"));
        }
        self.last_summary = Some(summary);
        self.phase = Phase::GameOver;
    }

    fn answer(&mut self, ctx: &Context) {
        let clicked = match self.choices().get(self.cursor) {
            Some(name) => name.to_string(),
            None => return,
        };
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if let Some(outcome) = evaluate_click(&clicked, round, &mut self.session, &self.settings) {
            self.feedback = Some(outcome.message);
            // feedback must be visible before the next target replaces it
            ctx.schedule_advance(FEEDBACK_DELAY);
        }
    }

    fn hint(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if !round.is_active() {
            return;
        }
        if reveal_hint(round, &mut self.session, &mut self.rng).is_none() {
            self.feedback = Some("No hint available".to_string());
        }
    }

    fn handle_settings_key(&mut self, code: KeyCode, ctx: &Context) {
        match code {
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                self.focus = match self.focus {
                    SettingsField::Continent => SettingsField::Difficulty,
                    SettingsField::Difficulty => SettingsField::Continent,
                };
            }
            KeyCode::Up => self.cycle_setting(-1),
            KeyCode::Down => self.cycle_setting(1),
            KeyCode::Enter => self.start_game(),
            KeyCode::Esc | KeyCode::Char('q') => ctx.quit(),
            _ => {}
        }
    }

    fn cycle_setting(&mut self, step: isize) {
        match self.focus {
            SettingsField::Continent => {
                let idx = CONTINENT_CHOICES
                    .iter()
                    .position(|c| *c == self.settings.continent)
                    .unwrap_or(0) as isize;
                let len = CONTINENT_CHOICES.len() as isize;
                let next = (idx + step).rem_euclid(len) as usize;
                self.settings.continent = CONTINENT_CHOICES[next].to_string();
            }
            SettingsField::Difficulty => {
                let order = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
                let idx = order
                    .iter()
                    .position(|d| *d == self.settings.difficulty)
                    .unwrap_or(0) as isize;
                let next = (idx + step).rem_euclid(order.len() as isize) as usize;
                self.settings.difficulty = order[next];
            }
        }
    }

    fn handle_playing_key(&mut self, code: KeyCode, ctx: &Context) {
        let count = self.choices().len();
        match code {
            KeyCode::Up => {
                if count > 0 {
                    self.cursor = (self.cursor + count - 1) % count;
                }
            }
            KeyCode::Down => {
                if count > 0 {
                    self.cursor = (self.cursor + 1) % count;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = count.saturating_sub(1),
            KeyCode::Enter => self.answer(ctx),
            KeyCode::Char('h') => self.hint(),
            KeyCode::Char('e') => self.end_game(ctx),
            KeyCode::Esc => {
                self.end_game(ctx);
                ctx.quit();
            }
            _ => {}
        }
    }
}

impl Game for GeographyGame {
    fn handle_input(&mut self, event: KeyEvent, ctx: &Context) {
        match self.phase {
            Phase::Settings => self.handle_settings_key(event.code, ctx),
            Phase::Playing => self.handle_playing_key(event.code, ctx),
            Phase::GameOver => match event.code {
                KeyCode::Enter => self.phase = Phase::Settings,
                KeyCode::Esc | KeyCode::Char('q') => ctx.quit(),
                _ => {}
            },
        }
    }

    fn on_tick(&mut self, ctx: &Context) {
        if self.session.tick() {
            self.end_game(ctx);
        }
    }

    fn on_advance(&mut self, ctx: &Context) {
        // a transition queued right before the session ended is stale
        if !self.session.is_started() {
            return;
        }
        match select_target(&self.catalog, &self.settings, &mut self.rng) {
            Ok(round) => {
                self.round = Some(round);
                self.feedback = None;
            }
            Err(e) => {
                // cannot happen while the settings are unchanged mid-session
                tracing::warn!(error = %e, "round transition failed");
                self.end_game(ctx);
            }
        }
    }

    fn tick_rate(&self) -> Option<Duration> {
        Some(Duration::from_secs(1))
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        super::renderer::draw(frame, self);
    }
}
