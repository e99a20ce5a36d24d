use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use ratatui::DefaultTerminal;
use tokio::time::{MissedTickBehavior, Sleep};

use crate::core::game::{Command, Context, Game};

/// Single-task event loop: keyboard input, the periodic tick and the delayed
/// advance all mutate the game from one place, in order.
pub struct Engine<G: Game> {
    game: G,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G) -> Self {
        Self { game }
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        // channel for commands issued from inside game callbacks
        let (cmd_tx, mut cmd_rx) = tokio::sync::mpsc::unbounded_channel::<Command>();
        let ctx = Context { tx: cmd_tx };

        let mut interval = self.game.tick_rate().map(tokio::time::interval);
        if let Some(i) = interval.as_mut() {
            // a slow draw must not be repaid with a burst of ticks
            i.set_missed_tick_behavior(MissedTickBehavior::Skip);
        }

        // At most one delayed advance exists at a time; scheduling a new one
        // replaces the old, cancelling drops it without firing.
        let mut pending_advance: Option<Pin<Box<Sleep>>> = None;

        loop {
            terminal.draw(|f| self.game.render(f))?;

            // INPUT (Non-blocking)
            if crossterm::event::poll(Duration::from_millis(0))? {
                if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        self.game.handle_input(key, &ctx);
                    }
                }
            }

            // Always wake the loop periodically so input keeps getting polled
            // even when neither timer is armed.
            let idle = tokio::time::sleep(Duration::from_millis(16));

            tokio::select! {
                Some(cmd) = cmd_rx.recv() => {
                    match cmd {
                        Command::ScheduleAdvance(delay) => {
                            pending_advance = Some(Box::pin(tokio::time::sleep(delay)));
                        }
                        Command::CancelAdvance => {
                            pending_advance = None;
                        }
                        Command::Quit => break,
                    }
                }

                // TICK: game heartbeat (1 Hz for the quiz clock)
                _ = async {
                    if let Some(ref mut i) = interval { i.tick().await; }
                    else { std::future::pending::<()>().await; }
                } => {
                    self.game.on_tick(&ctx);
                }

                // ADVANCE: the delayed round transition came due
                _ = async {
                    if let Some(ref mut s) = pending_advance { s.as_mut().await; }
                    else { std::future::pending::<()>().await; }
                } => {
                    pending_advance = None;
                    self.game.on_advance(&ctx);
                }

                _ = idle => {}
            }
        }

        Ok(())
    }
}
