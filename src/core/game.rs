/// Core game interface for the geoterm engine
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

/// Commands a game can send back to the engine from inside an event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fire `on_advance` once, after the given delay. Replaces any delayed
    /// advance that is still pending, so at most one can be in flight.
    ScheduleAdvance(Duration),
    /// Drop a pending delayed advance without firing it.
    CancelAdvance,
    /// Leave the engine loop and restore the terminal.
    Quit,
}

/// Handle games use to talk to the engine loop.
#[derive(Clone)]
pub struct Context {
    pub(crate) tx: UnboundedSender<Command>,
}

impl Context {
    /// Ask the engine to call `on_advance` after `delay`.
    pub fn schedule_advance(&self, delay: Duration) {
        let _ = self.tx.send(Command::ScheduleAdvance(delay));
    }

    pub fn cancel_advance(&self) {
        let _ = self.tx.send(Command::CancelAdvance);
    }

    pub fn quit(&self) {
        let _ = self.tx.send(Command::Quit);
    }
}

/// Main trait a game implements to run under the [`Engine`](crate::core::engine::Engine).
///
/// All callbacks run on the engine's single task, so a game never sees two
/// of them execute at once: keyboard input, the periodic tick and the
/// delayed advance are serialized against the same `&mut self`.
pub trait Game {
    /// A key was pressed while the game had the terminal.
    fn handle_input(&mut self, event: crossterm::event::KeyEvent, ctx: &Context);

    /// Periodic heartbeat; called at `tick_rate()` intervals while one is set.
    fn on_tick(&mut self, ctx: &Context);

    /// A delayed advance scheduled via [`Context::schedule_advance`] fired.
    fn on_advance(&mut self, ctx: &Context);

    /// How often `on_tick` should fire, or `None` for no heartbeat.
    fn tick_rate(&self) -> Option<Duration>;

    fn render(&self, frame: &mut ratatui::Frame);
}
