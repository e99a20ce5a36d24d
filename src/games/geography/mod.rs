pub mod catalog;
pub mod game;
pub mod renderer;
pub mod round;
pub mod session;
pub mod settings;
pub mod stats;

pub use catalog::{Catalog, CountryRecord};
pub use game::GeographyGame;
pub use round::{evaluate_click, reveal_hint, select_target, GameError, RoundState};
pub use session::{SessionState, SessionSummary};
pub use settings::{Difficulty, GameSettings};
