pub mod core {
    pub mod engine;
    pub mod game;
}

pub mod cli;
pub mod games;

// Re-export for convenience
pub use crate::core::game::{Command, Context, Game};
