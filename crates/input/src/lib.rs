//! Terminal input (engine-facing).
//!
//! Maps `crossterm` key events to [`crate::types::GameAction`] and turns held
//! movement keys into auto-repeat. Works in terminals that never report key
//! releases.

pub mod handler;
pub mod map;

pub use term_tetris_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, should_quit};
