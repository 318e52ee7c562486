//! Terminal Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates as `term_tetris::{core, input, term, types}`
//! and holds the pieces only the binary needs: environment configuration and
//! the JSON-lines event log.

pub mod config;
pub mod event_log;

pub use term_tetris_core as core;
pub use term_tetris_input as input;
pub use term_tetris_term as term;
pub use term_tetris_types as types;

pub use config::GameConfig;
pub use event_log::EventLog;
