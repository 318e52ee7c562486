//! Core game logic - pure, deterministic, and testable
//!
//! All of the game rules live here with no dependency on the terminal, so the
//! same session runs headless in tests and benches.
//!
//! # Module Structure
//!
//! - [`pieces`]: the seven-kind rotation catalog, its validation and colors
//! - [`board`]: 10x20 grid with collision checks and row clearing
//! - [`scoring`]: line-clear points, drop bonuses, levels and gravity speed
//! - [`rng`]: seeded uniform piece selection
//! - [`session`]: the engine state machine that ties the above together
//! - [`snapshot`]: copyable read-only view for renderers
//!
//! # Rules in brief
//!
//! - Pieces are drawn uniformly at random, independently of history.
//! - Rotation only advances to the next state; a blocked rotation retries one
//!   column left, then one column right.
//! - A piece locks as soon as gravity cannot move it down. There is no lock
//!   delay and soft drop never locks.
//! - Cleared rows score 40/100/300/1200 times (level + 1); soft drop adds 1
//!   per row and hard drop 2 per row.
//! - The level rises every 10 lines and gravity speeds up with it.
//! - A blocked spawn ends the game; the session reports it and starts over.
//!
//! # Example
//!
//! ```
//! use term_tetris_core::GameSession;
//! use term_tetris_types::{GameAction, GameEvent};
//!
//! let mut game = GameSession::new(12345);
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.pieces(), 1);
//! assert!(matches!(
//!     game.take_events().first(),
//!     Some(GameEvent::PieceLocked { .. })
//! ));
//! ```
//!
//! # Timing
//!
//! Call [`GameSession::tick`] every frame with the elapsed milliseconds. The
//! session banks time and moves the piece one row per full fall interval
//! (500ms at level 0, down to 80ms).

pub mod board;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use term_tetris_types as types;

pub use board::Board;
pub use pieces::{
    color_of, get_shape, get_spawn_shape, rotation_count, shape_of, validate_catalog,
    validate_table, CatalogError, PieceColors, Shape,
};
pub use rng::PieceRng;
pub use scoring::{drop_points, fall_interval_ms, next_level, points_for_lines};
pub use session::{ActivePiece, GameSession, MAX_PENDING_EVENTS};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
