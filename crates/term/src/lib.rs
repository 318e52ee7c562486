//! Terminal presentation for the game.
//!
//! The view renders a [`core::GameSnapshot`] into a plain framebuffer of
//! styled characters; the renderer flushes that framebuffer to a real
//! terminal, redrawing only the runs that changed since the last frame.
//! Board cells are two columns wide to offset the usual glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use term_tetris_core as core;
pub use term_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Layout, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
