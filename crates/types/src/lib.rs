//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be
//! shared by the engine, the terminal view and the input layer.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn origin**: (3, 0), the top-left corner of the 5x5 piece mask
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Control loop cadence (~60 FPS) |
//! | `DEFAULT_DAS_MS` | 150 | Held-key delay before auto repeat |
//! | `DEFAULT_ARR_MS` | 50 | Auto repeat interval |
//!
//! # Fall Intervals by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 0 | 500ms |
//! | 1 | 450ms |
//! | 2 | 400ms |
//! | 3 | 350ms |
//! | 4 | 300ms |
//! | 5 | 250ms |
//! | 6 | 200ms |
//! | 7 | 150ms |
//! | 8 | 120ms |
//! | 9 | 100ms |
//! | 10+ | 80ms |
//!
//! # Examples
//!
//! ```
//! use term_tetris_types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let kind = PieceKind::T;
//! assert_eq!(kind.index(), 0);
//! assert_eq!(kind.as_str(), "t");
//!
//! let cell = Cell::Occupied(kind);
//! assert_eq!(cell.kind(), Some(PieceKind::T));
//!
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Side length of the square occupancy mask every shape is drawn in
pub const SHAPE_SIZE: usize = 5;

/// Number of cells set in every shape
pub const MINOS_PER_PIECE: usize = 4;

/// Spawn origin (x, y) of a fresh piece: top-left of its 5x5 mask
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// Control loop cadence in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Held-key delay before auto repeat starts
pub const DEFAULT_DAS_MS: u32 = 150;

/// Interval between auto repeats of a held key
pub const DEFAULT_ARR_MS: u32 = 50;

/// Points per row descended with a soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row descended with a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 15;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N lines at level 0:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
///
/// Points are multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Gravity interval per level (milliseconds per row).
///
/// Levels past the end of the table use the last entry.
pub const FALL_INTERVALS_MS: [u32; 11] = [500, 450, 400, 350, 300, 250, 200, 150, 120, 100, 80];

/// The seven tetromino piece kinds, in their fixed catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    T,
    O,
    L,
    I,
    S,
    Z,
    J,
}

impl PieceKind {
    /// Number of piece kinds
    pub const COUNT: usize = 7;

    /// All kinds in catalog order (index 0..6)
    pub const ALL: [PieceKind; Self::COUNT] = [
        PieceKind::T,
        PieceKind::O,
        PieceKind::L,
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
    ];

    /// Position of this kind in the catalog order
    pub fn index(self) -> usize {
        match self {
            PieceKind::T => 0,
            PieceKind::O => 1,
            PieceKind::L => 2,
            PieceKind::I => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
        }
    }

    /// Inverse of [`PieceKind::index`]
    ///
    /// # Examples
    ///
    /// ```
    /// use term_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_index(3), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_index(7), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::T => "t",
            PieceKind::O => "o",
            PieceKind::L => "l",
            PieceKind::I => "i",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
        }
    }
}

/// A cell on the game board
///
/// Settled cells remember which kind filled them so the view can colour them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(PieceKind),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_occupied(self) -> bool {
        matches!(self, Cell::Occupied(_))
    }

    /// The kind stored in an occupied cell
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(kind) => Some(kind),
        }
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Discrete player intents
///
/// The input layer emits one action per key event; the session maps each
/// action 1:1 onto an engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (with soft drop scoring)
    SoftDrop,
    /// Advance to the next rotation state
    Rotate,
    /// Instantly drop piece to lowest valid position and lock it
    HardDrop,
    /// Start a fresh game
    Restart,
}

/// Observable engine events, queued by the session and drained by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A piece became part of the board.
    PieceLocked {
        kind: PieceKind,
        lines_cleared: u32,
        /// Line-clear points awarded by this lock (drop points excluded).
        points: u32,
    },
    /// The level increased after a line clear.
    LevelUp { level: u32 },
    /// The fresh spawn was blocked; the session has been reset.
    ///
    /// Carries the final counters of the finished game.
    GameOver {
        score: u32,
        level: u32,
        lines: u32,
        pieces: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_kind_index_round_trips_catalog_order() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(PieceKind::from_index(i), Some(*kind));
        }
        assert_eq!(PieceKind::from_index(PieceKind::COUNT), None);
    }

    #[test]
    fn piece_kind_names_are_distinct_lowercase_letters() {
        let names = PieceKind::ALL.map(|k| k.as_str());
        assert_eq!(names, ["t", "o", "l", "i", "s", "z", "j"]);
    }

    #[test]
    fn cell_accessors() {
        assert!(Cell::default().is_empty());
        assert_eq!(Cell::Empty.kind(), None);
        let c = Cell::Occupied(PieceKind::Z);
        assert!(c.is_occupied());
        assert_eq!(c.kind(), Some(PieceKind::Z));
    }

    #[test]
    fn fall_table_is_strictly_decreasing() {
        assert_eq!(FALL_INTERVALS_MS[0], 500);
        for pair in FALL_INTERVALS_MS.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        assert!((FALL_INTERVALS_MS.len() as u32) <= MAX_LEVEL + 1);
    }
}
