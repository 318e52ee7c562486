use crate::pieces::{get_spawn_shape, Shape};
use crate::session::ActivePiece;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_POSITION};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i8,
    pub y: i8,
    pub shape: Shape,
}

impl ActiveSnapshot {
    /// Board coordinates of the piece's cells with its top edge moved to `y`
    pub fn cells_at(&self, y: i8) -> impl Iterator<Item = (i8, i8)> + '_ {
        let x = self.x;
        self.shape.minos().map(move |(px, py)| (x + px, y + py))
    }
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            shape: value.shape(),
        }
    }
}

impl Default for ActiveSnapshot {
    fn default() -> Self {
        Self {
            kind: PieceKind::T,
            rotation: 0,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
            shape: get_spawn_shape(PieceKind::T),
        }
    }
}

/// Read-only copy of everything a renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[Cell; WIDTH]; HEIGHT],
    pub active: ActiveSnapshot,
    pub ghost_y: i8,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub pieces: u32,
    pub fall_interval_ms: u32,
    pub episode_id: u32,
    pub seed: u64,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Board cells occupied by the active piece
    pub fn active_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.active.cells_at(self.active.y)
    }

    /// Board cells the active piece would occupy after a hard drop
    pub fn ghost_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.active.cells_at(self.ghost_y)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[Cell::Empty; WIDTH]; HEIGHT],
            active: ActiveSnapshot::default(),
            ghost_y: SPAWN_POSITION.1,
            score: 0,
            level: 0,
            lines: 0,
            pieces: 0,
            fall_interval_ms: 0,
            episode_id: 0,
            seed: 0,
        }
    }
}
