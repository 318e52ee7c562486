//! Game session module - the engine state machine
//!
//! Ties together board, catalog, randomizer and scoring. A session always has
//! an active piece; the conceptual cycle is
//! falling -> locking -> spawning -> falling, with a blocked spawn turning
//! into a game over that resets the session in place.
//!
//! Illegal moves are not errors: they leave the state untouched and report
//! `false`. Game over is reported through [`GameEvent::GameOver`].

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::pieces::{assert_catalog_valid, get_shape, rotation_count, Shape};
use crate::rng::PieceRng;
use crate::scoring::{drop_points, fall_interval_ms, next_level, points_for_lines};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{GameAction, GameEvent, PieceKind, MINOS_PER_PIECE, SPAWN_POSITION};

/// Horizontal offsets tried, in order, when rotating
const ROTATION_KICKS: [i8; 3] = [0, -1, 1];

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Index into the kind's rotation states
    pub rotation: usize,
    /// Board column of the mask's left edge
    pub x: i8,
    /// Board row of the mask's top edge
    pub y: i8,
}

impl ActivePiece {
    /// A new piece at the spawn origin in rotation 0
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    /// Mask for the current rotation
    pub fn shape(&self) -> Shape {
        get_shape(self.kind, self.rotation)
    }

    /// Whether the piece fits on `board` where it stands
    pub fn fits(&self, board: &Board) -> bool {
        board.can_place(&self.shape(), self.x, self.y)
    }

    /// Board coordinates of the four cells
    pub fn cells(&self) -> [(i8, i8); MINOS_PER_PIECE] {
        let mut out = [(0, 0); MINOS_PER_PIECE];
        let shape = self.shape();
        for (slot, (px, py)) in out.iter_mut().zip(shape.minos()) {
            *slot = (self.x + px, self.y + py);
        }
        out
    }
}

/// Events held between drains. One lock queues at most three.
pub const MAX_PENDING_EVENTS: usize = 64;

/// Complete single-player game state
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active: ActivePiece,
    rng: PieceRng,
    /// Time banked toward the next gravity step
    fall_accumulator_ms: u32,
    score: u32,
    level: u32,
    lines: u32,
    pieces: u32,
    /// Monotonic game counter (increments on every reset).
    episode_id: u32,
    /// Pending events, drained by the caller. Oldest dropped when full.
    events: ArrayVec<GameEvent, MAX_PENDING_EVENTS>,
}

impl GameSession {
    /// Create a session and spawn its first piece.
    ///
    /// Panics if the piece catalog is broken.
    pub fn new(seed: u64) -> Self {
        assert_catalog_valid();

        let mut rng = PieceRng::new(seed);
        let active = ActivePiece::spawn(rng.draw());

        Self {
            board: Board::new(),
            active,
            rng,
            fall_accumulator_ms: 0,
            score: 0,
            level: 0,
            lines: 0,
            pieces: 0,
            episode_id: 0,
            events: ArrayVec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> ActivePiece {
        self.active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn fall_accumulator_ms(&self) -> u32 {
        self.fall_accumulator_ms
    }

    /// Current gravity interval
    pub fn fall_interval_ms(&self) -> u32 {
        fall_interval_ms(self.level)
    }

    /// Take all events queued since the last call.
    ///
    /// The queue is fixed-size: a host that never drains it only keeps the
    /// latest [`MAX_PENDING_EVENTS`].
    pub fn take_events(&mut self) -> ArrayVec<GameEvent, MAX_PENDING_EVENTS> {
        std::mem::take(&mut self.events)
    }

    /// Advance gravity by `elapsed_ms`.
    ///
    /// Each full fall interval banked moves the piece down one row. When the
    /// piece cannot descend it locks, and the call stops there: at most one
    /// lock per call, and the fresh piece starts with an empty accumulator.
    /// Returns whether a lock happened.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.fall_accumulator_ms = self.fall_accumulator_ms.saturating_add(elapsed_ms);

        loop {
            let interval = self.fall_interval_ms();
            if self.fall_accumulator_ms < interval {
                return false;
            }
            self.fall_accumulator_ms -= interval;

            if !self.try_shift(0, 1) {
                self.lock_piece();
                return true;
            }
        }
    }

    /// Move the active piece one column left (`-1`) or right (`+1`).
    ///
    /// Returns false, leaving the piece in place, if the target is blocked.
    pub fn move_horizontal(&mut self, dx: i8) -> bool {
        assert!(dx == -1 || dx == 1, "horizontal step must be -1 or +1, got {dx}");
        self.try_shift(dx, 0)
    }

    /// Advance to the next rotation state.
    ///
    /// Tries the current origin, then one column left, then one column right;
    /// the first placement that fits wins. Kinds with a single rotation state
    /// never rotate.
    pub fn rotate(&mut self) -> bool {
        let count = rotation_count(self.active.kind);
        if count <= 1 {
            return false;
        }

        let next_rotation = (self.active.rotation + 1) % count;
        let shape = get_shape(self.active.kind, next_rotation);

        for dx in ROTATION_KICKS {
            let x = self.active.x + dx;
            if self.board.can_place(&shape, x, self.active.y) {
                self.active.rotation = next_rotation;
                self.active.x = x;
                return true;
            }
        }

        false
    }

    /// Move down one row for a soft-drop bonus. Never locks.
    pub fn soft_drop(&mut self) -> bool {
        if self.try_shift(0, 1) {
            self.score = self.score.saturating_add(drop_points(1, false));
            return true;
        }
        false
    }

    /// Drop to the lowest legal row, score the distance, lock.
    ///
    /// Returns the number of rows descended.
    pub fn hard_drop(&mut self) -> u32 {
        let mut cells: u32 = 0;
        while self.try_shift(0, 1) {
            cells += 1;
        }

        self.score = self.score.saturating_add(drop_points(cells, true));
        self.lock_piece();
        cells
    }

    /// Apply a player intent
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_horizontal(-1),
            GameAction::MoveRight => self.move_horizontal(1),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => {
                self.hard_drop();
                true
            }
            GameAction::Restart => {
                self.reset();
                true
            }
        }
    }

    /// Start a fresh game in place.
    ///
    /// Clears the board, zeroes the counters, spawns a new piece and bumps
    /// the episode id. The random stream carries on and queued events are
    /// kept for the caller.
    pub fn reset(&mut self) {
        self.board.clear();
        self.fall_accumulator_ms = 0;
        self.score = 0;
        self.level = 0;
        self.lines = 0;
        self.pieces = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.active = ActivePiece::spawn(self.rng.draw());
    }

    /// Lowest row the active piece could drop to
    pub fn ghost_y(&self) -> i8 {
        let shape = self.active.shape();
        let mut y = self.active.y;
        while self.board.can_place(&shape, self.active.x, y + 1) {
            y += 1;
        }
        y
    }

    /// Export a read-only view into an existing snapshot (no allocation)
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = ActiveSnapshot::from(self.active);
        out.ghost_y = self.ghost_y();
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.pieces = self.pieces;
        out.fall_interval_ms = self.fall_interval_ms();
        out.episode_id = self.episode_id;
        out.seed = self.rng.seed();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Move the active piece by (dx, dy) if the target fits
    fn try_shift(&mut self, dx: i8, dy: i8) -> bool {
        let shape = self.active.shape();
        let x = self.active.x + dx;
        let y = self.active.y + dy;
        if !self.board.can_place(&shape, x, y) {
            return false;
        }
        self.active.x = x;
        self.active.y = y;
        true
    }

    /// Settle the active piece, score cleared rows, spawn the next piece.
    fn lock_piece(&mut self) {
        let active = self.active;
        self.board
            .commit(&active.shape(), active.x, active.y, active.kind);
        self.pieces = self.pieces.saturating_add(1);
        // The next piece starts a fresh fall interval, hard drop included.
        self.fall_accumulator_ms = 0;

        let cleared = self.board.clear_full_rows();
        let mut points = 0;
        let mut level_up = None;
        if cleared > 0 {
            // Rows are scored at the level they were cleared on.
            points = points_for_lines(cleared, self.level);
            self.score = self.score.saturating_add(points);
            self.lines = self.lines.saturating_add(cleared as u32);

            let level = next_level(self.lines, self.level);
            if level > self.level {
                self.level = level;
                level_up = Some(level);
            }
        }

        self.emit(GameEvent::PieceLocked {
            kind: active.kind,
            lines_cleared: cleared as u32,
            points,
        });
        if let Some(level) = level_up {
            self.emit(GameEvent::LevelUp { level });
        }

        self.active = ActivePiece::spawn(self.rng.draw());
        if !self.active.fits(&self.board) {
            self.emit(GameEvent::GameOver {
                score: self.score,
                level: self.level,
                lines: self.lines,
                pieces: self.pieces,
            });
            self.reset();
        }
    }

    fn emit(&mut self, event: GameEvent) {
        if self.events.is_full() {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: ActivePiece) {
        self.active = piece;
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, BOARD_WIDTH, HARD_DROP_POINTS};

    fn piece(kind: PieceKind, rotation: usize, x: i8, y: i8) -> ActivePiece {
        ActivePiece {
            kind,
            rotation,
            x,
            y,
        }
    }

    fn fill_row_except(session: &mut GameSession, y: i8, hole: i8) {
        for x in 0..BOARD_WIDTH as i8 {
            if x != hole {
                session
                    .board_mut()
                    .set(x, y, Cell::Occupied(PieceKind::Z));
            }
        }
    }

    #[test]
    fn test_new_session() {
        let state = GameSession::new(12345);
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.pieces(), 0);
        assert_eq!(state.episode_id(), 0);
        assert_eq!((state.active().x, state.active().y), SPAWN_POSITION);
        assert_eq!(state.active().rotation, 0);
        assert!(state.active().fits(state.board()));
    }

    #[test]
    fn test_move_horizontal_and_walls() {
        let mut state = GameSession::new(12345);
        state.set_active(piece(PieceKind::O, 0, 3, 0));

        assert!(state.move_horizontal(1));
        assert_eq!(state.active().x, 4);
        assert!(state.move_horizontal(-1));
        assert_eq!(state.active().x, 3);

        // O covers mask columns 1..=2, so x = -1 is the left wall.
        let mut moved = 0;
        for _ in 0..10 {
            if state.move_horizontal(-1) {
                moved += 1;
            }
        }
        assert_eq!(moved, 4);
        assert_eq!(state.active().x, -1);
    }

    #[test]
    #[should_panic(expected = "horizontal step")]
    fn test_move_horizontal_rejects_large_steps() {
        let mut state = GameSession::new(1);
        state.move_horizontal(2);
    }

    #[test]
    fn test_rotate_o_piece_is_noop() {
        let mut state = GameSession::new(12345);
        let o = piece(PieceKind::O, 0, 3, 0);
        state.set_active(o);
        assert!(!state.rotate());
        assert_eq!(state.active(), o);
    }

    #[test]
    fn test_rotate_cycles_rotation_states() {
        let mut state = GameSession::new(12345);
        state.set_active(piece(PieceKind::T, 0, 3, 5));
        for expected in [1, 2, 3, 0] {
            assert!(state.rotate());
            assert_eq!(state.active().rotation, expected);
            assert_eq!(state.active().x, 3);
        }
    }

    #[test]
    fn test_rotate_kicks_left_off_right_wall() {
        let mut state = GameSession::new(12345);
        // Vertical I in the last column; horizontal needs mask columns 0..=3.
        state.set_active(piece(PieceKind::I, 1, 7, 5));
        assert!(state.rotate());
        assert_eq!(state.active().rotation, 0);
        assert_eq!(state.active().x, 6);
    }

    #[test]
    fn test_rotate_kicks_right_off_left_wall() {
        let mut state = GameSession::new(12345);
        // T rotation 1 occupies mask columns 2..=3; at x = -2 it hugs the wall.
        state.set_active(piece(PieceKind::T, 1, -2, 5));
        assert!(state.rotate());
        assert_eq!(state.active().rotation, 2);
        assert_eq!(state.active().x, -1);
    }

    #[test]
    fn test_rotate_fails_when_all_kicks_blocked() {
        let mut state = GameSession::new(12345);
        let vertical = piece(PieceKind::I, 1, 2, 10);
        state.set_active(vertical);
        // The horizontal bar would sit on row 12.
        state.board_mut().set(1, 12, Cell::Occupied(PieceKind::S));
        state.board_mut().set(5, 12, Cell::Occupied(PieceKind::S));

        assert!(!state.rotate());
        assert_eq!(state.active(), vertical);
    }

    #[test]
    fn test_soft_drop_scores_and_never_locks() {
        let mut state = GameSession::new(12345);
        state.set_active(piece(PieceKind::O, 0, 3, 0));

        assert!(state.soft_drop());
        assert_eq!(state.active().y, 1);
        assert_eq!(state.score(), 1);

        state.set_active(piece(PieceKind::O, 0, 3, 16));
        assert!(!state.soft_drop());
        assert_eq!(state.active().y, 16);
        assert_eq!(state.pieces(), 0);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_hard_drop_o_piece_on_empty_board() {
        let mut state = GameSession::new(12345);
        state.set_active(piece(PieceKind::O, 0, 3, 0));

        let cells = state.hard_drop();
        assert_eq!(cells, 16);
        assert_eq!(state.pieces(), 1);
        assert_eq!(state.score(), 16 * HARD_DROP_POINTS);
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(state.board().get(x, y), Some(Cell::Occupied(PieceKind::O)));
        }
        assert_eq!(state.board().occupied_count(), 4);
        assert_eq!(
            state.take_events().as_slice(),
            &[GameEvent::PieceLocked {
                kind: PieceKind::O,
                lines_cleared: 0,
                points: 0
            }]
        );
    }

    #[test]
    fn test_hard_drop_completing_a_row() {
        let mut state = GameSession::new(12345);
        fill_row_except(&mut state, 19, 4);
        // Vertical I: mask column 2 lands on board column 4.
        state.set_active(piece(PieceKind::I, 1, 2, 0));

        let cells = state.hard_drop();
        assert_eq!(cells, 15);
        assert_eq!(state.lines(), 1);
        assert_eq!(state.score(), 15 * HARD_DROP_POINTS + 40);
        assert_eq!(state.pieces(), 1);
        // The three I cells above the cleared row shifted down one.
        assert_eq!(state.board().occupied_count(), 3);
        for y in 17..20 {
            assert!(state.board().is_occupied(4, y));
        }
    }

    #[test]
    fn test_line_clear_scores_at_current_level_then_levels_up() {
        let mut state = GameSession::new(12345);
        state.lines = 9;
        state.level = 0;
        fill_row_except(&mut state, 19, 4);
        state.set_active(piece(PieceKind::I, 1, 2, 15));

        assert_eq!(state.hard_drop(), 0);
        assert_eq!(state.lines(), 10);
        assert_eq!(state.level(), 1);
        assert_eq!(state.score(), 40);
        assert_eq!(state.fall_interval_ms(), 450);

        let events = state.take_events();
        assert_eq!(
            events.as_slice(),
            &[
                GameEvent::PieceLocked {
                    kind: PieceKind::I,
                    lines_cleared: 1,
                    points: 40
                },
                GameEvent::LevelUp { level: 1 },
            ]
        );
    }

    #[test]
    fn test_tick_accumulates_partial_intervals() {
        let mut state = GameSession::new(12345);
        state.set_active(piece(PieceKind::O, 0, 3, 0));

        assert!(!state.tick(499));
        assert_eq!(state.active().y, 0);
        assert!(!state.tick(1));
        assert_eq!(state.active().y, 1);
        assert_eq!(state.fall_accumulator_ms(), 0);

        // Variable dt: one call covering three intervals.
        assert!(!state.tick(1500 + 20));
        assert_eq!(state.active().y, 4);
        assert_eq!(state.fall_accumulator_ms(), 20);
    }

    #[test]
    fn test_tick_locks_at_most_once_per_call() {
        let mut state = GameSession::new(12345);
        state.set_active(piece(PieceKind::O, 0, 3, 15));

        assert!(state.tick(60_000));
        assert_eq!(state.pieces(), 1);
        assert_eq!(state.fall_accumulator_ms(), 0);
        assert_eq!((state.active().x, state.active().y), SPAWN_POSITION);
    }

    #[test]
    fn test_resting_piece_waits_for_next_interval_to_lock() {
        let mut state = GameSession::new(12345);
        state.set_active(piece(PieceKind::O, 0, 3, 16));

        assert!(!state.tick(499));
        assert_eq!(state.pieces(), 0);
        assert!(state.tick(1));
        assert_eq!(state.pieces(), 1);
    }

    #[test]
    fn test_blocked_spawn_resets_session_and_reports_game_over() {
        let mut state = GameSession::new(12345);
        // Rows 2..=19 filled except the last column: nothing clears, and every
        // spawn shape reaches row 2 or 3 left of column 9.
        for y in 2..20 {
            fill_row_except(&mut state, y, 9);
        }
        state.score = 77;
        state.set_active(piece(PieceKind::O, 0, -1, -2));

        assert_eq!(state.hard_drop(), 0);

        let events = state.take_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                score: 77,
                level: 0,
                lines: 0,
                pieces: 1
            })
        );
        assert_eq!(state.score(), 0);
        assert_eq!(state.pieces(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.episode_id(), 1);
        assert_eq!(state.board().occupied_count(), 0);
        assert!(state.active().fits(state.board()));
    }

    #[test]
    fn test_restart_action_resets_in_place() {
        let mut state = GameSession::new(12345);
        state.hard_drop();
        assert!(state.pieces() > 0 || state.episode_id() > 0);

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.pieces(), 0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.board().occupied_count(), 0);
        assert!(state.episode_id() >= 1);
    }

    #[test]
    fn test_ghost_y_matches_hard_drop_landing() {
        let mut state = GameSession::new(12345);
        state.set_active(piece(PieceKind::O, 0, 3, 0));
        assert_eq!(state.ghost_y(), 16);
        state.board_mut().set(4, 10, Cell::Occupied(PieceKind::T));
        assert_eq!(state.ghost_y(), 6);
    }

    #[test]
    fn test_snapshot_mirrors_session() {
        let mut state = GameSession::new(99);
        state.set_active(piece(PieceKind::L, 2, 4, 3));
        state.board_mut().set(0, 19, Cell::Occupied(PieceKind::J));

        let snap = state.snapshot();
        assert_eq!(snap.board[19][0], Cell::Occupied(PieceKind::J));
        assert_eq!(snap.active.kind, PieceKind::L);
        assert_eq!(snap.active.rotation, 2);
        assert_eq!((snap.active.x, snap.active.y), (4, 3));
        assert_eq!(snap.active.shape, get_shape(PieceKind::L, 2));
        assert_eq!(snap.ghost_y, state.ghost_y());
        assert_eq!(snap.fall_interval_ms, 500);
        assert_eq!(snap.seed, 99);
    }

    #[test]
    fn test_hard_drop_lock_clears_banked_gravity() {
        let mut state = GameSession::new(12345);
        assert!(!state.tick(300));
        assert_eq!(state.fall_accumulator_ms(), 300);

        state.hard_drop();
        assert_eq!(state.fall_accumulator_ms(), 0);
        // The new piece needs a full interval before its first step.
        let y = state.active().y;
        assert!(!state.tick(499));
        assert_eq!(state.active().y, y);
    }

    #[test]
    fn test_event_queue_keeps_the_latest_when_full() {
        let mut state = GameSession::new(7);
        for level in 0..(MAX_PENDING_EVENTS as u32 + 6) {
            state.emit(GameEvent::LevelUp { level });
        }

        let events = state.take_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(events.first(), Some(&GameEvent::LevelUp { level: 6 }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::LevelUp {
                level: MAX_PENDING_EVENTS as u32 + 5
            })
        );
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_undrained_hard_drops_stay_bounded() {
        let mut state = GameSession::new(12345);
        for _ in 0..10_000 {
            state.hard_drop();
        }
        assert_eq!(state.take_events().len(), MAX_PENDING_EVENTS);
    }
}
