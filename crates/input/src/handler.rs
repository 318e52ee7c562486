//! DAS/ARR auto-repeat for held movement keys.
//!
//! Terminals either send key release events or they don't. Without them, a
//! held key is considered released once no press arrived for
//! `key_release_timeout_ms`.

use std::time::Instant;

use arrayvec::ArrayVec;

use crate::types::{GameAction, DEFAULT_ARR_MS, DEFAULT_DAS_MS};

/// Upper bound on repeats emitted by one `update` call.
pub const MAX_REPEATS_PER_UPDATE: usize = 32;

// Long enough to bridge the gap before the terminal's own key repeat starts.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Timers for one held key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Repeat {
    das_timer: u32,
    arr_accumulator: u32,
}

impl Repeat {
    /// Advance by `elapsed_ms`, returning how many repeats are due.
    fn advance(&mut self, elapsed_ms: u32, das_delay: u32, arr_rate: u32) -> u32 {
        let prev = self.das_timer;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);
        if self.das_timer < das_delay {
            return 0;
        }

        // Only time past the delay counts toward the first repeat.
        self.arr_accumulator += if prev < das_delay {
            self.das_timer - das_delay
        } else {
            elapsed_ms
        };

        let due = self.arr_accumulator / arr_rate;
        self.arr_accumulator %= arr_rate;
        due
    }
}

/// Tracks held keys and produces repeat actions.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// `MoveLeft` or `MoveRight` while a direction is held
    horizontal: Option<GameAction>,
    horizontal_repeat: Repeat,
    down_held: bool,
    down_repeat: Repeat,
    last_key_time: Instant,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    /// `arr_rate` below 1ms is treated as 1ms.
    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            horizontal: None,
            horizontal_repeat: Repeat::default(),
            down_held: false,
            down_repeat: Repeat::default(),
            last_key_time: Instant::now(),
            das_delay,
            arr_rate: arr_rate.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Register a key press and return the action to apply right away.
    ///
    /// Repeatable actions fire once on the initial press; further presses of
    /// the same held key (terminal auto-repeat) are absorbed, since
    /// [`update`](Self::update) drives the repeats. Every other action
    /// passes straight through.
    pub fn press(&mut self, action: GameAction) -> Option<GameAction> {
        match action {
            GameAction::MoveLeft | GameAction::MoveRight => {
                self.last_key_time = Instant::now();
                if self.horizontal == Some(action) {
                    return None;
                }
                self.horizontal = Some(action);
                self.horizontal_repeat = Repeat::default();
                Some(action)
            }
            GameAction::SoftDrop => {
                self.last_key_time = Instant::now();
                if self.down_held {
                    return None;
                }
                self.down_held = true;
                self.down_repeat = Repeat::default();
                Some(action)
            }
            other => Some(other),
        }
    }

    /// Register a key release (terminals with enhanced keyboard reporting).
    pub fn release(&mut self, action: GameAction) {
        match action {
            GameAction::MoveLeft | GameAction::MoveRight => {
                if self.horizontal == Some(action) {
                    self.release_horizontal();
                }
            }
            GameAction::SoftDrop => self.release_down(),
            _ => {}
        }
    }

    /// Advance the repeat timers and collect the repeats that fell due.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, MAX_REPEATS_PER_UPDATE> {
        let mut actions = ArrayVec::new();

        let idle_ms = u32::try_from(self.last_key_time.elapsed().as_millis()).unwrap_or(u32::MAX);
        if idle_ms > self.key_release_timeout_ms {
            self.release_horizontal();
            self.release_down();
        }

        if let Some(action) = self.horizontal {
            let due = self
                .horizontal_repeat
                .advance(elapsed_ms, self.das_delay, self.arr_rate);
            for _ in 0..due {
                let _ = actions.try_push(action);
            }
        }

        if self.down_held {
            let due = self
                .down_repeat
                .advance(elapsed_ms, self.das_delay, self.arr_rate);
            for _ in 0..due {
                let _ = actions.try_push(GameAction::SoftDrop);
            }
        }

        actions
    }

    /// Forget every held key.
    pub fn reset(&mut self) {
        self.release_horizontal();
        self.release_down();
        self.last_key_time = Instant::now();
    }

    fn release_horizontal(&mut self) {
        self.horizontal = None;
        self.horizontal_repeat = Repeat::default();
    }

    fn release_down(&mut self) {
        self.down_held = false;
        self.down_repeat = Repeat::default();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
