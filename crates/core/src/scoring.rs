//! Scoring module - classic line-clear scoring and level progression
//!
//! Pure functions only. The session decides when to call them.

use crate::types::{
    FALL_INTERVALS_MS, HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL,
    SOFT_DROP_POINTS,
};

/// Points for clearing `lines` rows at once on `level` (0-based).
///
/// `base(lines) * (level + 1)`; anything outside 1..=4 scores nothing.
pub fn points_for_lines(lines: usize, level: u32) -> u32 {
    match LINE_SCORES.get(lines) {
        Some(&base) => base.saturating_mul(level.saturating_add(1)),
        None => 0,
    }
}

/// Level after reaching `total_lines`.
///
/// Advances every [`LINES_PER_LEVEL`] lines, caps at [`MAX_LEVEL`] and never
/// goes below `current_level`.
pub fn next_level(total_lines: u32, current_level: u32) -> u32 {
    (total_lines / LINES_PER_LEVEL)
        .min(MAX_LEVEL)
        .max(current_level)
}

/// Gravity interval for a level (in milliseconds)
///
/// Levels past the table reuse its last (fastest) entry.
pub fn fall_interval_ms(level: u32) -> u32 {
    let last = FALL_INTERVALS_MS.len() - 1;
    FALL_INTERVALS_MS[(level as usize).min(last)]
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn drop_points(cells: u32, is_hard_drop: bool) -> u32 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    cells.saturating_mul(per_cell)
}
