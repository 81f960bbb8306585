//! Scoring module - line clear and drop points, leveling, gravity
//!
//! All functions are pure. Line clears pay a fixed base scaled linearly by
//! the current level; soft drop pays 1 per cell and hard drop 2 per cell.
//! Level is `lines / 10 + 1` and only ever goes up.

use crate::types::{
    GRAVITY_DELAYS_MS, HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_POINTS,
};

/// Score, total lines and level for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreState {
    pub score: u64,
    pub lines: u32,
    pub level: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single [`apply_update`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub points: u64,
    pub level_up: bool,
}

/// Points for clearing `lines` rows at once at `level`.
/// lines: number of lines cleared (0-4), anything else scores nothing
pub fn score_for_line_clear(lines: usize, level: u32) -> u64 {
    match LINE_SCORES.get(lines) {
        Some(&base) => u64::from(base) * u64::from(level),
        None => 0,
    }
}

/// Calculate drop score
/// soft drop: +1 per cell
/// hard drop: +2 per cell
pub fn score_for_drop(cells: u32, is_hard_drop: bool) -> u64 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    u64::from(cells) * u64::from(per_cell)
}

/// Level implied by a line total: one level per 10 lines, starting at 1.
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Fold a lock or drop into the score state.
///
/// Line points use the level in effect before this update. The level is then
/// recomputed from the new line total and only raised, never lowered.
pub fn apply_update(
    state: &mut ScoreState,
    lines_cleared: usize,
    soft_cells: u32,
    hard_cells: u32,
) -> UpdateOutcome {
    let points = score_for_line_clear(lines_cleared, state.level)
        + score_for_drop(soft_cells, false)
        + score_for_drop(hard_cells, true);
    state.score = state.score.saturating_add(points);
    state.lines = state.lines.saturating_add(lines_cleared as u32);

    let computed = level_for_lines(state.lines);
    let level_up = computed > state.level;
    if level_up {
        state.level = computed;
    }

    UpdateOutcome { points, level_up }
}

/// Gravity delay in milliseconds for `level`.
///
/// Levels 1-10 come from the table, anything higher is pinned to the level 10
/// value, and an undefined level (0) falls back to level 1.
pub fn gravity_delay_ms(level: u32) -> u32 {
    match level {
        0 => GRAVITY_DELAYS_MS[0],
        l => GRAVITY_DELAYS_MS[(l as usize - 1).min(GRAVITY_DELAYS_MS.len() - 1)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores_level_one() {
        assert_eq!(score_for_line_clear(0, 1), 0);
        assert_eq!(score_for_line_clear(1, 1), 100);
        assert_eq!(score_for_line_clear(2, 1), 300);
        assert_eq!(score_for_line_clear(3, 1), 500);
        assert_eq!(score_for_line_clear(4, 1), 800);
    }

    #[test]
    fn test_line_scores_scale_with_level() {
        for lines in 1..=4 {
            assert_eq!(
                score_for_line_clear(lines, 2),
                2 * score_for_line_clear(lines, 1)
            );
        }
        assert_eq!(score_for_line_clear(4, 7), 5600);
        assert_eq!(score_for_line_clear(5, 1), 0);
    }

    #[test]
    fn test_drop_scores() {
        assert_eq!(score_for_drop(10, false), 10);
        assert_eq!(score_for_drop(10, true), 20);
        assert_eq!(score_for_drop(0, true), 0);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(29), 3);
    }

    #[test]
    fn test_apply_update_accumulates_everything() {
        let mut state = ScoreState::new();
        let outcome = apply_update(&mut state, 2, 3, 4);
        assert_eq!(outcome.points, 300 + 3 + 8);
        assert!(!outcome.level_up);
        assert_eq!(state.score, 311);
        assert_eq!(state.lines, 2);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_level_two_at_ten_lines() {
        let mut state = ScoreState::new();
        for _ in 0..9 {
            apply_update(&mut state, 1, 0, 0);
        }
        assert_eq!(state.level, 1);
        let outcome = apply_update(&mut state, 1, 0, 0);
        assert!(outcome.level_up);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_level_never_decreases() {
        let mut state = ScoreState {
            score: 0,
            lines: 3,
            level: 5,
        };
        let outcome = apply_update(&mut state, 1, 0, 0);
        assert!(!outcome.level_up);
        assert_eq!(state.level, 5);
        // Line points use the current (higher) level.
        assert_eq!(outcome.points, 500);
    }

    #[test]
    fn test_gravity_table() {
        assert_eq!(gravity_delay_ms(0), 1000);
        assert_eq!(gravity_delay_ms(1), 1000);
        assert_eq!(gravity_delay_ms(2), 793);
        assert_eq!(gravity_delay_ms(10), 64);
        assert_eq!(gravity_delay_ms(25), 64);
    }
}
