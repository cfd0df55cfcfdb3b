//! Level and difficulty progression
//!
//! Pure function of the round count: the simulation applies whatever
//! [`advance`] returns.

use crate::consts::SPEED_STEP;

/// Level at which the cadence slows and a second obstacle joins
pub const SECOND_TIER_LEVEL: u32 = 4;
/// Rounds per level below [`SECOND_TIER_LEVEL`]
pub const EARLY_ROUNDS_PER_LEVEL: u32 = 5;
/// Rounds per level from [`SECOND_TIER_LEVEL`] on
pub const LATE_ROUNDS_PER_LEVEL: u32 = 10;

/// Result of checking for a level-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStep {
    pub level: u32,
    pub speed_delta: f32,
    pub spawn_obstacle: bool,
}

impl LevelStep {
    pub fn leveled_up(&self, previous: u32) -> bool {
        self.level > previous
    }
}

/// Decide whether `round_count` completes the current level.
///
/// Reaching level 4 itself adds no speed; levels below 4 and from 5 on do.
pub fn advance(level: u32, round_count: u32, active_obstacles: usize) -> LevelStep {
    let cadence = if level < SECOND_TIER_LEVEL {
        EARLY_ROUNDS_PER_LEVEL
    } else {
        LATE_ROUNDS_PER_LEVEL
    };

    if round_count == 0 || round_count % cadence != 0 {
        return LevelStep {
            level,
            speed_delta: 0.0,
            spawn_obstacle: false,
        };
    }

    let level = level + 1;
    let speed_delta = if level != SECOND_TIER_LEVEL {
        SPEED_STEP
    } else {
        0.0
    };

    LevelStep {
        level,
        speed_delta,
        spawn_obstacle: level >= SECOND_TIER_LEVEL && active_obstacles == 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Feed rounds one by one, applying level-ups like the simulation does
    fn play(rounds: u32) -> (u32, f32) {
        let mut level = 1;
        let mut speed = 0.0;
        for round in 1..=rounds {
            let step = advance(level, round, 1);
            level = step.level;
            speed += step.speed_delta;
        }
        (level, speed)
    }

    #[test]
    fn test_first_level_up_at_five_rounds() {
        assert_eq!(advance(1, 4, 1).level, 1);
        let step = advance(1, 5, 1);
        assert_eq!(step.level, 2);
        assert_eq!(step.speed_delta, SPEED_STEP);
        assert!(!step.spawn_obstacle);
    }

    #[test]
    fn test_level_four_gap() {
        let step = advance(3, 15, 1);
        assert_eq!(step.level, 4);
        assert_eq!(step.speed_delta, 0.0);
        assert!(step.spawn_obstacle);

        let step = advance(4, 20, 2);
        assert_eq!(step.level, 5);
        assert_eq!(step.speed_delta, SPEED_STEP);
        assert!(!step.spawn_obstacle);
    }

    #[test]
    fn test_late_cadence_is_ten_rounds() {
        assert_eq!(advance(4, 25, 2).level, 4);
        assert_eq!(advance(5, 30, 2).level, 6);
        assert_eq!(advance(6, 35, 2).level, 6);
    }

    #[test]
    fn test_progression_table() {
        assert_eq!(play(4), (1, 0.0));
        assert_eq!(play(5), (2, SPEED_STEP));
        assert_eq!(play(15), (4, 2.0 * SPEED_STEP));
        assert_eq!(play(20), (5, 3.0 * SPEED_STEP));
        assert_eq!(play(30), (6, 4.0 * SPEED_STEP));
    }

    #[test]
    fn test_zero_rounds_never_levels() {
        assert_eq!(advance(1, 0, 1).level, 1);
        assert_eq!(advance(7, 0, 2).level, 7);
    }

    proptest! {
        #[test]
        fn level_never_decreases(level in 1u32..50, rounds in 0u32..10_000, obstacles in 1usize..3) {
            let step = advance(level, rounds, obstacles);
            prop_assert!(step.level == level || step.level == level + 1);
            prop_assert!(step.speed_delta >= 0.0);
        }

        #[test]
        fn level_up_matches_tier_cadence(level in 1u32..50, rounds in 1u32..10_000) {
            let cadence = if level < SECOND_TIER_LEVEL { 5 } else { 10 };
            let step = advance(level, rounds, 2);
            prop_assert_eq!(step.leveled_up(level), rounds % cadence == 0);
        }
    }
}
