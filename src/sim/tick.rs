//! Fixed timestep simulation tick
//!
//! Advances the game by one step. Deterministic for a given seed and
//! command sequence; does no I/O.

use serde::{Deserialize, Serialize};

use super::collision::find_collision;
use super::level;
use super::state::{GamePhase, GameState, Lane};
use crate::consts::LEVEL_BANNER_TICKS;
use crate::control::ControlCommand;

/// Things that happened during a tick, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LaneChanged { from: Lane, to: Lane },
    RoundCompleted { round: u32 },
    LevelUp { level: u32, speed: f32 },
    ObstacleSpawned { id: u32, lane: Lane },
    Collision { obstacle_id: u32, lane: Lane },
}

/// Advance the game state by one tick, applying at most one command
pub fn tick(state: &mut GameState, command: ControlCommand) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase == GamePhase::Terminated {
        return events;
    }

    state.time_ticks += 1;
    state.level_banner_ticks = state.level_banner_ticks.saturating_sub(1);

    // 1. Player movement
    let from = state.player.lane;
    let moved = match command {
        ControlCommand::MoveLeft => state.player.move_left(),
        ControlCommand::MoveRight => state.player.move_right(),
        ControlCommand::None => false,
    };
    if moved {
        events.push(GameEvent::LaneChanged {
            from,
            to: state.player.lane,
        });
    }

    // 2. Obstacles; spawns during this pass start moving next tick
    let count = state.obstacles.len();
    for i in 0..count {
        if !state.obstacles[i].advance(state.speed) {
            continue;
        }

        let id = state.obstacles[i].id;
        let lane = state
            .pick_free_lane(Some(id))
            .unwrap_or(state.obstacles[i].lane);
        state.obstacles[i].recycle(lane);
        state.round_count += 1;
        events.push(GameEvent::RoundCompleted {
            round: state.round_count,
        });

        level_check(state, &mut events);
    }

    // 3. Collision
    if let Some(hit) = find_collision(&state.player, from, &state.obstacles) {
        log::info!(
            "Collision in {:?} lane at level {} after {} rounds",
            hit.lane,
            state.level,
            state.round_count
        );
        events.push(GameEvent::Collision {
            obstacle_id: hit.id,
            lane: hit.lane,
        });
        state.phase = GamePhase::Terminated;
    }

    events
}

fn level_check(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let step = level::advance(state.level, state.round_count, state.obstacles.len());
    if !step.leveled_up(state.level) {
        return;
    }

    state.level = step.level;
    state.speed += step.speed_delta;
    state.level_banner_ticks = LEVEL_BANNER_TICKS;
    log::info!("Level {} (speed {})", state.level, state.speed);
    events.push(GameEvent::LevelUp {
        level: state.level,
        speed: state.speed,
    });

    if step.spawn_obstacle {
        if let Some(lane) = state.spawn_obstacle() {
            let id = state.obstacles[state.obstacles.len() - 1].id;
            events.push(GameEvent::ObstacleSpawned { id, lane });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Obstacle;

    /// Game with the single obstacle parked in `lane`, far from the player
    fn state_with_obstacle(lane: Lane) -> GameState {
        let mut state = GameState::new(12345);
        state.obstacles[0].lane = lane;
        state
    }

    #[test]
    fn test_move_right_and_left() {
        let mut state = state_with_obstacle(Lane::Left);
        tick(&mut state, ControlCommand::MoveRight);
        assert_eq!(state.player.lane, Lane::Right);

        let mut state = state_with_obstacle(Lane::Right);
        let events = tick(&mut state, ControlCommand::MoveLeft);
        assert_eq!(state.player.lane, Lane::Left);
        assert_eq!(
            events[0],
            GameEvent::LaneChanged {
                from: Lane::Center,
                to: Lane::Left
            }
        );
    }

    #[test]
    fn test_edge_moves_are_noops() {
        let mut state = state_with_obstacle(Lane::Right);
        state.player.lane = Lane::Left;
        let events = tick(&mut state, ControlCommand::MoveLeft);
        assert_eq!(state.player.lane, Lane::Left);
        assert!(events.is_empty());

        let mut state = state_with_obstacle(Lane::Left);
        state.player.lane = Lane::Right;
        tick(&mut state, ControlCommand::MoveRight);
        assert_eq!(state.player.lane, Lane::Right);
    }

    #[test]
    fn test_obstacle_falls_by_speed() {
        let mut state = state_with_obstacle(Lane::Left);
        tick(&mut state, ControlCommand::None);
        assert_eq!(state.obstacles[0].top, BASE_SPEED);
        tick(&mut state, ControlCommand::None);
        assert_eq!(state.obstacles[0].top, 2.0 * BASE_SPEED);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_recycle_counts_round() {
        let mut state = state_with_obstacle(Lane::Left);
        state.player.lane = Lane::Right;
        state.obstacles[0].top = PLAYFIELD_HEIGHT - 1.0;

        let events = tick(&mut state, ControlCommand::None);
        assert_eq!(state.round_count, 1);
        assert_eq!(state.obstacles[0].top, 0.0);
        assert!(events.contains(&GameEvent::RoundCompleted { round: 1 }));
    }

    #[test]
    fn test_recycle_avoids_other_obstacles() {
        for seed in 0..50 {
            let mut state = GameState::new(seed);
            state.obstacles = vec![Obstacle::new(1, Lane::Left), Obstacle::new(2, Lane::Center)];
            state.player.lane = Lane::Right;
            state.obstacles[0].top = PLAYFIELD_HEIGHT - 1.0;

            tick(&mut state, ControlCommand::None);
            assert_ne!(state.obstacles[0].lane, Lane::Center);
        }
    }

    #[test]
    fn test_fifth_round_levels_up() {
        let mut state = state_with_obstacle(Lane::Left);
        state.player.lane = Lane::Right;
        state.round_count = 4;
        state.obstacles[0].top = PLAYFIELD_HEIGHT - 1.0;

        let events = tick(&mut state, ControlCommand::None);
        assert_eq!(state.level, 2);
        assert_eq!(state.speed, BASE_SPEED + SPEED_STEP);
        assert_eq!(state.level_banner_ticks, LEVEL_BANNER_TICKS);
        assert!(events.iter().any(|e| matches!(e, GameEvent::LevelUp { level: 2, .. })));
        assert_eq!(state.snapshot().banner.as_deref(), Some("Level 2"));
    }

    #[test]
    fn test_level_four_adds_second_obstacle() {
        let mut state = state_with_obstacle(Lane::Left);
        state.player.lane = Lane::Right;
        state.level = 3;
        state.speed = BASE_SPEED + 2.0 * SPEED_STEP;
        state.round_count = 14;
        state.obstacles[0].top = PLAYFIELD_HEIGHT - 1.0;

        let events = tick(&mut state, ControlCommand::None);
        assert_eq!(state.level, 4);
        // No speed bump on reaching level 4
        assert_eq!(state.speed, BASE_SPEED + 2.0 * SPEED_STEP);
        assert_eq!(state.obstacles.len(), 2);
        assert_ne!(state.obstacles[0].lane, state.obstacles[1].lane);
        assert!(events.iter().any(|e| matches!(e, GameEvent::ObstacleSpawned { .. })));
    }

    #[test]
    fn test_collision_terminates() {
        let mut state = state_with_obstacle(Lane::Center);
        state.obstacles[0].top = PLAYER_TOP - BASE_SPEED;

        let events = tick(&mut state, ControlCommand::None);
        assert_eq!(state.phase, GamePhase::Terminated);
        assert!(matches!(events.last(), Some(GameEvent::Collision { lane: Lane::Center, .. })));

        // Terminated games stay frozen
        let top = state.obstacles[0].top;
        assert!(tick(&mut state, ControlCommand::MoveLeft).is_empty());
        assert_eq!(state.obstacles[0].top, top);
        assert_eq!(state.player.lane, Lane::Center);
    }

    #[test]
    fn test_dodge_avoids_collision() {
        let mut state = state_with_obstacle(Lane::Center);
        state.obstacles[0].top = PLAYER_TOP - BASE_SPEED;

        // Moving happens before the collision check
        tick(&mut state, ControlCommand::MoveRight);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_moving_in_behind_obstacle_is_safe() {
        let mut state = state_with_obstacle(Lane::Left);
        state.obstacles[0].top = PLAYER_TOP + BASE_SPEED;

        // Obstacle ends at [380, 390], player box is [370, 380]
        let events = tick(&mut state, ControlCommand::MoveLeft);
        assert_eq!(state.player.lane, Lane::Left);
        assert_eq!(state.obstacles[0].top, PLAYER_TOP + ENTITY_SIZE);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Collision { .. })));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let commands = [
            ControlCommand::MoveLeft,
            ControlCommand::None,
            ControlCommand::MoveRight,
            ControlCommand::MoveRight,
        ];

        for i in 0..2_000 {
            let cmd = commands[i % commands.len()];
            tick(&mut state1, cmd);
            tick(&mut state2, cmd);
        }

        assert_eq!(state1.snapshot(), state2.snapshot());
    }
}
