//! Game state and core simulation types
//!
//! Everything the simulation loop owns lives here. Nothing outside the loop
//! mutates it; renderers get a [`Snapshot`].

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Obstacles falling, commands applied
    Running,
    /// Player was hit; no further ticks
    Terminated,
}

/// One of the three vertical tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; LANE_COUNT] = [Lane::Left, Lane::Center, Lane::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Neighbour to the left, if any
    pub fn left(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Neighbour to the right, if any
    pub fn right(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Horizontal center of the lane in playfield coordinates
    pub fn center_x(self) -> f32 {
        LANE_WIDTH * (self.index() as f32 + 0.5)
    }
}

/// A falling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: Lane,
    /// Top edge (0 = top of the playfield, grows downward)
    pub top: f32,
    /// Top edge before this tick's move (for swept collision)
    #[serde(skip)]
    pub(crate) swept_from: f32,
}

impl Obstacle {
    pub fn new(id: u32, lane: Lane) -> Self {
        Self {
            id,
            lane,
            top: 0.0,
            swept_from: 0.0,
        }
    }

    /// Move down by `speed`; returns true once past the bottom edge
    pub fn advance(&mut self, speed: f32) -> bool {
        self.swept_from = self.top;
        self.top += speed;
        self.top >= PLAYFIELD_HEIGHT
    }

    /// Put the obstacle back at the top of another lane
    pub fn recycle(&mut self, lane: Lane) {
        self.lane = lane;
        self.top = 0.0;
        self.swept_from = 0.0;
    }

    /// Current box
    pub fn bounds(&self) -> Aabb {
        Aabb::entity(self.lane, self.top)
    }

    /// Box covering everything this obstacle passed over during the last tick
    pub fn swept_bounds(&self) -> Aabb {
        let top = self.swept_from.min(self.top);
        Aabb::new(
            Vec2::new(self.lane.center_x() - ENTITY_SIZE / 2.0, top),
            Vec2::new(self.lane.center_x() + ENTITY_SIZE / 2.0, self.top + ENTITY_SIZE),
        )
    }
}

/// The player marker at the bottom of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub lane: Lane,
}

impl Default for Player {
    fn default() -> Self {
        Self { lane: Lane::Center }
    }
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb::entity(self.lane, PLAYER_TOP)
    }

    pub fn move_left(&mut self) -> bool {
        match self.lane.left() {
            Some(lane) => {
                self.lane = lane;
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.lane.right() {
            Some(lane) => {
                self.lane = lane;
                true
            }
            None => false,
        }
    }
}

/// Complete game state (deterministic for a given seed and command stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Current level (starts at 1)
    pub level: u32,
    /// Obstacle fall speed (pixels per tick)
    pub speed: f32,
    /// Obstacles that completed a traversal
    pub round_count: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Ticks left on the "Level N" banner
    pub level_banner_ticks: u32,
    pub player: Player,
    /// Live obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with one obstacle in a random lane
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            speed: BASE_SPEED,
            round_count: 0,
            time_ticks: 0,
            phase: GamePhase::Running,
            level_banner_ticks: 0,
            player: Player::default(),
            obstacles: Vec::new(),
            next_id: 1,
        };

        state.spawn_obstacle();

        state
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lanes not held by any obstacle except `skip`
    pub fn free_lanes(&self, skip: Option<u32>) -> Vec<Lane> {
        Lane::ALL
            .into_iter()
            .filter(|lane| {
                !self
                    .obstacles
                    .iter()
                    .any(|o| Some(o.id) != skip && o.lane == *lane)
            })
            .collect()
    }

    /// Uniform pick among free lanes
    pub fn pick_free_lane(&mut self, skip: Option<u32>) -> Option<Lane> {
        let free = self.free_lanes(skip);
        free.choose(&mut self.rng).copied()
    }

    /// Spawn an obstacle at the top of a lane no other obstacle holds.
    ///
    /// Returns the new obstacle's lane, or `None` when every lane is taken.
    pub fn spawn_obstacle(&mut self) -> Option<Lane> {
        let lane = self.pick_free_lane(None)?;
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle::new(id, lane));
        Some(lane)
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            level: self.level,
            speed: self.speed,
            round_count: self.round_count,
            player_lane: self.player.lane,
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    lane: o.lane,
                    top: o.top,
                })
                .collect(),
            banner: (self.level_banner_ticks > 0).then(|| format!("Level {}", self.level)),
        }
    }
}

/// Obstacle as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub lane: Lane,
    pub top: f32,
}

/// Read-only copy of the state handed to renderers each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub level: u32,
    pub speed: f32,
    pub round_count: u32,
    pub player_lane: Lane,
    pub obstacles: Vec<ObstacleView>,
    /// Transient level-up message, if showing
    pub banner: Option<String>,
}
