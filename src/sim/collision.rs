//! Collision detection between the player and falling obstacles
//!
//! Everything is an axis-aligned box in playfield coordinates (y grows
//! downward). Lanes never overlap horizontally, so a hit needs a shared lane
//! and overlapping vertical extents. An obstacle's path over the tick only
//! counts against a player who was already standing in its lane.

use glam::Vec2;

use super::state::{Lane, Obstacle, Player};
use crate::consts::ENTITY_SIZE;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Standard entity box: `ENTITY_SIZE` square centered in `lane`, top edge at `top`
    pub fn entity(lane: Lane, top: f32) -> Self {
        let half = ENTITY_SIZE / 2.0;
        Self::new(
            Vec2::new(lane.center_x() - half, top),
            Vec2::new(lane.center_x() + half, top + ENTITY_SIZE),
        )
    }

    /// Strict overlap on the vertical axis (touching edges do not count)
    pub fn overlaps_vertically(&self, other: &Aabb) -> bool {
        self.min.y < other.max.y && self.max.y > other.min.y
    }

    /// Strict overlap on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x && self.overlaps_vertically(other)
    }
}

/// True when `obstacle` hits `player` during the current tick.
///
/// `lane_before` is the player's lane before this tick's move.
pub fn player_hit(player: &Player, lane_before: Lane, obstacle: &Obstacle) -> bool {
    if player.lane != obstacle.lane {
        return false;
    }
    let extent = if lane_before == obstacle.lane {
        obstacle.swept_bounds()
    } else {
        obstacle.bounds()
    };
    player.bounds().overlaps_vertically(&extent)
}

/// First obstacle (by id order) that hits the player
pub fn find_collision<'a>(
    player: &Player,
    lane_before: Lane,
    obstacles: &'a [Obstacle],
) -> Option<&'a Obstacle> {
    obstacles.iter().find(|o| player_hit(player, lane_before, o))
}
