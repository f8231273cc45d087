//! Collision detection and contact classification
//!
//! Both bodies are shrunk before testing so grazing contact is forgiven. The
//! obstacle shrinks twice as much as the player, which keeps near-misses on the
//! player's side.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::player::DeathReason;
use crate::consts::{OBSTACLE_INSET, PLAYER_INSET};

/// Which face of an obstacle the player ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    /// Came down onto the obstacle
    Top,
    /// Came up into the obstacle
    Bottom,
    /// Ran into it from the side
    Side,
}

impl Contact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Contact::Top => "TOP",
            Contact::Bottom => "BOTTOM",
            Contact::Side => "SIDE",
        }
    }

    /// Death caused by this contact against a cube (a top contact is a landing)
    pub fn cube_death(&self) -> Option<DeathReason> {
        match self {
            Contact::Top => None,
            Contact::Bottom => Some(DeathReason::CubeBottom),
            Contact::Side => Some(DeathReason::CubeSide),
        }
    }
}

/// Player box as used for collision (and drawn by the debug overlay)
#[inline]
pub fn player_hitbox(player: &Rect) -> Rect {
    player.inset(PLAYER_INSET)
}

/// Obstacle box as used for collision (and drawn by the debug overlay)
#[inline]
pub fn obstacle_hitbox(obstacle: &Rect) -> Rect {
    obstacle.inset(OBSTACLE_INSET)
}

/// Check whether the player overlaps an obstacle after both are inset
pub fn overlaps(player: &Rect, obstacle: &Rect) -> bool {
    player_hitbox(player).intersects(&obstacle_hitbox(obstacle))
}

/// Classify an overlap using the player's previous position
///
/// Only meaningful once `overlaps` has reported a hit. The previous frame's box
/// disambiguates fast falls that already sank into the obstacle.
pub fn classify(
    prev: &Rect,
    _current: &Rect,
    obstacle: &Rect,
    moving_down: bool,
    epsilon: f32,
) -> Contact {
    if moving_down && prev.bottom() <= obstacle.top() + epsilon {
        return Contact::Top;
    }
    if prev.top() >= obstacle.bottom() - epsilon {
        return Contact::Bottom;
    }
    Contact::Side
}
