//! The player body and its state machine
//!
//! Transitions live on `PlayerState` as small methods so the tick only decides
//! *when* something happens; what a landing or a fall-off does to the body is
//! kept here.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::obstacles::ObstacleId;
use super::physics::{fall_frames, jump_arc_frames};
use crate::consts::*;

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeathReason {
    Spike,
    CubeBottom,
    CubeSide,
}

impl DeathReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathReason::Spike => "spike",
            DeathReason::CubeBottom => "cube-bottom",
            DeathReason::CubeSide => "cube-side",
        }
    }
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse player status, derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Grounded,
    Airborne,
    OnPlatform,
    GameOver,
}

/// Complete player state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Height of the player's bottom above the ground (never negative)
    pub y: f32,
    /// Vertical speed in pixels/frame (positive is up)
    pub velocity: f32,
    /// Rotation in degrees
    pub rotation: f32,
    pub rotation_start: f32,
    pub rotation_target: f32,
    /// Length of the current arc in frames
    pub rotation_frames: u32,
    /// Frames spent in the current arc
    pub air_frame: u32,
    pub jumping: bool,
    /// Jump control is held down
    pub holding: bool,
    pub grounded: bool,
    pub on_platform: bool,
    /// Obstacle currently carrying the player
    pub platform: Option<ObstacleId>,
    /// Obstacle just walked off; collisions with it are ignored until cleared
    pub falling_from: Option<ObstacleId>,
    pub game_over: bool,
    pub death_reason: Option<DeathReason>,
    /// Player box at the end of the previous tick
    pub last_bounds: Option<Rect>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            y: 0.0,
            velocity: 0.0,
            rotation: 0.0,
            rotation_start: 0.0,
            rotation_target: 0.0,
            rotation_frames: jump_arc_frames(),
            air_frame: 0,
            jumping: false,
            holding: false,
            grounded: true,
            on_platform: false,
            platform: None,
            falling_from: None,
            game_over: false,
            death_reason: None,
            last_bounds: None,
        }
    }
}

impl PlayerState {
    pub fn status(&self) -> PlayerStatus {
        if self.game_over {
            PlayerStatus::GameOver
        } else if self.on_platform {
            PlayerStatus::OnPlatform
        } else if self.jumping {
            PlayerStatus::Airborne
        } else {
            PlayerStatus::Grounded
        }
    }

    /// Current bounding box in screen space
    pub fn bounds(&self) -> Rect {
        Rect::resting_on(PLAYER_X, GROUND_Y - self.y, Vec2::splat(PLAYER_SIZE))
    }

    /// Start a jump. Returns false (and changes nothing) while airborne or dead.
    pub fn jump(&mut self) -> bool {
        if self.jumping || self.game_over {
            return false;
        }
        self.jumping = true;
        self.grounded = false;
        self.velocity = JUMP_VELOCITY;
        self.air_frame = 0;
        self.rotation_start = self.rotation;
        self.rotation_target = self.rotation + 90.0;
        self.rotation_frames = jump_arc_frames();
        self.on_platform = false;
        self.platform = None;
        self.falling_from = None;
        true
    }

    /// Touch down on the ground
    pub fn land_on_ground(&mut self) {
        self.y = 0.0;
        self.velocity = 0.0;
        self.jumping = false;
        self.grounded = true;
        self.rotation = self.rotation_target.rem_euclid(360.0);
        self.air_frame = 0;
        self.rotation_frames = jump_arc_frames();
        self.on_platform = false;
        self.platform = None;
        self.falling_from = None;
    }

    /// Land on top of an obstacle whose top is `surface` pixels above ground
    pub fn land_on_platform(&mut self, id: ObstacleId, surface: f32) {
        self.y = surface + LANDING_EPSILON;
        self.velocity = 0.0;
        self.jumping = false;
        self.grounded = true;
        self.air_frame = 0;
        self.rotation_start = self.rotation;
        self.rotation_target = self.rotation;
        self.rotation_frames = jump_arc_frames();
        self.on_platform = true;
        self.platform = Some(id);
        self.falling_from = None;
    }

    /// Re-snap onto the platform top if drifted. Returns true if moved.
    pub fn settle_on(&mut self, surface: f32) -> bool {
        self.grounded = true;
        if (self.y - surface).abs() > PLATFORM_DRIFT {
            self.y = surface;
            return true;
        }
        false
    }

    /// The platform scrolled away: drop from the current height
    ///
    /// Returns the vacated obstacle.
    pub fn fall_off(&mut self) -> Option<ObstacleId> {
        let vacated = self.platform.take();
        self.on_platform = false;
        self.grounded = false;
        self.falling_from = vacated;
        self.jumping = true;
        self.velocity = 0.0;
        self.air_frame = 0;
        self.rotation_start = self.rotation;
        self.rotation_target = self.rotation + 90.0;
        self.rotation_frames = fall_frames(self.y);
        vacated
    }

    /// End the run. Returns false if it had already ended.
    pub fn trigger_game_over(&mut self, reason: DeathReason) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        self.jumping = false;
        self.holding = false;
        self.velocity = 0.0;
        self.rotation_start = self.rotation;
        self.rotation_target = self.rotation;
        self.rotation_frames = jump_arc_frames();
        self.death_reason.get_or_insert(reason);
        true
    }

    /// Drop every reference to a removed obstacle
    pub fn forget_obstacle(&mut self, id: ObstacleId) {
        if self.platform == Some(id) {
            self.platform = None;
        }
        if self.falling_from == Some(id) {
            self.falling_from = None;
        }
    }
}
