//! Square Dash - a side-scrolling platformer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, obstacles, replay)
//! - `level`: Level timelines and their loading
//! - `platform`: Host-facing ports (input, rendering)
//! - `settings`: Runtime switches (debug overlay, replay mode, level choice)

pub mod level;
pub mod platform;
pub mod settings;
pub mod sim;

pub use level::{LevelError, LevelSource, LevelTimeline};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Vertical acceleration per frame (pixels/frame², negative is down)
    pub const GRAVITY: f32 = -0.9;
    /// Initial upward velocity of a jump (pixels/frame)
    pub const JUMP_VELOCITY: f32 = 16.05;

    /// Largest frame delta the clock will report (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.05;

    /// World dimensions (screen space, y grows downward)
    pub const WORLD_WIDTH: f32 = 300.0;
    pub const GROUND_Y: f32 = 240.0;

    /// Player body, pinned horizontally
    pub const PLAYER_X: f32 = 64.0;
    pub const PLAYER_SIZE: f32 = 40.0;

    /// Obstacle body (spikes and cubes share a footprint)
    pub const OBSTACLE_SIZE: f32 = 36.0;
    /// Horizontal scroll speed (pixels/second)
    pub const OBSTACLE_SPEED: f32 = 480.0;
    /// Off-screen margin for spawning and despawning
    pub const OBSTACLE_PADDING: f32 = 24.0;
    /// Random spawn cadence when no timeline is loaded
    pub const OBSTACLE_INTERVAL_MS: f32 = 3000.0;

    /// Hitbox shrink factors (fraction of the shorter side)
    pub const OBSTACLE_INSET: f32 = 0.16;
    pub const PLAYER_INSET: f32 = 0.08;

    /// Classifier tolerance for top/bottom contacts
    pub const CONTACT_EPSILON: f32 = 2.0;
    /// Gap left between player and platform on landing
    pub const LANDING_EPSILON: f32 = 1.0;
    /// Drift tolerated before re-snapping to a platform
    pub const PLATFORM_DRIFT: f32 = 0.1;
    /// Horizontal overlap needed to keep standing on a platform
    pub const PLATFORM_MIN_OVERLAP: f32 = 1.0;

    /// Replay defaults when the level omits them
    pub const DEFAULT_JUMP_TIME: f32 = 1.45;
    pub const DEFAULT_SURVIVAL_SECONDS: f32 = 2.0;
}
