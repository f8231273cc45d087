//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only comes from the timestamps the host passes to `tick`
//! - Seeded RNG only
//! - Stable iteration order (oldest obstacle first)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod geometry;
pub mod obstacles;
pub mod physics;
pub mod player;
pub mod replay;
pub mod state;
pub mod tick;

pub use collision::Contact;
pub use geometry::Rect;
pub use obstacles::{Obstacle, ObstacleField, ObstacleId, ObstacleKind};
pub use player::{DeathReason, PlayerState, PlayerStatus};
pub use replay::{FailReason, ReplayState, ReplayVerdict};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
