//! Platform abstraction layer
//!
//! The simulation never talks to a window, a canvas or an input device. Hosts
//! feed it `TickInput` and a timestamp once per frame and receive a
//! `RenderFrame` describing what to draw:
//! - Input: jump press/release, whatever device they come from
//! - Rendering: player pose, obstacles, score, game-over state
//! - Debug overlay: the inset hitboxes the collision test actually uses

use serde::Serialize;

use crate::sim::collision::{obstacle_hitbox, player_hitbox};
use crate::sim::geometry::Rect;
use crate::sim::{DeathReason, GameEvent, GameState, ObstacleId, ObstacleKind};

/// Something that can show a frame
pub trait RenderPort {
    fn present(&mut self, frame: &RenderFrame);
}

/// Obstacle as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub x: f32,
}

/// Hitboxes for the collision debug overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugHitboxes {
    pub player: Rect,
    /// Cube hitboxes only, matching what can be landed on
    pub cubes: Vec<Rect>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Height above ground (translate up by this)
    pub player_y: f32,
    /// Degrees
    pub player_rotation: f32,
    pub obstacles: Vec<ObstacleView>,
    pub score: u32,
    pub game_over: bool,
    pub death_reason: Option<DeathReason>,
    /// One-shot events from this tick (score pulses, verdicts, ...)
    pub events: Vec<GameEvent>,
    pub debug: Option<DebugHitboxes>,
}

impl RenderFrame {
    /// Snapshot the state, taking this tick's events with it
    pub fn capture(state: &mut GameState) -> Self {
        let debug = state.settings.debug_collision.then(|| DebugHitboxes {
            player: player_hitbox(&state.player.bounds()),
            cubes: state
                .obstacles
                .iter()
                .filter(|o| o.kind == ObstacleKind::Cube)
                .map(|o| obstacle_hitbox(&o.bounds()))
                .collect(),
        });

        Self {
            player_y: state.player.y,
            player_rotation: state.player.rotation,
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    x: o.x,
                })
                .collect(),
            score: state.score,
            game_over: state.player.game_over,
            death_reason: state.player.death_reason,
            events: state.drain_events(),
            debug,
        }
    }

    /// The score changed this frame (renderers pulse the counter)
    pub fn score_changed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::Scored { .. } | GameEvent::Reset))
    }
}

/// Headless renderer that reports through the log
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderPort for LogRenderer {
    fn present(&mut self, frame: &RenderFrame) {
        self.frames += 1;
        for event in &frame.events {
            log::debug!("frame {}: {:?}", self.frames, event);
        }
        if frame.score_changed() {
            log::info!("Score: {}", frame.score);
        }
        if let Some(debug) = &frame.debug {
            log::trace!(
                "hitboxes: player {:?}, {} cube(s)",
                debug.player,
                debug.cubes.len()
            );
        }
    }
}
