//! Game state and events
//!
//! `GameState` is the whole simulation context: nothing lives in globals, so a
//! host can run several independent games side by side.

use serde::{Deserialize, Serialize};

use super::clock::FrameClock;
use super::obstacles::{ObstacleField, ObstacleId, ObstacleKind};
use super::player::{DeathReason, PlayerState};
use super::replay::{ReplayState, ReplayVerdict};
use crate::level::{LevelTimeline, ReplayConfig};
use crate::settings::Settings;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// Touched the ground
    Landed,
    LandedOnPlatform { obstacle: ObstacleId },
    FellOff { obstacle: Option<ObstacleId> },
    ObstacleSpawned { obstacle: ObstacleId, kind: ObstacleKind },
    ObstacleRemoved { obstacle: ObstacleId },
    Scored { score: u32 },
    GameOver { reason: DeathReason },
    Replay(ReplayVerdict),
    Reset,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub player: PlayerState,
    pub obstacles: ObstacleField,
    pub replay: ReplayState,
    pub clock: FrameClock,
    /// Loaded level, `None` for random spawning
    pub level: Option<LevelTimeline>,
    pub score: u32,
    /// Events since the host last drained them
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game. Replay verification needs both the switch and a level.
    pub fn new(settings: Settings, level: Option<LevelTimeline>) -> Self {
        let replay = ReplayState::new(settings.replay_enabled() && level.is_some());
        if replay.enabled {
            log::info!("Replay verification enabled");
        }
        Self {
            obstacles: ObstacleField::new(settings.seed, settings.world_width),
            settings,
            player: PlayerState::default(),
            replay,
            clock: FrameClock::new(),
            level,
            score: 0,
            events: Vec::new(),
        }
    }

    /// Replay parameters from the level, or the defaults
    pub fn replay_config(&self) -> ReplayConfig {
        self.level.as_ref().map(|l| l.replay).unwrap_or_default()
    }

    /// Jump control went down
    ///
    /// Repeated presses while held (keyboard auto-repeat) are ignored.
    pub fn press_jump(&mut self) {
        if self.player.game_over || self.player.holding {
            return;
        }
        self.player.holding = true;
        if self.player.jump() {
            self.events.push(GameEvent::Jumped);
        }
    }

    /// Jump control came up
    pub fn release_jump(&mut self) {
        self.player.holding = false;
    }

    /// Start over. Only allowed once the run has ended.
    pub fn reset(&mut self) -> bool {
        if !self.player.game_over {
            return false;
        }
        self.player = PlayerState::default();
        self.obstacles.clear();
        self.replay.reset();
        self.clock.reset();
        self.score = 0;
        self.events.clear();
        self.events.push(GameEvent::Reset);
        log::info!("Game reset");
        true
    }

    /// End the run (idempotent) and let the verifier know
    pub(crate) fn end_run(&mut self, reason: DeathReason) {
        if !self.player.trigger_game_over(reason) {
            return;
        }
        log::info!("Game over: {reason}");
        self.events.push(GameEvent::GameOver { reason });
        if let Some(verdict) = self.replay.observe_game_over(reason) {
            self.events.push(GameEvent::Replay(verdict));
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
