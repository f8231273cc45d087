//! Scripted replay verification
//!
//! In the proof scenario the verifier plays the game itself: it jumps once at a
//! fixed time and expects the player to land on top of the first cube, ride it
//! until it scrolls away, then survive for a while. It reports exactly one
//! verdict per run and never touches gameplay beyond that single jump.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::obstacles::{ObstacleId, ObstacleKind};
use super::player::DeathReason;
use crate::level::ReplayConfig;

/// Why a replay failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    /// The tracked cube went by without a top landing
    ExpectedTopLanding,
    /// The run ended before the verdict
    Death(DeathReason),
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::ExpectedTopLanding => f.write_str("expected TOP landing"),
            FailReason::Death(reason) => write!(f, "{reason}"),
        }
    }
}

/// Outcome of a replay run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayVerdict {
    Pass,
    Fail(FailReason),
}

impl fmt::Display for ReplayVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayVerdict::Pass => f.write_str("REPLAY PASS"),
            ReplayVerdict::Fail(reason) => write!(f, "REPLAY FAIL: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayState {
    pub enabled: bool,
    /// First cube spawned this run
    pub tracked: Option<ObstacleId>,
    pub jumped: bool,
    pub top_landed: bool,
    /// Simulation time when the player left the tracked cube
    pub off_time: Option<f32>,
    pub completed: bool,
    pub failed: bool,
}

impl ReplayState {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    /// Verifier still has work to do
    pub fn is_active(&self) -> bool {
        self.enabled && !self.completed
    }

    /// Clear every latch, keeping the enabled switch
    pub fn reset(&mut self) {
        *self = Self::new(self.enabled);
    }

    /// True exactly once, on the first tick at or past the scripted jump time
    pub fn take_scheduled_jump(&mut self, elapsed_ms: f32, config: &ReplayConfig) -> bool {
        if !self.is_active() || self.jumped || elapsed_ms < config.jump_time * 1000.0 {
            return false;
        }
        self.jumped = true;
        true
    }

    /// Track the first cube of the run
    pub fn observe_spawn(&mut self, id: ObstacleId, kind: ObstacleKind) {
        if self.enabled && self.tracked.is_none() && kind == ObstacleKind::Cube {
            self.tracked = Some(id);
        }
    }

    /// The player landed on top of `id`
    pub fn observe_top_landing(&mut self, id: ObstacleId) {
        if self.is_active() && self.tracked == Some(id) {
            self.top_landed = true;
        }
    }

    /// The player dropped off `vacated` because it scrolled away
    pub fn observe_fall_off(&mut self, vacated: Option<ObstacleId>, elapsed_ms: f32) {
        if self.is_active()
            && self.top_landed
            && self.off_time.is_none()
            && vacated.is_some()
            && vacated == self.tracked
        {
            self.off_time = Some(elapsed_ms);
        }
    }

    /// The tracked obstacle is fully behind the player
    pub fn observe_tracked_passed(&mut self) -> Option<ReplayVerdict> {
        if !self.is_active() || self.top_landed {
            return None;
        }
        Some(self.fail(FailReason::ExpectedTopLanding))
    }

    /// The run ended
    pub fn observe_game_over(&mut self, reason: DeathReason) -> Option<ReplayVerdict> {
        if !self.is_active() {
            return None;
        }
        Some(self.fail(FailReason::Death(reason)))
    }

    /// Pass once the player has survived long enough after leaving the cube
    pub fn check_survival(&mut self, elapsed_ms: f32, config: &ReplayConfig) -> Option<ReplayVerdict> {
        if !self.is_active() {
            return None;
        }
        let off_time = self.off_time?;
        if elapsed_ms - off_time < config.survival_ms {
            return None;
        }
        self.completed = true;
        log::info!("{}", ReplayVerdict::Pass);
        Some(ReplayVerdict::Pass)
    }

    /// Drop the tracked id when that obstacle is removed
    pub fn forget_obstacle(&mut self, id: ObstacleId) {
        if self.tracked == Some(id) {
            self.tracked = None;
        }
    }

    fn fail(&mut self, reason: FailReason) -> ReplayVerdict {
        self.failed = true;
        self.completed = true;
        let verdict = ReplayVerdict::Fail(reason);
        log::warn!("{verdict}");
        verdict
    }
}
