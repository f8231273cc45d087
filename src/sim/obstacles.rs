//! Obstacle spawning, scrolling and scoring
//!
//! Obstacles are kept sorted by id, which is also spawn order. Everything else
//! in the simulation refers to them by `ObstacleId` so a removal can never
//! leave a dangling link behind.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;
use crate::level::LevelTimeline;

/// Stable obstacle identifier (monotonic per run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Lethal on any contact
    Spike,
    /// Can be landed on; lethal from below or the side
    Cube,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 2] = [ObstacleKind::Spike, ObstacleKind::Cube];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Spike => "spike",
            ObstacleKind::Cube => "cube",
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::splat(OBSTACLE_SIZE)
    }
}

/// A scrolling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    /// Left edge in screen space
    pub x: f32,
    /// Already considered for scoring
    pub scored: bool,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::resting_on(self.x, GROUND_Y, self.kind.size())
    }

    /// Height of the obstacle's top above the ground
    pub fn height(&self) -> f32 {
        self.kind.size().y
    }

    /// Score this obstacle if its right edge is past `player_left`
    ///
    /// Returns true when a point was earned. The obstacle is marked either way,
    /// so it is considered exactly once.
    pub fn try_score(&mut self, player_left: f32, player_height: f32) -> bool {
        if self.scored || self.bounds().right() >= player_left {
            return false;
        }
        self.scored = true;
        player_height > 0.0 && self.kind != ObstacleKind::Spike
    }
}

/// Owns the live obstacles and decides when new ones appear
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    next_id: u32,
    rng: Pcg32,
    /// Milliseconds since the last random spawn
    spawn_timer_ms: f32,
    /// Next unconsumed timeline cue
    next_cue: usize,
    world_width: f32,
}

impl ObstacleField {
    pub fn new(seed: u64, world_width: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
            spawn_timer_ms: 0.0,
            next_cue: 0,
            world_width,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.obstacles.iter_mut()
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Spawn an obstacle just beyond the right edge of the world
    pub fn spawn(&mut self, kind: Option<ObstacleKind>) -> &Obstacle {
        let kind = kind.unwrap_or_else(|| {
            ObstacleKind::ALL[self.rng.random_range(0..ObstacleKind::ALL.len())]
        });
        let id = ObstacleId(self.next_id);
        self.next_id += 1;

        self.obstacles.push(Obstacle {
            id,
            kind,
            x: self.world_width + OBSTACLE_PADDING,
            scored: false,
        });
        log::debug!("Spawned {} #{}", kind.as_str(), id.0);
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Spawn whatever is due this tick
    ///
    /// A non-empty timeline replaces random spawning entirely, even after its
    /// last cue has been used.
    pub fn spawn_due(
        &mut self,
        timeline: Option<&LevelTimeline>,
        elapsed_ms: f32,
        delta: f32,
    ) -> Vec<(ObstacleId, ObstacleKind)> {
        let mut spawned = Vec::new();

        match timeline.filter(|t| !t.cues.is_empty()) {
            Some(timeline) => {
                while let Some(cue) = timeline.cues.get(self.next_cue) {
                    if elapsed_ms < cue.time * 1000.0 {
                        break;
                    }
                    let obstacle = self.spawn(Some(cue.kind));
                    spawned.push((obstacle.id, obstacle.kind));
                    self.next_cue += 1;
                }
            }
            None => {
                self.spawn_timer_ms += delta * 1000.0;
                if self.spawn_timer_ms >= OBSTACLE_INTERVAL_MS {
                    self.spawn_timer_ms = 0.0;
                    let obstacle = self.spawn(None);
                    spawned.push((obstacle.id, obstacle.kind));
                }
            }
        }

        spawned
    }

    /// Scroll every obstacle left and drop the ones that left the world
    ///
    /// Returns the removed ids so callers can clear their references.
    pub fn advance(&mut self, delta: f32) -> Vec<ObstacleId> {
        let mut removed = Vec::new();
        for obstacle in &mut self.obstacles {
            obstacle.x -= OBSTACLE_SPEED * delta;
            if obstacle.x < -OBSTACLE_PADDING * 2.0 {
                removed.push(obstacle.id);
            }
        }
        if !removed.is_empty() {
            self.obstacles.retain(|o| !removed.contains(&o.id));
        }
        removed
    }

    /// Forget every obstacle and rewind the spawn sources
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.spawn_timer_ms = 0.0;
        self.next_cue = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Cue, LevelTimeline, ReplayConfig};

    fn timeline(cues: &[(f32, ObstacleKind)]) -> LevelTimeline {
        LevelTimeline {
            cues: cues.iter().map(|&(time, kind)| Cue { time, kind }).collect(),
            replay: ReplayConfig::default(),
        }
    }

    #[test]
    fn test_spawn_position_and_ids() {
        let mut field = ObstacleField::new(1, WORLD_WIDTH);
        let first = field.spawn(Some(ObstacleKind::Cube)).id;
        let second = field.spawn(Some(ObstacleKind::Spike)).id;
        assert!(first < second);
        assert!(field.iter().all(|o| o.x == WORLD_WIDTH + OBSTACLE_PADDING));
    }

    #[test]
    fn test_random_kinds_are_seeded() {
        let kinds = |seed| {
            let mut field = ObstacleField::new(seed, WORLD_WIDTH);
            (0..32).map(|_| field.spawn(None).kind).collect::<Vec<_>>()
        };
        let a = kinds(42);
        assert_eq!(a, kinds(42));
        assert!(a.contains(&ObstacleKind::Spike));
        assert!(a.contains(&ObstacleKind::Cube));
    }

    #[test]
    fn test_timeline_drains_simultaneous_cues() {
        let level = timeline(&[
            (0.5, ObstacleKind::Cube),
            (0.5, ObstacleKind::Spike),
            (1.0, ObstacleKind::Cube),
        ]);
        let mut field = ObstacleField::new(1, WORLD_WIDTH);

        assert!(field.spawn_due(Some(&level), 400.0, 0.02).is_empty());
        let spawned = field.spawn_due(Some(&level), 500.0, 0.02);
        assert_eq!(
            spawned.iter().map(|s| s.1).collect::<Vec<_>>(),
            vec![ObstacleKind::Cube, ObstacleKind::Spike]
        );
        assert_eq!(field.spawn_due(Some(&level), 1200.0, 0.02).len(), 1);
        // Exhausted timeline never falls back to random spawning
        assert!(field.spawn_due(Some(&level), 60_000.0, 0.05).is_empty());
    }

    #[test]
    fn test_empty_timeline_uses_interval() {
        let level = timeline(&[]);
        let mut field = ObstacleField::new(1, WORLD_WIDTH);
        let mut count = 0;
        for _ in 0..96 {
            count += field.spawn_due(Some(&level), 0.0, 0.03125).len();
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_interval_spawns_in_order_and_removes_past_edge() {
        let mut field = ObstacleField::new(7, WORLD_WIDTH);
        let delta = 0.03125; // 31.25ms, exact in binary
        let mut spawned_at = Vec::new();
        let mut removed = Vec::new();

        for step in 1..=640 {
            for (id, _) in field.spawn_due(None, 0.0, delta) {
                spawned_at.push((step, id));
            }
            removed.extend(field.advance(delta));

            // Live obstacles are ordered oldest first, so x strictly increases
            let xs: Vec<f32> = field.iter().map(|o| o.x).collect();
            assert!(xs.windows(2).all(|w| w[0] < w[1]));
            assert!(field.iter().all(|o| o.x >= -OBSTACLE_PADDING * 2.0));
        }

        // 640 steps * 31.25ms = 20s -> one spawn every 96 steps (3000ms)
        assert_eq!(
            spawned_at.iter().map(|s| s.0).collect::<Vec<_>>(),
            vec![96, 192, 288, 384, 480, 576]
        );
        assert!(spawned_at.windows(2).all(|w| w[0].1 < w[1].1));
        // Each obstacle needs (324 + 48) / 15 = 24.8 steps -> gone on its 25th
        assert_eq!(removed.len(), 6);
        assert_eq!(removed, spawned_at.iter().map(|s| s.1).collect::<Vec<_>>());
    }

    #[test]
    fn test_score_once_and_only_airborne() {
        let mut cube = Obstacle {
            id: ObstacleId(1),
            kind: ObstacleKind::Cube,
            x: 20.0,
            scored: false,
        };
        // Right edge at 56, already past the player's left edge at 64
        assert!(cube.try_score(PLAYER_X, 10.0));
        assert!(cube.scored);
        assert!(!cube.try_score(PLAYER_X, 10.0));

        let mut grounded = Obstacle {
            id: ObstacleId(2),
            kind: ObstacleKind::Cube,
            x: 20.0,
            scored: false,
        };
        assert!(!grounded.try_score(PLAYER_X, 0.0));
        assert!(grounded.scored);
        assert!(!grounded.try_score(PLAYER_X, 50.0));
    }

    #[test]
    fn test_score_waits_for_full_pass() {
        let mut cube = Obstacle {
            id: ObstacleId(1),
            kind: ObstacleKind::Cube,
            x: PLAYER_X - OBSTACLE_SIZE,
            scored: false,
        };
        // Right edge exactly at the player's left edge has not passed yet
        assert!(!cube.try_score(PLAYER_X, 10.0));
        assert!(!cube.scored);
    }

    #[test]
    fn test_spike_never_scores() {
        let mut spike = Obstacle {
            id: ObstacleId(1),
            kind: ObstacleKind::Spike,
            x: 0.0,
            scored: false,
        };
        assert!(!spike.try_score(PLAYER_X, 100.0));
        assert!(spike.scored);
    }

    #[test]
    fn test_clear_rewinds_sources() {
        let level = timeline(&[(0.0, ObstacleKind::Cube)]);
        let mut field = ObstacleField::new(1, WORLD_WIDTH);
        assert_eq!(field.spawn_due(Some(&level), 0.0, 0.0).len(), 1);
        field.clear();
        assert!(field.is_empty());
        assert_eq!(field.spawn_due(Some(&level), 0.0, 0.0).len(), 1);
    }
}
