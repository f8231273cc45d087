//! Per-frame simulation tick
//!
//! Order within a tick matters and is fixed: clock, input, scripted jump,
//! physics, spawning, scrolling, contacts, fall-off, scoring, replay checks.
//! A platform landing must be resolved before the fall-off check and scoring
//! see the player's new height.

use super::collision::{Contact, classify, overlaps};
use super::geometry::Rect;
use super::obstacles::ObstacleKind;
use super::physics::{self, Step};
use super::player::DeathReason;
use super::state::{GameEvent, GameState};
use crate::consts::{CONTACT_EPSILON, PLATFORM_MIN_OVERLAP};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump control pressed (pointer down / key down)
    pub jump_press: bool,
    /// Jump control released
    pub jump_release: bool,
}

/// Advance the game by one host frame at timestamp `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let delta = state.clock.advance(now_ms, !state.player.game_over);
    let elapsed_ms = state.clock.elapsed_ms();

    // A tap inside one frame still jumps
    if input.jump_press {
        state.press_jump();
    }
    if input.jump_release {
        state.release_jump();
    }

    let replay_config = state.replay_config();
    if state.replay.take_scheduled_jump(elapsed_ms, &replay_config) && state.player.jump() {
        log::info!("Replay jump at {elapsed_ms:.0}ms");
        state.push_event(GameEvent::Jumped);
    }

    if let Step::Landed { rejumped } = physics::integrate(&mut state.player) {
        state.push_event(GameEvent::Landed);
        if rejumped {
            state.push_event(GameEvent::Jumped);
        }
    }

    // The world stands still once the run is over
    if state.player.game_over {
        return;
    }

    spawn_obstacles(state, elapsed_ms, delta);
    scroll_obstacles(state, delta);

    let (bounds, supported) = resolve_contacts(state);
    if state.player.game_over {
        return;
    }

    if state.player.on_platform && !supported {
        let vacated = state.player.fall_off();
        state.push_event(GameEvent::FellOff { obstacle: vacated });
        state.replay.observe_fall_off(vacated, elapsed_ms);
    }

    award_points(state, &bounds);

    if state.replay.is_active() {
        let tracked_passed = state
            .replay
            .tracked
            .and_then(|id| state.obstacles.get(id))
            .is_some_and(|o| o.bounds().right() < bounds.left());
        if tracked_passed {
            if let Some(verdict) = state.replay.observe_tracked_passed() {
                state.push_event(GameEvent::Replay(verdict));
            }
        }
        if let Some(verdict) = state.replay.check_survival(elapsed_ms, &replay_config) {
            state.push_event(GameEvent::Replay(verdict));
        }
    }

    state.player.last_bounds = Some(bounds);
}

fn spawn_obstacles(state: &mut GameState, elapsed_ms: f32, delta: f32) {
    let spawned = state
        .obstacles
        .spawn_due(state.level.as_ref(), elapsed_ms, delta);
    for (obstacle, kind) in spawned {
        state.replay.observe_spawn(obstacle, kind);
        state.push_event(GameEvent::ObstacleSpawned { obstacle, kind });
    }
}

fn scroll_obstacles(state: &mut GameState, delta: f32) {
    for obstacle in state.obstacles.advance(delta) {
        state.player.forget_obstacle(obstacle);
        state.replay.forget_obstacle(obstacle);
        state.push_event(GameEvent::ObstacleRemoved { obstacle });
    }
}

/// Test the player against every obstacle and apply landings and deaths
///
/// Returns the player's final box for this tick and whether the current
/// platform (if any) is still underneath.
fn resolve_contacts(state: &mut GameState) -> (Rect, bool) {
    let mut bounds = state.player.bounds();
    let prev = state.player.last_bounds.unwrap_or(bounds);
    let debug = state.settings.debug_collision;
    let mut supported = false;
    let mut death = None;
    let mut events = Vec::new();

    for obstacle in state.obstacles.iter() {
        let player = &mut state.player;
        let rect = obstacle.bounds();

        match obstacle.kind {
            ObstacleKind::Spike => {
                if overlaps(&bounds, &rect) {
                    death = Some(DeathReason::Spike);
                    break;
                }
            }
            ObstacleKind::Cube => {
                if player.falling_from == Some(obstacle.id) {
                    continue;
                }
                if overlaps(&bounds, &rect) && player.platform != Some(obstacle.id) {
                    let moving_down = player.velocity < 0.0;
                    let contact = classify(&prev, &bounds, &rect, moving_down, CONTACT_EPSILON);
                    if debug {
                        log_contact(contact, player.grounded, player.velocity);
                    }
                    if let Some(reason) = contact.cube_death() {
                        death = Some(reason);
                        break;
                    }
                    player.land_on_platform(obstacle.id, obstacle.height());
                    state.replay.observe_top_landing(obstacle.id);
                    events.push(GameEvent::LandedOnPlatform {
                        obstacle: obstacle.id,
                    });
                    bounds = player.bounds();
                }
            }
        }

        if player.platform == Some(obstacle.id)
            && bounds.horizontal_overlap(&rect) > PLATFORM_MIN_OVERLAP
        {
            supported = true;
            if player.settle_on(obstacle.height()) {
                bounds = player.bounds();
            }
        }
    }

    for event in events {
        state.push_event(event);
    }
    if let Some(reason) = death {
        state.end_run(reason);
    }
    (bounds, supported)
}

fn log_contact(contact: Contact, grounded: bool, velocity: f32) {
    log::debug!(
        "[collision] {} grounded={} vy={:.2} death={:?}",
        contact.as_str(),
        grounded,
        velocity,
        contact.cube_death().map(|r| r.as_str())
    );
}

fn award_points(state: &mut GameState, bounds: &Rect) {
    let height = state.player.y;
    let mut earned = 0;
    for obstacle in state.obstacles.iter_mut() {
        if obstacle.try_score(bounds.left(), height) {
            earned += 1;
        }
    }
    for _ in 0..earned {
        state.score += 1;
        state.push_event(GameEvent::Scored { score: state.score });
    }
}
