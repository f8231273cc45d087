//! Frame-stepped vertical physics
//!
//! Gravity and jump impulses are per frame, not per second: one call to
//! `integrate` is one frame of motion regardless of the host's frame delta.
//! Obstacles scroll by delta time instead (see `obstacles`), so a slower host
//! stretches the world relative to the jump. This mismatch is what the game
//! has always felt like and is kept as is.

use super::player::PlayerState;
use crate::consts::{GRAVITY, JUMP_VELOCITY};

/// Outcome of one integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Player was not airborne
    Idle,
    /// Player is still in the air
    Airborne,
    /// Player touched the ground this frame
    Landed { rejumped: bool },
}

/// Frames in a full jump arc (take-off to touch-down at the same height)
pub fn jump_arc_frames() -> u32 {
    ((2.0 * JUMP_VELOCITY) / GRAVITY.abs()).ceil() as u32
}

/// Frames needed to fall `height` pixels from rest
///
/// Smallest `n` with `|g| * n(n+1)/2 >= height`, at least one frame.
pub fn fall_frames(height: f32) -> u32 {
    if height <= 0.0 {
        return 1;
    }
    let g = GRAVITY.abs();
    let frames = (((1.0 + 8.0 * height / g).sqrt() - 1.0) / 2.0).ceil();
    (frames as u32).max(1)
}

/// Advance the player one frame
pub fn integrate(player: &mut PlayerState) -> Step {
    if !player.jumping {
        return Step::Idle;
    }

    player.velocity += GRAVITY;
    player.y += player.velocity;
    player.air_frame += 1;
    player.grounded = false;

    let progress = (player.air_frame as f32 / player.rotation_frames.max(1) as f32).min(1.0);
    player.rotation =
        player.rotation_start + (player.rotation_target - player.rotation_start) * progress;

    if player.y <= 0.0 {
        player.land_on_ground();
        // Holding the control chains straight into the next jump
        let rejumped = player.holding && player.jump();
        return Step::Landed { rejumped };
    }

    Step::Airborne
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_jump_arc_frames() {
        assert_eq!(jump_arc_frames(), 36);
    }

    #[test]
    fn test_fall_frames_floor() {
        assert_eq!(fall_frames(0.0), 1);
        assert_eq!(fall_frames(-5.0), 1);
        assert_eq!(fall_frames(0.5), 1);
    }

    #[test]
    fn test_fall_frames_covers_height() {
        // 36px needs 9 frames: 0.9 * 45 = 40.5 >= 36 while 0.9 * 36 = 32.4 < 36
        assert_eq!(fall_frames(36.0), 9);
    }

    #[test]
    fn test_full_jump_lands() {
        let mut player = PlayerState::default();
        assert!(player.jump());

        let mut frames = 0;
        loop {
            frames += 1;
            match integrate(&mut player) {
                Step::Airborne => assert!(player.y > 0.0),
                Step::Landed { rejumped } => {
                    assert!(!rejumped);
                    break;
                }
                Step::Idle => panic!("jump ended without landing"),
            }
            assert!(frames < 100);
        }

        assert_eq!(frames, 35);
        assert_eq!(player.y, 0.0);
        assert!(player.grounded);
        assert!(!player.jumping);
        assert!((player.rotation - 90.0).abs() < 1e-3);
        assert_eq!(player.rotation_frames, jump_arc_frames());
    }

    #[test]
    fn test_rotation_wraps_on_landing() {
        let mut player = PlayerState {
            rotation: 270.0,
            ..Default::default()
        };
        player.jump();
        while integrate(&mut player) == Step::Airborne {}
        assert!(player.rotation.abs() < 1e-3);
    }

    #[test]
    fn test_holding_rejumps_on_landing() {
        let mut player = PlayerState::default();
        player.holding = true;
        player.jump();

        let step = loop {
            let step = integrate(&mut player);
            if step != Step::Airborne {
                break step;
            }
        };

        assert_eq!(step, Step::Landed { rejumped: true });
        assert!(player.jumping);
        assert_eq!(player.velocity, JUMP_VELOCITY);
        assert_eq!(player.air_frame, 0);
    }

    #[test]
    fn test_idle_when_grounded() {
        let mut player = PlayerState::default();
        let before = player.clone();
        assert_eq!(integrate(&mut player), Step::Idle);
        assert_eq!(player, before);
    }

    proptest! {
        #[test]
        fn prop_fall_frames_monotone(a in 0.0f32..2000.0, b in 0.0f32..2000.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(fall_frames(low) <= fall_frames(high));
        }

        #[test]
        fn prop_fall_frames_reach_height(h in 0.01f32..2000.0) {
            let n = fall_frames(h) as f32;
            prop_assert!(GRAVITY.abs() * n * (n + 1.0) / 2.0 >= h - 1e-2);
        }
    }
}
