//! The player character

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{Direction, Facing, Jump, Pose, Waddle};
use super::collision::Aabb;
use crate::clamp;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Collision box edge (the 8x8 sprite is drawn at 0.75 scale)
pub const PLAYER_SIZE: f32 = 6.0;
pub const PLAYER_START: Vec2 = Vec2::new(60.0, 80.0);
/// Movement per reference frame
pub const PLAYER_SPEED: f32 = 0.35;
/// Frames of damage immunity after a hit
pub const INVINCIBILITY_FRAMES: f32 = 120.0;
/// Blink half-period while invincible
pub const BLINK_PERIOD: f32 = 5.0;
/// Downward shove when bouncing off the horde
pub const BOUNCE_DISTANCE: f32 = 6.0;

const MIN_POS: f32 = 1.0;
const MAX_X: f32 = SCREEN_WIDTH - PLAYER_SIZE - 1.0;
const MAX_Y: f32 = SCREEN_HEIGHT - PLAYER_SIZE - 1.0;

/// Directional and jump input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
}

/// Result of a movement step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub moving: bool,
    /// Last axis that actually moved (left, right, up, down order)
    pub direction: Option<Direction>,
}

/// Player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub waddle: Waddle,
    pub jump: Jump,
    /// Jump key held since the last jump started
    pub jump_latch: bool,
    /// Frames of damage immunity left (never negative)
    pub invincibility: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            waddle: Waddle::default(),
            jump: Jump::default(),
            jump_latch: false,
            invincibility: 0.0,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::at(self.pos, PLAYER_SIZE, PLAYER_SIZE)
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.jump.active
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }

    pub fn facing(&self) -> Facing {
        self.waddle.facing
    }

    pub fn pose(&self) -> Pose {
        self.waddle.pose
    }

    /// Sprite hidden on alternate blink windows while invincible
    pub fn is_visible(&self) -> bool {
        !self.is_invincible() || (self.invincibility / BLINK_PERIOD).floor() as i64 % 2 == 0
    }

    /// Player-controlled step.
    ///
    /// Each pressed direction is tried on its own axis; the move commits only
    /// when `blocked(candidate, jumping)` says the target box is free. With no
    /// successful move the player is swept back by `scroll` (this frame's
    /// road displacement).
    pub fn update<F>(
        &mut self,
        controls: &Controls,
        dt: f32,
        scroll: f32,
        mut blocked: F,
    ) -> Movement
    where
        F: FnMut(&Aabb, bool) -> bool,
    {
        let step = PLAYER_SPEED * dt;
        let jumping = self.is_jumping();
        let mut movement = Movement::default();

        let attempts = [
            (controls.left, Direction::Left, Vec2::new(-step, 0.0)),
            (controls.right, Direction::Right, Vec2::new(step, 0.0)),
            (controls.up, Direction::Up, Vec2::new(0.0, -step)),
            (controls.down, Direction::Down, Vec2::new(0.0, step)),
        ];
        for (pressed, direction, delta) in attempts {
            if !pressed {
                continue;
            }
            let candidate = self.pos + delta;
            if blocked(&Aabb::at(candidate, PLAYER_SIZE, PLAYER_SIZE), jumping) {
                continue;
            }
            self.pos = Vec2::new(
                clamp(candidate.x, MIN_POS, MAX_X),
                clamp(candidate.y, MIN_POS, MAX_Y),
            );
            movement.moving = true;
            movement.direction = Some(direction);
            match direction {
                Direction::Left => self.waddle.facing = Facing::Left,
                Direction::Right => self.waddle.facing = Facing::Right,
                Direction::Up | Direction::Down => {}
            }
        }

        match movement.direction {
            Some(direction) => self.waddle.step(direction, dt),
            None => {
                self.pos.y = clamp(self.pos.y - scroll, MIN_POS, MAX_Y);
                self.waddle.settle();
            }
        }

        if controls.jump {
            if !self.jump_latch && !self.jump.active {
                self.jump.start();
                self.jump_latch = true;
            }
        } else {
            self.jump_latch = false;
        }
        self.jump.update(dt);

        self.invincibility = (self.invincibility - dt).max(0.0);

        movement
    }

    /// Start the immunity window after a non-fatal hit
    pub fn set_invincible(&mut self) {
        self.invincibility = INVINCIBILITY_FRAMES;
    }

    /// Shoved back along the road by an attacker
    pub fn nudge_back(&mut self) {
        self.pos.y -= 0.5 * PLAYER_SPEED;
    }

    /// Knocked down the screen by the horde
    pub fn bounce_back(&mut self) {
        self.pos.y = (self.pos.y + BOUNCE_DISTANCE).min(SCREEN_HEIGHT - PLAYER_SIZE);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free(_: &Aabb, _: bool) -> bool {
        false
    }

    #[test]
    fn test_move_right_and_face() {
        let mut player = Player::new();
        let controls = Controls {
            right: true,
            ..Default::default()
        };
        let movement = player.update(&controls, 1.0, 0.8, free);
        assert!(movement.moving);
        assert_eq!(movement.direction, Some(Direction::Right));
        assert!((player.pos.x - 60.35).abs() < 1e-4);
        assert_eq!(player.pos.y, 80.0);
        assert_eq!(player.facing(), Facing::Right);
    }

    #[test]
    fn test_idle_drift_with_scroll() {
        let mut player = Player::new();
        let movement = player.update(&Controls::default(), 1.0, 0.8, free);
        assert!(!movement.moving);
        assert!((player.pos.y - 79.2).abs() < 1e-4);
    }

    #[test]
    fn test_blocked_move_counts_as_idle() {
        let mut player = Player::new();
        let controls = Controls {
            up: true,
            ..Default::default()
        };
        let movement = player.update(&controls, 1.0, 0.5, |_, _| true);
        assert!(!movement.moving);
        assert!((player.pos.y - 79.5).abs() < 1e-4);
    }

    #[test]
    fn test_last_axis_wins() {
        let mut player = Player::new();
        let controls = Controls {
            left: true,
            down: true,
            ..Default::default()
        };
        let movement = player.update(&controls, 1.0, 0.0, free);
        assert_eq!(movement.direction, Some(Direction::Down));
        assert_eq!(player.facing(), Facing::Left);
    }

    #[test]
    fn test_clamped_to_screen() {
        let mut player = Player::new();
        player.pos = Vec2::new(1.1, 120.9);
        let controls = Controls {
            left: true,
            down: true,
            ..Default::default()
        };
        player.update(&controls, 1.0, 0.0, free);
        assert_eq!(player.pos, Vec2::new(MIN_POS, MAX_Y));
    }

    #[test]
    fn test_jump_needs_release() {
        let mut player = Player::new();
        let held = Controls {
            jump: true,
            ..Default::default()
        };
        player.update(&held, 1.0, 0.0, free);
        assert!(player.is_jumping());

        // Holding through landing does not retrigger
        for _ in 0..40 {
            player.update(&held, 1.0, 0.0, free);
        }
        assert!(!player.is_jumping());

        player.update(&Controls::default(), 1.0, 0.0, free);
        player.update(&held, 1.0, 0.0, free);
        assert!(player.is_jumping());
    }

    #[test]
    fn test_invincibility_counts_down_and_blinks() {
        let mut player = Player::new();
        player.set_invincible();
        assert!(player.is_visible());
        player.invincibility = 7.0;
        assert!(!player.is_visible());
        for _ in 0..10 {
            player.update(&Controls::default(), 1.0, 0.0, free);
        }
        assert_eq!(player.invincibility, 0.0);
        assert!(player.is_visible());
    }

    #[test]
    fn test_bounce_back_is_capped() {
        let mut player = Player::new();
        player.pos.y = 120.0;
        player.bounce_back();
        assert_eq!(player.pos.y, SCREEN_HEIGHT - PLAYER_SIZE);
    }
}
