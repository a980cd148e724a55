//! Walk-cycle and jump animators
//!
//! Shared by the player and the intro companions. Offsets produced here are
//! render-only; they never move a collision box.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fixed jump arc
pub const JUMP_HEIGHT: f32 = 12.0;
pub const JUMP_DURATION: f32 = 1.5;
/// Jump timer advance per reference frame
pub const JUMP_RATE: f32 = 0.08;
/// Waddle phase advance per reference frame
pub const WADDLE_RATE: f32 = 0.5;

/// Cardinal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Horizontal facing, remembered across vertical movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Parabolic jump height for a timer position, 0 once the jump is over
#[inline]
pub fn jump_offset(timer: f32, duration: f32, height: f32) -> f32 {
    let t = timer / duration;
    if (0.0..=1.0).contains(&t) {
        4.0 * t * (1.0 - t) * height
    } else {
        0.0
    }
}

/// Waddle pose: sprite offset and tilt
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub offset: Vec2,
    pub rotation: f32,
}

/// Pose for a walk phase. Sideways movement bobs, vertical movement sways.
pub fn waddle_pose(phase: f32, direction: Option<Direction>, facing: Facing) -> Pose {
    match direction {
        Some(Direction::Left) => Pose {
            offset: Vec2::new(0.0, (phase * 0.7).cos() * 0.5),
            rotation: (phase * 1.2).sin() * 0.1,
        },
        Some(Direction::Right) => Pose {
            offset: Vec2::new(0.0, (phase * 0.7).cos() * 0.5),
            rotation: (phase * 1.2).sin() * -0.1,
        },
        Some(Direction::Up | Direction::Down) => match facing {
            Facing::Left => Pose {
                offset: Vec2::new((phase * 0.5).sin(), 0.0),
                rotation: (phase * 0.8).sin() * 0.05,
            },
            Facing::Right => Pose {
                offset: Vec2::new((phase * 0.5 + PI).sin(), 0.0),
                rotation: (phase * 0.8).sin() * -0.05,
            },
        },
        None => Pose::default(),
    }
}

/// Walk-cycle state for a character
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Waddle {
    pub phase: f32,
    pub pose: Pose,
    pub facing: Facing,
}

impl Waddle {
    /// Advance one step in `direction`; sideways steps update facing
    pub fn step(&mut self, direction: Direction, dt: f32) {
        self.phase += WADDLE_RATE * dt;
        self.pose = waddle_pose(self.phase, Some(direction), self.facing);
        match direction {
            Direction::Left => self.facing = Facing::Left,
            Direction::Right => self.facing = Facing::Right,
            _ => {}
        }
    }

    /// Stand still (pose resets, phase is kept)
    pub fn settle(&mut self) {
        self.pose = Pose::default();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Fixed-duration jump
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jump {
    pub active: bool,
    pub timer: f32,
    /// Current render height above the ground position
    pub offset: f32,
}

impl Jump {
    pub fn start(&mut self) {
        self.active = true;
        self.timer = 0.0;
    }

    /// Advance the arc; lands (and zeroes the offset) once the duration elapses
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.timer += JUMP_RATE * dt;
        self.offset = jump_offset(self.timer, JUMP_DURATION, JUMP_HEIGHT);
        if self.timer >= JUMP_DURATION {
            self.active = false;
            self.offset = 0.0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Frames for a full jump at dt = 1
pub fn jump_frames() -> u32 {
    (JUMP_DURATION / JUMP_RATE).ceil() as u32
}
