//! Enemies and the bones skeletons throw
//!
//! One [`Enemy`] struct covers every variant; behaviour that differs is
//! dispatched on [`EnemyKind`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::{Facing, WADDLE_RATE};
use super::collision::Aabb;
use crate::consts::{CULL_MARGIN, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Enemy sprite / hit-box size
pub const ENEMY_SIZE: f32 = 8.0;
/// Upward speed of attacking enemies (faster than the road)
pub const ENEMY_RISE_SPEED: f32 = 1.0;
/// Horizontal homing speed
pub const ENEMY_HOMING_SPEED: f32 = 0.7;
/// No homing within this horizontal distance of the target
pub const ENEMY_DEAD_ZONE: f32 = 8.0;
/// Attacking enemies this far above the screen are gone for good
pub const ENEMY_TOP_CULL: f32 = -40.0;

/// Frames between skeleton shots
pub const SKELETON_COOLDOWN: f32 = 60.0;
/// Extra random frames added when a cooldown window rolls over
pub const SKELETON_COOLDOWN_JITTER: f32 = 30.0;

pub const BONE_SPEED: f32 = 1.2;
pub const BONE_SIZE: f32 = 2.0;
pub const BONE_SPIN: f32 = 0.1;

/// Enemy variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Stationary barrier at the top of the screen
    HordeZombie,
    /// Zombie walking up the road toward the player
    AttackingZombie,
    /// Attacker that also throws bones
    Skeleton,
}

impl EnemyKind {
    pub fn is_attacking(self) -> bool {
        !matches!(self, EnemyKind::HordeZombie)
    }
}

/// A skeleton's request to throw a bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneShot {
    pub from: Vec2,
    pub target: Vec2,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub facing: Facing,
    pub waddle_phase: f32,
    pub bob: f32,
    pub rotation: f32,
    /// Frames until the next shot window (skeletons only)
    pub shot_cooldown: f32,
    /// A bone has already left in the current window
    pub has_shot: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, kind: EnemyKind, facing: Facing, waddle_phase: f32) -> Self {
        Self {
            pos,
            kind,
            facing,
            waddle_phase,
            bob: 0.0,
            rotation: 0.0,
            shot_cooldown: 0.0,
            has_shot: false,
        }
    }

    /// Builder for a skeleton's first shot delay
    pub fn with_shot_cooldown(mut self, frames: f32) -> Self {
        self.shot_cooldown = frames;
        self
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.kind.is_attacking()
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::at(self.pos, ENEMY_SIZE, ENEMY_SIZE)
    }

    /// Vertically within the screen (shots are only fired from here)
    pub fn is_on_screen(&self) -> bool {
        self.pos.y >= 0.0 && self.pos.y <= SCREEN_HEIGHT
    }

    /// Horde zombies are never culled
    pub fn is_off_screen(&self) -> bool {
        self.is_attacking()
            && (self.pos.y > SCREEN_HEIGHT + CULL_MARGIN || self.pos.y < ENEMY_TOP_CULL)
    }

    /// Advance one frame toward `target`; skeletons may ask for a bone
    pub fn update<R: Rng>(&mut self, dt: f32, target: Vec2, rng: &mut R) -> Option<BoneShot> {
        if self.is_attacking() {
            let dx = target.x - self.pos.x;
            if dx.abs() > ENEMY_DEAD_ZONE {
                self.pos.x += dx.signum() * ENEMY_HOMING_SPEED * dt;
            }
            self.facing = if dx < 0.0 { Facing::Left } else { Facing::Right };
            self.pos.y -= ENEMY_RISE_SPEED * dt;
        }

        self.waddle_phase += WADDLE_RATE * dt;
        self.bob = (self.waddle_phase * 0.7).cos() * 0.5;
        let tilt = if self.facing == Facing::Left { 0.15 } else { -0.15 };
        self.rotation = (self.waddle_phase * 1.2).sin() * tilt;

        match self.kind {
            EnemyKind::Skeleton => self.update_skeleton(dt, target, rng),
            EnemyKind::HordeZombie | EnemyKind::AttackingZombie => None,
        }
    }

    /// At most one shot per cooldown window, only while on screen
    fn update_skeleton<R: Rng>(&mut self, dt: f32, target: Vec2, rng: &mut R) -> Option<BoneShot> {
        self.shot_cooldown -= dt;
        let mut shot = None;

        if self.shot_cooldown <= 0.0 && !self.has_shot && self.is_on_screen() {
            self.has_shot = true;
            self.shot_cooldown = SKELETON_COOLDOWN;
            shot = Some(BoneShot {
                from: self.pos,
                target,
            });
        }

        if self.shot_cooldown <= 0.0 {
            self.shot_cooldown =
                SKELETON_COOLDOWN + rng.random::<f32>() * SKELETON_COOLDOWN_JITTER;
            self.has_shot = false;
        }

        shot
    }
}

/// A spinning bone projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bone {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
}

impl Bone {
    /// Aim straight at the target's current position (no lead).
    /// Returns `None` when source and target coincide.
    pub fn aimed(from: Vec2, target: Vec2) -> Option<Self> {
        let delta = target - from;
        let distance = delta.length();
        if distance == 0.0 {
            return None;
        }
        let vel = delta / distance * BONE_SPEED;
        Some(Self {
            pos: from,
            vel,
            rotation: vel.y.atan2(vel.x),
        })
    }

    /// Ballistic step; the scroll term keeps it from riding the road
    pub fn update(&mut self, dt: f32, scroll: f32) {
        self.pos += self.vel * dt;
        self.pos.y -= scroll;
        self.rotation += BONE_SPIN * dt;
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::at(self.pos, BONE_SIZE, BONE_SIZE)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -CULL_MARGIN
            || self.pos.x > SCREEN_WIDTH + CULL_MARGIN
            || self.pos.y < -CULL_MARGIN
            || self.pos.y > SCREEN_HEIGHT + CULL_MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_horde_stays_put() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = Enemy::new(Vec2::new(10.0, -20.0), EnemyKind::HordeZombie, Facing::Left, 0.0);
        for _ in 0..100 {
            assert!(e.update(1.0, Vec2::new(100.0, 80.0), &mut rng).is_none());
        }
        assert_eq!(e.pos, Vec2::new(10.0, -20.0));
        assert!(!e.is_off_screen());
    }

    #[test]
    fn test_attacker_homes_and_rises() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e =
            Enemy::new(Vec2::new(10.0, 120.0), EnemyKind::AttackingZombie, Facing::Left, 0.0);
        e.update(1.0, Vec2::new(100.0, 80.0), &mut rng);
        assert!((e.pos.x - 10.7).abs() < 1e-4);
        assert!((e.pos.y - 119.0).abs() < 1e-4);
        assert_eq!(e.facing, Facing::Right);
    }

    #[test]
    fn test_dead_zone_stops_jitter() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e =
            Enemy::new(Vec2::new(60.0, 100.0), EnemyKind::AttackingZombie, Facing::Right, 0.0);
        e.update(1.0, Vec2::new(55.0, 80.0), &mut rng);
        assert_eq!(e.pos.x, 60.0);
        assert_eq!(e.facing, Facing::Left);
    }

    #[test]
    fn test_skeleton_fires_once_per_window() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut e = Enemy::new(Vec2::new(60.0, 100.0), EnemyKind::Skeleton, Facing::Right, 0.0)
            .with_shot_cooldown(0.5);
        let target = Vec2::new(60.0, 40.0);

        let first = e.update(1.0, target, &mut rng);
        assert_eq!(first.map(|s| s.target), Some(target));

        let shots = (0..59)
            .filter(|_| e.update(1.0, target, &mut rng).is_some())
            .count();
        assert_eq!(shots, 0);
    }

    #[test]
    fn test_skeleton_holds_fire_off_screen() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut e = Enemy::new(Vec2::new(60.0, 200.0), EnemyKind::Skeleton, Facing::Right, 0.0);
        assert!(e.update(1.0, Vec2::new(60.0, 40.0), &mut rng).is_none());
        assert!(!e.has_shot);
    }

    #[test]
    fn test_bone_zero_distance() {
        let p = Vec2::new(30.0, 30.0);
        assert!(Bone::aimed(p, p).is_none());
    }

    #[test]
    fn test_bone_scroll_compensation() {
        let mut bone = Bone::aimed(Vec2::new(0.0, 50.0), Vec2::new(10.0, 50.0)).unwrap();
        bone.update(1.0, 0.8);
        assert!((bone.pos.x - 1.2).abs() < 1e-4);
        assert!((bone.pos.y - 49.2).abs() < 1e-4);
        assert!(!bone.is_off_screen());
        bone.pos.x = 139.0;
        assert!(bone.is_off_screen());
    }
}
