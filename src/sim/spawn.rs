//! Spawn director
//!
//! Independent frame accumulators decide *when* something appears; the
//! `spawn_*` builders decide *where*. Each `should_*` check resets its own
//! accumulator when it fires, even if the caller then declines to spawn
//! because a singleton is already live.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::Facing;
use super::enemy::{ENEMY_SIZE, Enemy, EnemyKind, SKELETON_COOLDOWN};
use super::pickup::{PICKUP_HITBOX, Pickup, PickupKind};
use super::scenery::{Bush, PUMPKIN_SIZE, Pumpkin};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const PUMPKIN_INTERVAL: f32 = 90.0;
pub const BUSH_INTERVAL: f32 = 300.0;
pub const ENEMY_INTERVAL: f32 = 180.0;
pub const CANDY_INTERVAL: f32 = 200.0;
pub const JAWBREAKER_INTERVAL: f32 = 600.0;
/// Continuous running required before the enemy clock starts
pub const RUN_WARMUP: f32 = 60.0;
/// Minimum candy before jawbreakers appear
pub const JAWBREAKER_MIN_CANDY: u32 = 5;

/// Bushes closer than this to an existing bush are rejected
pub const BUSH_MIN_DISTANCE: f32 = 20.0;
pub const BUSH_PLACEMENT_ATTEMPTS: usize = 4;

pub const HORDE_SIZE: usize = 60;
/// Decorative bushes present at round start
pub const FIXED_BUSHES: [Vec2; 5] = [
    Vec2::new(12.0, 20.0),
    Vec2::new(116.0, 45.0),
    Vec2::new(8.0, 70.0),
    Vec2::new(112.0, 95.0),
    Vec2::new(15.0, 115.0),
];

/// Frames between hearts; shrinks as the candy count climbs
pub fn heart_interval(candy: u32) -> f32 {
    match candy {
        20.. => 300.0,
        15.. => 400.0,
        10.. => 500.0,
        _ => 600.0,
    }
}

/// Enemy mix for one enemy-spawn event, keyed on candy count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyTier {
    /// One zombie
    ZombiesOnly,
    /// One enemy, coin flip between zombie and skeleton
    Mixed,
    /// One skeleton and one zombie
    Pair,
    /// Two skeletons
    SkeletonPair,
    /// Three random enemies
    Swarm,
}

impl EnemyTier {
    pub fn for_candy(candy: u32) -> Self {
        match candy {
            20.. => EnemyTier::Swarm,
            15.. => EnemyTier::SkeletonPair,
            10.. => EnemyTier::Pair,
            5.. => EnemyTier::Mixed,
            _ => EnemyTier::ZombiesOnly,
        }
    }
}

/// Spawn timers and placement rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnDirector {
    pub pumpkin_timer: f32,
    pub bush_timer: f32,
    pub enemy_timer: f32,
    pub candy_timer: f32,
    pub heart_timer: f32,
    pub jawbreaker_timer: f32,
    /// Frames the player has been moving without a break
    pub running_timer: f32,
}

impl SpawnDirector {
    /// Advance every accumulator by one frame
    pub fn update(&mut self, dt: f32, player_moving: bool) {
        self.pumpkin_timer += dt;
        self.bush_timer += dt;
        self.candy_timer += dt;
        self.heart_timer += dt;
        self.jawbreaker_timer += dt;

        if player_moving {
            self.running_timer += dt;
        } else {
            self.running_timer = 0.0;
        }

        // No enemies for a player standing still at the start line
        if self.running_timer >= RUN_WARMUP {
            self.enemy_timer += dt;
        }
    }

    pub fn should_spawn_pumpkin(&mut self) -> bool {
        fire(&mut self.pumpkin_timer, PUMPKIN_INTERVAL)
    }

    pub fn should_spawn_bush(&mut self) -> bool {
        fire(&mut self.bush_timer, BUSH_INTERVAL)
    }

    pub fn should_spawn_enemy(&mut self) -> bool {
        fire(&mut self.enemy_timer, ENEMY_INTERVAL)
    }

    pub fn should_spawn_candy(&mut self) -> bool {
        fire(&mut self.candy_timer, CANDY_INTERVAL)
    }

    pub fn should_spawn_heart(&mut self, candy: u32) -> bool {
        fire(&mut self.heart_timer, heart_interval(candy))
    }

    pub fn should_spawn_jawbreaker(&mut self, candy: u32) -> bool {
        candy >= JAWBREAKER_MIN_CANDY && fire(&mut self.jawbreaker_timer, JAWBREAKER_INTERVAL)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn fire(timer: &mut f32, interval: f32) -> bool {
    if *timer >= interval {
        *timer = 0.0;
        true
    } else {
        false
    }
}

pub fn spawn_pumpkin<R: Rng>(rng: &mut R) -> Pumpkin {
    let x = rng.random::<f32>() * (SCREEN_WIDTH - PUMPKIN_SIZE);
    Pumpkin::new(Vec2::new(x, SCREEN_HEIGHT))
}

/// Try a few road-side spots; `None` when every one crowds an existing bush
pub fn spawn_bush<R: Rng>(rng: &mut R, existing: &[Bush]) -> Option<Bush> {
    for _ in 0..BUSH_PLACEMENT_ATTEMPTS {
        let offset = rng.random::<f32>() * 20.0;
        let x = if rng.random::<bool>() {
            5.0 + offset
        } else {
            SCREEN_WIDTH - 25.0 + offset
        };
        let pos = Vec2::new(x, SCREEN_HEIGHT);
        if existing
            .iter()
            .all(|b| b.pos.distance(pos) >= BUSH_MIN_DISTANCE)
        {
            return Some(Bush::new(pos));
        }
    }
    None
}

pub fn spawn_pickup<R: Rng>(rng: &mut R, kind: PickupKind) -> Pickup {
    let x = rng.random::<f32>() * (SCREEN_WIDTH - PICKUP_HITBOX);
    Pickup::new(kind, Vec2::new(x, SCREEN_HEIGHT))
}

/// Enemies entering from below the bottom edge, facing the player
pub fn spawn_enemies<R: Rng>(rng: &mut R, candy: u32, player_x: f32) -> Vec<Enemy> {
    let kinds: Vec<EnemyKind> = match EnemyTier::for_candy(candy) {
        EnemyTier::ZombiesOnly => vec![EnemyKind::AttackingZombie],
        EnemyTier::Mixed => vec![random_attacker(rng)],
        EnemyTier::Pair => vec![EnemyKind::Skeleton, EnemyKind::AttackingZombie],
        EnemyTier::SkeletonPair => vec![EnemyKind::Skeleton, EnemyKind::Skeleton],
        EnemyTier::Swarm => (0..3).map(|_| random_attacker(rng)).collect(),
    };

    kinds
        .into_iter()
        .map(|kind| {
            let x = rng.random::<f32>() * SCREEN_WIDTH;
            let facing = if x > player_x {
                Facing::Left
            } else {
                Facing::Right
            };
            let phase = rng.random::<f32>() * TAU;
            let enemy = Enemy::new(Vec2::new(x, SCREEN_HEIGHT + ENEMY_SIZE), kind, facing, phase);
            match kind {
                EnemyKind::Skeleton => {
                    enemy.with_shot_cooldown(rng.random::<f32>() * SKELETON_COOLDOWN)
                }
                _ => enemy,
            }
        })
        .collect()
}

fn random_attacker<R: Rng>(rng: &mut R) -> EnemyKind {
    if rng.random::<bool>() {
        EnemyKind::Skeleton
    } else {
        EnemyKind::AttackingZombie
    }
}

/// The stationary horde above the top edge
pub fn spawn_horde<R: Rng>(rng: &mut R) -> Vec<Enemy> {
    (0..HORDE_SIZE)
        .map(|_| {
            let x = rng.random::<f32>() * (SCREEN_WIDTH - ENEMY_SIZE);
            let y = -30.0 + rng.random::<f32>() * 15.0;
            let facing = if rng.random::<bool>() {
                Facing::Left
            } else {
                Facing::Right
            };
            let phase = rng.random::<f32>() * TAU;
            Enemy::new(Vec2::new(x, y), EnemyKind::HordeZombie, facing, phase)
        })
        .collect()
}

pub fn fixed_bushes() -> Vec<Bush> {
    FIXED_BUSHES.iter().copied().map(Bush::new).collect()
}
