//! Collectibles: candy, hearts and the jawbreaker
//!
//! All three share the same drift/bob/homing physics and differ only in the
//! homing range. A collected jawbreaker switches to orbit mode and becomes
//! the player's one-shot weapon.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::CULL_MARGIN;

/// Pickup hit-box edge (sprites are drawn at half scale)
pub const PICKUP_HITBOX: f32 = 4.0;
/// Homing never engages closer than this
pub const HOMING_MIN_DISTANCE: f32 = 4.0;
pub const HOMING_SPEED: f32 = 0.8;
/// Sprite scale once the jawbreaker is orbiting
pub const ORBIT_SCALE: f32 = 0.3;
/// Orbit anchor relative to the player's top-left corner
pub const ORBIT_ANCHOR: Vec2 = Vec2::new(3.0, 12.0);

/// Which collectible this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Candy,
    Heart,
    Jawbreaker,
}

impl PickupKind {
    /// Outer edge of the tractor-beam band
    pub fn homing_range(self) -> f32 {
        match self {
            PickupKind::Candy => 20.0,
            PickupKind::Heart => 15.0,
            PickupKind::Jawbreaker => 25.0,
        }
    }
}

/// A collectible on the road (or, for the jawbreaker, in orbit)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub pulse: f32,
    pub scale: f32,
    /// Only jawbreakers ever set this; never cleared
    pub is_orbiting: bool,
    pub wobble: f32,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            pulse: 0.0,
            scale: 1.0,
            is_orbiting: false,
            wobble: 0.0,
        }
    }

    /// Scroll drift, bob phase and short-range homing toward `player`
    pub fn update(&mut self, dt: f32, scroll: f32, player: Vec2) {
        self.pos.y -= scroll;
        self.pulse += 0.1 * dt;

        if self.is_orbiting {
            return;
        }

        let delta = player - self.pos;
        let distance = delta.length();
        if distance > HOMING_MIN_DISTANCE && distance < self.kind.homing_range() {
            self.pos += delta / distance * HOMING_SPEED * dt;
        }
    }

    /// Render-only vertical bob
    pub fn bob_offset(&self) -> f32 {
        (self.pulse * 0.8).sin() * 2.0
    }

    /// Glow strength in [0.4, 1.0]
    pub fn glow(&self) -> f32 {
        self.pulse.sin() * 0.3 + 0.7
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::at(self.pos, PICKUP_HITBOX, PICKUP_HITBOX)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y < -CULL_MARGIN
    }

    /// Enter orbit mode (jawbreaker collection)
    pub fn set_orbiting(&mut self) {
        self.is_orbiting = true;
        self.scale = ORBIT_SCALE;
    }

    /// Follow the player with a small wobble; ignores scroll and homing
    pub fn update_orbit(&mut self, dt: f32, player: Vec2) {
        if !self.is_orbiting {
            return;
        }
        self.pulse += 0.1 * dt;
        self.wobble += 0.05 * dt;
        let wobble = Vec2::new(self.wobble.sin() * 2.0, (self.wobble * 0.7).cos() * 1.5);
        self.pos = player + ORBIT_ANCHOR + wobble;
    }
}

/// A collected jawbreaker circling in front of the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitalWeapon {
    pub jawbreaker: Pickup,
}

impl OrbitalWeapon {
    /// Take ownership of a collected jawbreaker and put it in orbit
    pub fn from_collected(mut jawbreaker: Pickup) -> Self {
        jawbreaker.set_orbiting();
        Self { jawbreaker }
    }

    pub fn update(&mut self, dt: f32, player: Vec2) {
        self.jawbreaker.update_orbit(dt, player);
    }

    pub fn hitbox(&self) -> Aabb {
        self.jawbreaker.hitbox()
    }
}
