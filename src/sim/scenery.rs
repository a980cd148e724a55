//! Road-side obstacles and decorations

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::CULL_MARGIN;

pub const PUMPKIN_SIZE: f32 = 6.0;
pub const BUSH_SIZE: f32 = 8.0;

/// Pumpkin obstacle. Running into it while grounded smashes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pumpkin {
    pub pos: Vec2,
    pub is_smashed: bool,
}

impl Pumpkin {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            is_smashed: false,
        }
    }

    pub fn update(&mut self, scroll: f32) {
        self.pos.y -= scroll;
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::at(self.pos, PUMPKIN_SIZE, PUMPKIN_SIZE)
    }

    /// One-way transition. Returns true only for the hit that smashed it.
    pub fn smash(&mut self) -> bool {
        let first = !self.is_smashed;
        self.is_smashed = true;
        first
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y < -CULL_MARGIN
    }
}

/// Decorative bush
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bush {
    pub pos: Vec2,
}

impl Bush {
    pub fn new(pos: Vec2) -> Self {
        Self { pos }
    }

    pub fn update(&mut self, scroll: f32) {
        self.pos.y -= scroll;
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y < -CULL_MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smash_is_monotonic() {
        let mut p = Pumpkin::new(Vec2::new(10.0, 10.0));
        assert!(p.smash());
        assert!(!p.smash());
        assert!(p.is_smashed);
    }

    #[test]
    fn test_scroll_and_cull() {
        let mut b = Bush::new(Vec2::new(5.0, -9.5));
        assert!(!b.is_off_screen());
        b.update(0.8);
        assert!(b.is_off_screen());
    }
}
