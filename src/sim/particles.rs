//! Radial-burst particles
//!
//! Purely visual; nothing in the simulation reads particle state back.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::palette;

/// Maximum live particles
pub const MAX_PARTICLES: usize = 256;
pub const PARTICLE_GRAVITY: f32 = 0.1;

/// Burst palettes
pub const CANDY_COLORS: &[u8] = &[palette::ORANGE, palette::YELLOW, palette::WHITE];
pub const HEART_COLORS: &[u8] = &[palette::RED, palette::PINK, palette::WHITE];
pub const PUMPKIN_COLORS: &[u8] = &[palette::ORANGE, palette::PEACH, palette::YELLOW];
pub const EXPLOSION_COLORS: &[u8] = &[palette::RED, palette::PINK, palette::WHITE];

/// A single spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: f32,
    pub max_life: f32,
    /// Palette index
    pub color: u8,
    pub size: f32,
}

impl Particle {
    /// Fade factor in (0, 1]
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Owns every live particle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Spray `count` particles evenly around `origin`, biased upward
    pub fn emit<R: Rng>(&mut self, rng: &mut R, origin: Vec2, colors: &[u8], count: usize) {
        if colors.is_empty() || count == 0 {
            return;
        }
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let speed = 1.0 + rng.random::<f32>() * 2.0;
            let life = 30.0 + rng.random::<f32>() * 20.0;
            let color = colors[rng.random_range(0..colors.len())];
            let size = 1.0 + rng.random::<f32>() * 2.0;

            if self.particles.len() >= MAX_PARTICLES {
                // Drop the oldest spark to make room
                self.particles.remove(0);
            }
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 1.0),
                life,
                max_life: life,
                color,
                size,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.pos += p.vel * dt;
            p.vel.y += PARTICLE_GRAVITY * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_and_expire() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ps = ParticleSystem::default();
        ps.emit(&mut rng, Vec2::new(64.0, 64.0), CANDY_COLORS, 8);
        assert_eq!(ps.len(), 8);
        assert!(ps.particles.iter().all(|p| CANDY_COLORS.contains(&p.color)));

        // Lifetimes are below 50 frames
        for _ in 0..50 {
            ps.update(1.0);
        }
        assert!(ps.is_empty());
    }

    #[test]
    fn test_capped() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ps = ParticleSystem::default();
        for _ in 0..40 {
            ps.emit(&mut rng, Vec2::ZERO, HEART_COLORS, 8);
        }
        assert_eq!(ps.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_upward_bias() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut ps = ParticleSystem::default();
        ps.emit(&mut rng, Vec2::ZERO, EXPLOSION_COLORS, 4);
        // angle 0 points right with only the -1 bias on y
        assert_eq!(ps.particles[0].vel.y, -1.0);
    }
}
