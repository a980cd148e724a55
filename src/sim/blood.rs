//! Blood-corner hit feedback
//!
//! Each non-fatal hit paints one screen corner. Splatters start bright, dim
//! to a persistent stain, and are only washed away by restoring a life.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const SPLATTER_OPACITY: f32 = 0.7;
pub const DIM_OPACITY: f32 = 0.3;
/// Frames from fresh to dim
pub const DIM_FRAMES: f32 = 120.0;
/// Frames from dim to gone
pub const WASH_FRAMES: f32 = 60.0;

/// Screen quadrant a splatter is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplatterState {
    Fresh,
    Dim,
    Fading,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Splatter {
    pub corner: Corner,
    pub opacity: f32,
    pub timer: f32,
    pub state: SplatterState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BloodFeedback {
    pub splatters: Vec<Splatter>,
}

impl BloodFeedback {
    /// Paint a new splatter, preferring a corner that is still clean
    pub fn add_splatter<R: Rng>(&mut self, rng: &mut R) {
        let free: Vec<Corner> = Corner::ALL
            .into_iter()
            .filter(|c| !self.splatters.iter().any(|s| s.corner == *c))
            .collect();
        let pool: &[Corner] = if free.is_empty() { &Corner::ALL } else { &free };
        let corner = pool[rng.random_range(0..pool.len())];

        self.splatters.push(Splatter {
            corner,
            opacity: SPLATTER_OPACITY,
            timer: DIM_FRAMES,
            state: SplatterState::Fresh,
        });
    }

    /// Start washing out the oldest dim splatter. Returns false if none is dim.
    pub fn fade_oldest(&mut self) -> bool {
        match self
            .splatters
            .iter_mut()
            .find(|s| s.state == SplatterState::Dim)
        {
            Some(s) => {
                s.state = SplatterState::Fading;
                s.opacity = DIM_OPACITY;
                s.timer = WASH_FRAMES;
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        for s in &mut self.splatters {
            match s.state {
                SplatterState::Fresh => {
                    s.timer -= dt;
                    if s.timer <= 0.0 {
                        s.state = SplatterState::Dim;
                        s.opacity = DIM_OPACITY;
                        s.timer = 0.0;
                    } else {
                        let progress = s.timer / DIM_FRAMES;
                        s.opacity = DIM_OPACITY + progress * (SPLATTER_OPACITY - DIM_OPACITY);
                    }
                }
                SplatterState::Fading => {
                    s.timer -= dt;
                    s.opacity = (s.timer / WASH_FRAMES).max(0.0) * DIM_OPACITY;
                }
                SplatterState::Dim => {}
            }
        }
        self.splatters
            .retain(|s| !(s.state == SplatterState::Fading && s.opacity <= 0.01));
    }

    pub fn clear(&mut self) {
        self.splatters.clear();
    }

    pub fn len(&self) -> usize {
        self.splatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splatters.is_empty()
    }
}
