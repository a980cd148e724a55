//! Candy Dash - a PICO-8 styled Halloween road runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (intro, spawning, collisions, world state)
//! - `renderer`: Abstract draw surface plus the WebGPU quad pipeline
//! - `audio`: Named audio triggers and the WebAudio synth behind them
//! - `platform`: Input and asset-loading glue
//! - `settings`: Display knobs and the persisted high score

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical screen size (fantasy console resolution)
    pub const SCREEN_WIDTH: f32 = 128.0;
    pub const SCREEN_HEIGHT: f32 = 128.0;
    /// Integer upscale applied by the presenter
    pub const DISPLAY_SCALE: u32 = 4;
    /// Sprites are authored at 8x8
    pub const SPRITE_SIZE: f32 = 8.0;

    /// Reference tick the whole simulation is tuned against
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Largest frame multiplier accepted in one update (0.1s worth of frames)
    pub const MAX_FRAME_MULTIPLIER: f32 = 6.0;

    /// Scroll axis bounds outside of which most entities are culled
    pub const CULL_MARGIN: f32 = 10.0;
}

/// PICO-8 palette indices
pub mod palette {
    pub const BLACK: u8 = 0;
    pub const DARK_BLUE: u8 = 1;
    pub const DARK_PURPLE: u8 = 2;
    pub const DARK_GREEN: u8 = 3;
    pub const BROWN: u8 = 4;
    pub const DARK_GRAY: u8 = 5;
    pub const LIGHT_GRAY: u8 = 6;
    pub const WHITE: u8 = 7;
    pub const RED: u8 = 8;
    pub const ORANGE: u8 = 9;
    pub const YELLOW: u8 = 10;
    pub const GREEN: u8 = 11;
    pub const BLUE: u8 = 12;
    pub const INDIGO: u8 = 13;
    pub const PINK: u8 = 14;
    pub const PEACH: u8 = 15;

    /// 0xRRGGBB for each palette slot
    pub const RGB: [u32; 16] = [
        0x000000, 0x1D2B53, 0x7E2553, 0x008751, 0xAB5236, 0x5F574F, 0xC2C3C7, 0xFFF1E8,
        0xFF004D, 0xFFA300, 0xFFEC27, 0x00E436, 0x29ADFF, 0x83769C, 0xFF77A8, 0xFFCCAA,
    ];

    /// Palette slot as linear-ish RGBA floats (index wraps at 16)
    pub fn rgba(index: u8) -> [f32; 4] {
        let rgb = RGB[(index % 16) as usize];
        [
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
            1.0,
        ]
    }
}

/// Clamp `value` into `[min, max]`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Positive modulo, always in `[0, max)`
#[inline]
pub fn wrap(value: f32, max: f32) -> f32 {
    ((value % max) + max) % max
}

/// Whether a point lies inside the logical screen
#[inline]
pub fn is_on_screen(x: f32, y: f32) -> bool {
    use consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
    (0.0..SCREEN_WIDTH).contains(&x) && (0.0..SCREEN_HEIGHT).contains(&y)
}

/// Convert elapsed wall time to a 60 Hz relative frame multiplier.
///
/// Motion scales proportionally with the multiplier (no sub-stepping), so the
/// value is capped to keep a backgrounded tab from teleporting entities.
#[inline]
pub fn frame_multiplier(elapsed_ms: f64) -> f32 {
    let frame_ms = 1000.0 / consts::REFERENCE_FPS as f64;
    ((elapsed_ms / frame_ms) as f32).clamp(0.0, consts::MAX_FRAME_MULTIPLIER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_negative() {
        assert_eq!(wrap(-1.0, 128.0), 127.0);
        assert_eq!(wrap(130.0, 128.0), 2.0);
        assert_eq!(wrap(0.0, 128.0), 0.0);
    }

    #[test]
    fn test_frame_multiplier() {
        assert!((frame_multiplier(1000.0 / 60.0) - 1.0).abs() < 1e-4);
        assert!((frame_multiplier(1000.0 / 30.0) - 2.0).abs() < 1e-4);
        assert_eq!(frame_multiplier(-5.0), 0.0);
        // Tab restored after a long sleep
        assert_eq!(frame_multiplier(10_000.0), consts::MAX_FRAME_MULTIPLIER);
    }

    #[test]
    fn test_palette_rgba() {
        assert_eq!(palette::rgba(palette::BLACK), [0.0, 0.0, 0.0, 1.0]);
        let red = palette::rgba(palette::RED);
        assert_eq!(red[0], 1.0);
        assert_eq!(palette::rgba(16), palette::rgba(0));
    }

    #[test]
    fn test_on_screen() {
        assert!(is_on_screen(0.0, 0.0));
        assert!(!is_on_screen(128.0, 10.0));
        assert!(!is_on_screen(10.0, -0.5));
    }
}
