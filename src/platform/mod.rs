//! Platform abstraction layer
//!
//! Handles the browser/native seams that stay testable off-target:
//! - Input events folded into per-frame `TickInput`
//! - Asset group loading progress

pub mod assets;
pub mod input;

pub use assets::AssetTracker;
pub use input::InputState;
