//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-multiplier timestep supplied by the caller
//! - Seeded RNG only, owned by the world
//! - Stable iteration order (insertion order of entity vectors)
//! - No rendering or platform dependencies; sounds leave as queued cues

pub mod anim;
pub mod blood;
pub mod collision;
pub mod enemy;
pub mod intro;
pub mod particles;
pub mod pickup;
pub mod player;
pub mod scenery;
pub mod spawn;
pub mod state;
pub mod tick;

pub use anim::{Direction, Facing, Jump, Pose, Waddle};
pub use blood::{BloodFeedback, Corner, Splatter, SplatterState};
pub use collision::Aabb;
pub use enemy::{Bone, Enemy, EnemyKind};
pub use intro::{Companion, IntroPhase, IntroSequence};
pub use particles::{Particle, ParticleSystem};
pub use pickup::{OrbitalWeapon, Pickup, PickupKind};
pub use player::{Controls, Player};
pub use scenery::{Bush, Pumpkin};
pub use spawn::{EnemyTier, SpawnDirector};
pub use state::{GameEvent, GamePhase, MAX_LIVES, Score, WorldState};
pub use tick::{TickInput, tick};
