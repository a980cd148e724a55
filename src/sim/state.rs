//! World state and core simulation types
//!
//! Everything the per-frame update touches lives in [`WorldState`]; there
//! are no hidden statics. Side effects for the outside world (sounds,
//! effects the renderer may want to react to) are queued here and drained
//! by the platform once per frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::blood::BloodFeedback;
use super::enemy::{Bone, Enemy};
use super::intro::IntroSequence;
use super::particles::ParticleSystem;
use super::pickup::{OrbitalWeapon, Pickup};
use super::player::Player;
use super::scenery::{Bush, Pumpkin};
use super::spawn::{self, SpawnDirector};
use crate::audio::AudioCue;

pub const MAX_LIVES: u8 = 3;

/// Overall game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Asset groups still arriving; nothing advances
    Loading,
    /// Title and controls hint; intro characters wander
    ShowingControls,
    Playing,
    Paused,
    /// Terminal until an explicit restart
    GameOver,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ParticleBurst { pos: Vec2, count: usize },
    CandyCollected,
    HeartCollected { restored: bool },
    JawbreakerCollected,
    EnemyDestroyed,
    PumpkinSmashed,
    Damaged { lives_left: u8 },
    GameOver,
    PhaseChanged(GamePhase),
}

/// Lives, candy and the best run so far
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub candy: u32,
    pub lives: u8,
    pub high_score: u32,
    /// New high score not yet handed to persistence
    #[serde(skip)]
    pending_high_score: Option<u32>,
}

impl Default for Score {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Score {
    pub fn new(high_score: u32) -> Self {
        Self {
            candy: 0,
            lives: MAX_LIVES,
            high_score,
            pending_high_score: None,
        }
    }

    pub fn collect_candy(&mut self) {
        self.candy += 1;
    }

    /// Returns true if a life was actually restored
    pub fn add_life(&mut self) -> bool {
        let before = self.lives;
        self.lives = (self.lives + 1).min(MAX_LIVES);
        self.lives > before
    }

    /// Lose one life and fold the current run into the high score
    pub fn take_damage(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.candy > self.high_score {
            self.high_score = self.candy;
            self.pending_high_score = Some(self.candy);
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// New round; the high score survives
    pub fn reset(&mut self) {
        self.lives = MAX_LIVES;
        self.candy = 0;
    }

    /// Yields each new high score once, for the persistence layer
    pub fn take_high_score_update(&mut self) -> Option<u32> {
        self.pending_high_score.take()
    }
}

/// Complete world state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub intro: IntroSequence,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bones: Vec<Bone>,
    pub pumpkins: Vec<Pumpkin>,
    pub bushes: Vec<Bush>,
    pub candy: Option<Pickup>,
    pub heart: Option<Pickup>,
    /// Free-floating jawbreaker; never set while `orbital` is
    pub jawbreaker: Option<Pickup>,
    pub orbital: Option<OrbitalWeapon>,
    pub score: Score,
    pub spawner: SpawnDirector,
    pub particles: ParticleSystem,
    pub blood: BloodFeedback,
    /// Background scroll position in logical units
    pub road_offset: f32,
    pub zombie_noise_timer: f32,
    /// Frames since the menu was dismissed (title fade)
    pub title_timer: f32,
    /// Frames spent on the game-over screen
    pub game_over_timer: f32,
    pub is_game_over: bool,
    /// Simulation frame counter
    pub time_ticks: u64,
    #[serde(skip)]
    pub cues: Vec<AudioCue>,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl WorldState {
    pub fn new(seed: u64) -> Self {
        let mut world = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Loading,
            intro: IntroSequence::default(),
            player: Player::new(),
            enemies: Vec::new(),
            bones: Vec::new(),
            pumpkins: Vec::new(),
            bushes: Vec::new(),
            candy: None,
            heart: None,
            jawbreaker: None,
            orbital: None,
            score: Score::default(),
            spawner: SpawnDirector::default(),
            particles: ParticleSystem::default(),
            blood: BloodFeedback::default(),
            road_offset: 0.0,
            zombie_noise_timer: 0.0,
            title_timer: 0.0,
            game_over_timer: 0.0,
            is_game_over: false,
            time_ticks: 0,
            cues: Vec::new(),
            events: Vec::new(),
        };
        world.seed_round();
        world
    }

    /// Fresh world carrying a persisted high score
    pub fn with_high_score(seed: u64, high_score: u32) -> Self {
        let mut world = Self::new(seed);
        world.score.high_score = high_score;
        world
    }

    /// Horde and fixed bushes present at the start of every round
    fn seed_round(&mut self) {
        self.enemies = spawn::spawn_horde(&mut self.rng);
        self.bushes = spawn::fixed_bushes();
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    /// Every asset group has arrived
    pub fn assets_ready(&mut self) {
        if self.phase == GamePhase::Loading {
            self.set_phase(GamePhase::ShowingControls);
        }
    }

    pub fn cue(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    pub fn drain_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spray particles and record the burst
    pub fn burst(&mut self, pos: Vec2, colors: &[u8], count: usize) {
        self.particles.emit(&mut self.rng, pos, colors, count);
        self.events.push(GameEvent::ParticleBurst { pos, count });
    }

    /// Apply one hit. Ignored while invincible; the final life ends the run
    /// instead of granting invincibility.
    pub fn take_damage(&mut self) {
        if self.player.is_invincible() || self.is_game_over {
            return;
        }

        self.score.take_damage();
        self.cue(AudioCue::PlayHit);
        self.events.push(GameEvent::Damaged {
            lives_left: self.score.lives,
        });

        if self.score.is_game_over() {
            self.game_over();
            return;
        }

        self.blood.add_splatter(&mut self.rng);
        self.player.set_invincible();
    }

    /// End the run. Repeated calls are no-ops.
    pub fn game_over(&mut self) {
        if self.is_game_over {
            return;
        }
        self.is_game_over = true;
        self.game_over_timer = 0.0;
        self.blood.clear();
        self.cue(AudioCue::StopMainMusic);
        self.cue(AudioCue::StopBreathing);
        self.cue(AudioCue::StartStatic);
        self.events.push(GameEvent::GameOver);
        self.set_phase(GamePhase::GameOver);
        log::info!(
            "Game over with {} candy (best {})",
            self.score.candy,
            self.score.high_score
        );
    }

    /// Back to the start of a round: fresh entities, intro Waiting, high
    /// score kept. The RNG stream continues so rounds differ.
    pub fn reset_round(&mut self) {
        self.player.reset();
        self.enemies.clear();
        self.bones.clear();
        self.pumpkins.clear();
        self.bushes.clear();
        self.candy = None;
        self.heart = None;
        self.jawbreaker = None;
        self.orbital = None;
        self.score.reset();
        self.spawner.reset();
        self.particles.clear();
        self.blood.clear();
        self.intro.reset();
        self.road_offset = 0.0;
        self.zombie_noise_timer = 0.0;
        self.game_over_timer = 0.0;
        self.is_game_over = false;
        self.seed_round();
        log::info!("Round reset (high score {})", self.score.high_score);
    }
}
