//! Intro cinematic
//!
//! Waiting -> WalkingToStart -> AllJump -> ZombiesEntering -> RoadStarting
//! -> Complete. Player input is ignored until the sequence completes.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::{Direction, Jump, Waddle};
use super::enemy::Enemy;
use super::player::{PLAYER_SIZE, PLAYER_START, Player};
use crate::audio::AudioCue;
use crate::clamp;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const PRINCESS_MARK: Vec2 = Vec2::new(30.0, 80.0);
pub const PIRATE_MARK: Vec2 = Vec2::new(90.0, 80.0);

/// Road speed once the run is under way
pub const TARGET_SCROLL_SPEED: f32 = 0.8;
/// Frames for the road to reach full speed
pub const RAMP_FRAMES: f32 = 60.0;
/// Frames the horde takes to shuffle into view
pub const ZOMBIE_ENTRY_FRAMES: f32 = 60.0;

pub const WANDER_SPEED: f32 = 0.25;
pub const WALK_TO_MARK_SPEED: f32 = 0.35;
pub const ZOMBIE_ENTER_SPEED: f32 = 0.5;
pub const COMPANION_EXIT_SPEED: f32 = 1.0;
/// Horde members above this line still have ground to cover
pub const ZOMBIE_ENTRY_LINE: f32 = 15.0;
/// Distance at which a walker counts as on its mark
pub const ARRIVAL_RADIUS: f32 = 1.0;

/// Idle wandering stays inside the central 40% of the screen
const WANDER_MARGIN: f32 = SCREEN_WIDTH * 0.3;
const WANDER_MIN: f32 = WANDER_MARGIN;
const WANDER_MAX: f32 = SCREEN_WIDTH - WANDER_MARGIN - PLAYER_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntroPhase {
    #[default]
    Waiting,
    WalkingToStart,
    AllJump,
    ZombiesEntering,
    RoadStarting,
    Complete,
}

/// A cinematic-only character (princess, pirate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    pub pos: Vec2,
    pub waddle: Waddle,
    pub jump: Jump,
}

impl Companion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            waddle: Waddle::default(),
            jump: Jump::default(),
        }
    }
}

/// Random-walk state for one idle character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wander {
    pub direction: Direction,
    pub timer: f32,
    pub duration: f32,
}

impl Wander {
    fn new(direction: Direction, duration: f32) -> Self {
        Self {
            direction,
            timer: 0.0,
            duration,
        }
    }

    /// Pick a new heading once the current one runs out
    fn tick<R: Rng>(&mut self, dt: f32, rng: &mut R) -> Direction {
        self.timer += dt;
        if self.timer >= self.duration {
            self.direction = match rng.random_range(0..4) {
                0 => Direction::Up,
                1 => Direction::Down,
                2 => Direction::Left,
                _ => Direction::Right,
            };
            self.duration = 30.0 + rng.random::<f32>() * 90.0;
            self.timer = 0.0;
        }
        self.direction
    }
}

/// Body parts the intro needs to move, borrowed from either actor kind
struct Actor<'a> {
    pos: &'a mut Vec2,
    waddle: &'a mut Waddle,
}

impl Actor<'_> {
    fn wander(&mut self, direction: Direction, step: f32, dt: f32) {
        match direction {
            Direction::Up => self.pos.y -= step,
            Direction::Down => self.pos.y += step,
            Direction::Left => self.pos.x -= step,
            Direction::Right => self.pos.x += step,
        }
        self.pos.x = clamp(self.pos.x, WANDER_MIN, WANDER_MAX);
        self.pos.y = clamp(self.pos.y, WANDER_MIN, WANDER_MAX);
        self.waddle.step(direction, dt);
    }

    /// Step toward `mark`; snaps and returns true once within reach
    fn walk_to(&mut self, mark: Vec2, step: f32, dt: f32) -> bool {
        let delta = mark - *self.pos;
        let distance = delta.length();
        if distance <= ARRIVAL_RADIUS {
            *self.pos = mark;
            return true;
        }
        *self.pos += delta / distance * step;
        let direction = if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        self.waddle.step(direction, dt);
        false
    }
}

/// Intro state machine plus its two extra characters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroSequence {
    pub phase: IntroPhase,
    /// Frames spent in the current phase
    pub timer: f32,
    pub road_scroll_speed: f32,
    pub princess: Companion,
    pub pirate: Companion,
    /// Player, princess, pirate
    pub wander: [Wander; 3],
    /// Join barrier for WalkingToStart, same order as `wander`
    pub arrived: [bool; 3],
    jump_sound_played: bool,
    music_started: bool,
}

impl Default for IntroSequence {
    fn default() -> Self {
        Self {
            phase: IntroPhase::Waiting,
            timer: 0.0,
            road_scroll_speed: 0.0,
            princess: Companion::new(PRINCESS_MARK),
            pirate: Companion::new(PIRATE_MARK),
            wander: [
                Wander::new(Direction::Right, 60.0),
                Wander::new(Direction::Left, 45.0),
                Wander::new(Direction::Up, 75.0),
            ],
            arrived: [false; 3],
            jump_sound_played: false,
            music_started: false,
        }
    }
}

impl IntroSequence {
    pub fn is_complete(&self) -> bool {
        self.phase == IntroPhase::Complete
    }

    /// Main music has been cued; it owns the soundtrack from here on
    pub fn music_started(&self) -> bool {
        self.music_started
    }

    /// Companions are drawn until the road starts moving
    pub fn companions_visible(&self) -> bool {
        matches!(
            self.phase,
            IntroPhase::Waiting
                | IntroPhase::WalkingToStart
                | IntroPhase::AllJump
                | IntroPhase::ZombiesEntering
        )
    }

    /// Menu dismissed: everyone heads for their mark
    pub fn start(&mut self) {
        if self.phase == IntroPhase::Waiting {
            self.set_phase(IntroPhase::WalkingToStart);
            self.arrived = [false; 3];
        }
    }

    /// Back to Waiting with companions on their marks
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_phase(&mut self, phase: IntroPhase) {
        log::debug!("intro: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.timer = 0.0;
    }

    /// Advance the cinematic by one frame.
    ///
    /// `playing` is false while the menu is up or the game is paused; the
    /// idle wander still runs then, nothing else does.
    #[allow(clippy::too_many_arguments)]
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        player: &mut Player,
        enemies: &mut [Enemy],
        cues: &mut Vec<AudioCue>,
        rng: &mut R,
        playing: bool,
    ) {
        if self.is_complete() {
            self.road_scroll_speed = TARGET_SCROLL_SPEED;
            return;
        }

        if !playing {
            if self.phase == IntroPhase::Waiting {
                self.update_wander(dt, player, rng);
            }
            return;
        }

        self.timer += dt;

        match self.phase {
            IntroPhase::Waiting | IntroPhase::Complete => {}
            IntroPhase::WalkingToStart => self.update_walking(dt, player),
            IntroPhase::AllJump => self.update_all_jump(dt, player, cues),
            IntroPhase::ZombiesEntering => self.update_zombies_entering(dt, enemies),
            IntroPhase::RoadStarting => self.update_road_starting(dt, player, cues),
        }
    }

    fn update_wander<R: Rng>(&mut self, dt: f32, player: &mut Player, rng: &mut R) {
        let step = WANDER_SPEED * dt;
        let [w_player, w_princess, w_pirate] = &mut self.wander;

        let dir = w_player.tick(dt, rng);
        Actor {
            pos: &mut player.pos,
            waddle: &mut player.waddle,
        }
        .wander(dir, step, dt);

        let dir = w_princess.tick(dt, rng);
        Actor {
            pos: &mut self.princess.pos,
            waddle: &mut self.princess.waddle,
        }
        .wander(dir, step, dt);

        let dir = w_pirate.tick(dt, rng);
        Actor {
            pos: &mut self.pirate.pos,
            waddle: &mut self.pirate.waddle,
        }
        .wander(dir, step, dt);
    }

    fn update_walking(&mut self, dt: f32, player: &mut Player) {
        let step = WALK_TO_MARK_SPEED * dt;
        let actors = [
            (
                PLAYER_START,
                Actor {
                    pos: &mut player.pos,
                    waddle: &mut player.waddle,
                },
            ),
            (
                PRINCESS_MARK,
                Actor {
                    pos: &mut self.princess.pos,
                    waddle: &mut self.princess.waddle,
                },
            ),
            (
                PIRATE_MARK,
                Actor {
                    pos: &mut self.pirate.pos,
                    waddle: &mut self.pirate.waddle,
                },
            ),
        ];

        for (arrived, (mark, mut actor)) in self.arrived.iter_mut().zip(actors) {
            if *arrived {
                *actor.pos = mark;
            } else {
                *arrived = actor.walk_to(mark, step, dt);
            }
        }

        if self.arrived.iter().all(|a| *a) {
            player.jump.start();
            self.princess.jump.start();
            self.pirate.jump.start();
            self.set_phase(IntroPhase::AllJump);
        }
    }

    fn update_all_jump(&mut self, dt: f32, player: &mut Player, cues: &mut Vec<AudioCue>) {
        if !self.jump_sound_played {
            cues.push(AudioCue::PlayJumpSound);
            self.jump_sound_played = true;
        }

        player.jump.update(dt);
        self.princess.jump.update(dt);
        self.pirate.jump.update(dt);

        if !player.jump.active && !self.princess.jump.active && !self.pirate.jump.active {
            self.set_phase(IntroPhase::ZombiesEntering);
        }
    }

    fn update_zombies_entering(&mut self, dt: f32, enemies: &mut [Enemy]) {
        for enemy in enemies
            .iter_mut()
            .filter(|e| !e.is_attacking() && e.pos.y < ZOMBIE_ENTRY_LINE)
        {
            enemy.pos.y += ZOMBIE_ENTER_SPEED * dt;
        }

        for companion in [&mut self.princess, &mut self.pirate] {
            // Keep walking until well clear of the bottom edge
            if companion.pos.y < SCREEN_HEIGHT + PLAYER_SIZE * 2.0 {
                companion.pos.y += COMPANION_EXIT_SPEED * dt;
            }
            companion.waddle.step(Direction::Down, dt);
        }

        if self.timer >= ZOMBIE_ENTRY_FRAMES {
            self.set_phase(IntroPhase::RoadStarting);
        }
    }

    fn update_road_starting(&mut self, dt: f32, player: &mut Player, cues: &mut Vec<AudioCue>) {
        if !self.music_started {
            cues.push(AudioCue::StopAmbientLoop);
            cues.push(AudioCue::StartMainMusic);
            self.music_started = true;
        }

        player.waddle.step(Direction::Right, dt);

        self.road_scroll_speed =
            (self.timer / RAMP_FRAMES * TARGET_SCROLL_SPEED).min(TARGET_SCROLL_SPEED);

        if self.timer >= RAMP_FRAMES {
            self.road_scroll_speed = TARGET_SCROLL_SPEED;
            self.set_phase(IntroPhase::Complete);
            log::info!("Intro complete, road at full speed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anim::{Facing, jump_frames};
    use crate::sim::enemy::EnemyKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run(
        intro: &mut IntroSequence,
        player: &mut Player,
        enemies: &mut [Enemy],
        cues: &mut Vec<AudioCue>,
        frames: usize,
    ) {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..frames {
            intro.update(1.0, player, enemies, cues, &mut rng, true);
        }
    }

    #[test]
    fn test_full_sequence() {
        let mut intro = IntroSequence::default();
        let mut player = Player::new();
        player.pos = Vec2::new(50.0, 70.0);
        let mut enemies = vec![Enemy::new(
            Vec2::new(40.0, -20.0),
            EnemyKind::HordeZombie,
            Facing::Left,
            0.0,
        )];
        let mut cues = Vec::new();

        intro.start();
        assert_eq!(intro.phase, IntroPhase::WalkingToStart);

        // ~14 units at 0.35 per frame
        let mut rng = Pcg32::seed_from_u64(1);
        let mut frames = 0;
        while intro.phase == IntroPhase::WalkingToStart && frames < 100 {
            intro.update(1.0, &mut player, &mut enemies, &mut cues, &mut rng, true);
            frames += 1;
        }
        assert!(frames > 30);
        assert_eq!(intro.phase, IntroPhase::AllJump);
        assert_eq!(player.pos, PLAYER_START);
        assert!(player.jump.active);

        run(&mut intro, &mut player, &mut enemies, &mut cues, jump_frames() as usize);
        assert_eq!(intro.phase, IntroPhase::ZombiesEntering);
        assert_eq!(cues, vec![AudioCue::PlayJumpSound]);

        run(&mut intro, &mut player, &mut enemies, &mut cues, 60);
        assert_eq!(intro.phase, IntroPhase::RoadStarting);
        assert!(enemies[0].pos.y > -20.0);
        assert!(intro.princess.pos.y > PRINCESS_MARK.y);

        run(&mut intro, &mut player, &mut enemies, &mut cues, 30);
        assert!((intro.road_scroll_speed - 0.4).abs() < 0.02);
        run(&mut intro, &mut player, &mut enemies, &mut cues, 30);
        assert!(intro.is_complete());
        assert_eq!(intro.road_scroll_speed, TARGET_SCROLL_SPEED);
        assert_eq!(
            cues,
            vec![
                AudioCue::PlayJumpSound,
                AudioCue::StopAmbientLoop,
                AudioCue::StartMainMusic
            ]
        );
        assert!(!intro.companions_visible());
    }

    #[test]
    fn test_join_barrier_waits_for_slowest() {
        let mut intro = IntroSequence::default();
        let mut player = Player::new();
        intro.pirate.pos = Vec2::new(90.0, 40.0);
        let mut cues = Vec::new();

        intro.start();
        run(&mut intro, &mut player, &mut [], &mut cues, 10);
        assert_eq!(intro.arrived, [true, true, false]);
        assert_eq!(intro.phase, IntroPhase::WalkingToStart);
    }

    #[test]
    fn test_waiting_wanders_inside_center() {
        let mut intro = IntroSequence::default();
        let mut player = Player::new();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut cues = Vec::new();
        for _ in 0..2000 {
            intro.update(1.0, &mut player, &mut [], &mut cues, &mut rng, false);
        }
        assert_eq!(intro.phase, IntroPhase::Waiting);
        for pos in [player.pos, intro.princess.pos, intro.pirate.pos] {
            assert!(pos.x >= WANDER_MIN && pos.x <= WANDER_MAX);
            assert!(pos.y >= WANDER_MIN && pos.y <= WANDER_MAX);
        }
        assert!(cues.is_empty());
    }

    #[test]
    fn test_paused_mid_sequence_freezes() {
        let mut intro = IntroSequence::default();
        let mut player = Player::new();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut cues = Vec::new();
        intro.start();
        player.pos = Vec2::new(40.0, 40.0);
        intro.update(1.0, &mut player, &mut [], &mut cues, &mut rng, false);
        assert_eq!(player.pos, Vec2::new(40.0, 40.0));
        assert_eq!(intro.timer, 0.0);
    }

    #[test]
    fn test_reset_restores_marks() {
        let mut intro = IntroSequence::default();
        intro.princess.pos = Vec2::new(1.0, 200.0);
        intro.phase = IntroPhase::Complete;
        intro.reset();
        assert_eq!(intro.phase, IntroPhase::Waiting);
        assert_eq!(intro.princess.pos, PRINCESS_MARK);
        assert_eq!(intro.road_scroll_speed, 0.0);
    }
}
