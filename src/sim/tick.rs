//! Per-frame world update
//!
//! One call advances the whole world by a frame multiplier `dt` (1.0 at
//! 60 Hz). The order of the steps below matters; see [`tick`].

use glam::Vec2;

use super::collision::{blocks_movement, enemies_in_reach, enemy_hit, pumpkin_hit};
use super::enemy::Bone;
use super::particles::{CANDY_COLORS, EXPLOSION_COLORS, HEART_COLORS, PUMPKIN_COLORS};
use super::pickup::{OrbitalWeapon, Pickup, PickupKind};
use super::player::{Controls, Movement, PLAYER_SIZE};
use super::spawn;
use super::state::{GameEvent, GamePhase, MAX_LIVES, WorldState};
use super::anim::Direction;
use crate::audio::AudioCue;
use crate::consts::SCREEN_HEIGHT;
use crate::wrap;

/// Frames between ambient zombie groans
pub const ZOMBIE_NOISE_INTERVAL: f32 = 30.0;
/// Player at or above this line is caught by the horde
pub const CEILING_Y: f32 = 10.0;
/// Player at or below this line has fallen off the road
pub const FLOOR_Y: f32 = SCREEN_HEIGHT - PLAYER_SIZE;
/// Intro ambience fade after the menu is dismissed
pub const AMBIENT_FADE_MS: u32 = 2000;

pub const CANDY_BURST: usize = 8;
pub const HEART_BURST: usize = 8;
pub const JAWBREAKER_BURST: usize = 8;
pub const PUMPKIN_BURST: usize = 12;
pub const EXPLOSION_BURST: usize = 15;

/// Input for a single frame. Directions are level-triggered; `start`,
/// `pause` and `restart` are one-shot actions the platform clears after
/// each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    /// Dismiss the title / controls screen
    pub start: bool,
    /// Toggle pause
    pub pause: bool,
    /// Restart after game over
    pub restart: bool,
}

impl TickInput {
    pub fn controls(&self) -> Controls {
        Controls {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
            jump: self.jump,
        }
    }
}

/// Advance the world by one frame.
///
/// Outside of active play only the intro machine (and its idle wander)
/// runs. Once the intro is complete the order is: scroll, ambience,
/// player, spawns, enemies, bones, scenery, pickups, orbital weapon,
/// damage, particles, blood.
pub fn tick(world: &mut WorldState, input: &TickInput, dt: f32) {
    if world.phase == GamePhase::Loading {
        return;
    }
    world.time_ticks += 1;

    handle_actions(world, input);

    if world.phase != GamePhase::ShowingControls {
        world.title_timer += dt;
    }

    match world.phase {
        GamePhase::Loading => return,
        GamePhase::GameOver => {
            world.game_over_timer += dt;
            return;
        }
        GamePhase::ShowingControls | GamePhase::Paused => {
            update_intro(world, dt, false);
            return;
        }
        GamePhase::Playing => {}
    }

    if !world.intro.is_complete() {
        update_intro(world, dt, true);
        let scroll = world.intro.road_scroll_speed * dt;
        world.road_offset = wrap(world.road_offset + scroll, SCREEN_HEIGHT);
        return;
    }

    let scroll = world.intro.road_scroll_speed * dt;
    world.road_offset = wrap(world.road_offset + scroll, SCREEN_HEIGHT);

    world.zombie_noise_timer += dt;
    if world.zombie_noise_timer >= ZOMBIE_NOISE_INTERVAL {
        world.zombie_noise_timer = 0.0;
        world.cue(AudioCue::PlayRandomZombieNoise);
    }

    let movement = move_player(world, &input.controls(), dt, scroll);
    world.cue(AudioCue::UpdateBreathingLoop {
        active: movement.moving && movement.direction == Some(Direction::Down),
        dt,
    });

    run_spawns(world, dt, movement.moving);
    update_enemies(world, dt);
    let bone_hit = update_bones(world, dt, scroll);
    update_scenery(world, scroll);
    update_pickups(world, dt, scroll);
    update_orbital(world, dt);
    resolve_damage(world, bone_hit);
    smash_pumpkins(world);

    world.particles.update(dt);
    world.blood.update(dt);
}

fn handle_actions(world: &mut WorldState, input: &TickInput) {
    match world.phase {
        GamePhase::ShowingControls if input.start => {
            world.set_phase(GamePhase::Playing);
            world.cue(AudioCue::StartAmbientLoop);
            world.cue(AudioCue::FadeAmbient {
                duration_ms: AMBIENT_FADE_MS,
            });
            world.intro.start();
        }
        GamePhase::Playing if input.pause => {
            world.set_phase(GamePhase::Paused);
            world.cue(AudioCue::PauseAll);
        }
        GamePhase::Paused if input.pause => {
            world.set_phase(GamePhase::Playing);
            if world.intro.music_started() {
                world.cue(AudioCue::StartMainMusic);
            } else {
                // Still before the road: the intro ambience was cut by the pause
                world.cue(AudioCue::StartAmbientLoop);
                world.cue(AudioCue::FadeAmbient {
                    duration_ms: AMBIENT_FADE_MS,
                });
            }
        }
        GamePhase::GameOver if input.restart => {
            world.reset_round();
            world.title_timer = 0.0;
            world.cue(AudioCue::PauseAll);
            world.set_phase(GamePhase::ShowingControls);
        }
        _ => {}
    }
}

fn update_intro(world: &mut WorldState, dt: f32, playing: bool) {
    world.intro.update(
        dt,
        &mut world.player,
        &mut world.enemies,
        &mut world.cues,
        &mut world.rng,
        playing,
    );
}

fn move_player(world: &mut WorldState, controls: &Controls, dt: f32, scroll: f32) -> Movement {
    let pumpkins = &world.pumpkins;
    let enemies = &world.enemies;
    world.player.update(controls, dt, scroll, |candidate, jumping| {
        blocks_movement(candidate, jumping, pumpkins, enemies)
    })
}

fn run_spawns(world: &mut WorldState, dt: f32, moving: bool) {
    world.spawner.update(dt, moving);
    let candy = world.score.candy;

    if world.spawner.should_spawn_pumpkin() {
        let pumpkin = spawn::spawn_pumpkin(&mut world.rng);
        world.pumpkins.push(pumpkin);
    }

    if world.spawner.should_spawn_bush() {
        match spawn::spawn_bush(&mut world.rng, &world.bushes) {
            Some(bush) => world.bushes.push(bush),
            None => log::debug!("bush placement skipped, road side crowded"),
        }
    }

    if world.spawner.should_spawn_enemy() {
        let player_x = world.player.pos.x;
        let arrivals = spawn::spawn_enemies(&mut world.rng, candy, player_x);
        log::debug!("{} enemies spawned at {} candy", arrivals.len(), candy);
        world.enemies.extend(arrivals);
    }

    if world.spawner.should_spawn_candy() && world.candy.is_none() {
        world.candy = Some(spawn::spawn_pickup(&mut world.rng, PickupKind::Candy));
    }

    if world.spawner.should_spawn_heart(candy)
        && world.heart.is_none()
        && world.score.lives < MAX_LIVES
    {
        world.heart = Some(spawn::spawn_pickup(&mut world.rng, PickupKind::Heart));
    }

    if world.spawner.should_spawn_jawbreaker(candy)
        && world.jawbreaker.is_none()
        && world.orbital.is_none()
    {
        world.jawbreaker = Some(spawn::spawn_pickup(&mut world.rng, PickupKind::Jawbreaker));
    }
}

fn update_enemies(world: &mut WorldState, dt: f32) {
    let target = world.player.pos;
    for enemy in world.enemies.iter_mut() {
        let Some(shot) = enemy.update(dt, target, &mut world.rng) else {
            continue;
        };
        if let Some(bone) = Bone::aimed(shot.from, shot.target) {
            world.bones.push(bone);
        }
    }
    world.enemies.retain(|e| !e.is_off_screen());
}

/// Returns true if a bone reached a grounded player this frame
fn update_bones(world: &mut WorldState, dt: f32, scroll: f32) -> bool {
    let player_box = world.player.hitbox();
    let grounded = !world.player.is_jumping();
    let mut hit = false;

    world.bones.retain_mut(|bone| {
        bone.update(dt, scroll);
        if bone.is_off_screen() {
            return false;
        }
        if grounded && bone.hitbox().overlaps(&player_box) {
            hit = true;
            return false;
        }
        true
    });
    hit
}

fn update_scenery(world: &mut WorldState, scroll: f32) {
    for pumpkin in &mut world.pumpkins {
        pumpkin.update(scroll);
    }
    world.pumpkins.retain(|p| !p.is_off_screen());

    for bush in &mut world.bushes {
        bush.update(scroll);
    }
    world.bushes.retain(|b| !b.is_off_screen());
}

fn update_pickups(world: &mut WorldState, dt: f32, scroll: f32) {
    let player_pos = world.player.pos;
    let player_box = world.player.hitbox();

    for slot in [&mut world.candy, &mut world.heart, &mut world.jawbreaker] {
        if let Some(pickup) = slot.as_mut() {
            pickup.update(dt, scroll, player_pos);
            if pickup.is_off_screen() {
                *slot = None;
            }
        }
    }

    let touching = |slot: &Option<Pickup>| {
        slot.as_ref()
            .is_some_and(|p| p.hitbox().overlaps(&player_box))
    };

    if touching(&world.candy) {
        collect_candy(world);
    }
    if touching(&world.heart) {
        collect_heart(world);
    }
    if touching(&world.jawbreaker) {
        collect_jawbreaker(world);
    }
}

fn collect_candy(world: &mut WorldState) {
    let Some(candy) = world.candy.take() else {
        return;
    };
    world.burst(candy.pos + Vec2::splat(2.0), CANDY_COLORS, CANDY_BURST);
    world.score.collect_candy();
    world.cue(AudioCue::PlayCandyCollect);
    world.events.push(GameEvent::CandyCollected);
}

fn collect_heart(world: &mut WorldState) {
    let Some(heart) = world.heart.take() else {
        return;
    };
    world.burst(heart.pos + Vec2::splat(2.0), HEART_COLORS, HEART_BURST);
    let restored = world.score.add_life();
    world.cue(AudioCue::PlayHeartCollect);
    if restored {
        world.blood.fade_oldest();
    }
    world.events.push(GameEvent::HeartCollected { restored });
}

fn collect_jawbreaker(world: &mut WorldState) {
    let Some(jawbreaker) = world.jawbreaker.take() else {
        return;
    };
    world.burst(jawbreaker.pos + Vec2::splat(2.0), CANDY_COLORS, JAWBREAKER_BURST);
    world.orbital = Some(OrbitalWeapon::from_collected(jawbreaker));
    world.cue(AudioCue::PlayJawbreakerCollect);
    world.events.push(GameEvent::JawbreakerCollected);
}

/// The orbiting jawbreaker takes out at most one enemy, then is spent
fn update_orbital(world: &mut WorldState, dt: f32) {
    let Some(orbital) = world.orbital.as_mut() else {
        return;
    };
    orbital.update(dt, world.player.pos);
    let weapon_box = orbital.hitbox();

    let Some(index) = world
        .enemies
        .iter()
        .rposition(|e| e.hitbox().overlaps(&weapon_box))
    else {
        return;
    };

    let enemy = world.enemies.remove(index);
    world.orbital = None;
    world.burst(enemy.pos + Vec2::splat(4.0), EXPLOSION_COLORS, EXPLOSION_BURST);
    world.cue(AudioCue::PlayJawbreakerExplosion);
    world.events.push(GameEvent::EnemyDestroyed);
}

/// Evaluate every damage source; at most one life is lost per frame
fn resolve_damage(world: &mut WorldState, bone_hit: bool) {
    let mut hurt = bone_hit;
    let player_box = world.player.hitbox();

    let contact = enemies_in_reach(&player_box, world.player.is_jumping())
        .then(|| enemy_hit(&player_box, &world.enemies))
        .flatten();
    if let Some(index) = contact {
        if world.enemies[index].is_attacking() {
            world.player.nudge_back();
        } else {
            world.player.bounce_back();
        }
        hurt = true;
    }

    if world.player.pos.y <= CEILING_Y {
        world.player.pos.y = CEILING_Y;
        hurt = true;
    }

    if world.player.pos.y >= FLOOR_Y {
        hurt = true;
    }

    if hurt {
        world.take_damage();
    }
}

fn smash_pumpkins(world: &mut WorldState) {
    if world.player.is_jumping() {
        return;
    }
    let player_box = world.player.hitbox();
    let smashed = pumpkin_hit(&player_box, &mut world.pumpkins)
        .and_then(|p| p.smash().then_some(p.pos));

    if let Some(pos) = smashed {
        world.burst(pos + Vec2::splat(3.0), PUMPKIN_COLORS, PUMPKIN_BURST);
        world.cue(AudioCue::PlayPumpkinHit);
        world.events.push(GameEvent::PumpkinSmashed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anim::Facing;
    use crate::sim::enemy::{Enemy, EnemyKind};
    use crate::sim::intro::{IntroPhase, TARGET_SCROLL_SPEED};
    use crate::sim::scenery::Pumpkin;
    use proptest::prelude::*;

    fn press_start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    /// World on the menu screen
    fn menu_world(seed: u64) -> WorldState {
        let mut world = WorldState::new(seed);
        world.assets_ready();
        world
    }

    /// World in active play with the intro finished and an empty road
    fn playing_world(seed: u64) -> WorldState {
        let mut world = menu_world(seed);
        tick(&mut world, &press_start(), 1.0);
        let mut frames = 0;
        while !world.intro.is_complete() && frames < 1000 {
            tick(&mut world, &TickInput::default(), 1.0);
            frames += 1;
        }
        assert!(world.intro.is_complete());
        world.enemies.clear();
        world.bushes.clear();
        world.drain_cues();
        world.drain_events();
        world
    }

    fn bursts(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::ParticleBurst { .. }))
            .count()
    }

    #[test]
    fn test_loading_blocks_everything() {
        let mut world = WorldState::new(3);
        tick(&mut world, &press_start(), 1.0);
        assert_eq!(world.phase, GamePhase::Loading);
        assert_eq!(world.time_ticks, 0);
    }

    #[test]
    fn test_intro_to_playing() {
        let mut world = menu_world(7);
        // Idle on the menu long enough for everyone to leave their marks
        for _ in 0..40 {
            tick(&mut world, &TickInput::default(), 1.0);
        }
        let horde_before: Vec<f32> = world.enemies.iter().map(|e| e.pos.y).collect();

        tick(&mut world, &press_start(), 1.0);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.intro.phase, IntroPhase::WalkingToStart);
        let cues = world.drain_cues();
        assert_eq!(cues[0], AudioCue::StartAmbientLoop);

        // Input is ignored until the road is moving
        let held = TickInput {
            left: true,
            ..Default::default()
        };
        let mut frames = 0;
        while !world.intro.is_complete() && frames < 1000 {
            tick(&mut world, &held, 1.0);
            frames += 1;
        }
        assert_eq!(world.intro.road_scroll_speed, TARGET_SCROLL_SPEED);
        assert!(world.pumpkins.is_empty());
        let moved = world
            .enemies
            .iter()
            .zip(&horde_before)
            .any(|(e, y)| e.pos.y > *y);
        assert!(moved);

        // Now the player answers to input
        let x = world.player.pos.x;
        tick(&mut world, &held, 1.0);
        assert!(world.player.pos.x < x);
    }

    #[test]
    fn test_pause_toggle() {
        let mut world = playing_world(5);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut world, &pause, 1.0);
        assert_eq!(world.phase, GamePhase::Paused);
        assert!(world.drain_cues().contains(&AudioCue::PauseAll));

        let y = world.player.pos.y;
        tick(&mut world, &TickInput::default(), 1.0);
        assert_eq!(world.player.pos.y, y);

        tick(&mut world, &pause, 1.0);
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(world.drain_cues().contains(&AudioCue::StartMainMusic));
    }

    fn toggle_pause(world: &mut WorldState) -> Vec<AudioCue> {
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(world, &pause, 1.0);
        world.drain_cues()
    }

    #[test]
    fn test_resume_during_road_ramp_restarts_music() {
        let mut world = menu_world(43);
        tick(&mut world, &press_start(), 1.0);
        let mut frames = 0;
        while !world.intro.music_started() && frames < 1000 {
            tick(&mut world, &TickInput::default(), 1.0);
            frames += 1;
        }
        assert_eq!(world.intro.phase, IntroPhase::RoadStarting);
        assert!(world.drain_cues().contains(&AudioCue::StartMainMusic));

        assert!(toggle_pause(&mut world).contains(&AudioCue::PauseAll));
        let resumed = toggle_pause(&mut world);
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(resumed.contains(&AudioCue::StartMainMusic));
        assert!(!resumed.contains(&AudioCue::StartAmbientLoop));

        while !world.intro.is_complete() && frames < 2000 {
            tick(&mut world, &TickInput::default(), 1.0);
            frames += 1;
        }
        assert!(world.intro.is_complete());
    }

    #[test]
    fn test_resume_before_road_restarts_ambience() {
        let mut world = menu_world(47);
        tick(&mut world, &press_start(), 1.0);
        world.drain_cues();
        assert!(!world.intro.music_started());

        assert!(toggle_pause(&mut world).contains(&AudioCue::PauseAll));
        let resumed = toggle_pause(&mut world);
        assert_eq!(resumed[0], AudioCue::StartAmbientLoop);
        assert_eq!(
            resumed[1],
            AudioCue::FadeAmbient {
                duration_ms: AMBIENT_FADE_MS
            }
        );
        assert!(!resumed.contains(&AudioCue::StartMainMusic));
    }

    #[test]
    fn test_candy_not_replaced_while_on_road() {
        let mut world = playing_world(53);
        world.player.pos = Vec2::new(60.0, 40.0);
        let mut waiting = Pickup::new(PickupKind::Candy, Vec2::new(4.0, 110.0));
        waiting.pulse = 50.0;
        world.candy = Some(waiting);
        world.spawner.candy_timer = spawn::CANDY_INTERVAL;

        tick(&mut world, &TickInput::default(), 1.0);

        assert_eq!(world.spawner.candy_timer, 0.0);
        assert!(world.candy.as_ref().is_some_and(|c| c.pulse > 50.0));
    }

    #[test]
    fn test_heart_withheld_at_full_lives() {
        let mut world = playing_world(59);
        world.player.pos = Vec2::new(60.0, 40.0);
        assert_eq!(world.score.lives, MAX_LIVES);
        world.spawner.heart_timer = spawn::heart_interval(world.score.candy);

        tick(&mut world, &TickInput::default(), 1.0);
        assert_eq!(world.spawner.heart_timer, 0.0);
        assert!(world.heart.is_none());

        world.score.lives = MAX_LIVES - 1;
        world.spawner.heart_timer = spawn::heart_interval(world.score.candy);
        tick(&mut world, &TickInput::default(), 1.0);
        assert!(world.heart.is_some());
    }

    #[test]
    fn test_jawbreaker_withheld_while_orbiting() {
        let mut world = playing_world(61);
        world.player.pos = Vec2::new(60.0, 40.0);
        world.score.candy = spawn::JAWBREAKER_MIN_CANDY;
        let held = Pickup::new(PickupKind::Jawbreaker, world.player.pos);
        world.orbital = Some(OrbitalWeapon::from_collected(held));
        world.spawner.jawbreaker_timer = spawn::JAWBREAKER_INTERVAL;

        tick(&mut world, &TickInput::default(), 1.0);
        assert_eq!(world.spawner.jawbreaker_timer, 0.0);
        assert!(world.jawbreaker.is_none());
        assert!(world.orbital.is_some());

        world.orbital = None;
        world.spawner.jawbreaker_timer = spawn::JAWBREAKER_INTERVAL;
        tick(&mut world, &TickInput::default(), 1.0);
        assert!(world.jawbreaker.is_some());
    }

    #[test]
    fn test_horde_touch_on_last_life_ends_run() {
        let mut world = playing_world(11);
        world.score.lives = 1;
        world.score.candy = 4;
        world.player.pos = Vec2::new(60.0, 40.0);
        world.enemies.push(Enemy::new(
            Vec2::new(58.0, 37.0),
            EnemyKind::HordeZombie,
            Facing::Left,
            0.0,
        ));

        tick(&mut world, &TickInput::default(), 1.0);

        let events = world.drain_events();
        let damage = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Damaged { .. }))
            .count();
        assert_eq!(damage, 1);
        assert_eq!(world.score.lives, 0);
        assert_eq!(world.phase, GamePhase::GameOver);
        assert!(world.blood.is_empty());
        assert_eq!(world.score.high_score, 4);
        assert_eq!(world.score.take_high_score_update(), Some(4));
    }

    #[test]
    fn test_candy_collection() {
        let mut world = playing_world(13);
        let start = world.score.candy;
        let pos = world.player.pos;
        world.candy = Some(Pickup::new(PickupKind::Candy, pos + Vec2::new(1.0, 1.0)));

        tick(&mut world, &TickInput::default(), 1.0);

        assert_eq!(world.score.candy, start + 1);
        assert!(world.candy.is_none());
        let events = world.drain_events();
        assert_eq!(bursts(&events), 1);
        let cues = world.drain_cues();
        assert_eq!(
            cues.iter()
                .filter(|c| **c == AudioCue::PlayCandyCollect)
                .count(),
            1
        );
    }

    #[test]
    fn test_orbital_removes_one_enemy() {
        let mut world = playing_world(17);
        let pos = world.player.pos;
        world.jawbreaker = Some(Pickup::new(PickupKind::Jawbreaker, pos + Vec2::new(1.0, 1.0)));
        tick(&mut world, &TickInput::default(), 1.0);
        assert!(world.jawbreaker.is_none());
        assert!(world.orbital.is_some());
        world.drain_events();
        world.drain_cues();

        // Two enemies parked right on the orbit
        let orbit = world.player.pos + Vec2::new(3.0, 12.0);
        for dx in [-2.0, 0.0] {
            world.enemies.push(Enemy::new(
                orbit + Vec2::new(dx, -2.0),
                EnemyKind::HordeZombie,
                Facing::Left,
                0.0,
            ));
        }
        tick(&mut world, &TickInput::default(), 1.0);

        assert_eq!(world.enemies.len(), 1);
        assert!(world.orbital.is_none());
        let cues = world.drain_cues();
        assert_eq!(
            cues.iter()
                .filter(|c| **c == AudioCue::PlayJawbreakerExplosion)
                .count(),
            1
        );
        assert_eq!(bursts(&world.drain_events()), 1);

        // Spent: nothing else happens next frame
        tick(&mut world, &TickInput::default(), 1.0);
        assert_eq!(world.enemies.len(), 1);
    }

    #[test]
    fn test_bone_hit_only_when_grounded() {
        let mut world = playing_world(19);
        let pos = world.player.pos;
        world.bones.push(Bone {
            pos: pos + Vec2::new(2.0, 2.0),
            vel: Vec2::ZERO,
            rotation: 0.0,
        });
        world.player.jump.start();
        tick(&mut world, &TickInput::default(), 1.0);
        assert_eq!(world.score.lives, MAX_LIVES);
        assert_eq!(world.bones.len(), 1);

        world.player.jump.reset();
        world.bones[0].pos = world.player.pos + Vec2::new(2.0, 2.0);
        tick(&mut world, &TickInput::default(), 1.0);
        assert_eq!(world.score.lives, MAX_LIVES - 1);
        assert!(world.bones.is_empty());
        assert!(world.player.is_invincible());
        assert_eq!(world.blood.len(), 1);
    }

    #[test]
    fn test_ceiling_clamps_and_hurts_once() {
        let mut world = playing_world(23);
        world.player.pos = Vec2::new(60.0, 10.5);
        tick(&mut world, &TickInput::default(), 1.0);
        assert_eq!(world.player.pos.y, CEILING_Y);
        assert_eq!(world.score.lives, MAX_LIVES - 1);

        // Still pinned but invincible
        tick(&mut world, &TickInput::default(), 1.0);
        assert_eq!(world.score.lives, MAX_LIVES - 1);
    }

    #[test]
    fn test_pumpkin_smash_once() {
        let mut world = playing_world(29);
        let pos = world.player.pos;
        world.pumpkins.push(Pumpkin::new(pos + Vec2::new(1.0, 1.0)));

        tick(&mut world, &TickInput::default(), 1.0);
        assert!(world.pumpkins[0].is_smashed);
        let first = world.drain_cues();
        assert!(first.contains(&AudioCue::PlayPumpkinHit));

        tick(&mut world, &TickInput::default(), 1.0);
        assert!(!world.drain_cues().contains(&AudioCue::PlayPumpkinHit));
    }

    #[test]
    fn test_heart_fades_blood_when_restoring() {
        let mut world = playing_world(31);
        world.take_damage();
        world.player.invincibility = 0.0;
        for _ in 0..130 {
            world.blood.update(1.0);
        }
        let pos = world.player.pos;
        world.heart = Some(Pickup::new(PickupKind::Heart, pos + Vec2::new(1.0, 1.0)));
        tick(&mut world, &TickInput::default(), 1.0);
        assert_eq!(world.score.lives, MAX_LIVES);
        assert!(world.drain_events().contains(&GameEvent::HeartCollected { restored: true }));
        assert_eq!(
            world.blood.splatters[0].state,
            crate::sim::blood::SplatterState::Fading
        );
    }

    #[test]
    fn test_restart_round_trip() {
        let mut world = playing_world(37);
        world.score.candy = 9;
        world.score.high_score = 4;
        world.pumpkins.push(Pumpkin::new(Vec2::new(30.0, 60.0)));
        world.candy = Some(Pickup::new(PickupKind::Candy, Vec2::new(30.0, 100.0)));
        world.score.lives = 1;
        world.take_damage();
        assert_eq!(world.phase, GamePhase::GameOver);

        // Idle on the game-over screen
        tick(&mut world, &TickInput::default(), 1.0);
        assert!(world.game_over_timer > 0.0);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut world, &restart, 1.0);
        assert_eq!(world.phase, GamePhase::ShowingControls);
        assert_eq!(world.score.lives, MAX_LIVES);
        assert_eq!(world.score.candy, 0);
        assert_eq!(world.score.high_score, 9);
        assert!(world.pumpkins.is_empty());
        assert!(world.bones.is_empty());
        assert!(world.candy.is_none() && world.heart.is_none() && world.orbital.is_none());
        assert_eq!(world.intro.phase, IntroPhase::Waiting);
        assert_eq!(world.enemies.len(), spawn::HORDE_SIZE);
        assert!(!world.is_game_over);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            press_start(),
            TickInput::default(),
            TickInput {
                left: true,
                jump: true,
                ..Default::default()
            },
            TickInput {
                down: true,
                ..Default::default()
            },
        ];

        let mut a = menu_world(99);
        let mut b = menu_world(99);
        for frame in 0..1500 {
            let input = inputs[frame % inputs.len()];
            tick(&mut a, &input, 1.0);
            tick(&mut b, &input, 1.0);
        }

        let snapshot_a = serde_json::to_string(&a).unwrap();
        let snapshot_b = serde_json::to_string(&b).unwrap();
        assert_eq!(snapshot_a, snapshot_b);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<[bool; 5]>(), prop::bool::weighted(0.02)).prop_map(|(keys, pause)| TickInput {
            left: keys[0],
            right: keys[1],
            up: keys[2],
            down: keys[3],
            jump: keys[4],
            start: true,
            pause,
            restart: true,
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_world_invariants(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_input(), 200..600),
            dt in 0.5f32..2.0,
        ) {
            let mut world = menu_world(seed);
            let mut candy = world.score.candy;
            let mut lives = world.score.lives;

            for input in &inputs {
                let had_heart = world.heart.is_some();
                let lives_before = world.score.lives;
                tick(&mut world, input, dt);

                // Hearts only spawn when there is a life to restore
                if !had_heart && world.heart.is_some() {
                    prop_assert!(lives_before < MAX_LIVES);
                }

                prop_assert!(world.score.lives <= MAX_LIVES);
                prop_assert!(!(world.jawbreaker.is_some() && world.orbital.is_some()));
                if let Some(orbital) = &world.orbital {
                    prop_assert!(orbital.jawbreaker.is_orbiting);
                }
                if let Some(jawbreaker) = &world.jawbreaker {
                    prop_assert!(!jawbreaker.is_orbiting);
                }
                prop_assert!(world.player.invincibility >= 0.0);

                // Candy only climbs within a life
                if world.score.lives == lives {
                    prop_assert!(world.score.candy >= candy);
                }
                candy = world.score.candy;
                lives = world.score.lives;
            }
        }
    }
}
