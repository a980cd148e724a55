//! Rendering module
//!
//! The render pass walks a `WorldState` and issues only surface primitives
//! (filled rectangles, affine transforms and overlay blits) against a
//! [`RenderSurface`]. [`QuadBatch`] turns those into triangles and
//! [`QuadRenderer`] presents them through wgpu.

pub mod batch;
pub mod pipeline;
pub mod sprites;
pub mod text;
pub mod vertex;

pub use batch::QuadBatch;
pub use pipeline::QuadRenderer;
pub use sprites::{AssetError, OverlayImage, Sprite, SpriteId, SpriteSet};
pub use vertex::Vertex;

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_SIZE};
use crate::palette;
use crate::sim::anim::{Facing, Pose};
use crate::sim::blood::Corner;
use crate::sim::enemy::EnemyKind;
use crate::sim::pickup::{Pickup, PickupKind};
use crate::sim::{GamePhase, WorldState};

/// Abstract 128x128 logical drawing surface
pub trait RenderSurface {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, factor: Vec2);
    /// Global alpha applied to everything drawn until the next restore
    fn set_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rgba: [f32; 4]);
    /// Draw an overlay image stretched into the given rectangle
    fn blit(&mut self, image: OverlayImage, x: f32, y: f32, w: f32, h: f32);
}

const PLAYER_SCALE: f32 = 0.75;
const PUMPKIN_SCALE: f32 = 0.75;
const PICKUP_SCALE: f32 = 0.5;
const BONE_SCALE: f32 = 0.5;
const COUNTER_ICON_SCALE: f32 = 0.4;
const GLOW_ALPHA: f32 = 0.2;
/// Frames per title fade and per game-over text fade
const FADE_FRAMES: f32 = 60.0;
/// Game-over text waits this long before fading in
const GAME_OVER_TEXT_DELAY: f32 = 120.0;
/// Controls hint blink half-period in frames
const CONTROLS_BLINK: u64 = 30;
const STATIC_BLOCK: f32 = 2.0;

const GAME_OVER_RED: [f32; 4] = [100.0 / 255.0, 0.0, 0.0, 1.0];

fn color(index: u8) -> [f32; 4] {
    palette::rgba(index)
}

fn with_alpha(mut rgba: [f32; 4], alpha: f32) -> [f32; 4] {
    rgba[3] *= alpha;
    rgba
}

/// Draw a sprite's pixels offset by `origin` (in sprite space), or a solid
/// placeholder box of `size` when the sprite is missing
fn draw_pixels(
    surface: &mut dyn RenderSurface,
    sprites: &SpriteSet,
    id: SpriteId,
    origin: Vec2,
    size: f32,
) {
    match sprites.get(id) {
        Some(sprite) => {
            for p in &sprite.pixels {
                surface.fill_rect(p.x + origin.x, p.y + origin.y, 1.0, 1.0, p.color);
            }
        }
        None => surface.fill_rect(origin.x, origin.y, size, size, color(id.placeholder())),
    }
}

/// Centered, posed character (player and companions)
fn draw_character(
    surface: &mut dyn RenderSurface,
    sprites: &SpriteSet,
    id: SpriteId,
    pos: Vec2,
    pose: Pose,
    facing: Facing,
    jump_offset: f32,
) {
    let half = SPRITE_SIZE * PLAYER_SCALE / 2.0;
    let center = pos + Vec2::splat(half) + pose.offset - Vec2::new(0.0, jump_offset);
    let flip = if facing == Facing::Left { -1.0 } else { 1.0 };

    surface.save();
    surface.translate(center);
    surface.rotate(pose.rotation);
    surface.scale(Vec2::new(flip * PLAYER_SCALE, PLAYER_SCALE));
    draw_pixels(surface, sprites, id, Vec2::splat(-SPRITE_SIZE / 2.0), SPRITE_SIZE);
    surface.restore();
}

fn draw_pickup(surface: &mut dyn RenderSurface, sprites: &SpriteSet, pickup: &Pickup) {
    let id = match pickup.kind {
        PickupKind::Candy => SpriteId::Candy,
        PickupKind::Heart => SpriteId::Heart,
        PickupKind::Jawbreaker => SpriteId::Jawbreaker,
    };
    let scale = PICKUP_SCALE * pickup.scale;
    let center = pickup.pos + Vec2::new(4.0 * scale, 4.0 * scale + pickup.bob_offset());
    let origin = Vec2::splat(-SPRITE_SIZE / 2.0);

    surface.save();
    surface.translate(center);
    surface.scale(Vec2::splat(scale));

    if let Some(sprite) = sprites.get(id) {
        let glow = with_alpha(color(palette::WHITE), pickup.glow() * GLOW_ALPHA);
        for p in &sprite.pixels {
            surface.fill_rect(p.x + origin.x - 1.0, p.y + origin.y - 1.0, 3.0, 3.0, glow);
        }
    }
    draw_pixels(surface, sprites, id, origin, SPRITE_SIZE);
    surface.restore();
}

/// Two stacked copies of the street, offset by the scroll position
fn draw_background(surface: &mut dyn RenderSurface, sprites: &SpriteSet, scroll: f32) {
    match sprites.get(SpriteId::Street) {
        Some(street) => {
            for copy in [0.0, SCREEN_HEIGHT] {
                for p in &street.pixels {
                    let y = p.y - scroll + copy;
                    if (-1.0..SCREEN_HEIGHT).contains(&y) {
                        surface.fill_rect(p.x, y, 1.0, 1.0, p.color);
                    }
                }
            }
        }
        None => {
            surface.fill_rect(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT, color(palette::DARK_GRAY));
            // Lane dashes so the scroll still reads
            let dash = color(palette::LIGHT_GRAY);
            let mut y = -scroll;
            while y < SCREEN_HEIGHT {
                surface.fill_rect(SCREEN_WIDTH / 2.0 - 0.5, y, 1.0, 8.0, dash);
                y += 16.0;
            }
        }
    }
}

fn corner_origin(corner: Corner) -> Vec2 {
    let half = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
    match corner {
        Corner::TopLeft => Vec2::ZERO,
        Corner::TopRight => Vec2::new(half.x, 0.0),
        Corner::BottomLeft => Vec2::new(0.0, half.y),
        Corner::BottomRight => half,
    }
}

fn corner_image(corner: Corner) -> OverlayImage {
    match corner {
        Corner::TopLeft => OverlayImage::BloodTopLeft,
        Corner::TopRight => OverlayImage::BloodTopRight,
        Corner::BottomLeft => OverlayImage::BloodBottomLeft,
        Corner::BottomRight => OverlayImage::BloodBottomRight,
    }
}

/// Cheap integer hash mapped to [0, 1)
fn noise(x: u32, y: u32, t: u32) -> f32 {
    let mut h = x.wrapping_mul(0x27d4_eb2d)
        ^ y.wrapping_mul(0x1656_67b1)
        ^ t.wrapping_mul(0x9e37_79b9);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    (h & 0x00ff_ffff) as f32 / 16_777_216.0
}

/// Candy icon followed by the count
fn draw_candy_count(
    surface: &mut dyn RenderSurface,
    sprites: &SpriteSet,
    candy: u32,
    icon: Vec2,
    text_at: Vec2,
) {
    surface.save();
    surface.translate(icon);
    surface.scale(Vec2::splat(COUNTER_ICON_SCALE));
    draw_pixels(surface, sprites, SpriteId::Candy, Vec2::splat(-SPRITE_SIZE / 2.0), SPRITE_SIZE);
    surface.restore();
    text::draw_text(surface, &candy.to_string(), text_at, color(palette::WHITE));
}

fn draw_game_over(surface: &mut dyn RenderSurface, sprites: &SpriteSet, world: &WorldState) {
    let t = world.time_ticks as u32;

    let blocks = (SCREEN_WIDTH / STATIC_BLOCK) as u32;
    for by in 0..blocks {
        for bx in 0..blocks {
            let v = noise(bx, by, t);
            surface.fill_rect(
                bx as f32 * STATIC_BLOCK,
                by as f32 * STATIC_BLOCK,
                STATIC_BLOCK,
                STATIC_BLOCK,
                [v, v, v, 1.0],
            );
        }
    }

    if noise(t, 1, 7) > 0.95 {
        let y = (noise(t, 2, 7) * SCREEN_HEIGHT).floor();
        surface.fill_rect(0.0, y, SCREEN_WIDTH, 1.0, [1.0, 1.0, 1.0, 0.6]);
    }
    if noise(t, 3, 7) > 0.98 {
        let x = (noise(t, 4, 7) * SCREEN_WIDTH).floor();
        surface.fill_rect(x, 0.0, 1.0, SCREEN_HEIGHT, [1.0, 1.0, 1.0, 0.4]);
    }

    if world.game_over_timer <= GAME_OVER_TEXT_DELAY {
        return;
    }
    let fade = ((world.game_over_timer - GAME_OVER_TEXT_DELAY) / FADE_FRAMES).min(1.0);

    surface.save();
    surface.set_alpha(fade * 0.8);
    surface.fill_rect(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT, [0.0, 0.0, 0.0, 0.8]);
    surface.set_alpha(fade);

    let cx = SCREEN_WIDTH / 2.0;
    let cy = SCREEN_HEIGHT / 2.0;
    text::draw_text_centered(surface, "GAME OVER", cx, cy - 14.0, GAME_OVER_RED);
    text::draw_text_centered(surface, "PRESS R TO RESTART", cx, cy + 1.0, GAME_OVER_RED);

    let count = world.score.candy.to_string();
    let total = 6.0 + 4.0 + text::text_width(&count);
    let x = (SCREEN_WIDTH - total) / 2.0;
    let y = cy + 20.0;
    draw_candy_count(
        surface,
        sprites,
        world.score.candy,
        Vec2::new(x, y),
        Vec2::new(x + 8.0, y - 2.0),
    );
    surface.restore();
}

/// Render one frame of the world in layer order
pub fn render_world(world: &WorldState, sprites: &SpriteSet, surface: &mut dyn RenderSurface) {
    surface.fill_rect(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT, color(palette::BLACK));

    if world.phase == GamePhase::Loading {
        return;
    }

    draw_background(surface, sprites, world.road_offset);

    for pumpkin in &world.pumpkins {
        let id = if pumpkin.is_smashed {
            SpriteId::SmashedPumpkin
        } else {
            SpriteId::Pumpkin
        };
        surface.save();
        surface.translate(pumpkin.pos);
        surface.scale(Vec2::splat(PUMPKIN_SCALE));
        draw_pixels(surface, sprites, id, Vec2::ZERO, SPRITE_SIZE);
        surface.restore();
    }

    for bush in &world.bushes {
        surface.save();
        surface.translate(bush.pos);
        draw_pixels(surface, sprites, SpriteId::Bush, Vec2::ZERO, SPRITE_SIZE);
        surface.restore();
    }

    for enemy in &world.enemies {
        let id = match enemy.kind {
            EnemyKind::Skeleton => SpriteId::Skeleton,
            EnemyKind::HordeZombie | EnemyKind::AttackingZombie => SpriteId::Zombie,
        };
        let flip = if enemy.facing == Facing::Left { -1.0 } else { 1.0 };
        surface.save();
        surface.translate(enemy.pos + Vec2::new(4.0, 4.0 + enemy.bob));
        surface.rotate(enemy.rotation);
        surface.scale(Vec2::new(flip, 1.0));
        draw_pixels(surface, sprites, id, Vec2::splat(-SPRITE_SIZE / 2.0), SPRITE_SIZE);
        surface.restore();
    }

    for bone in &world.bones {
        surface.save();
        surface.translate(bone.pos + Vec2::splat(2.0));
        surface.rotate(bone.rotation);
        surface.scale(Vec2::splat(BONE_SCALE));
        draw_pixels(surface, sprites, SpriteId::Bone, Vec2::splat(-SPRITE_SIZE / 2.0), SPRITE_SIZE);
        surface.restore();
    }

    if let Some(candy) = &world.candy {
        draw_pickup(surface, sprites, candy);
    }
    // Hearts stay hidden through the intro
    if let Some(heart) = world.heart.as_ref().filter(|_| world.intro.is_complete()) {
        draw_pickup(surface, sprites, heart);
    }
    if let Some(jawbreaker) = &world.jawbreaker {
        draw_pickup(surface, sprites, jawbreaker);
    }

    let player = &world.player;
    if player.is_visible() {
        draw_character(
            surface,
            sprites,
            SpriteId::Player,
            player.pos,
            player.pose(),
            player.facing(),
            player.jump.offset,
        );
    }

    // In front of the player
    if let Some(orbital) = &world.orbital {
        draw_pickup(surface, sprites, &orbital.jawbreaker);
    }

    if world.intro.companions_visible() {
        for (id, companion) in [
            (SpriteId::Princess, &world.intro.princess),
            (SpriteId::Pirate, &world.intro.pirate),
        ] {
            draw_character(
                surface,
                sprites,
                id,
                companion.pos,
                companion.waddle.pose,
                companion.waddle.facing,
                companion.jump.offset,
            );
        }
    }

    for splatter in &world.blood.splatters {
        let at = corner_origin(splatter.corner);
        surface.save();
        surface.set_alpha(splatter.opacity);
        surface.blit(
            corner_image(splatter.corner),
            at.x,
            at.y,
            SCREEN_WIDTH / 2.0 + 16.0,
            SCREEN_HEIGHT / 2.0 + 16.0,
        );
        surface.restore();
    }

    for p in &world.particles.particles {
        surface.fill_rect(p.pos.x, p.pos.y, p.size, p.size, with_alpha(color(p.color), p.alpha()));
    }

    render_ui(world, sprites, surface);
}

fn render_ui(world: &WorldState, sprites: &SpriteSet, surface: &mut dyn RenderSurface) {
    let menu = world.phase == GamePhase::ShowingControls;

    // Title, fading out once the menu is dismissed
    let title_alpha = if menu {
        1.0
    } else {
        (1.0 - world.title_timer / FADE_FRAMES).max(0.0)
    };
    if title_alpha > 0.0 {
        let (w, h) = (SCREEN_WIDTH * 0.5, SCREEN_HEIGHT * 0.25);
        surface.save();
        surface.set_alpha(title_alpha);
        surface.blit(
            OverlayImage::Title,
            (SCREEN_WIDTH - w) / 2.0,
            (SCREEN_HEIGHT - h) / 2.0 - 20.0,
            w,
            h,
        );
        surface.restore();
    }

    if menu {
        if (world.time_ticks / CONTROLS_BLINK) % 2 == 0 {
            let size = SCREEN_WIDTH * 0.3;
            let at = (SCREEN_WIDTH - size) / 2.0;
            surface.blit(OverlayImage::Controls, at, at, size, size);
        }
        if world.score.high_score > 0 {
            let label = format!("HIGH SCORE: {}", world.score.high_score);
            text::draw_text_centered(
                surface,
                &label,
                SCREEN_WIDTH / 2.0,
                SCREEN_HEIGHT - 24.0,
                color(palette::WHITE),
            );
        }
    }

    if world.phase == GamePhase::Paused {
        surface.fill_rect(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT, [0.0, 0.0, 0.0, 0.5]);
        text::draw_text_centered(
            surface,
            "PAUSED",
            SCREEN_WIDTH / 2.0,
            SCREEN_HEIGHT / 2.0 - 3.0,
            color(palette::WHITE),
        );
    }

    if world.is_game_over {
        draw_game_over(surface, sprites, world);
    } else {
        let x = SCREEN_WIDTH / 2.0;
        let y = SCREEN_HEIGHT - 8.0;
        draw_candy_count(
            surface,
            sprites,
            world.score.candy,
            Vec2::new(x + 43.0, y - 2.0),
            Vec2::new(x + 48.0, y - 4.0),
        );
    }
}

/// Loading screen with a progress bar; `progress` is clamped to [0, 1]
pub fn render_loading(progress: f32, surface: &mut dyn RenderSurface) {
    let progress = progress.clamp(0.0, 1.0);
    let white = color(palette::WHITE);
    surface.fill_rect(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT, color(palette::BLACK));

    let cx = SCREEN_WIDTH / 2.0;
    text::draw_text_centered(surface, "LOADING...", cx, SCREEN_HEIGHT / 2.0 - 14.0, white);

    let (bar_w, bar_h) = (80.0, 8.0);
    let x = (SCREEN_WIDTH - bar_w) / 2.0;
    let y = SCREEN_HEIGHT / 2.0;
    // Outline
    surface.fill_rect(x, y, bar_w, 1.0, white);
    surface.fill_rect(x, y + bar_h - 1.0, bar_w, 1.0, white);
    surface.fill_rect(x, y, 1.0, bar_h, white);
    surface.fill_rect(x + bar_w - 1.0, y, 1.0, bar_h, white);

    surface.fill_rect(
        x + 1.0,
        y + 1.0,
        (bar_w - 2.0) * progress,
        bar_h - 2.0,
        color(palette::GREEN),
    );

    let percent = format!("{}%", (progress * 100.0).floor() as u32);
    text::draw_text_centered(surface, &percent, cx, y + bar_h + 4.0, white);
}
