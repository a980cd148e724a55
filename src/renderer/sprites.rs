//! Decoded sprite pixel records
//!
//! Sprites arrive as a JSON manifest mapping a sprite name to a list of
//! opaque pixels: `{"player": [{"x": 3, "y": 0, "color": "#FFF1E8"}, ...]}`.
//! A sprite that fails to decode is dropped with a warning and later drawn
//! as a placeholder box; only a malformed manifest is an error.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;

use crate::palette;

/// Largest accepted sprite edge in pixels
pub const MAX_SPRITE_EDGE: u16 = 256;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("malformed sprite manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("unrecognised color {0:?}")]
    BadColor(String),
    #[error("pixel ({x}, {y}) outside the {max}x{max} sprite limit")]
    PixelOutOfBounds { x: u16, y: u16, max: u16 },
    #[error("sprite has no visible pixels")]
    Empty,
}

/// One pixel as stored in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PixelRecord {
    pub x: u16,
    pub y: u16,
    pub color: String,
}

/// Sprites drawn for world entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Zombie,
    Skeleton,
    Princess,
    Pirate,
    Bone,
    Pumpkin,
    SmashedPumpkin,
    Street,
    Candy,
    Heart,
    Jawbreaker,
    Bush,
}

impl SpriteId {
    pub const ALL: [SpriteId; 13] = [
        SpriteId::Player,
        SpriteId::Zombie,
        SpriteId::Skeleton,
        SpriteId::Princess,
        SpriteId::Pirate,
        SpriteId::Bone,
        SpriteId::Pumpkin,
        SpriteId::SmashedPumpkin,
        SpriteId::Street,
        SpriteId::Candy,
        SpriteId::Heart,
        SpriteId::Jawbreaker,
        SpriteId::Bush,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SpriteId::Player => "player",
            SpriteId::Zombie => "zombie",
            SpriteId::Skeleton => "skeleton",
            SpriteId::Princess => "princess",
            SpriteId::Pirate => "pirate",
            SpriteId::Bone => "bone",
            SpriteId::Pumpkin => "pumpkin",
            SpriteId::SmashedPumpkin => "smashedPumpkin",
            SpriteId::Street => "street",
            SpriteId::Candy => "candy",
            SpriteId::Heart => "heart",
            SpriteId::Jawbreaker => "jawbreaker",
            SpriteId::Bush => "bush",
        }
    }

    /// Solid color used when the sprite is missing
    pub fn placeholder(self) -> u8 {
        match self {
            SpriteId::Player => palette::BLUE,
            SpriteId::Zombie => palette::GREEN,
            SpriteId::Skeleton => palette::WHITE,
            SpriteId::Princess => palette::PINK,
            SpriteId::Pirate => palette::BROWN,
            SpriteId::Bone => palette::PEACH,
            SpriteId::Pumpkin => palette::ORANGE,
            SpriteId::SmashedPumpkin => palette::BROWN,
            SpriteId::Street => palette::DARK_GRAY,
            SpriteId::Candy => palette::YELLOW,
            SpriteId::Heart => palette::RED,
            SpriteId::Jawbreaker => palette::INDIGO,
            SpriteId::Bush => palette::DARK_GREEN,
        }
    }
}

/// Full-size images drawn over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayImage {
    BloodTopLeft,
    BloodTopRight,
    BloodBottomLeft,
    BloodBottomRight,
    Controls,
    Title,
}

impl OverlayImage {
    pub const ALL: [OverlayImage; 6] = [
        OverlayImage::BloodTopLeft,
        OverlayImage::BloodTopRight,
        OverlayImage::BloodBottomLeft,
        OverlayImage::BloodBottomRight,
        OverlayImage::Controls,
        OverlayImage::Title,
    ];

    pub fn key(self) -> &'static str {
        match self {
            OverlayImage::BloodTopLeft => "bloodTopLeft",
            OverlayImage::BloodTopRight => "bloodTopRight",
            OverlayImage::BloodBottomLeft => "bloodBottomLeft",
            OverlayImage::BloodBottomRight => "bloodBottomRight",
            OverlayImage::Controls => "controls",
            OverlayImage::Title => "title",
        }
    }

    /// Fill used when the image is missing; text-like overlays are skipped
    pub fn placeholder(self) -> Option<u8> {
        match self {
            OverlayImage::BloodTopLeft
            | OverlayImage::BloodTopRight
            | OverlayImage::BloodBottomLeft
            | OverlayImage::BloodBottomRight => Some(palette::RED),
            OverlayImage::Controls | OverlayImage::Title => None,
        }
    }
}

/// A decoded pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpritePixel {
    pub x: f32,
    pub y: f32,
    pub color: [f32; 4],
}

/// Opaque pixels of one image plus its bounding size
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub pixels: Vec<SpritePixel>,
    pub width: f32,
    pub height: f32,
}

impl Sprite {
    /// Decode manifest records. Fully transparent pixels are dropped.
    pub fn from_records(records: &[PixelRecord]) -> Result<Self, AssetError> {
        let mut pixels = Vec::with_capacity(records.len());
        let (mut width, mut height) = (0u16, 0u16);

        for record in records {
            if record.x >= MAX_SPRITE_EDGE || record.y >= MAX_SPRITE_EDGE {
                return Err(AssetError::PixelOutOfBounds {
                    x: record.x,
                    y: record.y,
                    max: MAX_SPRITE_EDGE,
                });
            }
            let color = parse_color(&record.color)?;
            if color[3] <= 0.0 {
                continue;
            }
            width = width.max(record.x + 1);
            height = height.max(record.y + 1);
            pixels.push(SpritePixel {
                x: record.x as f32,
                y: record.y as f32,
                color,
            });
        }

        if pixels.is_empty() {
            return Err(AssetError::Empty);
        }
        Ok(Self {
            pixels,
            width: width as f32,
            height: height as f32,
        })
    }
}

/// Parse a CSS-style color: `#RGB`, `#RRGGBB`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` or `transparent`.
pub fn parse_color(text: &str) -> Result<[f32; 4], AssetError> {
    let bad = || AssetError::BadColor(text.to_owned());
    let s = text.trim();

    if s.eq_ignore_ascii_case("transparent") {
        return Ok([0.0; 4]);
    }

    if let Some(hex) = s.strip_prefix('#') {
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_owned(),
            _ => return Err(bad()),
        };
        let value = u32::from_str_radix(&expanded, 16).map_err(|_| bad())?;
        return Ok([
            ((value >> 16) & 0xFF) as f32 / 255.0,
            ((value >> 8) & 0xFF) as f32 / 255.0,
            (value & 0xFF) as f32 / 255.0,
            1.0,
        ]);
    }

    let (body, with_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
        (rest, true)
    } else if let Some(rest) = s.strip_prefix("rgb(") {
        (rest, false)
    } else {
        return Err(bad());
    };
    let body = body.strip_suffix(')').ok_or_else(bad)?;
    let parts: Vec<f32> = body
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|_| bad())?;

    match (parts.as_slice(), with_alpha) {
        ([r, g, b], false) => Ok([channel(*r), channel(*g), channel(*b), 1.0]),
        ([r, g, b, a], true) => Ok([channel(*r), channel(*g), channel(*b), a.clamp(0.0, 1.0)]),
        _ => Err(bad()),
    }
}

#[inline]
fn channel(value: f32) -> f32 {
    value.clamp(0.0, 255.0) / 255.0
}

/// Every sprite and overlay that decoded successfully
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    sprites: HashMap<SpriteId, Sprite>,
    overlays: HashMap<OverlayImage, Sprite>,
}

impl SpriteSet {
    /// Empty set; everything draws as a placeholder
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a whole manifest. Unknown names and broken sprites are
    /// skipped with a warning.
    pub fn from_manifest_json(json: &str) -> Result<Self, AssetError> {
        let manifest: BTreeMap<String, Vec<PixelRecord>> = serde_json::from_str(json)?;
        let mut set = Self::new();

        for (name, records) in &manifest {
            let sprite_id = SpriteId::ALL.into_iter().find(|id| id.key() == name);
            let overlay_id = OverlayImage::ALL.into_iter().find(|id| id.key() == name);
            if sprite_id.is_none() && overlay_id.is_none() {
                log::warn!("Unknown sprite {:?} in manifest", name);
                continue;
            }

            let sprite = match Sprite::from_records(records) {
                Ok(sprite) => sprite,
                Err(e) => {
                    log::warn!("Sprite {:?} unusable, using placeholder: {}", name, e);
                    continue;
                }
            };

            if let Some(id) = sprite_id {
                set.sprites.insert(id, sprite);
            } else if let Some(id) = overlay_id {
                set.overlays.insert(id, sprite);
            }
        }

        log::info!(
            "Decoded {} sprites and {} overlays",
            set.sprites.len(),
            set.overlays.len()
        );
        Ok(set)
    }

    pub fn insert(&mut self, id: SpriteId, sprite: Sprite) {
        self.sprites.insert(id, sprite);
    }

    pub fn insert_overlay(&mut self, id: OverlayImage, sprite: Sprite) {
        self.overlays.insert(id, sprite);
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn overlay(&self, id: OverlayImage) -> Option<&Sprite> {
        self.overlays.get(&id)
    }

    /// Sprite ids the manifest did not provide
    pub fn missing(&self) -> Vec<SpriteId> {
        SpriteId::ALL
            .into_iter()
            .filter(|id| !self.sprites.contains_key(id))
            .collect()
    }
}
