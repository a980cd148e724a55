//! Tiny 3x5 pixel font for HUD text
//!
//! Only the glyphs the HUD needs are defined; anything else renders as a
//! blank cell.

use glam::Vec2;

use super::RenderSurface;

pub const GLYPH_WIDTH: f32 = 3.0;
pub const GLYPH_HEIGHT: f32 = 5.0;
/// Horizontal advance per character
pub const ADVANCE: f32 = 4.0;

/// Five rows, three bits each (0b100 is the leftmost column)
fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b011],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        _ => return None,
    };
    Some(rows)
}

/// Width of a string in logical pixels
pub fn text_width(text: &str) -> f32 {
    let count = text.chars().count() as f32;
    if count == 0.0 {
        0.0
    } else {
        count * ADVANCE - 1.0
    }
}

/// Draw `text` with its top-left corner at `origin`
pub fn draw_text(surface: &mut dyn RenderSurface, text: &str, origin: Vec2, rgba: [f32; 4]) {
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let x0 = origin.x + i as f32 * ADVANCE;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    surface.fill_rect(x0 + col as f32, origin.y + row as f32, 1.0, 1.0, rgba);
                }
            }
        }
    }
}

/// Draw `text` horizontally centered on `center_x`
pub fn draw_text_centered(
    surface: &mut dyn RenderSurface,
    text: &str,
    center_x: f32,
    top: f32,
    rgba: [f32; 4],
) {
    let x = (center_x - text_width(text) / 2.0).floor();
    draw_text(surface, text, Vec2::new(x, top), rgba);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::QuadBatch;

    #[test]
    fn test_digit_pixel_counts() {
        let mut batch = QuadBatch::new();
        draw_text(&mut batch, "1", Vec2::ZERO, [1.0; 4]);
        assert_eq!(batch.quad_count(), 8);

        batch.clear();
        draw_text(&mut batch, "8", Vec2::ZERO, [1.0; 4]);
        assert_eq!(batch.quad_count(), 13);
    }

    #[test]
    fn test_unknown_glyphs_are_blank() {
        let mut batch = QuadBatch::new();
        draw_text(&mut batch, "~ ", Vec2::ZERO, [1.0; 4]);
        assert_eq!(batch.quad_count(), 0);
        assert_eq!(text_width("~ "), 7.0);
        assert_eq!(text_width(""), 0.0);
    }
}
