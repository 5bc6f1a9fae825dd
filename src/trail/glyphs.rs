use bevy::prelude::*;

use crate::config::TrailSettings;
use crate::tween::Translation2d;

/// Hue rotation between neighbouring glyphs, in degrees
pub const HUE_STEP_DEGREES: f32 = 10.0;

const GLYPH_SATURATION: f32 = 0.85;
const GLYPH_LIGHTNESS: f32 = 0.6;

/// One rendered character of the trail
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GlyphNode {
    /// Position in the trail text, stable for the node's lifetime
    pub index: usize,
    /// Horizontal offset from the pointer, in em
    pub offset_em: f32,
    /// Hue in degrees, 0..360
    pub hue: f32,
}

impl GlyphNode {
    pub fn new(index: usize, spacing: f32) -> Self {
        GlyphNode {
            index,
            offset_em: index as f32 * spacing,
            hue: glyph_hue(index),
        }
    }

    pub fn color(&self) -> Color {
        Color::hsl(self.hue, GLYPH_SATURATION, GLYPH_LIGHTNESS)
    }
}

/// Hue for the glyph at `index`, wrapping every 36 glyphs
pub fn glyph_hue(index: usize) -> f32 {
    (index as f32 * HUE_STEP_DEGREES) % 360.0
}

/// Glyph layout for `text` in index order
pub fn layout(text: &str, spacing: f32) -> Vec<(GlyphNode, char)> {
    text.chars()
        .enumerate()
        .map(|(index, ch)| (GlyphNode::new(index, spacing), ch))
        .collect()
}

/// Spawn one glyph per character of the configured text under `container`.
/// Returns the glyph entities in left-to-right order.
pub fn build_glyphs(
    commands: &mut Commands,
    container: Entity,
    settings: &TrailSettings,
) -> Vec<Entity> {
    layout(settings.text(), settings.spacing())
        .into_iter()
        .map(|(glyph, ch)| {
            commands
                .spawn((
                    Text2d::new(ch.to_string()),
                    TextFont {
                        font_size: settings.font_size,
                        ..default()
                    },
                    TextColor(glyph.color()),
                    glyph,
                    Translation2d::default(),
                    Name::new(format!("Trail Glyph {}", glyph.index)),
                    ChildOf(container),
                ))
                .id()
        })
        .collect()
}
