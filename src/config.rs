// config.rs

use bevy::prelude::Resource;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Shown when the configured trail text is empty
pub const DEFAULT_TRAIL_TEXT: &str = "animate text trail effect";

pub const DEFAULT_CHARACTER_SPACING: f32 = 0.6;
pub const DEFAULT_TRAIL_SPEED: f32 = 0.05;

/// Where the binary looks for settings when no path is passed on the command line
pub const DEFAULT_SETTINGS_PATH: &str = "assets/trail_settings.json";

const SPACING_RANGE: (f32, f32) = (0.3, 2.0);
const SPACING_STEP: f32 = 0.1;
const SPEED_RANGE: (f32, f32) = (0.01, 0.2);
const SPEED_STEP: f32 = 0.01;

/// Live trail settings. Systems read this every time they build glyphs or
/// handle a pointer move, so edits take effect without restarting.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrailSettings {
    pub cursor_trail_text: String,
    /// Horizontal distance between glyphs, in em
    pub character_spacing: f32,
    /// Delay between consecutive glyphs, in seconds
    pub trail_speed: f32,
    pub enable_cursor_trail: bool,
    /// Whether the effect is switched on at startup
    pub is_active: bool,
    /// Pixels per em
    pub font_size: f32,
    pub debug_mode: bool,
    pub tween_engine: TweenEngineSettings,
}

/// How (and whether) the optional tween engine gets loaded
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TweenEngineSettings {
    pub enabled: bool,
    /// Seconds after startup before the engine becomes available
    pub load_delay: f32,
    /// Duration of a single glyph tween, in seconds
    pub duration: f32,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            cursor_trail_text: "trail".to_string(),
            character_spacing: DEFAULT_CHARACTER_SPACING,
            trail_speed: DEFAULT_TRAIL_SPEED,
            enable_cursor_trail: true,
            is_active: false,
            font_size: 32.0,
            debug_mode: false,
            tween_engine: TweenEngineSettings::default(),
        }
    }
}

impl Default for TweenEngineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            load_delay: 0.0,
            duration: 0.5,
        }
    }
}

impl TrailSettings {
    /// Parse settings from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    // === Effective values (what the trail actually uses) ===

    /// Trail text, falling back to the default phrase when empty
    pub fn text(&self) -> &str {
        if self.cursor_trail_text.is_empty() {
            DEFAULT_TRAIL_TEXT
        } else {
            &self.cursor_trail_text
        }
    }

    pub fn spacing(&self) -> f32 {
        positive_or(self.character_spacing, DEFAULT_CHARACTER_SPACING)
    }

    pub fn speed(&self) -> f32 {
        positive_or(self.trail_speed, DEFAULT_TRAIL_SPEED)
    }

    // === Adjustments (mirrors the slider limits of the settings panel) ===

    /// Nudge the character spacing by whole steps, clamped to 0.3..=2.0 em
    pub fn adjust_spacing(&mut self, steps: i32) {
        self.character_spacing = step_clamped(self.spacing(), steps, SPACING_STEP, SPACING_RANGE);
        log::debug!("character spacing set to {:.1}em", self.character_spacing);
    }

    /// Nudge the trail speed by whole steps, clamped to 0.01..=0.2 s
    pub fn adjust_speed(&mut self, steps: i32) {
        self.trail_speed = step_clamped(self.speed(), steps, SPEED_STEP, SPEED_RANGE);
        log::debug!("trail speed set to {:.2}s", self.trail_speed);
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Move `value` by `steps` increments, snapping to the step grid
fn step_clamped(value: f32, steps: i32, step: f32, (min, max): (f32, f32)) -> f32 {
    let snapped = ((value / step).round() + steps as f32) * step;
    let clamped = snapped.clamp(min, max);
    // Trim float noise so 0.7000001 reads back as 0.7
    (clamped / step).round() * step
}

/// Error types for settings loading
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "Could not read settings: {}", err),
            SettingsError::Parse(err) => write!(f, "Invalid settings JSON: {}", err),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_falls_back_to_default_phrase() {
        let settings = TrailSettings {
            cursor_trail_text: String::new(),
            ..Default::default()
        };
        assert_eq!(settings.text(), DEFAULT_TRAIL_TEXT);

        let settings = TrailSettings::default();
        assert_eq!(settings.text(), "trail");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let settings = TrailSettings {
            character_spacing: 0.0,
            trail_speed: -1.0,
            ..Default::default()
        };
        assert_eq!(settings.spacing(), DEFAULT_CHARACTER_SPACING);
        assert_eq!(settings.speed(), DEFAULT_TRAIL_SPEED);

        let settings = TrailSettings {
            character_spacing: f32::NAN,
            trail_speed: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(settings.spacing(), DEFAULT_CHARACTER_SPACING);
        assert_eq!(settings.speed(), DEFAULT_TRAIL_SPEED);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = TrailSettings::from_json(
            r#"{ "cursorTrailText": "hello", "trailSpeed": 0.1, "tweenEngine": { "loadDelay": 2.0 } }"#,
        )
        .unwrap();

        assert_eq!(settings.text(), "hello");
        assert_eq!(settings.speed(), 0.1);
        assert_eq!(settings.spacing(), DEFAULT_CHARACTER_SPACING);
        assert!(settings.enable_cursor_trail);
        assert!(settings.tween_engine.enabled);
        assert_eq!(settings.tween_engine.load_delay, 2.0);
        assert_eq!(settings.tween_engine.duration, 0.5);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = TrailSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("Invalid settings JSON"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TrailSettings::load("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_adjust_spacing_clamps() {
        let mut settings = TrailSettings::default();
        settings.adjust_spacing(1);
        assert!((settings.character_spacing - 0.7).abs() < 1e-5);

        settings.adjust_spacing(-10);
        assert!((settings.character_spacing - 0.3).abs() < 1e-5);

        settings.adjust_spacing(100);
        assert!((settings.character_spacing - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_adjust_speed_clamps() {
        let mut settings = TrailSettings::default();
        settings.adjust_speed(2);
        assert!((settings.trail_speed - 0.07).abs() < 1e-5);

        settings.adjust_speed(-100);
        assert!((settings.trail_speed - 0.01).abs() < 1e-5);

        settings.adjust_speed(100);
        assert!((settings.trail_speed - 0.2).abs() < 1e-5);
    }
}
