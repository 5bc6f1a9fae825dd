use bevy::prelude::*;

mod camera;
mod config;
mod controls;
mod input;
mod trail;
mod tween;

use bevy::log::{Level, LogPlugin};
use camera::CameraPlugin;
use config::{DEFAULT_SETTINGS_PATH, TrailSettings};
use controls::{ControlsPlugin, EffectState, SettingsPath};
use input::InputPlugin;
use std::path::PathBuf;
use std::time::Duration;
use trail::TrailPlugin;
use tween::TweenPlugin;

fn main() {
    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

    // Logging is not up yet, so report straight to stderr
    let settings = TrailSettings::load(&settings_path).unwrap_or_else(|err| {
        eprintln!("{} ({}), using defaults", err, settings_path.display());
        TrailSettings::default()
    });

    let log_level = if settings.debug_mode {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let engine = &settings.tween_engine;
    let tween_plugin = TweenPlugin {
        load_delay: engine
            .enabled
            .then(|| Duration::try_from_secs_f32(engine.load_delay).unwrap_or_default()),
        duration: Duration::try_from_secs_f32(engine.duration).unwrap_or_default(),
    };

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Cursor Trail".into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                level: log_level,
                ..default()
            }),
    )
    .insert_resource(EffectState::new(settings.is_active))
    .insert_resource(SettingsPath(settings_path))
    .insert_resource(settings)
    .add_plugins(CameraPlugin)
    .add_plugins(InputPlugin)
    .add_plugins(tween_plugin)
    .add_plugins(TrailPlugin)
    .add_plugins(ControlsPlugin);

    app.run();
}
