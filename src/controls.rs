use bevy::prelude::*;
use std::path::PathBuf;

use crate::{config::TrailSettings, trail::TrailCommand};

/// Keyboard stand-ins for the host's toggle command and settings panel
pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EffectState>()
            .add_systems(Startup, apply_startup_state)
            .add_systems(Update, handle_control_keys);
    }
}

/// Whether the overall effect is switched on
#[derive(Resource, Debug, Default)]
pub struct EffectState {
    pub active: bool,
}

impl EffectState {
    pub fn new(active: bool) -> Self {
        Self { active }
    }

    /// Trail is shown only while the effect is on and the trail is enabled
    pub fn trail_visible(&self, settings: &TrailSettings) -> bool {
        self.active && settings.enable_cursor_trail
    }

    /// Command that brings the trail in line with the current state
    pub fn trail_command(&self, settings: &TrailSettings) -> TrailCommand {
        if self.trail_visible(settings) {
            TrailCommand::Enable
        } else {
            TrailCommand::Disable
        }
    }
}

/// File the `R` key reloads settings from
#[derive(Resource, Debug, Clone)]
pub struct SettingsPath(pub PathBuf);

fn apply_startup_state(
    state: Res<EffectState>,
    settings: Res<TrailSettings>,
    mut out: MessageWriter<TrailCommand>,
) {
    if state.trail_visible(&settings) {
        out.write(TrailCommand::Enable);
    }
}

/// System: Map keys to effect toggles and live setting changes
///
/// T toggle effect, C toggle trail, =/- spacing, ]/[ speed, R reload
fn handle_control_keys(
    keys: Res<ButtonInput<KeyCode>>,
    path: Option<Res<SettingsPath>>,
    mut state: ResMut<EffectState>,
    mut settings: ResMut<TrailSettings>,
    mut out: MessageWriter<TrailCommand>,
) {
    if keys.just_pressed(KeyCode::KeyT) {
        state.active = !state.active;
        info!("Effect {}", if state.active { "on" } else { "off" });
        out.write(state.trail_command(&settings));
    }

    if keys.just_pressed(KeyCode::KeyC) {
        settings.enable_cursor_trail = !settings.enable_cursor_trail;
        info!("Cursor trail setting: {}", settings.enable_cursor_trail);
        if state.active {
            out.write(state.trail_command(&settings));
        }
    }

    let spacing_steps = keys.just_pressed(KeyCode::Equal) as i32
        - keys.just_pressed(KeyCode::Minus) as i32;
    if spacing_steps != 0 {
        settings.adjust_spacing(spacing_steps);
        if state.trail_visible(&settings) {
            out.write(TrailCommand::UpdateText);
        }
    }

    // Speed is read on every pointer move, no rebuild needed
    let speed_steps = keys.just_pressed(KeyCode::BracketRight) as i32
        - keys.just_pressed(KeyCode::BracketLeft) as i32;
    if speed_steps != 0 {
        settings.adjust_speed(speed_steps);
    }

    if keys.just_pressed(KeyCode::KeyR) {
        let Some(path) = path else {
            warn!("No settings file to reload");
            return;
        };
        match TrailSettings::load(&path.0) {
            Ok(loaded) => {
                *settings = loaded;
                info!("Reloaded settings from {}", path.0.display());
                out.write(state.trail_command(&settings));
                if state.trail_visible(&settings) {
                    out.write(TrailCommand::UpdateText);
                }
            }
            Err(err) => warn!("{}", err),
        }
    }
}
