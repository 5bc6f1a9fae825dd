// trail/lifecycle.rs

use bevy::prelude::*;

use crate::{
    config::TrailSettings,
    trail::{availability::EngineMonitor, follow::follow_pointer, glyphs::build_glyphs},
    tween::TweenEngine,
};

/// Control calls for the trail. Writing the same command twice is harmless.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailCommand {
    Enable,
    Disable,
    /// Rebuild glyphs from the current settings
    UpdateText,
}

/// Marks the floating entity that parents every glyph
#[derive(Component, Debug)]
pub struct TrailContainer;

/// Marks the pointer-move observer owned by the trail
#[derive(Component, Debug)]
pub struct TrailListener;

/// Live resources of an enabled trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTrail {
    container: Entity,
    glyphs: Vec<Entity>,
    listener: Entity,
}

/// The trail session - at most one active trail at a time
#[derive(Resource, Debug, Default)]
pub struct TrailSession {
    active: Option<ActiveTrail>,
}

impl TrailSession {
    // === Query Methods ===

    pub fn is_enabled(&self) -> bool {
        self.active.is_some()
    }

    pub fn container(&self) -> Option<Entity> {
        self.active.as_ref().map(|trail| trail.container)
    }

    pub fn listener(&self) -> Option<Entity> {
        self.active.as_ref().map(|trail| trail.listener)
    }

    /// Glyph entities in index order (empty while disabled)
    pub fn glyphs(&self) -> &[Entity] {
        self.active
            .as_ref()
            .map(|trail| trail.glyphs.as_slice())
            .unwrap_or(&[])
    }

    // === Transitions ===

    /// Spawn the container and glyphs and register the pointer listener.
    /// Returns false when already enabled.
    pub fn enable(
        &mut self,
        commands: &mut Commands,
        settings: &TrailSettings,
        monitor: &mut EngineMonitor,
        engine_present: bool,
    ) -> bool {
        if self.is_enabled() {
            return false;
        }

        let container = commands
            .spawn((
                TrailContainer,
                Transform::default(),
                Visibility::default(),
                Name::new("Cursor Trail"),
            ))
            .id();
        let glyphs = build_glyphs(commands, container, settings);
        let listener = commands
            .add_observer(follow_pointer)
            .insert((TrailListener, Name::new("Cursor Trail Listener")))
            .id();

        monitor.start(engine_present);

        self.active = Some(ActiveTrail {
            container,
            glyphs,
            listener,
        });
        true
    }

    /// Unregister the listener, despawn container and glyphs, halt polling.
    /// Returns false when already disabled.
    pub fn disable(&mut self, commands: &mut Commands, monitor: &mut EngineMonitor) -> bool {
        let Some(trail) = self.active.take() else {
            return false;
        };

        commands.entity(trail.listener).despawn();
        // Recursive: takes the glyphs with it
        commands.entity(trail.container).despawn();
        monitor.stop();
        true
    }

    /// Replace the glyphs using the settings as they are right now.
    /// Container and listener are kept. Returns false when disabled.
    pub fn update_text(&mut self, commands: &mut Commands, settings: &TrailSettings) -> bool {
        let Some(trail) = self.active.as_mut() else {
            return false;
        };

        for glyph in trail.glyphs.drain(..) {
            commands.entity(glyph).despawn();
        }
        trail.glyphs = build_glyphs(commands, trail.container, settings);
        true
    }
}

/// System: Apply queued trail commands in order
pub fn apply_trail_commands(
    mut trail_commands: MessageReader<TrailCommand>,
    mut commands: Commands,
    mut session: ResMut<TrailSession>,
    mut monitor: ResMut<EngineMonitor>,
    settings: Res<TrailSettings>,
    engine: Option<Res<TweenEngine>>,
) {
    for command in trail_commands.read() {
        match command {
            TrailCommand::Enable => {
                if session.enable(&mut commands, &settings, &mut monitor, engine.is_some()) {
                    info!(
                        "Cursor trail enabled: {:?} ({} glyphs)",
                        settings.text(),
                        session.glyphs().len()
                    );
                }
            }
            TrailCommand::Disable => {
                if session.disable(&mut commands, &mut monitor) {
                    info!("Cursor trail disabled");
                }
            }
            TrailCommand::UpdateText => {
                if session.update_text(&mut commands, &settings) {
                    info!(
                        "Cursor trail text updated: {:?} ({} glyphs)",
                        settings.text(),
                        session.glyphs().len()
                    );
                } else {
                    debug!("Ignoring trail text update while disabled");
                }
            }
        }
    }
}
