pub mod availability;
pub mod follow;
pub mod glyphs;
pub mod lifecycle;

use bevy::prelude::*;

use crate::config::TrailSettings;
use availability::{EngineMonitor, poll_engine_availability, start_engine_monitor};
use follow::{fire_pending_moves, sync_glyph_transforms};
use lifecycle::apply_trail_commands;

pub use follow::PointerMoved;
pub use lifecycle::{TrailCommand, TrailSession};

/// Cursor text trail: glyphs that follow the pointer with a per-glyph delay
pub struct TrailPlugin;

impl Plugin for TrailPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrailSettings>()
            .init_resource::<TrailSession>()
            .init_resource::<EngineMonitor>()
            .add_message::<TrailCommand>()
            .add_systems(Startup, start_engine_monitor)
            .add_systems(
                Update,
                (
                    poll_engine_availability,
                    apply_trail_commands,
                    fire_pending_moves,
                    sync_glyph_transforms,
                )
                    .chain(),
            );
    }
}
