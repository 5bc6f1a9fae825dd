use bevy::prelude::*;
use std::time::Duration;

use crate::{
    camera::{MainCamera, window_to_world},
    config::TrailSettings,
    trail::{availability::EngineMonitor, glyphs::GlyphNode, lifecycle::TrailSession},
    tween::{Translation2d, TweenEngine},
};

/// Pointer moved, in window pixels with a top-left origin
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerMoved {
    pub position: Vec2,
}

/// How a single pointer move gets animated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowStrategy {
    /// One staggered request to the tween engine
    Tween,
    /// One delayed snap per glyph
    Fallback,
}

/// Decided fresh on every move: the engine can show up mid-session
pub fn choose_strategy(monitor: &EngineMonitor, engine_present: bool) -> FollowStrategy {
    if monitor.is_resolved() && engine_present {
        FollowStrategy::Tween
    } else {
        FollowStrategy::Fallback
    }
}

/// Fallback delay before glyph `index` jumps to the pointer
pub fn fallback_delay(index: usize, trail_speed: f32) -> Duration {
    let millis = (index as f32 * trail_speed * 1000.0).round();
    Duration::from_millis(millis.max(0.0) as u64)
}

/// A deferred, one-shot move of one glyph.
///
/// Never cancelled: a later pointer move schedules its own batch, and
/// under fast movement batches can interleave. The glyph may be gone by
/// the time this fires.
#[derive(Component, Debug)]
pub struct PendingMove {
    pub glyph: Entity,
    pub to: Vec2,
    /// `Time::elapsed` at which the move fires
    pub due: Duration,
}

/// Observer: the single pointer-move listener registered while the trail is enabled
pub fn follow_pointer(
    moved: On<PointerMoved>,
    mut commands: Commands,
    time: Res<Time>,
    session: Res<TrailSession>,
    settings: Res<TrailSettings>,
    monitor: Res<EngineMonitor>,
    engine: Option<ResMut<TweenEngine>>,
) {
    let glyphs = session.glyphs();
    let position = moved.position;
    let speed = settings.speed();

    match (choose_strategy(&monitor, engine.is_some()), engine) {
        (FollowStrategy::Tween, Some(mut engine)) => {
            engine.to(glyphs, position, speed);
        }
        _ => {
            for (i, &glyph) in glyphs.iter().enumerate() {
                commands.spawn(PendingMove {
                    glyph,
                    to: position,
                    due: time.elapsed() + fallback_delay(i, speed),
                });
            }
        }
    }
}

/// System: Fire pending fallback moves whose delay has elapsed
pub fn fire_pending_moves(
    time: Res<Time>,
    mut commands: Commands,
    pending: Query<(Entity, &PendingMove)>,
    mut glyphs: Query<&mut Translation2d, With<GlyphNode>>,
) {
    let now = time.elapsed();

    for (entity, pending_move) in &pending {
        if now < pending_move.due {
            continue;
        }

        // Silently skip glyphs despawned by disable/update
        if let Ok(mut translation) = glyphs.get_mut(pending_move.glyph) {
            translation.0 = pending_move.to;
        }
        commands.entity(entity).despawn();
    }
}

/// World position of a glyph: pointer position plus its em offset to the right
pub fn glyph_world_position(pointer_world: Vec2, glyph: &GlyphNode, font_size: f32) -> Vec2 {
    pointer_world + Vec2::new(glyph.offset_em * font_size, 0.0)
}

/// System: Project glyph translations into world transforms.
/// `Text2d` is center-anchored, so each glyph is centered on its point.
pub fn sync_glyph_transforms(
    settings: Res<TrailSettings>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut glyphs: Query<(&GlyphNode, &Translation2d, &mut Transform), Changed<Translation2d>>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    for (glyph, translation, mut transform) in &mut glyphs {
        let Some(pointer_world) = window_to_world(camera, camera_transform, translation.0) else {
            continue;
        };
        let world = glyph_world_position(pointer_world, glyph, settings.font_size);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_delays_scale_with_index() {
        assert_eq!(fallback_delay(0, 0.05), Duration::ZERO);
        assert_eq!(fallback_delay(1, 0.05), Duration::from_millis(50));
        assert_eq!(fallback_delay(2, 0.05), Duration::from_millis(100));
        assert_eq!(fallback_delay(10, 0.2), Duration::from_millis(2000));
    }

    #[test]
    fn test_strategy_needs_resolved_monitor_and_engine() {
        let mut monitor = EngineMonitor::default();
        assert_eq!(choose_strategy(&monitor, true), FollowStrategy::Fallback);

        monitor.start(false);
        assert_eq!(choose_strategy(&monitor, false), FollowStrategy::Fallback);
        // Engine appeared but the next poll has not run yet
        assert_eq!(choose_strategy(&monitor, true), FollowStrategy::Fallback);

        monitor.observe(true);
        assert_eq!(choose_strategy(&monitor, true), FollowStrategy::Tween);
        assert_eq!(choose_strategy(&monitor, false), FollowStrategy::Fallback);
    }

    #[test]
    fn test_glyph_world_position_offsets_right() {
        let glyph = GlyphNode::new(3, 0.5);
        let pos = glyph_world_position(Vec2::new(10.0, -20.0), &glyph, 32.0);
        assert_eq!(pos, Vec2::new(10.0 + 1.5 * 32.0, -20.0));
    }
}
