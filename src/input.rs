use bevy::prelude::*;
use bevy::window::CursorMoved;

use crate::trail::PointerMoved;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, forward_cursor_moves);
    }
}

/// Re-emit every window cursor move as a `PointerMoved` trigger.
/// Only observers registered at that moment see it.
fn forward_cursor_moves(mut ev_cursor: MessageReader<CursorMoved>, mut commands: Commands) {
    for e in ev_cursor.read() {
        // top-left origin, logical pixels
        commands.trigger(PointerMoved {
            position: e.position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Seen(Vec<Vec2>);

    #[test]
    fn test_cursor_moves_become_pointer_triggers() {
        let mut app = App::new();
        app.add_message::<CursorMoved>()
            .init_resource::<Seen>()
            .add_plugins(InputPlugin);
        app.world_mut()
            .add_observer(|moved: On<PointerMoved>, mut seen: ResMut<Seen>| {
                seen.0.push(moved.position);
            });

        let window = app.world_mut().spawn_empty().id();
        for position in [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)] {
            app.world_mut().write_message(CursorMoved {
                window,
                position,
                delta: None,
            });
        }
        app.update();

        assert_eq!(
            app.world().resource::<Seen>().0,
            vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]
        );
    }
}
