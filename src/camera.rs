use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera);
    }
}

#[derive(Component)]
pub struct MainCamera;

/// Setup a 2D camera centered on the origin
///
/// One world unit is one logical pixel, +Y is up. Window coordinates
/// (top-left origin, +Y down) go through `window_to_world`.
fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera, Name::new("Main Camera")));
}

/// Convert window (logical) coords to world space using a camera
pub fn window_to_world(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    position: Vec2,
) -> Option<Vec2> {
    camera
        .viewport_to_world_2d(camera_transform, position)
        .ok()
}
