pub mod camera;
pub mod capture;
pub mod lighting;

use bevy::prelude::*;

use terrain as terrain_crate;

/// Camera, light and the one-shot capture around the terrain object.
pub struct StagePlugin {
    pub scene_path: String,
}

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<capture::CaptureJob>()
            .add_plugins(terrain_crate::TerrainPlugin {
                scene_path: self.scene_path.clone(),
            })
            .add_systems(
                Startup,
                (camera::setup_render_camera, lighting::setup_sun_light).chain(),
            )
            .add_systems(
                Update,
                (camera::apply_scene_view, capture::request_capture)
                    .chain()
                    .after(terrain_crate::render::spawn_terrain),
            );
    }
}
