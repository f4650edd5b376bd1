use bevy::prelude::*;
use bevy::window::WindowResolution;
use terrain::render::z_up_to_y_up;
use terrain::{CameraSpec, ValidatedScene};

#[derive(Component)]
pub struct RenderCamera;

pub fn setup_render_camera(mut commands: Commands) {
    commands.spawn((
        RenderCamera,
        Camera3d::default(),
        camera_transform(&CameraSpec::default()),
    ));
}

/// Moves the camera and sizes the window once the scene description is known.
pub fn apply_scene_view(
    scene: Option<Res<ValidatedScene>>,
    mut cameras: Query<&mut Transform, With<RenderCamera>>,
    mut windows: Query<&mut Window>,
) {
    let Some(scene) = scene else {
        return;
    };
    if !scene.is_added() {
        return;
    }

    for mut transform in &mut cameras {
        *transform = camera_transform(&scene.camera);
    }
    for mut window in &mut windows {
        set_output_size(&mut window.resolution, scene.output.width, scene.output.height);
    }
}

/// Pins the window to exactly `width x height` pixels regardless of display scaling.
pub fn set_output_size(resolution: &mut WindowResolution, width: u32, height: u32) {
    resolution.set_scale_factor_override(Some(1.0));
    resolution.set_physical_resolution(width, height);
}

pub fn camera_transform(spec: &CameraSpec) -> Transform {
    let basis = z_up_to_y_up();
    let (px, py, pz) = spec.position;
    let (tx, ty, tz) = spec.look_at;

    Transform::from_translation(basis * Vec3::new(px, py, pz))
        .looking_at(basis * Vec3::new(tx, ty, tz), Vec3::Y)
}
