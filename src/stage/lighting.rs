use bevy::prelude::*;
use terrain::render::z_up_to_y_up;

/// Direction the sun shines along, in the heightmap's Z-up frame.
const SUN_DIRECTION_Z_UP: Vec3 = Vec3::new(0.4, 0.6, -1.0);

#[derive(Component)]
pub struct Sun;

pub fn setup_sun_light(mut commands: Commands) {
    commands.spawn((
        Sun,
        DirectionalLight {
            illuminance: 15_000.0,
            shadows_enabled: true,
            ..default()
        },
        sun_transform(),
    ));
}

fn sun_transform() -> Transform {
    Transform::IDENTITY.looking_to(z_up_to_y_up() * SUN_DIRECTION_Z_UP, Vec3::Y)
}
