use std::f32::consts::FRAC_PI_2;

use bevy::asset::{LoadState, RenderAssetUsages};
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use glam::Vec3;

use crate::assets::SceneConfigAsset;
use crate::heightmap::height_grid_from_bevy_image;
use crate::mesher::{TerrainMesh, build_mesh};
use crate::scene::SceneObjects;
use crate::types::{TerrainMaterials, TerrainState, TransformSpec, ValidatedScene};

#[derive(Component)]
pub struct Terrain;

/// Asset path of the scene description to load at startup.
#[derive(Resource, Clone, Debug)]
pub struct SceneConfigPath(pub String);

#[derive(Resource, Clone)]
pub struct SceneConfigHandle(pub Handle<SceneConfigAsset>);

#[derive(Resource, Clone)]
pub struct HeightmapHandle(pub Handle<Image>);

pub fn setup_terrain_renderer(
    mut commands: Commands,
    path: Res<SceneConfigPath>,
    asset_server: Res<AssetServer>,
) {
    commands.insert_resource(TerrainState::LoadingConfig);

    let handle: Handle<SceneConfigAsset> = asset_server.load(path.0.clone());
    commands.insert_resource(SceneConfigHandle(handle));
}

pub fn finish_scene_config_load(
    mut commands: Commands,
    handle: Option<Res<SceneConfigHandle>>,
    configs: Res<Assets<SceneConfigAsset>>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut state: ResMut<TerrainState>,
) {
    let Some(handle) = handle else {
        return;
    };

    let Some(asset) = configs.get(&handle.0) else {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.0.id()) {
            error!("failed to load scene config: {err}");
            commands.remove_resource::<SceneConfigHandle>();
            *state = TerrainState::Failed;
        }
        return;
    };
    let scene = asset.0.clone();

    commands.remove_resource::<SceneConfigHandle>();

    let handles = scene
        .materials
        .iter()
        .map(|m| {
            let (r, g, b) = m.color_srgb;
            materials.add(StandardMaterial {
                base_color: Color::srgb(r, g, b),
                perceptual_roughness: m.perceptual_roughness,
                metallic: m.metallic,
                ..default()
            })
        })
        .collect();
    commands.insert_resource(TerrainMaterials { handles });

    let heightmap: Handle<Image> = asset_server.load(scene.heightmap.clone());
    commands.insert_resource(HeightmapHandle(heightmap));
    commands.insert_resource(ClearColor(scene.clear_color()));
    commands.insert_resource(scene);

    *state = TerrainState::LoadingHeightmap;
}

#[allow(clippy::too_many_arguments)]
pub fn spawn_terrain(
    mut commands: Commands,
    handle: Option<Res<HeightmapHandle>>,
    images: Res<Assets<Image>>,
    asset_server: Res<AssetServer>,
    scene: Option<Res<ValidatedScene>>,
    terrain_materials: Option<Res<TerrainMaterials>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut objects: ResMut<SceneObjects>,
    mut state: ResMut<TerrainState>,
) {
    let (Some(handle), Some(scene), Some(terrain_materials)) = (handle, scene, terrain_materials)
    else {
        return;
    };

    let Some(image) = images.get(&handle.0) else {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.0.id()) {
            error!("failed to load heightmap '{}': {err}", scene.heightmap);
            commands.remove_resource::<HeightmapHandle>();
            *state = TerrainState::Failed;
        }
        return;
    };

    commands.remove_resource::<HeightmapHandle>();

    let terrain = match build_terrain_mesh(image, &scene) {
        Ok(terrain) => terrain,
        Err(e) => {
            error!("{e}");
            *state = TerrainState::Failed;
            return;
        }
    };

    info!(
        rows = terrain.rows,
        cols = terrain.cols,
        vertices = terrain.vertices.len(),
        quads = terrain.quads.len(),
        "built terrain mesh"
    );

    let Some(material) = terrain_materials.get(scene.material) else {
        error!("terrain material {:?} was never created", scene.material);
        *state = TerrainState::Failed;
        return;
    };

    let mesh_handle = meshes.add(mesh_from_terrain_mesh(&terrain));
    let entity = commands
        .spawn((
            Terrain,
            Name::new(scene.object_name.clone()),
            Mesh3d(mesh_handle),
            MeshMaterial3d(material.clone()),
            terrain_transform(&scene.transform),
        ))
        .id();
    objects.replace(&mut commands, &scene.object_name, entity);

    *state = TerrainState::Spawned(entity);
}

fn build_terrain_mesh(image: &Image, scene: &ValidatedScene) -> Result<TerrainMesh, String> {
    let grid = height_grid_from_bevy_image(image, scene.channel).map_err(|e| e.to_string())?;
    let mesh = build_mesh(&grid, scene.height_scale)
        .map_err(|e| format!("invalid heightmap '{}': {e}", scene.heightmap))?;
    Ok(mesh.recentered())
}

/// Rotation taking the heightmap's Z-up frame into Bevy's Y-up frame.
pub fn z_up_to_y_up() -> Quat {
    Quat::from_rotation_x(-FRAC_PI_2)
}

/// Location and rotation are given in the Z-up frame; scale is object-local.
pub fn terrain_transform(spec: &TransformSpec) -> Transform {
    let basis = z_up_to_y_up();
    let (lx, ly, lz) = spec.location;
    let (rx, ry, rz) = spec.rotation;
    let (sx, sy, sz) = spec.scale;

    Transform {
        translation: basis * Vec3::new(lx, ly, lz),
        rotation: basis * Quat::from_euler(EulerRot::XYZEx, rx, ry, rz),
        scale: Vec3::new(sx, sy, sz),
    }
}

pub fn mesh_from_terrain_mesh(terrain: &TerrainMesh) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, terrain.vertices.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, terrain.smooth_normals());
    mesh.insert_indices(Indices::U32(terrain.triangle_indices()));
    mesh
}
