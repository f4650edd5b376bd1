pub mod assets;
pub mod heightmap;
pub mod mesher;
pub mod render;
pub mod scene;
pub mod types;

pub use heightmap::*;
pub use mesher::*;
pub use scene::SceneObjects;
pub use types::*;

use bevy::prelude::*;

pub struct TerrainPlugin {
    /// Scene description, relative to the asset root.
    pub scene_path: String,
}

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(render::SceneConfigPath(self.scene_path.clone()))
            .init_resource::<SceneObjects>()
            .init_resource::<TerrainState>()
            .init_asset::<assets::SceneConfigAsset>()
            .init_asset_loader::<assets::SceneConfigAssetLoader>()
            .add_systems(Startup, render::setup_terrain_renderer)
            .add_systems(
                Update,
                (render::finish_scene_config_load, render::spawn_terrain).chain(),
            );
    }
}
