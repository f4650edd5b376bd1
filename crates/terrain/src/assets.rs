use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;

use crate::types::{SceneConfigFile, ValidatedScene};

#[derive(Asset, TypePath, Debug, Clone)]
pub struct SceneConfigAsset(pub ValidatedScene);

#[derive(Default)]
pub struct SceneConfigAssetLoader;

impl AssetLoader for SceneConfigAssetLoader {
    type Asset = SceneConfigAsset;
    type Settings = ();
    type Error = String;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| format!("failed to read asset bytes: {e}"))?;

        let text = std::str::from_utf8(&bytes)
            .map_err(|e| format!("scene config asset was not valid utf-8: {e}"))?;

        let parsed: SceneConfigFile =
            ron::from_str(text).map_err(|e| format!("failed to parse scene config ron: {e}"))?;

        let scene = parsed
            .validate()
            .map_err(|e| format!("invalid scene config: {e}"))?;

        Ok(SceneConfigAsset(scene))
    }

    fn extensions(&self) -> &[&str] {
        &["scene.ron"]
    }
}
