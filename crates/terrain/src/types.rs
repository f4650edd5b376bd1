use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::heightmap::HeightmapChannel;
use crate::mesher::DEFAULT_HEIGHT_SCALE;

// --- Config file ---

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SceneConfigFile {
    /// Path relative to the Bevy asset root (the `assets/` folder).
    pub heightmap: String,
    pub channel: HeightmapChannel,
    pub height_scale: f32,
    pub object_name: String,
    pub materials: Vec<MaterialSpec>,
    /// Name of the entry in `materials` applied to the terrain.
    pub material: String,
    pub transform: TransformSpec,
    pub camera: CameraSpec,
    pub output: OutputSpec,
    pub clear_color_srgb: (f32, f32, f32),
}

impl Default for SceneConfigFile {
    fn default() -> Self {
        Self {
            heightmap: "heightmap.png".to_string(),
            channel: HeightmapChannel::Red,
            height_scale: DEFAULT_HEIGHT_SCALE,
            object_name: "Terrain".to_string(),
            materials: vec![MaterialSpec::default()],
            material: "AutoMaterial".to_string(),
            transform: TransformSpec::default(),
            camera: CameraSpec::default(),
            output: OutputSpec::default(),
            clear_color_srgb: (0.05, 0.05, 0.08),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MaterialSpec {
    pub name: String,
    pub color_srgb: (f32, f32, f32),
    pub perceptual_roughness: f32,
    pub metallic: f32,
}

impl Default for MaterialSpec {
    fn default() -> Self {
        Self {
            name: "AutoMaterial".to_string(),
            color_srgb: (0.8, 0.8, 0.8),
            perceptual_roughness: 1.0,
            metallic: 0.0,
        }
    }
}

/// Object transform in the heightmap's Z-up frame.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TransformSpec {
    pub location: (f32, f32, f32),
    /// Euler XYZ, radians.
    pub rotation: (f32, f32, f32),
    pub scale: (f32, f32, f32),
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            location: (0.0, 0.0, 0.0),
            rotation: (0.0, 0.0, 0.0),
            scale: (0.05, 0.05, 0.31),
        }
    }
}

/// Render viewpoint, Z-up like [`TransformSpec`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraSpec {
    pub position: (f32, f32, f32),
    pub look_at: (f32, f32, f32),
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            position: (0.0, -30.0, 25.0),
            look_at: (0.0, 0.0, 0.0),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    pub directory: PathBuf,
    /// File name with a single `{}` replaced by the render counter.
    pub pattern: String,
    pub width: u32,
    pub height: u32,
    /// Frames rendered before the capture is taken.
    pub warmup_frames: u32,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("renders"),
            pattern: "output{}.png".to_string(),
            width: 1280,
            height: 720,
            warmup_frames: 3,
        }
    }
}

// --- Validation ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u16);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("terrain material '{0}' is not defined in materials")]
    UnknownMaterial(String),
    #[error("material '{0}' is defined more than once")]
    DuplicateMaterial(String),
    #[error("height scale must be non-zero and finite, got {0}")]
    HeightScale(f32),
    #[error("output pattern '{0}' must contain a '{{}}' placeholder")]
    OutputPattern(String),
    #[error("output pattern '{0}' must end in .png, renders are always written as PNG")]
    OutputFormat(String),
}

/// Scene description with name references resolved.
#[derive(Resource, Clone, Debug)]
pub struct ValidatedScene {
    pub heightmap: String,
    pub channel: HeightmapChannel,
    pub height_scale: f32,
    pub object_name: String,
    pub materials: Vec<MaterialSpec>,
    pub material: MaterialId,
    pub transform: TransformSpec,
    pub camera: CameraSpec,
    pub output: OutputSpec,
    pub clear_color_srgb: (f32, f32, f32),
}

impl SceneConfigFile {
    pub fn validate(self) -> Result<ValidatedScene, ConfigError> {
        if self.height_scale == 0.0 || !self.height_scale.is_finite() {
            return Err(ConfigError::HeightScale(self.height_scale));
        }
        if !self.output.pattern.contains("{}") {
            return Err(ConfigError::OutputPattern(self.output.pattern));
        }
        if !self.output.pattern.to_ascii_lowercase().ends_with(".png") {
            return Err(ConfigError::OutputFormat(self.output.pattern));
        }

        let mut ids: HashMap<&str, MaterialId> = HashMap::new();
        for (i, m) in self.materials.iter().enumerate() {
            if ids.insert(m.name.as_str(), MaterialId(i as u16)).is_some() {
                return Err(ConfigError::DuplicateMaterial(m.name.clone()));
            }
        }
        let material = ids
            .get(self.material.as_str())
            .copied()
            .ok_or_else(|| ConfigError::UnknownMaterial(self.material.clone()))?;

        Ok(ValidatedScene {
            heightmap: self.heightmap,
            channel: self.channel,
            height_scale: self.height_scale,
            object_name: self.object_name,
            materials: self.materials,
            material,
            transform: self.transform,
            camera: self.camera,
            output: self.output,
            clear_color_srgb: self.clear_color_srgb,
        })
    }
}

impl ValidatedScene {
    pub fn material_spec(&self, id: MaterialId) -> &MaterialSpec {
        // Ids are only minted by `validate`, against this same list.
        &self.materials[id.0 as usize]
    }

    pub fn clear_color(&self) -> Color {
        let (r, g, b) = self.clear_color_srgb;
        Color::srgb(r, g, b)
    }
}

// --- Resources ---

/// Progress of the terrain object through loading and spawning.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TerrainState {
    #[default]
    LoadingConfig,
    LoadingHeightmap,
    Spawned(Entity),
    Failed,
}

#[derive(Resource)]
pub struct TerrainMaterials {
    pub handles: Vec<Handle<StandardMaterial>>,
}

impl TerrainMaterials {
    pub fn get(&self, id: MaterialId) -> Option<&Handle<StandardMaterial>> {
        self.handles.get(id.0 as usize)
    }
}
