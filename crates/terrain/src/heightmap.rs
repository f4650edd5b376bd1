use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::Deserialize;
use thiserror::Error;

/// Image channel read as the height sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum HeightmapChannel {
    #[default]
    Red,
    Green,
    Blue,
    Alpha,
}

impl HeightmapChannel {
    fn index(self) -> usize {
        match self {
            HeightmapChannel::Red => 0,
            HeightmapChannel::Green => 1,
            HeightmapChannel::Blue => 2,
            HeightmapChannel::Alpha => 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum HeightmapError {
    #[error("failed to decode heightmap {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("heightmap image could not be converted: {0}")]
    Convert(String),
}

/// Decodes an image file and extracts one channel as a height grid.
pub fn load_height_grid(
    path: impl AsRef<Path>,
    channel: HeightmapChannel,
) -> Result<Vec<Vec<f32>>, HeightmapError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| HeightmapError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(height_grid_from_image(&img, channel))
}

/// Row `r` of the grid is pixel row `r`; samples are raw 8-bit channel values.
pub fn height_grid_from_image(img: &DynamicImage, channel: HeightmapChannel) -> Vec<Vec<f32>> {
    let rgba = img.to_rgba8();
    let c = channel.index();

    rgba.rows()
        .map(|row| row.map(|p| p.0[c] as f32).collect())
        .collect()
}

/// Same as [`height_grid_from_image`] for an image already held by Bevy.
pub fn height_grid_from_bevy_image(
    img: &bevy::image::Image,
    channel: HeightmapChannel,
) -> Result<Vec<Vec<f32>>, HeightmapError> {
    let dynamic = img
        .clone()
        .try_into_dynamic()
        .map_err(|e| HeightmapError::Convert(e.to_string()))?;
    Ok(height_grid_from_image(&dynamic, channel))
}
