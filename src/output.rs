use std::fs;
use std::path::{Path, PathBuf};

use bevy::image::Image;
use image::ImageFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output pattern '{0}' has no '{{}}' placeholder")]
    Pattern(String),
    #[error("output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("captured frame could not be converted: {0}")]
    Convert(String),
    #[error("failed to write render {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// First `dir/pattern` with `{}` replaced by 0, 1, 2, ... that is not an existing file.
pub fn next_output_path(dir: &Path, pattern: &str) -> Result<PathBuf, OutputError> {
    if !pattern.contains("{}") {
        return Err(OutputError::Pattern(pattern.to_string()));
    }

    let mut counter = 0u64;
    loop {
        let candidate = dir.join(pattern.replacen("{}", &counter.to_string(), 1));
        if !candidate.is_file() {
            return Ok(candidate);
        }
        counter += 1;
    }
}

/// Creates `dir` if missing and clears its read-only flag.
pub fn prepare_output_dir(dir: &Path) -> Result<(), OutputError> {
    let io = |source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(io)?;

    let mut perms = fs::metadata(dir).map_err(io)?.permissions();
    if perms.readonly() {
        bevy::log::warn!("output directory {} is read-only, making it writable", dir.display());
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(dir, perms).map_err(io)?;
    }
    Ok(())
}

/// Encodes a captured frame as PNG, whatever the extension of `path`.
pub fn save_png(frame: &Image, path: &Path) -> Result<(), OutputError> {
    let dynamic = frame
        .clone()
        .try_into_dynamic()
        .map_err(|e| OutputError::Convert(e.to_string()))?;
    // Screenshots carry alpha from the swapchain; the render is opaque.
    dynamic
        .to_rgb8()
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| OutputError::Save {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::RenderAssetUsages;
    use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

    fn frame(format: TextureFormat, pixel: &[u8]) -> Image {
        Image::new_fill(
            Extent3d {
                width: 4,
                height: 2,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            pixel,
            format,
            RenderAssetUsages::default(),
        )
    }

    #[test]
    fn starts_at_zero_in_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = next_output_path(dir.path(), "output{}.png").unwrap();
        assert_eq!(path, dir.path().join("output0.png"));
    }

    #[test]
    fn skips_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3 {
            fs::write(dir.path().join(format!("output{i}.png")), b"png").unwrap();
        }
        let path = next_output_path(dir.path(), "output{}.png").unwrap();
        assert_eq!(path, dir.path().join("output3.png"));
    }

    #[test]
    fn gaps_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("output1.png"), b"png").unwrap();
        let path = next_output_path(dir.path(), "output{}.png").unwrap();
        assert_eq!(path, dir.path().join("output0.png"));
    }

    #[test]
    fn directories_do_not_count_as_taken() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("output0.png")).unwrap();
        let path = next_output_path(dir.path(), "output{}.png").unwrap();
        assert_eq!(path, dir.path().join("output0.png"));
    }

    #[test]
    fn pattern_needs_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            next_output_path(dir.path(), "output.png"),
            Err(OutputError::Pattern(_))
        ));
    }

    #[test]
    fn prepare_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("renders/today");
        prepare_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(!fs::metadata(&nested).unwrap().permissions().readonly());
    }

    #[cfg(unix)]
    #[test]
    fn prepare_clears_read_only_flag() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("renders");
        fs::create_dir(&out).unwrap();
        fs::set_permissions(&out, fs::Permissions::from_mode(0o555)).unwrap();
        assert!(fs::metadata(&out).unwrap().permissions().readonly());

        prepare_output_dir(&out).unwrap();
        assert!(!fs::metadata(&out).unwrap().permissions().readonly());
    }

    #[test]
    fn saves_png_and_reads_back_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output0.png");
        save_png(&frame(TextureFormat::Rgba8UnormSrgb, &[10, 20, 30, 255]), &path).unwrap();

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (4, 2));
        assert_eq!(saved.to_rgb8().get_pixel(3, 1).0, [10, 20, 30]);
    }

    #[test]
    fn always_encodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output0");
        save_png(&frame(TextureFormat::Rgba8UnormSrgb, &[0, 0, 0, 255]), &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn unconvertible_frame_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output0.png");
        let err = save_png(&frame(TextureFormat::R32Uint, &[1, 0, 0, 0]), &path).unwrap_err();
        assert!(matches!(err, OutputError::Convert(_)));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_target_is_a_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/output0.png");
        let err = save_png(&frame(TextureFormat::Rgba8UnormSrgb, &[0, 0, 0, 255]), &path)
            .unwrap_err();
        assert!(matches!(err, OutputError::Save { .. }));
    }
}
