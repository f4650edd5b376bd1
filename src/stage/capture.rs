use std::path::PathBuf;

use bevy::prelude::*;
use bevy::render::view::screenshot::{Screenshot, ScreenshotCaptured};
use terrain::{TerrainState, ValidatedScene};

use crate::output::{next_output_path, prepare_output_dir, save_png};

#[derive(Resource, Default, Debug)]
pub struct CaptureJob {
    frames_waited: u32,
    output: Option<PathBuf>,
    exiting: bool,
}

/// Takes one screenshot of the primary window once the terrain has been on
/// screen for the configured number of frames.
pub fn request_capture(
    mut commands: Commands,
    state: Res<TerrainState>,
    scene: Option<Res<ValidatedScene>>,
    mut job: ResMut<CaptureJob>,
    mut exit: MessageWriter<AppExit>,
) {
    if job.exiting || job.output.is_some() {
        return;
    }

    match *state {
        TerrainState::Spawned(_) => {}
        TerrainState::Failed => {
            job.exiting = true;
            exit.write(AppExit::error());
            return;
        }
        TerrainState::LoadingConfig | TerrainState::LoadingHeightmap => return,
    }

    let Some(scene) = scene else {
        return;
    };

    if job.frames_waited < scene.output.warmup_frames {
        job.frames_waited += 1;
        return;
    }

    let dir = &scene.output.directory;
    let path = match prepare_output_dir(dir)
        .and_then(|()| next_output_path(dir, &scene.output.pattern))
    {
        Ok(path) => path,
        Err(e) => {
            error!("{e}");
            job.exiting = true;
            exit.write(AppExit::error());
            return;
        }
    };

    info!("rendering to {}", path.display());
    job.output = Some(path);

    commands
        .spawn(Screenshot::primary_window())
        .observe(finish_capture);
}

fn finish_capture(
    captured: On<ScreenshotCaptured>,
    mut job: ResMut<CaptureJob>,
    mut exit: MessageWriter<AppExit>,
) {
    job.exiting = true;
    let Some(path) = job.output.clone() else {
        error!("screenshot captured without an output path");
        exit.write(AppExit::error());
        return;
    };

    match save_png(&captured.image, &path) {
        Ok(()) => {
            info!("saved render {}", path.display());
            exit.write(AppExit::Success);
        }
        Err(e) => {
            error!("{e}");
            exit.write(AppExit::error());
        }
    }
}
