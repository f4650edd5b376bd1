use bevy::prelude::*;
use std::env;

mod inspect;
mod output;
mod stage;

use stage::StagePlugin;

const DEFAULT_SCENE: &str = "terrain.scene.ron";

fn main() -> AppExit {
    // Usage:
    //   heightfield-render [scene.ron relative to assets/]
    //   heightfield-render --inspect <image> [height scale]
    let args: Vec<String> = env::args().collect();
    if args.get(1).map(String::as_str) == Some("--inspect") {
        return inspect::run(&args[2..]);
    }

    let scene_path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_SCENE.to_string());

    App::new()
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 30.0,
            affects_lightmapped_meshes: false,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "heightfield-render".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(StagePlugin { scene_path })
        .run()
}
