use bevy::app::AppExit;
use terrain::{DEFAULT_HEIGHT_SCALE, HeightmapChannel, TerrainMesh, build_mesh, load_height_grid};

/// Builds the mesh for a heightmap file without opening a window and prints
/// its statistics.
pub fn run(args: &[String]) -> AppExit {
    let Some(path) = args.first() else {
        eprintln!("Usage: heightfield-render --inspect <image> [height scale]");
        return AppExit::error();
    };

    let height_scale = match args.get(1) {
        Some(raw) => match raw.parse::<f32>() {
            Ok(scale) => scale,
            Err(e) => {
                eprintln!("invalid height scale '{raw}': {e}");
                return AppExit::error();
            }
        },
        None => DEFAULT_HEIGHT_SCALE,
    };

    match inspect(path, height_scale) {
        Ok(report) => {
            println!("{report}");
            AppExit::Success
        }
        Err(e) => {
            eprintln!("{e}");
            AppExit::error()
        }
    }
}

fn inspect(path: &str, height_scale: f32) -> Result<String, String> {
    let grid = load_height_grid(path, HeightmapChannel::Red).map_err(|e| e.to_string())?;
    let mesh = build_mesh(&grid, height_scale).map_err(|e| format!("{path}: {e}"))?;
    Ok(summary(path, &mesh))
}

fn summary(path: &str, mesh: &TerrainMesh) -> String {
    let (min, max) = mesh.bounds();
    format!(
        "{path}: {}x{} grid, {} vertices, {} quads, z in [{:.3}, {:.3}]",
        mesh.rows,
        mesh.cols,
        mesh.vertices.len(),
        mesh.quads.len(),
        min.z,
        max.z
    )
}
