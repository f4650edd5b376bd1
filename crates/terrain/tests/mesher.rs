use terrain::{InvalidGridError, build_mesh};

fn ramp(rows: usize, cols: usize) -> Vec<Vec<f32>> {
    (0..rows)
        .map(|r| (0..cols).map(|c| ((r * 7 + c * 3) % 256) as f32).collect())
        .collect()
}

#[test]
fn face_indices_follow_fixed_winding() {
    for (rows, cols) in [(2, 2), (3, 7), (8, 4), (16, 16)] {
        let mesh = build_mesh(&ramp(rows, cols), 15.0).unwrap();
        let total = (rows * cols) as u32;

        for &[a, b, c, d] in &mesh.quads {
            assert_eq!(b, a + cols as u32);
            assert_eq!(c, b + 1);
            assert_eq!(d, a + 1);
            assert!([a, b, c, d].iter().all(|&i| i < total));
        }
    }
}

#[test]
fn vertex_positions_follow_flat_index() {
    let (rows, cols) = (5, 9);
    let grid = ramp(rows, cols);
    let mesh = build_mesh(&grid, 15.0).unwrap();

    for x in 0..rows {
        for y in 0..cols {
            let [vx, vy, vz] = mesh.vertices[x * cols + y];
            assert_eq!(vx, x as f32);
            assert_eq!(vy, y as f32);
            assert!((vz + grid[x][y] / 15.0).abs() < 1e-6);
        }
    }
}

#[test]
fn quads_skip_last_row_and_column() {
    let mesh = build_mesh(&ramp(4, 3), 15.0).unwrap();
    let cols = 3u32;
    let last_row_start = 3 * cols;

    for &[a, ..] in &mesh.quads {
        assert!(a < last_row_start);
        assert_ne!(a % cols, cols - 1);
    }
}

#[test]
fn fractional_heights_use_float_division() {
    let mesh = build_mesh(&[[1.0f32, 2.0]], 15.0).unwrap();
    assert!((mesh.vertices[0][2] + 1.0 / 15.0).abs() < 1e-7);
    assert!((mesh.vertices[1][2] + 2.0 / 15.0).abs() < 1e-7);
}

#[test]
fn jagged_grid_reports_offending_row() {
    let grid = vec![vec![0.0f32; 3], vec![0.0; 3], vec![0.0; 4]];
    assert_eq!(
        build_mesh(&grid, 15.0),
        Err(InvalidGridError::Jagged {
            row: 2,
            len: 4,
            expected: 3
        })
    );
}
