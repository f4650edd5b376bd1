use glam::Vec3;
use thiserror::Error;

/// Default divisor applied to raw height samples.
pub const DEFAULT_HEIGHT_SCALE: f32 = 15.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidGridError {
    #[error("height grid has no rows")]
    Empty,
    #[error("height grid has no columns")]
    NoColumns,
    #[error("height grid row {row} has {len} columns, expected {expected}")]
    Jagged {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("height scale must be non-zero and finite, got {0}")]
    Scale(f32),
    #[error("height grid {rows}x{cols} has more vertices than u32 indices can address")]
    TooLarge { rows: usize, cols: usize },
}

/// Quad-faced terrain mesh.
///
/// Vertices are stored in row-major grid order, so the vertex for grid cell
/// `(x, y)` lives at flat index `x * cols + y`.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
    pub rows: usize,
    pub cols: usize,
    pub vertices: Vec<[f32; 3]>,
    pub quads: Vec<[u32; 4]>,
}

/// Builds a quad mesh from a rectangular grid of height samples.
///
/// Each sample becomes a vertex at `(row, col, -sample / height_scale)`.
/// Every cell that has a neighbour both below and to the right emits one quad
/// `(a, a + cols, a + cols + 1, a + 1)`. The last row and column emit none.
pub fn build_mesh<R: AsRef<[f32]>>(
    grid: &[R],
    height_scale: f32,
) -> Result<TerrainMesh, InvalidGridError> {
    if height_scale == 0.0 || !height_scale.is_finite() {
        return Err(InvalidGridError::Scale(height_scale));
    }

    let rows = grid.len();
    let Some(first) = grid.first() else {
        return Err(InvalidGridError::Empty);
    };
    let cols = first.as_ref().len();
    if cols == 0 {
        return Err(InvalidGridError::NoColumns);
    }

    for (row, samples) in grid.iter().enumerate() {
        let len = samples.as_ref().len();
        if len != cols {
            return Err(InvalidGridError::Jagged {
                row,
                len,
                expected: cols,
            });
        }
    }

    // Every flat index, including the last, must fit the u32 face indices.
    let vertex_count = rows
        .checked_mul(cols)
        .filter(|&n| u32::try_from(n).is_ok())
        .ok_or(InvalidGridError::TooLarge { rows, cols })?;

    let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut quads: Vec<[u32; 4]> = Vec::with_capacity((rows - 1) * (cols - 1));
    let stride = cols as u32;

    for (x, samples) in grid.iter().enumerate() {
        for (y, &sample) in samples.as_ref().iter().enumerate() {
            let z = sample / height_scale;
            vertices.push([x as f32, y as f32, -z]);

            if x + 1 < rows && y + 1 < cols {
                let a = (x * cols + y) as u32;
                let b = a + stride;
                let c = b + 1;
                let d = a + 1;
                quads.push([a, b, c, d]);
            }
        }
    }

    Ok(TerrainMesh {
        rows,
        cols,
        vertices,
        quads,
    })
}

impl TerrainMesh {
    /// Area-weighted per-vertex normals (smooth shading).
    ///
    /// Vertices not touched by any quad, or whose accumulated normal cancels
    /// out, fall back to `+Z`.
    pub fn smooth_normals(&self) -> Vec<[f32; 3]> {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];

        for quad in &self.quads {
            let [a, b, c, d] = quad.map(|i| Vec3::from_array(self.vertices[i as usize]));
            // Cross of the diagonals: twice the quad's vector area.
            let n = (c - a).cross(d - b);
            for &i in quad {
                acc[i as usize] += n;
            }
        }

        acc.into_iter()
            .map(|n| {
                let n = n.normalize_or_zero();
                if n == Vec3::ZERO {
                    [0.0, 0.0, 1.0]
                } else {
                    n.to_array()
                }
            })
            .collect()
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), v| {
                let v = Vec3::from_array(*v);
                (min.min(v), max.max(v))
            },
        )
    }

    /// Copy of the mesh translated so the centre of its bounds is the origin.
    pub fn recentered(&self) -> TerrainMesh {
        let (min, max) = self.bounds();
        let center = (min + max) * 0.5;

        TerrainMesh {
            rows: self.rows,
            cols: self.cols,
            vertices: self
                .vertices
                .iter()
                .map(|v| (Vec3::from_array(*v) - center).to_array())
                .collect(),
            quads: self.quads.clone(),
        }
    }

    /// Splits every quad `(a, b, c, d)` into `(a, b, c)` and `(a, c, d)`.
    pub fn triangle_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.quads.len() * 6);
        for &[a, b, c, d] in &self.quads {
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
        indices
    }
}
