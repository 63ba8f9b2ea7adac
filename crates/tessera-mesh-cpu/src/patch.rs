use tessera_geom::{Aabb, Vec3};
use tessera_grid::PatchCoord;

use crate::mesh_build::MeshBuild;

/// Geometry of one patch, positions relative to `origin`.
#[derive(Clone, Debug, Default)]
pub struct PatchMeshCPU {
    pub coord: PatchCoord,
    pub origin: Vec3,
    pub bbox: Aabb,
    pub build: MeshBuild,
    pub(crate) cols: usize,
    pub(crate) rows: usize,
    pub(crate) first_sample: (usize, usize),
    pub(crate) spacing: (f32, f32),
}

impl PatchMeshCPU {
    pub fn new(coord: PatchCoord) -> Self {
        Self {
            coord,
            ..Self::default()
        }
    }

    /// Vertex grid width and height.
    #[inline]
    pub fn grid_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.build.vertex_count()
    }

    /// Index of the vertex at grid position (`x`, `y`), if the mesh has one.
    pub fn vertex_index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.cols && y < self.rows).then(|| y * self.cols + x)
    }

    /// World-space position of vertex `i`. Derived from the global sample
    /// index, so a vertex shared by two patches resolves to the same bits.
    pub fn world_position(&self, i: usize) -> Vec3 {
        let gx = self.first_sample.0 + i % self.cols;
        let gy = self.first_sample.1 + i / self.cols;
        Vec3::new(
            gx as f32 * self.spacing.0,
            gy as f32 * self.spacing.1,
            self.build.pos[i * 3 + 2],
        )
    }
}
