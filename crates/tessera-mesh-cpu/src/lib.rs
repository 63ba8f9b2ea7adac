//! CPU meshing for terrain patches: seam-consistent triangle grids.
#![forbid(unsafe_code)]

mod build;
mod mesh_build;
mod patch;

pub use build::{build_patch_mesh, build_patch_mesh_into};
pub use mesh_build::MeshBuild;
pub use patch::PatchMeshCPU;

/// World units to texture units; the terrain texture repeats every ~7.7 samples.
pub const DEFAULT_UV_SCALE: f32 = 1e-2 * 13.0;

/// Largest patch edge whose vertex grid still fits 16-bit indices.
pub const MAX_PATCH_SIZE: usize = 254;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshParams {
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub uv_scale: f32,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            spacing_x: 1.0,
            spacing_y: 1.0,
            uv_scale: DEFAULT_UV_SCALE,
        }
    }
}
