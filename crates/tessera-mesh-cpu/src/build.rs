use tessera_geom::{Aabb, Vec3};
use tessera_grid::{PatchCoord, TerrainGrid};

use crate::{MAX_PATCH_SIZE, MeshParams, PatchMeshCPU};

/// Builds the mesh for `coord` into a fresh buffer.
pub fn build_patch_mesh(grid: &TerrainGrid, coord: PatchCoord, params: &MeshParams) -> PatchMeshCPU {
    let mut out = PatchMeshCPU::new(coord);
    build_patch_mesh_into(grid, coord, params, &mut out);
    out
}

/// Clears `out` and rebuilds it as the mesh of patch `coord`.
///
/// The vertex grid is `patch_size + 1` wide so the far edge meets the next
/// patch; on the last column or row of the grid there is no next patch and
/// that edge is dropped. Far-edge samples, normals and texture coordinates
/// come from the neighbour that owns them, so shared vertices are identical.
///
/// # Panics
///
/// If the grid's patch size exceeds [`MAX_PATCH_SIZE`], whose vertex grid
/// would not fit 16-bit indices.
pub fn build_patch_mesh_into(
    grid: &TerrainGrid,
    coord: PatchCoord,
    params: &MeshParams,
    out: &mut PatchMeshCPU,
) {
    let dims = grid.dims();
    let ps = dims.patch_size;
    assert!(ps <= MAX_PATCH_SIZE, "patch size {ps} overflows u16 indices");
    let last = dims.patches_per_edge - 1;
    let cols = if coord.x == last { ps } else { ps + 1 };
    let rows = if coord.y == last { ps } else { ps + 1 };
    let first = (coord.x * ps, coord.y * ps);

    out.coord = coord;
    out.cols = cols;
    out.rows = rows;
    out.first_sample = first;
    out.spacing = (params.spacing_x, params.spacing_y);
    out.origin = Vec3::new(
        first.0 as f32 * params.spacing_x,
        first.1 as f32 * params.spacing_y,
        0.0,
    );
    out.build.clear_keep_capacity();
    out.build.reserve_grid(cols, rows);

    let mut bbox = Aabb::EMPTY;
    for y in 0..rows {
        let (owner_y, in_y) = if y == ps { (coord.y + 1, 0) } else { (coord.y, y) };
        for x in 0..cols {
            let (owner_x, in_x) = if x == ps { (coord.x + 1, 0) } else { (coord.x, x) };
            let owner = grid.patch(PatchCoord::new(owner_x, owner_y));
            let height = owner.height_local(in_x, in_y, ps);

            let pos = Vec3::new(
                x as f32 * params.spacing_x,
                y as f32 * params.spacing_y,
                height,
            );
            let normal = grid.calculate_normal(owner_x, owner_y, in_x, in_y);
            let uv = (
                (first.0 + x) as f32 * params.spacing_x * params.uv_scale,
                (first.1 + y) as f32 * params.spacing_y * params.uv_scale,
            );
            out.build.push_vertex(pos, normal, uv);
            bbox.include(pos);
        }
    }
    out.bbox = bbox;

    let stride = cols as u16;
    for y in 0..rows - 1 {
        for x in 0..cols - 1 {
            out.build.push_grid_quad((y * cols + x) as u16, stride);
        }
    }
}
