//! Persistent tiled heightfield: a fixed square of fixed-size patches.
#![forbid(unsafe_code)]

mod patch;

pub use patch::{MeshHandle, Patch, PatchCoord};

use tessera_codec::DecodedPatch;
use tessera_geom::Vec3;

pub const DEFAULT_PATCHES_PER_EDGE: usize = 16;
pub const DEFAULT_PATCH_SIZE: usize = 16;
pub const DEFAULT_HEIGHT_CHANGE_EPSILON: f32 = 1e-3;

/// Synthetic up component of an unnormalized normal; slopes are weighed against it.
const NORMAL_UP: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    pub patches_per_edge: usize,
    pub patch_size: usize,
}

impl Default for GridDims {
    fn default() -> Self {
        Self {
            patches_per_edge: DEFAULT_PATCHES_PER_EDGE,
            patch_size: DEFAULT_PATCH_SIZE,
        }
    }
}

impl GridDims {
    #[inline]
    pub const fn new(patches_per_edge: usize, patch_size: usize) -> Self {
        Self {
            patches_per_edge,
            patch_size,
        }
    }

    /// Samples along one edge of the whole grid.
    #[inline]
    pub const fn edge_samples(&self) -> usize {
        self.patches_per_edge * self.patch_size
    }

    #[inline]
    pub const fn samples_per_patch(&self) -> usize {
        self.patch_size * self.patch_size
    }

    #[inline]
    pub const fn patch_count(&self) -> usize {
        self.patches_per_edge * self.patches_per_edge
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.patches_per_edge && y < self.patches_per_edge
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    OutOfRangeCoordinate {
        x: usize,
        y: usize,
        patches_per_edge: usize,
    },
    SizeMismatch {
        expected: usize,
        got: usize,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::OutOfRangeCoordinate {
                x,
                y,
                patches_per_edge,
            } => write!(
                f,
                "patch ({}, {}) outside {}x{} grid",
                x, y, patches_per_edge, patches_per_edge
            ),
            GridError::SizeMismatch { expected, got } => {
                write!(f, "patch has {} height samples, expected {}", got, expected)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// What an applied patch did to the stored heights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeightChange {
    /// First data ever received for this patch.
    Initial,
    /// At least one sample moved by more than the change epsilon.
    Changed,
    /// Samples moved, but none by more than the change epsilon.
    WithinEpsilon,
    /// Bit-identical to the stored data.
    Identical,
}

#[derive(Clone, Debug)]
pub struct TerrainGrid {
    dims: GridDims,
    patches: Vec<Patch>,
    height_change_epsilon: f32,
}

impl TerrainGrid {
    /// Every patch exists from construction: unloaded, flat at zero.
    pub fn new(dims: GridDims) -> Self {
        let mut patches = Vec::with_capacity(dims.patch_count());
        for y in 0..dims.patches_per_edge {
            for x in 0..dims.patches_per_edge {
                patches.push(Patch::new(PatchCoord::new(x, y), dims.samples_per_patch()));
            }
        }
        Self {
            dims,
            patches,
            height_change_epsilon: DEFAULT_HEIGHT_CHANGE_EPSILON,
        }
    }

    pub fn with_height_change_epsilon(mut self, eps: f32) -> Self {
        self.height_change_epsilon = eps;
        self
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.dims.patches_per_edge + x
    }

    /// Panics when `coord` is outside the grid; callers pass validated coordinates.
    pub fn patch(&self, coord: PatchCoord) -> &Patch {
        assert!(
            self.dims.contains(coord.x, coord.y),
            "patch {:?} outside {}x{} grid",
            coord,
            self.dims.patches_per_edge,
            self.dims.patches_per_edge
        );
        &self.patches[self.idx(coord.x, coord.y)]
    }

    /// Panics when `coord` is outside the grid; callers pass validated coordinates.
    pub fn patch_mut(&mut self, coord: PatchCoord) -> &mut Patch {
        assert!(
            self.dims.contains(coord.x, coord.y),
            "patch {:?} outside {}x{} grid",
            coord,
            self.dims.patches_per_edge,
            self.dims.patches_per_edge
        );
        let i = self.idx(coord.x, coord.y);
        &mut self.patches[i]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&Patch> {
        if self.dims.contains(x, y) {
            Some(&self.patches[self.idx(x, y)])
        } else {
            None
        }
    }

    pub fn patches(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter()
    }

    /// Stores the decoded heights wholesale and marks the patch loaded.
    ///
    /// Last writer wins: nothing orders updates against each other. The
    /// patch is marked dirty. Unless the new data is bit-identical to what is
    /// stored, its eight neighbours are marked dirty too, since their seam
    /// vertices and normals read these samples.
    pub fn apply_patch(&mut self, decoded: &DecodedPatch) -> Result<HeightChange, GridError> {
        let (x, y) = (decoded.x() as usize, decoded.y() as usize);
        if !self.dims.contains(x, y) {
            return Err(GridError::OutOfRangeCoordinate {
                x,
                y,
                patches_per_edge: self.dims.patches_per_edge,
            });
        }
        let expected = self.dims.samples_per_patch();
        if decoded.height_data.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                got: decoded.height_data.len(),
            });
        }
        let coord = PatchCoord::new(x, y);
        let eps = self.height_change_epsilon;
        let patch = self.patch_mut(coord);
        let change = if !patch.is_loaded() {
            HeightChange::Initial
        } else if patch
            .heights()
            .iter()
            .zip(&decoded.height_data)
            .all(|(old, new)| old.to_bits() == new.to_bits())
        {
            HeightChange::Identical
        } else if patch
            .heights()
            .iter()
            .zip(&decoded.height_data)
            .any(|(old, new)| (old - new).abs() > eps)
        {
            HeightChange::Changed
        } else {
            HeightChange::WithinEpsilon
        };
        patch.set_dirty(true);
        if change == HeightChange::Identical {
            return Ok(change);
        }
        patch.replace_heights(&decoded.height_data);
        // Neighbours read our edge samples, so any stored change reaches their meshes.
        self.mark_dirty_around(coord);
        Ok(change)
    }

    /// Sets every sample of a patch to `height` and loads it.
    pub fn make_patch_flat(&mut self, coord: PatchCoord, height: f32) {
        let n = self.dims.samples_per_patch();
        let patch = self.patch_mut(coord);
        patch.fill(height, n);
        self.mark_dirty_around(coord);
    }

    /// Marks every patch dirty, loaded or not.
    pub fn dirty_all(&mut self) {
        for patch in &mut self.patches {
            patch.set_dirty(true);
        }
    }

    /// Marks `coord` and its in-grid 8-neighbours dirty.
    pub fn mark_dirty_around(&mut self, coord: PatchCoord) {
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let nx = coord.x as i32 + dx;
                let ny = coord.y as i32 + dy;
                if nx < 0 || ny < 0 || !self.dims.contains(nx as usize, ny as usize) {
                    continue;
                }
                let i = self.idx(nx as usize, ny as usize);
                self.patches[i].set_dirty(true);
            }
        }
    }

    /// Loaded patches waiting for a geometry rebuild, in grid scan order.
    pub fn dirty_loaded(&self) -> Vec<PatchCoord> {
        self.patches
            .iter()
            .filter(|p| p.is_dirty() && p.is_loaded())
            .map(|p| p.coord())
            .collect()
    }

    /// True when every in-grid 8-neighbour of `coord` has received data.
    pub fn neighbors_loaded(&self, coord: PatchCoord) -> bool {
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = coord.x as i32 + dx;
                let ny = coord.y as i32 + dy;
                if nx < 0 || ny < 0 {
                    continue;
                }
                if let Some(p) = self.get(nx as usize, ny as usize) {
                    if !p.is_loaded() {
                        return false;
                    }
                }
            }
        }
        true
    }

    pub fn all_patches_loaded(&self) -> bool {
        self.patches.iter().all(|p| p.is_loaded())
    }

    pub fn loaded_count(&self) -> usize {
        self.patches.iter().filter(|p| p.is_loaded()).count()
    }

    /// Mesh handle for the patch, created on first request.
    pub fn ensure_mesh_handle(&mut self, coord: PatchCoord) -> MeshHandle {
        let handle = MeshHandle::new(self.idx(coord.x, coord.y) as u32);
        let patch = self.patch_mut(coord);
        *patch.mesh_handle_slot().get_or_insert(handle)
    }

    /// Height at a global sample position, clamped into the grid.
    pub fn height_at(&self, gx: i32, gy: i32) -> f32 {
        let last = self.dims.edge_samples() as i32 - 1;
        let x = gx.clamp(0, last) as usize;
        let y = gy.clamp(0, last) as usize;
        let ps = self.dims.patch_size;
        self.patches[self.idx(x / ps, y / ps)].height_local(x % ps, y % ps, ps)
    }

    /// Central-difference normal at sample (`x_inside`, `y_inside`) of patch
    /// (`patch_x`, `patch_y`). On the low outer edge of the grid the one-sided
    /// difference is doubled to stand in for the missing neighbour.
    pub fn calculate_normal(
        &self,
        patch_x: usize,
        patch_y: usize,
        x_inside: usize,
        y_inside: usize,
    ) -> Vec3 {
        let ps = self.dims.patch_size as i32;
        let edge = self.dims.edge_samples() as i32;
        let px = patch_x as i32 * ps + x_inside as i32;
        let py = patch_y as i32 * ps + y_inside as i32;

        let x_next = (px + 1).clamp(0, edge - 1);
        let y_next = (py + 1).clamp(0, edge - 1);
        let x_prev = (px - 1).clamp(0, edge - 1);
        let y_prev = (py - 1).clamp(0, edge - 1);

        let mut x_slope = self.height_at(x_prev, py) - self.height_at(x_next, py);
        if px <= 0 || px >= edge {
            x_slope *= 2.0;
        }
        let mut y_slope = self.height_at(px, y_prev) - self.height_at(px, y_next);
        if py <= 0 || py >= edge {
            y_slope *= 2.0;
        }
        Vec3::new(x_slope, y_slope, NORMAL_UP).normalized()
    }

    /// Height at a fractional global position, interpolated over the same
    /// triangle split the mesh uses (diagonal from (x+1, y) to (x, y+1)).
    pub fn interpolated_height_at(&self, x: f32, y: f32) -> f32 {
        let last = (self.dims.edge_samples() - 1) as f32;
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, last) };
        let y = if y.is_nan() { 0.0 } else { y.clamp(0.0, last) };
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let h10 = self.height_at(x0 + 1, y0);
        let h01 = self.height_at(x0, y0 + 1);
        if fx + fy >= 1.0 {
            let h11 = self.height_at(x0 + 1, y0 + 1);
            h11 * (fx + fy - 1.0) + h10 * (1.0 - fy) + h01 * (1.0 - fx)
        } else {
            let h00 = self.height_at(x0, y0);
            h00 * (1.0 - fx - fy) + h10 * fx + h01 * fy
        }
    }

    /// Lowest and highest sample in the grid; `None` until every patch is
    /// loaded.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        if !self.all_patches_loaded() {
            return None;
        }
        self.patches
            .iter()
            .flat_map(|p| p.heights().iter().copied())
            .fold(None, |range, h| match range {
                None => Some((h, h)),
                Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
            })
    }

    /// Lowest sample in the grid; `None` until every patch is loaded.
    pub fn lowest_height(&self) -> Option<f32> {
        self.height_range().map(|(lo, _)| lo)
    }
}
