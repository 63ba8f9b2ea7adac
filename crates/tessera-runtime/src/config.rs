use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use tessera_grid::{DEFAULT_HEIGHT_CHANGE_EPSILON, DEFAULT_PATCH_SIZE, DEFAULT_PATCHES_PER_EDGE, GridDims};
use tessera_mesh_cpu::{DEFAULT_UV_SCALE, MAX_PATCH_SIZE, MeshParams};

/// Patch ids carry five bits per axis.
pub const MAX_PATCHES_PER_EDGE: usize = 32;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TerrainConfig {
    #[serde(default = "default_patches_per_edge")]
    pub patches_per_edge: usize,
    #[serde(default = "default_patch_size")]
    pub patch_size: usize,
    #[serde(default = "default_spacing")]
    pub vertex_spacing_x: f32,
    #[serde(default = "default_spacing")]
    pub vertex_spacing_y: f32,
    #[serde(default = "default_uv_scale")]
    pub uv_scale: f32,
    #[serde(default = "default_height_change_epsilon")]
    pub height_change_epsilon: f32,
    /// Hold back a patch's geometry until all eight neighbours have data.
    #[serde(default)]
    pub require_loaded_neighbors: bool,
    #[serde(default = "default_texture_layers")]
    pub texture_layers: usize,
}

fn default_patches_per_edge() -> usize {
    DEFAULT_PATCHES_PER_EDGE
}
fn default_patch_size() -> usize {
    DEFAULT_PATCH_SIZE
}
fn default_spacing() -> f32 {
    1.0
}
fn default_uv_scale() -> f32 {
    DEFAULT_UV_SCALE
}
fn default_height_change_epsilon() -> f32 {
    DEFAULT_HEIGHT_CHANGE_EPSILON
}
fn default_texture_layers() -> usize {
    4
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            patches_per_edge: default_patches_per_edge(),
            patch_size: default_patch_size(),
            vertex_spacing_x: default_spacing(),
            vertex_spacing_y: default_spacing(),
            uv_scale: default_uv_scale(),
            height_change_epsilon: default_height_change_epsilon(),
            require_loaded_neighbors: false,
            texture_layers: default_texture_layers(),
        }
    }
}

impl TerrainConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: TerrainConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.patches_per_edge == 0 || self.patches_per_edge > MAX_PATCHES_PER_EDGE {
            return Err(format!(
                "patches_per_edge must be in 1..={}, got {}",
                MAX_PATCHES_PER_EDGE, self.patches_per_edge
            )
            .into());
        }
        if self.patch_size == 0 || self.patch_size > MAX_PATCH_SIZE {
            return Err(format!(
                "patch_size must be in 1..={}, got {}",
                MAX_PATCH_SIZE, self.patch_size
            )
            .into());
        }
        for (name, v) in [
            ("vertex_spacing_x", self.vertex_spacing_x),
            ("vertex_spacing_y", self.vertex_spacing_y),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(format!("{} must be positive, got {}", name, v).into());
            }
        }
        if !self.uv_scale.is_finite() {
            return Err(format!("uv_scale must be finite, got {}", self.uv_scale).into());
        }
        if self.height_change_epsilon.is_nan() || self.height_change_epsilon < 0.0 {
            return Err(format!(
                "height_change_epsilon must be non-negative, got {}",
                self.height_change_epsilon
            )
            .into());
        }
        Ok(())
    }

    pub fn grid_dims(&self) -> GridDims {
        GridDims::new(self.patches_per_edge, self.patch_size)
    }

    pub fn mesh_params(&self) -> MeshParams {
        MeshParams {
            spacing_x: self.vertex_spacing_x,
            spacing_y: self.vertex_spacing_y,
            uv_scale: self.uv_scale,
        }
    }
}
