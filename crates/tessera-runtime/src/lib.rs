//! Terrain runtime: turns layer payloads into grid updates and patch meshes.
#![forbid(unsafe_code)]

mod config;
mod coordinator;
mod error;
mod events;
mod queue;

pub use config::{MAX_PATCHES_PER_EDGE, TerrainConfig};
pub use coordinator::{PatchFailure, TerrainUpdateCoordinator, UpdateOutcome};
pub use error::{HeaderFault, TerrainError};
pub use events::{NoEvents, TerrainEvents, TextureHandle};
pub use queue::{PayloadReceiver, PayloadSender, payload_channel};

use std::error::Error;
use std::time::Instant;

use hashbrown::{HashMap, HashSet};
use tessera_codec::{DctPatchDecoder, PatchDecoder};
use tessera_grid::{MeshHandle, PatchCoord, TerrainGrid};
use tessera_mesh_cpu::{MeshParams, PatchMeshCPU, build_patch_mesh_into};

/// One terrain entity: the height grid, the patch meshes built from it and
/// the decoder fed by incoming payloads. Not synchronised; hand payloads
/// from other threads through [`payload_channel`].
pub struct Terrain<D = DctPatchDecoder> {
    config: TerrainConfig,
    params: MeshParams,
    grid: TerrainGrid,
    meshes: HashMap<MeshHandle, PatchMeshCPU>,
    decoder: D,
    announced_loaded: bool,
    textures: Vec<TextureHandle>,
}

impl Terrain<DctPatchDecoder> {
    pub fn new(config: TerrainConfig) -> Result<Self, Box<dyn Error>> {
        Self::with_decoder(config, DctPatchDecoder::new())
    }
}

impl<D: PatchDecoder> Terrain<D> {
    pub fn with_decoder(config: TerrainConfig, decoder: D) -> Result<Self, Box<dyn Error>> {
        config.validate()?;
        let grid = TerrainGrid::new(config.grid_dims())
            .with_height_change_epsilon(config.height_change_epsilon);
        Ok(Self {
            params: config.mesh_params(),
            config,
            grid,
            meshes: HashMap::new(),
            decoder,
            announced_loaded: false,
            textures: Vec::new(),
        })
    }

    /// Decodes one layer payload into the grid and rebuilds affected meshes.
    pub fn apply_terrain_update(&mut self, payload: &[u8]) -> Result<UpdateOutcome, TerrainError> {
        self.apply_terrain_update_with(payload, &mut NoEvents)
    }

    pub fn apply_terrain_update_with(
        &mut self,
        payload: &[u8],
        events: &mut dyn TerrainEvents,
    ) -> Result<UpdateOutcome, TerrainError> {
        TerrainUpdateCoordinator::new(self, events).run(payload)
    }

    /// Applies every queued payload in arrival order.
    pub fn drain_updates(
        &mut self,
        rx: &PayloadReceiver,
        events: &mut dyn TerrainEvents,
    ) -> Vec<Result<UpdateOutcome, TerrainError>> {
        let mut out = Vec::new();
        while let Some(payload) = rx.try_next() {
            out.push(self.apply_terrain_update_with(&payload, events));
        }
        out
    }

    /// Fills a patch with one height and rebuilds what that touched.
    pub fn make_patch_flat(
        &mut self,
        coord: PatchCoord,
        height: f32,
        events: &mut dyn TerrainEvents,
    ) -> Vec<PatchCoord> {
        self.grid.make_patch_flat(coord, height);
        let rebuilt = self.rebuild_dirty(&[coord], &mut *events);
        self.announce_if_loaded(&mut *events);
        rebuilt
    }
}

impl<D> Terrain<D> {
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub fn mesh(&self, coord: PatchCoord) -> Option<&PatchMeshCPU> {
        let handle = self.grid.get(coord.x, coord.y)?.mesh_handle()?;
        self.meshes.get(&handle)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Textures handed back after the grid first became fully loaded.
    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    /// Rebuilds every loaded patch, e.g. after the mesh parameters changed
    /// under existing data. Unloaded patches stay dirty until data arrives.
    pub fn rebuild_all(&mut self, events: &mut dyn TerrainEvents) -> Vec<PatchCoord> {
        self.grid.dirty_all();
        let rebuilt = self.rebuild_dirty(&[], &mut *events);
        log::debug!(target: "terrain", "full rebuild touched {} patches", rebuilt.len());
        rebuilt
    }

    /// Rebuilds dirty loaded patches: `first` in the given order, then any
    /// other dirty patch in grid scan order. A rebuilt patch is clean.
    pub(crate) fn rebuild_dirty<E: TerrainEvents + ?Sized>(
        &mut self,
        first: &[PatchCoord],
        events: &mut E,
    ) -> Vec<PatchCoord> {
        let t0 = Instant::now();
        let mut seen = HashSet::with_capacity(first.len());
        let order: Vec<PatchCoord> = first
            .iter()
            .copied()
            .chain(self.grid.dirty_loaded())
            .filter(|c| seen.insert(*c))
            .collect();

        let mut rebuilt = Vec::new();
        for coord in order {
            let patch = self.grid.patch(coord);
            if !patch.is_dirty() || !patch.is_loaded() {
                continue;
            }
            if self.config.require_loaded_neighbors && !self.grid.neighbors_loaded(coord) {
                continue;
            }
            let handle = self.grid.ensure_mesh_handle(coord);
            let mesh = self
                .meshes
                .entry(handle)
                .or_insert_with(|| PatchMeshCPU::new(coord));
            build_patch_mesh_into(&self.grid, coord, &self.params, mesh);
            self.grid.patch_mut(coord).set_dirty(false);
            events.geometry_updated(coord, mesh);
            rebuilt.push(coord);
        }
        if !rebuilt.is_empty() {
            log::debug!(
                target: "perf",
                "ms={} terrain_rebuild patches={}",
                t0.elapsed().as_millis(),
                rebuilt.len()
            );
        }
        rebuilt
    }

    /// Fires the one-time "all loaded" notification and texture requests.
    pub(crate) fn announce_if_loaded<E: TerrainEvents + ?Sized>(&mut self, events: &mut E) -> bool {
        if self.announced_loaded || !self.grid.all_patches_loaded() {
            return false;
        }
        self.announced_loaded = true;
        log::info!(
            target: "terrain",
            "all {} terrain patches loaded",
            self.grid.dims().patch_count()
        );
        events.all_patches_loaded();
        for layer in 0..self.config.texture_layers {
            if let Some(tex) = events.request_patch_texture(layer) {
                self.textures.push(tex);
            }
        }
        true
    }
}
