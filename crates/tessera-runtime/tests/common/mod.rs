// Shared fixtures; not every test binary uses all of them.
#![allow(dead_code)]

use std::collections::VecDeque;

use tessera_codec::{DecodedPatch, PatchDecodeError, PatchDecoder, write_flat_patch};
use tessera_grid::PatchCoord;
use tessera_mesh_cpu::PatchMeshCPU;
use tessera_runtime::{TerrainConfig, TerrainEvents, TextureHandle};
use tessera_wire::{BitReader, BitWriter, LayerType, PatchGroupHeader, PatchHeader};

/// 2x2 patches of 4x4 samples.
pub fn small_config() -> TerrainConfig {
    TerrainConfig {
        patches_per_edge: 2,
        patch_size: 4,
        ..TerrainConfig::default()
    }
}

pub fn group_only(size: u8, layer: LayerType) -> Vec<u8> {
    let mut w = BitWriter::new();
    PatchGroupHeader::new(0, size, layer).write(&mut w);
    w.into_bytes()
}

/// Land payload of DC-only patches, closed by the end marker.
pub fn flat_land(size: u8, patches: &[(u8, u8, f32)]) -> Vec<u8> {
    let mut w = BitWriter::new();
    PatchGroupHeader::new(0, size, LayerType::Land).write(&mut w);
    for &(x, y, h) in patches {
        write_flat_patch(&mut w, x, y, h);
    }
    PatchHeader::write_end(&mut w);
    w.into_bytes()
}

/// Yields a fixed list of results, ignoring the bits.
pub struct ScriptedDecoder {
    pub script: VecDeque<Result<DecodedPatch, PatchDecodeError>>,
}

impl ScriptedDecoder {
    pub fn new(script: Vec<Result<DecodedPatch, PatchDecodeError>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl PatchDecoder for ScriptedDecoder {
    fn next_patch(
        &mut self,
        _bits: &mut BitReader<'_>,
        _group: &PatchGroupHeader,
    ) -> Option<Result<DecodedPatch, PatchDecodeError>> {
        self.script.pop_front()
    }
}

#[derive(Default)]
pub struct Recorder {
    pub geometry: Vec<(PatchCoord, usize)>,
    pub loaded: usize,
    pub texture_layers: Vec<usize>,
}

impl TerrainEvents for Recorder {
    fn geometry_updated(&mut self, coord: PatchCoord, mesh: &PatchMeshCPU) {
        self.geometry.push((coord, mesh.vertex_count()));
    }

    fn all_patches_loaded(&mut self) {
        self.loaded += 1;
    }

    fn request_patch_texture(&mut self, layer: usize) -> Option<TextureHandle> {
        self.texture_layers.push(layer);
        Some(TextureHandle(100 + layer as u64))
    }
}
