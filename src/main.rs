use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tessera_codec::write_flat_patch;
use tessera_grid::PatchCoord;
use tessera_mesh_cpu::PatchMeshCPU;
use tessera_runtime::{Terrain, TerrainConfig, TerrainEvents, TextureHandle};
use tessera_wire::{BitWriter, LayerType, PatchGroupHeader, PatchHeader};

#[derive(Parser, Debug)]
#[command(name = "tessera", about = "Replay terrain layer payloads into a patch grid")]
struct Cli {
    /// Terrain settings (TOML); built-in defaults when omitted
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Load every patch at this height before replaying
    #[arg(long, allow_hyphen_values = true)]
    flat: Option<f32>,
    /// Raw layer payload files, transport framing already stripped
    payloads: Vec<PathBuf>,
}

#[derive(Default)]
struct ReplayStats {
    meshes_built: usize,
    triangles: usize,
}

impl TerrainEvents for ReplayStats {
    fn geometry_updated(&mut self, _coord: PatchCoord, mesh: &PatchMeshCPU) {
        self.meshes_built += 1;
        self.triangles += mesh.build.triangle_count();
    }

    fn all_patches_loaded(&mut self) {
        log::info!("terrain ready");
    }

    fn request_patch_texture(&mut self, layer: usize) -> Option<TextureHandle> {
        log::debug!("texture layer {} requested", layer);
        Some(TextureHandle(layer as u64))
    }
}

/// One land payload holding a DC-only patch for every grid cell.
fn flat_grid_payload(config: &TerrainConfig, height: f32) -> Vec<u8> {
    let mut w = BitWriter::new();
    PatchGroupHeader::new(0, config.patch_size as u8, LayerType::Land).write(&mut w);
    for y in 0..config.patches_per_edge {
        for x in 0..config.patches_per_edge {
            write_flat_patch(&mut w, x as u8, y as u8, height);
        }
    }
    PatchHeader::write_end(&mut w);
    w.into_bytes()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TerrainConfig::from_path(path)?,
        None => TerrainConfig::default(),
    };
    let mut terrain = Terrain::new(config)?;
    let mut stats = ReplayStats::default();

    if let Some(height) = cli.flat {
        let payload = flat_grid_payload(terrain.config(), height);
        let out = terrain.apply_terrain_update_with(&payload, &mut stats)?;
        log::info!(
            "flat fill: applied={} rebuilt={}",
            out.applied.len(),
            out.rebuilt.len()
        );
    }

    for path in &cli.payloads {
        let bytes = std::fs::read(path)?;
        match terrain.apply_terrain_update_with(&bytes, &mut stats) {
            Ok(out) if out.ignored() => {
                log::info!("{}: {} layer ignored", path.display(), out.layer.name());
            }
            Ok(out) => {
                log::info!(
                    "{}: applied={} failed={} rebuilt={}{}",
                    path.display(),
                    out.applied.len(),
                    out.failures.len(),
                    out.rebuilt.len(),
                    if out.all_loaded_now { " (all loaded)" } else { "" }
                );
                for f in &out.failures {
                    match f.coord {
                        Some(c) => log::warn!("  patch {}: {}", c, f.error),
                        None => log::warn!("  patch: {}", f.error),
                    }
                }
            }
            Err(e) => log::warn!("{}: dropped: {}", path.display(), e),
        }
    }

    let grid = terrain.grid();
    log::info!(
        "loaded {}/{} patches, {} meshes ({} builds, {} triangles), lowest height {}",
        grid.loaded_count(),
        grid.dims().patch_count(),
        terrain.mesh_count(),
        stats.meshes_built,
        stats.triangles,
        grid.lowest_height()
            .map(|h| h.to_string())
            .unwrap_or_else(|| "n/a".into())
    );
    Ok(())
}
