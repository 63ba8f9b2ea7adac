use tessera_codec::{PatchDecodeError, PatchDecoder};
use tessera_grid::{GridError, PatchCoord};
use tessera_wire::{BitReader, LayerType, PatchGroupHeader};

use crate::{HeaderFault, Terrain, TerrainError, TerrainEvents};

/// A patch that was dropped while the rest of the payload went on.
#[derive(Clone, Debug, PartialEq)]
pub struct PatchFailure {
    /// Coordinates from the patch header when the failure carries them.
    pub coord: Option<PatchCoord>,
    pub error: TerrainError,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateOutcome {
    pub layer: LayerType,
    /// Patches written into the grid, in decode order.
    pub applied: Vec<PatchCoord>,
    pub failures: Vec<PatchFailure>,
    /// Patches whose geometry was rebuilt, applied patches first.
    pub rebuilt: Vec<PatchCoord>,
    /// The grid became fully loaded during this payload.
    pub all_loaded_now: bool,
}

impl UpdateOutcome {
    fn new(layer: LayerType) -> Self {
        Self {
            layer,
            applied: Vec::new(),
            failures: Vec::new(),
            rebuilt: Vec::new(),
            all_loaded_now: false,
        }
    }

    /// The layer is not decoded here; the payload changed nothing.
    pub fn ignored(&self) -> bool {
        self.layer != LayerType::Land
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Carries one payload through header parse, decode, grid update and
/// geometry rebuild. Lives only for that payload.
pub struct TerrainUpdateCoordinator<'t, D, E: ?Sized> {
    terrain: &'t mut Terrain<D>,
    events: &'t mut E,
}

impl<'t, D: PatchDecoder, E: TerrainEvents + ?Sized> TerrainUpdateCoordinator<'t, D, E> {
    pub fn new(terrain: &'t mut Terrain<D>, events: &'t mut E) -> Self {
        Self { terrain, events }
    }

    pub fn run(mut self, payload: &[u8]) -> Result<UpdateOutcome, TerrainError> {
        let mut bits = BitReader::new(payload);
        let (group, layer) = match self.parse_header(&mut bits) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!(target: "terrain", "dropping terrain payload: {}", e);
                return Err(e);
            }
        };
        let mut outcome = UpdateOutcome::new(layer);
        if layer != LayerType::Land {
            log::debug!(target: "terrain", "unhandled layer data: {}", layer.name());
            return Ok(outcome);
        }

        self.decode_into_grid(&mut bits, &group, &mut outcome);

        let Self { terrain, events } = self;
        outcome.rebuilt = terrain.rebuild_dirty(&outcome.applied, &mut *events);
        outcome.all_loaded_now = terrain.announce_if_loaded(&mut *events);

        log::debug!(
            target: "terrain",
            "layer={} applied={} failed={} rebuilt={} loaded={}/{}",
            layer.name(),
            outcome.applied.len(),
            outcome.failures.len(),
            outcome.rebuilt.len(),
            terrain.grid().loaded_count(),
            terrain.grid().dims().patch_count()
        );
        Ok(outcome)
    }

    fn parse_header(
        &self,
        bits: &mut BitReader<'_>,
    ) -> Result<(PatchGroupHeader, LayerType), TerrainError> {
        let group = PatchGroupHeader::read(bits).map_err(|_| HeaderFault::TooShort)?;
        let layer = group
            .layer()
            .ok_or(HeaderFault::UnknownLayer(group.layer_type))?;
        // Only land is decoded, so only land must match the grid.
        if layer == LayerType::Land {
            let expected = self.terrain.config().patch_size;
            let got = group.patch_size as usize;
            if got != expected {
                return Err(HeaderFault::PatchSizeMismatch { expected, got }.into());
            }
        }
        Ok((group, layer))
    }

    fn decode_into_grid(
        &mut self,
        bits: &mut BitReader<'_>,
        group: &PatchGroupHeader,
        outcome: &mut UpdateOutcome,
    ) {
        let terrain = &mut *self.terrain;
        while let Some(next) = terrain.decoder.next_patch(bits, group) {
            let decoded = match next {
                Ok(d) => d,
                Err(e) => {
                    log::warn!(target: "terrain", "skipping patch: {}", e);
                    let coord = match e {
                        PatchDecodeError::Truncated { x, y }
                        | PatchDecodeError::NonFinite { x, y } => {
                            Some(PatchCoord::new(x as usize, y as usize))
                        }
                        PatchDecodeError::SizeMismatch { .. } => None,
                    };
                    outcome.failures.push(PatchFailure {
                        coord,
                        error: e.into(),
                    });
                    continue;
                }
            };
            let coord = PatchCoord::new(decoded.x() as usize, decoded.y() as usize);
            match terrain.grid.apply_patch(&decoded) {
                Ok(_) => outcome.applied.push(coord),
                Err(GridError::OutOfRangeCoordinate { x, y, .. }) => {
                    log::warn!(
                        target: "terrain",
                        "dropping patch ({}, {}): outside {}x{} grid",
                        x,
                        y,
                        terrain.grid.dims().patches_per_edge,
                        terrain.grid.dims().patches_per_edge
                    );
                    outcome.failures.push(PatchFailure {
                        coord: Some(coord),
                        error: TerrainError::OutOfRangeCoordinate { x, y },
                    });
                }
                Err(GridError::SizeMismatch { expected, got }) => {
                    log::warn!(
                        target: "terrain",
                        "dropping patch {}: {} samples, expected {}",
                        coord,
                        got,
                        expected
                    );
                    outcome.failures.push(PatchFailure {
                        coord: Some(coord),
                        error: TerrainError::PatchDecodeFailed(
                            PatchDecodeError::SizeMismatch { expected, got },
                        ),
                    });
                }
            }
        }
    }
}
