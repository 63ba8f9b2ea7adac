use tessera_grid::PatchCoord;
use tessera_mesh_cpu::PatchMeshCPU;

/// Renderer-side texture resource returned by the embedding application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Collaborators notified as terrain changes. Every method defaults to a no-op.
pub trait TerrainEvents {
    /// A patch's geometry was rebuilt; `mesh` replaces anything uploaded before.
    fn geometry_updated(&mut self, _coord: PatchCoord, _mesh: &PatchMeshCPU) {}

    /// Every patch has data. Fires once per terrain.
    fn all_patches_loaded(&mut self) {}

    /// Asked once per texture layer right after `all_patches_loaded`.
    fn request_patch_texture(&mut self, _layer: usize) -> Option<TextureHandle> {
        None
    }
}

/// Ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEvents;

impl TerrainEvents for NoEvents {}

impl<E: TerrainEvents + ?Sized> TerrainEvents for &mut E {
    fn geometry_updated(&mut self, coord: PatchCoord, mesh: &PatchMeshCPU) {
        (**self).geometry_updated(coord, mesh)
    }
    fn all_patches_loaded(&mut self) {
        (**self).all_patches_loaded()
    }
    fn request_patch_texture(&mut self, layer: usize) -> Option<TextureHandle> {
        (**self).request_patch_texture(layer)
    }
}
