/// Grid coordinates of a patch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchCoord {
    pub x: usize,
    pub y: usize,
}

impl PatchCoord {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for PatchCoord {
    fn from(v: (usize, usize)) -> Self {
        Self::new(v.0, v.1)
    }
}

impl std::fmt::Display for PatchCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Opaque id of the renderer-side mesh resource built for a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(u32);

impl MeshHandle {
    #[inline]
    pub(crate) const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct Patch {
    coord: PatchCoord,
    height_data: Vec<f32>,
    loaded: bool,
    dirty: bool,
    mesh: Option<MeshHandle>,
}

impl Patch {
    pub(crate) fn new(coord: PatchCoord, samples: usize) -> Self {
        Self {
            coord,
            height_data: vec![0.0; samples],
            loaded: false,
            dirty: false,
            mesh: None,
        }
    }

    #[inline]
    pub fn coord(&self) -> PatchCoord {
        self.coord
    }

    /// Row-major samples, `patch_size * patch_size` long.
    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.height_data
    }

    #[inline]
    pub fn height_local(&self, x: usize, y: usize, patch_size: usize) -> f32 {
        self.height_data[y * patch_size + x]
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Geometry is stale and waits for a rebuild.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    #[inline]
    pub fn mesh_handle(&self) -> Option<MeshHandle> {
        self.mesh
    }

    pub(crate) fn mesh_handle_slot(&mut self) -> &mut Option<MeshHandle> {
        &mut self.mesh
    }

    pub(crate) fn replace_heights(&mut self, heights: &[f32]) {
        self.height_data.clear();
        self.height_data.extend_from_slice(heights);
        self.loaded = true;
    }

    pub(crate) fn fill(&mut self, height: f32, samples: usize) {
        self.height_data.clear();
        self.height_data.resize(samples, height);
        self.loaded = true;
    }
}
