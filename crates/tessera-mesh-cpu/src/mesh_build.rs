use tessera_geom::Vec3;

#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u16>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse across rebuilds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
    }

    /// Pre-reserve capacity for a `cols x rows` vertex grid.
    #[inline]
    pub fn reserve_grid(&mut self, cols: usize, rows: usize) {
        let verts = cols * rows;
        let quads = cols.saturating_sub(1) * rows.saturating_sub(1);
        self.pos.reserve(verts * 3);
        self.norm.reserve(verts * 3);
        self.uv.reserve(verts * 2);
        self.idx.reserve(quads * 6);
    }

    #[inline]
    pub fn push_vertex(&mut self, p: Vec3, n: Vec3, uv: (f32, f32)) {
        self.pos.extend_from_slice(&[p.x, p.y, p.z]);
        self.norm.extend_from_slice(&[n.x, n.y, n.z]);
        self.uv.extend_from_slice(&[uv.0, uv.1]);
    }

    /// Two triangles for the quad whose low corner is vertex `base` in a grid
    /// `stride` vertices wide: (x,y)-(x+1,y)-(x,y+1) and (x+1,y)-(x+1,y+1)-(x,y+1).
    #[inline]
    pub fn push_grid_quad(&mut self, base: u16, stride: u16) {
        self.idx.extend_from_slice(&[
            base,
            base + 1,
            base + stride,
            base + 1,
            base + stride + 1,
            base + stride,
        ]);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos[i * 3], self.pos[i * 3 + 1], self.pos[i * 3 + 2])
    }

    #[inline]
    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::new(self.norm[i * 3], self.norm[i * 3 + 1], self.norm[i * 3 + 2])
    }

    #[inline]
    pub fn tex_coord(&self, i: usize) -> (f32, f32) {
        (self.uv[i * 2], self.uv[i * 2 + 1])
    }

    /// Returns a slice of interleaved vertex positions (x,y,z per vertex).
    pub fn positions(&self) -> &[f32] {
        &self.pos
    }
    /// Returns a slice of interleaved vertex normals (x,y,z per vertex).
    pub fn normals(&self) -> &[f32] {
        &self.norm
    }
    pub fn indices(&self) -> &[u16] {
        &self.idx
    }
}
