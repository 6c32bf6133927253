//! Append-only vertex attribute storage shared by the builders and the ingestion pipeline.

/// One vertex in the interleaved layout handed to the GPU.
/// Must match the vertex inputs of `scene.wgsl` in the viewer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InterleavedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 3],
}

/// Four parallel attribute streams. After every completed build step
/// `positions.len() / 3 == normals.len() / 3 == uvs.len() / 2 == colors.len() / 3`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    colors: Vec<f32>,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates room for `vertices` more vertices.
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            normals: Vec::with_capacity(vertices * 3),
            uvs: Vec::with_capacity(vertices * 2),
            colors: Vec::with_capacity(vertices * 3),
        }
    }

    /// Appends one vertex to all four streams.
    #[inline]
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2], color: [f32; 3]) {
        self.positions.extend_from_slice(&position);
        self.normals.extend_from_slice(&normal);
        self.uvs.extend_from_slice(&uv);
        self.colors.extend_from_slice(&color);
    }

    /// Appends a flat-shaded triangle: three vertices sharing one normal and color, zero uvs.
    pub fn push_flat_triangle(&mut self, corners: [[f32; 3]; 3], normal: [f32; 3], color: [f32; 3]) {
        for p in corners {
            self.push_vertex(p, normal, [0.0, 0.0], color);
        }
    }

    /// Moves every vertex of `other` to the end of this buffer.
    pub fn append(&mut self, other: &mut GeometryBuffer) {
        self.positions.append(&mut other.positions);
        self.normals.append(&mut other.normals);
        self.uvs.append(&mut other.uvs);
        self.colors.append(&mut other.colors);
    }

    /// Resets to empty, keeping the allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.colors.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Checks the parallel-stream length invariant.
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len() / 3;
        self.positions.len() % 3 == 0
            && self.normals.len() == n * 3
            && self.uvs.len() == n * 2
            && self.colors.len() == n * 3
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> Option<[f32; 3]> {
        self.positions
            .get(i * 3..i * 3 + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Normal of vertex `i`.
    pub fn normal(&self, i: usize) -> Option<[f32; 3]> {
        self.normals.get(i * 3..i * 3 + 3).map(|n| [n[0], n[1], n[2]])
    }

    /// Builds the interleaved array-of-structs view used for vertex buffer upload.
    pub fn interleave(&self) -> Vec<InterleavedVertex> {
        (0..self.vertex_count())
            .map(|i| InterleavedVertex {
                position: [self.positions[i * 3], self.positions[i * 3 + 1], self.positions[i * 3 + 2]],
                normal: [self.normals[i * 3], self.normals[i * 3 + 1], self.normals[i * 3 + 2]],
                uv: [self.uvs[i * 2], self.uvs[i * 2 + 1]],
                color: [self.colors[i * 3], self.colors[i * 3 + 1], self.colors[i * 3 + 2]],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_consistent() {
        let b = GeometryBuffer::new();
        assert!(b.is_empty());
        assert!(b.is_consistent());
        assert_eq!(b.vertex_count(), 0);
    }

    #[test]
    fn flat_triangle_keeps_streams_parallel() {
        let mut b = GeometryBuffer::new();
        b.push_flat_triangle(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            [0.0, 1.0, 0.0],
            [0.5, 0.5, 0.5],
        );
        assert!(b.is_consistent());
        assert_eq!(b.vertex_count(), 3);
        assert_eq!(b.triangle_count(), 1);
        assert_eq!(b.uvs(), &[0.0; 6]);
        assert_eq!(b.normal(2), Some([0.0, 1.0, 0.0]));
        assert_eq!(b.position(3), None);
    }

    #[test]
    fn clear_then_append_reuses_identity() {
        let mut a = GeometryBuffer::new();
        a.push_vertex([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.25, 0.75], [1.0, 0.0, 0.0]);
        a.clear();
        assert!(a.is_empty());

        let mut b = GeometryBuffer::new();
        b.push_vertex([4.0, 5.0, 6.0], [0.0, 0.0, 1.0], [1.0, 1.0], [0.0, 1.0, 0.0]);
        a.append(&mut b);
        assert!(b.is_empty());
        assert_eq!(a.position(0), Some([4.0, 5.0, 6.0]));

        let v = a.interleave();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].uv, [1.0, 1.0]);
        assert_eq!(v[0].color, [0.0, 1.0, 0.0]);
    }
}
