//! Axis-aligned box and ground-plane builders. Per-face constant normals, no failure modes.

use crate::buffer::GeometryBuffer;

/// Texture-coordinate mirroring for the ground plane, applied at emission time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaneOptions {
    pub flip_u: bool,
    pub flip_v: bool,
}

// Corner sign patterns (x, y, z) per face, wound as two triangles (0,1,2) (0,2,3).
#[rustfmt::skip]
const BOX_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    // front
    ([ 0.0,  0.0,  1.0], [[-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]]),
    // back
    ([ 0.0,  0.0, -1.0], [[ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0]]),
    // left
    ([-1.0,  0.0,  0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0]]),
    // right
    ([ 1.0,  0.0,  0.0], [[ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0]]),
    // top
    ([ 0.0,  1.0,  0.0], [[-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0]]),
    // bottom
    ([ 0.0, -1.0,  0.0], [[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0]]),
];

const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Appends a box of `size` (width, height, depth) centered at `center`: 6 faces, 36 vertices.
pub fn add_box(buffer: &mut GeometryBuffer, center: [f32; 3], size: [f32; 3], color: [f32; 3]) {
    let half = size.map(|s| s * 0.5);

    for (normal, corners) in BOX_FACES {
        for i in QUAD_TRIANGLES {
            let s = corners[i];
            let position = [
                center[0] + s[0] * half[0],
                center[1] + s[1] * half[1],
                center[2] + s[2] * half[2],
            ];
            buffer.push_vertex(position, normal, [0.0, 0.0], color);
        }
    }
}

/// Appends a horizontal `width` x `depth` quad at `center` facing +Y: 2 triangles, 6 vertices.
///
/// UVs span [0, 1] from the -X/-Z corner; `options` mirrors them per axis.
pub fn add_plane(
    buffer: &mut GeometryBuffer,
    center: [f32; 3],
    width: f32,
    depth: f32,
    color: [f32; 3],
    options: PlaneOptions,
) {
    let hx = width * 0.5;
    let hz = depth * 0.5;

    #[rustfmt::skip]
    let corners: [([f32; 2], [f32; 2]); 4] = [
        ([-hx, -hz], [0.0, 0.0]),
        ([ hx, -hz], [1.0, 0.0]),
        ([ hx,  hz], [1.0, 1.0]),
        ([-hx,  hz], [0.0, 1.0]),
    ];

    for i in QUAD_TRIANGLES {
        let ([x, z], [mut u, mut v]) = corners[i];
        if options.flip_u {
            u = 1.0 - u;
        }
        if options.flip_v {
            v = 1.0 - v;
        }
        buffer.push_vertex(
            [center[0] + x, center[1], center[2] + z],
            [0.0, 1.0, 0.0],
            [u, v],
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_emits_36_vertices_within_extent() {
        let mut b = GeometryBuffer::new();
        add_box(&mut b, [1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.1, 0.2, 0.3]);
        assert_eq!(b.vertex_count(), 36);
        assert!(b.is_consistent());

        for i in 0..36 {
            let p = b.position(i).unwrap();
            assert!((0.0..=2.0).contains(&p[0]));
            assert!((0.0..=4.0).contains(&p[1]));
            assert!((0.0..=6.0).contains(&p[2]));
        }
    }

    #[test]
    fn box_face_normals_point_outward() {
        let mut b = GeometryBuffer::new();
        add_box(&mut b, [0.0; 3], [2.0; 3], [1.0; 3]);

        for i in 0..36 {
            let p = b.position(i).unwrap();
            let n = b.normal(i).unwrap();
            // Every corner of a face lies on the side its normal points to.
            let d = p[0] * n[0] + p[1] * n[1] + p[2] * n[2];
            assert_eq!(d, 1.0);
        }
    }

    #[test]
    fn plane_emits_6_upward_vertices() {
        let mut b = GeometryBuffer::new();
        add_plane(&mut b, [0.0; 3], 220.0, 220.0, [0.6; 3], PlaneOptions::default());
        assert_eq!(b.vertex_count(), 6);
        for i in 0..6 {
            assert_eq!(b.normal(i), Some([0.0, 1.0, 0.0]));
            assert_eq!(b.position(i).unwrap()[1], 0.0);
        }
        assert_eq!(&b.uvs()[..6], &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
        assert_eq!(b.position(1), Some([110.0, 0.0, -110.0]));
    }

    #[test]
    fn plane_uv_flips_apply_per_axis() {
        let mut b = GeometryBuffer::new();
        let options = PlaneOptions {
            flip_u: true,
            flip_v: false,
        };
        add_plane(&mut b, [0.0; 3], 2.0, 2.0, [1.0; 3], options);
        assert_eq!(&b.uvs()[..2], &[1.0, 0.0]);

        let mut b = GeometryBuffer::new();
        let options = PlaneOptions {
            flip_u: false,
            flip_v: true,
        };
        add_plane(&mut b, [0.0; 3], 2.0, 2.0, [1.0; 3], options);
        assert_eq!(&b.uvs()[..2], &[0.0, 1.0]);
    }
}
