use approx::assert_abs_diff_eq;
use planmesh::{
    export_obj, ingest, ingest_into, ErrorKind, GeometryBuffer, IndexConvention, IngestError,
    IngestOptions,
};

fn options(footprint: f64) -> IngestOptions {
    IngestOptions {
        target_footprint: footprint,
        ..Default::default()
    }
}

/// A small two-storey block: 8 corners, quads on every side.
const BLOCK: &str = "\
# block
v -3 0 -1
v  3 0 -1
v  3 0  1
v -3 0  1
v -3 5 -1
v  3 5 -1
v  3 5  1
v -3 5  1
vn 0 1 0
f 1 2 3 4
f 5 8 7 6
f 1 5 6 2
f 2 6 7 3
f 3 7 8 4
f 5 1 4 8
";

#[test]
fn single_triangle_end_to_end() {
    let out = ingest("v 0 0 0\nv 1 0 0\nv 0 0 1\nf 1 2 3\n", &options(10.0)).unwrap();
    let b = &out.buffer;

    assert_eq!(out.report.triangle_count, 1);
    assert_eq!(b.vertex_count(), 3);
    assert_eq!(out.report.convention, IndexConvention::OneBased);

    let n = b.normal(0).unwrap();
    assert_abs_diff_eq!(n[0], 0.0);
    assert_abs_diff_eq!(n[1].abs(), 1.0);
    assert_abs_diff_eq!(n[2], 0.0);

    for i in 0..3 {
        let p = b.position(i).unwrap();
        assert!(p[0].abs() <= 4.5 + 1e-5);
        assert!(p[2].abs() <= 4.5 + 1e-5);
        assert_abs_diff_eq!(p[1], 0.2, epsilon = 1e-6);
        assert_eq!(b.normal(i), b.normal(0));
    }
    assert_eq!(&b.colors()[..3], &[0.5, 0.5, 0.5]);
    assert!(b.uvs().iter().all(|&u| u == 0.0));
}

#[test]
fn quad_splits_along_first_to_third_vertex() {
    let text = "v 0 0 0\nv 1 0 0\nv 1 0 1\nv 0 0 1\nf 1 2 3 4\n";
    let out = ingest(text, &options(10.0)).unwrap();
    let b = &out.buffer;
    assert_eq!(out.report.triangle_count, 2);

    // Shared edge (v1, v3) appears as the first and last corner of triangle 0
    // and the first two corners of triangle 1.
    assert_eq!(b.position(0), b.position(3));
    assert_eq!(b.position(2), b.position(4));
    assert_ne!(b.position(1), b.position(5));
}

#[test]
fn emitted_vertex_count_is_multiple_of_three() {
    let out = ingest(BLOCK, &options(220.0)).unwrap();
    assert_eq!(out.buffer.vertex_count() % 3, 0);
    assert!(out.buffer.is_consistent());
    assert_eq!(out.report.face_count, 6);
    assert_eq!(out.report.triangle_count, 12);
    assert_eq!(out.report.normal_count, 1);
}

#[test]
fn horizontal_extent_fits_footprint() {
    let footprint = 220.0;
    let out = ingest(BLOCK, &options(footprint)).unwrap();
    let limit = (footprint * 0.45) as f32 + 1e-3;

    let mut max_reach = 0.0f32;
    for i in 0..out.buffer.vertex_count() {
        let p = out.buffer.position(i).unwrap();
        max_reach = max_reach.max(p[0].abs()).max(p[2].abs());
    }
    assert!(max_reach <= limit);
    // The widest axis touches the margin exactly.
    assert_abs_diff_eq!(max_reach, 99.0, epsilon = 1e-3);
}

#[test]
fn height_keeps_aspect_and_lift_is_center_relative() {
    let out = ingest(BLOCK, &options(220.0)).unwrap();
    let ys: Vec<f32> = (0..out.buffer.vertex_count())
        .map(|i| out.buffer.position(i).unwrap()[1])
        .collect();
    let lo = ys.iter().cloned().fold(f32::INFINITY, f32::min);
    let hi = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

    // Width 6 maps to 198, so the scale is 33 and a height of 5 becomes 165.
    assert_abs_diff_eq!(hi - lo, 165.0, epsilon = 1e-3);
    // Lowest point: (0 - 2.5) * 33 + 4.4.
    assert_abs_diff_eq!(lo, -78.1, epsilon = 1e-3);
}

#[test]
fn zero_reference_drops_touching_triangles_and_counts_them() {
    // The 0 forces the zero-based convention; 0 itself is still absent.
    let text = "v 0 0 0\nv 1 0 0\nv 1 0 1\nv 0 0 1\nv 2 0 2\nf 0 1 2 3\nf 1 2 4\n";
    let out = ingest(text, &options(10.0)).unwrap();
    assert_eq!(out.report.convention, IndexConvention::ZeroBased);
    assert_eq!(out.report.malformed_triangles, 2);
    assert_eq!(out.report.triangle_count, 1);
}

#[test]
fn negative_references_address_from_the_end() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 0 1\nf -3 -2 -1\n";
    let out = ingest(text, &options(10.0)).unwrap();
    assert_eq!(out.report.triangle_count, 1);
    assert_eq!(out.report.malformed_triangles, 0);
}

#[test]
fn out_of_range_triangle_is_skipped_not_fatal() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 0 1\nv 1 0 1\nf 1 2 3\nf 1 2 99\n";
    let out = ingest(text, &options(10.0)).unwrap();
    assert_eq!(out.report.triangle_count, 1);
    assert_eq!(out.report.malformed_triangles, 1);
}

#[test]
fn degenerate_triangle_is_dropped_silently() {
    let text = "v 0 0 0\nv 1 0 0\nv 2 0 0\nv 0 0 1\nf 1 2 3\nf 1 2 4\n";
    let out = ingest(text, &options(10.0)).unwrap();
    assert_eq!(out.report.triangle_count, 1);
    assert_eq!(out.report.malformed_triangles, 0);
    assert_eq!(out.report.degenerate_triangles, 1);
}

#[test]
fn no_vertices_fails_with_parse_failure() {
    let err = ingest("# nothing\nf 1 2 3\n", &options(10.0)).unwrap_err();
    assert!(matches!(err, IngestError::NoVertices));
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
}

#[test]
fn single_horizontal_point_fails_and_leaves_buffer_empty() {
    let text = "v 1 0 1\nv 1 5 1\nv 1 9 1\nf 1 2 3\n";
    let mut out = GeometryBuffer::new();
    let err = ingest_into(text, &options(10.0), &mut out).unwrap_err();
    assert!(matches!(err, IngestError::DegenerateBounds { .. }));
    assert_eq!(err.kind(), ErrorKind::DegenerateGeometry);
    assert!(out.is_empty());
}

#[test]
fn failed_reload_keeps_previous_geometry() {
    let mut out = GeometryBuffer::new();
    ingest_into(BLOCK, &options(220.0), &mut out).unwrap();
    let before = out.clone();

    assert!(ingest_into("v 0 0 0\n", &options(220.0), &mut out).is_err());
    assert_eq!(out, before);
}

#[test]
fn faces_without_valid_triangles_fail() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 0 1\nf 7 8 9\n";
    let err = ingest(text, &options(10.0)).unwrap_err();
    match err {
        IngestError::NoTrianglesProduced {
            faces, malformed, ..
        } => {
            assert_eq!(faces, 1);
            assert_eq!(malformed, 1);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn zero_based_file_detected_from_max_index() {
    // Max reference 3 == vertex_count - 1 with no zero: read as zero-based.
    let text = "v 0 0 0\nv 1 0 0\nv 1 0 1\nv 0 0 1\nf 1 2 3\n";
    let out = ingest(text, &options(10.0)).unwrap();
    assert_eq!(out.report.convention, IndexConvention::ZeroBased);
    assert_eq!(out.report.triangle_count, 1);
}

#[test]
fn export_of_ingested_model_has_fresh_slots_per_triangle() {
    let out = ingest(BLOCK, &options(220.0)).unwrap();
    let text = export_obj(&out.buffer);
    let n = out.report.triangle_count;

    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), n * 3);
    let faces: Vec<Vec<usize>> = text
        .lines()
        .filter_map(|l| l.strip_prefix("f "))
        .map(|l| l.split_whitespace().map(|t| t.parse().unwrap()).collect())
        .collect();
    assert_eq!(faces.len(), n);
    for pair in faces.windows(2) {
        assert_eq!(pair[1][0], pair[0][0] + 3);
    }
    for f in &faces {
        assert!(f[0] < f[1] && f[1] < f[2]);
    }

    // Re-ingesting the export reproduces the triangle count.
    let again = ingest(&text, &options(220.0)).unwrap();
    assert_eq!(again.report.triangle_count, n);
}
