//! Writes a triangle buffer back out as OBJ.
//!
//! Every triangle gets three fresh vertex slots (no deduplication), so face `k`
//! references `3k+1 3k+2 3k+3`.

use crate::buffer::GeometryBuffer;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Renders the buffer as OBJ text.
pub fn export_obj(buffer: &GeometryBuffer) -> String {
    let mut out = String::with_capacity(buffer.vertex_count() * 40 + 64);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# Exported 3D Building Model");
    let _ = writeln!(out, "# Vertices: {}", buffer.vertex_count());
    out.push('\n');

    for p in buffer.positions().chunks_exact(3) {
        // `+ 0.0` folds -0.0 into 0.0 so it prints without a sign.
        let _ = writeln!(
            out,
            "v {:.6} {:.6} {:.6}",
            p[0] + 0.0,
            p[1] + 0.0,
            p[2] + 0.0
        );
    }

    out.push('\n');

    for k in 0..buffer.triangle_count() {
        let base = k * 3;
        let _ = writeln!(out, "f {} {} {}", base + 1, base + 2, base + 3);
    }

    out
}

/// Streams the OBJ text of `buffer` into `w`.
pub fn write_obj<W: Write>(mut w: W, buffer: &GeometryBuffer) -> io::Result<()> {
    w.write_all(export_obj(buffer).as_bytes())?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::add_box;

    #[test]
    fn triangle_count_matches_lines() {
        let mut b = GeometryBuffer::new();
        add_box(&mut b, [0.0; 3], [1.0; 3], [1.0; 3]);
        let text = export_obj(&b);

        let v_lines = text.lines().filter(|l| l.starts_with("v ")).count();
        let f_lines: Vec<Vec<usize>> = text
            .lines()
            .filter_map(|l| l.strip_prefix("f "))
            .map(|l| l.split(' ').map(|t| t.parse().unwrap()).collect())
            .collect();

        assert_eq!(v_lines, 36);
        assert_eq!(f_lines.len(), 12);
        for (k, f) in f_lines.iter().enumerate() {
            assert_eq!(f, &vec![3 * k + 1, 3 * k + 2, 3 * k + 3]);
        }
    }

    #[test]
    fn header_and_number_format() {
        let mut b = GeometryBuffer::new();
        b.push_flat_triangle(
            [[-0.0, 0.2, 1.5], [4.5, 0.2, -4.5], [0.125, 0.2, 0.0]],
            [0.0, 1.0, 0.0],
            [0.5; 3],
        );
        let text = export_obj(&b);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# Exported 3D Building Model");
        assert_eq!(lines[1], "# Vertices: 3");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "v 0.000000 0.200000 1.500000");
        assert_eq!(lines[4], "v 4.500000 0.200000 -4.500000");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "f 1 2 3");
    }

    #[test]
    fn writer_matches_string() {
        let mut b = GeometryBuffer::new();
        add_box(&mut b, [0.0; 3], [1.0; 3], [1.0; 3]);
        let mut bytes = Vec::new();
        write_obj(&mut bytes, &b).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), export_obj(&b));
    }
}
