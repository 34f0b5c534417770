//! # STL writer
//!
//! ASCII STL export, the counterpart to `openscad_eval::io::stl`'s reader.
//! One `facet normal` per triangle (cross product of its first two edges,
//! normalized; a zero-length normal - a degenerate triangle with no area -
//! is written as `0 0 0`). Triangles with two vertices that compare equal
//! after rounding to the output's six decimal places are skipped rather
//! than written, since a zero-area facet only wastes bytes in the file.

use crate::mesh::Mesh;
use glam::DVec3;

/// Renders `mesh` as an ASCII STL document under the given solid `name`.
pub fn write_ascii(mesh: &Mesh, name: &str) -> String {
    let vertices = mesh.vertices();
    let mut out = String::new();
    out.push_str(&format!("solid {}\n", name));

    for tri in mesh.triangles() {
        let [a, b, c] = [vertices[tri[0] as usize], vertices[tri[1] as usize], vertices[tri[2] as usize]];
        if is_degenerate(a, b, c) {
            continue;
        }
        let normal = facet_normal(a, b, c);
        out.push_str(&format!("  facet normal {} {} {}\n", fmt(normal.x), fmt(normal.y), fmt(normal.z)));
        out.push_str("    outer loop\n");
        for v in [a, b, c] {
            out.push_str(&format!("      vertex {} {} {}\n", fmt(v.x), fmt(v.y), fmt(v.z)));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {}\n", name));
    out
}

fn facet_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    let normal = (b - a).cross(c - a);
    if normal.length_squared() <= f64::EPSILON {
        DVec3::ZERO
    } else {
        normal.normalize()
    }
}

fn is_degenerate(a: DVec3, b: DVec3, c: DVec3) -> bool {
    rounds_equal(a, b) || rounds_equal(b, c) || rounds_equal(a, c)
}

fn rounds_equal(a: DVec3, b: DVec3) -> bool {
    fmt(a.x) == fmt(b.x) && fmt(a.y) == fmt(b.y) && fmt(a.z) == fmt(b.z)
}

fn fmt(v: f64) -> String {
    format!("{:.6}", v)
}

/// Writes `mesh` as an ASCII STL file at `path`.
pub fn write_file(mesh: &Mesh, name: &str, path: &str) -> Result<(), crate::error::MeshError> {
    std::fs::write(path, write_ascii(mesh, name))
        .map_err(|e| crate::error::MeshError::io_error(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(0, 1, 2);
        mesh
    }

    #[test]
    fn writes_one_facet_per_triangle() {
        let text = write_ascii(&unit_triangle_mesh(), "test");
        assert_eq!(text.matches("facet normal").count(), 1);
        assert!(text.starts_with("solid test\n"));
        assert!(text.trim_end().ends_with("endsolid test"));
    }

    #[test]
    fn normal_points_along_z_for_xy_plane_triangle() {
        let text = write_ascii(&unit_triangle_mesh(), "test");
        assert!(text.contains("facet normal 0.000000 0.000000 1.000000"));
    }

    #[test]
    fn degenerate_triangle_is_skipped() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        mesh.add_triangle(0, 1, 2);
        let text = write_ascii(&mesh, "test");
        assert_eq!(text.matches("facet normal").count(), 0);
    }
}
