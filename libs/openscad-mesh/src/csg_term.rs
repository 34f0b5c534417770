//! # CSG Term Tree, Normalizer and Chain Linearizer
//!
//! This models the preview pipeline's intermediate representation: a binary
//! expression tree over polygon-set primitives (`CsgTerm`), rewritten into
//! sum-of-products form by [`CsgTerm::normalize`], then flattened into an
//! ordered [`CsgChain`] a depth-peeling rasterizer could walk left to right.
//!
//! This crate does not carry a rasterizer - the chain is the seam. Boolean
//! results actually exported (STL etc.) go through [`crate::from_ir`]'s exact
//! mesh path instead; this module exists for preview-equivalence and is kept
//! independently testable against the algebraic rewrite rules below.

use crate::from_ir;
use crate::mesh::Mesh;
use crate::ops::extrude::Polygon2D;
use glam::{DMat4, DVec3};
use openscad_ast::ModuleTag;
use openscad_eval::GeometryNode;
use std::rc::Rc;

/// An ordered sequence of polygons in object space, with a 2-D/3-D flag.
///
/// Mirrors the kernel-facing `PolySet`: a list of (possibly non-triangular)
/// polygons, each an ordered point list. `convexity` is a depth-peeling
/// rendering hint; the underlying `GeometryNode` carries no convexity
/// argument today, so it is always 1 here.
#[derive(Debug, Clone)]
pub struct PolySet {
    pub polygons: Vec<Vec<DVec3>>,
    pub is2d: bool,
    pub convexity: u32,
}

impl PolySet {
    fn from_mesh(mesh: &Mesh, is2d: bool) -> Self {
        let vertices = mesh.vertices();
        let polygons = mesh
            .triangles()
            .iter()
            .map(|tri| tri.iter().map(|&idx| vertices[idx as usize]).collect())
            .collect();
        Self { polygons, is2d, convexity: 1 }
    }

    fn from_polygon2d(polygon: &Polygon2D) -> Self {
        let outer: Vec<DVec3> = polygon.outer.iter().map(|p| DVec3::new(p.x, p.y, 0.0)).collect();
        let mut polygons = vec![outer];
        for hole in &polygon.holes {
            polygons.push(hole.iter().map(|p| DVec3::new(p.x, p.y, 0.0)).collect());
        }
        Self { polygons, is2d: true, convexity: 1 }
    }
}

/// A binary CSG expression over polygon-set primitives (spec's `CSGTerm`).
///
/// Shared via `Rc` rather than an intrusive refcount - normalization's
/// rewrite rules duplicate subtrees (rules 2/3/5/8/9 below), and `Rc::clone`
/// gives the same "share until last reference drops" behavior without manual
/// link/unlink bookkeeping.
#[derive(Debug, Clone)]
pub enum CsgTerm {
    Primitive { polyset: Rc<PolySet>, matrix: DMat4, color: Option<[f32; 4]>, label: String },
    Union(Rc<CsgTerm>, Rc<CsgTerm>),
    Intersection(Rc<CsgTerm>, Rc<CsgTerm>),
    Difference(Rc<CsgTerm>, Rc<CsgTerm>),
}

impl CsgTerm {
    fn primitive(polyset: PolySet, matrix: DMat4, color: Option<[f32; 4]>, label: impl Into<String>) -> Rc<Self> {
        Rc::new(CsgTerm::Primitive { polyset: Rc::new(polyset), matrix, color, label: label.into() })
    }

    /// Rewrites this term into sum-of-products form (Kirsch & Doeller).
    ///
    /// Unions only ever nest along the root spine afterward; every
    /// intersection/difference has a primitive on its right.
    pub fn normalize(self: &Rc<Self>) -> Rc<Self> {
        match self.as_ref() {
            CsgTerm::Primitive { .. } => Rc::clone(self),
            CsgTerm::Union(l, r) => {
                let nl = l.normalize();
                let nr = r.normalize();
                fixed_point(Rc::new(CsgTerm::Union(nl, nr)))
            }
            CsgTerm::Intersection(l, r) => {
                let nl = l.normalize();
                let nr = r.normalize();
                fixed_point(Rc::new(CsgTerm::Intersection(nl, nr)))
            }
            CsgTerm::Difference(l, r) => {
                let nl = l.normalize();
                let nr = r.normalize();
                fixed_point(Rc::new(CsgTerm::Difference(nl, nr)))
            }
        }
    }

    /// Stable textual dump, matching `(left OP right)` / `label`.
    ///
    /// Used both for debugging and as the basis of the fingerprint cache key
    /// (see [`crate::cache`]).
    pub fn dump(&self) -> String {
        match self {
            CsgTerm::Primitive { label, .. } => label.clone(),
            CsgTerm::Union(l, r) => format!("({} + {})", l.dump(), r.dump()),
            CsgTerm::Intersection(l, r) => format!("({} * {})", l.dump(), r.dump()),
            CsgTerm::Difference(l, r) => format!("({} - {})", l.dump(), r.dump()),
        }
    }
}

fn fixed_point(mut term: Rc<CsgTerm>) -> Rc<CsgTerm> {
    loop {
        let next = normalize_tail(&term);
        if Rc::ptr_eq(&next, &term) {
            return term;
        }
        term = next;
    }
}

/// Applies the first matching rewrite rule at the root, or returns the
/// term unchanged if none apply. Rules are tried in the fixed numeric order
/// from the original algorithm; applying them out of order can fail to
/// reach a fixed point on some inputs.
fn normalize_tail(term: &Rc<CsgTerm>) -> Rc<CsgTerm> {
    use CsgTerm::*;

    if let Difference(x, right) = term.as_ref() {
        if let Union(y, z) = right.as_ref() {
            // 1. x - (y + z) -> (x - y) - z
            return Rc::new(Difference(Rc::new(Difference(Rc::clone(x), Rc::clone(y))), Rc::clone(z)));
        }
    }
    if let Intersection(x, right) = term.as_ref() {
        if let Union(y, z) = right.as_ref() {
            // 2. x * (y + z) -> (x * y) + (x * z)
            return Rc::new(Union(
                Rc::new(Intersection(Rc::clone(x), Rc::clone(y))),
                Rc::new(Intersection(Rc::clone(x), Rc::clone(z))),
            ));
        }
    }
    if let Difference(x, right) = term.as_ref() {
        if let Intersection(y, z) = right.as_ref() {
            // 3. x - (y * z) -> (x - y) + (x - z)
            return Rc::new(Union(
                Rc::new(Difference(Rc::clone(x), Rc::clone(y))),
                Rc::new(Difference(Rc::clone(x), Rc::clone(z))),
            ));
        }
    }
    if let Intersection(x, right) = term.as_ref() {
        if let Intersection(y, z) = right.as_ref() {
            // 4. x * (y * z) -> (x * y) * z
            return Rc::new(Intersection(Rc::new(Intersection(Rc::clone(x), Rc::clone(y))), Rc::clone(z)));
        }
    }
    if let Difference(x, right) = term.as_ref() {
        if let Difference(y, z) = right.as_ref() {
            // 5. x - (y - z) -> (x - y) + (x * z)
            return Rc::new(Union(
                Rc::new(Difference(Rc::clone(x), Rc::clone(y))),
                Rc::new(Intersection(Rc::clone(x), Rc::clone(z))),
            ));
        }
    }
    if let Intersection(x, right) = term.as_ref() {
        if let Difference(y, z) = right.as_ref() {
            // 6. x * (y - z) -> (x * y) - z
            return Rc::new(Difference(Rc::new(Intersection(Rc::clone(x), Rc::clone(y))), Rc::clone(z)));
        }
    }
    if let Intersection(left, z) = term.as_ref() {
        if let Difference(x, y) = left.as_ref() {
            // 7. (x - y) * z -> (x * z) - y
            return Rc::new(Difference(Rc::new(Intersection(Rc::clone(x), Rc::clone(z))), Rc::clone(y)));
        }
    }
    if let Difference(left, z) = term.as_ref() {
        if let Union(x, y) = left.as_ref() {
            // 8. (x + y) - z -> (x - z) + (y - z)
            return Rc::new(Union(
                Rc::new(Difference(Rc::clone(x), Rc::clone(z))),
                Rc::new(Difference(Rc::clone(y), Rc::clone(z))),
            ));
        }
    }
    if let Intersection(left, z) = term.as_ref() {
        if let Union(x, y) = left.as_ref() {
            // 9. (x + y) * z -> (x * z) + (y * z)
            return Rc::new(Union(
                Rc::new(Intersection(Rc::clone(x), Rc::clone(z))),
                Rc::new(Intersection(Rc::clone(y), Rc::clone(z))),
            ));
        }
    }

    Rc::clone(term)
}

/// Op tag used by [`CsgChain`]'s linearized sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOp {
    Union,
    Intersection,
    Difference,
}

/// The normalized tree flattened into an index-aligned sequence, as a
/// rasterizer would walk it left to right. `ops[0]` is always `Union`.
#[derive(Debug, Default)]
pub struct CsgChain {
    pub polysets: Vec<Rc<PolySet>>,
    pub matrices: Vec<DMat4>,
    pub ops: Vec<ChainOp>,
    pub labels: Vec<String>,
}

impl CsgChain {
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether this chain has grown past [`config::constants::CSG_CHAIN_SIZE_THRESHOLD`],
    /// the point at which the preview pipeline gives way to the exact kernel
    /// path (spec's "Size policy": a chain this large is no longer worth
    /// depth-peeling, since the per-primitive overhead dominates).
    pub fn exceeds_threshold(&self) -> bool {
        self.len() > config::constants::CSG_CHAIN_SIZE_THRESHOLD
    }

    fn add(&mut self, polyset: &Rc<PolySet>, matrix: DMat4, op: ChainOp, label: &str) {
        self.polysets.push(Rc::clone(polyset));
        self.matrices.push(matrix);
        self.ops.push(op);
        self.labels.push(label.to_string());
    }

    fn import(&mut self, term: &Rc<CsgTerm>, op: ChainOp) {
        match term.as_ref() {
            CsgTerm::Primitive { polyset, matrix, label, .. } => self.add(polyset, *matrix, op, label),
            CsgTerm::Union(l, r) => {
                self.import(l, op);
                self.import(r, ChainOp::Union);
            }
            CsgTerm::Intersection(l, r) => {
                self.import(l, op);
                self.import(r, ChainOp::Intersection);
            }
            CsgTerm::Difference(l, r) => {
                self.import(l, op);
                self.import(r, ChainOp::Difference);
            }
        }
    }

    /// Stable textual dump, one line per product, matching the CSGTerm dump
    /// convention (`+label`, ` -label`, ` *label`).
    pub fn dump(&self) -> String {
        let mut text = String::new();
        for (i, op) in self.ops.iter().enumerate() {
            match op {
                ChainOp::Union => {
                    if i != 0 {
                        text.push('\n');
                    }
                    text.push('+');
                }
                ChainOp::Difference => text.push_str(" -"),
                ChainOp::Intersection => text.push_str(" *"),
            }
            text.push_str(&self.labels[i]);
        }
        text.push('\n');
        text
    }
}

/// Linearizes an already-normalized term into a [`CsgChain`].
pub fn linearize(term: &Rc<CsgTerm>) -> CsgChain {
    let mut chain = CsgChain::default();
    chain.import(term, ChainOp::Union);
    chain
}

/// Builds, normalizes and linearizes the preview chain for a geometry tree,
/// unless it would land above [`CsgChain::exceeds_threshold`] - in which case
/// the preview pipeline is skipped and callers fall back to the exact kernel
/// path in [`crate::from_ir`].
pub fn preview_chain(root: &GeometryNode) -> Option<CsgChain> {
    let build = build_csg_term(root);
    let term = build.term?;
    let chain = linearize(&term.normalize());
    if chain.exceeds_threshold() {
        None
    } else {
        Some(chain)
    }
}

/// Result of walking the object tree: the boolean-participating term (if
/// any - background-tagged subtrees withhold themselves), plus the two
/// rendering-only side channels described in spec §4.4.
#[derive(Default)]
pub struct CsgBuild {
    pub term: Option<Rc<CsgTerm>>,
    pub highlights: Vec<Rc<CsgTerm>>,
    pub background: Vec<Rc<CsgTerm>>,
}

/// Builds a `CsgTerm` tree from an evaluated geometry tree (spec §4.4,
/// `render_csg_term`).
///
/// Threads an accumulated world transform and an inherited color down the
/// tree (`None` means "inherit from parent" - see DESIGN.md for why this
/// replaces the original's `-1`-sentinel color slots). Highlight/background
/// tagged subtrees are diverted into side lists rather than the returned
/// term, matching the "these don't change the boolean result" invariant.
pub fn build_csg_term(root: &GeometryNode) -> CsgBuild {
    let mut build = CsgBuild::default();
    build.term = walk(root, DMat4::IDENTITY, None, &mut build_refs(&mut build));
    build
}

// Helper to let `walk` push into the two side channels without fighting the
// borrow checker over `build.term` at the same time.
fn build_refs(build: &mut CsgBuild) -> (*mut Vec<Rc<CsgTerm>>, *mut Vec<Rc<CsgTerm>>) {
    (&mut build.highlights as *mut _, &mut build.background as *mut _)
}

fn walk(
    node: &GeometryNode,
    matrix: DMat4,
    color: Option<[f32; 4]>,
    side_channels: &mut (*mut Vec<Rc<CsgTerm>>, *mut Vec<Rc<CsgTerm>>),
) -> Option<Rc<CsgTerm>> {
    match node {
        GeometryNode::Empty => None,

        GeometryNode::Translate { offset, child } => {
            let m = matrix * DMat4::from_translation(DVec3::from_array(*offset));
            walk(child, m, color, side_channels)
        }
        GeometryNode::Rotate { angles, child } => {
            let [rx, ry, rz] = *angles;
            let r = DMat4::from_rotation_z(rz.to_radians())
                * DMat4::from_rotation_y(ry.to_radians())
                * DMat4::from_rotation_x(rx.to_radians());
            walk(child, matrix * r, color, side_channels)
        }
        GeometryNode::Scale { factors, child } => {
            let m = matrix * DMat4::from_scale(DVec3::from_array(*factors));
            walk(child, m, color, side_channels)
        }
        GeometryNode::Mirror { normal, child } => {
            let m = matrix * from_ir::mirror_matrix(DVec3::from_array(*normal));
            walk(child, m, color, side_channels)
        }
        GeometryNode::Multmatrix { matrix: m, child } => {
            walk(child, matrix * DMat4::from_cols_array_2d(m), color, side_channels)
        }
        GeometryNode::Color { rgba, child } => walk(child, matrix, Some(rgba_f32(*rgba)), side_channels),

        GeometryNode::Union { children } | GeometryNode::Group { children } => {
            fold(children, matrix, color, side_channels, ChainOp::Union)
        }
        GeometryNode::Difference { children } => fold(children, matrix, color, side_channels, ChainOp::Difference),
        GeometryNode::Intersection { children } => fold(children, matrix, color, side_channels, ChainOp::Intersection),

        GeometryNode::Render { child } => {
            // Force the exact boundary rep now and tessellate it back into a
            // primitive - the preview/exact pipeline seam (spec §4.4).
            let mesh = from_ir::node_to_mesh(child).unwrap_or_else(|_| Mesh::new());
            let label = format!("render#{:p}", child.as_ref());
            Some(CsgTerm::primitive(PolySet::from_mesh(&mesh, child.is_2d()), matrix, color, label))
        }

        GeometryNode::Tagged { tags, child } => {
            if tags.contains(&ModuleTag::Disable) {
                return None;
            }
            let term = walk(child, matrix, color, side_channels);
            if let Some(term) = &term {
                if tags.contains(&ModuleTag::Highlight) {
                    unsafe { (*side_channels.0).push(Rc::clone(term)) };
                }
                if tags.contains(&ModuleTag::Background) {
                    unsafe { (*side_channels.1).push(Rc::clone(term)) };
                    return None;
                }
            }
            term
        }

        // Everything else (primitives, 2-D shapes, extrusions, hull,
        // minkowski, offset, projection, import, surface) is a leaf that
        // produces a finished polygon set in object space.
        other => build_leaf(other, matrix, color),
    }
}

fn fold(
    children: &[GeometryNode],
    matrix: DMat4,
    color: Option<[f32; 4]>,
    side_channels: &mut (*mut Vec<Rc<CsgTerm>>, *mut Vec<Rc<CsgTerm>>),
    op: ChainOp,
) -> Option<Rc<CsgTerm>> {
    let mut terms = children.iter().filter_map(|c| walk(c, matrix, color, side_channels));
    let mut acc = terms.next()?;
    for term in terms {
        acc = Rc::new(match op {
            ChainOp::Union => CsgTerm::Union(acc, term),
            ChainOp::Difference => CsgTerm::Difference(acc, term),
            ChainOp::Intersection => CsgTerm::Intersection(acc, term),
        });
    }
    Some(acc)
}

fn build_leaf(node: &GeometryNode, matrix: DMat4, color: Option<[f32; 4]>) -> Option<Rc<CsgTerm>> {
    if node.is_empty() {
        return None;
    }

    let is2d = node.is_2d();
    let label = leaf_label(node);

    let polyset = match node {
        GeometryNode::Square { size, center } => {
            PolySet::from_polygon2d(&Polygon2D::square(glam::DVec2::new(size[0], size[1]), *center))
        }
        GeometryNode::Circle { radius, fn_ } => {
            PolySet::from_polygon2d(&Polygon2D::circle(*radius, (*fn_).max(3)))
        }
        GeometryNode::Polygon { points, .. } => {
            let outer = points.iter().map(|p| glam::DVec2::new(p[0], p[1])).collect();
            PolySet::from_polygon2d(&Polygon2D::new(outer))
        }
        _ => {
            let mesh = from_ir::node_to_mesh(node).unwrap_or_else(|_| Mesh::new());
            PolySet::from_mesh(&mesh, is2d)
        }
    };

    Some(CsgTerm::primitive(polyset, matrix, color, label))
}

fn leaf_label(node: &GeometryNode) -> String {
    format!("{:p}", node as *const GeometryNode)
}

fn rgba_f32(rgba: [f64; 4]) -> [f32; 4] {
    [rgba[0] as f32, rgba[1] as f32, rgba[2] as f32, rgba[3] as f32]
}
