//! # Geometry Types
//!
//! Evaluated geometry node types representing resolved OpenSCAD geometry.
//!
//! These types have all expressions evaluated - sizes are concrete numbers,
//! transforms are resolved matrices, etc.

use serde::{Deserialize, Serialize};

// =============================================================================
// EVALUATED AST
// =============================================================================

/// Result of AST evaluation.
///
/// Contains the root geometry node and any warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedAst {
    /// Root geometry node.
    pub geometry: GeometryNode,
    /// Evaluation warnings.
    pub warnings: Vec<String>,
}

impl EvaluatedAst {
    /// Create new evaluated AST.
    pub fn new(geometry: GeometryNode) -> Self {
        Self {
            geometry,
            warnings: Vec::new(),
        }
    }

    /// Create with warnings.
    pub fn with_warnings(geometry: GeometryNode, warnings: Vec<String>) -> Self {
        Self { geometry, warnings }
    }
}

// =============================================================================
// GEOMETRY NODE
// =============================================================================

/// A node in the evaluated geometry tree.
///
/// All values are fully resolved (no variables, expressions evaluated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GeometryNode {
    // =========================================================================
    // 3D PRIMITIVES
    // =========================================================================

    /// Cube primitive.
    ///
    /// ## OpenSCAD Equivalent
    /// 
    /// ```text
    /// cube(size);
    /// cube([x, y, z], center=true);
    /// ```
    Cube {
        /// Size as [x, y, z].
        size: [f64; 3],
        /// Whether centered at origin.
        center: bool,
    },

    /// Sphere primitive.
    ///
    /// ## OpenSCAD Equivalent
    ///
    /// ```text
    /// sphere(r=5);
    /// sphere(d=10, $fn=32);
    /// ```
    Sphere {
        /// Radius.
        radius: f64,
        /// Number of fragments ($fn).
        fn_: u32,
    },

    /// Cylinder primitive.
    ///
    /// ## OpenSCAD Equivalent
    ///
    /// ```text
    /// cylinder(h=10, r=5);
    /// cylinder(h=10, r1=5, r2=3, center=true);
    /// ```
    Cylinder {
        /// Height.
        height: f64,
        /// Bottom radius.
        radius1: f64,
        /// Top radius.
        radius2: f64,
        /// Whether centered.
        center: bool,
        /// Number of fragments.
        fn_: u32,
    },

    /// Polyhedron primitive.
    Polyhedron {
        /// Vertex positions.
        points: Vec<[f64; 3]>,
        /// Face indices.
        faces: Vec<Vec<usize>>,
    },

    // =========================================================================
    // 2D PRIMITIVES
    // =========================================================================

    /// Circle primitive.
    Circle {
        /// Radius.
        radius: f64,
        /// Number of fragments.
        fn_: u32,
    },

    /// Square/rectangle primitive.
    Square {
        /// Size as [x, y].
        size: [f64; 2],
        /// Whether centered.
        center: bool,
    },

    /// Polygon primitive.
    Polygon {
        /// Vertex positions.
        points: Vec<[f64; 2]>,
        /// Optional paths.
        paths: Option<Vec<Vec<usize>>>,
    },

    // =========================================================================
    // TRANSFORMS
    // =========================================================================

    /// Translation transform.
    Translate {
        /// Translation vector [x, y, z].
        offset: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Rotation transform.
    Rotate {
        /// Rotation angles [x, y, z] in degrees.
        angles: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Scale transform.
    Scale {
        /// Scale factors [x, y, z].
        factors: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Mirror transform.
    Mirror {
        /// Mirror plane normal.
        normal: [f64; 3],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// General matrix transform.
    Multmatrix {
        /// 4x4 transformation matrix.
        matrix: [[f64; 4]; 4],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Color modifier.
    Color {
        /// RGBA color.
        rgba: [f64; 4],
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    // =========================================================================
    // BOOLEAN OPERATIONS
    // =========================================================================

    /// Union of children.
    Union {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Difference (first child minus rest).
    Difference {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Intersection of children.
    Intersection {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    // =========================================================================
    // EXTRUSIONS
    // =========================================================================

    /// Linear extrusion.
    LinearExtrude {
        /// Extrusion height.
        height: f64,
        /// Twist angle in degrees.
        twist: f64,
        /// Scale at top.
        scale: [f64; 2],
        /// Number of slices.
        slices: u32,
        /// Whether centered.
        center: bool,
        /// Child 2D geometry.
        child: Box<GeometryNode>,
    },

    /// Rotational extrusion.
    RotateExtrude {
        /// Sweep angle in degrees.
        angle: f64,
        /// Number of fragments.
        fn_: u32,
        /// Child 2D geometry.
        child: Box<GeometryNode>,
    },

    // =========================================================================
    // 2D/3D OPERATORS
    // =========================================================================

    /// Convex hull of children.
    Hull {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Minkowski sum of children.
    Minkowski {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// 2D outline offset (inset if `delta` is negative).
    Offset {
        /// Offset distance.
        delta: f64,
        /// Chamfer corners instead of rounding them.
        chamfer: bool,
        /// Number of fragments used to round convex corners.
        fn_: u32,
        /// Child 2D geometry.
        child: Box<GeometryNode>,
    },

    /// Flattens 3D geometry to its 2D silhouette.
    Projection {
        /// Keep only the cross-section at z=0 instead of the full silhouette.
        cut: bool,
        /// Child 3D geometry.
        child: Box<GeometryNode>,
    },

    // =========================================================================
    // IMPORT / MESH DATA
    // =========================================================================

    /// Imported mesh or outline, already resolved to a flat vertex/face table.
    ///
    /// `path` is retained for diagnostics (cache fingerprinting, log messages)
    /// even though the contents have already been loaded.
    Import {
        /// Source file path as written in the `import()` call.
        path: String,
        /// 3D vertex positions (empty for DXF/2D imports).
        points_3d: Vec<[f64; 3]>,
        /// 2D vertex positions (empty for STL/3D imports).
        points_2d: Vec<[f64; 2]>,
        /// Triangle/polygon face indices into `points_3d`.
        faces: Vec<Vec<usize>>,
        /// Closed polygon paths indexing into `points_2d` (DXF import).
        paths: Vec<Vec<usize>>,
    },

    /// Height-field loaded from a `surface()` data file.
    Surface {
        /// Row-major height samples, `rows[y][x]`.
        heights: Vec<Vec<f64>>,
        /// Produce a solid block down to z=0 instead of a thin shell.
        invert: bool,
        /// Center the footprint at the origin.
        center: bool,
    },

    // =========================================================================
    // META
    // =========================================================================

    /// Group of geometries (implicit union).
    Group {
        /// Child geometries.
        children: Vec<GeometryNode>,
    },

    /// Forces full CSG evaluation of its subtree (`render()`), acting as a
    /// normalization barrier rather than a lazily-previewed placeholder.
    Render {
        /// Child geometry.
        child: Box<GeometryNode>,
    },

    /// Attaches preview modifiers (`*`/`!`/`#`/`%`) to a subtree.
    Tagged {
        /// Modifier tags collected from the AST, outermost first.
        tags: Vec<openscad_ast::ModuleTag>,
        /// The modified geometry.
        child: Box<GeometryNode>,
    },

    /// Empty geometry (for conditionals that produce nothing).
    Empty,
}

impl GeometryNode {
    /// Check if this is an empty node.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check if this is a 2D node.
    pub fn is_2d(&self) -> bool {
        matches!(self, Self::Circle { .. } | Self::Square { .. } | Self::Polygon { .. })
    }

    /// Check if this is a 3D node.
    pub fn is_3d(&self) -> bool {
        matches!(
            self,
            Self::Cube { .. }
                | Self::Sphere { .. }
                | Self::Cylinder { .. }
                | Self::Polyhedron { .. }
                | Self::Surface { .. }
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
