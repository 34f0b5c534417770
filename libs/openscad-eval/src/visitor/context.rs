//! # Evaluator Context
//!
//! Core evaluator state and statement evaluation logic.
//!
//! ## Responsibilities
//!
//! - Maintains variable scope for lexical scoping
//! - Collects warnings during evaluation
//! - Evaluates statements (assignments, blocks, loops, conditionals)
//!
//! ## Example
//!
//! ```rust,ignore
//! use crate::visitor::context::EvalContext;
//!
//! let mut ctx = EvalContext::new();
//! ctx.scope.define("x", Value::Number(10.0));
//! ```

use crate::error::EvalError;
use crate::geometry::GeometryNode;
use crate::io;
use crate::scope::Scope;
use crate::value::Value;
use config::constants::FOR_LOOP_MAX_ITERATIONS;
use openscad_ast::{ModuleTag, Statement, Expression, Argument};
use openscad_ast::ast::Parameter;
use std::collections::HashMap;

use super::expressions::eval_expr;
use super::primitives::{eval_cube, eval_sphere, eval_cylinder, eval_circle, eval_square, eval_polygon, eval_polyhedron};
use super::boolean::{eval_union, eval_difference, eval_intersection, eval_hull, eval_minkowski};
use super::transforms::{eval_translate, eval_rotate, eval_scale, eval_mirror, eval_color, eval_multmatrix};
use super::extrusions::{eval_linear_extrude, eval_rotate_extrude};
use super::ops_2d::{eval_offset, eval_projection};

// =============================================================================
// USER-DEFINED FUNCTIONS
// =============================================================================

/// A user-defined function.
///
/// Stores the function's parameters and body expression for later evaluation.
///
/// ## Example
///
/// ```text
/// function double(x) = x * 2;
/// // Stored as: FunctionDef { params: [x], body: x * 2 }
/// ```
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Function parameters.
    pub params: Vec<Parameter>,
    /// Body expression.
    pub body: Expression,
}

// =============================================================================
// USER-DEFINED MODULES
// =============================================================================

/// A user-defined module.
///
/// Stores the module's parameters and body statements for later evaluation.
///
/// ## Example
///
/// ```text
/// module pair(size=10) { cube(size); translate([size,0,0]) cube(size); }
/// // Stored as: ModuleDef { params: [size=10], body: [cube(size); translate(...) cube(size);] }
/// ```
#[derive(Debug, Clone)]
pub struct ModuleDef {
    /// Module parameters.
    pub params: Vec<Parameter>,
    /// Body statements.
    pub body: Vec<Statement>,
}

// =============================================================================
// EVALUATOR CONTEXT
// =============================================================================

/// Evaluation context maintaining state during AST traversal.
///
/// ## Fields
///
/// - `warnings`: Collected warnings during evaluation
/// - `scope`: Variable scope for lexical scoping
/// - `functions`: User-defined functions
pub struct EvalContext {
    /// Collected warnings (undefined variables, unknown modules, etc.).
    pub warnings: Vec<String>,
    /// Variable scope for lexical scoping.
    pub scope: Scope,
    /// User-defined functions.
    pub functions: HashMap<String, FunctionDef>,
    /// User-defined modules.
    pub modules: HashMap<String, ModuleDef>,
    /// Stack of `children()` geometry available to the currently-executing
    /// user module body, innermost call last. Each frame holds the already
    /// -evaluated geometry of the call site's child statements, evaluated in
    /// the caller's scope before the module's own scope was pushed.
    pub children_stack: Vec<Vec<GeometryNode>>,
}

impl EvalContext {
    /// Create new evaluation context with default settings.
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// let ctx = EvalContext::new();
    /// assert!(ctx.warnings.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            scope: Scope::new(),
            functions: HashMap::new(),
            modules: HashMap::new(),
            children_stack: Vec::new(),
        }
    }

    /// Define a user-defined function.
    ///
    /// ## Parameters
    ///
    /// - `name`: Function name
    /// - `params`: Function parameters
    /// - `body`: Body expression
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// ctx.define_function("double", vec![param("x")], expr);
    /// ```
    pub fn define_function(&mut self, name: String, params: Vec<Parameter>, body: Expression) {
        self.functions.insert(name, FunctionDef { params, body });
    }

    /// Get a user-defined function by name.
    pub fn get_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Define a user-defined module.
    pub fn define_module(&mut self, name: String, params: Vec<Parameter>, body: Vec<Statement>) {
        self.modules.insert(name, ModuleDef { params, body });
    }

    /// Get a user-defined module by name.
    pub fn get_module(&self, name: &str) -> Option<&ModuleDef> {
        self.modules.get(name)
    }

    /// Calculate number of fragments for circular shapes.
    ///
    /// Delegates to scope which handles $fn/$fa/$fs calculation.
    ///
    /// ## Parameters
    ///
    /// - `radius`: Radius of the circular shape
    ///
    /// ## Returns
    ///
    /// Number of segments to use (minimum 3)
    pub fn calculate_fragments(&self, radius: f64) -> u32 {
        self.scope.calculate_fragments(radius)
    }

    /// Add a warning message.
    ///
    /// ## Parameters
    ///
    /// - `msg`: Warning message to add
    pub fn warn(&mut self, msg: String) {
        self.warnings.push(msg);
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// STATEMENT EVALUATION
// =============================================================================

/// Evaluate a list of statements.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `statements`: Statements to evaluate
///
/// ## Returns
///
/// Combined geometry from all statements
pub fn evaluate_statements(
    ctx: &mut EvalContext,
    statements: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let mut children = Vec::new();

    for stmt in statements {
        if let Some(node) = evaluate_statement(ctx, stmt)? {
            if !node.is_empty() {
                children.push(node);
            }
        }
    }

    match children.len() {
        0 => Ok(GeometryNode::Empty),
        1 => Ok(children.remove(0)),
        _ => Ok(GeometryNode::Group { children }),
    }
}

/// Evaluate a single statement.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `stmt`: Statement to evaluate
///
/// ## Returns
///
/// Optional geometry node (assignments return None)
pub fn evaluate_statement(
    ctx: &mut EvalContext,
    stmt: &Statement,
) -> Result<Option<GeometryNode>, EvalError> {
    match stmt {
        Statement::ModuleCall { name, args, children, tags, .. } => {
            if tags.contains(&ModuleTag::Disable) {
                return Ok(None);
            }

            // A malformed argument (e.g. `cube("oops")`) degrades to a
            // semantic warning and an empty node for this statement rather
            // than aborting the whole evaluation - siblings still render.
            let node = match evaluate_module_call(ctx, name, args, children) {
                Ok(node) => node,
                Err(err) => {
                    ctx.warn(format!("{}: {}", name, err));
                    None
                }
            };

            Ok(node.map(|n| {
                if tags.is_empty() {
                    n
                } else {
                    GeometryNode::Tagged { tags: tags.clone(), child: Box::new(n) }
                }
            }))
        }
        Statement::Block { statements, .. } => {
            // Block creates a new scope
            ctx.scope.push();
            let result = evaluate_statements(ctx, statements)?;
            ctx.scope.pop();
            Ok(Some(result))
        }
        Statement::Assignment { name, value, .. } => {
            // Evaluate the value and store in scope
            let val = eval_expr(ctx, value)?;
            ctx.scope.define(name, val);
            Ok(None)
        }
        Statement::ForLoop { assignments, body, .. } => {
            evaluate_for_loop(ctx, assignments, body)
        }
        Statement::IfElse { condition, then_body, else_body, .. } => {
            evaluate_if_else(ctx, condition, then_body, else_body.as_deref())
        }
        Statement::FunctionDeclaration { name, params, body, .. } => {
            // Register the function for later evaluation
            ctx.define_function(name.clone(), params.clone(), body.clone());
            Ok(None)
        }
        Statement::ModuleDeclaration { name, params, body, .. } => {
            ctx.define_module(name.clone(), params.clone(), body.clone());
            Ok(None)
        }
    }
}

/// Evaluate a module call.
///
/// Dispatches to the appropriate primitive, boolean, transform, or extrusion evaluator.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `name`: Module name (e.g., "cube", "translate")
/// - `args`: Module arguments
/// - `children`: Child statements
fn evaluate_module_call(
    ctx: &mut EvalContext,
    name: &str,
    args: &[Argument],
    children: &[Statement],
) -> Result<Option<GeometryNode>, EvalError> {
    // User-defined modules shadow built-ins.
    if ctx.get_module(name).is_some() {
        return Ok(Some(eval_user_module(ctx, name, args, children)?));
    }

    match name {
        // 3D Primitives
        "cube" => Ok(Some(eval_cube(ctx, args)?)),
        "sphere" => Ok(Some(eval_sphere(ctx, args)?)),
        "cylinder" => Ok(Some(eval_cylinder(ctx, args)?)),
        "polyhedron" => Ok(Some(eval_polyhedron(ctx, args)?)),

        // 2D Primitives
        "circle" => Ok(Some(eval_circle(ctx, args)?)),
        "square" => Ok(Some(eval_square(ctx, args)?)),
        "polygon" => Ok(Some(eval_polygon(ctx, args)?)),

        // Boolean operations
        "union" => Ok(Some(eval_union(ctx, children)?)),
        "difference" => Ok(Some(eval_difference(ctx, children)?)),
        "intersection" => Ok(Some(eval_intersection(ctx, children)?)),
        "hull" => Ok(Some(eval_hull(ctx, children)?)),
        "minkowski" => Ok(Some(eval_minkowski(ctx, children)?)),

        // Transforms
        "translate" => Ok(Some(eval_translate(ctx, args, children)?)),
        "rotate" => Ok(Some(eval_rotate(ctx, args, children)?)),
        "scale" => Ok(Some(eval_scale(ctx, args, children)?)),
        "mirror" => Ok(Some(eval_mirror(ctx, args, children)?)),
        "multmatrix" => Ok(Some(eval_multmatrix(ctx, args, children)?)),
        "color" => Ok(Some(eval_color(ctx, args, children)?)),

        // Extrusions
        "linear_extrude" => Ok(Some(eval_linear_extrude(ctx, args, children)?)),
        "rotate_extrude" => Ok(Some(eval_rotate_extrude(ctx, args, children)?)),

        // 2D/3D operators
        "offset" => Ok(Some(eval_offset(ctx, args, children)?)),
        "projection" => Ok(Some(eval_projection(ctx, args, children)?)),

        // Forces full CSG evaluation of its subtree instead of a preview placeholder.
        "render" => {
            let child = evaluate_statements(ctx, children)?;
            Ok(Some(GeometryNode::Render { child: Box::new(child) }))
        }

        // children() / children(i) - returns call-site geometry captured before
        // the enclosing module's scope was pushed.
        "children" => eval_children_call(ctx, args),

        // echo(...) - logs its arguments and contributes no geometry.
        "echo" => {
            eval_echo(ctx, args)?;
            Ok(None)
        }

        // assign(name=value, ...) body; - legacy scoped-binding form, still
        // accepted for scripts written against older OpenSCAD releases.
        "assign" => Ok(Some(eval_assign(ctx, args, children)?)),

        // File-backed imports.
        "import" => Ok(Some(eval_import(ctx, args)?)),
        "import_stl" => Ok(Some(eval_import_stl(ctx, args)?)),
        "import_off" => Ok(Some(eval_import_off(ctx, args)?)),
        "surface" => Ok(Some(eval_surface(ctx, args)?)),

        // Unknown module - warn and skip
        _ => {
            ctx.warn(format!("Unknown module: {}", name));
            Ok(None)
        }
    }
}

/// `echo(a, b, ...)` - formats each argument (named arguments as `name = value`)
/// and records it in the log sink; contributes no geometry.
fn eval_echo(ctx: &mut EvalContext, args: &[Argument]) -> Result<(), EvalError> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Argument::Positional(expr) => parts.push(format_echo_value(&eval_expr(ctx, expr)?)),
            Argument::Named { name, value } => {
                parts.push(format!("{} = {}", name, format_echo_value(&eval_expr(ctx, value)?)))
            }
        }
    }
    ctx.warn(format!("ECHO: {}", parts.join(", ")));
    Ok(())
}

fn format_echo_value(value: &Value) -> String {
    match value {
        Value::Undef => "undef".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(format_echo_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Range { start, end, step } => match step {
            Some(s) => format!("[{}:{}:{}]", start, s, end),
            None => format!("[{}:{}]", start, end),
        },
    }
}

/// `assign(name = value, ...) body;` - binds each named argument in a new
/// scope, then evaluates the body statement(s) within it.
fn eval_assign(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    ctx.scope.push();
    for arg in args {
        if let Argument::Named { name, value } = arg {
            let val = eval_expr(ctx, value)?;
            ctx.scope.define(name, val);
        }
    }
    let result = evaluate_statements(ctx, children);
    ctx.scope.pop();
    result
}

fn string_arg(ctx: &mut EvalContext, args: &[Argument], name: &str, position: usize) -> Result<Option<String>, EvalError> {
    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) if i == position => return Ok(Some(eval_expr(ctx, expr)?.as_string()?.to_string())),
            Argument::Named { name: arg_name, value } if arg_name == name => {
                return Ok(Some(eval_expr(ctx, value)?.as_string()?.to_string()))
            }
            _ => {}
        }
    }
    Ok(None)
}

fn bool_arg(ctx: &mut EvalContext, args: &[Argument], name: &str, position: usize, default: bool) -> Result<bool, EvalError> {
    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) if i == position => return Ok(eval_expr(ctx, expr)?.as_boolean()),
            Argument::Named { name: arg_name, value } if arg_name == name => return Ok(eval_expr(ctx, value)?.as_boolean()),
            _ => {}
        }
    }
    Ok(default)
}

/// `import(file = "...", convexity = 1)` - dispatches on file extension;
/// `.stl` reads a mesh, `.dxf` reads a 2D outline, `.off` warns (unsupported).
fn eval_import(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let Some(path) = string_arg(ctx, args, "file", 0)? else {
        ctx.warn("import: missing file argument".to_string());
        return Ok(GeometryNode::Empty);
    };

    let lower = path.to_lowercase();
    if lower.ends_with(".stl") {
        import_stl_from_path(ctx, &path)
    } else if lower.ends_with(".dxf") {
        import_dxf_from_path(ctx, &path)
    } else if lower.ends_with(".off") {
        ctx.warn(io::off::unsupported_warning(&path));
        Ok(GeometryNode::Empty)
    } else {
        ctx.warn(format!("import: unrecognized file type `{}'", path));
        Ok(GeometryNode::Empty)
    }
}

fn eval_import_stl(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let Some(path) = string_arg(ctx, args, "filename", 0)? else {
        ctx.warn("import_stl: missing filename argument".to_string());
        return Ok(GeometryNode::Empty);
    };
    import_stl_from_path(ctx, &path)
}

fn eval_import_off(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let path = string_arg(ctx, args, "filename", 0)?.unwrap_or_default();
    ctx.warn(io::off::unsupported_warning(&path));
    Ok(GeometryNode::Empty)
}

fn import_stl_from_path(ctx: &mut EvalContext, path: &str) -> Result<GeometryNode, EvalError> {
    match io::stl::read_file(path) {
        Ok((triangles, warnings)) => {
            for w in warnings {
                ctx.warn(w);
            }
            let mut points_3d = Vec::with_capacity(triangles.len() * 3);
            let mut faces = Vec::with_capacity(triangles.len());
            for tri in triangles {
                let base = points_3d.len();
                points_3d.push(tri[0]);
                points_3d.push(tri[1]);
                points_3d.push(tri[2]);
                faces.push(vec![base, base + 1, base + 2]);
            }
            Ok(GeometryNode::Import { path: path.to_string(), points_3d, points_2d: Vec::new(), faces, paths: Vec::new() })
        }
        Err(err) => {
            ctx.warn(err.to_string());
            Ok(GeometryNode::Empty)
        }
    }
}

fn import_dxf_from_path(ctx: &mut EvalContext, path: &str) -> Result<GeometryNode, EvalError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            ctx.warn(format!("Can't open DXF file `{}': {}", path, e));
            return Ok(GeometryNode::Empty);
        }
    };

    let opts = io::dxf::DxfOptions { fn_: ctx.scope.fn_value(), fa_: ctx.scope.fa_value(), fs_: ctx.scope.fs_value(), ..Default::default() };
    let (data, warnings) = io::dxf::parse(&content, &opts);
    for w in warnings {
        ctx.warn(w);
    }

    let mut points_2d = Vec::new();
    let mut paths = Vec::new();
    for path_data in &data.paths {
        let start = points_2d.len();
        points_2d.extend(path_data.points.iter().copied());
        paths.push((start..points_2d.len()).collect());
    }

    Ok(GeometryNode::Import { path: path.to_string(), points_3d: Vec::new(), points_2d, faces: Vec::new(), paths })
}

/// `surface(file = "...", center = false, convexity = 1)` - loads a
/// whitespace-delimited ASCII height grid as a `GeometryNode::Surface`.
fn eval_surface(ctx: &mut EvalContext, args: &[Argument]) -> Result<GeometryNode, EvalError> {
    let Some(path) = string_arg(ctx, args, "file", 0)? else {
        ctx.warn("surface: missing file argument".to_string());
        return Ok(GeometryNode::Empty);
    };
    let center = bool_arg(ctx, args, "center", 1, false)?;

    match io::surface::read_file(&path) {
        Ok(heights) => Ok(GeometryNode::Surface { heights, invert: false, center }),
        Err(err) => {
            ctx.warn(err.to_string());
            Ok(GeometryNode::Empty)
        }
    }
}

/// Evaluate a call to a user-defined module.
///
/// Arguments and call-site children are evaluated in the caller's scope, then
/// pushed as a `children_stack` frame so the module body can retrieve them via
/// `children()`/`children(i)` before the module's own scope (with bound
/// parameters) is entered.
fn eval_user_module(
    ctx: &mut EvalContext,
    name: &str,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let module = ctx.get_module(name).cloned().expect("checked by caller");

    // Evaluate call-site children in the caller's scope before entering the
    // module body's scope. A block body like `foo() { a(); b(); }` is
    // flattened so `children(0)`/`children(1)` index `a()`/`b()` directly.
    let mut child_nodes = Vec::new();
    let flattened: Vec<&Statement> = match children {
        [Statement::Block { statements, .. }] => statements.iter().collect(),
        other => other.iter().collect(),
    };
    for stmt in flattened {
        if let Some(node) = evaluate_statement(ctx, stmt)? {
            if !node.is_empty() {
                child_nodes.push(node);
            }
        }
    }

    // Bind parameters: named arguments take priority, then positional by
    // index, then the parameter's default expression, then Undef.
    let mut bound = vec![None; module.params.len()];
    let mut next_positional = 0;

    for arg in args {
        match arg {
            Argument::Named { name: arg_name, value } => {
                if let Some(idx) = module.params.iter().position(|p| &p.name == arg_name) {
                    bound[idx] = Some(eval_expr(ctx, value)?);
                }
            }
            Argument::Positional(value) => {
                while next_positional < bound.len() && bound[next_positional].is_some() {
                    next_positional += 1;
                }
                if next_positional < bound.len() {
                    bound[next_positional] = Some(eval_expr(ctx, value)?);
                    next_positional += 1;
                }
            }
        }
    }

    ctx.children_stack.push(child_nodes);
    ctx.scope.push();

    for (param, value) in module.params.iter().zip(bound.into_iter()) {
        let resolved = match value {
            Some(v) => v,
            None => match &param.default {
                Some(default_expr) => eval_expr(ctx, default_expr)?,
                None => Value::Undef,
            },
        };
        ctx.scope.define(&param.name, resolved);
    }

    let result = evaluate_statements(ctx, &module.body);

    ctx.scope.pop();
    ctx.children_stack.pop();

    result
}

/// Evaluate `children()` (all call-site children) or `children(i)` (the i-th
/// call-site child) inside a user-defined module body.
fn eval_children_call(
    ctx: &mut EvalContext,
    args: &[Argument],
) -> Result<Option<GeometryNode>, EvalError> {
    let Some(frame) = ctx.children_stack.last() else {
        return Ok(None);
    };

    if let Some(arg) = args.first() {
        let index_expr = match arg {
            Argument::Positional(e) => e,
            Argument::Named { value, .. } => value,
        };
        let index = eval_expr(ctx, index_expr)?.as_number().unwrap_or(-1.0) as isize;
        if index < 0 {
            return Ok(None);
        }
        return Ok(frame.get(index as usize).cloned());
    }

    match frame.len() {
        0 => Ok(None),
        1 => Ok(Some(frame[0].clone())),
        _ => Ok(Some(GeometryNode::Group { children: frame.clone() })),
    }
}

// =============================================================================
// CONTROL FLOW
// =============================================================================

/// Evaluate a for loop.
///
/// Iterates the Cartesian product of every named assignment's sequence, one
/// nested scope per variable - `for (x = [0:1], y = [0:1])` visits all four
/// `(x, y)` combinations, innermost variable varying fastest. A later
/// assignment's range expression is evaluated after earlier variables are
/// already bound, so `for (x = [0:2], y = [0:x])` sees the current `x`.
///
/// ## Example
///
/// ```text
/// for (i = [0:2]) cube(i);  // Creates 3 cubes
/// ```
fn evaluate_for_loop(
    ctx: &mut EvalContext,
    assignments: &[(String, Expression)],
    body: &[Statement],
) -> Result<Option<GeometryNode>, EvalError> {
    let mut children = Vec::new();
    for_loop_cartesian(ctx, assignments, body, &mut children)?;

    match children.len() {
        0 => Ok(None),
        1 => Ok(Some(children.remove(0))),
        _ => Ok(Some(GeometryNode::Group { children })),
    }
}

fn for_loop_cartesian(
    ctx: &mut EvalContext,
    assignments: &[(String, Expression)],
    body: &[Statement],
    out: &mut Vec<GeometryNode>,
) -> Result<(), EvalError> {
    let Some(((var_name, range_expr), rest)) = assignments.split_first() else {
        if let Ok(node) = evaluate_statements(ctx, body) {
            if !node.is_empty() {
                out.push(node);
            }
        }
        return Ok(());
    };

    let range_val = eval_expr(ctx, range_expr)?;
    let values = for_loop_values(ctx, &range_val);

    for val in values {
        ctx.scope.push();
        ctx.scope.define(var_name, val);
        for_loop_cartesian(ctx, rest, body, out)?;
        ctx.scope.pop();
    }

    Ok(())
}

/// Expands a single `for` assignment's evaluated range expression into its
/// iteration sequence: a list iterates its elements, a range expands
/// numerically (truncated at `FOR_LOOP_MAX_ITERATIONS`), anything else is
/// treated as a single-element sequence.
fn for_loop_values(ctx: &mut EvalContext, range_val: &Value) -> Vec<Value> {
    match range_val {
        Value::List(items) => items.clone(),
        Value::Range { start, end, step } => {
            let mut vals = Vec::new();
            let mut current = *start;
            let step_val = step.unwrap_or(1.0);
            // Ranges iterate inclusively; accumulated floating-point error
            // in `current` can push it just past `end` on the final step
            // (e.g. `[0:0.1:1]`), so the bound check tolerates an error of
            // up to one EPSILON-scaled step.
            let tolerance = step_val.abs() * config::constants::EPSILON;
            if step_val > 0.0 {
                while current <= *end + tolerance && vals.len() < FOR_LOOP_MAX_ITERATIONS {
                    vals.push(Value::Number(current));
                    current += step_val;
                }
            } else if step_val < 0.0 {
                while current >= *end - tolerance && vals.len() < FOR_LOOP_MAX_ITERATIONS {
                    vals.push(Value::Number(current));
                    current += step_val;
                }
            }
            if vals.len() == FOR_LOOP_MAX_ITERATIONS {
                ctx.warn(format!(
                    "for loop over [{}:{}:{}] exceeded {} iterations, truncated",
                    start, step_val, end, FOR_LOOP_MAX_ITERATIONS
                ));
            }
            vals
        }
        other => vec![other.clone()],
    }
}

/// Evaluate an if/else statement.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `condition`: Condition expression
/// - `then_body`: Statements if condition is true
/// - `else_body`: Optional statements if condition is false
fn evaluate_if_else(
    ctx: &mut EvalContext,
    condition: &Expression,
    then_body: &[Statement],
    else_body: Option<&[Statement]>,
) -> Result<Option<GeometryNode>, EvalError> {
    let cond_val = eval_expr(ctx, condition)?;
    
    if cond_val.as_boolean() {
        ctx.scope.push();
        let result = evaluate_statements(ctx, then_body)?;
        ctx.scope.pop();
        Ok(Some(result))
    } else if let Some(else_stmts) = else_body {
        ctx.scope.push();
        let result = evaluate_statements(ctx, else_stmts)?;
        ctx.scope.pop();
        Ok(Some(result))
    } else {
        Ok(None)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = EvalContext::new();
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn test_context_warn() {
        let mut ctx = EvalContext::new();
        ctx.warn("Test warning".to_string());
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn test_context_fragments() {
        let ctx = EvalContext::new();
        let fragments = ctx.calculate_fragments(10.0);
        assert!(fragments >= 3);
    }

    #[test]
    fn test_import_stl_reads_ascii_file() {
        let path = std::env::temp_dir().join("openscad_eval_test_cube.stl");
        std::fs::write(
            &path,
            "solid cube\nfacet normal 0 0 1\n outer loop\n  vertex 0 0 0\n  vertex 1 0 0\n  vertex 0 1 0\n endloop\nendfacet\nendsolid cube\n",
        )
        .unwrap();

        let mut ctx = EvalContext::new();
        let args = vec![Argument::Named {
            name: "filename".to_string(),
            value: Expression::String(path.to_string_lossy().to_string()),
        }];
        let node = eval_import_stl(&mut ctx, &args).unwrap();
        std::fs::remove_file(&path).ok();

        match node {
            GeometryNode::Import { points_3d, faces, .. } => {
                assert_eq!(points_3d.len(), 3);
                assert_eq!(faces.len(), 1);
            }
            other => panic!("Expected Import, got {:?}", other),
        }
    }

    #[test]
    fn test_surface_reads_height_grid() {
        let path = std::env::temp_dir().join("openscad_eval_test_surface.dat");
        std::fs::write(&path, "0 0 0\n0 1 0\n0 0 0\n").unwrap();

        let mut ctx = EvalContext::new();
        let args = vec![Argument::Named {
            name: "file".to_string(),
            value: Expression::String(path.to_string_lossy().to_string()),
        }];
        let node = eval_surface(&mut ctx, &args).unwrap();
        std::fs::remove_file(&path).ok();

        match node {
            GeometryNode::Surface { heights, .. } => assert_eq!(heights.len(), 3),
            other => panic!("Expected Surface, got {:?}", other),
        }
    }

    #[test]
    fn test_import_missing_file_warns_and_yields_empty() {
        let mut ctx = EvalContext::new();
        let args = vec![Argument::Named {
            name: "filename".to_string(),
            value: Expression::String("/nonexistent/path/does-not-exist.stl".to_string()),
        }];
        let node = eval_import_stl(&mut ctx, &args).unwrap();
        assert!(node.is_empty());
        assert!(!ctx.warnings.is_empty());
    }
}
