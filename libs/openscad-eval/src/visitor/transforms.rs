//! # Transform Evaluators
//!
//! Evaluators for geometry transformations.
//!
//! ## Transforms
//!
//! - `translate([x, y, z])` - Move geometry
//! - `rotate([x, y, z])` - Rotate geometry
//! - `scale([x, y, z])` - Scale geometry
//! - `mirror([x, y, z])` - Mirror geometry
//! - `color([r, g, b, a])` - Color geometry
//!
//! ## Example
//!
//! ```rust,ignore
//! let node = eval_translate(&mut ctx, &args, &children)?;
//! ```

use crate::error::EvalError;
use crate::geometry::GeometryNode;
use crate::value::Value;
use openscad_ast::{Argument, Statement};

use super::context::{EvalContext, evaluate_statements};
use super::expressions::eval_expr;

// =============================================================================
// TRANSFORMS
// =============================================================================

/// Evaluate translate() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// translate([x, y, z]) child;
/// translate(v=[x, y, z]) child;
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Translation offset arguments
/// - `children`: Child statements to transform
pub fn eval_translate(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let offset = args.first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?
        .map(|v| v.as_vec3())
        .transpose()?
        .unwrap_or([0.0, 0.0, 0.0]);

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Translate {
        offset,
        child: Box::new(child),
    })
}

/// Evaluate rotate() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// rotate([x, y, z]) child;       // Euler angles in degrees
/// rotate(a) child;               // angle `a` about the Z axis
/// rotate(a, v=[x, y, z]) child;  // angle `a` about axis `v`
/// ```
///
/// A vector `a` rotates by three independent Euler angles (one per axis);
/// a scalar `a` instead rotates once about a single axis - `v` when given,
/// else the Z axis - per `original_source/transform.cc`'s `ROTATE` branch.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Rotation angle(s) and optional axis arguments
/// - `children`: Child statements to transform
pub fn eval_rotate(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let a_value = args.first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?;

    let transform = match a_value {
        None => RotateTransform::Euler([0.0, 0.0, 0.0]),

        // Scalar `a`: single rotation by `a` degrees about axis `v`
        // (default Z), not three Euler rotations.
        Some(Value::Number(a)) => {
            let axis = axis_arg(ctx, args)?.unwrap_or([0.0, 0.0, 1.0]);
            if axis == [0.0, 0.0, 1.0] {
                RotateTransform::Euler([0.0, 0.0, a])
            } else {
                RotateTransform::Matrix(axis_angle_matrix(axis, a))
            }
        }

        // Vector `a`: Euler angles, one axis per component.
        Some(other) => RotateTransform::Euler(other.as_vec3()?),
    };

    let child = evaluate_statements(ctx, children)?;
    Ok(match transform {
        RotateTransform::Euler(angles) => GeometryNode::Rotate { angles, child: Box::new(child) },
        RotateTransform::Matrix(matrix) => GeometryNode::Multmatrix { matrix, child: Box::new(child) },
    })
}

/// Either three independent Euler angles or a general axis-angle rotation
/// matrix, depending on whether `rotate`'s first argument was a vector or
/// a scalar.
enum RotateTransform {
    Euler([f64; 3]),
    Matrix([[f64; 4]; 4]),
}

/// Looks up the `v` axis argument: named `v=...`, or the second positional
/// argument, matching `rotate(a, v)`'s call shape.
fn axis_arg(ctx: &mut EvalContext, args: &[Argument]) -> Result<Option<[f64; 3]>, EvalError> {
    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Positional(expr) if i == 1 => return Ok(Some(eval_expr(ctx, expr)?.as_vec3()?)),
            Argument::Named { name, value } if name == "v" => return Ok(Some(eval_expr(ctx, value)?.as_vec3()?)),
            _ => {}
        }
    }
    Ok(None)
}

/// Builds the rotation-by-`angle_deg`-about-`axis` matrix (Rodrigues'
/// formula via `glam`'s axis-angle constructor). A zero axis is the
/// identity, matching `original_source/transform.cc`'s "leave `node->m`
/// untouched" fallback for a degenerate `v`.
fn axis_angle_matrix(axis: [f64; 3], angle_deg: f64) -> [[f64; 4]; 4] {
    let axis = glam::DVec3::from_array(axis).normalize_or_zero();
    if axis == glam::DVec3::ZERO {
        return glam::DMat4::IDENTITY.to_cols_array_2d();
    }
    glam::DMat4::from_axis_angle(axis, angle_deg.to_radians()).to_cols_array_2d()
}

/// Evaluate scale() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// scale([x, y, z]) child;
/// scale(v=[x, y, z]) child;
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Scale factor arguments
/// - `children`: Child statements to transform
pub fn eval_scale(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let factors = args.first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?
        .map(|v| v.as_vec3())
        .transpose()?
        .unwrap_or([1.0, 1.0, 1.0]);

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Scale {
        factors,
        child: Box::new(child),
    })
}

/// Evaluate mirror() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// mirror([x, y, z]) child;
/// mirror(v=[x, y, z]) child;
/// ```
///
/// The vector specifies the normal of the mirror plane passing through origin.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Mirror plane normal arguments
/// - `children`: Child statements to transform
pub fn eval_mirror(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let normal = args.first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?
        .map(|v| v.as_vec3())
        .transpose()?
        .unwrap_or([1.0, 0.0, 0.0]);

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Mirror {
        normal,
        child: Box::new(child),
    })
}

/// Evaluate color() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// color([r, g, b]) child;
/// color([r, g, b, a]) child;
/// color("colorname") child;  // Not yet supported
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Color arguments (RGBA, 0.0-1.0)
/// - `children`: Child statements to color
pub fn eval_color(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let mut rgba = [1.0, 1.0, 1.0, 1.0];

    if let Some(arg) = args.first() {
        if let Argument::Positional(expr) = arg {
            let value = eval_expr(ctx, expr)?;
            let nums = value.as_number_list()?;
            for (i, n) in nums.iter().take(4).enumerate() {
                rgba[i] = *n;
            }
        }
    }

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Color {
        rgba,
        child: Box::new(child),
    })
}

/// Evaluate multmatrix() call.
///
/// ## OpenSCAD Signature
///
/// ```text
/// multmatrix(m) child;  // m is a 4x4 (or 3x4) row-major matrix
/// ```
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `args`: Matrix argument, a list of 3 or 4 rows of 3-4 numbers each
/// - `children`: Child statements to transform
pub fn eval_multmatrix(
    ctx: &mut EvalContext,
    args: &[Argument],
    children: &[Statement],
) -> Result<GeometryNode, EvalError> {
    let rows = args.first()
        .map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e),
            Argument::Named { value, .. } => eval_expr(ctx, value),
        })
        .transpose()?;

    let mut matrix = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    if let Some(Value::List(row_values)) = rows {
        for (i, row_value) in row_values.iter().take(4).enumerate() {
            if let Ok(row) = row_value.as_number_list() {
                for (j, n) in row.iter().take(4).enumerate() {
                    matrix[i][j] = *n;
                }
            }
        }
    }

    let child = evaluate_statements(ctx, children)?;
    Ok(GeometryNode::Multmatrix {
        matrix,
        child: Box::new(child),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use openscad_ast::Expression;

    fn ctx() -> EvalContext {
        EvalContext::new()
    }

    #[test]
    fn test_eval_translate_default() {
        let mut ctx = ctx();
        let node = eval_translate(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Translate { offset, .. } => {
                assert_eq!(offset, [0.0, 0.0, 0.0]);
            }
            _ => panic!("Expected Translate"),
        }
    }

    #[test]
    fn test_eval_translate_with_offset() {
        let mut ctx = ctx();
        let args = vec![Argument::Positional(Expression::List(vec![
            Expression::Number(1.0),
            Expression::Number(2.0),
            Expression::Number(3.0),
        ]))];
        let node = eval_translate(&mut ctx, &args, &[]).unwrap();
        match node {
            GeometryNode::Translate { offset, .. } => {
                assert_eq!(offset, [1.0, 2.0, 3.0]);
            }
            _ => panic!("Expected Translate"),
        }
    }

    #[test]
    fn test_eval_rotate_default() {
        let mut ctx = ctx();
        let node = eval_rotate(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Rotate { angles, .. } => {
                assert_eq!(angles, [0.0, 0.0, 0.0]);
            }
            _ => panic!("Expected Rotate"),
        }
    }

    #[test]
    fn test_eval_scale_default() {
        let mut ctx = ctx();
        let node = eval_scale(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Scale { factors, .. } => {
                assert_eq!(factors, [1.0, 1.0, 1.0]);
            }
            _ => panic!("Expected Scale"),
        }
    }

    #[test]
    fn test_eval_mirror_default() {
        let mut ctx = ctx();
        let node = eval_mirror(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Mirror { normal, .. } => {
                assert_eq!(normal, [1.0, 0.0, 0.0]);
            }
            _ => panic!("Expected Mirror"),
        }
    }

    #[test]
    fn test_eval_color_default() {
        let mut ctx = ctx();
        let node = eval_color(&mut ctx, &[], &[]).unwrap();
        match node {
            GeometryNode::Color { rgba, .. } => {
                assert_eq!(rgba, [1.0, 1.0, 1.0, 1.0]);
            }
            _ => panic!("Expected Color"),
        }
    }
}
