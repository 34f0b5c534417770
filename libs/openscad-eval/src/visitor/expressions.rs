//! # Expression Evaluation
//!
//! Evaluates OpenSCAD expressions to runtime values.
//!
//! ## Responsibilities
//!
//! - Literal evaluation (numbers, booleans, strings)
//! - Variable and special variable lookup
//! - Binary and unary operations
//! - Function calls (built-in functions)
//! - List and range expressions
//!
//! ## Example
//!
//! ```rust,ignore
//! use crate::visitor::expressions::eval_expr;
//!
//! let value = eval_expr(&mut ctx, &Expression::Number(42.0))?;
//! assert_eq!(value, Value::Number(42.0));
//! ```

use crate::error::EvalError;
use crate::value::Value;
use openscad_ast::{Expression, Argument, BinaryOp, UnaryOp};

use super::context::EvalContext;

// =============================================================================
// EXPRESSION EVALUATION
// =============================================================================

/// Evaluate an expression to a value.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `expr`: Expression to evaluate
///
/// ## Returns
///
/// Evaluated value
///
/// ## Example
///
/// ```rust,ignore
/// let result = eval_expr(&mut ctx, &Expression::Number(5.0))?;
/// assert_eq!(result, Value::Number(5.0));
/// ```
pub fn eval_expr(ctx: &mut EvalContext, expr: &Expression) -> Result<Value, EvalError> {
    match expr {
        Expression::Number(n) => Ok(Value::Number(*n)),
        Expression::Boolean(b) => Ok(Value::Boolean(*b)),
        Expression::String(s) => Ok(Value::String(s.clone())),
        Expression::Undef => Ok(Value::Undef),
        Expression::Identifier(name) => eval_identifier(ctx, name),
        Expression::SpecialVariable(name) => eval_special_var(ctx, name),
        Expression::List(items) => eval_list(ctx, items),
        Expression::Range { start, end, step } => eval_range(ctx, start, end, step.as_deref()),
        Expression::BinaryOp { op, left, right } => eval_binary_op(ctx, *op, left, right),
        Expression::UnaryOp { op, operand } => eval_unary_op(ctx, *op, operand),
        Expression::Ternary { condition, then_expr, else_expr } => {
            eval_ternary(ctx, condition, then_expr, else_expr)
        }
        Expression::FunctionCall { name, args } => eval_function_call(ctx, name, args),
        Expression::Index { object, index } => eval_index(ctx, object, index),
        Expression::Member { object, member } => eval_member(ctx, object, member),
    }
}

// =============================================================================
// VARIABLE EVALUATION
// =============================================================================

/// Evaluate a special variable ($fn, $fa, $fs, etc.).
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `name`: Variable name (e.g., "$fn")
///
/// ## Returns
///
/// Variable value or Undef if not found
fn eval_special_var(ctx: &EvalContext, name: &str) -> Result<Value, EvalError> {
    // Look up in scope first
    if let Some(val) = ctx.scope.get(name) {
        return Ok(val.clone());
    }
    // Return undef for unknown special variables
    Ok(Value::Undef)
}

/// Evaluate an identifier (variable reference).
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `name`: Variable name
///
/// ## Returns
///
/// Variable value or Undef if not defined (with warning)
fn eval_identifier(ctx: &mut EvalContext, name: &str) -> Result<Value, EvalError> {
    if let Some(val) = ctx.scope.get(name) {
        Ok(val.clone())
    } else {
        // Undefined variable returns undef (OpenSCAD behavior)
        ctx.warn(format!("Undefined variable: {}", name));
        Ok(Value::Undef)
    }
}

// =============================================================================
// COMPOUND EXPRESSIONS
// =============================================================================

/// Evaluate a list expression.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `items`: List items
fn eval_list(ctx: &mut EvalContext, items: &[Expression]) -> Result<Value, EvalError> {
    let values: Result<Vec<_>, _> = items.iter()
        .map(|e| eval_expr(ctx, e))
        .collect();
    Ok(Value::List(values?))
}

/// Evaluate a range expression.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `start`: Start expression
/// - `end`: End expression
/// - `step`: Optional step expression
fn eval_range(
    ctx: &mut EvalContext,
    start: &Expression,
    end: &Expression,
    step: Option<&Expression>,
) -> Result<Value, EvalError> {
    let s = eval_expr(ctx, start)?;
    let e = eval_expr(ctx, end)?;
    let st = step.map(|x| eval_expr(ctx, x)).transpose()?;

    match (s.as_number(), e.as_number()) {
        (Ok(s), Ok(e)) => {
            let st = match st {
                Some(v) => match v.as_number() {
                    Ok(n) => Some(n),
                    Err(_) => return Ok(Value::Undef),
                },
                None => None,
            };
            Ok(Value::Range { start: s, end: e, step: st })
        }
        _ => Ok(Value::Undef),
    }
}

/// Evaluate a ternary expression.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `condition`: Condition expression
/// - `then_expr`: Expression if true
/// - `else_expr`: Expression if false
fn eval_ternary(
    ctx: &mut EvalContext,
    condition: &Expression,
    then_expr: &Expression,
    else_expr: &Expression,
) -> Result<Value, EvalError> {
    if eval_expr(ctx, condition)?.as_boolean() {
        eval_expr(ctx, then_expr)
    } else {
        eval_expr(ctx, else_expr)
    }
}

/// Evaluate index access (e.g., arr[0]).
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `object`: Object to index
/// - `index`: Index expression
fn eval_index(
    ctx: &mut EvalContext,
    object: &Expression,
    index: &Expression,
) -> Result<Value, EvalError> {
    let obj = eval_expr(ctx, object)?;
    let idx = match eval_expr(ctx, index)?.as_number() {
        Ok(n) if n >= 0.0 => n as usize,
        _ => return Ok(Value::Undef),
    };
    match obj {
        Value::List(items) => Ok(items.get(idx).cloned().unwrap_or(Value::Undef)),
        Value::String(s) => Ok(s
            .chars()
            .nth(idx)
            .map(|c| Value::String(c.to_string()))
            .unwrap_or(Value::Undef)),
        _ => Ok(Value::Undef),
    }
}

/// Evaluate member access (e.g., vec.x).
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `object`: Object to access
/// - `member`: Member name
fn eval_member(
    ctx: &mut EvalContext,
    object: &Expression,
    member: &str,
) -> Result<Value, EvalError> {
    let obj = eval_expr(ctx, object)?;
    let idx = match member {
        "x" => 0,
        "y" => 1,
        "z" => 2,
        _ => return Ok(Value::Undef),
    };
    match obj {
        Value::List(items) => Ok(items.get(idx).cloned().unwrap_or(Value::Undef)),
        _ => Ok(Value::Undef),
    }
}

// =============================================================================
// OPERATORS
// =============================================================================

/// Evaluate a binary operation.
///
/// ## Supported Operations
///
/// - Arithmetic: +, -, *, /, %, ^
/// - Comparison: <, >, <=, >=, ==, !=
/// - Logical: &&, ||
fn eval_binary_op(
    ctx: &mut EvalContext,
    op: BinaryOp,
    left: &Expression,
    right: &Expression,
) -> Result<Value, EvalError> {
    let l = eval_expr(ctx, left)?;
    let r = eval_expr(ctx, right)?;

    // Arithmetic and comparison never trap: a type mismatch degrades to
    // `Undef` (which the geometry evaluator then reports as a warning at
    // the call site that actually needed a number), matching how OpenSCAD
    // keeps evaluating the rest of the document past a bad expression.
    use std::cmp::Ordering;
    Ok(match op {
        BinaryOp::Add => l.add(&r),
        BinaryOp::Sub => l.sub(&r),
        BinaryOp::Mul => l.mul(&r),
        BinaryOp::Div => l.div(&r),
        BinaryOp::Mod => l.modulo(&r),
        BinaryOp::Pow => l.pow(&r),
        BinaryOp::Lt => l.compare(&r).map(|o| o == Ordering::Less).map(Value::Boolean).unwrap_or(Value::Undef),
        BinaryOp::Gt => l.compare(&r).map(|o| o == Ordering::Greater).map(Value::Boolean).unwrap_or(Value::Undef),
        BinaryOp::Le => l.compare(&r).map(|o| o != Ordering::Greater).map(Value::Boolean).unwrap_or(Value::Undef),
        BinaryOp::Ge => l.compare(&r).map(|o| o != Ordering::Less).map(Value::Boolean).unwrap_or(Value::Undef),
        BinaryOp::Eq => Value::Boolean(l == r),
        BinaryOp::Ne => Value::Boolean(l != r),
        BinaryOp::And => Value::Boolean(l.as_boolean() && r.as_boolean()),
        BinaryOp::Or => Value::Boolean(l.as_boolean() || r.as_boolean()),
    })
}

/// Evaluate a unary operation.
///
/// ## Supported Operations
///
/// - Negation: -x
/// - Logical not: !x
/// - Positive: +x
fn eval_unary_op(
    ctx: &mut EvalContext,
    op: UnaryOp,
    operand: &Expression,
) -> Result<Value, EvalError> {
    let v = eval_expr(ctx, operand)?;
    Ok(match op {
        UnaryOp::Neg => v.neg(),
        UnaryOp::Not => Value::Boolean(!v.as_boolean()),
        UnaryOp::Pos => v,
    })
}

// =============================================================================
// BUILT-IN FUNCTIONS
// =============================================================================

/// Evaluate a function call.
///
/// ## Evaluation Order
///
/// 1. User-defined functions (defined with `function name(params) = expr;`)
/// 2. Built-in functions (sin, cos, abs, etc.)
///
/// ## Supported Built-in Functions
///
/// - Trigonometric: sin, cos, tan
/// - Math: abs, sqrt, floor, ceil, round
/// - List: len
fn eval_function_call(
    ctx: &mut EvalContext,
    name: &str,
    args: &[Argument],
) -> Result<Value, EvalError> {
    // First, check for user-defined functions
    if let Some(func) = ctx.get_function(name).cloned() {
        return eval_user_function(ctx, &func, args);
    }

    // Evaluate arguments for built-in functions
    let arg_values: Vec<_> = args.iter()
        .filter_map(|a| match a {
            Argument::Positional(e) => eval_expr(ctx, e).ok(),
            Argument::Named { value, .. } => eval_expr(ctx, value).ok(),
        })
        .collect();

    match name {
        // Trigonometric (angles in degrees)
        "sin" => {
            let angle = arg_values.first()
                .map(|v| v.as_number().unwrap_or(0.0).to_radians().sin())
                .unwrap_or(0.0);
            Ok(Value::Number(angle))
        }
        "cos" => {
            let angle = arg_values.first()
                .map(|v| v.as_number().unwrap_or(0.0).to_radians().cos())
                .unwrap_or(0.0);
            Ok(Value::Number(angle))
        }
        "tan" => {
            let angle = arg_values.first()
                .map(|v| v.as_number().unwrap_or(0.0).to_radians().tan())
                .unwrap_or(0.0);
            Ok(Value::Number(angle))
        }
        "asin" => {
            let val = arg_values.first().map(|v| v.as_number().unwrap_or(0.0).asin().to_degrees()).unwrap_or(0.0);
            Ok(Value::Number(val))
        }
        "acos" => {
            let val = arg_values.first().map(|v| v.as_number().unwrap_or(0.0).acos().to_degrees()).unwrap_or(0.0);
            Ok(Value::Number(val))
        }
        "atan" => {
            let val = arg_values.first().map(|v| v.as_number().unwrap_or(0.0).atan().to_degrees()).unwrap_or(0.0);
            Ok(Value::Number(val))
        }
        "atan2" => {
            let y = arg_values.first().map(|v| v.as_number().unwrap_or(0.0)).unwrap_or(0.0);
            let x = arg_values.get(1).map(|v| v.as_number().unwrap_or(0.0)).unwrap_or(0.0);
            Ok(Value::Number(y.atan2(x).to_degrees()))
        }

        // Math functions
        "abs" => {
            let val = arg_values.first()
                .map(|v| v.as_number().unwrap_or(0.0).abs())
                .unwrap_or(0.0);
            Ok(Value::Number(val))
        }
        "sqrt" => {
            let val = arg_values.first()
                .map(|v| v.as_number().unwrap_or(0.0).sqrt())
                .unwrap_or(0.0);
            Ok(Value::Number(val))
        }
        "floor" => {
            let val = arg_values.first()
                .map(|v| v.as_number().unwrap_or(0.0).floor())
                .unwrap_or(0.0);
            Ok(Value::Number(val))
        }
        "ceil" => {
            let val = arg_values.first()
                .map(|v| v.as_number().unwrap_or(0.0).ceil())
                .unwrap_or(0.0);
            Ok(Value::Number(val))
        }
        "round" => {
            let val = arg_values.first()
                .map(|v| v.as_number().unwrap_or(0.0).round())
                .unwrap_or(0.0);
            Ok(Value::Number(val))
        }
        
        // List functions
        "len" => {
            match arg_values.first() {
                Some(Value::List(l)) => Ok(Value::Number(l.len() as f64)),
                Some(Value::String(s)) => Ok(Value::Number(s.len() as f64)),
                _ => Ok(Value::Undef),
            }
        }

        // DXF measurement functions - read a .dxf file off disk and report a
        // dimension's value or the intersection point of two crossing paths.
        "dxf_dim" => {
            let (content, opts, dim_name) = match dxf_arg_bundle(ctx, args, true)? {
                Some(bundle) => bundle,
                None => return Ok(Value::Undef),
            };
            match crate::io::dxf::dxf_dim(&content, &opts, dim_name.as_deref()) {
                Ok((result, warnings)) => {
                    for w in warnings {
                        ctx.warn(w);
                    }
                    Ok(result.map(Value::Number).unwrap_or(Value::Undef))
                }
                Err(e) => {
                    ctx.warn(format!("dxf_dim: {}", e));
                    Ok(Value::Undef)
                }
            }
        }
        "dxf_cross" => {
            let (content, opts, _) = match dxf_arg_bundle(ctx, args, false)? {
                Some(bundle) => bundle,
                None => return Ok(Value::Undef),
            };
            match crate::io::dxf::dxf_cross(&content, &opts) {
                Ok((result, warnings)) => {
                    for w in warnings {
                        ctx.warn(w);
                    }
                    Ok(result
                        .map(|[x, y]| Value::List(vec![Value::Number(x), Value::Number(y)]))
                        .unwrap_or(Value::Undef))
                }
                Err(e) => {
                    ctx.warn(format!("dxf_cross: {}", e));
                    Ok(Value::Undef)
                }
            }
        }

        // Unknown function
        _ => {
            ctx.warn(format!("Unknown function: {}", name));
            Ok(Value::Undef)
        }
    }
}

/// Find an argument by name, falling back to its positional index.
/// Mirrors the named-or-positional convention `dxf_dim`/`dxf_cross` use for
/// `file`, `layer`, `name`, `origin`, `scale`.
pub(crate) fn named_or_positional_expr<'a>(
    args: &'a [Argument],
    name: &str,
    position: usize,
) -> Option<&'a Expression> {
    for arg in args {
        if let Argument::Named { name: n, value } = arg {
            if n == name {
                return Some(value);
            }
        }
    }
    args.iter()
        .filter_map(|a| match a {
            Argument::Positional(e) => Some(e),
            Argument::Named { .. } => None,
        })
        .nth(position)
}

/// Evaluate the shared `dxf_dim(file, layer, name, origin, scale)` /
/// `dxf_cross(file, layer, origin, scale)` argument list and load the file
/// contents. Returns `None` (with a warning already recorded) if no file
/// could be read - callers should then yield `Value::Undef`.
fn dxf_arg_bundle(
    ctx: &mut EvalContext,
    args: &[Argument],
    with_name: bool,
) -> Result<Option<(String, crate::io::dxf::DxfOptions, Option<String>)>, EvalError> {
    let file = match named_or_positional_expr(args, "file", 0) {
        Some(e) => eval_expr(ctx, e)?,
        None => {
            ctx.warn("dxf_dim/dxf_cross: missing file argument".to_string());
            return Ok(None);
        }
    };
    let file = match file.as_string() {
        Ok(s) => s.to_string(),
        Err(_) => {
            ctx.warn("dxf_dim/dxf_cross: file argument must be a string".to_string());
            return Ok(None);
        }
    };

    let layer = named_or_positional_expr(args, "layer", 1)
        .map(|e| eval_expr(ctx, e))
        .transpose()?
        .and_then(|v| v.as_string().ok().map(|s| s.to_string()));

    let dim_name = if with_name {
        named_or_positional_expr(args, "name", 2)
            .map(|e| eval_expr(ctx, e))
            .transpose()?
            .and_then(|v| v.as_string().ok().map(|s| s.to_string()))
    } else {
        None
    };
    let origin_pos = if with_name { 3 } else { 2 };
    let scale_pos = if with_name { 4 } else { 3 };

    let origin = named_or_positional_expr(args, "origin", origin_pos)
        .map(|e| eval_expr(ctx, e))
        .transpose()?;
    let (x_origin, y_origin) = match origin {
        Some(Value::List(items)) if items.len() == 2 => (
            items[0].as_number().unwrap_or(0.0),
            items[1].as_number().unwrap_or(0.0),
        ),
        _ => (0.0, 0.0),
    };

    let scale = named_or_positional_expr(args, "scale", scale_pos)
        .map(|e| eval_expr(ctx, e))
        .transpose()?
        .and_then(|v| v.as_number().ok())
        .unwrap_or(1.0);

    let opts = crate::io::dxf::DxfOptions {
        layer,
        x_origin,
        y_origin,
        scale,
        fn_: ctx.scope.fn_value(),
        fa_: ctx.scope.fa_value(),
        fs_: ctx.scope.fs_value(),
    };

    match std::fs::read_to_string(&file) {
        Ok(content) => Ok(Some((content, opts, dim_name))),
        Err(e) => {
            ctx.warn(format!("dxf_dim/dxf_cross: cannot read `{}': {}", file, e));
            Ok(None)
        }
    }
}

// =============================================================================
// USER-DEFINED FUNCTIONS
// =============================================================================

/// Evaluate a user-defined function call.
///
/// Creates a new scope with the function parameters bound to argument values,
/// then evaluates the function body expression.
///
/// ## Parameters
///
/// - `ctx`: Evaluation context
/// - `func`: The user-defined function definition
/// - `args`: Arguments passed to the function
///
/// ## Example
///
/// ```text
/// function double(x) = x * 2;
/// double(5);  // Returns 10
/// ```
fn eval_user_function(
    ctx: &mut EvalContext,
    func: &super::context::FunctionDef,
    args: &[Argument],
) -> Result<Value, EvalError> {
    // Evaluate all arguments first
    let mut arg_values: Vec<Value> = Vec::new();
    let mut named_args: std::collections::HashMap<String, Value> = std::collections::HashMap::new();

    for arg in args {
        match arg {
            Argument::Positional(e) => {
                arg_values.push(eval_expr(ctx, e)?);
            }
            Argument::Named { name, value } => {
                named_args.insert(name.clone(), eval_expr(ctx, value)?);
            }
        }
    }

    // Create a new scope for function evaluation
    ctx.scope.push();

    // Bind parameters to arguments
    for (i, param) in func.params.iter().enumerate() {
        // Check for named argument first
        let value = if let Some(v) = named_args.get(&param.name) {
            v.clone()
        } else if i < arg_values.len() {
            // Use positional argument
            arg_values[i].clone()
        } else if let Some(default) = &param.default {
            // Use default value
            eval_expr(ctx, default)?
        } else {
            // No value provided
            Value::Undef
        };

        ctx.scope.define(&param.name, value);
    }

    // Evaluate function body
    let result = eval_expr(ctx, &func.body);

    // Pop function scope
    ctx.scope.pop();

    result
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> EvalContext {
        EvalContext::new()
    }

    #[test]
    fn test_eval_number() {
        let mut ctx = ctx();
        let result = eval_expr(&mut ctx, &Expression::Number(42.0)).unwrap();
        assert_eq!(result, Value::Number(42.0));
    }

    #[test]
    fn test_eval_boolean() {
        let mut ctx = ctx();
        let result = eval_expr(&mut ctx, &Expression::Boolean(true)).unwrap();
        assert_eq!(result, Value::Boolean(true));
    }

    #[test]
    fn test_eval_string() {
        let mut ctx = ctx();
        let result = eval_expr(&mut ctx, &Expression::String("hello".to_string())).unwrap();
        assert_eq!(result, Value::String("hello".to_string()));
    }

    #[test]
    fn test_eval_binary_add() {
        let mut ctx = ctx();
        let expr = Expression::BinaryOp {
            op: BinaryOp::Add,
            left: Box::new(Expression::Number(2.0)),
            right: Box::new(Expression::Number(3.0)),
        };
        let result = eval_expr(&mut ctx, &expr).unwrap();
        assert_eq!(result, Value::Number(5.0));
    }

    #[test]
    fn test_eval_unary_neg() {
        let mut ctx = ctx();
        let expr = Expression::UnaryOp {
            op: UnaryOp::Neg,
            operand: Box::new(Expression::Number(5.0)),
        };
        let result = eval_expr(&mut ctx, &expr).unwrap();
        assert_eq!(result, Value::Number(-5.0));
    }

    #[test]
    fn test_eval_identifier_undefined() {
        let mut ctx = ctx();
        let result = eval_expr(&mut ctx, &Expression::Identifier("x".to_string())).unwrap();
        assert_eq!(result, Value::Undef);
        assert!(!ctx.warnings.is_empty());
    }

    #[test]
    fn test_eval_identifier_defined() {
        let mut ctx = ctx();
        ctx.scope.define("x", Value::Number(10.0));
        let result = eval_expr(&mut ctx, &Expression::Identifier("x".to_string())).unwrap();
        assert_eq!(result, Value::Number(10.0));
    }

    #[test]
    fn test_eval_atan2() {
        let mut ctx = ctx();
        let expr = Expression::FunctionCall {
            name: "atan2".to_string(),
            args: vec![Argument::Positional(Expression::Number(1.0)), Argument::Positional(Expression::Number(1.0))],
        };
        let result = eval_expr(&mut ctx, &expr).unwrap();
        assert_eq!(result, Value::Number(45.0));
    }

    #[test]
    fn test_eval_asin_acos_roundtrip() {
        let mut ctx = ctx();
        let asin = Expression::FunctionCall {
            name: "asin".to_string(),
            args: vec![Argument::Positional(Expression::Number(1.0))],
        };
        let result = eval_expr(&mut ctx, &asin).unwrap();
        assert_eq!(result, Value::Number(90.0));
    }

    #[test]
    fn test_dxf_dim_reports_linear_distance() {
        let path = std::env::temp_dir().join("openscad_eval_test_dxfdim.dxf");
        let dxf = "0\nSECTION\n2\nENTITIES\n0\nDIMENSION\n2\n\n70\n0\n10\n0.0\n20\n0.0\n13\n0.0\n23\n0.0\n14\n10.0\n24\n0.0\n1\nmydim\n0\nENDSEC\n0\nEOF\n";
        std::fs::write(&path, dxf).unwrap();

        let mut ctx = ctx();
        let args = vec![
            Argument::Positional(Expression::String(path.to_string_lossy().to_string())),
            Argument::Positional(Expression::Undef),
            Argument::Positional(Expression::String("mydim".to_string())),
        ];
        let result = eval_function_call(&mut ctx, "dxf_dim", &args).unwrap();
        std::fs::remove_file(&path).ok();

        match result {
            Value::Number(n) => assert!((n - 10.0).abs() < 1e-6),
            other => panic!("Expected dxf_dim distance, got {:?}", other),
        }
    }

    #[test]
    fn test_dxf_dim_missing_file_warns() {
        let mut ctx = ctx();
        let args = vec![Argument::Named {
            name: "file".to_string(),
            value: Expression::String("/nonexistent/path.dxf".to_string()),
        }];
        let result = eval_function_call(&mut ctx, "dxf_dim", &args).unwrap();
        assert_eq!(result, Value::Undef);
        assert!(!ctx.warnings.is_empty());
    }
}
