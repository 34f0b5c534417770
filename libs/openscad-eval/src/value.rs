//! # Runtime Values
//!
//! Value types used during evaluation.

use crate::error::EvalError;
use serde::{Deserialize, Serialize};

// =============================================================================
// VALUE
// =============================================================================

/// A runtime value in OpenSCAD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Undefined value.
    Undef,
    /// Boolean.
    Boolean(bool),
    /// Number (f64).
    Number(f64),
    /// String.
    String(String),
    /// List of values.
    List(Vec<Value>),
    /// Range [start:end] or [start:step:end].
    Range {
        start: f64,
        end: f64,
        step: Option<f64>,
    },
}

impl Value {
    /// Convert to number, or error.
    pub fn as_number(&self) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            _ => Err(EvalError::TypeError(format!("Expected number, got {:?}", self))),
        }
    }

    /// Convert to boolean.
    pub fn as_boolean(&self) -> bool {
        match self {
            Value::Undef => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Range { .. } => true,
        }
    }

    /// Convert to list of numbers (for vectors/arrays).
    pub fn as_number_list(&self) -> Result<Vec<f64>, EvalError> {
        match self {
            Value::List(items) => {
                items.iter()
                    .map(|v| v.as_number())
                    .collect()
            }
            Value::Number(n) => Ok(vec![*n]),
            _ => Err(EvalError::TypeError(format!("Expected list of numbers, got {:?}", self))),
        }
    }

    /// Convert to [f64; 3] for 3D vectors.
    pub fn as_vec3(&self) -> Result<[f64; 3], EvalError> {
        let nums = self.as_number_list()?;
        match nums.len() {
            1 => Ok([nums[0], nums[0], nums[0]]),
            2 => Ok([nums[0], nums[1], 0.0]),
            3 => Ok([nums[0], nums[1], nums[2]]),
            _ => Err(EvalError::TypeError(format!(
                "Expected 1-3 numbers for vec3, got {}",
                nums.len()
            ))),
        }
    }

    /// Convert to [f64; 2] for 2D vectors.
    pub fn as_vec2(&self) -> Result<[f64; 2], EvalError> {
        let nums = self.as_number_list()?;
        match nums.len() {
            1 => Ok([nums[0], nums[0]]),
            2 => Ok([nums[0], nums[1]]),
            _ => Err(EvalError::TypeError(format!(
                "Expected 1-2 numbers for vec2, got {}",
                nums.len()
            ))),
        }
    }

    /// Check if this is undef.
    pub fn is_undef(&self) -> bool {
        matches!(self, Value::Undef)
    }

    /// Convert to a string, for file-path and name arguments (`import()`,
    /// `surface()`, `dxf_dim()`). Only `Value::String` qualifies; anything
    /// else is a type error rather than a silently-stringified number.
    pub fn as_string(&self) -> Result<&str, EvalError> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(EvalError::TypeError(format!("Expected string, got {:?}", self))),
        }
    }

    /// Addition. Number+Number and same-length vector+vector are defined;
    /// everything else (mismatched lengths, non-numeric operands) yields
    /// `Undef` rather than erroring, matching the total-arithmetic model
    /// where a malformed expression degrades the resulting geometry instead
    /// of aborting the whole evaluation.
    pub fn add(&self, other: &Value) -> Value {
        self.zip_numeric(other, |a, b| a + b)
    }

    /// Subtraction, with the same totality rules as [`Value::add`].
    pub fn sub(&self, other: &Value) -> Value {
        self.zip_numeric(other, |a, b| a - b)
    }

    /// Multiplication. Number*Number multiplies; Number*vector and
    /// vector*Number scale every component; vector*vector of equal length is
    /// the dot product (OpenSCAD's vector*vector semantics); anything else
    /// is `Undef`.
    pub fn mul(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a * b),
            (Value::Number(s), Value::List(v)) | (Value::List(v), Value::Number(s)) => {
                match v.iter().map(Value::as_number).collect::<Result<Vec<_>, _>>() {
                    Ok(nums) => Value::List(nums.into_iter().map(|n| Value::Number(n * s)).collect()),
                    Err(_) => Value::Undef,
                }
            }
            (Value::List(a), Value::List(b)) if a.len() == b.len() => {
                let dot = a.iter().zip(b.iter()).try_fold(0.0, |acc, (x, y)| {
                    Ok::<f64, EvalError>(acc + x.as_number()? * y.as_number()?)
                });
                dot.map(Value::Number).unwrap_or(Value::Undef)
            }
            _ => Value::Undef,
        }
    }

    /// Division. Number/Number divides (yielding `Undef` on divide-by-zero,
    /// rather than trapping); vector/Number scales every component;
    /// everything else is `Undef`.
    pub fn div(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if *b != 0.0 => Value::Number(a / b),
            (Value::List(v), Value::Number(b)) if *b != 0.0 => {
                match v.iter().map(Value::as_number).collect::<Result<Vec<_>, _>>() {
                    Ok(nums) => Value::List(nums.into_iter().map(|n| Value::Number(n / b)).collect()),
                    Err(_) => Value::Undef,
                }
            }
            _ => Value::Undef,
        }
    }

    /// Modulo, defined only for Number % Number (non-zero divisor).
    pub fn modulo(&self, other: &Value) -> Value {
        match (self.as_number(), other.as_number()) {
            (Ok(a), Ok(b)) if b != 0.0 => Value::Number(a % b),
            _ => Value::Undef,
        }
    }

    /// Exponentiation, defined only for Number ^ Number.
    pub fn pow(&self, other: &Value) -> Value {
        match (self.as_number(), other.as_number()) {
            (Ok(a), Ok(b)) => Value::Number(a.powf(b)),
            _ => Value::Undef,
        }
    }

    /// Unary negation: negates a number, or every component of a vector.
    pub fn neg(&self) -> Value {
        match self {
            Value::Number(n) => Value::Number(-n),
            Value::List(v) => Value::List(v.iter().map(Value::neg).collect()),
            _ => Value::Undef,
        }
    }

    /// Componentwise/elementwise addition or subtraction helper shared by
    /// [`Value::add`] and [`Value::sub`].
    fn zip_numeric(&self, other: &Value, op: impl Fn(f64, f64) -> f64 + Copy) -> Value {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::Number(op(*a, *b)),
            (Value::List(a), Value::List(b)) if a.len() == b.len() => {
                let combined: Vec<Value> = a.iter().zip(b.iter()).map(|(x, y)| x.zip_numeric(y, op)).collect();
                if combined.iter().any(Value::is_undef) {
                    Value::Undef
                } else {
                    Value::List(combined)
                }
            }
            _ => Value::Undef,
        }
    }

    /// Ordering comparison, defined for Number and String pairs.
    pub fn compare(&self, other: &Value) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undef
    }
}

// =============================================================================
// TESTS
// =============================================================================
