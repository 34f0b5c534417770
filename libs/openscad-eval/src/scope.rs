//! # Variable Scope
//!
//! Lexical scoping for OpenSCAD variables.
//!
//! ## OpenSCAD Scoping Rules
//!
//! - Variables are lexically scoped
//! - Inner scopes can shadow outer scope variables
//! - Variables cannot be reassigned in the same scope
//! - Special variables ($fn, $fa, $fs) have default values
//!
//! ## Example
//!
//! ```rust
//! use openscad_eval::scope::Scope;
//! use openscad_eval::value::Value;
//!
//! let mut scope = Scope::new();
//! scope.define("x", Value::Number(10.0));
//! assert_eq!(scope.get("x"), Some(&Value::Number(10.0)));
//! ```

use crate::value::Value;
use config::constants::{compute_fragments, SPECIAL_VAR_FA, SPECIAL_VAR_FN, SPECIAL_VAR_FS};
use std::collections::HashMap;

// =============================================================================
// SCOPE
// =============================================================================

/// A single scope level containing variable bindings.
#[derive(Debug, Clone)]
struct ScopeLevel {
    /// Variable bindings in this scope.
    bindings: HashMap<String, Value>,
}

impl ScopeLevel {
    /// Create a new empty scope level.
    fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

/// Lexical scope for variable resolution.
///
/// Implements OpenSCAD's scoping rules:
/// - Variables are resolved from innermost to outermost scope
/// - Inner scopes can shadow outer scope variables
/// - Special variables have default values
///
/// ## Example
///
/// ```rust
/// let mut scope = Scope::new();
/// scope.define("x", Value::Number(10.0));
///
/// scope.push(); // Enter new scope
/// scope.define("x", Value::Number(20.0)); // Shadows outer x
/// assert_eq!(scope.get("x"), Some(&Value::Number(20.0)));
///
/// scope.pop(); // Exit scope
/// assert_eq!(scope.get("x"), Some(&Value::Number(10.0)));
/// ```
#[derive(Debug, Clone)]
pub struct Scope {
    /// Stack of scope levels (innermost last).
    levels: Vec<ScopeLevel>,
}

impl Scope {
    /// Create a new scope with default special variables.
    ///
    /// ## Returns
    ///
    /// A scope with $fn, $fa, $fs set to defaults.
    pub fn new() -> Self {
        let mut scope = Self {
            levels: vec![ScopeLevel::new()],
        };
        
        // Initialize special variables with defaults
        scope.define("$fn", Value::Number(SPECIAL_VAR_FN));
        scope.define("$fa", Value::Number(SPECIAL_VAR_FA));
        scope.define("$fs", Value::Number(SPECIAL_VAR_FS));
        scope.define("$t", Value::Number(0.0)); // Animation time
        scope.define("$preview", Value::Boolean(true)); // Preview mode
        scope.define("$vpt", Value::List(vec![Value::Number(0.0), Value::Number(0.0), Value::Number(0.0)]));
        scope.define("$vpr", Value::List(vec![Value::Number(0.0), Value::Number(0.0), Value::Number(0.0)]));

        scope
    }

    /// Push a new scope level.
    ///
    /// Called when entering a block, module, or function.
    pub fn push(&mut self) {
        self.levels.push(ScopeLevel::new());
    }

    /// Pop the current scope level.
    ///
    /// Called when exiting a block, module, or function.
    /// Panics if trying to pop the global scope.
    pub fn pop(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    /// Define a variable in the current scope.
    ///
    /// ## Parameters
    ///
    /// - `name`: Variable name
    /// - `value`: Variable value
    ///
    /// ## Note
    ///
    /// This will shadow any variable with the same name in outer scopes.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(level) = self.levels.last_mut() {
            level.bindings.insert(name.to_string(), value);
        }
    }

    /// Get a variable value.
    ///
    /// Searches from innermost to outermost scope.
    ///
    /// ## Parameters
    ///
    /// - `name`: Variable name
    ///
    /// ## Returns
    ///
    /// The variable value if found, None otherwise.
    pub fn get(&self, name: &str) -> Option<&Value> {
        // Search from innermost to outermost
        for level in self.levels.iter().rev() {
            if let Some(value) = level.bindings.get(name) {
                return Some(value);
            }
        }
        None
    }

    /// Get $fn value.
    pub fn fn_value(&self) -> f64 {
        self.get("$fn")
            .and_then(|v| v.as_number().ok())
            .unwrap_or(SPECIAL_VAR_FN)
    }

    /// Get $fa value.
    pub fn fa_value(&self) -> f64 {
        self.get("$fa")
            .and_then(|v| v.as_number().ok())
            .unwrap_or(SPECIAL_VAR_FA)
    }

    /// Get $fs value.
    pub fn fs_value(&self) -> f64 {
        self.get("$fs")
            .and_then(|v| v.as_number().ok())
            .unwrap_or(SPECIAL_VAR_FS)
    }

    /// Calculate number of fragments for circular shapes.
    ///
    /// Delegates to the shared `fragments_from_r` formula in `config`, so the
    /// parser, evaluator and mesh layers never disagree on tessellation.
    ///
    /// ## Parameters
    ///
    /// - `radius`: Radius of the circular shape
    ///
    /// ## Returns
    ///
    /// Number of fragments to use.
    pub fn calculate_fragments(&self, radius: f64) -> u32 {
        compute_fragments(radius, self.fn_value(), self.fa_value(), self.fs_value())
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
