//! # OFF import seam
//!
//! OFF import is not implemented, matching the original `ImportNode`'s
//! `TYPE_OFF` branch (`"WARNING: OFF import is not implemented yet."`). This
//! stub exists so `import_off()`/`import()` on a `.off` file degrade to a
//! logged warning and empty geometry instead of an "unknown module" error.

/// Returns the warning to surface for an OFF import request.
pub fn unsupported_warning(path: &str) -> String {
    format!("OFF import is not implemented yet (`{}')", path)
}
