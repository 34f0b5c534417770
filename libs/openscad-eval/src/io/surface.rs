//! # surface() grid reader
//!
//! Reads the whitespace-delimited ASCII height grid consumed by `surface()`,
//! grounded on the original `SurfaceNode::render_polyset`'s file-parsing
//! half (the mesh-building half lives in `openscad_mesh::from_ir::surface_to_mesh`).
//! `#`-prefixed lines are comments; every other non-blank line contributes one
//! row of height samples.

use crate::error::EvalError;

/// Parse a height-grid text file into `rows[y][x]`.
///
/// Rows may have differing column counts in malformed input; callers should
/// treat a ragged grid as a warning-worthy condition, not a hard error -
/// `from_ir::surface_to_mesh` already handles short rows defensively.
pub fn parse(content: &str) -> Vec<Vec<f64>> {
    let mut rows = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row: Vec<f64> = trimmed
            .split_whitespace()
            .map(|tok| tok.parse::<f64>().unwrap_or(0.0))
            .collect();
        rows.push(row);
    }
    rows
}

/// Read a height-grid file from disk.
pub fn read_file(path: &str) -> Result<Vec<Vec<f64>>, EvalError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EvalError::IoError(format!("can't open surface file `{}': {}", path, e)))?;
    Ok(parse(&content))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_grid() {
        let content = "# comment\n0 1 2\n1 2 3\n2 3 4\n";
        let rows = parse(content);
        assert_eq!(rows, vec![vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]]);
    }

    #[test]
    fn test_parse_ignores_blank_lines() {
        let content = "0 0\n\n1 1\n";
        let rows = parse(content);
        assert_eq!(rows.len(), 2);
    }
}
