//! # STL reader
//!
//! Backs `import_stl()`/`import()` for `.stl` files. Grounded on the original
//! `ImportNode::render_polyset`: sniff the first 5 bytes for `"solid"` to
//! pick the ASCII path, else read the 80-byte header and a little-endian
//! facet stream.

use crate::error::EvalError;

/// One triangular facet: three 3-D vertices.
pub type Triangle = [[f64; 3]; 3];

/// Parse STL bytes (ASCII or binary, auto-detected) into a flat triangle list.
///
/// Malformed ASCII vertex lines are skipped with a warning rather than
/// aborting the whole import, matching the original's per-line recovery.
pub fn parse(bytes: &[u8]) -> (Vec<Triangle>, Vec<String>) {
    if bytes.len() >= 5 && &bytes[0..5] == b"solid" {
        parse_ascii(bytes)
    } else {
        parse_binary(bytes)
    }
}

fn parse_ascii(bytes: &[u8]) -> (Vec<Triangle>, Vec<String>) {
    let text = String::from_utf8_lossy(bytes);
    let mut warnings = Vec::new();
    let mut triangles = Vec::new();

    let mut current: Vec<[f64; 3]> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("solid") || trimmed.starts_with("facet") || trimmed.starts_with("endloop") {
            continue;
        }
        if trimmed.starts_with("outer loop") {
            current.clear();
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("vertex") {
            let nums: Vec<&str> = rest.split_whitespace().collect();
            if nums.len() != 3 {
                warnings.push(format!("STL: can't parse vertex line `{}'", trimmed));
                continue;
            }
            let parsed: Result<Vec<f64>, _> = nums.iter().map(|s| s.parse::<f64>()).collect();
            match parsed {
                Ok(v) => {
                    current.push([v[0], v[1], v[2]]);
                    if current.len() == 3 {
                        triangles.push([current[0], current[1], current[2]]);
                        current.clear();
                    }
                }
                Err(_) => warnings.push(format!("STL: can't parse vertex line `{}'", trimmed)),
            }
        }
    }

    (triangles, warnings)
}

fn parse_binary(bytes: &[u8]) -> (Vec<Triangle>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut triangles = Vec::new();

    const HEADER: usize = 80;
    const COUNT: usize = 4;
    const RECORD: usize = 12 * 4 + 2; // normal + 3 vertices (f32x3 each) + attribute count u16

    if bytes.len() < HEADER + COUNT {
        warnings.push("STL: binary file shorter than header".to_string());
        return (triangles, warnings);
    }

    let mut offset = HEADER + COUNT;
    while offset + RECORD <= bytes.len() {
        let read_f32 = |o: usize| -> f64 {
            f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]) as f64
        };
        // Skip the facet normal (bytes[offset..offset+12]); only vertices matter here.
        let v1 = [read_f32(offset + 12), read_f32(offset + 16), read_f32(offset + 20)];
        let v2 = [read_f32(offset + 24), read_f32(offset + 28), read_f32(offset + 32)];
        let v3 = [read_f32(offset + 36), read_f32(offset + 40), read_f32(offset + 44)];
        triangles.push([v1, v2, v3]);
        offset += RECORD;
    }

    (triangles, warnings)
}

/// Read an STL file from disk and parse it, wrapping I/O failure as an
/// `EvalError::IoError` the caller degrades to a warning + empty import.
pub fn read_file(path: &str) -> Result<(Vec<Triangle>, Vec<String>), EvalError> {
    let bytes = std::fs::read(path).map_err(|e| EvalError::IoError(format!("can't open import file `{}': {}", path, e)))?;
    Ok(parse(&bytes))
}

// =============================================================================
// TESTS
// =============================================================================
