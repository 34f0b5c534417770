//! # DXF loader
//!
//! Reads the ENTITIES section of a DXF file into a set of 2-D line segments,
//! stitches them into open and closed paths by snapping endpoints to a
//! quantization grid, and records `DIMENSION` annotations for `dxf_dim()`/
//! `dxf_cross()`.
//!
//! Group-code stream, entity handling and path stitching are grounded on the
//! original `DxfData` constructor; the goto-driven "find a dangling
//! endpoint, walk it to a dead end" loop there is reimplemented here as two
//! explicit passes (`extract_open_paths`, `extract_closed_paths`) over a
//! `HashSet` of still-enabled line indices.

use std::collections::{HashMap, HashSet};

use config::constants::{compute_fragments, DXF_GRID_EPSILON};

use crate::error::EvalError;

/// A single 2-D point as read from the file (already origin-shifted and scaled).
pub type Point = [f64; 2];

/// One extracted path: a connected run of DXF line segments.
#[derive(Debug, Clone)]
pub struct Path {
    /// Ordered vertices of the path.
    pub points: Vec<Point>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

/// A `DIMENSION` entity, kept for `dxf_dim()`/`dxf_cross()` lookups.
#[derive(Debug, Clone)]
pub struct Dim {
    /// Low 3 bits select dimension type (0=linear, 2=angular, others unsupported here).
    pub dim_type: i64,
    /// Definition-point coordinates, group codes 10-16/20-26 indexed `[0..7][xy]`.
    pub coords: [[f64; 2]; 7],
    /// Rotation angle in degrees (group code 50).
    pub angle: f64,
    /// Dimension name (group code 1), used to disambiguate multiple dimensions.
    pub name: String,
}

/// Parsed DXF content: extracted 2-D paths plus any dimension annotations.
#[derive(Debug, Clone, Default)]
pub struct DxfData {
    /// Open and closed paths extracted from line/polyline/circle/arc entities.
    pub paths: Vec<Path>,
    /// `DIMENSION` entities found in the (optionally layer-filtered) file.
    pub dims: Vec<Dim>,
}

struct Line {
    p0: Point,
    p1: Point,
}

fn quantize(v: f64) -> i64 {
    (v / DXF_GRID_EPSILON).round() as i64
}

fn cell(p: Point) -> (i64, i64) {
    (quantize(p[0]), quantize(p[1]))
}

fn points_eq(a: Point, b: Point) -> bool {
    cell(a) == cell(b)
}

/// Options controlling how a DXF file is interpreted, mirroring the
/// constructor arguments of the original `DxfData` loader.
#[derive(Debug, Clone)]
pub struct DxfOptions {
    /// Restrict entities to this layer; `None` reads every layer.
    pub layer: Option<String>,
    pub x_origin: f64,
    pub y_origin: f64,
    pub scale: f64,
    pub fn_: f64,
    pub fa_: f64,
    pub fs_: f64,
}

impl Default for DxfOptions {
    fn default() -> Self {
        Self {
            layer: None,
            x_origin: 0.0,
            y_origin: 0.0,
            scale: 1.0,
            fn_: 0.0,
            fa_: 12.0,
            fs_: 2.0,
        }
    }
}

/// Parse DXF source text into paths and dimensions.
///
/// Returns the parsed data plus any I/O-category warnings (unsupported
/// entities, malformed group-code pairs) that should be folded into the
/// caller's diagnostic sink rather than aborting the import.
pub fn parse(content: &str, opts: &DxfOptions) -> (DxfData, Vec<String>) {
    let mut warnings = Vec::new();
    let mut lines_iter = content.lines();

    let mut lines: Vec<Line> = Vec::new();
    let mut dims: Vec<Dim> = Vec::new();
    let mut unsupported: HashMap<String, usize> = HashMap::new();

    let mut in_entities = false;
    let mut in_blocks = false;

    let mut mode = String::new();
    let mut layer = String::new();
    let mut name = String::new();
    let mut iddata = String::new();
    let mut dim_type: i64 = 0;
    let mut coords = [[0.0f64; 2]; 7];
    let mut xverts: Vec<f64> = Vec::new();
    let mut yverts: Vec<f64> = Vec::new();
    let mut radius = 0.0;
    let mut start_angle = 0.0;
    let mut stop_angle = 0.0;

    let layer_ok = |layer: &str, opts: &DxfOptions| -> bool {
        match &opts.layer {
            None => true,
            Some(l) => l == layer,
        }
    };

    let add_line = |lines: &mut Vec<Line>, x1: f64, y1: f64, x2: f64, y2: f64,
                         in_entities: bool, in_blocks: bool, layer: &str, opts: &DxfOptions| {
        if !in_entities && !in_blocks {
            return;
        }
        if in_entities && !layer_ok(layer, opts) {
            return;
        }
        if in_entities {
            lines.push(Line { p0: [x1, y1], p1: [x2, y2] });
        }
        // BLOCKS/INSERT substitution is not supported; block-local geometry
        // is simply dropped, same as any other unsupported entity.
    };

    loop {
        let Some(id_line) = lines_iter.next() else { break };
        let Some(data_line) = lines_iter.next() else {
            warnings.push("DXF: truncated group-code pair at end of file".to_string());
            break;
        };

        let Ok(id) = id_line.trim().parse::<i64>() else {
            warnings.push(format!("DXF: illegal group code `{}'", id_line.trim()));
            break;
        };
        let data = data_line.trim();

        if (10..=16).contains(&id) {
            let v: f64 = data.parse().unwrap_or(0.0);
            let idx = (id - 10) as usize;
            coords[idx][0] = if id == 11 || id == 12 || id == 16 {
                v * opts.scale
            } else {
                (v - opts.x_origin) * opts.scale
            };
        }
        if (20..=26).contains(&id) {
            let v: f64 = data.parse().unwrap_or(0.0);
            let idx = (id - 20) as usize;
            coords[idx][1] = if id == 21 || id == 22 || id == 26 {
                v * opts.scale
            } else {
                (v - opts.y_origin) * opts.scale
            };
        }

        match id {
            0 => {
                if mode == "SECTION" {
                    in_entities = iddata == "ENTITIES";
                    in_blocks = iddata == "BLOCKS";
                } else if mode == "LINE" && xverts.len() >= 2 && yverts.len() >= 2 {
                    add_line(&mut lines, xverts[0], yverts[0], xverts[1], yverts[1], in_entities, in_blocks, &layer, opts);
                } else if mode == "LWPOLYLINE" && xverts.len() == yverts.len() && !xverts.is_empty() {
                    let n = xverts.len();
                    for i in 1..n {
                        add_line(&mut lines, xverts[i - 1], yverts[i - 1], xverts[i % n], yverts[i % n], in_entities, in_blocks, &layer, opts);
                    }
                    if dim_type & 0x01 != 0 {
                        add_line(&mut lines, xverts[n - 1], yverts[n - 1], xverts[0], yverts[0], in_entities, in_blocks, &layer, opts);
                    }
                } else if mode == "CIRCLE" && !xverts.is_empty() && !yverts.is_empty() {
                    let n = compute_fragments(radius, opts.fn_, opts.fa_, opts.fs_).max(3);
                    let (cx, cy) = (xverts[0], yverts[0]);
                    for i in 0..n {
                        let a1 = std::f64::consts::TAU * i as f64 / n as f64;
                        let a2 = std::f64::consts::TAU * (i + 1) as f64 / n as f64;
                        add_line(
                            &mut lines,
                            a1.cos() * radius + cx, a1.sin() * radius + cy,
                            a2.cos() * radius + cx, a2.sin() * radius + cy,
                            in_entities, in_blocks, &layer, opts,
                        );
                    }
                } else if mode == "ARC" && !xverts.is_empty() && !yverts.is_empty() {
                    let (cx, cy) = (xverts[0], yverts[0]);
                    let base_n = compute_fragments(radius, opts.fn_, opts.fa_, opts.fs_).max(3);
                    let mut stop = stop_angle;
                    while start_angle > stop {
                        stop += 360.0;
                    }
                    let n = ((base_n as f64) * (stop - start_angle) / 360.0).ceil().max(1.0) as u32;
                    for i in 0..n {
                        let a1 = (start_angle + (stop - start_angle) * i as f64 / n as f64).to_radians();
                        let a2 = (start_angle + (stop - start_angle) * (i + 1) as f64 / n as f64).to_radians();
                        add_line(
                            &mut lines,
                            a1.cos() * radius + cx, a1.sin() * radius + cy,
                            a2.cos() * radius + cx, a2.sin() * radius + cy,
                            in_entities, in_blocks, &layer, opts,
                        );
                    }
                } else if mode == "DIMENSION" && layer_ok(&layer, opts) {
                    dims.push(Dim { dim_type, coords, angle: start_angle, name: name.clone() });
                } else if mode == "BLOCK" || mode == "ENDBLK" || mode == "ENDSEC" || mode == "SECTION" {
                    // state transitions only, handled above or ignored
                } else if !mode.is_empty() && (in_blocks || (in_entities && layer_ok(&layer, opts))) {
                    *unsupported.entry(mode.clone()).or_insert(0) += 1;
                }
                mode = data.to_string();
                layer.clear();
                name.clear();
                iddata.clear();
                dim_type = 0;
                coords = [[0.0; 2]; 7];
                xverts.clear();
                yverts.clear();
                radius = 0.0;
                start_angle = 0.0;
                stop_angle = 0.0;
            }
            1 => name = data.to_string(),
            2 => iddata = data.to_string(),
            8 => layer = data.to_string(),
            10 | 11 => xverts.push((data.parse::<f64>().unwrap_or(0.0) - opts.x_origin) * opts.scale),
            20 | 21 => yverts.push((data.parse::<f64>().unwrap_or(0.0) - opts.y_origin) * opts.scale),
            40 => radius = data.parse::<f64>().unwrap_or(0.0) * opts.scale,
            50 => start_angle = data.parse::<f64>().unwrap_or(0.0),
            51 => stop_angle = data.parse::<f64>().unwrap_or(0.0),
            70 => dim_type = data.parse::<i64>().unwrap_or(0),
            _ => {}
        }
    }

    for (entity, count) in &unsupported {
        warnings.push(format!("DXF: unsupported entity `{}' ({}x)", entity, count));
    }

    let mut enabled: HashSet<usize> = (0..lines.len()).collect();
    let grid = build_grid(&lines);

    let mut paths = extract_open_paths(&lines, &grid, &mut enabled);
    paths.extend(extract_closed_paths(&lines, &grid, &mut enabled));
    fixup_path_direction(&mut paths);

    (DxfData { paths, dims }, warnings)
}

fn build_grid(lines: &[Line]) -> HashMap<(i64, i64), Vec<usize>> {
    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, l) in lines.iter().enumerate() {
        grid.entry(cell(l.p0)).or_default().push(i);
        grid.entry(cell(l.p1)).or_default().push(i);
    }
    grid
}

fn endpoint(line: &Line, idx: usize) -> Point {
    if idx == 0 { line.p0 } else { line.p1 }
}

/// Find the next line continuing from `ref_point`, if any enabled line touches it.
fn next_from(
    lines: &[Line],
    grid: &HashMap<(i64, i64), Vec<usize>>,
    enabled: &HashSet<usize>,
    ref_point: Point,
) -> Option<(usize, usize)> {
    let touching = grid.get(&cell(ref_point))?;
    for &k in touching {
        if !enabled.contains(&k) {
            continue;
        }
        if points_eq(ref_point, lines[k].p0) {
            return Some((k, 0));
        }
        if points_eq(ref_point, lines[k].p1) {
            return Some((k, 1));
        }
    }
    None
}

/// Walks every still-dangling endpoint (one touched by no other enabled
/// line) to the far end of its connected run, producing an open path.
fn extract_open_paths(
    lines: &[Line],
    grid: &HashMap<(i64, i64), Vec<usize>>,
    enabled: &mut HashSet<usize>,
) -> Vec<Path> {
    let mut paths = Vec::new();

    loop {
        let mut start = None;
        'search: for &i in enabled.iter() {
            for j in 0..2 {
                let p = endpoint(&lines[i], j);
                let touching = grid.get(&cell(p)).cloned().unwrap_or_default();
                let has_other = touching.iter().any(|&k| k != i && enabled.contains(&k));
                if !has_other {
                    start = Some((i, j));
                    break 'search;
                }
            }
        }
        let Some((mut current_line, mut current_point)) = start else { break };

        let mut points = vec![endpoint(&lines[current_line], current_point)];
        loop {
            let other = 1 - current_point;
            let ref_point = endpoint(&lines[current_line], other);
            points.push(ref_point);
            enabled.remove(&current_line);

            match next_from(lines, grid, enabled, ref_point) {
                Some((k, p)) => {
                    current_line = k;
                    current_point = p;
                }
                None => break,
            }
        }
        paths.push(Path { points, closed: false });
    }

    paths
}

/// Once no dangling endpoints remain, every still-enabled line belongs to a
/// closed loop; walk each loop until it returns to its own start.
fn extract_closed_paths(
    lines: &[Line],
    grid: &HashMap<(i64, i64), Vec<usize>>,
    enabled: &mut HashSet<usize>,
) -> Vec<Path> {
    let mut paths = Vec::new();

    while let Some(&start_line) = enabled.iter().next() {
        let mut current_line = start_line;
        let mut current_point = 0usize;

        let mut points = vec![endpoint(&lines[current_line], current_point)];
        loop {
            let other = 1 - current_point;
            let ref_point = endpoint(&lines[current_line], other);
            points.push(ref_point);
            enabled.remove(&current_line);

            match next_from(lines, grid, enabled, ref_point) {
                Some((k, p)) => {
                    current_line = k;
                    current_point = p;
                }
                None => break,
            }
        }
        paths.push(Path { points, closed: true });
    }

    paths
}

/// Normalizes closed-path winding so downstream tessellation sees a
/// consistent orientation, mirroring the original's min-x rotation check.
fn fixup_path_direction(paths: &mut [Path]) {
    for path in paths.iter_mut() {
        if !path.closed || path.points.len() < 3 {
            continue;
        }
        let n = path.points.len();
        let (mut min_x, mut min_idx) = (path.points[0][0], 0usize);
        for (j, p) in path.points.iter().enumerate() {
            if p[0] < min_x {
                min_x = p[0];
                min_idx = j;
            }
        }
        let b = min_idx;
        let a = if b == 0 { n.saturating_sub(2) } else { b - 1 };
        let c = if b == n - 1 { 1 } else { b + 1 };
        let (ax, ay) = (path.points[a][0] - path.points[b][0], path.points[a][1] - path.points[b][1]);
        let (cx, cy) = (path.points[c][0] - path.points[b][0], path.points[c][1] - path.points[b][1]);
        if ay.atan2(ax) < cy.atan2(cx) {
            path.points.reverse();
        }
    }
}

// =============================================================================
// dxf_dim / dxf_cross
// =============================================================================

/// `dxf_dim(file, layer, name, origin, scale)`: look up a named dimension and
/// return its measured value. Only the linear (type 0) and angular (type 2)
/// cases from the original dimension-type table are computed; other types
/// log an I/O warning and return `None`.
pub fn dxf_dim(
    content: &str,
    opts: &DxfOptions,
    name: Option<&str>,
) -> Result<(Option<f64>, Vec<String>), EvalError> {
    let (data, mut warnings) = parse(content, opts);

    for d in &data.dims {
        if let Some(n) = name {
            if d.name != n {
                continue;
            }
        }
        let t = d.dim_type & 7;
        match t {
            0 => {
                let x = d.coords[4][0] - d.coords[3][0];
                let y = d.coords[4][1] - d.coords[3][1];
                let angle = d.angle.to_radians();
                let dist = (x * angle.cos() + y * angle.sin()).abs();
                return Ok((Some(dist), warnings));
            }
            2 => {
                let a1 = (d.coords[0][0] - d.coords[5][0]).atan2(d.coords[0][1] - d.coords[5][1]);
                let a2 = (d.coords[4][0] - d.coords[3][0]).atan2(d.coords[4][1] - d.coords[3][1]);
                return Ok((Some((a1 - a2).abs().to_degrees()), warnings));
            }
            _ => {
                warnings.push(format!("dxf_dim: dimension `{}' has unsupported type {}", d.name, t));
                return Ok((None, warnings));
            }
        }
    }

    warnings.push("dxf_dim: dimension not found".to_string());
    Ok((None, warnings))
}

/// `dxf_cross(file, layer, origin, scale)`: find the first two 2-point
/// (single-segment) paths and return their line-line intersection point.
pub fn dxf_cross(content: &str, opts: &DxfOptions) -> Result<(Option<[f64; 2]>, Vec<String>), EvalError> {
    let (data, mut warnings) = parse(content, opts);

    let two_point_paths: Vec<&Path> = data.paths.iter().filter(|p| p.points.len() == 2).collect();
    if two_point_paths.len() >= 2 {
        let (p1, p2) = (two_point_paths[0], two_point_paths[1]);
        let (x1, y1) = (p1.points[0][0], p1.points[0][1]);
        let (x2, y2) = (p1.points[1][0], p1.points[1][1]);
        let (x3, y3) = (p2.points[0][0], p2.points[0][1]);
        let (x4, y4) = (p2.points[1][0], p2.points[1][1]);
        let dem = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
        if dem != 0.0 {
            let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / dem;
            let x = x1 + ua * (x2 - x1);
            let y = y1 + ua * (y2 - y1);
            return Ok((Some([x, y]), warnings));
        }
    }

    warnings.push("dxf_cross: no crossing found".to_string());
    Ok((None, warnings))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: i64, data: &str) -> String {
        format!("{}\n{}\n", id, data)
    }

    #[test]
    fn test_parse_single_closed_square_line_entities() {
        // Four LINE entities forming a unit square, written as raw group codes.
        let mut src = String::new();
        src += &group(0, "SECTION");
        src += &group(2, "ENTITIES");
        let segs = [
            (0.0, 0.0, 1.0, 0.0),
            (1.0, 0.0, 1.0, 1.0),
            (1.0, 1.0, 0.0, 1.0),
            (0.0, 1.0, 0.0, 0.0),
        ];
        for (x1, y1, x2, y2) in segs {
            src += &group(0, "LINE");
            src += &group(10, &x1.to_string());
            src += &group(20, &y1.to_string());
            src += &group(11, &x2.to_string());
            src += &group(21, &y2.to_string());
        }
        src += &group(0, "ENDSEC");
        src += &group(0, "EOF");

        let (data, _warnings) = parse(&src, &DxfOptions::default());
        assert_eq!(data.paths.len(), 1);
        assert!(data.paths[0].closed);
        assert_eq!(data.paths[0].points.len(), 5); // 4 segments, closed loop repeats start
    }

    #[test]
    fn test_parse_open_polyline() {
        let mut src = String::new();
        src += &group(0, "SECTION");
        src += &group(2, "ENTITIES");
        src += &group(0, "LINE");
        src += &group(10, "0");
        src += &group(20, "0");
        src += &group(11, "5");
        src += &group(21, "0");
        src += &group(0, "ENDSEC");
        src += &group(0, "EOF");

        let (data, _warnings) = parse(&src, &DxfOptions::default());
        assert_eq!(data.paths.len(), 1);
        assert!(!data.paths[0].closed);
    }

    #[test]
    fn test_missing_dimension_warns() {
        let src = "0\nSECTION\n2\nENTITIES\n0\nENDSEC\n0\nEOF\n";
        let (val, warnings) = dxf_dim(src, &DxfOptions::default(), None).unwrap();
        assert!(val.is_none());
        assert!(!warnings.is_empty());
    }
}
