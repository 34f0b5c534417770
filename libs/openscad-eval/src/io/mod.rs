//! # File-backed builtins
//!
//! `import()`, `surface()` and the DXF-derived functions (`dxf_dim`,
//! `dxf_cross`) all read a file from disk and resolve it into plain data
//! before it ever reaches a [`crate::geometry::GeometryNode`] - by the time a
//! `GeometryNode::Import`/`GeometryNode::Surface` exists, its contents are
//! already loaded. This module holds that file-reading half of the pipeline.
//!
//! ## Submodules
//!
//! - `stl` - ASCII/binary STL reading, backing `import_stl()`.
//! - `surface` - whitespace-delimited height-grid reading.
//! - `dxf` - DXF group-code parsing, path stitching, `dxf_dim`/`dxf_cross`.
//! - `off` - reserved seam; OFF import is not implemented (warns, empty).

pub mod dxf;
pub mod off;
pub mod stl;
pub mod surface;
