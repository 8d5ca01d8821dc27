//! Diagnostic rendering module
//!
//! Pure read-only consumers of clustering results and regions, producing
//! visualization images for auditing captures. Nothing here participates in
//! the extraction itself.

pub mod diagnostics;

pub use diagnostics::{annotate_region, render_palette, render_swatch};
