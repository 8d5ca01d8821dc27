//! Sky region selection module
//!
//! This module resolves a statically configured region of interest against
//! a captured frame, validating that the result stays inside the image and
//! selects at least one pixel.

pub mod selector;

pub use selector::{Region, RegionSelector, RegionSpec};
