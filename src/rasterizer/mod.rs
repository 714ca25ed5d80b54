//! CPU triangle rasterizer
//!
//! Pipeline per face:
//! - Vertex stage: object space to screen space (orthographic or projective)
//! - Scan conversion: bounding box + barycentric coverage test
//! - Depth test against a per-pixel depth buffer
//! - Fragment stage: color or discard
//!
//! Color and depth are written together, and only for fragments that pass
//! the depth test and are not discarded.

mod buffer;
mod math;
mod raster;
mod render;
mod shader;
mod transform;
mod types;

pub use buffer::*;
pub use math::*;
pub use raster::*;
pub use render::*;
pub use shader::*;
pub use transform::*;
pub use types::*;

/// Default target dimensions
pub const WIDTH: usize = 400;
pub const HEIGHT: usize = 400;
