//! softshade: CPU triangle rasterizer
//!
//! A small GPU-style pipeline in software:
//! - Programmable vertex and fragment stages behind narrow traits
//! - Barycentric scan conversion with a selectable fill rule
//! - Per-pixel depth buffer with a configurable depth convention
//! - Optional row-partitioned parallel passes
//! - RON render configuration

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod rasterizer;
pub mod scene;
