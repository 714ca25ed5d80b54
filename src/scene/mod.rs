//! Scene setup around the rasterizer core: render configuration on disk

mod config;

pub use config::*;
