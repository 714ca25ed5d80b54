//! Depth buffer, color target and the framebuffer that owns both
//!
//! The framebuffer is the only way the pass driver writes pixels, so color
//! and depth are always updated together. Parallel passes borrow it as
//! disjoint row bands.

use super::types::Color;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Which direction of the depth proxy is closer to the viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthTest {
    /// Larger depth values are closer (cleared to `f32::MIN`)
    #[default]
    GreaterIsCloser,
    /// Smaller depth values are closer (cleared to `f32::MAX`)
    LessIsCloser,
}

impl DepthTest {
    /// The "nothing drawn yet" sentinel for this convention
    pub fn farthest(self) -> f32 {
        match self {
            DepthTest::GreaterIsCloser => f32::MIN,
            DepthTest::LessIsCloser => f32::MAX,
        }
    }

    /// Strict comparison, so on exact ties the first writer keeps the pixel
    pub fn passes(self, incoming: f32, stored: f32) -> bool {
        match self {
            DepthTest::GreaterIsCloser => incoming > stored,
            DepthTest::LessIsCloser => incoming < stored,
        }
    }
}

/// Per-pixel depth values, row-major
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    pub values: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize, clear: f32) -> Self {
        Self {
            values: vec![clear; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, value: f32) {
        self.values.fill(value);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        (x < self.width && y < self.height).then(|| self.values[y * self.width + x])
    }
}

/// Per-pixel RGBA colors, row-major with row 0 at the top
#[derive(Debug, Clone)]
pub struct ColorTarget {
    pub pixels: Vec<Color>,
    pub width: usize,
    pub height: usize,
}

impl ColorTarget {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Self {
            pixels: vec![background; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Flat RGBA bytes, 4 per pixel
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_bytes()).collect()
    }

    /// Copy into an `image` buffer for encoding
    pub fn to_image(&self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.width as u32, self.height as u32);
        for (dst, src) in img.pixels_mut().zip(&self.pixels) {
            *dst = image::Rgba(src.to_bytes());
        }
        img
    }
}

/// Anything the pass driver can depth-test and write into.
/// Coordinates are always full-frame pixel coordinates.
pub trait RenderTarget {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Rows this target may write; `0..height` for a whole framebuffer
    fn rows(&self) -> Range<usize>;

    fn depth_at(&self, x: usize, y: usize) -> f32;

    /// Overwrite color and depth of one pixel together
    fn write(&mut self, x: usize, y: usize, z: f32, color: Color);
}

/// Color target plus depth buffer of the same size.
///
/// Both buffers are only reachable through this type, so their sizes cannot
/// drift apart.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    color: ColorTarget,
    depth: DepthBuffer,
    width: usize,
    height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            color: ColorTarget::new(width, height, Color::BLACK),
            depth: DepthBuffer::new(width, height, DepthTest::default().farthest()),
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn color(&self) -> &ColorTarget {
        &self.color
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Reset before a pass
    pub fn clear(&mut self, color: Color, depth: f32) {
        self.color.clear(color);
        self.depth.clear(depth);
    }

    /// Split into disjoint bands of `rows_per_band` rows (the last may be
    /// shorter). Each band can be handed to a different thread.
    pub fn bands_mut(&mut self, rows_per_band: usize) -> Vec<FramebufferBand<'_>> {
        let width = self.width;
        let height = self.height;
        let chunk = rows_per_band.max(1) * width.max(1);

        self.color
            .pixels
            .chunks_mut(chunk)
            .zip(self.depth.values.chunks_mut(chunk))
            .enumerate()
            .map(|(i, (color, depth))| {
                let first_row = i * rows_per_band.max(1);
                let rows = color.len() / width.max(1);
                FramebufferBand {
                    color,
                    depth,
                    width,
                    height,
                    first_row,
                    last_row: first_row + rows,
                }
            })
            .collect()
    }
}

impl RenderTarget for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn rows(&self) -> Range<usize> {
        0..self.height
    }

    fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth.values[y * self.width + x]
    }

    fn write(&mut self, x: usize, y: usize, z: f32, color: Color) {
        let idx = y * self.width + x;
        self.depth.values[idx] = z;
        self.color.pixels[idx] = color;
    }
}

/// Exclusive borrow of a contiguous run of framebuffer rows
pub struct FramebufferBand<'a> {
    color: &'a mut [Color],
    depth: &'a mut [f32],
    width: usize,
    height: usize,
    first_row: usize,
    last_row: usize,
}

impl RenderTarget for FramebufferBand<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn rows(&self) -> Range<usize> {
        self.first_row..self.last_row
    }

    fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[(y - self.first_row) * self.width + x]
    }

    fn write(&mut self, x: usize, y: usize, z: f32, color: Color) {
        let idx = (y - self.first_row) * self.width + x;
        self.depth[idx] = z;
        self.color[idx] = color;
    }
}
