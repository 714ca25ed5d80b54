//! Core data types: colors, mesh data, textures

use super::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from unit-range floats. Channels are clamped to [0, 1] and
    /// rounded to 8 bits; NaN maps to 0.
    pub fn from_unit(r: f32, g: f32, b: f32, a: f32) -> Self {
        fn channel(c: f32) -> u8 {
            if c.is_nan() {
                return 0;
            }
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a: channel(a),
        }
    }

    /// Channels normalized to [0, 1]
    pub fn to_unit(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Opaque grey of the given unit intensity
    pub fn grey(intensity: f32) -> Self {
        Self::from_unit(intensity, intensity, intensity, 1.0)
    }

    /// Multiply RGB by intensity, clamping each channel; result is opaque
    pub fn shade(self, intensity: f32) -> Self {
        let [r, g, b, _] = self.to_unit();
        Self::from_unit(r * intensity, g * intensity, b * intensity, 1.0)
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A vertex with position, texture coordinate, and normal (object space)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    /// Not required to be unit length
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { pos, uv, normal }
    }
}

/// A triangle face: three indices into the mesh's vertex array, in the
/// source winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
    pub texture_id: Option<usize>,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self {
            v0,
            v1,
            v2,
            texture_id: None,
        }
    }

    pub fn with_texture(v0: usize, v1: usize, v2: usize, texture_id: usize) -> Self {
        Self {
            v0,
            v1,
            v2,
            texture_id: Some(texture_id),
        }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.v0, self.v1, self.v2]
    }
}

/// Triangle mesh. Populated by the caller; the pipeline only reads it.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Build from unindexed triangles, one vertex slot per corner
    pub fn from_triangles(triangles: &[[Vertex; 3]], texture_id: Option<usize>) -> Self {
        let mut mesh = Self::default();
        for tri in triangles {
            let base = mesh.vertices.len();
            mesh.vertices.extend_from_slice(tri);
            mesh.faces.push(Face {
                v0: base,
                v1: base + 1,
                v2: base + 2,
                texture_id,
            });
        }
        mesh
    }

    /// Index of the first face referencing a vertex that does not exist
    pub fn first_invalid_face(&self) -> Option<usize> {
        self.faces
            .iter()
            .position(|f| f.indices().iter().any(|&i| i >= self.vertices.len()))
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("texture has no pixels ({width}x{height})")]
    Empty { width: usize, height: usize },
}

/// Source of texels addressable by integer coordinate (row 0 is the top)
pub trait Sampler {
    fn size(&self) -> (usize, usize);

    /// Texel at (x, y); callers keep coordinates in range
    fn texel(&self, x: usize, y: usize) -> Color;

    /// Nearest-texel lookup at a texture coordinate. U maps to x directly,
    /// V is flipped (`y = height - v * height`); both are clamped to the edge.
    fn sample_uv(&self, uv: Vec2) -> Color {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return Color::BLACK;
        }
        let fx = uv.x * w as f32;
        let fy = h as f32 - uv.y * h as f32;
        // `as usize` saturates negatives and NaN to 0
        let x = (fx as usize).min(w - 1);
        let y = (fy as usize).min(h - 1);
        self.texel(x, y)
    }
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
        }
    }

    /// Convert a decoded image into a texture
    pub fn from_image(img: &image::DynamicImage, name: String) -> Result<Self, TextureError> {
        let rgba = img.to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
            name,
        })
    }

    /// Load texture from an image file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_image(&img, name)?;
        log::info!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
        Ok(tex)
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut tex = Self::new(width, height);
        tex.name = "checkerboard".to_string();
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                tex.set_pixel(x, y, if checker { color1 } else { color2 });
            }
        }
        tex
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }
}

impl Sampler for Texture {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn texel(&self, x: usize, y: usize) -> Color {
        self.get_pixel(x, y)
    }
}
