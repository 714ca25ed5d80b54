//! Triangle scan conversion
//!
//! Pixels are sampled at integer coordinates `(x, y)`. The bounding box is
//! inclusive on both ends: every integer point inside the triangle's extent
//! is tested, clamped to the target. Pixels are visited in scanline order.

use super::math::{edge_function, Vec2, Vec3, AREA_EPSILON};
use super::shader::{Fragment, ShadedVertex};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Which on-edge pixels a triangle owns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillRule {
    /// All three weights `>= 0`. Pixels on a shared edge are covered by
    /// both triangles.
    #[default]
    Inclusive,
    /// Pixels exactly on an edge belong to the triangle only if that edge is
    /// a top or left edge, so shared edges are covered once.
    TopLeft,
}

/// How carried attributes (normal, UV, world position) are weighted.
/// Depth is always interpolated in screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Screen-space weights
    #[default]
    Affine,
    /// Weights corrected by each vertex's `1/w`
    PerspectiveCorrect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterOptions {
    pub fill_rule: FillRule,
    pub interpolation: Interpolation,
}

/// Inclusive pixel bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub max_x: usize,
    pub min_y: usize,
    pub max_y: usize,
}

impl BoundingBox {
    /// Integer points covering the triangle's extent, clamped to columns
    /// `0..width` and the given rows. `None` if nothing is left.
    pub fn clamped(v: [Vec3; 3], width: usize, rows: Range<usize>) -> Option<Self> {
        if width == 0 || rows.is_empty() {
            return None;
        }
        let lo_x = v[0].x.min(v[1].x).min(v[2].x).ceil().max(0.0);
        let hi_x = v[0].x.max(v[1].x).max(v[2].x).floor().min((width - 1) as f32);
        let lo_y = v[0].y.min(v[1].y).min(v[2].y).ceil().max(rows.start as f32);
        let hi_y = v[0].y.max(v[1].y).max(v[2].y).floor().min((rows.end - 1) as f32);

        // Also rejects NaN
        if !(lo_x <= hi_x && lo_y <= hi_y) {
            return None;
        }

        Some(Self {
            min_x: lo_x as usize,
            max_x: hi_x as usize,
            min_y: lo_y as usize,
            max_y: hi_y as usize,
        })
    }
}

/// A non-degenerate triangle ready for scan conversion
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    verts: [ShadedVertex; 3],
    /// Signed doubled area
    area: f32,
    /// Per-edge ownership of on-edge pixels under the top-left rule;
    /// edge i is opposite vertex i
    owns_edge: [bool; 3],
}

impl Triangle {
    /// `None` for zero-area or non-finite triangles
    pub fn new(v0: ShadedVertex, v1: ShadedVertex, v2: ShadedVertex) -> Option<Self> {
        let verts = [v0, v1, v2];
        if verts.iter().any(|v| !v.screen.is_finite() || !v.inv_w.is_finite()) {
            return None;
        }

        let p = verts.map(|v| Vec2::new(v.screen.x, v.screen.y));
        let area = edge_function(p[0], p[1], p[2]);
        if !area.is_finite() || area.abs() < AREA_EPSILON {
            return None;
        }

        // With the winding normalized to positive area (clockwise on a
        // y-down screen) top edges run +x and left edges run -y.
        let sign = area.signum();
        let owns = |a: Vec2, b: Vec2| {
            let dx = (b.x - a.x) * sign;
            let dy = (b.y - a.y) * sign;
            dy < 0.0 || (dy == 0.0 && dx > 0.0)
        };

        Some(Self {
            verts,
            area,
            owns_edge: [owns(p[1], p[2]), owns(p[2], p[0]), owns(p[0], p[1])],
        })
    }

    fn screen(&self) -> [Vec3; 3] {
        self.verts.map(|v| v.screen)
    }

    /// Raw edge values at p; positive inside for either winding
    fn edges(&self, p: Vec2) -> [f32; 3] {
        let s = self.screen().map(|v| Vec2::new(v.x, v.y));
        let sign = self.area.signum();
        [
            edge_function(s[1], s[2], p) * sign,
            edge_function(s[2], s[0], p) * sign,
            edge_function(s[0], s[1], p) * sign,
        ]
    }

    fn covers(&self, edges: [f32; 3], rule: FillRule) -> bool {
        match rule {
            FillRule::Inclusive => edges.iter().all(|&e| e >= 0.0),
            FillRule::TopLeft => edges
                .iter()
                .zip(self.owns_edge)
                .all(|(&e, owned)| e > 0.0 || (e == 0.0 && owned)),
        }
    }

    /// Fragments for the pixels of this triangle in `0..width` x `rows`
    pub fn fragments(&self, width: usize, rows: Range<usize>, options: RasterOptions) -> Fragments {
        Fragments {
            triangle: Some(*self),
            bbox: BoundingBox::clamped(self.screen(), width, rows),
            x: 0,
            y: 0,
            started: false,
            options,
        }
    }

    /// Interpolate a fragment at pixel (x, y) from screen-space weights
    fn fragment(&self, x: usize, y: usize, w: Vec3, interpolation: Interpolation) -> Fragment {
        let [v0, v1, v2] = self.verts;
        let depth = w.x * v0.screen.z + w.y * v1.screen.z + w.z * v2.screen.z;

        let a = match interpolation {
            Interpolation::Affine => w,
            Interpolation::PerspectiveCorrect => {
                let c = Vec3::new(w.x * v0.inv_w, w.y * v1.inv_w, w.z * v2.inv_w);
                let sum = c.x + c.y + c.z;
                if sum.is_finite() && sum.abs() >= f32::EPSILON {
                    c.scale(1.0 / sum)
                } else {
                    w
                }
            }
        };

        Fragment {
            x,
            y,
            depth,
            normal: v0.normal * a.x + v1.normal * a.y + v2.normal * a.z,
            uv: v0.uv * a.x + v1.uv * a.y + v2.uv * a.z,
            world_position: v0.world_position * a.x
                + v1.world_position * a.y
                + v2.world_position * a.z,
            weights: w,
        }
    }
}

/// Lazy scanline iterator over a triangle's covered pixels
#[derive(Debug, Clone)]
pub struct Fragments {
    triangle: Option<Triangle>,
    bbox: Option<BoundingBox>,
    x: usize,
    y: usize,
    started: bool,
    options: RasterOptions,
}

impl Fragments {
    pub fn empty() -> Self {
        Self {
            triangle: None,
            bbox: None,
            x: 0,
            y: 0,
            started: false,
            options: RasterOptions::default(),
        }
    }

    /// True when the source triangle was rejected as degenerate
    pub fn is_degenerate(&self) -> bool {
        self.triangle.is_none()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }

    /// Move to the next pixel in the box; false once exhausted
    fn advance(&mut self, bbox: &BoundingBox) -> bool {
        if !self.started {
            self.started = true;
            self.x = bbox.min_x;
            self.y = bbox.min_y;
            return true;
        }
        if self.x < bbox.max_x {
            self.x += 1;
            return true;
        }
        if self.y < bbox.max_y {
            self.x = bbox.min_x;
            self.y += 1;
            return true;
        }
        false
    }
}

impl Iterator for Fragments {
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        let tri = self.triangle?;
        let bbox = self.bbox?;

        while self.advance(&bbox) {
            let (x, y) = (self.x, self.y);
            let edges = tri.edges(Vec2::new(x as f32, y as f32));
            if !tri.covers(edges, self.options.fill_rule) {
                continue;
            }
            let area = tri.area.abs();
            let w = Vec3::new(edges[0] / area, edges[1] / area, edges[2] / area);
            return Some(tri.fragment(x, y, w, self.options.interpolation));
        }

        self.bbox = None;
        None
    }
}

/// Scan-convert one triangle into a `width` x `height` target
pub fn rasterize(
    v0: ShadedVertex,
    v1: ShadedVertex,
    v2: ShadedVertex,
    width: usize,
    height: usize,
    options: RasterOptions,
) -> Fragments {
    match Triangle::new(v0, v1, v2) {
        Some(tri) => tri.fragments(width, 0..height, options),
        None => Fragments::empty(),
    }
}
