//! Vector and matrix math for the pipeline
//!
//! Plain `Copy` value types. Matrices are row-major and multiply column
//! vectors (`m * v`), so `a * b` applies `b` first.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Areas below this are treated as degenerate triangles
pub const AREA_EPSILON: f32 = 1e-6;

/// `w` values closer to zero than this are rejected by the perspective divide
pub const W_EPSILON: f32 = 1e-6;

/// 2D Vector (texture coordinates, pixel positions)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        self.scale(s)
    }
}

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    /// Axis pointing from the scene toward the viewer
    pub const VIEW: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// 4D Vector (homogeneous coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn dot(self, other: Vec4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Perspective divide. `None` when `w` is too close to zero to divide by.
    pub fn project(self) -> Option<Vec3> {
        if self.w.abs() < W_EPSILON || !self.w.is_finite() {
            return None;
        }
        let inv = 1.0 / self.w;
        let v = Vec3::new(self.x * inv, self.y * inv, self.z * inv);
        v.is_finite().then_some(v)
    }
}

/// 4x4 matrix, row-major
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.m[row][col] = value;
    }

    pub fn row(&self, row: usize) -> Vec4 {
        let r = self.m[row];
        Vec4::new(r[0], r[1], r[2], r[3])
    }

    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }

    /// Transform a point (w = 1) without dividing
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.mul_vec4(p.extend(1.0)).xyz()
    }

    /// Transform a direction (w = 0)
    pub fn transform_dir(&self, d: Vec3) -> Vec3 {
        self.mul_vec4(d.extend(0.0)).xyz()
    }

    pub fn translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.set(0, 3, t.x);
        m.set(1, 3, t.y);
        m.set(2, 3, t.z);
        m
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.set(1, 1, c);
        m.set(1, 2, -s);
        m.set(2, 1, s);
        m.set(2, 2, c);
        m
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.set(0, 0, c);
        m.set(0, 2, s);
        m.set(2, 0, -s);
        m.set(2, 2, c);
        m
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        let mut out = Mat4 { m: [[0.0; 4]; 4] };
        for row in 0..4 {
            for col in 0..4 {
                out.m[row][col] = (0..4).map(|k| self.m[row][k] * other.m[k][col]).sum();
            }
        }
        out
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        self.mul_vec4(v)
    }
}

/// Signed doubled area of (a, b, p) in the xy plane.
/// Positive when p lies to the left of a->b in a y-up frame.
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Barycentric weights of p with respect to (v0, v1, v2), using only x/y.
/// Returns `None` for degenerate (zero-area or non-finite) triangles.
/// Weights are `[a0, a1, a2]` packed into a Vec3; they sum to 1.
pub fn barycentric(p: Vec2, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<Vec3> {
    let (a, b, c) = (
        Vec2::new(v0.x, v0.y),
        Vec2::new(v1.x, v1.y),
        Vec2::new(v2.x, v2.y),
    );
    let area = edge_function(a, b, c);
    if !area.is_finite() || area.abs() < AREA_EPSILON {
        return None;
    }

    Some(Vec3::new(
        edge_function(b, c, p) / area,
        edge_function(c, a, p) / area,
        edge_function(a, b, p) / area,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert!((n.len() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mat4_identity_and_product() {
        let t = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let r = Mat4::rotation_y(std::f32::consts::PI);
        assert_eq!(Mat4::IDENTITY * t, t);

        // Rotate first, then translate
        let p = (t * r).transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert!((p - Vec3::new(0.0, 3.0, 2.0)).len() < 1e-5);

        // Directions ignore translation
        let d = t.transform_dir(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(d, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let r = Mat4::rotation_y(std::f32::consts::FRAC_PI_2);
        let v = r.transform_dir(Vec3::new(0.0, 0.0, 1.0));
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!(v.z.abs() < 1e-6);
    }

    #[test]
    fn test_project_rejects_zero_w() {
        assert_eq!(Vec4::new(1.0, 1.0, 1.0, 0.0).project(), None);
        assert_eq!(Vec4::new(1.0, 1.0, 1.0, 1e-9).project(), None);
        assert_eq!(
            Vec4::new(2.0, 4.0, 6.0, 2.0).project(),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_barycentric_inside() {
        let v1 = Vec3::new(0.0, 0.0, 0.0);
        let v2 = Vec3::new(10.0, 0.0, 0.0);
        let v3 = Vec3::new(5.0, 10.0, 0.0);
        let bc = barycentric(Vec2::new(5.0, 3.0), v1, v2, v3).unwrap();
        assert!(bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0);
        assert!((bc.x + bc.y + bc.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_barycentric_corners_are_exact() {
        let v0 = Vec3::new(10.0, 10.0, 0.0);
        let v1 = Vec3::new(90.0, 20.0, 0.0);
        let v2 = Vec3::new(40.0, 80.0, 0.0);
        for (p, expected) in [
            (v0, Vec3::new(1.0, 0.0, 0.0)),
            (v1, Vec3::new(0.0, 1.0, 0.0)),
            (v2, Vec3::new(0.0, 0.0, 1.0)),
        ] {
            let bc = barycentric(Vec2::new(p.x, p.y), v0, v1, v2).unwrap();
            assert_eq!(bc, expected);
        }
    }

    #[test]
    fn test_barycentric_outside_and_degenerate() {
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(10.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 10.0, 0.0);
        let bc = barycentric(Vec2::new(20.0, 20.0), v0, v1, v2).unwrap();
        assert!(bc.x < 0.0);

        // Collinear points have no area
        let flat = barycentric(Vec2::new(1.0, 1.0), v0, v1, Vec3::new(5.0, 0.0, 0.0));
        assert!(flat.is_none());
    }
}
