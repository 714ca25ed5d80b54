//! Object space to screen space mapping
//!
//! Screen x/y are pixel coordinates in `[0, width] x [0, height]`; z is the
//! depth proxy, increasing toward the viewer for both policies.

use super::math::{Mat4, Vec3};

/// Default depth range of the projective viewport
pub const DEPTH_RANGE: f32 = 255.0;

/// A position placed on screen, with the reciprocal of its clip-space `w`
/// (1.0 under orthographic mapping) for perspective-correct interpolation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub pos: Vec3,
    pub inv_w: f32,
}

/// How positions are mapped to the screen. One policy is used per pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScreenMapping {
    /// Input already normalized to [-1, 1] on every axis
    Orthographic { width: f32, height: f32 },
    /// `viewport * projection * p`, then divide by `w`
    Projective { projection: Mat4, viewport: Mat4 },
}

impl ScreenMapping {
    pub fn orthographic(width: usize, height: usize) -> Self {
        ScreenMapping::Orthographic {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Camera on the +z axis at `camera_distance`, looking at the origin.
    /// The viewport covers the centered `scale` fraction of the target.
    pub fn perspective(
        width: usize,
        height: usize,
        camera_distance: f32,
        scale: f32,
        depth_range: f32,
    ) -> Self {
        let (w, h) = (width as f32, height as f32);
        ScreenMapping::Projective {
            projection: camera_projection(camera_distance),
            viewport: viewport(
                w * (1.0 - scale) / 2.0,
                h * (1.0 - scale) / 2.0,
                w * scale,
                h * scale,
                depth_range,
            ),
        }
    }

    /// Map a position to the screen. `None` when the perspective divide
    /// would blow up (`w` near zero or non-finite results).
    pub fn to_screen(&self, p: Vec3) -> Option<ScreenPoint> {
        match *self {
            ScreenMapping::Orthographic { width, height } => {
                let pos = Vec3::new(
                    (p.x + 1.0) * width / 2.0,
                    (p.y + 1.0) * height / 2.0,
                    (p.z + 1.0) / 2.0,
                );
                pos.is_finite().then_some(ScreenPoint { pos, inv_w: 1.0 })
            }
            ScreenMapping::Projective { projection, viewport } => {
                let clip = viewport * projection * p.extend(1.0);
                let pos = clip.project()?;
                Some(ScreenPoint {
                    pos,
                    inv_w: 1.0 / clip.w,
                })
            }
        }
    }
}

/// Maps normalized device coordinates to the pixel rectangle (x, y, w, h)
/// and z from [-1, 1] to [0, depth]
pub fn viewport(x: f32, y: f32, w: f32, h: f32, depth: f32) -> Mat4 {
    let mut m = Mat4::IDENTITY;
    m.set(0, 3, x + w / 2.0);
    m.set(1, 3, y + h / 2.0);
    m.set(2, 3, depth / 2.0);

    m.set(0, 0, w / 2.0);
    m.set(1, 1, h / 2.0);
    m.set(2, 2, depth / 2.0);
    m
}

/// Central projection for a camera on the +z axis: `w = 1 - z / distance`
pub fn camera_projection(camera_distance: f32) -> Mat4 {
    let mut m = Mat4::IDENTITY;
    if camera_distance != 0.0 {
        m.set(3, 2, -1.0 / camera_distance);
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthographic_corners() {
        let mapping = ScreenMapping::orthographic(100, 50);
        let lo = mapping.to_screen(Vec3::new(-1.0, -1.0, -1.0)).unwrap();
        let hi = mapping.to_screen(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(lo.pos, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(hi.pos, Vec3::new(100.0, 50.0, 1.0));
        assert_eq!(hi.inv_w, 1.0);
    }

    #[test]
    fn test_perspective_centers_origin() {
        let mapping = ScreenMapping::perspective(400, 400, 3.0, 0.75, DEPTH_RANGE);
        let p = mapping.to_screen(Vec3::ZERO).unwrap();
        assert!((p.pos.x - 200.0).abs() < 1e-4);
        assert!((p.pos.y - 200.0).abs() < 1e-4);
        assert!((p.pos.z - DEPTH_RANGE / 2.0).abs() < 1e-4);
        assert!((p.inv_w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_perspective_nearer_points_are_larger_and_deeper() {
        let mapping = ScreenMapping::perspective(400, 400, 3.0, 0.75, DEPTH_RANGE);
        let far = mapping.to_screen(Vec3::new(1.0, 0.0, -1.0)).unwrap();
        let near = mapping.to_screen(Vec3::new(1.0, 0.0, 1.0)).unwrap();
        assert!(near.pos.x > far.pos.x);
        assert!(near.pos.z > far.pos.z);
    }

    #[test]
    fn test_point_at_camera_plane_is_rejected() {
        let mapping = ScreenMapping::perspective(400, 400, 3.0, 0.75, DEPTH_RANGE);
        assert!(mapping.to_screen(Vec3::new(0.5, 0.5, 3.0)).is_none());
    }
}
