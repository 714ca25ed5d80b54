//! Programmable pipeline stages
//!
//! The vertex stage maps one mesh vertex to screen space; the fragment stage
//! turns one interpolated fragment into a color or discards it. Both are
//! narrow traits so strategies can be swapped per pass.

use super::math::{Mat4, Vec2, Vec3};
use super::transform::ScreenMapping;
use super::types::{Color, Sampler, Vertex};

/// Per-pass constants visible to both stages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    /// Object to world transform; assumed rigid so it can move normals too
    pub model: Mat4,
    pub mapping: ScreenMapping,
    pub light_dir: Vec3,
}

impl Uniforms {
    pub fn new(mapping: ScreenMapping, light_dir: Vec3) -> Self {
        Self {
            model: Mat4::IDENTITY,
            mapping,
            light_dir,
        }
    }

    pub fn with_model(mut self, model: Mat4) -> Self {
        self.model = model;
        self
    }
}

/// Vertex stage output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedVertex {
    /// x, y in pixels; z is the depth proxy
    pub screen: Vec3,
    /// 1 / clip w, used by perspective-correct interpolation
    pub inv_w: f32,
    pub normal: Vec3,
    pub uv: Vec2,
    pub world_position: Vec3,
}

impl ShadedVertex {
    /// Vertex already in screen space with orthographic `w`
    pub fn at(screen: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            screen,
            inv_w: 1.0,
            normal,
            uv,
            world_position: screen,
        }
    }
}

/// One covered pixel with interpolated attributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub x: usize,
    pub y: usize,
    pub depth: f32,
    /// Interpolated, not renormalized
    pub normal: Vec3,
    pub uv: Vec2,
    pub world_position: Vec3,
    /// Screen-space barycentric weights of the pixel
    pub weights: Vec3,
}

pub trait VertexShader {
    /// `None` when the vertex cannot be placed on screen; faces using it
    /// are skipped as degenerate
    fn shade(&self, vertex: &Vertex, uniforms: &Uniforms) -> Option<ShadedVertex>;
}

pub trait FragmentShader {
    /// `None` discards the fragment: no color and no depth write
    fn shade(
        &self,
        fragment: &Fragment,
        texture: Option<&dyn Sampler>,
        uniforms: &Uniforms,
    ) -> Option<Color>;
}

/// Model transform followed by the configured screen mapping
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardVertexShader;

impl VertexShader for StandardVertexShader {
    fn shade(&self, vertex: &Vertex, uniforms: &Uniforms) -> Option<ShadedVertex> {
        let world_position = uniforms.model.transform_point(vertex.pos);
        let screen = uniforms.mapping.to_screen(world_position)?;

        Some(ShadedVertex {
            screen: screen.pos,
            inv_w: screen.inv_w,
            normal: uniforms.model.transform_dir(vertex.normal),
            uv: vertex.uv,
            world_position,
        })
    }
}

/// Lambert lighting with an optional texture.
///
/// Discards fragments whose normal faces away from the viewer (negative z)
/// or away from the light. Textured fragments are modulated by the light
/// intensity; untextured ones are the intensity as grey.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffuseShader;

impl FragmentShader for DiffuseShader {
    fn shade(
        &self,
        fragment: &Fragment,
        texture: Option<&dyn Sampler>,
        uniforms: &Uniforms,
    ) -> Option<Color> {
        if fragment.normal.z < 0.0 {
            return None;
        }
        let intensity = uniforms.light_dir.dot(fragment.normal);
        if intensity < 0.0 || intensity.is_nan() {
            return None;
        }

        Some(match texture {
            Some(tex) => tex.sample_uv(fragment.uv).shade(intensity),
            None => Color::grey(intensity),
        })
    }
}

/// Constant color, never discards
#[derive(Debug, Clone, Copy)]
pub struct FlatColorShader {
    pub color: Color,
}

impl FragmentShader for FlatColorShader {
    fn shade(&self, _: &Fragment, _: Option<&dyn Sampler>, _: &Uniforms) -> Option<Color> {
        Some(self.color)
    }
}

/// Debug view: normal components mapped from [-1, 1] to color channels
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalShader;

impl FragmentShader for NormalShader {
    fn shade(&self, fragment: &Fragment, _: Option<&dyn Sampler>, _: &Uniforms) -> Option<Color> {
        if fragment.normal.z < 0.0 {
            return None;
        }
        let n = fragment.normal.normalize();
        Some(Color::from_unit(
            n.x * 0.5 + 0.5,
            n.y * 0.5 + 0.5,
            n.z * 0.5 + 0.5,
            1.0,
        ))
    }
}
