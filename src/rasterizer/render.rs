//! Pass driver: vertex stage, scan conversion, depth test, fragment stage
//!
//! For each covered pixel the depth test runs first, then the fragment
//! stage. Only a fragment that passes the test and is not discarded writes,
//! and it writes color and depth together. Parallel passes split the
//! framebuffer into disjoint row bands; each band draws every triangle in
//! face order, so the result is identical to a serial pass.

use super::buffer::{DepthTest, Framebuffer, RenderTarget};
use super::math::{Mat4, Vec2, Vec3};
use super::raster::{RasterOptions, Triangle};
use super::shader::{FragmentShader, ShadedVertex, Uniforms, VertexShader};
use super::types::{Color, Face, Mesh, Sampler, Texture, Vertex};
use rayon::prelude::*;
use std::ops::AddAssign;
use thiserror::Error;

/// Rows per band in parallel passes
pub const BAND_ROWS: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("face {face} references texture {texture_id}, but only {available} textures are bound")]
    MissingTexture {
        face: usize,
        texture_id: usize,
        available: usize,
    },
    #[error("face {face} references a vertex outside the mesh ({vertices} vertices)")]
    InvalidFace { face: usize, vertices: usize },
}

/// Fixed-function state of a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub depth_test: DepthTest,
    /// Depth reset value; the convention's farthest value when `None`
    pub clear_depth: Option<f32>,
    pub background: Color,
    pub raster: RasterOptions,
    /// Split the framebuffer into row bands rendered on the rayon pool
    pub parallel: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            depth_test: DepthTest::default(),
            clear_depth: None,
            background: Color::BLACK,
            raster: RasterOptions::default(),
            parallel: false,
        }
    }
}

impl RenderSettings {
    pub fn clear_depth_value(&self) -> f32 {
        self.clear_depth.unwrap_or_else(|| self.depth_test.farthest())
    }

    /// Reset color and depth before a pass
    pub fn clear(&self, fb: &mut Framebuffer) {
        fb.clear(self.background, self.clear_depth_value());
    }
}

/// The programmable stages plus their constants
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<V, F> {
    pub vertex_shader: V,
    pub fragment_shader: F,
    pub uniforms: Uniforms,
}

impl<V: VertexShader, F: FragmentShader> Pipeline<V, F> {
    pub fn new(vertex_shader: V, fragment_shader: F, uniforms: Uniforms) -> Self {
        Self {
            vertex_shader,
            fragment_shader,
            uniforms,
        }
    }
}

/// Counters for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub faces: usize,
    /// Zero-area, non-finite or unprojectable faces
    pub degenerate_faces: usize,
    /// Covered pixels produced by the rasterizer
    pub fragments: usize,
    pub depth_rejected: usize,
    pub discarded: usize,
    pub written: usize,
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, other: RenderStats) {
        self.faces += other.faces;
        self.degenerate_faces += other.degenerate_faces;
        self.fragments += other.fragments;
        self.depth_rejected += other.depth_rejected;
        self.discarded += other.discarded;
        self.written += other.written;
    }
}

/// A face after the vertex stage, ready to rasterize
struct PreparedFace<'t> {
    triangle: Triangle,
    texture: Option<&'t Texture>,
}

/// Check every face against the mesh and bound textures before drawing
fn validate(mesh: &Mesh, textures: &[Texture]) -> Result<(), RenderError> {
    check_faces(mesh, textures).inspect_err(|e| log::warn!("Render pass rejected: {}", e))
}

fn check_faces(mesh: &Mesh, textures: &[Texture]) -> Result<(), RenderError> {
    if let Some(face) = mesh.first_invalid_face() {
        return Err(RenderError::InvalidFace {
            face,
            vertices: mesh.vertices.len(),
        });
    }
    for (face, f) in mesh.faces.iter().enumerate() {
        if let Some(texture_id) = f.texture_id {
            if texture_id >= textures.len() {
                return Err(RenderError::MissingTexture {
                    face,
                    texture_id,
                    available: textures.len(),
                });
            }
        }
    }
    Ok(())
}

/// Run the vertex stage on every vertex and assemble triangles
fn prepare<'t, V: VertexShader, F: FragmentShader>(
    mesh: &Mesh,
    textures: &'t [Texture],
    pipeline: &Pipeline<V, F>,
    stats: &mut RenderStats,
) -> Vec<PreparedFace<'t>> {
    let shaded: Vec<Option<ShadedVertex>> = mesh
        .vertices
        .iter()
        .map(|v| pipeline.vertex_shader.shade(v, &pipeline.uniforms))
        .collect();

    let mut prepared = Vec::with_capacity(mesh.faces.len());
    for face in &mesh.faces {
        stats.faces += 1;
        let [a, b, c] = face.indices().map(|i| shaded[i]);
        let triangle = match (a, b, c) {
            (Some(a), Some(b), Some(c)) => Triangle::new(a, b, c),
            _ => None,
        };
        match triangle {
            Some(triangle) => prepared.push(PreparedFace {
                triangle,
                texture: face.texture_id.map(|id| &textures[id]),
            }),
            None => stats.degenerate_faces += 1,
        }
    }
    prepared
}

/// Draw prepared faces into whatever rows `target` owns
fn draw_faces<T: RenderTarget, F: FragmentShader>(
    target: &mut T,
    faces: &[PreparedFace<'_>],
    fragment_shader: &F,
    uniforms: &Uniforms,
    settings: &RenderSettings,
) -> RenderStats {
    let mut stats = RenderStats::default();
    let test = settings.depth_test;

    for face in faces {
        let texture = face.texture.map(|t| t as &dyn Sampler);
        for frag in face.triangle.fragments(target.width(), target.rows(), settings.raster) {
            stats.fragments += 1;
            if !test.passes(frag.depth, target.depth_at(frag.x, frag.y)) {
                stats.depth_rejected += 1;
                continue;
            }
            match fragment_shader.shade(&frag, texture, uniforms) {
                Some(color) => {
                    target.write(frag.x, frag.y, frag.depth, color);
                    stats.written += 1;
                }
                None => stats.discarded += 1,
            }
        }
    }
    stats
}

/// Render a mesh into the framebuffer without clearing it first.
///
/// Fails before touching the framebuffer if a face references a missing
/// vertex or texture.
pub fn render_mesh<V, F>(
    fb: &mut Framebuffer,
    mesh: &Mesh,
    textures: &[Texture],
    pipeline: &Pipeline<V, F>,
    settings: &RenderSettings,
) -> Result<RenderStats, RenderError>
where
    V: VertexShader,
    F: FragmentShader + Sync,
{
    validate(mesh, textures)?;
    Ok(draw(fb, mesh, textures, pipeline, settings))
}

/// Clear the framebuffer, then render the mesh: one full-frame pass
pub fn render_frame<V, F>(
    fb: &mut Framebuffer,
    mesh: &Mesh,
    textures: &[Texture],
    pipeline: &Pipeline<V, F>,
    settings: &RenderSettings,
) -> Result<RenderStats, RenderError>
where
    V: VertexShader,
    F: FragmentShader + Sync,
{
    validate(mesh, textures)?;
    settings.clear(fb);
    Ok(draw(fb, mesh, textures, pipeline, settings))
}

/// Vertex stage plus drawing; `mesh` and `textures` must already be validated
fn draw<V, F>(
    fb: &mut Framebuffer,
    mesh: &Mesh,
    textures: &[Texture],
    pipeline: &Pipeline<V, F>,
    settings: &RenderSettings,
) -> RenderStats
where
    V: VertexShader,
    F: FragmentShader + Sync,
{
    let mut stats = RenderStats::default();
    let faces = prepare(mesh, textures, pipeline, &mut stats);

    let fragment_shader = &pipeline.fragment_shader;
    let uniforms = &pipeline.uniforms;
    let drawn = if settings.parallel {
        fb.bands_mut(BAND_ROWS)
            .into_par_iter()
            .map(|mut band| draw_faces(&mut band, &faces, fragment_shader, uniforms, settings))
            .reduce(RenderStats::default, |mut a, b| {
                a += b;
                a
            })
    } else {
        draw_faces(fb, &faces, fragment_shader, uniforms, settings)
    };
    stats += drawn;

    log::debug!(
        "Rendered {} faces ({} degenerate): {} fragments, {} written, {} discarded, {} depth-rejected",
        stats.faces,
        stats.degenerate_faces,
        stats.fragments,
        stats.written,
        stats.discarded,
        stats.depth_rejected,
    );
    stats
}

/// Create a simple test cube mesh (unit half-extent, textured with id 0)
pub fn create_test_cube() -> Mesh {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    // Cube vertices with positions, UVs, and normals
    let positions = [
        // Front face
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        // Back face
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        // Top face
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, -1.0),
        // Bottom face
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        // Right face
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        // Left face
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
    ];

    let normals = [
        Vec3::new(0.0, 0.0, 1.0),  // Front
        Vec3::new(0.0, 0.0, -1.0), // Back
        Vec3::new(0.0, 1.0, 0.0),  // Top
        Vec3::new(0.0, -1.0, 0.0), // Bottom
        Vec3::new(1.0, 0.0, 0.0),  // Right
        Vec3::new(-1.0, 0.0, 0.0), // Left
    ];

    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    for (face_idx, &normal) in normals.iter().enumerate() {
        let base = face_idx * 4;
        for i in 0..4 {
            vertices.push(Vertex::new(positions[base + i], uvs[i], normal));
        }

        // Two triangles per face
        faces.push(Face::with_texture(base, base + 1, base + 2, 0));
        faces.push(Face::with_texture(base, base + 2, base + 3, 0));
    }

    Mesh::new(vertices, faces)
}

/// Model matrix that turns the cube so three faces are visible
pub fn showcase_rotation() -> Mat4 {
    Mat4::rotation_x(0.5) * Mat4::rotation_y(0.6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::raster::{FillRule, Interpolation};
    use crate::rasterizer::shader::{
        DiffuseShader, FlatColorShader, Fragment, NormalShader, StandardVertexShader,
    };
    use crate::rasterizer::transform::ScreenMapping;

    /// Vertex stage that passes object-space positions through as screen space
    struct PassThrough;

    impl VertexShader for PassThrough {
        fn shade(&self, vertex: &Vertex, _: &Uniforms) -> Option<ShadedVertex> {
            Some(ShadedVertex::at(vertex.pos, vertex.normal, vertex.uv))
        }
    }

    fn uniforms() -> Uniforms {
        Uniforms::new(ScreenMapping::orthographic(100, 100), Vec3::VIEW)
    }

    fn flat_triangle(z: f32, normal: Vec3) -> [Vertex; 3] {
        [
            Vertex::new(Vec3::new(10.0, 10.0, z), Vec2::ZERO, normal),
            Vertex::new(Vec3::new(90.0, 20.0, z), Vec2::ZERO, normal),
            Vertex::new(Vec3::new(40.0, 80.0, z), Vec2::ZERO, normal),
        ]
    }

    /// Each face gets its own color: face 0 red, face 1 green
    struct ByDepthColor;

    impl FragmentShader for ByDepthColor {
        fn shade(&self, f: &Fragment, _: Option<&dyn Sampler>, _: &Uniforms) -> Option<Color> {
            Some(if f.depth < 0.5 { Color::RED } else { Color::GREEN })
        }
    }

    fn two_layers(first: f32, second: f32) -> Mesh {
        Mesh::from_triangles(
            &[flat_triangle(first, Vec3::VIEW), flat_triangle(second, Vec3::VIEW)],
            None,
        )
    }

    #[test]
    fn test_closer_triangle_wins_either_order() {
        let pipeline = Pipeline::new(PassThrough, ByDepthColor, uniforms());
        let settings = RenderSettings::default();

        for mesh in [two_layers(0.2, 0.8), two_layers(0.8, 0.2)] {
            let mut fb = Framebuffer::new(100, 100);
            render_frame(&mut fb, &mesh, &[], &pipeline, &settings).unwrap();
            // Greater depth is closer by default
            assert_eq!(fb.color().get(40, 30), Some(Color::GREEN));
            assert!((fb.depth().get(40, 30).unwrap() - 0.8).abs() < 1e-5);
        }
    }

    #[test]
    fn test_less_is_closer_convention() {
        let pipeline = Pipeline::new(PassThrough, ByDepthColor, uniforms());
        let settings = RenderSettings {
            depth_test: DepthTest::LessIsCloser,
            ..RenderSettings::default()
        };
        let mut fb = Framebuffer::new(100, 100);
        render_frame(&mut fb, &two_layers(0.8, 0.2), &[], &pipeline, &settings).unwrap();
        assert_eq!(fb.color().get(40, 30), Some(Color::RED));
        assert!((fb.depth().get(40, 30).unwrap() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_equal_depth_keeps_first_writer() {
        // Same depth everywhere; NormalShader tells the two faces apart
        let facing = flat_triangle(0.5, Vec3::VIEW);
        let sideways = flat_triangle(0.5, Vec3::new(1.0, 0.0, 0.0));
        let blue = Color::new(128, 128, 255);
        let red = Color::new(255, 128, 128);
        let pipeline = Pipeline::new(PassThrough, NormalShader, uniforms());
        let settings = RenderSettings::default();

        for (faces, expected) in [([facing, sideways], blue), ([sideways, facing], red)] {
            let mesh = Mesh::from_triangles(&faces, None);
            let mut fb = Framebuffer::new(100, 100);
            let stats = render_frame(&mut fb, &mesh, &[], &pipeline, &settings).unwrap();
            assert_eq!(fb.color().get(40, 30), Some(expected));
            assert_eq!(stats.written * 2, stats.fragments);
            assert_eq!(stats.depth_rejected, stats.written);
        }
    }

    #[test]
    fn test_discarded_fragment_never_writes_depth() {
        // A back-facing triangle in front of a lit one must not hide it
        let mesh = Mesh::from_triangles(
            &[
                flat_triangle(0.3, Vec3::VIEW),
                flat_triangle(0.9, Vec3::new(0.0, 0.0, -1.0)),
            ],
            None,
        );
        let pipeline = Pipeline::new(PassThrough, DiffuseShader, uniforms());
        let settings = RenderSettings::default();
        let mut fb = Framebuffer::new(100, 100);
        let stats = render_frame(&mut fb, &mesh, &[], &pipeline, &settings).unwrap();

        assert_eq!(fb.color().get(40, 30), Some(Color::WHITE));
        assert!((fb.depth().get(40, 30).unwrap() - 0.3).abs() < 1e-5);
        assert_eq!(stats.discarded, stats.written);
        assert_eq!(stats.depth_rejected, 0);
    }

    #[test]
    fn test_unlit_fragment_never_writes() {
        // Faces the viewer but points away from the light
        let normal = Vec3::new(0.8, 0.0, 0.6);
        let mesh = Mesh::from_triangles(&[flat_triangle(0.9, normal)], None);
        let u = Uniforms::new(ScreenMapping::orthographic(100, 100), Vec3::new(-1.0, 0.0, 0.0));
        let pipeline = Pipeline::new(PassThrough, DiffuseShader, u);
        let settings = RenderSettings::default();
        let mut fb = Framebuffer::new(100, 100);
        let stats = render_frame(&mut fb, &mesh, &[], &pipeline, &settings).unwrap();

        assert_eq!(stats.written, 0);
        assert!(fb.color().pixels.iter().all(|&c| c == Color::BLACK));
        assert!(fb.depth().values.iter().all(|&d| d == f32::MIN));
    }

    #[test]
    fn test_camera_facing_triangle_renders_white() {
        // Orthographic input in [-1, 1]
        let tri = [
            Vertex::new(Vec3::new(-0.8, -0.8, 0.0), Vec2::ZERO, Vec3::VIEW),
            Vertex::new(Vec3::new(0.8, -0.6, 0.0), Vec2::ZERO, Vec3::VIEW),
            Vertex::new(Vec3::new(0.0, 0.8, 0.0), Vec2::ZERO, Vec3::VIEW),
        ];
        let mesh = Mesh::from_triangles(&[tri], None);
        let pipeline = Pipeline::new(StandardVertexShader, DiffuseShader, uniforms());
        let settings = RenderSettings::default();
        let mut fb = Framebuffer::new(100, 100);
        let stats = render_frame(&mut fb, &mesh, &[], &pipeline, &settings).unwrap();

        assert!(stats.written > 0);
        assert_eq!(stats.written, stats.fragments);
        let white = fb.color().pixels.iter().filter(|&&c| c == Color::WHITE).count();
        assert_eq!(white, stats.written);
        assert!(fb
            .color()
            .pixels
            .iter()
            .all(|&c| c == Color::WHITE || c == Color::BLACK));
    }

    #[test]
    fn test_textured_triangle_shows_unmodulated_texture() {
        let mut tri = flat_triangle(0.5, Vec3::VIEW);
        for v in &mut tri {
            v.uv = Vec2::new(0.5, 0.5);
        }
        let mesh = Mesh::from_triangles(&[tri], Some(0));
        let mut tex = Texture::new(2, 2);
        tex.pixels.fill(Color::new(10, 200, 30));

        let pipeline = Pipeline::new(PassThrough, DiffuseShader, uniforms());
        let mut fb = Framebuffer::new(100, 100);
        render_frame(&mut fb, &mesh, &[tex], &pipeline, &RenderSettings::default()).unwrap();
        assert_eq!(fb.color().get(40, 30), Some(Color::new(10, 200, 30)));
    }

    #[test]
    fn test_missing_texture_is_a_setup_error() {
        let mesh = Mesh::from_triangles(&[flat_triangle(0.5, Vec3::VIEW)], Some(3));
        let pipeline = Pipeline::new(PassThrough, DiffuseShader, uniforms());
        let mut fb = Framebuffer::new(100, 100);
        fb.clear(Color::RED, 0.25);

        let err = render_frame(&mut fb, &mesh, &[], &pipeline, &RenderSettings::default());
        assert_eq!(
            err,
            Err(RenderError::MissingTexture {
                face: 0,
                texture_id: 3,
                available: 0
            })
        );
        // Nothing was touched, not even the clear
        assert!(fb.color().pixels.iter().all(|&c| c == Color::RED));
        assert!(fb.depth().values.iter().all(|&d| d == 0.25));
    }

    #[test]
    fn test_invalid_face_is_a_setup_error() {
        let mesh = Mesh::new(vec![Vertex::default()], vec![Face::new(0, 1, 2)]);
        let pipeline = Pipeline::new(PassThrough, DiffuseShader, uniforms());
        let mut fb = Framebuffer::new(10, 10);
        let err = render_mesh(&mut fb, &mesh, &[], &pipeline, &RenderSettings::default());
        assert_eq!(err, Err(RenderError::InvalidFace { face: 0, vertices: 1 }));
    }

    #[test]
    fn test_degenerate_and_unprojectable_faces_are_skipped() {
        let v = |x: f32, y: f32, z: f32| Vertex::new(Vec3::new(x, y, z), Vec2::ZERO, Vec3::VIEW);
        let mesh = Mesh::from_triangles(
            &[
                // Collinear
                [v(0.0, 0.0, 0.0), v(0.5, 0.5, 0.0), v(0.9, 0.9, 0.0)],
                // On the camera plane: w == 0
                [v(0.0, 0.0, 3.0), v(0.5, 0.0, 0.0), v(0.0, 0.5, 0.0)],
                // Fine
                [v(-0.5, -0.5, 0.0), v(0.5, -0.5, 0.0), v(0.0, 0.5, 0.0)],
            ],
            None,
        );
        let u = Uniforms::new(
            ScreenMapping::perspective(100, 100, 3.0, 0.75, 255.0),
            Vec3::VIEW,
        );
        let pipeline = Pipeline::new(StandardVertexShader, DiffuseShader, u);
        let mut fb = Framebuffer::new(100, 100);
        let stats = render_frame(&mut fb, &mesh, &[], &pipeline, &RenderSettings::default()).unwrap();

        assert_eq!(stats.faces, 3);
        assert_eq!(stats.degenerate_faces, 2);
        assert!(stats.written > 0);
        assert!(fb.depth().values.iter().all(|d| d.is_finite()));
    }

    fn cube_pass(fb: &mut Framebuffer, settings: &RenderSettings) -> RenderStats {
        let mesh = create_test_cube();
        let tex = Texture::checkerboard(16, 16, Color::WHITE, Color::RED);
        let u = Uniforms::new(
            ScreenMapping::perspective(fb.width(), fb.height(), 3.0, 0.75, 255.0),
            Vec3::new(0.3, 0.4, 1.0).normalize(),
        )
        .with_model(showcase_rotation());
        let pipeline = Pipeline::new(StandardVertexShader, DiffuseShader, u);
        render_frame(fb, &mesh, &[tex], &pipeline, settings).unwrap()
    }

    #[test]
    fn test_rerun_is_bit_identical() {
        let settings = RenderSettings::default();
        let mut fb = Framebuffer::new(120, 90);
        let first_stats = cube_pass(&mut fb, &settings);
        let first = fb.clone();
        let second_stats = cube_pass(&mut fb, &settings);

        assert_eq!(first_stats, second_stats);
        assert_eq!(first.color().pixels, fb.color().pixels);
        let bits = |d: &[f32]| d.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&first.depth().values), bits(&fb.depth().values));
    }

    #[test]
    fn test_parallel_matches_serial() {
        for rule in [FillRule::Inclusive, FillRule::TopLeft] {
            let serial_settings = RenderSettings {
                raster: RasterOptions {
                    fill_rule: rule,
                    interpolation: Interpolation::PerspectiveCorrect,
                },
                ..RenderSettings::default()
            };
            let parallel_settings = RenderSettings {
                parallel: true,
                ..serial_settings
            };

            let mut serial = Framebuffer::new(130, 97);
            let mut parallel = Framebuffer::new(130, 97);
            let s = cube_pass(&mut serial, &serial_settings);
            let p = cube_pass(&mut parallel, &parallel_settings);

            assert!(s.written > 0);
            assert_eq!(s, p);
            assert_eq!(serial.color().pixels, parallel.color().pixels);
            assert_eq!(serial.depth().values, parallel.depth().values);
        }
    }

    #[test]
    fn test_cube_shows_several_faces() {
        let mut fb = Framebuffer::new(100, 100);
        let stats = cube_pass(&mut fb, &RenderSettings::default());
        assert_eq!(stats.faces, 12);
        assert_eq!(stats.degenerate_faces, 0);
        // Back faces are discarded by the fragment stage
        assert!(stats.discarded > 0);
        assert!(stats.written > 0);
    }

    #[test]
    fn test_render_mesh_does_not_clear() {
        let mesh = two_layers(0.2, 0.2);
        let pipeline = Pipeline::new(PassThrough, FlatColorShader { color: Color::BLUE }, uniforms());
        let settings = RenderSettings::default();
        let mut fb = Framebuffer::new(100, 100);
        fb.clear(Color::GREEN, settings.clear_depth_value());
        render_mesh(&mut fb, &mesh, &[], &pipeline, &settings).unwrap();
        assert_eq!(fb.color().get(0, 0), Some(Color::GREEN));
        assert_eq!(fb.color().get(40, 30), Some(Color::BLUE));
    }

    #[test]
    fn test_triangle_touching_target_edges_stays_in_bounds() {
        let v = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.5), Vec2::ZERO, Vec3::VIEW);
        let mesh = Mesh::from_triangles(&[[v(1.0, 1.0), v(9.0, 1.0), v(1.0, 9.0)]], None);
        let pipeline = Pipeline::new(PassThrough, FlatColorShader { color: Color::BLUE }, uniforms());
        let mut fb = Framebuffer::new(10, 10);
        render_frame(&mut fb, &mesh, &[], &pipeline, &RenderSettings::default()).unwrap();

        assert_eq!(fb.color().get(9, 1), Some(Color::BLUE));
        assert_eq!(fb.color().get(1, 9), Some(Color::BLUE));
        assert_eq!(fb.color().get(0, 0), Some(Color::BLACK));
        assert_eq!(fb.color().pixels.len(), 100);
        assert_eq!(fb.depth().values.len(), 100);
    }
}
