//! Render configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable config files. Missing
//! fields fall back to their defaults.

use crate::rasterizer::{
    Color, DepthTest, FillRule, Framebuffer, Interpolation, RasterOptions, RenderSettings,
    ScreenMapping, Uniforms, Vec3, DEPTH_RANGE, HEIGHT, WIDTH,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Screen mapping policy as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Scene coordinates are already in [-1, 1]
    Orthographic,
    /// Camera on +z looking at the origin
    Perspective {
        camera_distance: f32,
        /// Fraction of the target covered by the viewport
        viewport_scale: f32,
        depth_range: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            camera_distance: 3.0,
            viewport_scale: 0.75,
            depth_range: DEPTH_RANGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub light_dir: Vec3,
    pub background: Color,
    pub projection: Projection,
    pub depth_test: DepthTest,
    /// Overrides the depth test's farthest value
    pub clear_depth: Option<f32>,
    pub fill_rule: FillRule,
    pub interpolation: Interpolation,
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            light_dir: Vec3::VIEW,
            background: Color::BLACK,
            projection: Projection::default(),
            depth_test: DepthTest::default(),
            clear_depth: None,
            fill_rule: FillRule::default(),
            interpolation: Interpolation::default(),
            parallel: false,
        }
    }
}

impl RenderConfig {
    /// Load and validate a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_ron(&contents)?;
        log::info!(
            "Loaded config {} ({}x{}, {:?})",
            path.display(),
            config.width,
            config.height,
            config.projection
        );
        Ok(config)
    }

    /// Parse and validate a config from a RON string
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Save a config to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "target size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.light_dir.is_finite() || self.light_dir.len() == 0.0 {
            return Err(ConfigError::Invalid(
                "light direction must be a finite, non-zero vector".to_string(),
            ));
        }
        if let Some(depth) = self.clear_depth {
            if depth.is_nan() {
                return Err(ConfigError::Invalid("clear depth is NaN".to_string()));
            }
        }
        if let Projection::Perspective {
            camera_distance,
            viewport_scale,
            depth_range,
        } = self.projection
        {
            if !(camera_distance > 0.0 && camera_distance.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "camera distance must be positive, got {}",
                    camera_distance
                )));
            }
            if !(viewport_scale > 0.0 && viewport_scale.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "viewport scale must be positive, got {}",
                    viewport_scale
                )));
            }
            if !(depth_range > 0.0 && depth_range.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "depth range must be positive, got {}",
                    depth_range
                )));
            }
        }
        Ok(())
    }

    pub fn mapping(&self) -> ScreenMapping {
        match self.projection {
            Projection::Orthographic => ScreenMapping::orthographic(self.width, self.height),
            Projection::Perspective {
                camera_distance,
                viewport_scale,
                depth_range,
            } => ScreenMapping::perspective(
                self.width,
                self.height,
                camera_distance,
                viewport_scale,
                depth_range,
            ),
        }
    }

    /// Uniforms with an identity model matrix
    pub fn uniforms(&self) -> Uniforms {
        Uniforms::new(self.mapping(), self.light_dir)
    }

    pub fn settings(&self) -> RenderSettings {
        RenderSettings {
            depth_test: self.depth_test,
            clear_depth: self.clear_depth,
            background: self.background,
            raster: RasterOptions {
                fill_rule: self.fill_rule,
                interpolation: self.interpolation,
            },
            parallel: self.parallel,
        }
    }

    /// A framebuffer of the configured size, already cleared
    pub fn new_framebuffer(&self) -> Framebuffer {
        let mut fb = Framebuffer::new(self.width, self.height);
        self.settings().clear(&mut fb);
        fb
    }
}
