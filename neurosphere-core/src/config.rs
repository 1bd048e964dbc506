/// Scene configuration: sphere layout, motion, wave and drawing style
///
/// Every field has a default matching the stock look of the visualization,
/// so a TOML file only needs to name what it overrides.
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::ConfigError;
use crate::projection::{Facing, PaintOrder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of nodes placed on the sphere
    pub node_count: usize,
    /// Sphere radius as a fraction of the smaller viewport side
    pub radius_factor: f32,
    /// Nodes closer than this fraction of the radius are linked
    pub link_distance_factor: f32,
    /// Horizontal projection center as a fraction of the viewport width
    pub center_x_factor: f32,
    /// Vertical projection center as a fraction of the viewport height
    pub center_y_factor: f32,
    /// Perspective focal distance in pixels
    pub focal_distance: f32,
    /// Fixed tilt about the X axis (radians)
    pub tilt: f32,
    /// Spin added to the rotation angle each frame (radians)
    pub rotation_step: f32,
    /// Phase added to the wave each frame (radians)
    pub wave_step: f32,
    /// Half width of the activation wave in normalized radius units
    pub wave_half_width: f32,
    /// Multiplicative activation decay applied every frame
    pub decay: f32,
    pub facing: Facing,
    pub paint_order: PaintOrder,
    pub style: Style,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            node_count: 180,
            radius_factor: 0.7,
            link_distance_factor: 0.45,
            center_x_factor: 0.85,
            center_y_factor: 0.5,
            focal_distance: 800.0,
            tilt: 0.3,
            rotation_step: 0.003,
            wave_step: 0.02,
            wave_half_width: 0.28,
            decay: 0.92,
            facing: Facing::NegativeDepth,
            paint_order: PaintOrder::Ascending,
            style: Style::default(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.decay) {
            return Err(ConfigError::Invalid(format!(
                "decay must be in [0, 1), got {}",
                self.decay
            )));
        }
        if !(self.wave_half_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "wave_half_width must be positive, got {}",
                self.wave_half_width
            )));
        }
        if !(self.focal_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "focal_distance must be positive, got {}",
                self.focal_distance
            )));
        }
        if !(self.radius_factor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "radius_factor must be positive, got {}",
                self.radius_factor
            )));
        }
        if !(self.link_distance_factor >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "link_distance_factor must not be negative, got {}",
                self.link_distance_factor
            )));
        }
        self.style.validate()
    }
}

/// Colors and size/opacity coefficients used when drawing a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub background: Rgba,
    pub link_color: Rgba,
    pub glow_color: Rgba,
    pub node_color: Rgba,
    pub highlight_color: Rgba,

    pub link_base_opacity: f32,
    pub link_active_opacity: f32,
    pub link_base_width: f32,
    pub link_active_width: f32,

    pub node_base_size: f32,
    pub node_active_size: f32,
    pub node_base_brightness: f32,
    pub node_active_brightness: f32,
    pub node_base_opacity: f32,
    pub node_active_opacity: f32,

    /// Activation above which a glow halo is drawn under the node
    pub glow_threshold: f32,
    pub glow_scale: f32,
    pub glow_opacity: f32,

    /// Activation above which a bright center is drawn over the node
    pub highlight_threshold: f32,
    pub highlight_scale: f32,
    pub highlight_opacity: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            link_color: Rgba::rgb(91, 61, 245),
            glow_color: Rgba::rgb(91, 61, 245),
            node_color: Rgba::rgb(147, 51, 234),
            highlight_color: Rgba::WHITE,

            link_base_opacity: 0.096,
            link_active_opacity: 0.4,
            link_base_width: 0.5,
            link_active_width: 1.5,

            node_base_size: 2.0,
            node_active_size: 4.0,
            node_base_brightness: 0.4,
            node_active_brightness: 0.6,
            node_base_opacity: 0.56,
            node_active_opacity: 0.24,

            glow_threshold: 0.3,
            glow_scale: 3.0,
            glow_opacity: 0.16,

            highlight_threshold: 0.6,
            highlight_scale: 0.5,
            highlight_opacity: 0.64,
        }
    }
}

impl Style {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.glow_threshold > self.highlight_threshold {
            return Err(ConfigError::Invalid(format!(
                "glow_threshold ({}) must not exceed highlight_threshold ({})",
                self.glow_threshold, self.highlight_threshold
            )));
        }
        if self.node_base_size < 0.0 || self.node_active_size < 0.0 {
            return Err(ConfigError::Invalid("node sizes must not be negative".into()));
        }
        Ok(())
    }
}
