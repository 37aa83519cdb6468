//! Configuration for every pipeline stage.
//!
//! All sections default field-by-field, so a TOML file only needs to name the
//! values it overrides:
//!
//! ```toml
//! [capture]
//! jitter_floor = 3.0
//!
//! [layout]
//! collision_radius = 2.0
//! seed = 7
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SketchError};
use crate::geometry::BevelParams;
use crate::stroke::Color;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub gesture: GestureConfig,
    pub capture: CaptureConfig,
    pub curve: CurveConfig,
    pub mesh: MeshConfig,
    pub layout: LayoutConfig,
    pub session: SessionConfig,
}

/// Gesture classification thresholds, in normalized landmark units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Thumb-tip to index-tip distance below which the hand is pinching
    pub pinch_threshold: f32,
    /// Palm-center speed (units/s) at which an open palm becomes a swipe
    pub swipe_speed: f32,
    /// Index-tip depth speed (units/s, toward camera) that turns draw into poke
    pub poke_speed: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
            swipe_speed: 1.8,
            poke_speed: 0.8,
        }
    }
}

/// Stroke capture filtering and closure policy, in display pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub jitter_floor: f32,
    pub smoothing_window: usize,
    pub min_spacing: f32,
    pub min_arc_length: f32,
    pub min_points: usize,
    pub width: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            jitter_floor: 2.0,
            smoothing_window: 5,
            min_spacing: 4.0,
            min_arc_length: 50.0,
            min_points: 3,
            width: 6.0,
        }
    }
}

/// Curve fitting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Input points above this count are subsampled at uniform stride
    pub max_points: usize,
    /// Largest distance from the centroid after normalization
    pub working_unit: f32,
    /// Catmull-Rom tension
    pub tension: f32,
    /// Points on the final closed polygon
    pub resample_count: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            max_points: 80,
            working_unit: 1.0,
            tension: 0.5,
            resample_count: 64,
        }
    }
}

/// Extrusion and inflation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub depth: f32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
    /// The single "puffiness" control
    pub inflation: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            depth: 0.35,
            bevel_thickness: 0.12,
            bevel_size: 0.1,
            bevel_segments: 4,
            inflation: 0.35,
        }
    }
}

impl MeshConfig {
    pub fn bevel(&self) -> BevelParams {
        BevelParams {
            thickness: self.bevel_thickness,
            size: self.bevel_size,
            segments: self.bevel_segments,
        }
    }
}

/// Spatial layout, collision and cosmetic motion parameters, in world units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub collision_radius: f32,
    /// Objects keep repelling until `collision_radius * (1 + comfort_margin)`
    pub comfort_margin: f32,
    /// Fraction of the overlap resolved per second
    pub avoidance_strength: f32,
    /// World Z of the plane new objects are unprojected onto
    pub placement_depth: f32,
    /// Half-size of the region objects are clamped to, centered at the origin
    pub half_extents: [f32; 3],
    pub bob_amplitude: f32,
    pub drift_amplitude: f32,
    pub drift_speed: f32,
    /// Upper bound of the per-axis spin rate (rad/s) drawn at creation
    pub max_rotation_speed: f32,
    pub grab_scale: f32,
    pub pop_in_secs: f32,
    /// Fixed RNG seed for reproducible motion; entropy when absent
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            collision_radius: 1.6,
            comfort_margin: 0.1,
            avoidance_strength: 3.0,
            placement_depth: 0.0,
            half_extents: [6.0, 3.5, 2.0],
            bob_amplitude: 0.08,
            drift_amplitude: 0.05,
            drift_speed: 0.3,
            max_rotation_speed: 0.4,
            grab_scale: 1.15,
            pop_in_secs: 0.6,
            seed: None,
        }
    }
}

/// Session-level gesture routing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Stroke colours, cycled per new stroke
    pub palette: Vec<String>,
    /// Fist hold time (s) with no stroke in progress that clears the scene
    pub clear_hold_secs: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                "#ff6b9d".to_string(),
                "#4ecdc4".to_string(),
                "#ffe66d".to_string(),
                "#a78bfa".to_string(),
                "#ff9f43".to_string(),
            ],
            clear_hold_secs: 1.2,
        }
    }
}

impl SessionConfig {
    /// Parsed palette; validation guarantees every entry parses
    pub fn colors(&self) -> Vec<Color> {
        self.palette
            .iter()
            .filter_map(|hex| Color::from_hex(hex).ok())
            .collect()
    }
}

impl SketchConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SketchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.gesture.pinch_threshold <= 0.0 {
            return Err(SketchError::invalid("gesture.pinch_threshold", "must be positive"));
        }
        if self.capture.smoothing_window == 0 {
            return Err(SketchError::invalid("capture.smoothing_window", "must be at least 1"));
        }
        if self.capture.jitter_floor < 0.0 || self.capture.min_spacing < 0.0 {
            return Err(SketchError::invalid("capture", "distances must not be negative"));
        }
        if self.curve.max_points < 3 {
            return Err(SketchError::invalid("curve.max_points", "must be at least 3"));
        }
        if self.curve.resample_count < 3 {
            return Err(SketchError::invalid("curve.resample_count", "must be at least 3"));
        }
        if self.curve.working_unit <= 0.0 {
            return Err(SketchError::invalid("curve.working_unit", "must be positive"));
        }
        if self.mesh.bevel_segments == 0 {
            return Err(SketchError::invalid("mesh.bevel_segments", "must be at least 1"));
        }
        if self.mesh.inflation < 0.0 {
            return Err(SketchError::invalid("mesh.inflation", "must not be negative"));
        }
        if self.layout.collision_radius <= 0.0 {
            return Err(SketchError::invalid("layout.collision_radius", "must be positive"));
        }
        if self.layout.half_extents.iter().any(|e| *e <= 0.0) {
            return Err(SketchError::invalid("layout.half_extents", "must be positive"));
        }
        if self.session.palette.is_empty() {
            return Err(SketchError::invalid("session.palette", "needs at least one colour"));
        }
        for hex in &self.session.palette {
            Color::from_hex(hex).map_err(|_| {
                let reason = format!("`{}` is not a #rrggbb colour", hex);
                SketchError::invalid("session.palette", reason)
            })?;
        }
        Ok(())
    }
}
