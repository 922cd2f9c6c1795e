//! Render settings, optionally overridden from a JSON file.

use crate::colors::Color;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Looked for in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "render_config.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Saturation applied to every rendered pixel. `1.0` leaves colors as-is.
    pub saturation_multiplier: f32,
    /// Brightens north-facing rises and darkens drops to fake sunlight.
    pub enable_directional_shading: bool,
    pub shading_highlight_factor: f32,
    pub shading_shadow_factor: f32,
    /// Darkens water with depth and lets the bottom show through shallows.
    pub enable_water_depth_effect: bool,
    /// Depth at which the effect starts.
    pub shallow_water_depth: i32,
    /// Depth at which water becomes fully opaque.
    pub deep_water_depth: i32,
    pub min_water_opacity: f32,
    /// Opacity ramp exponent. `1.0` is linear, `2.0` quadratic, `3.0` cubic.
    pub water_opacity_curve_factor: f32,
    /// Smooths grass, foliage and water colors across biome borders.
    pub enable_biome_blending: bool,
    /// Radius in blocks to collect blending neighbors from.
    pub biome_blend_radius: i32,
    /// Darkens blocks surrounded by taller neighbors.
    pub enable_ambient_occlusion: bool,
    /// Maximum darkening. `0.1` makes fully occluded blocks 10% darker.
    pub ambient_occlusion_strength: f32,
    pub ambient_occlusion_radius: i32,
    /// Tints high terrain toward a color, e.g. for a snow line.
    pub enable_height_tinting: bool,
    pub height_tint_start_y: i32,
    /// Height at which the tint reaches full strength.
    pub height_tint_end_y: i32,
    pub height_tint_color: Color,
    /// Blend factor at the end height. `1.0` replaces the color entirely.
    pub height_tint_strength: f32,
    /// Seconds to wait after the last file change before re-rendering.
    pub watch_debounce_seconds: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            saturation_multiplier: 1.0,
            enable_directional_shading: true,
            shading_highlight_factor: 1.1,
            shading_shadow_factor: 0.9,
            enable_water_depth_effect: true,
            shallow_water_depth: 1,
            deep_water_depth: 18,
            min_water_opacity: 0.85,
            water_opacity_curve_factor: 1.0,
            enable_biome_blending: true,
            biome_blend_radius: 3,
            enable_ambient_occlusion: true,
            ambient_occlusion_strength: 0.1,
            ambient_occlusion_radius: 1,
            enable_height_tinting: true,
            height_tint_start_y: 128,
            height_tint_end_y: 256,
            height_tint_color: Color::new(255.0, 255.0, 255.0),
            height_tint_strength: 0.35,
            watch_debounce_seconds: 30,
        }
    }
}

fn load_from(path: &Path) -> Result<RenderConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))
}

/// Loads the config from an explicit path, from `render_config.json` in the
/// working directory, or falls back to the defaults, in that order. An
/// explicit path that cannot be read is an error; a missing default file is
/// not.
pub fn load(path: Option<&Path>) -> Result<RenderConfig, String> {
    if let Some(path) = path {
        let config = load_from(path)?;
        log::debug!("loaded config from {}", path.display());
        return Ok(config);
    }
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        let config = load_from(default_path)?;
        log::debug!("loaded config from {DEFAULT_CONFIG_FILE}");
        return Ok(config);
    }
    Ok(RenderConfig::default())
}
