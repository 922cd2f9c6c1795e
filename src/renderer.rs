//! Turns one region file into a shaded 512x512 RGB tile.

use fnv::{FnvHashMap, FnvHashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::blend::{ambient_occlusion, blended_biome_colors, BlendedBiomeColors};
use crate::block_colors::{
    biome_color, is_biome_dependent, is_foliage, BIOME_FOLIAGE_COLORS, BIOME_GRASS_COLORS,
    BIOME_WATER_COLORS, DECORATION_BLOCKS, DECORATION_COLORS, FALLBACK_COLOR, LAVA,
    OVERRIDE_COLORS, TEXTURE_ALIASES, WATER,
};
use crate::colors::{hsl_to_rgb, rgb_to_hsl, Color};
use crate::column_map::{
    build_column_map, ColumnMap, NameTable, COLUMNS_PER_REGION, EMPTY_Y, REGION_SIZE,
};
use crate::config::RenderConfig;
use crate::worker_pool::{Task, WorkerInit};

/// Maps texture names to average colors; produced by the precache command.
pub const TEXTURE_CACHE_FILE: &str = "texture_cache.json";

/// Parses the texture color cache. Loaded once at startup and shared with
/// every worker.
pub fn load_texture_cache(path: &Path) -> Result<FnvHashMap<String, Color>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

#[derive(Debug, PartialEq, Eq)]
pub enum RegionStatus {
    Rendered,
    /// The region held no renderable blocks, so no tile was written.
    Skipped,
}

/// Caps at the lower bound when a config puts min above max, instead of
/// panicking the way `f32::clamp` would.
fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Per-worker render state. The name tables and warn sets persist across all
/// region files a worker processes; the blended colors and occlusion grid are
/// rebuilt per region.
pub struct RegionRenderer {
    out_dir: PathBuf,
    config: RenderConfig,
    texture_cache: Arc<FnvHashMap<String, Color>>,
    blocks: NameTable,
    biomes: NameTable,
    blended: Option<BlendedBiomeColors>,
    occlusion: Option<Vec<f32>>,
    warned_blocks: FnvHashSet<String>,
    warned_decorations: FnvHashSet<String>,
}

impl RegionRenderer {
    pub fn new(init: &WorkerInit) -> Self {
        Self {
            out_dir: init.out_dir.clone(),
            config: init.config.clone(),
            texture_cache: Arc::clone(&init.texture_cache),
            blocks: NameTable::default(),
            biomes: NameTable::default(),
            blended: None,
            occlusion: None,
            warned_blocks: FnvHashSet::default(),
            warned_decorations: FnvHashSet::default(),
        }
    }

    /// Renders one region file to `r.<x>.<z>.png` in the output directory.
    pub fn process_region_file(&mut self, task: &Task) -> io::Result<RegionStatus> {
        let region = fs::read(&task.file_path)?;
        let (map, renderable) = build_column_map(&region, &mut self.blocks, &mut self.biomes);
        if renderable == 0 {
            return Ok(RegionStatus::Skipped);
        }

        self.occlusion = if self.config.enable_ambient_occlusion {
            Some(ambient_occlusion(&map, &self.blocks, &self.config))
        } else {
            None
        };
        self.blended = if self.config.enable_biome_blending {
            Some(blended_biome_colors(
                &map,
                &mut self.biomes,
                self.config.biome_blend_radius,
            ))
        } else {
            None
        };

        let pixels = self.render_map(&map);
        fs::create_dir_all(&self.out_dir)?;
        let out_path = self
            .out_dir
            .join(format!("r.{}.{}.png", task.region_x, task.region_z));
        let image = image::RgbImage::from_raw(REGION_SIZE as u32, REGION_SIZE as u32, pixels)
            .ok_or_else(|| io::Error::other("pixel buffer has the wrong size"))?;
        image.save(&out_path).map_err(io::Error::other)?;
        Ok(RegionStatus::Rendered)
    }

    /// Resolves the display color of a block. Override colors win, then
    /// decoration colors, then biome-driven colors (blended when blending is
    /// on), then the texture cache. Unknown blocks warn once and come out in
    /// the fallback color; unknown decorations warn once and draw nothing.
    fn resolve_color(&mut self, name_id: u16, biome_id: u16, x: usize, z: usize) -> Option<Color> {
        let name = self.blocks.name(name_id);
        if let Some(&color) = OVERRIDE_COLORS.get(name) {
            return Some(color);
        }

        if DECORATION_BLOCKS.contains(name) {
            if let Some(&color) = DECORATION_COLORS.get(name) {
                return Some(color);
            }
            if self.warned_decorations.insert(name.to_string()) {
                log::warn!("color for decoration {name:?} not found");
            }
            return None;
        }

        let clean_name = name.strip_prefix("minecraft:").unwrap_or(name);
        if is_biome_dependent(clean_name) {
            if let Some(blended) = &self.blended {
                let idx = z * REGION_SIZE + x;
                if clean_name == "water" {
                    return Some(blended.water[idx]);
                }
                if is_foliage(clean_name) {
                    return Some(blended.foliage[idx]);
                }
                return Some(blended.grass[idx]);
            }
            let biome = self.biomes.name(biome_id);
            if clean_name == "water" {
                return Some(biome_color(&BIOME_WATER_COLORS, biome));
            }
            let table = if is_foliage(clean_name) {
                &BIOME_FOLIAGE_COLORS
            } else {
                &BIOME_GRASS_COLORS
            };
            return Some(biome_color(table, biome));
        }

        let texture_name = TEXTURE_ALIASES.get(name).copied().unwrap_or(clean_name);
        if let Some(&color) = self.texture_cache.get(texture_name) {
            return Some(color);
        }
        if self.warned_blocks.insert(name.to_string()) {
            log::warn!("color for block {name:?} (texture {texture_name:?}) not found");
        }
        Some(FALLBACK_COLOR)
    }

    fn occlusion_at(&self, idx: usize) -> f32 {
        match &self.occlusion {
            Some(occlusion) => occlusion[idx],
            None => 1.0,
        }
    }

    fn render_map(&mut self, map: &ColumnMap) -> Vec<u8> {
        let mut pixels = vec![0u8; COLUMNS_PER_REGION * 3];

        for z in 0..REGION_SIZE {
            for x in 0..REGION_SIZE {
                let map_idx = z * REGION_SIZE + x;
                let surface_y = map.surface_y[map_idx];
                if surface_y == EMPTY_Y {
                    continue;
                }

                let surface_name_id = map.surface_name[map_idx];
                let floor_y = map.floor_y[map_idx];
                let decoration_y = map.decoration_y[map_idx];
                let mut shade_y = surface_y;

                let is_lava = self.blocks.name(surface_name_id) == LAVA;
                let is_underwater = self.config.enable_water_depth_effect
                    && self.blocks.name(surface_name_id) == WATER
                    && floor_y != EMPTY_Y;

                let base_color = if is_underwater {
                    let water_color =
                        self.resolve_color(surface_name_id, map.surface_biome[map_idx], x, z);
                    let floor_color = self.resolve_color(
                        map.floor_name[map_idx],
                        map.floor_biome[map_idx],
                        x,
                        z,
                    );
                    match (water_color, floor_color) {
                        (Some(water), Some(floor)) => {
                            let north_idx = if z > 0 { (z - 1) * REGION_SIZE + x } else { map_idx };
                            let north_floor = map.floor_y[north_idx];
                            let h_n = if north_floor != EMPTY_Y { north_floor } else { floor_y };
                            let mut floor_light = 1.0f32;
                            if self.config.enable_directional_shading {
                                if floor_y > h_n {
                                    floor_light *= self.config.shading_highlight_factor;
                                } else if floor_y < h_n {
                                    floor_light *= self.config.shading_shadow_factor;
                                }
                            }
                            floor_light *= self.occlusion_at(map_idx);

                            let depth = (i32::from(surface_y) - i32::from(floor_y)) as f32;
                            let range = (self.config.deep_water_depth
                                - self.config.shallow_water_depth)
                                as f32;
                            let progress = clamp(
                                (depth - self.config.shallow_water_depth as f32) / range,
                                0.0,
                                1.0,
                            );
                            let opacity = clamp(
                                self.config.min_water_opacity
                                    + progress.powf(self.config.water_opacity_curve_factor)
                                        * (1.0 - self.config.min_water_opacity),
                                self.config.min_water_opacity,
                                1.0,
                            );
                            Some(Color::new(
                                water.r * opacity + floor.r * floor_light * (1.0 - opacity),
                                water.g * opacity + floor.g * floor_light * (1.0 - opacity),
                                water.b * opacity + floor.b * floor_light * (1.0 - opacity),
                            ))
                        }
                        (water, floor) => water.or(floor),
                    }
                } else {
                    self.resolve_color(surface_name_id, map.surface_biome[map_idx], x, z)
                };
                let Some(base_color) = base_color else {
                    continue;
                };
                let mut color = base_color;

                if decoration_y >= surface_y {
                    if let Some(decoration_color) = self.resolve_color(
                        map.decoration_name[map_idx],
                        map.decoration_biome[map_idx],
                        x,
                        z,
                    ) {
                        color = decoration_color;
                        shade_y = decoration_y;
                    }
                }

                if !is_lava {
                    if !is_underwater {
                        let mut light_factor = 1.0f32;
                        if self.config.enable_directional_shading {
                            let north_idx = if z > 0 { (z - 1) * REGION_SIZE + x } else { map_idx };
                            let n_surface = map.surface_y[north_idx];
                            let n_decoration = map.decoration_y[north_idx];
                            let h_n = if n_decoration > n_surface {
                                n_decoration
                            } else if n_surface == EMPTY_Y {
                                shade_y
                            } else {
                                n_surface
                            };
                            if shade_y > h_n {
                                light_factor *= self.config.shading_highlight_factor;
                            } else if shade_y < h_n {
                                light_factor *= self.config.shading_shadow_factor;
                            }
                        }
                        light_factor *= self.occlusion_at(map_idx);
                        if light_factor != 1.0 {
                            color = color * light_factor;
                        }
                    }

                    if self.config.enable_height_tinting
                        && i32::from(shade_y) > self.config.height_tint_start_y
                    {
                        let progress = clamp(
                            (f32::from(shade_y) - self.config.height_tint_start_y as f32)
                                / (self.config.height_tint_end_y - self.config.height_tint_start_y)
                                    as f32,
                            0.0,
                            1.0,
                        );
                        let blend = progress * self.config.height_tint_strength;
                        let tint = self.config.height_tint_color;
                        color = Color::new(
                            color.r * (1.0 - blend) + tint.r * blend,
                            color.g * (1.0 - blend) + tint.g * blend,
                            color.b * (1.0 - blend) + tint.b * blend,
                        );
                    }

                    if self.config.saturation_multiplier != 1.0 {
                        let (h, s, l) = rgb_to_hsl(color.r, color.g, color.b);
                        let s = clamp(s * self.config.saturation_multiplier, 0.0, 1.0);
                        color = hsl_to_rgb(h, s, l);
                    }
                }

                let out = map_idx * 3;
                pixels[out] = clamp(color.r, 0.0, 255.0) as u8;
                pixels[out + 1] = clamp(color.g, 0.0, 255.0) as u8;
                pixels[out + 2] = clamp(color.b, 0.0, 255.0) as u8;
            }
        }
        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{
        chunk_document, deflate, region_with_chunk, region_with_sections, SectionSpec,
    };
    use std::path::Path;
    use tempfile::TempDir;

    fn flat_config() -> RenderConfig {
        RenderConfig {
            enable_biome_blending: false,
            enable_ambient_occlusion: false,
            ..RenderConfig::default()
        }
    }

    fn init_in(dir: &Path, cache: &str, config: RenderConfig) -> WorkerInit {
        WorkerInit {
            out_dir: dir.join("out"),
            config,
            texture_cache: Arc::new(serde_json::from_str(cache).unwrap()),
        }
    }

    fn render(dir: &Path, init: &WorkerInit, region: &[u8]) -> image::RgbImage {
        let path = dir.join("r.0.0.mca");
        fs::write(&path, region).unwrap();
        let task = Task::from_region_file(&path).unwrap();
        let mut renderer = RegionRenderer::new(init);
        assert_eq!(
            renderer.process_region_file(&task).unwrap(),
            RegionStatus::Rendered
        );
        image::open(init.out_dir.join("r.0.0.png")).unwrap().to_rgb8()
    }

    fn pixel(image: &image::RgbImage, x: u32, z: u32) -> (i32, i32, i32) {
        let p = image.get_pixel(x, z).0;
        (i32::from(p[0]), i32::from(p[1]), i32::from(p[2]))
    }

    fn assert_close(actual: (i32, i32, i32), expected: (i32, i32, i32)) {
        assert!(
            (actual.0 - expected.0).abs() <= 1
                && (actual.1 - expected.1).abs() <= 1
                && (actual.2 - expected.2).abs() <= 1,
            "{actual:?} not close to {expected:?}"
        );
    }

    #[test]
    fn test_unknown_block_renders_in_fallback_pink() {
        let dir = TempDir::new().unwrap();
        let init = init_in(dir.path(), "{}", flat_config());
        let region = region_with_sections(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:obsidian"],
            block_data: None,
            biome_palette: &["minecraft:plains"],
            biome_data: None,
        }]);
        let image = render(dir.path(), &init, &region);
        assert_eq!(pixel(&image, 0, 0), (255, 20, 147));
        assert_eq!(pixel(&image, 15, 15), (255, 20, 147));
        // Columns outside the lone chunk stay black.
        assert_eq!(pixel(&image, 16, 16), (0, 0, 0));
        assert_eq!(pixel(&image, 511, 511), (0, 0, 0));
    }

    #[test]
    fn test_region_without_surfaces_is_skipped() {
        let dir = TempDir::new().unwrap();
        let init = init_in(dir.path(), "{}", flat_config());
        let path = dir.path().join("r.0.0.mca");
        fs::write(&path, region_with_chunk(0, 2, b"corrupt")).unwrap();
        let task = Task::from_region_file(&path).unwrap();
        let mut renderer = RegionRenderer::new(&init);
        assert_eq!(
            renderer.process_region_file(&task).unwrap(),
            RegionStatus::Skipped
        );
        assert!(!init.out_dir.join("r.0.0.png").exists());
    }

    #[test]
    fn test_texture_cache_colors_plain_blocks() {
        let dir = TempDir::new().unwrap();
        let init = init_in(
            dir.path(),
            r#"{"sandstone_top": {"r": 216, "g": 208, "b": 159}}"#,
            flat_config(),
        );
        let region = region_with_sections(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:sandstone"],
            block_data: None,
            biome_palette: &["minecraft:desert"],
            biome_data: None,
        }]);
        let image = render(dir.path(), &init, &region);
        assert_eq!(pixel(&image, 7, 7), (216, 208, 159));
    }

    #[test]
    fn test_override_color_beats_the_texture_cache() {
        let dir = TempDir::new().unwrap();
        let init = init_in(
            dir.path(),
            r#"{"snow": {"r": 1, "g": 2, "b": 3}}"#,
            flat_config(),
        );
        let region = region_with_sections(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:snow_block"],
            block_data: None,
            biome_palette: &["minecraft:snowy_plains"],
            biome_data: None,
        }]);
        let image = render(dir.path(), &init, &region);
        assert_eq!(pixel(&image, 3, 12), (229, 229, 229));
    }

    #[test]
    fn test_grass_uses_the_biome_table_without_blending() {
        let dir = TempDir::new().unwrap();
        let init = init_in(dir.path(), "{}", flat_config());
        let region = region_with_sections(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:grass_block"],
            block_data: None,
            biome_palette: &["minecraft:desert"],
            biome_data: None,
        }]);
        let image = render(dir.path(), &init, &region);
        // Desert grass, straight from the table.
        assert_eq!(pixel(&image, 5, 5), (0xD1, 0xB2, 0x7D));
    }

    fn water_over_sand() -> Vec<u8> {
        let mut values = vec![0u8; 4096];
        for (index, value) in values.iter_mut().enumerate() {
            let sec_y = index / 256;
            *value = match sec_y {
                15 => 1,
                14 => 2,
                _ => 0,
            };
        }
        let mut words = Vec::new();
        for chunk in values.chunks(16) {
            let mut word = 0u64;
            for (slot, &v) in chunk.iter().enumerate() {
                word |= u64::from(v) << (slot * 4);
            }
            words.push(word as i64);
        }
        let document = chunk_document(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:air", "minecraft:water", "minecraft:sand"],
            block_data: Some(&words),
            biome_palette: &["minecraft:ocean"],
            biome_data: None,
        }]);
        region_with_chunk(0, 2, &deflate(&document))
    }

    #[test]
    fn test_shallow_water_blends_floor_at_minimum_opacity() {
        let dir = TempDir::new().unwrap();
        let init = init_in(
            dir.path(),
            r#"{"sand": {"r": 219, "g": 211, "b": 160}}"#,
            flat_config(),
        );
        let image = render(dir.path(), &init, &water_over_sand());
        // Ocean water #4371A6 at opacity 0.85 over sand at 0.15.
        assert_close(pixel(&image, 8, 8), (89, 127, 165));
    }

    #[test]
    fn test_deep_water_is_fully_opaque() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig {
            deep_water_depth: 10,
            ..flat_config()
        };
        let init = init_in(
            dir.path(),
            r#"{"sand": {"r": 219, "g": 211, "b": 160}}"#,
            config,
        );
        let mut values = vec![0u8; 4096];
        for (index, value) in values.iter_mut().enumerate() {
            let sec_y = index / 256;
            *value = match sec_y {
                0 => 2,
                _ => 1,
            };
        }
        let mut words = Vec::new();
        for chunk in values.chunks(16) {
            let mut word = 0u64;
            for (slot, &v) in chunk.iter().enumerate() {
                word |= u64::from(v) << (slot * 4);
            }
            words.push(word as i64);
        }
        let document = chunk_document(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:air", "minecraft:water", "minecraft:sand"],
            block_data: Some(&words),
            biome_palette: &["minecraft:ocean"],
            biome_data: None,
        }]);
        let region = region_with_chunk(0, 2, &deflate(&document));
        // Fifteen blocks of water put the floor past the deep threshold, so
        // none of the sand shows through.
        let image = render(dir.path(), &init, &region);
        assert_eq!(pixel(&image, 8, 8), (0x43, 0x71, 0xA6));
    }

    #[test]
    fn test_water_depth_effect_off_renders_plain_water() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig {
            enable_water_depth_effect: false,
            ..flat_config()
        };
        let init = init_in(dir.path(), "{}", config);
        let image = render(dir.path(), &init, &water_over_sand());
        assert_eq!(pixel(&image, 8, 8), (0x43, 0x71, 0xA6));
    }

    #[test]
    fn test_decoration_overrides_the_surface_color() {
        let dir = TempDir::new().unwrap();
        let init = init_in(dir.path(), "{}", flat_config());
        let mut values = vec![0u8; 4096];
        for (index, value) in values.iter_mut().enumerate() {
            let sec_y = index / 256;
            *value = match sec_y {
                15 => 1,
                14 => 2,
                _ => 0,
            };
        }
        let mut words = Vec::new();
        for chunk in values.chunks(16) {
            let mut word = 0u64;
            for (slot, &v) in chunk.iter().enumerate() {
                word |= u64::from(v) << (slot * 4);
            }
            words.push(word as i64);
        }
        let document = chunk_document(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:air", "minecraft:poppy", "minecraft:grass_block"],
            block_data: Some(&words),
            biome_palette: &["minecraft:plains"],
            biome_data: None,
        }]);
        let image = render(dir.path(), &init, &region_with_chunk(0, 2, &deflate(&document)));
        assert_eq!(pixel(&image, 4, 9), (0xED, 0x29, 0x29));
    }

    #[test]
    fn test_lava_skips_tint_and_saturation() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig {
            saturation_multiplier: 0.5,
            ..flat_config()
        };
        let init = init_in(
            dir.path(),
            r#"{"lava_still": {"r": 255, "g": 100, "b": 0}}"#,
            config,
        );
        // Section 12 tops out at y 207, above the tint start.
        let region = region_with_sections(&[SectionSpec {
            y: 12,
            block_palette: &["minecraft:lava"],
            block_data: None,
            biome_palette: &["minecraft:basalt_deltas"],
            biome_data: None,
        }]);
        let image = render(dir.path(), &init, &region);
        assert_eq!(pixel(&image, 2, 2), (255, 100, 0));
    }

    #[test]
    fn test_height_tint_blends_toward_the_tint_color() {
        let dir = TempDir::new().unwrap();
        let init = init_in(
            dir.path(),
            r#"{"stone": {"r": 125, "g": 125, "b": 125}}"#,
            flat_config(),
        );
        let region = region_with_sections(&[SectionSpec {
            y: 12,
            block_palette: &["minecraft:stone"],
            block_data: None,
            biome_palette: &["minecraft:jagged_peaks"],
            biome_data: None,
        }]);
        let image = render(dir.path(), &init, &region);
        // y 207: progress (207-128)/128 times strength 0.35 toward white.
        assert_close(pixel(&image, 9, 9), (153, 153, 153));
    }

    #[test]
    fn test_zero_saturation_renders_gray() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig {
            saturation_multiplier: 0.0,
            ..flat_config()
        };
        let init = init_in(dir.path(), "{}", config);
        let region = region_with_sections(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:grass_block"],
            block_data: None,
            biome_palette: &["minecraft:plains"],
            biome_data: None,
        }]);
        let image = render(dir.path(), &init, &region);
        let (r, g, b) = pixel(&image, 6, 6);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_close((r, g, b), (130, 130, 130));
    }

    #[test]
    fn test_south_slope_is_shaded_darker() {
        let dir = TempDir::new().unwrap();
        let init = init_in(
            dir.path(),
            r#"{"stone": {"r": 100, "g": 100, "b": 100}}"#,
            flat_config(),
        );
        // North half surfaces at y 15, south half a level lower at y 14.
        let mut values = vec![0u8; 4096];
        for (index, value) in values.iter_mut().enumerate() {
            let sec_y = index / 256;
            let sec_z = index % 256 / 16;
            *value = match (sec_y, sec_z < 8) {
                (15, true) => 1,
                (14, _) => 1,
                _ => 0,
            };
        }
        let mut words = Vec::new();
        for chunk in values.chunks(16) {
            let mut word = 0u64;
            for (slot, &v) in chunk.iter().enumerate() {
                word |= u64::from(v) << (slot * 4);
            }
            words.push(word as i64);
        }
        let document = chunk_document(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:air", "minecraft:stone"],
            block_data: Some(&words),
            biome_palette: &["minecraft:plains"],
            biome_data: None,
        }]);
        let image = render(dir.path(), &init, &region_with_chunk(0, 2, &deflate(&document)));
        // North half is flat at y 15.
        assert_eq!(pixel(&image, 4, 4), (100, 100, 100));
        // The first low row sits south of taller terrain: shadow factor 0.9.
        assert_eq!(pixel(&image, 4, 8), (90, 90, 90));
        // Flat low ground further south is unshaded again.
        assert_eq!(pixel(&image, 4, 10), (100, 100, 100));
    }
}
