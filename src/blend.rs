//! Region-wide shading precomputations: blended biome colors and the
//! ambient occlusion factor grid.

use crate::block_colors::{
    biome_color, BIOME_FOLIAGE_COLORS, BIOME_GRASS_COLORS, BIOME_WATER_COLORS, PLAINS, WATER,
};
use crate::colors::Color;
use crate::column_map::{ColumnMap, NameTable, COLUMNS_PER_REGION, EMPTY_Y, REGION_SIZE};
use crate::config::RenderConfig;

/// Per-column grass, foliage and water colors after neighborhood blending.
pub struct BlendedBiomeColors {
    pub grass: Vec<Color>,
    pub foliage: Vec<Color>,
    pub water: Vec<Color>,
}

fn clamp_coord(value: i32) -> usize {
    value.clamp(0, REGION_SIZE as i32 - 1) as usize
}

/// Computes smoothed biome colors for every column. Each column takes the
/// biome of its topmost feature (decoration above surface, otherwise the
/// surface, otherwise plains) and is then blurred with its neighbors using
/// inverse-distance weights. Edge columns reuse their border neighbors.
pub fn blended_biome_colors(
    map: &ColumnMap,
    biomes: &mut NameTable,
    radius: i32,
) -> BlendedBiomeColors {
    let plains_id = biomes.intern(PLAINS);
    let biomes = &*biomes;

    let mut raw_grass = vec![Color::default(); COLUMNS_PER_REGION];
    let mut raw_foliage = vec![Color::default(); COLUMNS_PER_REGION];
    let mut raw_water = vec![Color::default(); COLUMNS_PER_REGION];
    for i in 0..COLUMNS_PER_REGION {
        let biome_id = if map.decoration_y[i] > map.surface_y[i] {
            map.decoration_biome[i]
        } else if map.surface_y[i] != EMPTY_Y {
            map.surface_biome[i]
        } else {
            plains_id
        };
        let biome = biomes.name(biome_id);
        raw_grass[i] = biome_color(&BIOME_GRASS_COLORS, biome);
        raw_foliage[i] = biome_color(&BIOME_FOLIAGE_COLORS, biome);
        raw_water[i] = biome_color(&BIOME_WATER_COLORS, biome);
    }

    let mut blended = BlendedBiomeColors {
        grass: vec![Color::default(); COLUMNS_PER_REGION],
        foliage: vec![Color::default(); COLUMNS_PER_REGION],
        water: vec![Color::default(); COLUMNS_PER_REGION],
    };
    for z in 0..REGION_SIZE as i32 {
        for x in 0..REGION_SIZE as i32 {
            let mut grass = Color::default();
            let mut foliage = Color::default();
            let mut water = Color::default();
            let mut total_weight = 0.0f32;
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    let sample =
                        clamp_coord(z + dz) * REGION_SIZE + clamp_coord(x + dx);
                    let weight = 1.0 / (dx * dx + dz * dz + 1) as f32;
                    grass += raw_grass[sample] * weight;
                    foliage += raw_foliage[sample] * weight;
                    water += raw_water[sample] * weight;
                    total_weight += weight;
                }
            }
            let i = (z * REGION_SIZE as i32 + x) as usize;
            blended.grass[i] = grass / total_weight;
            blended.foliage[i] = foliage / total_weight;
            blended.water[i] = water / total_weight;
        }
    }
    blended
}

/// Computes a darkening factor per column from how many neighbors rise above
/// it. Water columns with a known floor occlude from the floor height, so
/// lake beds shade like dry terrain when the depth effect is on.
pub fn ambient_occlusion(
    map: &ColumnMap,
    blocks: &NameTable,
    config: &RenderConfig,
) -> Vec<f32> {
    let mut height_grid = vec![EMPTY_Y; COLUMNS_PER_REGION];
    for (i, height) in height_grid.iter_mut().enumerate() {
        let surface_y = map.surface_y[i];
        if surface_y == EMPTY_Y {
            continue;
        }
        let floor_y = map.floor_y[i];
        if config.enable_water_depth_effect
            && blocks.name(map.surface_name[i]) == WATER
            && floor_y != EMPTY_Y
        {
            *height = floor_y;
        } else {
            *height = surface_y.max(map.decoration_y[i]);
        }
    }

    let radius = config.ambient_occlusion_radius;
    let neighbor_count = (radius * 2 + 1).pow(2) - 1;
    let mut occlusion = vec![1.0f32; COLUMNS_PER_REGION];
    for z in 0..REGION_SIZE as i32 {
        for x in 0..REGION_SIZE as i32 {
            let center = (z * REGION_SIZE as i32 + x) as usize;
            let center_height = height_grid[center];
            if center_height == EMPTY_Y {
                continue;
            }
            let mut occluding = 0;
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    if dx == 0 && dz == 0 {
                        continue;
                    }
                    let sample = clamp_coord(z + dz) * REGION_SIZE + clamp_coord(x + dx);
                    if height_grid[sample] > center_height {
                        occluding += 1;
                    }
                }
            }
            if occluding > 0 {
                occlusion[center] = 1.0
                    - occluding as f32 / neighbor_count as f32
                        * config.ambient_occlusion_strength;
            }
        }
    }
    occlusion
}
