//! Builds the texture color cache from extracted block textures.
//!
//! Every block texture is reduced to the average color of its opaque pixels.
//! The result is written as JSON keyed by texture name, which is what the
//! renderer loads at startup.

use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Animated textures stack extra frames below the first; only the first
/// 16x16 frame contributes to the average.
const FRAME_SIZE: u32 = 16;

/// Pixels below this alpha are treated as holes in the texture.
const OPAQUE_ALPHA_MIN: u8 = 128;

#[derive(Debug, Serialize)]
struct CachedColor {
    r: u8,
    g: u8,
    b: u8,
}

fn average_color(path: &Path) -> Option<CachedColor> {
    let image = match image::open(path) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("skipping unreadable texture {}: {e}", path.display());
            return None;
        }
    };
    let frame = image.crop_imm(0, 0, FRAME_SIZE, FRAME_SIZE).to_rgba8();

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for pixel in frame.pixels() {
        if pixel.0[3] < OPAQUE_ALPHA_MIN {
            continue;
        }
        sum[0] += u64::from(pixel.0[0]);
        sum[1] += u64::from(pixel.0[1]);
        sum[2] += u64::from(pixel.0[2]);
        count += 1;
    }
    if count == 0 {
        log::debug!("texture {} has no opaque pixels, skipping", path.display());
        return None;
    }
    Some(CachedColor {
        r: (sum[0] / count) as u8,
        g: (sum[1] / count) as u8,
        b: (sum[2] / count) as u8,
    })
}

/// Averages every `.png` under `assets_dir` and writes the cache file.
/// Returns how many textures were cached.
pub fn build_texture_cache(assets_dir: &Path, cache_path: &Path) -> Result<usize, String> {
    println!(
        "{}",
        format!("Building texture cache from {}...", assets_dir.display()).cyan()
    );
    let entries = fs::read_dir(assets_dir)
        .map_err(|e| format!("Failed to read {}: {}", assets_dir.display(), e))?;

    let mut cache: BTreeMap<String, CachedColor> = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {e}"))?;
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "png") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if let Some(color) = average_color(&path) {
            cache.insert(name.to_string(), color);
        }
    }

    let contents = serde_json::to_string_pretty(&cache)
        .map_err(|e| format!("Failed to serialize the texture cache: {e}"))?;
    fs::write(cache_path, contents)
        .map_err(|e| format!("Failed to write {}: {}", cache_path.display(), e))?;
    println!(
        "{}",
        format!(
            "✓ Cached {} texture colors to {}.",
            cache.len(),
            cache_path.display()
        )
        .green()
    );
    Ok(cache.len())
}
