//! Combines rendered region tiles into a single world map image.

use colored::Colorize;
use image::{imageops, Rgb, RgbImage};
use itertools::Itertools;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::column_map::REGION_SIZE;
use crate::region;

pub const MAP_FILE: &str = "map.png";

/// Unrendered areas of the map come out in this near-black gray.
const BACKGROUND: Rgb<u8> = Rgb([12, 12, 12]);

struct Tile {
    name: String,
    x: i32,
    z: i32,
    path: PathBuf,
}

fn collect_tiles(out_dir: &Path) -> Result<Vec<Tile>, String> {
    let entries = fs::read_dir(out_dir)
        .map_err(|e| format!("Failed to read {}: {}", out_dir.display(), e))?;
    let mut tiles = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {e}"))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let Some((x, z)) = region::parse_region_name(&name, ".png") else {
            continue;
        };
        tiles.push(Tile {
            name,
            x,
            z,
            path: entry.path(),
        });
    }
    tiles.sort_by_key(|tile| (tile.z, tile.x));
    Ok(tiles)
}

fn tile_offset(coordinate: i32, min: i32) -> i64 {
    (i64::from(coordinate) - i64::from(min)) * REGION_SIZE as i64
}

fn paste_tile(canvas: &mut RgbImage, tile: &Tile, min_x: i32, min_z: i32) {
    let loaded = match image::open(&tile.path) {
        Ok(loaded) => loaded.to_rgb8(),
        Err(e) => {
            log::warn!("skipping unreadable tile {}: {e}", tile.path.display());
            return;
        }
    };
    imageops::replace(
        canvas,
        &loaded,
        tile_offset(tile.x, min_x),
        tile_offset(tile.z, min_z),
    );
}

/// Writes through a sibling `.tmp` file so a half-written map is never
/// visible under the final name.
fn save_atomically(canvas: &RgbImage, map_path: &Path) -> Result<(), String> {
    let mut tmp = OsString::from(map_path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    if let Err(e) = canvas.save_with_format(&tmp, image::ImageFormat::Png) {
        let _ = fs::remove_file(&tmp);
        return Err(format!("Failed to write {}: {}", tmp.display(), e));
    }
    fs::rename(&tmp, map_path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        format!("Failed to replace {}: {}", map_path.display(), e)
    })
}

/// Patches only the updated tiles onto the existing map. Returns false when
/// the map on disk no longer matches the tile bounds, meaning a full stitch
/// is needed.
fn patch_existing(
    map_path: &Path,
    tiles: &[Tile],
    updated: &[String],
    min_x: i32,
    min_z: i32,
    width: u32,
    height: u32,
) -> Result<bool, String> {
    let mut canvas = image::open(map_path)
        .map_err(|e| format!("Failed to open {}: {}", map_path.display(), e))?
        .to_rgb8();
    if canvas.dimensions() != (width, height) {
        return Ok(false);
    }
    for name in updated {
        match tiles.iter().find(|tile| &tile.name == name) {
            Some(tile) => paste_tile(&mut canvas, tile, min_x, min_z),
            None => log::debug!("updated tile {name} is not on disk, skipping"),
        }
    }
    save_atomically(&canvas, map_path)?;
    Ok(true)
}

/// Stitches every `r.<x>.<z>.png` in `out_dir` into one image at `map_path`.
///
/// With `updated` set the existing map is patched in place instead of being
/// rebuilt, as long as its bounds still match.
pub fn stitch_images(
    out_dir: &Path,
    map_path: &Path,
    updated: Option<&[String]>,
) -> Result<(), String> {
    let tiles = collect_tiles(out_dir)?;
    if tiles.is_empty() {
        println!("{}", "! No region images found to stitch.".yellow());
        return Ok(());
    }
    let Some((min_x, max_x)) = tiles.iter().map(|tile| tile.x).minmax().into_option() else {
        return Ok(());
    };
    let Some((min_z, max_z)) = tiles.iter().map(|tile| tile.z).minmax().into_option() else {
        return Ok(());
    };
    let columns = i64::from(max_x) - i64::from(min_x) + 1;
    let rows = i64::from(max_z) - i64::from(min_z) + 1;
    let width = u32::try_from(columns * REGION_SIZE as i64)
        .map_err(|_| "The stitched map would be too large.".to_string())?;
    let height = u32::try_from(rows * REGION_SIZE as i64)
        .map_err(|_| "The stitched map would be too large.".to_string())?;

    if let Some(updated) = updated {
        if !updated.is_empty() && map_path.exists() {
            println!(
                "{}",
                format!("Updating {} tiles on the existing map...", updated.len()).cyan()
            );
            match patch_existing(map_path, &tiles, updated, min_x, min_z, width, height) {
                Ok(true) => {
                    println!(
                        "{}",
                        format!("✓ Map saved to {}.", map_path.display()).green()
                    );
                    return Ok(());
                }
                Ok(false) => {
                    log::info!("map bounds changed, falling back to a full stitch");
                }
                Err(e) => {
                    log::warn!("incremental stitch failed, falling back to a full stitch: {e}");
                }
            }
        }
    }

    println!(
        "{}",
        format!("Stitching {} region images...", tiles.len()).cyan()
    );
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);
    for tile in &tiles {
        paste_tile(&mut canvas, tile, min_x, min_z);
    }
    save_atomically(&canvas, map_path)?;
    println!(
        "{}",
        format!("✓ Map saved to {}.", map_path.display()).green()
    );
    Ok(())
}
