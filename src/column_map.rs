//! Column extraction: reduces a region's chunks to per-column surface,
//! floor and decoration layers.
//!
//! Each chunk owns a disjoint 16x16 sub-rectangle of the 512x512 region
//! grid, so chunks can be scanned in parallel and merged without locking.

use rayon::prelude::*;

use crate::block_colors::{is_surface_block, AIR, DECORATION_BLOCKS, PLAINS, WATER};
use crate::nbt::{self, Tag};
use crate::palette::{unpack, PackedNames};
use crate::region::{chunk_payload, inflate_chunk, CHUNKS_PER_REGION};
use fnv::FnvHashMap;

/// Marks a column layer that was never recorded.
pub const EMPTY_Y: i16 = -10000;

/// A region covers 512x512 columns, 32x32 chunks of 16x16 each.
pub const REGION_SIZE: usize = 512;
pub const COLUMNS_PER_REGION: usize = REGION_SIZE * REGION_SIZE;
const CHUNK_SIZE: usize = 16;
const COLUMNS_PER_CHUNK: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Interns block and biome names so the column arrays can hold small ids
/// instead of strings. Tables live on the renderer and persist across the
/// region files a worker processes.
#[derive(Debug, Default)]
pub struct NameTable {
    ids: FnvHashMap<String, u16>,
    names: Vec<String>,
}

impl NameTable {
    pub fn intern(&mut self, name: &str) -> u16 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as u16;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    pub fn name(&self, id: u16) -> &str {
        &self.names[id as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The flattened view of one region: for every column the highest renderable
/// block (surface), the first solid block under water (floor) and the
/// topmost decoration, each with its block and biome id.
pub struct ColumnMap {
    pub surface_y: Vec<i16>,
    pub surface_name: Vec<u16>,
    pub surface_biome: Vec<u16>,
    pub floor_y: Vec<i16>,
    pub floor_name: Vec<u16>,
    pub floor_biome: Vec<u16>,
    pub decoration_y: Vec<i16>,
    pub decoration_name: Vec<u16>,
    pub decoration_biome: Vec<u16>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self {
            surface_y: vec![EMPTY_Y; COLUMNS_PER_REGION],
            surface_name: vec![0; COLUMNS_PER_REGION],
            surface_biome: vec![0; COLUMNS_PER_REGION],
            floor_y: vec![EMPTY_Y; COLUMNS_PER_REGION],
            floor_name: vec![0; COLUMNS_PER_REGION],
            floor_biome: vec![0; COLUMNS_PER_REGION],
            decoration_y: vec![EMPTY_Y; COLUMNS_PER_REGION],
            decoration_name: vec![0; COLUMNS_PER_REGION],
            decoration_biome: vec![0; COLUMNS_PER_REGION],
        }
    }

    fn merge_chunk(
        &mut self,
        chunk_index: usize,
        chunk: &ChunkColumns,
        blocks: &mut NameTable,
        biomes: &mut NameTable,
    ) {
        let chunk_x = chunk_index % 32;
        let chunk_z = chunk_index / 32;
        for sec_z in 0..CHUNK_SIZE {
            for sec_x in 0..CHUNK_SIZE {
                let local = sec_z * CHUNK_SIZE + sec_x;
                let global =
                    (chunk_z * CHUNK_SIZE + sec_z) * REGION_SIZE + chunk_x * CHUNK_SIZE + sec_x;
                if chunk.surface_y[local] != EMPTY_Y {
                    self.surface_y[global] = chunk.surface_y[local];
                    self.surface_name[global] =
                        blocks.intern(chunk.blocks.name(chunk.surface_name[local]));
                    self.surface_biome[global] =
                        biomes.intern(chunk.biomes.name(chunk.surface_biome[local]));
                }
                if chunk.floor_y[local] != EMPTY_Y {
                    self.floor_y[global] = chunk.floor_y[local];
                    self.floor_name[global] =
                        blocks.intern(chunk.blocks.name(chunk.floor_name[local]));
                    self.floor_biome[global] =
                        biomes.intern(chunk.biomes.name(chunk.floor_biome[local]));
                }
                if chunk.decoration_y[local] != EMPTY_Y {
                    self.decoration_y[global] = chunk.decoration_y[local];
                    self.decoration_name[global] =
                        blocks.intern(chunk.blocks.name(chunk.decoration_name[local]));
                    self.decoration_biome[global] =
                        biomes.intern(chunk.biomes.name(chunk.decoration_biome[local]));
                }
            }
        }
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan result for a single chunk, with ids in chunk-local tables.
struct ChunkColumns {
    surface_y: [i16; COLUMNS_PER_CHUNK],
    surface_name: [u16; COLUMNS_PER_CHUNK],
    surface_biome: [u16; COLUMNS_PER_CHUNK],
    floor_y: [i16; COLUMNS_PER_CHUNK],
    floor_name: [u16; COLUMNS_PER_CHUNK],
    floor_biome: [u16; COLUMNS_PER_CHUNK],
    decoration_y: [i16; COLUMNS_PER_CHUNK],
    decoration_name: [u16; COLUMNS_PER_CHUNK],
    decoration_biome: [u16; COLUMNS_PER_CHUNK],
    blocks: NameTable,
    biomes: NameTable,
    renderable: u32,
}

impl ChunkColumns {
    fn new() -> Self {
        Self {
            surface_y: [EMPTY_Y; COLUMNS_PER_CHUNK],
            surface_name: [0; COLUMNS_PER_CHUNK],
            surface_biome: [0; COLUMNS_PER_CHUNK],
            floor_y: [EMPTY_Y; COLUMNS_PER_CHUNK],
            floor_name: [0; COLUMNS_PER_CHUNK],
            floor_biome: [0; COLUMNS_PER_CHUNK],
            decoration_y: [EMPTY_Y; COLUMNS_PER_CHUNK],
            decoration_name: [0; COLUMNS_PER_CHUNK],
            decoration_biome: [0; COLUMNS_PER_CHUNK],
            blocks: NameTable::default(),
            biomes: NameTable::default(),
            renderable: 0,
        }
    }
}

struct ChunkSection {
    y: i32,
    blocks: PackedNames,
    biomes: Option<PackedNames>,
}

fn palette_entries(entries: &[Tag]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| match entry {
            Tag::String(name) => name.clone(),
            _ => entry
                .get("Name")
                .and_then(Tag::as_str)
                .unwrap_or(AIR)
                .to_string(),
        })
        .collect()
}

/// Pulls the sections out of a chunk document, newest world format only.
/// Returns `None` when there is nothing usable or the palette data is
/// malformed, in which case the whole chunk contributes nothing.
fn decode_sections(root: &Tag) -> Option<Vec<ChunkSection>> {
    let section_tags = root.get("sections")?.as_list()?;
    let mut sections = Vec::new();
    for section in section_tags {
        let Some(block_states) = section.get("block_states") else {
            continue;
        };
        let Some(palette_tag) = block_states.get("palette") else {
            continue;
        };
        let palette = palette_entries(palette_tag.as_list()?);
        let data = match block_states.get("data") {
            Some(tag) => Some(tag.as_long_array()?),
            None => None,
        };
        let blocks = unpack(palette, data, 4096, 4);

        let biomes = match section.get("biomes").and_then(|b| b.get("palette")) {
            Some(palette_tag) => {
                let palette = palette_entries(palette_tag.as_list()?);
                let data = match section.get("biomes").and_then(|b| b.get("data")) {
                    Some(tag) => Some(tag.as_long_array()?),
                    None => None,
                };
                Some(unpack(palette, data, 64, 1))
            }
            None => None,
        };

        let y = section.get("Y").and_then(Tag::as_int).unwrap_or(0) as i32;
        sections.push(ChunkSection { y, blocks, biomes });
    }
    if sections.is_empty() {
        return None;
    }

    sections.sort_by(|a, b| b.y.cmp(&a.y));

    // Sections without biome data inherit the biomes of the nearest section
    // above them. Single-biome chunks often only store biomes near the top.
    let mut last_valid: Option<PackedNames> = None;
    for section in &mut sections {
        match &section.biomes {
            Some(biomes) if biomes.any_not_air() => last_valid = Some(biomes.clone()),
            _ => {
                if let Some(fallback) = &last_valid {
                    section.biomes = Some(fallback.clone());
                }
            }
        }
    }
    Some(sections)
}

/// Biomes are stored at 4x4x4 resolution within a section.
fn biome_for_block<'a>(section: &'a ChunkSection, sec_x: usize, sec_y: usize, sec_z: usize) -> &'a str {
    let Some(biomes) = &section.biomes else {
        return PLAINS;
    };
    let index = (sec_y / 4 * 4 + sec_z / 4) * 4 + sec_x / 4;
    let name = biomes.get(index);
    if name.is_empty() || name == AIR {
        PLAINS
    } else {
        name
    }
}

/// Walks every column of a chunk from the top down, recording the first
/// decoration, the first renderable surface and, under water, the first
/// solid floor. Water is the only surface the scan continues past.
fn scan_sections(sections: &[ChunkSection]) -> ChunkColumns {
    let mut columns = ChunkColumns::new();
    for sec_z in 0..CHUNK_SIZE {
        for sec_x in 0..CHUNK_SIZE {
            let idx = sec_z * CHUNK_SIZE + sec_x;
            for section in sections {
                if columns.floor_y[idx] != EMPTY_Y
                    || (columns.surface_y[idx] != EMPTY_Y
                        && columns.blocks.name(columns.surface_name[idx]) != WATER)
                {
                    break;
                }
                for sec_y in (0..CHUNK_SIZE).rev() {
                    let name = section.blocks.get(sec_y * 256 + sec_z * 16 + sec_x);
                    if name == AIR {
                        continue;
                    }
                    // Corrupt section heights wrap rather than abort the scan.
                    let y = section.y.wrapping_mul(16).wrapping_add(sec_y as i32) as i16;
                    let biome = biome_for_block(section, sec_x, sec_y, sec_z);
                    let name_id = columns.blocks.intern(name);
                    let biome_id = columns.biomes.intern(biome);
                    if columns.decoration_y[idx] == EMPTY_Y && DECORATION_BLOCKS.contains(name) {
                        columns.decoration_y[idx] = y;
                        columns.decoration_name[idx] = name_id;
                        columns.decoration_biome[idx] = biome_id;
                        continue;
                    }
                    if columns.surface_y[idx] == EMPTY_Y {
                        if is_surface_block(name) {
                            columns.surface_y[idx] = y;
                            columns.surface_name[idx] = name_id;
                            columns.surface_biome[idx] = biome_id;
                            columns.renderable += 1;
                            if name != WATER {
                                break;
                            }
                        }
                    } else if columns.floor_y[idx] == EMPTY_Y
                        && name != WATER
                        && is_surface_block(name)
                    {
                        columns.floor_y[idx] = y;
                        columns.floor_name[idx] = name_id;
                        columns.floor_biome[idx] = biome_id;
                        break;
                    }
                }
            }
        }
    }
    columns
}

fn scan_chunk(region: &[u8], chunk_index: usize) -> Option<ChunkColumns> {
    let payload = chunk_payload(region, chunk_index)?;
    let inflated = inflate_chunk(payload).ok()?;
    let root = nbt::decode(&inflated).ok()?;
    let sections = decode_sections(&root)?;
    Some(scan_sections(&sections))
}

/// Builds the column map for a whole region file. Chunks are scanned in
/// parallel; failed or empty chunks contribute nothing. Returns the map and
/// the number of renderable surface blocks found.
pub fn build_column_map(
    region: &[u8],
    blocks: &mut NameTable,
    biomes: &mut NameTable,
) -> (ColumnMap, u64) {
    let chunks: Vec<(usize, ChunkColumns)> = (0..CHUNKS_PER_REGION)
        .into_par_iter()
        .filter_map(|chunk_index| scan_chunk(region, chunk_index).map(|c| (chunk_index, c)))
        .collect();

    let mut map = ColumnMap::new();
    let mut renderable = 0u64;
    for (chunk_index, chunk) in &chunks {
        map.merge_chunk(*chunk_index, chunk, blocks, biomes);
        renderable += u64::from(chunk.renderable);
    }
    (map, renderable)
}
