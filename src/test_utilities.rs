//! Builders for synthetic region files and chunk NBT used across tests.

use byteorder::{BigEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

use crate::region::SECTOR_SIZE;

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("write to zlib encoder");
    encoder.finish().expect("finish zlib stream")
}

/// Builds a region file holding a single chunk at the given slot. The data
/// lands in sector 2, right after the pointer and timestamp tables.
pub fn region_with_chunk(chunk_index: usize, scheme: u8, payload: &[u8]) -> Vec<u8> {
    let mut region = vec![0u8; SECTOR_SIZE * 2];
    region[chunk_index * 4..chunk_index * 4 + 4].copy_from_slice(&((2u32 << 8) | 1).to_be_bytes());
    region.extend_from_slice(&(payload.len() as u32 + 1).to_be_bytes());
    region.push(scheme);
    region.extend_from_slice(payload);
    region
}

/// Builds a region file with zlib chunks in consecutive sectors.
pub fn region_with_chunks(chunks: &[(usize, Vec<u8>)]) -> Vec<u8> {
    let mut region = vec![0u8; SECTOR_SIZE * 2];
    for (chunk_index, payload) in chunks {
        let sector = region.len() / SECTOR_SIZE;
        let sector_count = (payload.len() + 5).div_ceil(SECTOR_SIZE);
        region[chunk_index * 4..chunk_index * 4 + 4]
            .copy_from_slice(&(((sector as u32) << 8) | sector_count as u32).to_be_bytes());
        region.extend_from_slice(&(payload.len() as u32 + 1).to_be_bytes());
        region.push(2);
        region.extend_from_slice(payload);
        region.resize((sector + sector_count) * SECTOR_SIZE, 0);
    }
    region
}

pub struct SectionSpec<'a> {
    pub y: i32,
    pub block_palette: &'a [&'a str],
    pub block_data: Option<&'a [i64]>,
    pub biome_palette: &'a [&'a str],
    pub biome_data: Option<&'a [i64]>,
}

fn write_str(out: &mut Vec<u8>, text: &str) {
    out.write_i16::<BigEndian>(text.len() as i16)
        .expect("write string length");
    out.extend_from_slice(text.as_bytes());
}

fn write_palette_container(
    out: &mut Vec<u8>,
    palette: &[&str],
    data: Option<&[i64]>,
    names_as_compounds: bool,
) {
    out.push(9);
    write_str(out, "palette");
    if names_as_compounds {
        out.push(10);
        out.write_i32::<BigEndian>(palette.len() as i32)
            .expect("write palette length");
        for name in palette {
            out.push(8);
            write_str(out, "Name");
            write_str(out, name);
            out.push(0);
        }
    } else {
        out.push(8);
        out.write_i32::<BigEndian>(palette.len() as i32)
            .expect("write palette length");
        for name in palette {
            write_str(out, name);
        }
    }
    if let Some(data) = data {
        out.push(12);
        write_str(out, "data");
        out.write_i32::<BigEndian>(data.len() as i32)
            .expect("write data length");
        for &value in data {
            out.write_i64::<BigEndian>(value).expect("write data word");
        }
    }
    out.push(0);
}

/// Serializes a chunk document with the given sections, shaped the way
/// vanilla worlds store them: block palettes as compounds with a `Name`
/// string, biome palettes as bare strings.
pub fn chunk_document(sections: &[SectionSpec]) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(10);
    write_str(&mut out, "");
    out.push(9);
    write_str(&mut out, "sections");
    out.push(10);
    out.write_i32::<BigEndian>(sections.len() as i32)
        .expect("write section count");
    for section in sections {
        out.push(3);
        write_str(&mut out, "Y");
        out.write_i32::<BigEndian>(section.y)
            .expect("write section y");
        out.push(10);
        write_str(&mut out, "block_states");
        write_palette_container(&mut out, section.block_palette, section.block_data, true);
        if !section.biome_palette.is_empty() {
            out.push(10);
            write_str(&mut out, "biomes");
            write_palette_container(&mut out, section.biome_palette, section.biome_data, false);
        }
        out.push(0);
    }
    out.push(0);
    out
}

/// A complete region file with one chunk in slot 0 built from `sections`.
pub fn region_with_sections(sections: &[SectionSpec]) -> Vec<u8> {
    region_with_chunk(0, 2, &deflate(&chunk_document(sections)))
}
