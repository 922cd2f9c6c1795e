//! Anvil region container parsing.
//!
//! A region file starts with a 4096-byte table of 1024 big-endian sector
//! pointers, one per chunk slot. The high 24 bits of a pointer give the
//! sector index of the chunk's data; a pointer of zero marks an empty slot.

use flate2::read::ZlibDecoder;
use std::io::{self, Read};

pub const SECTOR_SIZE: usize = 4096;
pub const CHUNKS_PER_REGION: usize = 1024;

/// Only the zlib scheme is supported. Gzip and externally stored chunks are
/// rare in practice and skipped as unsupported.
const COMPRESSION_ZLIB: u8 = 2;

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Returns the compressed payload for a chunk slot, or `None` when the slot
/// is absent, truncated, or uses an unsupported compression scheme.
pub fn chunk_payload(region: &[u8], chunk_index: usize) -> Option<&[u8]> {
    let location = read_u32(region, chunk_index * 4)?;
    if location == 0 {
        return None;
    }
    let offset = (location >> 8) as usize * SECTOR_SIZE;
    let length = read_u32(region, offset)? as usize;
    if length <= 1 {
        return None;
    }
    let scheme = *region.get(offset + 4)?;
    if scheme != COMPRESSION_ZLIB {
        log::debug!("chunk {chunk_index} uses unsupported compression scheme {scheme}");
        return None;
    }
    let end = (offset + 4 + length).min(region.len());
    region.get(offset + 5..end)
}

pub fn inflate_chunk(payload: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(payload);
    let mut data = Vec::new();
    decoder.read_to_end(&mut data)?;
    Ok(data)
}

/// Parses region coordinates out of an `r.<x>.<z><extension>` file name.
pub fn parse_region_name(file_name: &str, extension: &str) -> Option<(i32, i32)> {
    let rest = file_name.strip_prefix("r.")?.strip_suffix(extension)?;
    let (x, z) = rest.split_once('.')?;
    Some((x.parse().ok()?, z.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{deflate, region_with_chunk};

    #[test]
    fn test_empty_slot_is_absent() {
        let region = vec![0u8; SECTOR_SIZE * 2];
        assert!(chunk_payload(&region, 0).is_none());
        assert!(chunk_payload(&region, 1023).is_none());
    }

    #[test]
    fn test_payload_round_trip() {
        let compressed = deflate(b"chunk data");
        let region = region_with_chunk(5, COMPRESSION_ZLIB, &compressed);
        let payload = chunk_payload(&region, 5).unwrap();
        assert_eq!(payload, compressed.as_slice());
        assert_eq!(inflate_chunk(payload).unwrap(), b"chunk data");
    }

    #[test]
    fn test_zero_length_slot_is_absent() {
        let mut region = vec![0u8; SECTOR_SIZE * 2];
        region[0..4].copy_from_slice(&((2u32 << 8) | 1).to_be_bytes());
        region.extend_from_slice(&1u32.to_be_bytes());
        region.push(COMPRESSION_ZLIB);
        assert!(chunk_payload(&region, 0).is_none());
    }

    #[test]
    fn test_unsupported_scheme_is_skipped() {
        let region = region_with_chunk(0, 1, b"gzip data");
        assert!(chunk_payload(&region, 0).is_none());
    }

    #[test]
    fn test_pointer_past_end_of_file_is_absent() {
        let mut region = vec![0u8; SECTOR_SIZE];
        region[0..4].copy_from_slice(&((90u32 << 8) | 1).to_be_bytes());
        assert!(chunk_payload(&region, 0).is_none());
    }

    #[test]
    fn test_truncated_payload_is_clamped() {
        let mut region = region_with_chunk(0, COMPRESSION_ZLIB, b"abcdef");
        region.truncate(region.len() - 3);
        let payload = chunk_payload(&region, 0).unwrap();
        assert_eq!(payload, b"abc");
    }

    #[test]
    fn test_corrupt_deflate_stream_errors() {
        assert!(inflate_chunk(b"not a zlib stream").is_err());
    }

    #[test]
    fn test_parse_region_name() {
        assert_eq!(parse_region_name("r.0.0.mca", ".mca"), Some((0, 0)));
        assert_eq!(parse_region_name("r.-3.12.mca", ".mca"), Some((-3, 12)));
        assert_eq!(parse_region_name("r.4.-1.png", ".png"), Some((4, -1)));
        assert_eq!(parse_region_name("level.dat", ".mca"), None);
        assert_eq!(parse_region_name("r.1.mca", ".mca"), None);
        assert_eq!(parse_region_name("r.1.2.3.mca", ".mca"), None);
        assert_eq!(parse_region_name("r.a.b.mca", ".mca"), None);
    }
}
