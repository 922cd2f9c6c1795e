//! Unpacking of palette-indexed block and biome containers.
//!
//! Anvil sections store names once in a palette and pack per-entry indices
//! into 64-bit words, least significant bits first, with no entry crossing a
//! word boundary.

use crate::block_colors::AIR;

/// A fixed-size array of names backed by a palette. When every entry resolves
/// to the same palette slot no index table is materialized.
#[derive(Debug, Clone)]
pub struct PackedNames {
    palette: Vec<String>,
    indices: Option<Vec<u32>>,
    len: usize,
}

impl PackedNames {
    pub fn get(&self, index: usize) -> &str {
        match &self.indices {
            Some(indices) => &self.palette[indices[index] as usize],
            None => &self.palette[0],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn any_not_air(&self) -> bool {
        match &self.indices {
            Some(_) => (0..self.len).any(|i| self.get(i) != AIR),
            None => self.palette[0] != AIR,
        }
    }
}

/// Bits needed per index, clamped below by the container's minimum width.
pub fn bits_per_entry(palette_len: usize, min_bits: u32) -> u32 {
    let needed = if palette_len <= 1 {
        0
    } else {
        (palette_len as u64 - 1).ilog2() + 1
    };
    needed.max(min_bits)
}

/// Expands a packed container to `size` names. An empty palette yields all
/// air. Out-of-range indices and missing trailing data also resolve to air
/// rather than failing the chunk.
pub fn unpack(palette: Vec<String>, data: Option<&[i64]>, size: usize, min_bits: u32) -> PackedNames {
    if palette.is_empty() {
        return PackedNames {
            palette: vec![AIR.to_string()],
            indices: None,
            len: size,
        };
    }
    let data = match data {
        Some(data) if palette.len() > 1 => data,
        _ => {
            return PackedNames {
                palette,
                indices: None,
                len: size,
            }
        }
    };

    let named_len = palette.len();
    let mut palette = palette;
    let air_index = named_len as u32;
    palette.push(AIR.to_string());

    let bits = bits_per_entry(named_len, min_bits);
    let entries_per_long = (64 / bits) as usize;
    let mask = (1u64 << bits) - 1;

    let mut indices = Vec::with_capacity(size);
    'words: for &long in data {
        let word = long as u64;
        for slot in 0..entries_per_long {
            if indices.len() >= size {
                break 'words;
            }
            let index = (word >> (slot as u32 * bits)) & mask;
            if (index as usize) < named_len {
                indices.push(index as u32);
            } else {
                indices.push(air_index);
            }
        }
    }
    indices.resize(size, air_index);

    PackedNames {
        palette,
        indices: Some(indices),
        len: size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bits_per_entry() {
        assert_eq!(bits_per_entry(1, 4), 4);
        assert_eq!(bits_per_entry(2, 4), 4);
        assert_eq!(bits_per_entry(16, 4), 4);
        assert_eq!(bits_per_entry(17, 4), 5);
        assert_eq!(bits_per_entry(2, 1), 1);
        assert_eq!(bits_per_entry(5, 1), 3);
        assert_eq!(bits_per_entry(64, 1), 6);
        assert_eq!(bits_per_entry(65, 1), 7);
    }

    #[test]
    fn test_bits_per_entry_over_every_palette_size() {
        for min_bits in [1u32, 4] {
            for len in 2..=65536usize {
                let ceil_log2 = len.next_power_of_two().trailing_zeros();
                assert_eq!(
                    bits_per_entry(len, min_bits),
                    ceil_log2.max(min_bits),
                    "palette of {len} at minimum width {min_bits}"
                );
            }
        }
    }

    #[test]
    fn test_empty_palette_is_all_air() {
        let unpacked = unpack(Vec::new(), Some(&[0, 0]), 64, 1);
        assert!((0..64).all(|i| unpacked.get(i) == AIR));
        assert!(!unpacked.any_not_air());
    }

    #[test]
    fn test_single_entry_palette_ignores_data() {
        let unpacked = unpack(names(&["minecraft:stone"]), Some(&[u64::MAX as i64]), 4096, 4);
        assert!((0..4096).all(|i| unpacked.get(i) == "minecraft:stone"));
        assert!(unpacked.any_not_air());
    }

    #[test]
    fn test_missing_data_uses_first_entry() {
        let unpacked = unpack(names(&["minecraft:bedrock", "minecraft:stone"]), None, 4096, 4);
        assert!((0..4096).all(|i| unpacked.get(i) == "minecraft:bedrock"));
    }

    #[test]
    fn test_unpack_is_lsb_first() {
        // Two bits per entry: values 1, 2, 3, 0 packed into the low byte.
        let word = 0b00_11_10_01_i64;
        let unpacked = unpack(names(&["a", "b", "c", "d"]), Some(&[word]), 4, 1);
        assert_eq!(unpacked.get(0), "b");
        assert_eq!(unpacked.get(1), "c");
        assert_eq!(unpacked.get(2), "d");
        assert_eq!(unpacked.get(3), "a");
    }

    #[test]
    fn test_min_bits_widens_small_palettes() {
        // Two entries still take four bits each in block containers.
        let word = 0x10_i64;
        let unpacked = unpack(names(&["a", "b"]), Some(&[word]), 2, 4);
        assert_eq!(unpacked.get(0), "a");
        assert_eq!(unpacked.get(1), "b");
    }

    #[test]
    fn test_out_of_range_index_is_air() {
        let word = 0x0F_i64;
        let unpacked = unpack(names(&["a", "b"]), Some(&[word]), 1, 4);
        assert_eq!(unpacked.get(0), AIR);
    }

    #[test]
    fn test_short_data_pads_with_air() {
        let unpacked = unpack(names(&["a", "b"]), Some(&[i64::MIN]), 128, 1);
        assert_eq!(unpacked.get(63), "b");
        assert!((64..128).all(|i| unpacked.get(i) == AIR));
    }

    #[test]
    fn test_entries_do_not_cross_word_boundaries() {
        // Five bits per entry leaves the top four bits of each word unused,
        // so the thirteenth entry starts at the next word's low bits.
        let palette: Vec<String> = (0..17).map(|i| format!("block_{i}")).collect();
        let unpacked = unpack(palette, Some(&[0, 1]), 13, 1);
        assert!((0..12).all(|i| unpacked.get(i) == "block_0"));
        assert_eq!(unpacked.get(12), "block_1");
    }
}
