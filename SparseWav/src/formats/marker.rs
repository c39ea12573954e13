//! Run-length marker blocks
//!
//! A marker stands in for `N` consecutive silent blocks that the recorder
//! elided from the file. The first 32 little-endian `i16` values of the block
//! spell out `N` one bit at a time (`+1` for a set bit, `-1` for a clear
//! bit) and every value after them is zero. A block of real silence is all
//! zeros and never decodes as a marker.
//!
//! A block that is not a marker decodes to `0`, the same value as a marker
//! encoding a zero-length run. Callers treat both as "copy the block".

use byteorder::{ByteOrder, LittleEndian};

/// Size of one marker block in bytes
pub const MARKER_BLOCK_SIZE: usize = 512;

/// Number of `i16` values that carry the run-length bits
const COUNT_BITS: usize = 32;

/// Bytes occupied by the run-length bits
const COUNT_BYTES: usize = COUNT_BITS * 2;

const BIT_SET: i16 = 1;
const BIT_CLEAR: i16 = -1;

/// Decode the run length carried by a block.
///
/// Returns `0` when the block is not a valid marker: any of the first 32
/// values outside `{+1, -1}`, any later value that is non-zero, or a block
/// too short to hold the count.
pub fn decode_marker(block: &[u8]) -> u32 {
    if block.len() < COUNT_BYTES {
        return 0;
    }

    let mut count = 0u32;

    for (bit, sample) in block[..COUNT_BYTES].chunks_exact(2).enumerate() {
        match LittleEndian::read_i16(sample) {
            BIT_SET => count |= 1 << bit,
            BIT_CLEAR => {}
            _ => return 0,
        }
    }

    let padding_is_zero = block[COUNT_BYTES..].iter().all(|&b| b == 0);

    if padding_is_zero { count } else { 0 }
}

/// Encode a run length as a marker block.
///
/// `decode_marker(&encode_marker(n)) == n` for every `n`.
pub fn encode_marker(count: u32) -> [u8; MARKER_BLOCK_SIZE] {
    let mut block = [0u8; MARKER_BLOCK_SIZE];

    for (bit, sample) in block[..COUNT_BYTES].chunks_exact_mut(2).enumerate() {
        let value = if count & (1 << bit) == 0 { BIT_CLEAR } else { BIT_SET };
        LittleEndian::write_i16(sample, value);
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_block_is_not_a_marker() {
        assert_eq!(decode_marker(&[0u8; MARKER_BLOCK_SIZE]), 0);
    }

    #[test]
    fn test_encode_decode_known_counts() {
        for count in [1u32, 2, 5, 255, 256, 65_535, 1 << 31, u32::MAX] {
            assert_eq!(decode_marker(&encode_marker(count)), count, "count {count}");
        }
    }

    #[test]
    fn test_encoded_layout() {
        let block = encode_marker(5);
        // 5 = 0b101
        assert_eq!(LittleEndian::read_i16(&block[0..2]), 1);
        assert_eq!(LittleEndian::read_i16(&block[2..4]), -1);
        assert_eq!(LittleEndian::read_i16(&block[4..6]), 1);
        assert_eq!(LittleEndian::read_i16(&block[6..8]), -1);
        assert!(block[COUNT_BYTES..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_count_round_trips_to_zero() {
        // All -1 bits, which reads back as "no special handling"
        assert_eq!(decode_marker(&encode_marker(0)), 0);
    }

    #[test]
    fn test_invalid_count_value_rejects_marker() {
        for slot in [0, 7, 31] {
            let mut block = encode_marker(0x1234_5678);
            LittleEndian::write_i16(&mut block[slot * 2..slot * 2 + 2], 2);
            assert_eq!(decode_marker(&block), 0, "slot {slot}");

            LittleEndian::write_i16(&mut block[slot * 2..slot * 2 + 2], 0);
            assert_eq!(decode_marker(&block), 0, "slot {slot}");
        }
    }

    #[test]
    fn test_nonzero_padding_rejects_marker() {
        for offset in [COUNT_BYTES, 200, MARKER_BLOCK_SIZE - 1] {
            let mut block = encode_marker(42);
            block[offset] = 1;
            assert_eq!(decode_marker(&block), 0, "offset {offset}");
        }
    }

    #[test]
    fn test_short_block_is_not_a_marker() {
        let block = encode_marker(9);
        assert_eq!(decode_marker(&block[..COUNT_BYTES - 2]), 0);
        // The count alone with no padding is still well formed
        assert_eq!(decode_marker(&block[..COUNT_BYTES]), 9);
    }
}
