//! Stripe pattern generation for the projector.
//!
//! Pattern `i` carries bit `i` of each projector column's code, most
//! significant bit first, so the captured frames can be fed straight to the
//! decoder in projection order.

use serde::{Deserialize, Serialize};

/// Code carried by the stripe patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PatternEncoding {
    /// Plain binary column index.
    #[default]
    Binary,
    /// Reflected Gray code: neighbouring columns differ in one bit.
    Gray,
}

impl PatternEncoding {
    /// Encode a column index into the projected code.
    pub fn encode(self, value: u32) -> u32 {
        match self {
            PatternEncoding::Binary => value,
            PatternEncoding::Gray => binary_to_gray(value),
        }
    }

    /// Recover the column index from a decoded code.
    pub fn decode(self, code: u32) -> u32 {
        match self {
            PatternEncoding::Binary => code,
            PatternEncoding::Gray => gray_to_binary(code),
        }
    }
}

/// Convert binary value to Gray code.
pub fn binary_to_gray(binary: u32) -> u32 {
    binary ^ (binary >> 1)
}

/// Convert Gray code back to binary.
pub fn gray_to_binary(gray: u32) -> u32 {
    let mut binary = gray;
    let mut shift = 1;
    while shift < 32 {
        binary ^= binary >> shift;
        shift *= 2;
    }
    binary
}

/// Vertical stripe pattern generator.
#[derive(Debug, Clone)]
pub struct PatternGenerator {
    width: u32,
    height: u32,
    bit_count: u32,
    encoding: PatternEncoding,
}

impl PatternGenerator {
    pub fn new(width: u32, height: u32, bit_count: u32, encoding: PatternEncoding) -> Self {
        Self {
            width,
            height,
            bit_count,
            encoding,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pattern_count(&self) -> usize {
        self.bit_count as usize
    }

    /// Projected code of a projector pixel column.
    pub fn column_code(&self, column: u32) -> u32 {
        let levels = 1u64 << self.bit_count;
        let index = (column as u64 * levels / self.width.max(1) as u64).min(levels - 1);
        self.encoding.encode(index as u32)
    }

    /// Whether bit `bit_index` (0 = most significant) is lit in `code`.
    pub fn bit_lit(&self, code: u32, bit_index: u32) -> bool {
        let bit_position = self.bit_count - 1 - bit_index;
        (code >> bit_position) & 1 == 1
    }

    /// Generate pixel data for one pattern (returns grayscale bytes).
    pub fn generate(&self, bit_index: u32) -> Vec<u8> {
        let row: Vec<u8> = (0..self.width)
            .map(|x| {
                if self.bit_lit(self.column_code(x), bit_index) {
                    255u8
                } else {
                    0u8
                }
            })
            .collect();

        let mut data = Vec::with_capacity((self.width * self.height) as usize);
        for _ in 0..self.height {
            data.extend_from_slice(&row);
        }
        data
    }

    /// Generate the full sequence, most significant bit first.
    pub fn generate_all(&self) -> Vec<Vec<u8>> {
        (0..self.bit_count).map(|bit| self.generate(bit)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_code_conversion() {
        for i in 0..256 {
            let gray = binary_to_gray(i);
            let back = gray_to_binary(gray);
            assert_eq!(i, back, "Failed for {}", i);
        }
    }

    #[test]
    fn test_gray_neighbours_differ_by_one_bit() {
        for i in 0..127u32 {
            let diff = binary_to_gray(i) ^ binary_to_gray(i + 1);
            assert_eq!(diff.count_ones(), 1);
        }
    }

    #[test]
    fn test_first_pattern_is_half_split() {
        let generator = PatternGenerator::new(1024, 4, 7, PatternEncoding::Binary);
        let pattern = generator.generate(0);
        assert_eq!(pattern.len(), 1024 * 4);
        assert_eq!(pattern[0], 0);
        assert_eq!(pattern[511], 0);
        assert_eq!(pattern[512], 255);
        assert_eq!(pattern[1023], 255);
        // Rows repeat.
        assert_eq!(&pattern[..1024], &pattern[1024..2048]);
    }

    #[test]
    fn test_column_codes_span_full_range() {
        let generator = PatternGenerator::new(1024, 1, 7, PatternEncoding::Binary);
        assert_eq!(generator.column_code(0), 0);
        assert_eq!(generator.column_code(8), 1);
        assert_eq!(generator.column_code(1023), 127);
        assert_eq!(generator.pattern_count(), 7);
        assert_eq!(generator.generate_all().len(), 7);
    }

    #[test]
    fn test_patterns_reassemble_code() {
        let generator = PatternGenerator::new(300, 1, 5, PatternEncoding::Gray);
        let patterns = generator.generate_all();
        for x in 0..300usize {
            let mut code = 0u32;
            for pattern in &patterns {
                code = (code << 1) | u32::from(pattern[x] == 255);
            }
            assert_eq!(code, generator.column_code(x as u32));
            assert_eq!(PatternEncoding::Gray.decode(code), (x as u32 * 32) / 300);
        }
    }
}
