//! Projector column estimation from decoded bit-planes.

use super::bits::BitPlanes;
use crate::pattern::PatternEncoding;
use rayon::prelude::*;

/// Marker for pixels without a usable code. Far outside [-1, 1].
pub const INVALID_COLUMN: f32 = -1000.0;

/// Whether a column value is a real measurement.
pub fn is_valid_column(value: f32) -> bool {
    (-1.0..=1.0).contains(&value)
}

/// Map a column index to a normalized projector coordinate.
///
/// Index 0 (nothing lit) and the all-ones index (saturated) are invalid.
pub fn code_to_column(code: u32, bit_count: u32) -> f32 {
    let max_code = (1u32 << bit_count) - 1;
    if code == 0 || code >= max_code {
        return INVALID_COLUMN;
    }
    2.0 * code as f32 / max_code as f32 - 1.0
}

/// Combines bit-planes into one normalized projector column per pixel.
#[derive(Debug, Clone, Copy)]
pub struct ColumnEstimator {
    bit_count: u32,
    encoding: PatternEncoding,
}

impl ColumnEstimator {
    pub fn new(bit_count: u32, encoding: PatternEncoding) -> Self {
        Self { bit_count, encoding }
    }

    /// Assemble a pixel's bits, most significant first, into its column index.
    pub fn pixel_code(&self, bits: &[u8]) -> u32 {
        let code = bits
            .iter()
            .take(self.bit_count as usize)
            .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
        self.encoding.decode(code)
    }

    pub fn estimate(&self, bits: &BitPlanes) -> ColumnMap {
        let width = bits.width();
        let frames = bits.frame_count();
        let mut values = vec![INVALID_COLUMN; width as usize * bits.height() as usize];

        values
            .par_chunks_mut(width as usize)
            .zip(bits.data().par_chunks(width as usize * frames))
            .for_each(|(row, bit_row)| {
                for (value, pixel_bits) in row.iter_mut().zip(bit_row.chunks(frames)) {
                    *value = code_to_column(self.pixel_code(pixel_bits), self.bit_count);
                }
            });

        let map = ColumnMap {
            width,
            height: bits.height(),
            values,
        };
        log::debug!(
            "Estimated projector columns: {} of {} pixels invalid",
            map.invalid_count(),
            map.values.len()
        );
        map
    }
}

/// Normalized projector column per camera pixel, [`INVALID_COLUMN`] where
/// no code was decoded.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl ColumnMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of pixels with no valid measurement.
    pub fn invalid_count(&self) -> usize {
        self.values.iter().filter(|&&v| !is_valid_column(v)).count()
    }

    /// Grayscale visualization, [-1, 1] mapped to [0, 255].
    pub fn to_image(&self) -> Vec<u8> {
        self.values
            .iter()
            .map(|&v| (((v + 1.0) / 2.0).clamp(0.0, 1.0) * 255.0) as u8)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TieBreak;
    use crate::decode::LuminanceGrid;

    fn code_bits(code: u32, bit_count: u32) -> Vec<u8> {
        (0..bit_count)
            .map(|i| ((code >> (bit_count - 1 - i)) & 1) as u8)
            .collect()
    }

    #[test]
    fn test_seven_bit_round_trip() {
        let estimator = ColumnEstimator::new(7, PatternEncoding::Binary);
        for k in 1..127u32 {
            let code = estimator.pixel_code(&code_bits(k, 7));
            let column = code_to_column(code, 7);
            let expected = 2.0 * k as f32 / 127.0 - 1.0;
            assert!((column - expected).abs() < 1e-6, "Failed for {}", k);
            assert!(is_valid_column(column));
        }
    }

    #[test]
    fn test_extreme_codes_are_invalid() {
        let estimator = ColumnEstimator::new(7, PatternEncoding::Binary);
        assert_eq!(code_to_column(estimator.pixel_code(&code_bits(0, 7)), 7), INVALID_COLUMN);
        assert_eq!(code_to_column(estimator.pixel_code(&code_bits(127, 7)), 7), INVALID_COLUMN);
        assert!(!is_valid_column(INVALID_COLUMN));
    }

    #[test]
    fn test_msb_first_weighting() {
        let estimator = ColumnEstimator::new(7, PatternEncoding::Binary);
        assert_eq!(estimator.pixel_code(&[1, 0, 0, 0, 0, 0, 0]), 64);
        assert_eq!(estimator.pixel_code(&[0, 0, 0, 0, 0, 0, 1]), 1);
    }

    #[test]
    fn test_gray_encoding_decodes_to_index() {
        let estimator = ColumnEstimator::new(7, PatternEncoding::Gray);
        for k in 1..127u32 {
            let bits = code_bits(PatternEncoding::Gray.encode(k), 7);
            assert_eq!(estimator.pixel_code(&bits), k);
        }
    }

    #[test]
    fn test_estimate_map_and_invalid_count() {
        // Three pixels over three frames: code 0b010, then two constant pixels.
        let data = vec![0.0, 1.0, 0.0, 0.2, 0.2, 0.2, 0.9, 0.9, 0.9];
        let lum = LuminanceGrid::from_samples(3, 1, 3, data);
        let bits = BitPlanes::decode(&lum, TieBreak::Low);
        let map = ColumnEstimator::new(3, PatternEncoding::Binary).estimate(&bits);

        assert!((map.get(0, 0) - (2.0 * 2.0 / 7.0 - 1.0)).abs() < 1e-6);
        assert_eq!(map.get(1, 0), INVALID_COLUMN);
        // Constant pixels decode to all zeros under the low tie policy.
        assert_eq!(map.get(2, 0), INVALID_COLUMN);
        assert_eq!(map.invalid_count(), 2);

        let image = map.to_image();
        assert_eq!(image[1], 0);
    }
}
