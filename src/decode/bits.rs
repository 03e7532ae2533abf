//! Adaptive per-pixel bit-plane thresholding.

use super::grayscale::LuminanceGrid;
use crate::config::TieBreak;
use rayon::prelude::*;

/// Decoded bit stack: one {0, 1} value per pixel per frame, pixel-major.
#[derive(Debug, Clone)]
pub struct BitPlanes {
    width: u32,
    height: u32,
    frames: usize,
    bits: Vec<u8>,
}

/// Threshold one sample against the midpoint of its pixel's range.
pub fn threshold_bit(value: f32, min: f32, max: f32, tie_break: TieBreak) -> u8 {
    let midpoint = (min + max) / 2.0;
    let lit = match tie_break {
        TieBreak::Low => value > midpoint,
        TieBreak::High => value >= midpoint,
    };
    u8::from(lit)
}

impl BitPlanes {
    /// Threshold every sample against the midpoint of its pixel's min/max
    /// luminance over all frames.
    pub fn decode(luminance: &LuminanceGrid, tie_break: TieBreak) -> Self {
        let width = luminance.width();
        let frames = luminance.frame_count();
        let mut bits = vec![0u8; luminance.data().len()];
        let row_len = width as usize * frames;

        bits.par_chunks_mut(row_len)
            .zip(luminance.data().par_chunks(row_len))
            .for_each(|(bit_row, lum_row)| {
                for (pixel_bits, samples) in bit_row.chunks_mut(frames).zip(lum_row.chunks(frames)) {
                    let (min, max) = samples
                        .iter()
                        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                            (lo.min(v), hi.max(v))
                        });
                    for (bit, &value) in pixel_bits.iter_mut().zip(samples) {
                        *bit = threshold_bit(value, min, max, tie_break);
                    }
                }
            });

        Self {
            width,
            height: luminance.height(),
            frames,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Bit of pixel (x, y) in `frame`.
    pub fn bit(&self, x: u32, y: u32, frame: usize) -> u8 {
        let index = y as usize * self.width as usize + x as usize;
        self.bits[index * self.frames + frame]
    }

    /// All bits of pixel `index`, frame order.
    pub fn pixel(&self, index: usize) -> &[u8] {
        &self.bits[index * self.frames..(index + 1) * self.frames]
    }

    /// One frame's bits as a 0/255 grayscale image.
    pub fn plane_image(&self, frame: usize) -> Vec<u8> {
        self.bits
            .chunks(self.frames)
            .map(|pixel| pixel[frame] * 255)
            .collect()
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.bits
    }
}
