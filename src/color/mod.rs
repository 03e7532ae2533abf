//! Per-pixel albedo estimate from the full frame stack.
//!
//! The stripes alternately light and darken every pixel, so the midpoint of
//! each channel's observed range is independent of which bits were lit.

use crate::capture::ImageStack;
use rayon::prelude::*;

/// Normalized RGB color per pixel, row-major.
#[derive(Debug, Clone)]
pub struct ColorMap {
    width: u32,
    height: u32,
    colors: Vec<[f32; 3]>,
}

/// Midpoint of the min/max of a channel's samples.
pub fn midpoint_color(samples: impl IntoIterator<Item = f32>) -> f32 {
    let (min, max) = samples
        .into_iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    0.5 * (min + max)
}

impl ColorMap {
    pub fn from_stack(stack: &ImageStack) -> Self {
        let width = stack.width();
        let mut colors = vec![[0.0f32; 3]; stack.pixel_count()];

        colors
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, color) in row.iter_mut().enumerate() {
                    for (c, channel) in color.iter_mut().enumerate() {
                        *channel = midpoint_color(
                            stack
                                .frames()
                                .iter()
                                .map(|frame| frame.pixel(x as u32, y as u32)[c] as f32 / 255.0),
                        );
                    }
                }
            });

        Self {
            width,
            height: stack.height(),
            colors,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> [f32; 3] {
        self.colors[y as usize * self.width as usize + x as usize]
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }
}
