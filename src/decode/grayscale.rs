//! Luminance extraction from the captured stack.

use crate::capture::ImageStack;
use rayon::prelude::*;

/// Per-pixel, per-frame luminance in [0, 1].
///
/// Stored pixel-major: the `frames` samples of one pixel are contiguous.
#[derive(Debug, Clone)]
pub struct LuminanceGrid {
    width: u32,
    height: u32,
    frames: usize,
    data: Vec<f32>,
}

impl LuminanceGrid {
    pub fn from_stack(stack: &ImageStack, weights: [f32; 3]) -> Self {
        let width = stack.width();
        let frames = stack.frame_count();
        let mut data = vec![0.0f32; stack.pixel_count() * frames];

        data.par_chunks_mut(width as usize * frames)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, samples) in row.chunks_mut(frames).enumerate() {
                    for (i, frame) in stack.frames().iter().enumerate() {
                        let rgb = frame.pixel(x as u32, y as u32);
                        let value = weights[0] * rgb[0] as f32 / 255.0
                            + weights[1] * rgb[1] as f32 / 255.0
                            + weights[2] * rgb[2] as f32 / 255.0;
                        samples[i] = value.clamp(0.0, 1.0);
                    }
                }
            });

        Self {
            width,
            height: stack.height(),
            frames,
            data,
        }
    }

    /// Build a grid directly from pixel-major samples.
    pub fn from_samples(width: u32, height: u32, frames: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), width as usize * height as usize * frames);
        Self {
            width,
            height,
            frames,
            data,
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

    /// All frame samples of pixel `index` (row-major pixel index).
    pub fn pixel(&self, index: usize) -> &[f32] {
        &self.data[index * self.frames..(index + 1) * self.frames]
    }

    pub(crate) fn data(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Frame;

    #[test]
    fn test_equal_weights_average_channels() {
        let a = Frame::new(1, 1, 3, vec![255, 0, 0]).unwrap();
        let b = Frame::new(1, 1, 3, vec![255, 255, 255]).unwrap();
        let stack = ImageStack::new(vec![a, b]).unwrap();

        let grid = LuminanceGrid::from_stack(&stack, [1.0 / 3.0; 3]);
        assert_eq!(grid.frame_count(), 2);
        let pixel = grid.pixel(0);
        assert!((pixel[0] - 1.0 / 3.0).abs() < 1e-6);
        assert!((pixel[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_major_layout() {
        // 2x1 image, two frames; pixel 1 brightens in frame 1.
        let f0 = Frame::new(2, 1, 3, vec![0, 0, 0, 30, 30, 30]).unwrap();
        let f1 = Frame::new(2, 1, 3, vec![0, 0, 0, 90, 90, 90]).unwrap();
        let stack = ImageStack::new(vec![f0, f1]).unwrap();

        let grid = LuminanceGrid::from_stack(&stack, [1.0 / 3.0; 3]);
        assert_eq!(grid.pixel(0), &[0.0, 0.0]);
        assert!((grid.pixel(1)[0] - 30.0 / 255.0).abs() < 1e-6);
        assert!((grid.pixel(1)[1] - 90.0 / 255.0).abs() < 1e-6);
    }
}
