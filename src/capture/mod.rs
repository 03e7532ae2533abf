//! Captured frame stack.

use crate::error::{Result, ScanError};
use std::path::Path;

/// A single captured camera frame (interleaved, row-major, 8 bits per channel).
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self> {
        if channels < 3 {
            return Err(ScanError::config(format!(
                "frames need at least 3 channels, got {}",
                channels
            )));
        }
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(ScanError::config(format!(
                "frame buffer holds {} bytes, expected {} for {}x{}x{}",
                data.len(),
                expected,
                width,
                height,
                channels
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn from_rgb(image: image::RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            channels: 3,
            data: image.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Channel values of pixel (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.data[start..start + self.channels]
    }
}

/// Ordered, congruent sequence of captured frames.
#[derive(Debug, Clone)]
pub struct ImageStack {
    width: u32,
    height: u32,
    channels: usize,
    frames: Vec<Frame>,
}

impl ImageStack {
    pub fn new(frames: Vec<Frame>) -> Result<Self> {
        let first = frames
            .first()
            .ok_or_else(|| ScanError::config("List of frames cannot be empty"))?;
        let (width, height, channels) = (first.width, first.height, first.channels);
        if width == 0 || height == 0 {
            return Err(ScanError::config(format!("frames are empty ({}x{})", width, height)));
        }

        for (i, frame) in frames.iter().enumerate() {
            if frame.width != width || frame.height != height {
                return Err(ScanError::config(format!(
                    "frame {} is {}x{}, expected {}x{}",
                    i, frame.width, frame.height, width, height
                )));
            }
            if frame.channels != channels {
                return Err(ScanError::config(format!(
                    "frame {} has {} channels, expected {}",
                    i, frame.channels, channels
                )));
            }
        }

        Ok(Self {
            width,
            height,
            channels,
            frames,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Normalized intensity in [0, 1] of one channel of one pixel in one frame.
    pub fn sample(&self, frame: usize, x: u32, y: u32, channel: usize) -> f32 {
        self.frames[frame].pixel(x, y)[channel] as f32 / 255.0
    }
}

/// Load captured frames from disk, in order.
pub fn load_stack<P: AsRef<Path>>(paths: &[P]) -> Result<ImageStack> {
    if paths.is_empty() {
        return Err(ScanError::config("List of filenames cannot be empty"));
    }

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        log::info!("Loading {}", path.display());
        let image = image::open(path)?.to_rgb8();
        frames.push(Frame::from_rgb(image));
    }

    ImageStack::new(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> Frame {
        Frame::new(width, height, 3, vec![value; (width * height * 3) as usize]).unwrap()
    }

    #[test]
    fn test_empty_stack_is_configuration_error() {
        assert!(matches!(ImageStack::new(Vec::new()), Err(ScanError::Configuration(_))));
        let no_paths: [&str; 0] = [];
        assert!(matches!(load_stack(&no_paths), Err(ScanError::Configuration(_))));
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let frames = vec![solid(4, 4, 0), solid(4, 5, 0)];
        assert!(matches!(ImageStack::new(frames), Err(ScanError::Configuration(_))));
    }

    #[test]
    fn test_frame_validation() {
        assert!(Frame::new(2, 2, 1, vec![0; 4]).is_err());
        assert!(Frame::new(2, 2, 3, vec![0; 11]).is_err());
        assert!(Frame::new(2, 2, 4, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_sample_normalizes() {
        let mut data = vec![0u8; 2 * 1 * 3];
        data[3..6].copy_from_slice(&[255, 51, 0]);
        let stack = ImageStack::new(vec![Frame::new(2, 1, 3, data).unwrap()]).unwrap();

        assert_eq!(stack.frame_count(), 1);
        assert_eq!(stack.pixel_count(), 2);
        assert_eq!(stack.sample(0, 1, 0, 0), 1.0);
        assert!((stack.sample(0, 1, 0, 1) - 0.2).abs() < 1e-6);
        assert_eq!(stack.sample(0, 0, 0, 0), 0.0);
    }
}
