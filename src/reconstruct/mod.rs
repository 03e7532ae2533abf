//! Triangulation of decoded pixels into a filtered, colored point cloud.

mod cloud;
mod pipeline;

pub use cloud::{Point, PointCloud, VolumeFilter};
pub use pipeline::{PixelOutcome, Reconstruction, ReconstructionStats, Reconstructor};
