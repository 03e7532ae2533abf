//! Decode-and-triangulate pipeline over a captured stack.

use super::cloud::{Point, PointCloud, VolumeFilter};
use crate::capture::ImageStack;
use crate::color::ColorMap;
use crate::config::ScanConfig;
use crate::decode::{is_valid_column, BitPlanes, ColumnEstimator, ColumnMap, LuminanceGrid};
use crate::error::{Result, ScanError};
use crate::geometry::{pixel_to_ndc, Intersection, RigGeometry};
use glam::DVec3;
use rayon::prelude::*;
use serde::Serialize;

/// What became of one camera pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelOutcome {
    /// No valid projector code.
    NoCode,
    /// Camera and projector rays are parallel.
    Parallel,
    /// Triangulated outside the plausibility volume.
    OutsideVolume,
    Point(DVec3),
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconstructionStats {
    pub pixels: usize,
    pub invalid_codes: usize,
    pub parallel_rays: usize,
    pub outside_volume: usize,
    pub points: usize,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub bits: BitPlanes,
    pub columns: ColumnMap,
    /// Projector-space z of each pixel's point, NaN where none was kept.
    pub depth: Vec<f32>,
    pub colors: ColorMap,
    pub cloud: PointCloud,
    pub stats: ReconstructionStats,
}

impl Reconstruction {
    /// Depth visualization: `-z / scale` clamped to [0, 1], 0 where no point.
    pub fn depth_image(&self, scale: f32) -> Vec<u8> {
        self.depth
            .iter()
            .map(|&z| {
                if z.is_nan() {
                    0
                } else {
                    ((-z / scale).clamp(0.0, 1.0) * 255.0) as u8
                }
            })
            .collect()
    }
}

/// Runs the full reconstruction with a fixed configuration.
pub struct Reconstructor {
    config: ScanConfig,
    rig: RigGeometry,
    estimator: ColumnEstimator,
    volume: VolumeFilter,
}

impl Reconstructor {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let rig = RigGeometry::from_config(&config.geometry)?;
        let estimator = ColumnEstimator::new(config.decode.bit_count, config.decode.encoding);
        let volume = VolumeFilter::new(config.volume_bound);

        Ok(Self {
            config,
            rig,
            estimator,
            volume,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn rig(&self) -> &RigGeometry {
        &self.rig
    }

    /// Triangulate one camera pixel against its decoded projector column.
    pub fn triangulate_pixel(&self, x: u32, y: u32, width: u32, height: u32, column: f32) -> PixelOutcome {
        if !is_valid_column(column) {
            return PixelOutcome::NoCode;
        }

        let ndc = pixel_to_ndc(x as f64, y as f64, width, height);
        match self.rig.triangulate(ndc, column as f64) {
            Intersection::Parallel => PixelOutcome::Parallel,
            Intersection::Point(p) if self.volume.contains(p) => PixelOutcome::Point(p),
            Intersection::Point(_) => PixelOutcome::OutsideVolume,
        }
    }

    pub fn run(&self, stack: &ImageStack) -> Result<Reconstruction> {
        let bit_count = self.config.decode.bit_count as usize;
        if stack.frame_count() != bit_count {
            return Err(ScanError::config(format!(
                "expected {} frames (one per bit-plane), got {}",
                bit_count,
                stack.frame_count()
            )));
        }

        let (width, height) = (stack.width(), stack.height());
        log::info!(
            "Reconstructing {}x{} pixels from {} frames",
            width,
            height,
            stack.frame_count()
        );

        let luminance = LuminanceGrid::from_stack(stack, self.config.decode.luminance_weights);
        let bits = BitPlanes::decode(&luminance, self.config.decode.tie_break);
        let columns = self.estimator.estimate(&bits);

        let mut outcomes = vec![PixelOutcome::NoCode; stack.pixel_count()];
        outcomes
            .par_chunks_mut(width as usize)
            .zip(columns.values().par_chunks(width as usize))
            .enumerate()
            .for_each(|(y, (row, column_row))| {
                for (x, (outcome, &column)) in row.iter_mut().zip(column_row).enumerate() {
                    *outcome = self.triangulate_pixel(x as u32, y as u32, width, height, column);
                }
            });

        let colors = ColorMap::from_stack(stack);

        let mut stats = ReconstructionStats {
            pixels: outcomes.len(),
            ..Default::default()
        };
        let mut depth = vec![f32::NAN; outcomes.len()];
        let mut cloud = PointCloud::new();
        for (index, outcome) in outcomes.iter().enumerate() {
            match outcome {
                PixelOutcome::NoCode => stats.invalid_codes += 1,
                PixelOutcome::Parallel => stats.parallel_rays += 1,
                PixelOutcome::OutsideVolume => stats.outside_volume += 1,
                PixelOutcome::Point(p) => {
                    let position = p.as_vec3();
                    depth[index] = position.z;
                    cloud.push(Point {
                        position: position.to_array(),
                        color: colors.colors()[index],
                    });
                }
            }
        }
        stats.points = cloud.len();

        log::info!(
            "Reconstructed {} points ({} invalid codes, {} parallel rays, {} outside volume)",
            stats.points,
            stats.invalid_codes,
            stats.parallel_rays,
            stats.outside_volume
        );
        if cloud.is_empty() {
            log::warn!("No points survived reconstruction");
        }

        Ok(Reconstruction {
            bits,
            columns,
            depth,
            colors,
            cloud,
            stats,
        })
    }
}
