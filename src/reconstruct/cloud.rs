//! Output points and the plausibility volume.

use glam::DVec3;
use serde::Serialize;

/// Symmetric axis-aligned bound on plausible scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeFilter {
    bound: f64,
}

impl VolumeFilter {
    pub fn new(bound: f64) -> Self {
        Self { bound }
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// Whether every coordinate is finite and within `[-bound, bound]`.
    /// Points exactly on the bound are kept.
    pub fn contains(&self, point: DVec3) -> bool {
        point.is_finite() && point.abs().max_element() <= self.bound
    }
}

/// A reconstructed surface point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub position: [f32; 3],
    /// Normalized RGB.
    pub color: [f32; 3],
}

/// Points of one run, in camera row-major scan order.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    pub points: Vec<Point>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }
}
