//! Camera/projector ray intersection in the horizontal (x–z) plane.

use glam::DVec3;

/// Relative threshold on the x–z cross product below which two rays are
/// treated as parallel.
pub const PARALLEL_TOLERANCE: f64 = 1e-12;

/// A ray `origin + t * direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Ray starting at `a` and passing through `b`.
    pub fn through(a: DVec3, b: DVec3) -> Self {
        Self::new(a, b - a)
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Outcome of intersecting two rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    Point(DVec3),
    /// The rays are parallel in the x–z plane; no unique intersection.
    Parallel,
}

impl Intersection {
    pub fn point(self) -> Option<DVec3> {
        match self {
            Intersection::Point(p) => Some(p),
            Intersection::Parallel => None,
        }
    }
}

/// 2D cross product of the x–z components.
pub fn cross_xz(a: DVec3, b: DVec3) -> f64 {
    a.x * b.z - b.x * a.z
}

/// Intersect the projector ray `P + t·R` with the camera ray `Q + u·S`.
///
/// Only x and z take part: both rays lie in a plane containing the baseline,
/// so the horizontal disparity fixes the depth. The returned point is taken on
/// the camera ray, `Q + u·S` with `u = (Q − P) × R / (R × S)`, so its y comes
/// from the camera.
pub fn intersect_xz(projector: &Ray, camera: &Ray) -> Intersection {
    let r = projector.direction;
    let s = camera.direction;

    let r_cross_s = cross_xz(r, s);
    let scale = r.x.hypot(r.z) * s.x.hypot(s.z);
    if !r_cross_s.is_finite() || r_cross_s.abs() <= PARALLEL_TOLERANCE * scale {
        return Intersection::Parallel;
    }

    let u = cross_xz(camera.origin - projector.origin, r) / r_cross_s;
    Intersection::Point(camera.at(u))
}
