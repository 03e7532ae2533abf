//! Rig geometry: unprojection of camera and projector image points and ray
//! triangulation.

mod intersect;
mod rig;

pub use intersect::{cross_xz, intersect_xz, Intersection, Ray, PARALLEL_TOLERANCE};
pub use rig::{pixel_to_ndc, RigGeometry};
