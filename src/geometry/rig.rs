//! Camera/projector rig: fixed transforms and unprojection.
//!
//! Projector space is the shared reference frame. The projector sits at the
//! origin looking down -z; camera-space points reach projector space through
//! the inverse rotation followed by the inverse translation.

use super::intersect::{intersect_xz, Intersection, Ray};
use crate::config::GeometryConfig;
use crate::error::Result;
use glam::{DMat4, DVec2, DVec3, DVec4};

/// Normalized device coordinates of camera pixel (x, y), y pointing up.
pub fn pixel_to_ndc(x: f64, y: f64, width: u32, height: u32) -> DVec2 {
    DVec2::new(
        2.0 * x / width as f64 - 1.0,
        2.0 * (1.0 - y / height as f64) - 1.0,
    )
}

/// Immutable rig transforms, shared read-only by all pixel workers.
#[derive(Debug, Clone)]
pub struct RigGeometry {
    projection: DMat4,
    inverse_projection: DMat4,
    inverse_rotation: DMat4,
    inverse_translation: DMat4,
    camera_near_depth: f64,
    camera_far_depth: f64,
    projector_depth: f64,
}

impl RigGeometry {
    pub fn from_config(config: &GeometryConfig) -> Result<Self> {
        config.validate()?;

        let projection = DMat4::perspective_rh_gl(
            config.fov_y_degrees.to_radians(),
            config.aspect,
            config.near,
            config.far,
        );
        let rotation = DMat4::from_rotation_y(config.rotation_degrees.to_radians());
        let translation = DMat4::from_translation(DVec3::new(config.translation_offset, 0.0, 0.0));

        Ok(Self {
            projection,
            inverse_projection: projection.inverse(),
            inverse_rotation: rotation.inverse(),
            inverse_translation: translation.inverse(),
            camera_near_depth: config.camera_near_depth,
            camera_far_depth: config.camera_far_depth,
            projector_depth: config.projector_depth,
        })
    }

    /// Camera image point at normalized `depth`, expressed in projector space.
    pub fn unproject_camera(&self, ndc: DVec2, depth: f64) -> DVec4 {
        let p_cam = self.inverse_projection * DVec4::new(ndc.x, ndc.y, depth, 1.0);
        let p_cam = p_cam / p_cam.w;
        self.inverse_translation * (self.inverse_rotation * p_cam)
    }

    /// Projector image point at normalized `depth`; projector space needs no
    /// further transform.
    pub fn unproject_projector(&self, column: f64, depth: f64) -> DVec4 {
        let p_pro = self.inverse_projection * DVec4::new(column, 0.0, depth, 1.0);
        p_pro / p_pro.w
    }

    /// Ray through camera pixel `ndc`, from its two unprojected depth samples.
    pub fn camera_ray(&self, ndc: DVec2) -> Ray {
        let near = self.unproject_camera(ndc, self.camera_near_depth).truncate();
        let far = self.unproject_camera(ndc, self.camera_far_depth).truncate();
        Ray::through(near, far)
    }

    /// Ray from the projector centre through normalized projector column
    /// `column`. The vertical coordinate is fixed to 0.
    pub fn projector_ray(&self, column: f64) -> Ray {
        let target = self.unproject_projector(column, self.projector_depth).truncate();
        Ray::new(DVec3::ZERO, target)
    }

    /// Triangulate camera pixel `ndc` against projector column `column`.
    pub fn triangulate(&self, ndc: DVec2, column: f64) -> Intersection {
        intersect_xz(&self.projector_ray(column), &self.camera_ray(ndc))
    }

    /// Project a projector-space point to projector normalized device
    /// coordinates. `None` behind the projector.
    pub fn project_to_projector(&self, point: DVec3) -> Option<DVec3> {
        let clip = self.projection * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }
}
