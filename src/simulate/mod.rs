//! Synthetic captures of simple scenes under the projected patterns.
//!
//! Renders what the camera would record while the projector shows each
//! stripe pattern, with ideal optics and no noise. The reconstruction tests
//! run on these frames.

use crate::capture::{Frame, ImageStack};
use crate::error::Result;
use crate::geometry::{pixel_to_ndc, RigGeometry};
use crate::pattern::PatternGenerator;
use glam::DVec3;
use rayon::prelude::*;

/// A plane facing the projector at projector-space `z = -depth`, with
/// uniform albedo.
#[derive(Debug, Clone, Copy)]
pub struct PlaneScene {
    pub depth: f64,
    pub albedo: [u8; 3],
    /// Fraction of the albedo seen where the projector is dark.
    pub ambient: f32,
}

impl PlaneScene {
    /// Point where `ray` meets the plane, if in front of the ray origin.
    fn hit(&self, origin: DVec3, direction: DVec3) -> Option<DVec3> {
        if direction.z.abs() < f64::EPSILON {
            return None;
        }
        let t = (-self.depth - origin.z) / direction.z;
        (t > 0.0).then(|| origin + direction * t)
    }

    /// Channel values under ambient light only.
    pub fn unlit(&self) -> [u8; 3] {
        self.albedo.map(|c| (c as f32 * self.ambient).round().clamp(0.0, 255.0) as u8)
    }

    /// Expected color estimate of a pixel that saw both lit and unlit frames.
    pub fn expected_color(&self) -> [f32; 3] {
        let unlit = self.unlit();
        let mut color = [0.0f32; 3];
        for c in 0..3 {
            color[c] = 0.5 * (self.albedo[c] as f32 / 255.0 + unlit[c] as f32 / 255.0);
        }
        color
    }
}

/// Render one frame per pattern of `patterns` as seen by a `width`x`height`
/// camera looking at `scene`.
pub fn render_plane(
    rig: &RigGeometry,
    scene: &PlaneScene,
    patterns: &PatternGenerator,
    width: u32,
    height: u32,
) -> Result<ImageStack> {
    let projector_width = patterns.width();
    let pixel_count = width as usize * height as usize;

    // Projected code per camera pixel, None where the projector does not reach.
    let mut codes: Vec<Option<u32>> = vec![None; pixel_count];
    codes
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, code) in row.iter_mut().enumerate() {
                let ray = rig.camera_ray(pixel_to_ndc(x as f64, y as f64, width, height));
                *code = scene
                    .hit(ray.origin, ray.direction)
                    .and_then(|p| rig.project_to_projector(p))
                    .filter(|ndc| ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0)
                    .map(|ndc| {
                        let column = ((ndc.x + 1.0) / 2.0 * projector_width as f64).floor();
                        let column = (column.max(0.0) as u32).min(projector_width - 1);
                        patterns.column_code(column)
                    });
            }
        });

    let lit = scene.albedo;
    let unlit = scene.unlit();
    let frames = (0..patterns.pattern_count() as u32)
        .map(|bit| {
            let mut data = Vec::with_capacity(pixel_count * 3);
            for code in &codes {
                let on = code.map_or(false, |code| patterns.bit_lit(code, bit));
                data.extend_from_slice(if on { &lit } else { &unlit });
            }
            Frame::new(width, height, 3, data)
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Rendered {} synthetic frames, {} of {} pixels inside the projector frustum",
        frames.len(),
        codes.iter().filter(|c| c.is_some()).count(),
        pixel_count
    );
    ImageStack::new(frames)
}
