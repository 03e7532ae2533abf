//! Top-level scanner workflows driven by the binary.

use crate::capture::load_stack;
use crate::config::{DecodeConfig, ScanConfig, ScanJob};
use crate::error::Result;
use crate::export;
use crate::pattern::PatternGenerator;
use crate::reconstruct::{ReconstructionStats, Reconstructor};
use crate::simulate::{render_plane, PlaneScene};
use std::path::Path;

/// Load the job's captures, reconstruct, and export every result.
pub fn run_scan(job: &ScanJob) -> Result<ReconstructionStats> {
    // Configuration problems surface before any file is read.
    let reconstructor = Reconstructor::new(job.config.clone())?;
    let stack = load_stack(&job.frames)?;

    let result = reconstructor.run(&stack)?;
    export::export_all(&result, job.config.depth_scale, &job.comment, &job.output_dir)?;
    Ok(result.stats)
}

/// Write the projector patterns as `pattern_{n}.png`, n starting at 1.
pub fn write_patterns(output_dir: &Path, width: u32, height: u32, decode: &DecodeConfig) -> Result<usize> {
    decode.validate()?;
    std::fs::create_dir_all(output_dir)?;

    let generator = PatternGenerator::new(width, height, decode.bit_count, decode.encoding);
    for (i, pattern) in generator.generate_all().iter().enumerate() {
        let path = output_dir.join(format!("pattern_{}.png", i + 1));
        export::save_gray(pattern, width, height, &path)?;
        log::info!("Wrote {}", path.display());
    }
    Ok(generator.pattern_count())
}

/// Render a synthetic capture of `scene` into `output_dir` as
/// `scene_{n}.png` plus a ready-to-run `job.json`.
pub fn write_synthetic_scan(
    output_dir: &Path,
    scene: &PlaneScene,
    config: &ScanConfig,
    width: u32,
    height: u32,
) -> Result<ScanJob> {
    let reconstructor = Reconstructor::new(config.clone())?;
    std::fs::create_dir_all(output_dir)?;

    let patterns = PatternGenerator::new(1024, 1, config.decode.bit_count, config.decode.encoding);
    let stack = render_plane(reconstructor.rig(), scene, &patterns, width, height)?;

    let mut frames = Vec::with_capacity(stack.frame_count());
    for (i, frame) in stack.frames().iter().enumerate() {
        let path = output_dir.join(format!("scene_{}.png", i + 1));
        export::save_frame(frame, &path)?;
        frames.push(path);
    }

    let job = ScanJob {
        frames,
        output_dir: output_dir.join("result"),
        comment: format!("synthetic plane at depth {}", scene.depth),
        config: config.clone(),
    };
    std::fs::write(output_dir.join("job.json"), serde_json::to_string_pretty(&job)?)?;
    log::info!("Wrote synthetic scan to {}", output_dir.display());
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sl-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_synthetic_scan_end_to_end() {
        let dir = temp_dir("scan");
        let scene = PlaneScene {
            depth: 1.1,
            albedo: [180, 180, 180],
            ambient: 0.1,
        };
        write_synthetic_scan(&dir, &scene, &ScanConfig::default(), 48, 48).unwrap();

        let job = ScanJob::load(&dir.join("job.json")).unwrap();
        assert_eq!(job.frames.len(), 7);

        let stats = run_scan(&job).unwrap();
        assert!(stats.points > 0);

        let xyz = std::fs::read_to_string(job.output_dir.join("out.xyz")).unwrap();
        let mut lines = xyz.lines();
        assert_eq!(lines.next().unwrap(), stats.points.to_string());
        assert_eq!(lines.next().unwrap(), "synthetic plane at depth 1.1");
        assert_eq!(lines.count(), stats.points);

        for name in ["pixel-value0.png", "pixel-value6.png", "projector-x.png", "intersection.png", "report.json"] {
            assert!(job.output_dir.join(name).exists(), "missing {}", name);
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_frame_is_image_error() {
        let job = ScanJob {
            frames: vec![temp_dir("missing").join("nope.png"); 7],
            ..Default::default()
        };
        assert!(run_scan(&job).is_err());
    }

    #[test]
    fn test_write_patterns() {
        let dir = temp_dir("patterns");
        let count = write_patterns(&dir, 128, 8, &DecodeConfig::default()).unwrap();
        assert_eq!(count, 7);

        let first = image::open(dir.join("pattern_1.png")).unwrap().to_luma8();
        assert_eq!(first.dimensions(), (128, 8));
        assert_eq!(first.get_pixel(0, 0)[0], 0);
        assert_eq!(first.get_pixel(127, 7)[0], 255);
        assert!(dir.join("pattern_7.png").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
