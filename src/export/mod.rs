//! Export module for scan results.

use crate::capture::Frame;
use crate::decode::{BitPlanes, ColumnMap};
use crate::error::Result;
use crate::reconstruct::{PointCloud, Reconstruction, ReconstructionStats};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a point cloud as plain text: point count, comment, then one
/// `x y z r g b` line per point.
pub fn write_xyz<W: Write>(cloud: &PointCloud, mut writer: W, comment: &str) -> Result<()> {
    writeln!(writer, "{}", cloud.len())?;
    // The comment must stay on its own line.
    writeln!(writer, "{}", comment.replace(['\n', '\r'], " "))?;
    for point in cloud.iter() {
        let [x, y, z] = point.position;
        let [r, g, b] = point.color;
        writeln!(writer, "{} {} {} {} {} {}", x, y, z, r, g, b)?;
    }
    writer.flush()?;
    Ok(())
}

/// Save a point cloud to an `.xyz` file.
pub fn save_xyz(cloud: &PointCloud, path: &Path, comment: &str) -> Result<()> {
    let file = File::create(path)?;
    write_xyz(cloud, BufWriter::new(file), comment)
}

/// Save a single-channel 8-bit image.
pub fn save_gray(data: &[u8], width: u32, height: u32, path: &Path) -> Result<()> {
    let img = image::GrayImage::from_fn(width, height, |x, y| {
        image::Luma([data[(y * width + x) as usize]])
    });
    img.save(path)?;
    Ok(())
}

/// Save a captured frame as an RGB image (extra channels are dropped).
pub fn save_frame(frame: &Frame, path: &Path) -> Result<()> {
    let img = image::RgbImage::from_fn(frame.width(), frame.height(), |x, y| {
        let px = frame.pixel(x, y);
        image::Rgb([px[0], px[1], px[2]])
    });
    img.save(path)?;
    Ok(())
}

/// Export one 0/255 image per decoded bit-plane as `pixel-value{i}.png`.
pub fn export_bit_planes(bits: &BitPlanes, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;
    for frame in 0..bits.frame_count() {
        let filename = format!("pixel-value{}.png", frame);
        save_gray(&bits.plane_image(frame), bits.width(), bits.height(), &output_dir.join(&filename))?;
        log::debug!("Exported bit-plane: {}", filename);
    }
    Ok(())
}

/// Export the projector column map as `projector-x.png`.
pub fn export_columns(columns: &ColumnMap, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;
    save_gray(
        &columns.to_image(),
        columns.width(),
        columns.height(),
        &output_dir.join("projector-x.png"),
    )
}

/// Export the depth visualization as `intersection.png`.
pub fn export_depth(result: &Reconstruction, depth_scale: f32, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;
    save_gray(
        &result.depth_image(depth_scale),
        result.columns.width(),
        result.columns.height(),
        &output_dir.join("intersection.png"),
    )
}

/// Save the run counters as JSON.
pub fn save_report(stats: &ReconstructionStats, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export every output of a run into `output_dir`.
pub fn export_all(
    result: &Reconstruction,
    depth_scale: f32,
    comment: &str,
    output_dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    export_bit_planes(&result.bits, output_dir)?;
    export_columns(&result.columns, output_dir)?;
    export_depth(result, depth_scale, output_dir)?;
    save_xyz(&result.cloud, &output_dir.join("out.xyz"), comment)?;
    save_report(&result.stats, &output_dir.join("report.json"))?;

    log::info!(
        "Exported {} points and visualizations to {}",
        result.cloud.len(),
        output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruct::Point;

    #[test]
    fn test_xyz_layout() {
        let mut cloud = PointCloud::new();
        cloud.push(Point {
            position: [0.5, -1.0, -2.25],
            color: [1.0, 0.5, 0.0],
        });
        cloud.push(Point {
            position: [0.0, 0.0, -1.0],
            color: [0.25, 0.25, 0.25],
        });

        let mut out = Vec::new();
        write_xyz(&cloud, &mut out, "scan\nof a plane").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "scan of a plane");
        assert_eq!(lines[2], "0.5 -1 -2.25 1 0.5 0");
        let fields: Vec<f32> = lines[3].split(' ').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields, vec![0.0, 0.0, -1.0, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn test_empty_cloud() {
        let mut out = Vec::new();
        write_xyz(&PointCloud::new(), &mut out, "comment").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0\ncomment\n");
    }

    #[test]
    fn test_save_gray_round_trip() {
        let dir = std::env::temp_dir().join(format!("sl-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("gray.png");

        save_gray(&[0, 64, 128, 255], 2, 2, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(loaded.into_raw(), vec![0, 64, 128, 255]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_report_json() {
        let dir = std::env::temp_dir().join(format!("sl-report-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.json");
        let stats = ReconstructionStats {
            pixels: 10,
            invalid_codes: 3,
            parallel_rays: 0,
            outside_volume: 1,
            points: 6,
        };

        save_report(&stats, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["points"], 6);
        assert_eq!(value["invalid_codes"], 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
