//! Structured Light Scanner
//!
//! Entry point for the structured-light-scanner command.

use anyhow::{bail, Context};
use std::path::PathBuf;
use structured_light_scanner::app;
use structured_light_scanner::config::{DecodeConfig, ScanConfig, ScanJob};
use structured_light_scanner::simulate::PlaneScene;

const USAGE: &str = "usage:
  structured-light-scanner scan <job.json>
  structured-light-scanner patterns <out_dir> [width height]
  structured-light-scanner simulate <out_dir> [depth]";

fn parse_arg<T: std::str::FromStr>(value: Option<&String>, default: T, name: &str) -> anyhow::Result<T> {
    match value {
        Some(v) => v.parse().map_err(|_| anyhow::anyhow!("invalid {}: {}", name, v)),
        None => Ok(default),
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    match args.first().map(String::as_str) {
        Some("scan") => {
            let path = PathBuf::from(args.get(1).context(USAGE)?);
            let job = ScanJob::load(&path)
                .with_context(|| format!("Failed to load job {}", path.display()))?;
            let stats = app::run_scan(&job).context("Scan failed")?;
            log::info!(
                "Done: {} points from {} pixels ({} without a code)",
                stats.points,
                stats.pixels,
                stats.invalid_codes
            );
        }
        Some("patterns") => {
            let dir = PathBuf::from(args.get(1).context(USAGE)?);
            let width = parse_arg(args.get(2), 1024u32, "width")?;
            let height = parse_arg(args.get(3), 1024u32, "height")?;
            let count = app::write_patterns(&dir, width, height, &DecodeConfig::default())?;
            log::info!("Wrote {} patterns to {}", count, dir.display());
        }
        Some("simulate") => {
            let dir = PathBuf::from(args.get(1).context(USAGE)?);
            let depth = parse_arg(args.get(2), 1.2f64, "depth")?;
            let scene = PlaneScene {
                depth,
                albedo: [200, 160, 120],
                ambient: 0.2,
            };
            app::write_synthetic_scan(&dir, &scene, &ScanConfig::default(), 600, 600)?;
        }
        _ => bail!(USAGE),
    }
    Ok(())
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
