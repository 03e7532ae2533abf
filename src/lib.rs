//! Structured Light Scanner
//!
//! Recovers a colored point cloud of a static scene from camera captures of
//! binary stripe patterns:
//! - Adaptive per-pixel decoding of the bit-plane stack
//! - Projector column estimation with an explicit invalid-code marker
//! - Camera/projector ray triangulation in projector space
//! - Per-pixel albedo from the observed intensity range

pub mod app;
pub mod capture;
pub mod color;
pub mod config;
pub mod decode;
pub mod error;
pub mod export;
pub mod geometry;
pub mod pattern;
pub mod reconstruct;
pub mod simulate;

pub use error::{Result, ScanError};
