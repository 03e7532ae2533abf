//! Decoding of captured stripe frames into projector columns.
//!
//! Stages, each a parallel pass over pixel rows:
//! luminance ([`LuminanceGrid`]) → thresholded bits ([`BitPlanes`]) →
//! normalized projector column ([`ColumnMap`]).

mod bits;
mod column;
mod grayscale;

pub use bits::{threshold_bit, BitPlanes};
pub use column::{code_to_column, is_valid_column, ColumnEstimator, ColumnMap, INVALID_COLUMN};
pub use grayscale::LuminanceGrid;
