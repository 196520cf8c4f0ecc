//! Groups item units into shipping crates by footprint similarity.
//!
//! Thin units (shortest side within `maxDepthForNestingCm`) with faces inside
//! the similarity tolerance are stacked into one consolidated crate; anything
//! deeper always ships alone.

mod engine;
mod types;

pub use engine::{expand_units, is_compatible, nest};
pub use types::{BoxType, NestingBox, NestingUnit};
