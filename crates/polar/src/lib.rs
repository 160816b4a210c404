//! Polar performance core.
//!
//! Turns an ORC allowance table into optimal sailing targets: best
//! upwind/downwind angle with VMG and target boat speed, plus target
//! speeds at the fixed reaching angles, for a given true wind speed.

pub mod cache;
pub mod interpolate;
pub mod model;
pub mod reaching;
pub mod service;
pub mod solver;
pub mod units;

pub use cache::{CacheEntry, CacheStats, PolarCache};
pub use model::{DirectSeries, PolarModel, DEFAULT_WIND_STEPS, REACHING_ANGLES};
pub use service::PolarService;
pub use solver::{compute_targets, Direction, DirectionSolution};
