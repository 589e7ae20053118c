//! Configuration: constants, thresholds, and the library `Config` struct.

pub mod constants;
mod types;

pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, ScoreThresholds};
