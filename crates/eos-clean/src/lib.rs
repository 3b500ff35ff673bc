//! eos-clean: the cleaning pipeline for stellar-collapse EOS tables.
//!
//! Provides:
//! - a windowed 3-D median filter for denoising derivative quantities
//! - sound-speed-squared recomputation with causality checks
//! - a read-only physical-admissibility validator
//! - the pipeline driver sequencing filter, recompute and validate

pub mod error;
pub mod median_filter;
pub mod pipeline;
pub mod sound_speed;
pub mod validate;

pub use error::{CleanError, CleanResult};
pub use median_filter::{
    FILTER_HALF_WIDTH, FilterReport, SMOOTHING_THRESHOLD, WINDOW_SIZE, apply_median_filter,
};
pub use pipeline::{CleanConfig, CleanSummary, DerivsMode, Smoothing, clean_table};
pub use sound_speed::{
    SPEED_OF_LIGHT_SQUARED_CGS, SoundSpeedMode, SoundSpeedReport, recompute_sound_speed,
};
pub use validate::{AxisReport, FieldReport, ValidationReport, validate_table};
