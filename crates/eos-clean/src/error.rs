use eos_core::CoreError;
use thiserror::Error;

pub type CleanResult<T> = Result<T, CleanError>;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error(
        "Grid too small for median filter: {axis} has {len} points, need more than {min_required}"
    )]
    GridTooSmall {
        axis: &'static str,
        len: usize,
        min_required: usize,
    },

    #[error("Unsupported feature: {feature}")]
    Unsupported { feature: &'static str },

    #[error(transparent)]
    Core(#[from] CoreError),
}
