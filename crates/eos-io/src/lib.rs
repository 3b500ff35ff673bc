//! eos-io: HDF5 persistence for stellar-collapse EOS tables.
//!
//! Provides:
//! - [`read_table`] / [`write_table`] against the fixed dataset layout
//!   (`pointsrho`, `pointstemp`, `pointsye`, `energy_shift`, the three
//!   axes, and one 3-D dataset per quantity)
//! - [`ensure_tables_equal`], the bitwise round-trip self-check

pub mod compare;
pub mod hdf5_table;

pub use compare::{EqualityReport, compare_tables, ensure_tables_equal};
pub use hdf5_table::{read_table, write_table};

use std::path::PathBuf;

pub type IoResult<T> = Result<T, TableIoError>;

#[derive(thiserror::Error, Debug)]
pub enum TableIoError {
    #[error("Could not open table file: {path}")]
    Open {
        path: PathBuf,
        source: hdf5::Error,
    },

    #[error("Could not create table file: {path}")]
    Create {
        path: PathBuf,
        source: hdf5::Error,
    },

    #[error("Dataset '{name}' not found")]
    MissingDataset { name: String, source: hdf5::Error },

    #[error("Error reading dataset '{name}'")]
    Read { name: String, source: hdf5::Error },

    #[error("Error writing dataset '{name}'")]
    Write { name: String, source: hdf5::Error },

    #[error("Dataset '{name}' is not a scalar (length {len})")]
    BadScalar { name: String, len: usize },

    #[error(transparent)]
    Core(#[from] eos_core::CoreError),
}
