//! eos-core: stable foundation for the EOS table cleaner.
//!
//! Contains:
//! - quantity (closed enumeration of tabulated fields)
//! - grid (3-D index space and flattening convention)
//! - table (owned storage for one stellar-collapse EOS table)
//! - numeric (median helper)
//! - error (shared error types)

pub mod error;
pub mod grid;
pub mod numeric;
pub mod quantity;
pub mod table;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use grid::Grid;
pub use numeric::*;
pub use quantity::Quantity;
pub use table::Table;
