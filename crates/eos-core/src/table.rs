//! Owned storage for one stellar-collapse EOS table.

use crate::error::{CoreError, CoreResult};
use crate::grid::Grid;
use crate::quantity::Quantity;

/// One EOS table: grid axes, the energy shift, and a buffer per quantity.
///
/// The table exclusively owns its arrays. Construction goes through
/// [`Table::zeroed`] plus the mutable accessors, or a loader that fills
/// every field; the pipeline mutates fields in place and the validator
/// reads them back.
#[derive(Debug, Clone)]
pub struct Table {
    grid: Grid,
    pub log10_rho: Vec<f64>,
    pub log10_temperature: Vec<f64>,
    pub ye: Vec<f64>,
    pub energy_shift: f64,
    data: [Vec<f64>; Quantity::COUNT],
}

impl Table {
    /// A table with zero-filled axes and fields of the given dimensions.
    pub fn zeroed(grid: Grid) -> Self {
        let size = grid.len();
        Self {
            grid,
            log10_rho: vec![0.0; grid.n_rho],
            log10_temperature: vec![0.0; grid.n_temperature],
            ye: vec![0.0; grid.n_ye],
            energy_shift: 0.0,
            data: std::array::from_fn(|_| vec![0.0; size]),
        }
    }

    pub const fn grid(&self) -> Grid {
        self.grid
    }

    /// Read-only view of one quantity field.
    pub fn field(&self, q: Quantity) -> &[f64] {
        &self.data[q as usize]
    }

    /// Mutable view of one quantity field.
    pub fn field_mut(&mut self, q: Quantity) -> &mut [f64] {
        &mut self.data[q as usize]
    }

    /// Replace one quantity field wholesale, checking its length.
    pub fn set_field(&mut self, q: Quantity, values: Vec<f64>) -> CoreResult<()> {
        if values.len() != self.grid.len() {
            return Err(CoreError::DimensionMismatch {
                what: q.name(),
                expected: self.grid.len(),
                found: values.len(),
            });
        }
        self.data[q as usize] = values;
        Ok(())
    }

    /// Check that every axis and field matches the declared grid.
    pub fn check_dimensions(&self) -> CoreResult<()> {
        if self.log10_rho.len() != self.grid.n_rho {
            return Err(CoreError::DimensionMismatch {
                what: "logrho",
                expected: self.grid.n_rho,
                found: self.log10_rho.len(),
            });
        }
        if self.log10_temperature.len() != self.grid.n_temperature {
            return Err(CoreError::DimensionMismatch {
                what: "logtemp",
                expected: self.grid.n_temperature,
                found: self.log10_temperature.len(),
            });
        }
        if self.ye.len() != self.grid.n_ye {
            return Err(CoreError::DimensionMismatch {
                what: "ye",
                expected: self.grid.n_ye,
                found: self.ye.len(),
            });
        }
        for q in Quantity::ALL {
            if self.field(q).len() != self.grid.len() {
                return Err(CoreError::DimensionMismatch {
                    what: q.name(),
                    expected: self.grid.len(),
                    found: self.field(q).len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_table_has_consistent_dimensions() {
        let table = Table::zeroed(Grid::new(4, 3, 2));
        table.check_dimensions().unwrap();
        assert_eq!(table.field(Quantity::LogPress).len(), 24);
    }

    #[test]
    fn field_mut_writes_are_visible() {
        let mut table = Table::zeroed(Grid::new(2, 2, 2));
        let idx = table.grid().index(1, 0, 1);
        table.field_mut(Quantity::Dpdrhoe)[idx] = 42.0;
        assert_eq!(table.field(Quantity::Dpdrhoe)[idx], 42.0);
        assert_eq!(table.field(Quantity::Dpderho)[idx], 0.0);
    }

    #[test]
    fn set_field_rejects_wrong_length() {
        let mut table = Table::zeroed(Grid::new(2, 2, 2));
        let err = table.set_field(Quantity::Entropy, vec![0.0; 7]).unwrap_err();
        assert!(matches!(err, CoreError::DimensionMismatch { .. }));
    }
}
