//! Bitwise table comparison, backing the write-then-reread self-check.

use crate::IoResult;
use crate::hdf5_table::read_table;
use eos_core::{Quantity, Table};
use std::path::Path;
use tracing::{info, warn};

/// Mismatch counts from comparing two tables on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EqualityReport {
    pub scalar_mismatches: u64,
    pub field_mismatches: u64,
}

impl EqualityReport {
    pub fn is_equal(&self) -> bool {
        self.scalar_mismatches == 0 && self.field_mismatches == 0
    }
}

/// Re-read both files and compare every scalar, axis and field bitwise.
/// NaNs with identical bit patterns compare equal, so a round-tripped
/// table always matches itself.
pub fn ensure_tables_equal(path1: &Path, path2: &Path) -> IoResult<EqualityReport> {
    let table1 = read_table(path1)?;
    let table2 = read_table(path2)?;
    Ok(compare_tables(&table1, &table2))
}

/// Bitwise comparison of two in-memory tables.
pub fn compare_tables(table1: &Table, table2: &Table) -> EqualityReport {
    let mut report = EqualityReport::default();

    let grid1 = table1.grid();
    let grid2 = table2.grid();
    if grid1 != grid2 {
        warn!(?grid1, ?grid2, "grid dimensions differ");
        report.scalar_mismatches += 1;
        return report;
    }
    if table1.energy_shift.to_bits() != table2.energy_shift.to_bits() {
        warn!(
            left = table1.energy_shift,
            right = table2.energy_shift,
            "energy_shift differs"
        );
        report.scalar_mismatches += 1;
    }

    report.field_mismatches += compare_values("logrho", &table1.log10_rho, &table2.log10_rho);
    report.field_mismatches += compare_values(
        "logtemp",
        &table1.log10_temperature,
        &table2.log10_temperature,
    );
    report.field_mismatches += compare_values("ye", &table1.ye, &table2.ye);

    for quantity in Quantity::ALL {
        report.field_mismatches +=
            compare_values(quantity.name(), table1.field(quantity), table2.field(quantity));
    }

    if report.is_equal() {
        info!("tables are bitwise identical");
    } else {
        warn!(
            scalar_mismatches = report.scalar_mismatches,
            field_mismatches = report.field_mismatches,
            "tables differ"
        );
    }
    report
}

fn compare_values(name: &str, left: &[f64], right: &[f64]) -> u64 {
    let mut mismatches = 0;
    for (index, (a, b)) in left.iter().zip(right).enumerate() {
        if a.to_bits() != b.to_bits() {
            warn!(name, index, left = a, right = b, "value mismatch");
            mismatches += 1;
        }
    }
    mismatches
}
