//! Read-only physical-admissibility checks.
//!
//! The validator reports defects; it never repairs them and never aborts
//! the pipeline. The caller decides what to do with a dirty table.

use eos_core::{Quantity, Table};
use rayon::prelude::*;
use tracing::{info, warn};

/// Monotonicity defects along one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AxisReport {
    pub axis: &'static str,
    /// Adjacent pairs where the later value is smaller than the earlier one.
    pub defects: u64,
    pub points: usize,
}

/// Non-finite values found in one quantity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldReport {
    pub quantity: Quantity,
    pub non_finite: u64,
    pub points: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationReport {
    pub axes: Vec<AxisReport>,
    pub fields: Vec<FieldReport>,
}

impl ValidationReport {
    pub fn monotonicity_defects(&self) -> u64 {
        self.axes.iter().map(|a| a.defects).sum()
    }

    pub fn finiteness_defects(&self) -> u64 {
        self.fields.iter().map(|f| f.non_finite).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.monotonicity_defects() == 0 && self.finiteness_defects() == 0
    }
}

/// Scan the whole table: axis monotonicity plus per-field finiteness.
pub fn validate_table(table: &Table) -> ValidationReport {
    let axes = vec![
        check_monotonic("logrho", &table.log10_rho),
        check_monotonic("logtemp", &table.log10_temperature),
        check_monotonic("ye", &table.ye),
    ];

    let fields: Vec<FieldReport> = Quantity::ALL
        .par_iter()
        .map(|&quantity| check_finite(quantity, table.field(quantity)))
        .collect();

    ValidationReport { axes, fields }
}

fn check_monotonic(axis: &'static str, values: &[f64]) -> AxisReport {
    let mut defects = 0;
    for i in 1..values.len() {
        let (left, right) = (values[i - 1], values[i]);
        if left > right {
            warn!(
                axis,
                left_index = i - 1,
                right_index = i,
                left,
                right,
                "axis not increasing monotonically"
            );
            defects += 1;
        }
    }
    if defects > 0 {
        warn!(axis, defects, points = values.len(), "axis has non-monotonic pairs");
    } else {
        info!(axis, "axis is increasing monotonically");
    }
    AxisReport {
        axis,
        defects,
        points: values.len(),
    }
}

fn check_finite(quantity: Quantity, values: &[f64]) -> FieldReport {
    let mut non_finite = 0;
    for (index, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            warn!(quantity = %quantity, index, value = v, "non-finite value in dataset");
            non_finite += 1;
        }
    }
    if non_finite > 0 {
        warn!(
            quantity = %quantity,
            non_finite,
            points = values.len(),
            "dataset contains non-finite values"
        );
    } else {
        info!(quantity = %quantity, "dataset is finite everywhere");
    }
    FieldReport {
        quantity,
        non_finite,
        points: values.len(),
    }
}
