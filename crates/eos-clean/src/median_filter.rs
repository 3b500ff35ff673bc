//! Windowed 3-D median filter for denoising tabulated quantities.
//!
//! Finite-difference artifacts show up as isolated spikes in the derivative
//! fields. For every interior grid point we take the median of the cubic
//! neighborhood and replace the point only when it deviates from that median
//! by more than [`SMOOTHING_THRESHOLD`] in relative terms, so smooth regions
//! pass through untouched.

use crate::error::{CleanError, CleanResult};
use eos_core::{Quantity, Table, median_in_place};
use rayon::prelude::*;
use tracing::debug;

/// Half-width of the cubic filter window, in grid cells.
pub const FILTER_HALF_WIDTH: usize = 3;

/// Number of points in the filter window.
pub const WINDOW_SIZE: usize = {
    let side = 2 * FILTER_HALF_WIDTH + 1;
    side * side * side
};

/// Relative deviation from the local median above which a point is replaced.
pub const SMOOTHING_THRESHOLD: f64 = 10.0;

/// Outcome of one filter pass over one quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilterReport {
    pub quantity: Quantity,
    /// Points replaced by their local median.
    pub replaced: u64,
    /// Interior points examined (the margin is never touched).
    pub interior_points: u64,
}

/// Smooth one quantity field in place.
///
/// Every neighborhood is read from a snapshot taken before any replacement,
/// so the filter never sees its own output. The boundary layer of width
/// [`FILTER_HALF_WIDTH`] is left bit-identical. Fails without mutating if
/// any grid dimension is too small to hold a full window.
pub fn apply_median_filter(table: &mut Table, quantity: Quantity) -> CleanResult<FilterReport> {
    let grid = table.grid();
    let w = FILTER_HALF_WIDTH;
    check_window_fits("logrho", grid.n_rho, w)?;
    check_window_fits("logtemp", grid.n_temperature, w)?;
    check_window_fits("ye", grid.n_ye, w)?;

    let snapshot = table.field(quantity).to_vec();

    // Scan the interior out-of-place, then commit the replacements.
    let replacements: Vec<(usize, f64)> = (0..grid.len())
        .into_par_iter()
        .filter_map(|index| {
            let (ir, it, iy) = grid.decompose(index);
            if !grid.is_interior(ir, it, iy, w) {
                return None;
            }

            let mut window = [0.0f64; WINDOW_SIZE];
            let mut n = 0;
            for dy in 0..=2 * w {
                for dt in 0..=2 * w {
                    for dr in 0..=2 * w {
                        window[n] =
                            snapshot[grid.index(ir + dr - w, it + dt - w, iy + dy - w)];
                        n += 1;
                    }
                }
            }
            let median = median_in_place(&mut window).ok()?;

            let original = snapshot[index];
            // NaN (zero median against zero value) compares false: keep.
            let deviation = (median - original).abs() / median.abs();
            (deviation > SMOOTHING_THRESHOLD).then_some((index, median))
        })
        .collect();

    let replaced = replacements.len() as u64;
    let field = table.field_mut(quantity);
    for (index, median) in replacements {
        debug!(
            quantity = %quantity,
            index,
            original = snapshot[index],
            median,
            "median filter replaced outlier"
        );
        field[index] = median;
    }

    let interior = (grid.n_rho - 2 * w) * (grid.n_temperature - 2 * w) * (grid.n_ye - 2 * w);
    Ok(FilterReport {
        quantity,
        replaced,
        interior_points: interior as u64,
    })
}

fn check_window_fits(axis: &'static str, len: usize, w: usize) -> CleanResult<()> {
    if len <= 2 * w {
        return Err(CleanError::GridTooSmall {
            axis,
            len,
            min_required: 2 * w,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eos_core::Grid;

    #[test]
    fn window_is_seven_cubed() {
        assert_eq!(WINDOW_SIZE, 343);
    }

    #[test]
    fn rejects_grids_that_cannot_hold_a_window() {
        let mut table = Table::zeroed(Grid::new(6, 8, 8));
        let err = apply_median_filter(&mut table, Quantity::Dpdrhoe).unwrap_err();
        assert!(matches!(
            err,
            CleanError::GridTooSmall { axis: "logrho", len: 6, .. }
        ));
    }

    #[test]
    fn smooth_field_is_untouched() {
        let grid = Grid::new(8, 8, 8);
        let mut table = Table::zeroed(grid);
        for (i, v) in table.field_mut(Quantity::Dedt).iter_mut().enumerate() {
            *v = 1.0 + 1e-3 * (i as f64);
        }
        let before = table.field(Quantity::Dedt).to_vec();

        let report = apply_median_filter(&mut table, Quantity::Dedt).unwrap();
        assert_eq!(report.replaced, 0);
        assert_eq!(report.interior_points, 8);
        assert_eq!(table.field(Quantity::Dedt), before.as_slice());
    }
}
