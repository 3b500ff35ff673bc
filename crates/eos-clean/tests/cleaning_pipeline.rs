//! Integration tests for the cleaning pipeline.
//!
//! Covers:
//! - filter margin and replacement semantics on a minimum-size grid
//! - snapshot discipline (the filter never reads its own output)
//! - the zero-median sharp edge
//! - pointwise locality and determinism of the cs2 recomputation
//! - the fail-fast path for unsupported derivative recomputation

use eos_clean::{
    CleanConfig, CleanError, DerivsMode, FILTER_HALF_WIDTH, SMOOTHING_THRESHOLD, Smoothing,
    SoundSpeedMode, apply_median_filter, clean_table, recompute_sound_speed,
};
use eos_core::{Grid, Quantity, Table, median_in_place};
use proptest::prelude::*;

const W: usize = FILTER_HALF_WIDTH;

/// Smallest grid that still has an interior: every axis needs more
/// than 2*W points.
fn min_grid() -> Grid {
    Grid::new(8, 8, 8)
}

/// A physically sane table: monotone axes, positive pressure/energy,
/// uniform derivative fields.
fn sane_table(grid: Grid) -> Table {
    let mut table = Table::zeroed(grid);
    for (i, v) in table.log10_rho.iter_mut().enumerate() {
        *v = 3.0 + 0.5 * i as f64;
    }
    for (i, v) in table.log10_temperature.iter_mut().enumerate() {
        *v = -2.0 + 0.25 * i as f64;
    }
    for (i, v) in table.ye.iter_mut().enumerate() {
        *v = 0.05 + 0.05 * i as f64;
    }
    table.field_mut(Quantity::LogPress).fill(22.0);
    table.field_mut(Quantity::LogEnergy).fill(17.0);
    table.field_mut(Quantity::Dpdrhoe).fill(1.0);
    table.field_mut(Quantity::Dpderho).fill(1.0);
    table.field_mut(Quantity::Dedt).fill(1.0);
    table
}

/// Deterministic pseudo-random values without pulling in a RNG crate.
fn lcg_fill(field: &mut [f64], mut state: u64) {
    for v in field.iter_mut() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        *v = 1.0 + (state >> 11) as f64 / (1u64 << 53) as f64;
    }
}

#[test]
fn single_outlier_is_replaced_and_nothing_else_moves() {
    let grid = min_grid();
    let mut table = sane_table(grid);
    let outlier = grid.index(4, 4, 4);
    table.field_mut(Quantity::Dpdrhoe)[outlier] = 100.0;
    let before = table.field(Quantity::Dpdrhoe).to_vec();

    let report = apply_median_filter(&mut table, Quantity::Dpdrhoe).unwrap();
    assert_eq!(report.replaced, 1);
    assert_eq!(report.interior_points, 8);

    let after = table.field(Quantity::Dpdrhoe);
    for index in 0..grid.len() {
        if index == outlier {
            // Median of 342 ones and one spike.
            assert_eq!(after[index], 1.0);
        } else {
            assert_eq!(after[index].to_bits(), before[index].to_bits());
        }
    }
}

#[test]
fn outlier_in_the_margin_is_passed_through() {
    let grid = min_grid();
    let mut table = sane_table(grid);
    let corner = grid.index(0, 0, 0);
    let edge = grid.index(2, 4, 4); // ir < W
    table.field_mut(Quantity::Dedt)[corner] = 1.0e9;
    table.field_mut(Quantity::Dedt)[edge] = -1.0e9;

    let report = apply_median_filter(&mut table, Quantity::Dedt).unwrap();
    assert_eq!(report.replaced, 0);
    assert_eq!(table.field(Quantity::Dedt)[corner], 1.0e9);
    assert_eq!(table.field(Quantity::Dedt)[edge], -1.0e9);
}

#[test]
fn deviation_at_the_threshold_is_kept() {
    let grid = min_grid();
    let mut table = sane_table(grid);
    let index = grid.index(4, 4, 4);

    // |median - x| / |median| == 10 exactly: not strictly greater, keep.
    table.field_mut(Quantity::Dpderho)[index] = 1.0 + SMOOTHING_THRESHOLD;
    let report = apply_median_filter(&mut table, Quantity::Dpderho).unwrap();
    assert_eq!(report.replaced, 0);
    assert_eq!(table.field(Quantity::Dpderho)[index], 11.0);

    // Just past the threshold: replaced with the local median.
    table.field_mut(Quantity::Dpderho)[index] = 11.5;
    let report = apply_median_filter(&mut table, Quantity::Dpderho).unwrap();
    assert_eq!(report.replaced, 1);
    assert_eq!(table.field(Quantity::Dpderho)[index], 1.0);
}

#[test]
fn zero_median_replaces_nonzero_value_and_keeps_zero() {
    let grid = min_grid();
    let mut table = sane_table(grid);

    // All-zero neighborhood, nonzero center: infinite relative deviation.
    table.field_mut(Quantity::Xa).fill(0.0);
    table.field_mut(Quantity::Xa)[grid.index(4, 4, 4)] = 5.0;
    let report = apply_median_filter(&mut table, Quantity::Xa).unwrap();
    assert_eq!(report.replaced, 1);
    assert_eq!(table.field(Quantity::Xa)[grid.index(4, 4, 4)], 0.0);

    // All zero everywhere: 0/0 is NaN, which never exceeds the threshold.
    table.field_mut(Quantity::Xh).fill(0.0);
    let report = apply_median_filter(&mut table, Quantity::Xh).unwrap();
    assert_eq!(report.replaced, 0);
    assert!(table.field(Quantity::Xh).iter().all(|&v| v == 0.0));
}

/// Reference filter: same rule, written as an obviously-correct serial
/// double-buffered loop. The production filter must agree exactly.
fn reference_filter(grid: Grid, field: &[f64]) -> Vec<f64> {
    let mut out = field.to_vec();
    for iy in W..grid.n_ye - W {
        for it in W..grid.n_temperature - W {
            for ir in W..grid.n_rho - W {
                let mut window = Vec::with_capacity((2 * W + 1).pow(3));
                for dy in 0..=2 * W {
                    for dt in 0..=2 * W {
                        for dr in 0..=2 * W {
                            window.push(field[grid.index(ir + dr - W, it + dt - W, iy + dy - W)]);
                        }
                    }
                }
                let median = median_in_place(&mut window).unwrap();
                let index = grid.index(ir, it, iy);
                if (median - field[index]).abs() / median.abs() > SMOOTHING_THRESHOLD {
                    out[index] = median;
                }
            }
        }
    }
    out
}

#[test]
fn filter_matches_serial_double_buffered_reference() {
    let grid = Grid::new(10, 9, 8);
    let mut table = sane_table(grid);
    lcg_fill(table.field_mut(Quantity::Dpdrhoe), 0x5eed_u64);
    // A few spikes, including two in adjacent cells so an in-place
    // implementation would drift.
    let field = table.field_mut(Quantity::Dpdrhoe);
    field[grid.index(4, 4, 4)] = 900.0;
    field[grid.index(5, 4, 4)] = -700.0;
    field[grid.index(6, 6, 5)] = 450.0;

    let expected = reference_filter(grid, table.field(Quantity::Dpdrhoe));
    apply_median_filter(&mut table, Quantity::Dpdrhoe).unwrap();
    assert_eq!(table.field(Quantity::Dpdrhoe), expected.as_slice());
}

#[test]
fn recomputation_is_deterministic_and_pointwise() {
    let grid = min_grid();
    let mut a = sane_table(grid);
    let mut b = a.clone();

    recompute_sound_speed(&mut a, SoundSpeedMode::Relativistic);
    recompute_sound_speed(&mut b, SoundSpeedMode::Relativistic);
    assert_eq!(a.field(Quantity::Cs2), b.field(Quantity::Cs2));

    // Perturbing one input point moves cs2 at that point only.
    let touched = grid.index(3, 5, 2);
    b.field_mut(Quantity::Dpdrhoe)[touched] = 2.0;
    recompute_sound_speed(&mut b, SoundSpeedMode::Relativistic);
    for index in 0..grid.len() {
        if index == touched {
            assert_ne!(a.field(Quantity::Cs2)[index], b.field(Quantity::Cs2)[index]);
        } else {
            assert_eq!(
                a.field(Quantity::Cs2)[index].to_bits(),
                b.field(Quantity::Cs2)[index].to_bits()
            );
        }
    }
}

#[test]
fn end_to_end_default_clean_on_minimum_grid() {
    let grid = min_grid();
    let mut table = sane_table(grid);
    let outlier = grid.index(4, 4, 4);
    table.field_mut(Quantity::Dpdrhoe)[outlier] = 1.0e4;
    let dpdrhoe_before = table.field(Quantity::Dpdrhoe).to_vec();

    let summary = clean_table(&mut table, &CleanConfig::default()).unwrap();

    // Default smoothing touches exactly the three derivative fields.
    let filtered: Vec<_> = summary.filters.iter().map(|f| f.quantity).collect();
    assert_eq!(
        filtered,
        vec![Quantity::Dedt, Quantity::Dpderho, Quantity::Dpdrhoe]
    );
    let dpdrhoe_report = summary.filters.last().unwrap();
    assert_eq!(dpdrhoe_report.replaced, 1);

    // Only the injected outlier changed.
    let after = table.field(Quantity::Dpdrhoe);
    for index in 0..grid.len() {
        if index == outlier {
            assert_eq!(after[index], 1.0);
        } else {
            assert_eq!(after[index].to_bits(), dpdrhoe_before[index].to_bits());
        }
    }

    // cs2 was recomputed everywhere and the table is physically clean.
    assert!(table.field(Quantity::Cs2).iter().all(|&v| v > 0.0));
    assert!(!summary.sound_speed.negative_found);
    assert!(!summary.sound_speed.superluminal_found);
    assert!(summary.validation.is_clean());
}

#[test]
fn derivative_recomputation_fails_fast_without_mutation() {
    let grid = min_grid();
    let mut table = sane_table(grid);
    table.field_mut(Quantity::Dpdrhoe)[grid.index(4, 4, 4)] = 1.0e4;
    let before = table.clone();

    let config = CleanConfig {
        derivs: DerivsMode::Recompute,
        ..CleanConfig::default()
    };
    let err = clean_table(&mut table, &config).unwrap_err();
    assert!(matches!(err, CleanError::Unsupported { .. }));

    for q in Quantity::ALL {
        assert_eq!(table.field(q), before.field(q));
    }
}

#[test]
fn do_nothing_derivs_skips_derivative_fields() {
    let grid = min_grid();
    let mut table = sane_table(grid);
    table.field_mut(Quantity::Dpdrhoe)[grid.index(4, 4, 4)] = 1.0e4;

    let config = CleanConfig {
        smoothing: Smoothing::All,
        derivs: DerivsMode::DoNothing,
        ..CleanConfig::default()
    };
    let summary = clean_table(&mut table, &config).unwrap();
    assert!(summary.filters.iter().all(|f| !f.quantity.is_derivative()));
    // The derivative outlier survives.
    assert_eq!(table.field(Quantity::Dpdrhoe)[grid.index(4, 4, 4)], 1.0e4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// On a 7x7x7 grid the interior is a single point; whatever the data,
    /// every other point must come through bit-identical and the interior
    /// point must be either its original value or the window median.
    #[test]
    fn margin_is_bit_identical_for_arbitrary_fields(
        values in prop::collection::vec(-1e3f64..1e3, 343)
    ) {
        let grid = Grid::new(7, 7, 7);
        let mut table = Table::zeroed(grid);
        table.set_field(Quantity::Dedt, values.clone()).unwrap();

        apply_median_filter(&mut table, Quantity::Dedt).unwrap();

        let mut window = values.clone();
        let window_median = median_in_place(&mut window).unwrap();
        let center = grid.index(3, 3, 3);
        let after = table.field(Quantity::Dedt);
        for index in 0..grid.len() {
            if index == center {
                prop_assert!(
                    after[index] == values[index] || after[index] == window_median
                );
            } else {
                prop_assert_eq!(after[index].to_bits(), values[index].to_bits());
            }
        }
    }
}

#[test]
fn validator_reports_injected_defects_without_failing_the_run() {
    let grid = min_grid();
    let mut table = sane_table(grid);
    table.log10_temperature[3] = 10.0; // dip between index 3 and 4
    table.field_mut(Quantity::MuNu)[17] = f64::NAN;

    let summary = clean_table(&mut table, &CleanConfig::default()).unwrap();
    let temp_axis = summary
        .validation
        .axes
        .iter()
        .find(|a| a.axis == "logtemp")
        .unwrap();
    assert_eq!(temp_axis.defects, 1);
    let munu = summary
        .validation
        .fields
        .iter()
        .find(|f| f.quantity == Quantity::MuNu)
        .unwrap();
    assert_eq!(munu.non_finite, 1);
    assert!(!summary.validation.is_clean());
}
