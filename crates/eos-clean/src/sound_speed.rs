//! Sound-speed-squared recomputation from tabulated pressure derivatives.

use eos_core::{Quantity, Table};
use rayon::prelude::*;
use tracing::{info, warn};

/// Speed of light in CGS (cm/s).
pub const SPEED_OF_LIGHT_CGS: f64 = 2.99792458e10;

/// Speed of light squared in CGS (cm^2/s^2).
pub const SPEED_OF_LIGHT_SQUARED_CGS: f64 = SPEED_OF_LIGHT_CGS * SPEED_OF_LIGHT_CGS;

/// Which sound-speed formula to use.
///
/// The relativistic variant divides the bulk modulus by the specific
/// enthalpy (including the rest-mass term) and is the reference behavior.
/// The non-relativistic variant is kept for compatibility with tables
/// produced by older versions of this tool; the two are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SoundSpeedMode {
    #[default]
    Relativistic,
    NonRelativistic,
}

/// Aggregate physical-admissibility flags from one recomputation pass.
/// Informational: a flagged table is still written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SoundSpeedReport {
    pub negative_found: bool,
    pub superluminal_found: bool,
}

#[derive(Clone, Copy)]
struct PointResult {
    cs2: f64,
    negative: bool,
    superluminal: bool,
}

/// Overwrite the `cs2` field from pressure, energy and the smoothed
/// derivative fields. Each grid point depends only on its own inputs, so
/// the pass is a parallel map over the index space.
pub fn recompute_sound_speed(table: &mut Table, mode: SoundSpeedMode) -> SoundSpeedReport {
    let grid = table.grid();
    let log10_rho = table.log10_rho.as_slice();
    let logpress = table.field(Quantity::LogPress);
    let logenergy = table.field(Quantity::LogEnergy);
    let dpdrhoe = table.field(Quantity::Dpdrhoe);
    let dpderho = table.field(Quantity::Dpderho);

    let results: Vec<PointResult> = (0..grid.len())
        .into_par_iter()
        .map(|index| {
            let (ir, _, _) = grid.decompose(index);
            let rho = 10.0f64.powf(log10_rho[ir]);
            let press = 10.0f64.powf(logpress[index]);
            let eps = 10.0f64.powf(logenergy[index]);

            // Harden the bulk modulus: never let a non-positive value
            // through to the division below.
            let mut bulk_modulus = rho * dpdrhoe[index] + (press / rho) * dpderho[index];
            if bulk_modulus < f64::EPSILON {
                bulk_modulus = f64::EPSILON;
            }

            match mode {
                SoundSpeedMode::Relativistic => {
                    let cs2_raw = bulk_modulus / rho;
                    let enthalpy = SPEED_OF_LIGHT_SQUARED_CGS + eps + press / rho;
                    PointResult {
                        cs2: cs2_raw / enthalpy,
                        negative: cs2_raw < 0.0,
                        superluminal: cs2_raw / enthalpy > SPEED_OF_LIGHT_SQUARED_CGS,
                    }
                }
                SoundSpeedMode::NonRelativistic => {
                    let w = rho * (1.0 + eps) + press;
                    let cs2 = bulk_modulus / w;
                    PointResult {
                        cs2,
                        negative: cs2 < 0.0,
                        superluminal: cs2 > SPEED_OF_LIGHT_SQUARED_CGS,
                    }
                }
            }
        })
        .collect();

    let mut report = SoundSpeedReport::default();
    let cs2_field = table.field_mut(Quantity::Cs2);
    for (index, point) in results.iter().enumerate() {
        if point.negative {
            warn!(index, cs2 = point.cs2, "found negative cs2");
            report.negative_found = true;
        }
        if point.superluminal {
            warn!(index, cs2 = point.cs2, "found superluminal cs2");
            report.superluminal_found = true;
        }
        cs2_field[index] = point.cs2;
    }

    if !report.negative_found {
        info!("no points in the table have a negative cs2");
    }
    if !report.superluminal_found {
        info!("no points in the table have a superluminal cs2");
    }
    report
}
