//! Pipeline driver: filter selected quantities, recompute sound speed,
//! validate, and hand the summary back to the caller for persistence.

use crate::error::{CleanError, CleanResult};
use crate::median_filter::{FilterReport, apply_median_filter};
use crate::sound_speed::{SoundSpeedMode, SoundSpeedReport, recompute_sound_speed};
use crate::validate::{ValidationReport, validate_table};
use eos_core::{Quantity, Table};
use tracing::info;

/// Which subset of quantities the median filter touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Smoothing {
    /// No filtering at all.
    None,
    /// Only the derivative fields (dpdrhoe, dpderho, dedt).
    #[default]
    DerivsOnly,
    /// Every non-derivative field (cs2 excluded, it is recomputed anyway).
    HydroOnly,
    /// Both of the above. Still excludes cs2: the pipeline overwrites it
    /// right after filtering, so smoothing it first would be wasted work.
    All,
}

impl Smoothing {
    /// Quantities selected by this option, in dataset order.
    pub fn selection(self) -> Vec<Quantity> {
        Quantity::ALL
            .iter()
            .copied()
            .filter(|&q| match self {
                Smoothing::None => false,
                Smoothing::DerivsOnly => q.is_derivative(),
                Smoothing::HydroOnly => !q.is_derivative() && q != Quantity::Cs2,
                Smoothing::All => q != Quantity::Cs2,
            })
            .collect()
    }
}

/// What to do with the derivative fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DerivsMode {
    /// Median-filter them (when the smoothing selection includes them).
    #[default]
    Smooth,
    /// Rebuild them from the thermodynamic potentials. Not implemented;
    /// requesting it fails before any mutation.
    Recompute,
    /// Leave them alone even if the smoothing selection includes them.
    DoNothing,
}

/// Full pipeline configuration. Defaults match the common cleaning run:
/// smooth the derivatives, relativistic sound speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CleanConfig {
    pub smoothing: Smoothing,
    pub derivs: DerivsMode,
    pub sound_speed: SoundSpeedMode,
}

/// Everything one cleaning run reports back.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CleanSummary {
    pub filters: Vec<FilterReport>,
    pub sound_speed: SoundSpeedReport,
    pub validation: ValidationReport,
}

/// Run the cleaning pipeline on one table: median-filter the configured
/// quantities, recompute cs2, validate. Data-quality defects never fail
/// the run; they come back in the summary.
pub fn clean_table(table: &mut Table, config: &CleanConfig) -> CleanResult<CleanSummary> {
    if config.derivs == DerivsMode::Recompute {
        return Err(CleanError::Unsupported {
            feature: "recomputing derivatives from thermodynamic potentials",
        });
    }

    let mut targets = config.smoothing.selection();
    if config.derivs == DerivsMode::DoNothing {
        targets.retain(|q| !q.is_derivative());
    }

    let mut filters = Vec::with_capacity(targets.len());
    for quantity in targets {
        info!(quantity = %quantity, "applying median filter");
        let report = apply_median_filter(table, quantity)?;
        info!(
            quantity = %quantity,
            replaced = report.replaced,
            interior = report.interior_points,
            "median filter pass done"
        );
        filters.push(report);
    }

    let sound_speed = recompute_sound_speed(table, config.sound_speed);
    let validation = validate_table(table);

    Ok(CleanSummary {
        filters,
        sound_speed,
        validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivs_selection_is_the_three_response_functions() {
        assert_eq!(
            Smoothing::DerivsOnly.selection(),
            vec![Quantity::Dedt, Quantity::Dpderho, Quantity::Dpdrhoe]
        );
    }

    #[test]
    fn hydro_selection_excludes_derivatives_and_cs2() {
        let hydro = Smoothing::HydroOnly.selection();
        assert_eq!(hydro.len(), Quantity::COUNT - 4);
        assert!(!hydro.contains(&Quantity::Cs2));
        assert!(!hydro.contains(&Quantity::Dpdrhoe));
        assert!(hydro.contains(&Quantity::Entropy));
    }

    #[test]
    fn all_selection_is_everything_but_cs2() {
        let all = Smoothing::All.selection();
        assert_eq!(all.len(), Quantity::COUNT - 1);
        assert!(!all.contains(&Quantity::Cs2));
    }

    #[test]
    fn none_selects_nothing() {
        assert!(Smoothing::None.selection().is_empty());
    }
}
