//! The closed set of tabulated 3-D fields in a stellar-collapse EOS table.

use crate::error::CoreError;
use std::fmt;

/// One tabulated quantity. Discriminants index the table's field storage,
/// and `name()` is the exact HDF5 dataset name on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quantity {
    /// Average mass number of heavy nuclei
    Abar,
    /// Alpha-particle mass fraction
    Xa,
    /// Heavy-nucleus mass fraction
    Xh,
    /// Free-neutron mass fraction
    Xn,
    /// Free-proton mass fraction
    Xp,
    /// Average charge number of heavy nuclei
    Zbar,
    /// Sound speed squared (derived; recomputed by the pipeline)
    Cs2,
    /// d(energy)/d(temperature) at constant rho, Ye
    Dedt,
    /// d(pressure)/d(energy) at constant rho
    Dpderho,
    /// d(pressure)/d(rho) at constant energy
    Dpdrhoe,
    /// Specific entropy
    Entropy,
    /// Adiabatic index
    Gamma,
    /// log10 of (specific internal energy + energy shift)
    LogEnergy,
    /// log10 of pressure
    LogPress,
    /// Electron chemical potential
    MuE,
    /// Neutron chemical potential
    MuN,
    /// Proton chemical potential
    MuP,
    /// mu_n - mu_p
    MuHat,
    /// Neutrino chemical potential
    MuNu,
}

impl Quantity {
    /// Number of tabulated quantities.
    pub const COUNT: usize = 19;

    /// Every quantity, in on-disk dataset order.
    pub const ALL: [Quantity; Self::COUNT] = [
        Quantity::Abar,
        Quantity::Xa,
        Quantity::Xh,
        Quantity::Xn,
        Quantity::Xp,
        Quantity::Zbar,
        Quantity::Cs2,
        Quantity::Dedt,
        Quantity::Dpderho,
        Quantity::Dpdrhoe,
        Quantity::Entropy,
        Quantity::Gamma,
        Quantity::LogEnergy,
        Quantity::LogPress,
        Quantity::MuE,
        Quantity::MuN,
        Quantity::MuP,
        Quantity::MuHat,
        Quantity::MuNu,
    ];

    /// HDF5 dataset name for this quantity.
    pub const fn name(self) -> &'static str {
        match self {
            Quantity::Abar => "Abar",
            Quantity::Xa => "Xa",
            Quantity::Xh => "Xh",
            Quantity::Xn => "Xn",
            Quantity::Xp => "Xp",
            Quantity::Zbar => "Zbar",
            Quantity::Cs2 => "cs2",
            Quantity::Dedt => "dedt",
            Quantity::Dpderho => "dpderho",
            Quantity::Dpdrhoe => "dpdrhoe",
            Quantity::Entropy => "entropy",
            Quantity::Gamma => "gamma",
            Quantity::LogEnergy => "logenergy",
            Quantity::LogPress => "logpress",
            Quantity::MuE => "mu_e",
            Quantity::MuN => "mu_n",
            Quantity::MuP => "mu_p",
            Quantity::MuHat => "muhat",
            Quantity::MuNu => "munu",
        }
    }

    /// Parse a dataset name back into a quantity.
    pub fn from_name(name: &str) -> Result<Quantity, CoreError> {
        Self::ALL
            .iter()
            .copied()
            .find(|q| q.name() == name)
            .ok_or_else(|| CoreError::UnknownQuantity {
                name: name.to_string(),
            })
    }

    /// Thermodynamic derivative quantities, the usual median-filter targets.
    pub const fn is_derivative(self) -> bool {
        matches!(self, Quantity::Dpdrhoe | Quantity::Dpderho | Quantity::Dedt)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
