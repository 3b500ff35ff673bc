//! The 3-D (rho, temperature, Ye) index space and its flattening convention.

/// Grid dimensions of one table. Fields are flattened with density as the
/// fastest-varying index: `index = ir + n_rho * (it + n_temperature * iy)`,
/// matching the on-disk `(ye, temperature, rho)` dataset ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    pub n_rho: usize,
    pub n_temperature: usize,
    pub n_ye: usize,
}

impl Grid {
    pub const fn new(n_rho: usize, n_temperature: usize, n_ye: usize) -> Self {
        Self {
            n_rho,
            n_temperature,
            n_ye,
        }
    }

    /// Total number of grid points.
    pub const fn len(&self) -> usize {
        self.n_rho * self.n_temperature * self.n_ye
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of point (ir, it, iy).
    pub const fn index(&self, ir: usize, it: usize, iy: usize) -> usize {
        ir + self.n_rho * (it + self.n_temperature * iy)
    }

    /// Inverse of [`Grid::index`].
    pub const fn decompose(&self, index: usize) -> (usize, usize, usize) {
        let ir = index % self.n_rho;
        let it = (index / self.n_rho) % self.n_temperature;
        let iy = index / (self.n_rho * self.n_temperature);
        (ir, it, iy)
    }

    /// True when (ir, it, iy) lies at least `margin` cells from every face.
    pub const fn is_interior(&self, ir: usize, it: usize, iy: usize, margin: usize) -> bool {
        ir >= margin
            && ir + margin < self.n_rho
            && it >= margin
            && it + margin < self.n_temperature
            && iy >= margin
            && iy + margin < self.n_ye
    }
}
