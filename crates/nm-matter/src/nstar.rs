//! High-density neutron-star model: polynomial energy-per-baryon fit plus
//! a causality-preserving analytic continuation above the maximum causal
//! density.
//!
//! The continuation matches value and first derivative at `nb_max` and
//! keeps the squared sound speed within (0, 1]. Its form depends on how
//! the target sound speed at 2 fm⁻³ (`phi`) compares to the fit's sound
//! speed at the boundary: a rising profile is a power law in density, a
//! falling one involves the Gauss hypergeometric function (evaluated via
//! a Pfaff-transformed argument for stability), and the degenerate equal
//! case is a single power law.

use crate::error::{MatterError, MatterResult};
use nalgebra::DVector;
use nm_core::constants::{HC_MEV_FM, M_NEUTRON};
use nm_solver::{hyp2f1, newton_solve_fd, NewtonConfig};
use tracing::debug;

/// Density (fm⁻³) at which the target sound speed `phi` is imposed.
const PHI_DENSITY: f64 = 2.0;

/// One row of the neutron-star reference table: fit coefficients for
/// E/A(nb) = Σ pₖ·nb^(k+1) (MeV) plus the table's causal-density ceiling.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NsFitParameters {
    pub coeffs: [f64; 5],
    pub nb_max: f64,
}

impl NsFitParameters {
    /// Energy per baryon in MeV.
    pub fn eoa(&self, nb: f64) -> f64 {
        let p = &self.coeffs;
        nb * (p[0] + nb * (p[1] + nb * (p[2] + nb * (p[3] + nb * p[4]))))
    }

    /// Energy density in fm⁻⁴ (no rest mass).
    pub fn energy_density(&self, nb: f64) -> f64 {
        self.eoa(nb) * nb / HC_MEV_FM
    }

    /// Baryon chemical potential d(ed)/d(nb) in fm⁻¹ (no rest mass).
    pub fn mu(&self, nb: f64) -> f64 {
        let p = &self.coeffs;
        (2.0 * p[0] * nb
            + 3.0 * p[1] * nb.powi(2)
            + 4.0 * p[2] * nb.powi(3)
            + 5.0 * p[3] * nb.powi(4)
            + 6.0 * p[4] * nb.powi(5))
            / HC_MEV_FM
    }

    /// Inverse susceptibility dμ/dnb in fm².
    pub fn dmu_dn(&self, nb: f64) -> f64 {
        let p = &self.coeffs;
        (2.0 * p[0]
            + 6.0 * p[1] * nb
            + 12.0 * p[2] * nb.powi(2)
            + 20.0 * p[3] * nb.powi(3)
            + 30.0 * p[4] * nb.powi(4))
            / HC_MEV_FM
    }

    /// Squared sound speed of the raw fit.
    pub fn cs2(&self, nb: f64) -> f64 {
        self.dmu_dn(nb) * nb / (self.mu(nb) + M_NEUTRON)
    }

    /// Minimum and maximum cs² of the raw fit below `nb_max`, sampled on
    /// the reference grid.
    pub fn min_max_cs2(&self) -> (f64, f64) {
        let mut cs2_min = self.cs2(0.08);
        let mut cs2_max = cs2_min;
        let mut nb = 0.04;
        while nb < self.nb_max {
            let c = self.cs2(nb);
            cs2_min = cs2_min.min(c);
            cs2_max = cs2_max.max(c);
            nb += 0.02;
        }
        (cs2_min, cs2_max)
    }

    /// Lower `nb_max` to the fit's own cs² = 1 crossing when that happens
    /// below the tabulated ceiling.
    pub fn causal_ceiling(mut self) -> Self {
        let mut nb_new = 0.0;
        let mut nb = 0.04;
        while nb + 0.012 < self.nb_max + 1e-6 {
            let c0 = self.cs2(nb);
            let c1 = self.cs2(nb + 0.012);
            if c0 < 1.0 && c1 > 1.0 {
                nb_new = nb + 0.012 * (1.0 - c0) / (c1 - c0);
            }
            nb += 0.012;
        }
        if nb_new > 0.01 {
            self.nb_max = nb_new;
        }
        self
    }
}

/// The analytic continuation above `nb_max`, one of three algebraic forms.
#[derive(Clone, Copy, Debug)]
pub enum CausalBranch {
    /// Sound speed rises from cs_last toward phi.
    Increasing { a1: f64, a2: f64, c1: f64, c2: f64 },
    /// Sound speed falls from cs_last toward phi.
    Decreasing { a1: f64, a2: f64, c1: f64, c2: f64 },
    /// phi equals cs_last: single power law with that exponent.
    Constant,
}

/// Neutron-star model: fit row plus the constructed causal branch.
///
/// The branch is built once per model selection and reused for every
/// density query.
#[derive(Clone, Debug)]
pub struct NsModel {
    pub fit: NsFitParameters,
    pub phi: f64,
    pub branch: CausalBranch,
}

impl NsModel {
    /// Construct the causal continuation for the given target sound speed.
    pub fn new(fit: NsFitParameters, phi: f64) -> MatterResult<Self> {
        let fit = fit.causal_ceiling();
        let nbm = fit.nb_max;
        let cs_last = fit.cs2(nbm);
        let e_last = fit.energy_density(nbm);
        let p_last = fit.mu(nbm) * nbm - e_last;
        let m = M_NEUTRON;

        let cfg = NewtonConfig {
            abs_tol: 1e-13,
            rel_tol: 0.0,
            ..Default::default()
        };

        let branch = if phi > cs_last {
            let residual = |x: &DVector<f64>| {
                let (a1, a2) = (x[0], x[1]);
                Ok(DVector::from_vec(vec![
                    1.0 - a1 + (a1 * a2 * nbm.powf(a1)) / (1.0 + a2 * nbm.powf(a1)) - cs_last,
                    1.0 - a1 + (a1 * a2 * PHI_DENSITY.powf(a1))
                        / (1.0 + a2 * PHI_DENSITY.powf(a1))
                        - phi,
                ]))
            };
            let sol = newton_solve_fd(DVector::from_vec(vec![1.0, 1.0]), residual, &cfg)
                .map_err(|_| MatterError::ConvergenceFailed {
                    what: "causal branch coefficients (increasing)",
                })?;
            let (a1, a2) = (sol.x[0], sol.x[1]);
            let c1 = (e_last + m * nbm + p_last) / ((nbm * nbm) * (a2 + nbm.powf(-a1)));
            let c2 = 0.5
                * (e_last + m * nbm - p_last
                    + a1 * (e_last + m * nbm + p_last)
                        / ((a1 - 2.0) * (1.0 + a2 * nbm.powf(a1))));
            CausalBranch::Increasing { a1, a2, c1, c2 }
        } else if phi < cs_last {
            let residual = |x: &DVector<f64>| {
                let (a1, a2) = (x[0], x[1]);
                Ok(DVector::from_vec(vec![
                    a1 - a1 * a2 * nbm.powf(a1) / (1.0 + a2 * nbm.powf(a1)) - cs_last,
                    a1 - a1 * a2 * PHI_DENSITY.powf(a1) / (1.0 + a2 * PHI_DENSITY.powf(a1))
                        - phi,
                ]))
            };
            let sol = newton_solve_fd(DVector::from_vec(vec![2.5, 1.0]), residual, &cfg)
                .map_err(|_| MatterError::ConvergenceFailed {
                    what: "causal branch coefficients (decreasing)",
                })?;
            let (a1, a2) = (sol.x[0], sol.x[1]);
            let u_max = nbm.powf(-a1) / a2;
            let h_max = hyp2f1(1.0, 1.0, 1.0 - 1.0 / a1, u_max / (u_max + 1.0))?;
            // Pfaff transformation keeps the series argument inside (0, 1)
            let h_max_new = h_max / (1.0 + u_max);
            let c1 = nbm.powf(-a1 - 1.0) * (a2 * nbm.powf(a1) + 1.0) * (e_last + m * nbm + p_last);
            let c2 = nbm.powf(-a1)
                * (a2 * nbm.powf(a1) * (e_last + m * nbm)
                    - (a2 * nbm.powf(a1) + 1.0) * h_max_new * (e_last + m * nbm + p_last))
                / a2;
            CausalBranch::Decreasing { a1, a2, c1, c2 }
        } else {
            CausalBranch::Constant
        };

        debug!(nb_max = nbm, cs_last, phi, ?branch, "constructed causal branch");
        Ok(Self { fit, phi, branch })
    }

    /// Energy density (fm⁻⁴) and its density derivative (fm⁻¹) at nb,
    /// switching to the causal continuation at `nb_max`.
    pub fn energy_density(&self, nb: f64) -> MatterResult<(f64, f64)> {
        let nbm = self.fit.nb_max;
        if nb < nbm - 1.0e-6 {
            return Ok((self.fit.energy_density(nb), self.fit.mu(nb)));
        }
        let m = M_NEUTRON;
        let e_last = self.fit.energy_density(nbm);
        let p_last = self.fit.mu(nbm) * nbm - e_last;
        let cs_last = self.fit.cs2(nbm);
        match self.branch {
            CausalBranch::Increasing { a1, a2, c1, c2 } => {
                let e = -m * nb + (a2 * nb * nb / 2.0 + nb.powf(2.0 - a1) / (2.0 - a1)) * c1 + c2;
                let de = -m + c1 * (a2 * nb + nb.powf(1.0 - a1));
                Ok((e, de))
            }
            CausalBranch::Decreasing { a1, a2, c1, c2 } => {
                let u = nb.powf(-a1) / a2;
                let h = hyp2f1(1.0, 1.0, 1.0 - 1.0 / a1, u / (u + 1.0))?;
                let h_new = h / (1.0 + u);
                let e = (c1 * nb * h_new) / a2 + c2 - m * nb;
                let de = -(a2 * m * nb.powf(a1) - c1 * nb.powf(a1) + m)
                    / (a2 * nb.powf(a1) + 1.0);
                Ok((e, de))
            }
            CausalBranch::Constant => {
                let e = -m * nb
                    + (e_last + m * nbm + p_last) / (1.0 + cs_last)
                        * (nb / nbm).powf(cs_last + 1.0)
                    + (cs_last * (e_last + m * nbm) - p_last) / (1.0 + cs_last);
                let de = -m + (e_last + m * nbm + p_last) * (nb / nbm).powf(cs_last) / nbm;
                Ok((e, de))
            }
        }
    }
}
