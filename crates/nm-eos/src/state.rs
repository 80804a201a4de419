//! Query-point and result types.

use crate::error::{EosError, EosResult};

/// One (nn, pn, T) query point in natural units.
///
/// The constructor validates that both densities and the temperature are
/// strictly positive and finite: the virial fugacity equations need
/// ln(n·λ³), so nb = 0 and T = 0 are not evaluable points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionPoint {
    nn: f64,
    pn: f64,
    t: f64,
}

impl CompositionPoint {
    pub fn new(nn: f64, pn: f64, t: f64) -> EosResult<Self> {
        if !nn.is_finite() || nn <= 0.0 {
            return Err(EosError::InvalidArg {
                what: "neutron density must be positive and finite",
            });
        }
        if !pn.is_finite() || pn <= 0.0 {
            return Err(EosError::InvalidArg {
                what: "proton density must be positive and finite",
            });
        }
        if !t.is_finite() || t <= 0.0 {
            return Err(EosError::InvalidArg {
                what: "temperature must be positive and finite",
            });
        }
        Ok(Self { nn, pn, t })
    }

    /// Convenience constructor from (nb, Ye, T in MeV).
    pub fn from_nb_ye(nb: f64, ye: f64, t_mev: f64) -> EosResult<Self> {
        if !(0.0..=1.0).contains(&ye) {
            return Err(EosError::InvalidArg {
                what: "proton fraction must lie in [0, 1]",
            });
        }
        Self::new(
            nb * (1.0 - ye),
            nb * ye,
            t_mev / nm_core::constants::HC_MEV_FM,
        )
    }

    pub fn nn(&self) -> f64 {
        self.nn
    }

    pub fn pn(&self) -> f64 {
        self.pn
    }

    /// Temperature in fm⁻¹.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Baryon density nn + pn.
    pub fn nb(&self) -> f64 {
        self.nn + self.pn
    }

    /// Proton fraction pn/nb.
    pub fn ye(&self) -> f64 {
        self.pn / self.nb()
    }
}

/// The mutually consistent thermodynamic outputs of one evaluation
/// (nucleonic sector, no rest masses, no leptons).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermodynamicBundle {
    /// Energy density, fm⁻⁴
    pub energy: f64,
    /// Pressure, fm⁻⁴
    pub pressure: f64,
    /// Entropy density, fm⁻³
    pub entropy: f64,
    /// Neutron chemical potential, fm⁻¹
    pub mu_n: f64,
    /// Proton chemical potential, fm⁻¹
    pub mu_p: f64,
}

/// Full per-call result: the bundle plus the blend diagnostics that the
/// original kept in ambient mutable fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosPoint {
    /// Total free energy density, fm⁻⁴
    pub free_energy: f64,
    /// Energy density f + T·s, fm⁻⁴
    pub energy: f64,
    /// Pressure −f + μ_n·nn + μ_p·pn, fm⁻⁴
    pub pressure: f64,
    /// Entropy density, fm⁻³
    pub entropy: f64,
    /// Neutron chemical potential, fm⁻¹
    pub mu_n: f64,
    /// Proton chemical potential, fm⁻¹
    pub mu_p: f64,
    /// Virial/degenerate blend weight g ∈ (0, 1]
    pub g_virial: f64,
    /// Temperature derivative of the blend weight
    pub dg_dt: f64,
    /// QMC/neutron-star blend weight h ∈ (0, 1)
    pub h_qmc: f64,
    /// Virial free energy density, fm⁻⁴
    pub f_virial: f64,
    /// Virial entropy density, fm⁻³
    pub s_virial: f64,
    /// Degenerate (functional-side) free energy density, fm⁻⁴
    pub f_degenerate: f64,
}

impl EosPoint {
    pub fn bundle(&self) -> ThermodynamicBundle {
        ThermodynamicBundle {
            energy: self.energy,
            pressure: self.pressure,
            entropy: self.entropy,
            mu_n: self.mu_n,
            mu_p: self.mu_p,
        }
    }

    /// Free energy per baryon in MeV (diagnostic).
    pub fn free_energy_per_baryon_mev(&self, nb: f64) -> f64 {
        self.free_energy / nb * nm_core::constants::HC_MEV_FM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_point_accessors() {
        let pt = CompositionPoint::new(0.09, 0.05, 0.01).unwrap();
        assert_eq!(pt.nb(), 0.14);
        assert!((pt.ye() - 0.05 / 0.14).abs() < 1e-15);
    }

    #[test]
    fn rejects_zero_and_negative_inputs() {
        assert!(CompositionPoint::new(0.0, 0.05, 0.01).is_err());
        assert!(CompositionPoint::new(0.09, -0.05, 0.01).is_err());
        assert!(CompositionPoint::new(0.09, 0.05, 0.0).is_err());
        assert!(CompositionPoint::new(f64::NAN, 0.05, 0.01).is_err());
    }

    #[test]
    fn from_nb_ye_round_trips() {
        let pt = CompositionPoint::from_nb_ye(0.16, 0.25, 10.0).unwrap();
        assert!((pt.nb() - 0.16).abs() < 1e-15);
        assert!((pt.ye() - 0.25).abs() < 1e-12);
        assert!(CompositionPoint::from_nb_ye(0.16, 1.5, 10.0).is_err());
    }
}
