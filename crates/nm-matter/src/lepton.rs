//! Electron/positron pair gas plus photons, supplied to the EOS wrappers.

use crate::error::MatterResult;
use crate::fermion::{pair_mu_from_density, pair_state, photon_gas};
use nm_core::constants::M_ELECTRON;

/// Lepton-sector thermodynamics at one (n_e, T) point.
#[derive(Clone, Copy, Debug)]
pub struct LeptonPoint {
    /// Electron chemical potential (rest mass included), fm⁻¹
    pub mu_e: f64,
    /// Energy density of e⁻e⁺ pairs and photons, fm⁻⁴
    pub energy: f64,
    /// Pressure, fm⁻⁴
    pub pressure: f64,
    /// Entropy density, fm⁻³
    pub entropy: f64,
}

impl LeptonPoint {
    /// Free energy density f = e − T·s, fm⁻⁴.
    pub fn free_energy(&self, t: f64) -> f64 {
        self.energy - t * self.entropy
    }
}

/// Relativistic electron/positron pair model plus a massless photon gas.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElectronPhotonGas;

impl ElectronPhotonGas {
    /// Evaluate at net electron density `ne` (fm⁻³) and temperature `t`
    /// (fm⁻¹). `ne` may be zero (pairs and photons only).
    pub fn eval(&self, ne: f64, t: f64) -> MatterResult<LeptonPoint> {
        let mu_e = pair_mu_from_density(ne, t, M_ELECTRON)?;
        let e = pair_state(mu_e, t, M_ELECTRON);
        let (ug, pg, sg) = photon_gas(t);
        Ok(LeptonPoint {
            mu_e,
            energy: e.energy + ug,
            pressure: e.pressure + pg,
            entropy: e.entropy + sg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nm_core::constants::HC_MEV_FM;

    #[test]
    fn degenerate_electrons_dominate_photons() {
        let t = 1.0 / HC_MEV_FM;
        let lp = ElectronPhotonGas.eval(0.05, t).unwrap();
        // kF = (3π² n)^(1/3) ≈ 1.14 fm⁻¹ ≈ 225 MeV
        assert!((lp.mu_e * HC_MEV_FM - 225.0).abs() < 2.0);
        let (ug, _, _) = photon_gas(t);
        assert!(lp.energy > 100.0 * ug);
    }

    #[test]
    fn zero_density_leaves_pairs_and_photons() {
        let t = 10.0 / HC_MEV_FM;
        let lp = ElectronPhotonGas.eval(0.0, t).unwrap();
        assert_eq!(lp.mu_e, 0.0);
        assert!(lp.energy > 0.0 && lp.entropy > 0.0);
    }

    #[test]
    fn lepton_free_energy_derivative_is_mu() {
        let t = 1.0 / HC_MEV_FM;
        let ne = 0.01;
        let f = |n: f64| ElectronPhotonGas.eval(n, t).unwrap().free_energy(t);
        let h = ne * 1e-4;
        let num = (f(ne + h) - f(ne - h)) / (2.0 * h);
        let mu = ElectronPhotonGas.eval(ne, t).unwrap().mu_e;
        assert!((mu / num - 1.0).abs() < 1e-7);
    }
}
