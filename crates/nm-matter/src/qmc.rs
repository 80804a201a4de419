//! Quantum Monte Carlo two-term power law for neutron matter at T = 0.

use nm_core::constants::HC_MEV_FM;

/// QMC energy-density parameters (a, b in MeV; α, β unitless).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QmcModel {
    pub alpha: f64,
    pub beta: f64,
    pub a: f64,
    pub b: f64,
    /// Reference density, fm⁻³
    pub n0: f64,
}

impl Default for QmcModel {
    fn default() -> Self {
        Self {
            alpha: 0.48,
            beta: 3.45,
            a: 12.7,
            b: 2.12,
            n0: 0.16,
        }
    }
}

impl QmcModel {
    /// Energy density (fm⁻⁴, no rest mass) of neutron matter at nn + pn.
    pub fn energy_density(&self, nn: f64, pn: f64) -> f64 {
        let nb = nn + pn;
        let x = nb / self.n0;
        (self.a * x.powf(self.alpha) + self.b * x.powf(self.beta)) * nb / HC_MEV_FM
    }

    /// d(energy density)/d(nb), fm⁻¹.
    pub fn denergy_dn(&self, nn: f64, pn: f64) -> f64 {
        let x = (nn + pn) / self.n0;
        (self.a * x.powf(self.alpha) * (self.alpha + 1.0)
            + self.b * x.powf(self.beta) * (self.beta + 1.0))
            / HC_MEV_FM
    }
}
