//! Low-density virial model with temperature-dependent coefficients.
//!
//! The second virial coefficients b_n(T) and b_pn(T) are frozen closed-form
//! fits against neutron-neutron and neutron-proton scattering data; the
//! fugacities follow from the two density-matching equations
//!   n_i = (2/λ³)(z_i + 2 z_i² b_n + 2 z_n z_p b_pn).
//! All six chemical-potential derivatives come from linear solves against
//! the same 2×2 density-equation Jacobian, with a single degeneracy check
//! selecting the classical closed form at very low n·λ³.

use crate::error::{MatterError, MatterResult};
use nalgebra::{DMatrix, DVector};
use nm_core::constants::{HC_MEV_FM, M_NEUTRON, M_PROTON};
use nm_solver::{newton_solve, NewtonConfig};
use std::f64::consts::PI;

/// Below this degeneracy (n·λ³) the classical ideal-gas limit is used.
pub const DEGENERACY_THRESHOLD: f64 = 1.0e-5;

/// Frozen virial-coefficient fit (temperatures in MeV).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirialCoefficientFit {
    pub bn: [f64; 10],
    pub bpn: [f64; 6],
}

impl Default for VirialCoefficientFit {
    fn default() -> Self {
        Self {
            bn: [
                2.874487202922e-01,
                2.200575070883e-03,
                -2.621025627694e-05,
                -6.061665959200e-08,
                1.059451872186e-02,
                5.673374476876e-02,
                3.492489364849e+00,
                -2.710552654167e-03,
                3.140521199464e+00,
                1.200987113605e+00,
            ],
            bpn: [
                1.527316309589e+00,
                1.748834077357e-04,
                1.754991542102e+01,
                4.510380054238e-01,
                2.751333759925e-01,
                -1.125035495140e+00,
            ],
        }
    }
}

impl VirialCoefficientFit {
    /// Neutron-neutron coefficient at T (MeV).
    pub fn bn(&self, t_mev: f64) -> f64 {
        let p = &self.bn;
        p[0] + p[1] * t_mev
            + p[2] * t_mev * t_mev
            + p[3] * t_mev * t_mev * t_mev
            + p[4] * (-p[5] * (t_mev - p[6]).powi(2)).exp()
            + p[7] * (-p[8] * (t_mev - p[9])).exp()
    }

    /// d b_n/dT at T (MeV), per MeV.
    pub fn dbn_dt(&self, t_mev: f64) -> f64 {
        let p = &self.bn;
        p[1] + 2.0 * p[2] * t_mev + 3.0 * p[3] * t_mev * t_mev
            - 2.0 * p[4] * p[5] * (t_mev - p[6]) * (-p[5] * (t_mev - p[6]).powi(2)).exp()
            - p[7] * p[8] * (-p[8] * (t_mev - p[9])).exp()
    }

    /// Neutron-proton coefficient at T (MeV).
    pub fn bpn(&self, t_mev: f64) -> f64 {
        let p = &self.bpn;
        p[0] * (-p[1] * (t_mev + p[2]).powi(2)).exp() + p[3] * (-p[4] * (t_mev + p[5])).exp()
    }

    /// d b_pn/dT at T (MeV), per MeV.
    pub fn dbpn_dt(&self, t_mev: f64) -> f64 {
        let p = &self.bpn;
        -p[0] * p[1] * 2.0 * (p[2] + t_mev) * (-p[1] * (t_mev + p[2]).powi(2)).exp()
            - p[3] * p[4] * (-p[4] * (t_mev + p[5])).exp()
    }
}

/// Per-call result of the virial model: free energy, entropy, fugacities,
/// and the six chemical-potential derivatives.
#[derive(Clone, Copy, Debug)]
pub struct VirialState {
    pub free_energy: f64,
    pub entropy: f64,
    pub pressure: f64,
    pub mu_n: f64,
    pub mu_p: f64,
    pub zn: f64,
    pub zp: f64,
    pub dmun_dnn: f64,
    pub dmup_dnn: f64,
    pub dmun_dpn: f64,
    pub dmup_dpn: f64,
    pub dmun_dt: f64,
    pub dmup_dt: f64,
}

/// The virial model: frozen coefficient fit plus the fugacity solver.
#[derive(Clone, Debug, Default)]
pub struct VirialModel {
    pub fit: VirialCoefficientFit,
}

impl VirialModel {
    /// Evaluate the virial free energy and its derivative set at
    /// (nn, pn, T); all inputs strictly positive, natural units.
    pub fn state(&self, nn: f64, pn: f64, t: f64) -> MatterResult<VirialState> {
        if !(nn > 0.0 && pn > 0.0 && t > 0.0) {
            return Err(MatterError::InvalidArg {
                what: "virial evaluation requires positive densities and temperature",
            });
        }

        let t_mev = t * HC_MEV_FM;
        let b_n = self.fit.bn(t_mev);
        let db_n = self.fit.dbn_dt(t_mev) * HC_MEV_FM;
        let b_pn = self.fit.bpn(t_mev);
        let db_pn = self.fit.dbpn_dt(t_mev) * HC_MEV_FM;

        let lam = (4.0 * PI / ((M_NEUTRON + M_PROTON) * t)).sqrt();
        let dlam_dt = -(PI / (M_NEUTRON + M_PROTON)).sqrt() / t.powf(1.5);
        let lam3 = lam * lam * lam;

        let solver_branch =
            nn * lam3 > DEGENERACY_THRESHOLD || pn * lam3 > DEGENERACY_THRESHOLD;

        let (zn, zp, mu_n, mu_p, pressure, entropy);
        if solver_branch {
            let (a, b) = self.solve_fugacities(nn, pn, lam3, b_n, b_pn)?;
            zn = a;
            zp = b;
            mu_n = t * zn.ln();
            mu_p = t * zp.ln();
            pressure =
                2.0 * t / lam3 * (zn + zp + (zn * zn + zp * zp) * b_n + 2.0 * zp * zn * b_pn);
            entropy = 5.0 * pressure / (2.0 * t) - nn * zn.ln() - pn * zp.ln()
                + 2.0 * t / lam3 * ((zn * zn + zp * zp) * db_n + 2.0 * zp * zn * db_pn);
        } else {
            mu_n = (nn * lam3 / 2.0).ln() * t;
            mu_p = (pn * lam3 / 2.0).ln() * t;
            zn = (mu_n / t).exp();
            zp = (mu_p / t).exp();
            pressure = 2.0 * t / lam3 * (zn + zp);
            entropy = 5.0 * pressure / (2.0 * t) - nn * zn.ln() - pn * zp.ln();
        }
        let free_energy = mu_n * nn + mu_p * pn - pressure;

        // shared 2x2 Jacobian A_ij = ∂n_i/∂z_j for the derivative solves
        let a11 = 2.0 / lam3 * (1.0 + 4.0 * zn * b_n + 2.0 * zp * b_pn);
        let a12 = 2.0 / lam3 * (2.0 * zn * b_pn);
        let a21 = 2.0 / lam3 * (2.0 * zp * b_pn);
        let a22 = 2.0 / lam3 * (1.0 + 4.0 * zp * b_n + 2.0 * zn * b_pn);
        let det = a11 * a22 - a12 * a21;
        if det == 0.0 || !det.is_finite() {
            return Err(MatterError::ConvergenceFailed {
                what: "virial derivative system is singular",
            });
        }

        // density directions: dz/dnn = A⁻¹ e₁, dz/dpn = A⁻¹ e₂
        let dzn_dnn = a22 / det;
        let dzp_dnn = -a21 / det;
        let dzn_dpn = -a12 / det;
        let dzp_dpn = a11 / det;

        // temperature direction at fixed densities: A dz/dT = −∂n/∂T|_z
        let nn_model = 2.0 / lam3 * (zn + 2.0 * zn * zn * b_n + 2.0 * zn * zp * b_pn);
        let pn_model = 2.0 / lam3 * (zp + 2.0 * zp * zp * b_n + 2.0 * zn * zp * b_pn);
        let dn_dt = -3.0 * dlam_dt / lam * nn_model
            + 2.0 / lam3 * (2.0 * zn * zn * db_n + 2.0 * zn * zp * db_pn);
        let dp_dt = -3.0 * dlam_dt / lam * pn_model
            + 2.0 / lam3 * (2.0 * zp * zp * db_n + 2.0 * zn * zp * db_pn);
        let dzn_dt = (-dn_dt * a22 + dp_dt * a12) / det;
        let dzp_dt = (-dp_dt * a11 + dn_dt * a21) / det;

        Ok(VirialState {
            free_energy,
            entropy,
            pressure,
            mu_n,
            mu_p,
            zn,
            zp,
            dmun_dnn: t * dzn_dnn / zn,
            dmup_dnn: t * dzp_dnn / zp,
            dmun_dpn: t * dzn_dpn / zn,
            dmup_dpn: t * dzp_dpn / zp,
            dmun_dt: zn.ln() + t * dzn_dt / zn,
            dmup_dt: zp.ln() + t * dzp_dt / zp,
        })
    }

    fn solve_fugacities(
        &self,
        nn: f64,
        pn: f64,
        lam3: f64,
        b_n: f64,
        b_pn: f64,
    ) -> MatterResult<(f64, f64)> {
        // single-species quadratic roots as the starting point
        let guess = |ni: f64| {
            let rhs = ni * lam3 / 2.0;
            if b_n > 0.0 {
                ((1.0 + 8.0 * b_n * rhs).sqrt() - 1.0) / (4.0 * b_n)
            } else {
                rhs
            }
        };
        let x0 = DVector::from_vec(vec![guess(nn).max(1e-120), guess(pn).max(1e-120)]);

        let residual = |z: &DVector<f64>| {
            let (zn, zp) = (z[0], z[1]);
            Ok(DVector::from_vec(vec![
                (2.0 / lam3 * (zn + 2.0 * zn * zn * b_n + 2.0 * zn * zp * b_pn) - nn) / nn,
                (2.0 / lam3 * (zp + 2.0 * zp * zp * b_n + 2.0 * zn * zp * b_pn) - pn) / pn,
            ]))
        };
        let jacobian = |z: &DVector<f64>| {
            let (zn, zp) = (z[0], z[1]);
            let mut j = DMatrix::zeros(2, 2);
            j[(0, 0)] = 2.0 / lam3 * (1.0 + 4.0 * zn * b_n + 2.0 * zp * b_pn) / nn;
            j[(0, 1)] = 2.0 / lam3 * (2.0 * zn * b_pn) / nn;
            j[(1, 0)] = 2.0 / lam3 * (2.0 * zp * b_pn) / pn;
            j[(1, 1)] = 2.0 / lam3 * (1.0 + 4.0 * zp * b_n + 2.0 * zn * b_pn) / pn;
            Ok(j)
        };

        let cfg = NewtonConfig {
            abs_tol: 1e-13,
            rel_tol: 0.0,
            min_component: Some(0.0),
            ..Default::default()
        };
        let result = newton_solve(x0, residual, jacobian, &cfg).map_err(|_| {
            MatterError::ConvergenceFailed {
                what: "virial fugacity solve",
            }
        })?;
        Ok((result.x[0], result.x[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(nn: f64, pn: f64, t_mev: f64) -> VirialState {
        VirialModel::default()
            .state(nn, pn, t_mev / HC_MEV_FM)
            .unwrap()
    }

    #[test]
    fn coefficients_match_scattering_scale() {
        let fit = VirialCoefficientFit::default();
        // Horowitz & Schwenk values: b_n(5 MeV) ≈ 0.306, b_pn dominated by
        // the quasi-deuteron at low T
        assert!((fit.bn(5.0) - 0.306).abs() < 0.01);
        assert!(fit.bpn(5.0) > 1.0);
        // numerical derivative agreement
        let h = 1e-5;
        let num = (fit.bn(10.0 + h) - fit.bn(10.0 - h)) / (2.0 * h);
        assert!((fit.dbn_dt(10.0) - num).abs() < 1e-9);
        let num = (fit.bpn(10.0 + h) - fit.bpn(10.0 - h)) / (2.0 * h);
        assert!((fit.dbpn_dt(10.0) - num).abs() < 1e-9);
    }

    #[test]
    fn fugacities_reproduce_densities() {
        let t = 5.0 / HC_MEV_FM;
        let fit = VirialCoefficientFit::default();
        let (b_n, b_pn) = (fit.bn(5.0), fit.bpn(5.0));
        let lam = (4.0 * PI / ((M_NEUTRON + M_PROTON) * t)).sqrt();
        let lam3 = lam.powi(3);
        let st = state(1e-4, 5e-5, 5.0);
        let nn = 2.0 / lam3 * (st.zn + 2.0 * st.zn * st.zn * b_n + 2.0 * st.zn * st.zp * b_pn);
        let pn = 2.0 / lam3 * (st.zp + 2.0 * st.zp * st.zp * b_n + 2.0 * st.zn * st.zp * b_pn);
        assert!((nn / 1e-4 - 1.0).abs() < 1e-10);
        assert!((pn / 5e-5 - 1.0).abs() < 1e-10);
    }

    #[test]
    fn chemical_potentials_are_free_energy_derivatives() {
        for &(nn, pn, t_mev) in &[
            (1e-4, 1e-4, 5.0),
            (2e-3, 1e-3, 10.0),
            (1e-8, 1e-8, 0.1),
            (0.05, 5e-4, 10.0),
        ] {
            let st = state(nn, pn, t_mev);
            let h = nn * 1e-5;
            let num = (state(nn + h, pn, t_mev).free_energy
                - state(nn - h, pn, t_mev).free_energy)
                / (2.0 * h);
            assert!(
                (st.mu_n / num - 1.0).abs() < 1e-6,
                "mu_n at ({nn},{pn},{t_mev})"
            );
            let h = pn * 1e-5;
            let num = (state(nn, pn + h, t_mev).free_energy
                - state(nn, pn - h, t_mev).free_energy)
                / (2.0 * h);
            assert!(
                (st.mu_p / num - 1.0).abs() < 1e-6,
                "mu_p at ({nn},{pn},{t_mev})"
            );
        }
    }

    #[test]
    fn entropy_is_temperature_derivative() {
        let (nn, pn, t_mev) = (2e-3, 1e-3, 10.0);
        let st = state(nn, pn, t_mev);
        let t = t_mev / HC_MEV_FM;
        let h = t * 1e-5;
        let num = -(VirialModel::default().state(nn, pn, t + h).unwrap().free_energy
            - VirialModel::default().state(nn, pn, t - h).unwrap().free_energy)
            / (2.0 * h);
        assert!((st.entropy / num - 1.0).abs() < 1e-6);
    }

    #[test]
    fn derivative_set_matches_finite_differences() {
        let (nn, pn, t_mev) = (1e-3, 5e-4, 8.0);
        let st = state(nn, pn, t_mev);
        let h = nn * 1e-5;
        let num = (state(nn + h, pn, t_mev).mu_n - state(nn - h, pn, t_mev).mu_n) / (2.0 * h);
        assert!((st.dmun_dnn / num - 1.0).abs() < 1e-5);
        let t = t_mev / HC_MEV_FM;
        let ht = t * 1e-5;
        let num = (VirialModel::default().state(nn, pn, t + ht).unwrap().mu_n
            - VirialModel::default().state(nn, pn, t - ht).unwrap().mu_n)
            / (2.0 * ht);
        assert!((st.dmun_dt / num - 1.0).abs() < 1e-5);
    }

    #[test]
    fn classical_branch_is_ideal_gas() {
        // n·λ³ below threshold on both species: P = nb·T exactly
        let st = state(1e-10, 1e-10, 1.0);
        let t = 1.0 / HC_MEV_FM;
        assert!((st.pressure / (2e-10 * t) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn very_degenerate_point_still_solves() {
        // validator corner: nb = 2 fm⁻³ at T = 1 MeV
        let st = state(1.95, 0.05, 1.0);
        assert!(st.zn > 0.0 && st.zp > 0.0);
        assert!(st.free_energy.is_finite());
    }

    #[test]
    fn rejects_zero_density() {
        assert!(VirialModel::default().state(0.0, 1e-3, 0.01).is_err());
    }
}
