//! Skyrme-type energy-density functional for homogeneous matter.
//!
//! Standard (t0, t1, t2, t3, x0..x3, α) parametrization. Zero-temperature
//! evaluation is closed form; finite temperature treats each species as an
//! ideal gas of effective-mass fermions whose effective chemical potential
//! is solved from the density (see `fermion`).
//!
//! Gradient and spin-orbit couplings vanish in uniform matter; they ride
//! along in the saturation-row data but never enter these formulas.

use crate::error::{MatterError, MatterResult};
use crate::fermion::nonrel_gas;
use nm_core::constants::{M_NEUTRON, M_PROTON};
use std::f64::consts::PI;

const M_BAR: f64 = 0.5 * (M_NEUTRON + M_PROTON);

/// Skyrme couplings in natural units (t0 fm², t1/t2 fm⁴, t3 fm^(2+3α)).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkyrmeParameters {
    pub t0: f64,
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
    pub x0: f64,
    pub x1: f64,
    pub x2: f64,
    pub x3: f64,
    pub alpha: f64,
}

/// Result of one functional evaluation (no rest masses).
#[derive(Clone, Copy, Debug)]
pub struct FunctionalPoint {
    /// Energy density, fm⁻⁴
    pub energy: f64,
    /// Entropy density, fm⁻³ (zero for a T=0 evaluation)
    pub entropy: f64,
    /// Neutron chemical potential, fm⁻¹
    pub mu_n: f64,
    /// Proton chemical potential, fm⁻¹
    pub mu_p: f64,
}

impl FunctionalPoint {
    /// Free energy density f = e − T·s, fm⁻⁴.
    pub fn free_energy(&self, t: f64) -> f64 {
        self.energy - t * self.entropy
    }
}

/// Saturation-point inputs for `SkyrmeParameters::from_saturation`.
///
/// Energies in fm⁻¹, density in fm⁻³, effective masses as ratios m*/m.
#[derive(Clone, Copy, Debug)]
pub struct SaturationInputs {
    pub n0: f64,
    pub eoa: f64,
    pub k_inf: f64,
    pub msom: f64,
    pub sym_energy: f64,
    pub sym_slope: f64,
    /// Pure-neutron-matter effective-mass ratio at n0 (isovector channel).
    pub msom_vec: f64,
}

impl SkyrmeParameters {
    /// The frozen finite-temperature-correction functional.
    pub const fn finite_t_correction() -> Self {
        Self {
            t0: 5.067286719233e3,
            t1: 1.749251370992e0,
            t2: -4.721193938990e-1,
            t3: -1.945964529505e5,
            x0: 4.197555064408e1,
            x1: -6.947915483747e-2,
            x2: 4.192016722695e-1,
            x3: -2.877974634128e1,
            alpha: 0.144165,
        }
    }

    /// Invert saturation-point properties into couplings.
    ///
    /// α follows from the incompressibility, (t0, t3) from the binding
    /// energy and the saturation condition, (x0, x3) from the symmetry
    /// energy and its slope, and the kinetic couplings from the isoscalar
    /// and pure-neutron effective masses. The x1 = x2 = 0 split is used:
    /// homogeneous matter only feels the two kinetic combinations.
    pub fn from_saturation(inp: &SaturationInputs) -> MatterResult<Self> {
        let SaturationInputs {
            n0,
            eoa,
            k_inf,
            msom,
            sym_energy,
            sym_slope,
            msom_vec,
        } = *inp;
        if !(n0 > 0.0 && msom > 0.0 && msom_vec > 0.0) {
            return Err(MatterError::NonPhysical {
                what: "saturation inputs",
            });
        }

        let kf0 = (1.5 * PI * PI * n0).powf(1.0 / 3.0);
        let tf = 0.6 * kf0 * kf0 / (2.0 * M_BAR);
        let theta = 8.0 * (1.0 / msom - 1.0) / (M_BAR * n0);
        let g = (3.0 / 80.0) * theta * kf0 * kf0 * n0;

        let denom = 3.0 * tf - 6.0 * g - 9.0 * eoa;
        if denom.abs() < 1e-14 {
            return Err(MatterError::NonPhysical {
                what: "saturation inversion is singular",
            });
        }
        let alpha = (k_inf + 2.0 * tf - 10.0 * g) / denom - 1.0;
        if alpha.abs() < 1e-12 {
            return Err(MatterError::NonPhysical {
                what: "density-dependent exponent",
            });
        }
        let y = (tf / 3.0 - 2.0 * g / 3.0 - eoa) / alpha;
        let t3 = 16.0 * y / n0.powf(1.0 + alpha);
        let x = eoa - tf - g - y;
        let t0 = (8.0 / 3.0) * x / n0;

        let theta_n = (1.0 / msom_vec - 1.0) / (2.0 * M_BAR * n0);
        let theta_a = theta / 8.0 - theta_n;
        let theta_b = 2.0 * theta_n - theta / 8.0;
        let t1 = 2.0 * theta_a - 4.0 * theta_b;
        let t2 = 2.0 * theta_a + 4.0 * theta_b;

        // pure-neutron-matter potential couplings from S and L
        let cp = 0.6 * (3.0 * PI * PI).powf(2.0 / 3.0) / (2.0 * M_BAR);
        let cn = 0.6 * (3.0 * PI * PI).powf(2.0 / 3.0) * theta_n;
        let r1 = sym_energy + eoa - cp * n0.powf(2.0 / 3.0) - cn * n0.powf(5.0 / 3.0);
        let r2 = sym_slope / 3.0
            - (2.0 / 3.0) * cp * n0.powf(2.0 / 3.0)
            - (5.0 / 3.0) * cn * n0.powf(5.0 / 3.0);
        let v = (r2 - r1) / alpha;
        let u = (r1 - v) / n0;
        let v = v / n0.powf(1.0 + alpha);
        let x0 = 1.0 - 4.0 * u / t0;
        let x3 = 1.0 - 24.0 * v / t3;

        Ok(Self {
            t0,
            t1,
            t2,
            t3,
            x0,
            x1: 0.0,
            x2: 0.0,
            x3,
            alpha,
        })
    }

    /// Isoscalar kinetic coupling (the `ρ·τ` combination).
    fn theta_a(&self) -> f64 {
        0.25 * (self.t1 * (1.0 + self.x1 / 2.0) + self.t2 * (1.0 + self.x2 / 2.0))
    }

    /// Species kinetic coupling (the `ρ_q·τ_q` combination).
    fn theta_b(&self) -> f64 {
        0.25 * (self.t2 * (0.5 + self.x2) - self.t1 * (0.5 + self.x1))
    }

    fn inv_2mstar(&self, m: f64, rho: f64, rho_q: f64) -> f64 {
        1.0 / (2.0 * m) + self.theta_a() * rho + self.theta_b() * rho_q
    }

    /// Effective masses (fm⁻¹) at the given densities. May be negative for
    /// unphysical couplings; the selector checks the sign.
    pub fn effective_masses(&self, nn: f64, pn: f64) -> (f64, f64) {
        let rho = nn + pn;
        let msn =
            M_NEUTRON / (1.0 + 2.0 * M_NEUTRON * (self.theta_a() * rho + self.theta_b() * nn));
        let msp =
            M_PROTON / (1.0 + 2.0 * M_PROTON * (self.theta_a() * rho + self.theta_b() * pn));
        (msn, msp)
    }

    fn h0(&self, nn: f64, pn: f64) -> f64 {
        let rho = nn + pn;
        let sq = nn * nn + pn * pn;
        (self.t0 / 2.0) * ((1.0 + self.x0 / 2.0) * rho * rho - (self.x0 + 0.5) * sq)
            + (self.t3 / 12.0)
                * rho.powf(self.alpha)
                * ((1.0 + self.x3 / 2.0) * rho * rho - (self.x3 + 0.5) * sq)
    }

    fn dh0(&self, nn: f64, pn: f64) -> (f64, f64) {
        let rho = nn + pn;
        let sq = nn * nn + pn * pn;
        let quad = |nq: f64| {
            self.t0 * ((1.0 + self.x0 / 2.0) * rho - (self.x0 + 0.5) * nq)
                + (self.t3 / 12.0)
                    * (self.alpha
                        * rho.powf(self.alpha - 1.0)
                        * ((1.0 + self.x3 / 2.0) * rho * rho - (self.x3 + 0.5) * sq)
                        + rho.powf(self.alpha)
                            * (2.0 * (1.0 + self.x3 / 2.0) * rho
                                - 2.0 * (self.x3 + 0.5) * nq))
        };
        (quad(nn), quad(pn))
    }

    /// Zero-temperature evaluation.
    pub fn eval_t0(&self, nn: f64, pn: f64) -> FunctionalPoint {
        let rho = nn + pn;
        let kfn2 = if nn > 0.0 {
            (3.0 * PI * PI * nn).powf(2.0 / 3.0)
        } else {
            0.0
        };
        let kfp2 = if pn > 0.0 {
            (3.0 * PI * PI * pn).powf(2.0 / 3.0)
        } else {
            0.0
        };
        let tau_n = 0.6 * kfn2 * nn;
        let tau_p = 0.6 * kfp2 * pn;
        let i2n = self.inv_2mstar(M_NEUTRON, rho, nn);
        let i2p = self.inv_2mstar(M_PROTON, rho, pn);
        let (dh0n, dh0p) = self.dh0(nn, pn);
        let ta = self.theta_a();
        let tb = self.theta_b();
        FunctionalPoint {
            energy: tau_n * i2n + tau_p * i2p + self.h0(nn, pn),
            entropy: 0.0,
            mu_n: kfn2 * i2n + tau_n * (ta + tb) + tau_p * ta + dh0n,
            mu_p: kfp2 * i2p + tau_p * (ta + tb) + tau_n * ta + dh0p,
        }
    }

    /// Finite-temperature evaluation.
    ///
    /// A zero-density species contributes nothing and reports only the
    /// potential part of its chemical potential.
    pub fn eval_finite_t(&self, nn: f64, pn: f64, t: f64) -> MatterResult<FunctionalPoint> {
        let rho = nn + pn;
        let (msn, msp) = self.effective_masses(nn, pn);
        if (nn > 0.0 && msn <= 0.0) || (pn > 0.0 && msp <= 0.0) {
            return Err(MatterError::NonPhysical {
                what: "negative effective mass",
            });
        }
        let gas_n = nonrel_gas(msn, nn, t)?;
        let gas_p = nonrel_gas(msp, pn, t)?;
        let i2n = self.inv_2mstar(M_NEUTRON, rho, nn);
        let i2p = self.inv_2mstar(M_PROTON, rho, pn);
        let (dh0n, dh0p) = self.dh0(nn, pn);
        let ta = self.theta_a();
        let tb = self.theta_b();
        Ok(FunctionalPoint {
            energy: gas_n.tau * i2n + gas_p.tau * i2p + self.h0(nn, pn),
            entropy: gas_n.entropy + gas_p.entropy,
            mu_n: gas_n.nu + gas_n.tau * (ta + tb) + gas_p.tau * ta + dh0n,
            mu_p: gas_p.nu + gas_p.tau * (ta + tb) + gas_n.tau * ta + dh0p,
        })
    }
}
