//! Sound speeds from numerical second derivatives of the free energy.
//!
//! The analytic first derivatives (chemical potentials, entropy) are
//! differentiated once more numerically, then combined through the exact
//! thermodynamic determinants for fixed proton fraction or fixed lepton
//! chemical potential.

use crate::eos::Eos;
use crate::error::{EosError, EosResult};
use crate::state::CompositionPoint;
use nm_solver::{deriv_rel, SolverError, SolverResult};

/// Relative step for the second-derivative stencils.
const REL_STEP: f64 = 1.0e-3;

fn wrap(e: EosError) -> SolverError {
    SolverError::Numeric {
        what: e.to_string(),
    }
}

fn d5<F>(f: F, x: f64) -> EosResult<f64>
where
    F: Fn(f64) -> EosResult<f64>,
{
    let g = |v: f64| -> SolverResult<f64> { f(v).map_err(wrap) };
    Ok(deriv_rel(g, x, REL_STEP, 0.0)?)
}

struct SecondDerivs {
    dfdnb_dt: f64,
    dfdne_dt: f64,
    dfdnb_dne: f64,
    dfdt_dt: f64,
    dfdnb_dnb: f64,
    dfdne_dne: f64,
}

impl Eos {
    fn second_derivs(&self, nn: f64, pn: f64, t: f64) -> EosResult<SecondDerivs> {
        let dfdnn_dnn = d5(|x| self.dfdnn_total(x, pn, t), nn)?;
        let dfdnn_dpn = d5(|x| self.dfdnn_total(nn, x, t), pn)?;
        let dfdnn_dt = d5(|x| self.dfdnn_total(nn, pn, x), t)?;
        let dfdpn_dnn = d5(|x| self.dfdpn_total(x, pn, t), nn)?;
        let dfdpn_dpn = d5(|x| self.dfdpn_total(nn, x, t), pn)?;
        let dfdpn_dt = d5(|x| self.dfdpn_total(nn, pn, x), t)?;
        let ds_dt = d5(|x| self.entropy_at(nn, pn, x), t)?;

        // change of variables (nn, pn) → (nb, ne): nb = nn + pn, ne = pn
        Ok(SecondDerivs {
            dfdnb_dt: dfdnn_dt,
            dfdne_dt: dfdpn_dt - dfdnn_dt,
            dfdnb_dne: dfdnn_dpn - dfdnn_dnn,
            dfdt_dt: -ds_dt,
            dfdnb_dnb: dfdnn_dnn,
            dfdne_dne: dfdpn_dpn + dfdnn_dnn - dfdpn_dnn - dfdnn_dpn,
        })
    }

    /// Squared sound speed at fixed proton fraction.
    pub fn cs2_fixed_ye(&self, point: &CompositionPoint) -> EosResult<f64> {
        let (nn, pn, t) = (point.nn(), point.pn(), point.t());
        let d = self.second_derivs(nn, pn, t)?;

        let nb = nn + pn;
        let ne = pn;
        let mub = self.dfdnn_total(nn, pn, t)?;
        let mul = self.dfdpn_total(nn, pn, t)? - mub;
        let s = self.entropy_at(nn, pn, t)?;
        let ed = self.energy_at(nn, pn, t)?;

        let dp_dnb = d.dfdnb_dnb * nb + d.dfdnb_dne * ne;
        let dp_dne = d.dfdnb_dne * nb + d.dfdne_dne * ne;
        let dp_dt = d.dfdnb_dt * nb + d.dfdne_dt * ne + s;
        let pr = mul * ne + mub * nb + t * s - ed;

        Ok(
            (-nb * dp_dnb * d.dfdt_dt - ne * dp_dne * d.dfdt_dt
                + dp_dt * (d.dfdnb_dt * nb + d.dfdne_dt * ne + s))
                / ((pr + ed) * (-d.dfdt_dt)),
        )
    }

    /// Squared sound speed at fixed lepton chemical potential.
    pub fn cs2_fixed_mul(&self, point: &CompositionPoint) -> EosResult<f64> {
        let (nn, pn, t) = (point.nn(), point.pn(), point.t());
        let d = self.second_derivs(nn, pn, t)?;

        let nb = nn + pn;
        let ne = pn;
        let mub = self.dfdnn_total(nn, pn, t)?;
        let mul = self.dfdpn_total(nn, pn, t)? - mub;
        let s = self.entropy_at(nn, pn, t)?;
        let ed = self.energy_at(nn, pn, t)?;

        // entropy derivatives at fixed μ_l and fixed baryon number
        let ds_dt_mul = (-d.dfdt_dt * d.dfdne_dne + d.dfdne_dt * d.dfdne_dt) / d.dfdne_dne;
        let ds_dv_mul = (s * d.dfdne_dne + d.dfdne_dt * d.dfdne_dne * ne
            + d.dfdnb_dt * d.dfdne_dne * nb
            - d.dfdne_dt * d.dfdne_dne * ne
            - d.dfdne_dt * d.dfdnb_dne * nb)
            / d.dfdne_dne;

        let dp_dv_t = (-d.dfdnb_dnb * d.dfdne_dne + d.dfdnb_dne * d.dfdnb_dne) * nb * nb
            / d.dfdne_dne;
        let dp_dt_v = ds_dv_mul;

        // adiabatic pressure derivative
        let dp_dv_s = (dp_dv_t * ds_dt_mul - dp_dt_v * ds_dv_mul) / ds_dt_mul;

        let dne_dv_s = (d.dfdt_dt * (d.dfdne_dne * ne + d.dfdnb_dne * nb)
            - (d.dfdne_dt * ne + d.dfdnb_dt * nb) * d.dfdne_dt)
            / (-d.dfdne_dt * d.dfdne_dt + d.dfdt_dt * d.dfdne_dne);

        let pr = mul * ne + mub * nb + t * s - ed;
        let ded_dv_s = -pr - ed + mul * dne_dv_s;

        Ok(dp_dv_s / ded_dv_s)
    }
}
