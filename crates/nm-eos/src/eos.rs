//! The blended free-energy evaluation and its analytic derivatives.
//!
//! One call stitches four sub-models together:
//! virial (low density) ↔ degenerate (functional-based), weighted by the
//! fugacity blend g; inside the degenerate side, QMC ↔ neutron-star
//! energies weighted by the density blend h form the effective symmetry
//! energy. Chemical potentials and entropy come from the product rule
//! applied to the blend expression, never from numerical differentiation.

use crate::blend::BlendParameters;
use crate::error::EosResult;
use crate::state::{CompositionPoint, EosPoint};
use nm_matter::{
    ElectronPhotonGas, NsModel, QmcModel, SkyrmeParameters, VirialModel,
};
use tracing::trace;

/// The tunable inputs of one model selection.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelInput {
    /// Neutron-star table row.
    pub i_ns: usize,
    /// Functional table row.
    pub i_skyrme: usize,
    /// QMC kinetic-like exponent.
    pub qmc_alpha: f64,
    /// QMC kinetic-like coefficient, MeV.
    pub qmc_a: f64,
    /// Symmetry energy S, MeV.
    pub eos_s: f64,
    /// Symmetry-energy slope L, MeV.
    pub eos_l: f64,
    /// Target squared sound speed at 2 fm⁻³.
    pub phi: f64,
}

/// Derived bookkeeping for a validated selection.
#[derive(Clone, Copy, Debug)]
pub struct ModelSelection {
    pub input: ModelInput,
    /// Saturation density of the selected functional row, fm⁻³.
    pub eos_n0: f64,
    /// Binding energy of the selected row, MeV.
    pub eos_eoa: f64,
    /// Incompressibility of the selected row, MeV.
    pub eos_k: f64,
    /// Derived QMC coefficient b, MeV.
    pub qmc_b: f64,
    /// Derived QMC exponent β.
    pub qmc_beta: f64,
}

/// A validated, immutable blended EOS.
///
/// Constructed only through `select` (or `select_random`); every field is
/// frozen afterwards, so evaluation is a pure function and the value is
/// safe to share across threads.
#[derive(Clone, Debug)]
pub struct Eos {
    pub(crate) qmc: QmcModel,
    /// Base functional, configured from the selected saturation row.
    pub(crate) sk: SkyrmeParameters,
    /// Frozen finite-temperature-correction functional.
    pub(crate) sk_corr: SkyrmeParameters,
    pub(crate) virial: VirialModel,
    pub(crate) ns: NsModel,
    pub(crate) blend: BlendParameters,
    pub(crate) leptons: ElectronPhotonGas,
    pub(crate) selection: ModelSelection,
}

impl Eos {
    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    pub fn blend(&self) -> &BlendParameters {
        &self.blend
    }

    pub fn ns_model(&self) -> &NsModel {
        &self.ns
    }

    /// Replace the blend parameters, consuming the model (copy-on-modify;
    /// in-flight evaluations keep the value they started with).
    pub fn with_blend(mut self, blend: BlendParameters) -> Self {
        self.blend = blend;
        self
    }

    /// Evaluate the blended free energy with all analytic derivatives.
    pub fn evaluate(&self, point: &CompositionPoint) -> EosResult<EosPoint> {
        let (nn, pn, t) = (point.nn(), point.pn(), point.t());
        let nb = nn + pn;
        let ye = pn / nb;

        // virial side, with the six chemical-potential derivatives
        let vs = self.virial.state(nn, pn, t)?;
        let f_virial = vs.free_energy;
        let s_virial = vs.entropy;
        let dfvirial_dt = -s_virial;
        let (zn, zp) = (vs.zn, vs.zp);
        let av = self.blend.a_virial;
        let bv = self.blend.b_virial;
        let g = self.blend.g(zn, zp);

        // base functional: symmetric matter at T = 0
        let sk0 = self.sk.eval_t0(nb / 2.0, nb / 2.0);
        let f_sk0 = sk0.energy;

        // correction functional: symmetric matter at T and T = 0
        let eq_t = self.sk_corr.eval_finite_t(nb / 2.0, nb / 2.0, t)?;
        let f_eqden_t = eq_t.free_energy(t);
        let s_eqden_t = eq_t.entropy;
        let eq_t0 = self.sk_corr.eval_t0(nb / 2.0, nb / 2.0);
        let f_eqden_t0 = eq_t0.energy;

        // correction functional: pure neutron matter at T and T = 0
        let neut_t = self.sk_corr.eval_finite_t(nb, 0.0, t)?;
        let f_neut_t = neut_t.free_energy(t);
        let s_neut_t = neut_t.entropy;
        let neut_t0 = self.sk_corr.eval_t0(nb, 0.0);
        let f_neut_t0 = neut_t0.energy;

        // QMC and neutron-star energies
        let e_qmc = self.qmc.energy_density(nn, pn);
        let (e_ns, densdnn) = self.ns.energy_density(nb)?;

        // effective symmetry energy from the h-blended QMC/NS combination
        let h = self.blend.h(nb);
        let e_combine = e_qmc * h + e_ns * (1.0 - h);
        let e_sym = e_combine - f_sk0;
        let dye_dnn = -pn / (nb * nb);
        let dye_dpn = nn / (nb * nb);
        let delta2 = (1.0 - 2.0 * ye) * (1.0 - 2.0 * ye);
        let ddelta2_dnn = 2.0 * (1.0 - 2.0 * ye) * (-2.0 * dye_dnn);
        let ddelta2_dpn = 2.0 * (1.0 - 2.0 * ye) * (-2.0 * dye_dpn);

        let f_deg = f_sk0
            + delta2 * e_sym
            + delta2 * (f_neut_t - f_neut_t0)
            + (1.0 - delta2) * (f_eqden_t - f_eqden_t0);
        let f_total = f_virial * g + f_deg * (1.0 - g);

        // ------------------------------------------------------------------
        // chemical potentials

        let pre = -g * g;
        let dg_dnn = pre
            * (2.0 * av * zn * zn / t * vs.dmun_dnn
                + 2.0 * av * zp * zp / t * vs.dmup_dnn
                + bv * zn * zp / t * vs.dmun_dnn
                + bv * zn * zp / t * vs.dmup_dnn);
        let dg_dpn = pre
            * (2.0 * av * zn * zn / t * vs.dmun_dpn
                + 2.0 * av * zp * zp / t * vs.dmup_dpn
                + bv * zn * zp / t * vs.dmun_dpn
                + bv * zn * zp / t * vs.dmup_dpn);

        let dfsk0_dnn = (sk0.mu_n + sk0.mu_p) / 2.0;
        let dfsk0_dpn = dfsk0_dnn;

        let dh_dnn = self.blend.dh_dnb(nb);

        let desym_dnn = self.qmc.denergy_dn(nn, pn) * h + e_qmc * dh_dnn
            + densdnn * (1.0 - h)
            - e_ns * dh_dnn
            - dfsk0_dpn / 2.0
            - dfsk0_dnn / 2.0;
        let desym_dpn = desym_dnn;

        let dfdeg_dnn = dfsk0_dnn
            + delta2 * desym_dnn
            + ddelta2_dnn * e_sym
            + delta2 * (neut_t.mu_n - neut_t0.mu_n)
            + ddelta2_dnn * (f_neut_t - f_neut_t0)
            + (1.0 - delta2)
                * (eq_t.mu_n / 2.0 + eq_t.mu_p / 2.0 - eq_t0.mu_n / 2.0 - eq_t0.mu_p / 2.0)
            - ddelta2_dnn * (f_eqden_t - f_eqden_t0);
        let dfdeg_dpn = dfsk0_dpn
            + delta2 * desym_dpn
            + ddelta2_dpn * e_sym
            + delta2 * (neut_t.mu_n - neut_t0.mu_n)
            + ddelta2_dpn * (f_neut_t - f_neut_t0)
            + (1.0 - delta2)
                * (eq_t.mu_p / 2.0 + eq_t.mu_n / 2.0 - eq_t0.mu_p / 2.0 - eq_t0.mu_n / 2.0)
            - ddelta2_dpn * (f_eqden_t - f_eqden_t0);

        let mu_n = vs.mu_n * g + f_virial * dg_dnn + dfdeg_dnn * (1.0 - g) + f_deg * (-dg_dnn);
        let mu_p = vs.mu_p * g + f_virial * dg_dpn + dfdeg_dpn * (1.0 - g) + f_deg * (-dg_dpn);

        // ------------------------------------------------------------------
        // entropy

        let dg_dt = pre
            * (2.0 * av * zn * zn * vs.dmun_dt / t - 2.0 * av * zn * zn * vs.mu_n / (t * t)
                + 2.0 * av * zp * zp * vs.dmup_dt / t
                - 2.0 * av * zp * zp * vs.mu_p / (t * t)
                + bv * zn * zp * vs.dmun_dt / t
                + bv * zn * zp * vs.dmup_dt / t
                - bv * zn * zp * vs.mu_n / (t * t)
                - bv * zn * zp * vs.mu_p / (t * t));

        let dfdeg_dt = delta2 * (-s_neut_t) + (1.0 - delta2) * (-s_eqden_t);
        let entropy =
            -(dfvirial_dt * g + f_virial * dg_dt + dfdeg_dt * (1.0 - g) + f_deg * (-dg_dt));
        let pressure = -f_total + nn * mu_n + pn * mu_p;
        let energy = f_total + t * entropy;

        trace!(
            nb,
            ye,
            g_virial = g,
            h_qmc = h,
            f_total,
            "evaluated blended free energy"
        );

        Ok(EosPoint {
            free_energy: f_total,
            energy,
            pressure,
            entropy,
            mu_n,
            mu_p,
            g_virial: g,
            dg_dt,
            h_qmc: h,
            f_virial,
            s_virial,
            f_degenerate: f_deg,
        })
    }

    /// Free energy at explicit (nn, pn, T); convenience for differentiation.
    pub fn free_energy_density(&self, nn: f64, pn: f64, t: f64) -> EosResult<f64> {
        Ok(self.evaluate(&CompositionPoint::new(nn, pn, t)?)?.free_energy)
    }

    /// Entropy density including electrons, positrons, and photons.
    pub fn entropy(&self, point: &CompositionPoint) -> EosResult<f64> {
        let r = self.evaluate(point)?;
        let lep = self.leptons.eval(point.pn(), point.t())?;
        Ok(r.entropy + lep.entropy)
    }

    /// Energy density including leptons, photons, and nucleon rest masses.
    pub fn energy_density(&self, point: &CompositionPoint) -> EosResult<f64> {
        let r = self.evaluate(point)?;
        let lep = self.leptons.eval(point.pn(), point.t())?;
        Ok(r.energy
            + lep.energy
            + nm_core::constants::M_NEUTRON * point.nn()
            + nm_core::constants::M_PROTON * point.pn())
    }

    /// Total free energy including leptons and photons (no rest masses on
    /// the nucleon side, rest mass included in the electron sector).
    pub fn free_energy_with_leptons(&self, point: &CompositionPoint) -> EosResult<f64> {
        let r = self.evaluate(point)?;
        let lep = self.leptons.eval(point.pn(), point.t())?;
        Ok(r.free_energy + lep.free_energy(point.t()))
    }

    /// ∂f_total/∂nn with rest mass: the total baryon-sector derivative used
    /// by the sound-speed determinants.
    pub(crate) fn dfdnn_total(&self, nn: f64, pn: f64, t: f64) -> EosResult<f64> {
        let r = self.evaluate(&CompositionPoint::new(nn, pn, t)?)?;
        Ok(r.mu_n + nm_core::constants::M_NEUTRON)
    }

    /// ∂f_total/∂pn with rest mass and the electron contribution (the
    /// electron density is tied to the proton density).
    pub(crate) fn dfdpn_total(&self, nn: f64, pn: f64, t: f64) -> EosResult<f64> {
        let r = self.evaluate(&CompositionPoint::new(nn, pn, t)?)?;
        let lep = self.leptons.eval(pn, t)?;
        Ok(r.mu_p + lep.mu_e + nm_core::constants::M_PROTON)
    }

    /// Total entropy density at explicit coordinates (for differentiation).
    pub(crate) fn entropy_at(&self, nn: f64, pn: f64, t: f64) -> EosResult<f64> {
        self.entropy(&CompositionPoint::new(nn, pn, t)?)
    }

    /// Total energy density at explicit coordinates (for differentiation).
    pub(crate) fn energy_at(&self, nn: f64, pn: f64, t: f64) -> EosResult<f64> {
        self.energy_density(&CompositionPoint::new(nn, pn, t)?)
    }
}
