//! Model validation and selection.
//!
//! `Eos::select` derives every frozen sub-model from a `ModelInput` and
//! runs the physical-validity battery, returning one distinct rejection
//! code per failed check so retry loops never have to re-derive why.
//! `Eos::select_random` is the bounded-retry sampler over the same checks.

use crate::blend::BlendParameters;
use crate::eos::{Eos, ModelInput, ModelSelection};
use crate::error::{EosError, EosResult};
use crate::state::CompositionPoint;
use crate::tables::{FunctionalTable, NsTable};
use nm_core::constants::{HC_MEV_FM, M_NEUTRON, M_PROTON};
use nm_matter::{
    ElectronPhotonGas, NsModel, QmcModel, SaturationInputs, SkyrmeParameters, VirialModel,
};
use nm_solver::{brent, BrentConfig};
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// Empirical (S, L) corridor: lower·S − 266 ≤ L ≤ upper·S − 379.
/// Kept as configurable constants; the bounds are taken over unchanged
/// from the calibration they were extracted with.
pub const CORRIDOR_LOWER: (f64, f64) = (9.17, -266.0);
pub const CORRIDOR_UPPER: (f64, f64) = (14.3, -379.0);

/// Ceiling on the derived QMC exponent β.
pub const QMC_BETA_MAX: f64 = 5.0;

/// Fixed pure-neutron-matter effective-mass ratio of the functional fits.
const MSOM_VEC: f64 = 1.0 / 1.249;

/// Why a candidate model was rejected. One variant per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The raw neutron-star fit has negative cs² below its ceiling.
    AcausalNsFit,
    /// The causal-branch coefficient solve did not converge.
    ExtrapolationFailed,
    /// (S, L) outside the empirical corridor.
    SymmetryCorridor,
    /// Derived QMC coefficient b is negative.
    QmcCoefficientNegative,
    /// Derived QMC exponent β exceeds the ceiling.
    QmcBetaOutOfRange,
    /// Pure neutron matter is bound somewhere on the check grid.
    DineutronBound,
    /// Negative effective mass in symmetric matter at 2 fm⁻³.
    EffectiveMassSymmetric,
    /// Negative effective mass in neutron matter at 2 fm⁻³.
    EffectiveMassNeutron,
    /// Negative effective mass in proton matter at 2 fm⁻³.
    EffectiveMassProton,
    /// Beta-equilibrium solve failed to converge on the density grid.
    BetaEquilibriumFailed,
    /// Beta equilibrium produced an electron fraction outside [0, 1].
    BetaEquilibriumYe,
}

impl RejectionReason {
    /// Stable numeric code for logging and retry statistics.
    pub fn code(&self) -> u8 {
        match self {
            Self::AcausalNsFit => 1,
            Self::ExtrapolationFailed => 2,
            Self::SymmetryCorridor => 3,
            Self::QmcCoefficientNegative => 4,
            Self::QmcBetaOutOfRange => 5,
            Self::DineutronBound => 6,
            Self::EffectiveMassSymmetric => 7,
            Self::EffectiveMassNeutron => 8,
            Self::EffectiveMassProton => 9,
            Self::BetaEquilibriumFailed => 10,
            Self::BetaEquilibriumYe => 11,
        }
    }
}

/// Selection failure: a soft physical rejection, or a hard numeric error.
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("model rejected: {0:?} (code {})", .0.code())]
    Rejected(RejectionReason),

    #[error(transparent)]
    Numeric(#[from] EosError),
}

/// Knobs of the validation battery.
#[derive(Clone, Copy, Debug)]
pub struct SelectOptions {
    /// Run the fixed-Ye sound-speed grid check. A violation there is a
    /// fatal error, not a soft rejection.
    pub check_cs2_grid: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            check_cs2_grid: true,
        }
    }
}

impl Eos {
    /// Validate a candidate `ModelInput` against the reference tables and
    /// construct the frozen model.
    pub fn select(
        ns_table: &NsTable,
        fn_table: &FunctionalTable,
        input: ModelInput,
        options: &SelectOptions,
    ) -> Result<Eos, SelectError> {
        let ns_row = *ns_table.row(input.i_ns).map_err(SelectError::from)?;
        let sat = *fn_table.row(input.i_skyrme).map_err(SelectError::from)?;

        // (1) causal continuation; reject both an acausal raw fit and a
        // failed coefficient solve
        let ns = NsModel::new(ns_row, input.phi)
            .map_err(|_| SelectError::Rejected(RejectionReason::ExtrapolationFailed))?;
        let (cs2_min, _) = ns.fit.min_max_cs2();
        if cs2_min < 0.0 {
            return Err(SelectError::Rejected(RejectionReason::AcausalNsFit));
        }

        // (2) symmetry corridor
        let (s, l) = (input.eos_s, input.eos_l);
        if CORRIDOR_LOWER.0 * s + CORRIDOR_LOWER.1 > l
            || CORRIDOR_UPPER.0 * s + CORRIDOR_UPPER.1 < l
        {
            return Err(SelectError::Rejected(RejectionReason::SymmetryCorridor));
        }

        // (3) derive the remaining QMC parameters from S, L
        let qmc_b = s + sat.eoa - input.qmc_a;
        if qmc_b < 0.0 {
            return Err(SelectError::Rejected(RejectionReason::QmcCoefficientNegative));
        }
        let qmc_beta = (l / 3.0 - input.qmc_a * input.qmc_alpha) / qmc_b;
        if qmc_beta > QMC_BETA_MAX {
            return Err(SelectError::Rejected(RejectionReason::QmcBetaOutOfRange));
        }
        let qmc = QmcModel {
            alpha: input.qmc_alpha,
            beta: qmc_beta,
            a: input.qmc_a,
            b: qmc_b,
            n0: 0.16,
        };

        // (4) configure the base functional from the saturation row
        let sk = SkyrmeParameters::from_saturation(&SaturationInputs {
            n0: sat.rho0,
            eoa: sat.eoa / HC_MEV_FM,
            k_inf: sat.k_inf / HC_MEV_FM,
            msom: 1.0 / sat.ms_inv,
            sym_energy: s / HC_MEV_FM,
            sym_slope: l / HC_MEV_FM,
            msom_vec: MSOM_VEC,
        })
        .map_err(EosError::from)
        .map_err(SelectError::from)?;

        // dineutrons must not be bound
        let mut nb = 0.01;
        while nb < 0.16 {
            if sk.eval_t0(nb, 0.0).energy / nb < 0.0 {
                return Err(SelectError::Rejected(RejectionReason::DineutronBound));
            }
            nb += 0.001;
        }

        // effective masses at the three reference compositions
        for (nn, pn, reason) in [
            (1.0, 1.0, RejectionReason::EffectiveMassSymmetric),
            (2.0, 0.0, RejectionReason::EffectiveMassNeutron),
            (0.0, 2.0, RejectionReason::EffectiveMassProton),
        ] {
            let (msn, msp) = sk.effective_masses(nn, pn);
            if msn < 0.0 || msp < 0.0 {
                return Err(SelectError::Rejected(reason));
            }
        }

        let eos = Eos {
            qmc,
            sk,
            sk_corr: SkyrmeParameters::finite_t_correction(),
            virial: VirialModel::default(),
            ns,
            blend: BlendParameters {
                n0: 0.16,
                ..Default::default()
            },
            leptons: ElectronPhotonGas,
            selection: ModelSelection {
                input,
                eos_n0: sat.rho0,
                eos_eoa: sat.eoa,
                eos_k: sat.k_inf,
                qmc_b,
                qmc_beta,
            },
        };

        // (5) beta equilibrium at T = 1 MeV across the density grid
        let t_beta = 1.0 / HC_MEV_FM;
        let mut nbx = 0.1;
        while nbx < 2.00001 {
            match eos.beta_eq_ye(nbx, t_beta, 0.0) {
                Ok(ye) => {
                    if !(0.0..=1.0).contains(&ye) {
                        return Err(SelectError::Rejected(RejectionReason::BetaEquilibriumYe));
                    }
                }
                Err(_) => {
                    return Err(SelectError::Rejected(RejectionReason::BetaEquilibriumFailed));
                }
            }
            nbx += 0.05;
        }

        // (6) optional sound-speed grid; violations are fatal
        if options.check_cs2_grid {
            eos.check_cs2_grid()?;
        }

        debug!(?input, "model selection accepted");
        Ok(eos)
    }

    /// Solve beta equilibrium: the electron fraction at which
    /// μ_n − μ_p − μ_e + μ_L + (m_n − m_p) = 0.
    pub fn beta_eq_ye(&self, nb: f64, t: f64, mu_l: f64) -> EosResult<f64> {
        let resid = |ye: f64| -> Result<f64, nm_solver::SolverError> {
            let nn = nb * (1.0 - ye);
            let pn = nb * ye;
            let r = self
                .evaluate(&CompositionPoint::new(nn, pn, t).map_err(wrap_solver)?)
                .map_err(wrap_solver)?;
            let lep = self.leptons.eval(pn, t).map_err(|e| wrap_solver(e.into()))?;
            Ok(r.mu_n - r.mu_p - lep.mu_e + mu_l + (M_NEUTRON - M_PROTON))
        };
        let cfg = BrentConfig {
            max_iterations: 100,
            x_tol: 1e-12,
            f_tol: 0.0,
        };
        Ok(brent(resid, 1e-6, 0.6, &cfg)?)
    }

    /// Verify cs² ≥ 0 at fixed Ye over the validation grid.
    pub(crate) fn check_cs2_grid(&self) -> Result<(), SelectError> {
        let mut nbx = 0.1;
        while nbx < 2.00001 {
            let mut yex = 0.05;
            while yex < 0.4501 {
                for t_mev in [1.0, 10.0] {
                    let point = CompositionPoint::from_nb_ye(nbx, yex, t_mev)
                        .map_err(SelectError::from)?;
                    let cs2 = self.cs2_fixed_ye(&point).map_err(SelectError::from)?;
                    if cs2 < 0.0 {
                        return Err(SelectError::Numeric(EosError::NegativeSoundSpeed {
                            nb: nbx,
                            ye: yex,
                            t_mev,
                            cs2,
                        }));
                    }
                }
                yex += 0.1;
            }
            nbx += 0.05;
        }
        Ok(())
    }

    /// Draw random `ModelInput`s until one passes validation.
    ///
    /// Bounded retry: fails after `max_attempts` rejections. Hard numeric
    /// errors abort immediately.
    pub fn select_random<R: Rng + ?Sized>(
        ns_table: &NsTable,
        fn_table: &FunctionalTable,
        options: &SelectOptions,
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<(Eos, ModelInput), SelectError> {
        for attempt in 0..max_attempts {
            let input = ModelInput {
                i_ns: rng.gen_range(0..ns_table.len()),
                i_skyrme: rng.gen_range(0..fn_table.len()),
                qmc_alpha: rng.gen::<f64>() * 0.06 + 0.47,
                qmc_a: rng.gen::<f64>() + 12.5,
                eos_l: rng.gen::<f64>() * 21.0 + 44.0,
                eos_s: rng.gen::<f64>() * 6.6 + 29.5,
                phi: rng.gen::<f64>(),
            };
            match Eos::select(ns_table, fn_table, input, options) {
                Ok(eos) => {
                    debug!(attempt, ?input, "random model accepted");
                    return Ok((eos, input));
                }
                Err(SelectError::Rejected(reason)) => {
                    debug!(attempt, ?reason, code = reason.code(), "random model rejected");
                }
                Err(fatal @ SelectError::Numeric(_)) => return Err(fatal),
            }
        }
        Err(SelectError::Numeric(EosError::InvalidArg {
            what: "random model search exhausted its attempt budget",
        }))
    }
}

fn wrap_solver(e: EosError) -> nm_solver::SolverError {
    nm_solver::SolverError::Numeric {
        what: e.to_string(),
    }
}
