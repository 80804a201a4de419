//! Ideal Fermi-gas kernels shared by the functional and lepton models.
//!
//! Occupation and entropy integrals are evaluated with a degenerate split:
//! the T=0 part in closed form plus Fermi-surface tail integrals in
//! t = (ε−ν)/T space, where every feature of the weight has unit scale.
//! Tails use composite 16-point Gauss-Legendre panels; the power-law kink
//! at ε = 0 in the non-degenerate branch is removed by a t = y² substitution.

use crate::error::{MatterError, MatterResult};
use nm_solver::{brent, expand_bracket, gl_quadrature, BrentConfig};
use std::f64::consts::PI;

/// Dimensionless half-width of the tail window; exp(-60) is far below
/// double precision.
const TAIL_MAX: f64 = 60.0;

/// Fermi weight 1/(1+eˣ), safe against overflow.
#[inline]
fn fermi_weight(x: f64) -> f64 {
    if x > 700.0 {
        0.0
    } else if x < -700.0 {
        1.0
    } else {
        1.0 / (1.0 + x.exp())
    }
}

/// Entropy weight −[f ln f + (1−f) ln(1−f)], symmetric in x.
#[inline]
fn entropy_weight(x: f64) -> f64 {
    let ax = x.abs();
    if ax > 700.0 {
        return 0.0;
    }
    let e = (-ax).exp();
    ax * e / (1.0 + e) + e.ln_1p()
}

/// ∫₀^∞ g(ε)·f((ε−ν)/T) dε with `g_exact(ν) = ∫₀^ν g`.
pub fn fd_occupation<G, E>(g: G, g_exact: E, nu: f64, t: f64) -> f64
where
    G: Fn(f64) -> f64,
    E: Fn(f64) -> f64,
{
    if nu > TAIL_MAX * t {
        // degenerate split: both tails stay in ε > 0
        let up = gl_quadrature(|s| g(nu + s * t) * fermi_weight(s), 0.0, TAIL_MAX, 4.0);
        let dn = gl_quadrature(|s| g(nu - s * t) * fermi_weight(s), 0.0, TAIL_MAX, 4.0);
        g_exact(nu) + t * (up - dn)
    } else {
        let tmax = TAIL_MAX + (nu / t).max(0.0);
        let a = gl_quadrature(
            |y| g(y * y * t) * fermi_weight(y * y - nu / t) * 2.0 * y,
            0.0,
            2.0,
            0.5,
        );
        let b = gl_quadrature(|s| g(s * t) * fermi_weight(s - nu / t), 4.0, tmax, 4.0);
        t * (a + b)
    }
}

/// ∫₀^∞ g(ε)·σ((ε−ν)/T) dε with the entropy weight σ.
///
/// σ vanishes away from the Fermi surface, so there is no closed-form part.
pub fn fd_entropy<G: Fn(f64) -> f64>(g: G, nu: f64, t: f64) -> f64 {
    if nu > TAIL_MAX * t {
        let up = gl_quadrature(|s| g(nu + s * t) * entropy_weight(s), 0.0, TAIL_MAX, 4.0);
        let dn = gl_quadrature(|s| g(nu - s * t) * entropy_weight(s), 0.0, TAIL_MAX, 4.0);
        t * (up + dn)
    } else {
        let tmax = TAIL_MAX + (nu / t).max(0.0);
        let a = gl_quadrature(
            |y| g(y * y * t) * entropy_weight(y * y - nu / t) * 2.0 * y,
            0.0,
            2.0,
            0.5,
        );
        let b = gl_quadrature(|s| g(s * t) * entropy_weight(s - nu / t), 4.0, tmax, 4.0);
        t * (a + b)
    }
}

// ---------------------------------------------------------------------------
// Non-relativistic effective-mass gas (degeneracy 2)

/// One species of an ideal non-relativistic gas at finite temperature.
#[derive(Clone, Copy, Debug, Default)]
pub struct NonrelState {
    /// Effective chemical potential ν (without potential terms), fm⁻¹
    pub nu: f64,
    /// Kinetic density τ, fm⁻⁵
    pub tau: f64,
    /// Kinetic energy density τ/(2m*), fm⁻⁴
    pub kinetic: f64,
    /// Entropy density, fm⁻³
    pub entropy: f64,
}

fn sqrt_pos(e: f64) -> f64 {
    if e > 0.0 {
        e.sqrt()
    } else {
        0.0
    }
}

/// Number density of the effective gas at given ν.
pub fn nonrel_density(mstar: f64, nu: f64, t: f64) -> f64 {
    let pref = mstar * (2.0 * mstar).sqrt() / (PI * PI);
    pref * fd_occupation(sqrt_pos, |v| (2.0 / 3.0) * v.powf(1.5), nu, t)
}

fn nonrel_tau(mstar: f64, nu: f64, t: f64) -> f64 {
    let pref = mstar * (2.0 * mstar).powf(1.5) / (PI * PI);
    pref * fd_occupation(
        |e| if e > 0.0 { e.powf(1.5) } else { 0.0 },
        |v| 0.4 * v.powf(2.5),
        nu,
        t,
    )
}

fn nonrel_entropy(mstar: f64, nu: f64, t: f64) -> f64 {
    let pref = mstar * (2.0 * mstar).sqrt() / (PI * PI);
    pref * fd_entropy(sqrt_pos, nu, t)
}

/// Solve ν from the density, then evaluate τ and the entropy.
///
/// Zero density is a valid input and contributes nothing.
pub fn nonrel_gas(mstar: f64, n: f64, t: f64) -> MatterResult<NonrelState> {
    if n == 0.0 {
        return Ok(NonrelState::default());
    }
    if !(n > 0.0 && t > 0.0 && mstar > 0.0) {
        return Err(MatterError::NonPhysical {
            what: "non-relativistic gas inputs",
        });
    }
    let lam3 = (2.0 * PI / (mstar * t)).powf(1.5);
    let nu0 = t * (n * lam3 / 2.0).max(1e-300).ln();
    let ef = (3.0 * PI * PI * n).powf(2.0 / 3.0) / (2.0 * mstar);
    let lo = nu0.min(0.0) - 20.0 * t;
    let hi = nu0.max(ef) + 20.0 * t;

    let resid = |nu: f64| Ok(nonrel_density(mstar, nu, t) / n - 1.0);
    let (lo, hi) = expand_bracket(resid, lo, hi, 100)?;
    let cfg = BrentConfig {
        max_iterations: 200,
        x_tol: 1e-15,
        f_tol: 0.0,
    };
    let nu = brent(resid, lo, hi, &cfg)?;

    let tau = nonrel_tau(mstar, nu, t);
    Ok(NonrelState {
        nu,
        tau,
        kinetic: tau / (2.0 * mstar),
        entropy: nonrel_entropy(mstar, nu, t),
    })
}

// ---------------------------------------------------------------------------
// Relativistic fermions with antiparticles (degeneracy 2)

/// Thermodynamics of a relativistic particle/antiparticle pair gas.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairState {
    /// Net number density (particles − antiparticles), fm⁻³
    pub n_net: f64,
    /// Energy density including rest mass, fm⁻⁴
    pub energy: f64,
    /// Pressure, fm⁻⁴
    pub pressure: f64,
    /// Entropy density, fm⁻³
    pub entropy: f64,
}

#[derive(Clone, Copy)]
enum RelKernel {
    Number,
    Energy,
    Pressure,
}

fn rel_g(kernel: RelKernel, eps: f64, m: f64) -> f64 {
    let e = m + eps;
    let k = sqrt_pos(eps * (2.0 * m + eps));
    match kernel {
        RelKernel::Number => k * e,
        RelKernel::Energy => k * e * e,
        RelKernel::Pressure => k * k * k,
    }
}

fn rel_exact(kernel: RelKernel, nubar: f64, m: f64) -> f64 {
    let mu = m + nubar;
    let kf = sqrt_pos(mu * mu - m * m);
    match kernel {
        RelKernel::Number => kf.powi(3) / 3.0,
        RelKernel::Energy => {
            (kf * mu * (2.0 * kf * kf + m * m) - m.powi(4) * (kf / m).asinh()) / 8.0
        }
        RelKernel::Pressure => {
            kf.powi(3) * mu / 4.0 - 0.375 * m * m * kf * mu
                + 0.375 * m.powi(4) * (kf / m).asinh()
        }
    }
}

fn rel_integral(kernel: RelKernel, mu: f64, t: f64, m: f64) -> f64 {
    let nubar = mu - m;
    fd_occupation(
        |e| rel_g(kernel, e, m),
        |v| rel_exact(kernel, v, m),
        nubar,
        t,
    )
}

fn rel_entropy_integral(mu: f64, t: f64, m: f64) -> f64 {
    fd_entropy(|e| rel_g(RelKernel::Number, e, m), mu - m, t)
}

/// Evaluate the pair gas at a given chemical potential.
pub fn pair_state(mu: f64, t: f64, m: f64) -> PairState {
    let pi2 = PI * PI;
    let n = (rel_integral(RelKernel::Number, mu, t, m)
        - rel_integral(RelKernel::Number, -mu, t, m))
        / pi2;
    let u = (rel_integral(RelKernel::Energy, mu, t, m)
        + rel_integral(RelKernel::Energy, -mu, t, m))
        / pi2;
    let p = (rel_integral(RelKernel::Pressure, mu, t, m)
        + rel_integral(RelKernel::Pressure, -mu, t, m))
        / (3.0 * pi2);
    let s = (rel_entropy_integral(mu, t, m) + rel_entropy_integral(-mu, t, m)) / pi2;
    PairState {
        n_net: n,
        energy: u,
        pressure: p,
        entropy: s,
    }
}

/// Solve the pair-gas chemical potential from the net density.
pub fn pair_mu_from_density(n_net: f64, t: f64, m: f64) -> MatterResult<f64> {
    if n_net == 0.0 {
        return Ok(0.0);
    }
    if !(t > 0.0 && m > 0.0 && n_net.is_finite()) {
        return Err(MatterError::NonPhysical {
            what: "pair gas inputs",
        });
    }
    let kf = (3.0 * PI * PI * n_net.abs()).powf(1.0 / 3.0);
    let mu_deg = (kf * kf + m * m).sqrt();
    let scale = n_net.abs();
    let resid = |mu: f64| Ok(pair_state(mu, t, m).n_net / scale - n_net.signum());
    let (lo, hi) = expand_bracket(resid, -mu_deg - 30.0 * t, mu_deg + 30.0 * t, 100)?;
    let cfg = BrentConfig {
        max_iterations: 200,
        x_tol: 1e-15,
        f_tol: 0.0,
    };
    Ok(brent(resid, lo, hi, &cfg)?)
}

/// Massless photon gas: (energy density, pressure, entropy density).
pub fn photon_gas(t: f64) -> (f64, f64, f64) {
    let u = PI * PI * t.powi(4) / 15.0;
    (u, u / 3.0, 4.0 * u / (3.0 * t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nm_core::constants::{HC_MEV_FM, M_ELECTRON, M_NEUTRON};

    #[test]
    fn entropy_weight_symmetric() {
        for &x in &[0.1, 1.0, 5.0, 30.0] {
            assert!((entropy_weight(x) - entropy_weight(-x)).abs() < 1e-15);
        }
    }

    #[test]
    fn classical_limit_energy() {
        // dilute neutron gas: u → (3/2) n T, s → n(5/2 − ν/T)
        let t = 1.0 / HC_MEV_FM;
        let n = 1e-8;
        let gas = nonrel_gas(M_NEUTRON, n, t).unwrap();
        assert!((gas.kinetic / (1.5 * n * t) - 1.0).abs() < 1e-4);
        let s_classical = n * (2.5 - gas.nu / t);
        assert!((gas.entropy / s_classical - 1.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_limit_matches_fermi_surface() {
        let t = 0.1 / HC_MEV_FM;
        let n = 0.08;
        let gas = nonrel_gas(M_NEUTRON, n, t).unwrap();
        let ef = (3.0 * PI * PI * n).powf(2.0 / 3.0) / (2.0 * M_NEUTRON);
        assert!((gas.nu / ef - 1.0).abs() < 1e-2);
        let tau0 = 0.6 * (3.0 * PI * PI * n).powf(2.0 / 3.0) * n;
        assert!((gas.tau / tau0 - 1.0).abs() < 1e-3);
    }

    #[test]
    fn nonrel_mu_is_free_energy_derivative() {
        let t = 1.0 / HC_MEV_FM;
        let n = 0.08;
        let f = |nn: f64| {
            let g = nonrel_gas(M_NEUTRON, nn, t).unwrap();
            g.kinetic - t * g.entropy
        };
        let gas = nonrel_gas(M_NEUTRON, n, t).unwrap();
        let h = n * 1e-4;
        let num = (f(n + h) - f(n - h)) / (2.0 * h);
        assert!(
            (gas.nu - num).abs() < 1e-7,
            "nu={} num={}",
            gas.nu,
            num
        );
    }

    #[test]
    fn zero_density_species_is_empty() {
        let gas = nonrel_gas(M_NEUTRON, 0.0, 0.01).unwrap();
        assert_eq!(gas.tau, 0.0);
        assert_eq!(gas.entropy, 0.0);
    }

    #[test]
    fn pair_gas_density_round_trip() {
        let t = 1.0 / HC_MEV_FM;
        for &ne in &[1e-10, 1e-5, 0.01, 0.05] {
            let mu = pair_mu_from_density(ne, t, M_ELECTRON).unwrap();
            let st = pair_state(mu, t, M_ELECTRON);
            assert!(
                (st.n_net / ne - 1.0).abs() < 1e-10,
                "ne={ne}: recovered {}",
                st.n_net
            );
        }
    }

    #[test]
    fn pair_gas_thermodynamic_identity() {
        // s = (u + p − μ n)/T must hold for the pair gas
        let t = 1.0 / HC_MEV_FM;
        let mu = pair_mu_from_density(0.05, t, M_ELECTRON).unwrap();
        let st = pair_state(mu, t, M_ELECTRON);
        let s_id = (st.energy + st.pressure - mu * st.n_net) / t;
        assert!((st.entropy / s_id - 1.0).abs() < 1e-10);
    }

    #[test]
    fn photon_gas_identity() {
        let t = 0.05;
        let (u, p, s) = photon_gas(t);
        assert!((p - u / 3.0).abs() < 1e-16);
        assert!(((u + p) / t - s).abs() < 1e-14);
    }
}
