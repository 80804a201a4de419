//! Primary regression property: the analytic chemical potentials and
//! entropy must match centered finite differences of the free energy.

use nm_core::numeric::{nearly_equal, Tolerances};
use nm_eos::{CompositionPoint, Eos, FunctionalTable, ModelInput, NsTable, SelectOptions};

fn reference_eos() -> Eos {
    Eos::select(
        &NsTable::builtin(),
        &FunctionalTable::builtin(),
        ModelInput {
            i_ns: 0,
            i_skyrme: 0,
            qmc_alpha: 0.48,
            qmc_a: 12.7,
            eos_s: 32.0,
            eos_l: 50.0,
            phi: 0.8,
        },
        &SelectOptions {
            check_cs2_grid: false,
        },
    )
    .expect("reference model must validate")
}

/// Five-point centered derivative.
fn deriv5(f: impl Fn(f64) -> f64, x: f64, h: f64) -> f64 {
    (f(x - 2.0 * h) - 8.0 * f(x - h) + 8.0 * f(x + h) - f(x + 2.0 * h)) / (12.0 * h)
}

fn assert_close(analytic: f64, numeric: f64, what: &str, ctx: &str) {
    let tol = Tolerances {
        abs: 1.0e-12,
        rel: 1.0e-4,
    };
    assert!(
        nearly_equal(analytic, numeric, tol),
        "{what} mismatch at {ctx}: analytic {analytic:e} vs numeric {numeric:e}"
    );
}

fn check_sweep(eos: &Eos, ye: f64, t_mev: f64) {
    let mut nb = 1.0e-10;
    let mut k = 0u32;
    while nb < 1.6 {
        // every fifth point of the 1.3^k ladder keeps the sweep dense
        // enough without being slow
        if k % 5 == 0 {
            let nn = nb * (1.0 - ye);
            let pn = nb * ye;
            let t = t_mev / nm_core::constants::HC_MEV_FM;
            let ctx = format!("nb={nb:e} Ye={ye} T={t_mev} MeV");

            let r = eos
                .evaluate(&CompositionPoint::new(nn, pn, t).unwrap())
                .unwrap();
            let f = |a: f64, b: f64, tt: f64| eos.free_energy_density(a, b, tt).unwrap();

            let mun_num = deriv5(|x| f(x, pn, t), nn, nn / 100.0);
            assert_close(r.mu_n, mun_num, "mu_n", &ctx);

            let mup_num = deriv5(|x| f(nn, x, t), pn, pn / 100.0);
            assert_close(r.mu_p, mup_num, "mu_p", &ctx);

            // a wider step keeps the temperature stencil out of the
            // cancellation noise of the cold, dense corner
            let s_num = -deriv5(|x| f(nn, pn, x), t, t / 10.0);
            assert_close(r.entropy, s_num, "entropy", &ctx);
        }
        nb *= 1.3;
        k += 1;
    }
}

#[test]
fn neutron_rich_cold_sweep() {
    check_sweep(&reference_eos(), 0.01, 0.1);
}

#[test]
fn near_symmetric_cold_sweep() {
    check_sweep(&reference_eos(), 0.49, 0.1);
}

#[test]
fn neutron_rich_warm_sweep() {
    check_sweep(&reference_eos(), 0.01, 1.0);
}

#[test]
fn near_symmetric_hot_sweep() {
    check_sweep(&reference_eos(), 0.49, 30.0);
}

#[test]
fn bundle_identities_hold_exactly() {
    let eos = reference_eos();
    for &(nb, ye, t_mev) in &[(1e-4, 0.3, 5.0), (0.16, 0.1, 1.0), (1.2, 0.45, 10.0)] {
        let pt = CompositionPoint::from_nb_ye(nb, ye, t_mev).unwrap();
        let r = eos.evaluate(&pt).unwrap();
        // ed = f + T·s and pr = −f + μ_n·nn + μ_p·pn by construction
        let ed = r.free_energy + pt.t() * r.entropy;
        assert_eq!(r.energy.to_bits(), ed.to_bits());
        let pr = -r.free_energy + pt.nn() * r.mu_n + pt.pn() * r.mu_p;
        assert_eq!(r.pressure.to_bits(), pr.to_bits());
        // bundle view carries the same numbers
        let b = r.bundle();
        assert_eq!(b.pressure.to_bits(), r.pressure.to_bits());
    }
}

#[test]
fn repeat_evaluation_is_bit_identical() {
    let eos = reference_eos();
    let pt = CompositionPoint::from_nb_ye(0.12, 0.3, 7.0).unwrap();
    let a = eos.evaluate(&pt).unwrap();
    let b = eos.evaluate(&pt).unwrap();
    assert_eq!(a.free_energy.to_bits(), b.free_energy.to_bits());
    assert_eq!(a.entropy.to_bits(), b.entropy.to_bits());
    assert_eq!(a.mu_n.to_bits(), b.mu_n.to_bits());
    assert_eq!(a.mu_p.to_bits(), b.mu_p.to_bits());
    assert_eq!(a.pressure.to_bits(), b.pressure.to_bits());
    assert_eq!(a.g_virial.to_bits(), b.g_virial.to_bits());
}
