//! Blended sound speeds and grid sweeps.

use nm_eos::{
    sweep_fixed_ye, CompositionPoint, Eos, FunctionalTable, ModelInput, NsTable, SelectOptions,
    SweepAxis, SweepSpacing,
};

fn reference_eos(phi: f64) -> Eos {
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
            phi,
        },
        &SelectOptions {
            check_cs2_grid: false,
        },
    )
    .expect("reference model must validate")
}

#[test]
fn fixed_ye_sound_speed_is_causal() {
    let eos = reference_eos(0.8);
    for &(nb, ye, t_mev) in &[
        (0.1, 0.05, 1.0),
        (0.3, 0.15, 1.0),
        (0.5, 0.25, 10.0),
        (1.5, 0.45, 1.0),
        (2.0, 0.05, 10.0),
    ] {
        let pt = CompositionPoint::from_nb_ye(nb, ye, t_mev).unwrap();
        let cs2 = eos.cs2_fixed_ye(&pt).unwrap();
        assert!(
            cs2 > 0.0 && cs2 <= 1.0 + 1e-3,
            "cs²({nb}, {ye}, {t_mev}) = {cs2}"
        );
    }
}

#[test]
fn fixed_mul_sound_speed_is_finite_and_positive() {
    let eos = reference_eos(0.8);
    for &(nb, ye, t_mev) in &[(0.3, 0.15, 5.0), (1.0, 0.3, 10.0)] {
        let pt = CompositionPoint::from_nb_ye(nb, ye, t_mev).unwrap();
        let cs2 = eos.cs2_fixed_mul(&pt).unwrap();
        assert!(cs2.is_finite() && cs2 > 0.0, "cs²_μL({nb}) = {cs2}");
    }
}

#[test]
fn sound_speed_rises_toward_target_above_ceiling() {
    // above nb_max the increasing branch pushes cs² from cs_last toward phi
    let eos = reference_eos(0.95);
    let lo = CompositionPoint::from_nb_ye(1.0, 0.05, 1.0).unwrap();
    let hi = CompositionPoint::from_nb_ye(1.9, 0.05, 1.0).unwrap();
    let cs2_lo = eos.cs2_fixed_ye(&lo).unwrap();
    let cs2_hi = eos.cs2_fixed_ye(&hi).unwrap();
    assert!(cs2_hi > cs2_lo, "cs² should rise: {cs2_lo} → {cs2_hi}");
    assert!(cs2_hi <= 1.0 + 1e-3);
}

#[test]
fn sweep_covers_grid_in_order() {
    let eos = reference_eos(0.8);
    let nb_axis = SweepAxis::new(1e-6, 0.3, 4, SweepSpacing::Logarithmic).unwrap();
    let t_axis = SweepAxis::new(1.0, 10.0, 3, SweepSpacing::Linear).unwrap();
    let points = sweep_fixed_ye(&eos, 0.3, &nb_axis, &t_axis).unwrap();
    assert_eq!(points.len(), 12);
    // row-major: nb outer, T inner
    assert_eq!(points[0].t_mev, 1.0);
    assert_eq!(points[1].t_mev, 5.5);
    assert!(points[0].nb < points[3].nb);
    for p in &points {
        assert!(p.point.free_energy.is_finite());
        assert!(p.point.g_virial > 0.0 && p.point.g_virial <= 1.0);
        assert!(p.point.h_qmc > 0.0 && p.point.h_qmc < 1.0);
    }
}

#[test]
fn sweep_results_match_single_evaluations() {
    let eos = reference_eos(0.8);
    let nb_axis = SweepAxis::new(0.01, 0.2, 3, SweepSpacing::Linear).unwrap();
    let t_axis = SweepAxis::new(2.0, 8.0, 2, SweepSpacing::Linear).unwrap();
    let points = sweep_fixed_ye(&eos, 0.4, &nb_axis, &t_axis).unwrap();
    for p in &points {
        let single = eos
            .evaluate(&CompositionPoint::from_nb_ye(p.nb, 0.4, p.t_mev).unwrap())
            .unwrap();
        assert_eq!(p.point.free_energy.to_bits(), single.free_energy.to_bits());
    }
}

#[test]
fn lepton_wrappers_add_positive_contributions() {
    let eos = reference_eos(0.8);
    let pt = CompositionPoint::from_nb_ye(0.16, 0.3, 5.0).unwrap();
    let hadronic = eos.evaluate(&pt).unwrap();
    let s_total = eos.entropy(&pt).unwrap();
    assert!(s_total > hadronic.entropy);
    let ed_total = eos.energy_density(&pt).unwrap();
    // rest masses dominate the total energy density
    assert!(ed_total > nm_core::constants::M_NEUTRON * pt.nn());
}

#[test]
fn virial_comparison_tracks_full_blend_at_low_density() {
    let eos = reference_eos(0.8);
    let axis = SweepAxis::new(1e-6, 1e-3, 5, SweepSpacing::Logarithmic).unwrap();
    let rows = nm_eos::virial_comparison(&eos, 5.0, &axis).unwrap();
    // deep in the virial regime the blend is dominated by the virial term
    let (_, f_full, f_vir) = rows[0];
    assert!((f_full - f_vir).abs() < 0.05 * f_vir.abs().max(1.0));
}
