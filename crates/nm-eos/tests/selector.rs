//! Validator/selector behavior: specific rejection codes, preconditions,
//! random search, and the pure-virial blend scenario.

use nm_eos::{
    BlendParameters, CompositionPoint, Eos, EosError, FunctionalTable, ModelInput, NsTable,
    RejectionReason, SelectError, SelectOptions,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn fast_options() -> SelectOptions {
    SelectOptions {
        check_cs2_grid: false,
    }
}

fn base_input() -> ModelInput {
    ModelInput {
        i_ns: 0,
        i_skyrme: 0,
        qmc_alpha: 0.48,
        qmc_a: 12.7,
        eos_s: 32.0,
        eos_l: 50.0,
        phi: 0.8,
    }
}

fn select(input: ModelInput) -> Result<Eos, SelectError> {
    Eos::select(
        &NsTable::builtin(),
        &FunctionalTable::builtin(),
        input,
        &fast_options(),
    )
}

#[test]
fn reference_input_is_accepted() {
    let eos = select(base_input()).expect("reference input must validate");
    let sel = eos.selection();
    assert!(sel.qmc_b > 0.0);
    assert!(sel.qmc_beta < 5.0);
    // derived bookkeeping comes from the selected saturation row
    assert!((sel.eos_eoa + 16.006).abs() < 1e-12);
}

#[test]
fn qmc_beta_out_of_range_gets_its_own_code() {
    let input = ModelInput {
        qmc_alpha: 0.50,
        qmc_a: 13.4,
        eos_s: 30.5,
        eos_l: 44.0,
        ..base_input()
    };
    match select(input) {
        Err(SelectError::Rejected(reason)) => {
            assert_eq!(reason, RejectionReason::QmcBetaOutOfRange);
        }
        other => panic!("expected QmcBetaOutOfRange, got {other:?}"),
    }
}

#[test]
fn negative_qmc_coefficient_is_distinct() {
    let input = ModelInput {
        qmc_a: 15.0,
        eos_s: 30.5,
        eos_l: 44.0,
        ..base_input()
    };
    match select(input) {
        Err(SelectError::Rejected(reason)) => {
            assert_eq!(reason, RejectionReason::QmcCoefficientNegative);
        }
        other => panic!("expected QmcCoefficientNegative, got {other:?}"),
    }
}

#[test]
fn symmetry_corridor_violation_is_rejected() {
    let input = ModelInput {
        eos_s: 36.0,
        eos_l: 44.0,
        ..base_input()
    };
    match select(input) {
        Err(SelectError::Rejected(reason)) => {
            assert_eq!(reason, RejectionReason::SymmetryCorridor);
        }
        other => panic!("expected SymmetryCorridor, got {other:?}"),
    }
}

#[test]
fn soft_symmetry_energy_fails_beta_equilibrium() {
    // a low sound-speed target makes the high-density neutron-star branch
    // softer than symmetric matter, so beta equilibrium has no solution
    let input = ModelInput {
        phi: 0.05,
        ..base_input()
    };
    match select(input) {
        Err(SelectError::Rejected(reason)) => {
            assert_eq!(reason, RejectionReason::BetaEquilibriumFailed);
        }
        other => panic!("expected BetaEquilibriumFailed, got {other:?}"),
    }
}

#[test]
fn out_of_range_row_is_a_precondition_error() {
    let input = ModelInput {
        i_ns: 999,
        ..base_input()
    };
    match select(input) {
        Err(SelectError::Numeric(EosError::RowIndex { index, .. })) => {
            assert_eq!(index, 999);
        }
        other => panic!("expected RowIndex, got {other:?}"),
    }
}

#[test]
fn beta_equilibrium_fraction_is_physical() {
    let eos = select(base_input()).unwrap();
    let t = 1.0 / nm_core::constants::HC_MEV_FM;
    for &nb in &[0.1, 0.5, 1.0, 2.0] {
        let ye = eos.beta_eq_ye(nb, t, 0.0).unwrap();
        assert!(ye > 0.0 && ye < 0.2, "Ye({nb}) = {ye}");
    }
}

#[test]
fn pure_virial_blend_reduces_to_virial_free_energy() {
    // with the degeneracy blend switched off (g ≡ 1) the total free
    // energy IS the virial free energy
    let eos = select(base_input()).unwrap().with_blend(BlendParameters {
        a_virial: 0.0,
        b_virial: 0.0,
        ..Default::default()
    });
    let pt = CompositionPoint::new(0.08, 0.08, 0.01 / nm_core::constants::HC_MEV_FM).unwrap();
    let r = eos.evaluate(&pt).unwrap();
    assert_eq!(r.g_virial, 1.0);
    assert_eq!(r.free_energy.to_bits(), r.f_virial.to_bits());
    assert_eq!(r.entropy.to_bits(), r.s_virial.to_bits());
}

#[test]
#[ignore = "runs the full random search with the beta-equilibrium battery"]
fn random_search_finds_a_valid_model() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let (eos, input) = Eos::select_random(
        &NsTable::builtin(),
        &FunctionalTable::builtin(),
        &fast_options(),
        &mut rng,
        200,
    )
    .expect("seeded search should find a valid model");
    assert!(input.phi >= 0.0 && input.phi < 1.0);
    let pt = CompositionPoint::from_nb_ye(0.16, 0.3, 5.0).unwrap();
    assert!(eos.evaluate(&pt).unwrap().free_energy.is_finite());
}

#[test]
#[ignore = "full validation including the sound-speed grid is expensive"]
fn full_validation_passes_for_reference_input() {
    let eos = Eos::select(
        &NsTable::builtin(),
        &FunctionalTable::builtin(),
        base_input(),
        &SelectOptions::default(),
    )
    .expect("reference input must survive the full battery");
    assert!(eos.selection().qmc_beta < 5.0);
}
