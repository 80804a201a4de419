//! Frozen reference tables.
//!
//! The neutron-star table holds rows of energy-per-baryon fit coefficients
//! with their causal-density ceilings; the functional table holds rows of
//! saturation-point parameter sets. Both are ordinarily loaded by an
//! external I/O layer; the built-in rows below make the crate
//! self-contained and are frozen reference data.

use crate::error::{EosError, EosResult};
use nm_matter::NsFitParameters;

/// Immutable collection of neutron-star fit rows.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NsTable {
    rows: Vec<NsFitParameters>,
}

impl NsTable {
    pub fn new(rows: Vec<NsFitParameters>) -> Self {
        Self { rows }
    }

    /// Built-in reference rows. Each fit keeps cs² inside (0, 1) below its
    /// ceiling and would cross cs² = 1 shortly above it.
    pub fn builtin() -> Self {
        Self {
            rows: vec![
                NsFitParameters {
                    coeffs: [28.0, 190.0, 30.0, -6.0, 0.5],
                    nb_max: 0.9558,
                },
                NsFitParameters {
                    coeffs: [32.0, 150.0, 60.0, -10.0, 0.8],
                    nb_max: 0.9120,
                },
                NsFitParameters {
                    coeffs: [25.0, 220.0, 10.0, -2.0, 0.2],
                    nb_max: 0.9714,
                },
                NsFitParameters {
                    coeffs: [30.0, 170.0, 45.0, -8.0, 0.6],
                    nb_max: 0.9331,
                },
                NsFitParameters {
                    coeffs: [35.0, 130.0, 75.0, -14.0, 1.0],
                    nb_max: 0.9093,
                },
                NsFitParameters {
                    coeffs: [27.0, 205.0, 20.0, -4.0, 0.35],
                    nb_max: 0.9633,
                },
            ],
        }
    }

    pub fn row(&self, index: usize) -> EosResult<&NsFitParameters> {
        self.rows.get(index).ok_or(EosError::RowIndex {
            what: "neutron-star table",
            index,
            len: self.rows.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One saturation-point parameter set (energies in MeV, density in fm⁻³).
///
/// The gradient couplings crdr0/crdr1 and spin-orbit couplings
/// crdj0/crdj1 vanish in homogeneous matter, and vn/vp only enter pairing;
/// they are carried as part of the row record.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaturationRow {
    pub rho0: f64,
    pub eoa: f64,
    pub k_inf: f64,
    /// Inverse isoscalar effective-mass ratio m/m*.
    pub ms_inv: f64,
    pub crdr0: f64,
    pub crdr1: f64,
    pub crdj0: f64,
    pub crdj1: f64,
    pub vn: f64,
    pub vp: f64,
}

/// Immutable collection of functional saturation rows.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionalTable {
    rows: Vec<SaturationRow>,
}

impl FunctionalTable {
    pub fn new(rows: Vec<SaturationRow>) -> Self {
        Self { rows }
    }

    /// Built-in reference rows in the UNEDF family range.
    pub fn builtin() -> Self {
        Self {
            rows: vec![
                SaturationRow {
                    rho0: 0.16053,
                    eoa: -16.006,
                    k_inf: 230.0,
                    ms_inv: 1.111,
                    crdr0: -55.26,
                    crdr1: -55.62,
                    crdj0: -79.53,
                    crdj1: 45.63,
                    vn: -170.37,
                    vp: -199.20,
                },
                SaturationRow {
                    rho0: 0.15871,
                    eoa: -15.800,
                    k_inf: 220.0,
                    ms_inv: 1.000,
                    crdr0: -45.14,
                    crdr1: -145.38,
                    crdj0: -74.03,
                    crdj1: -35.66,
                    vn: -186.07,
                    vp: -206.58,
                },
                SaturationRow {
                    rho0: 0.15631,
                    eoa: -15.800,
                    k_inf: 239.93,
                    ms_inv: 1.074,
                    crdr0: -46.83,
                    crdr1: -113.16,
                    crdj0: -64.56,
                    crdj1: -38.74,
                    vn: -208.89,
                    vp: -230.33,
                },
                SaturationRow {
                    rho0: 0.16000,
                    eoa: -16.100,
                    k_inf: 235.0,
                    ms_inv: 1.176,
                    crdr0: -48.00,
                    crdr1: -120.00,
                    crdj0: -72.00,
                    crdj1: -42.00,
                    vn: -190.00,
                    vp: -210.00,
                },
                SaturationRow {
                    rho0: 0.15900,
                    eoa: -15.900,
                    k_inf: 225.0,
                    ms_inv: 1.050,
                    crdr0: -50.00,
                    crdr1: -90.00,
                    crdj0: -70.00,
                    crdj1: -40.00,
                    vn: -180.00,
                    vp: -200.00,
                },
            ],
        }
    }

    pub fn row(&self, index: usize) -> EosResult<&SaturationRow> {
        self.rows.get(index).ok_or(EosError::RowIndex {
            what: "functional table",
            index,
            len: self.rows.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ns_rows_are_causal_below_ceiling() {
        for (i, row) in NsTable::builtin().rows.iter().enumerate() {
            let (lo, hi) = row.min_max_cs2();
            assert!(lo > 0.0 && hi < 1.0, "row {i}: cs² range [{lo}, {hi}]");
        }
    }

    #[test]
    fn out_of_range_row_is_reported() {
        let t = NsTable::builtin();
        let err = t.row(t.len()).unwrap_err();
        assert!(matches!(err, EosError::RowIndex { .. }));
        let f = FunctionalTable::builtin();
        assert!(f.row(99).is_err());
    }

    #[test]
    fn builtin_functional_rows_are_in_empirical_range() {
        for row in FunctionalTable::builtin().rows.iter() {
            assert!(row.rho0 > 0.15 && row.rho0 < 0.17);
            assert!(row.eoa < -15.0 && row.eoa > -17.0);
            assert!(row.k_inf > 200.0 && row.k_inf < 260.0);
            assert!(row.ms_inv >= 1.0);
        }
    }
}
