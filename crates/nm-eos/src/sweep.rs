//! In-memory grid evaluation at fixed proton fraction.
//!
//! Grid points are independent given a frozen model, so the sweep runs in
//! parallel. Any non-finite thermodynamic output aborts the whole sweep:
//! downstream consumers cannot tolerate holes.

use crate::eos::Eos;
use crate::error::{EosError, EosResult};
use crate::state::{CompositionPoint, EosPoint};
use rayon::prelude::*;

/// Spacing of a sweep axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepSpacing {
    /// Uniformly spaced points
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// One sweep axis: bounds, point count, spacing.
#[derive(Debug, Clone)]
pub struct SweepAxis {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    pub spacing: SweepSpacing,
}

impl SweepAxis {
    pub fn new(
        start: f64,
        end: f64,
        num_points: usize,
        spacing: SweepSpacing,
    ) -> EosResult<Self> {
        if num_points < 2 {
            return Err(EosError::InvalidArg {
                what: "sweep axis needs at least 2 points",
            });
        }
        if !(start.is_finite() && end.is_finite()) || start >= end {
            return Err(EosError::InvalidArg {
                what: "sweep axis bounds must be finite and increasing",
            });
        }
        if spacing == SweepSpacing::Logarithmic && start <= 0.0 {
            return Err(EosError::InvalidArg {
                what: "logarithmic sweep axis needs positive bounds",
            });
        }
        Ok(Self {
            start,
            end,
            num_points,
            spacing,
        })
    }

    /// Generate all points on the axis; the endpoint is hit exactly.
    pub fn points(&self) -> Vec<f64> {
        let n = self.num_points;
        let mut points = Vec::with_capacity(n);
        match self.spacing {
            SweepSpacing::Linear => {
                let delta = (self.end - self.start) / (n - 1) as f64;
                for i in 0..n {
                    points.push(self.start + i as f64 * delta);
                }
            }
            SweepSpacing::Logarithmic => {
                let log_start = self.start.ln();
                let delta = (self.end.ln() - log_start) / (n - 1) as f64;
                for i in 0..n {
                    points.push((log_start + i as f64 * delta).exp());
                }
            }
        }
        points[n - 1] = self.end;
        points
    }
}

/// One evaluated grid point.
#[derive(Debug, Clone, Copy)]
pub struct SweepPoint {
    pub nb: f64,
    pub t_mev: f64,
    pub point: EosPoint,
}

/// Evaluate the EOS over (nb, T) at fixed Ye, in parallel.
///
/// Returns the points in row-major (nb outer, T inner) order.
pub fn sweep_fixed_ye(
    eos: &Eos,
    ye: f64,
    nb_axis: &SweepAxis,
    t_axis_mev: &SweepAxis,
) -> EosResult<Vec<SweepPoint>> {
    let nb_points = nb_axis.points();
    let t_points = t_axis_mev.points();

    let grid: Vec<(f64, f64)> = nb_points
        .iter()
        .flat_map(|&nb| t_points.iter().map(move |&t| (nb, t)))
        .collect();

    grid.par_iter()
        .map(|&(nb, t_mev)| {
            let point = eos.evaluate(&CompositionPoint::from_nb_ye(nb, ye, t_mev)?)?;
            for (value, what) in [
                (point.free_energy, "free energy density"),
                (point.energy, "energy density"),
                (point.pressure, "pressure"),
                (point.entropy, "entropy density"),
                (point.mu_n, "neutron chemical potential"),
                (point.mu_p, "proton chemical potential"),
            ] {
                if !value.is_finite() {
                    return Err(EosError::NonFinite {
                        what,
                        nb,
                        ye,
                        t_mev,
                    });
                }
            }
            Ok(SweepPoint { nb, t_mev, point })
        })
        .collect()
}

/// Free energy per baryon from the full blend and from the bare virial
/// expansion along a density axis (diagnostic comparison).
pub fn virial_comparison(
    eos: &Eos,
    t_mev: f64,
    nb_axis: &SweepAxis,
) -> EosResult<Vec<(f64, f64, f64)>> {
    nb_axis
        .points()
        .iter()
        .map(|&nb| {
            let pt = CompositionPoint::from_nb_ye(nb, 0.5, t_mev)?;
            let full = eos.evaluate(&pt)?;
            Ok((
                nb,
                full.free_energy_per_baryon_mev(nb),
                full.f_virial / nb * nm_core::constants::HC_MEV_FM,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_axis_hits_endpoints() {
        let axis = SweepAxis::new(300.0, 400.0, 5, SweepSpacing::Linear).unwrap();
        let p = axis.points();
        assert_eq!(p.len(), 5);
        assert!((p[0] - 300.0).abs() < 1e-12);
        assert!((p[2] - 350.0).abs() < 1e-9);
        assert!((p[4] - 400.0).abs() < 1e-12);
    }

    #[test]
    fn log_axis_is_geometric() {
        let axis = SweepAxis::new(1e-4, 1e-2, 3, SweepSpacing::Logarithmic).unwrap();
        let p = axis.points();
        assert!((p[1] - 1e-3).abs() / 1e-3 < 1e-9);
        assert!((p[2] - 1e-2).abs() < 1e-15);
    }

    #[test]
    fn rejects_bad_axes() {
        assert!(SweepAxis::new(1.0, 2.0, 1, SweepSpacing::Linear).is_err());
        assert!(SweepAxis::new(2.0, 1.0, 5, SweepSpacing::Linear).is_err());
        assert!(SweepAxis::new(-1.0, 2.0, 5, SweepSpacing::Logarithmic).is_err());
    }
}
