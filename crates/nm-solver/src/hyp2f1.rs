//! Gauss hypergeometric function ₂F₁(a, b; c; x) by power series.
//!
//! The causal high-density branch only needs arguments produced by a Pfaff
//! transformation, which land in [0, 1), where the series converges. The
//! series is the textbook one: Σ (a)ₖ(b)ₖ/(c)ₖ · xᵏ/k!.

use crate::error::{SolverError, SolverResult};

const MAX_TERMS: usize = 100_000;
const TERM_TOL: f64 = 1e-15;

pub fn hyp2f1(a: f64, b: f64, c: f64, x: f64) -> SolverResult<f64> {
    if x.abs() >= 1.0 {
        return Err(SolverError::InvalidArg {
            what: "hyp2f1 argument outside (-1, 1)",
        });
    }
    // Poles of the Pochhammer denominator
    if c <= 0.0 && c.fract() == 0.0 {
        return Err(SolverError::InvalidArg {
            what: "hyp2f1 c is a non-positive integer",
        });
    }

    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 0..MAX_TERMS {
        let kf = k as f64;
        term *= (a + kf) * (b + kf) / (c + kf) * x / (kf + 1.0);
        sum += term;
        if term.abs() <= TERM_TOL * sum.abs() {
            return Ok(sum);
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!("hyp2f1 series did not converge at x={x}"),
    })
}
