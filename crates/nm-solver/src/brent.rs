//! One-dimensional root finding (Brent's method).

use crate::error::{SolverError, SolverResult};

/// Brent solver configuration.
pub struct BrentConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance on the root location
    pub x_tol: f64,
    /// Absolute tolerance on the residual
    pub f_tol: f64,
}

impl Default for BrentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            x_tol: 1e-14,
            f_tol: 1e-14,
        }
    }
}

/// Find a root of `f` in the bracket [a, b] using Brent's method.
///
/// The bracket must satisfy f(a)·f(b) ≤ 0.
pub fn brent<F>(mut f: F, a: f64, b: f64, config: &BrentConfig) -> SolverResult<f64>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    let mut xa = a;
    let mut xb = b;
    let mut fa = f(xa)?;
    let mut fb = f(xb)?;

    if fa == 0.0 {
        return Ok(xa);
    }
    if fb == 0.0 {
        return Ok(xb);
    }
    if fa * fb > 0.0 {
        return Err(SolverError::NoBracket { what: "brent" });
    }

    let mut xc = xa;
    let mut fc = fa;
    let mut d = xb - xa;
    let mut e = d;

    for _ in 0..config.max_iterations {
        if fb * fc > 0.0 {
            xc = xa;
            fc = fa;
            d = xb - xa;
            e = d;
        }
        if fc.abs() < fb.abs() {
            xa = xb;
            xb = xc;
            xc = xa;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * xb.abs() + 0.5 * config.x_tol;
        let xm = 0.5 * (xc - xb);

        if xm.abs() <= tol1 || fb.abs() <= config.f_tol {
            return Ok(xb);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation / secant
            let s = fb / fa;
            let (mut p, mut q);
            if xa == xc {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                let qq = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * xm * qq * (qq - r) - (xb - xa) * (r - 1.0));
                q = (qq - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        xa = xb;
        fa = fb;
        if d.abs() > tol1 {
            xb += d;
        } else {
            xb += tol1.copysign(xm);
        }
        fb = f(xb)?;
    }

    Err(SolverError::ConvergenceFailed {
        what: format!("Brent: {} iterations exhausted", config.max_iterations),
    })
}

/// Expand [a, b] geometrically about its center until `f` changes sign.
///
/// Returns the sign-changing bracket. Fails after `max_expansions` doublings.
pub fn expand_bracket<F>(
    mut f: F,
    a: f64,
    b: f64,
    max_expansions: usize,
) -> SolverResult<(f64, f64)>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    let mut lo = a;
    let mut hi = b;
    let mut flo = f(lo)?;
    let mut fhi = f(hi)?;

    for _ in 0..max_expansions {
        if flo * fhi <= 0.0 {
            return Ok((lo, hi));
        }
        let half = 0.5 * (hi - lo);
        lo -= half;
        hi += half;
        flo = f(lo)?;
        fhi = f(hi)?;
    }

    Err(SolverError::NoBracket {
        what: "bracket expansion",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_root() {
        let f = |x: f64| -> SolverResult<f64> { Ok(x * x * x - 2.0) };
        let root = brent(f, 0.0, 2.0, &BrentConfig::default()).unwrap();
        assert!((root - 2f64.powf(1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_bracket() {
        let f = |x: f64| -> SolverResult<f64> { Ok(x * x + 1.0) };
        assert!(matches!(
            brent(f, -1.0, 1.0, &BrentConfig::default()),
            Err(SolverError::NoBracket { .. })
        ));
    }

    #[test]
    fn bracket_expansion_finds_sign_change() {
        let f = |x: f64| -> SolverResult<f64> { Ok(x - 10.0) };
        let (lo, hi) = expand_bracket(f, 0.0, 1.0, 60).unwrap();
        assert!(lo <= 10.0 && 10.0 <= hi);
        let root = brent(f, lo, hi, &BrentConfig::default()).unwrap();
        assert!((root - 10.0).abs() < 1e-10);
    }

    #[test]
    fn steep_exponential() {
        // Degenerate chemical-potential-like residual
        let f = |x: f64| -> SolverResult<f64> { Ok((x / 0.005).exp() - 1.0e8) };
        let (lo, hi) = expand_bracket(&f, -1.0, 1.0, 60).unwrap();
        let root = brent(&f, lo, hi, &BrentConfig::default()).unwrap();
        assert!((root - 0.005 * 1.0e8f64.ln()).abs() < 1e-9);
    }
}
