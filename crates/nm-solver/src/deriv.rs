//! Five-point central numerical differentiation.

use crate::error::SolverResult;

/// First derivative of `f` at `x` with explicit step `h`.
///
/// Five-point stencil, O(h⁴) truncation error.
pub fn central_deriv5<F>(mut f: F, x: f64, h: f64) -> SolverResult<f64>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    let fm2 = f(x - 2.0 * h)?;
    let fm1 = f(x - h)?;
    let fp1 = f(x + h)?;
    let fp2 = f(x + 2.0 * h)?;
    Ok((fm2 - 8.0 * fm1 + 8.0 * fp1 - fp2) / (12.0 * h))
}

/// First derivative with a relative step scaled to `x`.
///
/// `scale` guards the step when x is near zero.
pub fn deriv_rel<F>(f: F, x: f64, rel_step: f64, scale: f64) -> SolverResult<f64>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    let h = (x.abs().max(scale)) * rel_step;
    central_deriv5(f, x, h)
}
