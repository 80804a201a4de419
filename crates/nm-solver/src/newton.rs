//! Newton solver with positivity constraints.

use crate::error::{SolverError, SolverResult};
use crate::jacobian::central_difference_jacobian;
use nalgebra::DVector;
use tracing::trace;

/// Newton solver configuration.
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm
    pub rel_tol: f64,
    /// Lower bound every solution component must stay above (e.g. 0 for
    /// fugacities); None disables the constraint
    pub min_component: Option<f64>,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-12,
            rel_tol: 1e-12,
            min_component: None,
            line_search_beta: 0.5,
            max_line_search_iters: 25,
        }
    }
}

/// Newton iteration result.
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Newton solver with line search and optional component lower bounds.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<nalgebra::DMatrix<f64>>,
{
    let mut x = x0.clone();
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm.max(f64::MIN_POSITIVE);

    for iter in 0..config.max_iterations {
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            trace!(iter, r_norm, "newton converged");
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&x)?;

        // Solve J * dx = -r
        let dx = jac
            .lu()
            .solve(&(-r.clone()))
            .ok_or_else(|| SolverError::Numeric {
                what: "Jacobian solve failed".to_string(),
            })?;

        // Line search with bound constraints
        let mut alpha = 1.0;
        let mut x_new = &x + alpha * &dx;
        let mut r_new = residual_fn(&x_new)?;
        let mut r_new_norm = r_new.norm();

        for _ in 0..config.max_line_search_iters {
            let valid = match config.min_component {
                Some(bound) => x_new.iter().all(|&v| v > bound),
                None => true,
            };

            if valid && r_new_norm.is_finite() && r_new_norm < r_norm {
                break;
            }

            // Backtrack
            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
            r_new = residual_fn(&x_new)?;
            r_new_norm = r_new.norm();
        }

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;

        if alpha < 1e-10 {
            return Err(SolverError::ConvergenceFailed {
                what: format!("Line search stagnated at iteration {}", iter),
            });
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}

/// Newton solve with a central-difference Jacobian.
///
/// Convenience wrapper for residuals without an analytic Jacobian
/// (the causality-branch coefficient systems).
pub fn newton_solve_fd<F>(
    x0: DVector<f64>,
    residual_fn: F,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    newton_solve(
        x0,
        &residual_fn,
        |x| central_difference_jacobian(x, &residual_fn, 1e-7),
        config,
    )
}
