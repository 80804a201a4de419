//! nm-solver: numerical services for nucmat.
//!
//! Small dense nonlinear systems (damped Newton over nalgebra LU),
//! 1-D root finding (Brent with bracket expansion), finite-difference
//! Jacobians and five-point derivatives, composite Gauss-Legendre
//! quadrature, and the Gauss hypergeometric series needed by the causal
//! high-density branch. All routines are pure and report non-convergence
//! as errors.

pub mod brent;
pub mod deriv;
pub mod error;
pub mod hyp2f1;
pub mod jacobian;
pub mod newton;
pub mod quad;

pub use brent::{brent, expand_bracket, BrentConfig};
pub use deriv::{central_deriv5, deriv_rel};
pub use error::{SolverError, SolverResult};
pub use hyp2f1::hyp2f1;
pub use jacobian::{central_difference_jacobian, finite_difference_jacobian};
pub use newton::{newton_solve, newton_solve_fd, NewtonConfig, NewtonResult};
pub use quad::{gauss_legendre, gl_quadrature};
