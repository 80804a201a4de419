//! nm-eos: the EOS synthesis engine.
//!
//! Blends the virial, QMC, functional, and neutron-star sub-models from
//! `nm-matter` into one globally consistent free-energy surface with
//! analytic first derivatives.
//!
//! Contains:
//! - eos (the blended evaluation and its derivative propagation)
//! - sound (fixed-Ye / fixed-mu_L sound speeds from numerical second
//!   derivatives)
//! - select (model validator/selector + bounded-retry random sampler)
//! - tables (frozen neutron-star and functional reference rows)
//! - sweep (parallel in-memory grid evaluation)

pub mod blend;
pub mod eos;
pub mod error;
pub mod select;
pub mod sound;
pub mod state;
pub mod sweep;
pub mod tables;

pub use blend::BlendParameters;
pub use eos::{Eos, ModelInput, ModelSelection};
pub use error::{EosError, EosResult};
pub use select::{RejectionReason, SelectError, SelectOptions};
pub use state::{CompositionPoint, EosPoint, ThermodynamicBundle};
pub use sweep::{sweep_fixed_ye, virial_comparison, SweepAxis, SweepPoint, SweepSpacing};
pub use tables::{FunctionalTable, NsTable, SaturationRow};
