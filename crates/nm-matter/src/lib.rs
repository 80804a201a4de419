//! nm-matter: sub-model evaluators for nucmat.
//!
//! Each module is one physical regime or service:
//! - fermion (ideal Fermi-gas kernels, degenerate-split quadrature)
//! - virial (low-density virial expansion with fugacity solver)
//! - skyrme (Skyrme functional at zero and finite temperature)
//! - qmc (QMC neutron-matter power law)
//! - nstar (neutron-star fit and the causal high-density continuation)
//! - lepton (electron/positron pairs plus photons)
//!
//! Everything is a pure function of its inputs and frozen parameters.

pub mod error;
pub mod fermion;
pub mod lepton;
pub mod nstar;
pub mod qmc;
pub mod skyrme;
pub mod virial;

pub use error::{MatterError, MatterResult};
pub use lepton::{ElectronPhotonGas, LeptonPoint};
pub use nstar::{CausalBranch, NsFitParameters, NsModel};
pub use qmc::QmcModel;
pub use skyrme::{FunctionalPoint, SaturationInputs, SkyrmeParameters};
pub use virial::{VirialCoefficientFit, VirialModel, VirialState, DEGENERACY_THRESHOLD};
