//! Deterministic test support for the LandChain registry.
//!
//! - [`SimEnv`]: seeded RNG and a clock that only moves when told to
//! - [`model`]: reference model of the ledger and its access rules, plus a
//!   wrapper applying the same operations to the real ledger
//!
//! # Model-Based Testing
//!
//! Operations are applied to both [`ModelWorld`] and [`RealWorld`] and their
//! results and final record sets compared. The same [`Operation`] type feeds
//! the proptest suite and the fuzz target.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod sim_env;

pub use model::{
    Actor, ModelAddress, ModelLandId, ModelWorld, Observation, Operation, OperationResult,
    RealWorld, SearchTerm,
};
pub use sim_env::SimEnv;
