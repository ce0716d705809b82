//! Reference model for model-based testing.
//!
//! The model captures the ledger's access rules and record semantics without
//! any of the concurrency machinery. It serves as the oracle against which
//! [`MemoryLedger`](landchain_core::MemoryLedger) is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Rules not mechanism: Captures WHAT, not HOW
//! - Deterministic: Same inputs produce same outputs

pub mod operation;
mod real;
mod world;

pub use operation::{
    Actor, ModelAddress, ModelLandId, Observation, Operation, OperationResult, SearchTerm, land_id,
};
pub use real::RealWorld;
pub use world::ModelWorld;
