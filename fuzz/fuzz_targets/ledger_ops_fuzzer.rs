//! Fuzz target for [`MemoryLedger`] access rules
//!
//! Prevent privilege escalation and lost or duplicated records via arbitrary
//! operation sequences
//!
//! # Strategy
//!
//! - Operation sequences: registers, transfers, lookups and scans from every
//!   kind of actor
//! - Small pools: ids, addresses and search terms collide often, so
//!   duplicates, ownership matches and filter hits are exercised
//! - Oracle: every result is compared against the reference model
//!
//! # Invariants
//!
//! - Every result (success value or failure kind) matches the model
//! - Only an admin ever registers; only the current owner ever transfers
//! - A failed operation leaves the record set unchanged
//! - Ids stay unique; registration order is preserved
//! - NEVER panic on any operation

#![no_main]

use arbitrary::Arbitrary;
use landchain_core::RegistryConfig;
use landchain_harness::{ModelWorld, Operation, RealWorld};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    seed: u64,
    ops: Vec<Operation>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(rt) = tokio::runtime::Builder::new_current_thread().build() else {
        return;
    };
    let mut model = ModelWorld::new(RegistryConfig::default());
    let real = RealWorld::new(RegistryConfig::default(), input.seed);

    for op in input.ops.iter().take(256) {
        let before = real.records();
        let model_result = model.apply(op);
        let real_result = rt.block_on(real.apply(op));

        assert_eq!(model_result, real_result, "divergence on {op:?}");

        if real_result.is_err() {
            assert_eq!(before, real.records(), "failed {op:?} changed the ledger");
        }
    }

    let records = real.records();
    assert_eq!(model.records(), records.as_slice());

    let mut ids: Vec<_> = records.iter().map(|(id, _)| id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), records.len(), "duplicate ids");
});
