//! Model world: the oracle.
//!
//! A `Vec` of `(id, owner)` pairs and the access rules written out longhand.
//! No locks, no indexes, no async.

use landchain_core::{FailureKind, RegistryConfig};

use super::operation::{Actor, Observation, Operation, OperationResult, land_id};

/// Reference implementation of the ledger and its access rules.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    config: RegistryConfig,
    /// `(id, owner)` in registration order.
    records: Vec<(String, String)>,
}

impl ModelWorld {
    /// Empty world for the given identities.
    pub fn new(config: RegistryConfig) -> Self {
        Self { config, records: Vec::new() }
    }

    /// Configuration the world was built with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Every record, as `(id, owner)`, in registration order.
    pub fn records(&self) -> &[(String, String)] {
        &self.records
    }

    /// Apply an operation and return the result the real ledger must match.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match *op {
            Operation::Register { actor, id, owner, area } => {
                if actor != Actor::Admin {
                    return Err(FailureKind::Unauthorized);
                }
                if area <= 0 {
                    return Err(FailureKind::Validation);
                }
                let id = land_id(id);
                if self.position(&id).is_some() {
                    return Err(FailureKind::DuplicateId);
                }
                let owner = owner.resolve(&self.config);
                self.records.push((id.clone(), owner.clone()));
                Ok(Observation::Record { id, owner })
            },
            Operation::Transfer { actor, id, to } => {
                let Actor::Owner(_) = actor else {
                    return Err(FailureKind::Unauthorized);
                };
                let id = land_id(id);
                let Some(position) = self.position(&id) else {
                    return Err(FailureKind::NotFound);
                };
                if actor.address(&self.config) != Some(self.records[position].1.as_str()) {
                    return Err(FailureKind::Unauthorized);
                }
                let to = to.resolve(&self.config);
                self.records[position].1.clone_from(&to);
                Ok(Observation::Record { id, owner: to })
            },
            Operation::Lookup { id, .. } => {
                let id = land_id(id);
                let position = self.position(&id).ok_or(FailureKind::NotFound)?;
                Ok(Observation::Record { id, owner: self.records[position].1.clone() })
            },
            Operation::Scan { actor, term } => {
                if actor == Actor::Anonymous {
                    return Err(FailureKind::Unauthorized);
                }
                let term = term.text();
                let lower = term.to_lowercase();
                let ids = self
                    .records
                    .iter()
                    .filter(|(id, owner)| {
                        id.contains(term) || owner.to_lowercase().contains(&lower)
                    })
                    .map(|(id, _)| id.clone())
                    .collect();
                Ok(Observation::Ids(ids))
            },
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|(existing, _)| existing == id)
    }
}
