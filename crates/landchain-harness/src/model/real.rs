//! Real world: the same operations against [`MemoryLedger`].

use std::time::SystemTime;

use landchain_core::{
    Credential, IdentityValidator, Ledger, MemoryLedger, RecordFilter, RegisterPayload,
    RegistryConfig, Role, Session, TransferPayload,
};

use super::operation::{Actor, Observation, Operation, OperationResult, land_id};
use crate::SimEnv;

/// Wraps a [`MemoryLedger`] behind the model's operation interface.
///
/// Sessions are established once per actor and reused.
#[derive(Debug)]
pub struct RealWorld {
    config: RegistryConfig,
    ledger: MemoryLedger,
    admin: Option<Session>,
    owners: Vec<Session>,
    registered_at: SystemTime,
}

impl RealWorld {
    /// Empty ledger; sessions drawn from a `SimEnv` seeded with `seed`.
    pub fn new(config: RegistryConfig, seed: u64) -> Self {
        let env = SimEnv::with_seed(seed);
        let validator = IdentityValidator::new(&config);
        let connect = |credential: Credential| validator.validate(credential, &env).ok();

        let admin = connect(Credential::new(Role::Admin, config.admin.id.clone()));
        let owners = config
            .owners
            .iter()
            .filter_map(|owner| connect(Credential::new(Role::Owner, owner.id.clone())))
            .collect();

        Self {
            config,
            ledger: MemoryLedger::new(),
            admin,
            owners,
            registered_at: SystemTime::UNIX_EPOCH,
        }
    }

    /// The ledger under test.
    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }

    /// Every record, as `(id, owner)`, read through an admin scan.
    pub fn records(&self) -> Vec<(String, String)> {
        self.ledger
            .scan(self.session(Actor::Admin), RecordFilter::all())
            .map(|scan| scan.map(|r| (r.id, r.owner_address)).collect())
            .unwrap_or_default()
    }

    /// Apply an operation to the ledger.
    pub async fn apply(&self, op: &Operation) -> OperationResult {
        let result = match *op {
            Operation::Register { actor, id, owner, area } => {
                let payload = RegisterPayload {
                    id: land_id(id),
                    owner_address: owner.resolve(&self.config),
                    area_sq_meters: i64::from(area),
                    location_hash: format!("HASH-{id:08}"),
                    valuation_usd: 100_000,
                };
                self.ledger.insert(self.session(actor), payload, self.registered_at).await
            },
            Operation::Transfer { actor, id, to } => {
                let new_owner_address = to.resolve(&self.config);
                let payload = TransferPayload { id: land_id(id), new_owner_address };
                self.ledger.transfer_owner(self.session(actor), payload).await
            },
            Operation::Lookup { actor, id } => {
                self.ledger.lookup(self.session(actor), &land_id(id))
            },
            Operation::Scan { actor, term } => {
                return self
                    .ledger
                    .scan(self.session(actor), RecordFilter::new(term.text()))
                    .map(|scan| Observation::Ids(scan.map(|r| r.id).collect()))
                    .map_err(|e| e.kind());
            },
        };

        result
            .map(|record| Observation::Record { id: record.id, owner: record.owner_address })
            .map_err(|e| e.kind())
    }

    fn session(&self, actor: Actor) -> Option<&Session> {
        match actor {
            Actor::Anonymous => None,
            Actor::Admin => self.admin.as_ref(),
            Actor::Owner(n) => self.owners.get(usize::from(n) % self.owners.len().max(1)),
        }
    }
}
