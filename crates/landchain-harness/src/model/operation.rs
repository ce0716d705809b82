//! Operations for model-based testing.
//!
//! Operations are generated by proptest (or the fuzzer) and applied to both
//! the model and the real ledger. Ids, addresses and search terms are drawn
//! from small pools so that collisions, ownership matches and filter hits are
//! common.

use arbitrary::Arbitrary;
use landchain_core::{FailureKind, RegistryConfig};

/// Index into the land id pool.
pub type ModelLandId = u8;

/// Number of distinct land ids operations draw from.
const LAND_ID_POOL: u8 = 12;

/// Land id string for a pool index (`"1001"`..`"1012"`).
pub fn land_id(id: ModelLandId) -> String {
    (1001 + u32::from(id % LAND_ID_POOL)).to_string()
}

/// Who performs an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Arbitrary)]
pub enum Actor {
    /// No session.
    Anonymous,
    /// The configured admin.
    Admin,
    /// A configured owner, by index (wraps around the owner list).
    Owner(u8),
}

impl Actor {
    /// Principal address this actor's session acts as.
    pub fn address(self, config: &RegistryConfig) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Admin => Some(&config.admin.address),
            Self::Owner(n) => owner_index(n, config).map(|i| config.owners[i].address.as_str()),
        }
    }
}

fn owner_index(n: u8, config: &RegistryConfig) -> Option<usize> {
    (!config.owners.is_empty()).then(|| usize::from(n) % config.owners.len())
}

/// Address pool entry: one of the configured owners, or an outsider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub struct ModelAddress(pub u8);

impl ModelAddress {
    /// Address string. Every owner plus one outsider is reachable.
    pub fn resolve(self, config: &RegistryConfig) -> String {
        let slots = config.owners.len() + 1;
        config
            .owners
            .get(usize::from(self.0) % slots)
            .map_or_else(|| "0xOUTSIDER".to_string(), |owner| owner.address.clone())
    }
}

/// Search term pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub struct SearchTerm(pub u8);

impl SearchTerm {
    const POOL: [&'static str; 7] = ["", "100", "1012", "0x9EF", "efgh5679", "OUTSIDER", "zz"];

    /// Term string.
    pub fn text(self) -> &'static str {
        Self::POOL[usize::from(self.0) % Self::POOL.len()]
    }
}

/// Operations that can be applied to the system.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Register a record.
    Register {
        /// Acting party.
        actor: Actor,
        /// Land id.
        id: ModelLandId,
        /// Initial owner.
        owner: ModelAddress,
        /// Area as entered; zero and negative values must be rejected.
        area: i16,
    },

    /// Transfer a record.
    Transfer {
        /// Acting party.
        actor: Actor,
        /// Land id.
        id: ModelLandId,
        /// New owner.
        to: ModelAddress,
    },

    /// Look up one record.
    Lookup {
        /// Acting party.
        actor: Actor,
        /// Land id.
        id: ModelLandId,
    },

    /// List records matching a term.
    Scan {
        /// Acting party.
        actor: Actor,
        /// Search term.
        term: SearchTerm,
    },
}

/// What a successful operation revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// A single record, as `(id, owner)`.
    Record {
        /// Land id.
        id: String,
        /// Owner after the operation.
        owner: String,
    },
    /// Ids returned by a scan, in order.
    Ids(Vec<String>),
}

/// Result of applying an operation.
pub type OperationResult = Result<Observation, FailureKind>;
