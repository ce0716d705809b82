//! LandChain registry core.
//!
//! Identity, authorization and the operation lifecycle for a land-title
//! registry. The ledger is a trait; this crate ships an in-memory ledger and
//! a wrapper that models confirmation latency.
//!
//! ## Architecture
//!
//! ```text
//! landchain-core
//!   ├─ IdentityValidator      (credential -> Session)
//!   ├─ SessionStore           (one session per client context)
//!   ├─ AuthorizationGate      (capabilities + route visibility)
//!   ├─ Ledger                 (insert / transfer / lookup / scan)
//!   │    ├─ MemoryLedger
//!   │    └─ LatentLedger      (simulated confirmation latency)
//!   ├─ OperationLifecycle     (Idle -> Pending -> Succeeded | Failed)
//!   ├─ NotificationProjector  (events -> display messages)
//!   └─ Registry               (facade; one ClientContext per party)
//! ```
//!
//! All time and randomness come from [`Environment`], so the harness can
//! drive everything deterministically.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod env;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod lifecycle;
pub mod notification;
pub mod record;
pub mod registry;
pub mod session;

pub use auth::{AuthorizationGate, Capability, Decision, Route};
pub use config::{Account, RegistryConfig};
pub use env::Environment;
pub use error::{ConfigError, FailureKind, RegistryError};
pub use identity::{Credential, IdentityValidator, Role, Session, SessionId};
pub use ledger::{LatentLedger, Ledger, MemoryLedger, MemoryScan, RecordFilter};
pub use lifecycle::{
    EventDetail, LifecycleEvent, LifecycleState, OperationKind, OperationLifecycle,
    OperationPayload, OperationRequest, PendingOperation, RequestRef,
};
pub use notification::{
    DismissTimer, DismissToken, Notification, NotificationKind, NotificationProjector,
    NotificationSlot,
};
pub use record::{LandRecord, RegisterPayload, TransferPayload};
pub use registry::{ClientContext, MemoryRegistry, Registry};
pub use session::SessionStore;
