//! Capability-based authorization.
//!
//! One rule set decides both what a client is offered (route visibility)
//! and what it may actually do (ledger checks), so hiding a link is never
//! the only thing standing between a client and a privileged operation.
//!
//! | capability       | required role                                          |
//! |------------------|--------------------------------------------------------|
//! | `ViewRecord`     | any, including anonymous                               |
//! | `ScanRecords`    | any authenticated session                              |
//! | `RegisterRecord` | admin                                                  |
//! | `TransferRecord` | owner whose principal equals the record's current owner|

use serde::{Deserialize, Serialize};

use crate::{
    error::RegistryError,
    identity::{Role, Session},
};

/// A named permission checked before a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability<'a> {
    /// Look up a single record by id.
    ViewRecord,
    /// List records through a filter.
    ScanRecords,
    /// Register a new record.
    RegisterRecord,
    /// Transfer a record.
    ///
    /// `current_owner: None` is a role-level pre-check ("may this session
    /// transfer anything at all"), used to decide what to offer. The ledger
    /// always checks with `Some(owner)` under its write lock.
    TransferRecord {
        /// Current `owner_address` of the target record.
        current_owner: Option<&'a str>,
    },
}

impl Capability<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::ViewRecord => "view record",
            Self::ScanRecords => "scan records",
            Self::RegisterRecord => "register record",
            Self::TransferRecord { .. } => "transfer record",
        }
    }
}

/// Outcome of a successful authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The capability is granted.
    Allowed,
}

/// Navigation destinations a presentation layer may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Landing page.
    Home,
    /// Register a new record (admin).
    Register,
    /// Transfer ownership (owner).
    Transfer,
    /// Single-record lookup.
    Lookup,
    /// Filtered record listing (authenticated).
    Dashboard,
}

impl Route {
    /// All routes, in display order.
    pub const ALL: [Self; 5] =
        [Self::Home, Self::Register, Self::Transfer, Self::Lookup, Self::Dashboard];

    /// Capability a session needs for this route to be offered.
    fn requires(self) -> Option<Capability<'static>> {
        match self {
            Self::Home => None,
            Self::Register => Some(Capability::RegisterRecord),
            Self::Transfer => Some(Capability::TransferRecord { current_owner: None }),
            Self::Lookup => Some(Capability::ViewRecord),
            Self::Dashboard => Some(Capability::ScanRecords),
        }
    }
}

/// Stateless authorization decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Create a gate.
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `session` (`None` = anonymous) holds `capability`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Unauthorized` when the capability is denied.
    /// The reason names the capability and the role, never the record.
    pub fn authorize(
        &self,
        session: Option<&Session>,
        capability: Capability<'_>,
    ) -> Result<Decision, RegistryError> {
        let role = Role::of(session);

        let allowed = match capability {
            Capability::ViewRecord => true,
            Capability::ScanRecords => role != Role::Anonymous,
            Capability::RegisterRecord => role == Role::Admin,
            Capability::TransferRecord { current_owner } => match (session, current_owner) {
                (Some(s), Some(owner)) => {
                    s.role() == Role::Owner && s.principal_address() == owner
                },
                (Some(s), None) => s.role() == Role::Owner,
                (None, _) => false,
            },
        };

        if allowed {
            Ok(Decision::Allowed)
        } else {
            tracing::debug!(%role, capability = capability.name(), "authorization denied");
            Err(RegistryError::unauthorized(format!("{role} may not {}", capability.name())))
        }
    }

    /// Shorthand for `authorize(..).is_ok()`.
    pub fn permits(&self, session: Option<&Session>, capability: Capability<'_>) -> bool {
        self.authorize(session, capability).is_ok()
    }

    /// Routes to offer `session`, in display order.
    pub fn visible_routes(&self, session: Option<&Session>) -> Vec<Route> {
        Route::ALL
            .into_iter()
            .filter(|route| route.requires().is_none_or(|cap| self.permits(session, cap)))
            .collect()
    }
}
