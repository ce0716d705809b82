//! Identity validation.
//!
//! Turns a claimed role plus a presented identifier into a [`Session`], or
//! rejects it. Validation is pure with respect to the configured identities:
//! nothing is cached, counted or retried here.

use std::{collections::HashMap, fmt, time::SystemTime};

use serde::{Deserialize, Serialize};

use crate::{
    config::{Account, RegistryConfig},
    env::Environment,
    error::RegistryError,
};

/// Role a party acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Registry administrator. May register new records.
    Admin,
    /// Land owner. May transfer records they currently own.
    Owner,
    /// No session. May only look up single records.
    Anonymous,
}

impl Role {
    /// Role of an optional session; no session means anonymous.
    pub fn of(session: Option<&Session>) -> Self {
        session.map_or(Self::Anonymous, Session::role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Owner => f.write_str("owner"),
            Self::Anonymous => f.write_str("anonymous"),
        }
    }
}

/// A claim to act under a role, consumed once by [`IdentityValidator`].
///
/// # Security
///
/// - **Debug Redaction**: `presented_id` is the secret part of the claim, so
///   `Debug` prints only its length.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Role being claimed.
    pub claimed_role: Role,
    /// Identifier presented as proof.
    pub presented_id: String,
}

impl Credential {
    /// Create a credential.
    pub fn new(claimed_role: Role, presented_id: impl Into<String>) -> Self {
        Self { claimed_role, presented_id: presented_id.into() }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("claimed_role", &self.claimed_role)
            .field("presented_id", &format!("<redacted {} bytes>", self.presented_id.len()))
            .finish()
    }
}

/// Opaque session identifier.
///
/// Keys the per-session in-flight latch and tags lifecycle events so an
/// observer can pick out its own operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Authenticated context for one client.
///
/// Immutable once created. Re-authentication produces a new `Session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    role: Role,
    principal_address: String,
    established_at: SystemTime,
}

impl Session {
    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Role of this session. Never `Anonymous`.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Address this session acts as.
    pub fn principal_address(&self) -> &str {
        &self.principal_address
    }

    /// When the session was established.
    pub fn established_at(&self) -> SystemTime {
        self.established_at
    }
}

/// Validates credentials against the configured identities.
#[derive(Debug, Clone)]
pub struct IdentityValidator {
    admin: Account,
    /// Owner id -> principal address.
    owners: HashMap<String, String>,
}

impl IdentityValidator {
    /// Build a validator from configuration.
    pub fn new(config: &RegistryConfig) -> Self {
        let owners = config.owners.iter().map(|o| (o.id.clone(), o.address.clone())).collect();
        Self { admin: config.admin.clone(), owners }
    }

    /// Validate a credential and establish a session.
    ///
    /// Identifiers are compared exactly (case-sensitive, no trimming).
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidCredential` if the identifier does not
    /// match the claimed role, or if the claimed role is `Anonymous`. The
    /// reason never reveals which identifiers would have been accepted.
    pub fn validate<E: Environment>(
        &self,
        credential: Credential,
        env: &E,
    ) -> Result<Session, RegistryError> {
        let address = match credential.claimed_role {
            Role::Admin if credential.presented_id == self.admin.id => self.admin.address.clone(),
            Role::Admin => return Err(reject(credential.claimed_role, "invalid admin id")),
            Role::Owner => match self.owners.get(&credential.presented_id) {
                Some(address) => address.clone(),
                None => return Err(reject(credential.claimed_role, "invalid owner id")),
            },
            Role::Anonymous => {
                return Err(reject(credential.claimed_role, "anonymous is not an identity"));
            },
        };

        let session = Session {
            id: SessionId(env.random_u64()),
            role: credential.claimed_role,
            principal_address: address,
            established_at: env.wall_clock(),
        };

        tracing::info!(
            session = %session.id,
            role = %session.role,
            principal = %session.principal_address,
            "session established"
        );

        Ok(session)
    }
}

fn reject(role: Role, reason: &str) -> RegistryError {
    tracing::warn!(claimed_role = %role, "credential rejected");
    RegistryError::InvalidCredential { reason: reason.to_string() }
}
