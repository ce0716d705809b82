//! Registry error types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from registry operations.
///
/// Every variant is recoverable by the caller: resubmit with corrected input
/// or credentials. None of them is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Credential did not match the configured identities.
    ///
    /// The reason never names which identifiers are valid.
    #[error("invalid credential: {reason}")]
    InvalidCredential {
        /// Human-readable reason.
        reason: String,
    },

    /// Session lacks the capability for the operation.
    ///
    /// Never discloses whether the target record exists.
    #[error("unauthorized: {reason}")]
    Unauthorized {
        /// Human-readable reason.
        reason: String,
    },

    /// A record with this id is already registered.
    #[error("land id already registered: {id}")]
    DuplicateId {
        /// The conflicting id.
        id: String,
    },

    /// No record with this id.
    #[error("land record not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A field value violates a business invariant.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The ledger did not confirm within the operation timeout.
    #[error("operation timed out after {}ms", after.as_millis())]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
    },

    /// The session already has a mutating operation in flight.
    #[error("another operation from this session is still pending")]
    OperationInFlight,

    /// Internal failure (poisoned lock, lost worker).
    #[error("internal error: {reason}")]
    Internal {
        /// Description of the failure.
        reason: String,
    },
}

/// Stable failure classification carried on `Failed` lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// See [`RegistryError::InvalidCredential`].
    InvalidCredential,
    /// See [`RegistryError::Unauthorized`].
    Unauthorized,
    /// See [`RegistryError::DuplicateId`].
    DuplicateId,
    /// See [`RegistryError::NotFound`].
    NotFound,
    /// See [`RegistryError::Validation`].
    Validation,
    /// See [`RegistryError::Timeout`].
    Timeout,
    /// See [`RegistryError::OperationInFlight`].
    OperationInFlight,
    /// See [`RegistryError::Internal`].
    Internal,
}

impl RegistryError {
    /// Stable kind for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidCredential { .. } => FailureKind::InvalidCredential,
            Self::Unauthorized { .. } => FailureKind::Unauthorized,
            Self::DuplicateId { .. } => FailureKind::DuplicateId,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::Validation { .. } => FailureKind::Validation,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::OperationInFlight => FailureKind::OperationInFlight,
            Self::Internal { .. } => FailureKind::Internal,
        }
    }

    /// Returns true if resubmitting the identical request could succeed.
    ///
    /// Input and permission errors need corrected input first; timeouts and
    /// contention can clear on their own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::OperationInFlight | Self::Internal { .. } => true,

            Self::InvalidCredential { .. }
            | Self::Unauthorized { .. }
            | Self::DuplicateId { .. }
            | Self::NotFound { .. }
            | Self::Validation { .. } => false,
        }
    }

    pub(crate) fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized { reason: reason.into() }
    }

    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation { field, reason: reason.into() }
    }

    pub(crate) fn poisoned(what: &str) -> Self {
        Self::Internal { reason: format!("{what} lock poisoned") }
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An account identifier or address is blank.
    #[error("blank {what} in configuration")]
    Blank {
        /// Which value is blank.
        what: &'static str,
    },

    /// The same identifier is configured twice.
    #[error("identifier configured more than once: {id}")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: String,
    },

    /// A duration that must be positive is zero.
    #[error("{what} must be greater than zero")]
    ZeroDuration {
        /// Which setting.
        what: &'static str,
    },
}
