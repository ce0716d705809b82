//! Single-slot session store.
//!
//! One store per client context. Holds at most one live [`Session`]; setting
//! a new one silently replaces the old one, since a client acts under exactly
//! one identity at a time.

use std::sync::{Arc, PoisonError, RwLock};

use crate::identity::{Role, Session};

/// Concurrency-safe slot for the current client's session.
///
/// Independent of ledger locking: holding the slot never blocks ledger
/// operations and vice versa.
#[derive(Debug, Default)]
pub struct SessionStore {
    slot: RwLock<Option<Arc<Session>>>,
}

impl SessionStore {
    /// Create an empty (anonymous) store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session, replacing any existing one.
    pub fn set(&self, session: impl Into<Arc<Session>>) {
        let session = session.into();
        let previous = self.write().replace(Arc::clone(&session));

        if let Some(previous) = previous {
            tracing::debug!(
                replaced = %previous.id(),
                session = %session.id(),
                "session replaced"
            );
        }
    }

    /// Current session, or `None` when anonymous.
    ///
    /// The returned `Arc` stays valid even if the slot is replaced or cleared
    /// afterwards; callers see a consistent session for the whole operation.
    pub fn get(&self) -> Option<Arc<Session>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current role, `Anonymous` when no session is set.
    pub fn role(&self) -> Role {
        Role::of(self.get().as_deref())
    }

    /// Drop the current session. Idempotent.
    pub fn clear(&self) {
        if let Some(previous) = self.write().take() {
            tracing::debug!(session = %previous.id(), "session cleared");
        }
    }

    // The slot is a plain `Option`; a panic while holding the lock cannot
    // leave it half-written, so a poisoned lock is still usable.
    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Arc<Session>>> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }
}
