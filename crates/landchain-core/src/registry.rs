//! Registry facade.
//!
//! [`Registry`] wires the components together and is shared by every
//! connected party. [`ClientContext`] is one party: it owns that party's
//! [`SessionStore`] and routes every call through the current session.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{
    auth::{AuthorizationGate, Capability, Decision, Route},
    config::RegistryConfig,
    env::Environment,
    error::{ConfigError, RegistryError},
    identity::{Credential, IdentityValidator, Role, Session},
    ledger::{LatentLedger, Ledger, MemoryLedger, RecordFilter},
    lifecycle::{LifecycleEvent, OperationLifecycle, OperationRequest, PendingOperation},
    notification::NotificationProjector,
    record::{LandRecord, RegisterPayload, TransferPayload},
    session::SessionStore,
};

/// In-memory registry with simulated confirmation latency.
pub type MemoryRegistry<E> = Registry<LatentLedger<MemoryLedger, E>, E>;

/// Shared registry state.
#[derive(Debug)]
pub struct Registry<L, E> {
    config: RegistryConfig,
    env: E,
    validator: IdentityValidator,
    gate: AuthorizationGate,
    ledger: Arc<L>,
    lifecycle: OperationLifecycle<L, E>,
    projector: NotificationProjector,
}

impl<E: Environment> MemoryRegistry<E> {
    /// Registry over an empty [`MemoryLedger`], delaying each write by the
    /// configured confirmation latency.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` is invalid.
    pub fn in_memory(config: RegistryConfig, env: E) -> Result<Arc<Self>, ConfigError> {
        let latency = config.confirmation_latency();
        let ledger = LatentLedger::new(MemoryLedger::new(), env.clone(), latency);
        Self::new(config, ledger, env)
    }
}

impl<L: Ledger, E: Environment> Registry<L, E> {
    /// Build a registry over `ledger`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` is invalid.
    pub fn new(config: RegistryConfig, ledger: L, env: E) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;

        let ledger = Arc::new(ledger);
        let lifecycle =
            OperationLifecycle::new(Arc::clone(&ledger), env.clone(), config.operation_timeout());

        tracing::info!(
            owners = config.owners.len(),
            latency_ms = config.confirmation_latency_ms,
            timeout_ms = config.operation_timeout_ms,
            "registry ready"
        );

        Ok(Arc::new(Self {
            validator: IdentityValidator::new(&config),
            gate: AuthorizationGate::new(),
            projector: NotificationProjector::new(config.notification_window()),
            ledger,
            lifecycle,
            config,
            env,
        }))
    }

    /// Open a new, anonymous client context.
    pub fn client(self: &Arc<Self>) -> ClientContext<L, E> {
        ClientContext { registry: Arc::clone(self), session: SessionStore::new() }
    }

    /// Subscribe to lifecycle events of every client.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.lifecycle.subscribe()
    }

    /// Projector configured with the notification window.
    pub fn projector(&self) -> NotificationProjector {
        self.projector
    }

    /// The configuration the registry was built from.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }
}

/// One connected party.
///
/// Holds at most one session. Cheap to create; drop it to disconnect.
#[derive(Debug)]
pub struct ClientContext<L, E> {
    registry: Arc<Registry<L, E>>,
    session: SessionStore,
}

impl<L: Ledger, E: Environment> ClientContext<L, E> {
    /// Authenticate and make the new session current.
    ///
    /// On failure the existing session (if any) is kept.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredential` if the credential does not validate.
    pub fn connect(&self, credential: Credential) -> Result<Arc<Session>, RegistryError> {
        let session = Arc::new(self.registry.validator.validate(credential, &self.registry.env)?);
        self.session.set(Arc::clone(&session));
        Ok(session)
    }

    /// Drop the current session. Idempotent.
    pub fn disconnect(&self) {
        self.session.clear();
    }

    /// Current session, `None` when anonymous.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.session.get()
    }

    /// Current role.
    pub fn role(&self) -> Role {
        self.session.role()
    }

    /// Routes to offer the current session.
    pub fn visible_routes(&self) -> Vec<Route> {
        self.registry.gate.visible_routes(self.session().as_deref())
    }

    /// Check a capability for the current session without performing it.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the capability is denied.
    pub fn authorize(&self, capability: Capability<'_>) -> Result<Decision, RegistryError> {
        self.registry.gate.authorize(self.session().as_deref(), capability)
    }

    /// Look up one record.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank id, `NotFound` for an unknown one.
    pub fn lookup(&self, id: &str) -> Result<LandRecord, RegistryError> {
        self.registry.ledger.lookup(self.session().as_deref(), id)
    }

    /// Lazily list the records matching `filter`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` when anonymous.
    pub fn scan(&self, filter: RecordFilter) -> Result<L::Scan<'_>, RegistryError> {
        self.registry.ledger.scan(self.session().as_deref(), filter)
    }

    /// Submit a registration.
    ///
    /// # Errors
    ///
    /// `OperationInFlight` if this session already has a request pending.
    /// Ledger failures arrive through the returned handle and as `Failed`
    /// events.
    pub fn register(&self, payload: RegisterPayload) -> Result<PendingOperation, RegistryError> {
        self.registry.lifecycle.submit(OperationRequest::register(self.session(), payload))
    }

    /// Submit a transfer.
    ///
    /// # Errors
    ///
    /// Same as [`ClientContext::register`].
    pub fn transfer(&self, payload: TransferPayload) -> Result<PendingOperation, RegistryError> {
        self.registry.lifecycle.submit(OperationRequest::transfer(self.session(), payload))
    }

    /// The registry this client is connected to.
    pub fn registry(&self) -> &Arc<Registry<L, E>> {
        &self.registry
    }
}
