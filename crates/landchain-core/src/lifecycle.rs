//! Operation lifecycle.
//!
//! Drives one mutating request (register or transfer) through
//!
//! ```text
//! Idle ──submit──▶ Pending ──ledger ok──▶ Succeeded
//!                     │
//!                     └──ledger err / timeout──▶ Failed
//! ```
//!
//! and broadcasts a [`LifecycleEvent`] on every transition.
//!
//! # Invariants
//!
//! - `Pending` is emitted synchronously inside [`OperationLifecycle::submit`],
//!   before the ledger call is issued.
//! - At most one operation per session is in flight. Enforced by a
//!   per-session latch here, never by the ledger lock, so one session's
//!   pending write never blocks another session.
//! - Every request that entered `Pending` reaches exactly one terminal event.
//!   Failures are never swallowed; a worker that dies without reporting (a
//!   panicking ledger, runtime shutdown) reports `Failed` with `Internal`.
//! - Once `Pending`, the request is irrevocable: it runs on its own task and
//!   dropping the [`PendingOperation`] handle does not cancel it.
//! - No automatic retries. A retry is a new request.

use std::{
    collections::HashSet,
    fmt,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, oneshot};

use crate::{
    env::Environment,
    error::{FailureKind, RegistryError},
    identity::{Session, SessionId},
    ledger::Ledger,
    record::{LandRecord, RegisterPayload, TransferPayload},
};

/// Capacity of the lifecycle event channel. Slow observers that fall further
/// behind than this see `RecvError::Lagged`.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Reference correlating the events of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestRef(pub u64);

impl fmt::Display for RequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Kind of mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Register a new record.
    Register,
    /// Transfer an existing record.
    Transfer,
}

/// Payload of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationPayload {
    /// Registration fields.
    Register(RegisterPayload),
    /// Transfer fields.
    Transfer(TransferPayload),
}

impl OperationPayload {
    /// Kind of operation this payload drives.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Register(_) => OperationKind::Register,
            Self::Transfer(_) => OperationKind::Transfer,
        }
    }

    /// Target land id.
    pub fn land_id(&self) -> &str {
        match self {
            Self::Register(p) => &p.id,
            Self::Transfer(p) => &p.id,
        }
    }
}

/// A mutating request. Consumed by [`OperationLifecycle::submit`].
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// Session acting; `None` for an anonymous client.
    pub session: Option<Arc<Session>>,
    /// What to do.
    pub payload: OperationPayload,
}

impl OperationRequest {
    /// Registration request.
    pub fn register(session: Option<Arc<Session>>, payload: RegisterPayload) -> Self {
        Self { session, payload: OperationPayload::Register(payload) }
    }

    /// Transfer request.
    pub fn transfer(session: Option<Arc<Session>>, payload: TransferPayload) -> Self {
        Self { session, payload: OperationPayload::Transfer(payload) }
    }
}

/// Lifecycle state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Not yet submitted. Never emitted.
    Idle,
    /// Submitted, awaiting the ledger.
    Pending,
    /// Terminal: the ledger committed the change.
    Succeeded,
    /// Terminal: the ledger rejected the change or it timed out.
    Failed,
}

impl LifecycleState {
    /// Whether no further transition follows.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// What an event reports, beyond its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDetail {
    /// Request accepted for processing.
    Submitted {
        /// Target land id.
        id: String,
    },
    /// Record registered.
    Registered {
        /// Registered land id.
        id: String,
    },
    /// Record transferred.
    Transferred {
        /// Transferred land id.
        id: String,
        /// Owner after the transfer.
        new_owner: String,
    },
    /// Request failed.
    Failed {
        /// Stable failure classification.
        kind: FailureKind,
        /// Human-readable message.
        message: String,
    },
}

/// A lifecycle transition, delivered to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Request this event belongs to.
    pub request: RequestRef,
    /// Session that submitted the request, if any.
    pub session: Option<SessionId>,
    /// Operation kind.
    pub kind: OperationKind,
    /// New state.
    pub state: LifecycleState,
    /// Details of the transition.
    pub detail: EventDetail,
}

/// Handle to a submitted request.
///
/// Dropping it does not cancel the request.
#[derive(Debug)]
pub struct PendingOperation {
    request: RequestRef,
    outcome: oneshot::Receiver<Result<LandRecord, RegistryError>>,
}

impl PendingOperation {
    /// Reference of the submitted request.
    pub fn request(&self) -> RequestRef {
        self.request
    }

    /// Wait for the terminal outcome.
    ///
    /// # Errors
    ///
    /// Returns the ledger's error (or `Timeout`) for a failed request, or
    /// `Internal` if the worker was lost before reporting.
    pub async fn outcome(self) -> Result<LandRecord, RegistryError> {
        self.outcome.await.unwrap_or_else(|_| {
            Err(RegistryError::Internal { reason: "operation worker dropped".to_string() })
        })
    }
}

type Latch = Arc<Mutex<HashSet<SessionId>>>;

/// Releases a session's in-flight slot when dropped.
struct InFlightGuard {
    latch: Latch,
    session: SessionId,
}

impl InFlightGuard {
    fn acquire(latch: &Latch, session: SessionId) -> Option<Self> {
        let acquired = latch.lock().unwrap_or_else(PoisonError::into_inner).insert(session);
        acquired.then(|| Self { latch: Arc::clone(latch), session })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.latch.lock().unwrap_or_else(PoisonError::into_inner).remove(&self.session);
    }
}

/// Drives mutating requests against a ledger.
pub struct OperationLifecycle<L, E> {
    ledger: Arc<L>,
    env: E,
    events: broadcast::Sender<LifecycleEvent>,
    in_flight: Latch,
    next_request: AtomicU64,
    timeout: Duration,
}

impl<L: Ledger, E: Environment> OperationLifecycle<L, E> {
    /// Create a lifecycle over `ledger`. Each operation is bounded by
    /// `timeout`.
    pub fn new(ledger: Arc<L>, env: E, timeout: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            ledger,
            env,
            events,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            next_request: AtomicU64::new(1),
            timeout,
        }
    }

    /// Subscribe to lifecycle events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// Whether `session` has an operation in flight.
    pub fn is_in_flight(&self, session: SessionId) -> bool {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner).contains(&session)
    }

    /// Submit a request.
    ///
    /// On return the request is `Pending`, the `Pending` event has been
    /// broadcast, and the ledger call runs on its own task. Must be called
    /// from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - `OperationInFlight` if the session already has a pending request;
    ///   the new request never enters `Pending` and emits nothing
    /// - `Internal` if no tokio runtime is available
    pub fn submit(&self, request: OperationRequest) -> Result<PendingOperation, RegistryError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| RegistryError::Internal {
            reason: format!("no async runtime: {e}"),
        })?;

        let OperationRequest { session, payload } = request;
        let session_id = session.as_ref().map(|s| s.id());

        let guard = match session_id {
            Some(id) => match InFlightGuard::acquire(&self.in_flight, id) {
                Some(guard) => Some(guard),
                None => {
                    tracing::debug!(session = %id, "operation rejected: another is in flight");
                    return Err(RegistryError::OperationInFlight);
                },
            },
            None => None,
        };

        let request = RequestRef(self.next_request.fetch_add(1, Ordering::Relaxed));
        let kind = payload.kind();

        tracing::info!(%request, ?kind, id = payload.land_id(), "operation pending");
        self.emit(LifecycleEvent {
            request,
            session: session_id,
            kind,
            state: LifecycleState::Pending,
            detail: EventDetail::Submitted { id: payload.land_id().to_string() },
        });

        let (reply, outcome) = oneshot::channel();
        let completion = Completion {
            request,
            session: session_id,
            kind,
            events: self.events.clone(),
            latch: guard,
            reply: Some(reply),
        };
        let worker = Worker {
            ledger: Arc::clone(&self.ledger),
            env: self.env.clone(),
            timeout: self.timeout,
        };

        runtime.spawn(async move {
            let result = worker.run(session.as_deref(), payload).await;
            completion.finish(result);
        });

        Ok(PendingOperation { request, outcome })
    }

    fn emit(&self, event: LifecycleEvent) {
        emit(&self.events, event);
    }
}

impl<L, E> fmt::Debug for OperationLifecycle<L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationLifecycle")
            .field("observers", &self.events.receiver_count())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// The part of the lifecycle that runs on the spawned task.
struct Worker<L, E> {
    ledger: Arc<L>,
    env: E,
    timeout: Duration,
}

impl<L: Ledger, E: Environment> Worker<L, E> {
    async fn run(
        &self,
        session: Option<&Session>,
        payload: OperationPayload,
    ) -> Result<LandRecord, RegistryError> {
        let call = async {
            match payload {
                OperationPayload::Register(p) => {
                    self.ledger.insert(session, p, self.env.wall_clock()).await
                },
                OperationPayload::Transfer(p) => self.ledger.transfer_owner(session, p).await,
            }
        };

        // A confirmation landing on the deadline counts as a commit.
        tokio::select! {
            biased;
            result = call => result,
            () = self.env.sleep(self.timeout) => {
                Err(RegistryError::Timeout { after: self.timeout })
            },
        }
    }
}

/// Terminal reporting for one request.
///
/// Reports exactly once. If the worker never reaches [`Completion::finish`]
/// (the ledger panicked, or the runtime shut down first), dropping the
/// completion reports an `Internal` failure instead.
struct Completion {
    request: RequestRef,
    session: Option<SessionId>,
    kind: OperationKind,
    events: broadcast::Sender<LifecycleEvent>,
    latch: Option<InFlightGuard>,
    reply: Option<oneshot::Sender<Result<LandRecord, RegistryError>>>,
}

impl Completion {
    fn finish(mut self, result: Result<LandRecord, RegistryError>) {
        self.report(result);
    }

    fn report(&mut self, result: Result<LandRecord, RegistryError>) {
        let Some(reply) = self.reply.take() else {
            return;
        };

        // Free the slot first: an observer reacting to the terminal event
        // may submit the session's next request.
        drop(self.latch.take());

        let request = self.request;
        let kind = self.kind;
        let (state, detail) = match &result {
            Ok(record) => {
                tracing::info!(%request, ?kind, id = %record.id, "operation succeeded");
                let detail = match kind {
                    OperationKind::Register => EventDetail::Registered { id: record.id.clone() },
                    OperationKind::Transfer => EventDetail::Transferred {
                        id: record.id.clone(),
                        new_owner: record.owner_address.clone(),
                    },
                };
                (LifecycleState::Succeeded, detail)
            },
            Err(err) => {
                tracing::warn!(%request, ?kind, error = %err, "operation failed");
                (LifecycleState::Failed, EventDetail::Failed {
                    kind: err.kind(),
                    message: err.to_string(),
                })
            },
        };

        emit(&self.events, LifecycleEvent { request, session: self.session, kind, state, detail });
        let _ = reply.send(result);
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.reply.is_some() {
            self.report(Err(RegistryError::Internal {
                reason: "operation worker stopped before completing".to_string(),
            }));
        }
    }
}

fn emit(events: &broadcast::Sender<LifecycleEvent>, event: LifecycleEvent) {
    if events.send(event).is_err() {
        // The submitting caller still receives the outcome via its handle.
        tracing::debug!("no lifecycle subscribers");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::{
        config::RegistryConfig,
        env::test_env::TestEnv,
        identity::{Credential, IdentityValidator, Role},
        ledger::{LatentLedger, MemoryLedger},
    };

    type TestLedger = LatentLedger<MemoryLedger, TestEnv>;
    type TestLifecycle = OperationLifecycle<TestLedger, TestEnv>;

    fn session(role: Role, id: &str) -> Arc<Session> {
        Arc::new(
            IdentityValidator::new(&RegistryConfig::default())
                .validate(Credential::new(role, id), &TestEnv::default())
                .unwrap(),
        )
    }

    fn lifecycle(latency: Duration, timeout: Duration) -> TestLifecycle {
        let ledger = LatentLedger::new(MemoryLedger::new(), TestEnv::default(), latency);
        OperationLifecycle::new(Arc::new(ledger), TestEnv::default(), timeout)
    }

    fn register(id: &str, owner: &str) -> RegisterPayload {
        RegisterPayload {
            id: id.to_string(),
            owner_address: owner.to_string(),
            area_sq_meters: 500,
            location_hash: "HASH-1".to_string(),
            valuation_usd: 100_000,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pending_is_emitted_before_submit_returns() {
        let lifecycle = lifecycle(Duration::from_secs(2), Duration::from_secs(30));
        let mut events = lifecycle.subscribe();
        let admin = session(Role::Admin, "ADMIN123");

        let request = OperationRequest::register(Some(admin), register("1001", "0xA"));
        let pending = lifecycle.submit(request).unwrap();

        let first = events.try_recv().unwrap();
        assert_eq!(first.state, LifecycleState::Pending);
        assert_eq!(first.request, pending.request());
        assert_eq!(first.detail, EventDetail::Submitted { id: "1001".to_string() });

        pending.outcome().await.unwrap();
        let last = events.recv().await.unwrap();
        assert_eq!(last.state, LifecycleState::Succeeded);
        assert_eq!(last.detail, EventDetail::Registered { id: "1001".to_string() });
    }

    #[tokio::test(start_paused = true)]
    async fn second_request_from_same_session_is_rejected_while_pending() {
        let lifecycle = lifecycle(Duration::from_secs(2), Duration::from_secs(30));
        let mut events = lifecycle.subscribe();
        let admin = session(Role::Admin, "ADMIN123");

        let first = lifecycle
            .submit(OperationRequest::register(Some(Arc::clone(&admin)), register("1001", "0xA")))
            .unwrap();
        let second = lifecycle
            .submit(OperationRequest::register(Some(Arc::clone(&admin)), register("1002", "0xA")));

        assert!(matches!(second, Err(RegistryError::OperationInFlight)));
        assert!(lifecycle.is_in_flight(admin.id()));

        first.outcome().await.unwrap();
        assert!(!lifecycle.is_in_flight(admin.id()));

        // Only the first request produced events.
        assert_eq!(events.recv().await.unwrap().state, LifecycleState::Pending);
        assert_eq!(events.recv().await.unwrap().state, LifecycleState::Succeeded);
        assert!(events.try_recv().is_err());

        // A new request is accepted once the first has finished.
        let third = lifecycle
            .submit(OperationRequest::register(Some(admin), register("1002", "0xA")))
            .unwrap();
        third.outcome().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn other_sessions_are_not_blocked() {
        let lifecycle = lifecycle(Duration::from_secs(2), Duration::from_secs(30));
        let admin = session(Role::Admin, "ADMIN123");
        let owner = session(Role::Owner, "OWNER001");

        let request = OperationRequest::register(Some(admin), register("1001", "0xA"));
        let first = lifecycle.submit(request).unwrap();
        let second = lifecycle.submit(OperationRequest::transfer(
            Some(owner),
            TransferPayload { id: "1001".to_string(), new_owner_address: "0xB".to_string() },
        ));

        assert!(second.is_ok());
        first.outcome().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn ledger_failure_reaches_observers() {
        let lifecycle = lifecycle(Duration::ZERO, Duration::from_secs(30));
        let mut events = lifecycle.subscribe();

        let pending =
            lifecycle.submit(OperationRequest::register(None, register("1001", "0xA"))).unwrap();
        let outcome = pending.outcome().await;

        assert!(matches!(outcome, Err(RegistryError::Unauthorized { .. })));
        assert_eq!(events.recv().await.unwrap().state, LifecycleState::Pending);
        let failed = events.recv().await.unwrap();
        assert_eq!(failed.state, LifecycleState::Failed);
        assert!(matches!(
            failed.detail,
            EventDetail::Failed { kind: FailureKind::Unauthorized, .. }
        ));
        assert_eq!(failed.session, None);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_ledger_times_out_without_committing() {
        let lifecycle = lifecycle(Duration::from_secs(60), Duration::from_secs(5));
        let mut events = lifecycle.subscribe();
        let admin = session(Role::Admin, "ADMIN123");

        let pending = lifecycle
            .submit(OperationRequest::register(Some(Arc::clone(&admin)), register("1001", "0xA")))
            .unwrap();
        let outcome = pending.outcome().await;

        assert_eq!(outcome, Err(RegistryError::Timeout { after: Duration::from_secs(5) }));
        let _pending = events.recv().await.unwrap();
        let failed = events.recv().await.unwrap();
        assert!(matches!(failed.detail, EventDetail::Failed { kind: FailureKind::Timeout, .. }));
        assert!(lifecycle.ledger.lookup(Some(&*admin), "1001").is_err());
        assert!(!lifecycle.is_in_flight(admin.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_does_not_cancel() {
        let lifecycle = lifecycle(Duration::from_secs(2), Duration::from_secs(30));
        let mut events = lifecycle.subscribe();
        let admin = session(Role::Admin, "ADMIN123");

        drop(lifecycle.submit(OperationRequest::register(Some(admin), register("1001", "0xA"))));

        assert_eq!(events.recv().await.unwrap().state, LifecycleState::Pending);
        assert_eq!(events.recv().await.unwrap().state, LifecycleState::Succeeded);
        assert!(lifecycle.ledger.lookup(None, "1001").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn transfer_success_carries_new_owner() {
        let lifecycle = lifecycle(Duration::ZERO, Duration::from_secs(30));
        let admin = session(Role::Admin, "ADMIN123");
        let owner = session(Role::Owner, "OWNER001");
        let seed = register("1001", owner.principal_address());
        lifecycle.ledger.insert(Some(&*admin), seed, SystemTime::UNIX_EPOCH).await.unwrap();
        let mut events = lifecycle.subscribe();

        let pending = lifecycle
            .submit(OperationRequest::transfer(
                Some(owner),
                TransferPayload { id: "1001".to_string(), new_owner_address: "0xB".to_string() },
            ))
            .unwrap();
        pending.outcome().await.unwrap();

        let _pending = events.recv().await.unwrap();
        let done = events.recv().await.unwrap();
        assert_eq!(done.kind, OperationKind::Transfer);
        assert_eq!(
            done.detail,
            EventDetail::Transferred { id: "1001".to_string(), new_owner: "0xB".to_string() }
        );
    }

    /// Ledger whose writes panic, standing in for a faulty backend.
    struct PanickingLedger;

    #[async_trait::async_trait]
    #[allow(clippy::panic)]
    impl Ledger for PanickingLedger {
        type Scan<'a> = std::iter::Empty<LandRecord>;

        async fn insert(
            &self,
            _session: Option<&Session>,
            _payload: RegisterPayload,
            _registered_at: SystemTime,
        ) -> Result<LandRecord, RegistryError> {
            panic!("ledger backend crashed");
        }

        async fn transfer_owner(
            &self,
            _session: Option<&Session>,
            _payload: TransferPayload,
        ) -> Result<LandRecord, RegistryError> {
            panic!("ledger backend crashed");
        }

        fn lookup(&self, _: Option<&Session>, id: &str) -> Result<LandRecord, RegistryError> {
            Err(RegistryError::NotFound { id: id.to_string() })
        }

        fn scan<'a>(
            &'a self,
            _session: Option<&Session>,
            _filter: crate::ledger::RecordFilter,
        ) -> Result<Self::Scan<'a>, RegistryError> {
            Ok(std::iter::empty())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_ledger_still_reaches_failed() {
        let lifecycle =
            OperationLifecycle::new(Arc::new(PanickingLedger), TestEnv, Duration::from_secs(30));
        let mut events = lifecycle.subscribe();
        let admin = session(Role::Admin, "ADMIN123");

        let pending = lifecycle
            .submit(OperationRequest::register(Some(Arc::clone(&admin)), register("1001", "0xA")))
            .unwrap();
        let outcome = pending.outcome().await;

        assert!(matches!(outcome, Err(RegistryError::Internal { .. })));
        assert_eq!(events.recv().await.unwrap().state, LifecycleState::Pending);
        let failed = events.recv().await.unwrap();
        assert_eq!(failed.state, LifecycleState::Failed);
        assert!(matches!(failed.detail, EventDetail::Failed { kind: FailureKind::Internal, .. }));
        assert!(events.try_recv().is_err());
        assert!(!lifecycle.is_in_flight(admin.id()));
    }

    #[test]
    fn runtime_shutdown_still_reaches_failed() {
        let lifecycle = lifecycle(Duration::from_secs(2), Duration::from_secs(30));
        let mut events = lifecycle.subscribe();
        let admin = session(Role::Admin, "ADMIN123");

        let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
        let request = OperationRequest::register(Some(Arc::clone(&admin)), register("1001", "0xA"));
        let pending = {
            let _entered = runtime.enter();
            lifecycle.submit(request).unwrap()
        };
        drop(runtime);

        assert_eq!(events.try_recv().unwrap().state, LifecycleState::Pending);
        let failed = events.try_recv().unwrap();
        assert!(matches!(failed.detail, EventDetail::Failed { kind: FailureKind::Internal, .. }));
        assert!(!lifecycle.is_in_flight(admin.id()));
        assert!(lifecycle.ledger.lookup(None, "1001").is_err());

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let outcome = runtime.block_on(pending.outcome());
        assert!(matches!(outcome, Err(RegistryError::Internal { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn confirmation_on_the_deadline_commits() {
        let lifecycle = lifecycle(Duration::from_secs(5), Duration::from_secs(5));
        let admin = session(Role::Admin, "ADMIN123");

        for id in ["1001", "1002", "1003", "1004"] {
            let request = OperationRequest::register(Some(Arc::clone(&admin)), register(id, "0xA"));
            assert!(lifecycle.submit(request).unwrap().outcome().await.is_ok());
        }
        assert_eq!(lifecycle.ledger.inner().len(), 4);
    }

    #[test]
    fn submit_outside_runtime_is_internal_error() {
        let lifecycle = lifecycle(Duration::ZERO, Duration::from_secs(30));
        let result = lifecycle.submit(OperationRequest::register(None, register("1001", "0xA")));
        assert!(matches!(result, Err(RegistryError::Internal { .. })));
    }
}
