//! Record ledger.
//!
//! The authoritative collection of land records, shared by every session.
//!
//! ## Locking
//!
//! - Reads (`lookup`, each step of a `scan`) take the read side of a single
//!   `RwLock` and run concurrently with each other.
//! - Writes (`insert`, `transfer_owner`) take the write side. One writer for
//!   the whole ledger: no lost updates, no two transfers of one record racing.
//! - The authorization check that depends on record state (current owner)
//!   runs inside the same write critical section as the mutation it guards.
//!
//! ## Error ordering
//!
//! Role-level authorization runs before anything that touches records, so an
//! unauthorized caller learns nothing about which ids exist. `NotFound` is
//! only reported to a caller whose role could have performed the operation.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::{Duration, SystemTime},
};

use async_trait::async_trait;

use crate::{
    auth::{AuthorizationGate, Capability},
    env::Environment,
    error::RegistryError,
    identity::Session,
    record::{LandRecord, RegisterPayload, TransferPayload, require_present},
};

/// Ledger operations.
///
/// Writes are async: a ledger backed by a real chain suspends until the
/// write is confirmed. Reads are synchronous.
#[async_trait]
pub trait Ledger: Send + Sync + 'static {
    /// Lazy, restartable result sequence of [`Ledger::scan`].
    type Scan<'a>: Iterator<Item = LandRecord> + Send
    where
        Self: 'a;

    /// Register a new record.
    ///
    /// Requires `RegisterRecord`. Atomic: on any error the ledger is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the session is an admin
    /// - `Validation` if a payload field breaks a record invariant
    /// - `DuplicateId` if the id is already registered (exact match)
    async fn insert(
        &self,
        session: Option<&Session>,
        payload: RegisterPayload,
        registered_at: SystemTime,
    ) -> Result<LandRecord, RegistryError>;

    /// Move a record to a new owner. Only `owner_address` changes.
    ///
    /// Requires `TransferRecord` bound to the record's current owner. Atomic.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the session is an owner, and (after the record
    ///   is found) unless that owner currently holds the record
    /// - `Validation` if a payload field is blank
    /// - `NotFound` if no record has this id
    async fn transfer_owner(
        &self,
        session: Option<&Session>,
        payload: TransferPayload,
    ) -> Result<LandRecord, RegistryError>;

    /// Point lookup by id.
    ///
    /// # Errors
    ///
    /// - `Validation` if `id` is blank
    /// - `NotFound` if no record has this id
    fn lookup(&self, session: Option<&Session>, id: &str) -> Result<LandRecord, RegistryError>;

    /// Filtered listing in insertion order.
    ///
    /// The sequence reads the live ledger as it advances; calling `scan`
    /// again starts over from the current state.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for anonymous callers
    fn scan<'a>(
        &'a self,
        session: Option<&Session>,
        filter: RecordFilter,
    ) -> Result<Self::Scan<'a>, RegistryError>;
}

/// Search predicate for [`Ledger::scan`].
///
/// Matches a record whose `id` contains the term (exact case), or whose
/// `owner_address` contains it ignoring case. An empty term matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    term: String,
    term_lower: String,
}

impl RecordFilter {
    /// Filter on a search term.
    pub fn new(term: impl Into<String>) -> Self {
        let term = term.into();
        let term_lower = term.to_lowercase();
        Self { term, term_lower }
    }

    /// Filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// The search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Whether `record` matches.
    pub fn matches(&self, record: &LandRecord) -> bool {
        record.id.contains(&self.term)
            || record.owner_address.to_lowercase().contains(&self.term_lower)
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Records in insertion order. Never shrinks.
    records: Vec<LandRecord>,
    /// Id -> position in `records`.
    index: HashMap<String, usize>,
}

/// In-memory ledger.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
    gate: AuthorizationGate,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.read().map_or(0, |state| state.records.len())
    }

    /// Whether no record has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, RegistryError> {
        self.state.read().map_err(|_| RegistryError::poisoned("ledger"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, RegistryError> {
        self.state.write().map_err(|_| RegistryError::poisoned("ledger"))
    }

    fn insert_now(
        &self,
        session: Option<&Session>,
        payload: RegisterPayload,
        registered_at: SystemTime,
    ) -> Result<LandRecord, RegistryError> {
        let mut state = self.write()?;

        self.gate.authorize(session, Capability::RegisterRecord)?;
        let record = payload.into_record(registered_at)?;

        if state.index.contains_key(&record.id) {
            return Err(RegistryError::DuplicateId { id: record.id });
        }

        let position = state.records.len();
        state.records.push(record.clone());
        state.index.insert(record.id.clone(), position);
        drop(state);

        tracing::info!(
            id = %record.id,
            owner = %record.owner_address,
            area_sq_meters = record.area_sq_meters,
            "record registered"
        );

        Ok(record)
    }

    fn transfer_now(
        &self,
        session: Option<&Session>,
        payload: TransferPayload,
    ) -> Result<LandRecord, RegistryError> {
        let mut state = self.write()?;

        self.gate.authorize(session, Capability::TransferRecord { current_owner: None })?;
        payload.validate()?;

        let position = *state
            .index
            .get(&payload.id)
            .ok_or_else(|| RegistryError::NotFound { id: payload.id.clone() })?;

        let record = &mut state.records[position];
        self.gate.authorize(
            session,
            Capability::TransferRecord { current_owner: Some(&record.owner_address) },
        )?;

        let previous = std::mem::replace(&mut record.owner_address, payload.new_owner_address);
        let updated = record.clone();
        drop(state);

        tracing::info!(
            id = %updated.id,
            from = %previous,
            to = %updated.owner_address,
            "ownership transferred"
        );

        Ok(updated)
    }

    /// First matching record at or after `from`, with its position.
    fn next_match(&self, from: usize, filter: &RecordFilter) -> Option<(usize, LandRecord)> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .records
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, record)| filter.matches(record))
            .map(|(position, record)| (position, record.clone()))
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    type Scan<'a> = MemoryScan<'a>;

    async fn insert(
        &self,
        session: Option<&Session>,
        payload: RegisterPayload,
        registered_at: SystemTime,
    ) -> Result<LandRecord, RegistryError> {
        self.insert_now(session, payload, registered_at)
    }

    async fn transfer_owner(
        &self,
        session: Option<&Session>,
        payload: TransferPayload,
    ) -> Result<LandRecord, RegistryError> {
        self.transfer_now(session, payload)
    }

    fn lookup(&self, session: Option<&Session>, id: &str) -> Result<LandRecord, RegistryError> {
        self.gate.authorize(session, Capability::ViewRecord)?;
        require_present("id", id)?;

        let state = self.read()?;
        state
            .index
            .get(id)
            .map(|&position| state.records[position].clone())
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }

    fn scan<'a>(
        &'a self,
        session: Option<&Session>,
        filter: RecordFilter,
    ) -> Result<MemoryScan<'a>, RegistryError> {
        self.gate.authorize(session, Capability::ScanRecords)?;
        Ok(MemoryScan { ledger: self, filter, cursor: 0 })
    }
}

/// Lazy scan over a [`MemoryLedger`].
///
/// Holds no lock between steps. Records are append-only, so a cursor into
/// insertion order stays valid; records inserted while the scan is running
/// are seen if the cursor has not passed them.
#[derive(Debug)]
pub struct MemoryScan<'a> {
    ledger: &'a MemoryLedger,
    filter: RecordFilter,
    cursor: usize,
}

impl Iterator for MemoryScan<'_> {
    type Item = LandRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let (position, record) = self.ledger.next_match(self.cursor, &self.filter)?;
        self.cursor = position + 1;
        Some(record)
    }
}

/// Ledger wrapper that models confirmation latency on writes.
///
/// The delay happens before the inner write, outside any lock. A caller that
/// stops waiting during the delay (timeout) leaves the ledger untouched.
#[derive(Debug)]
pub struct LatentLedger<L, E> {
    inner: L,
    env: E,
    latency: Duration,
}

impl<L: Ledger, E: Environment> LatentLedger<L, E> {
    /// Wrap `inner`, delaying each write by `latency`.
    pub fn new(inner: L, env: E, latency: Duration) -> Self {
        Self { inner, env, latency }
    }

    /// The wrapped ledger.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    async fn confirm_delay(&self) {
        if !self.latency.is_zero() {
            self.env.sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl<L: Ledger, E: Environment> Ledger for LatentLedger<L, E> {
    type Scan<'a>
        = L::Scan<'a>
    where
        Self: 'a;

    async fn insert(
        &self,
        session: Option<&Session>,
        payload: RegisterPayload,
        registered_at: SystemTime,
    ) -> Result<LandRecord, RegistryError> {
        self.confirm_delay().await;
        self.inner.insert(session, payload, registered_at).await
    }

    async fn transfer_owner(
        &self,
        session: Option<&Session>,
        payload: TransferPayload,
    ) -> Result<LandRecord, RegistryError> {
        self.confirm_delay().await;
        self.inner.transfer_owner(session, payload).await
    }

    fn lookup(&self, session: Option<&Session>, id: &str) -> Result<LandRecord, RegistryError> {
        self.inner.lookup(session, id)
    }

    fn scan<'a>(
        &'a self,
        session: Option<&Session>,
        filter: RecordFilter,
    ) -> Result<Self::Scan<'a>, RegistryError> {
        self.inner.scan(session, filter)
    }
}
