//! Scripted walkthrough and seeding.
//!
//! Expected rejections are logged, not returned: only failures of the
//! walkthrough itself surface as errors.

use std::sync::Arc;

use landchain_core::{
    Credential, Environment, LandRecord, MemoryRegistry, RecordFilter, RegisterPayload,
    RegistryError, Role, TransferPayload,
};

/// Register `records` through an admin session, one at a time.
pub async fn seed<E: Environment>(
    registry: &Arc<MemoryRegistry<E>>,
    records: Vec<RegisterPayload>,
) -> Result<usize, RegistryError> {
    let admin = registry.client();
    admin.connect(Credential::new(Role::Admin, registry.config().admin.id.clone()))?;

    let mut seeded = 0;
    for payload in records {
        admin.register(payload)?.outcome().await?;
        seeded += 1;
    }

    tracing::info!(seeded, "demo records registered");
    Ok(seeded)
}

/// Walk through registration, transfer and the access rules.
pub async fn run<E: Environment>(registry: &Arc<MemoryRegistry<E>>) -> Result<(), RegistryError> {
    let config = registry.config();
    let (first_owner, second_owner) = match config.owners.as_slice() {
        [first, second, ..] => (first.clone(), second.clone()),
        _ => {
            return Err(RegistryError::Internal {
                reason: "the walkthrough needs at least two owners".to_string(),
            });
        },
    };
    let land = RegisterPayload {
        id: "1001".to_string(),
        owner_address: first_owner.address.clone(),
        area_sq_meters: 500,
        location_hash: "HASH-7Q2KD9XA".to_string(),
        valuation_usd: 100_000,
    };

    tracing::info!("step 1: anonymous visitor tries to register");
    let visitor = registry.client();
    tracing::info!(routes = ?visitor.visible_routes(), "visitor routes");
    expect_rejection("anonymous register", visitor.register(land.clone())?.outcome().await);

    tracing::info!("step 2: admin registers land 1001");
    let admin = registry.client();
    admin.connect(Credential::new(Role::Admin, config.admin.id.clone()))?;
    tracing::info!(routes = ?admin.visible_routes(), "admin routes");
    let pending = admin.register(land.clone())?;
    expect_rejection("second request while pending", admin.register(land.clone()).map(|_| ()));
    log_record("registered", &pending.outcome().await?);
    expect_rejection("duplicate register", admin.register(land)?.outcome().await);

    tracing::info!("step 3: owner transfers land 1001");
    let owner = registry.client();
    owner.connect(Credential::new(Role::Owner, first_owner.id.clone()))?;
    tracing::info!(routes = ?owner.visible_routes(), "owner routes");
    let transfer = TransferPayload {
        id: "1001".to_string(),
        new_owner_address: second_owner.address.clone(),
    };
    log_record("transferred", &owner.transfer(transfer.clone())?.outcome().await?);
    let repeat = owner.transfer(transfer)?.outcome().await;
    expect_rejection("repeat transfer by previous owner", repeat);

    tracing::info!("step 4: lookups and scans");
    log_record("lookup", &visitor.lookup("1001")?);
    expect_rejection("blank lookup", visitor.lookup("  "));
    expect_rejection("anonymous scan", visitor.scan(RecordFilter::all()).map(|_| ()));
    for record in admin.scan(RecordFilter::new(second_owner.address.to_uppercase()))? {
        log_record("scan hit", &record);
    }

    tracing::info!("step 5: owner disconnects");
    owner.disconnect();
    tracing::info!(routes = ?owner.visible_routes(), "routes after disconnect");

    Ok(())
}

/// Log records matching `term`, read anonymously unless a credential is given.
pub fn scan<E: Environment>(
    registry: &Arc<MemoryRegistry<E>>,
    credential: Option<Credential>,
    term: &str,
) -> Result<usize, RegistryError> {
    let client = registry.client();
    if let Some(credential) = credential {
        client.connect(credential)?;
    }

    let mut hits = 0;
    for record in client.scan(RecordFilter::new(term))? {
        log_record("scan hit", &record);
        hits += 1;
    }
    tracing::info!(term, hits, "scan complete");
    Ok(hits)
}

/// Log one record, read anonymously unless a credential is given.
pub fn lookup<E: Environment>(
    registry: &Arc<MemoryRegistry<E>>,
    credential: Option<Credential>,
    id: &str,
) -> Result<LandRecord, RegistryError> {
    let client = registry.client();
    if let Some(credential) = credential {
        client.connect(credential)?;
    }

    let record = client.lookup(id)?;
    log_record("lookup", &record);
    Ok(record)
}

fn log_record(what: &str, record: &LandRecord) {
    tracing::info!(
        id = %record.id,
        owner = %record.owner_address,
        area_sq_meters = record.area_sq_meters,
        location = %record.location_hash,
        valuation_usd = record.valuation_usd,
        "{what}"
    );
}

fn expect_rejection<T>(what: &str, result: Result<T, RegistryError>) {
    match result {
        Ok(_) => tracing::error!(step = what, "expected a rejection but the call succeeded"),
        Err(e) => tracing::info!(step = what, kind = ?e.kind(), error = %e, "rejected as expected"),
    }
}
