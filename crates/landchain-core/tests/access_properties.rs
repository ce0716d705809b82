//! Property tests for identity validation and authorization.
//!
//! Credentials and capabilities are generated over the configured identities
//! plus near misses (case changes, whitespace, unknown ids), and every
//! decision is checked against the access table written out longhand.

use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant, SystemTime},
};

use landchain_core::{
    AuthorizationGate, Capability, Credential, Environment, IdentityValidator, RegistryConfig,
    RegistryError, Role, Route,
};
use proptest::prelude::*;

/// Minimal environment: fixed clocks, counter-based ids.
#[derive(Clone, Default)]
struct FixedEnv;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl Environment for FixedEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_clock(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH
    }

    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        let next = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = next.to_le_bytes()[i % 8];
        }
    }
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Admin), Just(Role::Owner), Just(Role::Anonymous)]
}

/// Configured ids, their near misses, and arbitrary strings.
fn presented_id_strategy() -> impl Strategy<Value = String> {
    let config = RegistryConfig::default();
    let mut known: Vec<String> = vec![config.admin.id.clone()];
    known.extend(config.owners.iter().map(|o| o.id.clone()));

    let exact = prop::sample::select(known.clone());
    let near = prop::sample::select(known).prop_flat_map(|id| {
        prop_oneof![
            Just(id.to_lowercase()),
            Just(format!(" {id}")),
            Just(format!("{id} ")),
            Just(format!("{id}X")),
        ]
    });

    prop_oneof![4 => exact, 2 => near, 1 => "[A-Z0-9]{0,10}"]
}

fn expected_role(role: Role, id: &str, config: &RegistryConfig) -> Option<Role> {
    match role {
        Role::Admin if id == config.admin.id => Some(Role::Admin),
        Role::Owner if config.owners.iter().any(|o| o.id == id) => Some(Role::Owner),
        _ => None,
    }
}

proptest! {
    /// `validate` yields a session with the claimed role iff the id is on
    /// file for that role; otherwise `InvalidCredential`.
    #[test]
    fn prop_validate_matches_allow_lists(
        role in role_strategy(),
        id in presented_id_strategy(),
    ) {
        let config = RegistryConfig::default();
        let validator = IdentityValidator::new(&config);
        let result = validator.validate(Credential::new(role, id.clone()), &FixedEnv);

        match expected_role(role, &id, &config) {
            Some(expected) => {
                let session = result.expect("valid credential");
                prop_assert_eq!(session.role(), expected);
            },
            None => {
                let rejected = matches!(result, Err(RegistryError::InvalidCredential { .. }));
                prop_assert!(rejected);
            },
        }
    }

    /// Register iff admin; transfer iff owner holding the record; view for
    /// everyone; scan for every session.
    #[test]
    fn prop_capabilities_follow_role(
        role in prop_oneof![Just(Role::Admin), Just(Role::Owner)],
        id_index in 0..3usize,
        holder_index in 0..4usize,
        connected in any::<bool>(),
    ) {
        let config = RegistryConfig::default();
        let validator = IdentityValidator::new(&config);
        let gate = AuthorizationGate::new();

        let id = match role {
            Role::Admin => config.admin.id.clone(),
            _ => config.owners[id_index].id.clone(),
        };
        let session = connected
            .then(|| validator.validate(Credential::new(role, id), &FixedEnv).expect("valid"));
        let session = session.as_ref();

        let holder = config
            .owners
            .get(holder_index)
            .map_or(config.admin.address.as_str(), |o| o.address.as_str());
        let transfer = Capability::TransferRecord { current_owner: Some(holder) };

        let is_admin = session.is_some_and(|s| s.role() == Role::Admin);
        let holds = session.is_some_and(|s| {
            s.role() == Role::Owner && s.principal_address() == holder
        });

        prop_assert!(gate.permits(session, Capability::ViewRecord));
        prop_assert_eq!(gate.permits(session, Capability::ScanRecords), session.is_some());
        prop_assert_eq!(gate.permits(session, Capability::RegisterRecord), is_admin);
        prop_assert_eq!(gate.permits(session, transfer), holds);

        // Offered routes never include one whose capability is denied.
        let routes = gate.visible_routes(session);
        prop_assert_eq!(routes.contains(&Route::Register), is_admin);
        prop_assert_eq!(routes.contains(&Route::Dashboard), session.is_some());
    }
}

#[test]
fn denial_never_names_valid_ids() {
    let config = RegistryConfig::default();
    let validator = IdentityValidator::new(&config);

    let err = validator
        .validate(Credential::new(Role::Owner, "OWNER999"), &FixedEnv)
        .expect_err("unknown owner");

    let message = err.to_string();
    assert!(!message.contains(&config.admin.id));
    for owner in &config.owners {
        assert!(!message.contains(&owner.id));
    }
}
