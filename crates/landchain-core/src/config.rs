//! Registry configuration.
//!
//! How configuration is loaded is up to the embedding binary; this module
//! only defines the shape, the demo defaults and validation.

use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A configured identity: the id a person presents and the principal
/// address their session acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Identifier presented at connect time.
    pub id: String,
    /// Principal address bound to sessions established with `id`.
    pub address: String,
}

impl Account {
    /// Create an account.
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self { id: id.into(), address: address.into() }
    }
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// The single reserved administrator identity.
    pub admin: Account,
    /// Allow-list of owner identities.
    pub owners: Vec<Account>,
    /// How long terminal notifications stay visible, in milliseconds.
    pub notification_window_ms: u64,
    /// Simulated ledger confirmation latency, in milliseconds.
    pub confirmation_latency_ms: u64,
    /// Upper bound on a single mutating operation, in milliseconds.
    pub operation_timeout_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            admin: Account::new("ADMIN123", "0x7ac4F3F51e9c79532Abcd1234"),
            owners: vec![
                Account::new("OWNER001", "0x9ef2B3C51e9c79532Efgh5678"),
                Account::new("OWNER002", "0x9ef2B3C51e9c79532Efgh5679"),
                Account::new("OWNER003", "0x9ef2B3C51e9c79532Efgh5680"),
            ],
            notification_window_ms: 5_000,
            confirmation_latency_ms: 2_000,
            operation_timeout_ms: 30_000,
        }
    }
}

impl RegistryConfig {
    /// Terminal notification visibility window.
    pub fn notification_window(&self) -> Duration {
        Duration::from_millis(self.notification_window_ms)
    }

    /// Simulated confirmation latency.
    pub fn confirmation_latency(&self) -> Duration {
        Duration::from_millis(self.confirmation_latency_ms)
    }

    /// Operation timeout.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Blank` if any id or address is blank
    /// - `ConfigError::DuplicateIdentifier` if an id appears twice, including
    ///   the admin id appearing on the owner list
    /// - `ConfigError::ZeroDuration` if the notification window or the
    ///   operation timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for account in std::iter::once(&self.admin).chain(&self.owners) {
            if account.id.trim().is_empty() {
                return Err(ConfigError::Blank { what: "account id" });
            }
            if account.address.trim().is_empty() {
                return Err(ConfigError::Blank { what: "account address" });
            }
            if !seen.insert(account.id.as_str()) {
                return Err(ConfigError::DuplicateIdentifier { id: account.id.clone() });
            }
        }

        if self.notification_window_ms == 0 {
            return Err(ConfigError::ZeroDuration { what: "notification window" });
        }
        if self.operation_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration { what: "operation timeout" });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(RegistryConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_owner_addresses_are_distinct() {
        let config = RegistryConfig::default();
        let addresses: HashSet<_> = config.owners.iter().map(|o| &o.address).collect();
        assert_eq!(addresses.len(), config.owners.len());
    }

    #[test]
    fn admin_id_on_owner_list_is_rejected() {
        let mut config = RegistryConfig::default();
        config.owners.push(Account::new("ADMIN123", "0xdead"));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateIdentifier { id: "ADMIN123".to_string() })
        );
    }

    #[test]
    fn blank_owner_address_is_rejected() {
        let mut config = RegistryConfig::default();
        config.owners[0].address = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::Blank { what: "account address" }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = RegistryConfig { operation_timeout_ms: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDuration { what: "operation timeout" }));
    }

    #[test]
    fn zero_latency_is_allowed() {
        let config = RegistryConfig { confirmation_latency_ms: 0, ..Default::default() };
        assert_eq!(config.validate(), Ok(()));
    }
}
