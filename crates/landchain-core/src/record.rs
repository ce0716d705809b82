//! Land records and the payloads that create or change them.
//!
//! Payloads arrive from the input surface already coerced to numbers but not
//! yet checked against business rules. [`RegisterPayload::into_record`] and
//! [`TransferPayload::validate`] are the only ways in; a record that exists
//! has passed them.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// A registered parcel of land.
///
/// Once registered, `id`, `area_sq_meters` and `location_hash` never change.
/// Only `owner_address` moves, and only through a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandRecord {
    /// Unique, externally assigned, never reused.
    pub id: String,
    /// Current owner's principal address.
    pub owner_address: String,
    /// Area in square meters. Always positive.
    pub area_sq_meters: u64,
    /// Opaque location hash.
    pub location_hash: String,
    /// Valuation in whole US dollars.
    pub valuation_usd: u64,
    /// When the record was registered.
    pub registered_at: SystemTime,
}

/// Fields collected for a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPayload {
    /// Land id to register.
    pub id: String,
    /// Initial owner address.
    pub owner_address: String,
    /// Area in square meters, as entered.
    pub area_sq_meters: i64,
    /// Location hash.
    pub location_hash: String,
    /// Valuation in US dollars, as entered.
    pub valuation_usd: i64,
}

/// Fields collected for a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    /// Land id to transfer.
    pub id: String,
    /// Address of the new owner.
    pub new_owner_address: String,
}

impl RegisterPayload {
    /// Validate every field and build the record.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` naming the first offending field.
    pub fn into_record(self, registered_at: SystemTime) -> Result<LandRecord, RegistryError> {
        require_present("id", &self.id)?;
        require_present("owner_address", &self.owner_address)?;
        require_present("location_hash", &self.location_hash)?;

        let area = self.area_sq_meters;
        let area_sq_meters = u64::try_from(area).ok().filter(|a| *a > 0).ok_or_else(|| {
            RegistryError::validation("area_sq_meters", format!("must be positive, got {area}"))
        })?;

        let valuation = self.valuation_usd;
        let valuation_usd = u64::try_from(valuation).map_err(|_| {
            let reason = format!("must not be negative, got {valuation}");
            RegistryError::validation("valuation_usd", reason)
        })?;

        Ok(LandRecord {
            id: self.id,
            owner_address: self.owner_address,
            area_sq_meters,
            location_hash: self.location_hash,
            valuation_usd,
            registered_at,
        })
    }
}

impl TransferPayload {
    /// Check that both fields are present.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` for a blank field.
    pub fn validate(&self) -> Result<(), RegistryError> {
        require_present("id", &self.id)?;
        require_present("new_owner_address", &self.new_owner_address)
    }
}

/// Reject blank values. Non-blank values are kept exactly as given.
pub(crate) fn require_present(field: &'static str, value: &str) -> Result<(), RegistryError> {
    if value.trim().is_empty() {
        return Err(RegistryError::validation(field, "is required"));
    }
    Ok(())
}
