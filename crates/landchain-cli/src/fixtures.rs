//! Demo records.
//!
//! Deterministic stand-ins for a populated ledger: ids from `1001`, owners
//! cycling through the configured owner addresses, and pseudo-random areas,
//! location hashes and valuations from a fixed seed.

use landchain_core::{RegisterPayload, RegistryConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEMO_SEED: u64 = 0x4c41_4e44;
const HASH_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// `n` registration payloads, identical on every call.
///
/// Owners cycle through `config.owners`; with no owners configured the
/// admin address is used.
pub fn sample_records(n: usize, config: &RegistryConfig) -> Vec<RegisterPayload> {
    let mut rng = ChaCha8Rng::seed_from_u64(DEMO_SEED);

    (0..n)
        .map(|i| {
            let owner = config
                .owners
                .get(i % config.owners.len().max(1))
                .map_or(&config.admin.address, |o| &o.address);
            let hash: String = (0..8)
                .map(|_| char::from(HASH_ALPHABET[rng.gen_range(0..HASH_ALPHABET.len())]))
                .collect();

            RegisterPayload {
                id: (1001 + i).to_string(),
                owner_address: owner.clone(),
                area_sq_meters: rng.gen_range(100..1100),
                location_hash: format!("HASH-{hash}"),
                valuation_usd: rng.gen_range(50_000..1_050_000),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_deterministic_and_valid() {
        let config = RegistryConfig::default();
        let first = sample_records(10, &config);

        assert_eq!(first, sample_records(10, &config));
        assert_eq!(first[0].id, "1001");
        assert_eq!(first[9].id, "1010");
        assert_eq!(first[3].owner_address, config.owners[0].address);

        for record in &first {
            assert!((100..1100).contains(&record.area_sq_meters));
            assert!((50_000..1_050_000).contains(&record.valuation_usd));
            assert_eq!(record.location_hash.len(), "HASH-".len() + 8);
        }
    }
}
