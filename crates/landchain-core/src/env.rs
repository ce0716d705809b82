//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples registry logic from system resources
//! (clocks, timers, randomness). This enables:
//!
//! - Deterministic Simulation: the harness provides a seeded RNG and a clock
//!   that only moves when the test says so, so lifecycle and notification
//!   timing can be replayed exactly.
//!
//! - Production Runtime: the CLI uses real system time, tokio timers and OS
//!   entropy without any change to the registry logic.
//!
//! # Invariants
//!
//! - Monotonicity: `env.now()` must never go backwards
//! - Determinism: Given the same seed, `random_bytes()` produces the same
//!   sequence
//! - Isolation: Simulation implementations must not share global state

use std::time::{Duration, Instant, SystemTime};

/// Abstract environment providing time, randomness, and the one async
/// primitive the registry needs.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// 1. Time monotonicity: `now()` never goes backwards
/// 2. RNG quality: `random_bytes()` uses cryptographically secure entropy in
///    production, since session ids are derived from it
/// 3. Minimal panics: Methods are infallible except in exceptional
///    circumstances (e.g., OS entropy exhaustion)
pub trait Environment: Clone + Send + Sync + 'static {
    /// Returns the current monotonic time.
    ///
    /// Used for notification deadlines. Never persisted.
    fn now(&self) -> Instant;

    /// Returns the current wall-clock time.
    ///
    /// Used for `registered_at` and `established_at` stamps, which are
    /// shown to people and therefore need calendar time.
    fn wall_clock(&self) -> SystemTime;

    /// Sleeps for the specified duration.
    ///
    /// This is the ONLY async method in the trait. Within the registry it
    /// models ledger confirmation latency and bounds each operation.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Security
    ///
    /// Production implementations MUST use OS entropy (`getrandom`).
    /// Simulation implementations MUST use a seeded RNG and log the seed.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    ///
    /// Convenience for session ids and request references.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}
