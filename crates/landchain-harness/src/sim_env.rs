//! Deterministic environment for simulation.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant, SystemTime},
};

use landchain_core::Environment;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Wall-clock origin of every simulation (2023-11-14T22:13:20Z).
const SIM_EPOCH_SECS: u64 = 1_700_000_000;

/// Seeded, manually advanced environment.
///
/// - `now()` and `wall_clock()` move only through [`SimEnv::advance`]
/// - `random_bytes()` draws from a ChaCha8 stream seeded at construction
/// - `sleep()` uses tokio's timer, so a paused runtime advances it instantly
///
/// Clones share the clock and RNG stream.
#[derive(Debug, Clone)]
pub struct SimEnv {
    seed: u64,
    state: Arc<Mutex<SimState>>,
}

#[derive(Debug)]
struct SimState {
    rng: ChaCha8Rng,
    origin: Instant,
    elapsed: Duration,
}

impl SimEnv {
    /// Environment with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        tracing::info!(seed, "simulation environment seeded");
        Self {
            seed,
            state: Arc::new(Mutex::new(SimState {
                rng: ChaCha8Rng::seed_from_u64(seed),
                origin: Instant::now(),
                elapsed: Duration::ZERO,
            })),
        }
    }

    /// Seed this environment was built with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.lock().elapsed += by;
    }

    /// Time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Environment for SimEnv {
    fn now(&self) -> Instant {
        let state = self.lock();
        state.origin + state.elapsed
    }

    fn wall_clock(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(SIM_EPOCH_SECS) + self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.lock().rng.fill_bytes(buffer);
    }
}
