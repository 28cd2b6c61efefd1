//! Token-bucket admission gate shared by every outbound request.
//!
//! The bucket starts full and regains one token per refill interval, up to
//! its capacity. Refill is computed lazily from a monotonic clock whenever
//! the bucket is consulted, in whole ticks since the bucket was created, so
//! the number of tokens ever handed out after an elapsed time `T` is at most
//! `capacity + floor(T / interval)`.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{trace, warn};

use crate::config::RateLimitConfig;

/// Token bucket rate limiter.
///
/// Cheap to share behind an `Arc`; the internal lock only guards the
/// counter update and is never held across an await point.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u64,
    interval: Duration,
    start: Instant,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    available: u64,
    latest_tick: u64,
}

impl RateLimiter {
    /// Create a full bucket of `capacity` tokens, regaining one every `refill_interval`.
    ///
    /// A zero `refill_interval` disables limiting.
    pub fn new(capacity: u64, refill_interval: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            interval: refill_interval,
            start: Instant::now(),
            state: Mutex::new(BucketState {
                available: capacity,
                latest_tick: 0,
            }),
        }
    }

    /// Create a limiter from configuration.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.capacity, config.refill_interval)
    }

    /// A limiter that never delays.
    pub fn unlimited() -> Self {
        Self::from_config(&RateLimitConfig::unlimited())
    }

    /// Maximum burst size.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Time to regain one token.
    pub fn refill_interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if this limiter never delays.
    pub fn is_unlimited(&self) -> bool {
        self.interval.is_zero()
    }

    /// Tokens that could be taken right now.
    pub fn available(&self) -> u64 {
        if self.is_unlimited() {
            return self.capacity;
        }
        let mut state = self.lock();
        self.refill(&mut state, Instant::now());
        state.available
    }

    /// Wait until `n` tokens are available, then take them.
    ///
    /// Requests larger than the capacity are clamped to the capacity.
    pub async fn acquire(&self, n: u64) {
        if self.is_unlimited() || n == 0 {
            return;
        }
        let n = self.clamp(n);

        loop {
            match self.take(n, Instant::now()) {
                Ok(()) => return,
                Err(ready_at) => {
                    trace!(
                        tokens = n,
                        wait_ms = ready_at.saturating_duration_since(Instant::now()).as_millis() as u64,
                        "Waiting for rate limit tokens"
                    );
                    tokio::time::sleep_until(ready_at).await;
                }
            }
        }
    }

    /// Take `n` tokens if they are available right now.
    pub fn try_acquire(&self, n: u64) -> bool {
        if self.is_unlimited() || n == 0 {
            return true;
        }
        let n = self.clamp(n);
        self.take(n, Instant::now()).is_ok()
    }

    fn clamp(&self, n: u64) -> u64 {
        if n > self.capacity {
            warn!(
                requested = n,
                capacity = self.capacity,
                "Token request exceeds bucket capacity, clamping"
            );
            self.capacity
        } else {
            n
        }
    }

    /// Take `n` tokens, or report the instant at which they will exist.
    fn take(&self, n: u64, now: Instant) -> Result<(), Instant> {
        let mut state = self.lock();
        self.refill(&mut state, now);

        if state.available >= n {
            state.available -= n;
            return Ok(());
        }

        let missing = n - state.available;
        Err(self.tick_instant(state.latest_tick + missing))
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let tick = self.tick_at(now);
        if tick > state.latest_tick {
            let gained = tick - state.latest_tick;
            state.available = state.available.saturating_add(gained).min(self.capacity);
            state.latest_tick = tick;
        }
    }

    fn tick_at(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.start).as_nanos();
        (elapsed / self.interval.as_nanos()) as u64
    }

    fn tick_instant(&self, tick: u64) -> Instant {
        let nanos = self.interval.as_nanos().saturating_mul(u128::from(tick));
        self.start + Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    fn lock(&self) -> MutexGuard<'_, BucketState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
