//! Built-in exponential backoff with jitter.
//!
//! Delay for a retry is computed in microseconds as
//! `min(uniform(0, 1_000_000) + 2^attempt * 1_000_000, max_delay)`, which
//! gives strictly increasing expected delay per attempt, up to one second
//! of jitter to desynchronize parallel test workers, and a hard ceiling
//! regardless of attempt number (60 seconds by default).
//!
//! RNG: uses `rand`'s thread-local RNG by default; deterministic RNGs can
//! be injected via [`ExponentialBackoff::delay_with_rng`].

use crate::registry::DelegateRegistry;
use crate::sleeper::Sleeper;
use rand::{rng, Rng};
use std::sync::Arc;
use std::time::Duration;

/// Hard delay ceiling applied when no explicit maximum is given.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Delegate name the runner registers the built-in backoff under.
pub const EXPONENTIAL_BACKOFF_DELEGATE: &str = "exponentialBackoff";

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Exponential backoff with up to one second of uniform jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExponentialBackoff {
    max_delay: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self { max_delay: DEFAULT_MAX_DELAY }
    }
}

impl ExponentialBackoff {
    /// Backoff capped at [`DEFAULT_MAX_DELAY`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Backoff capped at `max_delay`.
    pub fn with_max_delay(max_delay: Duration) -> Self {
        Self { max_delay }
    }

    /// Compute the delay for `attempt` (first retry is attempt 1).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.delay_with_rng(attempt, &mut rng())
    }

    /// Compute the delay with a caller-supplied RNG (for deterministic tests).
    pub fn delay_with_rng<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let jitter_micros = rng.random_range(0..=MICROS_PER_SECOND);
        let exponential_micros =
            2u128.saturating_pow(attempt).saturating_mul(u128::from(MICROS_PER_SECOND));
        let capped = u128::from(jitter_micros)
            .saturating_add(exponential_micros)
            .min(self.max_delay.as_micros());
        Duration::from_micros(u64::try_from(capped).unwrap_or(u64::MAX))
    }
}

/// Register the built-in backoff as a delay delegate.
///
/// The delegate reads its optional first argument as the maximum delay in
/// whole seconds (default 60) and sleeps through `sleeper`. Test authors
/// opt in with `@retryDelayMethod exponentialBackoff [maxDelaySeconds]`.
pub fn register_exponential_backoff(registry: &mut DelegateRegistry, sleeper: Arc<dyn Sleeper>) {
    registry.register_delay(EXPONENTIAL_BACKOFF_DELEGATE, move |attempt, args| {
        let max_seconds = args
            .first()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_DELAY.as_secs());
        let backoff = ExponentialBackoff::with_max_delay(Duration::from_secs(max_seconds));
        let delay = backoff.delay(attempt);
        tracing::debug!(attempt, ?delay, max_seconds, "exponential backoff");
        sleeper.sleep(delay);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::TrackingSleeper;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn delay_never_exceeds_max() {
        let backoff = ExponentialBackoff::with_max_delay(Duration::from_secs(5));
        for attempt in 0..40 {
            assert!(backoff.delay(attempt) <= Duration::from_secs(5));
        }
    }

    #[test]
    fn delay_is_at_least_the_exponential_term_below_the_cap() {
        let backoff = ExponentialBackoff::new();
        let mut rng = StdRng::seed_from_u64(7);
        for attempt in 0..5 {
            let delay = backoff.delay_with_rng(attempt, &mut rng);
            let floor = Duration::from_secs(1 << attempt);
            assert!(delay >= floor, "attempt {attempt}: {delay:?} < {floor:?}");
            assert!(delay <= floor + Duration::from_secs(1));
        }
    }

    #[test]
    fn expected_delay_increases_with_attempt_until_capped() {
        let backoff = ExponentialBackoff::new();
        let mut rng = StdRng::seed_from_u64(42);
        // Floors 1s, 2s, 4s, 8s, 16s, 32s dominate the 1s jitter band.
        let mut previous = Duration::ZERO;
        for attempt in 0..6 {
            let delay = backoff.delay_with_rng(attempt, &mut rng);
            assert!(delay > previous, "attempt {attempt}: {delay:?} <= {previous:?}");
            previous = delay;
        }
        // Past the cap the delay pins to exactly 60s.
        assert_eq!(backoff.delay_with_rng(10, &mut rng), DEFAULT_MAX_DELAY);
        assert_eq!(backoff.delay_with_rng(30, &mut rng), DEFAULT_MAX_DELAY);
    }

    #[test]
    fn huge_attempt_saturates_instead_of_overflowing() {
        let backoff = ExponentialBackoff::new();
        assert_eq!(backoff.delay(u32::MAX), DEFAULT_MAX_DELAY);
    }

    #[test]
    fn delegate_parses_max_seconds_argument() {
        let sleeper = TrackingSleeper::new();
        let mut registry = DelegateRegistry::new();
        register_exponential_backoff(&mut registry, Arc::new(sleeper.clone()));

        // attempt 12 would be ~4096s uncapped; a 2s cap pins it exactly.
        registry.delay(EXPONENTIAL_BACKOFF_DELEGATE).unwrap()(12, &["2".to_string()]);
        assert_eq!(sleeper.calls(), vec![Duration::from_secs(2)]);
    }

    #[test]
    fn delegate_defaults_to_sixty_second_cap() {
        let sleeper = TrackingSleeper::new();
        let mut registry = DelegateRegistry::new();
        register_exponential_backoff(&mut registry, Arc::new(sleeper.clone()));

        registry.delay(EXPONENTIAL_BACKOFF_DELEGATE).unwrap()(20, &[]);
        assert_eq!(sleeper.calls(), vec![DEFAULT_MAX_DELAY]);

        // A non-numeric argument falls back to the default cap too.
        sleeper.clear();
        registry.delay(EXPONENTIAL_BACKOFF_DELEGATE).unwrap()(20, &["fast".to_string()]);
        assert_eq!(sleeper.calls(), vec![DEFAULT_MAX_DELAY]);
    }
}
