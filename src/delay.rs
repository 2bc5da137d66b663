//! Delay strategy between attempts.
//!
//! Exactly one of a fixed pause or a delay delegate may be active per retry
//! cycle; configuring a nonzero `retryDelaySeconds` alongside a
//! `retryDelayMethod` is a configuration error. With neither configured the
//! engine retries immediately.

use crate::error::ConfigError;
use crate::policy::{Delegate, RetryPolicy};
use crate::registry::DelegateRegistry;
use crate::sleeper::Sleeper;
use std::time::Duration;

/// How to pause between a failed attempt and the next retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DelayStrategy {
    /// Retry immediately.
    None,
    /// Block for a fixed number of whole seconds.
    Fixed(Duration),
    /// Invoke a registered delay delegate with `(attempt_number, args)`.
    Delegate(Delegate),
}

impl DelayStrategy {
    /// Derive the strategy from a resolved policy, enforcing mutual exclusion.
    pub(crate) fn from_policy(policy: &RetryPolicy) -> Result<Self, ConfigError> {
        match (policy.delay_seconds, &policy.delay_method) {
            (seconds, Some(_)) if seconds > 0 => Err(ConfigError::ConflictingDelay),
            (_, Some(delegate)) => Ok(Self::Delegate(delegate.clone())),
            (0, None) => Ok(Self::None),
            (seconds, None) => Ok(Self::Fixed(Duration::from_secs(seconds))),
        }
    }

    /// Apply the delay before retry number `attempt`.
    pub(crate) fn apply(&self, attempt: u32, delegates: &DelegateRegistry, sleeper: &dyn Sleeper) {
        match self {
            Self::None => {}
            Self::Fixed(duration) => {
                tracing::debug!(attempt, ?duration, "fixed delay");
                sleeper.sleep(*duration);
            }
            Self::Delegate(delegate) => {
                tracing::debug!(attempt, delegate = %delegate.name, "delay delegate");
                // Registration was validated when the policy resolved.
                if let Some(delay_fn) = delegates.delay(&delegate.name) {
                    delay_fn(attempt, &delegate.args);
                }
            }
        }
    }
}
