//! Execution wrapper.
//!
//! The outer loop a host test runner mixes into its "run a single test"
//! path: invoke the body, classify the outcome, consult the eligibility
//! filter and decision engine, pause, and re-invoke. Incomplete and
//! skipped outcomes propagate untouched; on exhaustion the exact failure
//! captured from the final attempt is what the caller observes.
//!
//! Semantics:
//! - Attempts are strictly sequential; the only blocking operations are
//!   the delay strategy's sleep and the body itself.
//! - Retry state (attempt counter, time-of-first-retry) is created per
//!   invocation and discarded at the end; nothing leaks across tests.
//! - A success at any attempt returns immediately with no further log
//!   output.
//!
//! Example
//! ```rust
//! use retread::{names, AnnotationSet, Outcome, RetryRunner, Scope};
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! let runner = RetryRunner::builder().instant_sleeper().build();
//! let annotations = AnnotationSet::new().with(Scope::Method, names::RETRY_ATTEMPTS, "3");
//!
//! let calls = AtomicU32::new(0);
//! let outcome = runner
//!     .run(&annotations, || {
//!         if calls.fetch_add(1, Ordering::SeqCst) < 3 {
//!             Outcome::Failed(retread::Failure::assertion("flaky"))
//!         } else {
//!             Outcome::Passed
//!         }
//!     })
//!     .unwrap();
//! assert!(outcome.is_passed());
//! assert_eq!(calls.load(Ordering::SeqCst), 4);
//! ```

use crate::annotations::AnnotationSet;
use crate::backoff::register_exponential_backoff;
use crate::clock::{Clock, MonotonicClock};
use crate::delay::DelayStrategy;
use crate::engine::DecisionEngine;
use crate::error::ConfigError;
use crate::filter::FailureFilter;
use crate::logger::{Logger, StdoutLogger};
use crate::outcome::Outcome;
use crate::policy::RetryPolicy;
use crate::registry::{DelegateRegistry, FailureKindRegistry};
use crate::sleeper::{InstantSleeper, Sleeper, ThreadSleeper};
use std::sync::Arc;

/// Retry layer around a host runner's single-test execution.
#[derive(Debug, Clone)]
pub struct RetryRunner {
    delegates: DelegateRegistry,
    kinds: FailureKindRegistry,
    logger: Arc<dyn Logger>,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
    base_attempts: Option<u64>,
}

impl RetryRunner {
    /// Construct a new builder with defaults.
    pub fn builder() -> RetryRunnerBuilder {
        RetryRunnerBuilder::new()
    }

    /// Run one test body under the retry policy declared by `annotations`.
    ///
    /// Annotation validation happens here, at the point of use, so a
    /// malformed annotation on a test that never runs never errors.
    pub fn run<F>(&self, annotations: &AnnotationSet, mut body: F) -> Result<Outcome, ConfigError>
    where
        F: FnMut() -> Outcome,
    {
        let mut policy = RetryPolicy::from_annotations(annotations, &self.delegates, &self.kinds)?;
        if !policy.is_configured() {
            // Runner-level base count applies only when no annotation
            // declares a policy; an annotation always wins.
            policy.attempts = self.base_attempts;
        }

        let delay = DelayStrategy::from_policy(&policy)?;
        let filter = FailureFilter::new(&policy, &self.delegates, &self.kinds);
        let mut engine = DecisionEngine::new(&policy, &*self.clock);

        loop {
            let failure = match body() {
                Outcome::Failed(failure) => failure,
                outcome => {
                    engine.terminal();
                    return Ok(outcome);
                }
            };

            if !filter.eligible(&failure) {
                engine.terminal();
                return Ok(Outcome::Failed(failure));
            }

            match engine.next_retry() {
                Some(progress) => {
                    self.logger.log(&progress);
                    delay.apply(engine.attempt_number(), &self.delegates, &*self.sleeper);
                }
                None => {
                    tracing::debug!(state = ?engine.state(), %failure, "propagating final failure");
                    return Ok(Outcome::Failed(failure));
                }
            }
        }
    }
}

/// Builder for [`RetryRunner`].
#[derive(Debug)]
pub struct RetryRunnerBuilder {
    delegates: DelegateRegistry,
    kinds: FailureKindRegistry,
    logger: Arc<dyn Logger>,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
    base_attempts: Option<u64>,
}

impl RetryRunnerBuilder {
    /// Builder with production defaults: stdout progress logger, blocking
    /// thread sleeper, monotonic clock, no base attempt count.
    pub fn new() -> Self {
        Self {
            delegates: DelegateRegistry::new(),
            kinds: FailureKindRegistry::new(),
            logger: Arc::new(StdoutLogger),
            sleeper: Arc::new(ThreadSleeper),
            clock: Arc::new(MonotonicClock::default()),
            base_attempts: None,
        }
    }

    /// Replace the delegate registry.
    pub fn delegates(mut self, delegates: DelegateRegistry) -> Self {
        self.delegates = delegates;
        self
    }

    /// Register a single delay delegate.
    pub fn register_delay<F>(mut self, name: impl Into<String>, delegate: F) -> Self
    where
        F: Fn(u32, &[String]) + Send + Sync + 'static,
    {
        self.delegates.register_delay(name, delegate);
        self
    }

    /// Register a single eligibility delegate.
    pub fn register_eligibility<F>(mut self, name: impl Into<String>, delegate: F) -> Self
    where
        F: Fn(&crate::Failure, &[String]) + Send + Sync + 'static,
    {
        self.delegates.register_eligibility(name, delegate);
        self
    }

    /// Replace the failure-kind registry.
    pub fn failure_kinds(mut self, kinds: FailureKindRegistry) -> Self {
        self.kinds = kinds;
        self
    }

    /// Register a single failure kind for `retryIfException` matching.
    pub fn register_failure_kind<E>(mut self, name: impl Into<String>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.kinds.register::<E>(name);
        self
    }

    /// Provide a custom progress logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Provide a custom sleeper implementation.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Shorthand for tests: never actually sleep.
    pub fn instant_sleeper(self) -> Self {
        self.sleeper(Arc::new(InstantSleeper))
    }

    /// Provide a custom clock implementation.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fallback attempt count used when no annotation declares a policy,
    /// typically sourced from the configuration file.
    pub fn base_attempts(mut self, attempts: u64) -> Self {
        self.base_attempts = Some(attempts);
        self
    }

    /// Build the runner.
    ///
    /// The built-in `exponentialBackoff` delay delegate is registered
    /// against the runner's sleeper unless the host already claimed the
    /// name.
    pub fn build(mut self) -> RetryRunner {
        if !self.delegates.contains_delay(crate::backoff::EXPONENTIAL_BACKOFF_DELEGATE) {
            register_exponential_backoff(&mut self.delegates, self.sleeper.clone());
        }
        RetryRunner {
            delegates: self.delegates,
            kinds: self.kinds,
            logger: self.logger,
            sleeper: self.sleeper,
            clock: self.clock,
            base_attempts: self.base_attempts,
        }
    }
}

impl Default for RetryRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
