//! Registries backing string-named annotation lookups.
//!
//! Annotations name delegates and failure kinds as strings. Instead of
//! late-bound reflection, the host registers typed callbacks up front:
//!
//! - [`DelegateRegistry`] maps delegate names to delay callbacks
//!   (`attempt, args`) and eligibility callbacks (`failure, args`).
//! - [`FailureKindRegistry`] maps failure-kind names to matchers over the
//!   captured error; `register::<E>` installs a downcast matcher, while
//!   `register_matcher` covers custom groupings (the "subtype" relation).
//!
//! Annotation validation consults these registries, so an annotation naming
//! an unregistered delegate or kind fails with `InvalidConfiguration` at
//! the point of use.

use crate::outcome::Failure;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

type DelayFn = Arc<dyn Fn(u32, &[String]) + Send + Sync>;
type EligibilityFn = Arc<dyn Fn(&Failure, &[String]) + Send + Sync>;
type MatcherFn = Arc<dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync>;

/// Named delay and eligibility delegates registered by the test author.
#[derive(Clone, Default)]
pub struct DelegateRegistry {
    delay: BTreeMap<String, DelayFn>,
    eligibility: BTreeMap<String, EligibilityFn>,
}

impl DelegateRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a delay delegate invoked with `(attempt_number, args)`.
    ///
    /// The delegate performs its own blocking or sleeping.
    pub fn register_delay<F>(&mut self, name: impl Into<String>, delegate: F)
    where
        F: Fn(u32, &[String]) + Send + Sync + 'static,
    {
        self.delay.insert(name.into(), Arc::new(delegate));
    }

    /// Register an eligibility delegate invoked with `(failure, args)`.
    ///
    /// The delegate runs for its side effects only; it cannot veto a retry.
    pub fn register_eligibility<F>(&mut self, name: impl Into<String>, delegate: F)
    where
        F: Fn(&Failure, &[String]) + Send + Sync + 'static,
    {
        self.eligibility.insert(name.into(), Arc::new(delegate));
    }

    /// Whether a delay delegate with this name is registered.
    pub fn contains_delay(&self, name: &str) -> bool {
        self.delay.contains_key(name)
    }

    /// Whether an eligibility delegate with this name is registered.
    pub fn contains_eligibility(&self, name: &str) -> bool {
        self.eligibility.contains_key(name)
    }

    pub(crate) fn delay(&self, name: &str) -> Option<&DelayFn> {
        self.delay.get(name)
    }

    pub(crate) fn eligibility(&self, name: &str) -> Option<&EligibilityFn> {
        self.eligibility.get(name)
    }
}

impl fmt::Debug for DelegateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateRegistry")
            .field("delay", &self.delay.keys().collect::<Vec<_>>())
            .field("eligibility", &self.eligibility.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Failure-kind names resolvable from `retryIfException` annotations.
#[derive(Clone, Default)]
pub struct FailureKindRegistry {
    kinds: BTreeMap<String, MatcherFn>,
}

impl FailureKindRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as matching exactly the error type `E`.
    pub fn register<E>(&mut self, name: impl Into<String>)
    where
        E: Error + Send + Sync + 'static,
    {
        self.kinds.insert(name.into(), Arc::new(|error| error.is::<E>()));
    }

    /// Register `name` with a custom matcher, e.g. to group several error
    /// types under one annotation name.
    pub fn register_matcher<F>(&mut self, name: impl Into<String>, matcher: F)
    where
        F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        self.kinds.insert(name.into(), Arc::new(matcher));
    }

    /// Whether a kind with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Whether `failure` matches the kind registered under `name`.
    ///
    /// An unregistered name never matches; validation rejects such names
    /// before the filter ever consults them.
    pub fn matches(&self, name: &str, failure: &Failure) -> bool {
        self.kinds.get(name).is_some_and(|matcher| matcher(failure.as_error()))
    }
}

impl fmt::Debug for FailureKindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureKindRegistry")
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}
