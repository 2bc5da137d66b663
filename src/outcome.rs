//! Test outcomes and captured failures.
//!
//! A test body reports one of four outcomes per attempt. `Incomplete` and
//! `Skipped` always propagate without retry and are never counted against a
//! budget; `Failed` is the only outcome the decision engine evaluates.
//!
//! Failures are captured as `Arc<dyn Error>` so the exact value observed on
//! the final attempt is what the caller receives when retries are exhausted.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use thiserror::Error as ThisError;

/// Result of a single attempt of the underlying test body.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The attempt passed; the retry loop returns immediately.
    Passed,
    /// The test marked itself incomplete; propagated without retry.
    Incomplete(String),
    /// The test was skipped; propagated without retry.
    Skipped(String),
    /// The attempt failed with the captured failure.
    Failed(Failure),
}

impl Outcome {
    /// True for `Passed`.
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// True for `Failed`.
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Borrow the captured failure if this is `Failed`.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Failed(f) => Some(f),
            _ => None,
        }
    }
}

/// A failure captured from the test body, preserving the original error value.
#[derive(Clone)]
pub struct Failure {
    error: Arc<dyn Error + Send + Sync + 'static>,
}

impl Failure {
    /// Capture an error value.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self { error: Arc::new(error) }
    }

    /// Capture an already-shared error value.
    pub fn from_arc(error: Arc<dyn Error + Send + Sync + 'static>) -> Self {
        Self { error }
    }

    /// Capture an assertion failure with the given message.
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(AssertionFailed(message.into()))
    }

    /// Whether the captured error is of type `E`.
    pub fn is<E>(&self) -> bool
    where
        E: Error + 'static,
    {
        self.as_error().is::<E>()
    }

    /// Downcast the captured error to `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.as_error().downcast_ref::<E>()
    }

    /// Borrow the captured error as a trait object.
    pub fn as_error(&self) -> &(dyn Error + 'static) {
        &*self.error
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Failure").field(&self.error).finish()
    }
}

/// Built-in error type for assertion failures raised by a test body.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{0}")]
pub struct AssertionFailed(pub String);
