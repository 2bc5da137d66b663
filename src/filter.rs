//! Failure eligibility.
//!
//! Decides whether a captured failure may be retried:
//!
//! 1. With a `retryIfException` allow-list, eligible iff the failure
//!    matches any listed kind.
//! 2. Otherwise, with a `retryIfMethod` delegate, the delegate is invoked
//!    with `(failure, args)` for its side effects and the failure is
//!    unconditionally treated as eligible. The delegate cannot veto a
//!    retry through its return value; hosts that need a real predicate
//!    should use the allow-list instead.
//! 3. With no filter configured, every failure is eligible.

use crate::outcome::Failure;
use crate::policy::RetryPolicy;
use crate::registry::{DelegateRegistry, FailureKindRegistry};

/// Eligibility check derived from a resolved policy.
#[derive(Debug)]
pub(crate) struct FailureFilter<'a> {
    policy: &'a RetryPolicy,
    delegates: &'a DelegateRegistry,
    kinds: &'a FailureKindRegistry,
}

impl<'a> FailureFilter<'a> {
    pub(crate) fn new(
        policy: &'a RetryPolicy,
        delegates: &'a DelegateRegistry,
        kinds: &'a FailureKindRegistry,
    ) -> Self {
        Self { policy, delegates, kinds }
    }

    /// Whether `failure` may be retried.
    pub(crate) fn eligible(&self, failure: &Failure) -> bool {
        if let Some(allow_list) = &self.policy.if_exceptions {
            let matched = allow_list.iter().any(|kind| self.kinds.matches(kind, failure));
            tracing::trace!(%failure, matched, "allow-list filter");
            return matched;
        }

        if let Some(delegate) = &self.policy.if_method {
            // Registration was validated when the policy resolved.
            if let Some(eligibility_fn) = self.delegates.eligibility(&delegate.name) {
                eligibility_fn(failure, &delegate.args);
            }
            return true;
        }

        true
    }
}
