//! Retry policy resolution.
//!
//! A [`RetryPolicy`] is derived per test invocation from the raw
//! [`AnnotationSet`], with every value validated on the way in. Resolution
//! happens when the test is about to run, so a malformed annotation on a
//! test that is never selected never errors.
//!
//! `attempts` and `forSeconds` are independent toggles; when both are
//! declared the engine gives `attempts` priority. `delaySeconds` and
//! `delayMethod` are mutually exclusive, enforced when the delay strategy
//! is built.

use crate::annotations::{names, AnnotationSet};
use crate::error::ConfigError;
use crate::parse::{parse_delegate, parse_integer, validate_failure_kind};
use crate::registry::{DelegateRegistry, FailureKindRegistry};

/// A named delegate reference plus its literal string arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegate {
    /// Registered delegate name.
    pub name: String,
    /// Literal arguments, passed through after the attempt number or failure.
    pub args: Vec<String>,
}

/// Validated retry configuration for one test invocation.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    /// Max extra retry attempts; `None` when not configured.
    pub(crate) attempts: Option<u64>,
    /// Wall-clock retry budget in seconds, measured from the first retry.
    pub(crate) for_seconds: Option<u64>,
    /// Fixed pause between attempts; zero means no fixed delay.
    pub(crate) delay_seconds: u64,
    /// Delay delegate, if configured.
    pub(crate) delay_method: Option<Delegate>,
    /// Failure-kind allow-list, in declaration order.
    pub(crate) if_exceptions: Option<Vec<String>>,
    /// Eligibility delegate, if configured.
    pub(crate) if_method: Option<Delegate>,
}

impl RetryPolicy {
    /// Resolve and validate a policy from raw annotations.
    ///
    /// Delegate names are checked against `delegates` and failure-kind
    /// names against `kinds`; any malformed value aborts with the
    /// documented [`ConfigError`].
    pub fn from_annotations(
        annotations: &AnnotationSet,
        delegates: &DelegateRegistry,
        kinds: &FailureKindRegistry,
    ) -> Result<Self, ConfigError> {
        let attempts = annotations
            .first(names::RETRY_ATTEMPTS)
            .map(|raw| parse_integer(names::RETRY_ATTEMPTS, raw))
            .transpose()?;

        let for_seconds = annotations
            .first(names::RETRY_FOR_SECONDS)
            .map(|raw| parse_integer(names::RETRY_FOR_SECONDS, raw))
            .transpose()?;

        let delay_seconds = annotations
            .first(names::RETRY_DELAY_SECONDS)
            .map(|raw| parse_integer(names::RETRY_DELAY_SECONDS, raw))
            .transpose()?
            .unwrap_or(0);

        let delay_method = annotations
            .first(names::RETRY_DELAY_METHOD)
            .map(|raw| {
                parse_delegate(names::RETRY_DELAY_METHOD, raw, |name| {
                    delegates.contains_delay(name)
                })
            })
            .transpose()?
            .map(|(name, args)| Delegate { name, args });

        let if_exceptions = annotations
            .method_values(names::RETRY_IF_EXCEPTION)
            .map(|values| {
                values
                    .iter()
                    .map(|raw| {
                        validate_failure_kind(raw, |name| kinds.contains(name))
                            .map(|()| raw.clone())
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let if_method = annotations
            .first_at(crate::annotations::Scope::Method, names::RETRY_IF_METHOD)
            .map(|raw| {
                parse_delegate(names::RETRY_IF_METHOD, raw, |name| {
                    delegates.contains_eligibility(name)
                })
            })
            .transpose()?
            .map(|(name, args)| Delegate { name, args });

        Ok(Self { attempts, for_seconds, delay_seconds, delay_method, if_exceptions, if_method })
    }

    /// Whether any termination strategy is configured.
    pub fn is_configured(&self) -> bool {
        self.attempts.is_some() || self.for_seconds.is_some()
    }

    /// Configured attempt budget, if any.
    pub fn attempts(&self) -> Option<u64> {
        self.attempts
    }

    /// Configured time budget in seconds, if any.
    pub fn for_seconds(&self) -> Option<u64> {
        self.for_seconds
    }
}
