//! Retry decision engine.
//!
//! State machine evaluated once per captured failure. The attempt counter
//! and the time-of-first-retry latch live here, scoped to one invocation;
//! nothing is shared across tests.
//!
//! Budget evaluation order: an `attempts` budget is checked first;
//! otherwise a `forSeconds` wall-clock budget applies, latched at the first
//! retry; with neither configured every failure exhausts immediately (no
//! policy declared means no retry). When both budgets are declared
//! attempts-mode wins.

use crate::clock::Clock;
use crate::policy::RetryPolicy;

const MILLIS_PER_SECOND: u64 = 1_000;

/// Engine state, advanced by the execution wrapper. Surfaces in the
/// wrapper's decision diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EngineState {
    /// An attempt is running or about to run.
    Running,
    /// A retry was granted; the next attempt is pending.
    Retrying,
    /// No further retry is permitted by the configured policy.
    Exhausted,
    /// The outcome propagated without consulting the budget
    /// (incomplete/skipped outcome or ineligible failure).
    Terminal,
}

/// Per-invocation decision state.
#[derive(Debug)]
pub(crate) struct DecisionEngine<'a> {
    policy: &'a RetryPolicy,
    clock: &'a dyn Clock,
    state: EngineState,
    attempt_number: u32,
    first_retry_millis: Option<u64>,
}

impl<'a> DecisionEngine<'a> {
    pub(crate) fn new(policy: &'a RetryPolicy, clock: &'a dyn Clock) -> Self {
        Self { policy, clock, state: EngineState::Running, attempt_number: 0, first_retry_millis: None }
    }

    pub(crate) fn state(&self) -> EngineState {
        self.state
    }

    /// Retries granted so far.
    pub(crate) fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    /// Mark the invocation terminal without counting the failure.
    pub(crate) fn terminal(&mut self) {
        tracing::debug!(attempt = self.attempt_number, "terminal, propagating outcome");
        self.state = EngineState::Terminal;
    }

    /// Count a retryable failure and evaluate the budget.
    ///
    /// Returns the progress line to emit when another retry is granted, or
    /// `None` when the policy is exhausted.
    pub(crate) fn next_retry(&mut self) -> Option<String> {
        self.attempt_number += 1;
        let progress = self.evaluate();
        self.state = match &progress {
            Some(line) => {
                tracing::debug!(attempt = self.attempt_number, line = %line, "retrying");
                EngineState::Retrying
            }
            None => {
                tracing::debug!(attempt = self.attempt_number, "retry budget exhausted");
                EngineState::Exhausted
            }
        };
        progress
    }

    fn evaluate(&mut self) -> Option<String> {
        if let Some(attempts) = self.policy.attempts() {
            if u64::from(self.attempt_number) > attempts {
                return None;
            }
            return Some(format!("[RETRY] Retrying {} of {}", self.attempt_number, attempts));
        }

        if let Some(for_seconds) = self.policy.for_seconds() {
            let now = self.clock.now_millis();
            let first_retry = *self.first_retry_millis.get_or_insert(now);
            let deadline =
                first_retry.saturating_add(for_seconds.saturating_mul(MILLIS_PER_SECOND));
            if now > deadline {
                return None;
            }
            let remaining = (deadline - now) / MILLIS_PER_SECOND;
            let unit = if remaining == 1 { "second" } else { "seconds" };
            return Some(format!(
                "[RETRY] Retrying {} ({} {} remaining)",
                self.attempt_number, remaining, unit
            ));
        }

        None
    }
}
