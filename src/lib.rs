#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # retread
//!
//! Annotation-driven retry policies for flaky tests: a retry layer a host
//! test runner mixes into its "run a single test" path.
//!
//! ## Features
//!
//! - **Attempt and time budgets** via `retryAttempts` / `retryForSeconds`
//!   annotations, with method-over-class precedence
//! - **Strict validation** of every annotation value, with precise error
//!   messages raised at the point of use
//! - **Selective retry** through a failure-kind allow-list or a custom
//!   eligibility delegate
//! - **Delay strategies**: fixed pause, custom delegate, or the built-in
//!   exponential backoff with jitter
//! - **Pluggable collaborators**: loggers, sleepers, and clocks are traits
//!   with production and test implementations
//!
//! ## Quick Start
//!
//! ```rust
//! use retread::{names, AnnotationSet, Failure, Outcome, RetryRunner, Scope};
//!
//! let runner = RetryRunner::builder().build();
//! let annotations = AnnotationSet::new().with(Scope::Method, names::RETRY_ATTEMPTS, "2");
//!
//! let mut healed = false;
//! let outcome = runner
//!     .run(&annotations, || {
//!         if healed {
//!             Outcome::Passed
//!         } else {
//!             healed = true;
//!             Outcome::Failed(Failure::assertion("flaky on first run"))
//!         }
//!     })
//!     .expect("annotations are well-formed");
//! assert!(outcome.is_passed());
//! ```

pub mod annotations;
pub mod backoff;
pub mod clock;
pub mod config;
pub(crate) mod delay;
pub(crate) mod engine;
pub mod error;
pub(crate) mod filter;
pub mod logger;
pub mod outcome;
pub mod parse;
pub mod policy;
pub mod registry;
pub mod runner;
pub mod sleeper;

// Re-exports
pub use annotations::{names, AnnotationSet, Scope};
pub use backoff::{ExponentialBackoff, DEFAULT_MAX_DELAY, EXPONENTIAL_BACKOFF_DELEGATE};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{Config, ConfigFileError, DEFAULT_RETRY_COUNT};
pub use error::ConfigError;
pub use logger::{
    FileLogger, FileLoggerFactory, Logger, LoggerFactory, MemoryLogger, StdoutLogger,
    StdoutLoggerFactory,
};
pub use outcome::{AssertionFailed, Failure, Outcome};
pub use policy::{Delegate, RetryPolicy};
pub use registry::{DelegateRegistry, FailureKindRegistry};
pub use runner::{RetryRunner, RetryRunnerBuilder};
pub use sleeper::{InstantSleeper, Sleeper, ThreadSleeper, TrackingSleeper};
