//! Configuration error types.
//!
//! Every variant carries the exact user-facing message for a malformed
//! annotation value. These errors indicate a test-authoring bug, never a
//! transient failure: they are raised when the annotation is first used and
//! propagate out of the retry engine without being retried.

use thiserror::Error;

/// Raised when an annotation value fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric annotation was declared with an empty value.
    #[error("The @{annotation} annotation requires an integer as an argument")]
    MissingInteger {
        /// Name of the offending annotation.
        annotation: &'static str,
    },

    /// A numeric annotation value could not be parsed as a number.
    #[error("The @{annotation} annotation must be an integer but got {value:?}")]
    NotNumeric {
        /// Name of the offending annotation.
        annotation: &'static str,
        /// The raw value as written.
        value: String,
    },

    /// A numeric annotation value has a non-zero fractional part.
    #[error("The @{annotation} annotation must be an integer but got \"{value}\"")]
    NotIntegral {
        /// Name of the offending annotation.
        annotation: &'static str,
        /// The parsed float.
        value: f64,
    },

    /// A numeric annotation value is below the required bound.
    #[error("The @{annotation} annotation must be 0 or greater but got \"{value}\".")]
    Negative {
        /// Name of the offending annotation.
        annotation: &'static str,
        /// The parsed integer.
        value: i64,
    },

    /// A delegate annotation was declared with an empty value.
    #[error("The @{annotation} annotation requires a callable as an argument")]
    MissingDelegate {
        /// Name of the offending annotation.
        annotation: &'static str,
    },

    /// A delegate annotation names a delegate that is not registered.
    #[error("The @{annotation} annotation must name a registered delegate but got \"{name}\"")]
    UnknownDelegate {
        /// Name of the offending annotation.
        annotation: &'static str,
        /// The delegate name as written.
        name: String,
    },

    /// A `retryIfException` annotation was declared with an empty value.
    #[error("The @retryIfException annotation requires a class name as an argument")]
    MissingFailureKind,

    /// A `retryIfException` annotation names a failure kind that is not registered.
    #[error("The @retryIfException annotation must name a registered failure kind but got \"{name}\"")]
    UnknownFailureKind {
        /// The kind name as written.
        name: String,
    },

    /// Both a fixed delay and a delay delegate were configured.
    #[error("The @retryDelaySeconds and @retryDelayMethod annotations are mutually exclusive")]
    ConflictingDelay,
}
