//! Annotation value parsing and validation.
//!
//! Raw annotation strings are loosely typed; these routines convert them
//! into range-checked values with precise [`ConfigError`] messages. The
//! numeric contract accepts integral floats (`"1.0"` parses to `1`) but
//! rejects empty, non-numeric, fractional, and negative values.

use crate::error::ConfigError;

/// Parse a non-negative integer annotation value.
///
/// Accepts plain integers and integral float renderings (`"1"`, `"1.0"`,
/// `"1e2"`); the result is the truncated integer.
pub fn parse_integer(annotation: &'static str, raw: &str) -> Result<u64, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::MissingInteger { annotation });
    }

    let value = match raw.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let float = raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| ConfigError::NotNumeric { annotation, value: raw.to_string() })?;
            if float.fract() != 0.0 {
                return Err(ConfigError::NotIntegral { annotation, value: float });
            }
            float.trunc() as i64
        }
    };

    if value < 0 {
        return Err(ConfigError::Negative { annotation, value });
    }
    Ok(value as u64)
}

/// Parse a delegate annotation value of the form `"<name> <arg>..."`.
///
/// The raw value is split on single spaces; the first token is the delegate
/// name, the rest are literal string arguments. `exists` is consulted to
/// verify the name resolves to a registered delegate.
pub fn parse_delegate<F>(
    annotation: &'static str,
    raw: &str,
    exists: F,
) -> Result<(String, Vec<String>), ConfigError>
where
    F: Fn(&str) -> bool,
{
    let mut tokens = raw.split(' ');
    let name = tokens.next().unwrap_or_default();
    if name.is_empty() {
        return Err(ConfigError::MissingDelegate { annotation });
    }
    if !exists(name) {
        return Err(ConfigError::UnknownDelegate { annotation, name: name.to_string() });
    }
    Ok((name.to_string(), tokens.map(str::to_string).collect()))
}

/// Validate a `retryIfException` failure-kind name.
pub fn validate_failure_kind<F>(raw: &str, known: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> bool,
{
    if raw.is_empty() {
        return Err(ConfigError::MissingFailureKind);
    }
    if !known(raw) {
        return Err(ConfigError::UnknownFailureKind { name: raw.to_string() });
    }
    Ok(())
}
