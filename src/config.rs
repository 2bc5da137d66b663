//! XML configuration file support.
//!
//! An optional `retread.xml` (or `retread.xml.dist`) in the working
//! directory can carry a `baseRetryCount` attribute on its root element,
//! giving hosts a suite-wide fallback attempt count for
//! [`RetryRunnerBuilder::base_attempts`](crate::RetryRunnerBuilder::base_attempts).
//! An absent or non-numeric attribute falls back to 3.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Retry count used when the attribute is absent or not numeric.
pub const DEFAULT_RETRY_COUNT: u64 = 3;

/// Candidate file names probed in order.
const CANDIDATE_FILES: [&str; 2] = ["retread.xml", "retread.xml.dist"];

/// Errors reading or parsing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file could not be read.
    #[error("could not read \"{path}\": {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not well-formed XML.
    #[error("could not parse \"{path}\": {source}")]
    Xml {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying XML error.
        source: roxmltree::Error,
    },
}

/// Parsed configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    retry_count: u64,
}

impl Config {
    /// Read and parse a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigFileError::Io { path: path.to_path_buf(), source })?;
        let document = roxmltree::Document::parse(&contents)
            .map_err(|source| ConfigFileError::Xml { path: path.to_path_buf(), source })?;

        let retry_count = document
            .root_element()
            .attribute("baseRetryCount")
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_COUNT);

        Ok(Self { retry_count })
    }

    /// The suite-wide default retry count.
    pub fn retry_count(&self) -> u64 {
        self.retry_count
    }
}

/// First existing candidate configuration file under `dir`, if any.
pub fn config_filename_in(dir: impl AsRef<Path>) -> Option<PathBuf> {
    let dir = dir.as_ref();
    CANDIDATE_FILES.iter().map(|name| dir.join(name)).find(|candidate| candidate.exists())
}

/// First existing candidate configuration file in the working directory.
pub fn config_filename() -> Option<PathBuf> {
    std::env::current_dir().ok().and_then(config_filename_in)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_base_retry_count_attribute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retread.xml");
        fs::write(&path, r#"<retread baseRetryCount="5"/>"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.retry_count(), 5);
    }

    #[test]
    fn missing_attribute_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retread.xml");
        fs::write(&path, "<retread/>").unwrap();

        assert_eq!(Config::from_file(&path).unwrap().retry_count(), DEFAULT_RETRY_COUNT);
    }

    #[test]
    fn non_numeric_attribute_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retread.xml");
        fs::write(&path, r#"<retread baseRetryCount="lots"/>"#).unwrap();

        assert_eq!(Config::from_file(&path).unwrap().retry_count(), DEFAULT_RETRY_COUNT);
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let err = Config::from_file("/no/such/retread.xml").unwrap_err();
        assert!(matches!(err, ConfigFileError::Io { .. }));
        assert!(err.to_string().contains("/no/such/retread.xml"));
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retread.xml");
        fs::write(&path, "<retread").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Xml { .. }));
    }

    #[test]
    fn discovery_prefers_the_non_dist_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(config_filename_in(dir.path()), None);

        fs::write(dir.path().join("retread.xml.dist"), "<retread/>").unwrap();
        assert_eq!(
            config_filename_in(dir.path()),
            Some(dir.path().join("retread.xml.dist"))
        );

        fs::write(dir.path().join("retread.xml"), "<retread/>").unwrap();
        assert_eq!(config_filename_in(dir.path()), Some(dir.path().join("retread.xml")));
    }
}
