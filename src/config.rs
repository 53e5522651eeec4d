use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_FORUM_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, OUTPUT_FILE_PREFIX,
};
use crate::discourse::BatchFailurePolicy;
use crate::render::OutputFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Settings for one export run.
///
/// Built once at startup and passed by reference into the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    // Thread
    pub thread_id: String,
    pub base_url: String,

    // Fetching
    pub batch_size: usize,
    pub request_timeout: Duration,
    pub on_batch_failure: BatchFailurePolicy,

    // Output
    pub output_format: OutputFormat,
    pub output_dir: PathBuf,
}

impl Config {
    /// Build the configuration for `thread_id`, reading everything else from
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an unparseable value.
    pub fn from_env(thread_id: String) -> Result<Self, ConfigError> {
        Ok(Self {
            thread_id,
            base_url: env_or_default("FORUM_BASE_URL", DEFAULT_FORUM_BASE_URL),

            batch_size: parse_env_usize("BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
            request_timeout: Duration::from_secs(parse_env_u64(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            on_batch_failure: parse_batch_failure_policy(&env_or_default(
                "ON_BATCH_FAILURE",
                "skip",
            ))?,

            output_format: parse_output_format(&env_or_default("OUTPUT_FORMAT", "pdf"))?,
            output_dir: PathBuf::from(env_or_default("OUTPUT_DIR", ".")),
        })
    }

    /// Defaults for tests: PDF output in the current directory.
    #[must_use]
    pub fn for_testing(thread_id: &str, base_url: &str) -> Self {
        Self {
            thread_id: thread_id.to_string(),
            base_url: base_url.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout: Duration::from_secs(10),
            on_batch_failure: BatchFailurePolicy::Skip,
            output_format: OutputFormat::Pdf,
            output_dir: PathBuf::from("."),
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "THREAD_ID".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self
            .thread_id
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
        {
            return Err(ConfigError::InvalidValue {
                name: "THREAD_ID".to_string(),
                message: format!("'{}' is not a single URL path segment", self.thread_id),
            });
        }
        match url::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    name: "FORUM_BASE_URL".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    name: "FORUM_BASE_URL".to_string(),
                    message: e.to_string(),
                });
            }
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "BATCH_SIZE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// `{output_dir}/thread_content_{thread_id}.{ext}`
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{OUTPUT_FILE_PREFIX}{}.{}",
            self.thread_id,
            self.output_format.extension()
        ))
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_output_format(value: &str) -> Result<OutputFormat, ConfigError> {
    match value.to_lowercase().as_str() {
        "pdf" => Ok(OutputFormat::Pdf),
        "json" => Ok(OutputFormat::Json),
        _ => Err(ConfigError::InvalidValue {
            name: "OUTPUT_FORMAT".to_string(),
            message: format!("must be 'pdf' or 'json', got '{value}'"),
        }),
    }
}

fn parse_batch_failure_policy(value: &str) -> Result<BatchFailurePolicy, ConfigError> {
    match value.to_lowercase().as_str() {
        "skip" => Ok(BatchFailurePolicy::Skip),
        "abort" => Ok(BatchFailurePolicy::Abort),
        _ => Err(ConfigError::InvalidValue {
            name: "ON_BATCH_FAILURE".to_string(),
            message: format!("must be 'skip' or 'abort', got '{value}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const VARS: &[&str] = &[
        "FORUM_BASE_URL",
        "BATCH_SIZE",
        "REQUEST_TIMEOUT_SECS",
        "ON_BATCH_FAILURE",
        "OUTPUT_FORMAT",
        "OUTPUT_DIR",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("pdf").unwrap(), OutputFormat::Pdf);
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("docx").is_err());
    }

    #[test]
    fn test_parse_batch_failure_policy() {
        assert_eq!(
            parse_batch_failure_policy("skip").unwrap(),
            BatchFailurePolicy::Skip
        );
        assert_eq!(
            parse_batch_failure_policy("ABORT").unwrap(),
            BatchFailurePolicy::Abort
        );
        assert!(parse_batch_failure_policy("retry").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env("222373".to_string()).unwrap();
        assert_eq!(config.base_url, DEFAULT_FORUM_BASE_URL);
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.on_batch_failure, BatchFailurePolicy::Skip);
        assert_eq!(config.output_format, OutputFormat::Pdf);
        assert_eq!(
            config.output_path(),
            PathBuf::from("./thread_content_222373.pdf")
        );
        config.validate().unwrap();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("FORUM_BASE_URL", "https://forum.example.com");
        std::env::set_var("BATCH_SIZE", "5");
        std::env::set_var("ON_BATCH_FAILURE", "abort");
        std::env::set_var("OUTPUT_FORMAT", "json");
        std::env::set_var("OUTPUT_DIR", "/tmp/exports");

        let config = Config::from_env("99".to_string()).unwrap();
        clear_env();

        assert_eq!(config.base_url, "https://forum.example.com");
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.on_batch_failure, BatchFailurePolicy::Abort);
        assert_eq!(
            config.output_path(),
            PathBuf::from("/tmp/exports/thread_content_99.json")
        );
    }

    #[test]
    #[serial]
    fn test_from_env_bad_integer() {
        clear_env();
        std::env::set_var("BATCH_SIZE", "twenty");

        let result = Config::from_env("1".to_string());
        clear_env();

        assert!(matches!(result, Err(ConfigError::ParseInt { .. })));
    }

    #[test]
    fn test_validate() {
        let config = Config::for_testing("123", "https://forum.example.com");
        assert!(config.validate().is_ok());

        let mut bad = config.clone();
        bad.batch_size = 0;
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.request_timeout = Duration::ZERO;
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.thread_id = String::new();
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.thread_id = "12/../13".to_string();
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.base_url = "forum.example.com".to_string();
        assert!(bad.validate().is_err());

        let mut bad = config;
        bad.base_url = "ftp://forum.example.com".to_string();
        assert!(bad.validate().is_err());
    }
}
