//! Shared constants used across the application.

/// User agent string sent with every forum API request.
///
/// Identifies the exporter honestly so forum operators can tell its traffic apart.
pub const EXPORTER_USER_AGENT: &str = concat!("thread-export/", env!("CARGO_PKG_VERSION"));

/// Forum queried when `FORUM_BASE_URL` is not set.
pub const DEFAULT_FORUM_BASE_URL: &str = "https://www.elektronauts.com";

/// Number of post ids requested per posts.json call.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Per-request timeout applied to every API call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Prefix of the generated output file, followed by the thread id.
pub const OUTPUT_FILE_PREFIX: &str = "thread_content_";
