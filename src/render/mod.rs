//! Output artifacts: a paginated PDF or a JSON record list.
//!
//! Both writers publish through [`crate::fs_utils::write_atomic`], so a failed
//! or interrupted render never leaves a half-written file at the destination.

pub mod json;
pub mod layout;
pub mod metrics;
pub mod pdf;

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::normalize::NormalizedPost;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize posts: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to build PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pdf,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Json => "json",
        }
    }
}

/// Write `posts`, in order, to `destination` in the requested format.
///
/// # Errors
///
/// Returns an error if the artifact cannot be built or written; in that case
/// nothing is published at `destination`.
pub fn render(
    posts: &[NormalizedPost],
    destination: &Path,
    format: OutputFormat,
) -> Result<(), RenderError> {
    match format {
        OutputFormat::Pdf => {
            let title = destination
                .file_stem()
                .map_or_else(|| "thread".to_string(), |s| s.to_string_lossy().into_owned());
            pdf::write_pdf(posts, &title, destination)?;
        }
        OutputFormat::Json => json::write_json(posts, destination)?,
    }

    info!(
        path = %destination.display(),
        format = format.extension(),
        posts = posts.len(),
        "Rendered thread"
    );
    Ok(())
}
