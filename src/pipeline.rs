//! The export run: locate, fetch, normalize, render.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::discourse::{FailedBatch, HttpTransport, PostFetcher, ThreadLocator, Transport};
use crate::normalize::{HtmlNormalizer, NormalizedPost, Normalizer};
use crate::render;

/// Outcome of a completed export.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    /// Post ids listed by the thread metadata.
    pub requested: usize,
    /// Posts written to the output.
    pub fetched: usize,
    pub failed_batches: Vec<FailedBatch>,
}

/// Export the configured thread over HTTP.
///
/// # Errors
///
/// Returns an error if the post id list cannot be fetched, a batch fails
/// under the abort policy, or the output cannot be written. No output file
/// is produced in any of these cases.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let transport =
        HttpTransport::new(config.request_timeout).context("Failed to build HTTP client")?;
    run_with_transport(config, transport).await
}

/// Export the configured thread using `transport` for every request.
///
/// # Errors
///
/// See [`run`].
pub async fn run_with_transport<T: Transport>(config: &Config, transport: T) -> Result<RunSummary> {
    let urls = ThreadLocator::new(&config.base_url).locate(&config.thread_id);
    let fetcher = PostFetcher::new(transport, config.on_batch_failure);

    info!(thread_id = %config.thread_id, url = %urls.metadata_url, "Fetching thread metadata");
    let ids = fetcher
        .list_post_ids(&urls.metadata_url)
        .await
        .with_context(|| format!("Failed to list posts of thread {}", config.thread_id))?;

    info!(
        thread_id = %config.thread_id,
        posts = ids.len(),
        batch_size = config.batch_size,
        "Fetching posts"
    );
    let fetched = fetcher
        .fetch_posts(&urls.posts_url, &ids, config.batch_size)
        .await
        .with_context(|| format!("Failed to fetch posts of thread {}", config.thread_id))?;

    for batch in &fetched.failed_batches {
        warn!(
            batch = batch.index,
            ids = ?batch.ids,
            reason = %batch.reason,
            "Posts missing from output"
        );
    }

    let normalizer = HtmlNormalizer;
    let posts: Vec<NormalizedPost> = fetched
        .posts
        .iter()
        .map(|post| normalizer.normalize_post(post))
        .collect();

    let output_path = config.output_path();
    let summary = RunSummary {
        output_path: output_path.clone(),
        requested: ids.len(),
        fetched: posts.len(),
        failed_batches: fetched.failed_batches,
    };

    let format = config.output_format;
    tokio::task::spawn_blocking(move || render::render(&posts, &output_path, format))
        .await
        .context("Render task panicked")?
        .with_context(|| format!("Failed to write {}", summary.output_path.display()))?;

    Ok(summary)
}
