use tracing::{debug, info, warn};

use super::models::{PostId, PostsResponse, RawPost, TopicResponse};
use super::transport::Transport;
use super::FetchError;

/// What to do when a posts batch cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchFailurePolicy {
    /// Log the failure, record it, and continue with the next batch.
    #[default]
    Skip,
    /// Stop the export at the first failed batch.
    Abort,
}

/// A batch that was skipped under [`BatchFailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBatch {
    /// Zero-based position of the batch in the partition.
    pub index: usize,
    pub ids: Vec<PostId>,
    pub reason: String,
}

/// Result of fetching every batch of a thread.
#[derive(Debug, Clone, Default)]
pub struct FetchedPosts {
    /// Posts in batch order, each batch in the server's response order.
    pub posts: Vec<RawPost>,
    pub failed_batches: Vec<FailedBatch>,
}

/// Split `ids` into contiguous batches of at most `batch_size`.
///
/// A `batch_size` of zero is treated as one.
pub fn batches(ids: &[PostId], batch_size: usize) -> std::slice::Chunks<'_, PostId> {
    ids.chunks(batch_size.max(1))
}

/// Pulls a thread's post ids and cooked bodies over a [`Transport`].
#[derive(Debug, Clone)]
pub struct PostFetcher<T> {
    transport: T,
    on_failure: BatchFailurePolicy,
}

impl<T: Transport> PostFetcher<T> {
    pub fn new(transport: T, on_failure: BatchFailurePolicy) -> Self {
        Self {
            transport,
            on_failure,
        }
    }

    /// Fetch the ordered post id list from the topic metadata endpoint.
    ///
    /// A response without `post_stream.stream` yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success, or
    /// the body is not JSON.
    pub async fn list_post_ids(&self, metadata_url: &str) -> Result<Vec<PostId>, FetchError> {
        let body = self.transport.fetch(metadata_url, &[]).await?;
        let topic: TopicResponse = serde_json::from_str(&body)?;

        if let Some(ids) = topic.into_post_ids() {
            debug!(url = %metadata_url, posts = ids.len(), "Listed thread post ids");
            Ok(ids)
        } else {
            warn!(
                url = %metadata_url,
                "Topic response has no post_stream.stream, treating thread as empty"
            );
            Ok(Vec::new())
        }
    }

    /// Fetch the cooked HTML of `ids` in batches of `batch_size`.
    ///
    /// Batches are requested one after another in partition order. Ids the
    /// server does not return (deleted or hidden posts) are silently absent.
    ///
    /// # Errors
    ///
    /// Only returns an error under [`BatchFailurePolicy::Abort`], wrapping
    /// the first batch failure.
    pub async fn fetch_posts(
        &self,
        posts_url: &str,
        ids: &[PostId],
        batch_size: usize,
    ) -> Result<FetchedPosts, FetchError> {
        let mut fetched = FetchedPosts::default();
        let total_batches = ids.len().div_ceil(batch_size.max(1));

        for (index, batch) in batches(ids, batch_size).enumerate() {
            debug!(
                batch = index,
                of = total_batches,
                size = batch.len(),
                "Fetching posts batch"
            );

            match self.fetch_batch(posts_url, batch).await {
                Ok(posts) => {
                    if posts.len() < batch.len() {
                        debug!(
                            batch = index,
                            requested = batch.len(),
                            returned = posts.len(),
                            "Batch returned fewer posts than requested"
                        );
                    }
                    fetched.posts.extend(posts);
                }
                Err(e) => match self.on_failure {
                    BatchFailurePolicy::Skip => {
                        warn!(batch = index, ids = ?batch, "Failed to fetch batch, skipping: {e}");
                        fetched.failed_batches.push(FailedBatch {
                            index,
                            ids: batch.to_vec(),
                            reason: e.to_string(),
                        });
                    }
                    BatchFailurePolicy::Abort => {
                        return Err(FetchError::Batch {
                            index,
                            source: Box::new(e),
                        });
                    }
                },
            }
        }

        info!(
            requested = ids.len(),
            fetched = fetched.posts.len(),
            failed_batches = fetched.failed_batches.len(),
            "Finished fetching posts"
        );

        Ok(fetched)
    }

    async fn fetch_batch(
        &self,
        posts_url: &str,
        batch: &[PostId],
    ) -> Result<Vec<RawPost>, FetchError> {
        let query: Vec<(&str, String)> = batch
            .iter()
            .map(|id| ("post_ids[]", id.to_string()))
            .collect();

        let body = self.transport.fetch(posts_url, &query).await?;
        let response: PostsResponse = serde_json::from_str(&body)?;

        Ok(response.into_raw_posts().unwrap_or_else(|| {
            warn!(url = %posts_url, "Posts response has no post_stream.posts, treating batch as empty");
            Vec::new()
        }))
    }
}
