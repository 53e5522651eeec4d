/// The two topic endpoints needed to export a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadUrls {
    /// `{base}/t/{id}.json`, carries `post_stream.stream`.
    pub metadata_url: String,
    /// `{base}/t/{id}/posts.json`, answers `post_ids[]` queries.
    pub posts_url: String,
}

/// Builds topic endpoint URLs for a single forum.
#[derive(Debug, Clone)]
pub struct ThreadLocator {
    base_url: String,
}

impl ThreadLocator {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Derive the metadata and posts URLs for `thread_id`.
    #[must_use]
    pub fn locate(&self, thread_id: &str) -> ThreadUrls {
        ThreadUrls {
            metadata_url: format!("{}/t/{thread_id}.json", self.base_url),
            posts_url: format!("{}/t/{thread_id}/posts.json", self.base_url),
        }
    }
}
