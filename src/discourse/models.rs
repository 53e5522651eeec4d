//! Response shapes for the Discourse topic endpoints.
//!
//! Every nested container is optional. Discourse omits `post_stream` for
//! some error pages and hidden topics; a missing container is read as "no
//! posts" instead of a decode failure, and the fetcher logs it.

use serde::Deserialize;

/// Post identifier assigned by Discourse, unique within a thread.
pub type PostId = u64;

/// A post as returned by the posts endpoint: its id and cooked HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub id: PostId,
    pub html: String,
}

/// `GET /t/{id}.json`
#[derive(Debug, Deserialize)]
pub struct TopicResponse {
    #[serde(default)]
    pub post_stream: Option<TopicPostStream>,
}

#[derive(Debug, Deserialize)]
pub struct TopicPostStream {
    /// Every post id in display order, not just the first page.
    #[serde(default)]
    pub stream: Option<Vec<PostId>>,
}

impl TopicResponse {
    /// Ordered post ids, or `None` when `post_stream.stream` is absent.
    #[must_use]
    pub fn into_post_ids(self) -> Option<Vec<PostId>> {
        self.post_stream.and_then(|s| s.stream)
    }
}

/// `GET /t/{id}/posts.json?post_ids[]=...`
#[derive(Debug, Deserialize)]
pub struct PostsResponse {
    #[serde(default)]
    pub post_stream: Option<PostsPostStream>,
}

#[derive(Debug, Deserialize)]
pub struct PostsPostStream {
    #[serde(default)]
    pub posts: Option<Vec<ApiPost>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPost {
    pub id: PostId,
    #[serde(default)]
    pub cooked: Option<String>,
}

impl PostsResponse {
    /// Posts in response order, or `None` when `post_stream.posts` is absent.
    #[must_use]
    pub fn into_raw_posts(self) -> Option<Vec<RawPost>> {
        let posts = self.post_stream.and_then(|s| s.posts)?;
        Some(
            posts
                .into_iter()
                .map(|p| RawPost {
                    id: p.id,
                    html: p.cooked.unwrap_or_default(),
                })
                .collect(),
        )
    }
}
