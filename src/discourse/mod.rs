//! Client side of the Discourse topic JSON API.
//!
//! Flow: [`ThreadLocator`] builds the endpoint URLs, [`PostFetcher`] lists the
//! topic's post ids and then pulls their cooked HTML in contiguous batches
//! over a [`Transport`].

pub mod fetcher;
pub mod locator;
pub mod models;
pub mod transport;

use thiserror::Error;

pub use fetcher::{batches, BatchFailurePolicy, FailedBatch, FetchedPosts, PostFetcher};
pub use locator::{ThreadLocator, ThreadUrls};
pub use models::{PostId, RawPost};
pub use transport::{HttpTransport, Transport};

/// Errors raised while talking to the forum API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    Remote { url: String, status: u16 },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("batch {index} failed: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<FetchError>,
    },
}
