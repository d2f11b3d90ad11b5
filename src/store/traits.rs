use async_trait::async_trait;

use crate::{error::ApiError, model::Movie};

#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn fetch_popular(&self) -> Result<Vec<Movie>, ApiError>;

    /// `query` must be non-empty after trimming. Blank queries are the
    /// caller's cue to fall back to `fetch_popular`.
    async fn search_by_query(&self, query: &str) -> Result<Vec<Movie>, ApiError>;
}
