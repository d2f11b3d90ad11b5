use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::TmdbConfig,
    error::ApiError,
    model::{Movie, MoviePage},
    store::traits::MovieSource,
};

const POPULAR_ENDPOINT: &str = "/movie/popular";
const SEARCH_ENDPOINT: &str = "/search/movie";

/// Thin client for the TMDB read endpoints. Holds no state besides its
/// configuration and the shared connection pool; issues exactly one request
/// per call, no retries, no caching.
pub struct TmdbClient {
    http: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub async fn fetch_popular(&self) -> Result<Vec<Movie>, ApiError> {
        self.fetch_page(POPULAR_ENDPOINT, &[]).await
    }

    pub async fn search_by_query(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        debug_assert!(!query.trim().is_empty());
        self.fetch_page(SEARCH_ENDPOINT, &[("query", query)]).await
    }

    async fn fetch_page(
        &self,
        endpoint: &str,
        extra: &[(&str, &str)],
    ) -> Result<Vec<Movie>, ApiError> {
        let params = self.request_params(extra)?;
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        debug!(%url, "requesting catalog page");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let page: MoviePage = serde_json::from_str(&body)?;

        Ok(page.results)
    }

    /// Base parameters merged with `extra`. `language` may be overridden per
    /// call, `api_key` may not. Fails before any I/O when the key is absent.
    fn request_params(&self, extra: &[(&str, &str)]) -> Result<Vec<(String, String)>, ApiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::Configuration("TMDB_API_KEY is not set".to_string()))?;

        let mut params = vec![("language".to_string(), self.config.language.clone())];
        for (name, value) in extra {
            if *name == "api_key" {
                continue;
            }
            params.retain(|(existing, _)| existing != name);
            params.push((name.to_string(), value.to_string()));
        }
        params.push(("api_key".to_string(), api_key.to_string()));

        Ok(params)
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn fetch_popular(&self) -> Result<Vec<Movie>, ApiError> {
        TmdbClient::fetch_popular(self).await
    }

    async fn search_by_query(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        TmdbClient::search_by_query(self, query).await
    }
}
