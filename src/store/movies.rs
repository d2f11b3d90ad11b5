use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::{error::ApiError, model::Movie};

use super::traits::MovieSource;

/// The user action behind the most recently started fetch cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Intent {
    #[default]
    Popular,
    Search(String),
}

#[derive(Debug, Clone, Default)]
pub struct MovieState {
    pub movies: Vec<Movie>,
    pub is_loading: bool,
    pub last_error: Option<ApiError>,
    pub intent: Intent,
    /// Token of the most recently started cycle. A settlement carrying an
    /// older token is discarded instead of applied.
    cycle: u64,
}

/// Sequences user intents into fetch cycles against a [`MovieSource`] and
/// exposes the resulting state through a watch channel. Observers must treat
/// the state as read-only, it is only ever mutated by the intent handlers
/// here.
pub struct MovieStore {
    source: Arc<dyn MovieSource>,
    state: watch::Sender<MovieState>,
}

impl MovieStore {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        let (state, _) = watch::channel(MovieState::default());
        Self { source, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<MovieState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> MovieState {
        self.state.borrow().clone()
    }

    pub async fn load_popular(&self) {
        let token = self.begin_cycle(Intent::Popular);
        let result = self.source.fetch_popular().await;
        self.settle(token, result);
    }

    /// A query that is empty after trimming clears the search and falls back
    /// to the popular listing.
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return self.load_popular().await;
        }
        let token = self.begin_cycle(Intent::Search(query.to_string()));
        let result = self.source.search_by_query(query).await;
        self.settle(token, result);
    }

    /// Re-runs the most recently started intent as a brand-new cycle.
    pub async fn refresh(&self) {
        let intent = self.state.borrow().intent.clone();
        match intent {
            Intent::Popular => self.load_popular().await,
            Intent::Search(query) => self.search(&query).await,
        }
    }

    fn begin_cycle(&self, intent: Intent) -> u64 {
        let mut token = 0;
        self.state.send_modify(|state| {
            state.cycle += 1;
            state.is_loading = true;
            state.last_error = None;
            state.intent = intent;
            token = state.cycle;
        });
        debug!(token, "fetch cycle started");
        token
    }

    /// Applies a cycle's outcome, unless a newer cycle has started since.
    /// On failure the previously shown movies stay visible.
    fn settle(&self, token: u64, result: Result<Vec<Movie>, ApiError>) {
        self.state.send_if_modified(|state| {
            if state.cycle != token {
                trace!(token, latest = state.cycle, "discarding superseded fetch cycle");
                return false;
            }
            match result {
                Ok(movies) => {
                    debug!(token, count = movies.len(), "fetch cycle settled");
                    state.movies = movies;
                }
                Err(err) => {
                    warn!(token, %err, "fetch cycle failed");
                    state.last_error = Some(err);
                }
            }
            state.is_loading = false;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::sleep;

    use super::*;

    #[derive(Default)]
    struct StubSource {
        popular: Vec<Movie>,
        found: Vec<Movie>,
        popular_delay: Duration,
        search_delay: Duration,
        popular_error: Option<ApiError>,
        search_error: Option<ApiError>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MovieSource for StubSource {
        async fn fetch_popular(&self) -> Result<Vec<Movie>, ApiError> {
            self.calls.lock().unwrap().push("popular".to_string());
            sleep(self.popular_delay).await;
            match &self.popular_error {
                Some(err) => Err(err.clone()),
                None => Ok(self.popular.clone()),
            }
        }

        async fn search_by_query(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
            self.calls.lock().unwrap().push(format!("search:{query}"));
            sleep(self.search_delay).await;
            match &self.search_error {
                Some(err) => Err(err.clone()),
                None => Ok(self.found.clone()),
            }
        }
    }

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: None,
            vote_average: 0.0,
            release_date: None,
            overview: None,
        }
    }

    fn store_with(source: StubSource) -> (Arc<StubSource>, Arc<MovieStore>) {
        let source = Arc::new(source);
        let store = Arc::new(MovieStore::new(source.clone()));
        (source, store)
    }

    #[tokio::test]
    async fn popular_replaces_movies_in_response_order() {
        let (_, store) = store_with(StubSource {
            popular: vec![movie(1, "A"), movie(2, "B")],
            ..StubSource::default()
        });

        store.load_popular().await;

        let state = store.snapshot();
        assert_eq!(state.movies, vec![movie(1, "A"), movie(2, "B")]);
        assert!(!state.is_loading);
        assert!(state.last_error.is_none());
        assert_eq!(state.intent, Intent::Popular);
    }

    #[tokio::test]
    async fn search_uses_the_search_endpoint() {
        let (source, store) = store_with(StubSource {
            found: vec![movie(3, "C")],
            ..StubSource::default()
        });

        store.search("  dune  ").await;

        assert_eq!(*source.calls.lock().unwrap(), vec!["search:dune"]);
        let state = store.snapshot();
        assert_eq!(state.movies, vec![movie(3, "C")]);
        assert_eq!(state.intent, Intent::Search("dune".to_string()));
    }

    #[tokio::test]
    async fn blank_search_behaves_like_load_popular() {
        let (source, store) = store_with(StubSource {
            popular: vec![movie(1, "A")],
            ..StubSource::default()
        });

        store.search("   ").await;

        assert_eq!(*source.calls.lock().unwrap(), vec!["popular"]);
        let state = store.snapshot();
        assert_eq!(state.movies, vec![movie(1, "A")]);
        assert_eq!(state.intent, Intent::Popular);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_superseded_cycle_cannot_clobber_newer_result() {
        let (source, store) = store_with(StubSource {
            popular: vec![movie(1, "old")],
            found: vec![movie(2, "fresh")],
            popular_delay: Duration::from_millis(100),
            search_delay: Duration::from_millis(10),
            ..StubSource::default()
        });
        let mut changes = store.subscribe();

        let slow = tokio::spawn({
            let store = store.clone();
            async move { store.load_popular().await }
        });
        tokio::task::yield_now().await;
        let fast = tokio::spawn({
            let store = store.clone();
            async move { store.search("fresh").await }
        });

        fast.await.unwrap();
        changes.borrow_and_update();
        slow.await.unwrap();

        // The popular cycle settled last but was started first, so its
        // result is discarded without a notification.
        let state = store.snapshot();
        assert_eq!(state.movies, vec![movie(2, "fresh")]);
        assert!(!state.is_loading);
        assert!(state.last_error.is_none());
        assert!(!changes.has_changed().unwrap());
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec!["popular", "search:fresh"]
        );
    }

    #[tokio::test]
    async fn failure_keeps_previous_movies_and_sets_error() {
        let (_, store) = store_with(StubSource {
            popular: vec![movie(1, "A"), movie(2, "B")],
            search_error: Some(ApiError::Network("connection reset".to_string())),
            ..StubSource::default()
        });

        store.load_popular().await;
        store.search("dune").await;

        let state = store.snapshot();
        assert_eq!(state.movies, vec![movie(1, "A"), movie(2, "B")]);
        assert!(matches!(state.last_error, Some(ApiError::Network(_))));
        assert!(!state.is_loading);

        // The next intent clears the error again.
        store.load_popular().await;
        assert!(store.snapshot().last_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn loading_flag_covers_exactly_the_outstanding_cycle() {
        let (_, store) = store_with(StubSource {
            popular: vec![movie(1, "A")],
            popular_delay: Duration::from_millis(10),
            ..StubSource::default()
        });
        let mut changes = store.subscribe();

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.load_popular().await }
        });

        changes.changed().await.unwrap();
        assert!(changes.borrow_and_update().is_loading);

        changes.changed().await.unwrap();
        let settled = changes.borrow_and_update().clone();
        assert!(!settled.is_loading);
        assert!(settled.last_error.is_none());

        task.await.unwrap();
    }

    #[tokio::test]
    async fn refresh_repeats_the_latest_intent() {
        let (source, store) = store_with(StubSource {
            found: vec![movie(3, "C")],
            ..StubSource::default()
        });

        store.search("dune").await;
        store.refresh().await;

        assert_eq!(
            *source.calls.lock().unwrap(),
            vec!["search:dune", "search:dune"]
        );
        assert_eq!(store.snapshot().intent, Intent::Search("dune".to_string()));
    }
}
