//! Fetch-once loader for one displayed article's full content.
//!
//! Each card owns an [`ArticleLoader`]. The first [`ArticleLoader::request`]
//! claims the fetch; concurrent or later requests observe the shared state
//! instead of issuing another one. A failed fetch settles into the fallback
//! text the card already had.

use std::sync::Arc;

use async_trait::async_trait;
use blog_shared::LoadState;
use tokio::sync::watch;

use crate::api::{BlogApiClient, FetchError};

/// Source of an article's full body.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Fetches the raw `full_content` of `article_id`.
    async fn fetch_full_content(&self, article_id: i64) -> Result<String, FetchError>;
}

#[async_trait]
impl ArticleFetcher for BlogApiClient {
    async fn fetch_full_content(&self, article_id: i64) -> Result<String, FetchError> {
        Ok(self.get_article(article_id).await?.full_content)
    }
}

/// Owns the [`LoadState`] of one article instance.
pub struct ArticleLoader<F: ?Sized> {
    article_id: i64,
    fallback: String,
    fetcher: Arc<F>,
    state: watch::Sender<LoadState>,
}

impl<F> ArticleLoader<F>
where
    F: ArticleFetcher + ?Sized,
{
    /// Loader starting `Collapsed`; `fallback` is shown if the fetch fails.
    pub fn new(article_id: i64, fallback: impl Into<String>, fetcher: Arc<F>) -> Self {
        let (state, _) = watch::channel(LoadState::Collapsed);
        Self {
            article_id,
            fallback: fallback.into(),
            fetcher,
            state,
        }
    }

    /// Article this loader fetches.
    pub fn article_id(&self) -> i64 {
        self.article_id
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Expands the article.
    ///
    /// Only the caller that moves the state out of `Collapsed` runs the fetch;
    /// everyone else gets the current state back immediately.
    pub async fn request(&self) -> LoadState {
        if !self.state.send_if_modified(LoadState::begin) {
            return self.state();
        }

        tracing::debug!(article_id = self.article_id, "fetching full content");
        let outcome = match self.fetcher.fetch_full_content(self.article_id).await {
            Ok(body) => Ok(body),
            Err(err) => {
                tracing::warn!(
                    article_id = self.article_id,
                    error = %err,
                    "full content fetch failed, showing fallback"
                );
                Err(self.fallback.clone())
            },
        };
        self.state.send_if_modified(|state| state.settle(outcome));
        self.state()
    }

    /// Waits until the state is `Loaded` or `Failed`.
    ///
    /// Returns right away if already settled; never triggers a fetch itself.
    pub async fn settled(&self) -> LoadState {
        let mut receiver = self.subscribe();
        let settled = match receiver.wait_for(LoadState::is_settled).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.state())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FixedFetcher {
        calls: AtomicUsize,
        result: Result<String, FetchError>,
    }

    #[async_trait]
    impl ArticleFetcher for FixedFetcher {
        async fn fetch_full_content(&self, _article_id: i64) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.result.clone()
        }
    }

    fn fetcher(result: Result<String, FetchError>) -> Arc<FixedFetcher> {
        Arc::new(FixedFetcher {
            calls: AtomicUsize::new(0),
            result,
        })
    }

    #[tokio::test]
    async fn starts_collapsed_without_fetching() {
        let source = fetcher(Ok("body".to_string()));
        let loader = ArticleLoader::new(1, "teaser", source.clone());
        assert_eq!(loader.state(), LoadState::Collapsed);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_caches_body() {
        let source = fetcher(Ok("1.\tA".to_string()));
        let loader = ArticleLoader::new(1, "teaser", source.clone());

        let state = loader.request().await;
        assert_eq!(state, LoadState::Loaded {
            body: "1.\tA".to_string()
        });

        loader.request().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_settles_to_fallback() {
        let source = fetcher(Err(FetchError::Transport("refused".to_string())));
        let loader = ArticleLoader::new(4, "the teaser", source.clone());

        let state = loader.request().await;
        assert_eq!(state, LoadState::Failed {
            fallback: "the teaser".to_string()
        });

        // A failed fetch is not retried by the same instance.
        assert_eq!(loader.request().await, state);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_fetch() {
        let source = fetcher(Ok("body".to_string()));
        let loader = ArticleLoader::new(2, "teaser", source.clone());

        let (a, b, c) = tokio::join!(loader.request(), loader.request(), loader.settled());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, LoadState::Loaded {
            body: "body".to_string()
        });
        assert!(b == LoadState::Loading || b == a);
        assert_eq!(c, a);
    }

    struct GatedFetcher {
        gate: tokio::sync::Notify,
    }

    #[async_trait]
    impl ArticleFetcher for GatedFetcher {
        async fn fetch_full_content(&self, _article_id: i64) -> Result<String, FetchError> {
            self.gate.notified().await;
            Ok("gated body".to_string())
        }
    }

    #[tokio::test]
    async fn subscribers_see_loading_before_settling() {
        let source = Arc::new(GatedFetcher {
            gate: tokio::sync::Notify::new(),
        });
        let loader = Arc::new(ArticleLoader::new(3, "teaser", source.clone()));
        let mut receiver = loader.subscribe();

        let task = tokio::spawn({
            let loader = loader.clone();
            async move { loader.request().await }
        });

        receiver.changed().await.expect("sender alive");
        assert_eq!(*receiver.borrow_and_update(), LoadState::Loading);
        assert_eq!(loader.request().await, LoadState::Loading);

        source.gate.notify_one();
        let settled = task.await.expect("request task");
        assert_eq!(settled, LoadState::Loaded {
            body: "gated body".to_string()
        });
        assert_eq!(loader.settled().await, settled);
    }

    #[tokio::test]
    async fn instances_do_not_share_state() {
        let source = fetcher(Ok("body".to_string()));
        let first = ArticleLoader::new(7, "teaser", source.clone());
        let second = ArticleLoader::new(7, "teaser", source.clone());

        first.request().await;
        assert_eq!(second.state(), LoadState::Collapsed);
        second.request().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
