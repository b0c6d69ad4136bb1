//! One article card in a list: teaser until expanded, then the full body.

use std::sync::Arc;

use blog_shared::{ArticlePresenter, ArticleSummary, LoadState, Presentation};

use crate::loader::{ArticleFetcher, ArticleLoader};

/// A displayed article instance and its expand/collapse toggle.
///
/// Collapsing only hides the body; a fetch already in flight still settles
/// and the next expand reuses the cached result.
pub struct ArticleCard<F: ?Sized> {
    summary: ArticleSummary,
    loader: ArticleLoader<F>,
    expanded: bool,
}

impl<F> ArticleCard<F>
where
    F: ArticleFetcher + ?Sized,
{
    /// Collapsed card; the teaser doubles as the fallback body.
    pub fn new(summary: ArticleSummary, fetcher: Arc<F>) -> Self {
        let loader = ArticleLoader::new(summary.id, summary.short_description.clone(), fetcher);
        Self {
            summary,
            loader,
            expanded: false,
        }
    }

    /// Article shown on this card.
    pub fn summary(&self) -> &ArticleSummary {
        &self.summary
    }

    /// Whether the body is shown.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Current fetch state, independent of the toggle.
    pub fn load_state(&self) -> LoadState {
        self.loader.state()
    }

    /// Shows the full body, fetching it the first time.
    pub async fn expand(&mut self) -> LoadState {
        self.expanded = true;
        self.loader.request().await
    }

    /// Hides the body and keeps whatever was loaded.
    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    /// Blocks to draw right now.
    pub fn presentation(&self, presenter: &ArticlePresenter) -> Presentation {
        if self.expanded {
            presenter.present(&self.summary, &self.loader.state())
        } else {
            presenter.present(&self.summary, &LoadState::Collapsed)
        }
    }
}
