//! Turns an article plus its load state into blocks ready to render.

use serde::Serialize;

use crate::{
    content::{parse, ContentBlock},
    load_state::LoadState,
    ArticleSummary,
};

/// What the UI should draw for one article card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Presentation {
    /// Blocks in display order.
    pub blocks: Vec<ContentBlock>,
    /// Show a loading placeholder instead of (or next to) the blocks.
    pub loading: bool,
}

/// How a collapsed card shows its teaser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeaserPlacement {
    /// Teaser is parsed and returned as the collapsed card's blocks.
    #[default]
    Inline,
    /// The caller draws the teaser itself; collapsed cards get no blocks.
    Separate,
}

/// Presenter configured with a teaser placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticlePresenter {
    teaser: TeaserPlacement,
}

impl ArticlePresenter {
    /// Creates a presenter with the given teaser placement.
    pub fn new(teaser: TeaserPlacement) -> Self {
        Self {
            teaser,
        }
    }

    /// Builds the blocks for `article` in `state`.
    ///
    /// The full body is never parsed while collapsed.
    pub fn present(&self, article: &ArticleSummary, state: &LoadState) -> Presentation {
        match state {
            LoadState::Collapsed => match self.teaser {
                TeaserPlacement::Inline => Presentation {
                    blocks: parse(&article.short_description),
                    loading: false,
                },
                TeaserPlacement::Separate => Presentation::default(),
            },
            LoadState::Loading => Presentation {
                blocks: Vec::new(),
                loading: true,
            },
            LoadState::Loaded {
                body,
            } => Presentation {
                blocks: parse(body),
                loading: false,
            },
            LoadState::Failed {
                fallback,
            } => Presentation {
                blocks: parse(fallback),
                loading: false,
            },
        }
    }
}

/// [`ArticlePresenter::present`] with the inline teaser placement.
pub fn present(article: &ArticleSummary, state: &LoadState) -> Presentation {
    ArticlePresenter::default().present(article, state)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn summary() -> ArticleSummary {
        ArticleSummary {
            id: 1,
            title: "Slotting".to_string(),
            category: "Warehouse".to_string(),
            short_description: "Short teaser".to_string(),
            image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn collapsed_shows_teaser_inline() {
        let presentation = present(&summary(), &LoadState::Collapsed);
        assert_eq!(presentation.blocks, vec![ContentBlock::Paragraph {
            text: "Short teaser".to_string(),
        }]);
        assert!(!presentation.loading);
    }

    #[test]
    fn collapsed_with_separate_teaser_is_empty() {
        let presenter = ArticlePresenter::new(TeaserPlacement::Separate);
        assert_eq!(presenter.present(&summary(), &LoadState::Collapsed), Presentation::default());
    }

    #[test]
    fn loading_has_no_blocks_and_flag_set() {
        let presentation = present(&summary(), &LoadState::Loading);
        assert!(presentation.blocks.is_empty());
        assert!(presentation.loading);
    }

    #[test]
    fn loaded_parses_body() {
        let state = LoadState::Loaded {
            body: "1.\tOne\n\n•\tTwo".to_string(),
        };
        let presentation = present(&summary(), &state);
        assert_eq!(presentation.blocks.len(), 3);
        assert_eq!(presentation.blocks[1], ContentBlock::Blank);
    }

    #[test]
    fn failed_parses_fallback() {
        let state = LoadState::Failed {
            fallback: "Short teaser".to_string(),
        };
        let presentation = present(&summary(), &state);
        assert_eq!(presentation.blocks, parse("Short teaser"));
        assert!(!presentation.loading);
    }
}
