//! Per-article load state.
//!
//! One value exists per displayed article. It only ever moves forward:
//! `Collapsed -> Loading -> Loaded | Failed`. Once settled it is the cached
//! body for the rest of the instance's life.

use serde::{Deserialize, Serialize};

/// Where a displayed article is in its fetch-once lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    /// Not yet expanded; only the teaser is known.
    #[default]
    Collapsed,
    /// Full content requested, fetch in flight.
    Loading,
    /// Full content fetched and cached.
    Loaded {
        /// Raw article body.
        body: String,
    },
    /// Fetch failed; render what the card already had.
    Failed {
        /// Content known before the fetch, usually the teaser.
        fallback: String,
    },
}

impl LoadState {
    /// Claims the single fetch for this instance.
    ///
    /// Returns `true` only on the `Collapsed -> Loading` transition; every
    /// other state is left untouched and returns `false`.
    pub fn begin(&mut self) -> bool {
        if matches!(self, LoadState::Collapsed) {
            *self = LoadState::Loading;
            true
        } else {
            false
        }
    }

    /// Settles an in-flight fetch. Ignored unless the state is `Loading`.
    pub fn settle(&mut self, outcome: Result<String, String>) -> bool {
        if !matches!(self, LoadState::Loading) {
            return false;
        }
        *self = match outcome {
            Ok(body) => LoadState::Loaded {
                body,
            },
            Err(fallback) => LoadState::Failed {
                fallback,
            },
        };
        true
    }

    /// Fetch in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// `Loaded` or `Failed`: no further transitions can happen.
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded { .. } | LoadState::Failed { .. })
    }

    /// Text to render once settled.
    pub fn body(&self) -> Option<&str> {
        match self {
            LoadState::Loaded {
                body,
            } => Some(body),
            LoadState::Failed {
                fallback,
            } => Some(fallback),
            LoadState::Collapsed | LoadState::Loading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_claims_only_once() {
        let mut state = LoadState::default();
        assert!(state.begin());
        assert_eq!(state, LoadState::Loading);
        assert!(!state.begin());
        assert_eq!(state, LoadState::Loading);
    }

    #[test]
    fn settle_requires_loading() {
        let mut state = LoadState::Collapsed;
        assert!(!state.settle(Ok("body".to_string())));
        assert_eq!(state, LoadState::Collapsed);
    }

    #[test]
    fn loaded_never_regresses() {
        let mut state = LoadState::Collapsed;
        state.begin();
        assert!(state.settle(Ok("full".to_string())));
        assert!(!state.begin());
        assert!(!state.settle(Err("teaser".to_string())));
        assert_eq!(state, LoadState::Loaded {
            body: "full".to_string(),
        });
        assert!(state.is_settled());
    }

    #[test]
    fn failure_keeps_fallback() {
        let mut state = LoadState::Collapsed;
        state.begin();
        state.settle(Err("teaser".to_string()));
        assert_eq!(state.body(), Some("teaser"));
        assert!(!state.is_loading());
    }
}
