//! Domain types and pure logic shared by the blog backend and client.
//!
//! Nothing in this crate performs I/O: the article model, the line-oriented
//! content parser, block rendering, the per-article load state machine and the
//! presenter that ties them together all live here so both sides of the wire
//! agree on them.

pub mod content;
pub mod load_state;
pub mod presenter;
pub mod render;
pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use content::{parse, ContentBlock, Segment};
pub use load_state::LoadState;
pub use presenter::{present, ArticlePresenter, Presentation, TeaserPlacement};
pub use session::{credential_matches, is_authorized, AdminSession, ADMIN_AUTH_HEADER};

// 完整文章数据模型
/// A stored article as returned by the read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Repository-assigned identifier, stable for the article's lifetime.
    pub id: i64,
    /// Headline shown on cards and the detail view.
    pub title: String,
    /// Free-form category label.
    pub category: String,
    /// Teaser shown before the article is expanded.
    pub short_description: String,
    /// Raw multi-line body, parsed into content blocks for display.
    pub full_content: String,
    /// Optional cover image; never an empty string.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Creation time, assigned by the repository.
    pub created_at: DateTime<Utc>,
    /// Last modification time, assigned by the repository.
    pub updated_at: DateTime<Utc>,
}

// 列表项（精简版）
/// List-view projection of an [`Article`]: everything except the full body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Article identifier.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// Category label.
    pub category: String,
    /// Teaser text.
    pub short_description: String,
    /// Optional cover image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Article> for ArticleSummary {
    fn from(a: Article) -> Self {
        ArticleSummary {
            id: a.id,
            title: a.title,
            category: a.category,
            short_description: a.short_description,
            image_url: a.image_url,
            created_at: a.created_at,
        }
    }
}

/// Wire shape of a create or update request body.
///
/// Every field is optional so a missing field surfaces as a
/// [`ValidationError`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleDraft {
    /// Target article for updates; ignored on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Headline.
    #[serde(default)]
    pub title: Option<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Teaser text.
    #[serde(default)]
    pub short_description: Option<String>,
    /// Raw body text.
    #[serde(default)]
    pub full_content: Option<String>,
    /// Optional cover image; blank means absent.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Validated mutable fields of an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFields {
    /// Headline.
    pub title: String,
    /// Category label.
    pub category: String,
    /// Teaser text.
    pub short_description: String,
    /// Raw body text.
    pub full_content: String,
    /// Cover image, `None` when absent or blank.
    pub image_url: Option<String>,
}

/// A required article field was absent, `null` or blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{field}` is required")]
pub struct ValidationError {
    /// Wire name of the offending field.
    pub field: &'static str,
}

impl ArticleDraft {
    /// Checks required fields in declaration order and returns the first one
    /// that is missing.
    pub fn validate(self) -> Result<ArticleFields, ValidationError> {
        Ok(ArticleFields {
            title: require(self.title, "title")?,
            category: require(self.category, "category")?,
            short_description: require(self.short_description, "short_description")?,
            full_content: require(self.full_content, "full_content")?,
            image_url: normalize_image_url(self.image_url),
        })
    }
}

impl From<ArticleFields> for ArticleDraft {
    fn from(fields: ArticleFields) -> Self {
        ArticleDraft {
            id: None,
            title: Some(fields.title),
            category: Some(fields.category),
            short_description: Some(fields.short_description),
            full_content: Some(fields.full_content),
            image_url: fields.image_url,
        }
    }
}

/// Treats a blank image URL as absent.
pub fn normalize_image_url(value: Option<String>) -> Option<String> {
    value
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

fn require(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError {
            field,
        }),
    }
}
