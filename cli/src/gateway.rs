//! Authenticated article management.
//!
//! [`AdminGateway`] wraps the API client with an [`AdminSession`] and turns
//! HTTP failures into [`GatewayError`]s an admin front end can act on.
//! Mutations without a credential fail locally and never reach the network.

use blog_shared::{is_authorized, AdminSession, Article, ArticleDraft};
use thiserror::Error;

use crate::api::{BlogApiClient, FetchError};

/// Failure of an admin operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No credential, or the server rejected it.
    #[error("unauthorized: admin credential missing or rejected")]
    Unauthorized,
    /// Required fields missing or request otherwise invalid.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The target article does not exist.
    #[error("article not found")]
    NotFound,
    /// Any other non-success status.
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a generic one.
        message: String,
    },
    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<FetchError> for GatewayError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Status {
                status: 401,
                ..
            } => GatewayError::Unauthorized,
            FetchError::Status {
                status: 400,
                message,
            } => GatewayError::Validation(message.unwrap_or_else(|| "bad request".to_string())),
            FetchError::Status {
                status: 404,
                ..
            } => GatewayError::NotFound,
            FetchError::Status {
                status,
                message,
            } => GatewayError::Server {
                status,
                message: message.unwrap_or_else(|| "request failed".to_string()),
            },
            FetchError::Transport(message) | FetchError::Malformed(message) => {
                GatewayError::Transport(message)
            },
        }
    }
}

/// Admin operations bound to one session.
#[derive(Debug, Clone)]
pub struct AdminGateway {
    client: BlogApiClient,
    session: AdminSession,
}

impl AdminGateway {
    /// Gateway using `client` with the given session.
    pub fn new(client: BlogApiClient, session: AdminSession) -> Self {
        Self {
            client,
            session,
        }
    }

    /// All articles, newest first. Reading needs no credential.
    pub async fn list(&self) -> Result<Vec<Article>, GatewayError> {
        Ok(self.client.list_articles().await?)
    }

    /// One article by id.
    pub async fn get(&self, id: i64) -> Result<Article, GatewayError> {
        Ok(self.client.get_article(id).await?)
    }

    /// Creates an article from `draft`; any `id` on the draft is dropped.
    pub async fn create(&self, draft: ArticleDraft) -> Result<Article, GatewayError> {
        let credential = self.credential()?;
        let draft = checked(ArticleDraft {
            id: None,
            ..draft
        })?;
        let article = self.client.create_article(&draft, credential).await?;
        tracing::info!(id = article.id, title = %article.title, "article created");
        Ok(article)
    }

    /// Replaces the mutable fields of article `id`.
    pub async fn update(&self, id: i64, draft: ArticleDraft) -> Result<Article, GatewayError> {
        let credential = self.credential()?;
        let draft = checked(ArticleDraft {
            id: Some(id),
            ..draft
        })?;
        let article = self.client.update_article(&draft, credential).await?;
        tracing::info!(id = article.id, "article updated");
        Ok(article)
    }

    /// Deletes article `id`.
    pub async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        let credential = self.credential()?;
        let response = self.client.delete_article(id, credential).await?;
        tracing::info!(id = response.id, "article deleted");
        Ok(())
    }

    fn credential(&self) -> Result<&str, GatewayError> {
        match self.session.credential() {
            Some(credential) if is_authorized(&self.session) => Ok(credential),
            _ => {
                tracing::warn!("admin operation refused: no credential in session");
                Err(GatewayError::Unauthorized)
            },
        }
    }
}

/// Runs the shared field validation before sending, keeping the draft shape.
fn checked(draft: ArticleDraft) -> Result<ArticleDraft, GatewayError> {
    let id = draft.id;
    let fields = draft
        .validate()
        .map_err(|err| GatewayError::Validation(err.to_string()))?;
    Ok(ArticleDraft {
        id,
        ..ArticleDraft::from(fields)
    })
}
