//! Shared handler state.

use std::sync::Arc;

use axum::http::HeaderMap;
use blog_shared::{credential_matches, ADMIN_AUTH_HEADER};

use crate::{
    email::ContactMailer,
    error::ApiError,
    repository::{ArticleRepository, RepositoryResult},
};

/// Cloned into every handler by axum.
#[derive(Clone)]
pub struct AppState {
    repository: Arc<dyn ArticleRepository>,
    /// Shared secret for mutating requests
    admin_secret: Arc<str>,
    /// Contact form delivery, absent when no mailbox is configured
    contact_mailer: Option<Arc<dyn ContactMailer>>,
}

impl AppState {
    /// State with the contact form disabled.
    pub fn new(repository: Arc<dyn ArticleRepository>, admin_secret: impl Into<Arc<str>>) -> Self {
        Self {
            repository,
            admin_secret: admin_secret.into(),
            contact_mailer: None,
        }
    }

    /// Enables the contact form.
    pub fn with_contact_mailer(mut self, mailer: Arc<dyn ContactMailer>) -> Self {
        self.contact_mailer = Some(mailer);
        self
    }

    /// Runs `op` against the repository on the blocking thread pool.
    ///
    /// SQLite calls and the connection lock never run on an async worker.
    pub async fn with_repository<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn ArticleRepository) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        let outcome = tokio::task::spawn_blocking(move || op(repository.as_ref()))
            .await
            .map_err(|err| ApiError::internal("Article storage task failed", err))?;
        Ok(outcome?)
    }

    /// Mailer for the contact form, if configured.
    pub fn contact_mailer(&self) -> Option<&dyn ContactMailer> {
        self.contact_mailer.as_deref()
    }

    /// Rejects requests whose admin header does not match the shared secret.
    /// Handlers call this before touching the repository.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let provided = headers
            .get(ADMIN_AUTH_HEADER)
            .and_then(|value| value.to_str().ok());
        if credential_matches(&self.admin_secret, provided) {
            Ok(())
        } else {
            tracing::warn!(header_present = provided.is_some(), "rejected admin request");
            Err(ApiError::Unauthorized)
        }
    }
}
