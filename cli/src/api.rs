//! HTTP client for the blog API.

use blog_shared::{Article, ArticleDraft, ADMIN_AUTH_HEADER};
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Default API base when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";

/// Why a request to the API did not produce the expected payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, DNS or timeout failure.
    #[error("network error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("HTTP error {status}: {}", message.as_deref().unwrap_or("no details"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `error` field of the JSON error body, when present.
        message: Option<String>,
    },
    /// The body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Response of `DELETE /articles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Deleted article id.
    pub id: i64,
}

/// Contact form submission.
#[derive(Debug, Clone, Serialize)]
pub struct ContactForm {
    /// Requester name.
    pub name: String,
    /// Requester email.
    pub email: String,
    /// Free-form message.
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ContactResponse {
    message: String,
}

/// Thin typed wrapper over the article endpoints.
#[derive(Debug, Clone)]
pub struct BlogApiClient {
    http: reqwest::Client,
    base: String,
}

impl BlogApiClient {
    /// Client for the API rooted at `base`, e.g. `http://localhost:3000/api`.
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base)
    }

    /// Client reusing an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            http,
            base,
        }
    }

    /// API base URL without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `GET /articles`, newest first.
    pub async fn list_articles(&self) -> Result<Vec<Article>, FetchError> {
        let request = self.request(Method::GET, "/articles", None);
        decode(send(request).await?).await
    }

    /// `GET /articles?id=<id>`.
    pub async fn get_article(&self, id: i64) -> Result<Article, FetchError> {
        let request = self
            .request(Method::GET, "/articles", None)
            .query(&[("id", id)]);
        decode(send(request).await?).await
    }

    /// `POST /articles`.
    pub async fn create_article(
        &self,
        draft: &ArticleDraft,
        credential: &str,
    ) -> Result<Article, FetchError> {
        let request = self
            .request(Method::POST, "/articles", Some(credential))
            .json(draft);
        decode(send(request).await?).await
    }

    /// `PUT /articles`; `draft.id` selects the article.
    pub async fn update_article(
        &self,
        draft: &ArticleDraft,
        credential: &str,
    ) -> Result<Article, FetchError> {
        let request = self
            .request(Method::PUT, "/articles", Some(credential))
            .json(draft);
        decode(send(request).await?).await
    }

    /// `DELETE /articles?id=<id>`.
    pub async fn delete_article(
        &self,
        id: i64,
        credential: &str,
    ) -> Result<DeleteResponse, FetchError> {
        let request = self
            .request(Method::DELETE, "/articles", Some(credential))
            .query(&[("id", id)]);
        decode(send(request).await?).await
    }

    /// `POST /contact`; returns the server's confirmation message.
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<String, FetchError> {
        let request = self.request(Method::POST, "/contact", None).json(form);
        let response: ContactResponse = decode(send(request).await?).await?;
        Ok(response.message)
    }

    fn request(&self, method: Method, path: &str, credential: Option<&str>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base, path))
            .header("Cache-Control", "no-cache, no-store, max-age=0");
        match credential {
            Some(value) => builder.header(ADMIN_AUTH_HEADER, value),
            None => builder,
        }
    }
}

async fn send(request: RequestBuilder) -> Result<Response, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok())
        .map(|body| body.error);
    Err(FetchError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| FetchError::Malformed(e.to_string()))
}
