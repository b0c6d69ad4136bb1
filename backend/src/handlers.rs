//! Route handlers. Mutating handlers authorize before any storage access.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use blog_shared::{Article, ArticleDraft};
use serde::{Deserialize, Serialize};

use crate::{email::ContactRequest, error::ApiError, state::AppState};

/// `?id=` on the article endpoints, parsed by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleIdQuery {
    /// Raw id value, if present.
    #[serde(default)]
    pub id: Option<String>,
}

/// Body of a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `true`.
    pub success: bool,
    /// Id of the deleted article.
    pub id: i64,
}

/// Body of a delivered contact request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when storage answers.
    pub status: String,
    /// Number of stored articles.
    pub articles: usize,
}

/// `GET /api/articles`: the full list, or a single article when `?id=` is
/// present.
pub async fn list_or_get_articles(
    State(state): State<AppState>,
    query: Result<Query<ArticleIdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    match query.id {
        Some(raw) => {
            let id = parse_article_id(&raw)?;
            let article = state.with_repository(move |repo| repo.get(id)).await?;
            Ok(Json(article).into_response())
        },
        None => {
            let articles = state.with_repository(|repo| repo.list()).await?;
            tracing::debug!(count = articles.len(), "listed articles");
            Ok(Json(articles).into_response())
        },
    }
}

/// `GET /api/articles/:id`.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let id = parse_article_id(&id)?;
    let article = state.with_repository(move |repo| repo.get(id)).await?;
    Ok(Json(article))
}

/// `POST /api/articles`: 201 with the stored article.
pub async fn create_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ArticleDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    state.authorize(&headers)?;
    let Json(draft) = payload?;

    let article = state.with_repository(move |repo| repo.create(draft)).await?;
    tracing::info!(article_id = article.id, title = %article.title, "article created");
    Ok((StatusCode::CREATED, Json(article)))
}

/// `PUT /api/articles`: the body's `id` selects the article.
pub async fn update_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ArticleDraft>, JsonRejection>,
) -> Result<Json<Article>, ApiError> {
    state.authorize(&headers)?;
    let Json(draft) = payload?;
    let id = draft.id.ok_or_else(article_id_required)?;

    let article = state
        .with_repository(move |repo| repo.update(id, draft))
        .await?;
    tracing::info!(article_id = article.id, "article updated");
    Ok(Json(article))
}

/// `DELETE /api/articles?id=N`.
pub async fn delete_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ArticleIdQuery>, QueryRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.authorize(&headers)?;
    let Query(query) = query?;
    let raw = query.id.ok_or_else(article_id_required)?;
    let id = parse_article_id(&raw)?;

    state.with_repository(move |repo| repo.delete(id)).await?;
    tracing::info!(article_id = id, "article deleted");
    Ok(Json(DeleteResponse {
        success: true,
        id,
    }))
}

/// `POST /api/contact`: forwards a contact form submission by email.
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let Json(request) = payload?;
    let contact = request
        .validate()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    let mailer = state
        .contact_mailer()
        .ok_or_else(|| ApiError::ServiceUnavailable("Email service not configured".to_string()))?;

    mailer
        .notify_owner(&contact)
        .await
        .map_err(|e| ApiError::internal("Failed to send email", format!("{e:#}")))?;

    // The owner already has the request; a failed confirmation is not fatal.
    if let Err(err) = mailer.confirm_requester(&contact).await {
        tracing::warn!("failed to send contact confirmation to {}: {:#}", contact.email, err);
    }

    tracing::info!(requester = %contact.email, "contact request delivered");
    Ok(Json(ContactResponse {
        success: true,
        message: "Email sent successfully".to_string(),
    }))
}

/// `GET /api/health`.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let articles = state.with_repository(|repo| repo.count()).await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        articles,
    }))
}

/// Router fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn parse_article_id(raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest(format!("Invalid article id: {raw}"))),
    }
}

fn article_id_required() -> ApiError {
    ApiError::BadRequest("Article ID required".to_string())
}
