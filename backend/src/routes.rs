//! Router assembly.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, request_context::request_context_middleware, state::AppState};

/// Builds the API router with CORS, tracing and request ids.
pub fn create_router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Define routes
    Router::new()
        .route(
            "/api/articles",
            get(handlers::list_or_get_articles)
                .post(handlers::create_article)
                .put(handlers::update_article)
                .delete(handlers::delete_article)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/articles/:id",
            get(handlers::get_article).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/contact",
            post(handlers::submit_contact).fallback(handlers::method_not_allowed),
        )
        .route("/api/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn(request_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
