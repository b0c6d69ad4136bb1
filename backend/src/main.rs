//! Blog backend server binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use blog_backend::{
    config::AppConfig,
    email::SmtpContactMailer,
    repository::{ArticleRepository, SqliteArticleRepository},
    routes, state,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Default to info-level logs; override via RUST_LOG if needed.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env()?;

    tracing::info!("Starting blog backend server");
    tracing::info!("Database path: {}", config.database_path.display());

    let repository = SqliteArticleRepository::open(&config.database_path).with_context(|| {
        format!("failed to open article database at {}", config.database_path.display())
    })?;
    tracing::info!("Loaded {} articles", repository.count()?);

    let mut app_state = state::AppState::new(Arc::new(repository), config.admin_secret.as_str());
    if let Some(path) = config.email_accounts_file.as_deref() {
        if let Some(mailer) = SmtpContactMailer::from_file(path)? {
            app_state = app_state.with_contact_mailer(Arc::new(mailer));
        }
    } else {
        tracing::warn!("contact mailer disabled: EMAIL_ACCOUNTS_FILE not set");
    }

    let app = routes::create_router(app_state);

    let addr = config.listen_addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
