//! `create`, `update` and `delete`.

use anyhow::{Context, Result};
use blog_shared::{Article, ArticleDraft};

use super::print_json;
use crate::{cli::ArticleArgs, gateway::AdminGateway};

/// Creates an article and prints it as JSON.
pub async fn create(gateway: &AdminGateway, args: ArticleArgs) -> Result<()> {
    let draft = draft_from_args(args).await?;
    let article = gateway.create(draft).await.context("failed to create article")?;
    print_json(&article)
}

/// Merges the given flags over the stored article and saves it.
pub async fn update(gateway: &AdminGateway, id: i64, args: ArticleArgs) -> Result<()> {
    let changes = draft_from_args(args).await?;
    let current = gateway
        .get(id)
        .await
        .with_context(|| format!("failed to load article {id}"))?;
    let draft = merge(current, changes);
    let article = gateway
        .update(id, draft)
        .await
        .with_context(|| format!("failed to update article {id}"))?;
    print_json(&article)
}

/// Deletes an article.
pub async fn delete(gateway: &AdminGateway, id: i64) -> Result<()> {
    gateway
        .delete(id)
        .await
        .with_context(|| format!("failed to delete article {id}"))?;
    println!("Deleted article {id}");
    Ok(())
}

async fn draft_from_args(args: ArticleArgs) -> Result<ArticleDraft> {
    let full_content = match args.full_content_file {
        Some(path) => Some(
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => args.full_content,
    };
    Ok(ArticleDraft {
        id: None,
        title: args.title,
        category: args.category,
        short_description: args.short_description,
        full_content,
        image_url: args.image_url,
    })
}

/// Fills fields the caller left out with the stored values.
fn merge(current: Article, changes: ArticleDraft) -> ArticleDraft {
    ArticleDraft {
        id: Some(current.id),
        title: changes.title.or(Some(current.title)),
        category: changes.category.or(Some(current.category)),
        short_description: changes.short_description.or(Some(current.short_description)),
        full_content: changes.full_content.or(Some(current.full_content)),
        image_url: changes.image_url.or(current.image_url),
    }
}
