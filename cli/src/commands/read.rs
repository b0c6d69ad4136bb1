//! `list`, `read` and `render`.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use blog_shared::{
    parse,
    render::{escape_html, render_html},
    ArticlePresenter, ArticleSummary, LoadState, Presentation,
};
use futures::future::join_all;
use serde::Serialize;
use tokio::io::AsyncReadExt;

use super::print_json;
use crate::{api::BlogApiClient, card::ArticleCard, cli::OutputFormat, render::render_text};

#[derive(Debug, Serialize)]
struct ArticleView<'a> {
    #[serde(flatten)]
    summary: &'a ArticleSummary,
    expanded: bool,
    presentation: Presentation,
}

/// Lists articles; with `expand`, every card loads its body concurrently.
pub async fn list(client: BlogApiClient, expand: bool, format: OutputFormat) -> Result<()> {
    let articles = client
        .list_articles()
        .await
        .context("failed to list articles")?;
    tracing::info!(count = articles.len(), "fetched article list");

    let fetcher = Arc::new(client);
    let mut cards: Vec<ArticleCard<BlogApiClient>> = articles
        .into_iter()
        .map(|article| ArticleCard::new(ArticleSummary::from(article), fetcher.clone()))
        .collect();

    if expand {
        join_all(cards.iter_mut().map(|card| card.expand())).await;
    }

    let presenter = ArticlePresenter::default();
    let views: Vec<ArticleView<'_>> = cards
        .iter()
        .map(|card| ArticleView {
            summary: card.summary(),
            expanded: card.is_expanded(),
            presentation: card.presentation(&presenter),
        })
        .collect();
    print_views(&views, format)
}

/// Shows one article, teaser or full body.
pub async fn read(client: &BlogApiClient, id: i64, expand: bool, format: OutputFormat) -> Result<()> {
    let article = client
        .get_article(id)
        .await
        .with_context(|| format!("failed to fetch article {id}"))?;

    let state = if expand {
        LoadState::Loaded {
            body: article.full_content.clone(),
        }
    } else {
        LoadState::Collapsed
    };
    let summary = ArticleSummary::from(article);
    let presentation = ArticlePresenter::default().present(&summary, &state);
    print_views(
        &[ArticleView {
            summary: &summary,
            expanded: expand,
            presentation,
        }],
        format,
    )
}

/// Parses local text and prints the blocks.
pub async fn render(file: Option<&Path>, format: OutputFormat) -> Result<()> {
    let text = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("failed to read stdin")?;
            buffer
        },
    };

    let blocks = parse(&text);
    match format {
        OutputFormat::Text => println!("{}", render_text(&blocks)),
        OutputFormat::Html => print!("{}", render_html(&blocks)),
        OutputFormat::Json => print_json(&blocks)?,
    }
    Ok(())
}

fn print_views(views: &[ArticleView<'_>], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&views)?,
        OutputFormat::Text => {
            if views.is_empty() {
                println!("No articles.");
            }
            for view in views {
                println!("{}", text_view(view));
            }
        },
        OutputFormat::Html => {
            for view in views {
                print!("{}", html_view(view));
            }
        },
    }
    Ok(())
}

fn text_view(view: &ArticleView<'_>) -> String {
    let summary = view.summary;
    let mut out = format!(
        "[{}] {}\n{} | {}\n",
        summary.id,
        summary.title,
        summary.category,
        summary.created_at.format("%Y-%m-%d")
    );
    if view.presentation.loading {
        out.push_str("Loading...\n");
    }
    if !view.presentation.blocks.is_empty() {
        out.push_str(&render_text(&view.presentation.blocks));
        out.push('\n');
    }
    out
}

fn html_view(view: &ArticleView<'_>) -> String {
    let summary = view.summary;
    let mut out = String::from("<article class=\"article-card\">\n");
    out.push_str(&format!("<h2>{}</h2>\n", escape_html(&summary.title)));
    out.push_str(&format!(
        "<p class=\"article-meta\">{} · {}</p>\n",
        escape_html(&summary.category),
        summary.created_at.format("%Y-%m-%d")
    ));
    if let Some(url) = &summary.image_url {
        out.push_str(&format!(
            "<img class=\"article-image\" src=\"{}\" alt=\"{}\">\n",
            escape_html(url),
            escape_html(&summary.title)
        ));
    }
    if view.presentation.loading {
        out.push_str("<div class=\"content-loading\">Loading...</div>\n");
    }
    out.push_str(&render_html(&view.presentation.blocks));
    out.push_str("</article>\n");
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn summary() -> ArticleSummary {
        ArticleSummary {
            id: 2,
            title: "Dock <doors>".to_string(),
            category: "Inbound".to_string(),
            short_description: "Teaser".to_string(),
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).single().expect("valid date"),
        }
    }

    #[test]
    fn text_view_shows_header_and_blocks() {
        let summary = summary();
        let view = ArticleView {
            summary: &summary,
            expanded: false,
            presentation: ArticlePresenter::default().present(&summary, &LoadState::Collapsed),
        };
        assert_eq!(text_view(&view), "[2] Dock <doors>\nInbound | 2024-03-09\nTeaser\n");
    }

    #[test]
    fn html_view_escapes_title() {
        let summary = summary();
        let view = ArticleView {
            summary: &summary,
            expanded: true,
            presentation: Presentation {
                blocks: Vec::new(),
                loading: true,
            },
        };
        let html = html_view(&view);
        assert!(html.contains("<h2>Dock &lt;doors&gt;</h2>"));
        assert!(html.contains("content-loading"));
    }
}
