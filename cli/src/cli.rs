//! Command-line surface of `blog-cli`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::DEFAULT_API_BASE;

/// How article content is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one line per content block.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// HTML fragments.
    Html,
}

/// Top-level arguments.
#[derive(Parser)]
#[command(name = "blog-cli", version, about = "Blog API client")]
pub struct Cli {
    /// Base URL of the blog API.
    #[arg(long, global = true, env = "BLOG_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Admin shared secret for create, update and delete.
    #[arg(long, global = true, env = "BLOG_ADMIN_SECRET", hide_env_values = true)]
    pub admin_secret: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// List articles, newest first.
    List {
        /// Fetch and show every article's full content.
        #[arg(long)]
        expand: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show one article.
    Read {
        /// Article id.
        id: i64,
        /// Fetch and show the full content instead of the teaser.
        #[arg(long)]
        expand: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Create an article.
    Create {
        /// Article fields.
        #[command(flatten)]
        fields: ArticleArgs,
    },
    /// Replace an article's fields. Omitted flags keep the stored value.
    Update {
        /// Article id.
        id: i64,
        /// Fields to change.
        #[command(flatten)]
        fields: ArticleArgs,
    },
    /// Delete an article.
    Delete {
        /// Article id.
        id: i64,
    },
    /// Parse article text from a file or stdin and render it.
    Render {
        /// Input file; reads stdin when omitted.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Send a message through the site's contact form.
    Contact {
        /// Your name.
        #[arg(long)]
        name: String,
        /// Your email address.
        #[arg(long)]
        email: String,
        /// Message body.
        #[arg(long)]
        message: String,
    },
}

/// Article fields accepted by `create` and `update`.
#[derive(Debug, Clone, Default, Args)]
pub struct ArticleArgs {
    /// Headline.
    #[arg(long)]
    pub title: Option<String>,
    /// Category label.
    #[arg(long)]
    pub category: Option<String>,
    /// Teaser shown before the article is expanded.
    #[arg(long)]
    pub short_description: Option<String>,
    /// Full article body.
    #[arg(long, conflicts_with = "full_content_file")]
    pub full_content: Option<String>,
    /// Read the full article body from a file.
    #[arg(long)]
    pub full_content_file: Option<PathBuf>,
    /// Cover image URL; pass an empty string to clear it.
    #[arg(long)]
    pub image_url: Option<String>,
}
