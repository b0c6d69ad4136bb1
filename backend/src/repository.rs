//! Durable article storage.
//!
//! The HTTP layer talks to [`ArticleRepository`]; the production
//! implementation is a single SQLite connection guarded by a mutex.

use std::path::Path;

use blog_shared::{Article, ArticleDraft, ArticleFields, ValidationError};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

const ARTICLE_COLUMNS: &str =
    "id, title, category, short_description, full_content, image_url, created_at, updated_at";

/// Storage failure or rejected input.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No article with this id.
    #[error("article {0} not found")]
    NotFound(i64),
    /// A required field was missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// SQLite reported an error.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    /// The database directory could not be created.
    #[error("failed to prepare database directory {path}: {source}")]
    Io {
        /// Directory that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Result of repository calls.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Article store used by the API handlers.
///
/// Calls are synchronous; the server runs them on the blocking pool.
pub trait ArticleRepository: Send + Sync {
    /// All articles, newest first.
    fn list(&self) -> RepositoryResult<Vec<Article>>;

    /// One article; `NotFound` if unknown.
    fn get(&self, id: i64) -> RepositoryResult<Article>;

    /// Validates `draft` and inserts it with fresh id and timestamps.
    fn create(&self, draft: ArticleDraft) -> RepositoryResult<Article>;

    /// Replaces every mutable field of article `id`.
    fn update(&self, id: i64, draft: ArticleDraft) -> RepositoryResult<Article>;

    /// Removes article `id`; `NotFound` if it is already gone.
    fn delete(&self, id: i64) -> RepositoryResult<()>;

    /// Number of stored articles.
    fn count(&self) -> RepositoryResult<usize>;
}

/// [`ArticleRepository`] over one SQLite connection.
pub struct SqliteArticleRepository {
    conn: Mutex<Connection>,
}

impl SqliteArticleRepository {
    /// Opens (or creates) the database file and its schema.
    pub fn open(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RepositoryError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Private in-memory database, used by tests.
    pub fn in_memory() -> RepositoryResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> RepositoryResult<Self> {
        create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ArticleRepository for SqliteArticleRepository {
    fn list(&self) -> RepositoryResult<Vec<Article>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM blog_articles ORDER BY created_at DESC, id DESC"
        ))?;
        let articles = stmt
            .query_map([], row_to_article)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(articles)
    }

    fn get(&self, id: i64) -> RepositoryResult<Article> {
        let conn = self.conn.lock();
        fetch_article(&conn, id)
    }

    fn create(&self, draft: ArticleDraft) -> RepositoryResult<Article> {
        let fields = draft.validate()?;
        let now = now_ms();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO blog_articles \
             (title, category, short_description, full_content, image_url, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                fields.title,
                fields.category,
                fields.short_description,
                fields.full_content,
                fields.image_url,
                now
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(article_id = id, "article inserted");
        fetch_article(&conn, id)
    }

    fn update(&self, id: i64, draft: ArticleDraft) -> RepositoryResult<Article> {
        let ArticleFields {
            title,
            category,
            short_description,
            full_content,
            image_url,
        } = draft.validate()?;
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE blog_articles SET title = ?1, category = ?2, short_description = ?3, \
             full_content = ?4, image_url = ?5, updated_at = MAX(created_at, ?6) WHERE id = ?7",
            params![title, category, short_description, full_content, image_url, now_ms(), id],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        fetch_article(&conn, id)
    }

    fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM blog_articles WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }

    fn count(&self) -> RepositoryResult<usize> {
        let conn = self.conn.lock();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM blog_articles", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    // AUTOINCREMENT keeps ids of deleted articles from being reused.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS blog_articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            short_description TEXT NOT NULL,
            full_content TEXT NOT NULL,
            image_url TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_blog_articles_created_at
            ON blog_articles (created_at DESC, id DESC);
        "#,
    )
}

fn fetch_article(conn: &Connection, id: i64) -> RepositoryResult<Article> {
    conn.query_row(
        &format!("SELECT {ARTICLE_COLUMNS} FROM blog_articles WHERE id = ?1"),
        params![id],
        row_to_article,
    )
    .optional()?
    .ok_or(RepositoryError::NotFound(id))
}

fn row_to_article(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        short_description: row.get(3)?,
        full_content: row.get(4)?,
        image_url: row.get(5)?,
        created_at: timestamp(row, 6)?,
        updated_at: timestamp(row, 7)?,
    })
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let ms: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
