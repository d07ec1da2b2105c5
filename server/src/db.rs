use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::config::Database;

const SITE_DB_FILENAME: &str = "site.db";

/// Initialize the site database, running migrations as needed.
///
/// Returns the pool together with the resolved database directory.
pub async fn init_pool(database: &Database) -> Result<(SqlitePool, PathBuf)> {
    let db_root_path = normalize_path(database.root())?;
    std::fs::create_dir_all(&db_root_path)
        .with_context(|| format!("failed to create DB path: {}", db_root_path.display()))?;

    let site_db_path = db_root_path.join(SITE_DB_FILENAME);
    let db_uri = format!("sqlite://{}", site_db_path.to_string_lossy());

    let connect_options = SqliteConnectOptions::from_str(&db_uri)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .with_context(|| format!("failed to open database: {}", site_db_path.display()))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    tracing::info!("Database ready at {}", site_db_path.display());

    Ok((pool, db_root_path))
}

pub(crate) fn normalize_path<P: Into<PathBuf>>(path: P) -> Result<PathBuf> {
    let path = path.into();
    if path.is_absolute() {
        return Ok(path);
    }

    let cwd = std::env::current_dir().context("failed to read current working directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_path() {
        let absolute = PathBuf::from("/var/lib/folio");
        assert_eq!(normalize_path(absolute.clone()).unwrap(), absolute);

        let relative = normalize_path("instance").unwrap();
        assert!(relative.is_absolute());
        assert!(relative.ends_with("instance"));
    }

    #[tokio::test]
    async fn test_init_pool_creates_database() {
        if std::env::var(crate::config::DB_PATH_ENV).is_ok() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("instance");
        let database = Database {
            path: Some(root.clone()),
        };

        let (pool, db_root) = init_pool(&database).await.unwrap();
        assert_eq!(db_root, root);
        assert!(root.join(SITE_DB_FILENAME).exists());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
