use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::models::{DEFAULT_POST_IMAGE, PostRecord, PostSummary};
use crate::media::ImageAttachment;

const POST_COLUMNS: &str = "id, title, slug, content, date_posted, image_filename, image_mimetype, \
     image_data IS NOT NULL AS has_image";

const SUMMARY_COLUMNS: &str =
    "id, title, slug, date_posted, image_filename, image_data IS NOT NULL AS has_image";

pub async fn fetch_post_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<PostRecord>, sqlx::Error> {
    let sql = format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE id = ?");
    sqlx::query_as::<_, PostRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_post_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<PostRecord>, sqlx::Error> {
    let sql = format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = ?");
    sqlx::query_as::<_, PostRecord>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// Newest first; `limit` of `-1` means no limit.
pub async fn fetch_post_summaries(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostSummary>, sqlx::Error> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM blog_posts ORDER BY date_posted DESC, rowid DESC LIMIT ? OFFSET ?"
    );
    sqlx::query_as::<_, PostSummary>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_posts(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts")
        .fetch_one(pool)
        .await
}

pub struct PostRow<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub slug: &'a str,
    pub content: &'a str,
    pub date_posted: DateTime<Utc>,
    pub image: Option<&'a ImageAttachment>,
}

pub async fn insert_post(pool: &SqlitePool, row: &PostRow<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO blog_posts (id, title, slug, content, date_posted, image_filename, image_data, image_mimetype) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(row.id)
    .bind(row.title)
    .bind(row.slug)
    .bind(row.content)
    .bind(row.date_posted)
    .bind(row.image.map_or(DEFAULT_POST_IMAGE, |a| a.filename.as_str()))
    .bind(row.image.map(|a| a.image.data.as_slice()))
    .bind(row.image.map(|a| a.image.mimetype.as_str()))
    .execute(pool)
    .await?;
    Ok(())
}

/// Overwrite title, slug and content; image columns change only when
/// `row.image` is set. `date_posted` is left untouched.
pub async fn update_post_row(pool: &SqlitePool, row: &PostRow<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE blog_posts SET title = ?, slug = ?, content = ?, \
         image_filename = COALESCE(?, image_filename), \
         image_data = COALESCE(?, image_data), \
         image_mimetype = COALESCE(?, image_mimetype) \
         WHERE id = ?",
    )
    .bind(row.title)
    .bind(row.slug)
    .bind(row.content)
    .bind(row.image.map(|a| a.filename.as_str()))
    .bind(row.image.map(|a| a.image.data.as_slice()))
    .bind(row.image.map(|a| a.image.mimetype.as_str()))
    .bind(row.id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns false when no post has `id`.
pub async fn delete_post_row(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
