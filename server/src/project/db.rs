use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::models::{DEFAULT_PROJECT_IMAGE, ProjectRecord, ProjectSummary};
use crate::media::ImageAttachment;

const PROJECT_COLUMNS: &str = "id, title, slug, description, content, skills_used, demo_link, \
     case_study_link, date_posted, image_filename, image_mimetype, \
     image_data IS NOT NULL AS has_image";

const SUMMARY_COLUMNS: &str = "id, title, slug, description, skills_used, date_posted, \
     image_filename, image_data IS NOT NULL AS has_image";

pub async fn fetch_project_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<ProjectRecord>, sqlx::Error> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?");
    sqlx::query_as::<_, ProjectRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_project_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<ProjectRecord>, sqlx::Error> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = ?");
    sqlx::query_as::<_, ProjectRecord>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// Newest first; `limit` of `-1` means no limit.
pub async fn fetch_project_summaries(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProjectSummary>, sqlx::Error> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM projects ORDER BY date_posted DESC, rowid DESC LIMIT ? OFFSET ?"
    );
    sqlx::query_as::<_, ProjectSummary>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_projects(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM projects")
        .fetch_one(pool)
        .await
}

pub struct ProjectRow<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub content: &'a str,
    pub skills_used: Option<&'a str>,
    pub demo_link: Option<&'a str>,
    pub case_study_link: Option<&'a str>,
    pub date_posted: DateTime<Utc>,
    pub image: Option<&'a ImageAttachment>,
}

pub async fn insert_project(pool: &SqlitePool, row: &ProjectRow<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO projects (id, title, slug, description, content, skills_used, demo_link, \
         case_study_link, date_posted, image_filename, image_data, image_mimetype) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(row.id)
    .bind(row.title)
    .bind(row.slug)
    .bind(row.description)
    .bind(row.content)
    .bind(row.skills_used)
    .bind(row.demo_link)
    .bind(row.case_study_link)
    .bind(row.date_posted)
    .bind(row.image.map_or(DEFAULT_PROJECT_IMAGE, |a| a.filename.as_str()))
    .bind(row.image.map(|a| a.image.data.as_slice()))
    .bind(row.image.map(|a| a.image.mimetype.as_str()))
    .execute(pool)
    .await?;
    Ok(())
}

/// Overwrite every text column; image columns change only when `row.image`
/// is set. `date_posted` is left untouched.
pub async fn update_project_row(
    pool: &SqlitePool,
    row: &ProjectRow<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE projects SET title = ?, slug = ?, description = ?, content = ?, skills_used = ?, \
         demo_link = ?, case_study_link = ?, \
         image_filename = COALESCE(?, image_filename), \
         image_data = COALESCE(?, image_data), \
         image_mimetype = COALESCE(?, image_mimetype) \
         WHERE id = ?",
    )
    .bind(row.title)
    .bind(row.slug)
    .bind(row.description)
    .bind(row.content)
    .bind(row.skills_used)
    .bind(row.demo_link)
    .bind(row.case_study_link)
    .bind(row.image.map(|a| a.filename.as_str()))
    .bind(row.image.map(|a| a.image.data.as_slice()))
    .bind(row.image.map(|a| a.image.mimetype.as_str()))
    .bind(row.id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns false when no project has `id`.
pub async fn delete_project_row(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
