use serde::Serialize;
use sqlx::SqlitePool;

use super::normalize::{ImageAttachment, prepare_attachment};
use crate::errors::{ContentError, ContentResult};

/// Image bytes as stored, with the mimetype they were encoded as.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct StoredImage {
    pub filename: String,
    pub mimetype: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Where the image for a post or project comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Uploaded bytes kept in the database
    Stored(StoredImage),
    /// A static asset name such as `default_blog.jpg`
    Static(String),
}

/// Validate, normalize (without resizing) and store an upload.
///
/// Returns the id of the new image.
pub async fn store_uploaded_image(
    pool: &SqlitePool,
    filename: &str,
    bytes: Vec<u8>,
    mimetype: &str,
) -> ContentResult<String> {
    let ImageAttachment { image, .. } = prepare_attachment(filename, bytes, mimetype, None).await?;

    let id = cuid2::create_id();
    sqlx::query(
        "INSERT INTO uploaded_images (id, filename, data, mimetype, date_uploaded) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(filename)
    .bind(&image.data)
    .bind(&image.mimetype)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await?;

    tracing::info!(
        id = %id,
        mimetype = %image.mimetype,
        bytes = image.data.len(),
        "Stored uploaded image {}",
        filename
    );

    Ok(id)
}

pub async fn get_uploaded_image(pool: &SqlitePool, id: &str) -> ContentResult<StoredImage> {
    sqlx::query_as::<_, StoredImage>(
        "SELECT filename, mimetype, data FROM uploaded_images WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(ContentError::NotFound("image"))
}

pub async fn get_post_image(pool: &SqlitePool, id: &str) -> ContentResult<ImageSource> {
    fetch_attached_image(pool, "blog_posts", id)
        .await?
        .ok_or(ContentError::NotFound("blog post"))
}

pub async fn get_project_image(pool: &SqlitePool, id: &str) -> ContentResult<ImageSource> {
    fetch_attached_image(pool, "projects", id)
        .await?
        .ok_or(ContentError::NotFound("project"))
}

#[derive(sqlx::FromRow)]
struct AttachedImageRow {
    image_filename: String,
    image_mimetype: Option<String>,
    image_data: Option<Vec<u8>>,
}

async fn fetch_attached_image(
    pool: &SqlitePool,
    table: &'static str,
    id: &str,
) -> Result<Option<ImageSource>, sqlx::Error> {
    let sql = format!(
        "SELECT image_filename, image_mimetype, image_data FROM {} WHERE id = ?",
        table
    );
    let row = sqlx::query_as::<_, AttachedImageRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| match (row.image_data, row.image_mimetype) {
        (Some(data), Some(mimetype)) => ImageSource::Stored(StoredImage {
            filename: row.image_filename,
            mimetype,
            data,
        }),
        _ => ImageSource::Static(row.image_filename),
    }))
}
