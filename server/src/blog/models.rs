use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::media::ImageAttachment;

pub const DEFAULT_POST_IMAGE: &str = "default_blog.jpg";

#[derive(Clone, Debug, sqlx::FromRow, Serialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Sanitized HTML
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub image_filename: String,
    pub image_mimetype: Option<String>,
    /// Whether uploaded image bytes are stored for this post
    pub has_image: bool,
}

#[derive(Clone, Debug, sqlx::FromRow, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub date_posted: DateTime<Utc>,
    pub image_filename: String,
    pub has_image: bool,
}

impl From<PostRecord> for PostSummary {
    fn from(record: PostRecord) -> Self {
        PostSummary {
            id: record.id,
            title: record.title,
            slug: record.slug,
            date_posted: record.date_posted,
            image_filename: record.image_filename,
            has_image: record.has_image,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewPost {
    pub title: String,
    /// Raw editor HTML, sanitized before storage
    pub content: String,
    pub image: Option<ImageAttachment>,
}

/// Fields left as `None` keep their stored value.
#[derive(Clone, Debug, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<ImageAttachment>,
}
