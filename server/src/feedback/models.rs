use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::namespace::Collection;

/// The post or project a piece of feedback belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackTarget {
    Post(String),
    Project(String),
}

impl FeedbackTarget {
    pub fn id(&self) -> &str {
        match self {
            FeedbackTarget::Post(id) | FeedbackTarget::Project(id) => id,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            FeedbackTarget::Post(_) => Collection::BlogPosts,
            FeedbackTarget::Project(_) => Collection::Projects,
        }
    }

    /// Foreign key column in the feedback tables
    pub(crate) fn column(&self) -> &'static str {
        match self {
            FeedbackTarget::Post(_) => "post_id",
            FeedbackTarget::Project(_) => "project_id",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            FeedbackTarget::Post(_) => "blog post",
            FeedbackTarget::Project(_) => "project",
        }
    }
}

/// One guest submission. Any combination of like, comment and rating may be
/// sent at once, but not none of them.
#[derive(Clone, Debug, Default)]
pub struct FeedbackInput {
    pub like: bool,
    pub content: Option<String>,
    pub rating: Option<i64>,
    pub guest_name: String,
    pub guest_email: String,
}

/// Ids of the rows a submission created.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackReceipt {
    pub like_id: Option<String>,
    pub comment_id: Option<String>,
    pub rating_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow, Serialize)]
pub struct CommentRecord {
    pub id: String,
    /// Plain text, not escaped for HTML
    pub content: String,
    pub guest_name: String,
    pub date_posted: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub likes: i64,
    /// Oldest first
    pub comments: Vec<CommentRecord>,
    pub ratings: i64,
    pub average_rating: Option<f64>,
}
