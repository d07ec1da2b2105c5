use sqlx::SqlitePool;

use super::models::{CommentRecord, FeedbackSummary, FeedbackTarget};
use crate::errors::{ContentError, ContentResult};

/// Likes, comments and ratings recorded for `target`.
pub async fn feedback_summary(
    pool: &SqlitePool,
    target: &FeedbackTarget,
) -> ContentResult<FeedbackSummary> {
    let exists_sql = format!(
        "SELECT 1 FROM {} WHERE id = ? LIMIT 1",
        target.collection().table()
    );
    let exists: Option<i64> = sqlx::query_scalar(&exists_sql)
        .bind(target.id())
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(ContentError::NotFound(target.label()));
    }

    let column = target.column();

    let likes: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM likes WHERE {column} = ?"))
        .bind(target.id())
        .fetch_one(pool)
        .await?;

    let comments = sqlx::query_as::<_, CommentRecord>(&format!(
        "SELECT id, content, guest_name, date_posted FROM comments WHERE {column} = ? \
         ORDER BY date_posted ASC, rowid ASC"
    ))
    .bind(target.id())
    .fetch_all(pool)
    .await?;

    let (ratings, average_rating): (i64, Option<f64>) = sqlx::query_as(&format!(
        "SELECT COUNT(*), AVG(score) FROM ratings WHERE {column} = ?"
    ))
    .bind(target.id())
    .fetch_one(pool)
    .await?;

    Ok(FeedbackSummary {
        likes,
        comments,
        ratings,
        average_rating,
    })
}
