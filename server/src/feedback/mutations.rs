use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use super::models::{FeedbackInput, FeedbackReceipt, FeedbackTarget};
use crate::content::strip_to_text;
use crate::errors::{ContentError, ContentResult, bad_user_input};
use crate::validation::text::{GUEST_NAME_MAX_CHARS, required, validate_email};

/// Record a guest's like, comment and/or rating in one transaction.
///
/// Comment text is reduced to plain text, stored unescaped. Nothing is written unless every
/// part of the submission is valid.
pub async fn submit_feedback(
    pool: &SqlitePool,
    target: &FeedbackTarget,
    input: FeedbackInput,
) -> ContentResult<FeedbackReceipt> {
    let guest_name = required("name", &input.guest_name, GUEST_NAME_MAX_CHARS)?;
    let guest_email = validate_email(&input.guest_email)?;

    if input.rating.is_some_and(|score| !(1..=5).contains(&score)) {
        return Err(bad_user_input("rating must be between 1 and 5"));
    }

    let comment = input
        .content
        .as_deref()
        .map(strip_to_text)
        .filter(|text| !text.is_empty());

    if !input.like && comment.is_none() && input.rating.is_none() {
        return Err(bad_user_input("feedback must include a like, a comment or a rating"));
    }

    let mut tx = pool.begin().await?;

    if !target_exists(&mut tx, target).await? {
        return Err(ContentError::NotFound(target.label()));
    }

    let now = Utc::now();
    let mut receipt = FeedbackReceipt::default();

    if input.like {
        let id = cuid2::create_id();
        let sql = format!(
            "INSERT INTO likes (id, guest_name, guest_email, {}, date_posted) VALUES (?, ?, ?, ?, ?)",
            target.column()
        );
        sqlx::query(&sql)
            .bind(&id)
            .bind(&guest_name)
            .bind(&guest_email)
            .bind(target.id())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        receipt.like_id = Some(id);
    }

    if let Some(content) = &comment {
        let id = cuid2::create_id();
        let sql = format!(
            "INSERT INTO comments (id, content, guest_name, guest_email, {}, date_posted) VALUES (?, ?, ?, ?, ?, ?)",
            target.column()
        );
        sqlx::query(&sql)
            .bind(&id)
            .bind(content)
            .bind(&guest_name)
            .bind(&guest_email)
            .bind(target.id())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        receipt.comment_id = Some(id);
    }

    if let Some(score) = input.rating {
        let id = cuid2::create_id();
        let sql = format!(
            "INSERT INTO ratings (id, score, guest_name, guest_email, {}, date_posted) VALUES (?, ?, ?, ?, ?, ?)",
            target.column()
        );
        sqlx::query(&sql)
            .bind(&id)
            .bind(score)
            .bind(&guest_name)
            .bind(&guest_email)
            .bind(target.id())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        receipt.rating_id = Some(id);
    }

    tx.commit().await?;

    info!(
        target = target.label(),
        id = %target.id(),
        like = receipt.like_id.is_some(),
        comment = receipt.comment_id.is_some(),
        rating = ?input.rating,
        "Recorded feedback"
    );

    Ok(receipt)
}

async fn target_exists(
    tx: &mut Transaction<'_, Sqlite>,
    target: &FeedbackTarget,
) -> Result<bool, sqlx::Error> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE id = ? LIMIT 1",
        target.collection().table()
    );
    let exists: Option<i64> = sqlx::query_scalar(&sql)
        .bind(target.id())
        .fetch_optional(&mut **tx)
        .await?;
    Ok(exists.is_some())
}
