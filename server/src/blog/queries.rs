use sqlx::SqlitePool;
use tracing::debug;

use super::db::{count_posts, fetch_post_by_id, fetch_post_by_slug, fetch_post_summaries};
use super::models::{PostRecord, PostSummary};
use crate::errors::ContentResult;
use crate::pagination::{PER_PAGE, Page, clamp_page, offset};
use crate::validation::slug::is_valid_slug;

/// Look a post up by its permalink slug. Malformed slugs match nothing.
pub async fn get_post_by_slug(pool: &SqlitePool, slug: &str) -> ContentResult<Option<PostRecord>> {
    if !is_valid_slug(slug) {
        debug!(slug = %slug, "Ignoring lookup for malformed slug");
        return Ok(None);
    }
    Ok(fetch_post_by_slug(pool, slug).await?)
}

pub async fn get_post_by_id(pool: &SqlitePool, id: &str) -> ContentResult<Option<PostRecord>> {
    Ok(fetch_post_by_id(pool, id).await?)
}

/// Every post, newest first.
pub async fn list_posts(pool: &SqlitePool) -> ContentResult<Vec<PostSummary>> {
    Ok(fetch_post_summaries(pool, -1, 0).await?)
}

/// One page of posts, newest first. Pages past the end are empty.
pub async fn list_posts_page(pool: &SqlitePool, page: i64) -> ContentResult<Page<PostSummary>> {
    let page = clamp_page(page);
    let total = count_posts(pool).await?;
    let items = fetch_post_summaries(pool, PER_PAGE, offset(page, PER_PAGE)).await?;
    debug!(page, total, returned = items.len(), "Fetched blog page");

    Ok(Page {
        items,
        page,
        per_page: PER_PAGE,
        total,
    })
}

pub async fn latest_posts(pool: &SqlitePool, limit: i64) -> ContentResult<Vec<PostSummary>> {
    Ok(fetch_post_summaries(pool, limit.max(0), 0).await?)
}
