//! Slug namespaces backed by the content tables.

use std::collections::HashSet;
use std::future::Future;

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::content::slug::{first_free_slug, normalize_title};
use crate::errors::{ContentError, ContentResult};

/// How many times a write re-resolves its slug after losing a race on the
/// `UNIQUE(slug)` constraint.
pub const SLUG_ATTEMPTS: usize = 3;

/// An independent slug namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    BlogPosts,
    Projects,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::BlogPosts => "blog_posts",
            Collection::Projects => "projects",
        }
    }
}

/// Slugs in `collection` that could collide with candidates derived from `base`.
///
/// The row identified by `exclude_id` is left out so an item being updated
/// never collides with itself.
pub async fn taken_slugs(
    pool: &SqlitePool,
    collection: Collection,
    base: &str,
    exclude_id: Option<&str>,
) -> Result<HashSet<String>, sqlx::Error> {
    let sql = format!(
        "SELECT slug FROM {} WHERE (slug = ? OR slug LIKE ?) AND id <> ?",
        collection.table()
    );

    let rows: Vec<String> = sqlx::query_scalar(&sql)
        .bind(base)
        .bind(format!("{base}-%"))
        .bind(exclude_id.unwrap_or_default())
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().collect())
}

/// Pick a free slug for `title` in `collection`.
///
/// `exclude_id` and `current_slug` identify the item being updated, if any.
pub async fn resolve_slug(
    pool: &SqlitePool,
    collection: Collection,
    title: &str,
    exclude_id: Option<&str>,
    current_slug: Option<&str>,
) -> ContentResult<String> {
    let base = normalize_title(title)?;
    let taken = taken_slugs(pool, collection, &base, exclude_id).await?;
    debug!(
        table = collection.table(),
        base = %base,
        taken = taken.len(),
        "resolving slug"
    );

    let max_suffix = taken.len() as u64 + 1;
    let slug = first_free_slug(
        base,
        |candidate| taken.contains(candidate),
        current_slug,
        max_suffix,
    )?;

    Ok(slug)
}

/// Resolve a slug and hand it to `write`, retrying when a concurrent writer
/// claims the same slug first.
///
/// Gives up with [`ContentError::DuplicateSlug`] after [`SLUG_ATTEMPTS`]
/// conflicting writes. Returns the slug that was written.
pub async fn write_with_unique_slug<F, Fut>(
    pool: &SqlitePool,
    collection: Collection,
    title: &str,
    exclude_id: Option<&str>,
    current_slug: Option<&str>,
    mut write: F,
) -> ContentResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    let mut last_slug = String::new();

    for attempt in 1..=SLUG_ATTEMPTS {
        let slug = resolve_slug(pool, collection, title, exclude_id, current_slug).await?;

        match write(slug.clone()).await {
            Ok(()) => return Ok(slug),
            Err(err) if is_slug_conflict(&err) => {
                warn!(
                    table = collection.table(),
                    slug = %slug,
                    attempt,
                    "slug claimed by a concurrent write, retrying"
                );
                last_slug = slug;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(ContentError::DuplicateSlug(last_slug))
}

/// True when `err` is a `UNIQUE` violation on a slug column.
pub fn is_slug_conflict(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation() && db_err.message().contains(".slug"))
}
