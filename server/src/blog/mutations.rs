use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use super::db::{PostRow, delete_post_row, fetch_post_by_id, insert_post, update_post_row};
use super::models::{NewPost, PostRecord, PostUpdate};
use crate::content::{SanitizationPolicy, sanitize};
use crate::errors::{ContentError, ContentResult};
use crate::namespace::{Collection, write_with_unique_slug};
use crate::validation::text::validate_title;

pub async fn create_post(
    pool: &SqlitePool,
    policy: &SanitizationPolicy,
    input: NewPost,
) -> ContentResult<PostRecord> {
    let title = validate_title(&input.title)?;
    let content = sanitize(&input.content, policy);
    let id = cuid2::create_id();
    let date_posted = Utc::now();

    let (id_ref, title_ref, content_ref, image) =
        (id.as_str(), title.as_str(), content.as_str(), input.image.as_ref());
    let slug = write_with_unique_slug(pool, Collection::BlogPosts, &title, None, None, |slug| async move {
        let row = PostRow {
            id: id_ref,
            title: title_ref,
            slug: &slug,
            content: content_ref,
            date_posted,
            image,
        };
        insert_post(pool, &row).await
    })
    .await?;

    info!(id = %id, slug = %slug, "Created blog post");

    fetch_post_by_id(pool, &id)
        .await?
        .ok_or(ContentError::NotFound("blog post"))
}

/// Apply `input` to the post `id`.
///
/// The slug is recomputed only when the title changes, so permalinks stay
/// stable across content edits.
pub async fn update_post(
    pool: &SqlitePool,
    policy: &SanitizationPolicy,
    id: &str,
    input: PostUpdate,
) -> ContentResult<PostRecord> {
    let existing = fetch_post_by_id(pool, id)
        .await?
        .ok_or(ContentError::NotFound("blog post"))?;

    let title = match input.title.as_deref() {
        Some(title) => validate_title(title)?,
        None => existing.title.clone(),
    };
    let content = match input.content.as_deref() {
        Some(raw) => sanitize(raw, policy),
        None => existing.content.clone(),
    };
    let image = input.image.as_ref();

    let slug = if title == existing.title {
        let row = PostRow {
            id,
            title: &title,
            slug: &existing.slug,
            content: &content,
            date_posted: existing.date_posted,
            image,
        };
        update_post_row(pool, &row).await?;
        existing.slug.clone()
    } else {
        let (title_ref, content_ref) = (title.as_str(), content.as_str());
        let date_posted = existing.date_posted;
        write_with_unique_slug(
            pool,
            Collection::BlogPosts,
            &title,
            Some(id),
            Some(&existing.slug),
            |slug| async move {
                let row = PostRow {
                    id,
                    title: title_ref,
                    slug: &slug,
                    content: content_ref,
                    date_posted,
                    image,
                };
                update_post_row(pool, &row).await
            },
        )
        .await?
    };

    info!(id = %id, slug = %slug, previous_slug = %existing.slug, "Updated blog post");

    fetch_post_by_id(pool, id)
        .await?
        .ok_or(ContentError::NotFound("blog post"))
}

/// Delete a post together with its comments, ratings and likes.
pub async fn delete_post(pool: &SqlitePool, id: &str) -> ContentResult<()> {
    if !delete_post_row(pool, id).await? {
        return Err(ContentError::NotFound("blog post"));
    }
    info!(id = %id, "Deleted blog post");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_pool;

    fn new_post(title: &str, content: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: content.to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_post_assigns_slug_and_sanitizes() {
        let pool = create_test_pool().await.unwrap();
        let policy = SanitizationPolicy::default();

        let post = create_post(
            &pool,
            &policy,
            new_post("  Hello World  ", "<p onclick=\"x()\">Hi</p><script>bad()</script>"),
        )
        .await
        .unwrap();

        assert_eq!(post.title, "Hello World");
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.content, "<p>Hi</p>");
        assert_eq!(post.image_filename, "default_blog.jpg");
        assert!(!post.has_image);
    }

    #[tokio::test]
    async fn test_same_title_gets_suffixed_slug() {
        let pool = create_test_pool().await.unwrap();
        let policy = SanitizationPolicy::default();

        let first = create_post(&pool, &policy, new_post("Hello World", ""))
            .await
            .unwrap();
        let second = create_post(&pool, &policy, new_post("hello, world!", ""))
            .await
            .unwrap();
        let third = create_post(&pool, &policy, new_post("Hello   World", ""))
            .await
            .unwrap();

        assert_eq!(first.slug, "hello-world");
        assert_eq!(second.slug, "hello-world-1");
        assert_eq!(third.slug, "hello-world-2");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_titles() {
        let pool = create_test_pool().await.unwrap();
        let policy = SanitizationPolicy::default();

        let err = create_post(&pool, &policy, new_post("   ", "x")).await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidTitle));

        let err = create_post(&pool, &policy, new_post("!!!", "x")).await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidTitle));

        let err = create_post(&pool, &policy, new_post(&"a".repeat(101), "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_without_title_change_keeps_slug() {
        let pool = create_test_pool().await.unwrap();
        let policy = SanitizationPolicy::default();

        let post = create_post(&pool, &policy, new_post("Stable", "<p>v1</p>"))
            .await
            .unwrap();
        let updated = update_post(
            &pool,
            &policy,
            &post.id,
            PostUpdate {
                title: Some("Stable".to_string()),
                content: Some("<p style=\"position:fixed\">v2</p>".to_string()),
                image: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.slug, "stable");
        assert_eq!(updated.content, "<p>v2</p>");
        assert_eq!(updated.date_posted, post.date_posted);
    }

    #[tokio::test]
    async fn test_update_title_recomputes_slug_excluding_self() {
        let pool = create_test_pool().await.unwrap();
        let policy = SanitizationPolicy::default();

        let post = create_post(&pool, &policy, new_post("My Post", ""))
            .await
            .unwrap();

        // Same base slug: the post does not collide with itself.
        let updated = update_post(
            &pool,
            &policy,
            &post.id,
            PostUpdate {
                title: Some("My Post!".to_string()),
                ..PostUpdate::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.slug, "my-post");
        assert_eq!(updated.title, "My Post!");

        create_post(&pool, &policy, new_post("Taken", "")).await.unwrap();
        let renamed = update_post(
            &pool,
            &policy,
            &post.id,
            PostUpdate {
                title: Some("Taken".to_string()),
                ..PostUpdate::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.slug, "taken-1");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_post() {
        let pool = create_test_pool().await.unwrap();
        let policy = SanitizationPolicy::default();

        let err = update_post(&pool, &policy, "missing", PostUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound("blog post")));

        let err = delete_post(&pool, "missing").await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound("blog post")));
    }

    #[tokio::test]
    async fn test_delete_post() {
        let pool = create_test_pool().await.unwrap();
        let policy = SanitizationPolicy::default();

        let post = create_post(&pool, &policy, new_post("Gone soon", ""))
            .await
            .unwrap();
        delete_post(&pool, &post.id).await.unwrap();

        assert!(fetch_post_by_id(&pool, &post.id).await.unwrap().is_none());

        // The slug is free again.
        let again = create_post(&pool, &policy, new_post("Gone soon", ""))
            .await
            .unwrap();
        assert_eq!(again.slug, "gone-soon");
    }
}
