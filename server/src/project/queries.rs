use sqlx::SqlitePool;
use tracing::debug;

use super::db::{
    count_projects, fetch_project_by_id, fetch_project_by_slug, fetch_project_summaries,
};
use super::models::{ProjectRecord, ProjectSummary};
use crate::errors::ContentResult;
use crate::pagination::{PER_PAGE, Page, clamp_page, offset};
use crate::validation::slug::is_valid_slug;

/// Look a project up by its permalink slug. Malformed slugs match nothing.
pub async fn get_project_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> ContentResult<Option<ProjectRecord>> {
    if !is_valid_slug(slug) {
        debug!(slug = %slug, "Ignoring lookup for malformed slug");
        return Ok(None);
    }
    Ok(fetch_project_by_slug(pool, slug).await?)
}

pub async fn get_project_by_id(
    pool: &SqlitePool,
    id: &str,
) -> ContentResult<Option<ProjectRecord>> {
    Ok(fetch_project_by_id(pool, id).await?)
}

pub async fn list_projects(pool: &SqlitePool) -> ContentResult<Vec<ProjectSummary>> {
    Ok(fetch_project_summaries(pool, -1, 0).await?)
}

pub async fn list_projects_page(
    pool: &SqlitePool,
    page: i64,
) -> ContentResult<Page<ProjectSummary>> {
    let page = clamp_page(page);
    let total = count_projects(pool).await?;
    let items = fetch_project_summaries(pool, PER_PAGE, offset(page, PER_PAGE)).await?;
    debug!(page, total, returned = items.len(), "Fetched project page");

    Ok(Page {
        items,
        page,
        per_page: PER_PAGE,
        total,
    })
}

pub async fn latest_projects(pool: &SqlitePool, limit: i64) -> ContentResult<Vec<ProjectSummary>> {
    Ok(fetch_project_summaries(pool, limit.max(0), 0).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SanitizationPolicy;
    use crate::project::models::NewProject;
    use crate::project::mutations::create_project;
    use crate::test_helpers::create_test_pool;

    async fn seed(pool: &SqlitePool, titles: &[&str]) {
        let policy = SanitizationPolicy::default();
        for title in titles {
            create_project(
                pool,
                &policy,
                NewProject {
                    title: title.to_string(),
                    description: format!("About {title}"),
                    content: String::new(),
                    skills_used: None,
                    demo_link: None,
                    case_study_link: None,
                    image: None,
                },
            )
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_lookup_and_listing() {
        let pool = create_test_pool().await.unwrap();
        seed(&pool, &["Alpha", "Beta", "Gamma"]).await;

        let beta = get_project_by_slug(&pool, "beta").await.unwrap().unwrap();
        assert_eq!(beta.description, "About Beta");
        assert!(beta.skill_tags().is_empty());

        let by_id = get_project_by_id(&pool, &beta.id).await.unwrap().unwrap();
        assert_eq!(by_id.slug, "beta");

        assert!(get_project_by_slug(&pool, "BETA").await.unwrap().is_none());

        let slugs: Vec<_> = list_projects(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["gamma", "beta", "alpha"]);

        let latest = latest_projects(&pool, 1).await.unwrap();
        assert_eq!(latest[0].slug, "gamma");
    }

    #[tokio::test]
    async fn test_project_pages() {
        let pool = create_test_pool().await.unwrap();
        seed(&pool, &["One", "Two", "Three", "Four", "Five", "Six"]).await;

        let page = list_projects_page(&pool, -1).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 5);

        let page = list_projects_page(&pool, 2).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].slug, "one");
    }
}
