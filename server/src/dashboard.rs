use serde::Serialize;
use sqlx::SqlitePool;

use crate::blog::{PostSummary, latest_posts};
use crate::errors::ContentResult;
use crate::project::{ProjectSummary, latest_projects};

const LATEST_LIMIT: i64 = 5;

#[derive(Clone, Debug, Serialize)]
pub struct DashboardStats {
    pub posts: i64,
    pub projects: i64,
    pub comments: i64,
    pub ratings: i64,
    pub likes: i64,
    pub uploaded_images: i64,
    pub latest_posts: Vec<PostSummary>,
    pub latest_projects: Vec<ProjectSummary>,
}

pub async fn dashboard(pool: &SqlitePool) -> ContentResult<DashboardStats> {
    let (posts, projects, comments, ratings, likes, uploaded_images): (i64, i64, i64, i64, i64, i64) =
        sqlx::query_as(
            "SELECT \
             (SELECT COUNT(*) FROM blog_posts), \
             (SELECT COUNT(*) FROM projects), \
             (SELECT COUNT(*) FROM comments), \
             (SELECT COUNT(*) FROM ratings), \
             (SELECT COUNT(*) FROM likes), \
             (SELECT COUNT(*) FROM uploaded_images)",
        )
        .fetch_one(pool)
        .await?;

    Ok(DashboardStats {
        posts,
        projects,
        comments,
        ratings,
        likes,
        uploaded_images,
        latest_posts: latest_posts(pool, LATEST_LIMIT).await?,
        latest_projects: latest_projects(pool, LATEST_LIMIT).await?,
    })
}
