use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

use super::db::{
    ProjectRow, delete_project_row, fetch_project_by_id, insert_project, update_project_row,
};
use super::models::{NewProject, ProjectRecord, ProjectUpdate};
use crate::content::{SanitizationPolicy, sanitize};
use crate::errors::{ContentError, ContentResult};
use crate::media::ImageAttachment;
use crate::namespace::{Collection, write_with_unique_slug};
use crate::validation::text::{
    DESCRIPTION_MAX_CHARS, SKILLS_MAX_CHARS, optional, required, validate_title,
};
use crate::validation::url::normalize_link;

/// Validated column values for one project.
struct ProjectFields {
    title: String,
    description: String,
    content: String,
    skills_used: Option<String>,
    demo_link: Option<String>,
    case_study_link: Option<String>,
}

impl ProjectFields {
    fn row<'a>(
        &'a self,
        id: &'a str,
        slug: &'a str,
        date_posted: DateTime<Utc>,
        image: Option<&'a ImageAttachment>,
    ) -> ProjectRow<'a> {
        ProjectRow {
            id,
            title: &self.title,
            slug,
            description: &self.description,
            content: &self.content,
            skills_used: self.skills_used.as_deref(),
            demo_link: self.demo_link.as_deref(),
            case_study_link: self.case_study_link.as_deref(),
            date_posted,
            image,
        }
    }
}

pub async fn create_project(
    pool: &SqlitePool,
    policy: &SanitizationPolicy,
    input: NewProject,
) -> ContentResult<ProjectRecord> {
    let fields = ProjectFields {
        title: validate_title(&input.title)?,
        description: required("description", &input.description, DESCRIPTION_MAX_CHARS)?,
        content: sanitize(&input.content, policy),
        skills_used: optional("skills_used", input.skills_used.as_deref(), SKILLS_MAX_CHARS)?,
        demo_link: normalize_optional_link("demo_link", input.demo_link.as_deref())?,
        case_study_link: normalize_optional_link(
            "case_study_link",
            input.case_study_link.as_deref(),
        )?,
    };
    let id = cuid2::create_id();
    let date_posted = Utc::now();

    let (fields_ref, id_ref, image) = (&fields, id.as_str(), input.image.as_ref());
    let slug = write_with_unique_slug(
        pool,
        Collection::Projects,
        &fields.title,
        None,
        None,
        |slug| async move {
            insert_project(pool, &fields_ref.row(id_ref, &slug, date_posted, image)).await
        },
    )
    .await?;

    info!(id = %id, slug = %slug, "Created project");

    fetch_project_by_id(pool, &id)
        .await?
        .ok_or(ContentError::NotFound("project"))
}

/// Apply `input` to the project `id`.
///
/// The slug is recomputed only when the title changes.
pub async fn update_project(
    pool: &SqlitePool,
    policy: &SanitizationPolicy,
    id: &str,
    input: ProjectUpdate,
) -> ContentResult<ProjectRecord> {
    let existing = fetch_project_by_id(pool, id)
        .await?
        .ok_or(ContentError::NotFound("project"))?;

    let fields = ProjectFields {
        title: match input.title.as_deref() {
            Some(title) => validate_title(title)?,
            None => existing.title.clone(),
        },
        description: match input.description.as_deref() {
            Some(description) => required("description", description, DESCRIPTION_MAX_CHARS)?,
            None => existing.description.clone(),
        },
        content: match input.content.as_deref() {
            Some(raw) => sanitize(raw, policy),
            None => existing.content.clone(),
        },
        skills_used: match input.skills_used.as_deref() {
            Some(skills) => optional("skills_used", Some(skills), SKILLS_MAX_CHARS)?,
            None => existing.skills_used.clone(),
        },
        demo_link: match input.demo_link.as_deref() {
            Some(link) => normalize_link("demo_link", link)?,
            None => existing.demo_link.clone(),
        },
        case_study_link: match input.case_study_link.as_deref() {
            Some(link) => normalize_link("case_study_link", link)?,
            None => existing.case_study_link.clone(),
        },
    };
    let image = input.image.as_ref();
    let date_posted = existing.date_posted;

    let slug = if fields.title == existing.title {
        update_project_row(pool, &fields.row(id, &existing.slug, date_posted, image)).await?;
        existing.slug.clone()
    } else {
        let fields_ref = &fields;
        write_with_unique_slug(
            pool,
            Collection::Projects,
            &fields.title,
            Some(id),
            Some(&existing.slug),
            |slug| async move {
                update_project_row(pool, &fields_ref.row(id, &slug, date_posted, image)).await
            },
        )
        .await?
    };

    info!(id = %id, slug = %slug, previous_slug = %existing.slug, "Updated project");

    fetch_project_by_id(pool, id)
        .await?
        .ok_or(ContentError::NotFound("project"))
}

/// Delete a project together with its comments, ratings and likes.
pub async fn delete_project(pool: &SqlitePool, id: &str) -> ContentResult<()> {
    if !delete_project_row(pool, id).await? {
        return Err(ContentError::NotFound("project"));
    }
    info!(id = %id, "Deleted project");
    Ok(())
}

fn normalize_optional_link(field: &str, link: Option<&str>) -> ContentResult<Option<String>> {
    match link {
        Some(link) => normalize_link(field, link),
        None => Ok(None),
    }
}
