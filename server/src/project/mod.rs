pub mod db;
pub mod models;
pub mod mutations;
pub mod queries;

pub use models::{NewProject, ProjectRecord, ProjectSummary, ProjectUpdate};
pub use mutations::{create_project, delete_project, update_project};
pub use queries::{
    get_project_by_id, get_project_by_slug, latest_projects, list_projects, list_projects_page,
};
