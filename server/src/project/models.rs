use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::media::ImageAttachment;

pub const DEFAULT_PROJECT_IMAGE: &str = "default_project.jpg";

#[derive(Clone, Debug, sqlx::FromRow, Serialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    /// Sanitized HTML
    pub content: String,
    /// Comma-separated skill names
    pub skills_used: Option<String>,
    pub demo_link: Option<String>,
    pub case_study_link: Option<String>,
    pub date_posted: DateTime<Utc>,
    pub image_filename: String,
    pub image_mimetype: Option<String>,
    pub has_image: bool,
}

impl ProjectRecord {
    pub fn skill_tags(&self) -> Vec<&str> {
        skill_tags(self.skills_used.as_deref())
    }
}

#[derive(Clone, Debug, sqlx::FromRow, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub skills_used: Option<String>,
    pub date_posted: DateTime<Utc>,
    pub image_filename: String,
    pub has_image: bool,
}

impl ProjectSummary {
    pub fn skill_tags(&self) -> Vec<&str> {
        skill_tags(self.skills_used.as_deref())
    }
}

fn skill_tags(skills_used: Option<&str>) -> Vec<&str> {
    skills_used
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .collect()
}

#[derive(Clone, Debug)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    /// Raw editor HTML, sanitized before storage
    pub content: String,
    pub skills_used: Option<String>,
    pub demo_link: Option<String>,
    pub case_study_link: Option<String>,
    pub image: Option<ImageAttachment>,
}

/// Fields left as `None` keep their stored value. An empty string clears one
/// of the optional text fields.
#[derive(Clone, Debug, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub skills_used: Option<String>,
    pub demo_link: Option<String>,
    pub case_study_link: Option<String>,
    pub image: Option<ImageAttachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_tags() {
        assert_eq!(
            skill_tags(Some(" Rust, SQL ,, Docker ,")),
            vec!["Rust", "SQL", "Docker"]
        );
        assert!(skill_tags(None).is_empty());
        assert!(skill_tags(Some("  ")).is_empty());
    }
}
