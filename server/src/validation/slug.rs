use crate::errors::{ContentResult, bad_user_input};

/// Lowercase kebab-case: `[a-z0-9]` runs joined by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn validate_slug(slug: &str) -> ContentResult<()> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(bad_user_input("slug must be lowercase kebab-case"))
    }
}
