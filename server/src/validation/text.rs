use crate::errors::{ContentError, ContentResult, bad_user_input};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 200;
pub const SKILLS_MAX_CHARS: usize = 200;
pub const GUEST_NAME_MAX_CHARS: usize = 100;
pub const GUEST_EMAIL_MAX_CHARS: usize = 120;

/// Trim a title and check it is present and short enough.
pub fn validate_title(title: &str) -> ContentResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ContentError::InvalidTitle);
    }
    check_length("title", title, TITLE_MAX_CHARS)?;
    Ok(title.to_string())
}

/// Trim a mandatory field and check its length.
pub fn required(field: &str, value: &str, max_chars: usize) -> ContentResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(bad_user_input(format!("{field} is required")));
    }
    check_length(field, value, max_chars)?;
    Ok(value.to_string())
}

/// Trim an optional field; blank becomes `None`.
pub fn optional(field: &str, value: Option<&str>, max_chars: usize) -> ContentResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            check_length(field, value, max_chars)?;
            Ok(Some(value.to_string()))
        }
    }
}

pub fn validate_email(email: &str) -> ContentResult<String> {
    let email = required("email", email, GUEST_EMAIL_MAX_CHARS)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(bad_user_input("email must be a valid address")),
    }
}

fn check_length(field: &str, value: &str, max_chars: usize) -> ContentResult<()> {
    if value.chars().count() > max_chars {
        Err(bad_user_input(format!(
            "{field} must be at most {max_chars} characters"
        )))
    } else {
        Ok(())
    }
}
