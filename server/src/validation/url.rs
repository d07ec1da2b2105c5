use crate::errors::{ContentResult, bad_user_input};
use url::Url;

/// Parse an optional project link into a normalized absolute http(s) URL.
///
/// Blank input means "no link".
pub fn normalize_link(field: &str, raw_url: &str) -> ContentResult<Option<String>> {
    let raw_url = raw_url.trim();
    if raw_url.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(raw_url)
        .map_err(|_| bad_user_input(format!("{field} must be a valid URL")))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(bad_user_input(format!("{field} must be an http(s) URL"))),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(bad_user_input(format!("{field} must include a host")));
    }

    let mut normalized: String = url.into();
    while normalized.ends_with('/') {
        normalized.pop();
    }

    Ok(Some(normalized))
}

/// Base URL used for absolute links in the sitemap.
pub fn normalize_base_url(raw_url: &str) -> ContentResult<String> {
    normalize_link("base_url", raw_url)?.ok_or_else(|| bad_user_input("base_url is required"))
}
