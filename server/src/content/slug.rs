//! Slug assignment for titled content.
//!
//! A slug is derived from a title and must be unique inside its collection.
//! Whether a candidate is already in use is decided by a caller-supplied
//! predicate, so nothing in here touches storage.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("title does not contain any characters usable in a slug")]
    InvalidTitle,

    #[error("no free slug derived from `{base}` up to suffix {max_suffix}")]
    Exhausted { base: String, max_suffix: u64 },
}

/// Lower-case, transliterate and hyphenate a title into the base slug.
///
/// The result only contains `[a-z0-9-]`, never starts or ends with a hyphen
/// and never contains two hyphens in a row.
pub fn normalize_title(title: &str) -> Result<String, SlugError> {
    let base = ::slug::slugify(title);
    if base.is_empty() {
        Err(SlugError::InvalidTitle)
    } else {
        Ok(base)
    }
}

/// Derive a slug for `title` that `exists` does not report as taken.
///
/// `exists(candidate)` must return true only when a *different* item already
/// uses `candidate`. When `current_slug` is given, that slug is always treated
/// as free: an item being updated never collides with itself.
///
/// Candidates are probed in the order `base`, `base-1`, `base-2`, ... and the
/// first free one is returned.
///
/// Callers keep the existing slug when a title is unchanged and do not call
/// this at all in that case.
pub fn assign_slug<F>(
    title: &str,
    exists: F,
    current_slug: Option<&str>,
) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    assign_slug_bounded(title, exists, current_slug, u64::MAX)
}

/// Same as [`assign_slug`], but gives up after probing `base-{max_suffix}`.
///
/// With `max_suffix` set to the number of taken slugs plus one the search
/// cannot fail, since at most that many of the suffixed candidates can be in
/// use.
pub fn assign_slug_bounded<F>(
    title: &str,
    exists: F,
    current_slug: Option<&str>,
    max_suffix: u64,
) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    let base = normalize_title(title)?;
    first_free_slug(base, exists, current_slug, max_suffix)
}

/// First of `base`, `base-1`, ... `base-{max_suffix}` that is not taken.
///
/// `base` must already be normalized, as returned by [`normalize_title`].
pub fn first_free_slug<F>(
    base: String,
    mut exists: F,
    current_slug: Option<&str>,
    max_suffix: u64,
) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    let mut is_taken = |candidate: &str| current_slug != Some(candidate) && exists(candidate);

    if !is_taken(base.as_str()) {
        return Ok(base);
    }

    let found = (1..=max_suffix)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !is_taken(candidate.as_str()));

    found.ok_or(SlugError::Exhausted { base, max_suffix })
}
