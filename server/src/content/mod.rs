//! Pure content processing: slug assignment and HTML sanitization.
//!
//! Nothing in here touches storage; see [`crate::namespace`] for the
//! database-backed side of slug uniqueness.

pub mod sanitize;
pub mod slug;

pub use sanitize::{SanitizationPolicy, sanitize, sanitize_bytes, strip_to_text};
pub use slug::{SlugError, assign_slug, assign_slug_bounded, first_free_slug, normalize_title};
