//! Folio content library
//!
//! Blog posts and portfolio projects with collision-free slugs and
//! sanitized rich-text bodies, plus guest feedback, image handling and
//! sitemap generation over a SQLite store.

pub mod blog;
pub mod config;
pub mod content;
pub mod dashboard;
pub mod db;
pub mod errors;
pub mod feedback;
pub mod media;
pub mod namespace;
pub mod pagination;
pub mod project;
pub mod sitemap;
pub mod validation;

pub mod test_helpers;
