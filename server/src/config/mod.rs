//! Configuration management for Folio
//!
//! This module handles loading and parsing of configuration files. Configuration
//! is stored in RON format for better Rust type expressiveness.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::content::SanitizationPolicy;
use crate::validation::url::normalize_base_url;

/// Environment variable overriding [`Database::path`]
pub const DB_PATH_ENV: &str = "FOLIO_DB_PATH";

/// Environment variable overriding [`Logging::level`]
pub const LOG_LEVEL_ENV: &str = "FOLIO_LOG";

/// Top-level configuration for Folio
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub site: Site,

    #[serde(default)]
    pub database: Database,

    #[serde(default)]
    pub images: Images,

    /// Allow-lists applied to post and project bodies
    #[serde(default)]
    pub sanitizer: SanitizationPolicy,

    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    /// Validate the configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        normalize_base_url(&self.site.base_url).map_err(|err| err.to_string())?;
        self.sanitizer.validate()?;
        self.images.validate()?;
        self.logging.level().map(|_| ())
    }
}

/// Public site settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Site {
    /// Absolute URL the sitemap links are built from
    pub base_url: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Database {
    /// Directory holding `site.db` (absolute or relative to the working directory)
    pub path: Option<PathBuf>,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("instance")),
        }
    }
}

impl Database {
    /// Database directory, with `FOLIO_DB_PATH` taking precedence.
    pub fn root(&self) -> PathBuf {
        match std::env::var(DB_PATH_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => self
                .path
                .clone()
                .unwrap_or_else(|| PathBuf::from("instance")),
        }
    }
}

/// Bounding boxes images are shrunk to fit, as `(width, height)`
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Images {
    #[serde(default = "default_blog_max")]
    pub blog_max: (u32, u32),

    #[serde(default = "default_project_max")]
    pub project_max: (u32, u32),
}

impl Default for Images {
    fn default() -> Self {
        Self {
            blog_max: default_blog_max(),
            project_max: default_project_max(),
        }
    }
}

impl Images {
    pub fn validate(&self) -> Result<(), String> {
        for (name, (width, height)) in [("blog_max", self.blog_max), ("project_max", self.project_max)] {
            if width == 0 || height == 0 {
                return Err(format!("images.{name} must be at least 1x1"));
            }
        }
        Ok(())
    }
}

fn default_blog_max() -> (u32, u32) {
    (800, 600)
}

fn default_project_max() -> (u32, u32) {
    (600, 400)
}

/// Logging settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Logging {
    /// One of `trace`, `debug`, `info`, `warn`, `error`
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Logging {
    /// Effective level, with `FOLIO_LOG` taking precedence.
    pub fn level(&self) -> Result<tracing::Level, String> {
        let raw = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| self.level.clone());
        tracing::Level::from_str(raw.trim())
            .map_err(|_| format!("invalid log level '{}'", raw))
    }
}
