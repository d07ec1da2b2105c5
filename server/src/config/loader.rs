//! Configuration file loading and parsing
//!
//! This module handles loading Folio configuration from RON files with
//! fallback strategies for finding config files in standard locations.

use super::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG_PATH";

/// Standard config file names to search for
const CONFIG_FILENAMES: &[&str] = &["folio.ron", ".folio/config.ron"];

/// Load configuration from a specific file path
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_ron(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .map_err(|err| anyhow::anyhow!(err))
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(config)
}

/// Load configuration with automatic file discovery
///
/// Searches for config files in the following locations (in order):
/// 1. Path specified in FOLIO_CONFIG_PATH environment variable
/// 2. folio.ron in current directory
/// 3. .folio/config.ron relative to current directory
///
/// If no config file is found, returns a default configuration.
pub fn load_with_discovery() -> Result<Config> {
    if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            tracing::info!("Loading config from {}: {}", CONFIG_PATH_ENV, path.display());
            return load_from_file(&path);
        } else {
            tracing::warn!(
                "{} specified but file not found: {}",
                CONFIG_PATH_ENV,
                path.display()
            );
        }
    }

    for filename in CONFIG_FILENAMES {
        let path = PathBuf::from(filename);
        if path.exists() {
            tracing::info!("Loading config from: {}", path.display());
            return load_from_file(&path);
        }
    }

    tracing::info!("No config file found, using defaults");
    Ok(Config::default())
}

/// Parse RON configuration string
fn parse_ron(content: &str) -> Result<Config> {
    ron::from_str(content).context("Failed to parse RON configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_ron("Config()").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_full_config() {
        let ron = r#"
Config(
    site: Site(base_url: "https://example.com"),
    database: Database(path: Some("/var/lib/folio")),
    images: Images(blog_max: (1024, 768), project_max: (640, 480)),
    sanitizer: SanitizationPolicy(
        allowed_tags: ["p", "a", "em"],
        allowed_attributes: {
            "a": ["href"],
            "*": ["class"],
        },
        allowed_css_properties: ["color"],
        strip: true,
    ),
    logging: Logging(level: "debug"),
)
        "#;

        let config = parse_ron(ron).unwrap();

        assert_eq!(config.site.base_url, "https://example.com");
        assert_eq!(
            config.database.path,
            Some(PathBuf::from("/var/lib/folio"))
        );
        assert_eq!(config.images.blog_max, (1024, 768));
        assert_eq!(config.images.project_max, (640, 480));

        assert_eq!(config.sanitizer.allowed_tags.len(), 3);
        assert_eq!(
            config.sanitizer.attributes_for("a").into_iter().collect::<Vec<_>>(),
            vec!["class", "href"]
        );
        assert!(config.sanitizer.allows_css_property("color"));
        assert!(!config.sanitizer.allows_css_property("margin"));

        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_image_bounds_use_defaults() {
        let config = parse_ron("Config(images: Images(blog_max: (400, 300)))").unwrap();
        assert_eq!(config.images.blog_max, (400, 300));
        assert_eq!(config.images.project_max, (600, 400));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.ron");

        let ron_content = r#"
Config(
    site: Site(base_url: "https://blog.example.org/"),
    logging: Logging(level: "warn"),
)
        "#;

        std::fs::write(&config_path, ron_content).unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.site.base_url, "https://blog.example.org/");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.images.blog_max, (800, 600));
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("folio.ron");

        let ron_content = r#"
Config(
    sanitizer: SanitizationPolicy(
        allowed_tags: ["p"],
        strip: false,
    ),
)
        "#;

        std::fs::write(&config_path, ron_content).unwrap();

        let err = load_from_file(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("strip"));
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let result = load_from_file("/nonexistent/path/config.ron");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_with_discovery_defaults() {
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }

        // Only meaningful when the working directory has no config of its own.
        if CONFIG_FILENAMES.iter().all(|f| !Path::new(f).exists()) {
            let config = load_with_discovery().unwrap();
            assert_eq!(config, Config::default());
        }
    }

    #[test]
    fn test_parse_invalid_ron() {
        let invalid_ron = "This is not valid RON";
        let result = parse_ron(invalid_ron);
        assert!(result.is_err());
    }
}
