//! Configuration types for an asset acquisition run
//!
//! The built-in table returned by [`JobConfig::default`] is the fixed
//! configuration the utility ships with. A JSON file, the
//! `BRAND_ASSETS_DIR` environment variable and CLI flags can overlay it.

use crate::error::{AssetError, Result};
use crate::filter::DEFAULT_WHITE_THRESHOLD;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Output directory used when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "assets";

/// Image-hosting domain fragment used by the last-resort extraction pattern
pub const DEFAULT_FALLBACK_HOST: &str = "gumroadusercontent";

/// Environment variable overriding the output directory
pub const OUTPUT_DIR_ENV: &str = "BRAND_ASSETS_DIR";

/// File stems reserved for the logo outputs
const RESERVED_STEMS: &[&str] = &["logo", "logo-original"];

const PREMIUM_PAGE: &str = "https://essayboffin.gumroad.com/l/phouc";
const FREE_PAGE: &str = "https://essayboffin.gumroad.com/l/fnzbmq";
const PROFILE_LOGO: &str =
    "https://pbs.twimg.com/profile_images/1957012042600034304/bes8Ve0-_400x400.jpg";

/// A product page to scrape for its representative image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTarget {
    /// Identifier, also the stem of the saved file name
    pub name: String,
    /// Absolute page URL
    pub url: String,
}

impl PageTarget {
    pub fn new<N: Into<String>, U: Into<String>>(name: N, url: U) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Where the logo comes from
///
/// A direct URL wins. Otherwise the asset saved for `reuse_target` during the
/// same run is filtered in place of a remote logo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoSource {
    pub url: Option<String>,
    pub reuse_target: Option<String>,
}

impl LogoSource {
    /// Logo fetched from a direct URL
    pub fn from_url<U: Into<String>>(url: U) -> Self {
        Self {
            url: Some(url.into()),
            reuse_target: None,
        }
    }

    /// Logo taken from the asset saved for another target
    pub fn reuse<N: Into<String>>(target: N) -> Self {
        Self {
            url: None,
            reuse_target: Some(target.into()),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.url.is_some() || self.reuse_target.is_some()
    }
}

/// Complete configuration of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Pages processed in order
    pub targets: Vec<PageTarget>,
    pub logo: LogoSource,
    /// Directory receiving every output file (created if absent)
    pub output_dir: PathBuf,
    /// Channel value at or above which a pixel counts as background
    pub white_threshold: u8,
    /// Domain fragment for the substring fallback; `None` disables it
    pub fallback_host: Option<String>,
    /// Request timeout; the HTTP client's default applies when unset
    pub timeout_secs: Option<u64>,
    /// Show a download progress bar (CLI only)
    #[serde(skip)]
    pub show_progress: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            targets: vec![
                PageTarget::new("premium-course", PREMIUM_PAGE),
                PageTarget::new("free-course", FREE_PAGE),
            ],
            logo: LogoSource::from_url(PROFILE_LOGO),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            white_threshold: DEFAULT_WHITE_THRESHOLD,
            fallback_host: Some(DEFAULT_FALLBACK_HOST.to_string()),
            timeout_secs: None,
            show_progress: false,
        }
    }
}

impl JobConfig {
    /// Create a builder starting from an empty target list and no logo
    pub fn builder() -> JobConfigBuilder {
        JobConfigBuilder::new()
    }

    /// Load a configuration from a JSON file
    ///
    /// Fields missing from the file keep their built-in values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AssetError::file_io_error("read config file", path, &e))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AssetError::invalid_config(format!("Failed to parse '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check names, URLs and cross references
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for target in &self.targets {
            validate_target_name(&target.name)?;
            // Names differing only in case collide on case-insensitive filesystems
            if !seen.insert(target.name.to_ascii_lowercase()) {
                return Err(AssetError::invalid_config(format!(
                    "Duplicate target name '{}'",
                    target.name
                )));
            }
            validate_page_url(&target.url)?;
        }

        if let Some(url) = &self.logo.url {
            validate_page_url(url)?;
        }

        if let Some(reuse) = &self.logo.reuse_target {
            if !self.targets.iter().any(|t| t.name == *reuse) {
                return Err(AssetError::invalid_config(format!(
                    "Logo reuse target '{}' is not a configured target",
                    reuse
                )));
            }
        }

        if let Some(host) = &self.fallback_host {
            if host.trim().is_empty() {
                return Err(AssetError::invalid_config(
                    "Fallback host cannot be empty".to_string(),
                ));
            }
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(AssetError::invalid_config(
                "Output directory cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`JobConfig`]
#[derive(Debug, Clone)]
pub struct JobConfigBuilder {
    config: JobConfig,
}

impl JobConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: JobConfig {
                targets: Vec::new(),
                logo: LogoSource::default(),
                ..JobConfig::default()
            },
        }
    }

    /// Start from an existing configuration (used for overlays)
    pub fn from_config(config: JobConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn target<N: Into<String>, U: Into<String>>(mut self, name: N, url: U) -> Self {
        self.config.targets.push(PageTarget::new(name, url));
        self
    }

    #[must_use]
    pub fn targets(mut self, targets: Vec<PageTarget>) -> Self {
        self.config.targets = targets;
        self
    }

    #[must_use]
    pub fn logo(mut self, logo: LogoSource) -> Self {
        self.config.logo = logo;
        self
    }

    #[must_use]
    pub fn logo_url<U: Into<String>>(mut self, url: U) -> Self {
        self.config.logo.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn reuse_logo_from<N: Into<String>>(mut self, target: N) -> Self {
        self.config.logo.reuse_target = Some(target.into());
        self
    }

    #[must_use]
    pub fn output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn white_threshold(mut self, threshold: u8) -> Self {
        self.config.white_threshold = threshold;
        self
    }

    #[must_use]
    pub fn fallback_host(mut self, host: Option<String>) -> Self {
        self.config.fallback_host = host;
        self
    }

    #[must_use]
    pub fn timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<JobConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for JobConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_target_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AssetError::invalid_config(
            "Target name cannot be empty".to_string(),
        ));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(AssetError::invalid_config(format!(
            "Target name '{}' must be a plain file stem",
            name
        )));
    }
    if RESERVED_STEMS
        .iter()
        .any(|stem| stem.eq_ignore_ascii_case(name))
    {
        return Err(AssetError::invalid_config(format!(
            "Target name '{}' is reserved for logo output",
            name
        )));
    }
    Ok(())
}

/// Validate that a string is an absolute http(s) URL
pub fn validate_page_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(AssetError::invalid_config("URL cannot be empty".to_string()));
    }

    let parsed = Url::parse(url)
        .map_err(|e| AssetError::invalid_config(format!("Invalid URL '{}': {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AssetError::invalid_config(format!(
            "Unsupported URL '{}': expected an absolute http(s) URL",
            url
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_table_is_valid() {
        let config = JobConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].name, "premium-course");
        assert_eq!(config.targets[1].name, "free-course");
        assert_eq!(config.output_dir, PathBuf::from("assets"));
        assert_eq!(config.white_threshold, 240);
        assert!(config.logo.url.is_some());
        assert_eq!(config.fallback_host.as_deref(), Some("gumroadusercontent"));
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_builder_starts_empty() {
        let config = JobConfig::builder().build().unwrap();
        assert!(config.targets.is_empty());
        assert!(!config.logo.is_configured());
    }

    #[test]
    fn test_builder_rejects_bad_names() {
        for name in ["", "..", "a/b", "a\\b", "logo", "logo-original", "Logo", "LOGO-Original"] {
            let result = JobConfig::builder()
                .target(name, "https://shop.example/l/a")
                .build();
            assert!(result.is_err(), "name should be rejected: {:?}", name);
        }
    }

    #[test]
    fn test_builder_rejects_duplicate_names() {
        let err = JobConfig::builder()
            .target("course", "https://shop.example/l/a")
            .target("course", "https://shop.example/l/b")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate target name"));
    }

    #[test]
    fn test_builder_rejects_names_differing_in_case() {
        let err = JobConfig::builder()
            .target("Course", "https://shop.example/l/a")
            .target("course", "https://shop.example/l/b")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate target name"));
    }

    #[test]
    fn test_builder_rejects_unknown_reuse_target() {
        let err = JobConfig::builder()
            .target("course", "https://shop.example/l/a")
            .reuse_logo_from("missing")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("missing"));

        assert!(JobConfig::builder()
            .target("course", "https://shop.example/l/a")
            .reuse_logo_from("course")
            .build()
            .is_ok());
    }

    #[test]
    fn test_validate_page_url() {
        assert!(validate_page_url("https://shop.example/l/a").is_ok());
        assert!(validate_page_url("http://127.0.0.1:8080/page").is_ok());

        let invalid_urls = vec!["", "not-a-url", "ftp://shop.example/file", "/relative/path"];
        for url in invalid_urls {
            assert!(
                validate_page_url(url).is_err(),
                "URL should be invalid: {}",
                url
            );
        }
    }

    #[test]
    fn test_from_json_file_overlays_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("assets.json");
        std::fs::write(
            &path,
            r#"{
                "targets": [{ "name": "course", "url": "https://shop.example/l/a" }],
                "logo": { "reuse_target": "course" },
                "output_dir": "public/img"
            }"#,
        )
        .unwrap();

        let config = JobConfig::from_json_file(&path).unwrap();
        assert_eq!(config.targets, vec![PageTarget::new("course", "https://shop.example/l/a")]);
        assert_eq!(config.logo, LogoSource::reuse("course"));
        assert_eq!(config.output_dir, PathBuf::from("public/img"));
        assert_eq!(config.white_threshold, 240);
    }

    #[test]
    fn test_from_json_file_errors() {
        let temp_dir = TempDir::new().unwrap();

        let missing = JobConfig::from_json_file(temp_dir.path().join("missing.json")).unwrap_err();
        assert!(missing.to_string().contains("read config file"));

        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let broken = JobConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(broken, AssetError::InvalidConfig(_)));
    }
}
