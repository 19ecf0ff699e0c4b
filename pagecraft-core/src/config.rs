//! `pagecraft.yaml` loading with environment overrides.
//!
//! Every section has defaults, so an empty file (or none at all) is a valid
//! configuration.

use crate::error::ConfigError;
use pagecraft_render::RenderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pagecraft.yaml";

/// Longest cache TTL accepted; the cache only absorbs bursts of requests.
pub const MAX_CACHE_TTL_SECS: u64 = 60;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub cache: CacheConfig,
    pub social: SocialConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Directory,
    Http,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Directory of page JSON files, for the directory store.
    pub directory: PathBuf,
    /// Pages API root, for the HTTP store.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Directory,
            directory: PathBuf::from("pages"),
            base_url: None,
            timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 0 disables caching.
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 5,
            max_entries: 256,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// When unset, social leaves render sample content.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 5,
        }
    }
}

impl SocialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub max_depth: usize,
    pub max_nodes: usize,
    pub column_gap: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            max_depth: options.max_depth,
            max_nodes: options.max_nodes,
            column_gap: options.column_gap,
        }
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        RenderOptions {
            max_depth: config.max_depth,
            max_nodes: config.max_nodes,
            column_gap: config.column_gap,
        }
    }
}

impl Config {
    /// Loads `path`, or `pagecraft.yaml` from the working directory when it
    /// exists, then applies environment overrides. An explicit path that
    /// cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&text).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Applies `PAGECRAFT_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PAGECRAFT_API_URL").filter(|v| !v.is_empty()) {
            self.store.kind = StoreKind::Http;
            self.store.base_url = Some(url);
        }
        if let Some(dir) = lookup("PAGECRAFT_PAGES_DIR").filter(|v| !v.is_empty()) {
            self.store.kind = StoreKind::Directory;
            self.store.directory = PathBuf::from(dir);
        }
        if let Some(url) = lookup("PAGECRAFT_SOCIAL_URL").filter(|v| !v.is_empty()) {
            self.social.base_url = Some(url);
        }
        if let Some(ttl) = lookup("PAGECRAFT_CACHE_TTL_SECS") {
            match ttl.trim().parse() {
                Ok(secs) => self.cache.ttl_secs = secs,
                Err(_) => tracing::warn!("ignoring PAGECRAFT_CACHE_TTL_SECS={:?}", ttl),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.kind == StoreKind::Http && self.store.base_url.is_none() {
            return Err(ConfigError::Invalid(
                "store.kind is http but store.base_url is not set".to_string(),
            ));
        }
        if self.cache.ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "cache.ttl_secs must be at most {} (got {})",
                MAX_CACHE_TTL_SECS, self.cache.ttl_secs
            )));
        }
        if self.render.max_depth == 0 {
            return Err(ConfigError::Invalid("render.max_depth must be positive".to_string()));
        }
        if self.render.max_nodes == 0 {
            return Err(ConfigError::Invalid("render.max_nodes must be positive".to_string()));
        }
        if !self.render.column_gap.is_finite() || self.render.column_gap < 0.0 {
            return Err(ConfigError::Invalid(
                "render.column_gap must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from(&self.render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("# nothing\n").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::from_yaml(
            "store:\n  kind: http\n  base_url: https://api.example.com\ncache:\n  ttl_secs: 2\n",
        )
        .unwrap();
        assert_eq!(config.store.kind, StoreKind::Http);
        assert_eq!(config.store.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.store.timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 2);
        assert_eq!(config.cache.max_entries, 256);
        assert_eq!(config.render.max_depth, 64);
        assert_eq!(config.render.max_nodes, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PAGECRAFT_API_URL", "http://pages.internal"),
            ("PAGECRAFT_SOCIAL_URL", "http://social.internal"),
            ("PAGECRAFT_CACHE_TTL_SECS", "1"),
        ]);
        let mut config = Config::default();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.store.kind, StoreKind::Http);
        assert_eq!(config.store.base_url.as_deref(), Some("http://pages.internal"));
        assert_eq!(config.social.base_url.as_deref(), Some("http://social.internal"));
        assert_eq!(config.cache.ttl_secs, 1);
    }

    #[test]
    fn bad_ttl_override_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|name| (name == "PAGECRAFT_CACHE_TTL_SECS").then(|| "soon".to_string()));
        assert_eq!(config.cache.ttl_secs, 5);
    }

    #[test]
    fn validation_rejects_inconsistent_settings() {
        let config = Config::from_yaml("store:\n  kind: http\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config::from_yaml("cache:\n  ttl_secs: 600\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config::from_yaml("render:\n  max_nodes: 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        let config = Config::from_yaml("render:\n  max_nodes: 50\n").unwrap();
        assert_eq!(config.render_options().max_nodes, 50);
    }

    #[test]
    fn unknown_store_kind_is_a_parse_error() {
        let err = Config::from_yaml("store:\n  kind: redis\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagecraft.yaml");
        std::fs::write(&path, "render:\n  column_gap: 24\nsocial:\n  timeout_secs: 2\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.render_options().column_gap, 24.0);
        assert_eq!(config.social.timeout(), Duration::from_secs(2));
    }
}
