//! Route configuration management for `itemroute.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── resolver   # [resolver]
//! │   ├── request    # [request]
//! │   ├── serve      # [serve]
//! │   └── site       # [site]
//! ├── error          # ConfigError
//! ├── util           # Upward config file search
//! └── mod.rs         # RouteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section       | Purpose                                          |
//! |---------------|--------------------------------------------------|
//! | `content`     | Content fixture file, relative to the config     |
//! | `[resolver]`  | Best match policy, extensions, name replacements |
//! | `[request]`   | Database and language bound to every request     |
//! | `[site]`      | Optional site binding (root, start item)         |
//! | `[serve]`     | Development server (interface, port, threads)    |

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{RequestConfig, ResolverConfig, ServeConfig, SiteConfig};
pub use util::{find_config_file, find_config_from};

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::context::SiteDescriptor;
use crate::core::NameDecoder;
use crate::log;

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "itemroute.toml";

// ============================================================================
// RouteConfig
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Path of the loaded config file (empty when running on defaults).
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    root: PathBuf,

    /// Content fixture file (TOML).
    pub content: Option<PathBuf>,

    pub resolver: ResolverConfig,

    pub request: RequestConfig,

    pub site: Option<SiteConfig>,

    pub serve: ServeConfig,
}

impl RouteConfig {
    /// Load configuration by searching upward from cwd for `config_name`.
    ///
    /// A missing file is not an error: defaults are used with cwd as root.
    pub fn load(config_name: &Path) -> Result<Self> {
        let mut config = match find_config_file(config_name) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config.root = root;
                config
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", config_name.display());
                let cwd =
                    std::env::current_dir().context("Failed to get current working directory")?;
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.normalize_paths();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    fn normalize_paths(&mut self) {
        if let Some(content) = &self.content
            && content.is_relative()
        {
            self.content = Some(self.root.join(content));
        }
    }

    /// Reject values the resolver cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(ConfigError::Validation(msg).into()) };

        if self.request.database.trim().is_empty() {
            return invalid("`request.database` must not be empty".into());
        }
        if self.request.language.trim().is_empty() {
            return invalid("`request.language` must not be empty".into());
        }
        if self.serve.threads == 0 {
            return invalid("`serve.threads` must be at least 1".into());
        }
        if let Some(ext) = self
            .resolver
            .strip_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return invalid(format!(
                "`resolver.strip_extensions` entry `{ext}` must be a bare extension like `aspx`"
            ));
        }
        if self
            .resolver
            .name_replacement
            .iter()
            .any(|r| r.find.is_empty())
        {
            return invalid("`resolver.name_replacement.find` must not be empty".into());
        }
        if let Some(site) = &self.site
            && !site.root_path.is_empty()
            && !site.root_path.starts_with('/')
        {
            return invalid(format!(
                "`site.root_path` must be absolute, got `{}`",
                site.root_path
            ));
        }

        Ok(())
    }

    /// Site bound to requests, if configured.
    pub fn site_descriptor(&self) -> Option<SiteDescriptor> {
        self.site.as_ref().map(SiteConfig::descriptor)
    }

    pub fn decoder(&self) -> NameDecoder {
        self.resolver.decoder()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> RouteConfig {
    let (parsed, ignored) = RouteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
