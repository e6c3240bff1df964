//! `[site]` section configuration.
//!
//! Optional: without it, requests are resolved with no site bound.
//!
//! ```toml
//! [site]
//! name = "site1"
//! root_path = "/sitecore/content/site1"
//! start_item = "/home"
//! # start_path defaults to root_path + start_item
//! ```

use serde::{Deserialize, Serialize};

use crate::context::SiteDescriptor;
use crate::core::join_path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,

    /// Repository path of the site root.
    pub root_path: String,

    /// Start item, relative to the root.
    pub start_item: String,

    /// Explicit start path (overrides root_path + start_item).
    pub start_path: Option<String>,
}

impl SiteConfig {
    pub fn descriptor(&self) -> SiteDescriptor {
        let start_path = self
            .start_path
            .clone()
            .unwrap_or_else(|| join_path(&self.root_path, &self.start_item));

        SiteDescriptor {
            name: self.name.clone(),
            root_path: self.root_path.clone(),
            start_path,
            start_item: self.start_item.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_site_descriptor_derives_start_path() {
        let config = test_parse_config(
            "[site]\nname = \"site1\"\nroot_path = \"/sitecore/content/site1\"\nstart_item = \"/home\"",
        );
        let site = config.site_descriptor().unwrap();

        assert_eq!(site.name, "site1");
        assert_eq!(site.start_path, "/sitecore/content/site1/home");
    }

    #[test]
    fn test_explicit_start_path_wins() {
        let config = test_parse_config(
            "[site]\nroot_path = \"/content\"\nstart_item = \"/home\"\nstart_path = \"/content/landing\"",
        );
        assert_eq!(config.site_descriptor().unwrap().start_path, "/content/landing");
    }

    #[test]
    fn test_no_site_section() {
        assert!(test_parse_config("").site_descriptor().is_none());
    }
}
