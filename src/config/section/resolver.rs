//! `[resolver]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [resolver]
//! find_best_match = "enabled"     # disabled | enabled | deep-scan
//! strip_extensions = ["aspx"]     # Removed from the last URL segment
//!
//! [[resolver.name_replacement]]
//! find = " "
//! replace_with = "-"
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{NameDecoder, NameReplacement};
use crate::repository::BestMatch;

/// Resolver behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Sibling selection for display-name lookups.
    pub find_best_match: BestMatch,

    /// Extensions stripped from the last segment of the local path.
    pub strip_extensions: Vec<String>,

    /// Encode-time character replacements, undone when decoding names.
    pub name_replacement: Vec<NameReplacement>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            find_best_match: BestMatch::Enabled,
            strip_extensions: vec!["aspx".to_string()],
            name_replacement: Vec::new(),
        }
    }
}

impl ResolverConfig {
    pub fn decoder(&self) -> NameDecoder {
        NameDecoder::new(self.name_replacement.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::repository::BestMatch;

    #[test]
    fn test_resolver_config() {
        let config = test_parse_config(
            "[resolver]\nfind_best_match = \"deep-scan\"\nstrip_extensions = []\n\
             [[resolver.name_replacement]]\nfind = \" \"\nreplace_with = \"-\"",
        );

        assert_eq!(config.resolver.find_best_match, BestMatch::DeepScan);
        assert!(config.resolver.strip_extensions.is_empty());
        assert_eq!(config.resolver.decoder().decode("/about-us"), "/about us");
    }

    #[test]
    fn test_resolver_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.resolver.find_best_match, BestMatch::Enabled);
        assert_eq!(config.resolver.strip_extensions, vec!["aspx"]);
        assert_eq!(config.resolver.decoder().decode("/about-us"), "/about-us");
    }
}
