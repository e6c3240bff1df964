//! `[request]` section configuration.
//!
//! Defaults bound to every request before resolution.
//!
//! ```toml
//! [request]
//! database = "web"
//! language = "en"
//! ```

use serde::{Deserialize, Serialize};

use crate::context::{Database, Language};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Content database bound to requests.
    pub database: String,

    /// Content language bound to requests.
    pub language: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            database: "web".to_string(),
            language: "en".to_string(),
        }
    }
}

impl RequestConfig {
    pub fn database(&self) -> Database {
        Database::new(&self.database)
    }

    pub fn language(&self) -> Language {
        Language::new(&self.language)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_request_config() {
        let config = test_parse_config("[request]\ndatabase = \"master\"\nlanguage = \"da\"");
        assert_eq!(config.request.database().name(), "master");
        assert_eq!(config.request.language().name(), "da");
    }

    #[test]
    fn test_request_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.request.database, "web");
        assert_eq!(config.request.language, "en");
    }
}
