//! Capability traits consumed by the resolver.
//!
//! These ports define everything the resolver needs from the content
//! repository and the security layer. Implementations handle storage and
//! access-control internals; the resolver only sees [`ContentNode`]s.
//!
//! # Design Rules
//!
//! - Lookups are synchronous and may fail with [`RepositoryError`]
//! - "No such node" is `Ok(None)`, never an error
//! - All ports are `Send + Sync` so one resolver can serve many requests

use serde::Serialize;
use std::num::NonZeroU32;
use thiserror::Error;

use crate::context::{Database, Language};

// ============================================================================
// Node & Query
// ============================================================================

/// Name of the wildcard placeholder item.
pub const WILDCARD_NAME: &str = "*";

/// A reference to a node in the content repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentNode {
    /// Full path (e.g., `/sitecore/content/site1/home`)
    pub path: String,
    /// Internal item name (last path segment)
    pub name: String,
    /// Human-readable name, if it differs from `name`
    pub display_name: Option<String>,
    /// Read flag as recorded by the repository
    pub can_read: bool,
}

impl ContentNode {
    /// Check if this node is a wildcard placeholder (`*`).
    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD_NAME
    }

    /// Display name, falling back to the item name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Which version of a node to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    #[default]
    Latest,
    Numbered(NonZeroU32),
}

/// Whether the storage layer applies its own security checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityMode {
    /// Storage returns nodes regardless of access rights.
    #[default]
    Bypass,
    /// Storage hides nodes the caller may not read.
    Enforce,
}

/// Parameters for a single repository lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    pub database: Database,
    pub language: Language,
    pub version: VersionPolicy,
    pub security: SecurityMode,
}

impl ItemQuery {
    /// Latest version, storage security bypassed.
    pub fn bypass(database: Database, language: Language) -> Self {
        Self {
            database,
            language,
            version: VersionPolicy::Latest,
            security: SecurityMode::Bypass,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Faults raised by repository collaborators.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("content database `{0}` does not exist")]
    UnknownDatabase(String),

    #[error("content repository unavailable: {0}")]
    Unavailable(String),

    #[error("repository backend error: {0}")]
    Backend(String),
}

// ============================================================================
// Ports
// ============================================================================

/// Path-based node lookup.
pub trait ContentRepository: Send + Sync {
    /// Load the node stored at `path`, or `None` if there is none.
    fn get_item(&self, path: &str, query: &ItemQuery)
    -> Result<Option<ContentNode>, RepositoryError>;
}

/// Read-permission evaluation.
pub trait PermissionChecker: Send + Sync {
    /// Check whether the current user may read `node`.
    fn can_read(&self, node: &ContentNode) -> Result<bool, RepositoryError>;
}

/// Name-or-display-name lookup below an anchor node.
pub trait DisplayNameLookup: Send + Sync {
    /// Resolve `remainder` (e.g., `/About Us/Team`) segment by segment under
    /// `anchor`, accepting exact or display-name matches.
    fn resolve_under(
        &self,
        remainder: &str,
        anchor: &ContentNode,
        query: &ItemQuery,
    ) -> Result<Option<ContentNode>, RepositoryError>;
}

/// Permission checker that trusts the node's recorded read flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFlagPermissions;

impl PermissionChecker for NodeFlagPermissions {
    fn can_read(&self, node: &ContentNode) -> Result<bool, RepositoryError> {
        Ok(node.can_read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, display: Option<&str>) -> ContentNode {
        ContentNode {
            path: format!("/content/{name}"),
            name: name.to_string(),
            display_name: display.map(str::to_string),
            can_read: true,
        }
    }

    #[test]
    fn test_wildcard_detection() {
        assert!(node("*", None).is_wildcard());
        assert!(!node("home", None).is_wildcard());
        assert!(!node("**", None).is_wildcard());
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(node("about-us", Some("About Us")).display_name(), "About Us");
        assert_eq!(node("home", None).display_name(), "home");
    }

    #[test]
    fn test_node_flag_permissions() {
        let mut secret = node("secret", None);
        assert!(NodeFlagPermissions.can_read(&secret).unwrap());
        secret.can_read = false;
        assert!(!NodeFlagPermissions.can_read(&secret).unwrap());
    }

    #[test]
    fn test_bypass_query_defaults() {
        let query = ItemQuery::bypass(Database::new("web"), Language::new("en"));
        assert_eq!(query.version, VersionPolicy::Latest);
        assert_eq!(query.security, SecurityMode::Bypass);
    }
}
