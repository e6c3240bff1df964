//! Request-scoped context.
//!
//! [`RequestContext`] is the typed capability through which the resolver
//! reads the current site, database and language, and writes back the
//! resolved item. [`RequestState`] is the plain-struct adapter used by the
//! CLI, the dev server and the tests.

mod path;
mod state;

pub use path::RequestPathInfo;
pub use state::{RequestState, parse_use_site_start_path};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::repository::ContentNode;

/// Query parameter that opts a request into the start-path fallback.
pub const USE_SITE_START_PATH_PARAM: &str = "sc_usesitestartpath";

// ============================================================================
// Identifiers
// ============================================================================

/// Content database name (e.g., `web`, `master`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Database(Arc<str>);

impl Database {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content language (e.g., `en`, `da-DK`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(Arc<str>);

impl Language {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Site
// ============================================================================

/// Site bound to the request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SiteDescriptor {
    pub name: String,
    /// Repository path of the site root (e.g., `/sitecore/content/site1`)
    pub root_path: String,
    /// Repository path of the start item (usually `root_path + start_item`)
    pub start_path: String,
    /// Start item relative to the root (e.g., `/home`)
    pub start_item: String,
}

// ============================================================================
// Capability
// ============================================================================

/// Typed access to the request-scoped slots the resolver needs.
///
/// Only the orchestrator's write-back calls the setters.
pub trait RequestContext {
    fn path_info(&self) -> &RequestPathInfo;

    fn site(&self) -> Option<&SiteDescriptor>;

    fn database(&self) -> Option<&Database>;

    fn language(&self) -> &Language;

    fn current_item(&self) -> Option<&ContentNode>;

    /// Whether the request opted into the start-path fallback.
    fn use_site_start_path(&self) -> bool;

    fn set_current_item(&mut self, item: Option<ContentNode>);

    fn set_permission_denied(&mut self, denied: bool);
}
