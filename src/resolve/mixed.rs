//! Display-name fallback.
//!
//! Used when exact resolution fails or lands on a wildcard item. Each
//! attempt pairs an anchor item with a remainder that is matched segment by
//! segment against item names or display names:
//!
//! | # | Anchor                         | Remainder            |
//! |---|--------------------------------|----------------------|
//! | 1 | site root path                 | local path           |
//! | 2 | first segment of the item path | rest of item path    |
//! | 3 | first segment of local path    | rest of local path   |
//!
//! Lookups bypass storage security; the read check runs once, on the result.

use std::sync::Arc;

use super::{DisplayNameOutcome, ResolveRequest};
use crate::core::split_anchor;
use crate::debug;
use crate::repository::{
    ContentNode, ContentRepository, DisplayNameLookup, ItemQuery, PermissionChecker,
    RepositoryError,
};

/// Strategy for the display-name fallback.
pub trait DisplayNameFallback: Send + Sync {
    fn resolve_by_display_name(
        &self,
        request: &ResolveRequest,
    ) -> Result<DisplayNameOutcome, RepositoryError>;
}

/// Default display-name fallback.
pub struct MixedNameResolver {
    repository: Arc<dyn ContentRepository>,
    names: Arc<dyn DisplayNameLookup>,
    permissions: Arc<dyn PermissionChecker>,
}

impl MixedNameResolver {
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        names: Arc<dyn DisplayNameLookup>,
        permissions: Arc<dyn PermissionChecker>,
    ) -> Self {
        Self {
            repository,
            names,
            permissions,
        }
    }

    /// Resolve `remainder` under the item at `anchor_path`.
    fn resolve_anchored(
        &self,
        anchor_path: &str,
        remainder: &str,
        query: &ItemQuery,
    ) -> Result<Option<ContentNode>, RepositoryError> {
        match self.repository.get_item(anchor_path, query)? {
            Some(anchor) => self.names.resolve_under(remainder, &anchor, query),
            None => Ok(None),
        }
    }

    /// Split `path` at its first segment and resolve the rest under it.
    fn resolve_self_anchored(
        &self,
        path: &str,
        query: &ItemQuery,
    ) -> Result<Option<ContentNode>, RepositoryError> {
        match split_anchor(path) {
            Some((anchor, remainder)) => self.resolve_anchored(anchor, remainder, query),
            None => Ok(None),
        }
    }

    fn find(
        &self,
        request: &ResolveRequest,
    ) -> Result<Option<(ContentNode, String)>, RepositoryError> {
        let info = &request.path_info;

        if let Some(site) = &request.site
            && !site.root_path.is_empty()
            && let Some(node) =
                self.resolve_anchored(&site.root_path, &info.local_path, &request.query)?
        {
            return Ok(Some((node, info.local_path.clone())));
        }

        for path in [&info.raw_item_path, &info.local_path] {
            if let Some(node) = self.resolve_self_anchored(path, &request.query)? {
                return Ok(Some((node, path.clone())));
            }
        }

        Ok(None)
    }
}

impl DisplayNameFallback for MixedNameResolver {
    fn resolve_by_display_name(
        &self,
        request: &ResolveRequest,
    ) -> Result<DisplayNameOutcome, RepositoryError> {
        let Some((node, attempt)) = self.find(request)? else {
            debug!("resolve"; "display name: no match");
            return Ok(DisplayNameOutcome::NotFound);
        };

        if !self.permissions.can_read(&node)? {
            debug!("denied"; "display name: {} not readable", attempt);
            return Ok(DisplayNameOutcome::Denied);
        }

        debug!("resolve"; "display name: {} -> {}", attempt, node.path);
        Ok(DisplayNameOutcome::Found { node, attempt })
    }
}
