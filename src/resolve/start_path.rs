//! Site start path fallback.

use super::{Lookup, NodeResolver};
use crate::context::SiteDescriptor;
use crate::repository::{ItemQuery, RepositoryError};

/// Resolve the site's start path as a last resort.
///
/// Without a site, or with an empty start path, nothing is looked up.
pub fn resolve_start_path(
    nodes: &dyn NodeResolver,
    site: Option<&SiteDescriptor>,
    query: &ItemQuery,
) -> Result<Lookup, RepositoryError> {
    match site {
        Some(site) if !site.start_path.is_empty() => nodes.try_resolve(&site.start_path, query),
        _ => Ok(Lookup::NotFound),
    }
}
