//! Exact-path lookup with a read check.

use std::sync::Arc;

use super::Lookup;
use crate::repository::{ContentRepository, ItemQuery, PermissionChecker, RepositoryError};

/// Strategy resolving one candidate path.
pub trait NodeResolver: Send + Sync {
    fn try_resolve(&self, path: &str, query: &ItemQuery) -> Result<Lookup, RepositoryError>;
}

/// Looks the path up with storage security bypassed, then applies its own
/// read check so that denial can be told apart from absence.
pub struct SecuredNodeResolver {
    repository: Arc<dyn ContentRepository>,
    permissions: Arc<dyn PermissionChecker>,
}

impl SecuredNodeResolver {
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        permissions: Arc<dyn PermissionChecker>,
    ) -> Self {
        Self {
            repository,
            permissions,
        }
    }
}

impl NodeResolver for SecuredNodeResolver {
    fn try_resolve(&self, path: &str, query: &ItemQuery) -> Result<Lookup, RepositoryError> {
        let Some(node) = self.repository.get_item(path, query)? else {
            return Ok(Lookup::NotFound);
        };

        if self.permissions.can_read(&node)? {
            Ok(Lookup::Found(node))
        } else {
            Ok(Lookup::PermissionDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Database, Language};
    use crate::core::NameDecoder;
    use crate::repository::{
        BestMatch, ContentNode, ItemFixture, MemoryRepository, NodeFlagPermissions,
        SecurityMode,
    };

    fn resolver() -> SecuredNodeResolver {
        let repo = MemoryRepository::new(BestMatch::Enabled, NameDecoder::default());
        repo.insert("web", &ItemFixture::new("/site/home")).unwrap();
        repo.insert("web", &ItemFixture::new("/site/home/secret").unreadable())
            .unwrap();
        SecuredNodeResolver::new(Arc::new(repo), Arc::new(NodeFlagPermissions))
    }

    fn query() -> ItemQuery {
        ItemQuery::bypass(Database::new("web"), Language::new("en"))
    }

    #[test]
    fn test_found() {
        let lookup = resolver().try_resolve("/site/home", &query()).unwrap();
        assert!(matches!(lookup, Lookup::Found(node) if node.name == "home"));
    }

    #[test]
    fn test_not_found() {
        let lookup = resolver().try_resolve("/site/missing", &query()).unwrap();
        assert_eq!(lookup, Lookup::NotFound);
    }

    #[test]
    fn test_denied_hides_node() {
        let lookup = resolver()
            .try_resolve("/site/home/secret", &query())
            .unwrap();
        assert_eq!(lookup, Lookup::PermissionDenied);
    }

    struct RefuseAll;

    impl PermissionChecker for RefuseAll {
        fn can_read(&self, _node: &ContentNode) -> Result<bool, RepositoryError> {
            Err(RepositoryError::Backend("acl store offline".to_string()))
        }
    }

    #[test]
    fn test_permission_fault_propagates() {
        let repo = MemoryRepository::default();
        repo.insert("web", &ItemFixture::new("/site")).unwrap();
        let resolver = SecuredNodeResolver::new(Arc::new(repo), Arc::new(RefuseAll));
        assert!(resolver.try_resolve("/site", &query()).is_err());
    }

    #[test]
    fn test_lookup_bypasses_storage_security() {
        let mut query = query();
        query.security = SecurityMode::Enforce;
        // Enforced storage hides the node entirely; bypass is what yields denial
        let lookup = resolver()
            .try_resolve("/site/home/secret", &query)
            .unwrap();
        assert_eq!(lookup, Lookup::NotFound);
    }
}
