//! Content repository capabilities.
//!
//! - [`ports`]: Traits the resolver consumes (`ContentRepository`,
//!   `PermissionChecker`, `DisplayNameLookup`) and the node/query types
//! - [`memory`]: In-memory reference implementation loaded from TOML

pub mod memory;
pub mod ports;

pub use memory::{BestMatch, ContentFixture, ItemFixture, MemoryRepository};
pub use ports::{
    ContentNode, ContentRepository, DisplayNameLookup, ItemQuery, NodeFlagPermissions,
    PermissionChecker, RepositoryError, SecurityMode, VersionPolicy, WILDCARD_NAME,
};
