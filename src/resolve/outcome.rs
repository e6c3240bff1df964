//! Resolution results and errors.

use serde::Serialize;
use thiserror::Error;

use crate::repository::{ContentNode, RepositoryError};

/// Result of a single secured lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(ContentNode),
    NotFound,
    /// A node exists but may not be read. The node itself is withheld.
    PermissionDenied,
}

/// Result of the display-name fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNameOutcome {
    Found {
        node: ContentNode,
        /// The request path the node was resolved from
        attempt: String,
    },
    NotFound,
    Denied,
}

/// Which strategy produced the resolved node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvedVia {
    Candidate,
    DisplayName,
    StartPath,
}

/// Final outcome of one request's resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ResolutionOutcome {
    Found {
        node: ContentNode,
        matched_path: String,
        via: ResolvedVia,
    },
    NotFound,
    PermissionDenied,
}

impl ResolutionOutcome {
    pub fn node(&self) -> Option<&ContentNode> {
        match self {
            Self::Found { node, .. } => Some(node),
            _ => None,
        }
    }
}

/// Errors raised by [`ItemResolver`](super::ItemResolver).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A required collaborator was not supplied.
    #[error("invalid argument: missing {0}")]
    InvalidArgument(&'static str),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
