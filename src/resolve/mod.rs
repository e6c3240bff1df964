//! Request path to content item resolution.
//!
//! # Strategies
//!
//! | Stage | Trait                   | Default               |
//! |-------|-------------------------|-----------------------|
//! | 1     | [`CandidateGenerator`]  | [`PathCandidates`]    |
//! | 2     | [`NodeResolver`]        | [`SecuredNodeResolver`] |
//! | 3     | [`DisplayNameFallback`] | [`MixedNameResolver`] |
//! | 4     | start path              | [`resolve_start_path`] |
//!
//! [`ItemResolver`] runs the stages in order. A permission denial at any
//! stage ends resolution; later stages never run.
//!
//! # Usage
//!
//! ```ignore
//! let resolver = ItemResolver::builder()
//!     .repository(repo.clone())
//!     .display_name_lookup(repo)
//!     .permissions(Arc::new(NodeFlagPermissions))
//!     .build()?;
//!
//! let outcome = resolver.resolve(&mut state)?;
//! ```

mod candidates;
mod mixed;
mod node;
mod outcome;
mod resolver;
mod start_path;

#[cfg(test)]
mod tests;

pub use candidates::{CandidateGenerator, CandidateList, PathCandidates};
pub use mixed::{DisplayNameFallback, MixedNameResolver};
pub use node::{NodeResolver, SecuredNodeResolver};
pub use outcome::{DisplayNameOutcome, Lookup, ResolutionOutcome, ResolveError, ResolvedVia};
pub use resolver::{ItemResolver, ItemResolverBuilder, ResolveRequest};
pub use start_path::resolve_start_path;
