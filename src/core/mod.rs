//! Path and name primitives shared by the resolver.
//!
//! - [`url`]: Path joining, anchor splitting, local path derivation
//! - [`name`]: Percent/name decoding ([`NameDecoder`])

mod name;
mod url;

pub use name::{NameDecoder, NameReplacement};
pub use url::{join_path, local_path, split_anchor, split_query};
