//! itemroute - resolve HTTP request paths to content repository nodes.
//!
//! # Module Structure
//!
//! | Module       | Purpose                                              |
//! |--------------|------------------------------------------------------|
//! | `core`       | Path joining, local path derivation, name decoding   |
//! | `context`    | Per-request state ([`context::RequestContext`])      |
//! | `repository` | Repository ports and the in-memory content tree      |
//! | `resolve`    | Candidate paths, secured lookups, fallbacks          |
//! | `config`     | `itemroute.toml` loading and validation              |
//! | `logger`     | `log!` / `debug!` macros                             |

pub mod logger;

pub mod config;
pub mod context;
pub mod core;
pub mod repository;
pub mod resolve;
