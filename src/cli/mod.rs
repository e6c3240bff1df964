//! Command-line interface module.

mod args;
pub mod candidates;
pub mod common;
pub mod resolve;
pub mod serve;

pub use args::{Cli, Commands, ResolveArgs};
