//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve request URLs to content repository items
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print version (`-V` is taken by --verbose)
    #[arg(long, action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: itemroute.toml)
    #[arg(short = 'C', long, global = true, default_value = "itemroute.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve a single URL and print the outcome as JSON
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Print the candidate paths tried for a URL, in order
    #[command(visible_alias = "c")]
    Candidates {
        /// Request URL or path (e.g., `/about-us.aspx?sc_usesitestartpath=true`)
        url: String,
    },

    /// Start an HTTP server answering every request with its resolution
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Request URL or path (e.g., `http://localhost/about-us.aspx`)
    pub url: String,

    /// Bind an item before resolving (resolution is then skipped)
    #[arg(long, value_name = "PATH")]
    pub current_item: Option<String>,

    /// Resolve without a bound database (resolution is then skipped)
    #[arg(long)]
    pub no_database: bool,
}
