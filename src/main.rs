//! itemroute - resolve request URLs to content repository items.

mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};

use cli::{Cli, Commands, common::Router};
use itemroute::config::RouteConfig;
use itemroute::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let mut config = RouteConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Resolve { args } => cli::resolve::run_resolve(args, &Router::new(config)?),
        Commands::Candidates { url } => cli::candidates::run_candidates(url, &Router::new(config)?),
        Commands::Serve { interface, port } => {
            // Ctrl+C handler first, so shutdown works as soon as the server binds
            cli::serve::setup_shutdown_handler()?;

            if let Some(interface) = interface {
                config.serve.interface = *interface;
            }
            if let Some(port) = port {
                config.serve.port = *port;
            }

            let router = Arc::new(Router::new(config)?);
            cli::serve::bind_server(&router)?.run(router)
        }
    }
}
