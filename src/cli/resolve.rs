//! `resolve` command: resolve one URL and print the outcome.

use anyhow::Result;
use serde_json::json;

use itemroute::context::{RequestContext, RequestState};
use itemroute::log;
use itemroute::resolve::ResolutionOutcome;

use super::args::ResolveArgs;
use super::common::Router;

pub fn run_resolve(args: &ResolveArgs, router: &Router) -> Result<()> {
    let mut state = router.request_state(&args.url)?;
    if args.no_database {
        state.database = None;
    }
    if let Some(path) = &args.current_item {
        state.current_item = Some(router.bound_node(path)?);
    }

    let outcome = router.resolver.resolve(&mut state)?;
    log_outcome(&args.url, outcome.as_ref());

    let report = report(&args.url, &state, outcome.as_ref());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// JSON document describing a request and how it resolved.
///
/// `outcome` is `null` when resolution was skipped.
pub fn report(
    url: &str,
    state: &RequestState,
    outcome: Option<&ResolutionOutcome>,
) -> serde_json::Value {
    json!({
        "url": url,
        "path": state.path_info(),
        "site": state.site().map(|site| site.name.as_str()),
        "database": state.database(),
        "language": state.language(),
        "outcome": outcome,
        "current_item": state.current_item(),
        "permission_denied": state.permission_denied,
    })
}

fn log_outcome(url: &str, outcome: Option<&ResolutionOutcome>) {
    match outcome {
        Some(ResolutionOutcome::PermissionDenied) => log!("denied"; "{url} -> {}", summary(outcome)),
        _ => log!("resolve"; "{url} -> {}", summary(outcome)),
    }
}

/// One-line description of an outcome.
fn summary(outcome: Option<&ResolutionOutcome>) -> String {
    match outcome {
        None => "skipped".to_string(),
        Some(ResolutionOutcome::Found { node, via, .. }) => {
            format!("{} \"{}\" (via {via:?})", node.path, node.display_name())
        }
        Some(ResolutionOutcome::NotFound) => "not found".to_string(),
        Some(ResolutionOutcome::PermissionDenied) => "permission denied".to_string(),
    }
}
