//! `candidates` command: show the candidate paths for a URL.

use anyhow::Result;
use owo_colors::OwoColorize;
use rustc_hash::FxHashSet;

use itemroute::context::RequestContext;

use super::common::Router;

pub fn run_candidates(url: &str, router: &Router) -> Result<()> {
    let state = router.request_state(url)?;
    let candidates = router.resolver.candidates(state.path_info(), state.site());

    for (index, (path, duplicate)) in mark_duplicates(candidates.as_slice()).enumerate() {
        if duplicate {
            println!("{:>2}  {}  {}", index + 1, path.dimmed(), "(duplicate)".dimmed());
        } else {
            println!("{:>2}  {}", index + 1, path);
        }
    }
    Ok(())
}

/// Pair each candidate with whether an earlier entry had the same path.
fn mark_duplicates(candidates: &[String]) -> impl Iterator<Item = (&str, bool)> {
    let mut seen = FxHashSet::default();
    candidates
        .iter()
        .map(move |path| (path.as_str(), !seen.insert(path.as_str())))
}
