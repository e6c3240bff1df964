//! Resolution orchestrator.
//!
//! ```text
//! skip? ──yes──▶ return (context untouched)
//!   │no
//!   ▼
//! candidates ──Found──▶ (wildcard?) ──no──▶ write-back
//!   │NotFound*            │yes
//!   ▼                     ▼
//! display name ◀──────────┘ ──Found/NotFound──▶ start path? ──▶ write-back
//!
//! PermissionDenied at any stage ──▶ write-back (no item, denied)
//! ```
//!
//! The write-back runs from a drop guard, so it also happens when a
//! collaborator fails or a panic unwinds through the resolver.

use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashSet;

use super::{
    CandidateGenerator, CandidateList, DisplayNameFallback, DisplayNameOutcome, Lookup,
    MixedNameResolver, NodeResolver, PathCandidates, ResolutionOutcome, ResolveError,
    ResolvedVia, SecuredNodeResolver, resolve_start_path,
};
use crate::context::{RequestContext, RequestPathInfo, SiteDescriptor};
use crate::core::NameDecoder;
use crate::repository::{
    ContentNode, ContentRepository, DisplayNameLookup, ItemQuery, PermissionChecker,
    RepositoryError,
};
use crate::{debug, debug_do};

// ============================================================================
// Request Snapshot
// ============================================================================

/// Immutable inputs of one resolution, captured from the request context.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub path_info: RequestPathInfo,
    pub site: Option<SiteDescriptor>,
    pub query: ItemQuery,
    pub use_site_start_path: bool,
}

impl ResolveRequest {
    /// Capture the inputs, or `None` when resolution must be skipped:
    /// an item is already bound, no database is bound, or the item path is empty.
    pub fn capture<C: RequestContext + ?Sized>(ctx: &C) -> Option<Self> {
        if ctx.current_item().is_some() || ctx.path_info().raw_item_path.is_empty() {
            return None;
        }
        let database = ctx.database()?.clone();

        Some(Self {
            path_info: ctx.path_info().clone(),
            site: ctx.site().cloned(),
            query: ItemQuery::bypass(database, ctx.language().clone()),
            use_site_start_path: ctx.use_site_start_path(),
        })
    }
}

// ============================================================================
// Write-back
// ============================================================================

/// Resolution state known so far.
#[derive(Debug, Default)]
struct Progress {
    found: Option<(ContentNode, String, ResolvedVia)>,
    denied: bool,
}

impl Progress {
    fn record(&mut self, node: ContentNode, matched_path: String, via: ResolvedVia) {
        self.found = Some((node, matched_path, via));
    }

    fn deny(&mut self) {
        self.found = None;
        self.denied = true;
    }

    fn needs_display_name(&self) -> bool {
        self.found
            .as_ref()
            .is_none_or(|(node, _, _)| node.is_wildcard())
    }

    fn outcome(&self) -> ResolutionOutcome {
        match &self.found {
            _ if self.denied => ResolutionOutcome::PermissionDenied,
            Some((node, matched_path, via)) => ResolutionOutcome::Found {
                node: node.clone(),
                matched_path: matched_path.clone(),
                via: *via,
            },
            None => ResolutionOutcome::NotFound,
        }
    }
}

/// Writes the item and the denial flag back to the context when dropped.
struct WriteBack<'a, C: RequestContext + ?Sized> {
    ctx: &'a mut C,
    progress: Progress,
}

impl<'a, C: RequestContext + ?Sized> WriteBack<'a, C> {
    fn new(ctx: &'a mut C) -> Self {
        Self {
            ctx,
            progress: Progress::default(),
        }
    }
}

impl<C: RequestContext + ?Sized> Drop for WriteBack<'_, C> {
    fn drop(&mut self) {
        let item = self.progress.found.take().map(|(node, _, _)| node);
        self.ctx.set_current_item(item);
        self.ctx.set_permission_denied(self.progress.denied);
    }
}

// ============================================================================
// ItemResolver
// ============================================================================

/// Resolves a request's path to a content item.
///
/// Holds only its strategies, so one instance can be shared across
/// concurrent requests.
pub struct ItemResolver {
    candidates: Box<dyn CandidateGenerator>,
    nodes: Box<dyn NodeResolver>,
    display_names: Box<dyn DisplayNameFallback>,
}

impl ItemResolver {
    pub fn builder() -> ItemResolverBuilder {
        ItemResolverBuilder::default()
    }

    /// Candidate paths for the given request, in priority order.
    pub fn candidates(
        &self,
        info: &RequestPathInfo,
        site: Option<&SiteDescriptor>,
    ) -> CandidateList {
        self.candidates.generate(info, site)
    }

    /// Resolve the request bound to `ctx`.
    ///
    /// Returns `Ok(None)` when resolution was skipped; the context is then
    /// left untouched. Otherwise the context's current item and denial flag
    /// are written exactly once, including on the error path.
    pub fn resolve<C: RequestContext + ?Sized>(
        &self,
        ctx: &mut C,
    ) -> Result<Option<ResolutionOutcome>, ResolveError> {
        let Some(request) = ResolveRequest::capture(&*ctx) else {
            debug!("resolve"; "skipped");
            return Ok(None);
        };

        let started = Instant::now();
        let mut guard = WriteBack::new(ctx);
        let result = self.run(&request, &mut guard.progress);
        let outcome = guard.progress.outcome();

        debug_do! {
            debug!(
                "resolve";
                "{} -> {:?} in {:?}",
                request.path_info.raw_item_path,
                outcome,
                started.elapsed()
            );
        }

        drop(guard);
        result?;
        Ok(Some(outcome))
    }

    fn run(
        &self,
        request: &ResolveRequest,
        progress: &mut Progress,
    ) -> Result<(), RepositoryError> {
        let candidates = self
            .candidates
            .generate(&request.path_info, request.site.as_ref());

        let mut tried = FxHashSet::default();
        for candidate in candidates {
            if tried.contains(&candidate) {
                continue;
            }
            match self.nodes.try_resolve(&candidate, &request.query)? {
                Lookup::Found(node) => {
                    debug!("resolve"; "{} -> {}", candidate, node.path);
                    progress.record(node, candidate, ResolvedVia::Candidate);
                    break;
                }
                Lookup::PermissionDenied => {
                    debug!("denied"; "{}", candidate);
                    progress.deny();
                    return Ok(());
                }
                Lookup::NotFound => {
                    debug!("resolve"; "{} -> not found", candidate);
                    tried.insert(candidate);
                }
            }
        }

        if progress.needs_display_name() {
            match self.display_names.resolve_by_display_name(request)? {
                DisplayNameOutcome::Found { node, attempt } => {
                    progress.record(node, attempt, ResolvedVia::DisplayName);
                }
                DisplayNameOutcome::Denied => {
                    progress.deny();
                    return Ok(());
                }
                DisplayNameOutcome::NotFound => {}
            }
        }

        if progress.found.is_none() && request.use_site_start_path {
            let site = request.site.as_ref();
            // A start path already tried as a candidate was not found then.
            if site.is_some_and(|s| tried.contains(&s.start_path)) {
                debug!("resolve"; "start path already tried");
                return Ok(());
            }
            match resolve_start_path(self.nodes.as_ref(), site, &request.query)? {
                Lookup::Found(node) => {
                    let start_path = site.map(|s| s.start_path.clone()).unwrap_or_default();
                    debug!("resolve"; "start path -> {}", node.path);
                    progress.record(node, start_path, ResolvedVia::StartPath);
                }
                Lookup::PermissionDenied => {
                    debug!("denied"; "start path");
                    progress.deny();
                }
                Lookup::NotFound => {}
            }
        }

        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Composes an [`ItemResolver`] from collaborators or custom strategies.
///
/// Default strategies are built from the repository, permission checker and
/// display-name lookup; a strategy supplied directly replaces its default.
#[derive(Default)]
pub struct ItemResolverBuilder {
    repository: Option<Arc<dyn ContentRepository>>,
    permissions: Option<Arc<dyn PermissionChecker>>,
    names: Option<Arc<dyn DisplayNameLookup>>,
    decoder: NameDecoder,
    candidates: Option<Box<dyn CandidateGenerator>>,
    nodes: Option<Box<dyn NodeResolver>>,
    display_names: Option<Box<dyn DisplayNameFallback>>,
}

impl ItemResolverBuilder {
    pub fn repository(mut self, repository: Arc<dyn ContentRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn permissions(mut self, permissions: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn display_name_lookup(mut self, names: Arc<dyn DisplayNameLookup>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn decoder(mut self, decoder: NameDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn candidate_generator(mut self, candidates: Box<dyn CandidateGenerator>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    pub fn node_resolver(mut self, nodes: Box<dyn NodeResolver>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn display_name_fallback(mut self, display_names: Box<dyn DisplayNameFallback>) -> Self {
        self.display_names = Some(display_names);
        self
    }

    /// Fails with [`ResolveError::InvalidArgument`] if a default strategy
    /// needs a collaborator that was not supplied.
    pub fn build(self) -> Result<ItemResolver, ResolveError> {
        let candidates = match self.candidates {
            Some(candidates) => candidates,
            None => Box::new(PathCandidates::new(self.decoder)),
        };

        let nodes = match self.nodes {
            Some(nodes) => nodes,
            None => Box::new(SecuredNodeResolver::new(
                required(&self.repository, "content repository")?,
                required(&self.permissions, "permission checker")?,
            )),
        };

        let display_names = match self.display_names {
            Some(display_names) => display_names,
            None => Box::new(MixedNameResolver::new(
                required(&self.repository, "content repository")?,
                required(&self.names, "display name lookup")?,
                required(&self.permissions, "permission checker")?,
            )),
        };

        Ok(ItemResolver {
            candidates,
            nodes,
            display_names,
        })
    }
}

fn required<T: ?Sized>(
    slot: &Option<Arc<T>>,
    what: &'static str,
) -> Result<Arc<T>, ResolveError> {
    slot.clone().ok_or(ResolveError::InvalidArgument(what))
}
