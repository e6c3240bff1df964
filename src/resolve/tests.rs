use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    DisplayNameFallback, DisplayNameOutcome, ItemResolver, Lookup, MixedNameResolver,
    NodeResolver, ResolutionOutcome, ResolveError, ResolveRequest, ResolvedVia,
    SecuredNodeResolver,
};
use crate::context::{
    Database, Language, RequestContext, RequestPathInfo, RequestState, SiteDescriptor,
};
use crate::core::NameDecoder;
use crate::repository::{
    BestMatch, ContentNode, ContentRepository, ItemFixture, ItemQuery, MemoryRepository,
    NodeFlagPermissions, RepositoryError,
};

// ============================================================================
// Doubles
// ============================================================================

type Calls = Arc<Mutex<Vec<String>>>;

/// Node resolver recording every path it is asked for.
struct RecordingNodes {
    inner: Box<dyn NodeResolver>,
    calls: Calls,
}

impl NodeResolver for RecordingNodes {
    fn try_resolve(&self, path: &str, query: &ItemQuery) -> Result<Lookup, RepositoryError> {
        self.calls.lock().push(path.to_string());
        self.inner.try_resolve(path, query)
    }
}

/// Display-name fallback counting its invocations.
struct RecordingFallback {
    inner: Box<dyn DisplayNameFallback>,
    calls: Arc<Mutex<usize>>,
}

impl DisplayNameFallback for RecordingFallback {
    fn resolve_by_display_name(
        &self,
        request: &ResolveRequest,
    ) -> Result<DisplayNameOutcome, RepositoryError> {
        *self.calls.lock() += 1;
        self.inner.resolve_by_display_name(request)
    }
}

struct FailingFallback;

impl DisplayNameFallback for FailingFallback {
    fn resolve_by_display_name(
        &self,
        _request: &ResolveRequest,
    ) -> Result<DisplayNameOutcome, RepositoryError> {
        Err(RepositoryError::Unavailable("display name index".to_string()))
    }
}

struct FailingRepository;

impl ContentRepository for FailingRepository {
    fn get_item(
        &self,
        _path: &str,
        _query: &ItemQuery,
    ) -> Result<Option<ContentNode>, RepositoryError> {
        Err(RepositoryError::Backend("connection reset".to_string()))
    }
}

struct PanickingNodes;

impl NodeResolver for PanickingNodes {
    fn try_resolve(&self, _path: &str, _query: &ItemQuery) -> Result<Lookup, RepositoryError> {
        panic!("storage driver crashed");
    }
}

/// Request state counting write-backs.
struct CountingState {
    state: RequestState,
    item_writes: usize,
    flag_writes: usize,
}

impl CountingState {
    fn new(state: RequestState) -> Self {
        Self {
            state,
            item_writes: 0,
            flag_writes: 0,
        }
    }
}

impl RequestContext for CountingState {
    fn path_info(&self) -> &RequestPathInfo {
        self.state.path_info()
    }

    fn site(&self) -> Option<&SiteDescriptor> {
        self.state.site()
    }

    fn database(&self) -> Option<&Database> {
        self.state.database()
    }

    fn language(&self) -> &Language {
        self.state.language()
    }

    fn current_item(&self) -> Option<&ContentNode> {
        self.state.current_item()
    }

    fn use_site_start_path(&self) -> bool {
        self.state.use_site_start_path()
    }

    fn set_current_item(&mut self, item: Option<ContentNode>) {
        self.item_writes += 1;
        self.state.set_current_item(item);
    }

    fn set_permission_denied(&mut self, denied: bool) {
        self.flag_writes += 1;
        self.state.set_permission_denied(denied);
    }
}

// ============================================================================
// Fixtures
// ============================================================================

const ROOT: &str = "/sitecore/content/site1";
const START: &str = "/sitecore/content/site1/home";

fn repository() -> Arc<MemoryRepository> {
    let repo = MemoryRepository::new(BestMatch::Enabled, NameDecoder::default());
    for item in [
        ItemFixture::new(START),
        ItemFixture::new("/sitecore/content/site1/home/secret").unreadable(),
        ItemFixture::new("/sitecore/content/site1/home/about-us").display_name("About Us"),
        ItemFixture::new("/sitecore/content/site1/home/vault").display_name("Vault Room"),
        ItemFixture::new("/sitecore/content/site1/home/vault/inner").unreadable(),
        ItemFixture::new("/sitecore/content/site1/home/products/*"),
        ItemFixture::new("/sitecore/content/site1/home/products/offer")
            .display_name("Special Offer"),
        ItemFixture::new("/news/about us"),
    ] {
        repo.insert("web", &item).unwrap();
    }
    Arc::new(repo)
}

fn site() -> SiteDescriptor {
    SiteDescriptor {
        name: "site1".to_string(),
        root_path: ROOT.to_string(),
        start_path: START.to_string(),
        start_item: "/home".to_string(),
    }
}

struct Harness {
    resolver: ItemResolver,
    node_calls: Calls,
    fallback_calls: Arc<Mutex<usize>>,
}

fn harness_with(repo: Arc<MemoryRepository>) -> Harness {
    let node_calls = Calls::default();
    let fallback_calls = Arc::new(Mutex::new(0));

    let nodes = RecordingNodes {
        inner: Box::new(SecuredNodeResolver::new(
            repo.clone(),
            Arc::new(NodeFlagPermissions),
        )),
        calls: node_calls.clone(),
    };
    let fallback = RecordingFallback {
        inner: Box::new(MixedNameResolver::new(
            repo.clone(),
            repo,
            Arc::new(NodeFlagPermissions),
        )),
        calls: fallback_calls.clone(),
    };

    let resolver = ItemResolver::builder()
        .node_resolver(Box::new(nodes))
        .display_name_fallback(Box::new(fallback))
        .build()
        .unwrap();

    Harness {
        resolver,
        node_calls,
        fallback_calls,
    }
}

fn harness() -> Harness {
    harness_with(repository())
}

/// Request under site1 for the given local path.
fn request(local_path: &str) -> RequestState {
    let decoder = NameDecoder::default();
    let info = RequestPathInfo::from_url_path(local_path, Some(&site()), &decoder, &[]);
    RequestState::new(info, Language::new("en"))
        .with_site(Some(site()))
        .with_database(Some(Database::new("web")))
}

fn found_path(outcome: &ResolutionOutcome) -> &str {
    outcome.node().map(|n| n.path.as_str()).unwrap_or_default()
}

// ============================================================================
// Example Scenarios
// ============================================================================

#[test]
fn test_found_via_root_and_local_candidate() {
    let h = harness();
    let mut base = request("/home");
    base.path_info = RequestPathInfo::new("/elsewhere/home", "/home", &NameDecoder::default());
    let mut state = CountingState::new(base);

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(
        outcome,
        ResolutionOutcome::Found {
            node: state.state.current_item.clone().unwrap(),
            matched_path: START.to_string(),
            via: ResolvedVia::Candidate,
        }
    );
    assert_eq!(state.state.current_item.as_ref().unwrap().path, START);
    assert!(!state.state.permission_denied);
    assert_eq!(
        h.node_calls.lock().as_slice(),
        ["/elsewhere/home", "/home", START]
    );
    assert_eq!(*h.fallback_calls.lock(), 0);
}

#[test]
fn test_unreadable_node_denies_without_fallback() {
    let h = harness();
    let mut state = request("/secret").with_query(Some("sc_usesitestartpath=true"));

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(outcome, ResolutionOutcome::PermissionDenied);
    assert!(state.permission_denied);
    assert!(state.current_item.is_none());
    assert_eq!(h.node_calls.lock().len(), 1);
    assert_eq!(*h.fallback_calls.lock(), 0);
}

#[test]
fn test_decoded_local_path_candidate_matches() {
    let h = harness();
    let mut state = request("/news");
    state.path_info = RequestPathInfo::new(
        "/unrelated%20x",
        "/news/about%20us",
        &NameDecoder::default(),
    );

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    match &outcome {
        ResolutionOutcome::Found {
            matched_path, via, ..
        } => {
            assert_eq!(matched_path, "/news/about us");
            assert_eq!(*via, ResolvedVia::Candidate);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        h.node_calls.lock().as_slice(),
        [
            "/unrelated x",
            "/unrelated%20x",
            "/news/about%20us",
            "/news/about us"
        ]
    );
}

#[test]
fn test_start_path_fallback() {
    let h = harness();
    let mut state = request("/nothing-here").with_query(Some("sc_usesitestartpath=true"));

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(
        outcome,
        ResolutionOutcome::Found {
            node: state.current_item.clone().unwrap(),
            matched_path: START.to_string(),
            via: ResolvedVia::StartPath,
        }
    );
    assert_eq!(h.node_calls.lock().last().map(String::as_str), Some(START));
    assert_eq!(*h.fallback_calls.lock(), 1);
    assert!(!state.permission_denied);
}

#[test]
fn test_start_path_already_tried_is_not_looked_up_again() {
    let repo = MemoryRepository::new(BestMatch::Enabled, NameDecoder::default());
    repo.add_database("web");
    let h = harness_with(Arc::new(repo));
    let mut state = request("/").with_query(Some("sc_usesitestartpath=true"));

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(outcome, ResolutionOutcome::NotFound);
    let calls = h.node_calls.lock();
    assert_eq!(calls.iter().filter(|p| p.as_str() == START).count(), 1);
    let mut unique = calls.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), calls.len());
}

#[test]
fn test_empty_item_path_skips() {
    let h = harness();
    let mut state = RequestState::new(RequestPathInfo::default(), Language::new("en"))
        .with_database(Some(Database::new("web")));
    state.permission_denied = true;

    let result = h.resolver.resolve(&mut state).unwrap();

    assert!(result.is_none());
    assert!(h.node_calls.lock().is_empty());
    assert_eq!(*h.fallback_calls.lock(), 0);
    assert!(state.permission_denied);
    assert!(state.current_item.is_none());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_bound_item_skips_lookups() {
    let h = harness();
    let bound = ContentNode {
        path: "/bound".to_string(),
        name: "bound".to_string(),
        display_name: None,
        can_read: true,
    };
    let mut state = request("/secret");
    state.current_item = Some(bound.clone());
    let mut state = CountingState::new(state);

    assert!(h.resolver.resolve(&mut state).unwrap().is_none());
    assert!(h.node_calls.lock().is_empty());
    assert_eq!(state.item_writes, 0);
    assert_eq!(state.flag_writes, 0);
    assert_eq!(state.state.current_item, Some(bound));
}

#[test]
fn test_missing_database_skips_lookups() {
    let h = harness();
    let mut state = request("/home").with_database(None);

    assert!(h.resolver.resolve(&mut state).unwrap().is_none());
    assert!(h.node_calls.lock().is_empty());
}

#[test]
fn test_no_duplicate_attempts() {
    let h = harness();
    let info = RequestPathInfo::new("/missing", "/missing", &NameDecoder::default());
    let mut state = RequestState::new(info, Language::new("en"))
        .with_database(Some(Database::new("web")));

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(outcome, ResolutionOutcome::NotFound);
    assert_eq!(h.node_calls.lock().as_slice(), ["/missing"]);
}

#[test]
fn test_display_name_fallback_after_exhausted_candidates() {
    let h = harness();
    let mut state = request("/About%20Us");

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(found_path(&outcome), "/sitecore/content/site1/home/about-us");
    assert!(matches!(
        outcome,
        ResolutionOutcome::Found {
            via: ResolvedVia::DisplayName,
            ..
        }
    ));
    assert_eq!(*h.fallback_calls.lock(), 1);
}

#[test]
fn test_wildcard_is_overridden_by_display_name() {
    let h = harness();
    let mut state = request("/products/Special%20Offer");

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(
        found_path(&outcome),
        "/sitecore/content/site1/home/products/offer"
    );
    assert_eq!(*h.fallback_calls.lock(), 1);
    assert_eq!(
        state.current_item.unwrap().path,
        "/sitecore/content/site1/home/products/offer"
    );
}

#[test]
fn test_wildcard_kept_when_display_name_misses() {
    let h = harness();
    let mut state = request("/products/shoe").with_query(Some("sc_usesitestartpath=1"));

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    let node = outcome.node().unwrap();
    assert!(node.is_wildcard());
    assert_eq!(*h.fallback_calls.lock(), 1);
    // A wildcard counts as found: the start path is not tried
    assert_eq!(h.node_calls.lock().len(), 1);
}

#[test]
fn test_display_name_denial_is_terminal() {
    let h = harness();
    let mut state = request("/Vault%20Room/inner").with_query(Some("sc_usesitestartpath=true"));

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(outcome, ResolutionOutcome::PermissionDenied);
    assert!(state.permission_denied);
    assert!(state.current_item.is_none());
    assert!(!h.node_calls.lock().iter().any(|p| p == START));
}

#[test]
fn test_start_path_requires_opt_in() {
    let h = harness();
    let mut state = request("/nothing-here").with_query(Some("sc_usesitestartpath=nope"));

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(outcome, ResolutionOutcome::NotFound);
    assert!(!h.node_calls.lock().iter().any(|p| p == START));
    assert!(!state.permission_denied);
}

#[test]
fn test_start_path_denial() {
    let repo = MemoryRepository::new(BestMatch::Enabled, NameDecoder::default());
    repo.insert("web", &ItemFixture::new(START).unreadable())
        .unwrap();
    let h = harness_with(Arc::new(repo));
    let mut state = request("/nothing-here").with_query(Some("sc_usesitestartpath=true"));

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(outcome, ResolutionOutcome::PermissionDenied);
    assert!(state.permission_denied);
}

#[test]
fn test_start_path_without_site_is_not_tried() {
    let h = harness();
    let info = RequestPathInfo::new("/nothing", "/nothing", &NameDecoder::default());
    let mut state = RequestState::new(info, Language::new("en"))
        .with_database(Some(Database::new("web")))
        .with_query(Some("sc_usesitestartpath=true"));

    let outcome = h.resolver.resolve(&mut state).unwrap().unwrap();

    assert_eq!(outcome, ResolutionOutcome::NotFound);
    assert_eq!(h.node_calls.lock().as_slice(), ["/nothing"]);
}

// ============================================================================
// Write-back
// ============================================================================

#[test]
fn test_write_back_exactly_once() {
    let h = harness();
    for path in ["/home", "/secret", "/nothing-here", "/About%20Us"] {
        let mut state = CountingState::new(request(path));
        h.resolver.resolve(&mut state).unwrap();
        assert_eq!(state.item_writes, 1, "{path}");
        assert_eq!(state.flag_writes, 1, "{path}");
    }
}

#[test]
fn test_fault_propagates_after_write_back() {
    let resolver = ItemResolver::builder()
        .repository(Arc::new(FailingRepository))
        .display_name_lookup(repository())
        .permissions(Arc::new(NodeFlagPermissions))
        .build()
        .unwrap();
    let mut state = CountingState::new(request("/home"));
    state.state.permission_denied = true;

    let err = resolver.resolve(&mut state).unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Repository(RepositoryError::Backend(_))
    ));
    assert_eq!(state.item_writes, 1);
    assert_eq!(state.flag_writes, 1);
    assert!(!state.state.permission_denied);
    assert!(state.state.current_item.is_none());
}

#[test]
fn test_fault_writes_back_partial_wildcard() {
    let repo = repository();
    let resolver = ItemResolver::builder()
        .repository(repo.clone())
        .permissions(Arc::new(NodeFlagPermissions))
        .display_name_fallback(Box::new(FailingFallback))
        .build()
        .unwrap();
    let mut state = request("/products/shoe");

    assert!(resolver.resolve(&mut state).is_err());
    assert!(state.current_item.unwrap().is_wildcard());
}

#[test]
fn test_panic_still_writes_back() {
    let resolver = ItemResolver::builder()
        .node_resolver(Box::new(PanickingNodes))
        .display_name_fallback(Box::new(FailingFallback))
        .build()
        .unwrap();
    let mut state = CountingState::new(request("/home"));

    let result = catch_unwind(AssertUnwindSafe(|| resolver.resolve(&mut state)));

    assert!(result.is_err());
    assert_eq!(state.item_writes, 1);
    assert_eq!(state.flag_writes, 1);
}

// ============================================================================
// Construction & Sharing
// ============================================================================

#[test]
fn test_builder_requires_collaborators() {
    let err = ItemResolver::builder().build().err().unwrap();
    assert!(matches!(err, ResolveError::InvalidArgument("content repository")));

    let err = ItemResolver::builder()
        .repository(repository())
        .permissions(Arc::new(NodeFlagPermissions))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ResolveError::InvalidArgument("display name lookup")));
}

#[test]
fn test_builder_defaults_resolve_end_to_end() {
    let repo = repository();
    let resolver = ItemResolver::builder()
        .repository(repo.clone())
        .display_name_lookup(repo)
        .permissions(Arc::new(NodeFlagPermissions))
        .build()
        .unwrap();
    let mut state = request("/about-us");

    let outcome = resolver.resolve(&mut state).unwrap().unwrap();
    assert_eq!(found_path(&outcome), "/sitecore/content/site1/home/about-us");
}

#[test]
fn test_resolver_is_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ItemResolver>();

    let repo = repository();
    let resolver = ItemResolver::builder()
        .repository(repo.clone())
        .display_name_lookup(repo)
        .permissions(Arc::new(NodeFlagPermissions))
        .build()
        .unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = ["/home", "/secret", "/about-us", "/missing"]
            .into_iter()
            .map(|path| {
                let resolver = &resolver;
                scope.spawn(move || {
                    let mut state = request(path);
                    resolver.resolve(&mut state).unwrap().unwrap()
                })
            })
            .collect();
        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(matches!(outcomes[0], ResolutionOutcome::Found { .. }));
        assert_eq!(outcomes[1], ResolutionOutcome::PermissionDenied);
        assert!(matches!(outcomes[2], ResolutionOutcome::Found { .. }));
        assert_eq!(outcomes[3], ResolutionOutcome::NotFound);
    });
}
