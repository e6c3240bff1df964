//! Shared setup for CLI commands: repository, resolver and request state.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use url::Url;

use itemroute::config::RouteConfig;
use itemroute::context::{RequestPathInfo, RequestState};
use itemroute::debug;
use itemroute::repository::{
    ContentFixture, ContentNode, ContentRepository, ItemQuery, MemoryRepository,
    NodeFlagPermissions,
};
use itemroute::resolve::ItemResolver;

/// Base for request targets given as bare paths.
const LOCAL_BASE: &str = "http://localhost/";

/// Everything a command needs to resolve requests.
///
/// Shared across serve workers, so it holds no per-request state.
pub struct Router {
    pub config: RouteConfig,
    pub repository: Arc<MemoryRepository>,
    pub resolver: ItemResolver,
}

impl Router {
    pub fn new(config: RouteConfig) -> Result<Self> {
        let repository = Arc::new(load_repository(&config)?);
        let resolver = ItemResolver::builder()
            .repository(repository.clone())
            .display_name_lookup(repository.clone())
            .permissions(Arc::new(NodeFlagPermissions))
            .decoder(config.decoder())
            .build()?;

        Ok(Self {
            config,
            repository,
            resolver,
        })
    }

    /// Fresh request state for `target` (an absolute URL or a path).
    pub fn request_state(&self, target: &str) -> Result<RequestState> {
        let url = parse_target(target)?;
        let site = self.config.site_descriptor();
        let path_info = RequestPathInfo::from_url_path(
            url.path(),
            site.as_ref(),
            &self.config.decoder(),
            &self.config.resolver.strip_extensions,
        );

        Ok(RequestState::new(path_info, self.config.request.language())
            .with_site(site)
            .with_database(Some(self.config.request.database()))
            .with_query(url.query()))
    }

    /// Node for `path`, read without security; synthesized when absent.
    pub fn bound_node(&self, path: &str) -> Result<ContentNode> {
        let query = ItemQuery::bypass(
            self.config.request.database(),
            self.config.request.language(),
        );
        let node = self.repository.get_item(path, &query)?;

        Ok(node.unwrap_or_else(|| ContentNode {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap_or_default().to_string(),
            display_name: None,
            can_read: true,
        }))
    }
}

/// Parse a request target, accepting bare paths relative to localhost.
///
/// Scheme-relative targets (`//host/path`) are rejected: joined against the
/// base their first segment would become the host.
pub fn parse_target(target: &str) -> Result<Url> {
    if target.starts_with("//") {
        bail!("invalid request target `{target}`: path must not start with `//`");
    }
    match Url::parse(target) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(LOCAL_BASE)?;
            base.join(target)
                .with_context(|| format!("invalid request target `{target}`"))
        }
        Err(e) => Err(e).with_context(|| format!("invalid request target `{target}`")),
    }
}

/// Load the content fixture named by the config, or an empty repository.
fn load_repository(config: &RouteConfig) -> Result<MemoryRepository> {
    let best_match = config.resolver.find_best_match;

    let Some(path) = &config.content else {
        debug!("content"; "no content fixture configured, repository is empty");
        let repo = MemoryRepository::new(best_match, config.decoder());
        repo.add_database(&config.request.database);
        return Ok(repo);
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read content fixture {}", path.display()))?;
    let fixture = ContentFixture::parse(&content)
        .with_context(|| format!("Failed to parse content fixture {}", path.display()))?;
    let repo = MemoryRepository::from_fixture(&fixture, best_match, config.decoder())?;

    debug!(
        "content";
        "loaded {} items into `{}` from {}",
        repo.len(&config.request.database),
        config.request.database,
        path.display()
    );
    Ok(repo)
}
