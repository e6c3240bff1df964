//! Plain request state implementing [`RequestContext`].

use super::{
    Database, Language, RequestContext, RequestPathInfo, SiteDescriptor,
    USE_SITE_START_PATH_PARAM,
};
use crate::repository::ContentNode;

/// Owned per-request state.
///
/// Built fresh for every request and dropped when the request ends.
#[derive(Debug, Clone)]
pub struct RequestState {
    pub path_info: RequestPathInfo,
    pub site: Option<SiteDescriptor>,
    pub database: Option<Database>,
    pub language: Language,
    pub current_item: Option<ContentNode>,
    pub permission_denied: bool,
    pub use_site_start_path: bool,
}

impl RequestState {
    pub fn new(path_info: RequestPathInfo, language: Language) -> Self {
        Self {
            path_info,
            site: None,
            database: None,
            language,
            current_item: None,
            permission_denied: false,
            use_site_start_path: false,
        }
    }

    pub fn with_site(mut self, site: Option<SiteDescriptor>) -> Self {
        self.site = site;
        self
    }

    pub fn with_database(mut self, database: Option<Database>) -> Self {
        self.database = database;
        self
    }

    /// Apply the request's query string (without the leading `?`).
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.use_site_start_path = parse_use_site_start_path(query);
        self
    }
}

impl RequestContext for RequestState {
    fn path_info(&self) -> &RequestPathInfo {
        &self.path_info
    }

    fn site(&self) -> Option<&SiteDescriptor> {
        self.site.as_ref()
    }

    fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    fn language(&self) -> &Language {
        &self.language
    }

    fn current_item(&self) -> Option<&ContentNode> {
        self.current_item.as_ref()
    }

    fn use_site_start_path(&self) -> bool {
        self.use_site_start_path
    }

    fn set_current_item(&mut self, item: Option<ContentNode>) {
        self.current_item = item;
    }

    fn set_permission_denied(&mut self, denied: bool) {
        self.permission_denied = denied;
    }
}

/// Read `sc_usesitestartpath` from a query string.
///
/// Absent, empty or unparsable values are `false`.
pub fn parse_use_site_start_path(query: Option<&str>) -> bool {
    let Some(query) = query else {
        return false;
    };

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key.eq_ignore_ascii_case(USE_SITE_START_PATH_PARAM))
        .is_some_and(|(_, value)| parse_flag(value.trim()))
}

fn parse_flag(value: &str) -> bool {
    ["true", "1", "yes"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}
