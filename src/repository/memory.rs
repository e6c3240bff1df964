//! In-memory content repository.
//!
//! A reference implementation of the repository ports, used by the CLI,
//! the dev server and the tests. Trees are kept per database; paths are
//! matched case-insensitively and ancestors are created implicitly.
//!
//! # Fixture Format
//!
//! ```toml
//! [[database]]
//! name = "web"
//!
//! [[database.item]]
//! path = "/sitecore/content/site1/home/about-us"
//! display_name = "About Us"
//!
//! [[database.item]]
//! path = "/sitecore/content/site1/home/secret"
//! readable = false
//! ```

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::ports::{
    ContentNode, ContentRepository, DisplayNameLookup, ItemQuery, RepositoryError,
    SecurityMode, VersionPolicy, WILDCARD_NAME,
};
use crate::core::NameDecoder;

// ============================================================================
// Best Match Policy
// ============================================================================

/// How display-name lookups pick among matching siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BestMatch {
    /// First sibling matching by name or display name.
    Disabled,
    /// Exact name matches win over display-name matches.
    #[default]
    Enabled,
    /// Like `Enabled`, backtracking into other matches when a deeper segment fails.
    DeepScan,
}

// ============================================================================
// Fixture
// ============================================================================

/// Repository content as loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentFixture {
    #[serde(default)]
    pub database: Vec<DatabaseFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseFixture {
    pub name: String,
    #[serde(default)]
    pub item: Vec<ItemFixture>,
}

/// A single item definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemFixture {
    pub path: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_readable")]
    pub readable: bool,
    #[serde(default = "default_versions")]
    pub versions: u32,
    /// Languages the item has versions in (empty = all)
    #[serde(default)]
    pub languages: Vec<String>,
}

fn default_readable() -> bool {
    true
}

fn default_versions() -> u32 {
    1
}

impl ItemFixture {
    /// Readable item with one version in every language.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            display_name: None,
            readable: true,
            versions: 1,
            languages: Vec::new(),
        }
    }

    pub fn display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.readable = false;
        self
    }

    pub fn languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }
}

impl ContentFixture {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

// ============================================================================
// Tree
// ============================================================================

#[derive(Debug, Clone)]
struct StoredNode {
    path: String,
    name: String,
    display_name: Option<String>,
    readable: bool,
    versions: u32,
    languages: Vec<String>,
}

impl StoredNode {
    fn implicit(path: &str, name: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            display_name: None,
            readable: true,
            versions: 1,
            languages: Vec::new(),
        }
    }

    fn visible(&self, query: &ItemQuery) -> bool {
        let version_ok = match query.version {
            VersionPolicy::Latest => self.versions > 0,
            VersionPolicy::Numbered(n) => n.get() <= self.versions,
        };
        let language_ok = self.languages.is_empty()
            || self
                .languages
                .iter()
                .any(|l| l.eq_ignore_ascii_case(query.language.name()));
        let security_ok = query.security == SecurityMode::Bypass || self.readable;

        version_ok && language_ok && security_ok
    }

    fn to_node(&self) -> ContentNode {
        ContentNode {
            path: self.path.clone(),
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            can_read: self.readable,
        }
    }
}

/// One database's item tree. Keys are lowercased paths; the virtual root is `""`.
#[derive(Debug, Default)]
struct Tree {
    nodes: FxHashMap<String, StoredNode>,
    children: FxHashMap<String, Vec<String>>,
}

impl Tree {
    fn insert(&mut self, item: &ItemFixture) -> Result<(), RepositoryError> {
        let segments: Vec<&str> = item.path.split('/').filter(|s| !s.is_empty()).collect();
        if !item.path.starts_with('/') || segments.is_empty() {
            return Err(RepositoryError::Backend(format!(
                "invalid item path `{}`",
                item.path
            )));
        }

        let mut parent_key = String::new();
        let mut path = String::new();
        for (i, segment) in segments.iter().enumerate() {
            path.push('/');
            path.push_str(segment);
            let key = path.to_lowercase();

            if !self.nodes.contains_key(&key) {
                self.nodes
                    .insert(key.clone(), StoredNode::implicit(&path, segment));
                self.children
                    .entry(parent_key.clone())
                    .or_default()
                    .push(key.clone());
            }

            if i + 1 == segments.len()
                && let Some(node) = self.nodes.get_mut(&key)
            {
                node.display_name = item.display_name.clone();
                node.readable = item.readable;
                node.versions = item.versions;
                node.languages = item.languages.clone();
            }
            parent_key = key;
        }
        Ok(())
    }

    /// Walk exact names, falling back to a `*` child at each level.
    fn find(&self, path: &str) -> Option<&StoredNode> {
        if !path.starts_with('/') {
            return None;
        }
        let mut current = String::new();
        let mut walked = false;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let exact = format!("{current}/{}", segment.to_lowercase());
            if self.nodes.contains_key(&exact) {
                current = exact;
            } else {
                let wildcard = format!("{current}/{WILDCARD_NAME}");
                if !self.nodes.contains_key(&wildcard) {
                    return None;
                }
                current = wildcard;
            }
            walked = true;
        }
        if walked { self.nodes.get(&current) } else { None }
    }

    /// Children of `parent` matching `segment`, best candidates first.
    fn matching_children(&self, parent: &str, segment: &str, policy: BestMatch) -> Vec<&str> {
        let Some(children) = self.children.get(parent) else {
            return Vec::new();
        };

        let by_name = |key: &&String| {
            self.nodes
                .get(key.as_str())
                .is_some_and(|n| n.name.eq_ignore_ascii_case(segment))
        };
        let by_display = |key: &&String| {
            self.nodes.get(key.as_str()).is_some_and(|n| {
                n.display_name
                    .as_deref()
                    .is_some_and(|d| d.eq_ignore_ascii_case(segment))
            })
        };

        match policy {
            BestMatch::Disabled => children
                .iter()
                .find(|k| by_name(k) || by_display(k))
                .map(String::as_str)
                .into_iter()
                .collect(),
            BestMatch::Enabled => children
                .iter()
                .find(by_name)
                .or_else(|| children.iter().find(by_display))
                .map(String::as_str)
                .into_iter()
                .collect(),
            BestMatch::DeepScan => {
                let mut ordered: Vec<&str> =
                    children.iter().filter(by_name).map(String::as_str).collect();
                ordered.extend(
                    children
                        .iter()
                        .filter(|k| !by_name(k) && by_display(k))
                        .map(String::as_str),
                );
                ordered
            }
        }
    }

    fn descend(&self, key: &str, segments: &[String], policy: BestMatch) -> Option<String> {
        let Some((segment, rest)) = segments.split_first() else {
            return Some(key.to_string());
        };
        self.matching_children(key, segment, policy)
            .into_iter()
            .find_map(|child| self.descend(child, rest, policy))
    }
}

// ============================================================================
// MemoryRepository
// ============================================================================

/// Thread-safe in-memory repository.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    databases: RwLock<FxHashMap<String, Tree>>,
    decoder: NameDecoder,
    best_match: BestMatch,
}

impl MemoryRepository {
    pub fn new(best_match: BestMatch, decoder: NameDecoder) -> Self {
        Self {
            databases: RwLock::new(FxHashMap::default()),
            decoder,
            best_match,
        }
    }

    /// Build a repository from fixture content.
    pub fn from_fixture(
        fixture: &ContentFixture,
        best_match: BestMatch,
        decoder: NameDecoder,
    ) -> Result<Self, RepositoryError> {
        let repo = Self::new(best_match, decoder);
        for db in &fixture.database {
            repo.add_database(&db.name);
            for item in &db.item {
                repo.insert(&db.name, item)?;
            }
        }
        Ok(repo)
    }

    /// Create an empty database if it does not exist yet.
    pub fn add_database(&self, name: &str) {
        self.databases.write().entry(name.to_string()).or_default();
    }

    /// Insert or update an item (and its implicit ancestors).
    pub fn insert(&self, database: &str, item: &ItemFixture) -> Result<(), RepositoryError> {
        self.databases
            .write()
            .entry(database.to_string())
            .or_default()
            .insert(item)
    }

    /// Number of items in `database` (0 if it does not exist).
    pub fn len(&self, database: &str) -> usize {
        self.databases
            .read()
            .get(database)
            .map_or(0, |tree| tree.nodes.len())
    }
}

impl ContentRepository for MemoryRepository {
    fn get_item(
        &self,
        path: &str,
        query: &ItemQuery,
    ) -> Result<Option<ContentNode>, RepositoryError> {
        let databases = self.databases.read();
        let tree = databases
            .get(query.database.name())
            .ok_or_else(|| RepositoryError::UnknownDatabase(query.database.to_string()))?;

        Ok(tree
            .find(path)
            .filter(|node| node.visible(query))
            .map(StoredNode::to_node))
    }
}

impl DisplayNameLookup for MemoryRepository {
    fn resolve_under(
        &self,
        remainder: &str,
        anchor: &ContentNode,
        query: &ItemQuery,
    ) -> Result<Option<ContentNode>, RepositoryError> {
        let databases = self.databases.read();
        let tree = databases
            .get(query.database.name())
            .ok_or_else(|| RepositoryError::UnknownDatabase(query.database.to_string()))?;

        let anchor_key = anchor.path.to_lowercase();
        if !tree.nodes.contains_key(&anchor_key) {
            return Ok(None);
        }

        let segments: Vec<String> = remainder
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| self.decoder.decode(s))
            .collect();

        Ok(tree
            .descend(&anchor_key, &segments, self.best_match)
            .and_then(|key| tree.nodes.get(&key))
            .filter(|node| node.visible(query))
            .map(StoredNode::to_node))
    }
}
