//! Candidate path generation.
//!
//! Produces every path variant worth trying for a request, highest priority
//! first. The list may contain duplicates; the resolver skips repeats.

use crate::context::{RequestPathInfo, SiteDescriptor};
use crate::core::{NameDecoder, join_path};

/// Ordered candidate paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateList(Vec<String>);

impl CandidateList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<Vec<String>> for CandidateList {
    fn from(paths: Vec<String>) -> Self {
        Self(paths)
    }
}

impl IntoIterator for CandidateList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Strategy producing candidate paths for a request.
pub trait CandidateGenerator: Send + Sync {
    /// Must be a pure function of its inputs.
    fn generate(&self, info: &RequestPathInfo, site: Option<&SiteDescriptor>) -> CandidateList;
}

/// Default candidate generator.
///
/// Order:
/// 1. decoded item path
/// 2. raw item path
/// 3. raw local path
/// 4. decoded local path
/// 5. root + local
/// 6. decoded (root + local)
/// 7. root × start item × local, each in raw and decoded form (8 entries)
#[derive(Debug, Clone, Default)]
pub struct PathCandidates {
    decoder: NameDecoder,
}

impl PathCandidates {
    pub fn new(decoder: NameDecoder) -> Self {
        Self { decoder }
    }
}

impl CandidateGenerator for PathCandidates {
    fn generate(&self, info: &RequestPathInfo, site: Option<&SiteDescriptor>) -> CandidateList {
        let (root, start_item) = site
            .map(|s| (s.root_path.as_str(), s.start_item.as_str()))
            .unwrap_or_default();

        let root_local = join_path(root, &info.local_path);
        let decoded_root_local = self.decoder.decode(&root_local);

        let mut paths = Vec::with_capacity(14);
        paths.push(info.decoded_item_path.clone());
        paths.push(info.raw_item_path.clone());
        paths.push(info.local_path.clone());
        paths.push(info.decoded_local_path.clone());
        paths.push(root_local);
        paths.push(decoded_root_local);

        let roots = [root.to_string(), self.decoder.decode(root)];
        let starts = [start_item.to_string(), self.decoder.decode(start_item)];
        let locals = [info.local_path.as_str(), info.decoded_local_path.as_str()];

        for root in &roots {
            for start in &starts {
                let base = join_path(root, start);
                for local in locals {
                    paths.push(join_path(&base, local));
                }
            }
        }

        CandidateList(paths)
    }
}
