//! Per-request path forms.

use serde::Serialize;

use super::SiteDescriptor;
use crate::core::{NameDecoder, join_path, local_path};

/// The raw and decoded forms of the request's item and local paths.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RequestPathInfo {
    /// Item path as derived from the URL (site start path + local path)
    pub raw_item_path: String,
    pub decoded_item_path: String,
    /// Path relative to the site (e.g., `/about%20us`)
    pub local_path: String,
    pub decoded_local_path: String,
}

impl RequestPathInfo {
    /// Build from already-derived raw paths.
    pub fn new(raw_item_path: &str, local_path: &str, decoder: &NameDecoder) -> Self {
        Self {
            raw_item_path: raw_item_path.to_string(),
            decoded_item_path: decoder.decode(raw_item_path),
            local_path: local_path.to_string(),
            decoded_local_path: decoder.decode(local_path),
        }
    }

    /// Derive from a request path such as `/about%20us.aspx?x=1`.
    ///
    /// With a site bound the item path is the local path under the site's
    /// start path; `/` maps to the start path itself. Without a site the
    /// item path is the local path.
    pub fn from_url_path(
        url_path: &str,
        site: Option<&SiteDescriptor>,
        decoder: &NameDecoder,
        strip_extensions: &[String],
    ) -> Self {
        let local = local_path(url_path, strip_extensions);
        let item = match site {
            Some(site) if local == "/" => site.start_path.clone(),
            Some(site) => join_path(&site.start_path, &local),
            None => local.clone(),
        };
        Self::new(&item, &local, decoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteDescriptor {
        SiteDescriptor {
            name: "site1".to_string(),
            root_path: "/sitecore/content/site1".to_string(),
            start_path: "/sitecore/content/site1/home".to_string(),
            start_item: "/home".to_string(),
        }
    }

    #[test]
    fn test_from_url_path_with_site() {
        let exts = vec!["aspx".to_string()];
        let decoder = NameDecoder::default();
        let info = RequestPathInfo::from_url_path("/about%20us.aspx", Some(&site()), &decoder, &exts);

        assert_eq!(info.local_path, "/about%20us");
        assert_eq!(info.decoded_local_path, "/about us");
        assert_eq!(
            info.raw_item_path,
            "/sitecore/content/site1/home/about%20us"
        );
        assert_eq!(
            info.decoded_item_path,
            "/sitecore/content/site1/home/about us"
        );
    }

    #[test]
    fn test_root_maps_to_start_path() {
        let decoder = NameDecoder::default();
        let info = RequestPathInfo::from_url_path("/", Some(&site()), &decoder, &[]);
        assert_eq!(info.local_path, "/");
        assert_eq!(info.raw_item_path, "/sitecore/content/site1/home");
    }

    #[test]
    fn test_without_site() {
        let info = RequestPathInfo::from_url_path("/news/", None, &NameDecoder::default(), &[]);
        assert_eq!(info.raw_item_path, "/news");
        assert_eq!(info.local_path, "/news");
    }
}
