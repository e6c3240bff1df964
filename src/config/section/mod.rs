//! Configuration section definitions.
//!
//! Each module corresponds to a section in `itemroute.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `resolver` | `[resolver]`   | Best match, extensions, name decoding |
//! | `request`  | `[request]`    | Database and language per request    |
//! | `site`     | `[site]`       | Site root, start item, start path    |
//! | `serve`    | `[serve]`      | Development server                   |

mod request;
mod resolver;
mod serve;
mod site;

pub use request::RequestConfig;
pub use resolver::ResolverConfig;
pub use serve::ServeConfig;
pub use site::SiteConfig;
