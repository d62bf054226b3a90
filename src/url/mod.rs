//! URL handling for md-harvest
//!
//! Listing pages link to nodes with site-relative hrefs, so every discovered
//! link is resolved against the seed's origin rather than the page it was found
//! on. This module holds that origin as an explicit value and the resolution
//! rules that go with it.

mod base;
mod resolve;

pub use base::{parse_seed, BaseUrl};
pub use resolve::{resolve_href, resolve_image_url};
