use crate::url::BaseUrl;
use url::Url;

/// Resolves an anchor `href` against the site base
///
/// Returns None if the link should be skipped:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: schemes
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
pub fn resolve_href(href: &str, base: &BaseUrl) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base.url().join(href).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute)
    } else {
        None
    }
}

/// Resolves an image URL as written in Markdown against the page it came from
///
/// Unlike anchors, images may use page-relative paths (`img/a.png`), so the
/// full page URL is the base here.
pub fn resolve_image_url(raw: &str, page_url: &Url) -> Option<Url> {
    let absolute = page_url.join(raw.trim()).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute)
    } else {
        None
    }
}
