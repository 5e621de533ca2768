//! URL canonicalization.
//!
//! Product URLs arrive in absolute, scheme-relative, root-relative and bare
//! forms, frequently carrying tracking parameters. Canonicalization strips
//! query string and fragment and normalizes to an absolute https URL so that
//! deduplication and output always operate on one spelling per product.

use url::Url;

/// Canonical form of a product URL: absolute, https, no query, no fragment.
///
/// `base` supplies the host for root-relative paths. Canonicalization is
/// idempotent: feeding the result back in returns it unchanged.
pub fn canonical_url(raw: &str, base: &str) -> String {
    let trimmed = raw.trim();
    let absolute = if trimmed.starts_with("//") {
        format!("https:{}", trimmed)
    } else if trimmed.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), trimmed)
    } else if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        format!("https://{}", trimmed)
    } else {
        trimmed.to_string()
    };

    match Url::parse(&absolute) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => absolute,
    }
}

/// Resolve an href (possibly relative) against the page it appeared on.
pub fn absolutize(href: &str, page_url: &str) -> Option<String> {
    let page = Url::parse(page_url).ok()?;
    page.join(href.trim()).ok().map(|u| u.to_string())
}

/// Origin (scheme + host) of a URL, without trailing slash.
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}://{}", parsed.scheme(), host))
}
