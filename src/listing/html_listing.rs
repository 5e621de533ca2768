//! Paginated HTML listing scrape.
//!
//! Listing pages link products through anchors whose href contains the
//! `/p/` marker. Pagination has no reliable last-page signal, so the loop
//! stops on the first page that yields nothing new, on a page ceiling, or
//! on the "N de M productos" completion indicator some categories render.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::catalog::PRODUCT_PATH_MARKER;
use crate::utils::url::absolutize;

/// Build the URL for a listing page. Page numbers are 1-indexed in the
/// site's UI convention; page 1 is the bare listing URL.
pub fn paged_url(base: &str, page: u32, param: &str) -> String {
    if page <= 1 {
        return base.to_string();
    }
    match Url::parse(base) {
        Ok(mut url) => {
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(k, _)| k != param)
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            url.query_pairs_mut()
                .clear()
                .extend_pairs(kept)
                .append_pair(param, &page.to_string());
            url.to_string()
        }
        Err(_) => format!("{}?{}={}", base, param, page),
    }
}

/// All product anchors on a listing page, absolutized.
pub fn extract_product_anchors(html: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse(r#"a[href*="/p/"]"#) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut urls = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(full) = absolutize(href, page_url) else {
            continue;
        };
        if full.contains(PRODUCT_PATH_MARKER) {
            urls.push(full);
        }
    }
    urls
}

/// Whether the page's "N de M productos" counter says the catalog is
/// exhausted.
pub fn catalog_complete(page_text: &str) -> bool {
    static COUNTER: OnceLock<Regex> = OnceLock::new();
    let re = COUNTER.get_or_init(|| {
        Regex::new(r"(\d+)\s+de\s+(\d+)\s+productos").expect("completion counter pattern")
    });

    if let Some(caps) = re.captures(page_text) {
        let shown: u64 = caps[1].parse().unwrap_or(0);
        let total: u64 = caps[2].parse().unwrap_or(u64::MAX);
        return shown >= total && total > 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_url_first_page_is_bare() {
        let base = "https://www.alkosto.com/tv/smart-tv/c/BI_120_ALKOS";
        assert_eq!(paged_url(base, 1, "page"), base);
    }

    #[test]
    fn test_paged_url_appends_and_replaces() {
        let base = "https://www.alkosto.com/tv/c/BI_120";
        assert_eq!(paged_url(base, 2, "page"), format!("{}?page=2", base));
        // an existing value for the parameter is replaced, not duplicated
        let with_param = format!("{}?page=5", base);
        assert_eq!(paged_url(&with_param, 3, "page"), format!("{}?page=3", base));
        // legacy parameter form
        assert_eq!(paged_url(base, 2, "p"), format!("{}?p=2", base));
    }

    #[test]
    fn test_extract_product_anchors() {
        let html = r#"
            <div class="grid">
              <a href="/tv-lg-55-pulgadas/p/8806096330241">TV LG</a>
              <a href="https://www.alkosto.com/tv-samsung-55/p/8806097027584?s=promo">TV Samsung</a>
              <a href="/ayuda/garantias">Garantías</a>
            </div>"#;
        let urls = extract_product_anchors(html, "https://www.alkosto.com/tv/c/BI_120");
        assert_eq!(urls.len(), 2);
        assert!(urls[0].ends_with("/tv-lg-55-pulgadas/p/8806096330241"));
    }

    #[test]
    fn test_catalog_complete_counter() {
        assert!(catalog_complete("Mostrando 48 de 48 productos"));
        assert!(!catalog_complete("Mostrando 24 de 120 productos"));
        assert!(!catalog_complete("sin contador"));
    }
}
