//! DOM heuristic link mining.
//!
//! Last-resort harvesting for pages where the marker-anchor scrape finds
//! nothing: `data-href` carriers, any remaining href-bearing element, and a
//! string scan of inline script bodies for quoted product paths.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::catalog::PRODUCT_PATH_MARKER;
use crate::utils::url::absolutize;

/// Quoted substrings that look like a product path inside script text.
fn quoted_product_path() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"["']([^"']*?/p/[^"']*?)["']"#).expect("product path pattern"))
}

/// Mine product links out of arbitrary page markup.
pub fn mine_links(html: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    // data-href carriers the anchor scrape cannot see
    if let Ok(selector) = Selector::parse("[data-href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("data-href") {
                push_candidate(&mut links, href, page_url);
            }
        }
    }

    // any remaining href-bearing element, anchors included
    if let Ok(selector) = Selector::parse("[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                push_candidate(&mut links, href, page_url);
            }
        }
    }

    // quoted product paths inside inline scripts
    if let Ok(selector) = Selector::parse("script") {
        for script in document.select(&selector) {
            let body = script.text().collect::<String>();
            if !body.contains(PRODUCT_PATH_MARKER) {
                continue;
            }
            for caps in quoted_product_path().captures_iter(&body) {
                push_candidate(&mut links, &caps[1], page_url);
            }
        }
    }

    links
}

fn push_candidate(links: &mut Vec<String>, href: &str, page_url: &str) {
    if !href.contains(PRODUCT_PATH_MARKER) {
        return;
    }
    if let Some(full) = absolutize(href, page_url) {
        links.push(full);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://www.alkosto.com/tv/c/BI_120";

    #[test]
    fn test_mines_data_href() {
        let html = r#"<div data-href="/tv-lg-55/p/1" class="card">TV LG</div>"#;
        let links = mine_links(html, PAGE);
        assert_eq!(links, vec!["https://www.alkosto.com/tv-lg-55/p/1"]);
    }

    #[test]
    fn test_mines_non_anchor_href() {
        let html = r#"<area href="/tv-sony-65/p/2"><a href="/ayuda">no</a>"#;
        let links = mine_links(html, PAGE);
        assert_eq!(links, vec!["https://www.alkosto.com/tv-sony-65/p/2"]);
    }

    #[test]
    fn test_mines_script_bodies() {
        let html = r#"<script>var products = ["/tv-kalley-60/p/3", "otra-cosa"];</script>"#;
        let links = mine_links(html, PAGE);
        assert_eq!(links, vec!["https://www.alkosto.com/tv-kalley-60/p/3"]);
    }

    #[test]
    fn test_ignores_pages_without_marker() {
        let html = r#"<a href="/garantias">x</a><script>var a = "/ayuda";</script>"#;
        assert!(mine_links(html, PAGE).is_empty());
    }
}
