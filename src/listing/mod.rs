//! Listing resolution.
//!
//! Given a category, produce an ordered, deduplicated set of product URLs
//! by walking a chain of progressively weaker strategies: structured
//! search index, paginated HTML scrape, embedded state JSON, DOM link
//! mining, and finally a static fallback list. Each strategy runs only
//! while the set still has room; results are concatenated in harvest
//! order, never re-ranked. A strategy that fails to fetch simply
//! contributes zero URLs.

pub mod dom_mining;
pub mod embedded_state;
pub mod fallback;
pub mod html_listing;
pub mod search_index;

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::{CategoryConfig, BASE_HOST};
use crate::config::Settings;
use crate::renderer::PageRenderer;
use crate::scrapers::HttpClient;
use crate::utils::url::{canonical_url, origin_of};

use search_index::SearchIndexClient;

/// Which end of the strategy chain to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyOrder {
    /// Search index first; HTML strategies as fallback.
    #[default]
    ApiFirst,
    /// Paginated HTML first; search index as fallback.
    HtmlFirst,
}

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub order: StrategyOrder,
    /// When false, harvested URLs skip the category URL-pattern check.
    /// Diagnostic use only.
    pub use_category_filter: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            order: StrategyOrder::ApiFirst,
            use_category_filter: true,
        }
    }
}

/// One product URL plus, when the search index produced it, the raw hit,
/// so the parser can build a record without fetching the detail page.
#[derive(Debug, Clone)]
pub struct ListingCandidate {
    pub url: String,
    pub hit: Option<Value>,
}

/// Ordered set of distinct product URLs for one category.
///
/// Deduplicated by canonical URL, first occurrence wins, capped at the
/// caller's maximum.
#[derive(Debug)]
pub struct ListingUrlSet {
    entries: Vec<ListingCandidate>,
    seen: HashSet<String>,
    cap: usize,
    dropped_by_filter: usize,
}

impl ListingUrlSet {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            seen: HashSet::new(),
            cap: cap.max(1),
            dropped_by_filter: 0,
        }
    }

    /// Insert an already-canonical URL. Returns true when it was new and
    /// there was room.
    fn insert(&mut self, url: String, hit: Option<Value>) -> bool {
        if self.is_full() || self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.entries.push(ListingCandidate { url, hit });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.cap
    }

    /// URLs dropped by the category URL-pattern filter.
    pub fn dropped_by_filter(&self) -> usize {
        self.dropped_by_filter
    }

    pub fn entries(&self) -> &[ListingCandidate] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ListingCandidate> {
        self.entries
    }
}

enum Strategy {
    SearchIndex,
    HtmlPages,
    EmbeddedState,
    DomMining,
}

pub struct ListingResolver<'a> {
    client: &'a HttpClient,
    category: &'a CategoryConfig,
    settings: &'a Settings,
    options: ResolveOptions,
    renderer: Option<&'a dyn PageRenderer>,
}

impl<'a> ListingResolver<'a> {
    pub fn new(client: &'a HttpClient, category: &'a CategoryConfig, settings: &'a Settings) -> Self {
        Self {
            client,
            category,
            settings,
            options: ResolveOptions::default(),
            renderer: None,
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_renderer(mut self, renderer: &'a dyn PageRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Resolve up to `max_urls` product URLs for the category. An empty
    /// result means every strategy came up dry; the caller decides whether
    /// that is fatal.
    pub async fn resolve(&self, max_urls: usize) -> ListingUrlSet {
        let mut set = ListingUrlSet::new(max_urls);

        let chain: &[Strategy] = match self.options.order {
            StrategyOrder::ApiFirst => &[
                Strategy::SearchIndex,
                Strategy::HtmlPages,
                Strategy::EmbeddedState,
                Strategy::DomMining,
            ],
            StrategyOrder::HtmlFirst => &[
                Strategy::HtmlPages,
                Strategy::EmbeddedState,
                Strategy::DomMining,
                Strategy::SearchIndex,
            ],
        };

        for strategy in chain {
            if set.is_full() {
                break;
            }
            let name = match strategy {
                Strategy::SearchIndex => {
                    self.collect_from_search_index(&mut set).await;
                    "search index"
                }
                Strategy::HtmlPages => {
                    self.collect_from_html_pages(&mut set).await;
                    "listing pages"
                }
                Strategy::EmbeddedState => {
                    self.collect_from_embedded_state(&mut set).await;
                    "embedded state"
                }
                Strategy::DomMining => {
                    self.collect_from_dom_mining(&mut set).await;
                    "link mining"
                }
            };
            debug!(
                "{}: {} of {} URLs after {}",
                self.category.name,
                set.len(),
                max_urls,
                name
            );
        }

        // Static list only when every live strategy produced nothing.
        if set.is_empty() {
            for url in fallback::known_urls(&self.category.name) {
                if set.is_full() {
                    break;
                }
                set.insert(canonical_url(url, BASE_HOST), None);
            }
            if !set.is_empty() {
                warn!(
                    "{}: no live results; using {} static fallback URLs",
                    self.category.name,
                    set.len()
                );
            }
        }

        if set.dropped_by_filter() > 0 {
            info!(
                "{}: dropped {} URLs not matching category patterns",
                self.category.name,
                set.dropped_by_filter()
            );
        }

        set
    }

    /// Canonicalize and category-filter a harvested URL, then insert it.
    fn accept(&self, set: &mut ListingUrlSet, raw_url: &str, hit: Option<Value>) -> bool {
        let canonical = canonical_url(raw_url, BASE_HOST);
        if self.options.use_category_filter && !self.category.matches_url(&canonical) {
            set.dropped_by_filter += 1;
            return false;
        }
        set.insert(canonical, hit)
    }

    async fn collect_from_search_index(&self, set: &mut ListingUrlSet) {
        let index = SearchIndexClient::new(self.client, self.settings);
        let mut page = 0usize;

        while !set.is_full() && (page as u32) < self.settings.page_limit {
            let response = match index
                .query(self.category, page, self.settings.hits_per_page)
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    warn!("{}: search index query failed: {}", self.category.name, err);
                    return;
                }
            };
            if response.hits.is_empty() {
                return;
            }

            let total = response.hits.len();
            let mut relevant = 0usize;
            for hit in response.hits {
                let name = search_index::display_name(&hit);
                if !self.category.is_relevant_name(&name) {
                    continue;
                }
                relevant += 1;
                let Some(url) = search_index::hit_url(&hit) else {
                    continue;
                };
                self.accept(set, &url, Some(hit));
                if set.is_full() {
                    break;
                }
            }
            debug!(
                "{}: search page {} returned {} hits, {} relevant",
                self.category.name, page, total, relevant
            );

            if total < self.settings.hits_per_page {
                return;
            }
            page += 1;
        }
    }

    async fn collect_from_html_pages(&self, set: &mut ListingUrlSet) {
        // The UI paginates with `page`; older category pages still answer
        // to `p`. The legacy form is only tried when the first yields
        // nothing at all.
        for param in ["page", "p"] {
            let before = set.len();
            self.scrape_paged_listing(set, param).await;
            if set.len() > before {
                return;
            }
        }
    }

    async fn scrape_paged_listing(&self, set: &mut ListingUrlSet, param: &str) {
        for page in 1..=self.settings.page_limit {
            if set.is_full() {
                return;
            }
            let url = html_listing::paged_url(&self.category.listing_url, page, param);
            let html = match self.client.get_text(&url).await {
                Ok(html) => html,
                Err(err) => {
                    debug!("{}: listing page fetch failed: {}", self.category.name, err);
                    return;
                }
            };

            let mut fresh = 0usize;
            for href in html_listing::extract_product_anchors(&html, &url) {
                if self.accept(set, &href, None) {
                    fresh += 1;
                }
                if set.is_full() {
                    break;
                }
            }
            if fresh == 0 {
                return;
            }
            if html_listing::catalog_complete(&html) {
                return;
            }
        }
    }

    async fn collect_from_embedded_state(&self, set: &mut ListingUrlSet) {
        let html = match self.client.get_text(&self.category.listing_url).await {
            Ok(html) => html,
            Err(err) => {
                debug!("{}: state page fetch failed: {}", self.category.name, err);
                return;
            }
        };
        let Some(state) = embedded_state::extract_state(&html) else {
            return;
        };

        let mut taken = 0usize;
        for item in embedded_state::product_items(&state) {
            let Some(link) = embedded_state::item_url(&item) else {
                continue;
            };
            if self.accept(set, &link, Some(item)) {
                taken += 1;
            }
            if set.is_full() || taken >= self.settings.fallback_stop {
                return;
            }
        }
    }

    async fn collect_from_dom_mining(&self, set: &mut ListingUrlSet) {
        let mut pages = vec![self.category.listing_url.clone()];
        if let Some(origin) = origin_of(&self.category.listing_url) {
            pages.push(format!(
                "{}/search?text={}",
                origin,
                urlencoding::encode(&self.category.search_keywords)
            ));
        }

        let mut taken = 0usize;
        for page_url in pages {
            if set.is_full() || taken >= self.settings.fallback_stop {
                return;
            }
            let html = match self.fetch_possibly_rendered(&page_url).await {
                Some(html) => html,
                None => continue,
            };
            for href in dom_mining::mine_links(&html, &page_url) {
                if self.accept(set, &href, None) {
                    taken += 1;
                }
                if set.is_full() || taken >= self.settings.fallback_stop {
                    break;
                }
            }
        }
    }

    /// Plain fetch, with the renderer as a second chance when one is
    /// configured.
    async fn fetch_possibly_rendered(&self, url: &str) -> Option<String> {
        match self.client.get_text(url).await {
            Ok(html) => Some(html),
            Err(err) => {
                debug!("plain fetch of {} failed: {}", url, err);
                match self.renderer {
                    Some(renderer) => renderer.fetch_rendered(url).await.ok(),
                    None => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_set_dedups_and_caps() {
        let mut set = ListingUrlSet::new(2);
        assert!(set.insert("https://www.alkosto.com/a/p/1".into(), None));
        assert!(!set.insert("https://www.alkosto.com/a/p/1".into(), None));
        assert!(set.insert("https://www.alkosto.com/b/p/2".into(), Some(json!({}))));
        assert!(set.is_full());
        assert!(!set.insert("https://www.alkosto.com/c/p/3".into(), None));
        assert_eq!(set.len(), 2);
        // first occurrence wins: the hit-less entry for /a/p/1 stayed
        assert!(set.entries()[0].hit.is_none());
    }

    #[test]
    fn test_url_set_minimum_capacity() {
        let set = ListingUrlSet::new(0);
        assert!(!set.is_full());
        assert_eq!(set.cap, 1);
    }
}
