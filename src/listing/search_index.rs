//! Structured search queries against the site's Algolia index.
//!
//! The index is the highest-confidence listing source: hits carry name,
//! brand, price, image and URL, so the parser can build a record without
//! fetching the detail page. The credentials below are the public read-only
//! pair embedded in the site's own frontend.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::catalog::{CategoryConfig, BASE_HOST};
use crate::config::Settings;
use crate::scrapers::{FetchError, HttpClient};

pub const APPLICATION_ID: &str = "QX5IPS1B1Q";
pub const API_KEY: &str = "7a8800d62203ee3a9ff1cdf74f99b268";
pub const INDEX_NAME: &str = "alkostoIndexAlgoliaPRD";

/// Field allowlist sent with every query. The index schema is unstable;
/// several aliases exist for each logical field and all are requested.
const RETRIEVED_ATTRIBUTES: &[&str] = &[
    "objectID",
    "name_text_es",
    "name",
    "productName",
    "marca_text",
    "brand",
    "brand_string_mv",
    "lowestprice_double",
    "discountprice_double",
    "pricevalue_cop_double",
    "baseprice_cop_string",
    "price",
    "url_es_string",
    "url",
    "linkText",
    "img-310wx310h_string",
    "img-155wx155h_string",
    "image",
    "images",
    "averagescore_double",
    "rating",
    "aggregateRating",
    "description",
    "shortDescription",
    "categorypath_string_mv",
    "categoryname_text_es_mv",
    "category_string_mv",
    "instockflag_boolean",
    "stocklevelstatus_string",
    "availability",
    "inStock",
];

pub fn default_endpoint() -> String {
    format!(
        "https://{}-dsn.algolia.net/1/indexes/{}/query",
        APPLICATION_ID, INDEX_NAME
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<Value>,
    #[serde(rename = "nbHits", default)]
    pub nb_hits: u64,
}

pub struct SearchIndexClient<'a> {
    client: &'a HttpClient,
    endpoint: String,
}

impl<'a> SearchIndexClient<'a> {
    pub fn new(client: &'a HttpClient, settings: &Settings) -> Self {
        Self {
            client,
            endpoint: settings
                .search_endpoint
                .clone()
                .unwrap_or_else(default_endpoint),
        }
    }

    /// Run one keyword query for a category. `page` is 0-based, matching
    /// the index's own convention.
    pub async fn query(
        &self,
        category: &CategoryConfig,
        page: usize,
        hits_per_page: usize,
    ) -> Result<SearchResponse, FetchError> {
        let mut body = json!({
            "query": category.search_keywords,
            "hitsPerPage": hits_per_page,
            "page": page,
            "attributesToRetrieve": RETRIEVED_ATTRIBUTES,
        });
        if let Some(code) = &category.search_index_code {
            body["facetFilters"] = json!([format!("category_string_mv:{}", code)]);
        }

        let headers = [
            ("X-Algolia-Application-Id", APPLICATION_ID),
            ("X-Algolia-API-Key", API_KEY),
        ];

        let raw = self.client.post_json(&self.endpoint, &headers, &body).await?;
        let mut response = parse_response(raw);

        // Facet codes go stale; an empty facet-filtered result gets one
        // retry without the filter.
        if response.nb_hits == 0 && body.get("facetFilters").is_some() {
            if let Some(map) = body.as_object_mut() {
                map.remove("facetFilters");
            }
            let raw = self.client.post_json(&self.endpoint, &headers, &body).await?;
            response = parse_response(raw);
        }

        Ok(response)
    }
}

fn parse_response(raw: Value) -> SearchResponse {
    serde_json::from_value(raw).unwrap_or_default()
}

/// Display name of a hit, trying each known alias.
pub fn display_name(hit: &Value) -> String {
    for key in ["name_text_es", "name", "productName"] {
        if let Some(name) = hit.get(key).and_then(Value::as_str) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    String::new()
}

/// Product URL of a hit, absolutized against the site host.
pub fn hit_url(hit: &Value) -> Option<String> {
    for key in ["url_es_string", "url", "linkText"] {
        if let Some(link) = hit.get(key).and_then(Value::as_str) {
            if link.is_empty() {
                continue;
            }
            if link.starts_with("http://") || link.starts_with("https://") {
                return Some(link.to_string());
            }
            return Some(format!("{}/{}", BASE_HOST, link.trim_start_matches('/')));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_localized_field() {
        let hit = json!({"name": "generic", "name_text_es": "TV LG 55 pulgadas"});
        assert_eq!(display_name(&hit), "TV LG 55 pulgadas");
        assert_eq!(display_name(&json!({"productName": "x"})), "x");
        assert_eq!(display_name(&json!({})), "");
    }

    #[test]
    fn test_hit_url_absolutizes_relative_links() {
        let hit = json!({"url_es_string": "/tv-lg-55/p/123"});
        assert_eq!(
            hit_url(&hit).as_deref(),
            Some("https://www.alkosto.com/tv-lg-55/p/123")
        );
        let absolute = json!({"url": "https://www.alkosto.com/tv/p/9"});
        assert_eq!(
            hit_url(&absolute).as_deref(),
            Some("https://www.alkosto.com/tv/p/9")
        );
        assert_eq!(hit_url(&json!({})), None);
    }

    #[test]
    fn test_response_parses_loosely() {
        let parsed = parse_response(json!({"hits": [{"name": "a"}], "nbHits": 40}));
        assert_eq!(parsed.hits.len(), 1);
        assert_eq!(parsed.nb_hits, 40);
        // unknown shape degrades to empty, not an error
        let empty = parse_response(json!("garbage"));
        assert!(empty.hits.is_empty());
    }
}
