//! Embedded state extraction.
//!
//! The site's rendering framework serializes a JSON state blob into a
//! script tag under a handful of variable names. When the blob parses, any
//! top-level value that looks like a product map becomes a listing hit.

use regex::Regex;
use serde_json::Value;

use crate::catalog::BASE_HOST;

/// Known script-variable conventions, tried in order.
const STATE_PATTERNS: &[&str] = &[
    r"window\.__PRELOADED_STATE__\s*=\s*(\{.*?\})\s*;\s*</script>",
    r"__STATE__\s*=\s*(\{.*?\})\s*;\s*</script>",
    r"__APOLLO_STATE__\s*=\s*(\{.*?\})\s*;\s*</script>",
    r#""__NEXT_DATA__"\s*:\s*(\{.*?\})\s*,"#,
    r#""__NEXT_DATA__"\s*:\s*(\{.*?\})\s*</script>"#,
];

/// Extract the embedded state JSON from page HTML, if any pattern matches.
pub fn extract_state(html: &str) -> Option<Value> {
    for pattern in STATE_PATTERNS {
        let re = match Regex::new(&format!("(?s){}", pattern)) {
            Ok(re) => re,
            Err(_) => continue,
        };
        let Some(caps) = re.captures(html) else {
            continue;
        };
        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("");

        match serde_json::from_str::<Value>(raw) {
            Ok(state) => return Some(state),
            Err(_) => {
                // literal newlines/tabs inside string values break strict
                // parsers; strip and retry once per pattern
                let cleaned = raw.replace(['\n', '\t'], "");
                if let Ok(state) = serde_json::from_str::<Value>(&cleaned) {
                    return Some(state);
                }
            }
        }
    }
    None
}

/// Top-level values of the state that look like product records.
pub fn product_items(state: &Value) -> Vec<Value> {
    let Some(map) = state.as_object() else {
        return Vec::new();
    };
    map.values()
        .filter(|v| {
            v.is_object() && (v.get("name").is_some() || v.get("productName").is_some())
        })
        .cloned()
        .collect()
}

/// Product URL of a state item, absolutized against the site host.
pub fn item_url(item: &Value) -> Option<String> {
    for key in ["url", "linkText", "slug"] {
        if let Some(link) = item.get(key).and_then(Value::as_str) {
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
