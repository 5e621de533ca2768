//! Product parsing.
//!
//! `parse_html` turns one fetched product page into a `ProductRecord`;
//! `from_search_hit` does the same for a raw search-index hit or embedded
//! state item. Field extraction never fails: each field runs an ordered
//! chain of extractors and falls back to a sentinel, with
//! `extraction_status` carrying the degradation.

pub mod price;
pub mod specs;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::catalog::BASE_HOST;
use crate::config::Settings;
use crate::models::{ExtraValue, ExtractionStatus, ProductRecord};
use crate::utils::text::{collapse_whitespace, element_text, strip_tags};
use crate::utils::url::canonical_url;

/// One pure title/image-style extractor. The parser runs each field's
/// chain top to bottom and keeps the first non-empty result.
type TextExtractor = fn(&Html) -> Option<String>;

/// Generic title tokens that can never be a brand.
const BRAND_STOPWORDS: &[&str] = &[
    "tv", "smart", "led", "qled", "oled", "uhd", "4k", "full", "hd", "inch", "pulgadas",
    "lcd", "neo", "ultra",
];

/// Resolution tokens searched for in title/spec text, most specific first.
/// The normalizer later maps whichever alias was found onto its canonical
/// value.
const RESOLUTION_TOKENS: &[&str] = &[
    "8K", "7680X4320", "4K", "UHD", "ULTRA HD", "3840X2160", "FULL HD", "FHD", "1080P",
    "1920X1080", "HD", "720P",
];

pub struct ProductParser<'a> {
    settings: &'a Settings,
}

impl<'a> ProductParser<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Parse a fetched product page. Missing fields degrade to sentinels;
    /// only the fetch itself can fail, and that happens before this call.
    pub fn parse_html(&self, html: &str, source_url: &str, category: &str) -> ProductRecord {
        let document = Html::parse_document(html);
        let mut record = ProductRecord::new(category, canonical_url(source_url, BASE_HOST));

        const TITLE_CHAIN: &[TextExtractor] = &[
            title_from_itemprop,
            title_from_heading,
            title_from_social_meta,
            title_from_page_title,
        ];
        record.title = run_chain(&document, TITLE_CHAIN).unwrap_or_default();

        record.price = extract_price(
            &document,
            self.settings.price_parse_min,
            self.settings.price_parse_max,
        );

        let spec_map = specs::extract_specs(&document);
        record.brand = brand_from_specs(&spec_map)
            .or_else(|| brand_from_title(&record.title))
            .unwrap_or_default();

        let page_text = collapse_whitespace(&document.root_element().text().collect::<Vec<_>>().join(" "));
        record.size_label = extract_size_label(&record.title, &spec_map, &page_text, category);

        if category == "televisores" {
            if let Some(inches) = screen_inches_from(&record.title, &spec_map) {
                record
                    .extra
                    .insert("screen_inches".into(), ExtraValue::Int(inches));
            }
            if let Some(resolution) = detect_resolution(&record.title, &spec_map) {
                record
                    .extra
                    .insert("resolution".into(), ExtraValue::Text(resolution));
            }
        }

        let (rating, rating_count) = extract_rating(&document);
        record.rating = rating;
        record.rating_count = rating_count;
        if let Some(count) = rating_count {
            record
                .extra
                .insert("ratings_count".into(), ExtraValue::Int(count as i64));
        }

        const IMAGE_CHAIN: &[TextExtractor] = &[
            image_from_social_meta,
            image_from_gallery,
            image_from_any_img,
        ];
        record.image_url = run_chain(&document, IMAGE_CHAIN).map(|u| normalize_image_url(&u));

        // the trail's last entry is the product itself; the one before it
        // is the category
        if let Some(crumb) = breadcrumb_category(&document) {
            record.category = crumb;
        }

        if let Some(availability) = extract_availability(&document) {
            record
                .extra
                .insert("availability".into(), ExtraValue::Text(availability));
        }

        for (key, value) in &spec_map {
            record
                .extra
                .insert(format!("spec.{}", key), ExtraValue::Text(value.clone()));
        }

        record.extraction_status = if record.title.is_empty() {
            ExtractionStatus::MissingFields
        } else {
            ExtractionStatus::Ok
        };
        record
    }

    /// Build a record straight from a search-index hit or embedded state
    /// item, without fetching the detail page. This is the only path where
    /// a confidently-absent price is meaningful, hence `missing_price`.
    pub fn from_search_hit(&self, hit: &Value, category: &str) -> ProductRecord {
        let url = hit_string(hit, &["url_es_string", "url", "linkText", "slug"])
            .map(|link| absolutize_site_link(&link))
            .unwrap_or_default();
        let product_url = if url.is_empty() {
            String::new()
        } else {
            canonical_url(&url, BASE_HOST)
        };

        let mut record = ProductRecord::new(category, product_url);

        record.title = hit_string(hit, &["name_text_es", "name", "productName"])
            .map(|t| collapse_whitespace(&t))
            .unwrap_or_default();

        record.brand = hit_brand(hit).unwrap_or_default();
        record.price = hit_price(hit);

        record.image_url = hit_image(hit).map(|u| normalize_image_url(&u));
        record.rating = hit_rating(hit);

        if category == "televisores" {
            record.size_label = inch_label(&record.title);
            if let Some(inches) = parse_inches(&record.title) {
                record
                    .extra
                    .insert("screen_inches".into(), ExtraValue::Int(inches));
            }
        }

        if let Some(description) = hit_string(hit, &["description", "shortDescription"]) {
            let plain = strip_tags(&description);
            if !plain.is_empty() {
                record
                    .extra
                    .insert("description".into(), ExtraValue::Text(plain));
            }
        }
        if let Some(available) = hit_availability(hit) {
            record
                .extra
                .insert("available".into(), ExtraValue::Bool(available));
        }

        record.extraction_status = if record.title.is_empty() {
            ExtractionStatus::MissingFields
        } else if record.price == 0 {
            ExtractionStatus::MissingPrice
        } else {
            ExtractionStatus::Ok
        };
        record
    }
}

fn run_chain(document: &Html, chain: &[TextExtractor]) -> Option<String> {
    chain
        .iter()
        .find_map(|extract| extract(document).map(|s| collapse_whitespace(&s)).filter(|s| !s.is_empty()))
}

fn select_first_text(document: &Html, selector: &str) -> Option<String> {
    let parsed = Selector::parse(selector).ok()?;
    document.select(&parsed).next().map(element_text)
}

fn select_first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let parsed = Selector::parse(selector).ok()?;
    document
        .select(&parsed)
        .find_map(|el| el.value().attr(attr).map(|v| v.trim().to_string()))
        .filter(|v| !v.is_empty())
}

// --- title chain ---

fn title_from_itemprop(document: &Html) -> Option<String> {
    select_first_attr(document, r#"meta[itemprop="name"]"#, "content")
        .or_else(|| select_first_text(document, r#"[itemprop="name"]"#))
}

fn title_from_heading(document: &Html) -> Option<String> {
    select_first_text(document, "h1")
}

fn title_from_social_meta(document: &Html) -> Option<String> {
    select_first_attr(document, r#"meta[property="og:title"]"#, "content")
}

fn title_from_page_title(document: &Html) -> Option<String> {
    // "<product> | Alkosto" -> keep only the product part
    select_first_text(document, "title")
        .map(|t| t.split('|').next().unwrap_or("").trim().to_string())
}

// --- price chain ---

fn extract_price(document: &Html, min: u64, max: u64) -> u64 {
    // structured metadata carries a plain number
    if let Some(content) = select_first_attr(document, r#"meta[itemprop="price"]"#, "content") {
        let value = price::parse_numeric_price(&content);
        if value > 0 {
            return value;
        }
    }
    if let Some(text) = select_first_text(document, r#"[itemprop="price"]"#) {
        let value = price::parse_price_text(&text, min, max);
        if value > 0 {
            return value;
        }
    }

    for (selector, attr) in [("[data-price]", "data-price"), ("[data-product-price]", "data-product-price")] {
        if let Some(raw) = select_first_attr(document, selector, attr) {
            let value = price::parse_price_text(&raw, min, max);
            if value > 0 {
                return value;
            }
        }
    }

    if let Some(text) = select_first_text(document, ".price, .product-price, .product__price") {
        let value = price::parse_price_text(&text, min, max);
        if value > 0 {
            return value;
        }
    }

    // broad scan: anything whose class mentions price
    if let Ok(selector) = Selector::parse(r#"[class*="price"]"#) {
        for element in document.select(&selector) {
            let value = price::parse_price_text(&element_text(element), min, max);
            if value > 0 {
                return value;
            }
        }
    }
    0
}

// --- brand ---

fn brand_from_specs(spec_map: &BTreeMap<String, String>) -> Option<String> {
    spec_map
        .iter()
        .find(|(key, _)| {
            matches!(
                key.to_lowercase().as_str(),
                "marca" | "brand" | "fabricante" | "manufacturer"
            )
        })
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn capitalized_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-ZÁÉÍÓÚÑ][A-Za-zÁÉÍÓÚÑáéíóúñ0-9-]+$").expect("brand token pattern")
    })
}

fn brand_from_title(title: &str) -> Option<String> {
    for token in title.split(|c: char| c.is_whitespace() || c == ',' || c == '|') {
        let token = token.trim_matches(|c: char| "-–—:·•|,.".contains(c));
        if token.len() < 2 || token.len() > 20 {
            continue;
        }
        if BRAND_STOPWORDS.contains(&token.to_lowercase().as_str()) {
            continue;
        }
        if capitalized_token().is_match(token) {
            return Some(token.to_string());
        }
    }
    None
}

// --- size ---

fn inch_patterns() -> &'static [Regex; 2] {
    static RE: OnceLock<[Regex; 2]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r#"(\d{2,3})\s*""#).expect("inch mark pattern"),
            Regex::new(r"(?i)(\d{2,3})\s*(?:pulg|pulgadas)").expect("inch word pattern"),
        ]
    })
}

fn inch_label(text: &str) -> Option<String> {
    for pattern in inch_patterns() {
        if let Some(caps) = pattern.captures(text) {
            return Some(format!("{}\"", &caps[1]));
        }
    }
    None
}

fn parse_inches(text: &str) -> Option<i64> {
    for pattern in inch_patterns() {
        if let Some(caps) = pattern.captures(text) {
            return caps[1].parse().ok();
        }
    }
    None
}

/// Broader unit patterns for categories that are not measured in inches.
fn unit_patterns() -> &'static Vec<(Regex, &'static str)> {
    static RE: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            (r"(?i)(\d+(?:[.,]\d+)?)\s*(gb|tb)\b", "storage"),
            (r"(?i)(\d+(?:[.,]\d+)?)\s*kg\b", "kg"),
            (r"(?i)(\d+(?:[.,]\d+)?)\s*(?:litros|lts?)\b", "litros"),
            (r"(?i)(\d+)\s*puestos\b", "puestos"),
            (r"(?i)(\d+)\s*quemadores\b", "quemadores"),
        ]
        .into_iter()
        .filter_map(|(pattern, unit)| Regex::new(pattern).ok().map(|re| (re, unit)))
        .collect()
    })
}

fn extract_size_label(
    title: &str,
    spec_map: &BTreeMap<String, String>,
    page_text: &str,
    category: &str,
) -> Option<String> {
    if let Some(label) = inch_label(title) {
        return Some(label);
    }

    for (key, value) in spec_map {
        let key = key.to_lowercase();
        if key.contains("tamaño") || key.contains("tamano") || key.contains("pantalla") {
            if let Some(label) = inch_label(value) {
                return Some(label);
            }
        }
    }

    if category != "televisores" {
        for haystack in [title, page_text] {
            for (pattern, unit) in unit_patterns() {
                if let Some(caps) = pattern.captures(haystack) {
                    let amount = caps[1].replace(',', ".");
                    return Some(match *unit {
                        // the unit is the second capture for storage sizes
                        "storage" => format!("{} {}", amount, caps[2].to_uppercase()),
                        other => format!("{} {}", amount, other),
                    });
                }
            }
        }
    }
    None
}

fn screen_inches_from(title: &str, spec_map: &BTreeMap<String, String>) -> Option<i64> {
    if let Some(inches) = parse_inches(title) {
        return Some(inches);
    }
    for (key, value) in spec_map {
        let key = key.to_lowercase();
        if key.contains("tamaño") || key.contains("tamano") || key.contains("pantalla") {
            if let Some(inches) = parse_inches(value) {
                return Some(inches);
            }
        }
    }
    None
}

fn detect_resolution(title: &str, spec_map: &BTreeMap<String, String>) -> Option<String> {
    let mut haystack = title.to_uppercase();
    for (key, value) in spec_map {
        haystack.push(' ');
        haystack.push_str(&key.to_uppercase());
        haystack.push(' ');
        haystack.push_str(&value.to_uppercase());
    }
    RESOLUTION_TOKENS
        .iter()
        .find(|token| haystack.contains(**token))
        .map(|token| token.to_string())
}

// --- rating ---

fn extract_rating(document: &Html) -> (Option<f64>, Option<u32>) {
    let rating = select_first_attr(document, r#"meta[itemprop="ratingValue"]"#, "content")
        .or_else(|| select_first_text(document, r#"[itemprop="ratingValue"]"#))
        .and_then(|raw| raw.replace(',', ".").trim().parse::<f64>().ok());

    let count = select_first_attr(document, r#"meta[itemprop="reviewCount"]"#, "content")
        .or_else(|| select_first_text(document, r#"[itemprop="reviewCount"]"#))
        .and_then(|raw| {
            let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        });

    (rating, count)
}

// --- image chain ---

fn image_from_social_meta(document: &Html) -> Option<String> {
    select_first_attr(document, r#"meta[property="og:image"]"#, "content")
}

fn image_from_gallery(document: &Html) -> Option<String> {
    select_first_attr(
        document,
        r#"[itemprop="image"], #product-gallery img, .product-gallery img"#,
        "src",
    )
    .or_else(|| select_first_attr(document, r#"meta[itemprop="image"]"#, "content"))
}

fn image_from_any_img(document: &Html) -> Option<String> {
    select_first_attr(document, "img", "src")
        .or_else(|| select_first_attr(document, "img", "data-src"))
}

fn normalize_image_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("//") {
        format!("https:{}", trimmed)
    } else if trimmed.starts_with('/') {
        format!("{}{}", BASE_HOST, trimmed)
    } else {
        trimmed.to_string()
    }
}

// --- breadcrumb / availability ---

fn breadcrumb_category(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"nav a, .breadcrumb a, [itemprop="itemListElement"] a"#).ok()?;
    let crumbs: Vec<String> = document
        .select(&selector)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();
    if crumbs.len() >= 2 {
        Some(crumbs[crumbs.len() - 2].clone())
    } else {
        None
    }
}

fn extract_availability(document: &Html) -> Option<String> {
    let selector =
        Selector::parse(".availability, .stock, .product-inventory, .product-availability").ok()?;
    let text = document
        .select(&selector)
        .map(element_text)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if text.trim().is_empty() {
        return None;
    }
    if text.contains("en stock") || text.contains("disponible") {
        Some("en stock".to_string())
    } else {
        Some(collapse_whitespace(&text))
    }
}

// --- search hit field aliases ---

fn hit_string(hit: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        hit.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

fn absolutize_site_link(link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("{}/{}", BASE_HOST, link.trim_start_matches('/'))
    }
}

fn hit_brand(hit: &Value) -> Option<String> {
    hit_string(hit, &["marca_text", "brand"]).or_else(|| {
        hit.get("brand_string_mv")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|v| !v.is_empty())
    })
}

fn hit_price(hit: &Value) -> u64 {
    for key in [
        "lowestprice_double",
        "discountprice_double",
        "pricevalue_cop_double",
    ] {
        if let Some(value) = hit.get(key).and_then(Value::as_f64) {
            if value > 0.0 {
                return value as u64;
            }
        }
    }
    match hit.get("price") {
        Some(Value::Number(n)) => n.as_f64().filter(|v| *v > 0.0).map(|v| v as u64).unwrap_or(0),
        Some(Value::Object(map)) => map
            .get("value")
            .or_else(|| map.get("amount"))
            .and_then(Value::as_f64)
            .filter(|v| *v > 0.0)
            .map(|v| v as u64)
            .unwrap_or(0),
        _ => 0,
    }
}

fn hit_image(hit: &Value) -> Option<String> {
    hit_string(hit, &["img-310wx310h_string", "img-155wx155h_string"]).or_else(|| {
        hit.get("images")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| hit_string(hit, &["image"]))
    })
}

fn hit_rating(hit: &Value) -> Option<f64> {
    if let Some(score) = hit.get("averagescore_double").and_then(Value::as_f64) {
        return Some(score);
    }
    if let Some(aggregate) = hit.get("aggregateRating") {
        if let Some(value) = aggregate.get("ratingValue") {
            if let Some(score) = value.as_f64() {
                return Some(score);
            }
            if let Some(score) = value.as_str().and_then(|s| s.replace(',', ".").parse().ok()) {
                return Some(score);
            }
        }
    }
    hit.get("rating").and_then(Value::as_f64)
}

fn hit_availability(hit: &Value) -> Option<bool> {
    if let Some(flag) = hit.get("instockflag_boolean").and_then(Value::as_bool) {
        return Some(flag);
    }
    if let Some(status) = hit.get("stocklevelstatus_string").and_then(Value::as_str) {
        return Some(status == "inStock");
    }
    hit.get("availability")
        .or_else(|| hit.get("inStock"))
        .and_then(Value::as_bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parser_settings() -> Settings {
        Settings::default()
    }

    const PRODUCT_PAGE: &str = r#"
        <html>
          <head>
            <title>TV Samsung 55 Pulgadas U8000F | Alkosto</title>
            <meta property="og:title" content="TV Samsung 55 Pulgadas U8000F">
            <meta property="og:image" content="//static.alkosto.com/tv-samsung.jpg">
            <meta itemprop="price" content="1299900">
            <meta itemprop="ratingValue" content="4.5">
            <meta itemprop="reviewCount" content="128 opiniones">
          </head>
          <body>
            <nav>
              <a href="/">Inicio</a>
              <a href="/tv">Televisores</a>
              <a href="/tv/p/1">TV Samsung 55</a>
            </nav>
            <h1>TV Samsung 55" U8000F Crystal UHD 4K</h1>
            <div class="availability">Disponible para entrega</div>
            <table>
              <tr><td>Marca</td><td>Samsung</td></tr>
              <tr><td>Modelo</td><td>U8000F</td></tr>
            </table>
          </body>
        </html>"#;

    #[test]
    fn test_parse_html_full_page() {
        let settings = parser_settings();
        let parser = ProductParser::new(&settings);
        let record = parser.parse_html(
            PRODUCT_PAGE,
            "https://www.alkosto.com/tv-samsung-55/p/8806097027584?utm_source=mail",
            "televisores",
        );

        assert_eq!(record.extraction_status, ExtractionStatus::Ok);
        assert_eq!(record.title, "TV Samsung 55\" U8000F Crystal UHD 4K");
        assert_eq!(record.price, 1_299_900);
        assert_eq!(record.brand, "Samsung");
        assert_eq!(record.size_label.as_deref(), Some("55\""));
        assert_eq!(record.rating, Some(4.5));
        assert_eq!(record.rating_count, Some(128));
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://static.alkosto.com/tv-samsung.jpg")
        );
        // tracking parameters stripped
        assert_eq!(
            record.product_url,
            "https://www.alkosto.com/tv-samsung-55/p/8806097027584"
        );
        // breadcrumb override: second-to-last entry
        assert_eq!(record.category, "Televisores");
        assert_eq!(record.screen_inches(), Some(55));
        assert_eq!(
            record.extra.get("resolution").and_then(ExtraValue::as_text),
            Some("4K")
        );
        assert_eq!(
            record.extra.get("availability").and_then(ExtraValue::as_text),
            Some("en stock")
        );
        assert_eq!(
            record.extra.get("spec.Modelo").and_then(ExtraValue::as_text),
            Some("U8000F")
        );
    }

    #[test]
    fn test_parse_html_empty_page_degrades() {
        let settings = parser_settings();
        let parser = ProductParser::new(&settings);
        let record = parser.parse_html("<html><body></body></html>", "/x/p/1", "televisores");
        assert_eq!(record.extraction_status, ExtractionStatus::MissingFields);
        assert_eq!(record.title, "");
        assert_eq!(record.price, 0);
        assert_eq!(record.brand, "");
    }

    #[test]
    fn test_title_falls_back_to_page_title_without_suffix() {
        let settings = parser_settings();
        let parser = ProductParser::new(&settings);
        let record = parser.parse_html(
            "<html><head><title>Nevera LG 420 Litros | Alkosto Tienda</title></head><body></body></html>",
            "/nevera-lg/p/2",
            "refrigeracion",
        );
        assert_eq!(record.title, "Nevera LG 420 Litros");
    }

    #[test]
    fn test_price_from_css_class_scan() {
        let settings = parser_settings();
        let parser = ProductParser::new(&settings);
        let html = r#"<html><body><h1>TV TCL 55</h1>
            <span class="special-price-box">$ 1.599.900</span></body></html>"#;
        let record = parser.parse_html(html, "/tv-tcl/p/3", "televisores");
        assert_eq!(record.price, 1_599_900);
    }

    #[test]
    fn test_brand_from_title_skips_stopwords() {
        assert_eq!(
            brand_from_title("TV Kalley 60 Pulgadas 4K"),
            Some("Kalley".to_string())
        );
        assert_eq!(brand_from_title("tv smart led 4k"), None);
    }

    #[test]
    fn test_size_label_for_appliances() {
        let specs = BTreeMap::new();
        assert_eq!(
            extract_size_label("Lavadora LG 17 kg carga superior", &specs, "", "lavado"),
            Some("17 kg".to_string())
        );
        assert_eq!(
            extract_size_label("Portátil Asus 512 GB", &specs, "", "portatiles"),
            Some("512 GB".to_string())
        );
        // inch patterns do not apply outside titles that carry them
        assert_eq!(extract_size_label("Nevera LG", &specs, "", "refrigeracion"), None);
    }

    #[test]
    fn test_from_search_hit_complete() {
        let settings = parser_settings();
        let parser = ProductParser::new(&settings);
        let hit = json!({
            "name_text_es": "TV LG 65 pulgadas UHD",
            "marca_text": "LG",
            "lowestprice_double": 2399900.0,
            "url_es_string": "/tv-lg-65/p/8806096330241",
            "img-310wx310h_string": "/medias/tv-lg.jpg",
            "averagescore_double": 4.7,
            "instockflag_boolean": true,
            "description": "<p>Smart TV <b>AI</b></p>",
        });
        let record = parser.from_search_hit(&hit, "televisores");
        assert_eq!(record.extraction_status, ExtractionStatus::Ok);
        assert_eq!(record.title, "TV LG 65 pulgadas UHD");
        assert_eq!(record.brand, "LG");
        assert_eq!(record.price, 2_399_900);
        assert_eq!(
            record.product_url,
            "https://www.alkosto.com/tv-lg-65/p/8806096330241"
        );
        assert_eq!(record.size_label.as_deref(), Some("65\""));
        assert_eq!(record.rating, Some(4.7));
        assert_eq!(
            record.extra.get("description").and_then(ExtraValue::as_text),
            Some("Smart TV AI")
        );
        assert_eq!(record.extra.get("available"), Some(&ExtraValue::Bool(true)));
    }

    #[test]
    fn test_from_search_hit_statuses() {
        let settings = parser_settings();
        let parser = ProductParser::new(&settings);

        let no_title = parser.from_search_hit(&json!({"url": "/x/p/1"}), "televisores");
        assert_eq!(no_title.extraction_status, ExtractionStatus::MissingFields);

        let no_price = parser.from_search_hit(
            &json!({"name": "TV LG 55", "url": "/tv-lg/p/1"}),
            "televisores",
        );
        assert_eq!(no_price.extraction_status, ExtractionStatus::MissingPrice);
    }

    #[test]
    fn test_hit_price_aliases() {
        assert_eq!(hit_price(&json!({"discountprice_double": 999900.0})), 999_900);
        assert_eq!(
            hit_price(&json!({"price": {"value": 450000, "currency": "COP"}})),
            450_000
        );
        assert_eq!(hit_price(&json!({"price": 120000})), 120_000);
        assert_eq!(hit_price(&json!({})), 0);
    }

    #[test]
    fn test_normalize_image_url_forms() {
        assert_eq!(
            normalize_image_url("//static.alkosto.com/a.jpg"),
            "https://static.alkosto.com/a.jpg"
        );
        assert_eq!(
            normalize_image_url("/medias/a.jpg"),
            "https://www.alkosto.com/medias/a.jpg"
        );
        assert_eq!(normalize_image_url("https://cdn.x/a.jpg"), "https://cdn.x/a.jpg");
    }
}
