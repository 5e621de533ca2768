//! Product record model.
//!
//! One `ProductRecord` per extracted product. Records are immutable once
//! built; normalization produces corrected copies rather than mutating in
//! place. Missing fields are sentinels (`0`, `""`, `None`), never panics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the origin site, recorded on every extracted product.
pub const SOURCE_NAME: &str = "alkosto.com";

/// Outcome of extracting a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Title present; record is usable.
    Ok,
    /// Title could not be located.
    MissingFields,
    /// Title present but the search index reported no price.
    MissingPrice,
    /// Record failed validation and was rejected.
    Invalid,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::MissingFields => "missing_fields",
            Self::MissingPrice => "missing_price",
            Self::Invalid => "invalid",
        }
    }
}

/// Scalar value for category-specific extra attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for ExtraValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ExtraValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for ExtraValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl ExtraValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// A single extracted product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product display name. Empty means extraction failed to find one.
    pub title: String,
    /// Price in Colombian pesos (no minor units). 0 means "not found".
    pub price: u64,
    /// Price currency. The source site only trades in COP.
    pub currency: String,
    /// Brand name; "" or "unknown" when undetermined.
    pub brand: String,
    /// Free-form size label, e.g. `55"` or `8 kg`.
    pub size_label: Option<String>,
    /// Average customer rating, 0.0 to 5.0.
    pub rating: Option<f64>,
    /// Number of customer ratings behind `rating`.
    pub rating_count: Option<u32>,
    /// Main product image URL.
    pub image_url: Option<String>,
    /// Canonical product URL (absolute, tracking parameters stripped).
    pub product_url: String,
    /// Category label; breadcrumb override when present, else the
    /// registry category the scrape was invoked for.
    pub category: String,
    /// Origin site identifier.
    pub source: String,
    /// When the record was extracted.
    pub extracted_at: DateTime<Utc>,
    pub extraction_status: ExtractionStatus,
    /// Category-specific attributes (resolution, screen inches, raw specs).
    #[serde(default)]
    pub extra: BTreeMap<String, ExtraValue>,
}

impl ProductRecord {
    /// Create an empty record for a category/URL pair. Field extractors
    /// fill in whatever they can find.
    pub fn new(category: &str, product_url: String) -> Self {
        Self {
            title: String::new(),
            price: 0,
            currency: "COP".to_string(),
            brand: String::new(),
            size_label: None,
            rating: None,
            rating_count: None,
            image_url: None,
            product_url,
            category: category.to_string(),
            source: SOURCE_NAME.to_string(),
            extracted_at: Utc::now(),
            extraction_status: ExtractionStatus::MissingFields,
            extra: BTreeMap::new(),
        }
    }

    /// Screen size in inches, when the parser recorded one.
    pub fn screen_inches(&self) -> Option<i64> {
        self.extra.get("screen_inches").and_then(ExtraValue::as_int)
    }

    pub fn has_usable_price(&self) -> bool {
        self.price > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ExtractionStatus::MissingPrice).unwrap();
        assert_eq!(json, "\"missing_price\"");
    }

    #[test]
    fn test_extra_value_untagged_round_trip() {
        let mut extra: BTreeMap<String, ExtraValue> = BTreeMap::new();
        extra.insert("screen_inches".into(), ExtraValue::Int(55));
        extra.insert("resolution".into(), ExtraValue::from("4K"));
        extra.insert("available".into(), ExtraValue::Bool(true));

        let json = serde_json::to_string(&extra).unwrap();
        let back: BTreeMap<String, ExtraValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, extra);
    }

    #[test]
    fn test_record_json_round_trip_is_stable() {
        let mut record = ProductRecord::new("televisores", "https://www.alkosto.com/tv/p/1".into());
        record.title = "TV LG 55 Pulgadas".into();
        record.price = 1_299_900;
        record.brand = "LG".into();
        record.size_label = Some("55\"".into());
        record.rating = Some(4.5);
        record.extraction_status = ExtractionStatus::Ok;
        record.extra.insert("screen_inches".into(), ExtraValue::Int(55));

        let first = serde_json::to_string(&record).unwrap();
        let parsed: ProductRecord = serde_json::from_str(&first).unwrap();
        let second = serde_json::to_string(&parsed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_screen_inches_accessor() {
        let mut record = ProductRecord::new("televisores", "u".into());
        assert_eq!(record.screen_inches(), None);
        record.extra.insert("screen_inches".into(), ExtraValue::Int(65));
        assert_eq!(record.screen_inches(), Some(65));
    }
}
