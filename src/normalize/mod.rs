//! Normalization and validation.
//!
//! A pure batch transform: clean each record (name, price, size, rating,
//! brand, resolution, URL), then gate it through the final validity rules.
//! One bad record never aborts the batch; rejections are counted per
//! reason and dropped. Records are immutable, so every correction builds a
//! new record.

mod rules;

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

pub use rules::{ValidationRules, ACRONYM_CORRECTIONS, BRAND_ALIASES, RESOLUTION_ALIASES};

use crate::catalog::BASE_HOST;
use crate::models::{ExtraValue, ProductRecord};
use crate::utils::text::{collapse_whitespace, title_case};
use crate::utils::url::canonical_url;

/// Why a record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingTitle,
    MissingUrl,
    /// Neither a usable price nor a usable size: noise.
    NoPriceNoSize,
    PriceCeiling,
    SizeCeiling,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    pub missing_title: usize,
    pub missing_url: usize,
    pub no_price_no_size: usize,
    pub price_ceiling: usize,
    pub size_ceiling: usize,
}

impl RejectionCounts {
    fn count(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::MissingTitle => self.missing_title += 1,
            RejectReason::MissingUrl => self.missing_url += 1,
            RejectReason::NoPriceNoSize => self.no_price_no_size += 1,
            RejectReason::PriceCeiling => self.price_ceiling += 1,
            RejectReason::SizeCeiling => self.size_ceiling += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_title
            + self.missing_url
            + self.no_price_no_size
            + self.price_ceiling
            + self.size_ceiling
    }
}

/// Outcome of normalizing one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub accepted: usize,
    pub rejected: usize,
    pub warnings: usize,
    pub rejections: RejectionCounts,
}

pub struct Normalizer {
    rules: ValidationRules,
}

impl Normalizer {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    /// Clean and validate a batch. Returns the surviving records and a
    /// report of what was corrected, flagged and dropped.
    pub fn normalize_batch(&self, records: Vec<ProductRecord>) -> (Vec<ProductRecord>, BatchReport) {
        let mut report = BatchReport::default();
        let mut valid = Vec::with_capacity(records.len());

        for record in &records {
            let cleaned = self.normalize_record(record, &mut report);
            match self.validate(&cleaned) {
                None => {
                    report.accepted += 1;
                    valid.push(cleaned);
                }
                Some(reason) => {
                    report.rejected += 1;
                    report.rejections.count(reason);
                    debug!(
                        "rejected ({:?}): {}",
                        reason,
                        &cleaned.title.chars().take(50).collect::<String>()
                    );
                }
            }
        }

        (valid, report)
    }

    /// Apply every per-record rule, producing a corrected copy.
    fn normalize_record(&self, record: &ProductRecord, report: &mut BatchReport) -> ProductRecord {
        let mut out = record.clone();

        out.title = self.normalize_title(&record.title);

        if out.price > 0 {
            if out.price < self.rules.price_warn_min {
                report.warnings += 1;
                warn!("price below expected floor: ${}", out.price);
            } else if out.price > self.rules.price_warn_max {
                report.warnings += 1;
                warn!("price above expected ceiling: ${}", out.price);
            }
        }

        if let Some(inches) = record.screen_inches().filter(|v| *v > 0) {
            let (snapped, flagged) = self.snap_screen_size(inches as u32);
            if flagged {
                report.warnings += 1;
                warn!("unusual screen size: {}\"", inches);
            } else if i64::from(snapped) != inches {
                out.extra
                    .insert("screen_inches".into(), ExtraValue::Int(i64::from(snapped)));
                out.size_label = Some(format!("{}\"", snapped));
            }
        }

        if let Some(rating) = record.rating {
            out.rating = Some((rating.clamp(0.0, 5.0) * 10.0).round() / 10.0);
        }

        out.brand = self.normalize_brand(&record.brand);

        match record.extra.get("resolution").and_then(ExtraValue::as_text) {
            Some(raw) => {
                let canonical = self.canonical_resolution(raw);
                out.extra
                    .insert("resolution".into(), ExtraValue::Text(canonical));
            }
            // records with a screen are expected to carry a resolution
            None if record.screen_inches().is_some() => {
                out.extra.insert(
                    "resolution".into(),
                    ExtraValue::Text(self.rules.default_resolution.clone()),
                );
            }
            None => {}
        }

        if !record.product_url.is_empty() {
            out.product_url = canonical_url(&record.product_url, BASE_HOST);
        }

        out
    }

    /// Final validity gate. `None` means the record survives.
    fn validate(&self, record: &ProductRecord) -> Option<RejectReason> {
        if record.title.is_empty() {
            return Some(RejectReason::MissingTitle);
        }
        if record.product_url.is_empty() {
            return Some(RejectReason::MissingUrl);
        }
        let size = record.screen_inches().unwrap_or(0);
        if record.price == 0 && size <= 0 {
            return Some(RejectReason::NoPriceNoSize);
        }
        if record.price > self.rules.price_ceiling {
            return Some(RejectReason::PriceCeiling);
        }
        if size > i64::from(self.rules.screen_size_ceiling) {
            return Some(RejectReason::SizeCeiling);
        }
        None
    }

    /// Clean a product name: collapse whitespace, drop unsafe characters,
    /// fix acronym capitalization, truncate.
    pub fn normalize_title(&self, raw: &str) -> String {
        static UNSAFE: OnceLock<Regex> = OnceLock::new();
        let unsafe_chars =
            UNSAFE.get_or_init(|| Regex::new(r#"[^\w\s\-"']"#).expect("unsafe char pattern"));

        let cleaned = collapse_whitespace(raw);
        let cleaned = unsafe_chars.replace_all(&cleaned, "");
        let corrected = cleaned
            .split_whitespace()
            .map(|word| {
                ACRONYM_CORRECTIONS
                    .iter()
                    .find(|(alias, _)| word.eq_ignore_ascii_case(alias))
                    .map(|(_, fixed)| fixed.to_string())
                    .unwrap_or_else(|| word.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ");

        corrected.chars().take(self.rules.max_title_len).collect()
    }

    /// Map a brand onto its canonical name; unknown brands pass through
    /// title-cased, empty brands become the "unknown" sentinel.
    pub fn normalize_brand(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return "unknown".to_string();
        }
        let folded = trimmed.to_lowercase();
        for (canonical, aliases) in BRAND_ALIASES {
            if aliases.iter().any(|alias| *alias == folded) {
                return canonical.to_string();
            }
        }
        title_case(trimmed)
    }

    /// Map a resolution label onto its canonical value; unmatched input
    /// gets the configured default.
    pub fn canonical_resolution(&self, raw: &str) -> String {
        let upper = raw.trim().to_uppercase();
        if !upper.is_empty() {
            for (canonical, aliases) in RESOLUTION_ALIASES {
                if aliases.iter().any(|alias| upper.contains(alias)) {
                    return canonical.to_string();
                }
            }
        }
        self.rules.default_resolution.clone()
    }

    /// Snap a screen size to the nearest canonical value within tolerance.
    /// Returns the (possibly snapped) size and whether it was flagged as
    /// unusual.
    pub fn snap_screen_size(&self, inches: u32) -> (u32, bool) {
        let Some(closest) = self
            .rules
            .canonical_screen_sizes
            .iter()
            .copied()
            .min_by_key(|candidate| candidate.abs_diff(inches))
        else {
            return (inches, false);
        };

        if closest.abs_diff(inches) <= self.rules.screen_size_tolerance {
            (closest, false)
        } else {
            (inches, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionStatus;

    fn normalizer() -> Normalizer {
        Normalizer::new(ValidationRules::default())
    }

    fn record(title: &str, price: u64, url: &str) -> ProductRecord {
        let mut r = ProductRecord::new("televisores", url.to_string());
        r.title = title.to_string();
        r.price = price;
        r.extraction_status = ExtractionStatus::Ok;
        r
    }

    #[test]
    fn test_title_acronym_corrections() {
        let n = normalizer();
        assert_eq!(
            n.normalize_title("tv samsung 55 uhd 4k led"),
            "TV samsung 55 UHD 4K LED"
        );
        assert_eq!(n.normalize_title("  Nevera  LG\t420 "), "Nevera LG 420");
    }

    #[test]
    fn test_title_strips_unsafe_chars_and_truncates() {
        let n = normalizer();
        assert_eq!(n.normalize_title("TV LG® <55> ¡4k!"), "TV LG 55 4K");
        let long = "x".repeat(300);
        assert_eq!(n.normalize_title(&long).chars().count(), 200);
    }

    #[test]
    fn test_brand_alias_table() {
        let n = normalizer();
        // misspelling present in the alias table
        assert_eq!(n.normalize_brand("samsumg"), "Samsung");
        assert_eq!(n.normalize_brand("LG ELECTRONICS"), "LG");
        // unlisted brand passes through
        assert_eq!(n.normalize_brand("Zretz"), "Zretz");
        assert_eq!(n.normalize_brand(""), "unknown");
    }

    #[test]
    fn test_resolution_canonicalization() {
        let n = normalizer();
        assert_eq!(n.canonical_resolution("Ultra HD"), "4K");
        assert_eq!(n.canonical_resolution("1080p"), "Full HD");
        assert_eq!(n.canonical_resolution("rara"), "HD");
    }

    #[test]
    fn test_screen_size_snapping() {
        let n = normalizer();
        // 56 -> 55 within tolerance 2
        assert_eq!(n.snap_screen_size(56), (55, false));
        // 60 is canonical itself
        assert_eq!(n.snap_screen_size(60), (60, false));
        // 62 -> 60 within tolerance
        assert_eq!(n.snap_screen_size(62), (60, false));
        // 110's nearest canonical is 98, distance 12 > 2: kept and flagged
        assert_eq!(n.snap_screen_size(110), (110, true));
    }

    #[test]
    fn test_snapping_respects_configured_canonical_set() {
        let n = Normalizer::new(ValidationRules {
            canonical_screen_sizes: vec![55, 65],
            ..ValidationRules::default()
        });
        // nearest canonical is 55, within tolerance
        assert_eq!(n.snap_screen_size(56), (55, false));
        // nearest canonical is 65 at distance 5 > tolerance: kept, flagged
        assert_eq!(n.snap_screen_size(60), (60, true));
    }

    #[test]
    fn test_rating_clamp_and_round() {
        let n = normalizer();
        let mut r = record("TV LG", 1_000_000, "https://www.alkosto.com/tv/p/1");
        r.rating = Some(5.7);
        let (valid, _) = n.normalize_batch(vec![r]);
        assert_eq!(valid[0].rating, Some(5.0));

        let mut r = record("TV LG", 1_000_000, "https://www.alkosto.com/tv/p/1");
        r.rating = Some(4.449);
        let (valid, _) = n.normalize_batch(vec![r]);
        assert_eq!(valid[0].rating, Some(4.4));
    }

    #[test]
    fn test_validity_gate() {
        let n = normalizer();
        let records = vec![
            record("TV LG 55", 1_200_000, "https://www.alkosto.com/tv-lg/p/1"),
            // empty title
            record("", 1_200_000, "https://www.alkosto.com/tv/p/2"),
            // neither price nor size
            record("TV misterioso", 0, "https://www.alkosto.com/tv/p/3"),
            // over the absolute ceiling
            record("TV de oro", 60_000_000, "https://www.alkosto.com/tv/p/4"),
        ];
        let (valid, report) = n.normalize_batch(records);
        assert_eq!(valid.len(), 1);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.rejected, 3);
        assert_eq!(report.rejections.missing_title, 1);
        assert_eq!(report.rejections.no_price_no_size, 1);
        assert_eq!(report.rejections.price_ceiling, 1);
        assert_eq!(report.rejections.total(), 3);
    }

    #[test]
    fn test_priceless_record_with_size_survives() {
        let n = normalizer();
        let mut r = record("TV Kalley 58", 0, "https://www.alkosto.com/tv-kalley/p/5");
        r.extra.insert("screen_inches".into(), ExtraValue::Int(58));
        let (valid, report) = n.normalize_batch(vec![r]);
        assert_eq!(valid.len(), 1);
        assert_eq!(report.rejected, 0);
        // a record with a screen gets the default resolution
        assert_eq!(
            valid[0].extra.get("resolution").and_then(ExtraValue::as_text),
            Some("HD")
        );
    }

    #[test]
    fn test_snapped_size_updates_label() {
        let n = normalizer();
        let mut r = record("TV LG 56", 1_500_000, "https://www.alkosto.com/tv-lg/p/6");
        r.extra.insert("screen_inches".into(), ExtraValue::Int(56));
        r.size_label = Some("56\"".into());
        let (valid, report) = n.normalize_batch(vec![r]);
        assert_eq!(valid[0].screen_inches(), Some(55));
        assert_eq!(valid[0].size_label.as_deref(), Some("55\""));
        assert_eq!(report.warnings, 0);
    }

    #[test]
    fn test_out_of_band_price_warns_but_survives() {
        let n = normalizer();
        let r = record("Cable HDMI", 45_000, "https://www.alkosto.com/cable/p/7");
        let (valid, report) = n.normalize_batch(vec![r]);
        assert_eq!(valid.len(), 1);
        assert_eq!(report.warnings, 1);
    }

    #[test]
    fn test_url_is_canonicalized() {
        let n = normalizer();
        let r = record("TV LG 55", 1_000_000, "/tv-lg/p/8?utm_campaign=promo");
        let (valid, _) = n.normalize_batch(vec![r]);
        assert_eq!(valid[0].product_url, "https://www.alkosto.com/tv-lg/p/8");
    }
}
