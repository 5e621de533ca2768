//! Price text parsing.
//!
//! Listing and detail pages render prices as free text ("$1.299.900",
//! "COP 45,000", "Antes $2.499.900"). Parsing strips currency words, pulls
//! digit runs of at least four digits regardless of thousands-separator
//! style, and rejects values outside a sanity band so phone numbers and
//! SKUs never masquerade as prices.

use std::sync::OnceLock;

use regex::Regex;

fn currency_words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(precio|antes|ahora|oferta|ahorra|tarjeta|efectivo|con|desde)")
            .expect("currency word pattern")
    })
}

fn digit_chunks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d.,]{4,}").expect("digit chunk pattern"))
}

/// Parse a COP price out of free text. Returns 0 when nothing in the text
/// survives the minimum-digit floor and the sanity band.
pub fn parse_price_text(text: &str, min: u64, max: u64) -> u64 {
    let cleaned = text.replace('\u{a0}', " ");
    let cleaned = currency_words().replace_all(&cleaned, " ");

    for chunk in digit_chunks().find_iter(&cleaned) {
        let digits: String = chunk
            .as_str()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.len() < 4 {
            continue;
        }
        if let Ok(value) = digits.parse::<u64>() {
            if value >= min && value <= max {
                return value;
            }
        }
    }
    0
}

/// Parse a microdata price attribute, which is a plain decimal number.
pub fn parse_numeric_price(text: &str) -> u64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: u64 = 10_000;
    const MAX: u64 = 50_000_000;

    #[test]
    fn test_colombian_dot_separators() {
        assert_eq!(parse_price_text("$1.299.900", MIN, MAX), 1_299_900);
    }

    #[test]
    fn test_comma_separators_with_currency_word() {
        assert_eq!(parse_price_text("COP 45,000", MIN, MAX), 45_000);
    }

    #[test]
    fn test_short_numbers_are_rejected() {
        // 3 digits is below the minimum-digit floor
        assert_eq!(parse_price_text("solo 123", MIN, MAX), 0);
    }

    #[test]
    fn test_out_of_band_values_are_rejected() {
        assert_eq!(parse_price_text("9999", MIN, MAX), 0);
        assert_eq!(parse_price_text("$99.999.999.999", MIN, MAX), 0);
    }

    #[test]
    fn test_currency_words_are_stripped() {
        assert_eq!(
            parse_price_text("Antes $2.499.900 Ahora $1.999.900", MIN, MAX),
            2_499_900
        );
    }

    #[test]
    fn test_nbsp_is_tolerated() {
        assert_eq!(parse_price_text("$\u{a0}1.299.900", MIN, MAX), 1_299_900);
    }

    #[test]
    fn test_numeric_attribute_price() {
        assert_eq!(parse_numeric_price("1299900"), 1_299_900);
        assert_eq!(parse_numeric_price("1299900.0"), 1_299_900);
        assert_eq!(parse_numeric_price("not a number"), 0);
        assert_eq!(parse_numeric_price("-5"), 0);
    }
}
