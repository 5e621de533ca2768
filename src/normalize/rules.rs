//! Validation rules and canonical-name tables.
//!
//! The numeric knobs are hand-tuned against the production catalog and are
//! kept configurable rather than baked in. The alias tables encode the
//! brand misspellings and resolution synonyms the catalog actually ships.

use serde::Deserialize;

/// Numeric validation knobs. All overridable from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Prices below this are kept but counted as warnings.
    pub price_warn_min: u64,
    /// Prices above this are kept but counted as warnings.
    pub price_warn_max: u64,
    /// Prices above this are rejected outright.
    pub price_ceiling: u64,
    /// Screen sizes the catalog actually sells, in inches.
    pub canonical_screen_sizes: Vec<u32>,
    /// Snap a parsed size to the nearest canonical one within this many
    /// inches; farther values are kept as-is and flagged.
    pub screen_size_tolerance: u32,
    /// Screen sizes above this are rejected outright.
    pub screen_size_ceiling: u32,
    pub max_title_len: usize,
    /// Canonical resolution assigned when no alias matches.
    pub default_resolution: String,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            price_warn_min: 100_000,
            price_warn_max: 20_000_000,
            price_ceiling: 50_000_000,
            canonical_screen_sizes: vec![24, 32, 40, 43, 50, 55, 58, 60, 65, 70, 75, 77, 82, 85, 98],
            screen_size_tolerance: 2,
            screen_size_ceiling: 120,
            max_title_len: 200,
            default_resolution: "HD".to_string(),
        }
    }
}

/// Canonical brand -> aliases, matched case-insensitively whole-string.
pub const BRAND_ALIASES: &[(&str, &[&str])] = &[
    ("Samsung", &["samsung", "samsumg"]),
    ("LG", &["lg", "lg electronics"]),
    ("Sony", &["sony", "sony pictures"]),
    ("TCL", &["tcl", "t.c.l"]),
    ("Hisense", &["hisense", "hi-sense"]),
    ("Panasonic", &["panasonic", "panasonic corp"]),
    ("Philips", &["philips", "phillips"]),
    ("Xiaomi", &["xiaomi", "mi"]),
    ("Challenger", &["challenger"]),
    ("Kalley", &["kalley"]),
    ("Toshiba", &["toshiba"]),
];

/// Canonical resolution -> aliases, matched as substrings of the
/// uppercased input, most specific first.
pub const RESOLUTION_ALIASES: &[(&str, &[&str])] = &[
    ("8K", &["8K", "7680X4320"]),
    ("4K", &["4K", "UHD", "ULTRA HD", "3840X2160"]),
    ("Full HD", &["FULL HD", "FHD", "1080P", "1920X1080"]),
    ("HD", &["HD", "720P", "1366X768", "1280X720"]),
];

/// Whole-word capitalization fixes for product names.
pub const ACRONYM_CORRECTIONS: &[(&str, &str)] = &[
    ("tv", "TV"),
    ("hd", "HD"),
    ("4k", "4K"),
    ("8k", "8K"),
    ("uhd", "UHD"),
    ("fhd", "FHD"),
    ("led", "LED"),
    ("oled", "OLED"),
    ("qled", "QLED"),
];
