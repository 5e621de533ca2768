//! Category registry.
//!
//! Static mapping of supported catalog categories to their listing URLs,
//! product-URL patterns and search-index parameters. Defined once at
//! process start; an unknown category name is a configuration error.

use std::sync::OnceLock;

/// Root of the catalog site. Root-relative URLs resolve against this.
pub const BASE_HOST: &str = "https://www.alkosto.com";

/// Marker substring that identifies a product detail URL on the site.
pub const PRODUCT_PATH_MARKER: &str = "/p/";

/// Configuration for one product category.
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    /// Registry key, lowercase.
    pub name: String,
    /// Category listing page.
    pub listing_url: String,
    /// Substrings expected in a valid product URL for this category.
    pub url_patterns: Vec<String>,
    /// Rough catalog size, used to bound pagination effort.
    pub expected_catalog_size: usize,
    /// Free-text query for the search index.
    pub search_keywords: String,
    /// A hit's display name must contain one of these to count as relevant.
    pub relevance_keywords: Vec<String>,
    /// Facet value restricting search hits to this category. Facet codes
    /// go stale; queries retry without them on zero hits.
    pub search_index_code: Option<String>,
}

impl CategoryConfig {
    fn new(
        name: &str,
        listing_url: &str,
        url_patterns: &[&str],
        expected_catalog_size: usize,
        search_keywords: &str,
        relevance_keywords: &[&str],
        search_index_code: Option<&str>,
    ) -> Self {
        Self {
            name: name.to_string(),
            listing_url: listing_url.to_string(),
            url_patterns: url_patterns.iter().map(|s| s.to_string()).collect(),
            expected_catalog_size,
            search_keywords: search_keywords.to_string(),
            relevance_keywords: relevance_keywords.iter().map(|s| s.to_string()).collect(),
            search_index_code: search_index_code.map(|s| s.to_string()),
        }
    }

    /// Whether a product URL matches this category's URL patterns.
    /// An empty pattern list accepts everything.
    pub fn matches_url(&self, url: &str) -> bool {
        if self.url_patterns.is_empty() {
            return true;
        }
        let lower = url.to_lowercase();
        self.url_patterns.iter().any(|p| lower.contains(&p.to_lowercase()))
    }

    /// Whether a display name looks like it belongs to this category.
    /// Guards against the search index returning loosely related items.
    pub fn is_relevant_name(&self, name: &str) -> bool {
        if self.relevance_keywords.is_empty() {
            return true;
        }
        let lower = name.to_lowercase();
        self.relevance_keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

fn build_registry() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new(
            "televisores",
            "https://www.alkosto.com/tv/smart-tv/c/BI_120_ALKOS",
            &["/tv-", "/television-", "/smart-tv-", "-tv-", "/pantalla-"],
            200,
            "television tv smart",
            &["tv", "television", "smart", "led", "oled", "qled", "pantalla"],
            Some("BI_120_ALKOS"),
        ),
        CategoryConfig::new(
            "celulares",
            "https://www.alkosto.com/celulares/smartphones/c/BI_101_ALKOS",
            &[
                "/celular-", "/smartphone-", "/telefono-", "/iphone-", "/samsung-",
                "/motorola-", "/xiaomi-",
            ],
            300,
            "celular smartphone telefono",
            &[
                "celular", "smartphone", "telefono", "iphone", "samsung", "motorola",
                "xiaomi", "huawei",
            ],
            Some("BI_101_ALKOS"),
        ),
        CategoryConfig::new(
            "domotica",
            "https://www.alkosto.com/casa-inteligente-domotica/c/BI_CAIN_ALKOS",
            &["/casa-", "/inteligente-", "/domotica-", "/sensor-", "/camara-"],
            150,
            "casa inteligente domotica sensor",
            &["casa", "inteligente", "domotica", "sensor", "camara", "smart"],
            Some("BI_CAIN_ALKOS"),
        ),
        CategoryConfig::new(
            "lavado",
            "https://www.alkosto.com/electrodomesticos/grandes-electrodomesticos/lavado/c/BI_0600_ALKOS",
            &["/lavadora-", "/secadora-"],
            100,
            "lavadora secadora",
            &["lavadora", "secadora", "lavado"],
            Some("BI_0600_ALKOS"),
        ),
        CategoryConfig::new(
            "refrigeracion",
            "https://www.alkosto.com/electrodomesticos/grandes-electrodomesticos/refrigeracion/c/BI_0610_ALKOS",
            &["/nevera-", "/refrigerador-", "/congelador-"],
            150,
            "nevera refrigerador congelador",
            &["nevera", "refrigerador", "congelador", "frigorifico"],
            Some("BI_0610_ALKOS"),
        ),
        CategoryConfig::new(
            "cocina",
            "https://www.alkosto.com/electrodomesticos/grandes-electrodomesticos/cocina/c/BI_0580_ALKOS",
            &["/estufa-", "/horno-", "/cocina-", "/microondas-"],
            120,
            "estufa horno cocina microondas",
            &["estufa", "horno", "cocina", "microondas", "cocineta"],
            Some("BI_0580_ALKOS"),
        ),
        CategoryConfig::new(
            "portatiles",
            "https://www.alkosto.com/computadores-tablet/computadores-portatiles/c/BI_104_ALKOS",
            &["/portatil-", "/laptop-", "/notebook-", "/chromebook-", "/macbook-"],
            250,
            "laptop portatil notebook computador",
            &[
                "laptop", "portatil", "notebook", "computador", "chromebook", "lenovo",
                "hp", "asus", "acer", "dell",
            ],
            Some("BI_104_ALKOS"),
        ),
        CategoryConfig::new(
            "audifonos",
            "https://www.alkosto.com/audio/audifonos/c/BI_111_ALKOS",
            &["/audifono-", "/headphone-", "/auricular-"],
            200,
            "audifono headphone auricular",
            &["audifono", "headphone", "auricular", "airpods", "beats"],
            Some("BI_111_ALKOS"),
        ),
        CategoryConfig::new(
            "videojuegos",
            "https://www.alkosto.com/videojuegos/c/BI_VIJU_ALKOS",
            &[
                "/juego-", "/consola-", "/videojuego-", "/playstation-", "/xbox-",
                "/nintendo-",
            ],
            500,
            "juego consola videojuego playstation xbox nintendo",
            &[
                "juego", "consola", "videojuego", "playstation", "xbox", "nintendo",
                "gaming",
            ],
            Some("BI_VIJU_ALKOS"),
        ),
        CategoryConfig::new(
            "deportes",
            "https://www.alkosto.com/deportes/c/BI_DEPO_ALKOS",
            &["/deporte-", "/ejercicio-", "/fitness-", "/bicicleta-"],
            300,
            "deporte ejercicio fitness bicicleta",
            &["deporte", "ejercicio", "fitness", "bicicleta", "patineta", "gym"],
            Some("BI_DEPO_ALKOS"),
        ),
    ]
}

fn registry() -> &'static [CategoryConfig] {
    static REGISTRY: OnceLock<Vec<CategoryConfig>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

/// Look up a category by name (case-insensitive, trimmed).
pub fn category_config(name: &str) -> Option<&'static CategoryConfig> {
    let key = name.trim().to_lowercase();
    registry().iter().find(|c| c.name == key)
}

/// All supported categories, registry order.
pub fn all_categories() -> &'static [CategoryConfig] {
    registry()
}
