//! Static fallback URLs.
//!
//! Known-good product pages used only when every live strategy comes back
//! empty, so development and testing keep working when the site is fully
//! inaccessible. Never preferred over live results.

pub fn known_urls(category: &str) -> &'static [&'static str] {
    match category {
        "televisores" => &[
            "https://www.alkosto.com/tv-lg-65-pulgadas-165-cm-65ua8050-4k-uhd-led-smart-tv-con/p/8806096330241",
            "https://www.alkosto.com/tv-kalley-60-pulgadas-1524-cm-60g300-4k-uhd-led-smart-tv/p/7705946480048",
            "https://www.alkosto.com/tv-tcl-55-pulgadas-139-cm-55v6c-4k-uhd-smart-tv-google/p/6921732899387",
            "https://www.alkosto.com/tv-samsung-55-pulgadas-1397-cm-u8000f-4k-uhd-led-crystal/p/8806097027584",
            "https://www.alkosto.com/tv-challenger-40-pulgadas-101-cm-40kg84-fhd-led-smart-tv/p/7705191044835",
        ],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_televisores_has_fallbacks() {
        assert_eq!(known_urls("televisores").len(), 5);
        assert!(known_urls("celulares").is_empty());
        assert!(known_urls("unheard-of").is_empty());
    }
}
