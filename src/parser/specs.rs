//! Spec-sheet extraction.
//!
//! Product pages render specifications three ways: keyword-bearing tables,
//! definition lists, and list items with a bold label. All three are merged
//! into one map; the first source to provide a key wins.

use std::collections::BTreeMap;

use scraper::{Html, Selector};

use crate::utils::text::element_text;

/// A table only counts as a spec sheet when its text mentions one of
/// these.
const SPEC_TABLE_KEYWORDS: &[&str] = &[
    "marca", "modelo", "sku", "ean", "garant", "color", "dimens", "peso",
];

pub fn extract_specs(document: &Html) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();

    collect_from_tables(document, &mut specs);
    collect_from_definition_lists(document, &mut specs);
    collect_from_labeled_items(document, &mut specs);

    specs
}

fn collect_from_tables(document: &Html, specs: &mut BTreeMap<String, String>) {
    let (Ok(table_sel), Ok(row_sel), Ok(cell_sel)) = (
        Selector::parse("table"),
        Selector::parse("tr"),
        Selector::parse("td, th"),
    ) else {
        return;
    };

    for table in document.select(&table_sel) {
        let table_text = element_text(table).to_lowercase();
        if !SPEC_TABLE_KEYWORDS.iter().any(|k| table_text.contains(k)) {
            continue;
        }
        for row in table.select(&row_sel) {
            let cells: Vec<_> = row.select(&cell_sel).collect();
            if cells.len() < 2 {
                continue;
            }
            let key = element_text(cells[0]);
            let value = element_text(cells[1]);
            if !key.is_empty() && !value.is_empty() {
                specs.entry(key).or_insert(value);
            }
        }
    }
}

fn collect_from_definition_lists(document: &Html, specs: &mut BTreeMap<String, String>) {
    let (Ok(dl_sel), Ok(dt_sel), Ok(dd_sel)) = (
        Selector::parse("dl"),
        Selector::parse("dt"),
        Selector::parse("dd"),
    ) else {
        return;
    };

    for dl in document.select(&dl_sel) {
        let terms: Vec<_> = dl.select(&dt_sel).collect();
        let definitions: Vec<_> = dl.select(&dd_sel).collect();
        if terms.is_empty() || terms.len() != definitions.len() {
            continue;
        }
        for (term, definition) in terms.iter().zip(definitions.iter()) {
            let key = element_text(*term);
            let value = element_text(*definition);
            if !key.is_empty() && !value.is_empty() {
                specs.entry(key).or_insert(value);
            }
        }
    }
}

fn collect_from_labeled_items(document: &Html, specs: &mut BTreeMap<String, String>) {
    let (Ok(li_sel), Ok(label_sel)) = (Selector::parse("li"), Selector::parse("strong, b")) else {
        return;
    };

    for item in document.select(&li_sel) {
        let Some(label) = item.select(&label_sel).next() else {
            continue;
        };
        let key = element_text(label);
        if key.is_empty() {
            continue;
        }
        let value = element_text(item)
            .replacen(&key, "", 1)
            .trim_matches(|c: char| " :\t-—–•".contains(c))
            .to_string();
        if !value.is_empty() {
            specs.entry(key).or_insert(value);
        }
    }
}
