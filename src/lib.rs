//! Alkosto catalog extraction library.
//!
//! Extracts product listings from alkosto.com across several product
//! categories and persists them to flat files for comparison. The site
//! serves content three different ways (server-rendered HTML, an embedded
//! JSON state blob, and an Algolia search index), so listing discovery and
//! product parsing are both layered fallback chains.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod renderer;
pub mod scrapers;
pub mod utils;
