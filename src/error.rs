//! Error taxonomy.
//!
//! Fetch failures are transient and typed; an unknown category is a fatal
//! configuration error; parse degradation is not an error at all (sentinel
//! values plus `extraction_status` carry it); validation rejections are
//! counted per batch and never abort it.

use thiserror::Error;

pub use crate::scrapers::FetchError;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Category name not present in the registry. Fatal, no retry.
    #[error("unknown category '{0}' (run `alkosto categories` for the supported list)")]
    UnknownCategory(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Output(#[from] crate::output::OutputError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
