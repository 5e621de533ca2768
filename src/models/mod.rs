//! Record types produced by the extraction pipeline.

mod product;

pub use product::{ExtraValue, ExtractionStatus, ProductRecord, SOURCE_NAME};
