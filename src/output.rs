//! Output writers.
//!
//! One-shot file dumps: a JSON document with aggregate metadata, a JSONL
//! stream of bare records, or a flat CSV. The only cross-run operation is
//! locating and loading the most recent JSON dump for the report command.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ProductRecord, SOURCE_NAME};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unsupported output extension '{0}' (use .json, .jsonl or .csv)")]
    UnsupportedExtension(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonLines,
    Csv,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, OutputError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "jsonl" => Ok(Self::JsonLines),
            "csv" => Ok(Self::Csv),
            other => Err(OutputError::UnsupportedExtension(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandCount {
    pub brand: String,
    pub count: usize,
}

/// Aggregate statistics for one category of records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    pub count: usize,
    pub price_min: u64,
    pub price_max: u64,
    pub price_mean: f64,
    pub top_brands: Vec<BrandCount>,
    pub rating_mean: Option<f64>,
    pub with_image: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub source: String,
    pub extracted_at: DateTime<Utc>,
    pub total_records: usize,
    pub categories: BTreeMap<String, CategoryStats>,
}

/// The JSON output document: metadata envelope plus the records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionDocument {
    pub metadata: Metadata,
    pub records: Vec<ProductRecord>,
}

impl ExtractionDocument {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        let categories = category_stats(&records);
        Self {
            metadata: Metadata {
                source: SOURCE_NAME.to_string(),
                extracted_at: Utc::now(),
                total_records: records.len(),
                categories,
            },
            records,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-category statistics: price min/max/mean over priced records, the
/// five most frequent brands, mean rating, and image coverage.
pub fn category_stats(records: &[ProductRecord]) -> BTreeMap<String, CategoryStats> {
    let mut grouped: BTreeMap<&str, Vec<&ProductRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.category.as_str()).or_default().push(record);
    }

    let mut stats = BTreeMap::new();
    for (category, group) in grouped {
        let prices: Vec<u64> = group.iter().map(|r| r.price).filter(|p| *p > 0).collect();
        let ratings: Vec<f64> = group.iter().filter_map(|r| r.rating).collect();

        let mut brand_counts: HashMap<&str, usize> = HashMap::new();
        for record in &group {
            if !record.brand.is_empty() {
                *brand_counts.entry(record.brand.as_str()).or_default() += 1;
            }
        }
        let mut top_brands: Vec<BrandCount> = brand_counts
            .into_iter()
            .map(|(brand, count)| BrandCount {
                brand: brand.to_string(),
                count,
            })
            .collect();
        top_brands.sort_by(|a, b| b.count.cmp(&a.count).then(a.brand.cmp(&b.brand)));
        top_brands.truncate(5);

        stats.insert(
            category.to_string(),
            CategoryStats {
                count: group.len(),
                price_min: prices.iter().copied().min().unwrap_or(0),
                price_max: prices.iter().copied().max().unwrap_or(0),
                price_mean: if prices.is_empty() {
                    0.0
                } else {
                    round2(prices.iter().sum::<u64>() as f64 / prices.len() as f64)
                },
                top_brands,
                rating_mean: if ratings.is_empty() {
                    None
                } else {
                    Some(round2(ratings.iter().sum::<f64>() / ratings.len() as f64))
                },
                with_image: group.iter().filter(|r| r.image_url.is_some()).count(),
            },
        );
    }
    stats
}

/// Write records to a path, dispatching on its extension.
pub fn write_records(path: &Path, records: &[ProductRecord]) -> Result<OutputFormat, OutputError> {
    let format = OutputFormat::from_path(path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    match format {
        OutputFormat::Json => write_json(path, records)?,
        OutputFormat::JsonLines => write_jsonl(path, records)?,
        OutputFormat::Csv => write_csv(path, records)?,
    }
    Ok(format)
}

fn write_json(path: &Path, records: &[ProductRecord]) -> Result<(), OutputError> {
    let document = ExtractionDocument::new(records.to_vec());
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.flush()?;
    Ok(())
}

fn write_jsonl(path: &Path, records: &[ProductRecord]) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

const CSV_HEADERS: &[&str] = &[
    "title",
    "price",
    "currency",
    "brand",
    "size_label",
    "rating",
    "rating_count",
    "image_url",
    "product_url",
    "category",
    "source",
    "extracted_at",
    "extraction_status",
    "extra",
];

fn write_csv(path: &Path, records: &[ProductRecord]) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        // the open attribute map goes into a single JSON-encoded column
        let extra = if record.extra.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&record.extra)?
        };
        let row = vec![
            record.title.clone(),
            record.price.to_string(),
            record.currency.clone(),
            record.brand.clone(),
            record.size_label.clone().unwrap_or_default(),
            record.rating.map(|r| r.to_string()).unwrap_or_default(),
            record.rating_count.map(|c| c.to_string()).unwrap_or_default(),
            record.image_url.clone().unwrap_or_default(),
            record.product_url.clone(),
            record.category.clone(),
            record.source.clone(),
            record.extracted_at.to_rfc3339(),
            record.extraction_status.as_str().to_string(),
            extra,
        ];
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load a previously written JSON document.
pub fn load_json(path: &Path) -> Result<ExtractionDocument, OutputError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Most recently modified `alkosto_*.json` dump in a directory.
pub fn latest_file(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with("alkosto_") && name.ends_with(".json")
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

/// Default output path for a scrape run: `alkosto_<category>_<timestamp>.json`.
pub fn default_output_path(dir: &Path, category: &str, at: DateTime<Utc>) -> PathBuf {
    dir.join(format!(
        "alkosto_{}_{}.json",
        category,
        at.format("%Y%m%d_%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionStatus;

    fn record(category: &str, brand: &str, price: u64, rating: Option<f64>) -> ProductRecord {
        let mut r = ProductRecord::new(category, format!("https://www.alkosto.com/{}/p/1", brand));
        r.title = format!("{} producto", brand);
        r.brand = brand.to_string();
        r.price = price;
        r.rating = rating;
        r.extraction_status = ExtractionStatus::Ok;
        r
    }

    #[test]
    fn test_format_dispatch() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/productos.json")).unwrap(),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("x.JSONL")).unwrap(),
            OutputFormat::JsonLines
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("x.csv")).unwrap(),
            OutputFormat::Csv
        );
        assert!(OutputFormat::from_path(Path::new("x.xml")).is_err());
    }

    #[test]
    fn test_category_stats() {
        let records = vec![
            record("televisores", "LG", 1_000_000, Some(4.0)),
            record("televisores", "LG", 3_000_000, Some(5.0)),
            record("televisores", "Samsung", 2_000_000, None),
            // price 0 is "not found" and stays out of price stats
            record("televisores", "Kalley", 0, None),
        ];
        let stats = category_stats(&records);
        let tv = stats.get("televisores").unwrap();
        assert_eq!(tv.count, 4);
        assert_eq!(tv.price_min, 1_000_000);
        assert_eq!(tv.price_max, 3_000_000);
        assert_eq!(tv.price_mean, 2_000_000.0);
        assert_eq!(tv.rating_mean, Some(4.5));
        assert_eq!(tv.top_brands[0].brand, "LG");
        assert_eq!(tv.top_brands[0].count, 2);
        assert_eq!(tv.with_image, 0);
    }

    #[test]
    fn test_stats_for_empty_batch() {
        let stats = category_stats(&[]);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_default_output_path_shape() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let path = default_output_path(Path::new("data"), "televisores", at);
        assert_eq!(
            path,
            Path::new("data/alkosto_televisores_20240501_103000.json")
        );
    }
}
