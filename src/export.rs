use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use crate::Result;

/// Serializes records to a CSV file, creating parent directories as
/// needed. The file starts with a UTF-8 BOM so Excel opens the accented
/// product names correctly. An empty batch leaves the previous file on
/// disk untouched.
pub fn write_csv<T: Serialize, P: AsRef<Path>>(records: &[T], path: P) -> Result<()> {
    let path = path.as_ref();

    if records.is_empty() {
        warn!("No records to export, leaving {} untouched", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    file.write_all("\u{feff}".as_bytes())?;

    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductRecord, StoreId};
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    fn sample_product() -> ProductRecord {
        ProductRecord {
            name: "Sidra Copa de Oro 750ml".to_string(),
            store: StoreId::Walmart,
            regular_price: Decimal::from(100),
            price: Decimal::from(60),
            discount: None,
        }
    }

    #[test]
    fn test_empty_batch_creates_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found_products.csv");

        write_csv::<ProductRecord, _>(&[], &path).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_file_starts_with_utf8_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found_products.csv");

        write_csv(&[sample_product()], &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], [0xEF, 0xBB, 0xBF]);
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found_products.csv");

        write_csv(&[sample_product()], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.trim_start_matches('\u{feff}').lines();
        assert_eq!(
            lines.next(),
            Some("name,store,regular_price,price,discount")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("Sidra Copa de Oro 750ml,walmart,"));
        assert!(row.contains("60.0"));
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("out.csv");

        write_csv(&[sample_product()], &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_rewrites_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found_products.csv");

        let mut first = sample_product();
        first.name = "Primera corrida".to_string();
        write_csv(&[first, sample_product()], &path).unwrap();
        write_csv(&[sample_product()], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("Primera corrida"));
        assert_eq!(content.trim_end().lines().count(), 2);
    }
}
