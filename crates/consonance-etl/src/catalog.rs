//! Loading the artist catalog from CSV.
//!
//! The file must have a header row. Only the configured name and tag
//! columns are read; any other columns (a leading index, listener counts)
//! are ignored. Empty cells become missing fields and are dropped later by
//! catalog preparation.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use consonance_core::model::RawCatalogRow;
use consonance_search::Catalog;

use crate::config::Config;
use crate::error::{EtlError, EtlResult};

/// Header names of the catalog columns to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumns {
    pub name: String,
    pub tags: String,
}

impl CatalogColumns {
    pub fn new(name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into(),
        }
    }
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self::new("Name", "Tags")
    }
}

/// Read raw catalog rows from a CSV file.
///
/// # Errors
///
/// Returns [`EtlError::Catalog`] if the file cannot be opened or lacks one
/// of the configured columns, and [`EtlError::Csv`] for malformed records.
pub fn load_catalog(path: &Path, columns: &CatalogColumns) -> EtlResult<Vec<RawCatalogRow>> {
    let file = std::fs::File::open(path).map_err(|e| EtlError::Catalog {
        path: path.to_path_buf(),
        message: format!("cannot open: {e}"),
    })?;

    read_catalog(file, columns).map_err(|e| match e {
        EtlError::Catalog { message, .. } => EtlError::Catalog {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Read raw catalog rows from any CSV source.
///
/// # Errors
///
/// See [`load_catalog`]. Errors from this function carry an empty path.
pub fn read_catalog<R: Read>(reader: R, columns: &CatalogColumns) -> EtlResult<Vec<RawCatalogRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    let position = |column: &str| {
        headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| EtlError::Catalog {
                path: Default::default(),
                message: format!(
                    "missing column '{column}' (available: {})",
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            })
    };
    let name_idx = position(columns.name.as_str())?;
    let tags_idx = position(columns.tags.as_str())?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(RawCatalogRow {
            name: cell(&record, name_idx),
            tags: cell(&record, tags_idx),
        });
    }

    log::debug!("Read {} catalog rows", rows.len());
    Ok(rows)
}

fn cell(record: &csv::StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

/// Load and prepare the catalog named by `config`, ready to be shared
/// across requests.
///
/// # Errors
///
/// Returns loading errors, or [`consonance_core::Error::EmptyCorpus`]
/// (wrapped in [`EtlError::Core`]) if nothing usable remains.
pub fn open_catalog(config: &Config) -> EtlResult<Arc<Catalog>> {
    log::info!("Loading catalog from {}", config.catalog_path.display());
    let raw = load_catalog(&config.catalog_path, &config.catalog_columns())?;
    let catalog = Catalog::prepare(&raw)?;
    Ok(Arc::new(catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
,Name,Tags
0,Radiohead,alternative rock electronic
1,Portishead,triphop electronic
2,,folk
3,Low,
4,Radiohead,britpop
";

    #[test]
    fn test_read_catalog_selects_columns() {
        let rows = read_catalog(CSV.as_bytes(), &CatalogColumns::default()).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], RawCatalogRow::new("Radiohead", "alternative rock electronic"));
        assert_eq!(rows[2].name, None);
        assert_eq!(rows[3].tags, None);
    }

    #[test]
    fn test_read_catalog_custom_columns() {
        let csv = "artist,genres\nBjörk,experimental\n";
        let columns = CatalogColumns::new("artist", "genres");
        let rows = read_catalog(csv.as_bytes(), &columns).unwrap();
        assert_eq!(rows, vec![RawCatalogRow::new("Björk", "experimental")]);
    }

    #[test]
    fn test_read_catalog_missing_column() {
        let err = read_catalog("Name,Genre\nLow,slowcore\n".as_bytes(), &CatalogColumns::default())
            .unwrap_err();
        assert!(matches!(err, EtlError::Catalog { ref message, .. } if message.contains("'Tags'")));
    }

    #[test]
    fn test_load_catalog_reports_path() {
        let err = load_catalog(Path::new("/nonexistent/artists.csv"), &CatalogColumns::default())
            .unwrap_err();
        match err {
            EtlError::Catalog { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/artists.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_catalog_prepares() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let config = Config {
            catalog_path: file.path().to_path_buf(),
            ..Config::default()
        };
        let catalog = open_catalog(&config).unwrap();
        let report = catalog.report();
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.dropped_incomplete, 2);
        assert_eq!(report.dropped_duplicate, 1);
        assert_eq!(report.kept, 2);
    }

    #[test]
    fn test_open_catalog_empty_corpus() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Name,Tags\n,\n,\n").unwrap();

        let config = Config {
            catalog_path: file.path().to_path_buf(),
            ..Config::default()
        };
        let err = open_catalog(&config).unwrap_err();
        assert!(matches!(
            err,
            EtlError::Core(consonance_core::Error::EmptyCorpus { rows_read: 2 })
        ));
    }
}
