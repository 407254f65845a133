use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ParsedTransaction;

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("failed to create record store {}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open record store {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to read row {row} of record store {}", path.display())]
    Read {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("failed to write record store {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// CSV ledger with one header row and one row per transaction.
///
/// Single writer only. Every append rewrites the whole file.
pub(crate) struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with the header row unless it already holds data.
    /// Returns `true` when the file was created.
    pub(crate) fn ensure_schema(&self) -> Result<bool, StoreError> {
        let has_data = fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if has_data {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Create {
                path: self.path.clone(),
                source,
            })?;
        }

        self.save(&[header()])?;
        log::info!("Created record store {}", self.path.display());
        Ok(true)
    }

    /// All rows, header included.
    pub(crate) fn load(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|source| StoreError::Open {
                path: self.path.clone(),
                source,
            })?;

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|source| StoreError::Read {
                path: self.path.clone(),
                row: i + 1,
                source,
            })?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }
        Ok(rows)
    }

    /// Load the table, add `txn` at the end, write it back. The file must
    /// already exist; see [`Self::ensure_schema`].
    pub(crate) fn append(&self, txn: &ParsedTransaction) -> Result<(), StoreError> {
        let mut rows = self.load()?;
        rows.push(txn.to_row().to_vec());
        self.save(&rows)?;
        log::debug!(
            "Appended {} to {} ({} rows)",
            txn.code(),
            self.path.display(),
            rows.len()
        );
        Ok(())
    }

    fn save(&self, rows: &[Vec<String>]) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(write_err)?;
        for row in rows {
            wtr.write_record(row).map_err(write_err)?;
        }
        wtr.flush()
            .map_err(|e| write_err(csv::Error::from(e)))?;
        Ok(())
    }
}

fn header() -> Vec<String> {
    ParsedTransaction::COLUMNS
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests;
