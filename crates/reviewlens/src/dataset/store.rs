use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info, warn};

use crate::error::DatasetError;

use super::table::Table;

/// Reads a CSV file with a header row into a [`Table`].
///
/// Ragged rows are accepted; missing cells become empty strings. When
/// `row_limit` is set only the first `row_limit` data rows are kept, and a
/// warning is logged if rows were left behind.
pub fn load_csv<P: AsRef<Path>>(path: P, row_limit: Option<usize>) -> Result<Table, DatasetError> {
    let path = path.as_ref();
    let (table, capped) = read_csv(path, row_limit)?;

    if capped {
        warn!(
            "Row limit of {} reached; remaining rows in {} were not loaded",
            table.len(),
            path.display()
        );
    }
    info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

/// Returns the table and whether `row_limit` cut off further data rows.
fn read_csv(path: &Path, row_limit: Option<usize>) -> Result<(Table, bool), DatasetError> {
    let read_err = |source: csv::Error| DatasetError::ReadFile {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(read_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(DatasetError::MissingHeader);
    }

    let mut table = Table::new(headers);
    let mut capped = false;
    for result in reader.records() {
        if row_limit.is_some_and(|limit| table.len() >= limit) {
            capped = true;
            break;
        }
        let record = result.map_err(read_err)?;
        table.push_row(record.iter().map(str::to_string).collect());
    }

    Ok((table, capped))
}

/// Destination for named tables produced during a run.
pub trait TableStore {
    /// Persists `table` under `name`, replacing any previous content.
    fn write(&self, name: &str, table: &Table) -> Result<PathBuf, DatasetError>;

    /// Prevents further writes to the table stored under `name`.
    fn protect(&self, name: &str) -> Result<(), DatasetError>;
}

/// Stores each table as `<name>.csv` inside a directory.
pub struct CsvTableStore {
    directory: PathBuf,
}

impl CsvTableStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.csv", name))
    }

    fn ensure_directory(&self) -> Result<(), DatasetError> {
        std::fs::create_dir_all(&self.directory).map_err(|e| DatasetError::CreateDirectory {
            path: self.directory.clone(),
            source: e,
        })
    }

    /// A protected file from an earlier run is made writable again before it is replaced.
    fn unprotect_existing(path: &Path) -> Result<(), DatasetError> {
        let Ok(metadata) = std::fs::metadata(path) else {
            return Ok(());
        };
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            std::fs::set_permissions(path, permissions).map_err(|e| DatasetError::Protect {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

impl TableStore for CsvTableStore {
    fn write(&self, name: &str, table: &Table) -> Result<PathBuf, DatasetError> {
        self.ensure_directory()?;
        let path = self.path_for(name);
        Self::unprotect_existing(&path)?;

        let write_err = |source: csv::Error| DatasetError::WriteFile {
            path: path.clone(),
            source,
        };

        let mut writer = WriterBuilder::new().from_path(&path).map_err(write_err)?;
        writer.write_record(table.headers()).map_err(write_err)?;
        for row in table.rows() {
            writer.write_record(row).map_err(write_err)?;
        }
        writer
            .flush()
            .map_err(|e| write_err(csv::Error::from(e)))?;

        debug!("Wrote table '{}' ({} rows) to {}", name, table.len(), path.display());
        Ok(path)
    }

    fn protect(&self, name: &str) -> Result<(), DatasetError> {
        let path = self.path_for(name);
        let protect_err = |source: std::io::Error| DatasetError::Protect {
            path: path.clone(),
            source,
        };

        let mut permissions = std::fs::metadata(&path).map_err(protect_err)?.permissions();
        permissions.set_readonly(true);
        std::fs::set_permissions(&path, permissions).map_err(protect_err)?;

        info!("Protected table '{}' at {}", name, path.display());
        Ok(())
    }
}
