//! CSV export of store tables.
//!
//! One file per record kind, comma-delimited UTF-8, header row from the
//! first record's column order, data rows in whatever order the store
//! returns them. A kind with zero rows leaves no file behind.

use futures::TryStreamExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use sanctions_common::{Result, SanctionsError};

use crate::archive::Archive;
use crate::db::{select_all_sql, Store};
use crate::model::{Address, Alias, Birth, Entity, Identifier, Nationality, TableRecord};

/// Incremental CSV writer that only leaves a file behind if at least one
/// row was written.
pub struct CsvTableWriter {
    path: PathBuf,
    writer: csv::Writer<fs::File>,
    rows_written: u64,
}

impl CsvTableWriter {
    /// Create the output file (and its directory) eagerly; [`Self::finish`]
    /// removes it again when nothing was written.
    pub fn create(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&path)?;
        Ok(Self {
            path,
            writer: csv::Writer::from_writer(file),
            rows_written: 0,
        })
    }

    /// Write one flattened row, emitting the header first if this is the
    /// first row.
    pub fn write_row(&mut self, row: &[(&'static str, Option<String>)]) -> Result<()> {
        if self.rows_written == 0 {
            self.writer
                .write_record(row.iter().map(|(key, _)| *key))
                .map_err(csv_error)?;
        }
        self.writer
            .write_record(row.iter().map(|(_, value)| value.as_deref().unwrap_or("")))
            .map_err(csv_error)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush and return the file path, or remove the empty file and return
    /// `None` when no rows were written.
    pub fn finish(self) -> Result<Option<PathBuf>> {
        let Self {
            path,
            mut writer,
            rows_written,
        } = self;

        if rows_written == 0 {
            drop(writer);
            fs::remove_file(&path)?;
            return Ok(None);
        }

        writer.flush()?;
        Ok(Some(path))
    }
}

/// Export every row of one record kind to `{export_dir}/{name}.csv`.
///
/// Streams rows straight from the store; returns `None` (with no file on
/// disk) when the table is empty.
pub async fn export_csv_table<T: TableRecord>(
    store: &Store,
    export_dir: &Path,
) -> Result<Option<PathBuf>> {
    let file_path = export_dir.join(format!("{}.csv", T::EXPORT_NAME));
    info!("Exporting to {}...", file_path.display());

    let mut writer = CsvTableWriter::create(file_path)?;

    let sql = select_all_sql::<T>();
    let mut rows = sqlx::query_as::<_, T>(&sql).fetch(store.pool());
    while let Some(record) = rows
        .try_next()
        .await
        .map_err(|e| SanctionsError::Database(e.to_string()))?
    {
        writer.write_row(&record.to_row())?;
    }

    writer.finish()
}

/// Export every record kind in declared order, uploading each produced file
/// when an archive bucket is configured.
///
/// Processing is sequential and halts on the first failure; files exported
/// or uploaded before that point stay where they are.
pub async fn export_all(
    store: &Store,
    export_dir: &Path,
    archive: Option<&Archive>,
    source: &str,
    run: &str,
) -> Result<Vec<PathBuf>> {
    let mut produced = Vec::new();
    export_one::<Entity>(store, export_dir, archive, source, run, &mut produced).await?;
    export_one::<Address>(store, export_dir, archive, source, run, &mut produced).await?;
    export_one::<Alias>(store, export_dir, archive, source, run, &mut produced).await?;
    export_one::<Identifier>(store, export_dir, archive, source, run, &mut produced).await?;
    export_one::<Birth>(store, export_dir, archive, source, run, &mut produced).await?;
    export_one::<Nationality>(store, export_dir, archive, source, run, &mut produced).await?;
    Ok(produced)
}

async fn export_one<T: TableRecord>(
    store: &Store,
    export_dir: &Path,
    archive: Option<&Archive>,
    source: &str,
    run: &str,
    produced: &mut Vec<PathBuf>,
) -> Result<()> {
    if let Some(path) = export_csv_table::<T>(store, export_dir).await? {
        if let Some(archive) = archive {
            archive.upload_csv(source, run, &path).await?;
        }
        produced.push(path);
    }
    Ok(())
}

fn csv_error(err: csv::Error) -> SanctionsError {
    SanctionsError::Export(err.to_string())
}
