//! Bulk import of the OpenNutrition TSV export into the food store.
//!
//! The export has one header row followed by one food per line; structured
//! columns hold JSON text, which is stored verbatim and only decoded at query
//! time.

use std::{error::Error, fmt, fs::File, io::Read, path::Path};

use nutrition_store::models::FoodRow;
use serde::Deserialize;
use surrealdb::Connection;
use tracing::{info, warn};

use crate::store::{StoreError, SurrealFoodStore};

const DEFAULT_BATCH_SIZE: usize = 1_000;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Store(StoreError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read dataset: {err}"),
            Self::Csv(err) => write!(f, "failed to parse dataset: {err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<StoreError> for ImportError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    pub batch_size: usize,
}

impl ImportOptions {
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub rows_read: usize,
    pub rows_imported: usize,
    pub rows_skipped: usize,
}

/// Dataset line as laid out in the TSV export. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct TsvFoodRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    food_type: Option<String>,
    #[serde(default)]
    ean_13: Option<String>,
    #[serde(default)]
    labels: Option<String>,
    #[serde(default)]
    nutrition_100g: Option<String>,
    #[serde(default)]
    alternate_names: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    serving: Option<String>,
    #[serde(default)]
    package_size: Option<String>,
    #[serde(default)]
    ingredient_analysis: Option<String>,
}

impl TsvFoodRow {
    /// Converts a dataset line into a stored row, or `None` when the line
    /// lacks an id or a name.
    fn into_row(self) -> Option<FoodRow> {
        let food_id = self.id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())?;
        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())?;
        let mut row = FoodRow::new(food_id, name);
        row.food_type = self.food_type;
        row.ean_13 = self.ean_13.map(|ean| ean.trim().to_string());
        row.labels = self.labels;
        row.nutrition_100g = self.nutrition_100g;
        row.alternate_names = self.alternate_names;
        row.source = self.source;
        row.serving = self.serving;
        row.package_size = self.package_size;
        row.ingredient_analysis = self.ingredient_analysis;
        Some(row.with_search_text())
    }
}

/// Imports a TSV file from disk.
///
/// # Errors
/// Returns `ImportError` if the file cannot be read or a store write fails.
pub async fn import_tsv_file<C: Connection>(
    store: &SurrealFoodStore<C>,
    path: &Path,
    options: ImportOptions,
) -> Result<ImportReport, ImportError> {
    info!(path = %path.display(), "importing food dataset");
    let file = File::open(path)?;
    import_tsv(store, file, options).await
}

/// Imports TSV data, upserting rows in batches keyed by food id.
///
/// Lines that fail to parse or lack an id or name are skipped and counted.
///
/// # Errors
/// Returns `ImportError` on read failures or store write failures.
pub async fn import_tsv<C: Connection, R: Read>(
    store: &SurrealFoodStore<C>,
    reader: R,
    options: ImportOptions,
) -> Result<ImportReport, ImportError> {
    let batch_size = options.batch_size.max(1);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);

    let mut report = ImportReport::default();
    let mut batch = Vec::with_capacity(batch_size);

    for result in reader.deserialize::<TsvFoodRow>() {
        report.rows_read += 1;
        let line = match result {
            Ok(line) => line,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(row = report.rows_read, "skipping unparseable dataset row: {err}");
                report.rows_skipped += 1;
                continue;
            }
        };
        let Some(row) = line.into_row() else {
            warn!(row = report.rows_read, "skipping dataset row without id or name");
            report.rows_skipped += 1;
            continue;
        };
        batch.push(row);
        if batch.len() >= batch_size {
            report.rows_imported += store.upsert_foods(std::mem::take(&mut batch)).await?;
        }
    }
    report.rows_imported += store.upsert_foods(batch).await?;

    info!(
        read = report.rows_read,
        imported = report.rows_imported,
        skipped = report.rows_skipped,
        "food dataset import finished"
    );
    Ok(report)
}
