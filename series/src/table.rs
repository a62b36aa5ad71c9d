//! Where the rows come from.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{
    error::TableError,
    row::{Row, Value},
};

/// Anything able to yield the rows of a sheet, in sheet order.
pub trait TableProvider {
    fn rows(&self) -> Result<Vec<Row>, TableError>;
}

/// Loads the rows of `provider`, logging and swallowing any failure.
///
/// A dashboard with a broken file should still display its other charts, the
/// empty table ends up as a "no data" placeholder.
pub fn load_or_empty(name: &str, provider: &impl TableProvider) -> Vec<Row> {
    match provider.rows() {
        Ok(rows) => {
            log::info!("Loaded {} rows from {name}", rows.len());
            rows
        }
        Err(e) => {
            log::warn!("Could not load the table {name}: {e}");
            Vec::new()
        }
    }
}

/// An array of objects keyed by column header, the usual sheet-to-JSON shape.
#[derive(Debug, Clone)]
pub enum JsonTable {
    Text(String),
    File(PathBuf),
}

impl JsonTable {
    pub fn from_text(text: impl Into<String>) -> Self {
        JsonTable::Text(text.into())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        JsonTable::File(path.as_ref().to_path_buf())
    }
}

impl TableProvider for JsonTable {
    fn rows(&self) -> Result<Vec<Row>, TableError> {
        match self {
            JsonTable::Text(text) => Ok(serde_json::from_str(text)?),
            JsonTable::File(path) => {
                let text = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&text)?)
            }
        }
    }
}

/// A CSV export whose first record holds the column headers.
#[derive(Debug, Clone)]
pub enum CsvTable {
    Text(String),
    File(PathBuf),
}

impl CsvTable {
    pub fn from_text(text: impl Into<String>) -> Self {
        CsvTable::Text(text.into())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        CsvTable::File(path.as_ref().to_path_buf())
    }

    fn read(reader: impl Read) -> Result<Vec<Row>, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            // Short records simply lack their trailing columns.
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| (header.trim(), Value::parse(cell)))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }
}

impl TableProvider for CsvTable {
    fn rows(&self) -> Result<Vec<Row>, TableError> {
        match self {
            CsvTable::Text(text) => Self::read(text.as_bytes()),
            CsvTable::File(path) => Self::read(fs::File::open(path)?),
        }
    }
}

impl TableProvider for Vec<Row> {
    fn rows(&self) -> Result<Vec<Row>, TableError> {
        Ok(self.clone())
    }
}
