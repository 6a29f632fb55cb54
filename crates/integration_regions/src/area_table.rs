//! Area lookup table
//!
//! CSV table linking Google place names to the region names (`GEN`) of the
//! case data feature service. Required columns are `GEN` and
//! `googlemaps_key`; `BEZ` (region kind) is optional. Other columns are
//! ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::AreaTableError;
use crate::geocoding::RegionNames;

const REQUIRED_COLUMNS: [&str; 2] = ["GEN", "googlemaps_key"];

/// One row of the area table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AreaRow {
    /// Region name in the case data dataset
    #[serde(rename = "GEN")]
    pub name: String,
    /// Google place name identifying the region
    #[serde(default)]
    pub googlemaps_key: Option<String>,
    /// Region kind, e.g. "Bezirk" or "Landkreis"
    #[serde(rename = "BEZ", default)]
    pub kind: Option<String>,
}

/// Area table in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaTable {
    rows: Vec<AreaRow>,
}

impl AreaTable {
    /// Create a table from rows
    #[must_use]
    pub const fn new(rows: Vec<AreaRow>) -> Self {
        Self { rows }
    }

    /// Load a table from a CSV file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, lacks a required column
    /// or contains a malformed row.
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self, AreaTableError> {
        let file = File::open(path).map_err(csv::Error::from)?;
        let table = Self::from_reader(file)?;
        debug!(rows = table.len(), "Area table loaded");
        Ok(table)
    }

    /// Load a table from any CSV source
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is missing or a row is malformed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AreaTableError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(AreaTableError::MissingColumn(column));
            }
        }

        let rows = reader
            .deserialize::<AreaRow>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    /// First row, in file order, whose key matches any of the names
    #[must_use]
    pub fn lookup(&self, names: &RegionNames) -> Option<&AreaRow> {
        self.rows.iter().find(|row| {
            row.googlemaps_key
                .as_deref()
                .is_some_and(|key| names.candidates().any(|name| name == key))
        })
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
