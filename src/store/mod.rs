// SPDX-FileCopyrightText: 2026 Jan Tošovský
// SPDX-License-Identifier: Apache-2.0

//! Dataset bundle loading.
//!
//! A build produces one bundle directory: `individuals.json` (ordered map of
//! individual id to a 9-element record array), `sheets.json` (ordered map of
//! sheet id to display label) and one `<sheetId>.svg` diagram per sheet.
//! Map order is meaningful; it drives search scan order and the default
//! sheet.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::model::{
    IdError, IndexError, Individual, IndividualId, IndividualIndex, SheetId, SheetRegistry,
    SheetRegistryError,
};
use crate::sheet::{BoxFuture, FetchError, SheetFetcher, SHEET_RESOURCE_EXT};

const INDIVIDUALS_FILE: &str = "individuals.json";
const SHEETS_FILE: &str = "sheets.json";

/// The loaded dataset: every component reads from these two structures.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    index: IndividualIndex,
    registry: SheetRegistry,
}

impl Bundle {
    pub fn new(index: IndividualIndex, registry: SheetRegistry) -> Self {
        Self { index, registry }
    }

    pub fn index(&self) -> &IndividualIndex {
        &self.index
    }

    pub fn registry(&self) -> &SheetRegistry {
        &self.registry
    }

    pub fn into_parts(self) -> (IndividualIndex, SheetRegistry) {
        (self.index, self.registry)
    }
}

/// Loads and validates both dataset files from a bundle directory.
pub fn load_bundle(dir: &Path) -> Result<Bundle, StoreError> {
    Ok(Bundle {
        index: load_individuals(dir)?,
        registry: load_sheets(dir)?,
    })
}

fn load_individuals(dir: &Path) -> Result<IndividualIndex, StoreError> {
    let path = dir.join(INDIVIDUALS_FILE);
    let map = read_map(&path)?;

    let mut records = Vec::with_capacity(map.len());
    for (raw_id, value) in map {
        let fields: [String; 9] =
            serde_json::from_value(value).map_err(|source| StoreError::Decode {
                path: path.clone(),
                source,
            })?;
        let individual_id =
            IndividualId::new(&raw_id).map_err(|source| StoreError::InvalidRecord {
                record_id: raw_id.clone(),
                source,
            })?;
        let record =
            Individual::from_fields(&fields).map_err(|source| StoreError::InvalidRecord {
                record_id: raw_id,
                source,
            })?;
        records.push((individual_id, record));
    }

    IndividualIndex::from_records(records).map_err(StoreError::Index)
}

fn load_sheets(dir: &Path) -> Result<SheetRegistry, StoreError> {
    let path = dir.join(SHEETS_FILE);
    let map = read_map(&path)?;

    let mut entries = Vec::with_capacity(map.len());
    for (raw_id, value) in map {
        let label: String = serde_json::from_value(value).map_err(|source| StoreError::Decode {
            path: path.clone(),
            source,
        })?;
        let sheet_id = SheetId::new(&raw_id).map_err(|source| StoreError::InvalidRecord {
            record_id: raw_id,
            source,
        })?;
        entries.push((sheet_id, label));
    }

    SheetRegistry::from_entries(entries).map_err(StoreError::Registry)
}

fn read_map(path: &Path) -> Result<serde_json::Map<String, serde_json::Value>, StoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Decode {
        path: path.to_owned(),
        source,
    })
}

/// Reads a sheet's diagram markup from the bundle directory.
pub fn load_sheet_markup(dir: &Path, sheet_id: &SheetId) -> Result<String, StoreError> {
    let path = sheet_path(dir, sheet_id);
    std::fs::read_to_string(&path).map_err(|source| StoreError::Io { path, source })
}

fn sheet_path(dir: &Path, sheet_id: &SheetId) -> PathBuf {
    dir.join(format!("{sheet_id}.{SHEET_RESOURCE_EXT}"))
}

/// Per-build sheet resource names in registry order, for the offline asset
/// manifest the generator maintains outside this crate.
pub fn sheet_resource_names(registry: &SheetRegistry) -> Vec<String> {
    registry
        .ids()
        .map(|sheet_id| format!("{sheet_id}.{SHEET_RESOURCE_EXT}"))
        .collect()
}

/// Serves diagram resources from the bundle directory; the dynamic-mode
/// counterpart of the generated site fetching `<sheetId>.svg` over HTTP.
#[derive(Debug, Clone)]
pub struct DirSheetFetcher {
    dir: PathBuf,
}

impl DirSheetFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SheetFetcher for DirSheetFetcher {
    fn fetch(&self, resource: &str) -> BoxFuture<'_, Result<String, FetchError>> {
        let path = self.dir.join(resource);
        let resource = resource.to_owned();
        Box::pin(async move {
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|err| FetchError::new(resource, err.to_string()))
        })
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A map key or record field is not a valid id.
    InvalidRecord {
        record_id: String,
        source: IdError,
    },
    Index(IndexError),
    Registry(SheetRegistryError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            Self::Decode { path, source } => {
                write!(f, "cannot decode {}: {source}", path.display())
            }
            Self::InvalidRecord { record_id, source } => {
                write!(f, "invalid record {record_id:?}: {source}")
            }
            Self::Index(err) => err.fmt(f),
            Self::Registry(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::Index(err) => Some(err),
            Self::Registry(err) => Some(err),
        }
    }
}
