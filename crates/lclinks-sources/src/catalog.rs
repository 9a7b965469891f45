//! FROM_GLC catalog snapshots.
//!
//! A snapshot is the flat JSON array of `{id, name, ...}` objects returned by
//! the data-starcloud directory API. Snapshots are loaded once and indexed
//! into a [`CatalogIndex`] before any tile lookup happens.

use crate::{Result, SourceError};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One file in a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Download identifier. The API returns it as a number or a string.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    /// File name.
    pub name: String,
}

impl CatalogEntry {
    /// Create an entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    match RawId::deserialize(deserializer) {
        Ok(RawId::Text(s)) => Ok(s),
        Ok(RawId::Unsigned(n)) => Ok(n.to_string()),
        Ok(RawId::Signed(n)) => Ok(n.to_string()),
        Err(_) => Err(de::Error::custom("catalog id must be a string or an integer")),
    }
}

/// A loaded catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Wrap a list of entries.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(text)?;
        Ok(Self { entries })
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&text).map_err(|e| SourceError::CatalogFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), entries = catalog.len(), "loaded catalog snapshot");
        Ok(catalog)
    }

    /// Write the snapshot as a pretty-printed JSON array.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// All entries in snapshot order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the WRS-2 `(path, row)` pair from a Landsat 5 scene name.
///
/// The first `_`-separated token looks like `L5119038...`: two characters
/// of sensor prefix, a three-digit path, then the row.
pub fn landsat_path_row(name: &str) -> Option<(u32, u32)> {
    let token = name.split('_').next()?;
    let digits = token.get(2..)?;
    let path = digits.get(..3)?.parse().ok()?;
    let row = digits.get(3..)?.parse().ok()?;
    Some((path, row))
}

/// Key used to join WRS-2 footprints against the 2010 catalog.
pub fn path_row_key(path: u32, row: u32) -> String {
    format!("{path}_{row}")
}

/// Lookup table from a derived key to catalog entries, in snapshot order.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    by_key: HashMap<String, Vec<CatalogEntry>>,
}

impl CatalogIndex {
    /// Index Landsat 5 scenes (names starting with `L5`, any case) by
    /// `{path}_{row}`. Names whose path/row cannot be parsed are skipped.
    pub fn by_path_row(catalog: &Catalog) -> Self {
        let mut by_key: HashMap<String, Vec<CatalogEntry>> = HashMap::new();
        for entry in catalog.entries() {
            let is_landsat5 = entry
                .name
                .get(..2)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("l5"));
            if !is_landsat5 {
                continue;
            }
            match landsat_path_row(&entry.name) {
                Some((path, row)) => by_key
                    .entry(path_row_key(path, row))
                    .or_default()
                    .push(entry.clone()),
                None => debug!(name = %entry.name, "unparsable Landsat scene name"),
            }
        }
        Self { by_key }
    }

    /// Index entries by exact file name.
    pub fn by_name(catalog: &Catalog) -> Self {
        let mut by_key: HashMap<String, Vec<CatalogEntry>> = HashMap::new();
        for entry in catalog.entries() {
            by_key.entry(entry.name.clone()).or_default().push(entry.clone());
        }
        Self { by_key }
    }

    /// Entries stored under `key`.
    pub fn get(&self, key: &str) -> Option<&[CatalogEntry]> {
        self.by_key.get(key).map(Vec::as_slice)
    }

    /// First entry stored under `key`.
    pub fn first(&self, key: &str) -> Option<&CatalogEntry> {
        self.get(key).and_then(|entries| entries.first())
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the index has no keys.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
