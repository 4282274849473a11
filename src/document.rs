use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DictError, Result};
use crate::model::Entry;

/// The JSON file: `{ "total": n, "entries": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub total: usize,
    pub entries: Vec<Entry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Bare(Vec<Entry>),
    Wrapped { entries: Vec<Entry> },
}

#[derive(Serialize)]
struct Out<'a> {
    total: usize,
    entries: &'a [Entry],
}

impl Document {
    pub fn new(entries: Vec<Entry>) -> Self {
        Document {
            total: entries.len(),
            entries,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries = match serde_json::from_str::<Stored>(json)? {
            Stored::Bare(entries) | Stored::Wrapped { entries } => entries,
        };
        Ok(Document::new(entries))
    }

    pub fn to_json(&self) -> Result<String> {
        let out = Out {
            total: self.entries.len(),
            entries: &self.entries,
        };
        Ok(serde_json::to_string_pretty(&out)?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| DictError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Document::from_json(&json)?;
        info!(path = %path.display(), entries = doc.total, "loaded document");
        Ok(doc)
    }

    /// Pretty UTF-8 JSON; `total` is recomputed from the entries.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| DictError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), entries = self.entries.len(), "wrote document");
        Ok(())
    }
}
