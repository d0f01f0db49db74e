//! Volume metadata table loading.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ids::clean_pairtree;

/// One metadata row. Extra columns in the table are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaRow {
    pub htid: String,
    pub title: String,
    pub inferred_date: String,
}

/// Metadata keyed by cleaned volume id.
///
/// `order` holds each cleaned id once, in first-occurrence order, and is the
/// batch processing order. Later rows with a duplicate id are ignored.
pub struct Metadata {
    pub rows: HashMap<String, MetaRow>,
    pub order: Vec<String>,
}

/// Read a tab-delimited metadata table with at least `htid`, `title`, and
/// `inferred_date` columns, normalizing every id to its pairtree form.
pub fn load(path: &Path) -> Result<Metadata> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("opening metadata table {}", path.display()))?;

    let mut rows = HashMap::new();
    let mut order = Vec::new();
    let mut seen = HashSet::new();

    for record in reader.deserialize() {
        let mut row: MetaRow = record.context("malformed metadata row")?;
        row.htid = clean_pairtree(&row.htid);
        if seen.insert(row.htid.clone()) {
            order.push(row.htid.clone());
            rows.insert(row.htid.clone(), row);
        }
    }

    Ok(Metadata { rows, order })
}
