//! Injected catalog configuration.
//!
//! The host never hardcodes a roster: it loads one from the JSON file
//! named by `MEMORY_MATCH_CATALOG`, falling back to the built-in demo
//! roster when the variable is unset.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use memory_match_core::{Catalog, CatalogItem};
use memory_match_types::{DisplayRef, PairKey};

/// One catalog entry as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFileEntry {
    pub pair_key: u16,
    pub label: String,
    pub display_ref: u32,
}

/// Parse a catalog from its JSON file contents.
pub fn catalog_from_json(json: &str) -> anyhow::Result<Catalog> {
    let entries: Vec<CatalogFileEntry> =
        serde_json::from_str(json).context("malformed catalog file")?;
    let items = entries
        .into_iter()
        .map(|e| {
            CatalogItem::new(
                PairKey::new(e.pair_key),
                e.label,
                DisplayRef::new(e.display_ref),
            )
        })
        .collect();
    Catalog::new(items).context("invalid catalog")
}

/// Load the catalog named by `MEMORY_MATCH_CATALOG`, or the demo roster.
pub fn load_catalog_from_env() -> anyhow::Result<Catalog> {
    match std::env::var("MEMORY_MATCH_CATALOG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading catalog file {path}"))?;
            catalog_from_json(&json)
        }
        Err(_) => Ok(Catalog::demo()),
    }
}
