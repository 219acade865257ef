//! Catalog module - the fixed roster of pairable items
//!
//! A catalog is injected configuration: the engine never assumes a
//! particular roster, only that it is non-empty and that every pair key
//! is unique. Both constraints are checked once, at construction.

use memory_match_types::{DisplayRef, PairKey};

/// One catalog entry. Two board tiles are minted from each item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pair_key: PairKey,
    label: String,
    display_ref: DisplayRef,
}

impl CatalogItem {
    pub fn new(pair_key: PairKey, label: impl Into<String>, display_ref: DisplayRef) -> Self {
        Self {
            pair_key,
            label: label.into(),
            display_ref,
        }
    }

    pub fn pair_key(&self) -> PairKey {
        self.pair_key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn display_ref(&self) -> DisplayRef {
        self.display_ref
    }
}

/// Catalog construction failures. Both are caller bugs (malformed
/// configuration), rejected before any game state exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one item")]
    Empty,
    #[error("duplicate pair key {0} in catalog")]
    DuplicatePairKey(PairKey),
}

/// Validated, immutable item roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Validate and wrap a roster of items.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut keys: Vec<PairKey> = items.iter().map(|item| item.pair_key()).collect();
        keys.sort_unstable();
        for pair in keys.windows(2) {
            if pair[0] == pair[1] {
                return Err(CatalogError::DuplicatePairKey(pair[0]));
            }
        }

        Ok(Self { items })
    }

    /// Built-in eight-item roster used when no catalog is injected.
    pub fn demo() -> Self {
        let items = vec![
            CatalogItem::new(PairKey::new(1), "ember", DisplayRef::new(101)),
            CatalogItem::new(PairKey::new(2), "brook", DisplayRef::new(102)),
            CatalogItem::new(PairKey::new(3), "sprout", DisplayRef::new(103)),
            CatalogItem::new(PairKey::new(4), "bolt", DisplayRef::new(104)),
            CatalogItem::new(PairKey::new(5), "frost", DisplayRef::new(105)),
            CatalogItem::new(PairKey::new(6), "dune", DisplayRef::new(106)),
            CatalogItem::new(PairKey::new(7), "moss", DisplayRef::new(107)),
            CatalogItem::new(PairKey::new(8), "gale", DisplayRef::new(108)),
        ];
        Self::new(items).expect("demo roster is statically valid")
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Number of tiles a deck built from this catalog will hold.
    pub fn tile_count(&self) -> usize {
        self.items.len() * 2
    }
}
