//! Deck builder - mints and shuffles the paired tile board
//!
//! Given a validated catalog of N items, produces the 2N tiles of one
//! round: two tiles per item, Fisher-Yates shuffled, positions assigned
//! as the final post-shuffle indices.

use crate::catalog::Catalog;
use crate::rng::SimpleRng;
use memory_match_types::{DisplayRef, PairKey, Position};

/// One face-down/face-up unit on the board.
///
/// `position` is stable for the lifetime of a round; the whole deck is
/// discarded and rebuilt on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub position: Position,
    pub pair_key: PairKey,
    pub display_ref: DisplayRef,
}

/// Build one round's deck: two tiles per catalog item, shuffled.
///
/// Consumes entropy from `rng` and nothing else. The result is a
/// permutation of the pair multiset: every catalog key appears at
/// exactly two positions, and positions are exactly `0..2N`.
pub fn build_deck(catalog: &Catalog, rng: &mut SimpleRng) -> Vec<Tile> {
    let mut working: Vec<(PairKey, DisplayRef)> = Vec::with_capacity(catalog.tile_count());
    for item in catalog.items() {
        working.push((item.pair_key(), item.display_ref()));
        working.push((item.pair_key(), item.display_ref()));
    }

    rng.shuffle(&mut working);

    working
        .into_iter()
        .enumerate()
        .map(|(position, (pair_key, display_ref))| Tile {
            position,
            pair_key,
            display_ref,
        })
        .collect()
}
