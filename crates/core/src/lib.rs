//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and
//! simulation logic for the tile-matching memory game. It has no
//! dependencies on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same catalog and seed produce identical rounds
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (server, GUI host, headless)
//!
//! # Module Structure
//!
//! - [`catalog`]: validated roster of pairable items (injected configuration)
//! - [`deck`]: deck builder - two tiles per item, Fisher-Yates shuffled
//! - [`game_state`]: the turn/reveal state machine with deferred resolutions
//! - [`rng`]: seeded LCG random source for shuffling
//! - [`snapshot`]: read-only observations for the presentation boundary
//!
//! # Game Rules
//!
//! - Each round deals `2N` tiles, two per catalog item, at shuffled positions
//! - A turn reveals two tiles; the move counter increments at the second flip
//! - A matched pair locks face-up after 600ms; a mismatch hides again after
//!   1000ms (the memorization window)
//! - While a resolution is pending the engine is locked: every further
//!   reveal is a silent no-op
//! - The round completes the instant every tile is matched
//!
//! # Example
//!
//! ```
//! use memory_match_core::{Catalog, GameState};
//! use memory_match_types::MATCH_RESOLVE_MS;
//!
//! let mut game = GameState::new(Catalog::demo(), 12345);
//!
//! // Find and reveal a matching pair.
//! let key = game.tiles()[0].pair_key;
//! let partner = game.tiles()[1..]
//!     .iter()
//!     .find(|t| t.pair_key == key)
//!     .map(|t| t.position)
//!     .unwrap();
//! game.reveal(0).unwrap();
//! game.reveal(partner).unwrap();
//!
//! // The deferred resolution applies once the delay elapses.
//! game.tick(MATCH_RESOLVE_MS);
//! assert_eq!(game.matched_pairs(), 1);
//! assert_eq!(game.moves(), 1);
//! ```
//!
//! # Timing
//!
//! The engine is driven by a fixed timestep: call
//! [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed milliseconds. Deferred resolutions carry the round id they
//! were armed in and are discarded if a reset happened in between.

pub mod catalog;
pub mod deck;
pub mod game_state;
pub mod rng;
pub mod snapshot;

pub use memory_match_types as types;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, CatalogError, CatalogItem};
pub use deck::{build_deck, Tile};
pub use game_state::{GameError, GameState, RevealOutcome};
pub use rng::SimpleRng;
pub use snapshot::{GameSnapshot, PendingSnapshot, TileSnapshot};
