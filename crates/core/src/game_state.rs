//! Game state module - the authoritative turn/reveal state machine
//!
//! Owns all mutable round state: the tile deck, the reveal set, the
//! matched set, the move counter, and the pending deferred resolution.
//! All mutation flows through `reveal`, `tick`, and `reset`; observers
//! read snapshots only.

use arrayvec::ArrayVec;

use crate::catalog::Catalog;
use crate::deck::{build_deck, Tile};
use crate::rng::SimpleRng;
use crate::snapshot::{GameSnapshot, PendingSnapshot, TileSnapshot};
use memory_match_types::{
    GameAction, Position, ResolutionKind, TileFace, TurnPhase, MAX_REVEALED,
};

/// Engine errors. Guarded rejections are not errors; the only failure is
/// a position the board does not have, which signals a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("unknown tile position {position} (board has {tile_count} tiles)")]
    UnknownPosition {
        position: Position,
        tile_count: usize,
    },
}

/// What a `reveal` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Guarded no-op: locked, already face-up, already matched, or round over.
    Ignored,
    /// First tile of the turn is now face-up.
    FirstRevealed,
    /// Second tile went face-up; the move was counted and a deferred
    /// resolution armed.
    ResolutionArmed(ResolutionKind),
}

/// Deferred match/mismatch application, armed when the second tile of a
/// turn is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingResolution {
    first: Position,
    second: Position,
    kind: ResolutionKind,
    remaining_ms: u32,
    /// Round the resolution was armed in; re-checked when it fires so a
    /// reset invalidates it.
    round_id: u32,
}

/// Complete game state for one round
#[derive(Debug, Clone)]
pub struct GameState {
    catalog: Catalog,
    rng: SimpleRng,
    tiles: Vec<Tile>,
    revealed: ArrayVec<Position, MAX_REVEALED>,
    matched: Vec<bool>,
    matched_count: usize,
    moves: u32,
    /// Monotonic round id (increments on reset).
    round_id: u32,
    pending: Option<PendingResolution>,
    complete: bool,
}

impl GameState {
    /// Create a new game over the given catalog with the given RNG seed
    pub fn new(catalog: Catalog, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let tiles = build_deck(&catalog, &mut rng);
        let tile_count = tiles.len();

        Self {
            catalog,
            rng,
            tiles,
            revealed: ArrayVec::new(),
            matched: vec![false; tile_count],
            matched_count: 0,
            moves: 0,
            round_id: 0,
            pending: None,
            complete: false,
        }
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn round_id(&self) -> u32 {
        self.round_id
    }

    /// Current RNG state (replaying from here reproduces future rounds).
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    pub fn complete(&self) -> bool {
        self.complete
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Positions currently face-up and not yet matched.
    pub fn revealed(&self) -> &[Position] {
        &self.revealed
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_count / 2
    }

    pub fn total_pairs(&self) -> usize {
        self.tiles.len() / 2
    }

    pub fn is_matched(&self, position: Position) -> bool {
        self.matched.get(position).copied().unwrap_or(false)
    }

    /// Derived predicate: all tiles resolved into the matched set.
    pub fn is_complete(&self) -> bool {
        self.matched_count == self.tiles.len()
    }

    /// Turn sub-state, derived from the reveal set size.
    pub fn turn_phase(&self) -> TurnPhase {
        match self.revealed.len() {
            0 => TurnPhase::Idle,
            1 => TurnPhase::OneRevealed,
            _ => TurnPhase::PendingResolution,
        }
    }

    /// Remaining delay of the armed resolution, if one is outstanding.
    pub fn pending_remaining_ms(&self) -> Option<u32> {
        self.pending.as_ref().map(|p| p.remaining_ms)
    }

    /// Outcome of the armed resolution, if one is outstanding.
    pub fn pending_kind(&self) -> Option<ResolutionKind> {
        self.pending.as_ref().map(|p| p.kind)
    }

    /// The sole player-facing mutator: flip the tile at `position` face-up.
    ///
    /// Rejections (engine locked, tile already face-up, tile already
    /// matched, round complete) are silent no-ops returning `Ignored`.
    /// Revealing the second tile of a turn counts the move immediately
    /// and arms the deferred resolution; the engine stays locked until
    /// it fires.
    pub fn reveal(&mut self, position: Position) -> Result<RevealOutcome, GameError> {
        if position >= self.tiles.len() {
            return Err(GameError::UnknownPosition {
                position,
                tile_count: self.tiles.len(),
            });
        }

        if self.complete
            || self.revealed.is_full()
            || self.revealed.contains(&position)
            || self.matched[position]
        {
            return Ok(RevealOutcome::Ignored);
        }

        self.revealed.push(position);

        if self.revealed.len() < MAX_REVEALED {
            return Ok(RevealOutcome::FirstRevealed);
        }

        // The move is counted the moment the second tile flips, not when
        // the resolution later applies.
        self.moves += 1;

        let first = self.revealed[0];
        let second = self.revealed[1];
        let kind = if self.tiles[first].pair_key == self.tiles[second].pair_key {
            ResolutionKind::Match
        } else {
            ResolutionKind::Mismatch
        };

        self.pending = Some(PendingResolution {
            first,
            second,
            kind,
            remaining_ms: kind.delay_ms(),
            round_id: self.round_id,
        });

        Ok(RevealOutcome::ResolutionArmed(kind))
    }

    /// Advance the pending resolution countdown; apply it on expiry.
    ///
    /// Returns true when the observable state changed. With no
    /// resolution outstanding this is a no-op.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        pending.remaining_ms = pending.remaining_ms.saturating_sub(elapsed_ms);
        if pending.remaining_ms > 0 {
            return false;
        }

        let Some(fired) = self.pending.take() else {
            return false;
        };
        self.apply_resolution(fired)
    }

    /// Apply a fired resolution, unless its round has been discarded.
    fn apply_resolution(&mut self, resolution: PendingResolution) -> bool {
        if resolution.round_id != self.round_id {
            return false;
        }

        self.revealed.clear();

        if resolution.kind == ResolutionKind::Match {
            self.matched[resolution.first] = true;
            self.matched[resolution.second] = true;
            self.matched_count += 2;
            self.complete = self.matched_count == self.tiles.len();
        }

        true
    }

    /// Discard the round wholesale and deal a fresh one.
    ///
    /// The RNG stream continues, so each round gets a new permutation;
    /// the round id bump invalidates any resolution still in flight.
    pub fn reset(&mut self) {
        self.round_id = self.round_id.wrapping_add(1);
        self.tiles = build_deck(&self.catalog, &mut self.rng);
        self.revealed.clear();
        self.matched.clear();
        self.matched.resize(self.tiles.len(), false);
        self.matched_count = 0;
        self.moves = 0;
        self.pending = None;
        self.complete = false;
    }

    /// Apply a game action; returns whether the state changed.
    pub fn apply_action(&mut self, action: GameAction) -> Result<bool, GameError> {
        match action {
            GameAction::Reveal(position) => {
                let outcome = self.reveal(position)?;
                Ok(outcome != RevealOutcome::Ignored)
            }
            GameAction::Reset => {
                self.reset();
                Ok(true)
            }
        }
    }

    fn tile_face(&self, position: Position) -> TileFace {
        if self.matched[position] {
            TileFace::Matched
        } else if self.revealed.contains(&position) {
            TileFace::Up
        } else {
            TileFace::Down
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.tiles.clear();
        out.tiles.extend(self.tiles.iter().map(|tile| TileSnapshot {
            position: tile.position,
            pair_key: tile.pair_key,
            display_ref: tile.display_ref,
            face: self.tile_face(tile.position),
        }));

        out.revealed.clear();
        out.revealed.extend(self.revealed.iter().copied());

        out.phase = self.turn_phase();
        out.pending = self.pending.as_ref().map(|p| PendingSnapshot {
            kind: p.kind,
            remaining_ms: p.remaining_ms,
        });
        out.moves = self.moves;
        out.matched_pairs = self.matched_pairs() as u32;
        out.total_pairs = self.total_pairs() as u32;
        out.round_id = self.round_id;
        out.seed = self.rng.seed();
        out.complete = self.complete;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
