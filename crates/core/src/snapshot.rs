//! Read-only state snapshots for the presentation boundary.

use arrayvec::ArrayVec;

use memory_match_types::{
    DisplayRef, PairKey, Position, ResolutionKind, TileFace, TurnPhase, MAX_REVEALED,
};

/// One tile as the presentation layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSnapshot {
    pub position: Position,
    pub pair_key: PairKey,
    pub display_ref: DisplayRef,
    pub face: TileFace,
}

/// Outstanding deferred resolution, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingSnapshot {
    pub kind: ResolutionKind,
    pub remaining_ms: u32,
}

/// Full observable game state. Produced by the engine, never mutated by
/// observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub tiles: Vec<TileSnapshot>,
    pub revealed: ArrayVec<Position, MAX_REVEALED>,
    pub phase: TurnPhase,
    pub pending: Option<PendingSnapshot>,
    pub moves: u32,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub round_id: u32,
    pub seed: u32,
    pub complete: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.revealed.clear();
        self.phase = TurnPhase::Idle;
        self.pending = None;
        self.moves = 0;
        self.matched_pairs = 0;
        self.total_pairs = 0;
        self.round_id = 0;
        self.seed = 0;
        self.complete = false;
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            tiles: Vec::new(),
            revealed: ArrayVec::new(),
            phase: TurnPhase::Idle,
            pending: None,
            moves: 0,
            matched_pairs: 0,
            total_pairs: 0,
            round_id: 0,
            seed: 0,
            complete: false,
        }
    }
}
