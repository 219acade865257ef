//! Core types shared across the application
//! This module contains pure data types with no external dependencies

use std::fmt;

/// Game timing constants (in milliseconds)
pub const TICK_MS: u32 = 16;
/// Delay before a confirmed pair locks into the matched set.
pub const MATCH_RESOLVE_MS: u32 = 600;
/// Delay before a mismatched pair flips back face-down (memorization window).
pub const MISMATCH_RESOLVE_MS: u32 = 1000;

/// Maximum number of face-up, not-yet-matched tiles at any time.
pub const MAX_REVEALED: usize = 2;

/// Stable 0-based tile index on the board, assigned at deck build.
pub type Position = usize;

/// Identifier shared by exactly the two tiles that form a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(u16);

impl PairKey {
    pub fn new(key: u16) -> Self {
        Self(key)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to presentation data (sprite, art asset, ...).
///
/// Carried through the engine untouched; only the presentation layer
/// interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayRef(u32);

impl DisplayRef {
    pub fn new(handle: u32) -> Self {
        Self(handle)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Reveal(Position),
    Reset,
}

/// Turn sub-state, derived from the size of the reveal set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// No tiles face-up; waiting for the first pick.
    Idle,
    /// One tile face-up; waiting for the second pick.
    OneRevealed,
    /// Two tiles face-up; resolution armed, further reveals rejected.
    PendingResolution,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::OneRevealed => "oneRevealed",
            TurnPhase::PendingResolution => "pendingResolution",
        }
    }
}

/// Outcome decided when the second tile of a turn is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionKind {
    Match,
    Mismatch,
}

impl ResolutionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionKind::Match => "match",
            ResolutionKind::Mismatch => "mismatch",
        }
    }

    /// Delay before this resolution applies.
    pub fn delay_ms(&self) -> u32 {
        match self {
            ResolutionKind::Match => MATCH_RESOLVE_MS,
            ResolutionKind::Mismatch => MISMATCH_RESOLVE_MS,
        }
    }
}

/// Face of a single tile as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileFace {
    Down,
    Up,
    Matched,
}

impl TileFace {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileFace::Down => "down",
            TileFace::Up => "up",
            TileFace::Matched => "matched",
        }
    }

    /// Whether the tile is currently shown face-up.
    pub fn is_face_up(&self) -> bool {
        !matches!(self, TileFace::Down)
    }
}
