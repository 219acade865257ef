//! Protocol module - JSON message types for the presentation adapter
//!
//! Implements the line-delimited JSON protocol an external renderer or
//! driver speaks to the engine host. All messages have: type, seq
//! (sequence number), ts (timestamp in ms).

use serde::{Deserialize, Serialize};

use memory_match_core::snapshot::{GameSnapshot, PendingSnapshot, TileSnapshot};
use memory_match_types::{
    GameAction, ResolutionKind, TileFace, TurnPhase, MATCH_RESOLVE_MS, MISMATCH_RESOLVE_MS,
    TICK_MS,
};

// ============== Message type tags ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    Hello,
}

impl Default for HelloType {
    fn default() -> Self {
        Self::Hello
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

impl Default for WelcomeType {
    fn default() -> Self {
        Self::Welcome
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    Command,
}

impl Default for CommandType {
    fn default() -> Self {
        Self::Command
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

impl Default for ObservationType {
    fn default() -> Self {
        Self::Observation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

impl Default for AckType {
    fn default() -> Self {
        Self::Ack
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

impl Default for ErrorType {
    fn default() -> Self {
        Self::Error
    }
}

// ============== Client -> Host Messages ==============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
}

/// Create a hello message for connecting clients
pub fn create_hello(seq: u64, name: &str, version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: 0,
        client: ClientInfo {
            name: name.to_string(),
            version: version.to_string(),
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
    }
}

pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Wire form of the two player-facing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireAction {
    Reveal { position: usize },
    Reset,
}

impl From<WireAction> for GameAction {
    fn from(value: WireAction) -> Self {
        match value {
            WireAction::Reveal { position } => GameAction::Reveal(position),
            WireAction::Reset => GameAction::Reset,
        }
    }
}

/// Command message from the driving client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub action: WireAction,
}

// ============== Host -> Client Messages ==============

/// Fixed gameplay pacing advertised in the welcome handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingInfo {
    pub tick_ms: u32,
    pub match_resolve_ms: u32,
    pub mismatch_resolve_ms: u32,
}

impl Default for TimingInfo {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            match_resolve_ms: MATCH_RESOLVE_MS,
            mismatch_resolve_ms: MISMATCH_RESOLVE_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub controller: bool,
    pub timing: TimingInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AckStatus {
    /// The command changed state.
    #[serde(rename = "applied")]
    Applied,
    /// Defined, silent rejection (locked engine, repeated tile, ...).
    #[serde(rename = "ignored")]
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: String,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(seq: u64, ts: u64, code: &str, message: impl Into<String>) -> Self {
        Self {
            msg_type: ErrorType::Error,
            seq,
            ts,
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceWire {
    #[serde(rename = "down")]
    Down,
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "matched")]
    Matched,
}

impl From<TileFace> for FaceWire {
    fn from(value: TileFace) -> Self {
        match value {
            TileFace::Down => FaceWire::Down,
            TileFace::Up => FaceWire::Up,
            TileFace::Matched => FaceWire::Matched,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseWire {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "oneRevealed")]
    OneRevealed,
    #[serde(rename = "pendingResolution")]
    PendingResolution,
}

impl From<TurnPhase> for PhaseWire {
    fn from(value: TurnPhase) -> Self {
        match value {
            TurnPhase::Idle => PhaseWire::Idle,
            TurnPhase::OneRevealed => PhaseWire::OneRevealed,
            TurnPhase::PendingResolution => PhaseWire::PendingResolution,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionWire {
    #[serde(rename = "match")]
    Match,
    #[serde(rename = "mismatch")]
    Mismatch,
}

impl From<ResolutionKind> for ResolutionWire {
    fn from(value: ResolutionKind) -> Self {
        match value {
            ResolutionKind::Match => ResolutionWire::Match,
            ResolutionKind::Mismatch => ResolutionWire::Mismatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileWire {
    pub position: usize,
    pub pair_key: u16,
    pub display_ref: u32,
    pub face: FaceWire,
}

impl From<&TileSnapshot> for TileWire {
    fn from(value: &TileSnapshot) -> Self {
        Self {
            position: value.position,
            pair_key: value.pair_key.value(),
            display_ref: value.display_ref.value(),
            face: value.face.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingWire {
    pub kind: ResolutionWire,
    pub remaining_ms: u32,
}

impl From<&PendingSnapshot> for PendingWire {
    fn from(value: &PendingSnapshot) -> Self {
        Self {
            kind: value.kind.into(),
            remaining_ms: value.remaining_ms,
        }
    }
}

/// Full game state observation streamed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub round_id: u32,
    pub seed: u32,
    pub moves: u32,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub complete: bool,
    pub phase: PhaseWire,
    pub pending: Option<PendingWire>,
    pub revealed: Vec<usize>,
    pub tiles: Vec<TileWire>,
}

impl ObservationMessage {
    pub fn from_snapshot(seq: u64, ts: u64, snapshot: &GameSnapshot) -> Self {
        Self {
            msg_type: ObservationType::Observation,
            seq,
            ts,
            round_id: snapshot.round_id,
            seed: snapshot.seed,
            moves: snapshot.moves,
            matched_pairs: snapshot.matched_pairs,
            total_pairs: snapshot.total_pairs,
            complete: snapshot.complete,
            phase: snapshot.phase.into(),
            pending: snapshot.pending.as_ref().map(PendingWire::from),
            revealed: snapshot.revealed.iter().copied().collect(),
            tiles: snapshot.tiles.iter().map(TileWire::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_reveal_round_trip() {
        let json = r#"{"type":"command","seq":3,"ts":100,"action":{"reveal":{"position":5}}}"#;
        let msg: CommandMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.seq, 3);
        assert_eq!(msg.action, WireAction::Reveal { position: 5 });
        assert_eq!(GameAction::from(msg.action), GameAction::Reveal(5));

        let back = serde_json::to_string(&msg).unwrap();
        let again: CommandMessage = serde_json::from_str(&back).unwrap();
        assert_eq!(again.action, msg.action);
    }

    #[test]
    fn command_reset_parses_from_string_variant() {
        let json = r#"{"type":"command","seq":4,"ts":100,"action":"reset"}"#;
        let msg: CommandMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.action, WireAction::Reset);
        assert_eq!(GameAction::from(msg.action), GameAction::Reset);
    }

    #[test]
    fn hello_round_trip() {
        let hello = create_hello(1, "test-ui", "0.1.0");
        let line = serde_json::to_string(&hello).unwrap();
        assert!(line.contains(r#""type":"hello""#));

        let parsed: HelloMessage = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.client.name, "test-ui");
        assert_eq!(parsed.protocol_version, PROTOCOL_VERSION);
    }

    #[test]
    fn observation_serializes_faces_and_phase() {
        use memory_match_core::{Catalog, GameState};

        let mut game = GameState::new(Catalog::demo(), 7);
        game.reveal(0).unwrap();

        let obs = ObservationMessage::from_snapshot(9, 1234, &game.snapshot());
        let line = serde_json::to_string(&obs).unwrap();
        assert!(line.contains(r#""type":"observation""#));
        assert!(line.contains(r#""phase":"oneRevealed""#));
        assert!(line.contains(r#""face":"up""#));

        let parsed: ObservationMessage = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.tiles.len(), 16);
        assert_eq!(parsed.revealed, vec![0]);
        assert_eq!(parsed.total_pairs, 8);
        assert!(!parsed.complete);
    }

    #[test]
    fn ack_status_wire_names() {
        let ack = AckMessage {
            msg_type: AckType::Ack,
            seq: 2,
            ts: 5,
            status: AckStatus::Ignored,
        };
        let line = serde_json::to_string(&ack).unwrap();
        assert!(line.contains(r#""status":"ignored""#));
    }

    #[test]
    fn error_message_carries_code() {
        let err = ErrorMessage::new(1, 2, "bad_json", "malformed line");
        let line = serde_json::to_string(&err).unwrap();
        assert!(line.contains(r#""code":"bad_json""#));
        let parsed: ErrorMessage = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.message, "malformed line");
    }
}
