//! Adapter module - presentation control via TCP socket with JSON protocol
//!
//! The engine core is presentation-agnostic: this module is the seam an
//! external renderer or driver plugs into. It implements a
//! **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to the TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, host responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Host sends a full game state observation
//!    whenever the state changes
//! 5. **Commanding**: Controller sends `reveal`/`reset` commands
//!
//! # Message Types
//!
//! ## Client → Host
//!
//! - **hello**: Initial handshake with client info
//! - **command**: `{"action":{"reveal":{"position":5}}}` or `{"action":"reset"}`
//!
//! ## Host → Client
//!
//! - **welcome**: Response to hello with protocol version and gameplay pacing
//! - **observation**: Full game state snapshot (tiles, faces, moves, phase, ...)
//! - **ack**: Command acknowledgment (`applied` or `ignored`)
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `MEMORY_MATCH_HOST`: Bind address (default: "127.0.0.1")
//! - `MEMORY_MATCH_PORT`: Port number (default: 7878)
//! - `MEMORY_MATCH_DISABLED`: Set to "1" or "true" to disable the adapter
//! - `MEMORY_MATCH_MAX_PENDING`: Inbound command queue bound (default: 10)
//! - `MEMORY_MATCH_CATALOG`: Path to a JSON catalog file (see [`config`])
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Host: {"type":"hello","seq":1,"ts":0,"client":{"name":"web-ui","version":"1.0.0"},"protocol_version":"1.0.0"}
//! Host -> Client: {"type":"welcome","seq":1,"ts":0,"protocol_version":"1.0.0","controller":true,"timing":{...}}
//! Host -> Client: {"type":"observation","seq":2,"ts":16,"round_id":0,...,"tiles":[...]}
//! Client -> Host: {"type":"command","seq":2,"ts":120,"action":{"reveal":{"position":5}}}
//! Host -> Client: {"type":"ack","seq":3,"ts":120,"status":"applied"}
//! ```

pub mod config;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use memory_match_core as core;
pub use memory_match_types as types;

// Re-export protocol types for convenience
pub use config::{catalog_from_json, load_catalog_from_env, CatalogFileEntry};
pub use protocol::*;
pub use runtime::{Adapter, InboundCommand, OutboundMessage};
pub use server::{ack_line, error_line, observation_line, run_server, ServerConfig, ServerState};
