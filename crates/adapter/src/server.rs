//! TCP server for the presentation adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking. The first client to complete the
//! hello handshake becomes the controller; everyone else observes.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{info, warn};

use crate::protocol::{
    AckMessage, AckStatus, AckType, CommandMessage, ErrorMessage, HelloMessage, TimingInfo,
    WelcomeMessage, WelcomeType, PROTOCOL_VERSION,
};
use crate::runtime::{InboundCommand, OutboundMessage};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 10,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("MEMORY_MATCH_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("MEMORY_MATCH_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(7878);

        let max_pending_commands = env::var("MEMORY_MATCH_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Self {
            host,
            port,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }
}

/// Handle to a connected client
struct ClientHandle {
    id: usize,
    is_controller: bool,
    handshaken: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<String>,
}

/// Shared server state
pub struct ServerState {
    clients: Arc<RwLock<Vec<ClientHandle>>>,
    /// Last broadcast observation, replayed to late-joining clients.
    latest_observation: Arc<RwLock<Option<String>>>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(RwLock::new(Vec::new())),
            latest_observation: Arc::new(RwLock::new(None)),
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("MEMORY_MATCH_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject stale or replayed sequence numbers.
async fn check_and_update_seq(state: &Arc<ServerState>, client_id: usize, seq: u64) -> bool {
    let mut clients = state.clients.write().await;
    let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
        return true;
    };

    match client.last_seq {
        None => {
            client.last_seq = Some(seq);
            true
        }
        Some(prev) if seq <= prev => false,
        Some(_) => {
            client.last_seq = Some(seq);
            true
        }
    }
}

async fn is_controller(state: &Arc<ServerState>, client_id: usize) -> bool {
    let clients = state.clients.read().await;
    clients
        .iter()
        .find(|c| c.id == client_id)
        .map(|c| c.is_controller)
        .unwrap_or(false)
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!(%bound, "presentation adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new());
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        let clients = state.clients.read().await;
                        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                            let _ = c.tx.send(line);
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        {
                            let mut latest = state.latest_observation.write().await;
                            *latest = Some(line.clone());
                        }
                        let clients = state.clients.read().await;
                        for c in clients.iter().filter(|c| c.handshaken) {
                            let _ = c.tx.send(line.clone());
                        }
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client_id, %addr, "client connected");

        let state_clone = Arc::clone(&state);
        let command_tx = command_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, state_clone.clone(), command_tx).await {
                warn!(client_id, error = %e, "client error");
            }
            remove_client(&state_clone, client_id).await;
            info!(client_id, "client disconnected");
        });
    }
}

async fn remove_client(state: &Arc<ServerState>, client_id: usize) {
    let mut clients = state.clients.write().await;
    clients.retain(|c| c.id != client_id);
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            is_controller: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    // Writer task: one JSON document per line.
    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let handshaken = {
            let clients = state.clients.read().await;
            clients
                .iter()
                .find(|c| c.id == client_id)
                .map(|c| c.handshaken)
                .unwrap_or(false)
        };

        if !handshaken {
            match serde_json::from_str::<HelloMessage>(trimmed) {
                Ok(hello) => {
                    let controller = promote_client(&state, client_id).await;
                    info!(
                        client_id,
                        client = %hello.client.name,
                        controller,
                        "handshake complete"
                    );
                    let welcome = WelcomeMessage {
                        msg_type: WelcomeType::Welcome,
                        seq: hello.seq,
                        ts: hello.ts,
                        protocol_version: PROTOCOL_VERSION.to_string(),
                        controller,
                        timing: TimingInfo::default(),
                    };
                    let _ = tx.send(serde_json::to_string(&welcome)?);
                    let latest = state.latest_observation.read().await;
                    if let Some(line) = latest.as_ref() {
                        let _ = tx.send(line.clone());
                    }
                }
                Err(e) => {
                    let err = ErrorMessage::new(0, 0, "bad_hello", format!("invalid hello: {e}"));
                    let _ = tx.send(serde_json::to_string(&err)?);
                }
            }
            continue;
        }

        match serde_json::from_str::<CommandMessage>(trimmed) {
            Ok(command) => {
                if !is_controller(&state, client_id).await {
                    let err = ErrorMessage::new(
                        command.seq,
                        command.ts,
                        "not_controller",
                        "only the controller may send commands",
                    );
                    let _ = tx.send(serde_json::to_string(&err)?);
                    continue;
                }
                if !check_and_update_seq(&state, client_id, command.seq).await {
                    let err = ErrorMessage::new(
                        command.seq,
                        command.ts,
                        "stale_seq",
                        "sequence number not increasing",
                    );
                    let _ = tx.send(serde_json::to_string(&err)?);
                    continue;
                }
                let inbound = InboundCommand {
                    client_id,
                    seq: command.seq,
                    action: command.action.into(),
                };
                if command_tx.send(inbound).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                let err = ErrorMessage::new(0, 0, "bad_json", format!("invalid command: {e}"));
                let _ = tx.send(serde_json::to_string(&err)?);
            }
        }
    }

    drop(tx);
    let _ = write_task.await;
    Ok(())
}

/// Mark the client handshaken; the first one becomes controller.
async fn promote_client(state: &Arc<ServerState>, client_id: usize) -> bool {
    let mut clients = state.clients.write().await;
    let has_controller = clients.iter().any(|c| c.is_controller);
    let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
        return false;
    };
    client.handshaken = true;
    if !has_controller {
        client.is_controller = true;
    }
    client.is_controller
}

/// Serialize an ack for a processed command.
pub fn ack_line(seq: u64, ts: u64, applied: bool) -> serde_json::Result<String> {
    let ack = AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts,
        status: if applied {
            AckStatus::Applied
        } else {
            AckStatus::Ignored
        },
    };
    serde_json::to_string(&ack)
}

/// Serialize an error reply.
pub fn error_line(
    seq: u64,
    ts: u64,
    code: &str,
    message: impl Into<String>,
) -> serde_json::Result<String> {
    serde_json::to_string(&ErrorMessage::new(seq, ts, code, message))
}

/// Serialize a game state observation.
pub fn observation_line(
    seq: u64,
    ts: u64,
    snapshot: &memory_match_core::GameSnapshot,
) -> serde_json::Result<String> {
    serde_json::to_string(&crate::protocol::ObservationMessage::from_snapshot(
        seq, ts, snapshot,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7878);
        assert_eq!(config.protocol_version, PROTOCOL_VERSION);
    }

    #[test]
    fn socket_addr_parses() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().port(), 7878);
    }

    #[test]
    fn ack_line_statuses() {
        let applied = ack_line(1, 2, true).unwrap();
        assert!(applied.contains(r#""status":"applied""#));
        let ignored = ack_line(1, 2, false).unwrap();
        assert!(ignored.contains(r#""status":"ignored""#));
    }

    #[tokio::test]
    async fn first_handshaken_client_becomes_controller() {
        let state = Arc::new(ServerState::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        {
            let mut clients = state.clients.write().await;
            for id in 1..=2 {
                clients.push(ClientHandle {
                    id,
                    is_controller: false,
                    handshaken: false,
                    last_seq: None,
                    tx: tx.clone(),
                });
            }
        }

        assert!(promote_client(&state, 1).await);
        assert!(!promote_client(&state, 2).await);
        assert!(is_controller(&state, 1).await);
        assert!(!is_controller(&state, 2).await);
    }

    #[tokio::test]
    async fn seq_numbers_must_increase() {
        let state = Arc::new(ServerState::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        {
            let mut clients = state.clients.write().await;
            clients.push(ClientHandle {
                id: 1,
                is_controller: true,
                handshaken: true,
                last_seq: None,
                tx,
            });
        }

        assert!(check_and_update_seq(&state, 1, 1).await);
        assert!(check_and_update_seq(&state, 1, 2).await);
        assert!(!check_and_update_seq(&state, 1, 2).await);
        assert!(!check_and_update_seq(&state, 1, 1).await);
        assert!(check_and_update_seq(&state, 1, 10).await);
    }
}
