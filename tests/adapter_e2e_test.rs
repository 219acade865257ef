//! End-to-end adapter test: real TCP client against a running server.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

use memory_match::adapter::{
    create_hello, observation_line, run_server, InboundCommand, OutboundMessage, ServerConfig,
};
use memory_match::core::{Catalog, GameState};
use memory_match::types::GameAction;

const WAIT: Duration = Duration::from_secs(5);

async fn read_line(
    reader: &mut BufReader<tokio::net::tcp::OwnedReadHalf>,
) -> anyhow::Result<String> {
    let mut line = String::new();
    timeout(WAIT, reader.read_line(&mut line)).await??;
    Ok(line.trim().to_string())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hello_command_observation_round_trip() {
    // Ephemeral port so parallel test runs never collide.
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    };

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(10);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = timeout(WAIT, ready_rx).await.unwrap().unwrap();
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // Handshake.
    let hello = serde_json::to_string(&create_hello(1, "e2e-test", "0.1.0")).unwrap();
    write_half.write_all(hello.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();

    let welcome = read_line(&mut reader).await.unwrap();
    let welcome: serde_json::Value = serde_json::from_str(&welcome).unwrap();
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["controller"], true);

    // Command is forwarded into the game loop channel.
    let command = r#"{"type":"command","seq":2,"ts":0,"action":{"reveal":{"position":3}}}"#;
    write_half.write_all(command.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();

    let inbound = timeout(WAIT, cmd_rx.recv()).await.unwrap().unwrap();
    assert_eq!(inbound.seq, 2);
    assert_eq!(inbound.action, GameAction::Reveal(3));

    // Broadcast observations reach the handshaken client.
    let game = GameState::new(Catalog::demo(), 1);
    let line = observation_line(1, 0, &game.snapshot()).unwrap();
    out_tx
        .send(OutboundMessage::Broadcast { line })
        .unwrap();

    let observation = read_line(&mut reader).await.unwrap();
    let observation: serde_json::Value = serde_json::from_str(&observation).unwrap();
    assert_eq!(observation["type"], "observation");
    assert_eq!(observation["total_pairs"], 8);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_command_before_hello_is_rejected() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    };

    let (cmd_tx, _cmd_rx) = mpsc::channel::<InboundCommand>(10);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = timeout(WAIT, ready_rx).await.unwrap().unwrap();
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // A command without a handshake must produce an error, not a forward.
    let command = r#"{"type":"command","seq":1,"ts":0,"action":"reset"}"#;
    write_half.write_all(command.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();

    let reply = read_line(&mut reader).await.unwrap();
    let reply: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "bad_hello");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_client_is_observer_only() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    };

    let (cmd_tx, _cmd_rx) = mpsc::channel::<InboundCommand>(10);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = timeout(WAIT, ready_rx).await.unwrap().unwrap();

    // First client takes the controller slot.
    let first = TcpStream::connect(addr).await.unwrap();
    let (first_read, mut first_write) = first.into_split();
    let mut first_reader = BufReader::new(first_read);
    let hello = serde_json::to_string(&create_hello(1, "first", "0.1.0")).unwrap();
    first_write.write_all(hello.as_bytes()).await.unwrap();
    first_write.write_all(b"\n").await.unwrap();
    let welcome = read_line(&mut first_reader).await.unwrap();
    let welcome: serde_json::Value = serde_json::from_str(&welcome).unwrap();
    assert_eq!(welcome["controller"], true);

    // Second client is welcomed as observer and its commands are refused.
    let second = TcpStream::connect(addr).await.unwrap();
    let (second_read, mut second_write) = second.into_split();
    let mut second_reader = BufReader::new(second_read);
    let hello = serde_json::to_string(&create_hello(1, "second", "0.1.0")).unwrap();
    second_write.write_all(hello.as_bytes()).await.unwrap();
    second_write.write_all(b"\n").await.unwrap();
    let welcome = read_line(&mut second_reader).await.unwrap();
    let welcome: serde_json::Value = serde_json::from_str(&welcome).unwrap();
    assert_eq!(welcome["controller"], false);

    let command = r#"{"type":"command","seq":1,"ts":0,"action":"reset"}"#;
    second_write.write_all(command.as_bytes()).await.unwrap();
    second_write.write_all(b"\n").await.unwrap();

    let reply = read_line(&mut second_reader).await.unwrap();
    let reply: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "not_controller");
}
