use std::time::Duration;

use clap::Parser;
use rallypoint::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Console chat client for a Rallypoint lobby.
#[derive(Parser, Debug)]
#[command(name = "console-chat")]
#[command(version)]
struct Args {
    /// Lobby WebSocket endpoint
    #[arg(long, env = "RALLYPOINT_URL", default_value = "ws://127.0.0.1:5005/chat")]
    url: String,

    /// Display name to chat as
    #[arg(long, env = "RALLYPOINT_USER")]
    user: String,

    /// Bearer token obtained from login
    #[arg(long, env = "RALLYPOINT_TOKEN", hide_env_values = true)]
    token: String,

    /// Chat dialect spoken by the server (json or raw)
    #[arg(long, default_value_t = CodecKind::Json)]
    codec: CodecKind,

    /// How often incoming traffic is drained, per second
    #[arg(long, default_value_t = 20)]
    tick_hz: u32,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Say(String),
    FindMatch,
    History,
    Quit,
    Nothing,
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::Nothing,
            "/find" => Self::FindMatch,
            "/history" => Self::History,
            "/quit" | "/exit" => Self::Quit,
            text => Self::Say(text.to_string()),
        }
    }
}

/// Forwards stdin lines to the main loop; closes the channel on EOF.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let session = Session::new(args.user, args.token)?;
    let me = session.username().to_string();
    let mut client = ChatClient::builder().codec(args.codec).build(session);
    client.on_match_found(|opponent| println!("*** matched against {opponent} ***"));

    client.connect(&args.url).await?;
    println!("connected to {} as {me}. /find, /history, /quit", args.url);

    let mut input = spawn_stdin_reader();
    let mut tick = tokio::time::interval(Duration::from_secs(1) / args.tick_hz.max(1));
    let mut history = ChatHistory::default();
    let mut incoming = Vec::new();

    loop {
        tokio::select! {
            _ = tick.tick() => {
                client.drain(&mut incoming);
                for line in &incoming {
                    if client.session().is_self(line.sender_name()) {
                        println!("You: {}", line.message());
                    } else {
                        println!("{line}");
                    }
                }
                history.extend(incoming.drain(..));

                if !client.is_connected() {
                    println!("connection closed");
                    break;
                }
            }
            line = input.recv() => {
                let Some(line) = line else { break };
                match Command::parse(&line) {
                    Command::Say(text) => client.send(&text),
                    Command::FindMatch => client.send_find_opponent(),
                    Command::History => {
                        for rendered in history.render(&me) {
                            println!("  {rendered}");
                        }
                    }
                    Command::Quit => break,
                    Command::Nothing => {}
                }
            }
        }
    }

    client.disconnect().await;
    Ok(())
}
