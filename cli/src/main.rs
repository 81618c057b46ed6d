//! Terminal client for pixelroom.
//!
//! Connects to the room server over WebSocket, reads commands from stdin, and
//! drives one `RoomSession`. Socket frames and input lines are handled one at
//! a time from a single `select!` loop; after each step the session's outbox
//! is flushed to the socket.

mod canvas;
mod input;

use clap::Parser;
use futures_util::{Sink, SinkExt, StreamExt};
use pixelroom::config::validate_server_url;
use pixelroom::{ClientConfig, ConfigError, EditOutcome, Outbox, RoomSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::canvas::TextCanvas;
use crate::input::{Command, HELP};

/// Queued outbound messages allowed between flushes.
const OUTBOX_LIMIT: usize = 1024;

type Session = RoomSession<Outbox, TextCanvas>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tungstenite::Error>),
    #[error("websocket error: {0}")]
    Ws(Box<tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("stdin read failed: {0}")]
    Stdin(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pixelroom", about = "Collaborative pixel-grid room client")]
struct Cli {
    #[arg(long, env = "PIXELROOM_SERVER_URL")]
    server_url: Option<String>,

    #[arg(long, env = "PIXELROOM_USERNAME")]
    username: Option<String>,

    /// Join this room once connected.
    #[arg(long)]
    room: Option<String>,

    /// Create a new room once connected.
    #[arg(long, default_value_t = false, conflicts_with = "room")]
    create: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    run(&cli, &config).await
}

/// Environment config with command-line flags layered on top.
fn load_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.server_url {
        validate_server_url(url)?;
        config.server_url.clone_from(url);
    }
    if let Some(username) = &cli.username {
        config.username.clone_from(username);
    }
    Ok(config)
}

async fn run(cli: &Cli, config: &ClientConfig) -> Result<(), CliError> {
    let mut session = Session::new(config, Outbox::bounded(OUTBOX_LIMIT), TextCanvas::new(config.layout));
    session.resize_viewport(config.viewport.width, config.viewport.height);

    let stream = match connect_async(config.server_url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(error) => {
            session.on_connect_failed(&error.to_string());
            return Err(CliError::WsConnect(Box::new(error)));
        }
    };
    info!(url = %config.server_url, "ws: connected");
    let (mut sink, mut source) = stream.split();

    session.on_open();
    if let Some(room) = &cli.room {
        session.join_room(room);
    } else if cli.create {
        session.create_room();
    }
    flush(&mut session, &mut sink).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => session.handle_message(text.as_str()),
                Some(Ok(Message::Close(reason))) => {
                    debug!(?reason, "ws: close frame");
                    session.on_close();
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    session.on_close();
                    return Err(ws_error(error));
                }
                None => {
                    session.on_close();
                    break;
                }
            },
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    if !handle_line(&mut session, &line)? {
                        break;
                    }
                }
                None => {
                    debug!("stdin: closed");
                    stdin_open = false;
                }
            },
            signal = tokio::signal::ctrl_c() => {
                if let Err(error) = signal {
                    warn!(%error, "signal: ctrl-c handler failed");
                }
                break;
            }
        }
        flush(&mut session, &mut sink).await?;
    }

    if let Err(error) = sink.close().await {
        debug!(%error, "ws: close failed");
    }
    info!("ws: disconnected");
    Ok(())
}

/// Send everything the session queued since the last flush.
async fn flush<S>(session: &mut Session, sink: &mut S) -> Result<(), CliError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    for text in session.transport_mut().drain() {
        sink.send(Message::Text(text.into())).await.map_err(ws_error)?;
    }
    Ok(())
}

/// Apply one input line. Returns `false` when the user asked to quit.
fn handle_line(session: &mut Session, line: &str) -> Result<bool, CliError> {
    let command = match input::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(true),
        Err(error) => {
            eprintln!("{error}");
            return Ok(true);
        }
    };

    match command {
        Command::Paint { x, y, color } => report_edit(session.apply_cell_edit(x, y, color)),
        Command::PaintPixel { px, py, color } => report_edit(session.apply_local_edit(px, py, color)),
        Command::Create => session.create_room(),
        Command::Join { name } => session.join_room(&name),
        Command::Resize { width, height } => session.resize_viewport(width, height),
        Command::Show => println!("{}", session.render().to_text()),
        Command::History => {
            for record in session.history().snapshot() {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
        Command::Status => print_status(session),
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn report_edit(outcome: EditOutcome) {
    match outcome {
        EditOutcome::OutOfBounds => eprintln!("cell is outside the grid"),
        EditOutcome::Applied { sent: false } => eprintln!("painted locally (not sent)"),
        EditOutcome::Applied { sent: true } => {}
    }
}

fn print_status(session: &Session) {
    let grid = session.grid();
    let (surface_w, surface_h) = session.layout().surface_size(grid.max_x(), grid.max_y());
    let watermark = session.watermark();
    println!("phase:     {:?}", session.phase());
    println!("username:  {}", session.username());
    println!("room:      {}", session.room().unwrap_or("-"));
    println!("canvas:    {}", session.render().room().unwrap_or("-"));
    println!("grid:      {}x{} cells, {surface_w}x{surface_h} px", grid.width(), grid.height());
    println!(
        "watermark: {} @ {}",
        watermark.change_id.as_deref().unwrap_or("-"),
        watermark.change_at.as_deref().unwrap_or("-")
    );
    println!("history:   {} records", session.history().len());
    for record in session.sent_log() {
        println!(
            "sent:      {} {} at {} ({})",
            record.kind.as_str(),
            record.room.as_deref().unwrap_or("-"),
            record.at_ms,
            if record.delivered { "queued" } else { "dropped" }
        );
    }
}

fn ws_error(error: tungstenite::Error) -> CliError {
    match error {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => CliError::WsClosed,
        other => CliError::Ws(Box::new(other)),
    }
}
