//! Newline-delimited JSON transport for the interaction routes.
//!
//! One TCP connection carries one interaction. The first line names the
//! route and the shape:
//!
//! ```text
//! {"route": "get-patient-data", "kind": "request", "payload": {"name": "Doge"}}
//! ```
//!
//! For streams, later inbound lines are control frames - `{"request": n}`
//! grants credit, `{"cancel": true}` stops emission. Outbound lines are
//! `{"item": …}` frames closed by exactly one `{"done": true}` or
//! `{"error": "…"}`. A fire-and-forget interaction produces no outbound
//! frame at all; the connection just closes once the effect is dispatched.
//!
//! Per connection there is one task reading control frames and one writing
//! events, so credit can arrive while an emission is in flight.

use std::sync::Arc;

use resource_core::{InteractionRouter, StreamEvent};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Kind {
    Request,
    Fire,
    Stream,
}

#[derive(Debug, Deserialize)]
struct OpenFrame {
    route: String,
    kind: Kind,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Deserialize)]
struct ControlFrame {
    #[serde(default)]
    request: Option<u32>,
    #[serde(default)]
    cancel: bool,
}

/// Accept loop. Each connection is handled on its own task.
pub async fn serve(listener: TcpListener, routes: Arc<InteractionRouter>) -> std::io::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        debug!(%peer, "interaction connection");
        let routes = Arc::clone(&routes);
        tokio::spawn(async move {
            if let Err(err) = handle_connection(socket, routes).await {
                warn!(error = %err, "interaction connection failed");
            }
        });
    }
}

async fn write_frame(writer: &mut OwnedWriteHalf, frame: &Value) -> std::io::Result<()> {
    let mut line = frame.to_string();
    line.push('\n');
    writer.write_all(line.as_bytes()).await
}

async fn handle_connection(
    socket: TcpStream,
    routes: Arc<InteractionRouter>,
) -> std::io::Result<()> {
    let (read_half, mut writer) = socket.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // Peer went away before opening an interaction.
    let Some(first) = lines.next_line().await? else {
        return Ok(());
    };
    let open: OpenFrame = match serde_json::from_str(&first) {
        Ok(frame) => frame,
        Err(err) => {
            let frame = json!({ "error": format!("malformed frame: {err}") });
            write_frame(&mut writer, &frame).await?;
            return Ok(());
        }
    };
    debug!(route = %open.route, kind = ?open.kind, "interaction opened");

    match open.kind {
        Kind::Request => match routes.request(&open.route, open.payload).await {
            Ok(reply) => write_frame(&mut writer, &json!({ "item": reply })).await?,
            Err(err) => write_frame(&mut writer, &json!({ "error": err.to_string() })).await?,
        },
        Kind::Fire => {
            // No outbound frame on success; a route miss still answers so
            // the caller is not left guessing.
            if let Err(err) = routes.fire(&open.route, open.payload) {
                write_frame(&mut writer, &json!({ "error": err.to_string() })).await?;
            }
        }
        Kind::Stream => {
            let mut sub = match routes.stream(&open.route, open.payload) {
                Ok(sub) => sub,
                Err(err) => {
                    write_frame(&mut writer, &json!({ "error": err.to_string() })).await?;
                    return Ok(());
                }
            };

            let controls = sub.controls();
            tokio::spawn(async move {
                loop {
                    match lines.next_line().await {
                        Ok(Some(line)) => {
                            let frame: ControlFrame = match serde_json::from_str(&line) {
                                Ok(frame) => frame,
                                Err(err) => {
                                    warn!(error = %err, "malformed control frame");
                                    continue;
                                }
                            };
                            if let Some(n) = frame.request {
                                controls.request(n).await;
                            }
                            if frame.cancel {
                                controls.cancel().await;
                                break;
                            }
                        }
                        // Peer hung up mid-stream: treat as cancellation.
                        Ok(None) | Err(_) => {
                            controls.cancel().await;
                            break;
                        }
                    }
                }
            });

            while let Some(event) = sub.next().await {
                match event {
                    StreamEvent::Item(item) => {
                        write_frame(&mut writer, &json!({ "item": item })).await?;
                    }
                    StreamEvent::Complete => {
                        write_frame(&mut writer, &json!({ "done": true })).await?;
                        break;
                    }
                    StreamEvent::Error(message) => {
                        write_frame(&mut writer, &json!({ "error": message })).await?;
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
