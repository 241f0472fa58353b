use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use runvoy_core::{LogEvent, Sink};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{LogEngineError, Result};
use crate::render::format_timestamp;

const CHANNEL_CAPACITY: usize = 10;
const CLOSE_REASON: &str = "Execution completed";

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    Log { timestamp: i64, message: String },
    Disconnect,
}

enum ChannelMsg {
    Event(LogEvent),
    ServerDone,
}

/// Dials the websocket URL and streams log frames until the server sends
/// a graceful disconnect, the connection drops, or the process is
/// interrupted. Never reorders events relative to the server's delivery
/// order.
pub async fn stream(ws_url: &str, sink: Arc<dyn Sink + Send + Sync>) -> Result<()> {
    let (ws, _response) = connect_async(ws_url).await.map_err(LogEngineError::Dial)?;
    let (mut write, mut read) = ws.split();

    let (tx, mut rx) = mpsc::channel::<ChannelMsg>(CHANNEL_CAPACITY);
    let done = CancellationToken::new();

    let reader_done = done.clone();
    let reader = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = reader_done.cancelled() => break,
                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ServerFrame>(&text) {
                                Ok(ServerFrame::Log { timestamp, message }) => {
                                    if tx.send(ChannelMsg::Event(LogEvent { timestamp, message })).await.is_err() {
                                        break;
                                    }
                                }
                                Ok(ServerFrame::Disconnect) => {
                                    let close = CloseFrame {
                                        code: CloseCode::Normal,
                                        reason: CLOSE_REASON.into(),
                                    };
                                    let _ = write.send(Message::Close(Some(close))).await;
                                    let _ = tx.send(ChannelMsg::ServerDone).await;
                                    break;
                                }
                                Err(e) => {
                                    warn!("failed to parse log frame: {e}");
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            let _ = tx.send(ChannelMsg::ServerDone).await;
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!("websocket read error: {e}");
                            break;
                        }
                        None => break,
                    }
                }
            }
        }
        reader_done.cancel();
    });

    let writer_done = done.clone();
    let writer_sink = sink.clone();
    let writer = tokio::spawn(async move {
        let mut line_no = 0usize;
        loop {
            tokio::select! {
                _ = writer_done.cancelled() => break,
                msg = rx.recv() => {
                    match msg {
                        Some(ChannelMsg::Event(ev)) => {
                            line_no += 1;
                            writer_sink.info(&format!(
                                "{line_no}\t{}\t{}",
                                format_timestamp(ev.timestamp),
                                ev.trimmed_message()
                            ));
                        }
                        Some(ChannelMsg::ServerDone) | None => break,
                    }
                }
            }
        }
    });

    let watcher_done = done.clone();
    let watcher = tokio::spawn(async move {
        wait_for_interrupt().await;
        watcher_done.cancel();
    });
    let watcher_abort = watcher.abort_handle();

    // Only the reader and writer gate completion: the reader relays every
    // event (and the server's done marker) before exiting, and the writer
    // drains the channel before exiting, so by the time both have returned
    // every line the server sent has been printed. The watcher is purely a
    // cancellation trigger — it races in the background and, on interrupt,
    // cancels `done` so the reader/writer notice and unwind; it never gates
    // completion itself, or a fast disconnect could return before the writer
    // finishes draining.
    let _ = tokio::join!(reader, writer);
    done.cancel();
    watcher_abort.abort();

    Ok(())
}

#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = terminate.recv() => {},
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_frame() {
        let frame: ServerFrame = serde_json::from_str(r#"{"type":"log","timestamp":1,"message":"hi"}"#).unwrap();
        assert!(matches!(frame, ServerFrame::Log { timestamp: 1, .. }));
    }

    #[test]
    fn parses_disconnect_frame() {
        let frame: ServerFrame = serde_json::from_str(r#"{"type":"disconnect"}"#).unwrap();
        assert!(matches!(frame, ServerFrame::Disconnect));
    }
}
