use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::{services::broadcast::SeatBooked, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ws", get(subscribe))
}

#[derive(Debug, Serialize)]
struct WsEvent {
    event: &'static str,
    showtime_id: i64,
    seat_code: String,
}

impl WsEvent {
    fn seat_booked(inner: SeatBooked) -> Self {
        Self {
            event: "seat_booked",
            showtime_id: inner.showtime_id,
            seat_code: inner.seat_code,
        }
    }
}

// GET /ws — every committed booking is pushed to all connected clients as
// {"event":"seat_booked","showtime_id":..,"seat_code":..}.
async fn subscribe(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.broadcaster.subscribe();
    let (mut sender, mut receiver) = socket.split();

    info!(
        "WebSocket subscriber connected ({} active)",
        state.broadcaster.subscriber_count()
    );

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Ok(seat) => {
                        let payload = match serde_json::to_string(&WsEvent::seat_booked(seat)) {
                            Ok(json) => json,
                            Err(e) => {
                                warn!("Failed to serialize seat event: {:?}", e);
                                continue;
                            }
                        };
                        if sender.send(Message::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    // Slow consumers skip missed events rather than stall the
                    // channel; the next successful recv resumes the stream.
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket subscriber lagged, events skipped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Inbound traffic is ignored; the channel is one-way.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("WebSocket subscriber disconnected");
}
