//! WebSocket upgrade handler and per-viewer socket pump

use axum::extract::ws::{close_code, CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};

use crate::gate;
use crate::hub::{ActivityHub, Viewer};

/// Axum handler for the activity route
pub async fn activity_ws(
    State(hub): State<ActivityHub>,
    uri: Uri,
    ws: WebSocketUpgrade,
) -> Response {
    handle_upgrade(&hub, &uri, ws).await
}

/// Gate an upgrade request and, if allowed, attach the socket as a viewer
///
/// Responds 404 when the hub is disabled, 503 while it shuts down and 401
/// when the credential does not match.
pub async fn handle_upgrade(hub: &ActivityHub, uri: &Uri, ws: WebSocketUpgrade) -> Response {
    if !hub.is_enabled() {
        return StatusCode::NOT_FOUND.into_response();
    }
    if !hub.is_accepting().await {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let credential = gate::credential_from_uri(uri);
    if !hub.authorize(credential.as_deref()).await {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let hub = hub.clone();
    ws.on_upgrade(move |socket| async move {
        match hub.attach().await {
            Some(viewer) => serve_viewer(socket, viewer, hub).await,
            None => refuse(socket, &hub).await,
        }
    })
}

// Shutdown or the viewer limit won the race against the upgrade.
async fn refuse(mut socket: WebSocket, hub: &ActivityHub) {
    let frame = CloseFrame {
        code: close_code::AGAIN,
        reason: Utf8Bytes::from_static("viewer not accepted"),
    };
    let _ = tokio::time::timeout(
        hub.config().close_timeout,
        socket.send(Message::Close(Some(frame))),
    )
    .await;
}

/// Forward a viewer's frames to its socket until either side goes away
pub async fn serve_viewer(socket: WebSocket, mut viewer: Viewer, hub: ActivityHub) {
    let id = viewer.id();
    let write_timeout = hub.config().write_timeout;
    let close_timeout = hub.config().close_timeout;
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            frame = viewer.recv() => {
                let Some(frame) = frame else {
                    // The hub let go of this viewer
                    let _ = tokio::time::timeout(close_timeout, sender.send(Message::Close(None))).await;
                    break;
                };

                let text = Message::Text(frame.into_text());
                match tokio::time::timeout(write_timeout, sender.send(text)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::debug!(viewer = %id, error = %e, "Socket write failed");
                        break;
                    }
                    Err(_) => {
                        tracing::debug!(viewer = %id, "Socket write timed out");
                        break;
                    }
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::debug!(viewer = %id, error = %e, "Socket read failed");
                    break;
                }
                // Viewers have nothing to say; pings are answered by axum
                Some(Ok(_)) => {}
            }
        }
    }

    hub.disconnect(id).await;
    tracing::debug!(viewer = %id, "Viewer connection closed");
}
