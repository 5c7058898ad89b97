//! WebSocket transport implementation using `tokio-tungstenite`.
//!
//! Besides upgrading connections, the transport answers two plain-HTTP
//! concerns on the same listening port:
//!
//! - `GET /health` is answered directly with `200 {"status":"healthy"}`
//!   and never reaches the session layer. Health probes carry no
//!   upgrade headers, so they are detected by peeking at the request
//!   line before the WebSocket handshake is attempted.
//! - Browser handshakes are checked against the configured allowed
//!   origin in the handshake callback; a mismatching `Origin` header is
//!   rejected with 403.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request, Response,
};
use tokio_tungstenite::tungstenite::http::{HeaderValue, StatusCode, header};

use crate::{Connection, ConnectionId, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

/// Cross-origin policy applied during the WebSocket handshake.
///
/// Requests without an `Origin` header (non-browser clients, health
/// probes from infrastructure) always pass.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    allowed_origin: Option<String>,
}

impl OriginPolicy {
    /// Accepts handshakes from any origin.
    pub fn allow_any() -> Self {
        Self {
            allowed_origin: None,
        }
    }

    /// Accepts browser handshakes only from the given origin.
    pub fn only(origin: impl Into<String>) -> Self {
        Self {
            allowed_origin: Some(origin.into()),
        }
    }

    fn permits(&self, origin: &HeaderValue) -> bool {
        match &self.allowed_origin {
            Some(allowed) => origin.as_bytes() == allowed.as_bytes(),
            None => true,
        }
    }
}

/// A WebSocket-based [`Transport`] that listens for incoming connections.
pub struct WebSocketTransport {
    listener: TcpListener,
    origin_policy: OriginPolicy,
}

impl WebSocketTransport {
    /// Binds a new WebSocket transport to the given address.
    pub async fn bind(
        addr: &str,
        origin_policy: OriginPolicy,
    ) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket transport listening");
        Ok(Self {
            listener,
            origin_policy,
        })
    }

    /// Returns the local address the transport is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (mut stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        if peek_is_health_probe(&stream).await {
            answer_health_probe(&mut stream).await?;
            return Err(TransportError::HandshakeDeclined(
                "health probe answered".to_string(),
            ));
        }

        let policy = self.origin_policy.clone();
        let ws = tokio_tungstenite::accept_hdr_async(
            stream,
            move |req: &Request, resp: Response| {
                screen_handshake(&policy, req, resp)
            },
        )
        .await
        .map_err(|e| TransportError::HandshakeDeclined(e.to_string()))?;

        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        tracing::debug!(%id, %addr, "accepted WebSocket connection");

        let (sink, stream) = ws.split();
        Ok(WebSocketConnection {
            id,
            sink: Arc::new(Mutex::new(sink)),
            stream: Arc::new(Mutex::new(stream)),
        })
    }
}

/// Returns `true` if the pending request looks like the health probe.
///
/// Peeks without consuming so a real handshake still sees the full
/// request. A probe that arrives byte-by-byte may miss the match; it
/// then fails the WebSocket handshake instead, which probes tolerate.
async fn peek_is_health_probe(stream: &TcpStream) -> bool {
    let mut buf = [0u8; 16];
    match stream.peek(&mut buf).await {
        Ok(n) => buf[..n].starts_with(b"GET /health "),
        Err(_) => false,
    }
}

/// Writes the static health response and closes the stream.
async fn answer_health_probe(
    stream: &mut TcpStream,
) -> Result<(), TransportError> {
    const BODY: &str = r#"{"status":"healthy"}"#;
    let response = format!(
        "HTTP/1.1 200 OK\r\n\
         content-type: application/json\r\n\
         content-length: {}\r\n\
         connection: close\r\n\r\n{}",
        BODY.len(),
        BODY
    );
    stream
        .write_all(response.as_bytes())
        .await
        .map_err(TransportError::SendFailed)?;
    stream
        .shutdown()
        .await
        .map_err(TransportError::SendFailed)?;
    Ok(())
}

/// Handshake callback: enforces the origin policy before the upgrade
/// completes.
fn screen_handshake(
    policy: &OriginPolicy,
    req: &Request,
    mut resp: Response,
) -> Result<Response, ErrorResponse> {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        if !policy.permits(origin) {
            tracing::warn!(origin = ?origin, "rejected cross-origin handshake");
            let mut denied =
                ErrorResponse::new(Some("origin not allowed".to_string()));
            *denied.status_mut() = StatusCode::FORBIDDEN;
            return Err(denied);
        }
        // Echo the origin back so browsers accept the upgrade response.
        resp.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            origin.clone(),
        );
        resp.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }

    Ok(resp)
}

/// A single WebSocket connection.
///
/// Sink and stream halves are locked independently so a writer task can
/// push outbound frames while the handler task is parked in `recv`.
#[derive(Clone)]
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Arc<Mutex<SplitSink<WsStream, Message>>>,
    stream: Arc<Mutex<SplitStream<WsStream>>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let text = String::from_utf8_lossy(data).into_owned();
        self.sink
            .lock()
            .await
            .send(Message::text(text))
            .await
            .map_err(|e| {
                TransportError::SendFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    e,
                ))
            })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        loop {
            let msg = self.stream.lock().await.next().await;
            match msg {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink.lock().await.close().await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
