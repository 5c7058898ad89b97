//! `DuolinkServer` builder and accept loop.

use std::sync::Arc;

use duolink_protocol::{JsonCodec, ServerEvent};
use duolink_room::SessionManager;
use duolink_transport::{
    Hub, OriginPolicy, Transport, TransportError, WebSocketTransport,
};
use tokio::sync::Mutex;

use crate::DuolinkError;
use crate::handler::handle_connection;

/// The shared mutable core: session state plus the connection hub.
///
/// One mutex over both gives every join, relay, and disconnect the
/// serialized, atomic-step semantics the lifecycle invariants need —
/// two concurrent joins can never both observe an empty room.
pub(crate) struct Core {
    pub(crate) sessions: SessionManager,
    pub(crate) hub: Hub<ServerEvent>,
}

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) core: Mutex<Core>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a duolink server.
pub struct DuolinkServerBuilder {
    bind_addr: String,
    origin_policy: OriginPolicy,
}

impl DuolinkServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            origin_policy: OriginPolicy::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the cross-origin policy for the WebSocket handshake.
    pub fn origin_policy(mut self, policy: OriginPolicy) -> Self {
        self.origin_policy = policy;
        self
    }

    /// Binds the transport and builds the server.
    pub async fn build(self) -> Result<DuolinkServer, DuolinkError> {
        let transport =
            WebSocketTransport::bind(&self.bind_addr, self.origin_policy)
                .await?;

        let state = Arc::new(ServerState {
            core: Mutex::new(Core {
                sessions: SessionManager::new(),
                hub: Hub::new(),
            }),
            codec: JsonCodec,
        });

        Ok(DuolinkServer { transport, state })
    }
}

impl Default for DuolinkServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running duolink server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DuolinkServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl DuolinkServer {
    /// Creates a new builder.
    pub fn builder() -> DuolinkServerBuilder {
        DuolinkServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Each accepted connection gets its own handler task. Declined
    /// handshakes (answered health probes, rejected origins) are
    /// routine and only logged. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), DuolinkError> {
        tracing::info!("duolink server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(TransportError::HandshakeDeclined(reason)) => {
                    tracing::debug!(%reason, "handshake declined");
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
