use super::resolver::resolve_server;
use super::stream::{Dialer, StreamSession};
use async_trait::async_trait;
use hickory_proto::op::Message;
use resolv_application::DnsTransport;
use resolv_domain::{AddressFamily, TcpConfig, TransportError};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Connects a TCP stream to a `host:port` server of the configured family.
pub struct TcpDialer {
    server: String,
    family: AddressFamily,
    timeout: Duration,
}

impl TcpDialer {
    pub fn new(server: String, family: AddressFamily, timeout: Duration) -> Self {
        Self {
            server,
            family,
            timeout,
        }
    }

    pub async fn connect(&self) -> Result<TcpStream, TransportError> {
        let server_addr = resolve_server(&self.server, self.family, self.timeout).await?;

        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(server_addr))
            .await
            .map_err(|_| TransportError::Timeout {
                server: self.server.clone(),
                stage: "connecting to",
            })?
            .map_err(|e| TransportError::Connect {
                server: self.server.clone(),
                reason: e.to_string(),
            })?;

        stream.set_nodelay(true).map_err(|e| TransportError::Connect {
            server: self.server.clone(),
            reason: format!("failed to set TCP_NODELAY: {}", e),
        })?;

        debug!(server = %self.server, addr = %server_addr, "TCP connection established");
        Ok(stream)
    }
}

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn dial(&self) -> Result<TcpStream, TransportError> {
        self.connect().await
    }

    fn server(&self) -> &str {
        &self.server
    }
}

/// DNS over TCP (RFC 1035 §4.2.2, RFC 7766).
pub struct TcpTransport {
    session: StreamSession<TcpDialer>,
}

impl TcpTransport {
    pub fn new(config: TcpConfig) -> Self {
        let dialer = TcpDialer::new(config.server.clone(), config.family(), config.timeout());
        Self {
            session: StreamSession::new(dialer, config.timeout(), config.keep_open),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_open()
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn exchange(&mut self, request: &Message) -> Result<Message, TransportError> {
        self.session.exchange(request).await
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.session.close().await
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}
