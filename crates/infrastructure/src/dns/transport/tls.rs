//! DNS-over-TLS transport (RFC 7858)
//!
//! Same framing and session rules as TCP, over a rustls client stream.
//! Certificates are verified against the webpki roots unless a caller
//! supplies its own `ClientConfig`.

use super::stream::{Dialer, StreamSession};
use super::tcp::TcpDialer;
use async_trait::async_trait;
use hickory_proto::op::Message;
use resolv_application::DnsTransport;
use resolv_domain::names::host_part;
use resolv_domain::{TlsConfig, TransportError};
use rustls::pki_types::ServerName;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Shared TLS config built from the webpki roots.
static SHARED_TLS_CONFIG: LazyLock<Arc<rustls::ClientConfig>> = LazyLock::new(|| {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(config)
});

pub struct TlsDialer {
    tcp: TcpDialer,
    connector: TlsConnector,
    server_name: ServerName<'static>,
    timeout: Duration,
}

#[async_trait]
impl Dialer for TlsDialer {
    type Stream = TlsStream<TcpStream>;

    async fn dial(&self) -> Result<Self::Stream, TransportError> {
        let tcp_stream = self.tcp.connect().await?;
        let server = self.tcp.server();

        let tls_stream = tokio::time::timeout(
            self.timeout,
            self.connector.connect(self.server_name.clone(), tcp_stream),
        )
        .await
        .map_err(|_| TransportError::Timeout {
            server: server.to_string(),
            stage: "during TLS handshake with",
        })?
        .map_err(|e| TransportError::Tls {
            server: server.to_string(),
            reason: e.to_string(),
        })?;

        debug!(server = %server, server_name = ?self.server_name, "TLS connection established");
        Ok(tls_stream)
    }

    fn server(&self) -> &str {
        self.tcp.server()
    }
}

pub struct TlsTransport {
    session: StreamSession<TlsDialer>,
}

impl TlsTransport {
    pub fn new(config: TlsConfig) -> Result<Self, TransportError> {
        Self::with_client_config(config, SHARED_TLS_CONFIG.clone())
    }

    /// Uses `client_config` instead of the webpki roots, e.g. to trust a
    /// private CA.
    pub fn with_client_config(
        config: TlsConfig,
        client_config: Arc<rustls::ClientConfig>,
    ) -> Result<Self, TransportError> {
        let name = config
            .server_name
            .clone()
            .unwrap_or_else(|| host_part(&config.server).to_string());
        let server_name = ServerName::try_from(name.clone()).map_err(|e| {
            TransportError::InvalidConfig(format!("Invalid TLS server name '{}': {}", name, e))
        })?;

        let dialer = TlsDialer {
            tcp: TcpDialer::new(config.server.clone(), config.family(), config.timeout()),
            connector: TlsConnector::from(client_config),
            server_name,
            timeout: config.timeout(),
        };

        Ok(Self {
            session: StreamSession::new(dialer, config.timeout(), config.keep_open),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_open()
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn exchange(&mut self, request: &Message) -> Result<Message, TransportError> {
        self.session.exchange(request).await
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.session.close().await
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
