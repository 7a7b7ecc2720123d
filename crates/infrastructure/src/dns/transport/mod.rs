#[cfg(feature = "dns-over-https")]
pub mod https;
pub mod resolver;
pub mod stream;
pub mod tcp;
#[cfg(feature = "dns-over-rustls")]
pub mod tls;
pub mod udp;

use async_trait::async_trait;
use hickory_proto::op::Message;
use resolv_application::DnsTransport;
use resolv_domain::{TransportConfig, TransportError};
use tracing::debug;

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    #[cfg(feature = "dns-over-rustls")]
    Tls(tls::TlsTransport),
    #[cfg(feature = "dns-over-https")]
    Https(https::HttpsTransport),
}

#[async_trait]
impl DnsTransport for Transport {
    async fn exchange(&mut self, request: &Message) -> Result<Message, TransportError> {
        match self {
            Self::Udp(t) => t.exchange(request).await,
            Self::Tcp(t) => t.exchange(request).await,
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(t) => t.exchange(request).await,
            #[cfg(feature = "dns-over-https")]
            Self::Https(t) => t.exchange(request).await,
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self {
            Self::Udp(t) => t.close().await,
            Self::Tcp(t) => t.close().await,
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(t) => t.close().await,
            #[cfg(feature = "dns-over-https")]
            Self::Https(t) => t.close().await,
        }
    }

    fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(_) => "TLS",
            #[cfg(feature = "dns-over-https")]
            Self::Https(_) => "HTTPS",
        }
    }
}

pub fn create_transport(config: &TransportConfig) -> Result<Transport, TransportError> {
    config
        .validate()
        .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;
    debug!(
        protocol = config.protocol_name(),
        endpoint = config.endpoint(),
        "Creating transport"
    );

    match config {
        TransportConfig::Udp(c) => Ok(Transport::Udp(udp::UdpTransport::new(c.clone()))),
        TransportConfig::Tcp(c) => Ok(Transport::Tcp(tcp::TcpTransport::new(c.clone()))),

        #[cfg(feature = "dns-over-rustls")]
        TransportConfig::Tls(c) => Ok(Transport::Tls(tls::TlsTransport::new(c.clone())?)),

        #[cfg(not(feature = "dns-over-rustls"))]
        TransportConfig::Tls(c) => Err(TransportError::InvalidConfig(format!(
            "TLS feature not enabled. Enable 'dns-over-rustls' feature to use: {}",
            c.server
        ))),

        #[cfg(feature = "dns-over-https")]
        TransportConfig::Https(c) => Ok(Transport::Https(https::HttpsTransport::new(c.clone()))),

        #[cfg(not(feature = "dns-over-https"))]
        TransportConfig::Https(c) => Err(TransportError::InvalidConfig(format!(
            "HTTPS feature not enabled. Enable 'dns-over-https' feature to use: {}",
            c.url
        ))),
    }
}

pub(crate) fn encode_request(request: &Message) -> Result<Vec<u8>, TransportError> {
    request
        .to_vec()
        .map_err(|e| TransportError::Encode(e.to_string()))
}

pub(crate) fn decode_response(bytes: &[u8]) -> Result<Message, TransportError> {
    Message::from_vec(bytes).map_err(|e| TransportError::Decode(e.to_string()))
}

pub(crate) fn check_response_id(
    server: &str,
    request: &Message,
    response: &Message,
) -> Result<(), TransportError> {
    if response.id() != request.id() {
        return Err(TransportError::IdMismatch {
            server: server.to_string(),
            expected: request.id(),
            received: response.id(),
        });
    }
    Ok(())
}
