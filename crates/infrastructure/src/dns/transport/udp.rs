//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! One socket per exchange. A truncated response is replayed over TCP
//! unless the transport is configured to return it as-is.

use super::resolver::resolve_server;
use super::tcp::TcpTransport;
use super::{check_response_id, decode_response, encode_request};
use async_trait::async_trait;
use hickory_proto::op::Message;
use resolv_application::DnsTransport;
use resolv_domain::{TransportError, UdpConfig};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

pub struct UdpTransport {
    config: UdpConfig,
}

impl UdpTransport {
    pub fn new(config: UdpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UdpConfig {
        &self.config
    }

    async fn exchange_udp(&self, request: &Message) -> Result<Message, TransportError> {
        let server = self.config.server.as_str();
        let timeout = self.config.timeout();
        let server_addr = resolve_server(server, self.config.family(), timeout).await?;

        let bind_addr = if server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| TransportError::Connect {
                server: server.to_string(),
                reason: format!("failed to bind UDP socket: {}", e),
            })?;

        let query = encode_request(request)?;
        let bytes_sent = tokio::time::timeout(timeout, socket.send_to(&query, server_addr))
            .await
            .map_err(|_| TransportError::Timeout {
                server: server.to_string(),
                stage: "sending query to",
            })?
            .map_err(|e| TransportError::Io {
                server: server.to_string(),
                reason: e.to_string(),
            })?;

        debug!(server = %server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; self.config.recv_buf_size()];
        let bytes_received = tokio::time::timeout(timeout, async {
            loop {
                let (len, from_addr) = socket.recv_from(&mut recv_buf).await?;
                if from_addr == server_addr {
                    return Ok::<usize, std::io::Error>(len);
                }
                warn!(
                    expected = %server_addr,
                    received_from = %from_addr,
                    "UDP response from unexpected source"
                );
            }
        })
        .await
        .map_err(|_| TransportError::Timeout {
            server: server.to_string(),
            stage: "waiting for response from",
        })?
        .map_err(|e| TransportError::Io {
            server: server.to_string(),
            reason: e.to_string(),
        })?;

        debug!(server = %server_addr, bytes_received, "UDP response received");

        let response = decode_response(&recv_buf[..bytes_received])?;
        check_response_id(server, request, &response)?;
        Ok(response)
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn exchange(&mut self, request: &Message) -> Result<Message, TransportError> {
        let response = self.exchange_udp(request).await?;
        if !response.truncated() || self.config.ignore_truncation {
            return Ok(response);
        }

        warn!(server = %self.config.server, "Truncated UDP response, retrying over TCP");
        let mut tcp = TcpTransport::new(self.config.tcp_fallback());
        let result = tcp.exchange(request).await;
        tcp.close().await?;
        result
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
