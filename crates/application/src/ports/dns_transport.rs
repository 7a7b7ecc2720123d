use async_trait::async_trait;
use hickory_proto::op::Message;
use resolv_domain::TransportError;

/// Sends one query and returns one decoded response.
///
/// Implementations may hold a persistent session between exchanges; it is
/// released by [`DnsTransport::close`] and re-established on demand.
#[async_trait]
pub trait DnsTransport: Send {
    async fn exchange(&mut self, request: &Message) -> Result<Message, TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;

    fn protocol_name(&self) -> &'static str;
}

